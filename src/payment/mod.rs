//! Payment operations
//!
//! Payments are append-only. Each one carries the dues left after it, so the
//! most recent payment tells what a member still owes.

mod types;

use chrono::NaiveDateTime;
use log::info;

use crate::error::Error;
use crate::fetch::{segment, Transport};
use crate::reconcile::next_payment;

pub use types::*;

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Client for payments and dues
pub struct PaymentClient<'a> {
    transport: &'a Transport,
}

impl<'a> PaymentClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Record a payment as given
    pub async fn record(&self, payment: &RecordPayment) -> Result<Payment, Error> {
        if payment.amount_paid < 0.0 || payment.remaining_dues < 0.0 {
            return Err(Error::validation("amounts cannot be negative"));
        }

        self.transport
            .post("/payment/record")
            .query("userEmail", &payment.user_email)
            .query("ownerEmail", &payment.owner_email)
            .query("messId", &payment.mess_id)
            .query("amountPaid", payment.amount_paid)
            .query("remainingDues", payment.remaining_dues)
            .execute()
            .await
    }

    /// Pay `amount` against `outstanding` and record what is left
    pub async fn pay(
        &self,
        user_email: &str,
        owner_email: &str,
        mess_id: &str,
        outstanding: f64,
        amount: f64,
    ) -> Result<Payment, Error> {
        let remaining_dues = next_payment(outstanding, amount)?;
        let payment = self
            .record(&RecordPayment {
                user_email: user_email.to_string(),
                owner_email: owner_email.to_string(),
                mess_id: mess_id.to_string(),
                amount_paid: amount,
                remaining_dues,
            })
            .await?;
        info!("{} paid {:.2}, {:.2} left", user_email, amount, remaining_dues);
        Ok(payment)
    }

    /// Dues the backend holds for a member of a mess
    pub async fn pending_dues(&self, user_email: &str, mess_id: &str) -> Result<PendingDues, Error> {
        self.transport
            .get(&format!(
                "/payment/pending/user/{}/mess/{}",
                segment(user_email),
                segment(mess_id)
            ))
            .execute()
            .await
    }

    pub async fn for_user(&self, user_email: &str) -> Result<Vec<Payment>, Error> {
        self.transport
            .get(&format!("/payment/user/{}", segment(user_email)))
            .execute()
            .await
    }

    pub async fn for_mess(&self, mess_id: &str) -> Result<Vec<Payment>, Error> {
        self.transport
            .get(&format!("/payment/mess/{}", segment(mess_id)))
            .execute()
            .await
    }

    /// Payment history of one member in one mess
    pub async fn for_user_in_mess(&self, user_email: &str, mess_id: &str) -> Result<Vec<Payment>, Error> {
        self.transport
            .get(&format!(
                "/payment/user/{}/mess/{}",
                segment(user_email),
                segment(mess_id)
            ))
            .execute()
            .await
    }

    /// Sum of what every member of a mess still owes
    pub async fn total_pending_for_mess(&self, mess_id: &str) -> Result<TotalPendingDues, Error> {
        self.transport
            .get(&format!("/payment/total-pending/mess/{}", segment(mess_id)))
            .execute()
            .await
    }

    /// Payments made between two instants
    pub async fn in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Payment>, Error> {
        if end < start {
            return Err(Error::validation("End date cannot be before start date"));
        }

        self.transport
            .get("/payment/date-range")
            .query("startDate", start.format(DATE_TIME_FORMAT))
            .query("endDate", end.format(DATE_TIME_FORMAT))
            .execute()
            .await
    }
}
