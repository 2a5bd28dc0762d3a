use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::payment::Payment;

/// Plans above this value are a flat price rather than a number of days
pub const FLAT_PLAN_THRESHOLD: u32 = 100;

/// The pricing fields of a mess
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub price_per_meal: Option<u32>,
    pub subscription_plan: Option<u32>,
}

impl SubscriptionPlan {
    /// Amount owed for a whole subscription with no payments made
    pub fn full_amount(&self) -> f64 {
        match (self.price_per_meal, self.subscription_plan) {
            (_, Some(flat)) if flat > FLAT_PLAN_THRESHOLD => f64::from(flat),
            (Some(price), Some(days)) => f64::from(price) * f64::from(days),
            _ => 0.0,
        }
    }

    /// Length of the plan in days, when the plan is a day count
    pub fn plan_days(&self) -> Option<u32> {
        self.subscription_plan
            .filter(|days| (1..=FLAT_PLAN_THRESHOLD).contains(days))
    }
}

/// Most recent payment; payments without a date rank below dated ones
pub fn latest_payment(payments: &[Payment]) -> Option<&Payment> {
    payments.iter().max_by_key(|p| p.payment_date)
}

/// Outstanding balance of one member
///
/// The latest payment's remaining dues when any payment exists, the full
/// plan amount otherwise. Never negative.
pub fn outstanding_dues(payments: &[Payment], plan: &SubscriptionPlan) -> f64 {
    match latest_payment(payments) {
        Some(latest) => latest.remaining_dues.max(0.0),
        None => plan.full_amount(),
    }
}

/// Sum of every member's latest remaining dues
pub fn total_pending(payments: &[Payment]) -> f64 {
    let mut latest: HashMap<&str, &Payment> = HashMap::new();
    for payment in payments {
        latest
            .entry(payment.user_email.as_str())
            .and_modify(|current| {
                if payment.payment_date >= current.payment_date {
                    *current = payment;
                }
            })
            .or_insert(payment);
    }
    latest.values().map(|p| p.remaining_dues.max(0.0)).sum()
}

/// Remaining dues to record after paying `amount` against `outstanding`
pub fn next_payment(outstanding: f64, amount: f64) -> Result<f64, Error> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::validation("Payment amount must be greater than zero"));
    }
    if amount > outstanding + f64::EPSILON {
        return Err(Error::validation(format!(
            "Payment amount {:.2} exceeds outstanding dues {:.2}",
            amount, outstanding
        )));
    }
    Ok((outstanding - amount).max(0.0))
}
