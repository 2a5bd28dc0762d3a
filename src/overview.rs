//! Composite views for members and owners
//!
//! Each overview gathers what one screen of the app shows: a handful of
//! backend calls reconciled into a single value. Calls whose data the screen
//! can live without are allowed to fail; they are logged and replaced by a
//! fallback.

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;

use crate::attendance::{AttendanceClient, AttendanceEntry, AttendanceRecord};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{PageRequest, Transport};
use crate::leave::{LeaveClient, LeaveRequest};
use crate::mess::{Mess, MessClient};
use crate::payment::{PaymentClient, RecordPayment};
use crate::reconcile::{
    leave_statistics, merge_approved_leaves, outstanding_dues, summarize_month, total_pending, AttendanceSummary,
    LeaveStatistics, Month, SubscriptionPeriod,
};
use crate::user::{Registration, SubscriptionDuration, UserClient, UserProfile};

/// Where a dues figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DuesSource {
    /// The backend's own pending dues figure
    Backend,
    /// Worked out from the payment history
    PaymentHistory,
    /// No payment information was available
    FullPlan,
}

/// Subscription screen of a member
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberOverview {
    pub user: UserProfile,
    pub mess: Mess,
    pub period: SubscriptionPeriod,
    pub pending_dues: f64,
    pub dues_source: DuesSource,
    pub month: String,
    /// One record per marked day, approved leaves included
    pub attendance_records: Vec<AttendanceRecord>,
    pub attendance: AttendanceSummary,
    pub leave_statistics: LeaveStatistics,
    pub leaves: Vec<LeaveRequest>,
}

/// Dashboard of a mess owner
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerOverview {
    pub mess: Mess,
    pub member_count: u64,
    pub pending_leaves: Vec<LeaveRequest>,
    pub total_pending_dues: f64,
    pub dues_source: DuesSource,
    pub todays_attendance: Vec<AttendanceEntry>,
}

/// One line of an owner's member list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub user: UserProfile,
    pub pending_dues: f64,
    pub dues_source: DuesSource,
}

/// Someone an owner signs up at the counter
#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub duration: SubscriptionDuration,
    /// "Veg" or "Non-Veg"
    pub food_type: String,
    /// Password given to the account when it has to be created
    pub initial_password: String,
}

/// Outcome of [`OverviewClient::add_member`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedMember {
    pub user: UserProfile,
    /// Whether an account had to be registered first
    pub registered: bool,
    /// Dues opened for the new member
    pub initial_dues: f64,
    /// Whether the opening payment record reached the backend
    pub payment_recorded: bool,
}

/// Builds overviews
pub struct OverviewClient<'a> {
    transport: &'a Transport,
    options: &'a ClientOptions,
}

impl<'a> OverviewClient<'a> {
    pub(crate) fn new(transport: &'a Transport, options: &'a ClientOptions) -> Self {
        Self { transport, options }
    }

    /// Subscription, dues, attendance and leave of a member for `month`
    pub async fn member(&self, email: &str, month: Month, today: NaiveDate) -> Result<MemberOverview, Error> {
        let user = UserClient::new(self.transport).get_by_email(email).await?;
        let mess_id = user
            .joined_mess()
            .ok_or_else(|| Error::general("No mess subscription found"))?
            .to_string();
        let mess = MessClient::new(self.transport).get_by_id(&mess_id).await?;

        let start = user.join_date.or(mess.current_date).unwrap_or(today);
        let period = SubscriptionPeriod::from_start(start, &mess.plan());

        let (pending_dues, dues_source) = self.member_dues(email, &mess).await;

        let leaves = LeaveClient::new(self.transport)
            .for_user(email)
            .await
            .unwrap_or_else(|err| {
                warn!("leave history for {} unavailable: {}", email, err);
                Vec::new()
            });

        let recorded = AttendanceClient::new(self.transport)
            .month_records(email, month)
            .await;
        let attendance_records = merge_approved_leaves(&recorded, &leaves, month);
        let attendance = summarize_month(&attendance_records, month, today, self.options.unmarked_day_policy);
        let leave_statistics = leave_statistics(&leaves, today, self.options.monthly_leave_quota);

        Ok(MemberOverview {
            user,
            mess,
            period,
            pending_dues,
            dues_source,
            month: month.to_string(),
            attendance_records,
            attendance,
            leave_statistics,
            leaves,
        })
    }

    /// What a member owes a mess
    ///
    /// Asks the backend first, then works it out from the payment history,
    /// then falls back to the full plan amount.
    pub async fn member_dues(&self, email: &str, mess: &Mess) -> (f64, DuesSource) {
        let payments = PaymentClient::new(self.transport);
        let mess_id = mess.id.as_str();

        match payments.pending_dues(email, mess_id).await {
            Ok(dues) => return (dues.pending_dues.max(0.0), DuesSource::Backend),
            Err(err) => warn!("pending dues for {} unavailable: {}", email, err),
        }

        self.history_dues(email, mess).await
    }

    /// Dues from a member's payment history, or the full plan without one
    async fn history_dues(&self, email: &str, mess: &Mess) -> (f64, DuesSource) {
        let plan = mess.plan();
        match PaymentClient::new(self.transport)
            .for_user_in_mess(email, &mess.id)
            .await
        {
            Ok(history) if !history.is_empty() => (outstanding_dues(&history, &plan), DuesSource::PaymentHistory),
            Ok(_) => {
                debug!("{} has no payments yet", email);
                (plan.full_amount(), DuesSource::FullPlan)
            }
            Err(err) => {
                warn!("payment history for {} unavailable: {}", email, err);
                (plan.full_amount(), DuesSource::FullPlan)
            }
        }
    }

    /// Every member of an owner's mess with what they owe
    ///
    /// Members whose profile cannot be loaded are left out.
    pub async fn roster(&self, owner_email: &str) -> Result<Vec<RosterEntry>, Error> {
        let mess = MessClient::new(self.transport).get_by_email(owner_email).await?;
        let users = UserClient::new(self.transport);

        let mut roster = Vec::with_capacity(mess.joined_users.len());
        for email in &mess.joined_users {
            let user = match users.get_by_email(email).await {
                Ok(user) => user,
                Err(err) => {
                    warn!("skipping member {}: {}", email, err);
                    continue;
                }
            };
            let (pending_dues, dues_source) = self.history_dues(email, &mess).await;
            roster.push(RosterEntry {
                user,
                pending_dues,
                dues_source,
            });
        }
        Ok(roster)
    }

    /// Sign a member up to an owner's mess
    ///
    /// Registers the account when the email is unknown, joins it to the mess
    /// from `today` and opens the full plan amount as dues. A failure to
    /// record the opening payment is logged and reported in the result.
    pub async fn add_member(
        &self,
        owner_email: &str,
        member: &NewMember,
        today: NaiveDate,
    ) -> Result<AddedMember, Error> {
        if member.name.trim().is_empty() || member.email.trim().is_empty() {
            return Err(Error::validation("Name and email are required to add a member"));
        }

        let mess = MessClient::new(self.transport).get_by_email(owner_email).await?;
        let users = UserClient::new(self.transport);

        let registered = match users.get_by_email(&member.email).await {
            Ok(_) => false,
            Err(err) if err.is_not_found() => {
                users
                    .register(&Registration {
                        name: member.name.clone(),
                        email: member.email.clone(),
                        password: member.initial_password.clone(),
                        current_date: Some(today),
                    })
                    .await?;
                let details = UserProfile {
                    name: Some(member.name.clone()),
                    phone_number: member.phone_number.clone(),
                    address: member.address.clone(),
                    ..Default::default()
                };
                users.update(&member.email, &details).await?;
                true
            }
            Err(err) => return Err(err),
        };

        users
            .join_mess(&member.email, &mess.email, member.duration, &member.food_type, today)
            .await?;
        info!("{} joined {}", member.email, mess.display_name());

        let initial_dues = mess.plan().full_amount();
        let payment_recorded = match PaymentClient::new(self.transport)
            .record(&RecordPayment {
                user_email: member.email.clone(),
                owner_email: mess.email.clone(),
                mess_id: mess.id.clone(),
                amount_paid: 0.0,
                remaining_dues: initial_dues,
            })
            .await
        {
            Ok(_) => true,
            Err(err) => {
                warn!("opening dues for {} not recorded: {}", member.email, err);
                false
            }
        };

        let user = users.get_by_email(&member.email).await?;
        Ok(AddedMember {
            user,
            registered,
            initial_dues,
            payment_recorded,
        })
    }

    /// Members, pending leaves, dues and today's attendance of an owner's mess
    pub async fn owner(&self, email: &str, today: NaiveDate) -> Result<OwnerOverview, Error> {
        let mess = MessClient::new(self.transport).get_by_email(email).await?;

        let member_count = match MessClient::new(self.transport)
            .members(&mess.email, &PageRequest::page(0, 1))
            .await
        {
            Ok(page) => page.total_elements,
            Err(err) => {
                warn!("member listing for {} unavailable: {}", email, err);
                mess.joined_users.len() as u64
            }
        };

        let pending_leaves = LeaveClient::new(self.transport)
            .pending_for_owner(email)
            .await
            .unwrap_or_else(|err| {
                warn!("pending leaves for {} unavailable: {}", email, err);
                Vec::new()
            });

        let (total_pending_dues, dues_source) = self.mess_dues(&mess.id).await;

        let todays_attendance = AttendanceClient::new(self.transport)
            .by_owner(email, today)
            .await
            .unwrap_or_else(|err| {
                warn!("attendance for {} on {} unavailable: {}", email, today, err);
                Vec::new()
            });

        Ok(OwnerOverview {
            mess,
            member_count,
            pending_leaves,
            total_pending_dues,
            dues_source,
            todays_attendance,
        })
    }

    async fn mess_dues(&self, mess_id: &str) -> (f64, DuesSource) {
        let payments = PaymentClient::new(self.transport);

        match payments.total_pending_for_mess(mess_id).await {
            Ok(total) => return (total.total_pending_dues.max(0.0), DuesSource::Backend),
            Err(err) => warn!("total pending dues for {} unavailable: {}", mess_id, err),
        }

        match payments.for_mess(mess_id).await {
            Ok(history) => (total_pending(&history), DuesSource::PaymentHistory),
            Err(err) => {
                warn!("payments for {} unavailable: {}", mess_id, err);
                (0.0, DuesSource::FullPlan)
            }
        }
    }
}
