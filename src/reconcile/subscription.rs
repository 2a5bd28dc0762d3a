use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::SubscriptionPlan;

/// Plan length used when a mess does not price by days
pub const DEFAULT_PLAN_DAYS: u32 = 30;

/// The dates a membership covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: u32,
}

impl SubscriptionPeriod {
    pub fn from_start(start: NaiveDate, plan: &SubscriptionPlan) -> Self {
        let days = plan.plan_days().unwrap_or(DEFAULT_PLAN_DAYS);
        let end = start
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end, days }
    }

    /// Days left of the period as of `today`
    pub fn remaining_days(&self, today: NaiveDate) -> u32 {
        let elapsed = (today - self.start).num_days().max(0);
        (i64::from(self.days) - elapsed).max(0) as u32
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.remaining_days(today) > 0
    }
}
