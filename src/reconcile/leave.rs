use chrono::NaiveDate;
use log::warn;
use serde::Serialize;

use super::Month;
use crate::leave::{LeaveRequest, LeaveStatus};

/// Inclusive number of days from `start` to `end`, zero when reversed
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        0
    } else {
        (end - start).num_days() as u32 + 1
    }
}

/// Days of a leave request that fall in `month`
pub fn days_in_month(leave: &LeaveRequest, month: Month) -> u32 {
    month.overlap_days(leave.start_date, leave.end_date)
}

/// Leave usage for one member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStatistics {
    pub approved: usize,
    pub pending: usize,
    pub rejected: usize,
    /// Approved leave days inside the current month
    pub days_this_month: u32,
    /// Approved leave days over all requests
    pub total_leave_days: u32,
    pub quota: u32,
    pub remaining: u32,
}

/// Tally leave requests against a monthly quota
///
/// Only approved requests consume days, and a reversed range consumes none.
/// A request with no status is counted in none of the three buckets.
pub fn leave_statistics(leaves: &[LeaveRequest], today: NaiveDate, quota: u32) -> LeaveStatistics {
    let month = Month::of(today);
    let mut stats = LeaveStatistics {
        quota,
        ..Default::default()
    };

    for leave in leaves {
        match leave.status {
            Some(LeaveStatus::Approved) => stats.approved += 1,
            Some(LeaveStatus::Pending) => stats.pending += 1,
            Some(LeaveStatus::Rejected) => stats.rejected += 1,
            None => {}
        }
        if !leave.is_approved() {
            continue;
        }
        if leave.end_date < leave.start_date {
            warn!(
                "leave {} ends {} before it starts {}; no days counted",
                leave.id, leave.end_date, leave.start_date
            );
            continue;
        }
        stats.total_leave_days = stats
            .total_leave_days
            .saturating_add(inclusive_days(leave.start_date, leave.end_date));
        stats.days_this_month = stats
            .days_this_month
            .saturating_add(days_in_month(leave, month));
    }

    stats.remaining = quota.saturating_sub(stats.days_this_month);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn leave(start: NaiveDate, end: NaiveDate, status: Option<LeaveStatus>) -> LeaveRequest {
        LeaveRequest {
            id: format!("{}-{}", start, end),
            user_id: None,
            user_email: "asha@example.com".into(),
            mess_id: Some("m1".into()),
            owner_email: Some("owner@example.com".into()),
            mess_name: None,
            start_date: start,
            end_date: end,
            reason: "away".into(),
            status,
            application_date: None,
            approved_date: None,
            rejected_date: None,
            rejection_reason: None,
            approved: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn single_day_leave_is_one_day() {
        let day = date(2024, 6, 12);
        assert_eq!(inclusive_days(day, day), 1);
        assert_eq!(inclusive_days(day, date(2024, 6, 11)), 0);
    }

    #[test]
    fn leave_across_months_splits_by_day() {
        let l = leave(date(2024, 6, 28), date(2024, 7, 2), Some(LeaveStatus::Approved));
        let june = days_in_month(&l, Month::new(2024, 6).unwrap());
        let july = days_in_month(&l, Month::new(2024, 7).unwrap());
        assert_eq!(june, 3);
        assert_eq!(july, 2);
        assert_eq!(june + july, inclusive_days(l.start_date, l.end_date));
        assert_eq!(days_in_month(&l, Month::new(2024, 8).unwrap()), 0);
    }

    #[test]
    fn statistics_count_by_status() {
        let leaves = vec![
            leave(date(2024, 6, 28), date(2024, 7, 2), Some(LeaveStatus::Approved)),
            leave(date(2024, 6, 3), date(2024, 6, 3), Some(LeaveStatus::Approved)),
            leave(date(2024, 5, 1), date(2024, 5, 4), Some(LeaveStatus::Approved)),
            leave(date(2024, 6, 10), date(2024, 6, 11), Some(LeaveStatus::Pending)),
            leave(date(2024, 6, 15), date(2024, 6, 16), Some(LeaveStatus::Rejected)),
            leave(date(2024, 6, 20), date(2024, 6, 21), None),
        ];
        let stats = leave_statistics(&leaves, date(2024, 6, 5), 6);
        assert_eq!(stats.approved, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.days_this_month, 4);
        assert_eq!(stats.total_leave_days, 10);
        assert_eq!(stats.remaining, 2);
    }

    #[test]
    fn remaining_never_goes_below_zero() {
        let leaves = vec![leave(date(2024, 6, 1), date(2024, 6, 20), Some(LeaveStatus::Approved))];
        let stats = leave_statistics(&leaves, date(2024, 6, 25), 6);
        assert_eq!(stats.days_this_month, 20);
        assert_eq!(stats.remaining, 0);
    }

    #[test]
    fn reversed_ranges_count_by_status_but_add_no_days() {
        let leaves = vec![
            leave(date(2024, 6, 9), date(2024, 6, 2), Some(LeaveStatus::Approved)),
            leave(date(2024, 6, 9), date(2024, 6, 2), Some(LeaveStatus::Pending)),
        ];
        let stats = leave_statistics(&leaves, date(2024, 6, 10), 6);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.days_this_month, 0);
        assert_eq!(stats.total_leave_days, 0);
        assert_eq!(stats.remaining, 6);
    }

    #[test]
    fn huge_ranges_saturate_total_days() {
        let leaves = vec![leave(NaiveDate::MIN, NaiveDate::MAX, Some(LeaveStatus::Approved)); 30];
        let stats = leave_statistics(&leaves, date(2024, 6, 10), 6);
        assert_eq!(stats.approved, 30);
        assert_eq!(stats.total_leave_days, u32::MAX);
        assert_eq!(stats.days_this_month, 900);
        assert_eq!(stats.remaining, 0);
    }
}
