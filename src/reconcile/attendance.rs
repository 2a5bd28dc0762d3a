use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use log::warn;
use serde::Serialize;

use super::Month;
use crate::attendance::{AttendanceRecord, AttendanceStatus};
use crate::leave::LeaveRequest;

/// How a past day without any attendance record is counted
///
/// Members are only marked when something unusual happens, so by default an
/// unmarked day counts as present. `Unmarked` counts explicit records only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmarkedDayPolicy {
    #[default]
    Present,
    Unmarked,
}

impl fmt::Display for UnmarkedDayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmarkedDayPolicy::Present => f.write_str("present"),
            UnmarkedDayPolicy::Unmarked => f.write_str("unmarked"),
        }
    }
}

impl FromStr for UnmarkedDayPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(UnmarkedDayPolicy::Present),
            "unmarked" | "unknown" => Ok(UnmarkedDayPolicy::Unmarked),
            other => Err(format!("unknown unmarked-day policy '{}'", other)),
        }
    }
}

/// Attendance counts for one member and one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AttendanceSummary {
    pub present: u32,
    pub absent: u32,
    pub leave: u32,
    pub total: u32,
}

impl AttendanceSummary {
    /// Present days as a percentage of counted days
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.present) * 100.0 / f64::from(self.total)
        }
    }
}

/// Collapse records to one status per day; leave beats absent beats present.
fn by_day<'a>(records: impl Iterator<Item = &'a AttendanceRecord>) -> BTreeMap<NaiveDate, &'a AttendanceRecord> {
    let mut days: BTreeMap<NaiveDate, &AttendanceRecord> = BTreeMap::new();
    for record in records {
        days.entry(record.date)
            .and_modify(|current| {
                if record.status > current.status {
                    *current = record;
                }
            })
            .or_insert(record);
    }
    days
}

/// Count present, absent and leave days of `month` up to `today`
///
/// Future days are never counted, so `total` is at most the number of days
/// elapsed in the month.
pub fn summarize_month(
    records: &[AttendanceRecord],
    month: Month,
    today: NaiveDate,
    policy: UnmarkedDayPolicy,
) -> AttendanceSummary {
    let elapsed = month.elapsed_days(today);
    if elapsed == 0 {
        return AttendanceSummary::default();
    }

    let days = by_day(
        records
            .iter()
            .filter(|r| month.contains(r.date) && r.date <= today),
    );

    let count = |status: AttendanceStatus| days.values().filter(|r| r.status == status).count() as u32;
    let absent = count(AttendanceStatus::Absent);
    let leave = count(AttendanceStatus::Leave);
    let present = match policy {
        UnmarkedDayPolicy::Present => elapsed - absent - leave,
        UnmarkedDayPolicy::Unmarked => count(AttendanceStatus::Present),
    };

    AttendanceSummary {
        present,
        absent,
        leave,
        total: present + absent + leave,
    }
}

/// Overlay approved leaves on a month of attendance records
///
/// Every day of an approved leave inside `month` becomes a `leave` record,
/// replacing whatever was recorded for that day. The result has one record
/// per day, sorted by date.
pub fn merge_approved_leaves(
    records: &[AttendanceRecord],
    leaves: &[LeaveRequest],
    month: Month,
) -> Vec<AttendanceRecord> {
    let mut days: BTreeMap<NaiveDate, AttendanceRecord> = by_day(records.iter().filter(|r| month.contains(r.date)))
        .into_iter()
        .map(|(date, record)| (date, record.clone()))
        .collect();

    for leave in leaves.iter().filter(|l| l.is_approved()) {
        if leave.end_date < leave.start_date {
            warn!("skipping leave {} with end before start", leave.id);
            continue;
        }
        let reason = if leave.reason.trim().is_empty() {
            "Approved leave"
        } else {
            leave.reason.as_str()
        };
        for day in month.days_between(leave.start_date, leave.end_date) {
            days.insert(
                day,
                AttendanceRecord::new(day, AttendanceStatus::Leave).with_reason(reason),
            );
        }
    }

    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::LeaveStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june() -> Month {
        Month::new(2024, 6).unwrap()
    }

    fn record(day: u32, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord::new(date(2024, 6, day), status)
    }

    fn leave(start: NaiveDate, end: NaiveDate, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: "l1".into(),
            user_id: None,
            user_email: "asha@example.com".into(),
            mess_id: Some("m1".into()),
            owner_email: None,
            mess_name: None,
            start_date: start,
            end_date: end,
            reason: "Trip home".into(),
            status: Some(status),
            application_date: None,
            approved_date: None,
            rejected_date: None,
            rejection_reason: None,
            approved: status == LeaveStatus::Approved,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn single_leave_early_in_month() {
        let records = vec![record(1, AttendanceStatus::Leave)];
        let summary = summarize_month(&records, june(), date(2024, 6, 5), UnmarkedDayPolicy::Present);
        assert_eq!(
            summary,
            AttendanceSummary {
                present: 4,
                absent: 0,
                leave: 1,
                total: 5
            }
        );
    }

    #[test]
    fn past_month_counts_every_day() {
        let records = vec![record(3, AttendanceStatus::Absent), record(4, AttendanceStatus::Absent)];
        let summary = summarize_month(&records, june(), date(2024, 8, 1), UnmarkedDayPolicy::Present);
        assert_eq!(summary.total, 30);
        assert_eq!(summary.absent, 2);
        assert_eq!(summary.present, 28);
    }

    #[test]
    fn future_month_is_empty() {
        let records = vec![record(3, AttendanceStatus::Present)];
        let summary = summarize_month(&records, june(), date(2024, 5, 20), UnmarkedDayPolicy::Present);
        assert_eq!(summary, AttendanceSummary::default());
    }

    #[test]
    fn future_and_foreign_records_are_ignored() {
        let records = vec![
            record(2, AttendanceStatus::Absent),
            record(20, AttendanceStatus::Absent),
            AttendanceRecord::new(date(2024, 5, 31), AttendanceStatus::Leave),
        ];
        let summary = summarize_month(&records, june(), date(2024, 6, 10), UnmarkedDayPolicy::Present);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.leave, 0);
        assert_eq!(summary.total, 10);
    }

    #[test]
    fn duplicate_days_count_once() {
        let records = vec![
            record(2, AttendanceStatus::Present),
            record(2, AttendanceStatus::Leave),
            record(2, AttendanceStatus::Absent),
            record(3, AttendanceStatus::Absent),
            record(3, AttendanceStatus::Absent),
        ];
        let summary = summarize_month(&records, june(), date(2024, 6, 3), UnmarkedDayPolicy::Present);
        assert_eq!(
            summary,
            AttendanceSummary {
                present: 1,
                absent: 1,
                leave: 1,
                total: 3
            }
        );
    }

    #[test]
    fn unmarked_policy_counts_explicit_records_only() {
        let records = vec![record(1, AttendanceStatus::Present), record(2, AttendanceStatus::Absent)];
        let summary = summarize_month(&records, june(), date(2024, 6, 5), UnmarkedDayPolicy::Unmarked);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn totals_always_add_up() {
        let statuses = [AttendanceStatus::Present, AttendanceStatus::Absent, AttendanceStatus::Leave];
        for today in 1..=30 {
            let records: Vec<_> = (1..=30)
                .filter(|d| d % 3 != 0)
                .map(|d| record(d, statuses[(d as usize * 7) % 3]))
                .collect();
            for policy in [UnmarkedDayPolicy::Present, UnmarkedDayPolicy::Unmarked] {
                let s = summarize_month(&records, june(), date(2024, 6, today), policy);
                assert_eq!(s.present + s.absent + s.leave, s.total);
                assert!(s.total <= today);
            }
        }
    }

    #[test]
    fn approved_leaves_override_recorded_days() {
        let records = vec![record(28, AttendanceStatus::Present), record(10, AttendanceStatus::Absent)];
        let leaves = vec![
            leave(date(2024, 6, 28), date(2024, 7, 2), LeaveStatus::Approved),
            leave(date(2024, 6, 12), date(2024, 6, 13), LeaveStatus::Pending),
        ];
        let merged = merge_approved_leaves(&records, &leaves, june());

        let dates: Vec<_> = merged.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 6, 10), date(2024, 6, 28), date(2024, 6, 29), date(2024, 6, 30)]
        );
        assert_eq!(merged[1].status, AttendanceStatus::Leave);
        assert_eq!(merged[1].reason.as_deref(), Some("Trip home"));
    }
}
