//! Types for attendance

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Attendance state of one member on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

impl AttendanceStatus {
    /// Spelling the backend stores ("Present", "Absent", "Leave")
    pub fn as_backend_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Leave => "Leave",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => f.write_str("present"),
            AttendanceStatus::Absent => f.write_str("absent"),
            AttendanceStatus::Leave => f.write_str("leave"),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "leave" => Ok(AttendanceStatus::Leave),
            other => Err(format!("unknown attendance status '{}'", other)),
        }
    }
}

impl Serialize for AttendanceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_backend_str())
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One day of a member's attendance as shown on the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AttendanceRecord {
    pub fn new(date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            date,
            status,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Attendance row as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    pub user_email: String,
    pub date: NaiveDate,
    /// Free text on the server side, normally "Present" or "Absent"
    #[serde(default)]
    pub status: Option<String>,
}

impl AttendanceEntry {
    /// Parsed status, `None` when missing or unrecognised
    pub fn status(&self) -> Option<AttendanceStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    /// Convert to a calendar record when the status is understood
    pub fn to_record(&self) -> Option<AttendanceRecord> {
        self.status()
            .map(|status| AttendanceRecord::new(self.date, status))
    }
}

/// Reply of `/attendance/monthly-summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAttendance {
    pub user_email: String,
    pub year: i32,
    pub month: u32,
    pub total_days: u32,
    pub present_days: u32,
    #[serde(default)]
    pub present_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub attendance_percentage: f64,
}

/// One member's mark inside a bulk attendance request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    pub user_email: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Body of `/attendance/mark`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarkAttendanceRequest<'a> {
    pub owner_email: &'a str,
    pub attendance: &'a [AttendanceMark],
}

/// Body of `/attendance/mark-selected`: one status for several members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedMembersAttendance {
    pub owner_email: String,
    pub user_emails: Vec<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_parses_any_case() {
        assert_eq!("PRESENT".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Present));
        assert_eq!(" absent ".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Absent));
        assert_eq!("Leave".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Leave));
        assert!("late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn backend_entry_maps_to_record() {
        let entry: AttendanceEntry = serde_json::from_value(json!({
            "id": "a1",
            "ownerEmail": "owner@example.com",
            "userEmail": "asha@example.com",
            "date": "2024-06-03",
            "status": "Absent"
        }))
        .unwrap();
        let record = entry.to_record().unwrap();
        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn mark_serialises_backend_spelling() {
        let mark = AttendanceMark {
            user_email: "asha@example.com".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            status: AttendanceStatus::Present,
        };
        assert_eq!(
            serde_json::to_value(&mark).unwrap(),
            json!({"userEmail": "asha@example.com", "date": "2024-06-03", "status": "Present"})
        );
    }
}
