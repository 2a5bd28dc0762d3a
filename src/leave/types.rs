//! Types for leave requests

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Where a leave request is in its life cycle
///
/// `Pending` moves to `Approved` or `Rejected` by owner action, or is deleted
/// by the member. Approved and rejected requests are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "PENDING",
            LeaveStatus::Approved => "APPROVED",
            LeaveStatus::Rejected => "REJECTED",
        }
    }

    /// Check that a request in this state may be acted on
    pub(crate) fn ensure_pending(self, action: &'static str) -> Result<(), Error> {
        match self {
            LeaveStatus::Pending => Ok(()),
            other => Err(Error::InvalidTransition {
                from: other.to_string(),
                action,
            }),
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_lowercase())
    }
}

impl FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(LeaveStatus::Pending),
            "APPROVED" => Ok(LeaveStatus::Approved),
            "REJECTED" => Ok(LeaveStatus::Rejected),
            other => Err(format!("unknown leave status '{}'", other)),
        }
    }
}

impl Serialize for LeaveStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LeaveStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A leave request as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub user_email: String,
    #[serde(default)]
    pub mess_id: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub mess_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub status: Option<LeaveStatus>,
    #[serde(default)]
    pub application_date: Option<NaiveDate>,
    #[serde(default)]
    pub approved_date: Option<NaiveDate>,
    #[serde(default)]
    pub rejected_date: Option<NaiveDate>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl LeaveRequest {
    /// Status, treating a missing one as pending
    pub fn status(&self) -> LeaveStatus {
        self.status.unwrap_or(LeaveStatus::Pending)
    }

    pub fn is_pending(&self) -> bool {
        self.status() == LeaveStatus::Pending
    }

    pub fn is_approved(&self) -> bool {
        self.status == Some(LeaveStatus::Approved)
    }
}

/// Body of `/leave/apply`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest {
    pub user_email: String,
    pub mess_id: String,
    pub owner_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mess_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_date: Option<NaiveDate>,
}

impl NewLeaveRequest {
    /// Reject requests the backend or the owner would refuse anyway
    pub fn validate(&self, today: NaiveDate) -> Result<(), Error> {
        if self.user_email.trim().is_empty() {
            return Err(Error::validation("User email not found. Please log in again"));
        }
        if self.owner_email.trim().is_empty() || self.mess_id.trim().is_empty() {
            return Err(Error::validation("Mess details are missing"));
        }
        if self.reason.trim().is_empty() {
            return Err(Error::validation("Please provide a reason for your leave"));
        }
        if self.end_date < self.start_date {
            return Err(Error::validation("End date cannot be before start date"));
        }
        if self.start_date < today {
            return Err(Error::validation("Start date cannot be in the past"));
        }
        Ok(())
    }
}
