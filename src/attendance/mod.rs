//! Attendance operations
//!
//! Owners mark attendance in bulk; members read it back through several
//! endpoints of varying age. [`AttendanceClient::month_records`] walks those
//! endpoints from newest to oldest until one answers.

mod types;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::error::Error;
use crate::fetch::{segment, Transport};
use crate::reconcile::Month;

pub use types::*;

/// Client for attendance records
pub struct AttendanceClient<'a> {
    transport: &'a Transport,
}

impl<'a> AttendanceClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Present days of a member in one month
    pub async fn monthly_summary(&self, user_email: &str, month: Month) -> Result<MonthlyAttendance, Error> {
        self.transport
            .get("/attendance/monthly-summary")
            .query("userEmail", user_email)
            .query("year", month.year())
            .query("month", month.month())
            .execute_envelope()
            .await?
            .into_payload()
    }

    /// Every date a member was marked present
    pub async fn present_dates(&self, user_email: &str) -> Result<Vec<NaiveDate>, Error> {
        Ok(self
            .transport
            .get("/attendance/present-dates-only")
            .query("userEmail", user_email)
            .execute_envelope()
            .await?
            .payload
            .unwrap_or_default())
    }

    /// Present records of a member between two dates, inclusive
    pub async fn present_dates_in_range(
        &self,
        user_email: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceEntry>, Error> {
        Ok(self
            .transport
            .get("/attendance/present-dates/range")
            .query("userEmail", user_email)
            .query("startDate", start)
            .query("endDate", end)
            .execute_envelope()
            .await?
            .payload
            .unwrap_or_default())
    }

    /// All records of a member
    pub async fn by_user(&self, user_email: &str) -> Result<Vec<AttendanceEntry>, Error> {
        Ok(self
            .transport
            .get("/attendance/by-user")
            .query("userEmail", user_email)
            .execute_envelope()
            .await?
            .payload
            .unwrap_or_default())
    }

    /// Records an owner made on one day
    pub async fn by_owner(&self, owner_email: &str, date: NaiveDate) -> Result<Vec<AttendanceEntry>, Error> {
        Ok(self
            .transport
            .get("/attendance/by-owner")
            .query("ownerEmail", owner_email)
            .query("date", date)
            .execute_envelope()
            .await?
            .payload
            .unwrap_or_default())
    }

    pub async fn by_owner_in_range(
        &self,
        owner_email: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceEntry>, Error> {
        if end < start {
            return Err(Error::validation("End date cannot be before start date"));
        }

        Ok(self
            .transport
            .get("/attendance/by-owner/range")
            .query("ownerEmail", owner_email)
            .query("startDate", start)
            .query("endDate", end)
            .execute_envelope()
            .await?
            .payload
            .unwrap_or_default())
    }

    /// Mark attendance for several members at once
    pub async fn mark(&self, owner_email: &str, marks: &[AttendanceMark]) -> Result<(), Error> {
        if marks.is_empty() {
            return Err(Error::validation("no attendance to mark"));
        }

        let request = MarkAttendanceRequest {
            owner_email,
            attendance: marks,
        };
        self.transport
            .post("/attendance/mark")
            .json(&request)?
            .execute_envelope::<serde_json::Value>()
            .await?;
        Ok(())
    }

    /// Give the same status to a list of members for one day
    pub async fn mark_selected(&self, request: &SelectedMembersAttendance) -> Result<Vec<AttendanceEntry>, Error> {
        if request.user_emails.is_empty() {
            return Err(Error::validation("select at least one member"));
        }

        Ok(self
            .transport
            .post("/attendance/mark-selected")
            .json(request)?
            .execute_envelope()
            .await?
            .payload
            .unwrap_or_default())
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.transport
            .delete(&format!("/attendance/{}", segment(id)))
            .execute_envelope::<serde_json::Value>()
            .await?;
        Ok(())
    }

    /// Calendar records of a member for one month
    ///
    /// Tries the monthly summary, then the present dates list, then the full
    /// record list. A failing endpoint is logged and the next one tried; when
    /// all fail the month is empty.
    pub async fn month_records(&self, user_email: &str, month: Month) -> Vec<AttendanceRecord> {
        match self.monthly_summary(user_email, month).await {
            Ok(summary) => {
                debug!("{} present days in {} from monthly summary", summary.present_days, month);
                return present_records(summary.present_dates, month);
            }
            Err(err) => warn!("monthly summary for {} failed: {}", user_email, err),
        }

        match self.present_dates(user_email).await {
            Ok(dates) => return present_records(dates, month),
            Err(err) => warn!("present dates for {} failed: {}", user_email, err),
        }

        match self.by_user(user_email).await {
            Ok(entries) => entries
                .iter()
                .filter(|e| month.contains(e.date))
                .filter_map(AttendanceEntry::to_record)
                .filter(|r| r.status != AttendanceStatus::Leave)
                .collect(),
            Err(err) => {
                warn!("attendance for {} unavailable: {}", user_email, err);
                Vec::new()
            }
        }
    }
}

fn present_records(dates: Vec<NaiveDate>, month: Month) -> Vec<AttendanceRecord> {
    dates
        .into_iter()
        .filter(|d| month.contains(*d))
        .map(|d| AttendanceRecord::new(d, AttendanceStatus::Present))
        .collect()
}
