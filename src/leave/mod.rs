//! Leave request operations

mod types;

use chrono::NaiveDate;
use log::info;

use crate::error::Error;
use crate::fetch::{segment, Transport};

pub use types::*;

/// Client for leave requests
pub struct LeaveClient<'a> {
    transport: &'a Transport,
}

impl<'a> LeaveClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Submit a leave request after checking it against `today`
    pub async fn apply(&self, request: &NewLeaveRequest, today: NaiveDate) -> Result<LeaveRequest, Error> {
        request.validate(today)?;

        let mut request = request.clone();
        if request.application_date.is_none() {
            request.application_date = Some(today);
        }

        let created: LeaveRequest = self
            .transport
            .post("/leave/apply")
            .json(&request)?
            .execute()
            .await?;
        info!(
            "leave {} requested for {} to {}",
            created.id, created.start_date, created.end_date
        );
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<LeaveRequest, Error> {
        self.transport
            .get(&format!("/leave/{}", segment(id)))
            .execute()
            .await
    }

    /// Every request a member has made
    pub async fn for_user(&self, user_email: &str) -> Result<Vec<LeaveRequest>, Error> {
        self.transport
            .get(&format!("/leave/user/email/{}", segment(user_email)))
            .execute()
            .await
    }

    /// Every request addressed to an owner
    pub async fn for_owner(&self, owner_email: &str) -> Result<Vec<LeaveRequest>, Error> {
        self.transport
            .get(&format!("/leave/owner/{}", segment(owner_email)))
            .execute()
            .await
    }

    /// Requests still waiting for an owner's decision
    pub async fn pending_for_owner(&self, owner_email: &str) -> Result<Vec<LeaveRequest>, Error> {
        self.transport
            .get(&format!("/leave/pending/owner/{}", segment(owner_email)))
            .execute()
            .await
    }

    pub async fn for_mess(&self, mess_id: &str) -> Result<Vec<LeaveRequest>, Error> {
        self.transport
            .get(&format!("/leave/mess/{}", segment(mess_id)))
            .execute()
            .await
    }

    pub async fn pending_for_mess(&self, mess_id: &str) -> Result<Vec<LeaveRequest>, Error> {
        self.transport
            .get(&format!("/leave/pending/mess/{}", segment(mess_id)))
            .execute()
            .await
    }

    /// Approve a pending request
    pub async fn approve(&self, leave: &LeaveRequest) -> Result<LeaveRequest, Error> {
        leave.status().ensure_pending("approve")?;

        self.transport
            .put(&format!("/leave/approve/{}", segment(&leave.id)))
            .execute()
            .await
    }

    /// Reject a pending request with a reason the member will see
    pub async fn reject(&self, leave: &LeaveRequest, reason: &str) -> Result<LeaveRequest, Error> {
        leave.status().ensure_pending("reject")?;
        if reason.trim().is_empty() {
            return Err(Error::validation("Please provide a reason for rejection"));
        }

        self.transport
            .put(&format!("/leave/reject/{}", segment(&leave.id)))
            .query("rejectionReason", reason.trim())
            .execute()
            .await
    }

    /// Withdraw a request that has not been decided yet
    pub async fn cancel(&self, leave: &LeaveRequest) -> Result<(), Error> {
        leave.status().ensure_pending("cancel")?;

        self.transport
            .delete(&format!("/leave/{}", segment(&leave.id)))
            .execute_empty()
            .await
    }
}
