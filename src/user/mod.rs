//! Member profile operations

mod types;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::Error;
use crate::fetch::{segment, ApiResponse, PageRequest, PageableResponse, Transport};

pub use types::*;

/// Client for member profiles
pub struct UserClient<'a> {
    transport: &'a Transport,
}

impl<'a> UserClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Get a member by email
    pub async fn get_by_email(&self, email: &str) -> Result<UserProfile, Error> {
        self.transport
            .get(&format!("/byEmail/{}", segment(email)))
            .execute()
            .await
    }

    /// Get a member by id
    pub async fn get_by_id(&self, id: &str) -> Result<UserProfile, Error> {
        self.transport
            .get(&format!("/byId/{}", segment(id)))
            .execute()
            .await
    }

    /// Update a member; only the fields set on `profile` are sent
    pub async fn update(&self, email: &str, profile: &UserProfile) -> Result<UserProfile, Error> {
        self.transport
            .put(&format!("/update/{}", segment(email)))
            .json(profile)?
            .execute()
            .await
    }

    /// Register a new member
    pub async fn register(&self, registration: &Registration) -> Result<ApiResponse<Value>, Error> {
        if registration.email.trim().is_empty() || registration.password.is_empty() {
            return Err(Error::validation("email and password are required"));
        }

        self.transport
            .post("/register")
            .json(registration)?
            .execute_envelope()
            .await
    }

    pub async fn delete(&self, email: &str) -> Result<(), Error> {
        self.transport
            .delete(&format!("/byEmail/{}", segment(email)))
            .execute_empty()
            .await
    }

    /// List members a page at a time
    pub async fn list(&self, page: &PageRequest) -> Result<PageableResponse<UserProfile>, Error> {
        self.transport.get("/getAll").page(page).execute().await
    }

    /// Join the mess run by `mess_email`
    pub async fn join_mess(
        &self,
        user_email: &str,
        mess_email: &str,
        duration: SubscriptionDuration,
        food_type: &str,
        join_date: NaiveDate,
    ) -> Result<ApiResponse<Value>, Error> {
        let details = UserProfile {
            subscription_plan: Some(duration.as_plan().to_string()),
            food_type: Some(food_type.to_string()),
            join_date: Some(join_date),
            ..Default::default()
        };

        self.transport
            .post(&format!("/joinMess/{}/{}", segment(user_email), segment(mess_email)))
            .json(&details)?
            .execute_envelope()
            .await
    }

    /// URL serving the member's profile picture
    pub fn profile_image_url(&self, email: &str) -> String {
        self.transport.url(&format!("/profile/{}", segment(email)))
    }

    /// Upload a new profile picture
    pub async fn upload_profile_image(
        &self,
        email: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImageUploaded, Error> {
        self.transport
            .post(&format!("/profile/{}", segment(email)))
            .file("image", file_name, bytes)
            .execute()
            .await
    }
}
