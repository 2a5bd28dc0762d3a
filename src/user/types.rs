//! Types for member profiles

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A member profile
///
/// The backend uses the same shape for reads, updates and the join request,
/// so every field is optional and absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mess_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mess_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<NaiveDate>,
    /// "Monthly" or "Bimonthly"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
    /// "Veg" or "Non-veg"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_type: Option<String>,
}

impl UserProfile {
    /// Joined mess id, ignoring blank values
    pub fn joined_mess(&self) -> Option<&str> {
        self.mess_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// Body of `/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_date: Option<NaiveDate>,
}

/// How long a member subscribes for when joining
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionDuration {
    OneMonth,
    TwoMonths,
}

impl SubscriptionDuration {
    pub fn as_plan(self) -> &'static str {
        match self {
            SubscriptionDuration::OneMonth => "Monthly",
            SubscriptionDuration::TwoMonths => "Bimonthly",
        }
    }
}

/// Reply of the profile and mess image upload endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploaded {
    #[serde(default)]
    pub image_name: Option<String>,
    #[serde(default)]
    pub images_names: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: bool,
}
