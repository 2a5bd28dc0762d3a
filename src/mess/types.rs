//! Types for messes

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reconcile::SubscriptionPlan;

/// A mess and the owner who runs it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mess {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub mess_name: Option<String>,
    #[serde(default)]
    pub mess_address: Option<String>,
    /// "Veg" or "Non-veg"
    #[serde(default)]
    pub mess_type: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub price_per_meal: Option<u32>,
    /// Either a number of days or, above 100, a flat price
    #[serde(default)]
    pub subscription_plan: Option<u32>,
    /// Date the mess was registered
    #[serde(default)]
    pub current_date: Option<NaiveDate>,
    #[serde(default)]
    pub image_name: Option<String>,
    #[serde(default)]
    pub mess_images: Vec<String>,
    #[serde(default)]
    pub joined_users: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Kilometres from the caller, set by the nearby search
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub feedback_count: Option<u32>,
}

impl Mess {
    /// Pricing fields used for the fallback dues amount
    pub fn plan(&self) -> SubscriptionPlan {
        SubscriptionPlan {
            price_per_meal: self.price_per_meal,
            subscription_plan: self.subscription_plan,
        }
    }

    /// Display name, falling back to the owner's name
    pub fn display_name(&self) -> &str {
        self.mess_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Unknown Mess")
    }
}
