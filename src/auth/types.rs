//! Types for authentication

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which side of the service an account belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// A member subscribed to a mess
    #[serde(rename = "user")]
    Member,
    /// A mess owner
    #[serde(rename = "owner")]
    Owner,
}

impl Role {
    pub(crate) fn send_otp_path(self) -> &'static str {
        match self {
            Role::Member => "/auth/sendOtp",
            Role::Owner => "/auth/sendOtpToMess",
        }
    }

    pub(crate) fn verify_otp_path(self) -> &'static str {
        match self {
            Role::Member => "/auth/verifyOtp",
            Role::Owner => "/auth/verifyMess",
        }
    }

    pub(crate) fn login_path(self) -> &'static str {
        match self {
            Role::Member => "/auth/login",
            Role::Owner => "/auth/login_messOwner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Member => f.write_str("user"),
            Role::Owner => f.write_str("owner"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "member" => Ok(Role::Member),
            "owner" | "mess" => Ok(Role::Owner),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Email and password credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
