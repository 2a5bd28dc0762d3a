//! Session management for authentication

use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use log::warn;
use serde::{Deserialize, Serialize};

use super::types::Role;

/// Session data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token issued by the OTP flow; password logins carry none
    pub token: Option<String>,

    /// Account side
    pub role: Role,

    /// Email the account signed in with
    pub email: String,

    /// Expiry as a unix timestamp, read from the token
    pub expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

impl Session {
    /// Create a session from a freshly issued token
    pub fn new(token: String, role: Role, email: &str) -> Self {
        let expires_at = token_expiry(&token);
        Self {
            token: Some(token),
            role,
            email: email.to_string(),
            expires_at,
        }
    }

    /// Create a session for a password login, which issues no token
    pub fn without_token(role: Role, email: &str) -> Self {
        Self {
            token: None,
            role,
            email: email.to_string(),
            expires_at: None,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }
}

/// Read the `exp` claim without verifying the signature; the key lives on the server.
fn token_expiry(token: &str) -> Option<i64> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    match decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => data.claims.exp,
        Err(e) => {
            warn!("could not read token expiry: {}", e);
            None
        }
    }
}

/// Pull the token out of the OTP verification reply ("... Token: <jwt>")
pub(crate) fn extract_token(reply: &str) -> Option<&str> {
    reply
        .split("Token: ")
        .nth(1)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
