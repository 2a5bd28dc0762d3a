//! Authentication for members and mess owners
//!
//! Members and owners sign in with a one-time code sent to their email. The
//! backend also accepts email/password logins, which validate credentials
//! but issue no token.

mod session;
mod store;
mod types;

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;

use crate::error::Error;
use crate::fetch::{ApiResponse, RetryPolicy, Transport};

pub use session::*;
pub use store::*;
pub use types::*;

/// Client for sign-in and session handling
pub struct Auth {
    transport: Transport,
    store: Arc<dyn SessionStore>,
}

impl Auth {
    pub(crate) fn new(transport: Transport, store: Arc<dyn SessionStore>) -> Self {
        Self { transport, store }
    }

    /// Ask the backend to email a one-time code to `contact`
    pub async fn send_otp(&self, role: Role, contact: &str) -> Result<String, Error> {
        if contact.trim().is_empty() {
            return Err(Error::validation("contact is required"));
        }

        self.transport
            .post(role.send_otp_path())
            .query("contact", contact)
            .retry(RetryPolicy::none())
            .execute_text()
            .await
    }

    /// Exchange a one-time code for a session
    pub async fn verify_otp(&self, role: Role, contact: &str, otp: &str) -> Result<Session, Error> {
        let reply = self
            .transport
            .post(role.verify_otp_path())
            .query("contact", contact)
            .query("otp", otp)
            .retry(RetryPolicy::none())
            .execute_text()
            .await
            .map_err(unauthorized_as_auth)?;

        let token = extract_token(&reply)
            .ok_or_else(|| Error::auth("Invalid response from server"))?;
        let session = Session::new(token.to_string(), role, contact);

        self.set_session(session.clone()).await?;
        info!("signed in as {} ({})", contact, role);
        Ok(session)
    }

    /// Check email/password credentials
    pub async fn login(&self, role: Role, email: &str, password: &str) -> Result<Session, Error> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .transport
            .post(role.login_path())
            .json(&credentials)?
            .retry(RetryPolicy::none())
            .execute::<ApiResponse<Value>>()
            .await
            .map_err(unauthorized_as_auth)?;

        if !response.success {
            return Err(Error::auth(
                response
                    .message
                    .unwrap_or_else(|| "Invalid Email or Password".into()),
            ));
        }

        let session = Session::without_token(role, email);
        self.set_session(session.clone()).await?;
        Ok(session)
    }

    /// Sign out the current user
    pub async fn sign_out(&self) -> Result<(), Error> {
        if let Ok(mut current) = self.transport.session().write() {
            *current = None;
        }
        self.store.clear().await
    }

    /// Load a persisted session into the client, dropping it if expired
    pub async fn restore(&self) -> Result<Option<Session>, Error> {
        let Some(session) = self.store.load().await? else {
            debug!("no stored session");
            return Ok(None);
        };

        if session.is_expired() {
            warn!("stored session for {} has expired", session.email);
            self.store.clear().await?;
            return Ok(None);
        }

        if let Ok(mut current) = self.transport.session().write() {
            *current = Some(session.clone());
        }
        Ok(Some(session))
    }

    /// Get the current session
    pub fn get_session(&self) -> Option<Session> {
        self.transport
            .session()
            .read()
            .ok()
            .and_then(|current| current.clone())
    }

    /// Require a signed-in session
    pub fn require_session(&self) -> Result<Session, Error> {
        self.get_session().ok_or_else(|| Error::auth("Not logged in"))
    }

    /// Set and persist the session
    pub async fn set_session(&self, session: Session) -> Result<(), Error> {
        self.store.save(&session).await?;
        let mut current = self
            .transport
            .session()
            .write()
            .map_err(|_| Error::session("session lock poisoned"))?;
        *current = Some(session);
        Ok(())
    }
}

fn unauthorized_as_auth(err: Error) -> Error {
    match err {
        Error::Status { status: 401, body } => {
            let message = serde_json::from_str::<ApiResponse<Value>>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or(body);
            Error::Auth(message)
        }
        other => other,
    }
}
