//! MyMess Rust Client Library
//!
//! A Rust client for the MyMess mess management backend, covering member and
//! owner sign-in, profiles, attendance, leave requests and payments. The
//! [`reconcile`] module turns the raw records into the attendance, leave and
//! dues figures the app shows.

pub mod attendance;
pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod leave;
pub mod mess;
pub mod overview;
pub mod payment;
pub mod reconcile;
pub mod user;

use std::sync::{Arc, RwLock};

use crate::attendance::AttendanceClient;
use crate::auth::{Auth, FileSessionStore, MemorySessionStore, SessionStore};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Transport;
use crate::leave::LeaveClient;
use crate::mess::MessClient;
use crate::overview::OverviewClient;
use crate::payment::PaymentClient;
use crate::user::UserClient;

/// The main entry point for the MyMess client
pub struct MyMess {
    /// Transport shared by every resource client
    transport: Transport,
    /// Auth client for sign-in and session handling
    auth: Auth,
    /// Client options
    options: ClientOptions,
}

impl MyMess {
    /// Create a new client for the backend at `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use mymess_client::MyMess;
    ///
    /// let mymess = MyMess::new("http://localhost:8080").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::new_with_options(ClientOptions::default().with_base_url(base_url))
    }

    /// Create a new client with custom options
    ///
    /// The session is kept in memory unless `options.session_path` is set,
    /// in which case it is persisted to that file.
    ///
    /// # Example
    ///
    /// ```
    /// use mymess_client::{MyMess, config::ClientOptions};
    ///
    /// let options = ClientOptions::default()
    ///     .with_base_url("http://localhost:8080")
    ///     .with_max_retries(0);
    /// let mymess = MyMess::new_with_options(options).unwrap();
    /// ```
    pub fn new_with_options(options: ClientOptions) -> Result<Self, Error> {
        let store: Arc<dyn SessionStore> = match &options.session_path {
            Some(path) => Arc::new(FileSessionStore::new(path.clone())),
            None => Arc::new(MemorySessionStore::default()),
        };
        Self::with_store(options, store)
    }

    /// Create a new client persisting sessions through `store`
    pub fn with_store(options: ClientOptions, store: Arc<dyn SessionStore>) -> Result<Self, Error> {
        let transport = Transport::new(&options, Arc::new(RwLock::new(None)))?;
        let auth = Auth::new(transport.clone(), store);

        Ok(Self {
            transport,
            auth,
            options,
        })
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Get the client options
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Member profiles
    pub fn users(&self) -> UserClient<'_> {
        UserClient::new(&self.transport)
    }

    /// Messes and their owners
    pub fn messes(&self) -> MessClient<'_> {
        MessClient::new(&self.transport)
    }

    pub fn attendance(&self) -> AttendanceClient<'_> {
        AttendanceClient::new(&self.transport)
    }

    pub fn leaves(&self) -> LeaveClient<'_> {
        LeaveClient::new(&self.transport)
    }

    pub fn payments(&self) -> PaymentClient<'_> {
        PaymentClient::new(&self.transport)
    }

    /// Composite member and owner views
    ///
    /// # Example
    ///
    /// ```no_run
    /// use chrono::Local;
    /// use mymess_client::{MyMess, reconcile::Month};
    ///
    /// # async fn run() -> Result<(), mymess_client::error::Error> {
    /// let mymess = MyMess::new("http://localhost:8080")?;
    /// let today = Local::now().date_naive();
    /// let overview = mymess
    ///     .overview()
    ///     .member("asha@example.com", Month::of(today), today)
    ///     .await?;
    /// println!("{} days present", overview.attendance.present);
    /// # Ok(())
    /// # }
    /// ```
    pub fn overview(&self) -> OverviewClient<'_> {
        OverviewClient::new(&self.transport, &self.options)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Role, Session};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::reconcile::{Month, UnmarkedDayPolicy};
    pub use crate::MyMess;
}
