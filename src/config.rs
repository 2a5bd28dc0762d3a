//! Configuration options for the MyMess client

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;
use crate::reconcile::UnmarkedDayPolicy;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Leave days a member may take per calendar month
pub const DEFAULT_MONTHLY_LEAVE_QUOTA: u32 = 6;

/// Configuration options for the MyMess client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Root URL of the backend, without a trailing slash
    pub base_url: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Additional attempts after the first failed one
    pub max_retries: u32,

    /// Delay before the first retry; doubled on every further attempt
    pub retry_base_delay: Duration,

    /// Monthly leave allowance used by the leave accountant
    pub monthly_leave_quota: u32,

    /// How days without an attendance record are counted
    pub unmarked_day_policy: UnmarkedDayPolicy,

    /// Where the session is persisted, if anywhere
    pub session_path: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Some(Duration::from_secs(10)),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(500),
            monthly_leave_quota: DEFAULT_MONTHLY_LEAVE_QUOTA,
            unmarked_day_policy: UnmarkedDayPolicy::Present,
            session_path: None,
        }
    }
}

impl ClientOptions {
    /// Build options from `MYMESS_*` environment variables, falling back to defaults
    ///
    /// Recognised variables: `MYMESS_API_URL`, `MYMESS_TIMEOUT_SECS`,
    /// `MYMESS_MAX_RETRIES`, `MYMESS_SESSION_FILE`, `MYMESS_LEAVE_QUOTA` and
    /// `MYMESS_UNMARKED_DAYS` (`present` or `unmarked`).
    pub fn from_env() -> Result<Self, Error> {
        let mut options = Self::default();

        if let Ok(url) = env::var("MYMESS_API_URL") {
            options = options.with_base_url(&url);
        }
        if let Some(secs) = parse_var::<u64>("MYMESS_TIMEOUT_SECS")? {
            let timeout = (secs > 0).then(|| Duration::from_secs(secs));
            options = options.with_request_timeout(timeout);
        }
        if let Some(retries) = parse_var::<u32>("MYMESS_MAX_RETRIES")? {
            options = options.with_max_retries(retries);
        }
        if let Some(quota) = parse_var::<u32>("MYMESS_LEAVE_QUOTA")? {
            options = options.with_monthly_leave_quota(quota);
        }
        if let Some(policy) = parse_var::<UnmarkedDayPolicy>("MYMESS_UNMARKED_DAYS")? {
            options = options.with_unmarked_day_policy(policy);
        }
        if let Ok(path) = env::var("MYMESS_SESSION_FILE") {
            options = options.with_session_path(Some(PathBuf::from(path)));
        }

        Ok(options)
    }

    /// Set the backend base URL
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set how many times a failed request is retried
    pub fn with_max_retries(mut self, value: u32) -> Self {
        self.max_retries = value;
        self
    }

    /// Set the delay before the first retry
    pub fn with_retry_base_delay(mut self, value: Duration) -> Self {
        self.retry_base_delay = value;
        self
    }

    /// Set the monthly leave quota
    pub fn with_monthly_leave_quota(mut self, value: u32) -> Self {
        self.monthly_leave_quota = value;
        self
    }

    /// Set how unmarked attendance days are counted
    pub fn with_unmarked_day_policy(mut self, value: UnmarkedDayPolicy) -> Self {
        self.unmarked_day_policy = value;
        self
    }

    /// Set the session file path
    pub fn with_session_path(mut self, value: Option<PathBuf>) -> Self {
        self.session_path = value;
        self
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::validation(format!("{name}={raw:?}: {e}"))),
        Err(_) => Ok(None),
    }
}
