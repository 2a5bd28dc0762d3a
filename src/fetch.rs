//! HTTP transport shared by every resource client
//!
//! All requests go through [`FetchBuilder`], which applies the same timeout,
//! retry and error mapping policy everywhere. The bearer token of the current
//! session, when there is one, is attached to every request.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::auth::Session;
use crate::config::ClientOptions;
use crate::error::Error;

pub(crate) type SharedSession = Arc<RwLock<Option<Session>>>;

/// Envelope the backend wraps around attendance, login and registration replies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the backend considers the call successful
    pub success: bool,

    /// Human readable message
    #[serde(default)]
    pub message: Option<String>,

    /// Response data, absent for plain acknowledgements
    pub payload: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Take the payload, failing when the backend sent none
    pub fn into_payload(self) -> Result<T, Error> {
        self.payload
            .ok_or_else(|| Error::api(self.message.unwrap_or_else(|| "empty payload".into())))
    }
}

/// One page of a paged listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageableResponse<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub last_page: bool,
}

/// Paging and sorting parameters for listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub sort_by: String,
    pub descending: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: 5,
            sort_by: "name".to_string(),
            descending: false,
        }
    }
}

impl PageRequest {
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
            ..Default::default()
        }
    }

    /// Sort by a field, ascending unless `descending`
    pub fn sorted_by(mut self, field: &str, descending: bool) -> Self {
        self.sort_by = field.to_string();
        self.descending = descending;
        self
    }
}

/// Exponential backoff applied to failed requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay to wait after the given zero-based failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl From<&ClientOptions> for RetryPolicy {
    fn from(options: &ClientOptions) -> Self {
        Self {
            max_retries: options.max_retries,
            base_delay: options.retry_base_delay,
        }
    }
}

/// Percent-encode a value used as a single path segment
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Connection details shared by the resource clients
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
    session: SharedSession,
}

impl Transport {
    pub(crate) fn new(options: &ClientOptions, session: SharedSession) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::from(options),
            session,
        })
    }

    /// The backend base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn session(&self) -> &SharedSession {
        &self.session
    }

    fn token(&self) -> Option<String> {
        let guard = self.session.read().ok()?;
        guard.as_ref().and_then(|s| s.token.clone())
    }

    fn request(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        let builder = FetchBuilder::new(&self.client, &self.url(path), method).retry(self.retry);
        match self.token() {
            Some(token) => builder.bearer_auth(&token),
            None => builder,
        }
    }

    /// Create a GET request
    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::GET, path)
    }

    /// Create a POST request
    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::POST, path)
    }

    /// Create a PUT request
    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::PUT, path)
    }

    /// Create a DELETE request
    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::DELETE, path)
    }
}

#[derive(Debug, Clone)]
enum Body {
    Json(Vec<u8>),
    /// Multipart form with one part per file, all under the same field
    Files {
        field: String,
        files: Vec<(String, Vec<u8>)>,
    },
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Body>,
    retry: RetryPolicy,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        Self {
            client,
            url: url.to_string(),
            method,
            headers: HeaderMap::new(),
            query_params: Vec::new(),
            body: None,
            retry: RetryPolicy::none(),
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    /// Append a single query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Append paging parameters
    pub fn page(self, page: &PageRequest) -> Self {
        self.query("pageNumber", page.page_number)
            .query("pageSize", page.page_size)
            .query("sortBy", &page.sort_by)
            .query("sortDir", if page.descending { "desc" } else { "asc" })
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        self.body = Some(Body::Json(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Send a single file as a multipart form field
    pub fn file(self, field: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        self.files(field, vec![(file_name.to_string(), bytes)])
    }

    /// Send several files as repeated parts of one multipart field
    pub fn files(mut self, field: &str, files: Vec<(String, Vec<u8>)>) -> Self {
        self.body = Some(Body::Files {
            field: field.to_string(),
            files,
        });
        self
    }

    /// Override the retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Build the request
    fn build(&self) -> Result<RequestBuilder, Error> {
        let mut url = Url::parse(&self.url)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self
            .client
            .request(self.method.clone(), url.as_str())
            .headers(self.headers.clone());

        match &self.body {
            Some(Body::Json(bytes)) => {
                req = req
                    .header(CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }
            Some(Body::Files { field, files }) => {
                let form = files.iter().fold(Form::new(), |form, (file_name, bytes)| {
                    form.part(field.clone(), Part::bytes(bytes.clone()).file_name(file_name.clone()))
                });
                req = req.multipart(form);
            }
            None => {}
        }

        Ok(req)
    }

    async fn attempt(&self) -> Result<Response, Error> {
        let response = self.build()?.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Send the request, retrying transient failures, and require a 2xx status
    pub async fn send(&self) -> Result<Response, Error> {
        let mut attempt = 0;
        loop {
            debug!(
                "{} {} (attempt {}/{})",
                self.method,
                self.url,
                attempt + 1,
                self.retry.max_retries + 1
            );
            match self.attempt().await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    warn!("{} {} failed: {}; retrying in {:?}", self.method, self.url, err, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let response = self.send().await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute the request and unwrap the `ApiResponse` envelope
    pub async fn execute_envelope<T: DeserializeOwned>(&self) -> Result<ApiResponse<T>, Error> {
        let envelope = self.execute::<ApiResponse<T>>().await?;
        if !envelope.success {
            return Err(Error::api(
                envelope.message.unwrap_or_else(|| "request was not successful".into()),
            ));
        }
        Ok(envelope)
    }

    /// Execute the request and return the body as text
    pub async fn execute_text(&self) -> Result<String, Error> {
        let response = self.send().await?;
        Ok(response.text().await?)
    }

    /// Execute the request, discarding the body
    pub async fn execute_empty(&self) -> Result<(), Error> {
        self.send().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
    }

    #[derive(Debug, Deserialize)]
    struct Marked {
        count: u32,
    }

    #[test]
    fn envelope_without_payload_needs_no_default() {
        let envelope: ApiResponse<Marked> =
            serde_json::from_str(r#"{"success": true, "message": "Attendance marked"}"#).unwrap();
        assert!(envelope.payload.is_none());

        let envelope: ApiResponse<Marked> =
            serde_json::from_str(r#"{"success": true, "payload": {"count": 3}}"#).unwrap();
        assert_eq!(envelope.into_payload().unwrap().count, 3);
    }

    #[test]
    fn email_segments_are_encoded() {
        assert_eq!(segment("a+b@mess.in"), "a%2Bb%40mess.in");
    }

    #[test]
    fn empty_envelope_payload_is_an_api_error() {
        let envelope: ApiResponse<Vec<String>> = ApiResponse {
            success: true,
            message: Some("nothing here".into()),
            payload: None,
        };
        match envelope.into_payload() {
            Err(Error::Api(msg)) => assert_eq!(msg, "nothing here"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
