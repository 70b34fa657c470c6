use crate::client::SynoError::*;
use crate::entities::{AuthData, Endpoint, SESSION, SynologyResponse};
use crate::utils::format_size;
use anyhow::{Context, Result};
use log::debug;
use reqwest::multipart::Part;
use reqwest::{Client, RequestBuilder, StatusCode, multipart};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::time::Duration;
use thiserror::Error;

/// Custom error types for the [`SynoDS`] client
#[derive(Error, Debug)]
pub enum SynoError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Synology API error: code={code}, message={message}")]
    Api { code: i32, message: String },

    #[error("Network request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input parameter: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Synology Download Station client
pub struct SynoDS {
    host: String,
    username: String,
    password: String,
    client: Client,
    sid: String,
}

impl SynoDS {
    /// Creates a new `SynoDS` client with the given host and credentials.
    ///
    /// Certificate verification is disabled, the devices usually serve a
    /// self-signed certificate. Requests never time out unless `timeout_ms`
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Username, password, or host URL is empty
    /// - Host URL doesn't start with "http://" or "https://"
    /// - The HTTP client cannot be constructed
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(
        host: String,
        username: String,
        password: String,
        timeout_ms: Option<u64>,
    ) -> Result<Self> {
        if username.is_empty() {
            return Err(Configuration("Username cannot be empty".into()).into());
        }

        if password.is_empty() {
            return Err(Configuration("Password cannot be empty".into()).into());
        }

        if host.is_empty() {
            return Err(Configuration("Host URL cannot be empty".into()).into());
        }

        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(Configuration(format!(
                "Host URL must start with http:// or https://, got: {host}"
            ))
            .into());
        }

        let host = host.trim_end_matches('/').to_string();

        let client = Self::create_client(timeout_ms)?;

        Ok(Self {
            host,
            username,
            password,
            client,
            sid: String::new(),
        })
    }

    fn create_client(timeout_ms: Option<u64>) -> Result<Client> {
        let mut builder = Client::builder().danger_accept_invalid_certs(true);
        if let Some(timeout) = timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout));
        }
        builder.build().context("Failed to build HTTP client")
    }

    /// Creates a new `SynoDS` client with a builder pattern
    #[must_use]
    pub fn builder() -> SynoDSBuilder {
        SynoDSBuilder::default()
    }

    /// Whether [`Self::login()`] succeeded and no logout happened since
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        !self.sid.is_empty()
    }

    /// Logs in and stores the session ID for the following calls
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails
    /// - The server does not answer with HTTP 200
    /// - Authentication fails or the response carries no session ID
    pub async fn login(&mut self) -> Result<()> {
        let params = [
            ("api", Endpoint::Auth.name()),
            ("version", "2"),
            ("method", "login"),
            ("account", self.username.as_str()),
            ("passwd", self.password.as_str()),
            ("session", SESSION),
            ("format", "sid"),
        ];

        let request = self.client.post(self.url(Endpoint::Auth)).form(&params);
        let response = self
            .send_request::<AuthData>(Endpoint::Auth, request)
            .await
            .context("Auth request failed")?;

        match response.data {
            Some(data) if !data.sid.is_empty() => {
                debug!("Logged in as {}", self.username);
                self.sid = data.sid;
                Ok(())
            }
            _ => Err(InvalidResponse("No session ID received".into()).into()),
        }
    }

    /// Creates a new download task from a URI (HTTP URL or magnet link)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - URI is empty
    /// - Session ID is not available (must call [`Self::login()`] first)
    /// - Network request fails
    /// - API returns an error response
    pub async fn create_task(&self, uri: &str) -> Result<()> {
        if uri.is_empty() {
            return Err(InvalidInput("URI cannot be empty".into()).into());
        }
        self.ensure_authorized()?;

        debug!("Creating download task. URI: {uri}");

        let params = [
            ("api", Endpoint::Task.name()),
            ("version", "1"),
            ("method", "create"),
            ("session", SESSION),
            ("_sid", self.sid.as_str()),
            ("uri", uri),
        ];

        let request = self.client.post(self.url(Endpoint::Task)).form(&params);
        self.send_request::<IgnoredAny>(Endpoint::Task, request)
            .await
            .context("Add uri request failed")?;

        debug!("Successfully created download task for URI: {uri}");
        Ok(())
    }

    /// Creates a new download task by uploading a local file
    /// (usually a torrent) as multipart/form-data
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File name is empty
    /// - Session ID is not available (must call [`Self::login()`] first)
    /// - Network request fails
    /// - API returns an error response
    pub async fn create_task_from_file(&self, file_data: &[u8], file_name: &str) -> Result<()> {
        if file_name.is_empty() {
            return Err(InvalidInput("File name cannot be empty".into()).into());
        }
        self.ensure_authorized()?;

        debug!(
            "Creating download task from file. Name: {}, Size: {}",
            file_name,
            format_size(file_data.len() as u64)
        );

        let mime = if file_name.ends_with(".torrent") {
            "application/x-bittorrent"
        } else {
            "application/octet-stream"
        };

        let file_part = Part::bytes(file_data.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime)
            .context("Failed to create file part")?;

        // The file part has to come after the other fields
        let form = multipart::Form::new()
            .text("api", Endpoint::Task.name())
            .text("version", "1")
            .text("method", "create")
            .text("session", SESSION)
            .text("_sid", self.sid.clone())
            .part("file", file_part);

        let request = self.client.post(self.url(Endpoint::Task)).multipart(form);
        self.send_request::<IgnoredAny>(Endpoint::Task, request)
            .await
            .context("Add file request failed")?;

        debug!("Successfully created download task for file: {file_name}");
        Ok(())
    }

    /// Ends the session started by [`Self::login()`]
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Session ID is not available
    /// - Network request fails
    /// - API returns an error response
    pub async fn logout(&mut self) -> Result<()> {
        self.ensure_authorized()?;

        let params = [
            ("api", Endpoint::Auth.name()),
            ("version", "1"),
            ("method", "logout"),
            ("session", SESSION),
            ("_sid", self.sid.as_str()),
        ];

        let request = self.client.post(self.url(Endpoint::Auth)).form(&params);
        self.send_request::<IgnoredAny>(Endpoint::Auth, request)
            .await
            .context("Logout request failed")?;

        debug!("Logged out");
        self.sid.clear();
        Ok(())
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.host, endpoint.path())
    }

    fn ensure_authorized(&self) -> Result<()> {
        if self.is_authorized() {
            Ok(())
        } else {
            Err(Auth("No session ID available. Make sure to call login() first".into()).into())
        }
    }

    /// Sends a prepared request and checks the HTTP status and the
    /// `success` flag of the response envelope
    async fn send_request<D>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<SynologyResponse<D>>
    where
        D: DeserializeOwned,
    {
        debug!("Making {} request", endpoint.name());

        let response = request.send().await.map_err(Network)?;

        let status = response.status();
        debug!("API request status: {status}");
        if status != StatusCode::OK {
            return Err(Api {
                code: i32::from(status.as_u16()),
                message: format!(
                    "HTTP request failed with status: {} ({})",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            }
            .into());
        }

        let body = response.text().await.map_err(Network)?;
        let parsed: SynologyResponse<D> = serde_json::from_str(&body)
            .map_err(|e| InvalidResponse(format!("{e}, response data: {body}")))?;

        if parsed.success {
            return Ok(parsed);
        }

        match &parsed.error {
            Some(error) => Err(Api {
                code: error.code,
                message: format!(
                    "{}, response data: {body}",
                    endpoint.describe_error(error.code)
                ),
            }
            .into()),
            None => Err(InvalidResponse(format!("Request failed, response data: {body}")).into()),
        }
    }
}

/// Builder for [`SynoDS`] client
#[derive(Default)]
pub struct SynoDSBuilder {
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<u64>,
}

impl SynoDSBuilder {
    /// Sets the host URL, e.g. `https://nas.local:5001`
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the username
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the request timeout in milliseconds
    #[must_use]
    pub fn timeout(mut self, timeout_millis: u64) -> Self {
        self.timeout = Some(timeout_millis);
        self
    }

    /// Builds the [`SynoDS`] client
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields (host, username, password) are not provided
    /// - Host URL doesn't start with "http://" or "https://"
    /// - Any field contains invalid data
    pub fn build(self) -> Result<SynoDS> {
        let host = self
            .host
            .ok_or_else(|| Configuration("Host URL is required".into()))?;
        let username = self
            .username
            .ok_or_else(|| Configuration("Username is required".into()))?;
        let password = self
            .password
            .ok_or_else(|| Configuration("Password is required".into()))?;

        SynoDS::new(host, username, password, self.timeout)
    }
}
