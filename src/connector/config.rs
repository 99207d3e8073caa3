//! Connector configuration.
//!
//! Replaces the process-wide server URL with an explicit value supplied at
//! construction.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use hermes_connector::ConnectorConfig;
//!
//! # fn example() -> hermes_connector::Result<()> {
//! let config = ConnectorConfig::builder()
//!     .server_url("wss://signaling.example.com/v1/mobile")
//!     .retry_interval(Duration::from_millis(500))
//!     .build()?;
//!
//! assert_eq!(config.inbox_capacity(), 5);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::contract::AuthMethod;
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Production signaling endpoint.
pub const DEFAULT_SERVER_URL: &str = "wss://signaling.vn.teslamotors.com:443/v1/mobile";

/// Header carrying the user-level token on the upgrade request.
pub const DEFAULT_AUTH_HEADER: &str = "X-Jwt";

/// Capacity of the delivery queue.
pub const DEFAULT_INBOX_CAPACITY: usize = 5;

/// Expiry written into outbound command envelopes.
pub const DEFAULT_COMMAND_EXPIRY: Duration = Duration::from_secs(10);

/// Retry interval reported to callers.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// ConnectorConfig
// ============================================================================

/// Validated connector configuration.
///
/// Use [`ConnectorConfig::builder()`] to override defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    server_url: String,
    auth_header: String,
    inbox_capacity: usize,
    command_expiry: Duration,
    retry_interval: Duration,
    auth_method: AuthMethod,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            command_expiry: DEFAULT_COMMAND_EXPIRY,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            auth_method: AuthMethod::default(),
        }
    }
}

impl ConnectorConfig {
    /// Creates a new configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ConnectorConfigBuilder {
        ConnectorConfigBuilder::new()
    }

    /// Signaling endpoint URL.
    #[inline]
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Upgrade header carrying the user token.
    #[inline]
    #[must_use]
    pub fn auth_header(&self) -> &str {
        &self.auth_header
    }

    /// Delivery queue capacity.
    #[inline]
    #[must_use]
    pub const fn inbox_capacity(&self) -> usize {
        self.inbox_capacity
    }

    /// Expiry stamped on outbound commands.
    #[inline]
    #[must_use]
    pub const fn command_expiry(&self) -> Duration {
        self.command_expiry
    }

    /// Retry interval hint.
    #[inline]
    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Authentication method hint.
    #[inline]
    #[must_use]
    pub const fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }
}

// ============================================================================
// ConnectorConfigBuilder
// ============================================================================

/// Fluent builder for [`ConnectorConfig`].
#[derive(Debug, Default, Clone)]
pub struct ConnectorConfigBuilder {
    server_url: Option<String>,
    auth_header: Option<String>,
    inbox_capacity: Option<usize>,
    command_expiry: Option<Duration>,
    retry_interval: Option<Duration>,
    auth_method: Option<AuthMethod>,
}

impl ConnectorConfigBuilder {
    /// Creates a builder with every field at its default.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signaling endpoint (`ws://` or `wss://`).
    #[inline]
    #[must_use]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Sets the upgrade header carrying the user token.
    #[inline]
    #[must_use]
    pub fn auth_header(mut self, name: impl Into<String>) -> Self {
        self.auth_header = Some(name.into());
        self
    }

    /// Sets the delivery queue capacity.
    #[inline]
    #[must_use]
    pub fn inbox_capacity(mut self, capacity: usize) -> Self {
        self.inbox_capacity = Some(capacity);
        self
    }

    /// Sets the expiry stamped on outbound commands.
    #[inline]
    #[must_use]
    pub fn command_expiry(mut self, expiry: Duration) -> Self {
        self.command_expiry = Some(expiry);
        self
    }

    /// Sets the retry interval hint.
    #[inline]
    #[must_use]
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = Some(interval);
        self
    }

    /// Sets the authentication method hint.
    #[inline]
    #[must_use]
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the URL is not a `ws`/`wss` URL
    /// - [`Error::Config`] if the auth header is empty
    /// - [`Error::Config`] if the inbox capacity is zero
    pub fn build(self) -> Result<ConnectorConfig> {
        let defaults = ConnectorConfig::default();

        let server_url = self.server_url.unwrap_or(defaults.server_url);
        Self::validate_url(&server_url)?;

        let auth_header = self.auth_header.unwrap_or(defaults.auth_header);
        if auth_header.trim().is_empty() {
            return Err(Error::config("auth header name must not be empty"));
        }

        let inbox_capacity = self.inbox_capacity.unwrap_or(defaults.inbox_capacity);
        if inbox_capacity == 0 {
            return Err(Error::config("inbox capacity must be greater than zero"));
        }

        Ok(ConnectorConfig {
            server_url,
            auth_header,
            inbox_capacity,
            command_expiry: self.command_expiry.unwrap_or(defaults.command_expiry),
            retry_interval: self.retry_interval.unwrap_or(defaults.retry_interval),
            auth_method: self.auth_method.unwrap_or(defaults.auth_method),
        })
    }

    fn validate_url(raw: &str) -> Result<()> {
        let url = Url::parse(raw)
            .map_err(|e| Error::config(format!("invalid server URL {raw}: {e}")))?;

        match url.scheme() {
            "ws" | "wss" => Ok(()),
            other => Err(Error::config(format!(
                "server URL must use ws or wss, got {other}: {raw}"
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
