//! Owner API client for Hermes tokens.
//!
//! Two tokens are needed to open a session: a user-level token for the
//! socket upgrade and a vehicle-level token for command envelopes. Both are
//! minted by the owner API from an owner bearer token.
//!
//! # Example
//!
//! ```no_run
//! use hermes_connector::{OwnerApi, Vin};
//!
//! # async fn example(owner_token: &str) -> hermes_connector::Result<()> {
//! let api = OwnerApi::new()?;
//! let vin = Vin::new("5YJ3E1EA7KF000000");
//!
//! let user_token = api.fetch_user_token(owner_token).await?;
//! let vehicle_token = api.fetch_vehicle_token(owner_token, &vin).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::identifiers::Vin;

// ============================================================================
// Constants
// ============================================================================

/// Production owner API base URL.
pub const DEFAULT_OWNER_API_URL: &str = "https://owner-api.teslamotors.com/api/1/";

/// User agent sent with token requests.
const USER_AGENT: &str = concat!("hermes-connector/", env!("CARGO_PKG_VERSION"));

/// Path minting the user-level token.
const USER_TOKEN_PATH: &str = "users/jwt/hermes";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct TokenRequest {
    uuid: Uuid,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: String,
}

// ============================================================================
// OwnerApi
// ============================================================================

/// Client for the owner API token endpoints.
#[derive(Debug, Clone)]
pub struct OwnerApi {
    client: Client,
    base_url: Url,
}

impl OwnerApi {
    /// Creates a client for the production owner API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_OWNER_API_URL)
    }

    /// Creates a client against another base URL.
    ///
    /// A trailing slash is added if missing so relative paths join below it.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `base_url` is not a valid URL
    /// - [`Error::Http`] if the HTTP client cannot be built
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| Error::config(format!("invalid owner API URL {normalized}: {e}")))?;

        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL requests are resolved against.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches the user-level token used on the socket upgrade.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] if the request cannot be sent
    /// - [`Error::Token`] on a non-success status or an empty token
    /// - [`Error::Json`] if the body is not a token object
    pub async fn fetch_user_token(&self, owner_token: &str) -> Result<String> {
        self.fetch(USER_TOKEN_PATH, owner_token).await
    }

    /// Fetches the vehicle-level token attached to command envelopes.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_user_token`](Self::fetch_user_token).
    pub async fn fetch_vehicle_token(&self, owner_token: &str, vin: &Vin) -> Result<String> {
        self.fetch(&format!("vehicles/{vin}/jwt/hermes"), owner_token)
            .await
    }

    async fn fetch(&self, path: &str, owner_token: &str) -> Result<String> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| Error::config(format!("invalid token path {path}: {e}")))?;

        let response = self
            .client
            .post(url)
            .bearer_auth(owner_token.trim())
            .json(&TokenRequest {
                uuid: Uuid::new_v4(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::token(format!("{path} returned {status}: {body}")));
        }

        let body = response.bytes().await?;
        let TokenResponse { token } = serde_json::from_slice(&body)?;
        if token.is_empty() {
            return Err(Error::token(format!("{path} returned an empty token")));
        }

        debug!(path, "Fetched Hermes token");
        Ok(token)
    }
}

// ============================================================================
// Tests
// ============================================================================
