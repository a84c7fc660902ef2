//! HTTP client shared by the Instagram, TikTok, and `YouTube` adapters.
//!
//! Wraps `reqwest` with per-platform base URLs, status checking, and typed
//! response deserialization. Any non-2xx response becomes
//! [`SyncError::UpstreamApi`] carrying the HTTP reason phrase.

use std::time::Duration;

use creatorhub_core::config::{
    DEFAULT_INSTAGRAM_API_BASE_URL, DEFAULT_TIKTOK_API_BASE_URL, DEFAULT_YOUTUBE_API_BASE_URL,
};
use creatorhub_core::{AppConfig, Platform};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::SyncError;
use crate::types::PlatformBatch;
use crate::{instagram, tiktok, youtube};

/// Base URLs for each platform API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEndpoints {
    pub instagram: String,
    pub tiktok: String,
    pub youtube: String,
}

impl Default for PlatformEndpoints {
    fn default() -> Self {
        Self {
            instagram: DEFAULT_INSTAGRAM_API_BASE_URL.to_string(),
            tiktok: DEFAULT_TIKTOK_API_BASE_URL.to_string(),
            youtube: DEFAULT_YOUTUBE_API_BASE_URL.to_string(),
        }
    }
}

impl PlatformEndpoints {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            instagram: config.instagram_api_base_url.clone(),
            tiktok: config.tiktok_api_base_url.clone(),
            youtube: config.youtube_api_base_url.clone(),
        }
    }

    /// Points every platform at the same base URL (for testing with wiremock).
    #[must_use]
    pub fn all(base_url: &str) -> Self {
        Self {
            instagram: base_url.to_string(),
            tiktok: base_url.to_string(),
            youtube: base_url.to_string(),
        }
    }
}

/// Client for the three platform APIs.
///
/// Holds one connection pool and the parsed base URL of each platform. Use
/// [`PlatformClient::new`] with [`PlatformEndpoints::default`] for production
/// or point the endpoints at a mock server in tests.
pub struct PlatformClient {
    client: Client,
    instagram_base: Url,
    tiktok_base: Url,
    youtube_base: Url,
}

impl PlatformClient {
    /// Creates a client with the given timeout, `User-Agent`, and endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`SyncError::InvalidUrl`] if an endpoint is not a
    /// valid URL.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        endpoints: &PlatformEndpoints,
    ) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            instagram_base: parse_base_url(&endpoints.instagram)?,
            tiktok_base: parse_base_url(&endpoints.tiktok)?,
            youtube_base: parse_base_url(&endpoints.youtube)?,
        })
    }

    /// Builds a client from the timeout, user agent, and base URLs in `config`.
    ///
    /// # Errors
    ///
    /// See [`PlatformClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SyncError> {
        Self::new(
            config.http_timeout_secs,
            &config.user_agent,
            &PlatformEndpoints::from_app_config(config),
        )
    }

    /// Fetches account statistics and recent content for `platform`.
    ///
    /// Dispatches to the platform's adapter; every upstream call happens here,
    /// before anything is written to a store.
    ///
    /// # Errors
    ///
    /// - [`SyncError::UpstreamApi`] on any non-2xx platform response.
    /// - [`SyncError::MissingResource`] if the account has no channel/user.
    /// - [`SyncError::Http`] / [`SyncError::Deserialize`] on transport or
    ///   payload failures.
    pub async fn fetch_batch(
        &self,
        platform: Platform,
        access_token: &str,
    ) -> Result<PlatformBatch, SyncError> {
        match platform {
            Platform::Instagram => instagram::fetch_batch(self, access_token).await,
            Platform::TikTok => tiktok::fetch_batch(self, access_token).await,
            Platform::YouTube => youtube::fetch_batch(self, access_token).await,
        }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Resolves `path` against the platform's base URL.
    pub(crate) fn endpoint(&self, platform: Platform, path: &str) -> Result<Url, SyncError> {
        let base = match platform {
            Platform::Instagram => &self.instagram_base,
            Platform::TikTok => &self.tiktok_base,
            Platform::YouTube => &self.youtube_base,
        };
        base.join(path).map_err(|e| SyncError::InvalidUrl {
            url: format!("{base}{path}"),
            reason: e.to_string(),
        })
    }

    /// Sends a request, asserts a 2xx status, and parses the body as `T`.
    ///
    /// `context` names the call in errors and logs; it must not contain the
    /// access token.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        platform: Platform,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, SyncError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .map_or_else(|| status.as_u16().to_string(), str::to_string);
            tracing::warn!(
                platform = %platform,
                status = status.as_u16(),
                context,
                "platform API returned non-success status"
            );
            return Err(SyncError::UpstreamApi {
                platform,
                status: status.as_u16(),
                status_text,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SyncError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

/// Parses a base URL, ensuring it ends with exactly one slash so that
/// [`Url::join`] appends to the path instead of replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, SyncError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| SyncError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
