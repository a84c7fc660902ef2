use creatorhub_core::Platform;
use thiserror::Error;

/// Errors returned by a platform sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform API answered with a non-success HTTP status.
    #[error("{} API error: {}", .platform.display_name(), .status_text)]
    UpstreamApi {
        platform: Platform,
        status: u16,
        status_text: String,
    },

    /// The platform answered 200 but flagged the request as failed in its
    /// JSON envelope.
    #[error("{} API rejected the request ({}): {}", .platform.display_name(), .code, .message)]
    PlatformRejected {
        platform: Platform,
        code: String,
        message: String,
    },

    /// A resource the sync depends on does not exist upstream.
    #[error("{0}")]
    MissingResource(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors surfaced by a [`crate::SyncStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] creatorhub_db::DbError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
