use creatorhub_core::{AccountSnapshot, MetricsSnapshot, NormalizedPost, Platform};
use uuid::Uuid;

/// Everything fetched from a platform in one sync, already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformBatch {
    pub account: AccountSnapshot,
    pub posts: Vec<NormalizedPost>,
}

/// Inputs for one sync run.
#[derive(Clone)]
pub struct SyncRequest {
    pub platform: Platform,
    pub user_id: Uuid,
    pub access_token: String,
}

impl std::fmt::Debug for SyncRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncRequest")
            .field("platform", &self.platform)
            .field("user_id", &self.user_id)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

/// Result of a successful sync run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    pub platform: Platform,
    pub items_processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// `false` when the user has no profile row to summarize into.
    pub profile_updated: bool,
    pub metrics: MetricsSnapshot,
}
