//! Data-access seam between the sync pipeline and persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use creatorhub_core::{
    AccountSnapshot, ExistingPostPolicy, MetricsSnapshot, NormalizedPost, Platform,
};
use creatorhub_db::UpsertOutcome;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

/// Write operations a sync run issues, one method per table it touches.
///
/// Each call is independent; implementations are not expected to wrap a run
/// in a transaction.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Overwrite the syncing platform's handle and follower count on the
    /// user's profile. Returns `false` if the user has no profile.
    async fn update_profile_summary(
        &self,
        user_id: Uuid,
        platform: Platform,
        account: &AccountSnapshot,
        synced_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Upsert the latest token and account identity for (user, platform).
    async fn upsert_credentials(
        &self,
        user_id: Uuid,
        platform: Platform,
        access_token: &str,
        account: &AccountSnapshot,
        synced_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Insert or reconcile one post keyed by (user, platform, external id).
    async fn upsert_content_post(
        &self,
        user_id: Uuid,
        platform: Platform,
        post: &NormalizedPost,
        policy: ExistingPostPolicy,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Upsert the daily snapshot keyed by (user, platform, date).
    async fn upsert_platform_metrics(
        &self,
        user_id: Uuid,
        platform: Platform,
        snapshot: &MetricsSnapshot,
    ) -> Result<(), StoreError>;
}

/// [`SyncStore`] backed by the Postgres tables in `creatorhub-db`.
#[derive(Debug, Clone)]
pub struct PgSyncStore {
    pool: PgPool,
}

impl PgSyncStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncStore for PgSyncStore {
    async fn update_profile_summary(
        &self,
        user_id: Uuid,
        platform: Platform,
        account: &AccountSnapshot,
        synced_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        Ok(creatorhub_db::update_profile_summary(
            &self.pool,
            user_id,
            platform,
            account.username.as_deref(),
            account.followers,
            synced_at,
        )
        .await?)
    }

    async fn upsert_credentials(
        &self,
        user_id: Uuid,
        platform: Platform,
        access_token: &str,
        account: &AccountSnapshot,
        synced_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        creatorhub_db::upsert_platform_credentials(
            &self.pool,
            user_id,
            platform,
            access_token,
            account,
            synced_at,
        )
        .await?;
        Ok(())
    }

    async fn upsert_content_post(
        &self,
        user_id: Uuid,
        platform: Platform,
        post: &NormalizedPost,
        policy: ExistingPostPolicy,
    ) -> Result<UpsertOutcome, StoreError> {
        Ok(creatorhub_db::upsert_content_post(&self.pool, user_id, platform, post, policy).await?)
    }

    async fn upsert_platform_metrics(
        &self,
        user_id: Uuid,
        platform: Platform,
        snapshot: &MetricsSnapshot,
    ) -> Result<(), StoreError> {
        creatorhub_db::upsert_platform_metrics(&self.pool, user_id, platform, snapshot).await?;
        Ok(())
    }
}
