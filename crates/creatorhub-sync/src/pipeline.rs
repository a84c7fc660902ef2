//! One sync run: fetch from the platform, then reconcile into the store.

use chrono::{DateTime, Utc};
use creatorhub_core::MetricsSnapshot;
use creatorhub_db::UpsertOutcome;

use crate::client::PlatformClient;
use crate::error::{StoreError, SyncError};
use crate::store::SyncStore;
use crate::types::{PlatformBatch, SyncOutcome, SyncRequest};

/// Runs a full sync for `request.platform`.
///
/// Every upstream call completes before the first write, so an upstream
/// failure leaves the store untouched. Writes then happen in order:
/// profile summary, credentials, each post, daily metrics snapshot. A store
/// failure part-way through is returned as-is; earlier writes are kept and
/// a retry converges because every write is an upsert.
///
/// `now` stamps `last_synced_at` and picks the metrics date.
///
/// # Errors
///
/// Any [`SyncError`] from the platform fetch, or [`SyncError::Store`] from a
/// write.
pub async fn sync_platform(
    client: &PlatformClient,
    store: &dyn SyncStore,
    request: &SyncRequest,
    now: DateTime<Utc>,
) -> Result<SyncOutcome, SyncError> {
    let platform = request.platform;
    let user_id = request.user_id;
    tracing::info!(platform = %platform, user_id = %user_id, "sync started");

    let batch = client
        .fetch_batch(platform, &request.access_token)
        .await
        .inspect_err(|e| {
            tracing::warn!(
                platform = %platform,
                user_id = %user_id,
                error = %e,
                "platform fetch failed"
            );
        })?;
    tracing::debug!(
        platform = %platform,
        user_id = %user_id,
        posts = batch.posts.len(),
        followers = batch.account.followers,
        "platform batch fetched"
    );

    let outcome = reconcile(store, request, &batch, now)
        .await
        .inspect_err(|e| {
            tracing::error!(
                platform = %platform,
                user_id = %user_id,
                error = %e,
                "store write failed"
            );
        })?;

    tracing::info!(
        platform = %platform,
        user_id = %user_id,
        items = outcome.items_processed,
        inserted = outcome.inserted,
        updated = outcome.updated,
        unchanged = outcome.unchanged,
        "sync complete"
    );
    Ok(outcome)
}

async fn reconcile(
    store: &dyn SyncStore,
    request: &SyncRequest,
    batch: &PlatformBatch,
    now: DateTime<Utc>,
) -> Result<SyncOutcome, StoreError> {
    let platform = request.platform;
    let user_id = request.user_id;

    let profile_updated = store
        .update_profile_summary(user_id, platform, &batch.account, now)
        .await?;
    if !profile_updated {
        tracing::warn!(
            platform = %platform,
            user_id = %user_id,
            "no profile row for user; summary not updated"
        );
    }

    store
        .upsert_credentials(user_id, platform, &request.access_token, &batch.account, now)
        .await?;

    let policy = platform.existing_post_policy();
    let (mut inserted, mut updated, mut unchanged) = (0, 0, 0);
    for post in &batch.posts {
        match store
            .upsert_content_post(user_id, platform, post, policy)
            .await?
        {
            UpsertOutcome::Inserted => inserted += 1,
            UpsertOutcome::Updated => updated += 1,
            UpsertOutcome::Unchanged => unchanged += 1,
        }
    }

    let metrics = MetricsSnapshot::from_batch(now.date_naive(), &batch.account, &batch.posts);
    store
        .upsert_platform_metrics(user_id, platform, &metrics)
        .await?;

    Ok(SyncOutcome {
        platform,
        items_processed: batch.posts.len(),
        inserted,
        updated,
        unchanged,
        profile_updated,
        metrics,
    })
}
