//! `sync` and `metrics` command handlers.

use chrono::Utc;
use creatorhub_core::{AppConfig, Platform};
use creatorhub_db::PlatformMetricsRow;
use creatorhub_sync::{
    sync_platform, MemoryStore, PgSyncStore, PlatformClient, SyncOutcome, SyncRequest, SyncStore,
};
use uuid::Uuid;

/// Runs one platform sync and prints a summary.
///
/// With no pool the run goes to a fresh [`MemoryStore`] seeded with an empty
/// profile for `user_id`, so nothing is persisted.
///
/// # Errors
///
/// Returns an error if the platform client cannot be built or the sync fails.
pub(crate) async fn run_sync(
    config: &AppConfig,
    pool: Option<sqlx::PgPool>,
    platform: Platform,
    user_id: Uuid,
    access_token: String,
) -> anyhow::Result<()> {
    let client = PlatformClient::from_app_config(config)?;
    let dry_run = pool.is_none();
    if dry_run {
        tracing::info!(platform = %platform, user_id = %user_id, "dry run: using in-memory store");
    }
    let store: Box<dyn SyncStore> = match pool {
        Some(pool) => Box::new(PgSyncStore::new(pool)),
        None => {
            let memory = MemoryStore::new();
            memory.insert_profile(user_id).await;
            Box::new(memory)
        }
    };

    let request = SyncRequest {
        platform,
        user_id,
        access_token,
    };
    let outcome = sync_platform(&client, store.as_ref(), &request, Utc::now()).await?;

    if dry_run {
        println!("dry-run: nothing was written to the database");
    }
    for line in summary_lines(user_id, &outcome) {
        println!("{line}");
    }
    Ok(())
}

fn summary_lines(user_id: Uuid, outcome: &SyncOutcome) -> Vec<String> {
    let mut lines = vec![
        format!(
            "synced {} {} item(s) for user {user_id}",
            outcome.items_processed,
            outcome.platform.display_name()
        ),
        format!(
            "  posts: {} inserted, {} updated, {} unchanged",
            outcome.inserted, outcome.updated, outcome.unchanged
        ),
        format!(
            "  {}: followers {}, avg engagement {:.2}%",
            outcome.metrics.metric_date,
            outcome.metrics.followers,
            outcome.metrics.avg_engagement_rate
        ),
    ];
    if !outcome.profile_updated {
        lines.push(
            "  warning: no profile row for this user; summary fields not updated".to_string(),
        );
    }
    lines
}

/// Prints stored daily snapshots, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_metrics(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    platform: Option<Platform>,
    limit: i64,
) -> anyhow::Result<()> {
    let rows = creatorhub_db::list_platform_metrics(pool, user_id, platform, limit).await?;
    tracing::debug!(user_id = %user_id, rows = rows.len(), "loaded metrics snapshots");

    if rows.is_empty() {
        println!("no metrics found for user {user_id}; run `sync` first");
        return Ok(());
    }

    println!("{}", metrics_header());
    for row in &rows {
        println!("{}", format_metrics_row(row));
    }
    Ok(())
}

fn metrics_header() -> String {
    format!(
        "{:<12}{:<11}{:>11}{:>8}{:>12}{:>10}{:>10}{:>9}{:>9}",
        "DATE", "PLATFORM", "FOLLOWERS", "POSTS", "VIEWS", "LIKES", "COMMENTS", "SHARES", "ENG%"
    )
}

fn format_metrics_row(row: &PlatformMetricsRow) -> String {
    format!(
        "{:<12}{:<11}{:>11}{:>8}{:>12}{:>10}{:>10}{:>9}{:>9.2}",
        row.metric_date.format("%Y-%m-%d").to_string(),
        row.platform,
        row.followers,
        row.total_posts,
        row.total_views,
        row.total_likes,
        row.total_comments,
        row.total_shares,
        row.avg_engagement_rate
    )
}
