use chrono::{DateTime, NaiveDate, Utc};
use creatorhub_core::{MetricsSnapshot, Platform};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlatformMetricsRow {
    pub id: i64,
    pub user_id: Uuid,
    pub platform: String,
    pub metric_date: NaiveDate,
    pub followers: i64,
    pub total_posts: i64,
    pub total_views: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub total_shares: i64,
    pub avg_engagement_rate: f64,
    pub updated_at: DateTime<Utc>,
}

/// Write the daily snapshot for (user, platform, `metric_date`).
///
/// A second sync on the same day overwrites the earlier snapshot.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn upsert_platform_metrics(
    pool: &PgPool,
    user_id: Uuid,
    platform: Platform,
    snapshot: &MetricsSnapshot,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO platform_metrics \
           (user_id, platform, metric_date, followers, total_posts, total_views, \
            total_likes, total_comments, total_shares, avg_engagement_rate) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (user_id, platform, metric_date) DO UPDATE SET \
           followers = EXCLUDED.followers, \
           total_posts = EXCLUDED.total_posts, \
           total_views = EXCLUDED.total_views, \
           total_likes = EXCLUDED.total_likes, \
           total_comments = EXCLUDED.total_comments, \
           total_shares = EXCLUDED.total_shares, \
           avg_engagement_rate = EXCLUDED.avg_engagement_rate, \
           updated_at = NOW()",
    )
    .bind(user_id)
    .bind(platform.as_str())
    .bind(snapshot.metric_date)
    .bind(snapshot.followers)
    .bind(snapshot.total_posts)
    .bind(snapshot.total_views)
    .bind(snapshot.total_likes)
    .bind(snapshot.total_comments)
    .bind(snapshot.total_shares)
    .bind(snapshot.avg_engagement_rate)
    .execute(pool)
    .await?;
    Ok(())
}

/// Daily snapshots for a user, newest date first.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_platform_metrics(
    pool: &PgPool,
    user_id: Uuid,
    platform: Option<Platform>,
    limit: i64,
) -> Result<Vec<PlatformMetricsRow>, DbError> {
    let rows = sqlx::query_as::<_, PlatformMetricsRow>(
        "SELECT id, user_id, platform, metric_date, followers, total_posts, total_views, \
                total_likes, total_comments, total_shares, avg_engagement_rate, updated_at \
         FROM platform_metrics \
         WHERE user_id = $1 \
           AND ($2::TEXT IS NULL OR platform = $2) \
         ORDER BY metric_date DESC, platform \
         LIMIT $3",
    )
    .bind(user_id)
    .bind(platform.map(Platform::as_str))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
