// crates/creatorhub-db/src/content_posts.rs
use chrono::{DateTime, Utc};
use creatorhub_core::{ExistingPostPolicy, NormalizedPost, Platform, PostStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{DbError, UpsertOutcome};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentPostRow {
    pub id: i64,
    pub user_id: Uuid,
    pub platform: String,
    pub caption: Option<String>,
    pub media_url: Option<String>,
    pub media_type: String,
    pub external_post_id: String,
    pub published_at: Option<DateTime<Utc>>,
    pub status: String,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub engagement_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const INSERT_COLUMNS: &str = "INSERT INTO content_posts \
       (user_id, platform, caption, media_url, media_type, external_post_id, \
        published_at, status, views, likes, comments, shares, engagement_rate) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
     ON CONFLICT (user_id, platform, external_post_id) ";

/// Insert a synced post, or reconcile it with the stored row.
///
/// Dedup key: (`user_id`, `platform`, `external_post_id`). With
/// [`ExistingPostPolicy::RefreshCounters`] an existing row gets its counters
/// and engagement rate overwritten; with [`ExistingPostPolicy::KeepExisting`]
/// it is left as is and [`UpsertOutcome::Unchanged`] is returned.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn upsert_content_post(
    pool: &PgPool,
    user_id: Uuid,
    platform: Platform,
    post: &NormalizedPost,
    policy: ExistingPostPolicy,
) -> Result<UpsertOutcome, DbError> {
    let sql = match policy {
        ExistingPostPolicy::RefreshCounters => format!(
            "{INSERT_COLUMNS}DO UPDATE SET \
               views = EXCLUDED.views, \
               likes = EXCLUDED.likes, \
               comments = EXCLUDED.comments, \
               shares = EXCLUDED.shares, \
               engagement_rate = EXCLUDED.engagement_rate, \
               updated_at = NOW() \
             RETURNING (xmax = 0) AS inserted"
        ),
        ExistingPostPolicy::KeepExisting => {
            format!("{INSERT_COLUMNS}DO NOTHING RETURNING true AS inserted")
        }
    };

    let inserted = sqlx::query_scalar::<_, bool>(&sql)
        .bind(user_id)
        .bind(platform.as_str())
        .bind(post.caption.as_deref())
        .bind(post.media_url.as_deref())
        .bind(post.media_type.as_str())
        .bind(&post.external_post_id)
        .bind(post.published_at)
        .bind(PostStatus::Published.as_str())
        .bind(post.views)
        .bind(post.likes)
        .bind(post.comments)
        .bind(post.shares)
        .bind(post.engagement_rate)
        .fetch_optional(pool)
        .await?;

    Ok(match inserted {
        Some(true) => UpsertOutcome::Inserted,
        Some(false) => UpsertOutcome::Updated,
        None => UpsertOutcome::Unchanged,
    })
}

/// Fetch one post by its natural key.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn get_content_post(
    pool: &PgPool,
    user_id: Uuid,
    platform: Platform,
    external_post_id: &str,
) -> Result<Option<ContentPostRow>, DbError> {
    let row = sqlx::query_as::<_, ContentPostRow>(
        "SELECT id, user_id, platform, caption, media_url, media_type, external_post_id, \
                published_at, status, views, likes, comments, shares, engagement_rate, \
                created_at, updated_at \
         FROM content_posts \
         WHERE user_id = $1 AND platform = $2 AND external_post_id = $3",
    )
    .bind(user_id)
    .bind(platform.as_str())
    .bind(external_post_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Newest-first posts for a user, optionally narrowed to one platform.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_content_posts(
    pool: &PgPool,
    user_id: Uuid,
    platform: Option<Platform>,
    limit: i64,
) -> Result<Vec<ContentPostRow>, DbError> {
    let rows = sqlx::query_as::<_, ContentPostRow>(
        "SELECT id, user_id, platform, caption, media_url, media_type, external_post_id, \
                published_at, status, views, likes, comments, shares, engagement_rate, \
                created_at, updated_at \
         FROM content_posts \
         WHERE user_id = $1 \
           AND ($2::TEXT IS NULL OR platform = $2) \
         ORDER BY published_at DESC NULLS LAST, id DESC \
         LIMIT $3",
    )
    .bind(user_id)
    .bind(platform.map(Platform::as_str))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
