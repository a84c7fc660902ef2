use chrono::{DateTime, Utc};
use creatorhub_core::Platform;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub instagram_handle: Option<String>,
    pub instagram_followers: Option<i64>,
    pub tiktok_handle: Option<String>,
    pub tiktok_followers: Option<i64>,
    pub youtube_handle: Option<String>,
    pub youtube_followers: Option<i64>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Overwrite one platform's handle/follower columns on the user's profile.
///
/// Profiles are created outside the sync path, so a missing row is not an
/// error: returns `false` when no profile matched `user_id`.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn update_profile_summary(
    pool: &PgPool,
    user_id: Uuid,
    platform: Platform,
    handle: Option<&str>,
    followers: i64,
    synced_at: DateTime<Utc>,
) -> Result<bool, DbError> {
    // Column names come from the closed Platform set, never from input.
    let prefix = platform.as_str();
    let sql = format!(
        "UPDATE profiles SET \
           {prefix}_handle = $2, \
           {prefix}_followers = $3, \
           last_synced_at = $4, \
           updated_at = NOW() \
         WHERE user_id = $1"
    );

    let result = sqlx::query(&sql)
        .bind(user_id)
        .bind(handle)
        .bind(followers)
        .bind(synced_at)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Fetch a profile by user id.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, DbError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT user_id, display_name, instagram_handle, instagram_followers, \
                tiktok_handle, tiktok_followers, youtube_handle, youtube_followers, \
                last_synced_at \
         FROM profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
