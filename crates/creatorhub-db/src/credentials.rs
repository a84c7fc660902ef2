use chrono::{DateTime, Utc};
use creatorhub_core::{AccountSnapshot, Platform};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

#[derive(Clone, sqlx::FromRow)]
pub struct PlatformCredentialsRow {
    pub id: i64,
    pub user_id: Uuid,
    pub platform: String,
    pub access_token: String,
    pub platform_user_id: String,
    pub platform_username: Option<String>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl std::fmt::Debug for PlatformCredentialsRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformCredentialsRow")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("platform", &self.platform)
            .field("access_token", &"[redacted]")
            .field("platform_user_id", &self.platform_user_id)
            .field("platform_username", &self.platform_username)
            .field("last_synced_at", &self.last_synced_at)
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// Upsert the latest token and account identity for (user, platform).
///
/// Conflict key: (`user_id`, `platform`). Re-activates a deactivated row.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn upsert_platform_credentials(
    pool: &PgPool,
    user_id: Uuid,
    platform: Platform,
    access_token: &str,
    account: &AccountSnapshot,
    synced_at: DateTime<Utc>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO platform_credentials \
           (user_id, platform, access_token, platform_user_id, platform_username, \
            last_synced_at, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6, true) \
         ON CONFLICT (user_id, platform) DO UPDATE SET \
           access_token = EXCLUDED.access_token, \
           platform_user_id = EXCLUDED.platform_user_id, \
           platform_username = EXCLUDED.platform_username, \
           last_synced_at = EXCLUDED.last_synced_at, \
           is_active = true, \
           updated_at = NOW()",
    )
    .bind(user_id)
    .bind(platform.as_str())
    .bind(access_token)
    .bind(&account.platform_user_id)
    .bind(account.username.as_deref())
    .bind(synced_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Fetch stored credentials for (user, platform).
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn get_platform_credentials(
    pool: &PgPool,
    user_id: Uuid,
    platform: Platform,
) -> Result<Option<PlatformCredentialsRow>, DbError> {
    let row = sqlx::query_as::<_, PlatformCredentialsRow>(
        "SELECT id, user_id, platform, access_token, platform_user_id, platform_username, \
                last_synced_at, is_active \
         FROM platform_credentials \
         WHERE user_id = $1 AND platform = $2",
    )
    .bind(user_id)
    .bind(platform.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
