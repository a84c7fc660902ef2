//! Live integration tests for creatorhub-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{NaiveDate, TimeZone, Utc};
use creatorhub_core::{
    AccountSnapshot, ExistingPostPolicy, MediaType, MetricsSnapshot, NormalizedPost, Platform,
};
use creatorhub_db::{
    get_content_post, get_platform_credentials, get_profile, list_content_posts,
    list_platform_metrics, update_profile_summary, upsert_content_post,
    upsert_platform_credentials, upsert_platform_metrics, UpsertOutcome,
};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_test_profile(pool: &sqlx::PgPool) -> Uuid {
    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO profiles (user_id, display_name) VALUES ($1, 'Test Creator')")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap_or_else(|e| panic!("insert_test_profile failed: {e}"));
    user_id
}

fn make_post(external_id: &str, views: i64, likes: i64) -> NormalizedPost {
    NormalizedPost {
        external_post_id: external_id.to_string(),
        caption: Some("launch day".to_string()),
        media_url: Some(format!("https://cdn.example.com/{external_id}.mp4")),
        media_type: MediaType::Video,
        published_at: Some(Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()),
        views,
        likes,
        comments: 0,
        shares: 0,
        engagement_rate: creatorhub_core::engagement_rate(likes, views),
    }
}

fn account() -> AccountSnapshot {
    AccountSnapshot {
        platform_user_id: "open-id-1".to_string(),
        username: Some("creator".to_string()),
        followers: 5_000,
        post_count: 12,
    }
}

async fn count_posts(pool: &sqlx::PgPool, user_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM content_posts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("count posts")
}

// ---------------------------------------------------------------------------
// content_posts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn refresh_policy_updates_counters_in_place(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();

    let first = upsert_content_post(
        &pool,
        user_id,
        Platform::TikTok,
        &make_post("vid-1", 100, 10),
        ExistingPostPolicy::RefreshCounters,
    )
    .await
    .expect("first upsert");
    assert_eq!(first, UpsertOutcome::Inserted);

    let second = upsert_content_post(
        &pool,
        user_id,
        Platform::TikTok,
        &make_post("vid-1", 400, 40),
        ExistingPostPolicy::RefreshCounters,
    )
    .await
    .expect("second upsert");
    assert_eq!(second, UpsertOutcome::Updated);

    assert_eq!(count_posts(&pool, user_id).await, 1);
    let row = get_content_post(&pool, user_id, Platform::TikTok, "vid-1")
        .await
        .expect("fetch")
        .expect("row exists");
    assert_eq!(row.views, 400);
    assert_eq!(row.likes, 40);
    assert_eq!(row.status, "published");
    assert!((row.engagement_rate - 10.0).abs() < 1e-9);
}

#[sqlx::test(migrations = "../../migrations")]
async fn keep_policy_never_overwrites_existing_row(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();

    upsert_content_post(
        &pool,
        user_id,
        Platform::Instagram,
        &make_post("media-1", 0, 3),
        ExistingPostPolicy::KeepExisting,
    )
    .await
    .expect("first upsert");

    let outcome = upsert_content_post(
        &pool,
        user_id,
        Platform::Instagram,
        &make_post("media-1", 0, 99),
        ExistingPostPolicy::KeepExisting,
    )
    .await
    .expect("second upsert");
    assert_eq!(outcome, UpsertOutcome::Unchanged);

    let row = get_content_post(&pool, user_id, Platform::Instagram, "media-1")
        .await
        .expect("fetch")
        .expect("row exists");
    assert_eq!(row.likes, 3);
    assert_eq!(count_posts(&pool, user_id).await, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn same_external_id_on_other_platform_is_a_separate_post(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    for platform in [Platform::TikTok, Platform::YouTube] {
        let outcome = upsert_content_post(
            &pool,
            user_id,
            platform,
            &make_post("shared-id", 10, 1),
            ExistingPostPolicy::RefreshCounters,
        )
        .await
        .expect("upsert");
        assert_eq!(outcome, UpsertOutcome::Inserted);
    }
    assert_eq!(count_posts(&pool, user_id).await, 2);

    let tiktok_only = list_content_posts(&pool, user_id, Some(Platform::TikTok), 50)
        .await
        .expect("list");
    assert_eq!(tiktok_only.len(), 1);
    assert_eq!(tiktok_only[0].platform, "tiktok");
}

// ---------------------------------------------------------------------------
// platform_metrics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn metrics_snapshot_is_overwritten_same_day(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

    let mut snapshot = MetricsSnapshot::from_batch(day, &account(), &[make_post("a", 100, 15)]);
    upsert_platform_metrics(&pool, user_id, Platform::YouTube, &snapshot)
        .await
        .expect("first write");

    snapshot.followers = 6_000;
    snapshot.total_views = 250;
    upsert_platform_metrics(&pool, user_id, Platform::YouTube, &snapshot)
        .await
        .expect("second write");

    let rows = list_platform_metrics(&pool, user_id, Some(Platform::YouTube), 10)
        .await
        .expect("list");
    assert_eq!(rows.len(), 1, "same-day snapshot must not duplicate");
    assert_eq!(rows[0].followers, 6_000);
    assert_eq!(rows[0].total_views, 250);
    assert_eq!(rows[0].metric_date, day);
}

#[sqlx::test(migrations = "../../migrations")]
async fn metrics_list_is_newest_first(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    for day in [1, 3, 2] {
        let date = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        let snapshot = MetricsSnapshot::from_batch(date, &account(), &[]);
        upsert_platform_metrics(&pool, user_id, Platform::TikTok, &snapshot)
            .await
            .expect("write");
    }

    let rows = list_platform_metrics(&pool, user_id, None, 2)
        .await
        .expect("list");
    let days: Vec<NaiveDate> = rows.iter().map(|r| r.metric_date).collect();
    assert_eq!(
        days,
        vec![
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        ]
    );
}

// ---------------------------------------------------------------------------
// credentials + profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn credentials_upsert_replaces_token(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let synced_at = Utc::now();

    upsert_platform_credentials(&pool, user_id, Platform::TikTok, "tok-1", &account(), synced_at)
        .await
        .expect("first");
    upsert_platform_credentials(&pool, user_id, Platform::TikTok, "tok-2", &account(), synced_at)
        .await
        .expect("second");

    let row = get_platform_credentials(&pool, user_id, Platform::TikTok)
        .await
        .expect("fetch")
        .expect("row exists");
    assert_eq!(row.access_token, "tok-2");
    assert_eq!(row.platform_user_id, "open-id-1");
    assert!(row.is_active);
    assert!(!format!("{row:?}").contains("tok-2"), "Debug must redact token");
}

#[sqlx::test(migrations = "../../migrations")]
async fn profile_summary_overwrites_only_syncing_platform(pool: sqlx::PgPool) {
    let user_id = insert_test_profile(&pool).await;

    let matched = update_profile_summary(
        &pool,
        user_id,
        Platform::YouTube,
        Some("@creator"),
        1_234,
        Utc::now(),
    )
    .await
    .expect("update");
    assert!(matched);

    let profile = get_profile(&pool, user_id)
        .await
        .expect("fetch")
        .expect("profile exists");
    assert_eq!(profile.youtube_handle.as_deref(), Some("@creator"));
    assert_eq!(profile.youtube_followers, Some(1_234));
    assert!(profile.tiktok_handle.is_none());
    assert!(profile.last_synced_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn profile_summary_reports_missing_profile(pool: sqlx::PgPool) {
    let matched = update_profile_summary(
        &pool,
        Uuid::new_v4(),
        Platform::Instagram,
        Some("ghost"),
        1,
        Utc::now(),
    )
    .await
    .expect("update");
    assert!(!matched);
}
