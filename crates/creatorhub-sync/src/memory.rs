//! In-process [`SyncStore`] used for dry runs and tests.
//!
//! Mirrors the uniqueness rules of the Postgres schema: one post per
//! (user, platform, external id), one snapshot per (user, platform, date),
//! one credentials row per (user, platform).

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use creatorhub_core::{
    AccountSnapshot, ExistingPostPolicy, MetricsSnapshot, NormalizedPost, Platform,
};
use creatorhub_db::UpsertOutcome;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::SyncStore;

/// Handle and follower count for one platform on a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSummary {
    pub handle: Option<String>,
    pub followers: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryProfile {
    pub platforms: HashMap<Platform, PlatformSummary>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct MemoryCredentials {
    pub access_token: String,
    pub platform_user_id: String,
    pub platform_username: Option<String>,
    pub last_synced_at: DateTime<Utc>,
    pub is_active: bool,
}

impl std::fmt::Debug for MemoryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCredentials")
            .field("access_token", &"[redacted]")
            .field("platform_user_id", &self.platform_user_id)
            .field("platform_username", &self.platform_username)
            .field("last_synced_at", &self.last_synced_at)
            .field("is_active", &self.is_active)
            .finish()
    }
}

type PostKey = (Uuid, Platform, String);
type MetricsKey = (Uuid, Platform, NaiveDate);

#[derive(Debug, Default)]
struct MemoryState {
    profiles: HashMap<Uuid, MemoryProfile>,
    credentials: HashMap<(Uuid, Platform), MemoryCredentials>,
    posts: BTreeMap<PostKey, NormalizedPost>,
    metrics: BTreeMap<MetricsKey, MetricsSnapshot>,
    writes: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty profile so profile-summary updates have a row to hit.
    pub async fn insert_profile(&self, user_id: Uuid) {
        self.state
            .lock()
            .await
            .profiles
            .insert(user_id, MemoryProfile::default());
    }

    /// Stores a post directly, bypassing write policies.
    pub async fn seed_post(&self, user_id: Uuid, platform: Platform, post: NormalizedPost) {
        let key = (user_id, platform, post.external_post_id.clone());
        self.state.lock().await.posts.insert(key, post);
    }

    /// Makes every subsequent write fail with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn profile(&self, user_id: Uuid) -> Option<MemoryProfile> {
        self.state.lock().await.profiles.get(&user_id).cloned()
    }

    pub async fn credentials(
        &self,
        user_id: Uuid,
        platform: Platform,
    ) -> Option<MemoryCredentials> {
        self.state
            .lock()
            .await
            .credentials
            .get(&(user_id, platform))
            .cloned()
    }

    pub async fn post(
        &self,
        user_id: Uuid,
        platform: Platform,
        external_post_id: &str,
    ) -> Option<NormalizedPost> {
        self.state
            .lock()
            .await
            .posts
            .get(&(user_id, platform, external_post_id.to_string()))
            .cloned()
    }

    /// All posts for (user, platform), ordered by external id.
    pub async fn posts(&self, user_id: Uuid, platform: Platform) -> Vec<NormalizedPost> {
        self.state
            .lock()
            .await
            .posts
            .iter()
            .filter(|((u, p, _), _)| *u == user_id && *p == platform)
            .map(|(_, post)| post.clone())
            .collect()
    }

    /// All snapshots for (user, platform), oldest date first.
    pub async fn metrics(&self, user_id: Uuid, platform: Platform) -> Vec<MetricsSnapshot> {
        self.state
            .lock()
            .await
            .metrics
            .iter()
            .filter(|((u, p, _), _)| *u == user_id && *p == platform)
            .map(|(_, snapshot)| snapshot.clone())
            .collect()
    }

    /// Number of successful write calls, across all tables.
    pub async fn write_count(&self) -> usize {
        self.state.lock().await.writes
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is read-only".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SyncStore for MemoryStore {
    async fn update_profile_summary(
        &self,
        user_id: Uuid,
        platform: Platform,
        account: &AccountSnapshot,
        synced_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        state.writes += 1;
        let Some(profile) = state.profiles.get_mut(&user_id) else {
            return Ok(false);
        };
        profile.platforms.insert(
            platform,
            PlatformSummary {
                handle: account.username.clone(),
                followers: account.followers,
            },
        );
        profile.last_synced_at = Some(synced_at);
        Ok(true)
    }

    async fn upsert_credentials(
        &self,
        user_id: Uuid,
        platform: Platform,
        access_token: &str,
        account: &AccountSnapshot,
        synced_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        state.writes += 1;
        state.credentials.insert(
            (user_id, platform),
            MemoryCredentials {
                access_token: access_token.to_string(),
                platform_user_id: account.platform_user_id.clone(),
                platform_username: account.username.clone(),
                last_synced_at: synced_at,
                is_active: true,
            },
        );
        Ok(())
    }

    async fn upsert_content_post(
        &self,
        user_id: Uuid,
        platform: Platform,
        post: &NormalizedPost,
        policy: ExistingPostPolicy,
    ) -> Result<UpsertOutcome, StoreError> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        state.writes += 1;
        let key = (user_id, platform, post.external_post_id.clone());
        let outcome = match state.posts.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(post.clone());
                UpsertOutcome::Inserted
            }
            Entry::Occupied(mut slot) => match policy {
                ExistingPostPolicy::KeepExisting => UpsertOutcome::Unchanged,
                ExistingPostPolicy::RefreshCounters => {
                    let existing = slot.get_mut();
                    existing.views = post.views;
                    existing.likes = post.likes;
                    existing.comments = post.comments;
                    existing.shares = post.shares;
                    existing.engagement_rate = post.engagement_rate;
                    UpsertOutcome::Updated
                }
            },
        };
        Ok(outcome)
    }

    async fn upsert_platform_metrics(
        &self,
        user_id: Uuid,
        platform: Platform,
        snapshot: &MetricsSnapshot,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        state.writes += 1;
        state
            .metrics
            .insert((user_id, platform, snapshot.metric_date), snapshot.clone());
        Ok(())
    }
}
