use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::engagement::mean_rate;
use crate::platform::MediaType;

/// Account-level identity and statistics reported by a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub platform_user_id: String,
    pub username: Option<String>,
    pub followers: i64,
    pub post_count: i64,
}

/// One piece of published content in platform-neutral form.
///
/// `external_post_id` is the platform-native id and the dedup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPost {
    pub external_post_id: String,
    pub caption: Option<String>,
    pub media_url: Option<String>,
    pub media_type: MediaType,
    pub published_at: Option<DateTime<Utc>>,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub engagement_rate: f64,
}

/// Daily aggregate written once per (user, platform, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub metric_date: NaiveDate,
    pub followers: i64,
    pub total_posts: i64,
    pub total_views: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub total_shares: i64,
    pub avg_engagement_rate: f64,
}

impl MetricsSnapshot {
    /// Aggregates a synced batch into the snapshot for `metric_date`.
    ///
    /// The average engagement rate divides by the number of posts in the
    /// batch, including posts whose counters are all zero.
    #[must_use]
    pub fn from_batch(
        metric_date: NaiveDate,
        account: &AccountSnapshot,
        posts: &[NormalizedPost],
    ) -> Self {
        let mut snapshot = Self {
            metric_date,
            followers: account.followers,
            total_posts: account.post_count,
            total_views: 0,
            total_likes: 0,
            total_comments: 0,
            total_shares: 0,
            avg_engagement_rate: 0.0,
        };

        let mut rates = Vec::with_capacity(posts.len());
        for post in posts {
            snapshot.total_views += post.views;
            snapshot.total_likes += post.likes;
            snapshot.total_comments += post.comments;
            snapshot.total_shares += post.shares;
            rates.push(post.engagement_rate);
        }
        snapshot.avg_engagement_rate = mean_rate(&rates);
        snapshot
    }
}
