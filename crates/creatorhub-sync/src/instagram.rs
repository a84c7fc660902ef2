//! Instagram Graph API adapter.
//!
//! Two calls: `GET /me` for the account and `GET /me/media` for the 50 most
//! recent media objects. Like and comment counts arrive with the listing;
//! there are no view counts, so no engagement rate is computed.

use chrono::{DateTime, Utc};
use creatorhub_core::{AccountSnapshot, MediaType, NormalizedPost, Platform};
use serde::Deserialize;

use crate::client::PlatformClient;
use crate::error::SyncError;
use crate::types::PlatformBatch;

const ACCOUNT_FIELDS: &str = "id,username,account_type,media_count,followers_count";
const MEDIA_FIELDS: &str =
    "id,caption,media_type,media_url,permalink,thumbnail_url,timestamp,like_count,comments_count";
pub const MEDIA_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
struct InstagramAccount {
    id: String,
    username: Option<String>,
    #[serde(default, deserialize_with = "crate::de::count")]
    media_count: i64,
    #[serde(default, deserialize_with = "crate::de::count")]
    followers_count: i64,
}

#[derive(Debug, Deserialize)]
struct InstagramMediaPage {
    #[serde(default)]
    data: Vec<InstagramMedia>,
}

#[derive(Debug, Deserialize)]
struct InstagramMedia {
    id: String,
    caption: Option<String>,
    media_type: Option<String>,
    media_url: Option<String>,
    thumbnail_url: Option<String>,
    permalink: Option<String>,
    timestamp: Option<String>,
    #[serde(default, deserialize_with = "crate::de::count")]
    like_count: i64,
    #[serde(default, deserialize_with = "crate::de::count")]
    comments_count: i64,
}

pub(crate) async fn fetch_batch(
    client: &PlatformClient,
    access_token: &str,
) -> Result<PlatformBatch, SyncError> {
    let mut account_url = client.endpoint(Platform::Instagram, "me")?;
    account_url
        .query_pairs_mut()
        .append_pair("fields", ACCOUNT_FIELDS)
        .append_pair("access_token", access_token);
    let account: InstagramAccount = client
        .send_json(
            Platform::Instagram,
            client.http().get(account_url),
            "instagram account",
        )
        .await?;

    let mut media_url = client.endpoint(Platform::Instagram, "me/media")?;
    media_url
        .query_pairs_mut()
        .append_pair("fields", MEDIA_FIELDS)
        .append_pair("limit", &MEDIA_PAGE_LIMIT.to_string())
        .append_pair("access_token", access_token);
    let page: InstagramMediaPage = client
        .send_json(
            Platform::Instagram,
            client.http().get(media_url),
            "instagram media",
        )
        .await?;

    Ok(PlatformBatch {
        account: normalize_account(account),
        posts: page.data.into_iter().map(normalize_media).collect(),
    })
}

fn normalize_account(account: InstagramAccount) -> AccountSnapshot {
    AccountSnapshot {
        platform_user_id: account.id,
        username: account.username,
        followers: account.followers_count,
        post_count: account.media_count,
    }
}

fn normalize_media(media: InstagramMedia) -> NormalizedPost {
    let media_type = media
        .media_type
        .as_deref()
        .and_then(|raw| raw.parse::<MediaType>().ok())
        .unwrap_or(MediaType::Image);

    let engagement_rate = Platform::Instagram.engagement_formula().rate(
        0,
        media.like_count,
        media.comments_count,
        0,
    );

    NormalizedPost {
        published_at: media.timestamp.as_deref().and_then(parse_timestamp),
        media_url: media.media_url.or(media.thumbnail_url).or(media.permalink),
        external_post_id: media.id,
        caption: media.caption,
        media_type,
        views: 0,
        likes: media.like_count,
        comments: media.comments_count,
        shares: 0,
        engagement_rate,
    }
}

/// Graph API timestamps look like `2026-02-01T12:00:00+0000`, which is not
/// RFC 3339; accept both shapes.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
