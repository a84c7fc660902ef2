//! TikTok Display API adapter.
//!
//! `GET /v2/user/info/` for the account and `POST /v2/video/list/` with
//! `max_count: 20` for recent videos. Both use bearer auth and wrap their
//! payload in a `{ data, error }` envelope where `error.code == "ok"` means
//! success.

use chrono::{DateTime, Utc};
use creatorhub_core::{AccountSnapshot, MediaType, NormalizedPost, Platform};
use serde::{Deserialize, Serialize};

use crate::client::PlatformClient;
use crate::error::SyncError;
use crate::types::PlatformBatch;

const USER_FIELDS: &str =
    "open_id,union_id,avatar_url,display_name,username,follower_count,following_count,likes_count,video_count";
const VIDEO_FIELDS: &str = "id,title,video_description,cover_image_url,share_url,create_time,like_count,comment_count,share_count,view_count";
pub const VIDEO_PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
struct TikTokEnvelope<T> {
    data: Option<T>,
    error: Option<TikTokApiError>,
}

#[derive(Debug, Deserialize)]
struct TikTokApiError {
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct UserData {
    user: Option<TikTokUser>,
}

#[derive(Debug, Deserialize)]
struct TikTokUser {
    open_id: String,
    display_name: Option<String>,
    username: Option<String>,
    #[serde(default, deserialize_with = "crate::de::count")]
    follower_count: i64,
    #[serde(default, deserialize_with = "crate::de::count")]
    video_count: i64,
}

#[derive(Debug, Deserialize)]
struct VideoListData {
    #[serde(default)]
    videos: Vec<TikTokVideo>,
}

#[derive(Debug, Deserialize)]
struct TikTokVideo {
    id: String,
    title: Option<String>,
    video_description: Option<String>,
    cover_image_url: Option<String>,
    share_url: Option<String>,
    create_time: Option<i64>,
    #[serde(default, deserialize_with = "crate::de::count")]
    view_count: i64,
    #[serde(default, deserialize_with = "crate::de::count")]
    like_count: i64,
    #[serde(default, deserialize_with = "crate::de::count")]
    comment_count: i64,
    #[serde(default, deserialize_with = "crate::de::count")]
    share_count: i64,
}

#[derive(Debug, Serialize)]
struct VideoListRequest {
    max_count: u32,
}

pub(crate) async fn fetch_batch(
    client: &PlatformClient,
    access_token: &str,
) -> Result<PlatformBatch, SyncError> {
    let mut user_url = client.endpoint(Platform::TikTok, "v2/user/info/")?;
    user_url.query_pairs_mut().append_pair("fields", USER_FIELDS);
    let user_envelope: TikTokEnvelope<UserData> = client
        .send_json(
            Platform::TikTok,
            client.http().get(user_url).bearer_auth(access_token),
            "tiktok user info",
        )
        .await?;
    let user = unwrap_envelope(user_envelope)?
        .and_then(|data| data.user)
        .ok_or_else(|| SyncError::MissingResource("no TikTok user found for this token".into()))?;

    let mut list_url = client.endpoint(Platform::TikTok, "v2/video/list/")?;
    list_url.query_pairs_mut().append_pair("fields", VIDEO_FIELDS);
    let list_envelope: TikTokEnvelope<VideoListData> = client
        .send_json(
            Platform::TikTok,
            client
                .http()
                .post(list_url)
                .bearer_auth(access_token)
                .json(&VideoListRequest {
                    max_count: VIDEO_PAGE_SIZE,
                }),
            "tiktok video list",
        )
        .await?;
    let videos = unwrap_envelope(list_envelope)?
        .map(|data| data.videos)
        .unwrap_or_default();

    Ok(PlatformBatch {
        account: normalize_user(user),
        posts: videos.into_iter().map(normalize_video).collect(),
    })
}

/// Returns the envelope's `data`, or [`SyncError::PlatformRejected`] when the
/// error code is anything other than `"ok"`.
fn unwrap_envelope<T>(envelope: TikTokEnvelope<T>) -> Result<Option<T>, SyncError> {
    match envelope.error {
        Some(err) if err.code != "ok" => Err(SyncError::PlatformRejected {
            platform: Platform::TikTok,
            code: err.code,
            message: err.message,
        }),
        _ => Ok(envelope.data),
    }
}

fn normalize_user(user: TikTokUser) -> AccountSnapshot {
    AccountSnapshot {
        platform_user_id: user.open_id,
        username: user.username.or(user.display_name),
        followers: user.follower_count,
        post_count: user.video_count,
    }
}

fn normalize_video(video: TikTokVideo) -> NormalizedPost {
    let engagement_rate = Platform::TikTok.engagement_formula().rate(
        video.view_count,
        video.like_count,
        video.comment_count,
        video.share_count,
    );

    NormalizedPost {
        external_post_id: video.id,
        caption: video
            .video_description
            .filter(|d| !d.trim().is_empty())
            .or(video.title),
        media_url: video.share_url.or(video.cover_image_url),
        media_type: MediaType::Video,
        published_at: video
            .create_time
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        views: video.view_count,
        likes: video.like_count,
        comments: video.comment_count,
        shares: video.share_count,
        engagement_rate,
    }
}
