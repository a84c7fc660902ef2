//! `YouTube` Data API v3 adapter.
//!
//! Three calls: the authenticated user's channel (`channels?mine=true`), their
//! 50 most recent uploads (`search?forMine=true&order=date`), and a batch
//! statistics lookup for those video ids (`videos?id=a,b,c`). The Data API
//! encodes counts as decimal strings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use creatorhub_core::{AccountSnapshot, MediaType, NormalizedPost, Platform};
use serde::Deserialize;

use crate::client::PlatformClient;
use crate::error::SyncError;
use crate::types::PlatformBatch;

pub const SEARCH_PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
struct ChannelList {
    #[serde(default)]
    items: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    id: String,
    snippet: Option<ChannelSnippet>,
    statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    title: Option<String>,
    custom_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    #[serde(default, deserialize_with = "crate::de::count")]
    subscriber_count: i64,
    #[serde(default, deserialize_with = "crate::de::count")]
    video_count: i64,
}

#[derive(Debug, Deserialize)]
struct SearchList {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<VideoSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    items: Vec<VideoStatsItem>,
}

#[derive(Debug, Deserialize)]
struct VideoStatsItem {
    id: String,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    #[serde(default, deserialize_with = "crate::de::count")]
    view_count: i64,
    #[serde(default, deserialize_with = "crate::de::count")]
    like_count: i64,
    #[serde(default, deserialize_with = "crate::de::count")]
    comment_count: i64,
}

pub(crate) async fn fetch_batch(
    client: &PlatformClient,
    access_token: &str,
) -> Result<PlatformBatch, SyncError> {
    let mut channel_url = client.endpoint(Platform::YouTube, "channels")?;
    channel_url
        .query_pairs_mut()
        .append_pair("part", "snippet,statistics")
        .append_pair("mine", "true");
    let channels: ChannelList = client
        .send_json(
            Platform::YouTube,
            client.http().get(channel_url).bearer_auth(access_token),
            "youtube channels",
        )
        .await?;
    let channel = channels.items.into_iter().next().ok_or_else(|| {
        SyncError::MissingResource("no YouTube channel found for this account".to_string())
    })?;

    let mut search_url = client.endpoint(Platform::YouTube, "search")?;
    search_url
        .query_pairs_mut()
        .append_pair("part", "snippet")
        .append_pair("forMine", "true")
        .append_pair("type", "video")
        .append_pair("order", "date")
        .append_pair("maxResults", &SEARCH_PAGE_SIZE.to_string());
    let search: SearchList = client
        .send_json(
            Platform::YouTube,
            client.http().get(search_url).bearer_auth(access_token),
            "youtube search",
        )
        .await?;

    let videos: Vec<(String, Option<VideoSnippet>)> = search
        .items
        .into_iter()
        .filter_map(|item| item.id.video_id.map(|id| (id, item.snippet)))
        .collect();

    let stats = if videos.is_empty() {
        HashMap::new()
    } else {
        let ids: Vec<&str> = videos.iter().map(|(id, _)| id.as_str()).collect();
        let mut stats_url = client.endpoint(Platform::YouTube, "videos")?;
        stats_url
            .query_pairs_mut()
            .append_pair("part", "statistics")
            .append_pair("id", &ids.join(","));
        let list: VideoList = client
            .send_json(
                Platform::YouTube,
                client.http().get(stats_url).bearer_auth(access_token),
                "youtube video statistics",
            )
            .await?;
        list.items
            .into_iter()
            .map(|item| (item.id, item.statistics))
            .collect::<HashMap<_, _>>()
    };

    let posts = videos
        .into_iter()
        .map(|(id, snippet)| {
            let statistics = stats.get(&id).copied();
            normalize_video(id, snippet, statistics)
        })
        .collect();

    Ok(PlatformBatch {
        account: normalize_channel(channel),
        posts,
    })
}

fn normalize_channel(channel: Channel) -> AccountSnapshot {
    let statistics = channel.statistics.unwrap_or_default();
    let username = channel.snippet.and_then(|s| s.custom_url.or(s.title));
    AccountSnapshot {
        platform_user_id: channel.id,
        username,
        followers: statistics.subscriber_count,
        post_count: statistics.video_count,
    }
}

/// A video missing from the statistics lookup keeps all-zero counters.
fn normalize_video(
    id: String,
    snippet: Option<VideoSnippet>,
    statistics: Option<VideoStatistics>,
) -> NormalizedPost {
    let stats = statistics.unwrap_or_default();
    let engagement_rate = Platform::YouTube.engagement_formula().rate(
        stats.view_count,
        stats.like_count,
        stats.comment_count,
        0,
    );
    let (caption, published_at) = snippet.map_or((None, None), |s| (s.title, s.published_at));

    NormalizedPost {
        media_url: Some(format!("https://www.youtube.com/watch?v={id}")),
        external_post_id: id,
        caption,
        media_type: MediaType::Video,
        published_at,
        views: stats.view_count,
        likes: stats.like_count,
        comments: stats.comment_count,
        shares: 0,
        engagement_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accept_strings_and_numbers() {
        let stats: VideoStatistics = serde_json::from_value(serde_json::json!({
            "viewCount": "1500",
            "likeCount": 30,
            "commentCount": "15"
        }))
        .expect("stats");
        assert_eq!(stats.view_count, 1_500);
        assert_eq!(stats.like_count, 30);
        assert_eq!(stats.comment_count, 15);
    }

    #[test]
    fn hidden_like_count_defaults_to_zero() {
        let stats: VideoStatistics =
            serde_json::from_value(serde_json::json!({ "viewCount": "10" })).expect("stats");
        assert_eq!(stats.like_count, 0);
    }

    #[test]
    fn null_counts_default_to_zero() {
        let stats: VideoStatistics = serde_json::from_value(serde_json::json!({
            "viewCount": "80",
            "likeCount": null,
            "commentCount": "4"
        }))
        .expect("stats");
        assert_eq!(stats.like_count, 0);
        assert_eq!(stats.comment_count, 4);
    }

    #[test]
    fn engagement_excludes_shares() {
        let post = normalize_video(
            "v1".to_string(),
            None,
            Some(VideoStatistics {
                view_count: 200,
                like_count: 10,
                comment_count: 10,
            }),
        );
        assert!((post.engagement_rate - 10.0).abs() < 1e-9);
        assert_eq!(
            post.media_url.as_deref(),
            Some("https://www.youtube.com/watch?v=v1")
        );
    }

    #[test]
    fn missing_statistics_yield_zero_counters() {
        let post = normalize_video("v2".to_string(), None, None);
        assert_eq!(post.views, 0);
        assert_eq!(post.likes, 0);
        assert!(post.engagement_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn channel_prefers_custom_url_as_handle() {
        let channel: Channel = serde_json::from_value(serde_json::json!({
            "id": "UC123",
            "snippet": { "title": "Creator Channel", "customUrl": "@creator" },
            "statistics": { "subscriberCount": "9001", "videoCount": "77" }
        }))
        .expect("channel");
        let account = normalize_channel(channel);
        assert_eq!(account.username.as_deref(), Some("@creator"));
        assert_eq!(account.followers, 9_001);
        assert_eq!(account.post_count, 77);
    }
}
