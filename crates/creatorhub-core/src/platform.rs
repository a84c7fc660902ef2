//! Closed vocabularies shared by the sync pipeline, the store, and the API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A social platform the sync adapter knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    TikTok,
    YouTube,
}

/// Which counters feed the per-item engagement rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementFormula {
    /// The platform reports no view counts; the rate is always `0`.
    NotComputed,
    LikesComments,
    LikesCommentsShares,
}

/// What a sync does with a content post that is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingPostPolicy {
    /// Leave the stored row untouched (insert-only).
    KeepExisting,
    /// Overwrite counters and the engagement rate in place.
    RefreshCounters,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::TikTok, Platform::YouTube];

    /// Lowercase tag used in URLs, database rows, and JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
        }
    }

    /// JSON key carrying the processed-item count in a sync response.
    #[must_use]
    pub fn count_key(self) -> &'static str {
        match self {
            Platform::Instagram => "instagramCount",
            Platform::TikTok => "tiktokCount",
            Platform::YouTube => "youtubeCount",
        }
    }

    #[must_use]
    pub fn engagement_formula(self) -> EngagementFormula {
        match self {
            Platform::Instagram => EngagementFormula::NotComputed,
            Platform::TikTok => EngagementFormula::LikesCommentsShares,
            Platform::YouTube => EngagementFormula::LikesComments,
        }
    }

    /// Instagram sync has always been insert-only; the others refresh counters.
    #[must_use]
    pub fn existing_post_policy(self) -> ExistingPostPolicy {
        match self {
            Platform::Instagram => ExistingPostPolicy::KeepExisting,
            Platform::TikTok | Platform::YouTube => ExistingPostPolicy::RefreshCounters,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::TikTok),
            "youtube" => Ok(Platform::YouTube),
            _ => Err(CoreError::UnknownPlatform(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
    Carousel,
}

impl MediaType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Image => "image",
            MediaType::Carousel => "carousel",
        }
    }
}

impl FromStr for MediaType {
    type Err = CoreError;

    /// Accepts the stored lowercase tags as well as Instagram's
    /// `IMAGE` / `VIDEO` / `CAROUSEL_ALBUM` values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" | "reels" => Ok(MediaType::Video),
            "image" => Ok(MediaType::Image),
            "carousel" | "carousel_album" => Ok(MediaType::Carousel),
            _ => Err(CoreError::UnknownMediaType(s.to_string())),
        }
    }
}

/// Lifecycle status of a content post. Synced posts are always `Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
}

impl PostStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }
}
