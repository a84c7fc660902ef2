use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use creatorhub_core::Platform;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct MetricsItem {
    platform: String,
    metric_date: NaiveDate,
    followers: i64,
    total_posts: i64,
    total_views: i64,
    total_likes: i64,
    total_comments: i64,
    total_shares: i64,
    avg_engagement_rate: f64,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct PostItem {
    platform: String,
    external_post_id: String,
    caption: Option<String>,
    media_url: Option<String>,
    media_type: String,
    status: String,
    published_at: Option<DateTime<Utc>>,
    views: i64,
    likes: i64,
    comments: i64,
    shares: i64,
    engagement_rate: f64,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserScopedQuery {
    pub platform: Option<String>,
    pub limit: Option<i64>,
}

fn parse_user_id(request_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiError::new(
            request_id,
            "validation_error",
            format!("user id '{raw}' is not a valid UUID"),
        )
    })
}

fn parse_platform_filter(
    request_id: &str,
    raw: Option<&str>,
) -> Result<Option<Platform>, ApiError> {
    raw.map(|tag| {
        tag.parse::<Platform>()
            .map_err(|e| ApiError::new(request_id, "validation_error", e.to_string()))
    })
    .transpose()
}

pub(super) async fn list_user_metrics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Query(query): Query<UserScopedQuery>,
) -> Result<Json<ApiResponse<Vec<MetricsItem>>>, ApiError> {
    let user_id = parse_user_id(&req_id.0, &user_id)?;
    let platform = parse_platform_filter(&req_id.0, query.platform.as_deref())?;

    let rows = creatorhub_db::list_platform_metrics(
        &state.pool,
        user_id,
        platform,
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| MetricsItem {
            platform: row.platform,
            metric_date: row.metric_date,
            followers: row.followers,
            total_posts: row.total_posts,
            total_views: row.total_views,
            total_likes: row.total_likes,
            total_comments: row.total_comments,
            total_shares: row.total_shares,
            avg_engagement_rate: row.avg_engagement_rate,
            updated_at: row.updated_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_user_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Query(query): Query<UserScopedQuery>,
) -> Result<Json<ApiResponse<Vec<PostItem>>>, ApiError> {
    let user_id = parse_user_id(&req_id.0, &user_id)?;
    let platform = parse_platform_filter(&req_id.0, query.platform.as_deref())?;

    let rows = creatorhub_db::list_content_posts(
        &state.pool,
        user_id,
        platform,
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| PostItem {
            platform: row.platform,
            external_post_id: row.external_post_id,
            caption: row.caption,
            media_url: row.media_url,
            media_type: row.media_type,
            status: row.status,
            published_at: row.published_at,
            views: row.views,
            likes: row.likes,
            comments: row.comments,
            shares: row.shares,
            engagement_rate: row.engagement_rate,
            updated_at: row.updated_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
