//! Sync endpoints.
//!
//! - `POST /functions/v1/sync-{instagram,tiktok,youtube}`
//! - `POST /api/v1/sync/{platform}`
//!
//! Body: `{ "userId": "<uuid>", "accessToken": "<token>" }`. Success is
//! `{ "success": true, "<platform>Count": n }`; every failure is a 400 with
//! `{ "error": "<message>" }`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use creatorhub_core::Platform;
use creatorhub_sync::{SyncError, SyncOutcome, SyncRequest};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncBody {
    user_id: String,
    access_token: String,
}

/// Error response for the sync endpoints: always 400, always `{ "error" }`.
#[derive(Debug)]
pub(super) struct SyncFailure(String);

impl From<SyncError> for SyncFailure {
    fn from(err: SyncError) -> Self {
        Self(err.to_string())
    }
}

impl IntoResponse for SyncFailure {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": self.0 })),
        )
            .into_response()
    }
}

pub(super) async fn sync_instagram(State(state): State<AppState>, body: Bytes) -> Response {
    run_sync(&state, Platform::Instagram, &body).await
}

pub(super) async fn sync_tiktok(State(state): State<AppState>, body: Bytes) -> Response {
    run_sync(&state, Platform::TikTok, &body).await
}

pub(super) async fn sync_youtube(State(state): State<AppState>, body: Bytes) -> Response {
    run_sync(&state, Platform::YouTube, &body).await
}

pub(super) async fn sync_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    body: Bytes,
) -> Response {
    match tag.parse::<Platform>() {
        Ok(platform) => run_sync(&state, platform, &body).await,
        Err(e) => SyncFailure(e.to_string()).into_response(),
    }
}

async fn run_sync(state: &AppState, platform: Platform, body: &[u8]) -> Response {
    match execute(state, platform, body).await {
        Ok(outcome) => success_body(platform, outcome.items_processed).into_response(),
        Err(failure) => {
            tracing::debug!(platform = %platform, error = %failure.0, "sync request failed");
            failure.into_response()
        }
    }
}

async fn execute(
    state: &AppState,
    platform: Platform,
    body: &[u8],
) -> Result<SyncOutcome, SyncFailure> {
    let body: SyncBody = serde_json::from_slice(body)
        .map_err(|e| SyncFailure(format!("invalid request body: {e}")))?;
    let user_id = Uuid::parse_str(body.user_id.trim())
        .map_err(|_| SyncFailure(format!("invalid userId '{}'", body.user_id)))?;
    if body.access_token.trim().is_empty() {
        return Err(SyncFailure("accessToken is required".to_string()));
    }

    let request = SyncRequest {
        platform,
        user_id,
        access_token: body.access_token,
    };
    let outcome = creatorhub_sync::sync_platform(
        &state.platforms,
        state.store.as_ref(),
        &request,
        Utc::now(),
    )
    .await?;
    Ok(outcome)
}

fn success_body(platform: Platform, count: usize) -> Json<Value> {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    body.insert(platform.count_key().to_string(), Value::from(count));
    Json(Value::Object(body))
}
