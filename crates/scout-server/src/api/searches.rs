use std::convert::Infallible;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Extension, Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::stream::{self, Stream};
use scout_core::{CampaignBrief, Category, EnrichedInfluencer, PackageOffer};
use scout_pipeline::{RunSnapshot, Stage, StageOutcome, StatusRow};
use serde::Serialize;
use uuid::Uuid;

use super::{ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct CreatedSearch {
    id: Uuid,
    stage: Stage,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchSnapshot {
    id: Uuid,
    stage: Stage,
    status: Vec<StatusRow>,
    completed: Vec<StageOutcome>,
    finalists: Vec<FinalistItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// A finalist as presented to clients. Images are base64-encoded PNG.
#[derive(Debug, Serialize)]
pub(super) struct FinalistItem {
    username: String,
    name: String,
    category: Category,
    follower_count: i64,
    title: String,
    description: String,
    rating_count: i32,
    average_rating: f64,
    packages: Vec<PackageOffer>,
    feed_description: Option<String>,
    feed_image: Option<String>,
    avatar: Option<String>,
}

impl From<&EnrichedInfluencer> for FinalistItem {
    fn from(influencer: &EnrichedInfluencer) -> Self {
        let c = &influencer.candidate;
        Self {
            username: c.username.clone(),
            name: c.name.clone(),
            category: c.category,
            follower_count: c.follower_count,
            title: c.title.clone(),
            description: c.description.clone(),
            rating_count: c.rating_count,
            average_rating: c.average_rating,
            packages: influencer.packages.clone(),
            feed_description: influencer.feed.as_ref().map(|f| f.description.clone()),
            feed_image: influencer.feed.as_ref().map(|f| STANDARD.encode(&f.image)),
            avatar: influencer.avatar.as_ref().map(|a| STANDARD.encode(a)),
        }
    }
}

impl SearchSnapshot {
    fn new(id: Uuid, snapshot: &RunSnapshot) -> Self {
        Self {
            id,
            stage: snapshot.stage,
            status: snapshot.status_rows(),
            completed: snapshot.completed.clone(),
            finalists: snapshot.finalists.iter().map(FinalistItem::from).collect(),
            error: snapshot.error.clone(),
        }
    }
}

fn parse_id(req_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::new(req_id, "not_found", format!("search {raw} not found")))
}

fn not_found(req_id: &str, id: Uuid) -> ApiError {
    ApiError::new(req_id, "not_found", format!("search {id} not found"))
}

pub(super) async fn create_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<CampaignBrief>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedSearch>>), ApiError> {
    let Json(brief) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;
    brief
        .validate()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let category = brief.category;
    let handle = state.pipeline.spawn(brief);
    let stage = handle.progress.borrow().stage;
    let id = state.sessions.insert(handle.progress).await;
    tracing::info!(search_id = %id, %category, "search started");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::new(req_id.0, CreatedSearch { id, stage })),
    ))
}

pub(super) async fn get_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<SearchSnapshot>>, ApiError> {
    let id = parse_id(&req_id.0, &raw_id)?;
    let snapshot = state
        .sessions
        .snapshot(id)
        .await
        .ok_or_else(|| not_found(&req_id.0, id))?;

    Ok(Json(ApiResponse::new(
        req_id.0,
        SearchSnapshot::new(id, &snapshot),
    )))
}

pub(super) async fn delete_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&req_id.0, &raw_id)?;
    if state.sessions.remove(id).await {
        tracing::info!(search_id = %id, "search discarded");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&req_id.0, id))
    }
}

/// Streams a `snapshot` event per published transition, ending after the
/// first terminal snapshot.
pub(super) async fn search_events(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&req_id.0, &raw_id)?;
    let rx = state
        .sessions
        .subscribe(id)
        .await
        .ok_or_else(|| not_found(&req_id.0, id))?;

    Ok(Sse::new(snapshot_events(id, rx))
        .keep_alive(KeepAlive::default())
        .into_response())
}

fn snapshot_events(
    id: Uuid,
    rx: tokio::sync::watch::Receiver<RunSnapshot>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(Some(rx), move |state| async move {
        let mut rx = state?;
        rx.changed().await.ok()?;
        let snapshot = rx.borrow_and_update().clone();
        let next = if snapshot.is_terminal() { None } else { Some(rx) };

        let event = Event::default()
            .event("snapshot")
            .json_data(SearchSnapshot::new(id, &snapshot))
            .unwrap_or_else(|e| {
                tracing::error!(search_id = %id, error = %e, "failed to encode snapshot");
                Event::default().event("error").data("snapshot encoding failed")
            });
        Some((Ok(event), next))
    })
}
