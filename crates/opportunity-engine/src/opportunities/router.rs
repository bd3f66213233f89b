use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::board::BoardError;
use super::domain::OpportunityId;
use super::filters::FilterSpec;
use super::provider::OpportunityProvider;
use super::repository::{NewSavedFilter, RepositoryError, SavedFilterId, SavedFilterRepository};
use super::scoring::OpportunityCategory;
use super::service::{OpportunityService, ServiceError};

type SharedService<P, S> = State<Arc<OpportunityService<P, S>>>;

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryOverrideRequest {
    pub(crate) category: OpportunityCategory,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExcludeRequest {
    pub(crate) ids: Vec<OpportunityId>,
}

/// Router builder exposing scoring, board, and filter endpoints.
pub fn opportunity_router<P, S>(service: Arc<OpportunityService<P, S>>) -> Router
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    Router::new()
        .route("/api/v1/opportunities", get(list_handler::<P, S>))
        .route("/api/v1/opportunities/board", get(board_handler::<P, S>))
        .route("/api/v1/opportunities/search", post(search_handler::<P, S>))
        .route(
            "/api/v1/opportunities/refresh",
            post(refresh_handler::<P, S>),
        )
        .route(
            "/api/v1/opportunities/exclude",
            post(exclude_handler::<P, S>),
        )
        .route(
            "/api/v1/opportunities/:opportunity_id/category",
            put(set_category_handler::<P, S>).delete(clear_category_handler::<P, S>),
        )
        .route("/api/v1/filters/presets", get(presets_handler::<P, S>))
        .route(
            "/api/v1/filters/presets/:preset_id/apply",
            post(apply_preset_handler::<P, S>),
        )
        .route(
            "/api/v1/filters/saved",
            get(saved_filters_handler::<P, S>).post(save_filter_handler::<P, S>),
        )
        .route(
            "/api/v1/filters/saved/:filter_id/load",
            post(load_saved_filter_handler::<P, S>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<P, S>(State(service): SharedService<P, S>) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    let snapshot = service.scored();
    (StatusCode::OK, Json(snapshot.as_ref())).into_response()
}

pub(crate) async fn board_handler<P, S>(State(service): SharedService<P, S>) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    (StatusCode::OK, Json(service.board().grouped())).into_response()
}

pub(crate) async fn search_handler<P, S>(
    State(service): SharedService<P, S>,
    Json(spec): Json<FilterSpec>,
) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    match service.search(&spec) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn refresh_handler<P, S>(State(service): SharedService<P, S>) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    // Provider IO and batch scoring block; keep them off the async workers.
    match tokio::task::spawn_blocking(move || service.refresh()).await {
        Ok(Ok(outcome)) => (StatusCode::OK, Json(outcome)).into_response(),
        Ok(Err(error)) => error_response(error),
        Err(join_error) => {
            error!(%join_error, "refresh task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "refresh task failed" })),
            )
                .into_response()
        }
    }
}

pub(crate) async fn exclude_handler<P, S>(
    State(service): SharedService<P, S>,
    Json(request): Json<ExcludeRequest>,
) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    match service.exclude(&request.ids) {
        Ok(excluded) => (StatusCode::OK, Json(json!({ "excluded": excluded }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_category_handler<P, S>(
    State(service): SharedService<P, S>,
    Path(opportunity_id): Path<String>,
    Json(request): Json<CategoryOverrideRequest>,
) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    let id = OpportunityId(opportunity_id);
    match service.set_category_override(&id, request.category) {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn clear_category_handler<P, S>(
    State(service): SharedService<P, S>,
    Path(opportunity_id): Path<String>,
) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    let id = OpportunityId(opportunity_id);
    match service.clear_category_override(&id) {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn presets_handler<P, S>(State(service): SharedService<P, S>) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    (StatusCode::OK, Json(service.presets(Utc::now()))).into_response()
}

pub(crate) async fn apply_preset_handler<P, S>(
    State(service): SharedService<P, S>,
    Path(preset_id): Path<String>,
    Json(active): Json<FilterSpec>,
) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    match service.apply_preset(&active, &preset_id, Utc::now()) {
        Ok(merged) => (StatusCode::OK, Json(merged)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn saved_filters_handler<P, S>(State(service): SharedService<P, S>) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    match service.saved_filters() {
        Ok(filters) => (StatusCode::OK, Json(filters)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_filter_handler<P, S>(
    State(service): SharedService<P, S>,
    Json(request): Json<NewSavedFilter>,
) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    match service.save_filter(request) {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn load_saved_filter_handler<P, S>(
    State(service): SharedService<P, S>,
    Path(filter_id): Path<String>,
) -> Response
where
    P: OpportunityProvider + 'static,
    S: SavedFilterRepository + 'static,
{
    match service.load_saved_filter(&SavedFilterId(filter_id)) {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Filter(_) | ServiceError::InvalidOpportunity { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ServiceError::Board(BoardError::UnknownOpportunity(_))
        | ServiceError::Repository(RepositoryError::NotFound)
        | ServiceError::UnknownPreset(_) => StatusCode::NOT_FOUND,
        ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Provider(_) | ServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
