//! Events resource handlers

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    models::{EventPatch, EventPayload, NewEvent},
    response::ApiResponse,
    routes::parse_body,
    state::AppState,
    validation::parse_id,
};

/// List all events, latest date first
pub async fn list_events(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let events = state.event_repository.get_all().await?;

    Ok(Json(ApiResponse::ok(events)))
}

/// Create an event from `name`, `date` and optional details
pub async fn create_event(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let payload: EventPayload = parse_body(&body)?;
    let new_event = NewEvent::from_payload(payload, Utc::now()).map_err(ApiError::BadRequest)?;

    let event = state.event_repository.create(&new_event).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(event))))
}

/// Update the fields present in the body of the event named in the path
pub async fn update_event(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let id = parse_id(&id, "event").map_err(ApiError::BadRequest)?;
    let payload: EventPayload = parse_body(&body)?;
    let patch = EventPatch::from_payload(payload, Utc::now()).map_err(ApiError::BadRequest)?;

    // unreachable while updated_at is always staged
    if patch.is_empty() {
        return Err(ApiError::BadRequest("No data to update".to_string()));
    }

    let event = state
        .event_repository
        .update(id, &patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    Ok(Json(ApiResponse::ok(event)))
}

/// Delete the event named in the path together with its requests
pub async fn delete_event(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let id = parse_id(&id, "event").map_err(ApiError::BadRequest)?;

    if !state.event_repository.delete(id).await? {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    Ok(Json(ApiResponse::ok(json!({ "id": id }))))
}

/// PUT or DELETE on the collection itself
pub async fn missing_event_id() -> ApiError {
    ApiError::BadRequest("Missing event id".to_string())
}
