//! Song requests resource handlers

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{NewSongRequest, RequestQuery, SongRequestPayload, StatusPayload},
    response::ApiResponse,
    routes::parse_body,
    state::AppState,
    validation::{parse_id, required},
};

fn query_params(query: Result<Query<RequestQuery>, QueryRejection>) -> ApiResult<RequestQuery> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(query)
}

fn target_id(query: RequestQuery) -> ApiResult<Uuid> {
    let raw = required(query.id)
        .ok_or_else(|| ApiError::BadRequest("Missing request id".to_string()))?;

    parse_id(&raw, "request").map_err(ApiError::BadRequest)
}

/// List requests, newest first, optionally filtered by `?eventId=`
pub async fn list_requests(
    State(state): State<AppState>,
    query: Result<Query<RequestQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let query = query_params(query)?;
    let event_id = match required(query.event_id) {
        Some(raw) => Some(parse_id(&raw, "event").map_err(ApiError::BadRequest)?),
        None => None,
    };

    let requests = state.request_repository.get_all(event_id).await?;

    Ok(Json(ApiResponse::ok(requests)))
}

/// Submit a song request
pub async fn create_request(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let payload: SongRequestPayload = parse_body(&body)?;
    let new_request =
        NewSongRequest::from_payload(payload, Utc::now()).map_err(ApiError::BadRequest)?;

    let request = state.request_repository.create(&new_request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(request))))
}

/// Change the status of the request named by `?id=`
///
/// A body without `status` resets the request to `pending`.
pub async fn update_request(
    State(state): State<AppState>,
    query: Result<Query<RequestQuery>, QueryRejection>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let id = target_id(query_params(query)?)?;
    let payload: StatusPayload = parse_body(&body)?;
    let status = payload.resolved();

    let request = state
        .request_repository
        .update_status(id, &status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;

    Ok(Json(ApiResponse::ok(request)))
}

/// Delete the request named by `?id=`; succeeds even if it did not exist
pub async fn delete_request(
    State(state): State<AppState>,
    query: Result<Query<RequestQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = target_id(query_params(query)?)?;

    state.request_repository.delete(id).await?;

    Ok(Json(ApiResponse::empty()))
}
