//! API service routes

use axum::{
    Json, Router,
    body::Bytes,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, put},
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    middleware::cors_headers,
    response::ErrorBody,
    state::AppState,
};

pub mod events;
pub mod requests;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/events",
            get(events::list_events)
                .post(events::create_event)
                .put(events::missing_event_id)
                .delete(events::missing_event_id)
                .options(preflight)
                .fallback(unsupported_method),
        )
        .route(
            "/api/events/",
            put(events::missing_event_id)
                .delete(events::missing_event_id)
                .options(preflight)
                .fallback(unsupported_method),
        )
        .route(
            "/api/events/:id",
            put(events::update_event)
                .delete(events::delete_event)
                .options(preflight)
                .fallback(unsupported_method),
        )
        .route(
            "/api/requests",
            get(requests::list_requests)
                .post(requests::create_request)
                .put(requests::update_request)
                .delete(requests::delete_request)
                .options(preflight)
                .fallback(unsupported_method),
        )
        .fallback(not_found)
        .layer(middleware::map_response(cors_headers))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api"
    }))
}

/// Cross-origin pre-flight: empty 200, headers come from the middleware
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn unsupported_method() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found")))
}

/// Decode a JSON body; an empty body reads as `{}`
pub(crate) fn parse_body<T>(body: &Bytes) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}
