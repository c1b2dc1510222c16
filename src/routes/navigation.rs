use axum::{Json, Router, extract::State, routing::{get, post}};

use crate::{
    dto::navigation::{NavigateRequest, NavigationState},
    services::navigation_service,
    state::SharedState,
};

/// Routes driving the single live view.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/navigation", get(current).post(navigate))
        .route("/navigation/back", post(back))
        .route("/navigation/forward", post(forward))
}

/// Describe the mounted view.
#[utoipa::path(
    get,
    path = "/navigation",
    tag = "navigation",
    responses((status = 200, description = "Navigator state", body = NavigationState))
)]
pub async fn current(State(state): State<SharedState>) -> Json<NavigationState> {
    Json(navigation_service::current(&state).await)
}

/// Leave the mounted view and mount another one. Unknown routes mount the default view.
#[utoipa::path(
    post,
    path = "/navigation",
    tag = "navigation",
    request_body = NavigateRequest,
    responses((status = 200, description = "View mounted", body = NavigationState))
)]
pub async fn navigate(
    State(state): State<SharedState>,
    Json(payload): Json<NavigateRequest>,
) -> Json<NavigationState> {
    Json(navigation_service::navigate(&state, &payload.route, payload.params).await)
}

/// Step back in history.
#[utoipa::path(
    post,
    path = "/navigation/back",
    tag = "navigation",
    responses((status = 200, description = "Navigator state", body = NavigationState))
)]
pub async fn back(State(state): State<SharedState>) -> Json<NavigationState> {
    Json(navigation_service::back(&state).await)
}

/// Step forward in history.
#[utoipa::path(
    post,
    path = "/navigation/forward",
    tag = "navigation",
    responses((status = 200, description = "Navigator state", body = NavigationState))
)]
pub async fn forward(State(state): State<SharedState>) -> Json<NavigationState> {
    Json(navigation_service::forward(&state).await)
}
