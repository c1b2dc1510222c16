use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::model::GameModelSummary, error::AppError, services::model_service, state::SharedState,
};

/// Read-only routes over the game model registry.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/models", get(list_models))
        .route("/models/{id}", get(get_model))
}

/// List every known game model.
#[utoipa::path(
    get,
    path = "/models",
    tag = "models",
    responses((status = 200, description = "Known game models", body = [GameModelSummary]))
)]
pub async fn list_models(State(state): State<SharedState>) -> Json<Vec<GameModelSummary>> {
    Json(model_service::list_models(&state))
}

/// Retrieve one game model.
#[utoipa::path(
    get,
    path = "/models/{id}",
    tag = "models",
    params(("id" = String, Path, description = "Identifier of the game model")),
    responses(
        (status = 200, description = "Game model", body = GameModelSummary),
        (status = 404, description = "Unknown model")
    )
)]
pub async fn get_model(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameModelSummary>, AppError> {
    Ok(Json(model_service::get_model(&state, &id)?))
}
