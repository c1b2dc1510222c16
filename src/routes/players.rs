use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::player::{CreatePlayerRequest, PlayerSummary, RenamePlayerRequest},
    error::AppError,
    services::player_service,
    state::SharedState,
};

/// Player registry routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route("/players/{id}", put(rename_player).delete(delete_player))
}

/// List registered players sorted by name.
#[utoipa::path(
    get,
    path = "/players",
    tag = "players",
    responses((status = 200, description = "Registered players", body = [PlayerSummary]))
)]
pub async fn list_players(State(state): State<SharedState>) -> Json<Vec<PlayerSummary>> {
    Json(player_service::list_players(&state).await)
}

/// Register a player.
#[utoipa::path(
    post,
    path = "/players",
    tag = "players",
    request_body = CreatePlayerRequest,
    responses(
        (status = 201, description = "Player registered", body = PlayerSummary),
        (status = 400, description = "Blank or duplicate name")
    )
)]
pub async fn create_player(
    State(state): State<SharedState>,
    Json(payload): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerSummary>), AppError> {
    payload.validate()?;
    let player = player_service::add_player(&state, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// Rename a player everywhere, including past games.
#[utoipa::path(
    put,
    path = "/players/{id}",
    tag = "players",
    params(("id" = String, Path, description = "Identifier of the player")),
    request_body = RenamePlayerRequest,
    responses(
        (status = 200, description = "Player renamed", body = PlayerSummary),
        (status = 400, description = "Blank or duplicate name"),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn rename_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenamePlayerRequest>,
) -> Result<Json<PlayerSummary>, AppError> {
    payload.validate()?;
    Ok(Json(
        player_service::rename_player(&state, id, &payload.name).await?,
    ))
}

/// Remove a player; their seats in past games become anonymous.
#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "players",
    params(("id" = String, Path, description = "Identifier of the player")),
    responses(
        (status = 204, description = "Player removed"),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    player_service::remove_player(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
