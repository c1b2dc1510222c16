use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::game::{CreateGameRequest, GameListQuery, GameStatusDto, GameSummary, HistoryFilter},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes over stored games: creation, listing and history.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/{id}", get(get_game).delete(delete_game))
}

/// List in-progress games, or finished ones with `status=finished`.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    params(GameListQuery),
    responses((status = 200, description = "Matching games", body = [GameSummary]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
    Query(query): Query<GameListQuery>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    let games = match query.status.unwrap_or(GameStatusDto::InProgress) {
        GameStatusDto::InProgress => game_service::games_in_progress(&state).await?,
        GameStatusDto::Finished => {
            let filter = HistoryFilter::from(&query);
            game_service::finished_games(&state, &filter).await?
        }
    };
    Ok(Json(games))
}

/// Create a game and persist it.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created", body = GameSummary),
        (status = 400, description = "Invalid model or seating")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameSummary>), AppError> {
    payload.validate()?;
    let summary = game_service::create_game(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Retrieve a stored game with its leaderboard.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game", body = GameSummary),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::get_game(&state, id).await?))
}

/// Delete a stored game. The game currently open cannot be deleted.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Game is open in the game view")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    game_service::delete_game(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
