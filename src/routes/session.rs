use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use validator::Validate;

use crate::{
    dto::{
        game::GameSummary,
        session::{AddRoundResponse, RenameGameRequest, SetFieldScoreRequest, SetRoundScoreRequest},
    },
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Score entry routes. Every route answers 409 while no game view is mounted.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/session", get(current_game))
        .route("/session/rounds", post(add_round))
        .route("/session/scores/rounds", put(set_round_score))
        .route("/session/scores/fields", put(set_field_score))
        .route("/session/name", put(rename_game))
        .route("/session/finish", post(finish_game))
}

/// Current state of the open game.
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses(
        (status = 200, description = "Open game", body = GameSummary),
        (status = 409, description = "No game is open")
    )
)]
pub async fn current_game(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(session_service::current_game(&state).await?))
}

/// Append a round to every player.
#[utoipa::path(
    post,
    path = "/session/rounds",
    tag = "session",
    responses(
        (status = 200, description = "Round added", body = AddRoundResponse),
        (status = 409, description = "No game is open, game finished or not a rounds game")
    )
)]
pub async fn add_round(
    State(state): State<SharedState>,
) -> Result<Json<AddRoundResponse>, AppError> {
    Ok(Json(session_service::add_round(&state).await?))
}

/// Set or clear one round score.
#[utoipa::path(
    put,
    path = "/session/scores/rounds",
    tag = "session",
    request_body = SetRoundScoreRequest,
    responses(
        (status = 200, description = "Score recorded", body = GameSummary),
        (status = 409, description = "No game is open, game finished or not a rounds game")
    )
)]
pub async fn set_round_score(
    State(state): State<SharedState>,
    Json(payload): Json<SetRoundScoreRequest>,
) -> Result<Json<GameSummary>, AppError> {
    let game = session_service::set_round_score(
        &state,
        payload.player_index,
        payload.round_index,
        payload.value,
    )
    .await?;
    Ok(Json(game))
}

/// Set one category score.
#[utoipa::path(
    put,
    path = "/session/scores/fields",
    tag = "session",
    request_body = SetFieldScoreRequest,
    responses(
        (status = 200, description = "Score recorded", body = GameSummary),
        (status = 400, description = "Blank category id"),
        (status = 409, description = "No game is open, game finished or not a calculated game")
    )
)]
pub async fn set_field_score(
    State(state): State<SharedState>,
    Json(payload): Json<SetFieldScoreRequest>,
) -> Result<Json<GameSummary>, AppError> {
    payload.validate()?;
    let game = session_service::set_field_score(
        &state,
        payload.player_index,
        &payload.category_id,
        payload.value,
    )
    .await?;
    Ok(Json(game))
}

/// Rename the open game.
#[utoipa::path(
    put,
    path = "/session/name",
    tag = "session",
    request_body = RenameGameRequest,
    responses(
        (status = 200, description = "Game renamed", body = GameSummary),
        (status = 400, description = "Blank name"),
        (status = 409, description = "No game is open")
    )
)]
pub async fn rename_game(
    State(state): State<SharedState>,
    Json(payload): Json<RenameGameRequest>,
) -> Result<Json<GameSummary>, AppError> {
    payload.validate()?;
    Ok(Json(session_service::rename(&state, &payload.name).await?))
}

/// Finish the open game and persist it immediately.
#[utoipa::path(
    post,
    path = "/session/finish",
    tag = "session",
    responses(
        (status = 200, description = "Game finished", body = GameSummary),
        (status = 409, description = "No game is open")
    )
)]
pub async fn finish_game(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(session_service::finish(&state).await?))
}
