use std::collections::HashSet;

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::{GameEntity, GameStatus},
    dto::game::{CreateGameRequest, GameSummary, HistoryFilter, SeatInput},
    error::ServiceError,
    services::player_service,
    state::{SharedState, game::Game, model::GameModel},
};

const PLACEHOLDER_PREFIX: &str = "Player ";

/// Create and persist a new in-progress game.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<GameSummary, ServiceError> {
    let CreateGameRequest {
        model_id,
        name,
        players,
    } = request;

    let model = state
        .models()
        .get_model(&model_id)
        .cloned()
        .ok_or_else(|| ServiceError::InvalidInput(format!("unknown game model `{model_id}`")))?;

    validate_seats(&model, &players)?;

    let existing = state.games().list().await;
    let name = match name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default_game_name(&model, &existing),
    };

    let mut seats = Vec::with_capacity(players.len());
    for seat in players {
        let player_name = seat.player_name.trim().to_string();
        let player_id = if is_placeholder_name(&player_name) {
            seat.player_id
        } else {
            Some(player_service::find_or_register(state, &player_name).await?.id)
        };
        seats.push((player_id, player_name));
    }

    let game = Game::new(&model, name, seats);
    state.games().insert(game.clone().into()).await;

    Ok(GameSummary::from_game(&game, &model))
}

/// Fetch one stored game.
pub async fn get_game(state: &SharedState, id: Uuid) -> Result<GameSummary, ServiceError> {
    let Some(entity) = state.games().find(id).await else {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    };
    summarize(state, entity)
}

/// Games still being played, most recently updated first.
pub async fn games_in_progress(state: &SharedState) -> Result<Vec<GameSummary>, ServiceError> {
    let mut games: Vec<GameEntity> = state
        .games()
        .list()
        .await
        .into_iter()
        .filter(|game| game.status == GameStatus::InProgress)
        .collect();
    games.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    summarize_all(state, games)
}

/// Finished games matching `filter`, most recently finished first.
pub async fn finished_games(
    state: &SharedState,
    filter: &HistoryFilter,
) -> Result<Vec<GameSummary>, ServiceError> {
    let mut games: Vec<GameEntity> = state
        .games()
        .list()
        .await
        .into_iter()
        .filter(|game| game.status == GameStatus::Finished)
        .filter(|game| {
            filter
                .model_id
                .as_deref()
                .is_none_or(|model_id| game.model_id == model_id)
        })
        .filter(|game| {
            filter.player_id.is_none_or(|player_id| {
                game.players
                    .iter()
                    .any(|player| player.player_id == Some(player_id))
            })
        })
        .collect();
    games.sort_by(|a, b| {
        let a_at = a.finished_at.unwrap_or(a.created_at);
        let b_at = b.finished_at.unwrap_or(b.created_at);
        b_at.cmp(&a_at)
    });
    summarize_all(state, games)
}

/// Delete a stored game that is not currently being edited.
pub async fn delete_game(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    if state.active_game_id().await == Some(id) {
        return Err(ServiceError::InvalidState(
            "cannot delete the game that is currently open".into(),
        ));
    }

    if state.games().delete(id).await {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("game `{id}` not found")))
    }
}

/// Records that no longer match a known model are logged and left out of listings.
fn summarize_all(
    state: &SharedState,
    games: Vec<GameEntity>,
) -> Result<Vec<GameSummary>, ServiceError> {
    Ok(games
        .into_iter()
        .filter_map(|game| {
            let game_id = game.id;
            summarize(state, game)
                .inspect_err(|err| warn!(game_id = %game_id, error = %err, "skipping unreadable game"))
                .ok()
        })
        .collect())
}

fn summarize(state: &SharedState, entity: GameEntity) -> Result<GameSummary, ServiceError> {
    let model = state.models().get_model(&entity.model_id).ok_or_else(|| {
        ServiceError::InvalidState(format!(
            "game `{}` references unknown model `{}`",
            entity.id, entity.model_id
        ))
    })?;
    let game = Game::from_entity(entity, model)?;
    Ok(GameSummary::from_game(&game, model))
}

fn validate_seats(model: &GameModel, seats: &[SeatInput]) -> Result<(), ServiceError> {
    if !model.accepts_player_count(seats.len()) {
        return Err(ServiceError::InvalidInput(format!(
            "`{}` requires between {} and {} players (got {})",
            model.label,
            model.min_players,
            model.max_players,
            seats.len()
        )));
    }

    if seats.iter().any(|seat| seat.player_name.trim().is_empty()) {
        return Err(ServiceError::InvalidInput(
            "every player needs a name".into(),
        ));
    }

    let mut seen = HashSet::new();
    for seat in seats {
        let key = seat.player_name.trim().to_lowercase();
        if !seen.insert(key) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate player name `{}`",
                seat.player_name.trim()
            )));
        }
    }

    Ok(())
}

/// `"{label}"` for the first game of a model, `"{label} {n + 1}"` afterwards.
fn default_game_name(model: &GameModel, existing: &[GameEntity]) -> String {
    let same_model = existing
        .iter()
        .filter(|game| game.model_id == model.id)
        .count();
    if same_model == 0 {
        model.label.clone()
    } else {
        format!("{} {}", model.label, same_model + 1)
    }
}

/// Placeholder seats ("Player 3") are not added to the registry.
fn is_placeholder_name(name: &str) -> bool {
    name.strip_prefix(PLACEHOLDER_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}
