//! Operations on the game opened by the live game view.

use crate::{
    dto::{game::GameSummary, session::AddRoundResponse},
    error::ServiceError,
    state::{SharedState, session::GameSession},
};

fn no_session() -> ServiceError {
    ServiceError::InvalidState("no game is open; navigate to the game view first".into())
}

async fn summary(session: &GameSession) -> GameSummary {
    GameSummary::from_game(&session.snapshot().await, session.model())
}

/// Current state of the open game, with its leaderboard.
pub async fn current_game(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let slot = state.session().await;
    let session = slot.as_ref().ok_or_else(no_session)?;
    Ok(summary(session).await)
}

/// Append a round to every player of the open game.
pub async fn add_round(state: &SharedState) -> Result<AddRoundResponse, ServiceError> {
    let slot = state.session().await;
    let session = slot.as_ref().ok_or_else(no_session)?;
    let round_count = session.add_round().await?;
    Ok(AddRoundResponse { round_count })
}

/// Set or clear one round score of the open game.
pub async fn set_round_score(
    state: &SharedState,
    player_index: usize,
    round_index: usize,
    value: Option<i32>,
) -> Result<GameSummary, ServiceError> {
    let slot = state.session().await;
    let session = slot.as_ref().ok_or_else(no_session)?;
    session
        .set_round_score(player_index, round_index, value)
        .await?;
    Ok(summary(session).await)
}

/// Set one category score of the open game.
pub async fn set_field_score(
    state: &SharedState,
    player_index: usize,
    category_id: &str,
    value: i32,
) -> Result<GameSummary, ServiceError> {
    let slot = state.session().await;
    let session = slot.as_ref().ok_or_else(no_session)?;
    session
        .set_field_score(player_index, category_id, value)
        .await?;
    Ok(summary(session).await)
}

/// Rename the open game.
pub async fn rename(state: &SharedState, name: &str) -> Result<GameSummary, ServiceError> {
    let slot = state.session().await;
    let session = slot.as_ref().ok_or_else(no_session)?;
    session.rename(name).await?;
    Ok(summary(session).await)
}

/// Finish the open game and persist it immediately.
pub async fn finish(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let slot = state.session().await;
    let session = slot.as_ref().ok_or_else(no_session)?;
    session.finish().await?;
    Ok(summary(session).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::kv_store::MemoryBackend,
        dto::game::{CreateGameRequest, GameStatusDto, SeatInput},
        services::{game_service, navigation_service, view_service},
        state::{AppState, navigation::Params, session::SessionError},
    };

    async fn open_game(state: &SharedState, model_id: &str) -> uuid::Uuid {
        let request = CreateGameRequest {
            model_id: model_id.into(),
            name: None,
            players: ["A", "B"]
                .iter()
                .map(|name| SeatInput {
                    player_id: None,
                    player_name: name.to_string(),
                })
                .collect(),
        };
        let game = game_service::create_game(state, request).await.unwrap();
        let mut params = Params::new();
        params.insert(view_service::GAME_ID_PARAM.into(), game.id.to_string());
        navigation_service::navigate(state, view_service::GAME_ROUTE, params).await;
        game.id
    }

    #[tokio::test]
    async fn operations_require_an_open_game() {
        let state = AppState::new(AppConfig::default(), Arc::new(MemoryBackend::new()));
        assert!(matches!(
            add_round(&state).await,
            Err(ServiceError::InvalidState(_))
        ));
        assert!(matches!(
            current_game(&state).await,
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn scores_flow_into_the_leaderboard() {
        let state = AppState::new(AppConfig::default(), Arc::new(MemoryBackend::new()));
        let game_id = open_game(&state, "base").await;
        assert_eq!(state.active_game_id().await, Some(game_id));

        assert_eq!(add_round(&state).await.unwrap().round_count, 1);
        set_round_score(&state, 0, 0, Some(12)).await.unwrap();
        let game = set_round_score(&state, 1, 0, Some(20)).await.unwrap();

        assert!(game.show_ranks);
        assert_eq!(game.standings[0].player_name, "B");
        assert_eq!(game.standings[0].rank, 1);
        assert_eq!(game.standings[1].rank, 2);

        let wrong = set_field_score(&state, 0, "animaux", 3).await;
        assert!(matches!(
            wrong,
            Err(ServiceError::Session(SessionError::WrongModel { .. }))
        ));
    }

    #[tokio::test]
    async fn finished_games_reject_scores_but_accept_renames() {
        let state = AppState::new(AppConfig::default(), Arc::new(MemoryBackend::new()));
        let game_id = open_game(&state, "harmonies").await;

        set_field_score(&state, 0, "animaux", 8).await.unwrap();
        let finished = finish(&state).await.unwrap();
        assert_eq!(finished.status, GameStatusDto::Finished);

        let stored = state.games().find(game_id).await.unwrap();
        assert!(stored.finished_at.is_some());

        assert!(matches!(
            set_field_score(&state, 0, "animaux", 1).await,
            Err(ServiceError::Session(SessionError::Finished(_)))
        ));
        let renamed = rename(&state, "Sunday match").await.unwrap();
        assert_eq!(renamed.name, "Sunday match");

        assert!(matches!(
            game_service::delete_game(&state, game_id).await,
            Err(ServiceError::InvalidState(_))
        ));
    }
}
