use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::PlayerEntity,
    dto::player::PlayerSummary,
    error::ServiceError,
    state::SharedState,
};

/// Every registered player, sorted by name.
pub async fn list_players(state: &SharedState) -> Vec<PlayerSummary> {
    let mut players = state.players().list().await;
    players.sort_by_key(|player| player.name.to_lowercase());
    players.into_iter().map(Into::into).collect()
}

/// Fetch one registered player.
pub async fn get_player(state: &SharedState, id: Uuid) -> Result<PlayerSummary, ServiceError> {
    state
        .players()
        .find(id)
        .await
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound(format!("player `{id}` not found")))
}

/// Register a new player. Names are unique regardless of case.
pub async fn add_player(state: &SharedState, name: &str) -> Result<PlayerSummary, ServiceError> {
    let name = normalized_name(name)?;
    let player = state
        .players()
        .modify(|players| -> Result<PlayerEntity, ServiceError> {
            ensure_name_free(players, &name, None)?;
            let player = new_player(name.clone());
            players.push(player.clone());
            Ok(player)
        })
        .await?;

    info!(player_id = %player.id, name = %player.name, "player registered");
    Ok(player.into())
}

/// Look a player up by name, ignoring case and surrounding whitespace.
pub async fn find_player_by_name(state: &SharedState, name: &str) -> Option<PlayerSummary> {
    state.players().find_by_name(name).await.map(Into::into)
}

/// Return the player registered under `name`, registering it when missing. Lookup and
/// registration happen in one write so two callers never register the same name twice.
pub async fn find_or_register(
    state: &SharedState,
    name: &str,
) -> Result<PlayerSummary, ServiceError> {
    let name = normalized_name(name)?;
    let needle = name.to_lowercase();
    let (player, created) = state
        .players()
        .modify(|players| {
            if let Some(existing) = players
                .iter()
                .find(|player| player.name.to_lowercase() == needle)
            {
                return (existing.clone(), false);
            }
            let player = new_player(name);
            players.push(player.clone());
            (player, true)
        })
        .await;

    if created {
        info!(player_id = %player.id, name = %player.name, "player registered");
    }
    Ok(player.into())
}

/// Rename a player and rewrite the name snapshot in every game they sat at, the live
/// one included.
pub async fn rename_player(
    state: &SharedState,
    id: Uuid,
    name: &str,
) -> Result<PlayerSummary, ServiceError> {
    let name = normalized_name(name)?;
    // Held until storage is rewritten so the live game cannot close in between.
    let session = state.session().await;
    let renamed = state
        .players()
        .modify(|players| -> Result<PlayerEntity, ServiceError> {
            ensure_name_free(players, &name, Some(id))?;
            let Some(player) = players.iter_mut().find(|player| player.id == id) else {
                return Err(ServiceError::NotFound(format!("player `{id}` not found")));
            };
            player.name = name.clone();
            Ok(player.clone())
        })
        .await?;

    if let Some(session) = session.as_ref() {
        session.rename_player(id, &name).await;
    }
    let games = state.games().rename_player_everywhere(id, &name).await;
    drop(session);

    info!(player_id = %id, name = %name, games, "player renamed");
    Ok(renamed.into())
}

/// Remove a player from the registry. Their seats in existing games, the live one
/// included, keep the scores under an anonymous name.
pub async fn remove_player(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let session = state.session().await;
    let removed = state
        .players()
        .modify(|players| {
            let before = players.len();
            players.retain(|player| player.id != id);
            players.len() != before
        })
        .await;
    if !removed {
        return Err(ServiceError::NotFound(format!("player `{id}` not found")));
    }

    if let Some(session) = session.as_ref() {
        session.detach_player(id).await;
    }
    let games = state.games().anonymize_player_everywhere(id).await;
    drop(session);

    info!(player_id = %id, games, "player removed");
    Ok(())
}

fn new_player(name: String) -> PlayerEntity {
    PlayerEntity {
        id: Uuid::new_v4(),
        name,
        created_at: SystemTime::now(),
    }
}

fn normalized_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput("player name must not be empty".into()));
    }
    Ok(name.to_string())
}

fn ensure_name_free(
    players: &[PlayerEntity],
    name: &str,
    except: Option<Uuid>,
) -> Result<(), ServiceError> {
    let needle = name.to_lowercase();
    let taken = players
        .iter()
        .filter(|player| Some(player.id) != except)
        .any(|player| player.name.to_lowercase() == needle);
    if taken {
        return Err(ServiceError::InvalidInput(format!(
            "a player named `{name}` already exists"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{game::DELETED_PLAYER_NAME, kv_store::MemoryBackend},
        dto::game::{CreateGameRequest, SeatInput},
        services::game_service,
        state::AppState,
    };

    fn state() -> SharedState {
        AppState::new(AppConfig::default(), Arc::new(MemoryBackend::new()))
    }

    async fn seat_game(state: &SharedState, names: &[&str]) -> Uuid {
        let request = CreateGameRequest {
            model_id: "base".into(),
            name: None,
            players: names
                .iter()
                .map(|name| SeatInput {
                    player_id: None,
                    player_name: name.to_string(),
                })
                .collect(),
        };
        game_service::create_game(state, request).await.unwrap().id
    }

    #[tokio::test]
    async fn names_are_unique_ignoring_case() {
        let state = state();
        add_player(&state, " Anna ").await.unwrap();

        let duplicate = add_player(&state, "ANNA").await;
        assert!(matches!(duplicate, Err(ServiceError::InvalidInput(_))));
        assert!(matches!(
            add_player(&state, "   ").await,
            Err(ServiceError::InvalidInput(_))
        ));

        assert!(find_player_by_name(&state, " anna ").await.is_some());

        let bob = add_player(&state, "bob").await.unwrap();
        let names: Vec<String> = list_players(&state).await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Anna", "bob"]);

        let clash = rename_player(&state, bob.id, "anna").await;
        assert!(matches!(clash, Err(ServiceError::InvalidInput(_))));
        // Changing only the case of one's own name is allowed.
        rename_player(&state, bob.id, "Bob").await.unwrap();
    }

    #[tokio::test]
    async fn rename_rewrites_game_snapshots() {
        let state = state();
        let game_id = seat_game(&state, &["Anna", "Player 2"]).await;
        let anna = state.players().find_by_name("anna").await.unwrap();

        let renamed = rename_player(&state, anna.id, "Annabelle").await.unwrap();
        assert_eq!(renamed.name, "Annabelle");

        let game = state.games().find(game_id).await.unwrap();
        assert_eq!(game.players[0].player_name, "Annabelle");
        assert_eq!(game.players[1].player_name, "Player 2");
    }

    #[tokio::test]
    async fn removal_anonymizes_seats() {
        let state = state();
        let game_id = seat_game(&state, &["Anna", "Bob"]).await;
        let anna = state.players().find_by_name("Anna").await.unwrap();

        remove_player(&state, anna.id).await.unwrap();

        assert!(matches!(
            get_player(&state, anna.id).await,
            Err(ServiceError::NotFound(_))
        ));
        let game = state.games().find(game_id).await.unwrap();
        assert_eq!(game.players[0].player_name, DELETED_PLAYER_NAME);
        assert_eq!(game.players[0].player_id, None);
        assert_eq!(game.players[1].player_name, "Bob");
        assert!(matches!(
            remove_player(&state, anna.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_of_one_name_create_one_player() {
        let state = state();

        let tasks: Vec<_> = (0..12)
            .map(|n| {
                let state = Arc::clone(&state);
                let name = if n % 2 == 0 { "Carol" } else { " carol " };
                tokio::spawn(async move { find_or_register(&state, name).await.unwrap().id })
            })
            .collect();
        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }

        assert_eq!(state.players().list().await.len(), 1);
        assert!(ids.iter().all(|id| *id == ids[0]));
    }
}
