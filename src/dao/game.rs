use std::time::SystemTime;

use uuid::Uuid;

use crate::dao::{
    models::{GameEntity, PlayerScoreEntity},
    persistence::PersistenceStore,
};

const GAME_COLLECTION_NAME: &str = "games";
/// Name written over a player's snapshot once the player leaves the registry.
pub const DELETED_PLAYER_NAME: &str = "Deleted player";

/// Data Access Object over the `games` collection.
///
/// The whole collection is read and rewritten on every change, under the store's write
/// gate, so concurrent writers never drop each other's records.
#[derive(Clone)]
pub struct GameRepository {
    store: PersistenceStore,
}

impl GameRepository {
    /// Build a repository over the given store.
    pub fn new(store: PersistenceStore) -> Self {
        Self { store }
    }

    /// Every persisted game, in insertion order.
    pub async fn list(&self) -> Vec<GameEntity> {
        self.store.get(GAME_COLLECTION_NAME, Vec::new()).await
    }

    /// Fetch a game by id.
    pub async fn find(&self, id: Uuid) -> Option<GameEntity> {
        self.list().await.into_iter().find(|game| game.id == id)
    }

    /// Append a freshly created game.
    pub async fn insert(&self, game: GameEntity) {
        self.store
            .modify(GAME_COLLECTION_NAME, Vec::new(), |games: &mut Vec<GameEntity>| {
                games.push(game)
            })
            .await;
    }

    /// Replace the stored record with the same id. Returns `false` when the game no
    /// longer exists (it was deleted meanwhile), in which case nothing is written.
    pub async fn save(&self, game: &GameEntity) -> bool {
        self.store
            .modify(GAME_COLLECTION_NAME, Vec::new(), |games: &mut Vec<GameEntity>| {
                match games.iter_mut().find(|existing| existing.id == game.id) {
                    Some(slot) => {
                        *slot = game.clone();
                        true
                    }
                    None => false,
                }
            })
            .await
    }

    /// Apply `update` to the stored record and bump its `updated_at`.
    pub async fn update<F>(&self, id: Uuid, update: F) -> Option<GameEntity>
    where
        F: FnOnce(&mut GameEntity),
    {
        let edit = |games: &mut Vec<GameEntity>| -> Option<GameEntity> {
            let game = games.iter_mut().find(|game| game.id == id)?;
            update(game);
            game.updated_at = SystemTime::now();
            Some(game.clone())
        };
        self.store.modify(GAME_COLLECTION_NAME, Vec::new(), edit).await
    }

    /// Remove a game. Returns whether something was deleted.
    pub async fn delete(&self, id: Uuid) -> bool {
        self.store
            .modify(GAME_COLLECTION_NAME, Vec::new(), |games: &mut Vec<GameEntity>| {
                let before = games.len();
                games.retain(|game| game.id != id);
                games.len() != before
            })
            .await
    }

    /// Rewrite the name snapshot of `player_id` in every game.
    pub async fn rename_player_everywhere(&self, player_id: Uuid, name: &str) -> usize {
        self.rewrite_player_snapshots(player_id, |snapshot| {
            snapshot.player_name = name.to_string();
        })
        .await
    }

    /// Detach `player_id` from every game, keeping the scores.
    pub async fn anonymize_player_everywhere(&self, player_id: Uuid) -> usize {
        self.rewrite_player_snapshots(player_id, |snapshot| {
            snapshot.player_name = DELETED_PLAYER_NAME.to_string();
            snapshot.player_id = None;
        })
        .await
    }

    async fn rewrite_player_snapshots<F>(&self, player_id: Uuid, mut rewrite: F) -> usize
    where
        F: FnMut(&mut PlayerScoreEntity),
    {
        self.store
            .modify(GAME_COLLECTION_NAME, Vec::new(), |games: &mut Vec<GameEntity>| {
                let mut touched = 0;
                for snapshot in games
                    .iter_mut()
                    .flat_map(|game| game.players.iter_mut())
                    .filter(|snapshot| snapshot.player_id == Some(player_id))
                {
                    rewrite(snapshot);
                    touched += 1;
                }
                touched
            })
            .await
    }
}
