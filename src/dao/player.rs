use uuid::Uuid;

use crate::dao::{models::PlayerEntity, persistence::PersistenceStore};

const PLAYER_COLLECTION_NAME: &str = "players";

/// Data Access Object over the `players` collection.
#[derive(Clone)]
pub struct PlayerRepository {
    store: PersistenceStore,
}

impl PlayerRepository {
    /// Build a repository over the given store.
    pub fn new(store: PersistenceStore) -> Self {
        Self { store }
    }

    /// Every registered player, in registration order.
    pub async fn list(&self) -> Vec<PlayerEntity> {
        self.store.get(PLAYER_COLLECTION_NAME, Vec::new()).await
    }

    /// Fetch a player by id.
    pub async fn find(&self, id: Uuid) -> Option<PlayerEntity> {
        self.list().await.into_iter().find(|player| player.id == id)
    }

    /// Fetch a player by name, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> Option<PlayerEntity> {
        let needle = name.trim().to_lowercase();
        self.list()
            .await
            .into_iter()
            .find(|player| player.name.to_lowercase() == needle)
    }

    /// Edit the collection under the store's write gate. Written back only when `edit`
    /// changed something.
    pub async fn modify<R, F>(&self, edit: F) -> R
    where
        F: FnOnce(&mut Vec<PlayerEntity>) -> R,
    {
        self.store.modify(PLAYER_COLLECTION_NAME, Vec::new(), edit).await
    }
}
