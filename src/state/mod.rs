pub mod debounce;
pub mod game;
pub mod model;
pub mod navigation;
pub mod scoring;
pub mod session;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{
        game::GameRepository, kv_store::KeyValueBackend, persistence::PersistenceStore,
        player::PlayerRepository,
    },
    services::view_service::{self, ViewContext},
    state::{model::ModelRegistry, navigation::Navigator, session::GameSession},
};

/// Reference-counted handle passed to every route.
pub type SharedState = Arc<AppState>;
/// Slot holding the session of the live game view, if any.
pub type SessionSlot = Arc<Mutex<Option<GameSession>>>;

/// Central application state: repositories, model registry, the navigator and the
/// live session it brackets.
pub struct AppState {
    config: AppConfig,
    store: PersistenceStore,
    games: GameRepository,
    players: PlayerRepository,
    models: Arc<ModelRegistry>,
    navigator: Mutex<Navigator>,
    session: SessionSlot,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] with every view registered.
    pub fn new(config: AppConfig, backend: Arc<dyn KeyValueBackend>) -> SharedState {
        let store = PersistenceStore::new(backend);
        let games = GameRepository::new(store.clone());
        let players = PlayerRepository::new(store.clone());
        let models = Arc::new(ModelRegistry::with_extra(config.models.clone()));
        let session: SessionSlot = Arc::new(Mutex::new(None));

        let mut navigator = Navigator::new(&config.default_route);
        view_service::register_views(
            &mut navigator,
            ViewContext {
                games: games.clone(),
                models: Arc::clone(&models),
                session: Arc::clone(&session),
                autosave_delay: config.autosave_delay,
            },
        );

        Arc::new(Self {
            config,
            store,
            games,
            players,
            models,
            navigator: Mutex::new(navigator),
            session,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared persistence handle.
    pub fn store(&self) -> &PersistenceStore {
        &self.store
    }

    /// Repository over the `games` collection.
    pub fn games(&self) -> &GameRepository {
        &self.games
    }

    /// Repository over the `players` collection.
    pub fn players(&self) -> &PlayerRepository {
        &self.players
    }

    /// Known game models.
    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        self.store.is_degraded()
    }

    /// Exclusive access to the navigator. Transitions run while the guard is held.
    pub async fn navigator(&self) -> MutexGuard<'_, Navigator> {
        self.navigator.lock().await
    }

    /// Identifier of the game behind the live session, if any.
    pub async fn active_game_id(&self) -> Option<Uuid> {
        self.session.lock().await.as_ref().map(GameSession::id)
    }

    /// Lock the live session slot. Empty while no game view is mounted.
    pub async fn session(&self) -> MutexGuard<'_, Option<GameSession>> {
        self.session.lock().await
    }

    /// Tear down the live view so pending edits reach storage.
    pub async fn shutdown(&self) {
        self.navigator.lock().await.shutdown().await;
    }
}
