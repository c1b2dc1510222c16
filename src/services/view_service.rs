//! Views mounted by the navigator. Only the game view owns resources: it opens the
//! session for `gameId` and its cleanup closes it, which flushes pending edits before
//! the next view mounts.

use std::{sync::Arc, time::Duration};

use futures::future::{BoxFuture, FutureExt, ready};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::game::GameRepository,
    state::{
        SessionSlot,
        model::ModelRegistry,
        navigation::{Cleanup, Navigator, Params},
        session::GameSession,
    },
};

/// Route of the score sheet view.
pub const GAME_ROUTE: &str = "game";
/// Parameter naming the game shown by [`GAME_ROUTE`].
pub const GAME_ID_PARAM: &str = "gameId";
/// Views without resources of their own.
pub const STATIC_ROUTES: [&str; 6] = ["home", "players", "newGame", "history", "models", "options"];

/// Collaborators captured by the view handlers.
#[derive(Clone)]
pub struct ViewContext {
    /// Repository the game view loads from and persists to.
    pub games: GameRepository,
    /// Registry used to interpret stored games.
    pub models: Arc<ModelRegistry>,
    /// Where the game view installs its session.
    pub session: SessionSlot,
    /// Debounce window for score edits.
    pub autosave_delay: Duration,
}

/// Register every application view on `navigator`.
pub fn register_views(navigator: &mut Navigator, context: ViewContext) {
    for route in STATIC_ROUTES {
        navigator.register_route(route, move |_params| {
            debug!(route, "view mounted");
            ready(None).boxed()
        });
    }

    navigator.register_route(GAME_ROUTE, move |params| {
        mount_game_view(context.clone(), params)
    });
}

fn mount_game_view(context: ViewContext, params: Params) -> BoxFuture<'static, Option<Cleanup>> {
    async move {
        let Some(game_id) = params
            .get(GAME_ID_PARAM)
            .and_then(|raw| Uuid::parse_str(raw).ok())
        else {
            warn!("game view mounted without a valid game id");
            return None;
        };

        let session = match GameSession::open(
            context.games.clone(),
            &context.models,
            game_id,
            context.autosave_delay,
        )
        .await
        {
            Ok(Some(session)) => session,
            Ok(None) => {
                warn!(game_id = %game_id, "game not found; nothing to edit");
                return None;
            }
            Err(err) => {
                warn!(game_id = %game_id, error = %err, "stored game is inconsistent");
                return None;
            }
        };

        let previous = context.session.lock().await.replace(session);
        if let Some(previous) = previous {
            warn!(game_id = %previous.id(), "replacing a session that was never closed");
            previous.close().await;
        }

        let slot = context.session;
        let cleanup: Cleanup = Box::new(move || {
            async move {
                let session = slot.lock().await.take();
                if let Some(session) = session {
                    session.close().await;
                }
            }
            .boxed()
        });
        Some(cleanup)
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use tokio::sync::Mutex;

    use super::*;
    use crate::{
        dao::{kv_store::MemoryBackend, persistence::PersistenceStore},
        state::game::{Game, ScoreSheet},
    };

    fn context() -> (ViewContext, MemoryBackend) {
        let backend = MemoryBackend::new();
        let context = ViewContext {
            games: GameRepository::new(PersistenceStore::new(Arc::new(backend.clone()))),
            models: Arc::new(ModelRegistry::default()),
            session: Arc::new(Mutex::new(None)),
            autosave_delay: Duration::from_secs(60),
        };
        (context, backend)
    }

    fn game_params(id: &str) -> Params {
        let mut params = Params::new();
        params.insert(GAME_ID_PARAM.into(), id.into());
        params
    }

    #[tokio::test]
    async fn leaving_the_game_view_flushes_the_session() {
        let (context, backend) = context();
        let model = context.models.get_model("base").unwrap().clone();
        let game = Game::new(&model, "Base".into(), vec![(None, "A".into())]);
        context.games.insert(game.clone().into()).await;

        let mut navigator = Navigator::default();
        register_views(&mut navigator, context.clone());

        navigator
            .navigate(GAME_ROUTE, game_params(&game.id.to_string()))
            .await;
        {
            let slot = context.session.lock().await;
            let session = slot.as_ref().expect("session installed");
            session.add_round().await.unwrap();
            session.set_round_score(0, 0, Some(7)).await.unwrap();
        }
        let writes_before_exit = backend.write_count();

        navigator.navigate("home", Params::new()).await;

        assert!(context.session.lock().await.is_none());
        assert_eq!(backend.write_count(), writes_before_exit + 1);
        let stored = context.games.find(game.id).await.unwrap();
        let stored = Game::from_entity(stored, &model).unwrap();
        assert_eq!(stored.players[0].sheet, ScoreSheet::Rounds(vec![Some(7)]));
    }

    #[tokio::test]
    async fn unknown_game_mounts_without_session() {
        let (context, _backend) = context();
        let mut navigator = Navigator::default();
        register_views(&mut navigator, context.clone());

        let location = navigator
            .navigate(GAME_ROUTE, game_params(&Uuid::new_v4().to_string()))
            .await
            .unwrap();
        assert_eq!(location.route, GAME_ROUTE);
        assert!(context.session.lock().await.is_none());

        navigator.navigate(GAME_ROUTE, game_params("not-a-uuid")).await;
        assert!(context.session.lock().await.is_none());
    }
}
