use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod games;
pub mod health;
pub mod models;
pub mod navigation;
pub mod players;
pub mod session;

/// Compose all route trees, including the documentation UI, over the shared state.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(models::router())
        .merge(players::router())
        .merge(games::router())
        .merge(navigation::router())
        .merge(session::router())
        .merge(docs::router());

    api_router.with_state(state)
}
