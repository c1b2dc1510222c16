use crate::{
    dto::navigation::NavigationState,
    state::{SharedState, navigation::Params},
};

/// Current navigator state.
pub async fn current(state: &SharedState) -> NavigationState {
    let navigator = state.navigator().await;
    let active_game_id = state.active_game_id().await;
    NavigationState::capture(&navigator, active_game_id)
}

/// Leave the live view and mount `route`.
pub async fn navigate(state: &SharedState, route: &str, params: Params) -> NavigationState {
    let mut navigator = state.navigator().await;
    navigator.navigate(route, params).await;
    let active_game_id = state.active_game_id().await;
    NavigationState::capture(&navigator, active_game_id)
}

/// Step back in history. A no-op at the start of history.
pub async fn back(state: &SharedState) -> NavigationState {
    let mut navigator = state.navigator().await;
    navigator.back().await;
    let active_game_id = state.active_game_id().await;
    NavigationState::capture(&navigator, active_game_id)
}

/// Step forward in history. A no-op at the end of history.
pub async fn forward(state: &SharedState) -> NavigationState {
    let mut navigator = state.navigator().await;
    navigator.forward().await;
    let active_game_id = state.active_game_id().await;
    NavigationState::capture(&navigator, active_game_id)
}
