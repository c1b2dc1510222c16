use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::navigation::{Location, Navigator};

/// Request a transition to another view.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NavigateRequest {
    pub route: String,
    /// Route parameters, e.g. `{"gameId": "..."}` for the game view.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub params: IndexMap<String, String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationSummary {
    pub route: String,
    #[schema(value_type = Object)]
    pub params: IndexMap<String, String>,
}

impl From<&Location> for LocationSummary {
    fn from(location: &Location) -> Self {
        Self {
            route: location.route.clone(),
            params: location.params.clone(),
        }
    }
}

/// Navigator state after a transition.
#[derive(Debug, Serialize, ToSchema)]
pub struct NavigationState {
    /// Mounted view; absent before the first transition or when no view could mount.
    pub current: Option<LocationSummary>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// Game edited by the mounted view, if it opened one.
    pub active_game_id: Option<Uuid>,
}

impl NavigationState {
    /// Snapshot `navigator` together with the live session id.
    pub fn capture(navigator: &Navigator, active_game_id: Option<Uuid>) -> Self {
        Self {
            current: navigator.current().map(Into::into),
            can_go_back: navigator.can_go_back(),
            can_go_forward: navigator.can_go_forward(),
            active_game_id,
        }
    }
}
