//! Single-live-view navigation lifecycle.
//!
//! Every transition, whether a fresh navigation or history motion, runs the outgoing
//! view's cleanup to completion before the incoming view's handler starts.

use std::{collections::HashMap, sync::Arc};

use futures::future::BoxFuture;
use indexmap::IndexMap;
use tracing::{debug, error, warn};

/// Route parameters, e.g. `gameId`.
pub type Params = IndexMap<String, String>;
/// Teardown registered by a mounted view.
pub type Cleanup = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send + Sync>;
/// Mounts a view for the given params and optionally returns its cleanup.
pub type RouteHandler = Arc<dyn Fn(Params) -> BoxFuture<'static, Option<Cleanup>> + Send + Sync>;

/// Route name mounted when an unknown route is requested.
pub const DEFAULT_ROUTE: &str = "home";

/// Where the application currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Registered route name.
    pub route: String,
    /// Parameters passed to the route handler.
    pub params: Params,
}

/// Route registry plus the state of the one live view.
pub struct Navigator {
    routes: HashMap<String, RouteHandler>,
    default_route: String,
    current: Option<Location>,
    cleanup: Option<Cleanup>,
    history: Vec<Location>,
    cursor: usize,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE)
    }
}

impl Navigator {
    /// Navigator falling back to `default_route` on unknown names.
    pub fn new(default_route: &str) -> Self {
        Self {
            routes: HashMap::new(),
            default_route: default_route.to_string(),
            current: None,
            cleanup: None,
            history: Vec::new(),
            cursor: 0,
        }
    }

    /// Register (or replace) the handler for `name`.
    pub fn register_route<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(Params) -> BoxFuture<'static, Option<Cleanup>> + Send + Sync + 'static,
    {
        self.routes.insert(name.to_string(), Arc::new(handler));
    }

    /// Currently mounted location, `None` before the first navigation.
    pub fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    /// Whether a [`Navigator::back`] would move.
    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    /// Whether a [`Navigator::forward`] would move.
    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    /// Tear down the live view and mount `name`.
    ///
    /// Unknown names are logged and replaced by the default route. Returns the mounted
    /// location, or `None` when even the default route is missing.
    pub async fn navigate(&mut self, name: &str, params: Params) -> Option<Location> {
        let location = self.transition(name, params).await?;
        if !self.history.is_empty() {
            self.history.truncate(self.cursor + 1);
        }
        self.history.push(location.clone());
        self.cursor = self.history.len() - 1;
        Some(location)
    }

    /// Step back in history, remounting the previous location. The cursor only moves
    /// when something was mounted.
    pub async fn back(&mut self) -> Option<Location> {
        if !self.can_go_back() {
            return None;
        }
        self.revisit(self.cursor - 1).await
    }

    /// Step forward in history, remounting the next location. The cursor only moves
    /// when something was mounted.
    pub async fn forward(&mut self) -> Option<Location> {
        if !self.can_go_forward() {
            return None;
        }
        self.revisit(self.cursor + 1).await
    }

    /// Run the live view's cleanup and leave no view mounted.
    pub async fn shutdown(&mut self) {
        self.run_cleanup().await;
        self.current = None;
    }

    async fn revisit(&mut self, target: usize) -> Option<Location> {
        let Location { route, params } = self.history.get(target)?.clone();
        let location = self.transition(&route, params).await?;
        self.cursor = target;
        Some(location)
    }

    async fn transition(&mut self, name: &str, params: Params) -> Option<Location> {
        self.run_cleanup().await;

        let (location, handler) = match self.routes.get(name) {
            Some(handler) => (
                Location {
                    route: name.to_string(),
                    params,
                },
                Arc::clone(handler),
            ),
            None => {
                warn!(route = %name, fallback = %self.default_route, "route not found");
                let Some(handler) = self.routes.get(&self.default_route) else {
                    error!(route = %self.default_route, "default route is not registered");
                    self.current = None;
                    return None;
                };
                (
                    Location {
                        route: self.default_route.clone(),
                        params: Params::new(),
                    },
                    Arc::clone(handler),
                )
            }
        };

        self.current = Some(location.clone());
        debug!(route = %location.route, "mounting view");
        self.cleanup = handler(location.params.clone()).await;
        Some(location)
    }

    async fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::future::FutureExt;

    use super::*;

    type Journal = Arc<Mutex<Vec<String>>>;

    fn record(journal: &Journal, entry: String) {
        journal.lock().unwrap().push(entry);
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    /// Register `name` as a view that logs its mount and, when `with_cleanup`, its cleanup.
    fn register(navigator: &mut Navigator, journal: &Journal, name: &'static str, with_cleanup: bool) {
        let journal = Arc::clone(journal);
        navigator.register_route(name, move |params: Params| {
            let journal = Arc::clone(&journal);
            async move {
                let suffix = params.get("id").map(|id| format!(":{id}")).unwrap_or_default();
                record(&journal, format!("mount {name}{suffix}"));
                if !with_cleanup {
                    return None;
                }
                let cleanup: Cleanup = Box::new(move || {
                    async move {
                        record(&journal, format!("cleanup {name}{suffix}"));
                    }
                    .boxed()
                });
                Some(cleanup)
            }
            .boxed()
        });
    }

    fn params(id: &str) -> Params {
        let mut params = Params::new();
        params.insert("id".into(), id.into());
        params
    }

    #[tokio::test]
    async fn cleanup_runs_once_before_next_mount() {
        let journal = Journal::default();
        let mut navigator = Navigator::default();
        register(&mut navigator, &journal, "home", false);
        register(&mut navigator, &journal, "game", true);

        navigator.navigate("game", params("1")).await;
        navigator.navigate("home", Params::new()).await;
        navigator.navigate("home", Params::new()).await;

        assert_eq!(
            entries(&journal),
            ["mount game:1", "cleanup game:1", "mount home", "mount home"]
        );
    }

    #[tokio::test]
    async fn unknown_route_falls_back_to_default() {
        let journal = Journal::default();
        let mut navigator = Navigator::default();
        register(&mut navigator, &journal, "home", false);
        register(&mut navigator, &journal, "game", true);

        navigator.navigate("game", params("1")).await;
        let location = navigator.navigate("nowhere", params("2")).await.unwrap();

        assert_eq!(location.route, "home");
        assert!(location.params.is_empty());
        assert_eq!(navigator.current(), Some(&location));
        assert_eq!(entries(&journal), ["mount game:1", "cleanup game:1", "mount home"]);
    }

    #[tokio::test]
    async fn missing_default_route_leaves_no_view() {
        let journal = Journal::default();
        let mut navigator = Navigator::default();
        register(&mut navigator, &journal, "game", true);

        navigator.navigate("game", params("1")).await;
        assert_eq!(navigator.navigate("nowhere", Params::new()).await, None);

        assert_eq!(navigator.current(), None);
        assert_eq!(entries(&journal), ["mount game:1", "cleanup game:1"]);
    }

    #[tokio::test]
    async fn history_motion_goes_through_cleanup() {
        let journal = Journal::default();
        let mut navigator = Navigator::default();
        register(&mut navigator, &journal, "home", false);
        register(&mut navigator, &journal, "game", true);

        navigator.navigate("home", Params::new()).await;
        navigator.navigate("game", params("1")).await;
        assert!(!navigator.can_go_forward());

        assert_eq!(navigator.back().await.unwrap().route, "home");
        assert_eq!(navigator.forward().await.unwrap().params, params("1"));
        assert_eq!(navigator.forward().await, None);
        navigator.shutdown().await;

        assert_eq!(
            entries(&journal),
            [
                "mount home",
                "mount game:1",
                "cleanup game:1",
                "mount home",
                "mount game:1",
                "cleanup game:1",
            ]
        );
        assert_eq!(navigator.current(), None);
    }

    #[tokio::test]
    async fn navigating_after_back_drops_forward_entries() {
        let journal = Journal::default();
        let mut navigator = Navigator::default();
        register(&mut navigator, &journal, "home", false);
        register(&mut navigator, &journal, "players", false);
        register(&mut navigator, &journal, "history", false);

        navigator.navigate("home", Params::new()).await;
        navigator.navigate("players", Params::new()).await;
        navigator.back().await;
        navigator.navigate("history", Params::new()).await;

        assert!(!navigator.can_go_forward());
        assert_eq!(navigator.back().await.unwrap().route, "home");
    }

    #[tokio::test]
    async fn failed_history_motion_keeps_the_cursor() {
        let journal = Journal::default();
        let mut navigator = Navigator::default();
        register(&mut navigator, &journal, "game", true);
        register(&mut navigator, &journal, "players", false);

        navigator.navigate("game", params("1")).await;
        navigator.navigate("players", Params::new()).await;
        navigator.routes.remove("game");

        assert_eq!(navigator.back().await, None);
        assert!(navigator.can_go_back());
        assert!(!navigator.can_go_forward());
        assert_eq!(navigator.current(), None);

        register(&mut navigator, &journal, "game", true);
        assert_eq!(navigator.back().await.unwrap().params, params("1"));
        assert!(!navigator.can_go_back());
        assert!(navigator.can_go_forward());
    }
}
