/// OpenAPI documentation generation.
pub mod documentation;
/// Game creation, listing and deletion.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Read access to the game model registry.
pub mod model_service;
/// HTTP facade over the navigator.
pub mod navigation_service;
/// Player registry management.
pub mod player_service;
/// Score entry on the open game.
pub mod session_service;
/// Views mounted by the navigator and their resources.
pub mod view_service;
