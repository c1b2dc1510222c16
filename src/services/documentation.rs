use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Scorekeep backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::models::list_models,
        crate::routes::models::get_model,
        crate::routes::players::list_players,
        crate::routes::players::create_player,
        crate::routes::players::rename_player,
        crate::routes::players::delete_player,
        crate::routes::games::list_games,
        crate::routes::games::create_game,
        crate::routes::games::get_game,
        crate::routes::games::delete_game,
        crate::routes::navigation::current,
        crate::routes::navigation::navigate,
        crate::routes::navigation::back,
        crate::routes::navigation::forward,
        crate::routes::session::current_game,
        crate::routes::session::add_round,
        crate::routes::session::set_round_score,
        crate::routes::session::set_field_score,
        crate::routes::session::rename_game,
        crate::routes::session::finish_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::model::GameModelSummary,
            crate::dto::model::ScoreCategorySummary,
            crate::dto::model::ScoringTypeDto,
            crate::dto::player::PlayerSummary,
            crate::dto::player::CreatePlayerRequest,
            crate::dto::player::RenamePlayerRequest,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::SeatInput,
            crate::dto::game::GameStatusDto,
            crate::dto::game::GameSummary,
            crate::dto::game::PlayerScoreSummary,
            crate::dto::game::StandingSummary,
            crate::dto::navigation::NavigateRequest,
            crate::dto::navigation::NavigationState,
            crate::dto::navigation::LocationSummary,
            crate::dto::session::SetRoundScoreRequest,
            crate::dto::session::SetFieldScoreRequest,
            crate::dto::session::RenameGameRequest,
            crate::dto::session::AddRoundResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "models", description = "Game model registry"),
        (name = "players", description = "Player registry"),
        (name = "games", description = "Game records and history"),
        (name = "navigation", description = "View lifecycle"),
        (name = "session", description = "Score entry on the open game"),
    )
)]
pub struct ApiDoc;
