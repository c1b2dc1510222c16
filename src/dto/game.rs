use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{format_system_time, model::ScoringTypeDto, validation::validate_display_name},
    state::{
        game::{Game, GameStatus, PlayerScore, ScoreSheet},
        model::GameModel,
        scoring::{self, Standing},
    },
};

/// Payload used to start a brand-new game.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGameRequest {
    pub model_id: String,
    /// Display name. When omitted or blank the model label is used, suffixed with a
    /// counter once the model already has games.
    #[serde(default)]
    pub name: Option<String>,
    /// Players in seating order.
    pub players: Vec<SeatInput>,
}

/// One seat of a new game.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SeatInput {
    /// Registered player to seat. Ignored for named seats, which are matched by name.
    #[serde(default)]
    pub player_id: Option<Uuid>,
    pub player_name: String,
}

impl Validate for CreateGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = self.name.as_deref().filter(|name| !name.trim().is_empty()) {
            if let Err(e) = validate_display_name(name) {
                errors.add("name", e);
            }
        }

        for seat in &self.players {
            if let Err(e) = validate_display_name(&seat.player_name) {
                errors.add("players", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Lifecycle status exposed to clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatusDto {
    InProgress,
    Finished,
}

impl From<GameStatus> for GameStatusDto {
    fn from(value: GameStatus) -> Self {
        match value {
            GameStatus::InProgress => GameStatusDto::InProgress,
            GameStatus::Finished => GameStatusDto::Finished,
        }
    }
}

/// Query string of `GET /games`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GameListQuery {
    /// `in_progress` (default) or `finished`.
    pub status: Option<GameStatusDto>,
    /// Only finished games of this model.
    pub model_id: Option<String>,
    /// Only finished games this registered player took part in.
    pub player_id: Option<Uuid>,
}

/// Filters applied to the finished games list.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub model_id: Option<String>,
    pub player_id: Option<Uuid>,
}

impl From<&GameListQuery> for HistoryFilter {
    fn from(query: &GameListQuery) -> Self {
        Self {
            model_id: query.model_id.clone(),
            player_id: query.player_id,
        }
    }
}

/// Scores of one seat.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerScoreSummary {
    pub player_id: Option<Uuid>,
    pub player_name: String,
    /// Present for rounds games; `null` entries are rounds not entered yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<Option<i32>>>,
    /// Present for calculated games.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub field_scores: Option<IndexMap<String, i32>>,
    pub total: i64,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StandingSummary {
    /// Seat of the player in [`GameSummary::players`].
    pub player_index: usize,
    pub player_name: String,
    pub total: i64,
    pub rank: usize,
}

/// Game as returned by the games and session routes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameSummary {
    pub id: Uuid,
    pub model_id: String,
    pub model_label: String,
    #[serde(rename = "type")]
    pub scoring: ScoringTypeDto,
    pub name: String,
    pub status: GameStatusDto,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    pub round_count: usize,
    /// Seats in seating order.
    pub players: Vec<PlayerScoreSummary>,
    /// Rows sorted by rank.
    pub standings: Vec<StandingSummary>,
    /// False while ranks carry no information yet.
    pub show_ranks: bool,
}

impl GameSummary {
    /// Project `game` together with its leaderboard.
    pub fn from_game(game: &Game, model: &GameModel) -> Self {
        let standings = scoring::standings(game);

        Self {
            id: game.id,
            model_id: game.model_id.clone(),
            model_label: model.label.clone(),
            scoring: model.scoring.into(),
            name: game.name.clone(),
            status: game.status.into(),
            created_at: format_system_time(game.created_at),
            updated_at: format_system_time(game.updated_at),
            finished_at: game.finished_at.map(format_system_time),
            round_count: game.round_count(),
            players: game.players.iter().map(Into::into).collect(),
            standings: standings.rows.into_iter().map(Into::into).collect(),
            show_ranks: standings.show_ranks,
        }
    }
}

impl From<&PlayerScore> for PlayerScoreSummary {
    fn from(player: &PlayerScore) -> Self {
        let (scores, field_scores) = match &player.sheet {
            ScoreSheet::Rounds(scores) => (Some(scores.clone()), None),
            ScoreSheet::Calculated(fields) => (None, Some(fields.clone())),
        };
        Self {
            player_id: player.player_id,
            player_name: player.player_name.clone(),
            scores,
            field_scores,
            total: scoring::total(player),
        }
    }
}

impl From<Standing> for StandingSummary {
    fn from(row: Standing) -> Self {
        Self {
            player_index: row.player_index,
            player_name: row.player_name,
            total: row.total,
            rank: row.rank,
        }
    }
}
