use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Lifecycle status of a game. Only ever moves from `InProgress` to `Finished`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Scores can still be entered.
    #[default]
    InProgress,
    /// The game is closed; scores are frozen.
    Finished,
}

/// Per-player score record stored inside a [`GameEntity`].
///
/// Both score fields are kept optional on disk; which one is meaningful depends on the
/// scoring type of the owning game model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScoreEntity {
    /// Registry identifier of the player, cleared when the player is deleted.
    #[serde(default)]
    pub player_id: Option<Uuid>,
    /// Display name captured when the game was created.
    pub player_name: String,
    /// One slot per round; `None` marks a round not entered yet.
    #[serde(default)]
    pub scores: Vec<Option<i32>>,
    /// Score per category id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_scores: Option<IndexMap<String, i32>>,
}

/// Aggregate game record persisted in the `games` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: Uuid,
    /// Identifier of the game model the scores follow.
    pub model_id: String,
    /// Display name of the game.
    pub name: String,
    /// Players in seating order.
    pub players: Vec<PlayerScoreEntity>,
    /// Current lifecycle status.
    pub status: GameStatus,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last time the record changed.
    pub updated_at: SystemTime,
    /// Set once when the game is finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<SystemTime>,
}

/// Registered player persisted in the `players` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Unique (case-insensitive) display name.
    pub name: String,
    /// Registration timestamp.
    pub created_at: SystemTime,
}
