use std::time::SystemTime;

use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

pub use crate::dao::models::GameStatus;
use crate::{
    dao::models::{GameEntity, PlayerScoreEntity},
    state::model::{GameModel, ScoringType},
};

/// Scores of one player. The variant is chosen once from the game model and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreSheet {
    /// One slot per round; `None` is a round not entered yet (counts as 0).
    Rounds(Vec<Option<i32>>),
    /// Score per category id, in entry order.
    Calculated(IndexMap<String, i32>),
}

impl ScoreSheet {
    /// Empty sheet matching the given scoring type.
    pub fn empty(scoring: ScoringType) -> Self {
        match scoring {
            ScoringType::Rounds => ScoreSheet::Rounds(Vec::new()),
            ScoringType::Calculated => ScoreSheet::Calculated(IndexMap::new()),
        }
    }

    /// Scoring type this sheet belongs to.
    pub fn scoring(&self) -> ScoringType {
        match self {
            ScoreSheet::Rounds(_) => ScoringType::Rounds,
            ScoreSheet::Calculated(_) => ScoringType::Calculated,
        }
    }
}

/// A seated player and their scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScore {
    /// Registry identifier, `None` for placeholders and deleted players.
    pub player_id: Option<Uuid>,
    /// Name snapshot taken when the game was created.
    pub player_name: String,
    /// Scores entered so far.
    pub sheet: ScoreSheet,
}

/// A recorded game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Primary key of the game.
    pub id: Uuid,
    /// Game model the scores follow.
    pub model_id: String,
    /// Display name.
    pub name: String,
    /// Players in seating order (not rank order).
    pub players: Vec<PlayerScore>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Bumped by every mutation.
    pub updated_at: SystemTime,
    /// Set once by the finish transition.
    pub finished_at: Option<SystemTime>,
}

/// A persisted record that does not match its game model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InconsistentGame {
    /// The record references another model than the one supplied.
    #[error("game `{game_id}` uses model `{expected}`, not `{actual}`")]
    ModelMismatch {
        /// Game identifier.
        game_id: Uuid,
        /// Model id stored in the record.
        expected: String,
        /// Model id supplied for conversion.
        actual: String,
    },
    /// A calculated game has a player without a category map.
    #[error("game `{game_id}` player #{player_index} has no category scores")]
    MissingFieldScores {
        /// Game identifier.
        game_id: Uuid,
        /// Offending seat.
        player_index: usize,
    },
    /// Rounds players do not share the same number of rounds.
    #[error("game `{game_id}` has uneven round counts")]
    UnevenRounds {
        /// Game identifier.
        game_id: Uuid,
    },
}

impl Game {
    /// Build a new in-progress game for `model` with the given seats.
    pub fn new(model: &GameModel, name: String, seats: Vec<(Option<Uuid>, String)>) -> Self {
        let timestamp = SystemTime::now();
        let players = seats
            .into_iter()
            .map(|(player_id, player_name)| PlayerScore {
                player_id,
                player_name,
                sheet: ScoreSheet::empty(model.scoring),
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            model_id: model.id.clone(),
            name,
            players,
            status: GameStatus::InProgress,
            created_at: timestamp,
            updated_at: timestamp,
            finished_at: None,
        }
    }

    /// Rebuild a game from its record, picking the sheet variant from `model`.
    pub fn from_entity(entity: GameEntity, model: &GameModel) -> Result<Self, InconsistentGame> {
        if entity.model_id != model.id {
            return Err(InconsistentGame::ModelMismatch {
                game_id: entity.id,
                expected: entity.model_id,
                actual: model.id.clone(),
            });
        }

        let game_id = entity.id;
        let players = entity
            .players
            .into_iter()
            .enumerate()
            .map(|(player_index, player)| {
                let sheet = match model.scoring {
                    ScoringType::Rounds => ScoreSheet::Rounds(player.scores),
                    ScoringType::Calculated => ScoreSheet::Calculated(
                        player
                            .field_scores
                            .ok_or(InconsistentGame::MissingFieldScores {
                                game_id,
                                player_index,
                            })?,
                    ),
                };
                Ok(PlayerScore {
                    player_id: player.player_id,
                    player_name: player.player_name,
                    sheet,
                })
            })
            .collect::<Result<Vec<_>, InconsistentGame>>()?;

        let game = Self {
            id: entity.id,
            model_id: entity.model_id,
            name: entity.name,
            players,
            status: entity.status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            finished_at: entity.finished_at,
        };

        if game.has_uneven_rounds() {
            return Err(InconsistentGame::UnevenRounds { game_id });
        }

        Ok(game)
    }

    /// Scoring type shared by every sheet of this game.
    pub fn scoring(&self) -> Option<ScoringType> {
        self.players.first().map(|player| player.sheet.scoring())
    }

    /// Number of rounds played so far (0 for calculated games).
    pub fn round_count(&self) -> usize {
        match self.players.first().map(|player| &player.sheet) {
            Some(ScoreSheet::Rounds(scores)) => scores.len(),
            _ => 0,
        }
    }

    /// Whether the game reached the finished status.
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    fn has_uneven_rounds(&self) -> bool {
        let expected = self.round_count();
        self.players.iter().any(|player| match &player.sheet {
            ScoreSheet::Rounds(scores) => scores.len() != expected,
            ScoreSheet::Calculated(_) => false,
        })
    }
}

impl From<PlayerScore> for PlayerScoreEntity {
    fn from(value: PlayerScore) -> Self {
        let (scores, field_scores) = match value.sheet {
            ScoreSheet::Rounds(scores) => (scores, None),
            ScoreSheet::Calculated(fields) => (Vec::new(), Some(fields)),
        };
        Self {
            player_id: value.player_id,
            player_name: value.player_name,
            scores,
            field_scores,
        }
    }
}

impl From<Game> for GameEntity {
    fn from(value: Game) -> Self {
        Self {
            id: value.id,
            model_id: value.model_id,
            name: value.name,
            players: value.players.into_iter().map(Into::into).collect(),
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
            finished_at: value.finished_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::model::ModelRegistry;

    fn seats(names: &[&str]) -> Vec<(Option<Uuid>, String)> {
        names.iter().map(|name| (None, name.to_string())).collect()
    }

    #[test]
    fn new_game_picks_sheet_variant_from_model() {
        let registry = ModelRegistry::default();

        let rounds = Game::new(registry.get_model("base").unwrap(), "Base".into(), seats(&["A", "B"]));
        assert_eq!(rounds.scoring(), Some(ScoringType::Rounds));
        assert_eq!(rounds.round_count(), 0);
        assert_eq!(rounds.status, GameStatus::InProgress);
        assert_eq!(rounds.created_at, rounds.updated_at);

        let calculated = Game::new(
            registry.get_model("harmonies").unwrap(),
            "Harmonies".into(),
            seats(&["A"]),
        );
        assert_eq!(
            calculated.players[0].sheet,
            ScoreSheet::Calculated(IndexMap::new())
        );
    }

    #[test]
    fn entity_conversion_keeps_pending_rounds() {
        let registry = ModelRegistry::default();
        let model = registry.get_model("base").unwrap();
        let mut game = Game::new(model, "Base".into(), seats(&["A", "B"]));
        game.players[0].sheet = ScoreSheet::Rounds(vec![Some(0), None]);
        game.players[1].sheet = ScoreSheet::Rounds(vec![None, Some(4)]);

        let entity: GameEntity = game.clone().into();
        assert_eq!(entity.players[0].field_scores, None);

        assert_eq!(Game::from_entity(entity, model).unwrap(), game);
    }

    #[test]
    fn uneven_rounds_are_rejected() {
        let registry = ModelRegistry::default();
        let model = registry.get_model("base").unwrap();
        let mut entity: GameEntity = Game::new(model, "Base".into(), seats(&["A", "B"])).into();
        entity.players[0].scores.push(Some(2));

        assert!(matches!(
            Game::from_entity(entity, model),
            Err(InconsistentGame::UnevenRounds { .. })
        ));
    }

    #[test]
    fn calculated_record_without_field_map_is_rejected() {
        let registry = ModelRegistry::default();
        let harmonies = registry.get_model("harmonies").unwrap();
        let mut entity: GameEntity = Game::new(harmonies, "H".into(), seats(&["A"])).into();
        entity.players[0].field_scores = None;

        assert!(matches!(
            Game::from_entity(entity.clone(), harmonies),
            Err(InconsistentGame::MissingFieldScores { player_index: 0, .. })
        ));

        let base = registry.get_model("base").unwrap();
        assert!(matches!(
            Game::from_entity(entity, base),
            Err(InconsistentGame::ModelMismatch { .. })
        ));
    }
}
