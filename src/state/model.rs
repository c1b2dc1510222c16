//! Read-only game model registry: which scoring scheme a game follows, how many players
//! it accepts and, for calculated games, which categories are scored.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a game accumulates points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoringType {
    /// One manually entered score per round.
    Rounds,
    /// The total is the sum of named scoring categories.
    Calculated,
}

/// A named scoring category of a calculated model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreCategory {
    /// Stable identifier used as key in score maps.
    pub id: String,
    /// Human readable label.
    pub label: String,
    /// Optional pictogram shown next to the label.
    pub icon: Option<String>,
}

/// Static configuration describing a kind of game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameModel {
    /// Stable identifier referenced by games.
    pub id: String,
    /// Display label, also used for default game names.
    pub label: String,
    /// Short description of the game.
    pub description: String,
    /// Minimum number of seated players.
    pub min_players: usize,
    /// Maximum number of seated players.
    pub max_players: usize,
    /// Scoring scheme.
    pub scoring: ScoringType,
    /// Ordered categories; empty for rounds models.
    pub categories: Vec<ScoreCategory>,
}

impl GameModel {
    /// Whether `count` players may sit at this game.
    pub fn accepts_player_count(&self, count: usize) -> bool {
        (self.min_players..=self.max_players).contains(&count)
    }
}

/// Lookup table of every known game model.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Vec<GameModel>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self {
            models: builtin_models(),
        }
    }
}

impl ModelRegistry {
    /// Registry holding the built-in models followed by `extra`, skipping duplicate ids.
    pub fn with_extra(extra: Vec<GameModel>) -> Self {
        let mut registry = Self::default();
        for model in extra {
            if registry.get_model(&model.id).is_some() {
                warn!(model_id = %model.id, "duplicate game model id; ignoring configured model");
                continue;
            }
            registry.models.push(model);
        }
        registry
    }

    /// Find a model by id.
    pub fn get_model(&self, id: &str) -> Option<&GameModel> {
        self.models.iter().find(|model| model.id == id)
    }

    /// All models in registration order.
    pub fn all(&self) -> &[GameModel] {
        &self.models
    }
}

fn category(id: &str, label: &str, icon: &str) -> ScoreCategory {
    ScoreCategory {
        id: id.into(),
        label: label.into(),
        icon: Some(icon.into()),
    }
}

/// Models shipped with the binary.
fn builtin_models() -> Vec<GameModel> {
    vec![
        GameModel {
            id: "base".into(),
            label: "Base model".into(),
            description: "Generic model counting scores round by round".into(),
            min_players: 1,
            max_players: 99,
            scoring: ScoringType::Rounds,
            categories: Vec::new(),
        },
        GameModel {
            id: "harmonies".into(),
            label: "Harmonies".into(),
            description: "Tile and animal placement in a harmonious landscape".into(),
            min_players: 1,
            max_players: 4,
            scoring: ScoringType::Calculated,
            categories: vec![
                category("animaux", "Animals", "🦊"),
                category("batiments", "Buildings", "🏠"),
                category("riviere", "River", "🌊"),
                category("arbres", "Trees", "🌲"),
                category("champs", "Fields", "🌾"),
                category("montagne", "Mountains", "⛰️"),
            ],
        },
        GameModel {
            id: "catan".into(),
            label: "Catan".into(),
            description: "Resource management and trading on an island".into(),
            min_players: 3,
            max_players: 4,
            scoring: ScoringType::Rounds,
            categories: Vec::new(),
        },
        GameModel {
            id: "seven-wonders".into(),
            label: "7 Wonders".into(),
            description: "Card drafting through three ages of civilization".into(),
            min_players: 2,
            max_players: 7,
            scoring: ScoringType::Calculated,
            categories: vec![
                category("militaire", "Military", "⚔️"),
                category("tresor", "Treasury", "💰"),
                category("merveille", "Wonder", "🏛️"),
                category("civil", "Civilian", "🏛️"),
                category("commerce", "Commerce", "🤝"),
                category("guilde", "Guilds", "📜"),
                category("science", "Science", "🔬"),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_models_are_registered() {
        let registry = ModelRegistry::default();
        let ids: Vec<&str> = registry.all().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["base", "harmonies", "catan", "seven-wonders"]);
        assert_eq!(
            registry.get_model("seven-wonders").unwrap().categories.len(),
            7
        );
        assert!(registry.get_model("chess").is_none());
    }

    #[test]
    fn configured_models_cannot_shadow_builtins() {
        let mut shadow = ModelRegistry::default().get_model("catan").unwrap().clone();
        shadow.max_players = 6;
        let mut extra = shadow.clone();
        extra.id = "catan-extension".into();

        let registry = ModelRegistry::with_extra(vec![shadow, extra]);

        assert_eq!(registry.get_model("catan").unwrap().max_players, 4);
        assert_eq!(registry.get_model("catan-extension").unwrap().max_players, 6);
    }

    #[test]
    fn player_count_bounds_are_inclusive() {
        let registry = ModelRegistry::default();
        let catan = registry.get_model("catan").unwrap();
        assert!(!catan.accepts_player_count(2));
        assert!(catan.accepts_player_count(3));
        assert!(catan.accepts_player_count(4));
        assert!(!catan.accepts_player_count(5));
    }
}
