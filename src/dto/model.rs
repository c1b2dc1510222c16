use serde::Serialize;
use utoipa::ToSchema;

use crate::state::model::{GameModel, ScoreCategory, ScoringType};

/// Scoring scheme exposed to clients.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoringTypeDto {
    Rounds,
    Calculated,
}

impl From<ScoringType> for ScoringTypeDto {
    fn from(value: ScoringType) -> Self {
        match value {
            ScoringType::Rounds => ScoringTypeDto::Rounds,
            ScoringType::Calculated => ScoringTypeDto::Calculated,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreCategorySummary {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
}

/// Public projection of a game model.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameModelSummary {
    pub id: String,
    pub label: String,
    pub description: String,
    pub min_players: usize,
    pub max_players: usize,
    #[serde(rename = "type")]
    pub scoring: ScoringTypeDto,
    pub categories: Vec<ScoreCategorySummary>,
}

impl From<&ScoreCategory> for ScoreCategorySummary {
    fn from(category: &ScoreCategory) -> Self {
        Self {
            id: category.id.clone(),
            label: category.label.clone(),
            icon: category.icon.clone(),
        }
    }
}

impl From<&GameModel> for GameModelSummary {
    fn from(model: &GameModel) -> Self {
        Self {
            id: model.id.clone(),
            label: model.label.clone(),
            description: model.description.clone(),
            min_players: model.min_players,
            max_players: model.max_players,
            scoring: model.scoring.into(),
            categories: model.categories.iter().map(Into::into).collect(),
        }
    }
}
