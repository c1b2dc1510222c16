use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::dto::validation::validate_display_name;

/// Set or clear one round score of the live game.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRoundScoreRequest {
    pub player_index: usize,
    pub round_index: usize,
    /// `null` puts the round back to pending.
    #[serde(default)]
    pub value: Option<i32>,
}

/// Set one category score of the live game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetFieldScoreRequest {
    pub player_index: usize,
    #[validate(length(min = 1, max = 64))]
    pub category_id: String,
    pub value: i32,
}

/// Rename the live game.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameGameRequest {
    pub name: String,
}

impl Validate for RenameGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_display_name(&self.name) {
            errors.add("name", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Result of appending a round.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddRoundResponse {
    pub round_count: usize,
}
