use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dao::models::PlayerEntity;
use crate::dto::{format_system_time, validation::validate_display_name};

/// Payload registering a new player.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlayerRequest {
    pub name: String,
}

/// Payload renaming a registered player.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenamePlayerRequest {
    pub name: String,
}

impl Validate for CreatePlayerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_name_field(&self.name)
    }
}

impl Validate for RenamePlayerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_name_field(&self.name)
    }
}

fn validate_name_field(name: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Err(e) = validate_display_name(name) {
        errors.add("name", e);
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Registered player as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: String,
}

impl From<PlayerEntity> for PlayerSummary {
    fn from(player: PlayerEntity) -> Self {
        Self {
            id: player.id,
            name: player.name,
            created_at: format_system_time(player.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_fail_validation() {
        let request = CreatePlayerRequest { name: "  ".into() };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let request = RenamePlayerRequest { name: "Anna".into() };
        assert!(request.validate().is_ok());
    }
}
