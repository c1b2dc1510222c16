use crate::{dto::model::GameModelSummary, error::ServiceError, state::SharedState};

/// Every known game model, built-ins first.
pub fn list_models(state: &SharedState) -> Vec<GameModelSummary> {
    state.models().all().iter().map(Into::into).collect()
}

/// One game model by id.
pub fn get_model(state: &SharedState, id: &str) -> Result<GameModelSummary, ServiceError> {
    state
        .models()
        .get_model(id)
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound(format!("game model `{id}` not found")))
}
