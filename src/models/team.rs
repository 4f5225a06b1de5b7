//! Team data model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for creating a team
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateTeamRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub name: String,
}

/// Confirmation returned once the orchestrator accepted the team
#[derive(Debug, Clone, Serialize)]
pub struct TeamCreated {
    pub message: String,
}
