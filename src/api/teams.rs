//! Team API endpoints

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::info;
use validator::Validate;

use crate::{
    models::{CreateTeamRequest, TeamCreated},
    services::SessionToken,
    utils::error::AppResult,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_team))
}

/// Create a team
///
/// POST /api/v1/teams
async fn create_team(
    State(state): State<AppState>,
    token: SessionToken,
    Json(payload): Json<CreateTeamRequest>,
) -> AppResult<(StatusCode, Json<TeamCreated>)> {
    payload.validate()?;

    state.tsuru.create_team(&token, &payload.name).await?;
    info!(team = %payload.name, "Team created");

    Ok((
        StatusCode::OK,
        Json(TeamCreated {
            message: "Team was successfully created".to_string(),
        }),
    ))
}
