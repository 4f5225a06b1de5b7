//! Healing event API endpoints

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    models::HealingContext,
    services::{healing, SessionToken},
    utils::error::AppResult,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_healing))
}

/// GET /api/v1/healing
async fn list_healing(
    State(state): State<AppState>,
    token: SessionToken,
) -> AppResult<Json<HealingContext>> {
    let events = healing::list_healing(&state.tsuru, &token).await?;
    Ok(Json(HealingContext { events }))
}
