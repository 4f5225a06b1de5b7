//! Pool API endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{
    models::PoolsContext,
    services::{pools, SessionToken},
    utils::error::AppResult,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pools))
        .route("/{pool}", get(get_pool))
}

/// Every node grouped by pool, each with its unit counts
///
/// GET /api/v1/pools
async fn list_pools(
    State(state): State<AppState>,
    token: SessionToken,
) -> AppResult<Json<PoolsContext>> {
    let pools = pools::list_pools(&state.tsuru, &token).await?;
    Ok(Json(PoolsContext { pools }))
}

/// Nodes of a single pool; unknown pools yield an empty map
///
/// GET /api/v1/pools/:pool
async fn get_pool(
    State(state): State<AppState>,
    token: SessionToken,
    Path(pool): Path<String>,
) -> AppResult<Json<PoolsContext>> {
    let pools = pools::pool_detail(&state.tsuru, &token, &pool).await?;
    Ok(Json(PoolsContext { pools }))
}
