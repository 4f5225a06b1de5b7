//! Node API endpoints
//!
//! Node addresses contain `:` and `/`, so clients percent-encode them into
//! a single path segment (`http%3A%2F%2F10.0.0.1%3A2375`).

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    api::POOL_LIST_PATH,
    models::NodeDetail,
    services::{pools, RemoveNodeRequest, SessionToken},
    utils::{error::AppResult, validation::parse_bool_flag},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{address}", get(get_node))
        .route("/{address}/remove", get(remove_node).post(remove_node))
}

/// Query parameters for node removal
#[derive(Debug, Deserialize)]
pub struct RemoveNodeQuery {
    /// Also destroy the machine through its IaaS (`true`/`false`)
    pub destroy: Option<String>,
    /// Move the node's units elsewhere before removing it (`true`/`false`)
    pub rebalance: Option<String>,
}

/// Node metadata plus the containers running on it
///
/// GET /api/v1/nodes/:address
async fn get_node(
    State(state): State<AppState>,
    token: SessionToken,
    Path(address): Path<String>,
) -> AppResult<Json<NodeDetail>> {
    let detail = pools::node_detail(&state.tsuru, &token, &address).await?;
    Ok(Json(detail))
}

/// Remove a node from its pool
///
/// GET|POST /api/v1/nodes/:address/remove
///
/// Query parameters:
/// - `destroy`: destroy the IaaS machine too (default: false)
/// - `rebalance`: rebalance units before removing (default: false)
///
/// Redirects to the pool list on success; orchestrator errors are returned
/// with their original status and body.
async fn remove_node(
    State(state): State<AppState>,
    token: SessionToken,
    Path(address): Path<String>,
    Query(query): Query<RemoveNodeQuery>,
) -> AppResult<Redirect> {
    let destroy = parse_bool_flag("destroy", query.destroy.as_deref(), false)?;
    let rebalance = parse_bool_flag("rebalance", query.rebalance.as_deref(), false)?;

    let request = RemoveNodeRequest {
        address,
        remove_iaas: destroy.to_string(),
    };
    state.tsuru.remove_node(&token, &request, !rebalance).await?;

    info!(
        address = %request.address,
        destroy,
        rebalance,
        "Node removed"
    );
    Ok(Redirect::to(POOL_LIST_PATH))
}
