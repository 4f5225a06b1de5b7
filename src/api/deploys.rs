//! Deploy API endpoints

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    models::{ChartContext, DeployContext, DeployPage},
    services::{
        deploys::{self, ChartFilter},
        SessionToken,
    },
    utils::{
        error::{AppError, AppResult},
        validation::parse_page,
    },
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_deploys))
        .route("/graph", get(deploy_graph))
        .route("/{id}", get(get_deploy))
}

/// Query parameters for the deploy list
#[derive(Debug, Deserialize)]
pub struct DeployListQuery {
    pub page: Option<String>,
}

/// Query parameters for the duration chart
#[derive(Debug, Deserialize)]
pub struct DeployGraphQuery {
    /// Only apps matching this regex
    pub app: Option<String>,
    /// Drop apps matching this regex
    #[serde(rename = "appExclude")]
    pub app_exclude: Option<String>,
    /// Shortest duration kept, in minutes
    #[serde(rename = "minTime")]
    pub min_time: Option<String>,
    /// Longest duration kept, in minutes
    #[serde(rename = "maxTime")]
    pub max_time: Option<String>,
}

/// One page of deploys, newest first
///
/// GET /api/v1/deploys?page=N
async fn list_deploys(
    State(state): State<AppState>,
    token: SessionToken,
    Query(query): Query<DeployListQuery>,
) -> AppResult<Json<DeployPage>> {
    let page = parse_page(query.page.as_deref())?;
    let mode = state.config.dashboard.deploy_limit_mode;
    let page = deploys::list_deploys(&state.tsuru, &token, page, mode).await?;
    Ok(Json(page))
}

/// Deploy durations per app
///
/// GET /api/v1/deploys/graph
async fn deploy_graph(
    State(state): State<AppState>,
    token: SessionToken,
    Query(query): Query<DeployGraphQuery>,
) -> AppResult<Json<ChartContext>> {
    let filter = ChartFilter::from_params(
        query.app.as_deref(),
        query.app_exclude.as_deref(),
        query.min_time.as_deref(),
        query.max_time.as_deref(),
    )?;
    let series = deploys::deploy_chart(&state.tsuru, &token, &filter).await?;
    Ok(Json(ChartContext { deploys: series }))
}

/// A single deploy with its highlighted diff
///
/// GET /api/v1/deploys/:id
async fn get_deploy(
    State(state): State<AppState>,
    token: SessionToken,
    Path(id): Path<String>,
) -> AppResult<Json<DeployContext>> {
    let deploy = deploys::deploy_detail(&state.tsuru, &token, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Deploy does not exist".to_string()))?;
    Ok(Json(DeployContext { deploy }))
}
