//! Deploy data models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A deploy record as returned by `GET /deploys`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Deploy {
    #[serde(rename = "ID", default)]
    pub id: String,

    /// Application name
    #[serde(default)]
    pub app: String,

    /// Timestamp exactly as the orchestrator formats it
    #[serde(default)]
    pub timestamp: String,

    /// Duration in nanoseconds; zero while the deploy is unfinished
    #[serde(default)]
    pub duration: i64,

    /// Unified diff of the deployed commits
    #[serde(default)]
    pub diff: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of the deploy list
#[derive(Debug, Clone, Serialize)]
pub struct DeployPage {
    pub deploys: Vec<Deploy>,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<u32>,
}

/// A single chart point: when the deploy happened and how long it took
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: String,
    /// Duration in minutes
    pub y: f64,
}

/// Deploy durations of one application
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub key: String,
    pub values: Vec<ChartPoint>,
}

/// Context of the deploy chart page
#[derive(Debug, Clone, Serialize)]
pub struct ChartContext {
    pub deploys: Vec<ChartSeries>,
}

/// Context of the deploy detail page
#[derive(Debug, Clone, Serialize)]
pub struct DeployContext {
    pub deploy: Deploy,
}
