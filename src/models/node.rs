//! Node, pool and container data models

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Metadata key holding the pool a node belongs to
pub const POOL_METADATA_KEY: &str = "pool";

/// Metadata key holding the last successful healthcheck of a node
pub const LAST_SUCCESS_METADATA_KEY: &str = "LastSuccess";

/// Count of units per container status
pub type UnitHistogram = BTreeMap<String, usize>;

/// Nodes grouped by pool name; nodes without a pool sit under `""`
pub type PoolMap = BTreeMap<String, Vec<NodeView>>;

/// A docker node as returned by `GET /docker/node`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Node {
    /// Node address, usually `scheme://host:port`
    pub address: String,

    /// Free-form node metadata (pool, LastSuccess, iaas, ...)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metadata: BTreeMap<String, String>,

    /// Any other field the orchestrator sends (Status, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Nodes registered without metadata are sent with `"Metadata": null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

impl Node {
    /// Pool name of this node, empty when the metadata carries none
    pub fn pool(&self) -> &str {
        self.metadata
            .get(POOL_METADATA_KEY)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Envelope of the node listing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeList {
    #[serde(default)]
    pub nodes: Option<Vec<Node>>,
}

/// Node projection handed to the pool pages
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeView {
    pub address: String,

    /// Metadata without the raw `LastSuccess` entry
    pub metadata: BTreeMap<String, String>,

    /// Normalized `LastSuccess` metadata
    pub last_success: Option<DateTime<Utc>>,

    /// Unit counts by status
    pub units: UnitHistogram,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeView {
    pub fn pool(&self) -> &str {
        self.metadata
            .get(POOL_METADATA_KEY)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A container (unit) running on a node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Container {
    #[serde(rename = "ID", default)]
    pub id: String,

    #[serde(default)]
    pub app_name: String,

    #[serde(default)]
    pub status: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Context of the pool list and pool detail pages
#[derive(Debug, Clone, Serialize)]
pub struct PoolsContext {
    pub pools: PoolMap,
}

/// Context of the node detail page
#[derive(Debug, Clone, Serialize)]
pub struct NodeDetail {
    pub address: String,
    /// `None` when the orchestrator no longer lists the address
    pub node: Option<NodeView>,
    pub containers: Vec<Container>,
}
