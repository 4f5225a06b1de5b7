//! Healing event data model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Container reference inside a healing event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealingContainer {
    #[serde(rename = "ID", default)]
    pub id: String,

    #[serde(default)]
    pub app_name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Record of an automatic container replacement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealingEvent {
    #[serde(default)]
    pub failing_container: HealingContainer,

    /// Absent when the heal did not manage to start a replacement
    #[serde(default)]
    pub created_container: Option<HealingContainer>,

    /// Application of the failing container
    #[serde(default)]
    pub app: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Context of the healing event page
#[derive(Debug, Clone, Serialize)]
pub struct HealingContext {
    pub events: Vec<HealingEvent>,
}
