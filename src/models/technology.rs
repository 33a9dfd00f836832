//! Technology models.

use serde::{Deserialize, Serialize};

/// An administrator-curated technology an idea can be built on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_level: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_cases: Option<String>,
    /// Free-form text or a structured object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: String,
}

/// Request body for creating or replacing a technology.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "maturity_level")]
    pub maturity_level: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "use_cases")]
    pub use_cases: Option<String>,
    #[serde(default, alias = "performance_metrics")]
    pub performance_metrics: Option<serde_json::Value>,
    #[serde(default, alias = "image_url")]
    pub image_url: Option<String>,
}

/// Technology reference embedded in the summary idea view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TechnologyRef {
    pub id: i64,
    pub name: String,
}

/// Technology embedded in the detailed idea view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyDetail {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub maturity_level: Option<String>,
    pub description: String,
}
