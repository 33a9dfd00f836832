//! Admin setting models.

use serde::{Deserialize, Serialize};

/// Key of the setting that controls how many themes are recommended.
pub const RECOMMENDATION_COUNT_KEY: &str = "recommendation_count";

/// Value used when the recommendation count was never configured.
pub const DEFAULT_RECOMMENDATION_COUNT: u32 = 1;

/// A named configuration value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub key: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub updated_at: String,
}

/// Settings exposed on the admin settings page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSettings {
    pub recommendation_count: u32,
}

/// Request body for `POST /api/admin/settings`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub recommendation_count: Option<i64>,
}
