//! Business theme models.

use serde::{Deserialize, Serialize};

/// An administrator-curated business domain an idea can be linked to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: String,
}

/// Request body for creating or replacing a theme.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "image_url")]
    pub image_url: Option<String>,
}

/// Theme reference embedded in idea lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeRef {
    pub id: i64,
    pub name: String,
}

/// Theme embedded in the detailed idea view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeDetail {
    pub id: i64,
    pub name: String,
    pub description: String,
}
