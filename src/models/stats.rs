//! Admin dashboard statistics.

use serde::{Deserialize, Serialize};

/// A theme and the number of ideas linked to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeUsage {
    pub name: String,
    pub count: i64,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedStats {
    pub total_ideas: i64,
    pub total_themes: i64,
    pub total_technologies: i64,
    pub total_votes: i64,
    /// Distinct voter fingerprints across all votes
    pub unique_voters: i64,
    /// Ideas created in the trailing 7 days
    pub recent_ideas: i64,
    /// Votes cast in the trailing 7 days
    pub recent_votes: i64,
    /// Up to 5 themes with the most linked ideas
    pub top_themes: Vec<ThemeUsage>,
}
