//! Business idea models.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

use super::{TechnologyDetail, TechnologyRef, ThemeDetail, ThemeRef};

/// Largest page the idea list will return.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Columns shared by every idea representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdeaFields {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub username: String,
    pub vote_count: i64,
    pub created_at: String,
}

/// An idea as shown in the gallery: its themes as `{id, name}` references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaSummary {
    #[serde(flatten)]
    pub idea: IdeaFields,
    pub themes: Vec<ThemeRef>,
}

/// A single idea with references to all of its themes and technologies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    #[serde(flatten)]
    pub idea: IdeaFields,
    pub themes: Vec<ThemeRef>,
    pub technologies: Vec<TechnologyRef>,
}

/// A single idea with the descriptive fields of its themes and technologies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedIdea {
    #[serde(flatten)]
    pub idea: IdeaFields,
    pub themes: Vec<ThemeDetail>,
    pub technologies: Vec<TechnologyDetail>,
}

/// Leaderboard row: an idea annotated with the names of its themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub idea: IdeaFields,
    pub themes: Vec<String>,
}

/// Columns supplied by the author of a new idea.
#[derive(Debug, Clone)]
pub struct NewIdea {
    pub title: String,
    pub content: String,
    pub username: String,
}

/// Request body for creating a new idea.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIdeaRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub theme_ids: Vec<i64>,
    #[serde(default)]
    pub technology_ids: Vec<i64>,
}

/// Ordering applied to the idea list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Newest first
    #[default]
    Recent,
    /// Most votes first, newest first among equal counts
    Popular,
    /// Most votes first, oldest id first among equal counts
    Votes,
}

impl SortBy {
    /// Parse the `sortBy` query value; unknown values mean `recent`.
    pub fn parse(s: &str) -> Self {
        match s {
            "popular" => SortBy::Popular,
            "votes" => SortBy::Votes,
            _ => SortBy::Recent,
        }
    }

    pub fn order_clause(&self) -> &'static str {
        match self {
            SortBy::Recent => "ORDER BY i.created_at DESC, i.id DESC",
            SortBy::Popular => "ORDER BY i.vote_count DESC, i.created_at DESC, i.id DESC",
            SortBy::Votes => "ORDER BY i.vote_count DESC, i.id ASC",
        }
    }
}

/// Query-string parameters of `GET /api/ideas`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub theme: Option<String>,
    pub sort_by: Option<String>,
}

/// Validated idea list query handed to the repository.
#[derive(Debug, Clone)]
pub struct IdeaListQuery {
    pub page: i64,
    pub limit: i64,
    pub search: String,
    pub theme: String,
    pub sort_by: SortBy,
}

impl Default for IdeaListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 12,
            search: String::new(),
            theme: String::new(),
            sort_by: SortBy::Recent,
        }
    }
}

impl IdeaListQuery {
    /// Reject non-positive page/limit and clamp the limit to [`MAX_PAGE_SIZE`].
    pub fn validated(self) -> Result<Self, AppError> {
        if self.page < 1 {
            return Err(AppError::Validation("page must be a positive integer".to_string()));
        }
        if self.limit < 1 {
            return Err(AppError::Validation("limit must be a positive integer".to_string()));
        }
        let limit = self.limit.min(MAX_PAGE_SIZE);
        if (self.page - 1).checked_mul(limit).is_none() {
            return Err(AppError::Validation("page is out of range".to_string()));
        }
        Ok(Self { limit, ..self })
    }

    /// Rows skipped before this page; saturates instead of overflowing.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl From<IdeaListParams> for IdeaListQuery {
    fn from(params: IdeaListParams) -> Self {
        let defaults = IdeaListQuery::default();
        Self {
            page: params.page.unwrap_or(defaults.page),
            limit: params.limit.unwrap_or(defaults.limit),
            search: params.search.unwrap_or_default(),
            theme: params.theme.unwrap_or_default(),
            sort_by: params
                .sort_by
                .as_deref()
                .map(SortBy::parse)
                .unwrap_or_default(),
        }
    }
}

/// One page of the idea list plus the number of matching ideas.
#[derive(Debug, Clone)]
pub struct IdeaPage {
    pub ideas: Vec<IdeaSummary>,
    pub total: i64,
    /// Page actually served
    pub page: i64,
    /// Page size actually applied, after clamping
    pub limit: i64,
}

/// Pagination block of the idea list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Response body of `GET /api/ideas`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaListResponse {
    pub ideas: Vec<IdeaSummary>,
    pub pagination: Pagination,
}

/// Query-string parameters of `GET /api/ideas/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdeaDetailParams {
    #[serde(default = "default_detailed")]
    pub detailed: bool,
}

fn default_detailed() -> bool {
    true
}

/// Either representation of a single idea.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum IdeaView {
    Detailed(DetailedIdea),
    Summary(Idea),
}

/// Which slice of time the leaderboard covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timeframe {
    #[default]
    All,
    /// Ideas created in the last 7 days
    Week,
    /// Ideas created in the last calendar month
    Month,
}

impl Timeframe {
    /// Parse the `timeframe` query value; unknown values mean `all`.
    pub fn parse(s: &str) -> Self {
        match s {
            "week" => Timeframe::Week,
            "month" => Timeframe::Month,
            _ => Timeframe::All,
        }
    }

    /// Oldest creation time an idea may have to be included, relative to `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Timeframe::All => None,
            Timeframe::Week => Some(now - Duration::days(7)),
            Timeframe::Month => Some(
                now.checked_sub_months(Months::new(1))
                    .unwrap_or_else(|| now - Duration::days(30)),
            ),
        }
    }
}

/// Query-string parameters of `GET /api/leaderboard`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<i64>,
    pub timeframe: Option<String>,
}

/// Response body of `GET /api/leaderboard`.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub ideas: Vec<LeaderboardEntry>,
}

/// Request body for casting a vote.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default)]
    pub idea_id: Option<i64>,
}

/// Response body after a vote was recorded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub idea_id: i64,
    pub new_vote_count: i64,
}
