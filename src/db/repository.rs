//! Database repository for ideas, votes, the theme/technology taxonomy and settings.
//!
//! Multi-statement writes run inside a transaction; a transaction dropped before `commit`
//! rolls back.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::pool::{self, Param};
use crate::errors::AppError;
use crate::models::{
    DetailedIdea, DetailedStats, Idea, IdeaFields, IdeaListQuery, IdeaPage, IdeaSummary,
    LeaderboardEntry, NewIdea, Setting, Technology, TechnologyDetail, TechnologyInput,
    TechnologyRef, Theme, ThemeDetail, ThemeInput, ThemeRef, ThemeUsage, Timeframe,
    DEFAULT_RECOMMENDATION_COUNT, MAX_PAGE_SIZE, RECOMMENDATION_COUNT_KEY,
};

const IDEA_COLUMNS: &str = "i.id, i.title, i.content, i.username, i.vote_count, i.created_at";
const THEME_COLUMNS: &str = "id, name, description, image_url, created_at";
const TECHNOLOGY_COLUMNS: &str = "id, name, category, maturity_level, description, use_cases, performance_metrics, image_url, created_at";

/// Number of days counted as "recent" on the admin dashboard.
const RECENT_DAYS: i64 = 7;

/// Format a point in time the way every `created_at`/`updated_at` column stores it.
///
/// Fixed-width UTC with microseconds, so text comparison orders chronologically.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ==================== IDEA OPERATIONS ====================

    /// List one page of ideas matching the search and theme filters.
    ///
    /// The search term matches as a substring of title, content or username. SQLite `LIKE`
    /// folds ASCII letters only, so `É` and `é` are distinct while `S` and `s` are not.
    pub async fn list_ideas(&self, query: &IdeaListQuery) -> Result<IdeaPage, AppError> {
        let query = query.clone().validated()?;
        let (where_clause, filter_params) = idea_filter(&query.search, &query.theme);

        let sql = format!(
            "SELECT {} FROM ideas i {} {} LIMIT ? OFFSET ?",
            IDEA_COLUMNS,
            where_clause,
            query.sort_by.order_clause()
        );
        let mut params = filter_params.clone();
        params.push(query.limit.into());
        params.push(query.offset().into());
        let rows = pool::query(&self.pool, &sql, &params).await?;

        let count_sql = format!("SELECT COUNT(*) AS total FROM ideas i {}", where_clause);
        let total: i64 = pool::query(&self.pool, &count_sql, &filter_params)
            .await?
            .first()
            .map(|row| row.get("total"))
            .unwrap_or(0);

        let fields: Vec<IdeaFields> = rows.iter().map(idea_from_row).collect();
        let ids: Vec<i64> = fields.iter().map(|idea| idea.id).collect();
        let mut themes = self.theme_refs_for(&ids).await?;

        let ideas = fields
            .into_iter()
            .map(|idea| IdeaSummary {
                themes: themes.remove(&idea.id).unwrap_or_default(),
                idea,
            })
            .collect();

        Ok(IdeaPage {
            ideas,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    /// Get an idea with `{id, name}` references to its themes and technologies.
    pub async fn get_idea(&self, id: i64) -> Result<Option<Idea>, AppError> {
        let Some(idea) = self.get_idea_fields(id).await? else {
            return Ok(None);
        };

        let themes = self.theme_refs_for(&[id]).await?.remove(&id).unwrap_or_default();
        let technologies = sqlx::query(
            "SELECT t.id, t.name FROM idea_technologies it JOIN technologies t ON t.id = it.technology_id WHERE it.idea_id = ? ORDER BY t.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| TechnologyRef {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect();

        Ok(Some(Idea {
            idea,
            themes,
            technologies,
        }))
    }

    /// Get an idea with the descriptive fields of its themes and technologies.
    pub async fn get_detailed_idea(&self, id: i64) -> Result<Option<DetailedIdea>, AppError> {
        let Some(idea) = self.get_idea_fields(id).await? else {
            return Ok(None);
        };

        let themes = sqlx::query(
            "SELECT t.id, t.name, t.description FROM idea_themes it JOIN themes t ON t.id = it.theme_id WHERE it.idea_id = ? ORDER BY t.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| ThemeDetail {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
        })
        .collect();

        let technologies = sqlx::query(
            "SELECT t.id, t.name, t.category, t.maturity_level, t.description FROM idea_technologies it JOIN technologies t ON t.id = it.technology_id WHERE it.idea_id = ? ORDER BY t.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| TechnologyDetail {
            id: row.get("id"),
            name: row.get("name"),
            category: row.get("category"),
            maturity_level: row.get("maturity_level"),
            description: row.get("description"),
        })
        .collect();

        Ok(Some(DetailedIdea {
            idea,
            themes,
            technologies,
        }))
    }

    /// Create an idea and its theme and technology links in one transaction.
    pub async fn create_idea(
        &self,
        idea: &NewIdea,
        theme_ids: &[i64],
        technology_ids: &[i64],
    ) -> Result<DetailedIdea, AppError> {
        let theme_ids = distinct(theme_ids);
        let technology_ids = distinct(technology_ids);
        let now = timestamp(Utc::now());

        let mut tx = self.pool.begin().await?;

        let idea_id = sqlx::query(
            "INSERT INTO ideas (title, content, username, vote_count, created_at) VALUES (?, ?, ?, 0, ?)",
        )
        .bind(&idea.title)
        .bind(&idea.content)
        .bind(&idea.username)
        .bind(&now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        if !theme_ids.is_empty() {
            let mut links = QueryBuilder::<Sqlite>::new("INSERT INTO idea_themes (idea_id, theme_id) ");
            links.push_values(&theme_ids, |mut b, theme_id| {
                b.push_bind(idea_id).push_bind(*theme_id);
            });
            links.build().execute(&mut *tx).await?;
        }

        if !technology_ids.is_empty() {
            let mut links = QueryBuilder::<Sqlite>::new(
                "INSERT INTO idea_technologies (idea_id, technology_id) ",
            );
            links.push_values(&technology_ids, |mut b, technology_id| {
                b.push_bind(idea_id).push_bind(*technology_id);
            });
            links.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        tracing::info!(
            "Created idea {} with {} themes and {} technologies",
            idea_id,
            theme_ids.len(),
            technology_ids.len()
        );

        self.get_detailed_idea(idea_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Idea {} vanished after insert", idea_id)))
    }

    /// Record a vote and return the idea's new vote count.
    pub async fn vote_for_idea(&self, idea_id: i64, voter_ip: &str) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE ideas SET vote_count = vote_count + 1 WHERE id = ?")
            .bind(idea_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Idea {} not found", idea_id)));
        }

        sqlx::query("INSERT INTO votes (idea_id, voter_ip, created_at) VALUES (?, ?, ?)")
            .bind(idea_id)
            .bind(voter_ip)
            .bind(timestamp(Utc::now()))
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query("SELECT vote_count FROM ideas WHERE id = ?")
            .bind(idea_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.get("vote_count"))
    }

    /// Top ideas by votes, optionally restricted to recently created ones.
    pub async fn get_leaderboard(
        &self,
        limit: i64,
        timeframe: Timeframe,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        if limit < 1 {
            return Err(AppError::Validation(
                "limit must be a positive integer".to_string(),
            ));
        }
        let limit = limit.min(MAX_PAGE_SIZE);

        let mut params = Vec::new();
        let where_clause = match timeframe.cutoff(Utc::now()) {
            Some(cutoff) => {
                params.push(Param::from(timestamp(cutoff)));
                "WHERE i.created_at >= ?"
            }
            None => "",
        };
        params.push(limit.into());

        let sql = format!(
            "SELECT {} FROM ideas i {} ORDER BY i.vote_count DESC, i.created_at DESC, i.id DESC LIMIT ?",
            IDEA_COLUMNS, where_clause
        );
        let rows = pool::query(&self.pool, &sql, &params).await?;

        let fields: Vec<IdeaFields> = rows.iter().map(idea_from_row).collect();
        let ids: Vec<i64> = fields.iter().map(|idea| idea.id).collect();
        let mut themes = self.theme_refs_for(&ids).await?;

        Ok(fields
            .into_iter()
            .map(|idea| LeaderboardEntry {
                themes: themes
                    .remove(&idea.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|theme| theme.name)
                    .collect(),
                idea,
            })
            .collect())
    }

    async fn get_idea_fields(&self, id: i64) -> Result<Option<IdeaFields>, AppError> {
        let sql = format!("SELECT {} FROM ideas i WHERE i.id = ?", IDEA_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(idea_from_row))
    }

    /// Theme references of several ideas, keyed by idea id.
    async fn theme_refs_for(&self, idea_ids: &[i64]) -> Result<HashMap<i64, Vec<ThemeRef>>, AppError> {
        let mut grouped: HashMap<i64, Vec<ThemeRef>> = HashMap::new();
        if idea_ids.is_empty() {
            return Ok(grouped);
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT it.idea_id, t.id, t.name FROM idea_themes it JOIN themes t ON t.id = it.theme_id WHERE it.idea_id IN (",
        );
        let mut ids = builder.separated(", ");
        for id in idea_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY t.id");

        for row in builder.build().fetch_all(&self.pool).await? {
            grouped
                .entry(row.get("idea_id"))
                .or_default()
                .push(ThemeRef {
                    id: row.get("id"),
                    name: row.get("name"),
                });
        }
        Ok(grouped)
    }

    // ==================== THEME OPERATIONS ====================

    /// List all themes, newest first.
    pub async fn list_themes(&self) -> Result<Vec<Theme>, AppError> {
        let sql = format!(
            "SELECT {} FROM themes ORDER BY created_at DESC, id DESC",
            THEME_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(theme_from_row).collect())
    }

    /// Get a theme by ID.
    pub async fn get_theme(&self, id: i64) -> Result<Option<Theme>, AppError> {
        let sql = format!("SELECT {} FROM themes WHERE id = ?", THEME_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(theme_from_row))
    }

    /// Themes with the given ids; unknown ids are skipped.
    pub async fn get_themes_by_ids(&self, ids: &[i64]) -> Result<Vec<Theme>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM themes WHERE id IN (",
            THEME_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(theme_from_row).collect())
    }

    /// Create a new theme.
    pub async fn create_theme(&self, input: &ThemeInput) -> Result<Theme, AppError> {
        let now = timestamp(Utc::now());
        let image_url = non_empty(&input.image_url);

        let id = sqlx::query(
            "INSERT INTO themes (name, description, image_url, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&image_url)
        .bind(&now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Theme {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            image_url,
            created_at: now,
        })
    }

    /// Replace the editable fields of a theme.
    pub async fn update_theme(&self, id: i64, input: &ThemeInput) -> Result<Theme, AppError> {
        let result = sqlx::query(
            "UPDATE themes SET name = ?, description = ?, image_url = ? WHERE id = ?",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(non_empty(&input.image_url))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Theme {} not found", id)));
        }

        self.get_theme(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Theme {} not found", id)))
    }

    /// Delete a theme; its idea links go with it.
    pub async fn delete_theme(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM themes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Theme {} not found", id)));
        }
        Ok(())
    }

    // ==================== TECHNOLOGY OPERATIONS ====================

    /// List all technologies, newest first.
    pub async fn list_technologies(&self) -> Result<Vec<Technology>, AppError> {
        let sql = format!(
            "SELECT {} FROM technologies ORDER BY created_at DESC, id DESC",
            TECHNOLOGY_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(technology_from_row).collect())
    }

    /// Get a technology by ID.
    pub async fn get_technology(&self, id: i64) -> Result<Option<Technology>, AppError> {
        let sql = format!("SELECT {} FROM technologies WHERE id = ?", TECHNOLOGY_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(technology_from_row))
    }

    /// Technologies with the given ids; unknown ids are skipped.
    pub async fn get_technologies_by_ids(&self, ids: &[i64]) -> Result<Vec<Technology>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM technologies WHERE id IN (",
            TECHNOLOGY_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(technology_from_row).collect())
    }

    /// Create a new technology.
    pub async fn create_technology(&self, input: &TechnologyInput) -> Result<Technology, AppError> {
        let now = timestamp(Utc::now());
        let metrics = metrics_to_text(&input.performance_metrics)?;

        let id = sqlx::query(
            "INSERT INTO technologies (name, category, maturity_level, description, use_cases, performance_metrics, image_url, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(non_empty(&input.category))
        .bind(non_empty(&input.maturity_level))
        .bind(&input.description)
        .bind(non_empty(&input.use_cases))
        .bind(&metrics)
        .bind(non_empty(&input.image_url))
        .bind(&now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.get_technology(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Technology {} vanished after insert", id)))
    }

    /// Replace the editable fields of a technology.
    pub async fn update_technology(
        &self,
        id: i64,
        input: &TechnologyInput,
    ) -> Result<Technology, AppError> {
        let metrics = metrics_to_text(&input.performance_metrics)?;

        let result = sqlx::query(
            "UPDATE technologies SET name = ?, category = ?, maturity_level = ?, description = ?, use_cases = ?, performance_metrics = ?, image_url = ? WHERE id = ?",
        )
        .bind(&input.name)
        .bind(non_empty(&input.category))
        .bind(non_empty(&input.maturity_level))
        .bind(&input.description)
        .bind(non_empty(&input.use_cases))
        .bind(&metrics)
        .bind(non_empty(&input.image_url))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Technology {} not found", id)));
        }

        self.get_technology(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Technology {} not found", id)))
    }

    /// Delete a technology; its idea links go with it.
    pub async fn delete_technology(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM technologies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Technology {} not found", id)));
        }
        Ok(())
    }

    // ==================== STATS ====================

    /// Aggregate counts for the admin dashboard.
    pub async fn get_detailed_stats(&self) -> Result<DetailedStats, AppError> {
        let recent = timestamp(Utc::now() - Duration::days(RECENT_DAYS));

        let row = sqlx::query(
            r#"SELECT
                (SELECT COUNT(*) FROM ideas) AS total_ideas,
                (SELECT COUNT(*) FROM themes) AS total_themes,
                (SELECT COUNT(*) FROM technologies) AS total_technologies,
                (SELECT COUNT(*) FROM votes) AS total_votes,
                (SELECT COUNT(DISTINCT voter_ip) FROM votes) AS unique_voters,
                (SELECT COUNT(*) FROM ideas WHERE created_at >= ?) AS recent_ideas,
                (SELECT COUNT(*) FROM votes WHERE created_at >= ?) AS recent_votes"#,
        )
        .bind(&recent)
        .bind(&recent)
        .fetch_one(&self.pool)
        .await?;

        let top_themes = sqlx::query(
            r#"SELECT t.name, COUNT(it.idea_id) AS count
               FROM themes t JOIN idea_themes it ON it.theme_id = t.id
               GROUP BY t.id, t.name
               ORDER BY count DESC, t.name ASC
               LIMIT 5"#,
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| ThemeUsage {
            name: row.get("name"),
            count: row.get("count"),
        })
        .collect();

        Ok(DetailedStats {
            total_ideas: row.get("total_ideas"),
            total_themes: row.get("total_themes"),
            total_technologies: row.get("total_technologies"),
            total_votes: row.get("total_votes"),
            unique_voters: row.get("unique_voters"),
            recent_ideas: row.get("recent_ideas"),
            recent_votes: row.get("recent_votes"),
            top_themes,
        })
    }

    // ==================== SETTING OPERATIONS ====================

    /// Get a setting by key.
    pub async fn get_setting(&self, key: &str) -> Result<Option<Setting>, AppError> {
        let row = sqlx::query("SELECT key, value, description, updated_at FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(setting_from_row))
    }

    /// Insert or overwrite a setting. A `None` description keeps the stored one.
    pub async fn set_setting(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<Setting, AppError> {
        let row = sqlx::query(
            r#"INSERT INTO settings (key, value, description, updated_at) VALUES (?, ?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET
                   value = excluded.value,
                   description = COALESCE(excluded.description, settings.description),
                   updated_at = excluded.updated_at
               RETURNING key, value, description, updated_at"#,
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .bind(timestamp(Utc::now()))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Setting {} updated", key);
        Ok(setting_from_row(&row))
    }

    /// Settings with the given keys; unknown keys are skipped.
    pub async fn get_settings_by_keys(&self, keys: &[&str]) -> Result<Vec<Setting>, AppError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT key, value, description, updated_at FROM settings WHERE key IN (",
        );
        let mut separated = builder.separated(", ");
        for key in keys {
            separated.push_bind(*key);
        }
        separated.push_unseparated(") ORDER BY key");

        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(setting_from_row).collect())
    }

    /// How many themes to recommend for an idea.
    pub async fn recommendation_count(&self) -> Result<u32, AppError> {
        let stored = self.get_setting(RECOMMENDATION_COUNT_KEY).await?;
        Ok(stored
            .and_then(|setting| setting.value.trim().parse::<u32>().ok())
            .filter(|count| *count >= 1)
            .unwrap_or(DEFAULT_RECOMMENDATION_COUNT))
    }
}

/// WHERE clause and bind parameters for the idea list filters.
fn idea_filter(search: &str, theme: &str) -> (String, Vec<Param>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if !search.is_empty() {
        // LIKE folds ASCII case
        conditions.push(
            r"(i.title LIKE ? ESCAPE '\' OR i.content LIKE ? ESCAPE '\' OR i.username LIKE ? ESCAPE '\')",
        );
        let pattern = format!("%{}%", escape_like(search));
        for _ in 0..3 {
            params.push(Param::from(pattern.as_str()));
        }
    }

    if !theme.is_empty() {
        conditions.push(
            "EXISTS (SELECT 1 FROM idea_themes it JOIN themes t ON t.id = it.theme_id WHERE it.idea_id = i.id AND t.name = ?)",
        );
        params.push(Param::from(theme));
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), params)
    }
}

/// Escape LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Ids in ascending order with duplicates removed.
fn distinct(ids: &[i64]) -> Vec<i64> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Structured metrics are stored as JSON text; plain strings as-is.
fn metrics_to_text(metrics: &Option<serde_json::Value>) -> Result<Option<String>, AppError> {
    match metrics {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text.clone())),
        Some(value) => Ok(Some(serde_json::to_string(value)?)),
    }
}

fn metrics_from_text(text: Option<String>) -> Option<serde_json::Value> {
    text.map(|raw| match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => value,
        _ => serde_json::Value::String(raw),
    })
}

// Helper functions to convert rows to models

fn idea_from_row(row: &SqliteRow) -> IdeaFields {
    IdeaFields {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        username: row.get("username"),
        vote_count: row.get("vote_count"),
        created_at: row.get("created_at"),
    }
}

fn theme_from_row(row: &SqliteRow) -> Theme {
    Theme {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
    }
}

fn technology_from_row(row: &SqliteRow) -> Technology {
    Technology {
        id: row.get("id"),
        name: row.get("name"),
        category: row.get("category"),
        maturity_level: row.get("maturity_level"),
        description: row.get("description"),
        use_cases: row.get("use_cases"),
        performance_metrics: metrics_from_text(row.get("performance_metrics")),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
    }
}

fn setting_from_row(row: &SqliteRow) -> Setting {
    Setting {
        key: row.get("key"),
        value: row.get("value"),
        description: row.get("description"),
        updated_at: row.get("updated_at"),
    }
}
