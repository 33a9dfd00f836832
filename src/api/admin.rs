//! Admin API endpoints: theme and technology catalogs, settings and dashboard statistics.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{require_text, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    DetailedStats, RecommendationSettings, Technology, TechnologyInput, Theme, ThemeInput,
    UpdateSettingsRequest, DEFAULT_RECOMMENDATION_COUNT, RECOMMENDATION_COUNT_KEY,
};
use crate::AppState;

const RECOMMENDATION_COUNT_DESCRIPTION: &str = "Number of business themes recommended per idea";

// ==================== THEMES ====================

/// GET /api/admin/themes - List all themes.
pub async fn list_themes(State(state): State<AppState>) -> ApiResult<Vec<Theme>> {
    success(state.repo.list_themes().await?)
}

/// POST /api/admin/themes - Create a theme.
pub async fn create_theme(
    State(state): State<AppState>,
    Json(input): Json<ThemeInput>,
) -> ApiResult<Theme> {
    validate_theme(&input)?;
    let theme = state.repo.create_theme(&input).await?;
    tracing::info!("Created theme {} ({})", theme.id, theme.name);
    success(theme)
}

/// PUT /api/admin/themes/{id} - Replace a theme.
pub async fn update_theme(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ThemeInput>,
) -> ApiResult<Theme> {
    validate_theme(&input)?;
    success(state.repo.update_theme(id, &input).await?)
}

/// DELETE /api/admin/themes/{id} - Delete a theme.
pub async fn delete_theme(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.repo.delete_theme(id).await?;
    tracing::info!("Deleted theme {}", id);
    success(())
}

fn validate_theme(input: &ThemeInput) -> Result<(), AppError> {
    require_text(&input.name, "Theme name is required")?;
    require_text(&input.description, "Theme description is required")
}

// ==================== TECHNOLOGIES ====================

/// GET /api/admin/technologies - List all technologies.
pub async fn list_technologies(State(state): State<AppState>) -> ApiResult<Vec<Technology>> {
    success(state.repo.list_technologies().await?)
}

/// POST /api/admin/technologies - Create a technology.
pub async fn create_technology(
    State(state): State<AppState>,
    Json(input): Json<TechnologyInput>,
) -> ApiResult<Technology> {
    validate_technology(&input)?;
    let technology = state.repo.create_technology(&input).await?;
    tracing::info!("Created technology {} ({})", technology.id, technology.name);
    success(technology)
}

/// PUT /api/admin/technologies/{id} - Replace a technology.
pub async fn update_technology(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TechnologyInput>,
) -> ApiResult<Technology> {
    validate_technology(&input)?;
    success(state.repo.update_technology(id, &input).await?)
}

/// DELETE /api/admin/technologies/{id} - Delete a technology.
pub async fn delete_technology(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    state.repo.delete_technology(id).await?;
    tracing::info!("Deleted technology {}", id);
    success(())
}

fn validate_technology(input: &TechnologyInput) -> Result<(), AppError> {
    require_text(&input.name, "Technology name is required")?;
    require_text(&input.description, "Technology description is required")
}

// ==================== SETTINGS ====================

/// GET /api/admin/settings - Read the recommendation settings.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<RecommendationSettings> {
    let settings = state
        .repo
        .get_settings_by_keys(&[RECOMMENDATION_COUNT_KEY])
        .await?;

    let recommendation_count = settings
        .iter()
        .find(|s| s.key == RECOMMENDATION_COUNT_KEY)
        .and_then(|s| s.value.trim().parse::<u32>().ok())
        .filter(|count| *count >= 1)
        .unwrap_or(DEFAULT_RECOMMENDATION_COUNT);

    success(RecommendationSettings {
        recommendation_count,
    })
}

/// POST /api/admin/settings - Store the recommendation settings.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> ApiResult<RecommendationSettings> {
    let recommendation_count = request
        .recommendation_count
        .and_then(|count| u32::try_from(count).ok())
        .filter(|count| *count >= 1)
        .ok_or_else(|| {
            AppError::Validation("recommendationCount must be a positive integer".to_string())
        })?;

    state
        .repo
        .set_setting(
            RECOMMENDATION_COUNT_KEY,
            &recommendation_count.to_string(),
            Some(RECOMMENDATION_COUNT_DESCRIPTION),
        )
        .await?;

    success(RecommendationSettings {
        recommendation_count,
    })
}

// ==================== STATS ====================

/// GET /api/admin/stats - Aggregate counts for the dashboard.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<DetailedStats> {
    success(state.repo.get_detailed_stats().await?)
}
