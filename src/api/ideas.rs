//! Idea API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{require_text, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateIdeaRequest, DetailedIdea, IdeaDetailParams, IdeaListParams, IdeaListQuery,
    IdeaListResponse, IdeaView, NewIdea, Pagination,
};
use crate::AppState;

/// GET /api/ideas - List one page of ideas.
pub async fn list_ideas(
    State(state): State<AppState>,
    Query(params): Query<IdeaListParams>,
) -> ApiResult<IdeaListResponse> {
    let query = IdeaListQuery::from(params);
    let page = state.repo.list_ideas(&query).await?;

    success(IdeaListResponse {
        pagination: Pagination::new(page.page, page.limit, page.total),
        ideas: page.ideas,
    })
}

/// POST /api/ideas - Create an idea with its theme and technology links.
pub async fn create_idea(
    State(state): State<AppState>,
    Json(request): Json<CreateIdeaRequest>,
) -> ApiResult<DetailedIdea> {
    require_text(&request.title, "Title is required")?;
    require_text(&request.content, "Content is required")?;
    require_text(&request.username, "Username is required")?;

    let idea = NewIdea {
        title: request.title.trim().to_string(),
        content: request.content.trim().to_string(),
        username: request.username.trim().to_string(),
    };

    let created = state
        .repo
        .create_idea(&idea, &request.theme_ids, &request.technology_ids)
        .await?;
    success(created)
}

/// GET /api/ideas/{id} - Get one idea, detailed unless `?detailed=false`.
pub async fn get_idea(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<IdeaDetailParams>,
) -> ApiResult<IdeaView> {
    let not_found = || AppError::NotFound(format!("Idea {} not found", id));

    let view = if params.detailed {
        IdeaView::Detailed(state.repo.get_detailed_idea(id).await?.ok_or_else(not_found)?)
    } else {
        IdeaView::Summary(state.repo.get_idea(id).await?.ok_or_else(not_found)?)
    };
    success(view)
}
