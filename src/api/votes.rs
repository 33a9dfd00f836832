//! Vote API endpoint.

use axum::{extract::State, http::HeaderMap, Json};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{VoteRequest, VoteResponse};
use crate::AppState;

/// Fingerprint recorded for voters that send no address headers.
const ANONYMOUS_VOTER: &str = "anonymous";

/// POST /api/vote - Add one vote to an idea.
pub async fn vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<VoteRequest>,
) -> ApiResult<VoteResponse> {
    let idea_id = request
        .idea_id
        .ok_or_else(|| AppError::Validation("Idea ID is required".to_string()))?;

    let voter = voter_fingerprint(&headers);
    let new_vote_count = state.repo.vote_for_idea(idea_id, &voter).await?;
    tracing::debug!("Vote for idea {} now at {}", idea_id, new_vote_count);

    success(VoteResponse {
        idea_id,
        new_vote_count,
    })
}

/// First `x-forwarded-for` entry, else `x-real-ip`, else a fixed placeholder.
pub fn voter_fingerprint(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(first) = header("x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return first.to_string();
    }

    header("x-real-ip")
        .unwrap_or(ANONYMOUS_VOTER)
        .to_string()
}
