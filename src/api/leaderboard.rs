//! Leaderboard API endpoint.

use axum::extract::{Query, State};

use super::{success, ApiResult};
use crate::models::{LeaderboardParams, LeaderboardResponse, Timeframe};
use crate::AppState;

const DEFAULT_LEADERBOARD_SIZE: i64 = 10;

/// GET /api/leaderboard - Top ideas by votes.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> ApiResult<LeaderboardResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LEADERBOARD_SIZE);
    let timeframe = params
        .timeframe
        .as_deref()
        .map(Timeframe::parse)
        .unwrap_or_default();

    let ideas = state.repo.get_leaderboard(limit, timeframe).await?;
    success(LeaderboardResponse { ideas })
}
