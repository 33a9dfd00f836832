//! Text generation API endpoints.
//!
//! Inputs are validated before any database or provider call. Content that had to be replaced
//! by a canned substitute is flagged with `"fallback": true`.

use axum::{extract::State, Json};

use super::{require_text, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    BrainstormAdvice, BrainstormRequest, ChatReply, ChatRequest, ConceptDraft, ElevatorPitch,
    ElevatorPitchRequest, FollowupQuestions, FollowupQuestionsRequest, GenerateIdeaContentRequest,
    GenerateTechIdeaRequest, GeneratedResponse, IdeaDataRequest, IdeaDraft, LeanCanvasRequest,
    LeanCanvasResponse, RecommendationList, TechnologyRecommendation, Theme,
    ThemeRecommendation, ThemeSelectionRequest,
};
use crate::AppState;

/// POST /api/generate-idea-content - Idea title and content from theme names.
pub async fn generate_idea_content(
    State(state): State<AppState>,
    Json(request): Json<GenerateIdeaContentRequest>,
) -> ApiResult<GeneratedResponse<IdeaDraft>> {
    let themes: Vec<String> = request
        .themes
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if themes.is_empty() {
        return Err(AppError::Validation(
            "Select at least one theme".to_string(),
        ));
    }

    let generation = state.assistant.generate_idea_content(&themes).await?;
    success(generation.into())
}

/// POST /api/generate-ideas - A business concept from selected theme ids.
pub async fn generate_ideas(
    State(state): State<AppState>,
    Json(request): Json<ThemeSelectionRequest>,
) -> ApiResult<GeneratedResponse<ConceptDraft>> {
    let themes = selected_themes(&state, &request).await?;
    let generation = state.assistant.generate_concept(&themes).await?;
    success(generation.into())
}

/// POST /api/get-recommendations - Three short idea recommendations for selected themes.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Json(request): Json<ThemeSelectionRequest>,
) -> ApiResult<GeneratedResponse<RecommendationList>> {
    let themes = selected_themes(&state, &request).await?;
    let generation = state.assistant.recommend_ideas(&themes).await?;
    success(generation.into())
}

/// POST /api/generate-tech-idea - An idea built on selected technologies.
pub async fn generate_tech_idea(
    State(state): State<AppState>,
    Json(request): Json<GenerateTechIdeaRequest>,
) -> ApiResult<GeneratedResponse<IdeaDraft>> {
    if request.technologies.is_empty() {
        return Err(AppError::Validation(
            "Select at least one technology".to_string(),
        ));
    }

    let technologies = state
        .repo
        .get_technologies_by_ids(&request.technologies)
        .await?;
    let generation = state
        .assistant
        .generate_tech_idea(&technologies, request.additional_context.as_deref())
        .await?;
    success(generation.into())
}

/// POST /api/recommend-themes - Business themes that fit an idea.
pub async fn recommend_themes(
    State(state): State<AppState>,
    Json(request): Json<IdeaDataRequest>,
) -> ApiResult<GeneratedResponse<ThemeRecommendation>> {
    let idea = required_idea(request.idea_data)?;

    let count = state.repo.recommendation_count().await?;
    let themes = state.repo.list_themes().await?;
    let generation = state
        .assistant
        .recommend_themes(&idea, &themes, count)
        .await?;
    success(generation.into())
}

/// POST /api/recommend-technologies - Technologies that fit an idea.
pub async fn recommend_technologies(
    State(state): State<AppState>,
    Json(request): Json<IdeaDataRequest>,
) -> ApiResult<GeneratedResponse<TechnologyRecommendation>> {
    let idea = required_idea(request.idea_data)?;

    let technologies = state.repo.list_technologies().await?;
    let generation = state
        .assistant
        .recommend_technologies(&idea, &technologies)
        .await?;
    success(generation.into())
}

/// POST /api/analyze-lean-canvas - Lean canvas breakdown of an idea.
pub async fn analyze_lean_canvas(
    State(state): State<AppState>,
    Json(request): Json<LeanCanvasRequest>,
) -> ApiResult<LeanCanvasResponse> {
    require_text(&request.title, "Title is required")?;
    require_text(&request.content, "Content is required")?;

    let response = match state.assistant.analyze_lean_canvas(&request).await? {
        Ok(analysis) => LeanCanvasResponse {
            analysis,
            fallback: false,
        },
        Err(fallback) => LeanCanvasResponse {
            analysis: fallback.content,
            fallback: true,
        },
    };
    success(response)
}

/// POST /api/generate-elevator-pitch - Elevator pitch and talking points for an idea.
pub async fn generate_elevator_pitch(
    State(state): State<AppState>,
    Json(request): Json<ElevatorPitchRequest>,
) -> ApiResult<GeneratedResponse<ElevatorPitch>> {
    let idea = required_idea(request.idea_data.clone())?;
    let generation = state
        .assistant
        .generate_elevator_pitch(&request, &idea)
        .await?;
    success(generation.into())
}

/// POST /api/generate-followup-questions - Questions that continue a conversation.
pub async fn generate_followup_questions(
    State(state): State<AppState>,
    Json(request): Json<FollowupQuestionsRequest>,
) -> ApiResult<GeneratedResponse<FollowupQuestions>> {
    tracing::debug!(
        "Follow-up questions requested after {} messages",
        request.conversation_history.len()
    );
    let generation = state
        .assistant
        .generate_followup_questions(&request)
        .await?;
    success(generation.into())
}

/// POST /api/brainstorm - Advice on improving an idea.
pub async fn brainstorm(
    State(state): State<AppState>,
    Json(request): Json<BrainstormRequest>,
) -> ApiResult<BrainstormAdvice> {
    require_text(&request.title, "Title is required")?;
    require_text(&request.content, "Content is required")?;

    let advice = state.assistant.brainstorm(&request).await?;
    success(BrainstormAdvice { advice })
}

/// POST /api/ai-brainstorming - One reply in a brainstorming chat.
pub async fn ai_brainstorming(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<ChatReply> {
    require_text(&request.message, "Message is required")?;

    let response = state.assistant.chat(&request).await?;
    success(ChatReply { response })
}

/// Resolve the selected theme ids, rejecting an empty or entirely unknown selection.
async fn selected_themes(
    state: &AppState,
    request: &ThemeSelectionRequest,
) -> Result<Vec<Theme>, AppError> {
    if request.selected_themes.is_empty() {
        return Err(AppError::Validation("No themes selected".to_string()));
    }

    let themes = state.repo.get_themes_by_ids(&request.selected_themes).await?;
    if themes.is_empty() {
        return Err(AppError::Validation(
            "None of the selected themes exist".to_string(),
        ));
    }
    Ok(themes)
}

fn required_idea(idea: Option<IdeaDraft>) -> Result<IdeaDraft, AppError> {
    let idea = idea.ok_or_else(|| AppError::Validation("ideaData is required".to_string()))?;
    require_text(&idea.title, "ideaData.title is required")?;
    require_text(&idea.content, "ideaData.content is required")?;
    Ok(idea)
}
