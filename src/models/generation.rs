//! Request and response bodies of the text generation endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A message of a brainstorming conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }
}

/// Title and body of an idea being worked on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdeaDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Request body for `POST /api/generate-idea-content`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateIdeaContentRequest {
    #[serde(default)]
    pub themes: Vec<String>,
}

/// Request body for `POST /api/generate-ideas` and `POST /api/get-recommendations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSelectionRequest {
    #[serde(default)]
    pub selected_themes: Vec<i64>,
}

/// Request body for `POST /api/generate-tech-idea`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTechIdeaRequest {
    #[serde(default)]
    pub technologies: Vec<i64>,
    #[serde(default)]
    pub additional_context: Option<String>,
}

/// Request body for `POST /api/recommend-themes` and `POST /api/recommend-technologies`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaDataRequest {
    #[serde(default)]
    pub idea_data: Option<IdeaDraft>,
}

/// Request body for `POST /api/analyze-lean-canvas`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeanCanvasRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Request body for `POST /api/generate-elevator-pitch`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevatorPitchRequest {
    #[serde(default)]
    pub selected_themes: Vec<String>,
    #[serde(default)]
    pub selected_technologies: Vec<String>,
    #[serde(default)]
    pub idea_data: Option<IdeaDraft>,
    #[serde(default)]
    pub additional_context: Option<String>,
}

/// Request body for `POST /api/generate-followup-questions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowupQuestionsRequest {
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
    #[serde(default)]
    pub idea_title: String,
    #[serde(default)]
    pub idea_content: String,
    #[serde(default)]
    pub selected_themes: Vec<String>,
    #[serde(default)]
    pub selected_technologies: Vec<String>,
    #[serde(default)]
    pub is_idea_first: bool,
    #[serde(default)]
    pub is_technology_first: bool,
}

/// Request body for `POST /api/brainstorm`.
#[derive(Debug, Clone, Deserialize)]
pub struct BrainstormRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub question: Option<String>,
}

/// Request body for `POST /api/ai-brainstorming`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub idea_title: String,
    #[serde(default)]
    pub idea_content: String,
    #[serde(default)]
    pub selected_themes: Vec<String>,
    #[serde(default)]
    pub selected_technologies: Vec<String>,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

/// A generated business concept with a longer description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConceptDraft {
    pub title: String,
    pub description: String,
}

/// A short idea recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

/// Response body of `POST /api/get-recommendations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationList {
    pub recommendations: Vec<Recommendation>,
}

/// Themes suggested for an idea, with a hypothesis per theme id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRecommendation {
    #[serde(default, deserialize_with = "lenient_ids")]
    pub recommended_ids: Vec<i64>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub hypotheses: BTreeMap<String, String>,
}

/// Technologies suggested for an idea, with the expected contribution per technology id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyRecommendation {
    #[serde(default, deserialize_with = "lenient_ids")]
    pub recommended_ids: Vec<i64>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub contributions: BTreeMap<String, String>,
}

/// An idea broken down into lean canvas elements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeanCanvas {
    pub problem: String,
    pub target_customer: String,
    pub solution: String,
    pub unique_value_proposition: String,
    pub market_opportunity: String,
}

/// Response body of `POST /api/analyze-lean-canvas`.
#[derive(Debug, Clone, Serialize)]
pub struct LeanCanvasResponse {
    pub analysis: LeanCanvas,
    pub fallback: bool,
}

/// A pitch in the nine-part template plus its key talking points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevatorPitch {
    pub elevator_pitch: String,
    #[serde(default)]
    pub pitch_points: Vec<String>,
}

/// A suggested question to continue a brainstorming conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowupQuestion {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub question: String,
}

/// Response body of `POST /api/generate-followup-questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowupQuestions {
    pub questions: Vec<FollowupQuestion>,
}

/// Response body of `POST /api/brainstorm`.
#[derive(Debug, Clone, Serialize)]
pub struct BrainstormAdvice {
    pub advice: String,
}

/// Response body of `POST /api/ai-brainstorming`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
}

/// Generated content plus whether it came from the model or a canned substitute.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedResponse<T: Serialize> {
    #[serde(flatten)]
    pub content: T,
    pub fallback: bool,
}

/// Model output sometimes quotes numeric ids; accept both `3` and `"3"`.
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|value| {
            let id = match &value {
                serde_json::Value::Number(n) => n.as_i64(),
                serde_json::Value::String(s) => s.trim().parse().ok(),
                _ => None,
            };
            id.ok_or_else(|| serde::de::Error::custom(format!("invalid id: {}", value)))
        })
        .collect()
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}
