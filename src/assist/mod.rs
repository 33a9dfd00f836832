//! Text generation features: prompt in, typed content out.
//!
//! Every feature makes exactly one completion call. Provider failures propagate as
//! [`LlmError`]; output that cannot be decoded is replaced by canned content and reported as a
//! [`Fallback`].

mod parse;
mod prompts;

pub use parse::{extract_field, parse_json, Fallback, Generation};

use std::sync::Arc;

use serde::Deserialize;

use crate::llm::{CompletionRequest, LlmBackend, LlmError};
use crate::models::{
    BrainstormRequest, ChatRequest, ConceptDraft, ElevatorPitch, ElevatorPitchRequest,
    FollowupQuestion, FollowupQuestions, FollowupQuestionsRequest, IdeaDraft, LeanCanvas,
    LeanCanvasRequest, Recommendation, RecommendationList, Technology, TechnologyRecommendation,
    Theme, ThemeRecommendation,
};
use parse::{parse_or_fallback, reject};

const GENERIC_IDEA_TITLE: &str = "Innovative business idea";
const GENERATION_FAILED: &str =
    "Sorry, the idea could not be generated. Please try again.";
const GENERIC_CONCEPT_TITLE: &str = "AI-generated business concept";
const TECH_IDEA_CONTENT: &str =
    "An innovative business solution built on technology. Please fill in the details manually.";
const LEAN_CANVAS_UNAVAILABLE: &str = "The analysis could not be generated. Please try again.";

/// Generation features on top of a text generation backend.
#[derive(Clone)]
pub struct Assistant {
    backend: Arc<dyn LlmBackend>,
}

impl Assistant {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Identifier of the backend in use.
    pub fn backend_id(&self) -> &str {
        self.backend.id()
    }

    async fn complete(&self, feature: &str, request: CompletionRequest) -> Result<String, LlmError> {
        tracing::debug!("Generating {} with {}", feature, self.backend.id());
        self.backend.complete(request).await
    }

    /// Title and content for an idea on the given theme names.
    pub async fn generate_idea_content(
        &self,
        themes: &[String],
    ) -> Result<Generation<IdeaDraft>, LlmError> {
        let text = self
            .complete("idea content", prompts::idea_content(themes))
            .await?;

        let fallback = |raw: &str| IdeaDraft {
            title: GENERIC_IDEA_TITLE.to_string(),
            content: if raw.trim().is_empty() {
                GENERATION_FAILED.to_string()
            } else {
                raw.to_string()
            },
        };

        Ok(match parse_json::<IdeaDraft>(&text) {
            Ok(draft) if !draft.title.trim().is_empty() && !draft.content.trim().is_empty() => {
                Ok(draft)
            }
            Ok(_) => Err(reject(
                "idea content",
                &text,
                "missing title or content".to_string(),
                fallback,
            )),
            Err(e) => Err(reject("idea content", &text, e.to_string(), fallback)),
        })
    }

    /// A longer business concept combining the given themes.
    pub async fn generate_concept(
        &self,
        themes: &[Theme],
    ) -> Result<Generation<ConceptDraft>, LlmError> {
        let text = self.complete("concept", prompts::concept(themes)).await?;
        Ok(parse_or_fallback("concept", &text, |raw| ConceptDraft {
            title: GENERIC_CONCEPT_TITLE.to_string(),
            description: raw.to_string(),
        }))
    }

    /// Three short idea recommendations for the given themes.
    pub async fn recommend_ideas(
        &self,
        themes: &[Theme],
    ) -> Result<Generation<RecommendationList>, LlmError> {
        /// Models answer with a bare array or with the wrapped object.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Reply {
            List(Vec<Recommendation>),
            Wrapped(RecommendationList),
        }

        let text = self
            .complete("recommendations", prompts::recommendations(themes))
            .await?;

        Ok(match parse_json::<Reply>(&text) {
            Ok(Reply::List(recommendations)) => Ok(RecommendationList { recommendations }),
            Ok(Reply::Wrapped(list)) => Ok(list),
            Err(e) => Err(reject("recommendations", &text, e.to_string(), |_| {
                canned_recommendations()
            })),
        })
    }

    /// An idea built on the given technologies.
    pub async fn generate_tech_idea(
        &self,
        technologies: &[Technology],
        additional_context: Option<&str>,
    ) -> Result<Generation<IdeaDraft>, LlmError> {
        let names = if technologies.is_empty() {
            "the selected technologies".to_string()
        } else {
            technologies
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let default_title = format!("Business idea built on {}", names);

        let text = self
            .complete("tech idea", prompts::tech_idea(&names, additional_context))
            .await?;

        let parsed = match parse_json::<serde_json::Value>(&text) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => {
                return Ok(Err(reject(
                    "tech idea",
                    &text,
                    "expected a JSON object".to_string(),
                    |raw| extracted_draft(raw, &default_title),
                )))
            }
            Err(e) => {
                return Ok(Err(reject("tech idea", &text, e.to_string(), |raw| {
                    extracted_draft(raw, &default_title)
                })))
            }
        };

        let title = parsed
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let content = parsed.get("content").map(flatten_content).unwrap_or_default();

        if title.is_empty() || content.trim().is_empty() {
            let partial = IdeaDraft {
                title: if title.is_empty() { default_title } else { title },
                content: if content.trim().is_empty() {
                    TECH_IDEA_CONTENT.to_string()
                } else {
                    content
                },
            };
            return Ok(Err(reject(
                "tech idea",
                &text,
                "missing title or content".to_string(),
                |_| partial,
            )));
        }

        Ok(Ok(IdeaDraft { title, content }))
    }

    /// Themes that fit an idea, `count` of them.
    pub async fn recommend_themes(
        &self,
        idea: &IdeaDraft,
        themes: &[Theme],
        count: u32,
    ) -> Result<Generation<ThemeRecommendation>, LlmError> {
        let text = self
            .complete(
                "theme recommendation",
                prompts::recommend_themes(idea, themes, count),
            )
            .await?;
        Ok(parse_or_fallback("theme recommendation", &text, |raw| {
            ThemeRecommendation {
                reasoning: raw.to_string(),
                ..Default::default()
            }
        }))
    }

    /// Technologies that fit an idea.
    pub async fn recommend_technologies(
        &self,
        idea: &IdeaDraft,
        technologies: &[Technology],
    ) -> Result<Generation<TechnologyRecommendation>, LlmError> {
        let text = self
            .complete(
                "technology recommendation",
                prompts::recommend_technologies(idea, technologies),
            )
            .await?;
        Ok(parse_or_fallback("technology recommendation", &text, |raw| {
            TechnologyRecommendation {
                reasoning: raw.to_string(),
                ..Default::default()
            }
        }))
    }

    /// Break an idea down into lean canvas elements.
    pub async fn analyze_lean_canvas(
        &self,
        request: &LeanCanvasRequest,
    ) -> Result<Generation<LeanCanvas>, LlmError> {
        let text = self
            .complete("lean canvas", prompts::lean_canvas(request))
            .await?;
        Ok(parse_or_fallback("lean canvas", &text, |_| LeanCanvas {
            problem: LEAN_CANVAS_UNAVAILABLE.to_string(),
            target_customer: LEAN_CANVAS_UNAVAILABLE.to_string(),
            solution: LEAN_CANVAS_UNAVAILABLE.to_string(),
            unique_value_proposition: LEAN_CANVAS_UNAVAILABLE.to_string(),
            market_opportunity: LEAN_CANVAS_UNAVAILABLE.to_string(),
        }))
    }

    /// A nine-part elevator pitch plus its key talking points.
    pub async fn generate_elevator_pitch(
        &self,
        request: &ElevatorPitchRequest,
        idea: &IdeaDraft,
    ) -> Result<Generation<ElevatorPitch>, LlmError> {
        let text = self
            .complete("elevator pitch", prompts::elevator_pitch(request, idea))
            .await?;
        Ok(parse_or_fallback("elevator pitch", &text, |raw| ElevatorPitch {
            elevator_pitch: raw.to_string(),
            pitch_points: canned_pitch_points(),
        }))
    }

    /// Three questions that continue a brainstorming conversation.
    pub async fn generate_followup_questions(
        &self,
        request: &FollowupQuestionsRequest,
    ) -> Result<Generation<FollowupQuestions>, LlmError> {
        let text = self
            .complete("follow-up questions", prompts::followup_questions(request))
            .await?;

        Ok(match parse_json::<FollowupQuestions>(&text) {
            Ok(parsed) if !parsed.questions.is_empty() => Ok(parsed),
            Ok(_) => Err(reject(
                "follow-up questions",
                &text,
                "no questions".to_string(),
                |_| canned_questions(),
            )),
            Err(e) => Err(reject("follow-up questions", &text, e.to_string(), |_| {
                canned_questions()
            })),
        })
    }

    /// Free-text advice on an idea.
    pub async fn brainstorm(&self, request: &BrainstormRequest) -> Result<String, LlmError> {
        self.complete(
            "brainstorm advice",
            prompts::brainstorm(&request.title, &request.content, request.question.as_deref()),
        )
        .await
    }

    /// One conversational reply about an idea.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.complete("chat reply", prompts::chat(request)).await
    }
}

/// Render object-valued content as `【key】` sections.
fn flatten_content(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_str()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("【{}】\n{}", key, v))
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn extracted_draft(raw: &str, default_title: &str) -> IdeaDraft {
    IdeaDraft {
        title: extract_field(raw, "title").unwrap_or_else(|| default_title.to_string()),
        content: extract_field(raw, "content").unwrap_or_else(|| TECH_IDEA_CONTENT.to_string()),
    }
}

fn canned_recommendations() -> RecommendationList {
    let items = [
        (
            "Smart Health Monitor",
            "IoT-enabled health tracking for chronic disease management",
        ),
        ("AI Diagnostic Tool", "Machine learning for early disease detection"),
        ("Secure Telemedicine", "Privacy-first video consultation platform"),
    ];
    RecommendationList {
        recommendations: items
            .iter()
            .map(|(title, description)| Recommendation {
                title: title.to_string(),
                description: description.to_string(),
            })
            .collect(),
    }
}

fn canned_pitch_points() -> Vec<String> {
    [
        "A clear problem and the size of the market",
        "The unique solution and its advantages",
        "Target customers and the business model",
        "Technical feasibility and differentiation",
        "Growth strategy and path to profitability",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

fn canned_questions() -> FollowupQuestions {
    let questions = [
        "How exactly would you solve this problem?",
        "What resources do you need to make it happen?",
        "What sets you apart from competitors?",
    ];
    FollowupQuestions {
        questions: questions
            .iter()
            .enumerate()
            .map(|(i, q)| FollowupQuestion {
                id: (i + 1).to_string(),
                question: q.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::ScriptedBackend;

    fn assistant(backend: ScriptedBackend) -> (Assistant, Arc<ScriptedBackend>) {
        let backend = Arc::new(backend);
        (Assistant::new(backend.clone()), backend)
    }

    fn technology(id: i64, name: &str) -> Technology {
        Technology {
            id,
            name: name.to_string(),
            category: None,
            maturity_level: None,
            description: format!("{} description", name),
            use_cases: None,
            performance_metrics: None,
            image_url: None,
            created_at: "2026-01-01T00:00:00.000000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_idea_content_parses_fenced_json() {
        let (assistant, backend) = assistant(ScriptedBackend::new(
            "```json\n{\"title\": \"Farm sensors\", \"content\": \"Measure soil\"}\n```",
        ));

        let draft = assistant
            .generate_idea_content(&["Agriculture".to_string()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(draft.title, "Farm sensors");
        assert_eq!(backend.requests().len(), 1);
        assert!(backend.last_request().unwrap().prompt.contains("Agriculture"));
    }

    #[tokio::test]
    async fn test_idea_content_falls_back_to_raw_text() {
        let (assistant, _) = assistant(ScriptedBackend::new("Just build a farm robot."));

        let fallback = assistant
            .generate_idea_content(&["Agriculture".to_string()])
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(fallback.content.title, GENERIC_IDEA_TITLE);
        assert_eq!(fallback.content.content, "Just build a farm robot.");
    }

    #[tokio::test]
    async fn test_idea_content_empty_output_apologizes() {
        let (assistant, _) = assistant(ScriptedBackend::new("{\"title\": \"\", \"content\": \"\"}"));

        let fallback = assistant
            .generate_idea_content(&["AI".to_string()])
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(fallback.content.title, GENERIC_IDEA_TITLE);
    }

    #[tokio::test]
    async fn test_llm_errors_propagate() {
        let (assistant, _) = assistant(ScriptedBackend::default().fail(LlmError::RateLimited));

        let result = assistant.generate_idea_content(&["AI".to_string()]).await;
        assert!(matches!(result, Err(LlmError::RateLimited)));
    }

    #[tokio::test]
    async fn test_recommendations_accept_bare_array() {
        let (assistant, _) = assistant(ScriptedBackend::new(
            r#"[{"title": "A", "description": "a"}, {"title": "B", "description": "b"}]"#,
        ));

        let list = assistant.recommend_ideas(&[]).await.unwrap().unwrap();
        assert_eq!(list.recommendations.len(), 2);
    }

    #[tokio::test]
    async fn test_recommendations_fallback_is_canned() {
        let (assistant, _) = assistant(ScriptedBackend::new("three ideas, trust me"));

        let fallback = assistant.recommend_ideas(&[]).await.unwrap().unwrap_err();
        assert_eq!(fallback.content.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn test_tech_idea_flattens_object_content() {
        let (assistant, _) = assistant(ScriptedBackend::new(
            r#"{"title": "Edge farm", "content": {"Problem": "Water waste", "Solution": "Edge AI", "Empty": " "}}"#,
        ));

        let draft = assistant
            .generate_tech_idea(&[technology(1, "Edge AI")], None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(draft.title, "Edge farm");
        assert_eq!(draft.content, "【Problem】\nWater waste\n\n【Solution】\nEdge AI");
    }

    #[tokio::test]
    async fn test_tech_idea_extracts_fields_from_broken_json() {
        let (assistant, _) = assistant(ScriptedBackend::new(
            r#"{"title": "Drone farm", "content": "Drones spray crops"#,
        ));

        let fallback = assistant
            .generate_tech_idea(&[technology(1, "Drones")], Some("cheap hardware"))
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(fallback.content.title, "Drone farm");
        assert_eq!(fallback.content.content, "Drones spray crops");
    }

    #[tokio::test]
    async fn test_tech_idea_default_title_names_technologies() {
        let (assistant, _) = assistant(ScriptedBackend::new("nothing useful"));

        let fallback = assistant
            .generate_tech_idea(&[technology(1, "IoT"), technology(2, "5G")], None)
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(fallback.content.title, "Business idea built on IoT, 5G");
        assert_eq!(fallback.content.content, TECH_IDEA_CONTENT);
    }

    #[tokio::test]
    async fn test_recommend_themes_uses_count() {
        let (assistant, backend) = assistant(ScriptedBackend::new(
            r#"{"recommendedIds": [2], "reasoning": "fits", "hypotheses": {"2": "grows"}}"#,
        ));
        let idea = IdeaDraft {
            title: "Smart Irrigation".to_string(),
            content: "Soil sensors".to_string(),
        };

        let recommendation = assistant
            .recommend_themes(&idea, &[], 3)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(recommendation.recommended_ids, vec![2]);
        assert!(backend
            .last_request()
            .unwrap()
            .prompt
            .contains("Recommend the 3 business theme(s)"));
    }

    #[tokio::test]
    async fn test_recommend_technologies_fallback_keeps_text() {
        let (assistant, _) = assistant(ScriptedBackend::new("Use blockchain."));
        let idea = IdeaDraft::default();

        let fallback = assistant
            .recommend_technologies(&idea, &[])
            .await
            .unwrap()
            .unwrap_err();
        assert!(fallback.content.recommended_ids.is_empty());
        assert_eq!(fallback.content.reasoning, "Use blockchain.");
    }

    #[tokio::test]
    async fn test_followup_questions_fallback_when_empty() {
        let (assistant, _) = assistant(ScriptedBackend::new(r#"{"questions": []}"#));
        let request = FollowupQuestionsRequest {
            conversation_history: vec![],
            idea_title: String::new(),
            idea_content: String::new(),
            selected_themes: vec![],
            selected_technologies: vec![],
            is_idea_first: true,
            is_technology_first: false,
        };

        let fallback = assistant
            .generate_followup_questions(&request)
            .await
            .unwrap()
            .unwrap_err();
        let ids: Vec<&str> = fallback.content.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_elevator_pitch_fallback_has_five_points() {
        let (assistant, _) = assistant(ScriptedBackend::new("For farmers who..."));
        let request = ElevatorPitchRequest {
            selected_themes: vec![],
            selected_technologies: vec![],
            idea_data: None,
            additional_context: None,
        };

        let fallback = assistant
            .generate_elevator_pitch(&request, &IdeaDraft::default())
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(fallback.content.elevator_pitch, "For farmers who...");
        assert_eq!(fallback.content.pitch_points.len(), 5);
    }

    #[test]
    fn test_flatten_content_variants() {
        assert_eq!(flatten_content(&serde_json::json!("plain")), "plain");
        assert_eq!(flatten_content(&serde_json::json!(null)), "");
        assert_eq!(flatten_content(&serde_json::json!(42)), "42");
    }
}
