//! Prompt construction for each generation feature.

use crate::llm::CompletionRequest;
use crate::models::{
    ChatMessage, ChatRequest, ElevatorPitchRequest, FollowupQuestionsRequest, IdeaDraft,
    LeanCanvasRequest, Technology, Theme,
};

/// Output cap for conversational replies.
pub const CHAT_MAX_TOKENS: u32 = 500;

const IDEA_CONTENT_SYSTEM: &str = r#"You are a startup coach who applies lean startup methods. Generate a practical, innovative business idea.

Answer only with JSON in exactly this shape:
{
  "title": "A specific, attractive idea title",
  "content": "Detailed description covering the problem, solution, target customer and value proposition"
}"#;

const TECH_IDEA_SYSTEM: &str = r#"You are a startup coach for technology ventures who applies lean startup methods. Generate a practical, innovative business idea that puts the given technologies to work.

Answer with JSON in this shape:
{
  "title": "A specific, attractive title for the technology-driven idea",
  "content": "Detailed description covering how the technology is used, the problem, the target customer and the value proposition"
}"#;

pub fn idea_content(themes: &[String]) -> CompletionRequest {
    let prompt = format!(
        r#"Selected themes: {}

Generate an innovative business idea based on these themes. Cover:
- The specific problem being solved
- The proposed solution
- The target customer
- The unique value proposition
- The market opportunity

Follow lean startup principles: the idea must be testable and feasible."#,
        themes.join(", ")
    );
    CompletionRequest::new(prompt).with_system(IDEA_CONTENT_SYSTEM)
}

pub fn concept(themes: &[Theme]) -> CompletionRequest {
    let prompt = format!(
        r#"You are an expert business consultant helping entrepreneurs create compelling business ideas for startup studio applications.

Generate a business idea that combines these themes: {}

The business idea should be:
- Innovative and technically feasible
- Suitable for a startup studio environment
- Backed by clear market potential
- Aimed at real problems in the selected theme areas
- Fundable at pre-seed to seed stage

Provide:
1. A compelling business title (max 60 characters)
2. A detailed business description (200-300 words) covering the problem, target market, value proposition, key features, business model and competitive advantage

Format your response as JSON with "title" and "description" fields."#,
        describe_themes(themes)
    );
    CompletionRequest::new(prompt).with_temperature(0.8)
}

pub fn recommendations(themes: &[Theme]) -> CompletionRequest {
    let prompt = format!(
        r#"Generate 3 concise business idea recommendations for these themes: {}

Each recommendation needs:
- A short, catchy title (max 30 characters)
- A brief description (max 80 characters)
- A startup-ready focus

Format as a JSON array of objects with "title" and "description" fields."#,
        describe_themes(themes)
    );
    CompletionRequest::new(prompt).with_temperature(0.9)
}

pub fn tech_idea(technology_names: &str, additional_context: Option<&str>) -> CompletionRequest {
    let context = match additional_context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "\n\nAdditional context from a brainstorming session:\n{}\n\nTake this context into account.",
            context
        ),
        None => String::new(),
    };
    let prompt = format!(
        r#"Selected technologies: {}{}

Generate an innovative business idea built on these technologies. Cover:
- How the technology is applied
- The specific problem being solved
- The business solution
- The target customer
- The value the technology uniquely enables
- The market opportunity

Follow lean startup principles: the idea must be technically testable and feasible."#,
        technology_names, context
    );
    CompletionRequest::new(prompt).with_system(TECH_IDEA_SYSTEM)
}

pub fn recommend_themes(idea: &IdeaDraft, themes: &[Theme], count: u32) -> CompletionRequest {
    let system = r#"You are a business consultant. Recommend the business themes that best fit an idea.

Answer with JSON in this shape:
{
  "recommendedIds": [1, 3],
  "reasoning": "Why these themes were chosen",
  "hypotheses": {
    "1": "Hypothesis on how this theme contributes to the business",
    "3": "Hypothesis on how this theme contributes to the business"
  }
}"#;
    let catalog = themes
        .iter()
        .map(|t| format!("ID: {}, Name: {}, Description: {}", t.id, t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = format!(
        r#"Idea:
Title: {}
Content: {}

Available business themes:
{}

Recommend the {} business theme(s) that fit this idea best, with a hypothesis for each on how it contributes to the business."#,
        idea.title, idea.content, catalog, count
    );
    CompletionRequest::new(prompt).with_system(system)
}

pub fn recommend_technologies(idea: &IdeaDraft, technologies: &[Technology]) -> CompletionRequest {
    let system = r#"You are a technology consultant. Recommend the technologies that best fit a business idea and explain how each would contribute.

Answer with JSON in this shape:
{
  "recommendedIds": [1, 3, 5],
  "reasoning": "Why these technologies were chosen",
  "contributions": {
    "1": "Concrete hypothesis on how this technology creates value",
    "3": "Concrete hypothesis on how this technology creates value",
    "5": "Concrete hypothesis on how this technology creates value"
  }
}"#;
    let catalog = technologies
        .iter()
        .map(|t| format!("ID: {}, Name: {}, Description: {}", t.id, t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = format!(
        r#"Business idea:
Title: {}
Content: {}

Available technologies:
{}

Recommend 3-5 technologies that fit this idea best. For each, give a concrete hypothesis on how it creates business value and competitive advantage."#,
        idea.title, idea.content, catalog
    );
    CompletionRequest::new(prompt).with_system(system)
}

pub fn lean_canvas(request: &LeanCanvasRequest) -> CompletionRequest {
    let prompt = format!(
        r#"You are a lean startup expert. Break the following business idea down into lean canvas elements.

Idea title: {}
Idea content: {}
Business themes: {}
Technologies: {}

Analyze these five elements in 2-3 sentences each:
1. Problem: the specific problem the idea addresses
2. Target customer: the customer segment that has this problem
3. Solution: how the idea solves the problem
4. Unique value proposition: what sets it apart from competitors
5. Market opportunity: market size, growth and timing

Answer with JSON:
{{
  "problem": "...",
  "targetCustomer": "...",
  "solution": "...",
  "uniqueValueProposition": "...",
  "marketOpportunity": "..."
}}"#,
        request.title,
        request.content,
        request.themes.join(", "),
        request.technologies.join(", ")
    );
    CompletionRequest::new(prompt)
}

pub fn elevator_pitch(request: &ElevatorPitchRequest, idea: &IdeaDraft) -> CompletionRequest {
    let context = request
        .additional_context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let mut prompt = format!(
        r#"Write an elevator pitch for the following business idea in the format given below.

Business idea: {}
Details: {}
Business themes: {}
Technologies: {}"#,
        idea.title,
        idea.content,
        request.selected_themes.join(", "),
        request.selected_technologies.join(", ")
    );

    if let Some(context) = context {
        prompt.push_str("\n\nAdditional context from a brainstorming session:\n");
        prompt.push_str(context);
    }

    prompt.push_str(
        r#"

Use this format:

For [❷ target users] who want to [❶ latent need or problem], [❸ product name] is a [❹ product category] that [❺ key benefit, a compelling reason to pay]. Unlike [❻ the most conservative alternative], it has [❼ the decisive differentiator]. And because [❽ track record or strengths plus company name], we have [❾ why we are the ones to do it, our unfair advantage].

Requirements:
- Fill every element (❶ to ❾) with specific, convincing content
- Make it resonate with investors and startup studios
- Reflect lean startup thinking"#,
    );
    if context.is_some() {
        prompt.push_str("\n- Use the insights from the brainstorming context");
    }

    prompt.push_str(
        r#"

Also list the 5 key points the pitch must get across.

Answer with JSON:
{
  "elevatorPitch": "The pitch in the format above",
  "pitchPoints": ["Point 1", "Point 2", "Point 3", "Point 4", "Point 5"]
}"#,
    );
    CompletionRequest::new(prompt)
}

pub fn followup_questions(request: &FollowupQuestionsRequest) -> CompletionRequest {
    let flow = if request.is_idea_first {
        "idea first"
    } else if request.is_technology_first {
        "technology first"
    } else {
        "general"
    };

    let mut context = vec![
        format!("- Flow: {}", flow),
        format!("- Idea: {}", request.idea_title),
        format!("- Content: {}", request.idea_content),
    ];
    if !request.selected_themes.is_empty() {
        context.push(format!("- Business themes: {}", request.selected_themes.join(", ")));
    }
    if !request.selected_technologies.is_empty() {
        context.push(format!(
            "- Technologies: {}",
            request.selected_technologies.join(", ")
        ));
    }

    let conversation = transcript(&request.conversation_history, "Question", "Answer", "\n\n");

    let prompt = format!(
        r#"Analyze the conversation below and suggest 3 questions that dig deeper.

[Context]
{}

[Conversation]
{}

[Requirements]
- Build on what was discussed; make the questions specific and practical
- Aim at turning the idea into a business or an implementation
- Keep each question short (under 50 characters where possible)
- Answer with plain JSON that a JSON parser accepts, not markdown:
{{"questions": [{{"id": "1", "question": "..."}}, {{"id": "2", "question": "..."}}, {{"id": "3", "question": "..."}}]}}"#,
        context.join("\n"),
        conversation
    );
    CompletionRequest::new(prompt)
}

pub fn brainstorm(title: &str, content: &str, question: Option<&str>) -> CompletionRequest {
    let question = question
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or("Help me improve this business idea");
    let prompt = format!(
        r#"You are an expert business advisor helping refine a startup idea.

Business idea: "{}"
Current description: "{}"

User question or request: "{}"

Give specific, actionable advice to improve this business concept. Focus on:
- Market validation strategies
- Revenue model optimization
- Competitive differentiation
- Technical feasibility
- Go-to-market approach
- Potential challenges and solutions

Keep the answer concise but insightful (150-200 words)."#,
        title, content, question
    );
    CompletionRequest::new(prompt)
}

pub fn chat(request: &ChatRequest) -> CompletionRequest {
    let system = format!(
        r#"You are a sparring partner for creative business ideas. Hold a constructive, insightful discussion about the user's idea.

Current idea:
Title: {}
Content: {}

Selected themes: {}
Selected technologies: {}

When you answer:
- Give concrete, practical advice
- Offer new perspectives and possibilities
- Point out potential challenges and improvements
- Discuss marketability and feasibility
- Ask questions that deepen the user's thinking

Keep answers concise and easy to follow."#,
        request.idea_title,
        request.idea_content,
        request.selected_themes.join(", "),
        request.selected_technologies.join(", ")
    );

    let history = transcript(&request.chat_history, "User", "AI", "\n");
    let prompt = if history.is_empty() {
        format!("Current question: {}", request.message)
    } else {
        format!(
            "Conversation so far:\n{}\n\nCurrent question: {}",
            history, request.message
        )
    };

    CompletionRequest::new(prompt)
        .with_system(system)
        .with_max_tokens(CHAT_MAX_TOKENS)
}

fn describe_themes(themes: &[Theme]) -> String {
    themes
        .iter()
        .map(|t| format!("{} - {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join(", ")
}

fn transcript(messages: &[ChatMessage], user_label: &str, other_label: &str, separator: &str) -> String {
    messages
        .iter()
        .map(|m| {
            let label = if m.is_user() { user_label } else { other_label };
            format!("{}: {}", label, m.content)
        })
        .collect::<Vec<_>>()
        .join(separator)
}
