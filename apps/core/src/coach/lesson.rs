//! Personalized lesson for the child's answer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use super::scenario::{PracticeScenario, ScenarioContext};
use super::traits::{GenerationRequest, TextGenerator};
use crate::analysis::{AnalysisResult, Goal};
use crate::error::AppError;

/// Answers below this score also get practice scenarios
pub const RELATED_SCENARIO_THRESHOLD: i32 = 60;
pub const RELATED_SCENARIO_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonTier {
    PositiveReinforcement,
    Balanced,
    GentleCorrection,
}

impl LessonTier {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 80 => LessonTier::PositiveReinforcement,
            s if s >= 50 => LessonTier::Balanced,
            _ => LessonTier::GentleCorrection,
        }
    }

    fn system_prompt(&self) -> &'static str {
        match self {
            LessonTier::PositiveReinforcement => {
                "You are a teacher who encourages and motivates students."
            }
            LessonTier::Balanced => "You are a teacher who balances praise and guidance.",
            LessonTier::GentleCorrection => "You are a patient and encouraging teacher.",
        }
    }

    fn max_tokens(&self) -> u32 {
        match self {
            LessonTier::GentleCorrection => 250,
            _ => 200,
        }
    }

    pub fn fallback_text(&self) -> &'static str {
        match self {
            LessonTier::PositiveReinforcement => {
                "🌟 Great job! Your words are polite and thoughtful. Remember that speaking kindly helps build good relationships in every conversation."
            }
            LessonTier::Balanced => {
                "💫 You did some things well in your sentence! To make it even better, try adding polite words like 'please' or 'thank you'. Keep practicing!"
            }
            LessonTier::GentleCorrection => {
                "🌱 Polite communication helps us get along with others. Try adding kind words like 'please' or 'thank you', and use a gentler tone. Give it another try, you can do it!"
            }
        }
    }
}

pub fn key_principle(goal: Goal) -> &'static str {
    match goal {
        Goal::GivingFeedback => {
            "💬 When giving feedback, use gentle words and focus on solutions instead of blaming."
        }
        Goal::PoliteRefusal => {
            "🤝 A polite refusal starts with thanks, explains the reason, and may offer an alternative."
        }
        Goal::Apologizing => {
            "🙏 A sincere apology includes taking responsibility, showing understanding, and promising to improve."
        }
        Goal::AskingForHelp => {
            "🆘 Asking for help politely means being kind, clear, and thankful."
        }
        Goal::ExpressingDisagreement | Goal::Unspecified => {
            "💡 Good communication comes from respect, listening, and gentle words."
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub tier: LessonTier,
    pub lesson_text: String,
    pub key_principle: String,
    pub related_scenarios: Vec<PracticeScenario>,
}

pub struct LessonGenerator {
    generator: Arc<dyn TextGenerator>,
    request_timeout: Duration,
}

impl LessonGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, request_timeout: Duration) -> Self {
        Self {
            generator,
            request_timeout,
        }
    }

    pub async fn generate(
        &self,
        context: &ScenarioContext<'_>,
        user_answer: &str,
        analysis: &AnalysisResult,
    ) -> Lesson {
        let tier = LessonTier::from_score(analysis.overall_score);

        let lesson_request = GenerationRequest::new(lesson_prompt(tier, context, user_answer, analysis))
            .with_system(tier.system_prompt())
            .with_temperature(0.7)
            .with_max_tokens(tier.max_tokens());

        let lesson_text = match self.call(lesson_request).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Lesson generation failed, using fallback: {}", e);
                tier.fallback_text().to_string()
            }
        };

        let related_scenarios = if analysis.overall_score < RELATED_SCENARIO_THRESHOLD {
            self.related_scenarios(context, RELATED_SCENARIO_COUNT).await
        } else {
            Vec::new()
        };

        Lesson {
            tier,
            lesson_text,
            key_principle: key_principle(context.goal).to_string(),
            related_scenarios,
        }
    }

    /// New practice situations with the same goal. Empty on any failure.
    pub async fn related_scenarios(
        &self,
        context: &ScenarioContext<'_>,
        count: usize,
    ) -> Vec<PracticeScenario> {
        let prompt = format!(
            "Create {count} new practice situations for children to learn the skill:\n{goal}\n\n\
             ORIGINAL SITUATION:\nTitle: {title}\nStory: {story}\n\n\
             Create {count} DIFFERENT situations with the same learning goal.\n\
             Each situation should include:\n\
             - A short title (4-6 words)\n\
             - A short story (2-3 sentences, suitable for primary school children)\n\n\
             Return a JSON object: {{\"scenarios\": [{{\"title\": \"...\", \"story\": \"...\"}}]}}",
            count = count,
            goal = context.goal,
            title = context.title,
            story = context.story,
        );
        let request = GenerationRequest::new(prompt)
            .with_system("You are a teacher who creates learning scenarios for children.")
            .with_temperature(0.9)
            .with_max_tokens(400)
            .json();

        let raw = match self.call(request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Related scenario generation failed: {}", e);
                return Vec::new();
            }
        };

        match parse_scenarios(&raw) {
            Ok(mut scenarios) => {
                scenarios.truncate(count);
                info!("Generated {} related scenarios", scenarios.len());
                scenarios
            }
            Err(e) => {
                warn!("Related scenarios were not valid JSON: {}", e);
                Vec::new()
            }
        }
    }

    async fn call(&self, request: GenerationRequest) -> Result<String, AppError> {
        let text = timeout(self.request_timeout, self.generator.generate(request)).await??;
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Generation("empty lesson response".to_string()));
        }
        Ok(text.to_string())
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn lesson_prompt(
    tier: LessonTier,
    context: &ScenarioContext<'_>,
    answer: &str,
    analysis: &AnalysisResult,
) -> String {
    match tier {
        LessonTier::PositiveReinforcement => format!(
            "A student has given a VERY GOOD answer to the following situation:\n\n\
             SITUATION: {}\nGOAL: {}\nANSWER: \"{}\"\n\nSTRENGTHS:\n{}\n\n\
             Write a short lesson (2-3 sentences) that:\n\
             1. Explains WHY this answer is good\n\
             2. Encourages using this communication style in similar situations\n\
             3. States a general principle the student can remember\n\n\
             Use an encouraging and positive tone.\n\
             DO NOT use bullet points or markdown formatting.\n\
             Start with an emoji 🌟 or ✨",
            context.title,
            context.goal,
            answer,
            bullet_list(&analysis.strengths),
        ),
        LessonTier::Balanced => format!(
            "A student is practicing communication skills:\n\n\
             SITUATION: {}\nGOAL: {}\nANSWER: \"{}\"\n\n\
             WHAT WAS DONE WELL:\n{}\n\nWHAT CAN BE IMPROVED:\n{}\n\n\
             Write a short lesson (3 sentences) with this structure:\n\
             1. Praise what the student did well\n\
             2. Explain one improvement and why it matters\n\
             3. Encourage the student to try again\n\n\
             Use a balanced, friendly teaching tone.\n\
             DO NOT use bullet points or markdown formatting.\n\
             Start with an emoji 💫 or 🎯",
            context.title,
            context.goal,
            answer,
            bullet_list(analysis.top_strengths(2)),
            bullet_list(analysis.top_weaknesses(2)),
        ),
        LessonTier::GentleCorrection => format!(
            "A student is learning the communication skill: {}\n\n\
             SITUATION: {}\nSTUDENT'S ANSWER: \"{}\"\n\nAREAS TO IMPROVE:\n{}\n\n\
             Write a short lesson (3-4 sentences) that:\n\
             1. Explains an important communication principle for this situation\n\
             2. Compares an unkind way of speaking vs. a polite way\n\
             3. Encourages the student to try again with a positive mindset\n\n\
             Use a supportive and understanding tone.\n\
             DO NOT criticize.\n\
             DO NOT use bullet points or markdown formatting.\n\
             Start with an emoji 🌱 or 💡",
            context.goal,
            context.title,
            answer,
            bullet_list(analysis.top_weaknesses(2)),
        ),
    }
}

/// Accepts `{"scenarios": [...]}` or a bare array
fn parse_scenarios(raw: &str) -> Result<Vec<PracticeScenario>, AppError> {
    let value: Value = serde_json::from_str(raw)?;
    let list = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map
            .remove("scenarios")
            .ok_or_else(|| AppError::Generation("missing \"scenarios\" field".to_string()))?,
        _ => {
            return Err(AppError::Generation(
                "expected a JSON object or array".to_string(),
            ))
        }
    };
    Ok(serde_json::from_value(list)?)
}
