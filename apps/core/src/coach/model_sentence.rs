//! Model-sentence generator.
//!
//! Asks the text generator for one ideal example sentence, checks it with the
//! sentence analyzer and falls back to a fixed safe example per goal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use super::scenario::ScenarioContext;
use super::traits::{GenerationRequest, TextGenerator};
use crate::analysis::{Goal, SentenceAnalyzer};
use crate::config::CoachConfig;
use crate::error::AppError;

const SYSTEM_PROMPT: &str = "You are a kind primary school teacher.";
const TEMPERATURE: f32 = 0.4;
const MAX_TOKENS: u32 = 60;

/// Grammar elements a model sentence must contain for a goal
pub fn required_elements(goal: Goal) -> &'static [&'static str] {
    match goal {
        Goal::GivingFeedback => &["GREETING", "EMPATHY_WORD", "SOFT_WORD", "SUGGESTION"],
        Goal::ExpressingDisagreement => &["ACKNOWLEDGE", "HEDGE_WORD", "ALTERNATIVE"],
        Goal::PoliteRefusal => &["THANK_YOU", "REASON", "ALTERNATIVE"],
        Goal::Apologizing => &["APOLOGY_WORD", "RESPONSIBILITY", "EMPATHY_WORD", "PROMISE"],
        Goal::AskingForHelp => &["GREETING", "POLITE_VERB", "REQUEST", "THANK_YOU"],
        Goal::Unspecified => &[],
    }
}

pub fn goal_description(goal: Goal) -> &'static str {
    match goal {
        Goal::GivingFeedback => "Be kind, show understanding, and suggest improvement gently.",
        Goal::ExpressingDisagreement => {
            "Respect the idea first, then suggest another option politely."
        }
        Goal::PoliteRefusal => "Say thank you, explain softly, and suggest another time.",
        Goal::Apologizing => "Say sorry clearly, show understanding, and promise to improve.",
        Goal::AskingForHelp => "Ask politely, clearly, and say thank you.",
        Goal::Unspecified => "Be polite and kind.",
    }
}

/// Safe example used when generation fails or is rejected
pub fn fallback_sentence(goal: Goal) -> &'static str {
    match goal {
        Goal::GivingFeedback => {
            "Hi Alex, I understand accidents happen, and maybe next time we can be more careful together."
        }
        Goal::ExpressingDisagreement => {
            "I see your idea, and I think it's interesting, but maybe we could try another way that works better."
        }
        Goal::PoliteRefusal => {
            "Thank you for inviting me, but I feel very tired today, so maybe we can play together tomorrow."
        }
        Goal::Apologizing => {
            "I'm really sorry for what I said earlier, and I understand it hurt your feelings. I will be more careful next time."
        }
        Goal::AskingForHelp => "Hi, could you please help me with this problem? Thank you so much!",
        Goal::Unspecified => "Hi, thank you for listening. Could you please tell me what you think?",
    }
}

/// Where a model sentence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SentenceSource {
    /// Accepted on the given attempt, 1-based
    Generated { attempt: u32 },
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSentence {
    pub text: String,
    pub source: SentenceSource,
    /// Score of `text` under the scenario goal
    pub score: i32,
}

/// Why a candidate sentence was not accepted
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rejection {
    Empty,
    EchoesAnswer,
    LowScore(i32),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "empty sentence"),
            Rejection::EchoesAnswer => write!(f, "repeats the child's answer"),
            Rejection::LowScore(score) => write!(f, "score {} below threshold", score),
        }
    }
}

pub struct ModelSentenceGenerator {
    generator: Arc<dyn TextGenerator>,
    analyzer: SentenceAnalyzer,
    max_attempts: u32,
    acceptance_threshold: i32,
    request_timeout: Duration,
}

impl ModelSentenceGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &CoachConfig) -> Self {
        Self {
            generator,
            analyzer: SentenceAnalyzer::new(),
            max_attempts: config.model_attempts.max(1),
            acceptance_threshold: config.acceptance_threshold,
            request_timeout: config.request_timeout,
        }
    }

    pub fn build_prompt(context: &ScenarioContext<'_>) -> String {
        let goal = context.goal;
        format!(
            "You are a primary school teacher.\n\n\
             SITUATION:\n{}\n\n\
             GOAL:\n{} ({})\n\n\
             GRAMMAR REQUIREMENTS:\n{}\n\n\
             INSTRUCTIONS:\n\
             - Write ONE perfect example sentence\n\
             - Follow the grammar requirements exactly\n\
             - Use simple words for children aged 6-10\n\
             - Be polite, kind, and natural\n\
             - DO NOT copy or rewrite the child's sentence\n\
             - DO NOT explain anything\n\
             - ONE sentence only\n\n\
             EXAMPLE OUTPUT STYLE:\n{}\n\n\
             NOW WRITE THE SENTENCE:",
            context.title,
            goal,
            goal_description(goal),
            required_elements(goal).join(", "),
            fallback_sentence(Goal::GivingFeedback),
        )
    }

    /// Produce a model sentence for the scenario. Never fails.
    pub async fn generate(&self, context: &ScenarioContext<'_>, user_answer: &str) -> ModelSentence {
        let goal = context.goal;
        if required_elements(goal).is_empty() {
            return self.fallback(goal);
        }

        let prompt = Self::build_prompt(context);

        for attempt in 1..=self.max_attempts {
            let request = GenerationRequest::new(prompt.clone())
                .with_system(SYSTEM_PROMPT)
                .with_temperature(TEMPERATURE)
                .with_max_tokens(MAX_TOKENS);

            let candidate = match self.call(request).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Model sentence attempt {} failed: {}", attempt, e);
                    if !e.is_retryable() {
                        break;
                    }
                    continue;
                }
            };

            match self.check(&candidate, user_answer, goal) {
                Ok(score) => {
                    info!("Model sentence accepted on attempt {} (score {})", attempt, score);
                    return ModelSentence {
                        text: candidate,
                        source: SentenceSource::Generated { attempt },
                        score,
                    };
                }
                Err(rejection) => {
                    warn!("Model sentence attempt {} rejected: {}", attempt, rejection);
                }
            }
        }

        self.fallback(goal)
    }

    async fn call(&self, request: GenerationRequest) -> Result<String, AppError> {
        let text = timeout(self.request_timeout, self.generator.generate(request)).await??;
        Ok(clean_sentence(&text))
    }

    fn check(&self, candidate: &str, user_answer: &str, goal: Goal) -> Result<i32, Rejection> {
        if candidate.is_empty() {
            return Err(Rejection::Empty);
        }
        if normalize(candidate) == normalize(user_answer) {
            return Err(Rejection::EchoesAnswer);
        }
        let score = self.analyzer.score(candidate, goal);
        if score < self.acceptance_threshold {
            return Err(Rejection::LowScore(score));
        }
        Ok(score)
    }

    fn fallback(&self, goal: Goal) -> ModelSentence {
        let text = fallback_sentence(goal);
        ModelSentence {
            text: text.to_string(),
            source: SentenceSource::Fallback,
            score: self.analyzer.score(text, goal),
        }
    }
}

/// First non-empty line, without surrounding quotes
fn clean_sentence(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .trim_matches(|c| c == '"' || c == '“' || c == '”')
        .trim()
        .to_string()
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', '!', '?'])
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::traits::OfflineGenerator;

    #[test]
    fn test_fallbacks_pass_acceptance() {
        let analyzer = SentenceAnalyzer::new();
        for goal in Goal::SCENARIO_GOALS.into_iter().chain([Goal::Unspecified]) {
            let score = analyzer.score(fallback_sentence(goal), goal);
            assert!(score >= 70, "{} fallback scored {}", goal, score);
        }
    }

    #[test]
    fn test_clean_sentence() {
        assert_eq!(clean_sentence("  \"Hi there!\"  "), "Hi there!");
        assert_eq!(clean_sentence("\n\nFirst line.\nSecond line."), "First line.");
        assert_eq!(clean_sentence("   "), "");
    }

    #[test]
    fn test_normalize_ignores_case_spacing_and_final_punctuation() {
        assert_eq!(normalize("Hi,  could you help?"), normalize("hi, could you help"));
    }

    #[test]
    fn test_prompt_lists_required_elements() {
        let context = ScenarioContext {
            title: "Broken crayon",
            story: "",
            question: "",
            goal: Goal::Apologizing,
        };
        let prompt = ModelSentenceGenerator::build_prompt(&context);
        assert!(prompt.contains("Broken crayon"));
        assert!(prompt.contains("APOLOGY_WORD, RESPONSIBILITY, EMPATHY_WORD, PROMISE"));
    }

    #[tokio::test]
    async fn test_offline_uses_fallback() {
        let generator = ModelSentenceGenerator::new(Arc::new(OfflineGenerator), &CoachConfig::default());
        let context = ScenarioContext {
            title: "Lunch invite",
            story: "",
            question: "",
            goal: Goal::PoliteRefusal,
        };
        let sentence = generator.generate(&context, "no").await;
        assert_eq!(sentence.source, SentenceSource::Fallback);
        assert_eq!(sentence.text, fallback_sentence(Goal::PoliteRefusal));
        assert!(sentence.score >= 70);
    }
}
