use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

use super::scenario::ScenarioContext;
use super::traits::{GenerationRequest, TextGenerator};
use crate::analysis::{AnalysisResult, Goal};
use crate::error::AppError;

/// Answers at or above this score get encouragement instead of a fix
pub const ENCOURAGEMENT_THRESHOLD: i32 = 80;
/// Answers below this score also get an alternative response
pub const ALTERNATIVE_THRESHOLD: i32 = 60;

const ENCOURAGEMENT_FALLBACK: &str =
    "Great job! Your answer is kind and polite. Keep using this friendly communication style!";
const IMPROVEMENT_FALLBACK: &str =
    "You can try adding a greeting and saying thank you to make your sentence sound more polite.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub hint_text: String,
    /// Better version of the answer, only for weak answers
    pub alternative_response: Option<String>,
    pub tip: String,
}

pub struct HintGenerator {
    generator: Arc<dyn TextGenerator>,
    request_timeout: Duration,
}

impl HintGenerator {
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
    ) -> Hint {
        let hint_text = if analysis.overall_score >= ENCOURAGEMENT_THRESHOLD {
            self.encouragement(context, user_answer).await
        } else {
            self.improvement(context, user_answer, analysis).await
        };

        let alternative_response = if analysis.overall_score < ALTERNATIVE_THRESHOLD {
            self.alternative_response(context, user_answer).await
        } else {
            None
        };

        Hint {
            hint_text,
            alternative_response,
            tip: goal_tip(context.goal, analysis).to_string(),
        }
    }

    async fn encouragement(&self, context: &ScenarioContext<'_>, answer: &str) -> String {
        let prompt = format!(
            "A student has answered very well in the following situation:\n\n\
             SITUATION: {}\nSTUDENT'S ANSWER: \"{}\"\n\n\
             Write a short encouragement (1-2 sentences) to motivate the student.\n\
             You may gently suggest one small improvement to make the answer even better.\n\n\
             Use a friendly teacher-like tone.\n\
             DO NOT use bullet points or markdown formatting.",
            context.title, answer
        );
        let request = GenerationRequest::new(prompt)
            .with_system("You are a supportive teacher who encourages students.")
            .with_temperature(0.8)
            .with_max_tokens(150);

        self.call(request).await.unwrap_or_else(|e| {
            warn!("Encouragement hint failed, using fallback: {}", e);
            ENCOURAGEMENT_FALLBACK.to_string()
        })
    }

    async fn improvement(
        &self,
        context: &ScenarioContext<'_>,
        answer: &str,
        analysis: &AnalysisResult,
    ) -> String {
        let areas = analysis
            .top_weaknesses(3)
            .iter()
            .map(|w| format!("- {}", w))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "A student is learning communication skills:\n\n\
             SITUATION: {}\nSTORY: {}\nGOAL: {}\n\n\
             STUDENT'S ANSWER: \"{}\"\n\nAREAS TO IMPROVE:\n{}\n\n\
             Write a concrete hint (2-3 sentences) to help the student improve.\n\
             The hint should:\n\
             1. Start by acknowledging something the student did well\n\
             2. Give a SPECIFIC example of a better way to say it (you may write a sample sentence)\n\
             3. Explain WHY that way is better\n\n\
             Use simple, friendly language.\n\
             DO NOT use bullet points or markdown formatting.",
            context.title, context.story, context.goal, answer, areas
        );
        let request = GenerationRequest::new(prompt)
            .with_system("You are a patient teacher who explains things clearly.")
            .with_temperature(0.8)
            .with_max_tokens(250);

        self.call(request).await.unwrap_or_else(|e| {
            warn!("Improvement hint failed, using fallback: {}", e);
            IMPROVEMENT_FALLBACK.to_string()
        })
    }

    /// Model answer that keeps part of the child's idea. `None` on failure.
    pub async fn alternative_response(
        &self,
        context: &ScenarioContext<'_>,
        answer: &str,
    ) -> Option<String> {
        let prompt = format!(
            "A student is learning how to {}.\n\n\
             SITUATION: {}\nSTORY: {}\n\n\
             STUDENT'S ANSWER: \"{}\"\n\n\
             Write a BETTER model answer for this situation.\n\
             The model answer should:\n\
             - Keep part of the student's original idea\n\
             - Add polite elements such as greetings, thanks, or apologies (if appropriate)\n\
             - Use gentle and kind words\n\
             - Be suitable for primary school children\n\n\
             ONLY write the model answer.\n\
             DO NOT explain anything.",
            context.goal, context.title, context.story, answer
        );
        let request = GenerationRequest::new(prompt)
            .with_system("You are a teacher skilled at writing model answers.")
            .with_temperature(0.9)
            .with_max_tokens(100);

        match self.call(request).await {
            Ok(text) => Some(text.trim_matches('"').trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Alternative response failed: {}", e);
                None
            }
        }
    }

    async fn call(&self, request: GenerationRequest) -> Result<String, AppError> {
        let text = timeout(self.request_timeout, self.generator.generate(request)).await??;
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Generation("empty hint response".to_string()));
        }
        Ok(text.to_string())
    }
}

fn goal_tips(goal: Goal) -> &'static [&'static str] {
    match goal {
        Goal::GivingFeedback => &[
            "💡 Start your opinion with 'I think...' or 'Maybe...' to sound gentler.",
            "💡 Using 'could' instead of 'should' feels kinder!",
            "💡 Praising first makes feedback easier to accept.",
        ],
        Goal::PoliteRefusal => &[
            "💡 When refusing, try thanking the person first!",
            "💡 Explaining your reason helps others understand.",
            "💡 You can suggest another time: 'Maybe next time?'",
        ],
        Goal::Apologizing => &[
            "💡 A sincere apology clearly says what you are sorry for.",
            "💡 Showing understanding helps others feel better.",
            "💡 Promising to improve is a strong part of an apology.",
        ],
        Goal::AskingForHelp => &[
            "💡 Starting with 'Could you please...' sounds very polite!",
            "💡 Explain why you need help.",
            "💡 Ending with 'Thank you!' is always a good idea.",
        ],
        Goal::ExpressingDisagreement | Goal::Unspecified => &[
            "💡 Greetings and thank-yous make sentences kinder.",
            "💡 Use 'please' when asking for something.",
            "💡 Gentle words make communication better.",
        ],
    }
}

/// Short tip for the goal.
///
/// A missing key element wins; otherwise the tip is picked from the goal's
/// list by score, so the same answer always gets the same tip.
pub fn goal_tip(goal: Goal, analysis: &AnalysisResult) -> &'static str {
    let features = &analysis.features;

    if goal == Goal::Apologizing && !features.has_apology() {
        return "💡 Don't forget to say 'I'm sorry' when apologizing.";
    }
    if goal == Goal::AskingForHelp {
        if !features.has_thank_you() {
            return "💡 Ending with 'Thank you!' makes your request polite.";
        }
        if !features.has_softener() {
            return "💡 Try 'Could you please...' instead of 'Can you...'.";
        }
    }

    let tips = goal_tips(goal);
    tips[analysis.overall_score.unsigned_abs() as usize % tips.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    #[test]
    fn test_missing_apology_tip() {
        let analysis = analyze("It was an accident.", Some(Goal::Apologizing));
        assert_eq!(
            goal_tip(Goal::Apologizing, &analysis),
            "💡 Don't forget to say 'I'm sorry' when apologizing."
        );
    }

    #[test]
    fn test_missing_thanks_tip() {
        let analysis = analyze("Can you help me?", Some(Goal::AskingForHelp));
        assert!(goal_tip(Goal::AskingForHelp, &analysis).contains("Thank you!"));
    }

    #[test]
    fn test_tip_is_deterministic() {
        let analysis = analyze("That drawing looks great.", Some(Goal::GivingFeedback));
        let tip = goal_tip(Goal::GivingFeedback, &analysis);
        assert_eq!(tip, goal_tip(Goal::GivingFeedback, &analysis));
        assert!(goal_tips(Goal::GivingFeedback).contains(&tip));
    }
}
