//! Child-friendly feedback formatter.
//!
//! Pure presentation over an [`AnalysisResult`]; no generation calls.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, Goal};

const SUGGESTION: &str = "💡 Try using gentle words and follow the polite speaking steps.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildFeedback {
    pub praise: String,
    /// Empty when nothing went well yet
    pub strength_message: String,
    /// Empty when there is nothing to improve
    pub suggestion: String,
    pub encouragement: String,
    pub style_text: String,
}

impl ChildFeedback {
    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        let strengths = analysis.top_strengths(2);
        let strength_message = if strengths.is_empty() {
            String::new()
        } else {
            format!("What you did well: {}", strengths.join(", "))
        };

        let suggestion = if analysis.weaknesses.is_empty() {
            String::new()
        } else {
            SUGGESTION.to_string()
        };

        Self {
            praise: praise(analysis.overall_score).to_string(),
            strength_message,
            suggestion,
            encouragement: encouragement(analysis.goal).to_string(),
            style_text: analysis.style.display_text().to_string(),
        }
    }
}

/// Praise line for a score tier
pub fn praise(score: i32) -> &'static str {
    match score {
        s if s >= 80 => "🌟 Excellent! Your sentence is very polite and thoughtful.",
        s if s >= 60 => "😊 Nice job! You are speaking politely.",
        s if s >= 40 => "💪 Good effort! Let's try to make it even better.",
        _ => "🌱 That's okay. Learning takes practice!",
    }
}

pub fn encouragement(goal: Goal) -> &'static str {
    match goal {
        Goal::GivingFeedback => "🎯 Be kind and focus on helping, not blaming.",
        Goal::ExpressingDisagreement => "🤝 Sharing ideas politely helps teamwork.",
        Goal::PoliteRefusal => "🤍 Saying no kindly keeps friendships strong.",
        Goal::Apologizing => "🙏 A sincere apology helps fix mistakes.",
        Goal::AskingForHelp => "🆘 Polite asking makes people happy to help.",
        Goal::Unspecified => "⭐ Keep practicing!",
    }
}
