//! Analysis Result - the single artifact handed to the coach layer.

use serde::{Deserialize, Serialize};

use super::category::Token;
use super::features::FeatureSet;
use super::goal::{Goal, InferredGoal};
use super::lexicon::Markers;
use super::rubric::ScoreBreakdown;
use super::structure::SentenceStructure;
use super::style::StyleLabel;

/// Complete analysis of one sentence.
///
/// Rebuilt identically from `(text, goal)`: it carries no timestamps and no
/// state from earlier calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Original input
    pub text: String,

    /// Goal used for scoring
    pub goal: Goal,

    /// Set when the caller gave no goal and it was inferred
    pub inferred_goal: Option<InferredGoal>,

    pub tokens: Vec<Token>,

    pub features: FeatureSet,

    pub markers: Markers,

    pub structure: SentenceStructure,

    pub breakdown: ScoreBreakdown,

    /// Same as `breakdown.overall`, 0 to 100
    pub overall_score: i32,

    pub style: StyleLabel,

    /// What went well, most important first
    pub strengths: Vec<String>,

    /// What to improve, most important first
    pub weaknesses: Vec<String>,
}

impl AnalysisResult {
    /// First `n` strengths, as shown in the UI
    pub fn top_strengths(&self, n: usize) -> &[String] {
        &self.strengths[..self.strengths.len().min(n)]
    }

    /// First `n` weaknesses, as shown in the UI
    pub fn top_weaknesses(&self, n: usize) -> &[String] {
        &self.weaknesses[..self.weaknesses.len().min(n)]
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Goal: {}, Score: {}, Style: {}, Polite: {}, Negative: {}, Commands: {}",
            self.goal,
            self.overall_score,
            self.style,
            self.features.polite(),
            self.features.negative(),
            self.features.command()
        )
    }
}
