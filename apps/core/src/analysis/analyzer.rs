//! Sentence Analyzer - main orchestrator for the analysis module.
//!
//! Runs classification, aggregation, goal inference, scoring and style
//! classification in order and assembles the [`AnalysisResult`].

use tracing::debug;

use super::classifier::LexicalClassifier;
use super::features::FeatureSet;
use super::goal::{infer_goal, Goal};
use super::lexicon::Markers;
use super::result::AnalysisResult;
use super::rubric::RubricScorer;
use super::structure::SentenceStructure;
use super::style::{classify_style, strengths, weaknesses};

/// Stateless sentence analyzer. Cheap to create and safe to share.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceAnalyzer {
    classifier: LexicalClassifier,
    scorer: RubricScorer,
}

impl SentenceAnalyzer {
    pub fn new() -> Self {
        Self {
            classifier: LexicalClassifier::new(),
            scorer: RubricScorer::new(),
        }
    }

    /// Analyze `text` against `goal`.
    ///
    /// With no goal the likely goal is inferred from the sentence and its
    /// scoring goal is used instead.
    pub fn analyze(&self, text: &str, goal: Option<Goal>) -> AnalysisResult {
        // 1. Tokens and text markers
        let tokens = self.classifier.classify(text);
        let markers = Markers::detect(text);

        // 2. Counts
        let features = FeatureSet::aggregate(&tokens);

        // 3. Goal, inferred only when the caller has none
        let (goal, inferred_goal) = match goal {
            Some(goal) => (goal, None),
            None => {
                let inferred = infer_goal(&features, &markers);
                (inferred.scoring_goal(), Some(inferred))
            }
        };

        // 4. Rubric and style
        let breakdown = self.scorer.score(&features, &markers, goal);
        let overall_score = breakdown.overall;
        let style = classify_style(overall_score);

        let result = AnalysisResult {
            text: text.to_string(),
            goal,
            inferred_goal,
            structure: SentenceStructure::from_tokens(text, &tokens),
            tokens,
            strengths: strengths(&features),
            weaknesses: weaknesses(&features, &markers, goal),
            features,
            markers,
            breakdown,
            overall_score,
            style,
        };

        debug!("Sentence analyzed: {}", result.summary());
        result
    }

    /// Overall score only, for validating generated sentences
    pub fn score(&self, text: &str, goal: Goal) -> i32 {
        self.analyze(text, Some(goal)).overall_score
    }
}

/// Analyze with a default analyzer
pub fn analyze(text: &str, goal: Option<Goal>) -> AnalysisResult {
    SentenceAnalyzer::new().analyze(text, goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::goal::InferredGoal;
    use crate::analysis::rubric::RubricCategory;
    use crate::analysis::style::StyleLabel;

    #[test]
    fn test_polite_help_request() {
        let result = analyze(
            "Hi, could you please help me with this? Thank you!",
            Some(Goal::AskingForHelp),
        );
        assert_eq!(result.breakdown.score_of(RubricCategory::GoalFit), 20);
        assert_eq!(result.breakdown.score_of(RubricCategory::Politeness), 25);
        assert!(result.overall_score >= 85, "got {}", result.overall_score);
        assert_eq!(result.style, StyleLabel::VeryPolite);
    }

    #[test]
    fn test_command_sentence() {
        let result = analyze("You must give me that now.", Some(Goal::Unspecified));
        assert!(result.features.has_command());
        assert_eq!(result.features.polite(), 0);
        assert_eq!(result.breakdown.score_of(RubricCategory::Clarity), 10);
        assert!(!result.breakdown.penalties.is_empty());
        assert!(matches!(
            result.style,
            StyleLabel::NeedsImprovement | StyleLabel::Harsh
        ));
    }

    #[test]
    fn test_apology() {
        let result = analyze(
            "I'm sorry, I understand it hurt you, I will be careful.",
            Some(Goal::Apologizing),
        );
        assert_eq!(result.breakdown.score_of(RubricCategory::GoalFit), 20);
        assert!(result.overall_score >= 70, "got {}", result.overall_score);
    }

    #[test]
    fn test_empty_string_baseline() {
        let result = analyze("", Some(Goal::Unspecified));
        assert!(result.tokens.is_empty());
        assert!(result.features.is_empty());
        assert!(result.breakdown.penalties.is_empty());
        assert_eq!(result.overall_score, 45);
        assert_eq!(result.style, StyleLabel::NeedsImprovement);
    }

    #[test]
    fn test_missing_goal_is_inferred() {
        let result = analyze("I'm so sorry about your toy", None);
        assert_eq!(result.inferred_goal, Some(InferredGoal::Apologizing));
        assert_eq!(result.goal, Goal::Apologizing);

        let result = analyze("Thanks!", Some(Goal::Unspecified));
        assert_eq!(result.inferred_goal, None);
    }

    #[test]
    fn test_overall_matches_breakdown() {
        let result = analyze("Hello! That is a great drawing.", Some(Goal::GivingFeedback));
        assert_eq!(result.overall_score, result.breakdown.overall);
        assert_eq!(
            SentenceAnalyzer::new().score(&result.text, result.goal),
            result.overall_score
        );
    }
}
