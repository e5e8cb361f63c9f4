//! Style label and strengths/weaknesses.
//!
//! Lists are short on purpose and ordered most important first; the
//! feedback UI only shows the first two.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::features::FeatureSet;
use super::goal::Goal;
use super::lexicon::Markers;

/// Maximum number of strengths or weaknesses reported
pub const MAX_FEEDBACK_ITEMS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleLabel {
    Harsh,
    NeedsImprovement,
    Neutral,
    Polite,
    VeryPolite,
}

impl StyleLabel {
    /// Map an overall score to its style tier
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 85 => StyleLabel::VeryPolite,
            s if s >= 70 => StyleLabel::Polite,
            s if s >= 55 => StyleLabel::Neutral,
            s if s >= 40 => StyleLabel::NeedsImprovement,
            _ => StyleLabel::Harsh,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StyleLabel::VeryPolite => "very_polite",
            StyleLabel::Polite => "polite",
            StyleLabel::Neutral => "neutral",
            StyleLabel::NeedsImprovement => "needs_improvement",
            StyleLabel::Harsh => "harsh",
        }
    }

    /// Child-facing text for the label
    pub fn display_text(&self) -> &'static str {
        match self {
            StyleLabel::VeryPolite => "Very polite 🌟",
            StyleLabel::Polite => "Polite 😊",
            StyleLabel::Neutral => "Neutral 😐",
            StyleLabel::NeedsImprovement => "Needs improvement 🌱",
            StyleLabel::Harsh => "A bit harsh 😕",
        }
    }
}

impl fmt::Display for StyleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify an overall score
pub fn classify_style(overall: i32) -> StyleLabel {
    StyleLabel::from_score(overall)
}

/// What the child did well, most important first
pub fn strengths(features: &FeatureSet) -> Vec<String> {
    let checks = [
        (features.has_empathy(), "Shows understanding and kindness"),
        (features.has_positive(), "Says something positive"),
        (features.polite() > 0, "Uses polite and gentle words"),
        (features.has_greeting(), "Uses a friendly greeting"),
    ];

    checks
        .iter()
        .filter(|(met, _)| *met)
        .map(|(_, text)| text.to_string())
        .take(MAX_FEEDBACK_ITEMS)
        .collect()
}

/// What the child could improve, most important first
pub fn weaknesses(features: &FeatureSet, markers: &Markers, goal: Goal) -> Vec<String> {
    let checks = [
        (
            !features.has_empathy(),
            "Could show a little more understanding",
        ),
        (
            goal == Goal::GivingFeedback && !features.has_softener(),
            "Could add a gentle suggestion, like 'maybe next time'",
        ),
        (
            goal == Goal::AskingForHelp && !markers.please,
            "Could sound more polite by saying 'please'",
        ),
        (features.has_negative(), "Could leave out hurtful words"),
        (features.has_command(), "Could ask instead of giving orders"),
    ];

    checks
        .iter()
        .filter(|(met, _)| *met)
        .map(|(_, text)| text.to_string())
        .take(MAX_FEEDBACK_ITEMS)
        .collect()
}
