//! Rubric Scorer.
//!
//! Deterministic, goal-aware scoring of a feature set. Four weighted
//! categories add up to 100 before penalties:
//!
//! | Category         | Max |
//! |------------------|-----|
//! | Emotional safety |  40 |
//! | Politeness       |  25 |
//! | Goal fit         |  20 |
//! | Clarity          |  15 |
//!
//! Every rule, awarded or not, leaves a human-readable reason that the
//! feedback UI shows as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::features::FeatureSet;
use super::goal::Goal;
use super::lexicon::Markers;

const EMOTIONAL_SAFETY_MAX: i32 = 40;
const POLITENESS_MAX: i32 = 25;
const GOAL_FIT_MAX: i32 = 20;
const CLARITY_MAX: i32 = 15;

const NO_NEGATIVE_POINTS: i32 = 15;
const EMPATHY_POINTS: i32 = 15;
const POSITIVE_POINTS: i32 = 10;
const POINTS_PER_POLITE_WORD: i32 = 5;
const UNSPECIFIED_GOAL_POINTS: i32 = 15;
const CLARITY_BASELINE: i32 = 10;
const NO_COMMAND_POINTS: i32 = 5;

/// Subtracted once when any negative word is present
pub const NEGATIVE_PENALTY: i32 = -10;
/// Subtracted once when any command word is present
pub const COMMAND_PENALTY: i32 = -10;

/// Rubric category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricCategory {
    EmotionalSafety,
    Politeness,
    GoalFit,
    Clarity,
}

impl RubricCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RubricCategory::EmotionalSafety => "emotional_safety",
            RubricCategory::Politeness => "politeness",
            RubricCategory::GoalFit => "goal_fit",
            RubricCategory::Clarity => "clarity",
        }
    }

    pub fn max(&self) -> i32 {
        match self {
            RubricCategory::EmotionalSafety => EMOTIONAL_SAFETY_MAX,
            RubricCategory::Politeness => POLITENESS_MAX,
            RubricCategory::GoalFit => GOAL_FIT_MAX,
            RubricCategory::Clarity => CLARITY_MAX,
        }
    }
}

impl fmt::Display for RubricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Points earned in one rubric category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: RubricCategory,
    pub score: i32,
    pub max: i32,
    pub reasons: Vec<String>,
}

impl CategoryScore {
    fn new(category: RubricCategory) -> Self {
        Self {
            category,
            score: 0,
            max: category.max(),
            reasons: Vec::new(),
        }
    }

    /// Apply one rule: award `points` when `met`, and record why either way.
    fn rule(&mut self, met: bool, points: i32, awarded: &str, missed: &str) {
        if met {
            self.score += points;
            self.reasons.push(format!("{awarded} (+{points})"));
        } else {
            self.reasons.push(format!("{missed} (+{points} available)"));
        }
    }

    fn finish(mut self) -> Self {
        self.score = self.score.min(self.max);
        self
    }
}

/// A deduction applied after the category sum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub reason: String,
    pub points: i32,
}

/// Full rubric result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Categories in rubric order: emotional safety, politeness, goal fit, clarity
    pub categories: Vec<CategoryScore>,
    pub penalties: Vec<Penalty>,
    /// `clamp(sum of categories + penalties, 0, 100)`
    pub overall: i32,
}

impl ScoreBreakdown {
    pub fn category(&self, category: RubricCategory) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Score earned in one category, 0 if absent
    pub fn score_of(&self, category: RubricCategory) -> i32 {
        self.category(category).map(|c| c.score).unwrap_or(0)
    }

    /// Sum of category scores before penalties
    pub fn subtotal(&self) -> i32 {
        self.categories.iter().map(|c| c.score).sum()
    }
}

/// Stateless rubric scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct RubricScorer;

impl RubricScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score features against a goal.
    pub fn score(&self, features: &FeatureSet, markers: &Markers, goal: Goal) -> ScoreBreakdown {
        let categories = vec![
            self.emotional_safety(features),
            self.politeness(features),
            self.goal_fit(features, markers, goal),
            self.clarity(features),
        ];

        let mut penalties = Vec::new();
        if features.has_negative() {
            penalties.push(Penalty {
                reason: format!("Uses hurtful or negative words ({NEGATIVE_PENALTY})"),
                points: NEGATIVE_PENALTY,
            });
        }
        if features.has_command() {
            penalties.push(Penalty {
                reason: format!("Gives orders instead of asking ({COMMAND_PENALTY})"),
                points: COMMAND_PENALTY,
            });
        }

        let total: i32 = categories.iter().map(|c| c.score).sum::<i32>()
            + penalties.iter().map(|p| p.points).sum::<i32>();

        ScoreBreakdown {
            categories,
            penalties,
            overall: total.clamp(0, 100),
        }
    }

    fn emotional_safety(&self, features: &FeatureSet) -> CategoryScore {
        let mut category = CategoryScore::new(RubricCategory::EmotionalSafety);
        category.rule(
            !features.has_negative(),
            NO_NEGATIVE_POINTS,
            "No hurtful words",
            "Avoid hurtful or negative words",
        );
        category.rule(
            features.has_empathy(),
            EMPATHY_POINTS,
            "Shows understanding",
            "Show that you understand how the other person feels",
        );
        category.rule(
            features.has_positive(),
            POSITIVE_POINTS,
            "Says something positive",
            "Add something kind or positive",
        );
        category.finish()
    }

    fn politeness(&self, features: &FeatureSet) -> CategoryScore {
        let mut category = CategoryScore::new(RubricCategory::Politeness);
        let polite = features.polite();
        let points = (polite as i32)
            .saturating_mul(POINTS_PER_POLITE_WORD)
            .min(POLITENESS_MAX);

        category.score = points;
        if polite == 0 {
            category.reasons.push(format!(
                "Add polite words like 'please' or 'thank you' (+{POINTS_PER_POLITE_WORD} each, up to {POLITENESS_MAX})"
            ));
        } else if points < POLITENESS_MAX {
            category.reasons.push(format!(
                "Uses {polite} polite word(s) (+{points}); more polite words can earn up to {POLITENESS_MAX}"
            ));
        } else {
            category
                .reasons
                .push(format!("Uses plenty of polite words (+{points})"));
        }
        category.finish()
    }

    fn goal_fit(&self, features: &FeatureSet, markers: &Markers, goal: Goal) -> CategoryScore {
        let mut category = CategoryScore::new(RubricCategory::GoalFit);

        match goal {
            Goal::GivingFeedback => {
                category.rule(
                    features.has_positive(),
                    10,
                    "Mentions something good first",
                    "Start with something good about their work",
                );
                category.rule(
                    features.has_softener() || features.has_empathy(),
                    10,
                    "Makes the suggestion gently",
                    "Use a gentle word like 'maybe' or 'I think'",
                );
            }
            Goal::PoliteRefusal => {
                category.rule(
                    markers.thank,
                    10,
                    "Thanks the other person",
                    "Say thank you before saying no",
                );
                category.rule(
                    markers.reason,
                    10,
                    "Explains the reason",
                    "Explain why, using 'because' or 'but'",
                );
            }
            Goal::Apologizing => {
                if features.has_apology() {
                    category.rule(true, 20, "Says sorry clearly", "");
                } else {
                    category.rule(
                        features.has_empathy(),
                        10,
                        "Shows understanding, but does not say sorry",
                        "Say 'I'm sorry' and show you understand",
                    );
                }
            }
            Goal::AskingForHelp => {
                category.rule(
                    markers.polite_request,
                    20,
                    "Asks politely",
                    "Ask with 'could you', 'can you' or 'please'",
                );
            }
            Goal::ExpressingDisagreement => {
                category.rule(
                    markers.acknowledgement,
                    10,
                    "Respects the other idea first",
                    "Say something about their idea first, like 'I see'",
                );
                category.rule(
                    markers.alternative,
                    10,
                    "Suggests another option",
                    "Offer another idea, like 'how about...'",
                );
            }
            Goal::Unspecified => {
                category.rule(true, UNSPECIFIED_GOAL_POINTS, "No specific goal to check", "");
            }
        }
        category.finish()
    }

    fn clarity(&self, features: &FeatureSet) -> CategoryScore {
        let mut category = CategoryScore::new(RubricCategory::Clarity);
        category.rule(true, CLARITY_BASELINE, "Clear sentence", "");
        category.rule(
            !features.has_command(),
            NO_COMMAND_POINTS,
            "Asks instead of ordering",
            "Ask instead of giving orders",
        );
        category.finish()
    }
}
