//! Communicative goals and goal inference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::features::FeatureSet;
use super::lexicon::Markers;

/// The communicative goal a sentence is evaluated against.
///
/// Parsing never fails: an unknown value becomes [`Goal::Unspecified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Goal {
    GivingFeedback,
    PoliteRefusal,
    Apologizing,
    AskingForHelp,
    ExpressingDisagreement,
    #[default]
    Unspecified,
}

impl Goal {
    /// Goals a scenario can ask for, excluding `Unspecified`
    pub const SCENARIO_GOALS: [Goal; 5] = [
        Goal::GivingFeedback,
        Goal::PoliteRefusal,
        Goal::Apologizing,
        Goal::AskingForHelp,
        Goal::ExpressingDisagreement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Goal::GivingFeedback => "giving_feedback",
            Goal::PoliteRefusal => "polite_refusal",
            Goal::Apologizing => "apologizing",
            Goal::AskingForHelp => "asking_for_help",
            Goal::ExpressingDisagreement => "expressing_disagreement",
            Goal::Unspecified => "unspecified",
        }
    }

    /// Lenient parse: trims, ignores case, maps anything unknown to `Unspecified`
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "giving_feedback" => Goal::GivingFeedback,
            "polite_refusal" => Goal::PoliteRefusal,
            "apologizing" | "apologising" => Goal::Apologizing,
            "asking_for_help" => Goal::AskingForHelp,
            "expressing_disagreement" => Goal::ExpressingDisagreement,
            _ => Goal::Unspecified,
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Goal {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Goal::parse_lenient(s))
    }
}

impl From<String> for Goal {
    fn from(value: String) -> Self {
        Goal::parse_lenient(&value)
    }
}

impl From<&str> for Goal {
    fn from(value: &str) -> Self {
        Goal::parse_lenient(value)
    }
}

/// Goal guessed from the sentence itself when no scenario goal is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredGoal {
    Apologizing,
    AskingForHelp,
    DemandingHelp,
    PoliteRefusal,
    DirectRefusal,
    CriticalFeedback,
    GentleFeedback,
    GivingFeedback,
    ExpressingGratitude,
    Greeting,
    AskingQuestion,
    GeneralStatement,
}

impl InferredGoal {
    pub fn label(&self) -> &'static str {
        match self {
            InferredGoal::Apologizing => "apologizing",
            InferredGoal::AskingForHelp => "asking_for_help",
            InferredGoal::DemandingHelp => "demanding_help",
            InferredGoal::PoliteRefusal => "polite_refusal",
            InferredGoal::DirectRefusal => "direct_refusal",
            InferredGoal::CriticalFeedback => "critical_feedback",
            InferredGoal::GentleFeedback => "gentle_feedback",
            InferredGoal::GivingFeedback => "giving_feedback",
            InferredGoal::ExpressingGratitude => "expressing_gratitude",
            InferredGoal::Greeting => "greeting",
            InferredGoal::AskingQuestion => "asking_question",
            InferredGoal::GeneralStatement => "general_statement",
        }
    }

    /// The scoring goal this inference stands for
    pub fn scoring_goal(&self) -> Goal {
        match self {
            InferredGoal::Apologizing => Goal::Apologizing,
            InferredGoal::AskingForHelp | InferredGoal::DemandingHelp => Goal::AskingForHelp,
            InferredGoal::PoliteRefusal | InferredGoal::DirectRefusal => Goal::PoliteRefusal,
            InferredGoal::CriticalFeedback
            | InferredGoal::GentleFeedback
            | InferredGoal::GivingFeedback => Goal::GivingFeedback,
            InferredGoal::ExpressingGratitude
            | InferredGoal::Greeting
            | InferredGoal::AskingQuestion
            | InferredGoal::GeneralStatement => Goal::Unspecified,
        }
    }
}

impl fmt::Display for InferredGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Infer the likely goal. Rules are checked in a fixed order; the first match wins.
pub fn infer_goal(features: &FeatureSet, markers: &Markers) -> InferredGoal {
    if features.has_apology() {
        return InferredGoal::Apologizing;
    }

    if markers.help_request {
        return if markers.please || features.polite_verb > 0 || features.has_softener() {
            InferredGoal::AskingForHelp
        } else {
            InferredGoal::DemandingHelp
        };
    }

    if features.negation > 0 {
        let softened = features.has_softener()
            || features.has_thank_you()
            || features.has_empathy()
            || features.polite_verb > 0;
        return if softened {
            InferredGoal::PoliteRefusal
        } else {
            InferredGoal::DirectRefusal
        };
    }

    if markers.opinion {
        return if features.strong_word > 0 {
            InferredGoal::CriticalFeedback
        } else if features.has_softener() || features.has_positive() {
            InferredGoal::GentleFeedback
        } else {
            InferredGoal::GivingFeedback
        };
    }

    if features.has_thank_you() {
        return InferredGoal::ExpressingGratitude;
    }

    if features.has_greeting() {
        return InferredGoal::Greeting;
    }

    if features.question_word > 0 || markers.trailing_question {
        return InferredGoal::AskingQuestion;
    }

    InferredGoal::GeneralStatement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::LexicalClassifier;

    fn infer(text: &str) -> InferredGoal {
        let tokens = LexicalClassifier::new().classify(text);
        infer_goal(&FeatureSet::aggregate(&tokens), &Markers::detect(text))
    }

    #[test]
    fn test_lenient_parse() {
        assert_eq!(Goal::parse_lenient("asking_for_help"), Goal::AskingForHelp);
        assert_eq!(Goal::parse_lenient(" Polite Refusal "), Goal::PoliteRefusal);
        assert_eq!(Goal::parse_lenient("conquering_the_world"), Goal::Unspecified);
        assert_eq!(Goal::parse_lenient(""), Goal::Unspecified);
        assert_eq!("apologizing".parse::<Goal>().unwrap(), Goal::Apologizing);
    }

    #[test]
    fn test_serde_unknown_goal_is_unspecified() {
        let goal: Goal = serde_json::from_str("\"giving_feedback\"").unwrap();
        assert_eq!(goal, Goal::GivingFeedback);

        let goal: Goal = serde_json::from_str("\"something_else\"").unwrap();
        assert_eq!(goal, Goal::Unspecified);

        assert_eq!(
            serde_json::to_string(&Goal::ExpressingDisagreement).unwrap(),
            "\"expressing_disagreement\""
        );
    }

    #[test]
    fn test_inference_priority() {
        assert_eq!(infer("I'm sorry, I need help"), InferredGoal::Apologizing);
        assert_eq!(infer("Could you help me with my homework?"), InferredGoal::AskingForHelp);
        assert_eq!(infer("Help me now"), InferredGoal::DemandingHelp);
        assert_eq!(infer("No, thank you, I can't today"), InferredGoal::PoliteRefusal);
        assert_eq!(infer("No. I won't."), InferredGoal::DirectRefusal);
        assert_eq!(infer("I think your drawing is stupid"), InferredGoal::CriticalFeedback);
        assert_eq!(infer("I think maybe you could add colors"), InferredGoal::GentleFeedback);
        assert_eq!(infer("You should add colors"), InferredGoal::GivingFeedback);
        assert_eq!(infer("Thank you for the gift"), InferredGoal::ExpressingGratitude);
        assert_eq!(infer("Hello Mia"), InferredGoal::Greeting);
        assert_eq!(infer("Where is the park?"), InferredGoal::AskingQuestion);
        assert_eq!(infer("Is it raining?"), InferredGoal::AskingQuestion);
        assert_eq!(infer("The sky is blue"), InferredGoal::GeneralStatement);
        assert_eq!(infer(""), InferredGoal::GeneralStatement);
    }

    #[test]
    fn test_scoring_goal_mapping() {
        assert_eq!(InferredGoal::DirectRefusal.scoring_goal(), Goal::PoliteRefusal);
        assert_eq!(InferredGoal::CriticalFeedback.scoring_goal(), Goal::GivingFeedback);
        assert_eq!(InferredGoal::DemandingHelp.scoring_goal(), Goal::AskingForHelp);
        assert_eq!(InferredGoal::Greeting.scoring_goal(), Goal::Unspecified);
    }
}
