//! Feature Aggregator.
//!
//! Reduces a token sequence to per-category counts and the named features
//! the rubric reads. Only counts matter, never token order.

use serde::{Deserialize, Serialize};

use super::category::{Category, Token};

/// Per-category token counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub greeting: usize,
    pub thank_you: usize,
    pub softener: usize,
    pub polite_verb: usize,
    pub apology: usize,
    pub empathy: usize,
    pub strong_word: usize,
    pub command_word: usize,
    pub negation: usize,
    pub positive_adj: usize,
    pub positive_emotion: usize,
    pub negative_emotion: usize,
    pub question_word: usize,
    pub word: usize,
    pub punctuation: usize,
}

impl FeatureSet {
    /// Count tokens per category.
    pub fn aggregate(tokens: &[Token]) -> Self {
        let mut counts = [0usize; Category::COUNT];
        for token in tokens {
            counts[token.category.index()] += 1;
        }
        Self::from_counts(&counts)
    }

    fn from_counts(counts: &[usize; Category::COUNT]) -> Self {
        let c = |category: Category| counts[category.index()];
        Self {
            greeting: c(Category::Greeting),
            thank_you: c(Category::ThankYou),
            softener: c(Category::Softener),
            polite_verb: c(Category::PoliteVerb),
            apology: c(Category::Apology),
            empathy: c(Category::Empathy),
            strong_word: c(Category::StrongWord),
            command_word: c(Category::CommandWord),
            negation: c(Category::Negation),
            positive_adj: c(Category::PositiveAdj),
            positive_emotion: c(Category::PositiveEmotion),
            negative_emotion: c(Category::NegativeEmotion),
            question_word: c(Category::QuestionWord),
            word: c(Category::Word),
            punctuation: c(Category::Punctuation),
        }
    }

    /// Count for a single category
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Greeting => self.greeting,
            Category::ThankYou => self.thank_you,
            Category::Softener => self.softener,
            Category::PoliteVerb => self.polite_verb,
            Category::Apology => self.apology,
            Category::Empathy => self.empathy,
            Category::StrongWord => self.strong_word,
            Category::CommandWord => self.command_word,
            Category::Negation => self.negation,
            Category::PositiveAdj => self.positive_adj,
            Category::PositiveEmotion => self.positive_emotion,
            Category::NegativeEmotion => self.negative_emotion,
            Category::QuestionWord => self.question_word,
            Category::Word => self.word,
            Category::Punctuation => self.punctuation,
        }
    }

    /// Positive sentiment. Gratitude counts as positive.
    pub fn positive(&self) -> usize {
        self.positive_adj + self.positive_emotion + self.thank_you
    }

    /// Hurtful or negative sentiment
    pub fn negative(&self) -> usize {
        self.strong_word + self.negative_emotion
    }

    /// Every politeness marker, apologies and empathy included
    pub fn polite(&self) -> usize {
        self.gentle() + self.apology + self.empathy
    }

    /// Greetings, thanks, softeners and polite verbs
    pub fn gentle(&self) -> usize {
        self.greeting + self.thank_you + self.softener + self.polite_verb
    }

    pub fn command(&self) -> usize {
        self.command_word
    }

    pub fn has_positive(&self) -> bool {
        self.positive() > 0
    }

    pub fn has_negative(&self) -> bool {
        self.negative() > 0
    }

    pub fn has_empathy(&self) -> bool {
        self.empathy > 0
    }

    pub fn has_apology(&self) -> bool {
        self.apology > 0
    }

    pub fn has_softener(&self) -> bool {
        self.softener > 0
    }

    pub fn has_command(&self) -> bool {
        self.command_word > 0
    }

    pub fn has_greeting(&self) -> bool {
        self.greeting > 0
    }

    pub fn has_thank_you(&self) -> bool {
        self.thank_you > 0
    }

    /// True when no category matched at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::LexicalClassifier;

    #[test]
    fn test_empty_tokens() {
        let features = FeatureSet::aggregate(&[]);
        assert!(features.is_empty());
        assert_eq!(features.polite(), 0);
        assert!(!features.has_negative());
    }

    #[test]
    fn test_order_independent() {
        let mut tokens = LexicalClassifier::new().classify("Hi! Thank you, you are so kind. Sorry.");
        let forward = FeatureSet::aggregate(&tokens);
        tokens.reverse();
        assert_eq!(forward, FeatureSet::aggregate(&tokens));
    }

    #[test]
    fn test_derived_groups() {
        let tokens = LexicalClassifier::new().classify("Thank you, that was stupid and I hate it");
        let features = FeatureSet::aggregate(&tokens);
        assert_eq!(features.thank_you, 1);
        assert_eq!(features.positive(), 1);
        assert_eq!(features.negative(), 2);
        assert_eq!(features.polite(), 1);
    }

    #[test]
    fn test_count_matches_fields() {
        let tokens = LexicalClassifier::new().classify("Could you please help? Sorry, I know.");
        let features = FeatureSet::aggregate(&tokens);
        for category in Category::ALL {
            let expected = tokens.iter().filter(|t| t.category == category).count();
            assert_eq!(features.count(category), expected, "{category}");
        }
    }
}
