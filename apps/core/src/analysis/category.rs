//! Token categories and the tagged token produced by the lexical classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Communicative category of a word or phrase.
///
/// A single span of text may be tagged with several categories ("sorry" is
/// both an apology and an empathy word), so categories are not exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// hi, hello, good morning
    Greeting,
    /// thank you, thanks
    ThankYou,
    /// please, maybe, perhaps, i think, could
    Softener,
    /// could you, would you, may i
    PoliteVerb,
    /// sorry, apologize, my fault
    Apology,
    /// understand, feel, didn't mean
    Empathy,
    /// stupid, dumb, awful
    StrongWord,
    /// you must, give me, do it now
    CommandWord,
    /// no, not, don't, never
    Negation,
    /// good, nice, great
    PositiveAdj,
    /// happy, glad, love
    PositiveEmotion,
    /// hate, angry, sad
    NegativeEmotion,
    /// what, why, how
    QuestionWord,
    /// Any word not matched by another category
    Word,
    /// . , ! ? ; :
    Punctuation,
}

impl Category {
    /// Number of categories
    pub const COUNT: usize = 15;

    /// Every category, in table order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Greeting,
        Category::ThankYou,
        Category::Softener,
        Category::PoliteVerb,
        Category::Apology,
        Category::Empathy,
        Category::StrongWord,
        Category::CommandWord,
        Category::Negation,
        Category::PositiveAdj,
        Category::PositiveEmotion,
        Category::NegativeEmotion,
        Category::QuestionWord,
        Category::Word,
        Category::Punctuation,
    ];

    /// Returns the snake_case label for the category
    pub fn label(&self) -> &'static str {
        match self {
            Category::Greeting => "greeting",
            Category::ThankYou => "thank_you",
            Category::Softener => "softener",
            Category::PoliteVerb => "polite_verb",
            Category::Apology => "apology",
            Category::Empathy => "empathy",
            Category::StrongWord => "strong_word",
            Category::CommandWord => "command_word",
            Category::Negation => "negation",
            Category::PositiveAdj => "positive_adj",
            Category::PositiveEmotion => "positive_emotion",
            Category::NegativeEmotion => "negative_emotion",
            Category::QuestionWord => "question_word",
            Category::Word => "word",
            Category::Punctuation => "punctuation",
        }
    }

    /// Position in [`Category::ALL`], used for dense count tables.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Categories that show the speaker is being courteous.
    pub fn is_politeness(&self) -> bool {
        matches!(
            self,
            Category::Greeting
                | Category::ThankYou
                | Category::Softener
                | Category::PoliteVerb
                | Category::Apology
                | Category::Empathy
        )
    }

    /// Categories that carry emotional tone, positive or negative.
    pub fn is_emotion(&self) -> bool {
        matches!(
            self,
            Category::PositiveAdj
                | Category::PositiveEmotion
                | Category::NegativeEmotion
                | Category::StrongWord
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A category-tagged span of the input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Category of the span
    pub category: Category,
    /// Surface text, as written in the input
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line number
    pub line: usize,
    /// 0-based character column within the line
    pub column: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_table_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_labels_match_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
        }
    }

    #[test]
    fn test_politeness_group() {
        assert!(Category::Apology.is_politeness());
        assert!(Category::Softener.is_politeness());
        assert!(!Category::CommandWord.is_politeness());
        assert!(!Category::Word.is_politeness());
    }
}
