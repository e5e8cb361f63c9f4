//! Sentence structure summary.
//!
//! Shallow shape of the sentence: counts, question/exclamation flags and
//! the category groups the lesson prompts refer to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::category::{Category, Token};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceStructure {
    pub token_count: usize,
    /// Generic words not claimed by another category
    pub word_count: usize,
    pub unique_categories: usize,
    pub has_punctuation: bool,
    pub is_question: bool,
    pub is_exclamation: bool,
    pub groups: CategoryGroups,
}

/// Token counts per linguistic group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroups {
    pub politeness: usize,
    pub emotions: usize,
    pub negation: usize,
    pub questions: usize,
    pub content: usize,
}

impl SentenceStructure {
    pub fn from_tokens(text: &str, tokens: &[Token]) -> Self {
        let mut groups = CategoryGroups::default();
        for token in tokens {
            let category = token.category;
            if category.is_politeness() {
                groups.politeness += 1;
            }
            if category.is_emotion() {
                groups.emotions += 1;
            }
            if matches!(category, Category::Negation | Category::CommandWord) {
                groups.negation += 1;
            }
            if category == Category::QuestionWord {
                groups.questions += 1;
            }
            if category == Category::Word {
                groups.content += 1;
            }
        }

        let unique: BTreeSet<Category> = tokens.iter().map(|t| t.category).collect();
        let trimmed = text.trim_end();

        Self {
            token_count: tokens.len(),
            word_count: groups.content,
            unique_categories: unique.len(),
            has_punctuation: unique.contains(&Category::Punctuation),
            is_question: groups.questions > 0 || trimmed.ends_with('?'),
            is_exclamation: trimmed.ends_with('!'),
            groups,
        }
    }
}
