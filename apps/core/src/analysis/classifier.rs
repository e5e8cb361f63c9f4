//! Lexical Classifier.
//!
//! Turns raw text into category-tagged tokens by running every pattern
//! group over the whole input. No grammar, no model: pure regex matching.

use super::category::{Category, Token};
use super::lexicon::{pattern_groups, PUNCTUATION_PATTERN, WORD_PATTERN};

/// Walks the text forward once, turning ascending byte offsets into
/// 1-based lines and 0-based character columns
struct PositionCursor<'a> {
    text: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> PositionCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line: 1,
            column: 0,
        }
    }

    /// `offset` must not be smaller than the previous call's
    fn advance_to(&mut self, offset: usize) -> (usize, usize) {
        for c in self.text[self.offset..offset].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.offset = offset;
        (self.line, self.column)
    }
}

/// Lexical classifier over the shared pattern table
#[derive(Debug, Clone, Copy)]
pub struct LexicalClassifier {
    /// Emit `word` tokens for text no category claimed
    keep_words: bool,
}

impl Default for LexicalClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexicalClassifier {
    /// Classifier that keeps generic words and punctuation
    pub fn new() -> Self {
        Self { keep_words: true }
    }

    /// Classifier that only emits tokens for the categorized pattern groups
    pub fn categories_only() -> Self {
        Self { keep_words: false }
    }

    /// Classify `text` into an ordered token sequence.
    ///
    /// Tokens are sorted by `(start, end, category)`. Empty or
    /// whitespace-only input yields no tokens.
    pub fn classify(&self, text: &str) -> Vec<Token> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut spans: Vec<(usize, usize, Category)> = Vec::new();
        for group in pattern_groups() {
            spans.extend(
                group
                    .find_spans(text)
                    .into_iter()
                    .map(|(start, end)| (start, end, group.category)),
            );
        }

        if self.keep_words {
            // Category spans sorted by start; `reach` is the furthest end seen so far
            spans.sort_unstable();
            let claimed = spans.len();
            let mut next = 0;
            let mut reach = 0;

            for m in WORD_PATTERN.find_iter(text) {
                while next < claimed && spans[next].0 < m.end() {
                    reach = reach.max(spans[next].1);
                    next += 1;
                }
                // Spans starting at or after the word's end cannot overlap it
                if reach <= m.start() {
                    spans.push((m.start(), m.end(), Category::Word));
                }
            }

            spans.extend(
                PUNCTUATION_PATTERN
                    .find_iter(text)
                    .map(|m| (m.start(), m.end(), Category::Punctuation)),
            );
        }

        spans.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

        let mut cursor = PositionCursor::new(text);
        spans
            .into_iter()
            .map(|(start, end, category)| {
                let (line, column) = cursor.advance_to(start);
                Token {
                    category,
                    text: text[start..end].to_string(),
                    start,
                    end,
                    line,
                    column,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(tokens: &[Token]) -> Vec<Category> {
        tokens.iter().map(|t| t.category).collect()
    }

    #[test]
    fn test_empty_input() {
        let classifier = LexicalClassifier::new();
        assert!(classifier.classify("").is_empty());
        assert!(classifier.classify("   \n\t").is_empty());
    }

    #[test]
    fn test_multi_label_sorry() {
        let tokens = LexicalClassifier::new().classify("sorry");
        assert_eq!(categories(&tokens), vec![Category::Apology, Category::Empathy]);
        assert!(tokens.iter().all(|t| t.text == "sorry"));
    }

    #[test]
    fn test_case_insensitive_keeps_surface() {
        let tokens = LexicalClassifier::categories_only().classify("HELLO Friend");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].category, Category::Greeting);
        assert_eq!(tokens[0].text, "HELLO");
    }

    #[test]
    fn test_words_and_punctuation() {
        let tokens = LexicalClassifier::new().classify("Hi, Sam!");
        assert_eq!(
            categories(&tokens),
            vec![
                Category::Greeting,
                Category::Punctuation,
                Category::Word,
                Category::Punctuation
            ]
        );
        assert_eq!(tokens[2].text, "Sam");
    }

    #[test]
    fn test_claimed_words_are_not_generic() {
        let tokens = LexicalClassifier::new().classify("could you");
        assert!(!tokens.iter().any(|t| t.category == Category::Word));
        assert!(tokens.iter().any(|t| t.category == Category::PoliteVerb));
        assert!(tokens.iter().any(|t| t.category == Category::Softener));
    }

    #[test]
    fn test_offsets_lines_and_columns() {
        let text = "ok\nthank you";
        let tokens = LexicalClassifier::categories_only().classify(text);
        let thanks = tokens
            .iter()
            .find(|t| t.category == Category::ThankYou)
            .unwrap();
        assert_eq!(&text[thanks.start..thanks.end], "thank you");
        assert_eq!(thanks.line, 2);
        assert_eq!(thanks.column, 0);

        let ok = &tokens[0];
        assert_eq!((ok.line, ok.column), (1, 0));
    }

    #[test]
    fn test_columns_count_characters() {
        let tokens = LexicalClassifier::categories_only().classify("héllo, hi");
        let hi = tokens.iter().find(|t| t.text == "hi").unwrap();
        assert_eq!(hi.column, 7);
        assert_eq!(hi.start, 8);
    }

    #[test]
    fn test_repeated_matches_all_counted() {
        let tokens = LexicalClassifier::categories_only().classify("please, please, please");
        let softeners = tokens
            .iter()
            .filter(|t| t.category == Category::Softener)
            .count();
        assert_eq!(softeners, 3);
    }

    #[test]
    fn test_multi_word_span_claims_every_word() {
        let tokens = LexicalClassifier::new().classify("would you mind, Sam");
        let words: Vec<&str> = tokens
            .iter()
            .filter(|t| t.category == Category::Word)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(words, vec!["Sam"]);
    }

    #[test]
    fn test_long_single_line_input() {
        let n = 20_000;
        let text = "zebra please ".repeat(n);
        let tokens = LexicalClassifier::new().classify(&text);

        let count = |category| tokens.iter().filter(|t| t.category == category).count();
        assert_eq!(count(Category::Word), n);
        assert_eq!(count(Category::Softener), n);

        let last = tokens.last().unwrap();
        assert_eq!(last.text, "please");
        assert_eq!(last.line, 1);
        assert_eq!(last.column, text.len() - "please ".len());
    }

    #[test]
    fn test_positions_across_lines() {
        let text = "héllo\nthanks, hi\n\nsorry";
        let tokens = LexicalClassifier::new().classify(text);
        let at = |s: &str| tokens.iter().find(|t| t.text == s).unwrap();
        assert_eq!((at("héllo").line, at("héllo").column), (1, 0));
        assert_eq!((at("thanks").line, at("thanks").column), (2, 0));
        assert_eq!((at("hi").line, at("hi").column), (2, 8));
        assert_eq!((at("sorry").line, at("sorry").column), (4, 0));
    }

    #[test]
    fn test_deterministic() {
        let classifier = LexicalClassifier::new();
        let text = "I'm sorry, I didn't mean it. Could you forgive me?";
        assert_eq!(classifier.classify(text), classifier.classify(text));
    }
}
