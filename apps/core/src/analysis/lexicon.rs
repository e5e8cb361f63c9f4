//! Pattern tables for the lexical classifier.
//!
//! Each category owns a group of whole-word regexes. Groups are compiled once
//! on first use and shared read-only by every analysis.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::category::Category;

/// A compiled pattern group for one category
pub struct PatternGroup {
    pub category: Category,
    patterns: Vec<Regex>,
    /// Phrases whose inner matches must not count for this category
    exclusions: Vec<Regex>,
}

impl PatternGroup {
    fn new(category: Category, patterns: Vec<Regex>) -> Self {
        Self {
            category,
            patterns,
            exclusions: Vec::new(),
        }
    }

    fn excluding(mut self, exclusions: Vec<Regex>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Non-overlapping `(start, end)` byte spans matched by this group.
    ///
    /// Overlaps between patterns of the same group resolve to the leftmost
    /// match, and the longest one when two start at the same offset.
    pub fn find_spans(&self, text: &str) -> Vec<(usize, usize)> {
        let mut excluded: Vec<(usize, usize)> = self
            .exclusions
            .iter()
            .flat_map(|re| re.find_iter(text).map(|m| (m.start(), m.end())))
            .collect();
        excluded.sort_unstable();

        let mut candidates: Vec<(usize, usize)> = self
            .patterns
            .iter()
            .flat_map(|re| re.find_iter(text).map(|m| (m.start(), m.end())))
            .filter(|&(start, end)| start < end)
            .collect();
        candidates.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut spans = Vec::with_capacity(candidates.len());
        let mut last_end = 0;
        // Furthest end among exclusions starting at or before the candidate
        let mut next_excluded = 0;
        let mut excluded_reach = 0;
        for (start, end) in candidates {
            while next_excluded < excluded.len() && excluded[next_excluded].0 <= start {
                excluded_reach = excluded_reach.max(excluded[next_excluded].1);
                next_excluded += 1;
            }
            if end <= excluded_reach {
                continue;
            }
            if start >= last_end {
                spans.push((start, end));
                last_end = end;
            }
        }
        spans
    }
}

fn compile(pattern: &str) -> Regex {
    // NOTE: patterns are literals in this file; a failure here is a programming error
    Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid regex {pattern:?}: {e}"))
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| compile(p)).collect()
}

static PATTERN_GROUPS: LazyLock<Vec<PatternGroup>> = LazyLock::new(|| {
    vec![
        PatternGroup::new(
            Category::Greeting,
            compile_all(&[
                r"(?i)\b(hi|hello|hey|hiya|howdy|greetings)\b",
                r"(?i)\b(good (morning|afternoon|evening)|dear)\b",
            ]),
        ),
        PatternGroup::new(
            Category::ThankYou,
            compile_all(&[
                r"(?i)\b(thank you|thanks|thank|thx)\b",
                r"(?i)\b(grateful|appreciate (it|that|you|this))\b",
            ]),
        ),
        PatternGroup::new(
            Category::Softener,
            compile_all(&[
                r"(?i)\b(please|pls)\b",
                r"(?i)\b(maybe|perhaps|possibly|probably)\b",
                r"(?i)\b(i think|i guess|i feel like|i wonder)\b",
                r"(?i)\b(kind of|sort of|a little|a bit)\b",
                r"(?i)\b(could|might)\b",
            ]),
        ),
        PatternGroup::new(
            Category::PoliteVerb,
            compile_all(&[
                r"(?i)\b(could you|would you mind|would you|can i|may i|could i)\b",
                r"(?i)\b(do you mind|is it okay if|would it be okay)\b",
            ]),
        ),
        PatternGroup::new(
            Category::Apology,
            compile_all(&[
                r"(?i)\b(sorry|apologi[sz]e|apologies)\b",
                r"(?i)\b(my fault|my bad|forgive me)\b",
            ]),
        ),
        PatternGroup::new(
            Category::Empathy,
            compile_all(&[
                r"(?i)\b(understand|know|feel(s|ings)?|reali[sz]e)\b",
                r"(?i)\b(didn['’]t mean|did not mean|accidents?|sorry)\b",
                r"(?i)\b(i see|i hear you|are you (ok|okay|alright)|that must be|i care)\b",
            ]),
        ),
        PatternGroup::new(
            Category::StrongWord,
            compile_all(&[
                r"(?i)\b(stupid|dumb|idiot|worst|loser|useless)\b",
                r"(?i)\b(terrible|awful|bad|ugly|boring|gross)\b",
            ]),
        )
        .excluding(compile_all(&[r"(?i)\b(my bad|not bad|not that bad)\b"])),
        PatternGroup::new(
            Category::CommandWord,
            compile_all(&[
                r"(?i)\b(you must|you have to|you need to)\b",
                r"(?i)\b(give me|do it now|hurry up|shut up|go away|stop it|leave me alone)\b",
            ]),
        )
        .excluding(compile_all(&[
            r"(?i)\b(could|would|can|will) you (please )?give me\b",
            r"(?i)\bplease give me\b",
        ])),
        PatternGroup::new(
            Category::Negation,
            compile_all(&[
                r"(?i)\b(no|not|never|nope|nothing)\b",
                r"(?i)\b(don['’]t|doesn['’]t|didn['’]t|can['’]t|cannot|won['’]t)\b",
                r"(?i)\b(isn['’]t|aren['’]t|wasn['’]t|shouldn['’]t|wouldn['’]t|couldn['’]t)\b",
            ]),
        ),
        PatternGroup::new(
            Category::PositiveAdj,
            compile_all(&[
                r"(?i)\b(good|nice|great|fine|okay|ok|cool|fun|kind|lovely)\b",
                r"(?i)\b(awesome|amazing|wonderful|beautiful|interesting|brilliant|better|best)\b",
            ]),
        )
        .excluding(compile_all(&[r"(?i)\bkind of\b"])),
        PatternGroup::new(
            Category::PositiveEmotion,
            compile_all(&[
                r"(?i)\b(happy|glad|love|excited|proud|pleased|delighted)\b",
                r"(?i)\b(enjoy(ed)?|thankful|hope)\b",
            ]),
        ),
        PatternGroup::new(
            Category::NegativeEmotion,
            compile_all(&[
                r"(?i)\b(hate|angry|sad|upset|mad|annoyed)\b",
                r"(?i)\b(furious|disappointed|jealous)\b",
            ]),
        ),
        PatternGroup::new(
            Category::QuestionWord,
            compile_all(&[r"(?i)\b(what|why|how|when|where|who|which|whose)\b"]),
        ),
    ]
});

/// Words and contractions, used for the generic `word` category
pub static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"[\p{L}\p{N}]+(?:['’][\p{L}\p{N}]+)*"));

/// Sentence punctuation marks
pub static PUNCTUATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"[.,!?;:]"));

/// The category pattern groups, in table order.
pub fn pattern_groups() -> &'static [PatternGroup] {
    &PATTERN_GROUPS
}

static REASON_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(because|but|since)\b"));

// "can't" is not a request
static POLITE_REQUEST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(could|can|please)([^\w'’]|$)"));

static PLEASE_MARKER: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(please|pls)\b"));

static ACKNOWLEDGEMENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"\b(i see|i understand|i hear you|i know|good idea|nice idea|great idea|good point|you['’]re right|interesting|i like your)\b",
    )
});

static ALTERNATIVE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"\b(instead|another way|another idea|other way|what if|how about|we could|could try|let['’]s try|alternatively|or maybe)\b",
    )
});

static HELP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(help|helps|helping|need|needs|assist)\b"));

static OPINION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"\b(i think|in my opinion|i believe|i feel like|should|shouldn['’]t|it would be better|looks|seems)\b",
    )
});

/// Lexical markers read directly from the lower-cased text.
///
/// These back the goal-fit and goal-inference predicates that look for a
/// specific word rather than a whole category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    /// "thank" appears anywhere (thanks, thankful)
    pub thank: bool,
    /// because / but / since
    pub reason: bool,
    /// could / can / please
    pub polite_request: bool,
    pub please: bool,
    /// Respects the other idea first ("i see", "good idea")
    pub acknowledgement: bool,
    /// Offers another option ("instead", "how about")
    pub alternative: bool,
    /// help / need / assist
    pub help_request: bool,
    /// States an opinion ("i think", "should")
    pub opinion: bool,
    /// Text ends with a question mark
    pub trailing_question: bool,
}

impl Markers {
    /// Detect every marker in `text`. Never fails; empty text has no markers.
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();

        Self {
            thank: lower.contains("thank"),
            reason: REASON_MARKER.is_match(&lower),
            polite_request: POLITE_REQUEST_MARKER.is_match(&lower),
            please: PLEASE_MARKER.is_match(&lower),
            acknowledgement: ACKNOWLEDGEMENT_MARKER.is_match(&lower),
            alternative: ALTERNATIVE_MARKER.is_match(&lower),
            help_request: HELP_MARKER.is_match(&lower),
            opinion: OPINION_MARKER.is_match(&lower),
            trailing_question: lower.trim_end().ends_with('?'),
        }
    }
}
