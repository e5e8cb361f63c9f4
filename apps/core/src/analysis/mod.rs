//! # Analysis Module
//!
//! Deterministic, non-LLM sentence analysis for KindWords.
//! This is the only scoring authority: coaching text is built on its result.
//!
//! ## Components
//! - `lexicon`: Pattern groups per category and text markers
//! - `classifier`: Lexical classifier producing category-tagged tokens
//! - `features`: Order-independent feature aggregation
//! - `rubric`: Goal-aware rubric scorer with reasons
//! - `style`: Style label, strengths and weaknesses
//! - `goal`: Scenario goals and goal inference
//! - `structure`: Sentence shape summary
//! - `result`: Output data structure
//! - `analyzer`: Main orchestrator

pub mod analyzer;
pub mod category;
pub mod classifier;
pub mod features;
pub mod goal;
pub mod lexicon;
pub mod result;
pub mod rubric;
pub mod structure;
pub mod style;

pub use analyzer::{analyze, SentenceAnalyzer};
pub use category::{Category, Token};
pub use classifier::LexicalClassifier;
pub use features::FeatureSet;
pub use goal::{infer_goal, Goal, InferredGoal};
pub use lexicon::Markers;
pub use result::AnalysisResult;
pub use rubric::{CategoryScore, Penalty, RubricCategory, RubricScorer, ScoreBreakdown};
pub use structure::{CategoryGroups, SentenceStructure};
pub use style::{classify_style, StyleLabel};
