//! KindWords core library.
//!
//! Scores short sentences written by children for politeness, empathy and
//! goal fit, and builds child-friendly coaching on top of the score.
//!
//! ## Modules
//! - `analysis`: deterministic sentence analysis and rubric scoring
//! - `coach`: feedback, model sentences, lessons and hints
//! - `config`: environment configuration for the coach layer
//! - `error`: application error type

pub mod analysis;
pub mod coach;
pub mod config;
pub mod error;

#[cfg(test)]
mod tests;
