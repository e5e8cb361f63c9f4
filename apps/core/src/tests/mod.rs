//! Test Module
//!
//! Cross-module test suites for the KindWords core.
//!
//! ## Test Categories
//! - `analysis_tests`: score bounds, determinism, monotonicity, reference scenarios
//! - `coach_tests`: model-sentence retries, lessons, hints and the evaluator

pub mod coach_tests;
