//! Response Evaluator - wires the analyzer and the coach collaborators.
//!
//! The analyzer is the only scoring authority. Generated text never changes
//! a score; it only adds the model sentence, lesson and hint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::feedback::ChildFeedback;
use super::hint::{Hint, HintGenerator};
use super::lesson::{Lesson, LessonGenerator};
use super::model_sentence::{ModelSentence, ModelSentenceGenerator};
use super::scenario::Scenario;
use super::traits::TextGenerator;
use crate::analysis::{AnalysisResult, SentenceAnalyzer};
use crate::config::CoachConfig;
use crate::error::AppError;

/// Answers below this score get a model sentence
pub const IMPROVEMENT_THRESHOLD: i32 = 70;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub user_answer: String,
    pub analysis: AnalysisResult,
    pub feedback: ChildFeedback,
    pub improvement_example: Option<ModelSentence>,
    pub lesson: Lesson,
    pub hint: Hint,
    pub evaluated_at: DateTime<Utc>,
}

impl Evaluation {
    pub fn overall_score(&self) -> i32 {
        self.analysis.overall_score
    }
}

pub struct ResponseEvaluator {
    analyzer: SentenceAnalyzer,
    model_sentences: ModelSentenceGenerator,
    lessons: LessonGenerator,
    hints: HintGenerator,
}

impl ResponseEvaluator {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &CoachConfig) -> Self {
        Self {
            analyzer: SentenceAnalyzer::new(),
            model_sentences: ModelSentenceGenerator::new(generator.clone(), config),
            lessons: LessonGenerator::new(generator.clone(), config.request_timeout),
            hints: HintGenerator::new(generator, config.request_timeout),
        }
    }

    /// Full evaluation of one answer to a scenario.
    ///
    /// Fails only when the scenario itself is invalid; every generation
    /// failure degrades to fallback text.
    pub async fn evaluate(&self, user_answer: &str, scenario: &Scenario) -> Result<Evaluation, AppError> {
        let context = scenario.context()?;

        // 1. Analyzer = single source of truth
        let analysis = self.analyzer.analyze(user_answer, Some(context.goal));
        info!("Evaluating answer for '{}': {}", context.title, analysis.summary());

        // 2. Rule-based feedback
        let feedback = ChildFeedback::from_analysis(&analysis);

        // 3. Model sentence, lesson and hint are independent
        let needs_example = analysis.overall_score < IMPROVEMENT_THRESHOLD;
        let (improvement_example, lesson, hint) = tokio::join!(
            async {
                if needs_example {
                    Some(self.model_sentences.generate(&context, user_answer).await)
                } else {
                    None
                }
            },
            self.lessons.generate(&context, user_answer, &analysis),
            self.hints.generate(&context, user_answer, &analysis),
        );

        Ok(Evaluation {
            user_answer: user_answer.to_string(),
            analysis,
            feedback,
            improvement_example,
            lesson,
            hint,
            evaluated_at: Utc::now(),
        })
    }
}
