//! Coach Module Tests
//!
//! Model-sentence retries and fallbacks, lesson and hint branching, and the
//! full evaluator, all against scripted generators.

use crate::analysis::{analyze, Goal};
use crate::coach::lesson::RELATED_SCENARIO_COUNT;
use crate::coach::model_sentence::fallback_sentence;
use crate::coach::{
    GenerationRequest, HintGenerator, LessonGenerator, LessonTier, ModelSentenceGenerator,
    OfflineGenerator, ResponseEvaluator, Scenario, ScenarioContext, SentenceSource, TextGenerator,
};
use crate::config::CoachConfig;
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

// ============================================================================
// Mock Generators for Testing
// ============================================================================

/// Returns scripted results in order, then fails once the script runs out
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, AppError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Generation("script exhausted".to_string())))
    }
}

/// Answers by request kind so concurrent callers get stable results
pub struct KeyedGenerator;

#[async_trait]
impl TextGenerator for KeyedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AppError> {
        if request.json_response {
            return Ok(r#"{"scenarios": [
                {"title": "Sharing the swing", "story": "Ben wants the swing."},
                {"title": "Lost pencil", "story": "Ana cannot find her pencil."},
                {"title": "Extra one", "story": "This should be cut."}
            ]}"#
            .to_string());
        }
        let system = request.system_prompt.unwrap_or_default();
        if system.contains("kind primary school teacher") {
            return Ok("Thank you for asking me, but I feel tired today, so maybe we can play tomorrow.".to_string());
        }
        if system.contains("model answers") {
            return Ok("\"Thank you, but maybe next time!\"".to_string());
        }
        Ok(format!("generated: {}", system))
    }
}

/// Sleeps longer than any test timeout
pub struct SlowGenerator;

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, AppError> {
        sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }
}

/// Tracks how many calls overlap with the model-sentence call
#[derive(Default)]
pub struct OverlapGenerator {
    in_flight: AtomicUsize,
    overlap_at_model_sentence: AtomicUsize,
}

#[async_trait]
impl TextGenerator for OverlapGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AppError> {
        let is_model_sentence = request
            .system_prompt
            .as_deref()
            .is_some_and(|s| s.contains("kind primary school teacher"));
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let delay = if is_model_sentence { 20 } else { 100 };
        sleep(Duration::from_millis(delay)).await;
        if is_model_sentence {
            let now = self.in_flight.load(Ordering::SeqCst);
            self.overlap_at_model_sentence.fetch_max(now, Ordering::SeqCst);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        KeyedGenerator.generate(request).await
    }
}

fn test_config() -> CoachConfig {
    CoachConfig {
        request_timeout: Duration::from_millis(200),
        ..CoachConfig::default()
    }
}

fn context(goal: Goal) -> ScenarioContext<'static> {
    ScenarioContext {
        title: "Playground invite",
        story: "A friend asks you to play but you are tired.",
        question: "What do you say?",
        goal,
    }
}

#[cfg(test)]
mod model_sentence_tests {
    use super::*;

    #[tokio::test]
    async fn test_accepts_good_first_attempt() {
        let good = "Thank you for inviting me, but I feel tired today, so maybe we can play tomorrow.";
        let mock = Arc::new(ScriptedGenerator::new(vec![Ok(good.to_string())]));
        let generator = ModelSentenceGenerator::new(mock.clone(), &test_config());

        let sentence = generator.generate(&context(Goal::PoliteRefusal), "no").await;

        assert_eq!(sentence.text, good);
        assert_eq!(sentence.source, SentenceSource::Generated { attempt: 1 });
        assert!(sentence.score >= 70);
        assert_eq!(mock.calls(), 1);

        let request = &mock.requests()[0];
        assert_eq!(request.max_tokens, 60);
        assert!(request.prompt.contains("THANK_YOU, REASON, ALTERNATIVE"));
    }

    #[tokio::test]
    async fn test_low_score_retries_then_accepts() {
        let good = "Thank you for inviting me, but I feel tired today, so maybe we can play tomorrow.";
        let mock = Arc::new(ScriptedGenerator::new(vec![
            Ok("No. Go away!".to_string()),
            Ok(good.to_string()),
        ]));
        let generator = ModelSentenceGenerator::new(mock.clone(), &test_config());

        let sentence = generator.generate(&context(Goal::PoliteRefusal), "no").await;

        assert_eq!(sentence.source, SentenceSource::Generated { attempt: 2 });
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_echo_of_answer_is_rejected() {
        let answer = "Hi, could you please help me with this? Thank you!";
        let mock = Arc::new(ScriptedGenerator::new(vec![
            Ok(answer.to_string()),
            Ok(format!("  \"{}\"  ", answer.to_lowercase())),
        ]));
        let generator = ModelSentenceGenerator::new(mock.clone(), &test_config());

        let sentence = generator.generate(&context(Goal::AskingForHelp), answer).await;

        assert_eq!(sentence.source, SentenceSource::Fallback);
        assert_eq!(sentence.text, fallback_sentence(Goal::AskingForHelp));
    }

    #[tokio::test]
    async fn test_two_errors_use_fallback() {
        let mock = Arc::new(ScriptedGenerator::new(vec![
            Err(AppError::Http("503".to_string())),
            Err(AppError::Timeout("slow".to_string())),
            Ok("never reached".to_string()),
        ]));
        let generator = ModelSentenceGenerator::new(mock.clone(), &test_config());

        let sentence = generator.generate(&context(Goal::Apologizing), "whatever").await;

        assert_eq!(sentence.source, SentenceSource::Fallback);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_config_error_is_not_retried() {
        let mock = Arc::new(ScriptedGenerator::new(vec![
            Err(AppError::Config("no key".to_string())),
            Ok("never reached".to_string()),
        ]));
        let generator = ModelSentenceGenerator::new(mock.clone(), &test_config());

        let sentence = generator.generate(&context(Goal::GivingFeedback), "bad").await;

        assert_eq!(sentence.source, SentenceSource::Fallback);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failed_attempt() {
        let generator = ModelSentenceGenerator::new(Arc::new(SlowGenerator), &test_config());
        let sentence = generator.generate(&context(Goal::AskingForHelp), "help").await;
        assert_eq!(sentence.source, SentenceSource::Fallback);
    }

    #[tokio::test]
    async fn test_unspecified_goal_skips_generation() {
        let mock = Arc::new(ScriptedGenerator::new(vec![Ok("Hello there!".to_string())]));
        let generator = ModelSentenceGenerator::new(mock.clone(), &test_config());

        let sentence = generator.generate(&context(Goal::Unspecified), "hm").await;

        assert_eq!(sentence.source, SentenceSource::Fallback);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_attempts_follow_config() {
        let config = CoachConfig {
            model_attempts: 3,
            ..test_config()
        };
        let mock = Arc::new(ScriptedGenerator::new(vec![]));
        let generator = ModelSentenceGenerator::new(mock.clone(), &config);

        generator.generate(&context(Goal::PoliteRefusal), "no").await;
        assert_eq!(mock.calls(), 3);
    }
}

#[cfg(test)]
mod lesson_tests {
    use super::*;

    #[tokio::test]
    async fn test_strong_answer_gets_positive_lesson() {
        let answer = "Hi, could you please help me with this? Thank you!";
        let analysis = analyze(answer, Some(Goal::AskingForHelp));
        let lessons = LessonGenerator::new(Arc::new(KeyedGenerator), Duration::from_secs(1));

        let lesson = lessons.generate(&context(Goal::AskingForHelp), answer, &analysis).await;

        assert_eq!(lesson.tier, LessonTier::PositiveReinforcement);
        assert!(lesson.lesson_text.contains("encourages and motivates"));
        assert!(lesson.key_principle.starts_with("🆘"));
        assert!(lesson.related_scenarios.is_empty());
    }

    #[tokio::test]
    async fn test_weak_answer_gets_related_scenarios() {
        let answer = "You must give me that now.";
        let analysis = analyze(answer, Some(Goal::AskingForHelp));
        let lessons = LessonGenerator::new(Arc::new(KeyedGenerator), Duration::from_secs(1));

        let lesson = lessons.generate(&context(Goal::AskingForHelp), answer, &analysis).await;

        assert_eq!(lesson.tier, LessonTier::GentleCorrection);
        assert_eq!(lesson.related_scenarios.len(), RELATED_SCENARIO_COUNT);
        assert_eq!(lesson.related_scenarios[0].title, "Sharing the swing");
    }

    #[tokio::test]
    async fn test_offline_lesson_uses_fallbacks() {
        let answer = "You must give me that now.";
        let analysis = analyze(answer, Some(Goal::Unspecified));
        let lessons = LessonGenerator::new(Arc::new(OfflineGenerator), Duration::from_secs(1));

        let lesson = lessons.generate(&context(Goal::Unspecified), answer, &analysis).await;

        assert_eq!(lesson.lesson_text, lesson.tier.fallback_text());
        assert!(lesson.related_scenarios.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_scenarios_give_empty_list() {
        let mock = Arc::new(ScriptedGenerator::new(vec![Ok("[not json".to_string())]));
        let lessons = LessonGenerator::new(mock, Duration::from_secs(1));

        let scenarios = lessons.related_scenarios(&context(Goal::PoliteRefusal), 2).await;
        assert!(scenarios.is_empty());
    }
}

#[cfg(test)]
mod hint_tests {
    use super::*;

    #[tokio::test]
    async fn test_strong_answer_gets_encouragement_only() {
        let answer = "Hi, could you please help me with this? Thank you!";
        let analysis = analyze(answer, Some(Goal::AskingForHelp));
        let hints = HintGenerator::new(Arc::new(KeyedGenerator), Duration::from_secs(1));

        let hint = hints.generate(&context(Goal::AskingForHelp), answer, &analysis).await;

        assert!(hint.hint_text.contains("supportive teacher"));
        assert!(hint.alternative_response.is_none());
        assert!(hint.tip.starts_with("💡"));
    }

    #[tokio::test]
    async fn test_weak_answer_gets_alternative() {
        let answer = "No. Go away!";
        let analysis = analyze(answer, Some(Goal::PoliteRefusal));
        let hints = HintGenerator::new(Arc::new(KeyedGenerator), Duration::from_secs(1));

        let hint = hints.generate(&context(Goal::PoliteRefusal), answer, &analysis).await;

        assert!(hint.hint_text.contains("patient teacher"));
        assert_eq!(
            hint.alternative_response.as_deref(),
            Some("Thank you, but maybe next time!")
        );
    }

    #[tokio::test]
    async fn test_offline_hint_uses_fallback_and_no_alternative() {
        let answer = "No. Go away!";
        let analysis = analyze(answer, Some(Goal::PoliteRefusal));
        let hints = HintGenerator::new(Arc::new(OfflineGenerator), Duration::from_secs(1));

        let hint = hints.generate(&context(Goal::PoliteRefusal), answer, &analysis).await;

        assert!(hint.hint_text.starts_with("You can try adding a greeting"));
        assert!(hint.alternative_response.is_none());
    }
}

#[cfg(test)]
mod evaluator_tests {
    use super::*;

    fn scenario(goal: Goal) -> Scenario {
        Scenario::new("Playground invite", goal)
            .with_story("A friend asks you to play but you are tired.")
            .with_question("What do you say?")
    }

    #[tokio::test]
    async fn test_good_answer_has_no_improvement_example() {
        let evaluator = ResponseEvaluator::new(Arc::new(KeyedGenerator), &test_config());
        let evaluation = evaluator
            .evaluate(
                "Hi, could you please help me with this? Thank you!",
                &scenario(Goal::AskingForHelp),
            )
            .await
            .unwrap();

        assert!(evaluation.overall_score() >= 85);
        assert!(evaluation.improvement_example.is_none());
        assert!(evaluation.feedback.praise.starts_with("🌟"));
    }

    #[tokio::test]
    async fn test_weak_answer_gets_generated_model_sentence() {
        let evaluator = ResponseEvaluator::new(Arc::new(KeyedGenerator), &test_config());
        let evaluation = evaluator
            .evaluate("No. Go away!", &scenario(Goal::PoliteRefusal))
            .await
            .unwrap();

        assert!(evaluation.overall_score() < 70);
        let example = evaluation.improvement_example.unwrap();
        assert_eq!(example.source, SentenceSource::Generated { attempt: 1 });
        assert!(example.score >= 70);
        assert!(evaluation.hint.alternative_response.is_some());
    }

    #[tokio::test]
    async fn test_model_sentence_runs_alongside_lesson_and_hint() {
        let generator = Arc::new(OverlapGenerator::default());
        let evaluator = ResponseEvaluator::new(generator.clone(), &test_config());
        let evaluation = evaluator
            .evaluate("No. Go away!", &scenario(Goal::PoliteRefusal))
            .await
            .unwrap();

        assert!(evaluation.improvement_example.is_some());
        assert!(generator.overlap_at_model_sentence.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_offline_evaluation_still_complete() {
        let evaluator = ResponseEvaluator::new(Arc::new(OfflineGenerator), &test_config());
        let evaluation = evaluator
            .evaluate("You must give me that now.", &scenario(Goal::AskingForHelp))
            .await
            .unwrap();

        let example = evaluation.improvement_example.unwrap();
        assert_eq!(example.source, SentenceSource::Fallback);
        assert_eq!(example.text, fallback_sentence(Goal::AskingForHelp));
        assert_eq!(evaluation.lesson.lesson_text, evaluation.lesson.tier.fallback_text());
    }

    #[tokio::test]
    async fn test_evaluation_score_matches_analyzer() {
        let evaluator = ResponseEvaluator::new(Arc::new(OfflineGenerator), &test_config());
        let answer = "I'm sorry, I understand it hurt you, I will be careful.";
        let evaluation = evaluator
            .evaluate(answer, &scenario(Goal::Apologizing))
            .await
            .unwrap();
        assert_eq!(evaluation.analysis, analyze(answer, Some(Goal::Apologizing)));
    }

    #[tokio::test]
    async fn test_invalid_scenario_is_rejected() {
        let evaluator = ResponseEvaluator::new(Arc::new(OfflineGenerator), &test_config());
        let result = evaluator.evaluate("hi", &Scenario::new("", Goal::Apologizing)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_evaluation_serializes() {
        let evaluator = ResponseEvaluator::new(Arc::new(OfflineGenerator), &test_config());
        let evaluation = evaluator
            .evaluate("Thanks!", &scenario(Goal::PoliteRefusal))
            .await
            .unwrap();
        let json = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(json["analysis"]["goal"], "polite_refusal");
        assert!(json["evaluated_at"].is_string());
    }
}
