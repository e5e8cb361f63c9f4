//! Coach Module - child-facing collaborators built on the analysis core.
//!
//! Everything here reads an [`AnalysisResult`](crate::analysis::AnalysisResult)
//! and never scores on its own. Text generation goes through an injected
//! [`TextGenerator`]; failures fall back to fixed text.

pub mod evaluator;
pub mod feedback;
pub mod hint;
pub mod lesson;
pub mod model_sentence;
pub mod openai;
pub mod scenario;
pub mod traits;

pub use evaluator::{Evaluation, ResponseEvaluator};
pub use feedback::ChildFeedback;
pub use hint::{Hint, HintGenerator};
pub use lesson::{Lesson, LessonGenerator, LessonTier};
pub use model_sentence::{ModelSentence, ModelSentenceGenerator, SentenceSource};
pub use openai::OpenAiClient;
pub use scenario::{PracticeScenario, Scenario, ScenarioContext};
pub use traits::{GenerationRequest, OfflineGenerator, TextGenerator};
