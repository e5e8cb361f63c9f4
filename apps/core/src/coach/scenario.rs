use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::analysis::Goal;
use crate::error::AppError;

/// A practice situation the child answers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "story must be at most 2000 characters"))]
    pub story: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "question must be at most 500 characters"))]
    pub question: String,

    #[serde(default)]
    pub goal: Goal,
}

impl Scenario {
    pub fn new(title: impl Into<String>, goal: Goal) -> Self {
        Self {
            title: title.into(),
            goal,
            ..Default::default()
        }
    }

    pub fn with_story(mut self, story: impl Into<String>) -> Self {
        self.story = story.into();
        self
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    /// Validate and hand back the prompt context
    pub fn context(&self) -> Result<ScenarioContext<'_>, AppError> {
        self.validate()?;
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be blank".to_string()));
        }
        Ok(ScenarioContext {
            title: self.title.trim(),
            story: self.story.trim(),
            question: self.question.trim(),
            goal: self.goal,
        })
    }
}

/// Borrowed, validated view of a scenario used for prompt building
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioContext<'a> {
    pub title: &'a str,
    pub story: &'a str,
    pub question: &'a str,
    pub goal: Goal,
}

/// Short suggested practice situation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeScenario {
    pub title: String,
    pub story: String,
}
