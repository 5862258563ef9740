use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::QuestionRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    #[serde(default)]
    pub user: Option<String>,
    pub name: String,
    pub course: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub optimize_learning: bool,
    pub quiz_length: u32,
    #[serde(default)]
    pub options_per_question: Option<u32>,
}

impl Quiz {
    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }
}

/// Quiz generation request. Subjects/materials narrow the snippet pool the
/// server draws questions from; empty means the whole course.
#[derive(Debug, Clone, Validate)]
pub struct QuizConfigForm {
    #[validate(length(min = 1, max = 1000, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "course is required"))]
    pub course: String,
    pub subjects: Vec<String>,
    pub materials: Vec<String>,
    #[validate(range(min = 3, max = 10, message = "quiz length must be 3-10"))]
    pub quiz_length: u32,
    #[validate(range(min = 2, max = 4, message = "options per question must be 2-4"))]
    pub options_per_question: u32,
}

impl Default for QuizConfigForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            course: String::new(),
            subjects: Vec::new(),
            materials: Vec::new(),
            quiz_length: 5,
            options_per_question: 4,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewQuizRequest<'a> {
    pub name: &'a str,
    pub course: &'a str,
    pub subjects: &'a [String],
    pub materials: &'a [String],
    pub quiz_length: u32,
    pub options_per_question: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// One buffered answer selection, keyed by question id. Exists only while
/// a quiz attempt is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResponse {
    pub id: String,
    pub single_choice: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitQuizRequest<'a> {
    pub responses: &'a [QuizResponse],
}

/// Create and submit both return the quiz plus the full question set; the
/// question `choices` are still wire-encoded strings at this point.
#[derive(Debug, Deserialize)]
pub(crate) struct QuizWithQuestionsEnvelope {
    pub quiz: Quiz,
    pub questions: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizListEnvelope {
    pub quizzes: Vec<Quiz>,
}
