use serde::{Deserialize, Serialize};

/// Literal separator the backend uses to pack a question's choices into a
/// single string column. A choice text containing this substring would be
/// split apart on decode; that matches the server's storage format and is
/// not worked around here.
pub const CHOICE_DELIMITER: &str = ";;/;;";

pub fn decode_choices(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(CHOICE_DELIMITER).map(str::to_string).collect()
}

pub fn encode_choices(choices: &[String]) -> String {
    choices.join(CHOICE_DELIMITER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    ShortAnswer,
    MultipleAnswer,
    MultipleChoice,
}

/// Question exactly as the backend sends it: `choices` is a single
/// delimited string (or null for short-answer questions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub quiz: String,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub choices: Option<String>,
    #[serde(default)]
    pub single_correct_choice: Option<u32>,
    #[serde(default)]
    pub correct_choices: Option<String>,
    #[serde(default)]
    pub correct_short_answer: Option<String>,
    #[serde(default)]
    pub attempted_single_choice: Option<u32>,
    #[serde(default)]
    pub attempted_choices: Option<String>,
    #[serde(default)]
    pub attempted_short_answer: Option<String>,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub snippet_id: Option<String>,
}

/// Client-side question with `choices` decoded into an array. Grading
/// fields stay `None` until the owning quiz has been submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: String,
    pub quiz: String,
    pub question: String,
    pub question_type: QuestionType,
    pub choices: Vec<String>,
    pub single_correct_choice: Option<u32>,
    pub correct_choices: Option<String>,
    pub correct_short_answer: Option<String>,
    pub attempted_single_choice: Option<u32>,
    pub attempted_choices: Option<String>,
    pub attempted_short_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub snippet_id: Option<String>,
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        let choices = record
            .choices
            .as_deref()
            .map(decode_choices)
            .unwrap_or_default();
        Self {
            id: record.id,
            quiz: record.quiz,
            question: record.question,
            question_type: record.question_type,
            choices,
            single_correct_choice: record.single_correct_choice,
            correct_choices: record.correct_choices,
            correct_short_answer: record.correct_short_answer,
            attempted_single_choice: record.attempted_single_choice,
            attempted_choices: record.attempted_choices,
            attempted_short_answer: record.attempted_short_answer,
            is_correct: record.is_correct,
            snippet_id: record.snippet_id,
        }
    }
}

impl Question {
    /// Wire form of the decoded choices, for payloads that send them back.
    pub fn encoded_choices(&self) -> String {
        encode_choices(&self.choices)
    }
}
