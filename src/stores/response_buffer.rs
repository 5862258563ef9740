use std::sync::Mutex;

use crate::models::quiz::QuizResponse;
use crate::stores::lock;

/// Transient holder of in-progress answer selections, keyed by question
/// id. Filled while a quiz is taken, drained on submit, never persisted.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    responses: Mutex<Vec<QuizResponse>>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn responses(&self) -> Vec<QuizResponse> {
        lock(&self.responses).clone()
    }

    pub fn get(&self, question_id: &str) -> Option<QuizResponse> {
        lock(&self.responses)
            .iter()
            .find(|r| r.id == question_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.responses).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.responses).is_empty()
    }

    /// Record a selection, replacing any earlier choice for the question.
    pub fn select(&self, question_id: impl Into<String>, single_choice: u32) {
        let id = question_id.into();
        let mut responses = lock(&self.responses);
        responses.retain(|r| r.id != id);
        responses.push(QuizResponse { id, single_choice });
    }

    /// Drain the buffer for submission.
    pub fn take_all(&self) -> Vec<QuizResponse> {
        std::mem::take(&mut *lock(&self.responses))
    }

    pub fn clear(&self) {
        lock(&self.responses).clear();
    }
}
