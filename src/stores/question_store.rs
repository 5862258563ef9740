use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::api::ApiClient;
use crate::models::question::{Question, QuestionRecord};
use crate::stores::{lock, StatusCell, StoreStatus};

#[derive(Debug, Deserialize)]
struct QuestionListEnvelope {
    questions: Vec<QuestionRecord>,
}

/// In-memory question cache. Questions arrive as a side effect of quiz
/// creation/submission; [`update_questions`](Self::update_questions) is the
/// sole mutation path.
pub struct QuestionStore {
    api: Arc<ApiClient>,
    questions: Mutex<Vec<Question>>,
    status: StatusCell,
}

impl QuestionStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            questions: Mutex::new(Vec::new()),
            status: StatusCell::new(),
        }
    }

    pub fn questions(&self) -> Vec<Question> {
        lock(&self.questions).clone()
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn get_question(&self, id: &str) -> Option<Question> {
        lock(&self.questions).iter().find(|q| q.id == id).cloned()
    }

    pub fn questions_for_quiz(&self, quiz_id: &str) -> Vec<Question> {
        lock(&self.questions)
            .iter()
            .filter(|q| q.quiz == quiz_id)
            .cloned()
            .collect()
    }

    /// Upsert by id: drop any existing entry whose id appears in the
    /// incoming batch, then append the batch.
    pub fn update_questions(&self, incoming: Vec<Question>) {
        let mut questions = lock(&self.questions);
        questions.retain(|existing| !incoming.iter().any(|q| q.id == existing.id));
        questions.extend(incoming);
    }

    pub async fn refresh(&self) {
        self.status.begin();
        match self
            .api
            .get_json::<QuestionListEnvelope>("/api/questions/", &[])
            .await
        {
            Ok(envelope) => {
                *lock(&self.questions) = envelope
                    .questions
                    .into_iter()
                    .map(Question::from)
                    .collect();
                self.status.succeed();
            }
            Err(e) => {
                tracing::error!("Error fetching questions: {}", e);
                self.status
                    .fail("Failed to fetch questions. Please try again.");
            }
        }
    }
}
