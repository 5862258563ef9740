use std::sync::{Arc, Mutex};

use validator::Validate;

use crate::api::ApiClient;
use crate::models::question::Question;
use crate::models::quiz::{
    NewQuizRequest, Quiz, QuizConfigForm, QuizListEnvelope, QuizResponse, QuizWithQuestionsEnvelope,
    SubmitQuizRequest,
};
use crate::stores::{lock, validation_message, AuthStore, QuestionStore, StatusCell, StoreStatus};

/// Quiz CRUD. Creation and submission both return the quiz together with
/// its question set; the wire-encoded choice strings are decoded here and
/// pushed into the question store.
pub struct QuizStore {
    api: Arc<ApiClient>,
    auth: Arc<AuthStore>,
    questions: Arc<QuestionStore>,
    quizzes: Mutex<Vec<Quiz>>,
    current: Mutex<Option<Quiz>>,
    status: StatusCell,
}

impl QuizStore {
    pub fn new(api: Arc<ApiClient>, auth: Arc<AuthStore>, questions: Arc<QuestionStore>) -> Self {
        Self {
            api,
            auth,
            questions,
            quizzes: Mutex::new(Vec::new()),
            current: Mutex::new(None),
            status: StatusCell::new(),
        }
    }

    pub fn quizzes(&self) -> Vec<Quiz> {
        lock(&self.quizzes).clone()
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn get_quiz(&self, id: &str) -> Option<Quiz> {
        lock(&self.quizzes).iter().find(|q| q.id == id).cloned()
    }

    pub fn current_quiz(&self) -> Option<Quiz> {
        lock(&self.current).clone()
    }

    pub fn set_current_quiz(&self, quiz: Option<Quiz>) {
        *lock(&self.current) = quiz;
    }

    /// Quizzes not yet submitted.
    pub fn open_quizzes(&self) -> Vec<Quiz> {
        lock(&self.quizzes)
            .iter()
            .filter(|q| q.is_open())
            .cloned()
            .collect()
    }

    pub async fn refresh(&self) {
        self.status.begin();
        match self
            .api
            .get_json::<QuizListEnvelope>("/api/quizzes/", &[])
            .await
        {
            Ok(envelope) => {
                *lock(&self.quizzes) = envelope.quizzes;
                self.status.succeed();
            }
            Err(e) => {
                tracing::error!("Error fetching quizzes: {}", e);
                self.status.fail("Failed to fetch quizzes. Please try again.");
            }
        }
    }

    /// Generate a quiz. The server creates the questions alongside; they
    /// land in the question store and the new quiz becomes current.
    pub async fn create_quiz(&self, config: &QuizConfigForm) -> Option<Quiz> {
        if let Err(errors) = config.validate() {
            self.status.fail(validation_message(&errors));
            return None;
        }

        self.status.begin();
        let request = NewQuizRequest {
            name: &config.name,
            course: &config.course,
            subjects: &config.subjects,
            materials: &config.materials,
            quiz_length: config.quiz_length,
            options_per_question: config.options_per_question,
            user: self.auth.user_id(),
        };

        match self
            .api
            .post_json::<QuizWithQuestionsEnvelope, _>("/api/quizzes/", &request)
            .await
        {
            Ok(envelope) => {
                let quiz = envelope.quiz;
                self.merge_questions(envelope.questions);
                *lock(&self.current) = Some(quiz.clone());
                lock(&self.quizzes).insert(0, quiz.clone());
                self.status.succeed();
                Some(quiz)
            }
            Err(e) => {
                tracing::error!("Error creating quiz: {}", e);
                self.status.fail("Failed to create quiz. Please try again.");
                None
            }
        }
    }

    /// Submit the buffered responses atomically. The response carries the
    /// completed quiz and the same questions with grading fields set.
    ///
    /// A submit while another request is already in flight on this store
    /// is refused locally without touching the network.
    pub async fn submit_quiz(&self, id: &str, responses: &[QuizResponse]) -> Option<Quiz> {
        if !self.status.try_begin() {
            tracing::warn!("Ignoring quiz submit for {}: request already in flight", id);
            return None;
        }

        let path = format!("/api/quizzes/{}/submit/", id);
        let request = SubmitQuizRequest { responses };

        match self
            .api
            .patch_json::<QuizWithQuestionsEnvelope, _>(&path, &request)
            .await
        {
            Ok(envelope) => {
                let quiz = envelope.quiz;
                self.merge_questions(envelope.questions);

                let mut quizzes = lock(&self.quizzes);
                if let Some(existing) = quizzes.iter_mut().find(|q| q.id == quiz.id) {
                    *existing = quiz.clone();
                } else {
                    quizzes.insert(0, quiz.clone());
                }
                drop(quizzes);

                // The attempt is over either way.
                let mut current = lock(&self.current);
                if current.as_ref().is_some_and(|c| c.id == quiz.id) {
                    *current = None;
                }
                drop(current);

                self.status.succeed();
                Some(quiz)
            }
            Err(e) => {
                tracing::error!("Error submitting quiz: {}", e);
                self.status.fail("Failed to submit quiz. Please try again.");
                None
            }
        }
    }

    fn merge_questions(&self, records: Vec<crate::models::question::QuestionRecord>) {
        let decoded: Vec<Question> = records.into_iter().map(Question::from).collect();
        self.questions.update_questions(decoded);
    }
}
