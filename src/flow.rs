use std::time::{Duration, Instant};

use thiserror::Error;

use crate::models::question::Question;
use crate::models::quiz::Quiz;
use crate::stores::{QuestionStore, QuizStore, ResponseBuffer};

/// Fixed duration of the visual transition between questions. The flow
/// itself does not sleep; the view layer does.
pub const QUESTION_TRANSITION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Loading,
    InProgress,
    BetweenQuestions,
    Submitting,
    Done,
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("no current quiz to take")]
    NoCurrentQuiz,
    #[error("current quiz has no questions")]
    NoQuestions,
    #[error("choice {choice} is out of range for this question")]
    InvalidChoice { choice: u32 },
    #[error("flow is not accepting answers in this state")]
    NotInProgress,
}

/// What the caller should do after an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// More questions remain; play the transition, then
    /// [`finish_transition`](QuizFlow::finish_transition).
    NextQuestion,
    /// That was the last question; call [`submit`](QuizFlow::submit).
    ReadyToSubmit,
}

/// Aggregate of a graded attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub total_questions: usize,
    pub correct_answers: usize,
    /// Seconds from flow start to submission.
    pub time_taken: u64,
}

impl QuizResult {
    pub fn from_questions(questions: &[Question], time_taken: u64) -> Self {
        let correct_answers = questions
            .iter()
            .filter(|q| q.is_correct == Some(true))
            .count();
        Self {
            total_questions: questions.len(),
            correct_answers,
            time_taken,
        }
    }

    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        let ratio = self.correct_answers as f64 / self.total_questions as f64;
        (ratio * 100.0).round() as u32
    }

    pub fn performance_label(&self) -> &'static str {
        match self.percentage() {
            80.. => "Excellent!",
            60..=79 => "Good job!",
            40..=59 => "Keep practicing!",
            _ => "Try again!",
        }
    }
}

/// Single-pass quiz attempt: `loading → in_progress → between_questions →
/// submitting → done`. No skip, no back; all responses are buffered
/// locally and submitted atomically at the end.
pub struct QuizFlow {
    quiz: Quiz,
    questions: Vec<Question>,
    index: usize,
    state: FlowState,
    started_at: Instant,
    result: Option<QuizResult>,
}

impl QuizFlow {
    /// Derive the attempt from the store's current quiz. With no current
    /// quiz the caller is expected to redirect away.
    pub fn start(quizzes: &QuizStore, questions: &QuestionStore) -> Result<Self, FlowError> {
        let quiz = quizzes.current_quiz().ok_or(FlowError::NoCurrentQuiz)?;
        let quiz_questions = questions.questions_for_quiz(&quiz.id);
        if quiz_questions.is_empty() {
            return Err(FlowError::NoQuestions);
        }

        tracing::info!(
            "Starting quiz attempt: quiz={}, questions={}",
            quiz.id,
            quiz_questions.len()
        );

        Ok(Self {
            quiz,
            questions: quiz_questions,
            index: 0,
            state: FlowState::InProgress,
            started_at: Instant::now(),
            result: None,
        })
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// 1-based position for "Question N of M" displays.
    pub fn question_number(&self) -> usize {
        self.index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Buffer the selected choice for the current question. Either enters
    /// the between-question transition or reports the attempt is ready for
    /// submission.
    pub fn answer(&mut self, buffer: &ResponseBuffer, choice: u32) -> Result<Advance, FlowError> {
        if self.state != FlowState::InProgress {
            return Err(FlowError::NotInProgress);
        }
        let question = self
            .current_question()
            .ok_or(FlowError::NotInProgress)?;
        if !question.choices.is_empty() && choice as usize >= question.choices.len() {
            return Err(FlowError::InvalidChoice { choice });
        }

        buffer.select(question.id.clone(), choice);

        if self.index + 1 >= self.questions.len() {
            Ok(Advance::ReadyToSubmit)
        } else {
            self.state = FlowState::BetweenQuestions;
            Ok(Advance::NextQuestion)
        }
    }

    /// End the between-question transition and advance to the next
    /// question. A no-op in any other state.
    pub fn finish_transition(&mut self) {
        if self.state == FlowState::BetweenQuestions {
            self.index += 1;
            self.state = FlowState::InProgress;
        }
    }

    /// Submit the buffered responses and derive the graded result from the
    /// question store. On failure the buffer is restored so the user can
    /// retry manually.
    pub async fn submit(
        &mut self,
        quizzes: &QuizStore,
        questions: &QuestionStore,
        buffer: &ResponseBuffer,
    ) -> Option<QuizResult> {
        self.state = FlowState::Submitting;
        let responses = buffer.take_all();

        match quizzes.submit_quiz(&self.quiz.id, &responses).await {
            Some(quiz) => {
                self.quiz = quiz;
                let graded = questions.questions_for_quiz(&self.quiz.id);
                let result = QuizResult::from_questions(&graded, self.elapsed_secs());
                self.state = FlowState::Done;
                self.result = Some(result.clone());
                Some(result)
            }
            None => {
                // Put the answers back; nothing was applied server-side.
                for response in responses {
                    buffer.select(response.id, response.single_choice);
                }
                self.state = FlowState::InProgress;
                None
            }
        }
    }
}
