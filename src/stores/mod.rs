use std::sync::{Arc, Mutex, MutexGuard};

use validator::ValidationErrors;

use crate::api::ApiClient;

pub mod auth_store;
pub mod course_store;
pub mod material_store;
pub mod question_store;
pub mod quiz_store;
pub mod response_buffer;
pub mod snippet_store;
pub mod subject_store;

pub use auth_store::AuthStore;
pub use course_store::CourseStore;
pub use material_store::MaterialStore;
pub use question_store::QuestionStore;
pub use quiz_store::QuizStore;
pub use response_buffer::ResponseBuffer;
pub use snippet_store::SnippetStore;
pub use subject_store::SubjectStore;

/// Recover the guard even if a previous holder panicked; store state is
/// plain data and stays usable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Per-store request status: `loading` gates UI affordances while a call
/// is in flight, `error` carries the last user-facing failure message.
#[derive(Debug, Clone, Default)]
pub struct StoreStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct StatusCell {
    inner: Mutex<StoreStatus>,
}

impl StatusCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a request as started, clearing any previous error.
    pub fn begin(&self) {
        let mut status = lock(&self.inner);
        status.loading = true;
        status.error = None;
    }

    /// Like [`begin`](Self::begin), but refuses when a request is already
    /// in flight. Used where a second concurrent call must not reach the
    /// network (quiz submission).
    pub fn try_begin(&self) -> bool {
        let mut status = lock(&self.inner);
        if status.loading {
            return false;
        }
        status.loading = true;
        status.error = None;
        true
    }

    pub fn succeed(&self) {
        lock(&self.inner).loading = false;
    }

    pub fn fail(&self, message: impl Into<String>) {
        let mut status = lock(&self.inner);
        status.loading = false;
        status.error = Some(message.into());
    }

    pub fn snapshot(&self) -> StoreStatus {
        lock(&self.inner).clone()
    }
}

/// Flatten per-field validation errors into one inline message.
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, detail)
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// All stores wired over one shared [`ApiClient`], constructor-injected
/// instead of ambient context singletons.
pub struct AppStores {
    pub auth: Arc<AuthStore>,
    pub courses: Arc<CourseStore>,
    pub materials: Arc<MaterialStore>,
    pub subjects: Arc<SubjectStore>,
    pub snippets: Arc<SnippetStore>,
    pub questions: Arc<QuestionStore>,
    pub quizzes: Arc<QuizStore>,
    pub responses: Arc<ResponseBuffer>,
}

impl AppStores {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let auth = Arc::new(AuthStore::new(api.clone()));
        let materials = Arc::new(MaterialStore::new(api.clone()));
        let questions = Arc::new(QuestionStore::new(api.clone()));
        let courses = Arc::new(CourseStore::new(
            api.clone(),
            auth.clone(),
            materials.clone(),
        ));
        let subjects = Arc::new(SubjectStore::new(api.clone()));
        let snippets = Arc::new(SnippetStore::new(api.clone()));
        let quizzes = Arc::new(QuizStore::new(api, auth.clone(), questions.clone()));
        let responses = Arc::new(ResponseBuffer::new());

        Self {
            auth,
            courses,
            materials,
            subjects,
            snippets,
            questions,
            quizzes,
            responses,
        }
    }

    /// Mount-time refresh: check the session, then pull every resource the
    /// views read from. Failures are swallowed per store; a fresh call is
    /// the only retry.
    pub async fn bootstrap(&self) {
        let state = self.auth.check_status().await;
        if !state.logged_in {
            tracing::info!("Not logged in, skipping data refresh");
            return;
        }

        self.courses.refresh().await;
        self.materials.refresh().await;
        self.subjects.refresh(None).await;
        self.snippets.refresh().await;
        self.questions.refresh().await;
        self.quizzes.refresh().await;
    }
}
