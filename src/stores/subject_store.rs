use std::sync::{Arc, Mutex};

use crate::api::ApiClient;
use crate::models::subject::{Subject, SubjectListEnvelope};
use crate::stores::{lock, StatusCell, StoreStatus};

/// Read-only subject list. Mastery is server-computed; the client only
/// refreshes and filters.
pub struct SubjectStore {
    api: Arc<ApiClient>,
    subjects: Mutex<Vec<Subject>>,
    status: StatusCell,
}

impl SubjectStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            subjects: Mutex::new(Vec::new()),
            status: StatusCell::new(),
        }
    }

    pub fn subjects(&self) -> Vec<Subject> {
        lock(&self.subjects).clone()
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn get_subject(&self, id: &str) -> Option<Subject> {
        lock(&self.subjects).iter().find(|s| s.id == id).cloned()
    }

    pub fn subjects_by_course(&self, course_id: &str) -> Vec<Subject> {
        lock(&self.subjects)
            .iter()
            .filter(|s| s.course == course_id)
            .cloned()
            .collect()
    }

    /// Refresh, optionally scoped server-side to one course.
    pub async fn refresh(&self, course_id: Option<&str>) {
        self.status.begin();
        let query: Vec<(&str, &str)> = match course_id {
            Some(id) => vec![("course_id", id)],
            None => Vec::new(),
        };

        match self
            .api
            .get_json::<SubjectListEnvelope>("/api/subjects/", &query)
            .await
        {
            Ok(envelope) => {
                *lock(&self.subjects) = envelope.subjects;
                self.status.succeed();
            }
            Err(e) => {
                tracing::error!("Error fetching subjects: {}", e);
                self.status.fail("Failed to fetch subjects. Please try again.");
            }
        }
    }
}
