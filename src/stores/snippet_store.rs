use std::sync::{Arc, Mutex};

use crate::api::ApiClient;
use crate::models::snippet::{MaterialSnippet, SnippetListEnvelope};
use crate::stores::{lock, StatusCell, StoreStatus};

/// Read-only lookup of material snippets, the citation evidence behind
/// generated questions.
pub struct SnippetStore {
    api: Arc<ApiClient>,
    snippets: Mutex<Vec<MaterialSnippet>>,
    status: StatusCell,
}

impl SnippetStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            snippets: Mutex::new(Vec::new()),
            status: StatusCell::new(),
        }
    }

    pub fn snippets(&self) -> Vec<MaterialSnippet> {
        lock(&self.snippets).clone()
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn get_snippet(&self, id: &str) -> Option<MaterialSnippet> {
        lock(&self.snippets).iter().find(|s| s.id == id).cloned()
    }

    pub fn snippets_by_material(&self, material_id: &str) -> Vec<MaterialSnippet> {
        lock(&self.snippets)
            .iter()
            .filter(|s| s.class_material == material_id)
            .cloned()
            .collect()
    }

    pub fn snippets_by_subject(&self, subject_id: &str) -> Vec<MaterialSnippet> {
        lock(&self.snippets)
            .iter()
            .filter(|s| s.subject.as_deref() == Some(subject_id))
            .cloned()
            .collect()
    }

    pub async fn refresh(&self) {
        self.status.begin();
        match self
            .api
            .get_json::<SnippetListEnvelope>("/api/snippets/", &[])
            .await
        {
            Ok(envelope) => {
                *lock(&self.snippets) = envelope.material_snippets;
                self.status.succeed();
            }
            Err(e) => {
                tracing::error!("Error fetching material snippets: {}", e);
                self.status
                    .fail("Failed to fetch material snippets. Please try again.");
            }
        }
    }
}
