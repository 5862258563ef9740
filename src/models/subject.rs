use serde::{Deserialize, Serialize};

/// Topic within a course. `mastery` (0-100) is computed server-side from
/// past quiz performance; the client never writes subjects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub course: String,
    pub mastery: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubjectListEnvelope {
    pub subjects: Vec<Subject>,
}
