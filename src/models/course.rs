use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::material::{ClassMaterial, MaterialUpload};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub user: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub material: Option<Vec<ClassMaterial>>,
}

impl Course {
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

/// Form input for creating a course. Pending material uploads ride along
/// and are created one by one against the new course id.
#[derive(Debug, Clone, Default, Validate)]
pub struct CourseForm {
    #[validate(length(min = 1, max = 1000, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 5000, message = "description is too long"))]
    pub description: String,
    pub icon: Option<String>,
    pub image_path: Option<String>,
    pub materials: Vec<MaterialUpload>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewCourseRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Partial update; only set fields are serialized into the PUT body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoursePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseEnvelope {
    pub course: Course,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseListEnvelope {
    pub courses: Vec<Course>,
}
