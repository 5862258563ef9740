use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMaterial {
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub custom_name: Option<String>,
    pub course: String,
    #[serde(default)]
    pub weight: Option<i32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A file selected for upload, not yet sent to the backend. The metadata
/// travels as a JSON form field next to the raw bytes.
#[derive(Debug, Clone)]
pub struct MaterialUpload {
    pub file_name: String,
    pub custom_name: Option<String>,
    pub weight: Option<i32>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MaterialMetadata<'a> {
    pub file_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<&'a str>,
    pub course: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MaterialEnvelope {
    pub class_material: ClassMaterial,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MaterialListEnvelope {
    pub class_materials: Vec<ClassMaterial>,
}
