use std::sync::{Arc, Mutex};

use reqwest::multipart::{Form, Part};

use crate::api::ApiClient;
use crate::models::material::{
    ClassMaterial, MaterialEnvelope, MaterialListEnvelope, MaterialMetadata, MaterialUpload,
};
use crate::stores::{lock, StatusCell, StoreStatus};

/// CRUD over uploaded class materials. Creation is a multipart request:
/// JSON metadata field + course id + raw file bytes.
pub struct MaterialStore {
    api: Arc<ApiClient>,
    materials: Mutex<Vec<ClassMaterial>>,
    status: StatusCell,
}

impl MaterialStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            materials: Mutex::new(Vec::new()),
            status: StatusCell::new(),
        }
    }

    pub fn materials(&self) -> Vec<ClassMaterial> {
        lock(&self.materials).clone()
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn get_material(&self, id: &str) -> Option<ClassMaterial> {
        lock(&self.materials).iter().find(|m| m.id == id).cloned()
    }

    pub fn materials_by_course(&self, course_id: &str) -> Vec<ClassMaterial> {
        lock(&self.materials)
            .iter()
            .filter(|m| m.course == course_id)
            .cloned()
            .collect()
    }

    pub async fn refresh(&self) {
        self.status.begin();
        match self
            .api
            .get_json::<MaterialListEnvelope>("/api/materials/", &[])
            .await
        {
            Ok(envelope) => {
                *lock(&self.materials) = envelope.class_materials;
                self.status.succeed();
            }
            Err(e) => {
                tracing::error!("Error fetching materials: {}", e);
                self.status
                    .fail("Failed to fetch materials. Please try again.");
            }
        }
    }

    pub async fn create_material(
        &self,
        upload: MaterialUpload,
        course_id: &str,
    ) -> Option<ClassMaterial> {
        self.status.begin();

        let metadata = MaterialMetadata {
            file_name: &upload.file_name,
            custom_name: upload.custom_name.as_deref(),
            course: course_id,
            weight: upload.weight,
        };
        let metadata_json = match serde_json::to_string(&metadata) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Error serializing material metadata: {}", e);
                self.status
                    .fail("Failed to create material. Please try again.");
                return None;
            }
        };

        let form = Form::new()
            .text("material", metadata_json)
            .text("course_id", course_id.to_string())
            .part("file", Part::bytes(upload.bytes).file_name(upload.file_name));

        match self
            .api
            .post_multipart::<MaterialEnvelope>("/api/materials/", form)
            .await
        {
            Ok(envelope) => {
                let material = envelope.class_material;
                lock(&self.materials).push(material.clone());
                self.status.succeed();
                Some(material)
            }
            Err(e) => {
                tracing::error!("Error creating material: {}", e);
                self.status
                    .fail("Failed to create material. Please try again.");
                None
            }
        }
    }

    pub async fn delete_material(&self, id: &str) -> bool {
        self.status.begin();
        let path = format!("/api/materials/{}/", id);
        match self.api.delete(&path).await {
            Ok(()) => {
                lock(&self.materials).retain(|m| m.id != id);
                self.status.succeed();
                true
            }
            Err(e) => {
                tracing::error!("Error deleting material: {}", e);
                self.status
                    .fail("Failed to delete material. Please try again.");
                false
            }
        }
    }
}
