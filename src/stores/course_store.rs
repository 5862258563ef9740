use std::sync::{Arc, Mutex};

use validator::Validate;

use crate::api::ApiClient;
use crate::models::course::{
    Course, CourseEnvelope, CourseForm, CourseListEnvelope, CoursePatch, NewCourseRequest,
};
use crate::stores::{lock, validation_message, AuthStore, MaterialStore, StatusCell, StoreStatus};

/// CRUD over courses plus the search-filtered view. New-course material
/// uploads are delegated to the material store against the returned id.
pub struct CourseStore {
    api: Arc<ApiClient>,
    auth: Arc<AuthStore>,
    materials: Arc<MaterialStore>,
    courses: Mutex<Vec<Course>>,
    search_term: Mutex<String>,
    status: StatusCell,
}

impl CourseStore {
    pub fn new(api: Arc<ApiClient>, auth: Arc<AuthStore>, materials: Arc<MaterialStore>) -> Self {
        Self {
            api,
            auth,
            materials,
            courses: Mutex::new(Vec::new()),
            search_term: Mutex::new(String::new()),
            status: StatusCell::new(),
        }
    }

    pub fn courses(&self) -> Vec<Course> {
        lock(&self.courses).clone()
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn search_term(&self) -> String {
        lock(&self.search_term).clone()
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        *lock(&self.search_term) = term.into();
    }

    /// Courses whose name or description contains the search term
    /// (case-insensitive), in store order. Recomputed on every call.
    pub fn filtered_courses(&self) -> Vec<Course> {
        let term = self.search_term();
        lock(&self.courses)
            .iter()
            .filter(|c| c.matches_search(&term))
            .cloned()
            .collect()
    }

    pub fn get_course(&self, id: &str) -> Option<Course> {
        lock(&self.courses).iter().find(|c| c.id == id).cloned()
    }

    pub async fn refresh(&self) {
        self.status.begin();
        match self
            .api
            .get_json::<CourseListEnvelope>("/api/courses/", &[])
            .await
        {
            Ok(envelope) => {
                *lock(&self.courses) = envelope.courses;
                self.status.succeed();
            }
            Err(e) => {
                tracing::error!("Error fetching courses: {}", e);
                self.status.fail("Failed to fetch courses. Please try again.");
            }
        }
    }

    /// Create the course, then sequentially upload each pending material
    /// against the new id. Returns `None` on failure; the error is logged
    /// and recorded, never thrown.
    pub async fn add_course(&self, form: CourseForm) -> Option<Course> {
        if let Err(errors) = form.validate() {
            self.status.fail(validation_message(&errors));
            return None;
        }

        self.status.begin();
        let request = NewCourseRequest {
            name: &form.name,
            description: &form.description,
            icon: form.icon.as_deref(),
            image_path: form.image_path.as_deref(),
            user: self.auth.user_id(),
        };

        let mut course = match self
            .api
            .post_json::<CourseEnvelope, _>("/api/courses/", &request)
            .await
        {
            Ok(envelope) => envelope.course,
            Err(e) => {
                tracing::error!("Error creating course: {}", e);
                self.status.fail("Failed to create course. Please try again.");
                return None;
            }
        };

        // Pending uploads go one by one; a failed upload is skipped, the
        // course itself stays created.
        let mut created = course.material.take().unwrap_or_default();
        for upload in form.materials {
            if let Some(material) = self.materials.create_material(upload, &course.id).await {
                created.push(material);
            }
        }
        course.material = Some(created);

        lock(&self.courses).insert(0, course.clone());
        self.status.succeed();
        Some(course)
    }

    pub async fn update_course(&self, id: &str, patch: &CoursePatch) -> Option<Course> {
        self.status.begin();
        let path = format!("/api/courses/{}/", id);
        match self.api.put_json::<CourseEnvelope, _>(&path, patch).await {
            Ok(envelope) => {
                let mut updated = envelope.course;
                let mut courses = lock(&self.courses);
                if let Some(existing) = courses.iter_mut().find(|c| c.id == id) {
                    // The PUT response may omit the material list; keep the
                    // one we already have.
                    if updated.material.is_none() {
                        updated.material = existing.material.take();
                    }
                    *existing = updated.clone();
                }
                drop(courses);
                self.status.succeed();
                Some(updated)
            }
            Err(e) => {
                tracing::error!("Error updating course: {}", e);
                self.status.fail("Failed to update course. Please try again.");
                None
            }
        }
    }

    pub async fn delete_course(&self, id: &str) -> bool {
        self.status.begin();
        let path = format!("/api/courses/{}/", id);
        match self.api.delete(&path).await {
            Ok(()) => {
                lock(&self.courses).retain(|c| c.id != id);
                self.status.succeed();
                true
            }
            Err(e) => {
                tracing::error!("Error deleting course: {}", e);
                self.status.fail("Failed to delete course. Please try again.");
                false
            }
        }
    }

    /// Upload a material for an existing course and mirror it into that
    /// course's material list.
    pub async fn create_material(
        &self,
        upload: crate::models::MaterialUpload,
        course_id: &str,
    ) -> Option<crate::models::ClassMaterial> {
        let material = self.materials.create_material(upload, course_id).await?;
        self.attach_material(&material);
        Some(material)
    }

    /// Delete a material and drop it from its course's material list.
    pub async fn delete_material(&self, id: &str) -> bool {
        if self.materials.delete_material(id).await {
            self.detach_material(id);
            true
        } else {
            false
        }
    }

    /// Attach a freshly created material to its owning course entry.
    pub(crate) fn attach_material(&self, material: &crate::models::ClassMaterial) {
        let mut courses = lock(&self.courses);
        if let Some(course) = courses.iter_mut().find(|c| c.id == material.course) {
            course
                .material
                .get_or_insert_with(Vec::new)
                .push(material.clone());
        }
    }

    /// Drop a deleted material from whichever course held it.
    pub(crate) fn detach_material(&self, material_id: &str) {
        let mut courses = lock(&self.courses);
        for course in courses.iter_mut() {
            if let Some(materials) = course.material.as_mut() {
                materials.retain(|m| m.id != material_id);
            }
        }
    }
}
