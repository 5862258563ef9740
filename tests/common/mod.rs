#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use masteryapp_client::{ApiClient, AppStores, Config};

pub const DELIM: &str = ";;/;;";

/// In-memory stand-in for the course/quiz backend. Entities are stored as
/// raw JSON so tests can assert on exactly what went over the wire.
#[derive(Default)]
pub struct MockDb {
    pub logged_in: bool,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub courses: Vec<Value>,
    pub materials: Vec<Value>,
    pub subjects: Vec<Value>,
    pub snippets: Vec<Value>,
    pub quizzes: Vec<Value>,
    pub questions: Vec<Value>,
    /// (file_name, byte length) per multipart upload received.
    pub uploads: Vec<(String, usize)>,
    pub submit_calls: usize,
    /// Artificial latency before a submit is processed.
    pub submit_delay: Option<Duration>,
    /// When set, mutating endpoints answer with this status and an error
    /// body instead of applying anything.
    pub fail_with: Option<u16>,
}

impl MockDb {
    pub fn logged_in() -> Self {
        Self {
            logged_in: true,
            user_id: Some(7),
            username: Some("testuser".to_string()),
            ..Self::default()
        }
    }
}

type Db = Arc<Mutex<MockDb>>;

pub struct TestBackend {
    pub base_url: String,
    pub db: Db,
}

impl TestBackend {
    pub fn stores(&self) -> AppStores {
        let config = Config {
            api_base_url: self.base_url.clone(),
            request_timeout_secs: 5,
        };
        AppStores::new(Arc::new(ApiClient::new(&config).unwrap()))
    }
}

pub async fn spawn_backend() -> TestBackend {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("masteryapp_client=debug")
        .try_init();

    let db: Db = Arc::new(Mutex::new(MockDb::logged_in()));
    let app = router(db.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend {
        base_url: format!("http://{}", addr),
        db,
    }
}

fn router(db: Db) -> Router {
    Router::new()
        .route("/api/status/", get(auth_status))
        .route("/api/signup/", post(signup))
        .route("/api/logout/", post(logout))
        .route("/api/courses/", get(list_courses).post(create_course))
        .route("/api/courses/{id}/", put(update_course).delete(delete_course))
        .route("/api/materials/", get(list_materials).post(create_material))
        .route("/api/materials/{id}/", delete(delete_material))
        .route("/api/subjects/", get(list_subjects))
        .route("/api/snippets/", get(list_snippets))
        .route("/api/questions/", get(list_questions))
        .route("/api/quizzes/", get(list_quizzes).post(create_quiz))
        .route("/api/quizzes/{id}/submit/", patch(submit_quiz))
        .with_state(db)
}

fn forced_failure(db: &MockDb) -> Option<(StatusCode, Json<Value>)> {
    db.fail_with.map(|code| {
        (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({ "error": "forced failure" })),
        )
    })
}

async fn auth_status(State(db): State<Db>) -> Json<Value> {
    let db = db.lock().unwrap();
    Json(json!({
        "logged_in": db.logged_in,
        "user_id": db.user_id,
        "username": db.username,
    }))
}

async fn signup(State(db): State<Db>, Json(_body): Json<Value>) -> (StatusCode, Json<Value>) {
    let db = db.lock().unwrap();
    if let Some(failure) = forced_failure(&db) {
        return failure;
    }
    (StatusCode::CREATED, Json(json!({})))
}

async fn logout(State(db): State<Db>, Json(_body): Json<Value>) -> Json<Value> {
    let mut db = db.lock().unwrap();
    db.logged_in = false;
    Json(json!({}))
}

async fn list_courses(State(db): State<Db>) -> Json<Value> {
    Json(json!({ "courses": db.lock().unwrap().courses }))
}

async fn create_course(State(db): State<Db>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut db = db.lock().unwrap();
    if let Some(failure) = forced_failure(&db) {
        return failure;
    }

    let mut course = body;
    course["id"] = json!(Uuid::new_v4().simple().to_string());
    course["created_at"] = json!(Utc::now().to_rfc3339());
    course["material"] = json!([]);
    db.courses.insert(0, course.clone());
    (StatusCode::CREATED, Json(json!({ "course": course })))
}

async fn update_course(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut db = db.lock().unwrap();
    let course = db
        .courses
        .iter_mut()
        .find(|c| c["id"] == json!(id))
        .ok_or(StatusCode::NOT_FOUND)?;

    if let Some(patch) = body.as_object() {
        for (key, value) in patch {
            course[key] = value.clone();
        }
    }
    Ok(Json(json!({ "course": course.clone() })))
}

async fn delete_course(State(db): State<Db>, Path(id): Path<String>) -> StatusCode {
    let mut db = db.lock().unwrap();
    if db.fail_with.is_some() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let before = db.courses.len();
    db.courses.retain(|c| c["id"] != json!(id));
    if db.courses.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn list_materials(State(db): State<Db>) -> Json<Value> {
    Json(json!({ "class_materials": db.lock().unwrap().materials }))
}

async fn create_material(
    State(db): State<Db>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut metadata: Option<Value> = None;
    let mut course_id: Option<String> = None;
    let mut file: Option<(String, usize)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "material" => {
                let text = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                metadata = Some(serde_json::from_str(&text).map_err(|_| StatusCode::BAD_REQUEST)?);
            }
            "course_id" => {
                course_id = Some(field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                file = Some((file_name, bytes.len()));
            }
            _ => {}
        }
    }

    let metadata = metadata.ok_or(StatusCode::BAD_REQUEST)?;
    let course_id = course_id.ok_or(StatusCode::BAD_REQUEST)?;
    let (file_name, file_len) = file.ok_or(StatusCode::BAD_REQUEST)?;

    let mut db = db.lock().unwrap();
    if let Some(failure) = forced_failure(&db) {
        return Ok(failure);
    }

    let material = json!({
        "id": Uuid::new_v4().simple().to_string(),
        "file_name": metadata["file_name"],
        "custom_name": metadata.get("custom_name").cloned().unwrap_or(Value::Null),
        "course": course_id,
        "weight": metadata.get("weight").cloned().unwrap_or(Value::Null),
        "created_at": Utc::now().to_rfc3339(),
    });
    db.materials.push(material.clone());
    db.uploads.push((file_name, file_len));
    Ok((
        StatusCode::CREATED,
        Json(json!({ "class_material": material })),
    ))
}

async fn delete_material(State(db): State<Db>, Path(id): Path<String>) -> StatusCode {
    let mut db = db.lock().unwrap();
    if db.fail_with.is_some() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let before = db.materials.len();
    db.materials.retain(|m| m["id"] != json!(id));
    if db.materials.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn list_subjects(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let db = db.lock().unwrap();
    let subjects: Vec<Value> = match params.get("course_id") {
        Some(course_id) => db
            .subjects
            .iter()
            .filter(|s| s["course"] == json!(course_id))
            .cloned()
            .collect(),
        None => db.subjects.clone(),
    };
    Json(json!({ "subjects": subjects }))
}

async fn list_snippets(State(db): State<Db>) -> Json<Value> {
    Json(json!({ "material_snippets": db.lock().unwrap().snippets }))
}

async fn list_questions(State(db): State<Db>) -> Json<Value> {
    Json(json!({ "questions": db.lock().unwrap().questions }))
}

async fn list_quizzes(State(db): State<Db>) -> Json<Value> {
    Json(json!({ "quizzes": db.lock().unwrap().quizzes }))
}

async fn create_quiz(State(db): State<Db>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut db = db.lock().unwrap();
    if let Some(failure) = forced_failure(&db) {
        return failure;
    }

    let quiz_id = Uuid::new_v4().simple().to_string();
    let length = body["quiz_length"].as_u64().unwrap_or(5);
    let options = body["options_per_question"].as_u64().unwrap_or(4);

    let quiz = json!({
        "id": quiz_id,
        "user": body.get("user").cloned().unwrap_or(Value::Null),
        "name": body["name"],
        "course": body["course"],
        "subjects": body.get("subjects").cloned().unwrap_or(json!([])),
        "materials": body.get("materials").cloned().unwrap_or(json!([])),
        "completed_at": Value::Null,
        "created_at": Utc::now().to_rfc3339(),
        "optimize_learning": body["subjects"].as_array().map_or(true, |s| s.is_empty()),
        "quiz_length": length,
        "options_per_question": options,
    });

    let mut questions = Vec::new();
    for i in 0..length {
        let choices: Vec<String> = (0..options).map(|j| format!("choice {}", j)).collect();
        questions.push(json!({
            "id": Uuid::new_v4().simple().to_string(),
            "quiz": quiz_id,
            "question": format!("Generated question {}", i + 1),
            "type": "MULTIPLE_CHOICE",
            "choices": choices.join(DELIM),
            "single_correct_choice": 1,
            "correct_choices": Value::Null,
            "correct_short_answer": Value::Null,
            "attempted_single_choice": Value::Null,
            "attempted_choices": Value::Null,
            "attempted_short_answer": Value::Null,
            "is_correct": Value::Null,
            "snippet_id": Value::Null,
        }));
    }

    db.quizzes.insert(0, quiz.clone());
    db.questions.extend(questions.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "quiz": quiz, "questions": questions })),
    )
}

async fn submit_quiz(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let delay = {
        let mut locked = db.lock().unwrap();
        locked.submit_calls += 1;
        locked.submit_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut db = db.lock().unwrap();
    if let Some(failure) = forced_failure(&db) {
        return Err(failure);
    }

    let responses: Vec<(String, u64)> = body["responses"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|r| {
                    Some((
                        r["id"].as_str()?.to_string(),
                        r["single_choice"].as_u64()?,
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    for (question_id, choice) in &responses {
        if let Some(question) = db
            .questions
            .iter_mut()
            .find(|q| q["id"] == json!(question_id) && q["quiz"] == json!(id))
        {
            question["attempted_single_choice"] = json!(choice);
            let correct = question["single_correct_choice"].as_u64() == Some(*choice);
            question["is_correct"] = json!(correct);
        }
    }

    let completed_at = json!(Utc::now().to_rfc3339());
    let quiz = {
        let quiz = db
            .quizzes
            .iter_mut()
            .find(|q| q["id"] == json!(id))
            .ok_or((StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))))?;
        quiz["completed_at"] = completed_at;
        quiz.clone()
    };

    let questions: Vec<Value> = db
        .questions
        .iter()
        .filter(|q| q["quiz"] == json!(id))
        .cloned()
        .collect();

    Ok(Json(json!({ "quiz": quiz, "questions": questions })))
}
