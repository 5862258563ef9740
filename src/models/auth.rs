use serde::{Deserialize, Serialize};
use validator::Validate;

/// Local view of the login session, refreshed from `GET /api/status/`.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub logged_in: bool,
    pub user_id: Option<i64>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthStatusResponse {
    pub logged_in: bool,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 3, max = 150, message = "username must be 3-150 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}
