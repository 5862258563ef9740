use std::sync::{Arc, Mutex};

use validator::Validate;

use crate::api::ApiClient;
use crate::models::auth::{AuthState, AuthStatusResponse, LoginForm, SignupForm};
use crate::stores::{lock, validation_message, StatusCell, StoreStatus};

/// Tracks the cookie-backed login session. Any failure while checking
/// status reads as logged out; callers redirect accordingly.
pub struct AuthStore {
    api: Arc<ApiClient>,
    state: Mutex<AuthState>,
    status: StatusCell,
}

impl AuthStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: Mutex::new(AuthState::default()),
            status: StatusCell::new(),
        }
    }

    pub fn state(&self) -> AuthState {
        lock(&self.state).clone()
    }

    pub fn logged_in(&self) -> bool {
        lock(&self.state).logged_in
    }

    /// User id as the string form the backend expects in tagged payloads.
    pub fn user_id(&self) -> Option<String> {
        lock(&self.state).user_id.map(|id| id.to_string())
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub async fn check_status(&self) -> AuthState {
        self.status.begin();
        let result = self
            .api
            .get_json::<AuthStatusResponse>("/api/status/", &[])
            .await;

        match result {
            Ok(response) => {
                let state = AuthState {
                    logged_in: response.logged_in,
                    user_id: response.user_id,
                    username: response.username,
                };
                *lock(&self.state) = state.clone();
                self.status.succeed();
                state
            }
            Err(e) => {
                tracing::error!("Error checking auth status: {}", e);
                let state = AuthState::default();
                *lock(&self.state) = state.clone();
                self.status.fail("Failed to check login status.");
                state
            }
        }
    }

    pub async fn signup(&self, form: &SignupForm) -> bool {
        if let Err(errors) = form.validate() {
            self.status.fail(validation_message(&errors));
            return false;
        }

        self.status.begin();
        match self
            .api
            .post_json::<serde_json::Value, _>("/api/signup/", form)
            .await
        {
            Ok(_) => {
                self.status.succeed();
                true
            }
            Err(e) => {
                tracing::error!("Error signing up: {}", e);
                self.status.fail("Failed to sign up. Please try again.");
                false
            }
        }
    }

    pub async fn login(&self, form: &LoginForm) -> bool {
        if let Err(errors) = form.validate() {
            self.status.fail(validation_message(&errors));
            return false;
        }

        self.status.begin();
        match self
            .api
            .post_json::<serde_json::Value, _>("/api/login/", form)
            .await
        {
            Ok(_) => {
                self.status.succeed();
                // Session cookie is set by the server; pull the fresh state.
                self.check_status().await;
                true
            }
            Err(e) => {
                tracing::error!("Error logging in: {}", e);
                self.status.fail("Invalid username or password.");
                false
            }
        }
    }

    pub async fn logout(&self) -> bool {
        self.status.begin();
        match self
            .api
            .post_json::<serde_json::Value, _>("/api/logout/", &serde_json::json!({}))
            .await
        {
            Ok(_) => {
                *lock(&self.state) = AuthState::default();
                self.status.succeed();
                true
            }
            Err(e) => {
                tracing::error!("Error logging out: {}", e);
                self.status.fail("Failed to log out. Please try again.");
                false
            }
        }
    }
}
