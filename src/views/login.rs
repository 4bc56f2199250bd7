//! Login screen.

use serde_json::Value;
use tracing::{error, info};

use crate::api::NotifyApi;
use crate::error::NotifyError;
use crate::routes::Route;
use crate::session::SessionStore;
use crate::validation::{LoginForm, ValidationErrors};

/// State of the login screen.
#[derive(Debug, Clone, Default)]
pub struct LoginView {
    pub form: LoginForm,
    field_errors: ValidationErrors,
    loading: bool,
    error: Option<String>,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and submit the form. Returns the route to navigate to on
    /// success; on failure the field errors or error message are set.
    pub async fn submit(&mut self, api: &NotifyApi, session: &mut SessionStore) -> Option<Route> {
        self.field_errors = ValidationErrors::default();
        if let Err(errors) = self.form.validate() {
            self.field_errors = errors;
            return None;
        }

        self.loading = true;
        self.error = None;

        let result = api.login(&self.form.to_request()).await;
        self.loading = false;

        match result {
            Ok(response) => {
                let user = response.user();
                if let Err(e) = session.set_user(&response.token, user) {
                    error!("Could not save session: {}", e);
                    self.error = Some(format!("Could not save session: {}", e));
                    return None;
                }
                info!("Logged in as {}", response.username);
                Some(Route::Search)
            }
            Err(e) => {
                error!("Login failed: {}", e);
                self.error = Some(login_error_message(&e));
                None
            }
        }
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Message shown for a failed login.
///
/// The response body wins over the status code: `non_field_errors` are
/// shown verbatim, a plain-text body is shown as-is.
pub fn login_error_message(err: &NotifyError) -> String {
    if err.is_unreachable() {
        return "Cannot connect to the server.".to_string();
    }
    match err.body() {
        Some(Value::Object(fields)) => match fields.get("non_field_errors") {
            Some(Value::Array(messages)) => messages
                .iter()
                .map(|m| m.as_str().map_or_else(|| m.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join(", "),
            Some(Value::String(message)) => message.clone(),
            _ => "Invalid username or password".to_string(),
        },
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(_) => "Login failed. Please try again.".to_string(),
        None => "Login failed. Please check your credentials and try again.".to_string(),
    }
}
