//! Registration screen.

use serde_json::Value;
use tracing::{error, info};

use crate::api::NotifyApi;
use crate::error::NotifyError;
use crate::models::{Photo, RegisterRequest};
use crate::routes::Route;
use crate::session::SessionStore;
use crate::validation::{validate_photo, RegisterForm, ValidationErrors};

pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

/// State of the registration screen.
#[derive(Debug, Clone, Default)]
pub struct RegisterView {
    pub form: RegisterForm,
    photo: Option<Photo>,
    field_errors: ValidationErrors,
    loading: bool,
    error: Option<String>,
    success: Option<String>,
}

impl RegisterView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a profile photo. A rejected photo sets the error message
    /// and leaves any previous choice in place.
    pub fn select_photo(&mut self, photo: Photo) -> bool {
        match validate_photo(&photo) {
            Ok(()) => {
                self.photo = Some(photo);
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn remove_photo(&mut self) {
        self.photo = None;
    }

    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    /// Build the request payload. Permission flags are only sent when an
    /// administrator is creating the account.
    pub fn build_request(&self, as_admin: bool) -> RegisterRequest {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let form = &self.form;

        RegisterRequest {
            username: form.username.clone(),
            password: form.password.clone(),
            email: non_empty(&form.email),
            first_name: non_empty(&form.first_name),
            last_name: non_empty(&form.last_name),
            bio: non_empty(&form.bio),
            photo: self.photo.clone(),
            notify_by_email: Some(form.notify_by_email),
            notify_recommendations: Some(form.notify_recommendations),
            notify_general: Some(form.notify_general),
            is_staff: as_admin.then_some(form.is_staff),
            is_superuser: as_admin.then_some(form.is_superuser),
        }
    }

    /// Validate and submit. On success the new account becomes the
    /// current session and the home route is returned.
    pub async fn submit(&mut self, api: &NotifyApi, session: &mut SessionStore) -> Option<Route> {
        self.field_errors = ValidationErrors::default();
        if let Err(errors) = self.form.validate() {
            self.field_errors = errors;
            return None;
        }

        self.loading = true;
        self.error = None;
        self.success = None;

        let request = self.build_request(session.is_admin());
        let result = api.register(&request).await;
        self.loading = false;

        match result {
            Ok(response) => {
                self.success = Some(format!(
                    "Account created successfully! Welcome, {}!",
                    response.username
                ));
                if let Err(e) = session.set_user(&response.token, response.user()) {
                    error!("Could not save session: {}", e);
                    self.error = Some(format!("Could not save session: {}", e));
                    return None;
                }
                info!("Registered {}", response.username);
                Some(Route::Search)
            }
            Err(e) => {
                error!("Registration failed: {}", e);
                self.error = Some(register_error_message(&e));
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

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }
}

/// Message shown for a failed registration. Field errors from the
/// backend come back as `{field: [messages]}` and render one line per
/// field.
pub fn register_error_message(err: &NotifyError) -> String {
    match err.body() {
        Some(Value::Object(fields)) if !fields.is_empty() => fields
            .iter()
            .map(|(key, value)| {
                let messages: Vec<String> = match value {
                    Value::Array(items) => items.iter().map(value_text).collect(),
                    other => vec![value_text(other)],
                };
                format!("{}: {}", key, messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => REGISTRATION_FAILED.to_string(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
