//! Client-side form validation for the login and registration forms.
//!
//! Each field reports at most one error, checked in the order required,
//! minimum length, maximum length, email format, password match.

use thiserror::Error;
use validator::ValidateEmail;

use crate::models::{LoginRequest, Photo};

/// Largest accepted profile photo, in bytes.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 150;
pub const PASSWORD_MIN: usize = 8;
pub const NAME_MAX: usize = 150;
pub const BIO_MAX: usize = 500;

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Email,
    PasswordMismatch,
}

impl FieldError {
    /// Message shown next to `field`.
    pub fn message(&self, field: &str) -> String {
        match self {
            FieldError::Required => format!("{} is required", field),
            FieldError::MinLength(n) => format!("{} must be at least {} characters", field, n),
            FieldError::MaxLength(n) => format!("{} must be less than {} characters", field, n),
            FieldError::Email => "Please enter a valid email address".to_string(),
            FieldError::PasswordMismatch => "Passwords do not match".to_string(),
        }
    }
}

/// All field errors of a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join_messages(.errors))]
pub struct ValidationErrors {
    errors: Vec<(&'static str, FieldError)>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Error for one field, if it has one.
    pub fn get(&self, field: &str) -> Option<FieldError> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, e)| *e)
    }

    /// Display message for one field, empty when the field is valid.
    pub fn message_for(&self, field: &str) -> String {
        self.get(field)
            .map(|e| e.message(field))
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FieldError)> + '_ {
        self.errors.iter().copied()
    }

    fn check(&mut self, field: &'static str, result: Option<FieldError>) {
        if let Some(err) = result {
            self.errors.push((field, err));
        }
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn join_messages(errors: &[(&'static str, FieldError)]) -> String {
    errors
        .iter()
        .map(|(name, e)| e.message(name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check a field against required/min/max rules.
fn text_rule(value: &str, required: bool, min: Option<usize>, max: Option<usize>) -> Option<FieldError> {
    if value.is_empty() {
        return required.then_some(FieldError::Required);
    }
    let len = value.chars().count();
    if let Some(min) = min.filter(|m| len < *m) {
        return Some(FieldError::MinLength(min));
    }
    if let Some(max) = max.filter(|m| len > *m) {
        return Some(FieldError::MaxLength(max));
    }
    None
}

/// The login form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check(
            "username",
            text_rule(&self.username, true, Some(USERNAME_MIN), None),
        );
        errors.check(
            "password",
            text_rule(&self.password, true, Some(PASSWORD_MIN), None),
        );
        errors.into_result()
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// The registration form. Notification flags start enabled.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub notify_by_email: bool,
    pub notify_recommendations: bool,
    pub notify_general: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            notify_by_email: true,
            notify_recommendations: true,
            notify_general: true,
            is_staff: false,
            is_superuser: false,
        }
    }
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check(
            "username",
            text_rule(&self.username, true, Some(USERNAME_MIN), Some(USERNAME_MAX)),
        );
        errors.check(
            "password",
            text_rule(&self.password, true, Some(PASSWORD_MIN), None),
        );

        let confirm = if self.confirm_password.is_empty() {
            Some(FieldError::Required)
        } else if self.confirm_password != self.password {
            Some(FieldError::PasswordMismatch)
        } else {
            None
        };
        errors.check("confirmPassword", confirm);

        if !self.email.is_empty() && !self.email.validate_email() {
            errors.check("email", Some(FieldError::Email));
        }
        errors.check(
            "first_name",
            text_rule(&self.first_name, false, None, Some(NAME_MAX)),
        );
        errors.check(
            "last_name",
            text_rule(&self.last_name, false, None, Some(NAME_MAX)),
        );
        errors.check("bio", text_rule(&self.bio, false, None, Some(BIO_MAX)));
        errors.into_result()
    }
}

/// Why a chosen photo was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhotoError {
    #[error("Please select an image file")]
    NotAnImage,
    #[error("Image size must be less than 5MB")]
    TooLarge,
}

/// Accept only images up to [`MAX_PHOTO_BYTES`].
pub fn validate_photo(photo: &Photo) -> Result<(), PhotoError> {
    if !photo.mime_type.starts_with("image/") {
        return Err(PhotoError::NotAnImage);
    }
    if photo.size() > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge);
    }
    Ok(())
}
