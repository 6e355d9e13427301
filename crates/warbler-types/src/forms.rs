//! Declarative form validation for user-submitted payloads.
//!
//! Each form is the deserialized request body plus a `validate` method that
//! checks every field independently and reports all violations at once — a
//! form either fully validates or is rejected with the complete list of
//! failing fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{MAX_MESSAGE_LEN, MIN_PASSWORD_LEN};

/// Per-field validation errors, field name → messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors {
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl FormErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Form for adding messages.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageForm {
    pub text: String,
}

impl MessageForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_message_text(&self.text, &mut errors);
        errors.into_result()
    }
}

/// Form for adding users.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAddForm {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl UserAddForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_required("username", &self.username, &mut errors);
        check_email(&self.email, &mut errors);
        check_password_length(&self.password, &mut errors);
        errors.into_result()
    }
}

/// Login form.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_required("username", &self.username, &mut errors);
        check_password_length(&self.password, &mut errors);
        errors.into_result()
    }
}

/// Form for editing users. `password` is the current password, re-confirming
/// identity before any edit applies.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserEditForm {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub header_image_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub password: String,
}

impl UserEditForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_required("username", &self.username, &mut errors);
        check_email(&self.email, &mut errors);
        check_required("password", &self.password, &mut errors);
        errors.into_result()
    }
}

fn check_required(field: &'static str, value: &str, errors: &mut FormErrors) {
    if value.trim().is_empty() {
        errors.push(field, "This field is required.");
    }
}

fn check_message_text(text: &str, errors: &mut FormErrors) {
    if text.trim().is_empty() {
        errors.push("text", "This field is required.");
    } else if text.chars().count() > MAX_MESSAGE_LEN {
        errors.push(
            "text",
            format!("Must be at most {MAX_MESSAGE_LEN} characters."),
        );
    }
}

fn check_email(email: &str, errors: &mut FormErrors) {
    if email.trim().is_empty() {
        errors.push("email", "This field is required.");
    } else if !looks_like_email(email) {
        errors.push("email", "Invalid email address.");
    }
}

fn check_password_length(password: &str, errors: &mut FormErrors) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("Must be at least {MIN_PASSWORD_LEN} characters."),
        );
    }
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain.
fn looks_like_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.len() >= 3
}
