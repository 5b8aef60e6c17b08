//! Form checks run before anything is sent to the service.

use std::fmt;

use crate::api::RegisterForm;

pub const COMMENT_MIN_CHARS: usize = 5;
pub const COMMENT_MAX_CHARS: usize = 100;
pub const PASSWORD_MIN_CHARS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// One or more fields failed validation. Shown inline, never sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError {
            fields: vec![FieldError {
                field,
                message: message.into(),
            }],
        }
    }

    /// Message for `field`, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<(), ValidationError> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        write!(f, "invalid input ({})", parts.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Trimmed comment body, 5 to 100 characters.
pub fn validate_comment(content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    let chars = trimmed.chars().count();
    if chars < COMMENT_MIN_CHARS {
        return Err(ValidationError::single(
            "content",
            format!("Comment must be at least {} characters", COMMENT_MIN_CHARS),
        ));
    }
    if chars > COMMENT_MAX_CHARS {
        return Err(ValidationError::single(
            "content",
            format!("Comment must be at most {} characters", COMMENT_MAX_CHARS),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    if email.trim().is_empty() {
        errors.push("email", "Email is required");
    }
    if password.is_empty() {
        errors.push("password", "Password is required");
    }
    errors.into_result()
}

pub fn validate_register(form: &RegisterForm) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();

    let required = [
        ("firstName", &form.first_name, "First name is required"),
        ("lastName", &form.last_name, "Last name is required"),
        ("phone", &form.phone, "Phone number is required"),
        ("address", &form.address, "Address is required"),
    ];
    for (field, value, message) in required {
        if value.trim().is_empty() {
            errors.push(field, message);
        }
    }

    if form.email.trim().is_empty() {
        errors.push("email", "Email is required");
    } else if !looks_like_email(form.email.trim()) {
        errors.push("email", "Email address is invalid");
    }

    if form.password.chars().count() < PASSWORD_MIN_CHARS {
        errors.push(
            "password",
            format!("Password must be at least {} characters", PASSWORD_MIN_CHARS),
        );
    }

    errors.into_result()
}

fn looks_like_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !email.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        _ => false,
    }
}
