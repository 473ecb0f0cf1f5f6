use std::sync::LazyLock;

use regex::Regex;

use shared_models::FieldErrors;

static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("mobile pattern compiles"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_mobile(value: &str) -> bool {
    MOBILE_PATTERN.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Collects per-field messages for a form submission.
///
/// Submissions that fail validation never reach the backend; the collected
/// messages travel back to the UI as `AppError::InvalidFields`.
#[derive(Debug, Default)]
pub struct FormValidator {
    errors: FieldErrors,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn reject(&mut self, field: &str, message: &str) {
        // first message per field wins, matching what the form shows
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn require(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.reject(field, message);
        }
        self
    }

    pub fn require_some<T: ?Sized>(&mut self, field: &str, value: Option<&T>, message: &str) -> &mut Self {
        if value.is_none() {
            self.reject(field, message);
        }
        self
    }

    pub fn mobile(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if !is_valid_mobile(value) {
            self.reject(field, message);
        }
        self
    }

    /// Email is optional, but when supplied it has to look like one.
    pub fn optional_email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(email) = value.filter(|e| !e.is_empty()) {
            if !is_valid_email(email) {
                self.reject(field, "Enter a valid email address");
            }
        }
        self
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.reject(field, message);
        }
        self
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
