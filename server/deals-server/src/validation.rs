//! Form validation utilities.
//!
//! Validation for the HTML form accumulates every broken field into a
//! [`FieldErrors`] map instead of failing fast, so a re-rendered form
//! can show all problems at once.

use std::collections::HashMap;

/// Per-field validation errors, keyed by form field name.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    errors: HashMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Record an error message against a field.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// True when no field has errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when the given field has no errors so far.
    pub fn is_clean(&self, field: &str) -> bool {
        !self.errors.contains_key(field)
    }

    /// Messages recorded for one field, in insertion order.
    pub fn for_field(&self, field: &str) -> Vec<String> {
        self.errors.get(field).cloned().unwrap_or_default()
    }

    /// Consume into the raw field -> messages map.
    pub fn into_map(self) -> HashMap<String, Vec<String>> {
        self.errors
    }
}

/// Record an error when a string field is empty after trimming.
///
/// # Usage
///
/// ```ignore
/// require_field!(errors, "title", self.title, "Title is required");
/// ```
#[macro_export]
macro_rules! require_field {
    ($errors:expr, $name:expr, $value:expr, $message:expr) => {
        if $value.trim().is_empty() {
            $errors.push($name, $message);
        }
    };
}

/// Record an error when a predicate does not hold.
///
/// # Usage
///
/// ```ignore
/// check_field!(errors, "slug", slug.len() <= 50, "Slug is too long");
/// ```
#[macro_export]
macro_rules! check_field {
    ($errors:expr, $name:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            $errors.push($name, $message);
        }
    };
}
