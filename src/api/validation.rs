//! Request field checks that collect every problem before failing.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::ApiError;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed value of a required text field; blank counts as missing.
    pub fn required(&mut self, field: &str, value: Option<&str>) -> String {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                self.add(field, "This field is required");
                String::new()
            }
        }
    }

    /// Like [`FieldErrors::required`] but returns the value untrimmed.
    pub fn secret(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.add(field, "This field is required");
                String::new()
            }
        }
    }

    /// A `YYYY-MM-DD` calendar date.
    pub fn date(&mut self, field: &str, value: Option<&str>) -> Option<NaiveDate> {
        let raw = self.required(field, value);
        if raw.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.add(field, "Expected a date in YYYY-MM-DD format");
                None
            }
        }
    }

    /// An integer rating in range; numeric strings such as `"4"` are accepted.
    pub fn rating(&mut self, field: &str, value: Option<&Value>) -> i32 {
        let parsed = match value {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(n.as_i64()),
            Some(Value::String(s)) => Some(s.trim().parse::<i64>().ok()),
            Some(_) => Some(None),
        };
        match parsed {
            Some(Some(v)) if (MIN_RATING as i64..=MAX_RATING as i64).contains(&v) => v as i32,
            Some(_) => {
                self.add(
                    field,
                    &format!("Must be an integer between {} and {}", MIN_RATING, MAX_RATING),
                );
                0
            }
            None => {
                self.add(field, "This field is required");
                0
            }
        }
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error
    /// listing every field.
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let message = if self.errors.values().all(|m| m == "This field is required") {
            "Missing required fields"
        } else {
            "Invalid field values"
        };
        Err(ApiError::validation_error(message, Some(self.errors)))
    }
}
