//! Declarative required-field checks, run before each mutating handler.
//!
//! Handlers declare their rules against the deserialized body, then call
//! [`Validator::finish`], which short-circuits with a 400 listing every
//! failing field at once.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub param: &'static str,
    pub msg: &'static str,
}

impl FieldError {
    pub fn new(param: &'static str, msg: &'static str) -> Self {
        Self { param, msg }
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required non-empty string. Returns the trimmed value, or an empty
    /// placeholder that is never used once `finish` has failed.
    pub fn required(&mut self, param: &'static str, value: Option<String>, msg: &'static str) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => {
                self.errors.push(FieldError::new(param, msg));
                String::new()
            }
        }
    }

    /// Required date. Records the failure when absent and hands the value
    /// back unchanged; `finish` guarantees it is present afterwards.
    pub fn required_date(
        &mut self,
        param: &'static str,
        value: Option<NaiveDate>,
        msg: &'static str,
    ) -> Option<NaiveDate> {
        if value.is_none() {
            self.errors.push(FieldError::new(param, msg));
        }
        value
    }

    /// Required string that looks like an email address.
    pub fn required_email(
        &mut self,
        param: &'static str,
        value: Option<String>,
        msg: &'static str,
    ) -> String {
        match value {
            Some(v) if looks_like_email(v.trim()) => v.trim().to_string(),
            _ => {
                self.errors.push(FieldError::new(param, msg));
                String::new()
            }
        }
    }

    /// Required string of at least `min` characters. Not trimmed: whitespace
    /// is legal in passwords.
    pub fn required_min_len(
        &mut self,
        param: &'static str,
        value: Option<String>,
        min: usize,
        msg: &'static str,
    ) -> String {
        match value {
            Some(v) if v.chars().count() >= min => v,
            _ => {
                self.errors.push(FieldError::new(param, msg));
                String::new()
            }
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Normalize a comma-separated skills string into a trimmed ordered list.
/// `"a, b,c"` becomes `["a", "b", "c"]`; empty segments are dropped.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
