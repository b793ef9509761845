//! Input validation for book payloads.
//!
//! The request body arrives as untyped JSON so that every violation can be
//! collected and reported together, rather than failing on the first field
//! a typed deserializer trips over.

use lectern_http::error::{ApiError, FieldErrors};
use lectern_store::NewBook;
use serde_json::{Map, Value};

pub const TITLE_MAX_LEN: usize = 200;
pub const YEAR_MIN: i64 = 1000;
pub const YEAR_MAX: i64 = 2024;

const MSG_MISSING: &str = "Missing data for required field.";
const MSG_NOT_A_STRING: &str = "Not a valid string.";
const MSG_NOT_AN_INTEGER: &str = "Not a valid integer.";
const MSG_LENGTH: &str = "Length must be between 1 and 200.";
const MSG_YEAR_RANGE: &str =
    "Must be greater than or equal to 1000 and less than or equal to 2024.";
const MSG_UNKNOWN_FIELD: &str = "Unknown field.";
const MSG_INVALID_INPUT: &str = "Invalid input type.";

const KNOWN_FIELDS: &[&str] = &["title", "author", "year"];

/// A validated create-book payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl From<BookInput> for NewBook {
    fn from(input: BookInput) -> Self {
        Self {
            title: input.title,
            author: input.author,
            year: input.year,
        }
    }
}

/// Validate an untyped JSON body into a [`BookInput`].
///
/// All violations are collected; the error carries one message list per
/// offending field. Dump-only and unknown keys are rejected.
pub fn validate_book(value: &Value) -> Result<BookInput, ApiError> {
    let Some(object) = value.as_object() else {
        let mut errors = FieldErrors::new();
        errors.insert("_schema".to_string(), vec![MSG_INVALID_INPUT.to_string()]);
        return Err(ApiError::validation(errors));
    };

    let mut errors = FieldErrors::new();

    let title = string_field(object, "title", &mut errors);
    let author = string_field(object, "author", &mut errors);
    let year = year_field(object, &mut errors);

    for key in object.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            push_error(&mut errors, key, MSG_UNKNOWN_FIELD);
        }
    }

    if errors.is_empty() {
        // All three accessors returned Some when no errors were recorded.
        Ok(BookInput {
            title: title.unwrap_or_default(),
            author: author.unwrap_or_default(),
            year: year.unwrap_or_default(),
        })
    } else {
        Err(ApiError::validation(errors))
    }
}

fn string_field(object: &Map<String, Value>, field: &str, errors: &mut FieldErrors) -> Option<String> {
    let Some(value) = object.get(field) else {
        push_error(errors, field, MSG_MISSING);
        return None;
    };
    let Some(text) = value.as_str() else {
        push_error(errors, field, MSG_NOT_A_STRING);
        return None;
    };
    let length = text.chars().count();
    if length < 1 || length > TITLE_MAX_LEN {
        push_error(errors, field, MSG_LENGTH);
        return None;
    }
    Some(text.to_string())
}

fn year_field(object: &Map<String, Value>, errors: &mut FieldErrors) -> Option<i32> {
    let Some(value) = object.get("year") else {
        push_error(errors, "year", MSG_MISSING);
        return None;
    };
    let Some(year) = value.as_i64() else {
        push_error(errors, "year", MSG_NOT_AN_INTEGER);
        return None;
    };
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        push_error(errors, "year", MSG_YEAR_RANGE);
        return None;
    }
    Some(year as i32)
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages_for(error: ApiError, field: &str) -> Vec<String> {
        match error {
            ApiError::Validation { errors } => errors.get(field).cloned().unwrap_or_default(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_payload_passes() {
        let input = validate_book(&json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "year": 1965
        }))
        .unwrap();
        assert_eq!(
            input,
            BookInput {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                year: 1965,
            }
        );
    }

    #[test]
    fn empty_title_reports_length_message() {
        let error = validate_book(&json!({"title": "", "author": "X", "year": 1965})).unwrap_err();
        assert_eq!(
            messages_for(error, "title"),
            vec!["Length must be between 1 and 200.".to_string()]
        );
    }

    #[test]
    fn title_longer_than_200_chars_is_rejected() {
        let error = validate_book(&json!({
            "title": "x".repeat(201),
            "author": "X",
            "year": 1965
        }))
        .unwrap_err();
        assert_eq!(messages_for(error, "title"), vec![MSG_LENGTH.to_string()]);
    }

    #[test]
    fn all_violations_are_collected_together() {
        let error = validate_book(&json!({"year": 999})).unwrap_err();
        let ApiError::Validation { errors } = error else {
            panic!("expected validation error");
        };
        assert_eq!(errors["title"], vec![MSG_MISSING.to_string()]);
        assert_eq!(errors["author"], vec![MSG_MISSING.to_string()]);
        assert_eq!(errors["year"], vec![MSG_YEAR_RANGE.to_string()]);
    }

    #[test]
    fn wrong_types_report_type_messages() {
        let error =
            validate_book(&json!({"title": 7, "author": true, "year": "1965"})).unwrap_err();
        let ApiError::Validation { errors } = error else {
            panic!("expected validation error");
        };
        assert_eq!(errors["title"], vec![MSG_NOT_A_STRING.to_string()]);
        assert_eq!(errors["author"], vec![MSG_NOT_A_STRING.to_string()]);
        assert_eq!(errors["year"], vec![MSG_NOT_AN_INTEGER.to_string()]);
    }

    #[test]
    fn year_bounds_are_inclusive() {
        assert!(validate_book(&json!({"title": "a", "author": "b", "year": 1000})).is_ok());
        assert!(validate_book(&json!({"title": "a", "author": "b", "year": 2024})).is_ok());
        assert!(validate_book(&json!({"title": "a", "author": "b", "year": 2025})).is_err());
    }

    #[test]
    fn dump_only_fields_are_rejected_on_input() {
        let error = validate_book(&json!({
            "id": 1,
            "title": "Dune",
            "author": "Frank Herbert",
            "year": 1965
        }))
        .unwrap_err();
        assert_eq!(messages_for(error, "id"), vec![MSG_UNKNOWN_FIELD.to_string()]);
    }

    #[test]
    fn non_object_body_is_a_schema_error() {
        let error = validate_book(&json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(
            messages_for(error, "_schema"),
            vec![MSG_INVALID_INPUT.to_string()]
        );
    }
}
