//! Field checks for JSON request bodies.
//!
//! Bodies are read as [`serde_json::Value`] so that every failing field can be
//! reported at once, keyed by field name, instead of stopping at the first
//! serde error.

use serde_json::{Map, Value};

use crate::errors::{Error, FieldErrors, NON_FIELD_ERRORS, Result};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const NULL_CHARACTERS: &str = "Null characters are not allowed.";

pub fn max_length_message(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

pub fn min_length_message(min: usize) -> String {
    format!("Ensure this field has at least {min} characters.")
}

/// The body must be a JSON object; anything else is a non-field error.
pub fn as_object(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object().ok_or_else(|| Error::Validation {
        errors: FieldErrors::single(NON_FIELD_ERRORS, "Invalid data. Expected a JSON object."),
    })
}

/// Read a required, non-blank string field.
///
/// With `trim` set the returned value has surrounding whitespace removed.
/// Records at most one message for the field and returns `None` when it did.
pub fn required_string(body: &Map<String, Value>, field: &str, trim: bool, errors: &mut FieldErrors) -> Option<String> {
    let value = match body.get(field) {
        None => {
            errors.add(field, REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, NOT_NULL);
            return None;
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            errors.add(field, NOT_A_STRING);
            return None;
        }
    };

    if value.trim().is_empty() {
        errors.add(field, NOT_BLANK);
        return None;
    }

    // PostgreSQL text columns cannot store NUL
    if value.contains('\0') {
        errors.add(field, NULL_CHARACTERS);
        return None;
    }

    Some(if trim { value.trim().to_string() } else { value.clone() })
}

/// Length bounds counted in characters, not bytes.
pub fn check_length(value: &str, field: &str, min: Option<usize>, max: Option<usize>, errors: &mut FieldErrors) -> bool {
    let len = value.chars().count();
    match (min, max) {
        (Some(min), _) if len < min => errors.add(field, min_length_message(min)),
        (_, Some(max)) if len > max => errors.add(field, max_length_message(max)),
        _ => return true,
    }
    false
}
