mod challenge;
mod compose;
mod service;

pub use compose::{structure_compose, unstructure_compose};

use chall_core::{ComposeError, FieldPath};
use serde_yaml::value::Tag;
use serde_yaml::{Mapping, Value};

use crate::documents::TEMPLATE_TAG;

pub(crate) fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

pub(crate) fn as_mapping<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a Mapping, ComposeError> {
    value.as_mapping().ok_or_else(|| {
        ComposeError::mismatch(
            path.clone(),
            format!("expected mapping, found {}", shape_name(value)),
        )
    })
}

pub(crate) fn as_sequence<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a [Value], ComposeError> {
    value.as_sequence().map(Vec::as_slice).ok_or_else(|| {
        ComposeError::mismatch(
            path.clone(),
            format!("expected sequence, found {}", shape_name(value)),
        )
    })
}

pub(crate) fn as_str<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a str, ComposeError> {
    value.as_str().ok_or_else(|| {
        ComposeError::mismatch(
            path.clone(),
            format!("expected string, found {}", shape_name(value)),
        )
    })
}

pub(crate) fn as_integer(value: &Value, path: &FieldPath) -> Result<i64, ComposeError> {
    value.as_i64().ok_or_else(|| {
        ComposeError::mismatch(
            path.clone(),
            format!("expected integer, found {}", shape_name(value)),
        )
    })
}

pub(crate) fn as_bool(value: &Value, path: &FieldPath) -> Result<bool, ComposeError> {
    value.as_bool().ok_or_else(|| {
        ComposeError::mismatch(
            path.clone(),
            format!("expected boolean, found {}", shape_name(value)),
        )
    })
}

// Mapping keys in this schema are always plain strings.
pub(crate) fn entry_key<'a>(key: &'a Value, path: &FieldPath) -> Result<&'a str, ComposeError> {
    key.as_str().ok_or_else(|| {
        ComposeError::mismatch(
            path.clone(),
            format!("mapping key must be a string, found {}", shape_name(key)),
        )
    })
}

pub(crate) fn missing_field(path: &FieldPath, field: &str) -> ComposeError {
    ComposeError::mismatch(path.key(field), "missing required field")
}

pub(crate) fn is_template_tag(tag: &Tag) -> bool {
    tag.to_string() == format!("!{TEMPLATE_TAG}")
}

pub(crate) fn template_tag() -> Tag {
    Tag::new(TEMPLATE_TAG)
}

pub(crate) fn string_value(text: &str) -> Value {
    Value::String(text.to_string())
}
