//! Argument validation against an [`ObjectSchema`]
//!
//! Validation is pure and never panics. It either yields a normalized value
//! tree holding only declared fields that were present, or every issue found
//! with the path of the offending field (`tags[0].valueType`).

use crate::schema::{ObjectSchema, Schema};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Dotted field path, empty for the arguments object itself
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    fn push(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            path: path.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .issues
            .iter()
            .map(|issue| {
                if issue.path.is_empty() {
                    issue.message.clone()
                } else {
                    format!("{}: {}", issue.path, issue.message)
                }
            })
            .collect();
        f.write_str(&rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate `input` against `schema`
pub fn validate(schema: &ObjectSchema, input: &Value) -> Result<Value, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let normalized = check_object(schema, input, "", &mut errors);
    if errors.is_empty() {
        Ok(normalized.unwrap_or_else(|| Value::Object(Map::new())))
    } else {
        Err(errors)
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn mismatch(expected: &Schema, actual: &Value, path: &str, errors: &mut ValidationErrors) {
    errors.push(
        path,
        format!("expected {}, received {}", expected.type_name(), describe(actual)),
    );
}

fn check_object(
    schema: &ObjectSchema,
    input: &Value,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<Value> {
    let Value::Object(map) = input else {
        errors.push(path, format!("expected object, received {}", describe(input)));
        return None;
    };

    let mut out = Map::new();
    for field in schema.fields() {
        let field_path = join(path, field.name);
        match map.get(field.name) {
            None => {
                if field.required {
                    errors.push(&field_path, "required field is missing");
                }
            }
            Some(value) => {
                if let Some(checked) = check(&field.schema, value, &field_path, errors) {
                    out.insert(field.name.to_string(), checked);
                }
            }
        }
    }
    Some(Value::Object(out))
}

fn check(schema: &Schema, value: &Value, path: &str, errors: &mut ValidationErrors) -> Option<Value> {
    match (schema, value) {
        (Schema::String, Value::String(_))
        | (Schema::Number, Value::Number(_))
        | (Schema::Boolean, Value::Bool(_)) => Some(value.clone()),
        (Schema::Enum(allowed), Value::String(s)) => {
            if allowed.contains(&s.as_str()) {
                Some(value.clone())
            } else {
                errors.push(
                    path,
                    format!("invalid value '{}', expected one of: {}", s, allowed.join(", ")),
                );
                None
            }
        }
        (Schema::Array(items), Value::Array(values)) => {
            let before = errors.issues.len();
            let checked: Vec<Value> = values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| check(items, v, &format!("{}[{}]", path, i), errors))
                .collect();
            (errors.issues.len() == before).then_some(Value::Array(checked))
        }
        (Schema::StringMap, Value::Object(map)) => {
            let mut ok = true;
            for (key, v) in map {
                if !v.is_string() {
                    mismatch(&Schema::String, v, &join(path, key), errors);
                    ok = false;
                }
            }
            ok.then(|| value.clone())
        }
        (Schema::Object(object), Value::Object(_)) => check_object(object, value, path, errors),
        (expected, actual) => {
            mismatch(expected, actual, path, errors);
            None
        }
    }
}
