//! Typed payload validation.
//!
//! `validate` turns a JSON payload into a checked create schema.
//! `validate_patch` does the same for partial updates, where every field is
//! optional and fields outside the schema are dropped.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use validator::Validate;

use lodging_core::errors::LodgingError;

/// Per-field validation messages, rendered as `{"field": ["msg", ...]}`.
#[derive(Default)]
pub struct SchemaErrors {
    map: Map<String, Value>,
}

impl SchemaErrors {
    pub fn push_field(&mut self, field: &str, msg: impl Into<String>) {
        let msg = Value::String(msg.into());
        match self.map.get_mut(field) {
            Some(Value::Array(arr)) => arr.push(msg),
            _ => {
                self.map.insert(field.to_string(), Value::Array(vec![msg]));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn into_unprocessable_anyhow(self, message: &str) -> anyhow::Error {
        LodgingError::unprocessable(message)
            .with_errors(Value::Object(self.map))
            .into_anyhow()
    }
}

pub fn unprocessable(message: &str, errors: Value) -> anyhow::Error {
    LodgingError::unprocessable(message)
        .with_errors(errors)
        .into_anyhow()
}

pub fn schema_error(message: &str, msg: impl Into<String>) -> anyhow::Error {
    unprocessable(message, json!({"_schema": [msg.into()]}))
}

/// A partial-update schema: every field optional.
pub trait PartialUpdate {
    /// True when no allow-listed field was supplied.
    fn is_empty(&self) -> bool;
}

fn friendly_message(code: &str) -> Option<&'static str> {
    match code {
        "required" => Some("is required"),
        "email" => Some("must be a valid email"),
        "length" => Some("has invalid length"),
        "range" => Some("is out of range"),
        _ => None,
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn push_validation_errors(out: &mut SchemaErrors, prefix: &str, errs: &validator::ValidationErrors) {
    for (field, kind) in errs.errors() {
        let key = join_path(prefix, field);
        match kind {
            validator::ValidationErrorsKind::Field(field_errors) => {
                for e in field_errors {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .or_else(|| friendly_message(&e.code).map(|m| m.to_string()))
                        .unwrap_or_else(|| e.code.to_string());
                    out.push_field(&key, msg);
                }
            }
            validator::ValidationErrorsKind::Struct(nested) => {
                push_validation_errors(out, &key, nested.as_ref());
            }
            validator::ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    push_validation_errors(out, &format!("{key}[{idx}]"), nested.as_ref());
                }
            }
        }
    }
}

fn parse<T>(data: &Value, error_message: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned + Validate,
{
    serde_json::from_value(data.clone()).map_err(|e| schema_error(error_message, e.to_string()))
}

fn check<T: Validate>(parsed: &T, error_message: &str) -> anyhow::Result<()> {
    parsed.validate().map_err(|e| {
        let mut out = SchemaErrors::default();
        push_validation_errors(&mut out, "", &e);
        out.into_unprocessable_anyhow(error_message)
    })
}

/// Deserialize and validate a full record.
///
/// Shape and constraint failures are `Unprocessable`.
pub fn validate<T>(data: &Value, error_message: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = parse(data, error_message)?;
    check(&parsed, error_message)?;
    Ok(parsed)
}

/// Deserialize and validate a sparse update.
///
/// A payload that is not an object, or that names no allow-listed field,
/// is `BadRequest("no field to update")`. Constraint failures on the fields
/// that are present are `Unprocessable`.
pub fn validate_patch<T>(data: &Value, error_message: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned + Validate + PartialUpdate,
{
    if !data.is_object() {
        return Err(LodgingError::bad_request("no field to update").into_anyhow());
    }

    let parsed: T = parse(data, error_message)?;
    if parsed.is_empty() {
        return Err(LodgingError::bad_request("no field to update").into_anyhow());
    }

    check(&parsed, error_message)?;
    Ok(parsed)
}

/// Validate `data` as a `T` and replace it with `T`'s canonical form,
/// so defaults are filled in and unknown fields are gone.
pub fn normalize<T>(data: &mut Value, error_message: &str) -> anyhow::Result<()>
where
    T: DeserializeOwned + Validate + Serialize,
{
    let parsed: T = validate(data, error_message)?;
    *data = serde_json::to_value(parsed)?;
    Ok(())
}

/// `normalize` for partial updates; see `validate_patch`.
pub fn normalize_patch<T>(data: &mut Value, error_message: &str) -> anyhow::Result<()>
where
    T: DeserializeOwned + Validate + PartialUpdate + Serialize,
{
    let parsed: T = validate_patch(data, error_message)?;
    *data = serde_json::to_value(parsed)?;
    Ok(())
}
