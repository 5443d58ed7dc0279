//! # Errors
//!
//! Structured errors with Feathers-style names and status codes.
//! - consistent status codes + class names
//! - carried through `anyhow::Error` so they survive the hook pipeline
//! - transport-agnostic: the HTTP adapter decides how to render them

use std::fmt;

use anyhow::Error as AnyError;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,       // 400
    NotFound,         // 404
    MethodNotAllowed, // 405
    Conflict,         // 409
    Unprocessable,    // 422
    GeneralError,     // 500
    NotImplemented,   // 501
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::Conflict => 409,
            ErrorKind::Unprocessable => 422,
            ErrorKind::GeneralError => 500,
            ErrorKind::NotImplemented => 501,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::MethodNotAllowed => "MethodNotAllowed",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Unprocessable => "Unprocessable",
            ErrorKind::GeneralError => "GeneralError",
            ErrorKind::NotImplemented => "NotImplemented",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotFound => "not-found",
            ErrorKind::MethodNotAllowed => "method-not-allowed",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unprocessable => "unprocessable",
            ErrorKind::GeneralError => "general-error",
            ErrorKind::NotImplemented => "not-implemented",
        }
    }
}

/// A structured error that can live inside `anyhow::Error`.
///
/// `data` carries machine-readable details (the offending day of a
/// capacity conflict, the blocking reference count of a delete guard).
/// `errors` carries per-field validation messages.
#[derive(Debug)]
pub struct LodgingError {
    pub kind: ErrorKind,
    pub message: String,
    pub data: Option<Value>,
    pub errors: Option<Value>,
    pub source: Option<AnyError>,
}

impl LodgingError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
            errors: None,
            source: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Downcast an `anyhow::Error`, looking through any context layers.
    pub fn from_anyhow(err: &AnyError) -> Option<&LodgingError> {
        err.chain().find_map(|e| e.downcast_ref::<LodgingError>())
    }

    /// Keep a `LodgingError` as-is, wrap anything else as `GeneralError`.
    pub fn normalize(err: AnyError) -> LodgingError {
        match err.downcast::<LodgingError>() {
            Ok(e) => e,
            Err(other) => {
                LodgingError::new(ErrorKind::GeneralError, other.to_string()).with_source(other)
            }
        }
    }

    /// Copy without the inner `source`, safe to hand to clients.
    pub fn sanitize_for_client(&self) -> LodgingError {
        LodgingError {
            kind: self.kind,
            message: self.message.clone(),
            data: self.data.clone(),
            errors: self.errors.clone(),
            source: None,
        }
    }

    pub fn to_json(&self) -> Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(d) = &self.data {
            base["data"] = d.clone();
        }
        if let Some(e) = &self.errors {
            base["errors"] = e.clone();
        }
        base
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn method_not_allowed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MethodNotAllowed, msg)
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, msg)
    }
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unprocessable, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented, msg)
    }
}

impl fmt::Display for LodgingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for LodgingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conflict_renders_feathers_shape_with_data() {
        let err = LodgingError::conflict("capacity reached for day 1")
            .with_data(json!({"day": 1, "capacity": 2, "assigned": 2}));

        let body = err.to_json();
        assert_eq!(body["name"], "Conflict");
        assert_eq!(body["code"], 409);
        assert_eq!(body["className"], "conflict");
        assert_eq!(body["data"]["day"], 1);
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn from_anyhow_sees_through_context() {
        let err = LodgingError::not_found("Room not found: x")
            .into_anyhow()
            .context("loading room");

        let found = LodgingError::from_anyhow(&err).expect("must find LodgingError");
        assert_eq!(found.kind, ErrorKind::NotFound);
    }

    #[test]
    fn normalize_wraps_foreign_errors_as_general_error() {
        let err = LodgingError::normalize(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.kind, ErrorKind::GeneralError);
        assert_eq!(err.message, "disk on fire");
        assert!(err.sanitize_for_client().source.is_none());
    }
}
