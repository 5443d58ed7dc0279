use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lodging_core::errors::LodgingError;

#[derive(Debug)]
pub struct LodgingAxumError(pub anyhow::Error);

impl From<anyhow::Error> for LodgingAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<LodgingError> for LodgingAxumError {
    fn from(e: LodgingError) -> Self {
        Self(e.into_anyhow())
    }
}

impl IntoResponse for LodgingAxumError {
    fn into_response(self) -> Response {
        // Keep structured fields even when wrapped by anyhow contexts
        let safe = match LodgingError::from_anyhow(&self.0) {
            Some(e) => e.sanitize_for_client(),
            None => {
                tracing::error!(error = ?self.0, "unhandled error");
                LodgingError::general_error(self.0.to_string())
            }
        };

        let status =
            StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}
