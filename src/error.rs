use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors raised by the recommendation core
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced location name has no match in the catalog
    #[error("Location '{0}' not found in database")]
    NotFound(String),

    /// Missing or ambiguous origin, out-of-range values, bad radius
    #[error("{0}")]
    InvalidRequest(String),

    /// The reference dataset or scoring model could not be loaded at startup
    #[error("Failed to load {artifact}: {reason}")]
    ArtifactUnavailable {
        artifact: &'static str,
        reason: String,
    },
}

impl EngineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn catalog_unavailable(reason: impl ToString) -> Self {
        Self::ArtifactUnavailable {
            artifact: "location catalog",
            reason: reason.to_string(),
        }
    }

    pub fn model_unavailable(reason: impl ToString) -> Self {
        Self::ArtifactUnavailable {
            artifact: "scoring model",
            reason: reason.to_string(),
        }
    }

    /// Short machine-readable error kind used in response bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidRequest(_) => "invalid_request",
            Self::ArtifactUnavailable { .. } => "artifact_unavailable",
        }
    }
}

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ArtifactUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            EngineError::NotFound("Nowhere".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EngineError::invalid("bad origin").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EngineError::model_unavailable("missing file").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        let err = EngineError::NotFound("Atlantis".to_string());
        assert_eq!(err.to_string(), "Location 'Atlantis' not found in database");

        let err = EngineError::catalog_unavailable("no such file");
        assert_eq!(err.to_string(), "Failed to load location catalog: no such file");
        assert_eq!(err.kind(), "artifact_unavailable");
    }
}
