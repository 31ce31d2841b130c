//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::GradingError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: GradingError) -> Problem {
    let detail = error.to_string();
    match error {
        GradingError::InvalidStudent { .. } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid Student").with_detail(detail)
        }

        GradingError::ClassMismatch { .. } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Class Mismatch").with_detail(detail)
        }

        GradingError::InvalidScore { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Score").with_detail(detail)
        }

        GradingError::InvalidExamPeriod { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Exam Period").with_detail(detail)
        }

        GradingError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        GradingError::DuplicateKeyConflict { .. } => {
            Problem::new(StatusCode::CONFLICT, "Conflict").with_detail(detail)
        }

        GradingError::Unauthorized { reason } => {
            Problem::new(StatusCode::FORBIDDEN, "Forbidden").with_detail(reason)
        }

        GradingError::NotFound { resource, id } => Problem::new(
            StatusCode::NOT_FOUND,
            format!("{} Not Found", resource),
        )
        .with_detail(format!("{} with id '{}' was not found", resource, id)),

        GradingError::Internal => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
        .with_detail("An unexpected error occurred"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                GradingError::InvalidScore { reason: "x".into() },
                StatusCode::BAD_REQUEST,
            ),
            (
                GradingError::Unauthorized { reason: "x".into() },
                StatusCode::FORBIDDEN,
            ),
            (
                GradingError::NotFound {
                    resource: "mark".into(),
                    id: "1".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                GradingError::DuplicateKeyConflict { key: "k".into() },
                StatusCode::CONFLICT,
            ),
            (GradingError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(map_domain_error(error).status, status.as_u16());
        }
    }
}
