use std::error::Error as _;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use notebox_core::NotesError;

/// Failure of one request, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal,
}

impl From<NotesError> for ApiError {
    fn from(err: NotesError) -> Self {
        match err {
            NotesError::Validation(e) => ApiError::BadRequest(e.to_string()),
            NotesError::NotFound(id) => ApiError::NotFound(format!("Note {} not found", id)),
            NotesError::Service { .. } => {
                tracing::error!(error = %cause_chain(&err), "note service failure");
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// `outer: inner: innermost`, following `source()` links.
fn cause_chain(err: &NotesError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use notebox_core::{NoteId, StoreError, ValidationError};

    #[test]
    fn test_status_mapping() {
        let bad: ApiError = NotesError::Validation(ValidationError::PageSizeOutOfRange {
            value: 0,
            min: 1,
            max: 100,
        })
        .into();
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);

        let missing: ApiError = NotesError::NotFound(NoteId::new()).into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        assert_eq!(
            ApiError::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_service_failure_hides_cause() {
        let err: ApiError = NotesError::Service {
            context: "list notes".to_string(),
            source: StoreError::CorruptRow("Invalid note id: secret-detail".to_string()),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
    }
}
