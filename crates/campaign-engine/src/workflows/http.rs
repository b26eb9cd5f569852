//! Shared HTTP plumbing: actor headers and the error-to-response mapping.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use super::actors::{StaffId, UserId};
use super::error::{ValidationError, WorkflowError};

pub(crate) const USER_HEADER: &str = "x-user-id";
pub(crate) const STAFF_HEADER: &str = "x-staff-id";

fn header_value(headers: &HeaderMap, name: &'static str) -> Result<String, WorkflowError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(WorkflowError::Validation(ValidationError::MissingField(name)))
}

pub(crate) fn applicant(headers: &HeaderMap) -> Result<UserId, WorkflowError> {
    header_value(headers, USER_HEADER).map(UserId)
}

pub(crate) fn staff(headers: &HeaderMap) -> Result<StaffId, WorkflowError> {
    header_value(headers, STAFF_HEADER).map(StaffId)
}

impl IntoResponse for WorkflowError {
    fn into_response(self) -> Response {
        let (status, payload) = match &self {
            WorkflowError::Validation(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string() }),
            ),
            WorkflowError::Conflict { reason, detail } => (
                StatusCode::CONFLICT,
                json!({ "error": detail, "reason": reason.code() }),
            ),
            WorkflowError::Dependency(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": self.to_string() }),
            ),
            WorkflowError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, json!({ "error": self.to_string() }))
            }
            WorkflowError::Forbidden => {
                (StatusCode::FORBIDDEN, json!({ "error": self.to_string() }))
            }
            WorkflowError::Repository(err) => {
                error!(error = %err, "store failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "storage unavailable" }),
                )
            }
        };

        (status, Json(payload)).into_response()
    }
}
