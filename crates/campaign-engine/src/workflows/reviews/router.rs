use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};

use super::domain::{ReviewDraft, ReviewSubmission};
use super::service::{ReviewOutcome, ReviewService};
use crate::workflows::applications::router::RejectionRequest;
use crate::workflows::applications::{ApplicationId, ApplicationStatusView};
use crate::workflows::error::WorkflowError;
use crate::workflows::http::{applicant, staff};

pub fn review_router(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route(
            "/api/v1/applications/:application_id/review",
            put(submit_handler).get(review_handler),
        )
        .route(
            "/api/v1/staff/applications/:application_id/review/approve",
            post(approve_handler),
        )
        .route(
            "/api/v1/staff/applications/:application_id/review/reject",
            post(reject_handler),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler(
    State(service): State<Arc<ReviewService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    Json(draft): Json<ReviewDraft>,
) -> Result<Response, WorkflowError> {
    let user_id = applicant(&headers)?;
    let receipt = service.submit(&user_id, &ApplicationId(application_id), draft)?;
    let status = match receipt.outcome {
        ReviewOutcome::Created => StatusCode::CREATED,
        _ => StatusCode::OK,
    };
    Ok((status, Json(receipt)).into_response())
}

pub(crate) async fn review_handler(
    State(service): State<Arc<ReviewService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ReviewSubmission>, WorkflowError> {
    let user_id = applicant(&headers)?;
    Ok(Json(service.get(&user_id, &ApplicationId(application_id))?))
}

pub(crate) async fn approve_handler(
    State(service): State<Arc<ReviewService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApplicationStatusView>, WorkflowError> {
    let staff_id = staff(&headers)?;
    let record = service.approve_review(&staff_id, &ApplicationId(application_id))?;
    Ok(Json(record.status_view()))
}

pub(crate) async fn reject_handler(
    State(service): State<Arc<ReviewService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<RejectionRequest>,
) -> Result<Json<ApplicationStatusView>, WorkflowError> {
    let staff_id = staff(&headers)?;
    let record =
        service.reject_review(&staff_id, &ApplicationId(application_id), &request.reason)?;
    Ok(Json(record.status_view()))
}
