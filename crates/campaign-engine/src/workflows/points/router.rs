use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::service::{PayoutReceipt, PointsService, PointsStatement};
use crate::workflows::applications::ApplicationId;
use crate::workflows::error::WorkflowError;
use crate::workflows::http::{applicant, staff};

pub fn points_router(service: Arc<PointsService>) -> Router {
    Router::new()
        .route(
            "/api/v1/applications/:application_id/payout",
            post(request_payout_handler),
        )
        .route(
            "/api/v1/staff/applications/:application_id/payout/complete",
            post(complete_payout_handler),
        )
        .route("/api/v1/me/points", get(statement_handler))
        .with_state(service)
}

pub(crate) async fn request_payout_handler(
    State(service): State<Arc<PointsService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, WorkflowError> {
    let user_id = applicant(&headers)?;
    let receipt = service.request_payout(&user_id, &ApplicationId(application_id))?;
    Ok((StatusCode::CREATED, Json(receipt)).into_response())
}

pub(crate) async fn complete_payout_handler(
    State(service): State<Arc<PointsService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PayoutReceipt>, WorkflowError> {
    let staff_id = staff(&headers)?;
    Ok(Json(
        service.complete_payout(&staff_id, &ApplicationId(application_id))?,
    ))
}

pub(crate) async fn statement_handler(
    State(service): State<Arc<PointsService>>,
    headers: HeaderMap,
) -> Result<Json<PointsStatement>, WorkflowError> {
    let user_id = applicant(&headers)?;
    Ok(Json(service.statement(&user_id)?))
}
