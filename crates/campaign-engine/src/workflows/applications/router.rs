use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{ApplicationId, ApplicationStatusView, ApplicationSubmission};
use super::service::{ApplicationService, FulfillmentMilestone};
use crate::workflows::campaigns::CampaignId;
use crate::workflows::error::WorkflowError;
use crate::workflows::http::{applicant, staff};

#[derive(Debug, Deserialize)]
pub(crate) struct MilestoneRequest {
    pub(crate) milestone: FulfillmentMilestone,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectionRequest {
    #[serde(default)]
    pub(crate) reason: String,
}

/// Router builder exposing application intake, fulfillment and staff decisions.
pub fn application_router(service: Arc<ApplicationService>) -> Router {
    Router::new()
        .route(
            "/api/v1/campaigns/:campaign_id/applications",
            post(apply_handler),
        )
        .route("/api/v1/applications/:application_id", get(status_handler))
        .route("/api/v1/me/applications", get(my_applications_handler))
        .route(
            "/api/v1/applications/:application_id/cancel",
            post(cancel_handler),
        )
        .route(
            "/api/v1/applications/:application_id/fulfillment",
            post(fulfillment_handler),
        )
        .route(
            "/api/v1/staff/applications/:application_id/approve",
            post(approve_handler),
        )
        .route(
            "/api/v1/staff/applications/:application_id/reject",
            post(reject_handler),
        )
        .route(
            "/api/v1/staff/campaigns/:campaign_id/applications",
            get(campaign_applications_handler),
        )
        .with_state(service)
}

pub(crate) async fn apply_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(campaign_id): Path<String>,
    headers: HeaderMap,
    Json(submission): Json<ApplicationSubmission>,
) -> Result<Response, WorkflowError> {
    let user_id = applicant(&headers)?;
    let record = service.apply(&user_id, &CampaignId(campaign_id), submission)?;
    Ok((StatusCode::CREATED, Json(record.status_view())).into_response())
}

pub(crate) async fn status_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(application_id): Path<String>,
) -> Result<Json<ApplicationStatusView>, WorkflowError> {
    let record = service.get(&ApplicationId(application_id))?;
    Ok(Json(record.status_view()))
}

pub(crate) async fn my_applications_handler(
    State(service): State<Arc<ApplicationService>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ApplicationStatusView>>, WorkflowError> {
    let user_id = applicant(&headers)?;
    let records = service.list_for_user(&user_id)?;
    Ok(Json(records.iter().map(|record| record.status_view()).collect()))
}

pub(crate) async fn cancel_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApplicationStatusView>, WorkflowError> {
    let user_id = applicant(&headers)?;
    let record = service.cancel(&user_id, &ApplicationId(application_id))?;
    Ok(Json(record.status_view()))
}

pub(crate) async fn fulfillment_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<MilestoneRequest>,
) -> Result<Json<ApplicationStatusView>, WorkflowError> {
    let user_id = applicant(&headers)?;
    let record = service.report_fulfillment(
        &user_id,
        &ApplicationId(application_id),
        request.milestone,
    )?;
    Ok(Json(record.status_view()))
}

pub(crate) async fn approve_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApplicationStatusView>, WorkflowError> {
    let staff_id = staff(&headers)?;
    let record = service.approve(&staff_id, &ApplicationId(application_id))?;
    Ok(Json(record.status_view()))
}

pub(crate) async fn reject_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<RejectionRequest>,
) -> Result<Json<ApplicationStatusView>, WorkflowError> {
    let staff_id = staff(&headers)?;
    let record = service.reject(&staff_id, &ApplicationId(application_id), &request.reason)?;
    Ok(Json(record.status_view()))
}

pub(crate) async fn campaign_applications_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(campaign_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<ApplicationStatusView>>, WorkflowError> {
    staff(&headers)?;
    let records = service.list_for_campaign(&CampaignId(campaign_id))?;
    Ok(Json(records.iter().map(|record| record.status_view()).collect()))
}
