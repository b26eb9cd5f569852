use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::WithdrawalView;
use super::schedule::payout_date;
use super::service::{SubmissionContext, WithdrawalPreview, WithdrawalService};
use super::wizard::WithdrawalDraft;
use crate::workflows::error::{ValidationError, WorkflowError};
use crate::workflows::http::applicant;

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) amount: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PayoutDateResponse {
    pub(crate) requested_on: NaiveDate,
    pub(crate) payout_on: NaiveDate,
}

pub fn withdrawal_router(service: Arc<WithdrawalService>) -> Router {
    Router::new()
        .route("/api/v1/withdrawals/preview", post(preview_handler))
        .route(
            "/api/v1/withdrawals",
            post(submit_handler).get(list_handler),
        )
        .route(
            "/api/v1/withdrawals/payout-date/:date",
            get(payout_date_handler),
        )
        .with_state(service)
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub(crate) fn submission_context(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
) -> SubmissionContext {
    SubmissionContext {
        forwarded_for: header_text(headers, "x-forwarded-for"),
        real_ip: header_text(headers, "x-real-ip"),
        peer: peer.map(|addr| addr.ip()),
    }
}

pub(crate) async fn preview_handler(
    State(service): State<Arc<WithdrawalService>>,
    headers: HeaderMap,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<WithdrawalPreview>, WorkflowError> {
    let user_id = applicant(&headers)?;
    Ok(Json(service.preview(&user_id, request.amount)?))
}

pub(crate) async fn submit_handler(
    State(service): State<Arc<WithdrawalService>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(draft): Json<WithdrawalDraft>,
) -> Result<Response, WorkflowError> {
    let user_id = applicant(&headers)?;
    let context = submission_context(&headers, peer.map(|ConnectInfo(addr)| addr));
    let request = service.submit(&user_id, draft, &context)?;
    Ok((StatusCode::CREATED, Json(request.view())).into_response())
}

pub(crate) async fn list_handler(
    State(service): State<Arc<WithdrawalService>>,
    headers: HeaderMap,
) -> Result<Json<Vec<WithdrawalView>>, WorkflowError> {
    let user_id = applicant(&headers)?;
    Ok(Json(service.list(&user_id)?))
}

pub(crate) async fn payout_date_handler(
    Path(date): Path<String>,
) -> Result<Json<PayoutDateResponse>, WorkflowError> {
    let requested_on = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate { value: date.clone() })?;
    Ok(Json(PayoutDateResponse {
        requested_on,
        payout_on: payout_date(requested_on),
    }))
}
