use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use serde_json::Value;

pub(super) use crate::workflows::testing::*;

use crate::workflows::applications::{application_router, ApplicationRecord};
use crate::workflows::campaigns::CampaignId;

pub(super) fn router(harness: &Harness) -> Router {
    application_router(harness.services.applications.clone())
}

pub(super) fn json_request(method: &str, uri: &str, actor: (&str, &str), body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(actor.0, actor.1)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) fn empty_request(method: &str, uri: &str, actor: Option<(&str, &str)>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let builder = match actor {
        Some((name, value)) => builder.header(name, value),
        None => builder,
    };
    builder.body(Body::empty()).expect("request builds")
}

pub(super) fn records_for(harness: &Harness, campaign_id: &str) -> Vec<ApplicationRecord> {
    harness
        .services
        .applications
        .list_for_campaign(&CampaignId(campaign_id.to_string()))
        .expect("listing succeeds")
}
