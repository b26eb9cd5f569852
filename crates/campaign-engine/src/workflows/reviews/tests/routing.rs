use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::campaigns::Fulfillment;
use crate::workflows::reviews::review_router;

fn put_review(id: &str, user_id: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(format!("/api/v1/applications/{id}/review"))
        .header("x-user-id", user_id)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn first_submit_returns_created_then_ok() {
    let harness = Harness::new(vec![campaign("visit", 5, Fulfillment::NoShipment)]);
    let id = harness.approved("u1", "visit");
    let body = json!({ "blog_url": "https://blog.example.com/post" });

    let response = review_router(harness.services.reviews.clone())
        .oneshot(put_review(&id.0, "u1", body.clone()))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["outcome"], "created");
    assert_eq!(payload["application_status"], "review_in_progress");

    let response = review_router(harness.services.reviews.clone())
        .oneshot(put_review(&id.0, "u1", body))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["outcome"], "unchanged");
}

#[tokio::test]
async fn empty_review_is_unprocessable() {
    let harness = Harness::new(vec![campaign("visit", 5, Fulfillment::NoShipment)]);
    let id = harness.approved("u1", "visit");

    let response = review_router(harness.services.reviews.clone())
        .oneshot(put_review(&id.0, "u1", json!({ "images": [""] })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn staff_reject_then_get_review() {
    let harness = Harness::new(vec![campaign("visit", 5, Fulfillment::NoShipment)]);
    let id = harness.reviewing("u1", "visit");

    let response = review_router(harness.services.reviews.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/staff/applications/{id}/review/reject"))
                .header("x-staff-id", "staff-1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "reason": "Too short" }).to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "review_rejected");
    assert_eq!(payload["rejection_reason"], "Too short");

    let response = review_router(harness.services.reviews.clone())
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/applications/{id}/review"))
                .header("x-user-id", "u1")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(response).await["blog_url"],
        "https://blog.example.com/u1"
    );
}
