use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::campaigns::Fulfillment;
use crate::workflows::points::points_router;

fn post(uri: String, header: (&str, &str)) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header.0, header.1)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn payout_routes_drive_request_and_settlement() {
    let harness = Harness::new(vec![campaign("visit", 5, Fulfillment::NoShipment)]);
    let id = harness.review_completed("u1", "visit");

    let response = points_router(harness.services.points.clone())
        .oneshot(post(
            format!("/api/v1/applications/{id}/payout"),
            ("x-user-id", "u1"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(read_json_body(response).await["entry"]["status"], "pending");

    let response = points_router(harness.services.points.clone())
        .oneshot(post(
            format!("/api/v1/staff/applications/{id}/payout/complete"),
            ("x-staff-id", "staff-1"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = points_router(harness.services.points.clone())
        .oneshot(
            Request::builder()
                .uri("/api/v1/me/points")
                .header("x-user-id", "u1")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["summary"]["credited"], 5_000);
    assert_eq!(payload["summary"]["available"], 5_000);
    assert_eq!(payload["entries"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn double_payout_request_is_conflict() {
    let harness = Harness::new(vec![campaign("visit", 5, Fulfillment::NoShipment)]);
    let id = harness.review_completed("u1", "visit");
    harness
        .services
        .points
        .request_payout(&user("u1"), &id)
        .expect("first request");

    let response = points_router(harness.services.points.clone())
        .oneshot(post(
            format!("/api/v1/applications/{id}/payout"),
            ("x-user-id", "u1"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(read_json_body(response).await["reason"], "state_conflict");
}
