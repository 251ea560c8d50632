use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::recruitment::applications::domain::{
    ActorId, ApplicationData, InterviewResult,
};
use crate::workflows::recruitment::applications::router::application_router;

fn build_router() -> axum::Router {
    let (service, _, _, _) = build_service();
    application_router(Arc::new(service))
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("serialize")))
        .expect("request")
}

fn create_payload() -> Value {
    json!({
        "job_id": job_id().0,
        "student_id": student_id().0,
        "data": { "cover_letter": "please consider me" },
    })
}

#[tokio::test]
async fn post_applications_returns_created_view() {
    let router = build_router();

    let response = router
        .oneshot(post_json("/api/v1/placement/applications", &create_payload()))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json(response).await;
    assert!(payload.get("application_id").is_some());
    assert_eq!(
        payload.get("status").and_then(Value::as_str),
        Some("applied")
    );
    assert_eq!(
        payload.get("timeline_entries").and_then(Value::as_u64),
        Some(1)
    );
}

#[tokio::test]
async fn duplicate_application_maps_to_conflict() {
    let router = build_router();

    let first = router
        .clone()
        .oneshot(post_json("/api/v1/placement/applications", &create_payload()))
        .await
        .expect("router dispatch");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = router
        .oneshot(post_json("/api/v1/placement/applications", &create_payload()))
        .await
        .expect("router dispatch");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_application_maps_to_not_found() {
    let router = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/placement/applications/app-missing")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn timeline_endpoint_returns_ordered_entries() {
    let (service, _, _, _) = build_service();
    let application = create_shortlisted(&service);
    let router = application_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!(
                    "/api/v1/placement/applications/{}/timeline",
                    application.id.0
                ))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    let entries = payload.as_array().expect("array of entries");
    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries[0].get("status").and_then(Value::as_str),
        Some("applied")
    );
    assert_eq!(
        entries[2].get("status").and_then(Value::as_str),
        Some("shortlisted")
    );
}

#[tokio::test]
async fn offer_response_by_stranger_maps_to_forbidden() {
    let (service, _, _, _) = build_service();
    let application = create_shortlisted(&service);
    let employer = ActorId("emp-007".to_string());
    service
        .schedule_interview(&application.id, interview_details(), &employer)
        .expect("scheduled");
    service
        .submit_interview_feedback(&application.id, InterviewResult::Passed, None, &employer)
        .expect("feedback");
    let router = application_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            &format!(
                "/api/v1/placement/applications/{}/offer/response",
                application.id.0
            ),
            &json!({ "student_id": "stu-9999", "accepted": true }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_status_change_maps_to_conflict() {
    let (service, _, _, _) = build_service();
    let application = service
        .create_application(job_id(), student_id(), ApplicationData::default(), None)
        .expect("application created");
    let router = application_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/placement/applications/{}/status", application.id.0),
            &json!({ "status": "completed", "actor_id": "emp-007" }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json(response).await;
    assert!(payload
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("cannot move application"));
}

#[tokio::test]
async fn funnel_endpoint_aggregates_statuses() {
    let (service, _, _, _) = build_service();
    create_shortlisted(&service);
    let router = application_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/placement/reports/funnel")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload.get("total").and_then(Value::as_u64), Some(1));
    let shortlisted = payload
        .get("by_status")
        .and_then(Value::as_array)
        .expect("by_status")
        .iter()
        .find(|entry| entry.get("status") == Some(&json!("shortlisted")))
        .expect("shortlisted bucket");
    assert_eq!(shortlisted.get("count").and_then(Value::as_u64), Some(1));
}

#[tokio::test]
async fn export_endpoint_returns_csv() {
    let (service, _, _, _) = build_service();
    let application = create_shortlisted(&service);
    let router = application_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/placement/applications/export")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("text/csv")
    );
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let text = String::from_utf8(body.to_vec()).expect("utf8 csv");
    assert!(text.starts_with("application_id,job_id,student_id,status"));
    assert!(text.contains(&application.id.0));
    assert!(text.contains("shortlisted"));
}
