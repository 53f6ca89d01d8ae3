use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::assessment::evaluation::ScoringConfig;
use crate::workflows::assessment::guard::RequesterIdentity;
use crate::workflows::assessment::router::assessment_router;
use crate::workflows::assessment::service::AssessmentService;
use crate::workflows::catalog::ItemCatalog;

fn build_router() -> (
    axum::Router,
    Arc<AssessmentService<MemoryRepository, MemoryArtifacts>>,
    Arc<MemoryArtifacts>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let artifacts = Arc::new(MemoryArtifacts::default());
    let service = Arc::new(AssessmentService::new(
        repository,
        artifacts.clone(),
        Arc::new(catalog()),
        ScoringConfig::standard(),
    ));
    (assessment_router(service.clone()), service, artifacts)
}

fn submit_body(requester: RequesterIdentity) -> Vec<u8> {
    let mut body = serde_json::to_value(submission()).expect("serialize submission");
    body["requester"] = serde_json::to_value(requester).expect("serialize requester");
    body["reference_date"] = json!("2025-08-05");
    serde_json::to_vec(&body).expect("serialize body")
}

fn post_json(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn post_assessments_returns_created_final_record() {
    let (router, _, _) = build_router();

    let response = router
        .oneshot(post_json("/api/v1/assessments", submit_body(examiner())))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload.get("assessment_id").is_some());
    assert_eq!(payload.get("status"), Some(&json!("final")));
    assert_eq!(payload.get("grade"), Some(&json!("average")));
    assert_eq!(payload.get("quotient"), Some(&json!(100.0)));
    assert!(payload.get("artifact").is_some());
}

#[tokio::test]
async fn guardian_submission_is_forbidden() {
    let (router, _, _) = build_router();

    let response = router
        .oneshot(post_json("/api/v1/assessments", submit_body(guardian())))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn off_schedule_bracket_is_unprocessable() {
    let (router, _, _) = build_router();

    let mut body = serde_json::to_value(submission()).expect("serialize submission");
    body["requester"] = serde_json::to_value(examiner()).expect("serialize requester");
    body["reference_date"] = json!("2025-08-05");
    body["answers"][2]
        .as_array_mut()
        .expect("language answers")
        .push(json!({ "item_id": 999, "month_age": 13, "passed": true }));

    let response = router
        .oneshot(post_json(
            "/api/v1/assessments",
            serde_json::to_vec(&body).expect("serialize body"),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("13"));
}

#[tokio::test]
async fn report_roundtrip_exposes_domain_detail() {
    let (router, service, _) = build_router();
    let record = service
        .submit(&examiner(), submission(), reference_date())
        .expect("submission succeeds");

    let uri = format!(
        "/api/v1/assessments/{}?requester_id=p-200&role=guardian",
        record.assessment_id
    );
    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("quotient"), Some(&json!(100.0)));
    assert_eq!(
        payload
            .get("domains")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(5)
    );
    assert_eq!(payload.get("test_age"), Some(&json!(10)));
}

#[tokio::test]
async fn report_of_unknown_assessment_is_not_found() {
    let (router, _, _) = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/assessments/dq-999999?requester_id=t-100&role=teacher")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn artifact_failure_maps_to_bad_gateway_with_the_id() {
    let (router, _, artifacts) = build_router();
    artifacts.fail_next();

    let response = router
        .oneshot(post_json("/api/v1/assessments", submit_body(examiner())))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert!(payload.get("assessment_id").is_some());
}

#[tokio::test]
async fn browse_endpoint_steps_forward_from_an_exact_bracket() {
    let (router, _, _) = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(
                    "/api/v1/catalog/items?requester_id=t-100&role=teacher\
                     &domain=gross_motor&month_age=9&direction=forward",
                )
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("month_age"), Some(&json!(10)));
    assert_eq!(
        payload.get("items").and_then(Value::as_array).map(Vec::len),
        Some(2)
    );
}

#[tokio::test]
async fn unknown_domain_label_is_unprocessable() {
    let (router, _, _) = build_router();

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/catalog/items?requester_id=t-100&role=teacher&domain=motor&month_age=9")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn repository_outage_maps_to_internal_error() {
    let artifacts = Arc::new(MemoryArtifacts::default());
    let service = Arc::new(AssessmentService::new(
        Arc::new(UnavailableRepository),
        artifacts,
        Arc::new(ItemCatalog::default()),
        ScoringConfig::standard(),
    ));
    let router = assessment_router(service);

    let response = router
        .oneshot(post_json("/api/v1/assessments", submit_body(examiner())))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
