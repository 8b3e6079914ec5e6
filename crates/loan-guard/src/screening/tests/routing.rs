use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::screening::router::{explain_handler, predict_handler};
use crate::screening::{screening_router, FEATURE_COUNT};

fn json_request(uri: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn healthy_payload() -> serde_json::Value {
    serde_json::to_value(healthy_record()).unwrap()
}

#[tokio::test]
async fn form_route_lists_options() {
    let router = screening_router(Arc::new(build_service(0.8)));

    let response = router
        .oneshot(
            Request::get("/api/v1/loan/form")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("education"),
        Some(&json!(["Graduate", "Not Graduate"]))
    );
}

#[tokio::test]
async fn predict_route_returns_report() {
    let router = screening_router(Arc::new(build_service(0.8)));

    let response = router
        .oneshot(json_request("/api/v1/loan/predict", &healthy_payload()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["prediction"]["label"], json!("legit"));
    assert_eq!(payload["probability_percent"], json!(80.0));
    assert_eq!(payload["band"], json!("low_risk"));
}

#[tokio::test]
async fn predict_route_rejects_unknown_category() {
    let router = screening_router(Arc::new(build_service(0.8)));
    let mut payload = healthy_payload();
    payload["property_area"] = json!("Suburban");

    let response = router
        .oneshot(json_request("/api/v1/loan/predict", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn predict_handler_returns_unprocessable_for_invalid_input() {
    let service = Arc::new(build_service(0.8));
    let mut record = healthy_record();
    record.credit_history = 4;

    let response = predict_handler::<FixedClassifier>(State(service), axum::Json(record)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("credit_history"));
}

#[tokio::test]
async fn predict_handler_returns_internal_error_for_broken_model() {
    let service = Arc::new(build_service_with(FixedClassifier {
        legit: 0.8,
        features: FEATURE_COUNT,
        classes: 1,
    }));

    let response =
        predict_handler::<FixedClassifier>(State(service), axum::Json(healthy_record())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn explain_handler_returns_advisories() {
    let service = Arc::new(build_service(0.8));
    let mut record = healthy_record();
    record.loan_amount = 200.0;

    let response = explain_handler::<FixedClassifier>(State(service), axum::Json(record)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["factors"], json!(["high_loan_amount"]));
}
