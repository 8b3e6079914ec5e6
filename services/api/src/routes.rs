use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use loan_guard::screening::{screening_router, ProbabilisticClassifier};
use loan_guard::ScreeningService;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_screening_routes<C>(service: Arc<ScreeningService<C>>) -> axum::Router
where
    C: ProbabilisticClassifier + 'static,
{
    screening_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use loan_guard::screening::{FeatureEncoder, Predictor, RiskExplainer, RiskThresholds};
    use loan_guard::training::StandardScaler;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    struct ConstantClassifier;

    impl ProbabilisticClassifier for ConstantClassifier {
        fn n_features(&self) -> usize {
            loan_guard::screening::FEATURE_COUNT
        }

        fn n_classes(&self) -> usize {
            2
        }

        fn predict_proba(&self, _features: &[f64]) -> Vec<f64> {
            vec![0.25, 0.75]
        }
    }

    fn app(ready: bool) -> axum::Router {
        let scaler = StandardScaler::fit(&[vec![0.0; loan_guard::screening::FEATURE_COUNT]]);
        let predictor = Predictor::new(scaler, ConstantClassifier).expect("dimensions agree");
        let service = ScreeningService::new(
            FeatureEncoder::fixed(),
            predictor,
            RiskExplainer::new(RiskThresholds::default()),
        );
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_screening_routes(Arc::new(service)).layer(Extension(state))
    }

    async fn get(router: axum::Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .expect("route executes")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = get(app(false), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_tracks_flag() {
        assert_eq!(
            get(app(false), "/ready").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(get(app(true), "/ready").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_flag_flips_after_startup() {
        let flag = Arc::new(AtomicBool::new(false));
        let state = AppState {
            readiness: flag.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        flag.store(true, Ordering::Release);

        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_plain_text() {
        let response = get(app(true), "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn screening_routes_are_mounted() {
        let response = get(app(true), "/api/v1/loan/form").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload["dependents"], json!(["0", "1", "2", "3+"]));
    }
}
