use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::ApplicantRecord;
use super::predictor::ProbabilisticClassifier;
use super::service::{FormOptions, ScreeningError, ScreeningService};

/// Router builder exposing the intake form options, prediction, and explanation endpoints.
pub fn screening_router<C>(service: Arc<ScreeningService<C>>) -> Router
where
    C: ProbabilisticClassifier + 'static,
{
    Router::new()
        .route("/api/v1/loan/form", get(form_handler))
        .route("/api/v1/loan/predict", post(predict_handler::<C>))
        .route("/api/v1/loan/explain", post(explain_handler::<C>))
        .with_state(service)
}

pub(crate) async fn form_handler() -> Response {
    (StatusCode::OK, axum::Json(FormOptions::standard())).into_response()
}

pub(crate) async fn predict_handler<C>(
    State(service): State<Arc<ScreeningService<C>>>,
    axum::Json(record): axum::Json<ApplicantRecord>,
) -> Response
where
    C: ProbabilisticClassifier + 'static,
{
    match service.screen(&record) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn explain_handler<C>(
    State(service): State<Arc<ScreeningService<C>>>,
    axum::Json(record): axum::Json<ApplicantRecord>,
) -> Response
where
    C: ProbabilisticClassifier + 'static,
{
    match service.explain(&record) {
        Ok(explanation) => (StatusCode::OK, axum::Json(explanation)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScreeningError) -> Response {
    let status = match error {
        ScreeningError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningError::Encoding(_)
        | ScreeningError::Prediction(_)
        | ScreeningError::Artifact(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
