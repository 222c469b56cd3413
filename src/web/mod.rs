//! HTTP surface: form page, JSON API, health and stats

pub mod error;
pub mod handlers;
pub mod render;

pub use error::{AppError, AppResult};

use crate::metrics::PredictionMetrics;
use crate::models::ChurnPredictor;
use crate::types::customer::CustomerRecord;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<ChurnPredictor>,
    pub metrics: Arc<PredictionMetrics>,
}

impl AppState {
    pub fn new(predictor: Arc<ChurnPredictor>, metrics: Arc<PredictionMetrics>) -> Self {
        Self { predictor, metrics }
    }

    /// Record the empty form is pre-filled with
    pub fn default_record(&self) -> CustomerRecord {
        let assembler = self.predictor.assembler();
        CustomerRecord::from_defaults(
            self.predictor.input_ranges(),
            assembler.geography_categories().first().map(String::as_str).unwrap_or_default(),
            assembler.gender_classes().first().map(String::as_str).unwrap_or_default(),
        )
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict_form))
        .route("/health", get(handlers::health))
        .route("/api/v1/predict", post(handlers::predict_api))
        .route("/api/v1/model", get(handlers::model_info))
        .route("/api/v1/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{reference_predictor, REFERENCE_PROBABILITY};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(reference_predictor()),
            Arc::new(PredictionMetrics::new()),
        )
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "credit_score": 650,
            "geography": "France",
            "gender": "Female",
            "age": 40,
            "tenure": 3,
            "balance": 60000.0,
            "num_of_products": 2,
            "has_cr_card": true,
            "is_active_member": true,
            "estimated_salary": 50000.0
        })
    }

    const SAMPLE_FORM: &str = "geography=France&gender=Female&age=40&credit_score=650\
        &balance=60000&estimated_salary=50000&tenure=3&num_of_products=2\
        &has_cr_card=Yes&is_active_member=Yes";

    #[tokio::test]
    async fn test_index_renders_form() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<form class=\"sidebar\" method=\"post\" action=\"/predict\">"));
        assert!(html.contains("Predict Churn"));
    }

    #[tokio::test]
    async fn test_api_predict() {
        let state = test_state();
        let app = create_router(state.clone());
        let response = app
            .oneshot(json_request("/api/v1/predict", sample_json()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let probability = body["probability"].as_f64().unwrap();
        assert!((probability - REFERENCE_PROBABILITY).abs() < 1e-12);
        assert_eq!(body["will_churn"], false);
        assert_eq!(body["risk_level"], "low");
        assert_eq!(state.metrics.predictions_served.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_api_unknown_geography_is_unprocessable() {
        let state = test_state();
        let app = create_router(state.clone());
        let mut record = sample_json();
        record["geography"] = serde_json::json!("Narnia");

        let response = app.oneshot(json_request("/api/v1/predict", record)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["kind"], "unknown_category");
        assert_eq!(state.metrics.failures.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_form_predict_renders_result() {
        let app = create_router(test_state());
        let response = app.oneshot(form_request(SAMPLE_FORM)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("LOW RISK - Customer is unlikely to churn"));
        assert!(html.contains("17.12%"));
    }

    #[tokio::test]
    async fn test_form_bad_toggle_renders_error() {
        let app = create_router(test_state());
        let body = SAMPLE_FORM.replace("has_cr_card=Yes", "has_cr_card=Perhaps");
        let response = app.oneshot(form_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_string(response).await;
        assert!(html.contains("has_cr_card must be Yes or No"));
    }

    #[tokio::test]
    async fn test_api_missing_field_returns_json_error() {
        let state = test_state();
        let app = create_router(state.clone());
        let body = serde_json::json!({ "geography": "France" });

        let response = app.oneshot(json_request("/api/v1/predict", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["kind"], "invalid_request");
        assert_eq!(body["status"], 422);
        assert!(body["error"].as_str().unwrap().contains("credit_score"));
        assert_eq!(state.metrics.failures.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_form_undecodable_number_renders_error_page() {
        let state = test_state();
        let app = create_router(state.clone());
        let body = SAMPLE_FORM.replace("age=40", "age=-5");

        let response = app.oneshot(form_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let html = body_string(response).await;
        assert!(html.contains("<form class=\"sidebar\""));
        assert!(html.contains("Failed to deserialize form body"));
        assert_eq!(state.metrics.failures.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_form_bad_toggle_keeps_submitted_values() {
        let app = create_router(test_state());
        let body = SAMPLE_FORM
            .replace("has_cr_card=Yes", "has_cr_card=Perhaps")
            .replace("credit_score=650", "credit_score=720")
            .replace("is_active_member=Yes", "is_active_member=No");

        let response = app.oneshot(form_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_string(response).await;
        assert!(html.contains("name=\"credit_score\" min=\"300\" max=\"850\" step=\"1\" value=\"720\""));
        assert!(html.contains("name=\"is_active_member\" value=\"No\" checked"));
    }

    #[tokio::test]
    async fn test_form_out_of_range_renders_error() {
        let app = create_router(test_state());
        let body = SAMPLE_FORM.replace("age=40", "age=140");
        let response = app.oneshot(form_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_string(response).await.contains("outside the accepted range"));
    }

    #[tokio::test]
    async fn test_model_info_and_health() {
        let app = create_router(test_state());
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/v1/model").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let info: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(info["feature_columns"].as_array().unwrap().len(), 12);
        assert_eq!(info["feature_columns"][1], "Geography_France");
        assert_eq!(info["threshold"], 0.5);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let health: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(health["status"], "healthy");
    }
}
