//! HTTP handlers

use super::error::{AppError, AppResult};
use super::render::{self, Outcome};
use super::AppState;
use crate::error::Result;
use crate::metrics::MetricsSnapshot;
use crate::models::ModelInfo;
use crate::types::customer::{parse_toggle, CustomerRecord};
use crate::types::prediction::PredictionResult;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    response::Html,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// URL-encoded form submission; toggles arrive as `Yes`/`No`
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerForm {
    pub geography: String,
    pub gender: String,
    pub age: u32,
    pub credit_score: i32,
    pub balance: f64,
    pub estimated_salary: f64,
    pub tenure: u32,
    pub num_of_products: u32,
    pub has_cr_card: String,
    pub is_active_member: String,
}

impl CustomerForm {
    pub fn into_record(self) -> Result<CustomerRecord> {
        Ok(CustomerRecord {
            has_cr_card: parse_toggle("has_cr_card", &self.has_cr_card)?,
            is_active_member: parse_toggle("is_active_member", &self.is_active_member)?,
            credit_score: self.credit_score,
            geography: self.geography,
            gender: self.gender,
            age: self.age,
            tenure: self.tenure,
            balance: self.balance,
            num_of_products: self.num_of_products,
            estimated_salary: self.estimated_salary,
        })
    }

    /// Submitted values for re-rendering the form; unreadable toggles show as `Yes`
    pub fn display_record(&self) -> CustomerRecord {
        CustomerRecord {
            has_cr_card: parse_toggle("has_cr_card", &self.has_cr_card).unwrap_or(true),
            is_active_member: parse_toggle("is_active_member", &self.is_active_member).unwrap_or(true),
            credit_score: self.credit_score,
            geography: self.geography.clone(),
            gender: self.gender.clone(),
            age: self.age,
            tenure: self.tenure,
            balance: self.balance,
            num_of_products: self.num_of_products,
            estimated_salary: self.estimated_salary,
        }
    }
}

/// Log and count a rejected request, then render it back as an error banner
fn error_page(state: &AppState, record: &CustomerRecord, err: AppError) -> (StatusCode, Html<String>) {
    err.log();
    state.metrics.record_failure(err.kind());
    let html = render::page(&state.predictor, record, Outcome::Error(&err.message()));
    (err.status(), Html(html))
}

/// Score a record on the blocking pool and record metrics
async fn run_prediction(state: &AppState, record: CustomerRecord) -> AppResult<PredictionResult> {
    let start = Instant::now();
    let predictor = state.predictor.clone();

    let outcome = tokio::task::spawn_blocking(move || predictor.predict(&record))
        .await
        .map_err(AppError::from)
        .and_then(|r| r.map_err(AppError::from));

    match &outcome {
        Ok(result) => {
            let elapsed = start.elapsed();
            state.metrics.record_prediction(
                elapsed,
                result.probability,
                result.will_churn,
                result.risk_level.as_str(),
            );
            info!(
                prediction_id = %result.prediction_id,
                probability = result.probability,
                will_churn = result.will_churn,
                processing_time_us = elapsed.as_micros() as u64,
                "Prediction served"
            );
        }
        Err(e) => state.metrics.record_failure(e.kind()),
    }

    outcome
}

/// Form page with defaults
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render::page(&state.predictor, &state.default_record(), Outcome::Empty))
}

/// Form submission, rendered back with the result panel
pub async fn predict_form(
    State(state): State<AppState>,
    form: std::result::Result<Form<CustomerForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return error_page(&state, &state.default_record(), rejection.into()),
    };

    let display = form.display_record();
    let record = match form.into_record() {
        Ok(record) => record,
        Err(e) => return error_page(&state, &display, e.into()),
    };

    match run_prediction(&state, record.clone()).await {
        Ok(result) => {
            let html = render::page(&state.predictor, &record, Outcome::Prediction(&result));
            (StatusCode::OK, Html(html))
        }
        Err(err) => {
            err.log();
            let html = render::page(&state.predictor, &record, Outcome::Error(&err.message()));
            (err.status(), Html(html))
        }
    }
}

/// JSON prediction endpoint
pub async fn predict_api(
    State(state): State<AppState>,
    record: std::result::Result<Json<CustomerRecord>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    let Json(record) = record.map_err(|rejection| {
        let err = AppError::from(rejection);
        state.metrics.record_failure(err.kind());
        err
    })?;
    let result = run_prediction(&state, record).await?;
    Ok(Json(result))
}

/// Loaded pipeline description
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.predictor.info())
}

/// Metrics snapshot
pub async fn stats(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    classifier: String,
    timestamp: i64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        classifier: state.predictor.classifier_name().to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
