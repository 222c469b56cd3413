//! HTTP error mapping

use crate::error::ChurnError;
use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The pipeline rejected the request or failed while scoring it
    Prediction(ChurnError),
    /// The request body could not be decoded into a customer record
    Rejected { status: StatusCode, message: String },
    /// The blocking prediction task did not complete
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Prediction(e) if e.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Rejected { status, .. } => *status,
            AppError::Prediction(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user
    pub fn message(&self) -> String {
        match self {
            AppError::Prediction(e) => e.to_string(),
            AppError::Rejected { message, .. } => message.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Prediction(e) => e.kind(),
            AppError::Rejected { .. } => "invalid_request",
            AppError::Internal(_) => "internal",
        }
    }

    /// Log deployment-side failures; client errors are only traced at debug level
    pub fn log(&self) {
        match self {
            AppError::Prediction(e) if e.is_client_error() => {
                tracing::debug!(error = %e, "Prediction request rejected")
            }
            AppError::Rejected { message, .. } => {
                tracing::debug!(error = %message, "Request body rejected")
            }
            AppError::Prediction(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Error during prediction")
            }
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();

        let body = Json(json!({
            "error": self.message(),
            "kind": self.kind(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ChurnError> for AppError {
    fn from(err: ChurnError) -> Self {
        AppError::Prediction(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("prediction task failed: {}", err))
    }
}
