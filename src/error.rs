use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::booking::{FlowError, SelectionError};
use crate::services::orders::OrderError;

/// Ошибки HTTP-слоя. Тело ответа всегда `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Order(#[from] OrderError),
    /// Сервис заказов не оформил заказ; текст уже подготовлен для пользователя.
    #[error("{0}")]
    SubmissionFailed(String),
    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),
    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Flow(e) => match e {
                FlowError::NoMovie => StatusCode::CONFLICT,
                FlowError::SubmissionInProgress | FlowError::AlreadyConfirmed => StatusCode::CONFLICT,
                FlowError::EmptySelection => StatusCode::UNPROCESSABLE_ENTITY,
                FlowError::UnknownSeat(_) => StatusCode::NOT_FOUND,
                FlowError::Selection(SelectionError::CapacityReached { .. }) => StatusCode::CONFLICT,
                FlowError::Selection(SelectionError::UnknownProduct { .. }) => StatusCode::NOT_FOUND,
            },
            AppError::Order(_) | AppError::SubmissionFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Order(e) => {
                tracing::error!("Order service error: {}", e);
                e.user_message().to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
