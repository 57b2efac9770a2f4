//! orders.rs
//!
//! Клиент внешнего сервиса заказов.
//!
//! Один запрос - один ответ: повторов и ключа идемпотентности нет, поэтому
//! повторная отправка после сетевой ошибки может создать дубль заказа.

use reqwest::StatusCode;
use serde::Deserialize;
use tokio::time::Duration;
use tracing::{error, info, warn};

use crate::config::OrdersConfig;
use crate::models::{OrderRecord, OrderRequest, OrderSummary};

/// Ошибки обращения к сервису заказов.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Сервис ответил не-2xx статусом; `message` - поле `error` из тела, если оно было.
    #[error("order service responded with {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Rejected { status: u16, message: Option<String> },
    /// Запрос не дошёл до сервиса или ответ не был получен.
    #[error("order service is unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// 2xx, но тело не удалось разобрать.
    #[error("order service returned an unreadable body: {0}")]
    InvalidResponse(String),
}

impl OrderError {
    /// Текст, который видит пользователь.
    pub fn user_message(&self) -> &'static str {
        match self {
            // нечитаемый ответ клиент видит так же, как обрыв связи
            OrderError::Transport(_) | OrderError::InvalidResponse(_) => "Ошибка подключения к серверу",
            OrderError::Rejected { .. } => "Ошибка оформления заказа",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP-клиент сервиса заказов.
#[derive(Clone)]
pub struct OrderClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl OrderClient {
    pub fn from_config(config: &OrdersConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: config.url.clone(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Создаёт заказ. Успех - только 2xx с разбираемым телом.
    pub async fn create_order(&self, request: &OrderRequest) -> Result<OrderSummary, OrderError> {
        info!(
            "Creating order: user={}, movie={}, seats={}",
            request.user_id,
            request.movie_id,
            request.seats.len()
        );

        let response = self
            .http_client
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Order service request failed: {:?}", e);
                OrderError::Transport(e)
            })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(rejected(status, &body));
        }

        serde_json::from_slice::<OrderSummary>(&body).map_err(|e| {
            warn!("Order service returned {} with unreadable body: {}", status, e);
            OrderError::InvalidResponse(e.to_string())
        })
    }

    /// История заказов пользователя, от новых к старым.
    pub async fn list_orders(&self, user_id: i64) -> Result<Vec<OrderRecord>, OrderError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("userId", user_id)])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(rejected(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| OrderError::InvalidResponse(e.to_string()))
    }
}

fn rejected(status: StatusCode, body: &[u8]) -> OrderError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error);
    warn!(
        "Order service rejected request with {}: {}",
        status,
        message.as_deref().unwrap_or("-")
    );
    OrderError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_distinguish_rejection_from_broken_response() {
        let rejected = OrderError::Rejected { status: 400, message: Some("Заполните все поля".into()) };
        assert_eq!(rejected.user_message(), "Ошибка оформления заказа");
        assert_eq!(rejected.to_string(), "order service responded with 400: Заполните все поля");

        let invalid = OrderError::InvalidResponse("eof".into());
        assert_eq!(invalid.user_message(), "Ошибка подключения к серверу");
    }

    #[test]
    fn rejected_reads_error_field_when_present() {
        match rejected(StatusCode::BAD_REQUEST, r#"{"error":"userId обязателен"}"#.as_bytes()) {
            OrderError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("userId обязателен"));
            }
            other => panic!("unexpected {:?}", other),
        }
        match rejected(StatusCode::BAD_GATEWAY, b"<html>") {
            OrderError::Rejected { message, .. } => assert!(message.is_none()),
            other => panic!("unexpected {:?}", other),
        }
    }
}
