#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use cinema_booking::config::{AppConfig, BookingConfig, CatalogConfig, Config, OrdersConfig};
use cinema_booking::services::catalog::Catalog;
use cinema_booking::{app, AppState};

/// Конфигурация для тестов: встроенный каталог, зал по умолчанию.
pub fn test_config(orders_url: &str) -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            rust_log: "cinema_booking=debug".to_string(),
        },
        orders: OrdersConfig {
            url: orders_url.to_string(),
            timeout_seconds: 5,
        },
        catalog: CatalogConfig { url: None },
        booking: BookingConfig::default(),
    }
}

pub fn build_test_state(orders_url: &str) -> Arc<AppState> {
    AppState::with_catalog(test_config(orders_url), Catalog::builtin()).unwrap()
}

pub fn build_test_app(orders_url: &str) -> Router {
    app(build_test_state(orders_url))
}

/// Отправляет запрос и возвращает статус и JSON-тело (Null, если тело не JSON).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn choose_movie(app: &Router, user_id: i64, movie_id: u32) -> Value {
    let (status, view) = send(
        app,
        Method::POST,
        "/api/booking/movie",
        Some(user_id),
        Some(serde_json::json!({ "movieId": movie_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", view);
    view
}

pub async fn toggle_seat(app: &Router, user_id: i64, row: u8, number: u8) -> (StatusCode, Value) {
    send(
        app,
        Method::PATCH,
        "/api/booking/seats/toggle",
        Some(user_id),
        Some(serde_json::json!({ "row": row, "number": number })),
    )
    .await
}

pub async fn toggle_product(app: &Router, user_id: i64, product_id: u32) -> (StatusCode, Value) {
    send(
        app,
        Method::PATCH,
        "/api/booking/products/toggle",
        Some(user_id),
        Some(serde_json::json!({ "productId": product_id })),
    )
    .await
}
