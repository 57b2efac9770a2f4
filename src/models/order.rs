use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ExclusiveProduct, SeatKey};

/// Тело запроса на создание заказа.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: i64,
    pub movie_id: u32,
    pub movie_title: String,
    pub seats: Vec<SeatKey>,
    pub products: Vec<ExclusiveProduct>,
    pub ticket_price: u32,
}

/// Ответ сервиса заказов при успешном оформлении.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Любой 2xx с JSON-телом - созданный заказ, даже если номер не пришёл.
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub ticket_total: u64,
    #[serde(default)]
    pub product_total: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub session_date: Option<NaiveDateTime>,
    /// Явное количество билетов. Старые версии сервиса его не присылают.
    #[serde(default)]
    pub ticket_count: Option<u32>,
}

/// Строка истории заказов пользователя.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    pub movie_id: Option<u32>,
    pub movie_title: Option<String>,
    // Сервис может вернуть места как JSON-массив или как строку с JSON
    #[serde(default)]
    pub seats: serde_json::Value,
    #[serde(default)]
    pub total_price: Option<u64>,
    #[serde(default)]
    pub session_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub purchased_products: serde_json::Value,
}
