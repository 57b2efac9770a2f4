use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::error::AppResult;
use crate::middleware::SessionUser;
use crate::models::OrderRecord;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/orders", get(list_orders))
}

// GET /api/orders - история заказов текущего пользователя
async fn list_orders(
    State(state): State<Arc<AppState>>,
    SessionUser(session): SessionUser,
) -> AppResult<Json<Vec<OrderRecord>>> {
    let orders = state.orders.list_orders(session.user_id).await?;
    Ok(Json(orders))
}
