pub mod bookings;
pub mod movies;
pub mod orders;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(bookings::routes())
        .merge(orders::routes())
}
