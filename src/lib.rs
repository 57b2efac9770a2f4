pub mod booking;
pub mod config;
pub mod controllers;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use booking::SeatGrid;
use services::{catalog::Catalog, orders::OrderClient, sessions::BookingSessions};

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub catalog: Catalog,
    pub sessions: BookingSessions,
    pub orders: OrderClient,
}

impl AppState {
    /// Загружает каталог и собирает состояние.
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let catalog = Catalog::load(&config.catalog).await?;
        Ok(Self::with_catalog(config, catalog)?)
    }

    pub fn with_catalog(config: config::Config, catalog: Catalog) -> Result<Arc<Self>, reqwest::Error> {
        let grid = Arc::new(SeatGrid::generate(&config.booking.occupied_seats));
        info!(
            "Seat grid ready: {} seats, {} occupied",
            grid.seats().len(),
            grid.occupied().count()
        );

        let sessions = BookingSessions::new(grid, config.booking.max_tickets);
        let orders = OrderClient::from_config(&config.orders)?;

        Ok(Arc::new(Self {
            config,
            catalog,
            sessions,
            orders,
        }))
    }
}

/// Роутер приложения со всеми слоями.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(middleware::USER_ID_HEADER),
            HeaderName::from_static(middleware::USER_NAME_HEADER),
        ]);

    Router::new()
        .route("/", get(|| async { "Cinema Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
