use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::Movie;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/{id}", get(get_movie))
}

// GET /api/movies
async fn list_movies(State(state): State<Arc<AppState>>) -> Json<Vec<Movie>> {
    Json(state.catalog.movies().iter().map(|m| m.as_ref().clone()).collect())
}

// GET /api/movies/{id}
async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> AppResult<Json<Movie>> {
    state
        .catalog
        .find(id)
        .map(|m| Json(m.as_ref().clone()))
        .ok_or_else(|| AppError::NotFound(format!("Фильм {} не найден", id)))
}
