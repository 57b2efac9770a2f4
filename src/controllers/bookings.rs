use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use validator::Validate;

use crate::booking::{BookingFlow, BookingView, FlowError, SubmissionOutcome};
use crate::error::{AppError, AppResult};
use crate::middleware::SessionUser;
use crate::models::SeatKey;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/booking", get(get_booking))
        .route("/booking/movie", post(choose_movie))
        .route("/booking/seats/toggle", patch(toggle_seat))
        .route("/booking/products/toggle", patch(toggle_product))
        .route("/booking/submit", post(submit_order))
        .route("/booking/back", post(go_back))
}

// Без выбранного фильма действовать не с чем
async fn started_flow(state: &AppState, user_id: i64) -> AppResult<Arc<Mutex<BookingFlow>>> {
    state
        .sessions
        .get(user_id)
        .await
        .ok_or(AppError::Flow(FlowError::NoMovie))
}

// GET /api/booking
async fn get_booking(
    State(state): State<Arc<AppState>>,
    SessionUser(session): SessionUser,
) -> AppResult<Json<BookingView>> {
    let view = match state.sessions.get(session.user_id).await {
        Some(flow) => {
            let flow = flow.lock().await;
            BookingView::render(&flow)
        }
        None => BookingView::render(&state.sessions.idle_flow()),
    };
    Ok(Json(view))
}

// POST /api/booking/movie
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChooseMovieRequest {
    /// null - вернуться к каталогу
    movie_id: Option<u32>,
}

async fn choose_movie(
    State(state): State<Arc<AppState>>,
    SessionUser(session): SessionUser,
    payload: Result<Json<ChooseMovieRequest>, JsonRejection>,
) -> AppResult<Json<BookingView>> {
    let Json(req) = payload?;
    let Some(id) = req.movie_id else {
        return leave_booking(&state, session.user_id).await;
    };
    let movie = state
        .catalog
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("Фильм {} не найден", id)))?;

    let flow = state.sessions.open(session.user_id).await;
    let mut flow = flow.lock().await;
    flow.choose_movie(Some(movie));
    Ok(Json(BookingView::render(&flow)))
}

// PATCH /api/booking/seats/toggle
#[derive(Debug, Deserialize, Validate)]
struct ToggleSeatRequest {
    #[validate(range(min = 1, max = 6, message = "row должен быть от 1 до 6"))]
    row: u8,
    #[validate(range(min = 1, max = 10, message = "number должен быть от 1 до 10"))]
    number: u8,
}

async fn toggle_seat(
    State(state): State<Arc<AppState>>,
    SessionUser(session): SessionUser,
    payload: Result<Json<ToggleSeatRequest>, JsonRejection>,
) -> AppResult<Json<BookingView>> {
    let Json(req) = payload?;
    req.validate()?;

    let flow = started_flow(&state, session.user_id).await?;
    let mut flow = flow.lock().await;
    flow.toggle_seat(SeatKey::new(req.row, req.number))?;
    Ok(Json(BookingView::render(&flow)))
}

// PATCH /api/booking/products/toggle
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleProductRequest {
    product_id: u32,
}

async fn toggle_product(
    State(state): State<Arc<AppState>>,
    SessionUser(session): SessionUser,
    payload: Result<Json<ToggleProductRequest>, JsonRejection>,
) -> AppResult<Json<BookingView>> {
    let Json(req) = payload?;

    let flow = started_flow(&state, session.user_id).await?;
    let mut flow = flow.lock().await;
    flow.toggle_product(req.product_id)?;
    Ok(Json(BookingView::render(&flow)))
}

// POST /api/booking/submit
async fn submit_order(
    State(state): State<Arc<AppState>>,
    SessionUser(session): SessionUser,
) -> AppResult<(StatusCode, Json<BookingView>)> {
    let flow = started_flow(&state, session.user_id).await?;
    let pending = flow.lock().await.begin_submission(&session)?;

    // Запрос выполняется в отдельной задаче без блокировки сценария:
    // обрыв соединения с клиентом его не отменяет. Экран рисуется под той же
    // блокировкой, что и применение ответа.
    let orders = state.orders.clone();
    let task_flow = flow.clone();
    let (outcome, view) = tokio::spawn(async move {
        let result = orders.create_order(&pending.request).await;
        let mut flow = task_flow.lock().await;
        let outcome = flow.complete_submission(pending.attempt, result);
        let view = BookingView::render(&flow);
        (outcome, view)
    })
    .await
    .map_err(|e| AppError::Internal(format!("order submission task failed: {}", e)))?;

    // пользователь мог уйти со страницы, пока запрос был в пути
    drop(flow);
    state.sessions.release_if_idle(session.user_id).await;

    match outcome {
        SubmissionOutcome::Confirmed(_) => Ok((StatusCode::CREATED, Json(view))),
        SubmissionOutcome::Failed(notice) => Err(AppError::SubmissionFailed(notice.message())),
        SubmissionOutcome::Stale => Err(AppError::Conflict(
            "Бронирование было сброшено до получения ответа".to_string(),
        )),
    }
}

// POST /api/booking/back
async fn go_back(
    State(state): State<Arc<AppState>>,
    SessionUser(session): SessionUser,
) -> AppResult<Json<BookingView>> {
    leave_booking(&state, session.user_id).await
}

async fn leave_booking(state: &AppState, user_id: i64) -> AppResult<Json<BookingView>> {
    let view = match state.sessions.get(user_id).await {
        Some(flow) => {
            let mut flow = flow.lock().await;
            flow.back();
            BookingView::render(&flow)
        }
        None => BookingView::render(&state.sessions.idle_flow()),
    };
    state.sessions.release_if_idle(user_id).await;
    Ok(Json(view))
}
