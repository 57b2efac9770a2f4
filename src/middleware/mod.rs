use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::error::AppError;
use crate::models::Session;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Сессия пользователя из заголовков запроса.
///
/// Вход и выдача идентификатора - забота внешнего сервиса авторизации,
/// здесь идентификатор принимается как есть.
#[derive(Debug, Clone)]
pub struct SessionUser(pub Session);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from_headers(&parts.headers).map(SessionUser)
    }
}

fn session_from_headers(headers: &HeaderMap) -> Result<Session, AppError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Войдите, чтобы забронировать билеты".to_string()))?
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized("Некорректный идентификатор пользователя".to_string()))?;

    // имя опционально и нужно только для логов
    let display_name = headers
        .get(USER_NAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    Ok(Session { user_id, display_name })
}
