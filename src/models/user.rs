use serde::{Deserialize, Serialize};

/// Сессия пользователя, явно передаваемая в сценарий бронирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: i64,
    pub display_name: Option<String>,
}

impl Session {
    pub fn new(user_id: i64) -> Self {
        Self { user_id, display_name: None }
    }
}
