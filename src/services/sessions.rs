use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::booking::{BookingFlow, Phase, SeatGrid};

/// Сценарии бронирования по пользователям. Хранятся только в памяти процесса.
///
/// В таблице живут только начатые сценарии: чтение её не пополняет, а сценарий,
/// вернувшийся в Idle, удаляется через `release_if_idle`.
#[derive(Clone)]
pub struct BookingSessions {
    grid: Arc<SeatGrid>,
    max_tickets: usize,
    flows: Arc<Mutex<HashMap<i64, Arc<Mutex<BookingFlow>>>>>,
}

impl BookingSessions {
    pub fn new(grid: Arc<SeatGrid>, max_tickets: usize) -> Self {
        Self {
            grid,
            max_tickets,
            flows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn grid(&self) -> &Arc<SeatGrid> {
        &self.grid
    }

    /// Свежий сценарий в состоянии Idle, не привязанный к пользователю.
    pub fn idle_flow(&self) -> BookingFlow {
        BookingFlow::new(self.grid.clone(), self.max_tickets)
    }

    /// Начатый сценарий пользователя, если он есть.
    pub async fn get(&self, user_id: i64) -> Option<Arc<Mutex<BookingFlow>>> {
        self.flows.lock().await.get(&user_id).cloned()
    }

    /// Сценарий пользователя; создаётся при первом выборе фильма.
    pub async fn open(&self, user_id: i64) -> Arc<Mutex<BookingFlow>> {
        let mut flows = self.flows.lock().await;
        flows
            .entry(user_id)
            .or_insert_with(|| {
                debug!("Opening booking flow for user {}", user_id);
                Arc::new(Mutex::new(self.idle_flow()))
            })
            .clone()
    }

    /// Удаляет сценарий, вернувшийся в Idle. Сценарий, которым сейчас кто-то
    /// владеет (обработчик или задача оформления), остаётся на месте.
    pub async fn release_if_idle(&self, user_id: i64) -> bool {
        let mut flows = self.flows.lock().await;
        let Some(flow) = flows.get(&user_id) else {
            return false;
        };
        if Arc::strong_count(flow) > 1 {
            return false;
        }
        let idle = flow.try_lock().is_ok_and(|flow| flow.phase() == Phase::Idle);
        if idle {
            flows.remove(&user_id);
            debug!("Released idle booking flow for user {}", user_id);
        }
        idle
    }

    pub async fn len(&self) -> usize {
        self.flows.lock().await.len()
    }
}
