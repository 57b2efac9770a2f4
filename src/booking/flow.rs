//! Сценарий одной попытки бронирования.
//!
//! ```text
//! Idle -> MovieChosen -> Selecting -> Submitting -> Confirmed
//!                            ^             |
//!                            +---- Failed -+
//! ```
//!
//! Оформление разбито на два шага: `begin_submission` переводит сценарий в
//! `Submitting` и отдаёт готовый запрос, `complete_submission` применяет ответ
//! сервиса заказов. Сетевой вызов между ними выполняет вызывающая сторона.
//! Каждая попытка помечена UUID: ответ на попытку, от которой пользователь уже
//! ушёл, игнорируется.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::draft::OrderDraft;
use super::grid::SeatGrid;
use super::pricing::PriceBreakdown;
use super::selection::{SeatToggle, SelectionError, SelectionState};
use crate::models::{Movie, OrderRequest, OrderSummary, SeatKey, Session};
use crate::services::orders::{OrderClient, OrderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    MovieChosen,
    Selecting,
    Submitting,
    Confirmed,
}

/// Временное уведомление для пользователя. Сбрасывается следующим действием.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    SeatUnavailable { seat: SeatKey },
    CapacityReached { max: usize },
    SubmissionFailed { message: String },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::SeatUnavailable { seat } => format!("{} уже занято", seat),
            Notice::CapacityReached { max } => format!("Максимум {} билетов за один заказ", max),
            Notice::SubmissionFailed { message } => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Фильм не выбран")]
    NoMovie,
    #[error("Заказ уже оформляется")]
    SubmissionInProgress,
    #[error("Заказ уже оформлен, вернитесь к выбору фильмов")]
    AlreadyConfirmed,
    #[error("Выберите минимум одно место")]
    EmptySelection,
    #[error("{0} отсутствует в зале")]
    UnknownSeat(SeatKey),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Данные для экрана подтверждения.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub movie_id: u32,
    pub movie_title: String,
    pub ticket_count: u32,
    pub summary: OrderSummary,
}

/// Запрос, готовый к отправке в сервис заказов.
#[derive(Debug, Clone)]
pub struct PendingOrder {
    pub attempt: Uuid,
    pub request: OrderRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Confirmed(Confirmation),
    Failed(Notice),
    /// Пользователь ушёл со страницы, пока запрос был в пути.
    Stale,
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Selecting {
        movie: Arc<Movie>,
        selection: SelectionState,
    },
    Submitting {
        movie: Arc<Movie>,
        selection: SelectionState,
        attempt: Uuid,
    },
    Confirmed {
        movie: Arc<Movie>,
        confirmation: Confirmation,
    },
}

#[derive(Debug, Clone)]
pub struct BookingFlow {
    grid: Arc<SeatGrid>,
    max_tickets: usize,
    state: State,
    notice: Option<Notice>,
}

impl BookingFlow {
    pub fn new(grid: Arc<SeatGrid>, max_tickets: usize) -> Self {
        Self {
            grid,
            max_tickets,
            state: State::Idle,
            notice: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::Idle => Phase::Idle,
            State::Selecting { selection, .. } if selection.is_empty() => Phase::MovieChosen,
            State::Selecting { .. } => Phase::Selecting,
            State::Submitting { .. } => Phase::Submitting,
            State::Confirmed { .. } => Phase::Confirmed,
        }
    }

    pub fn grid(&self) -> &SeatGrid {
        &self.grid
    }

    pub fn movie(&self) -> Option<&Arc<Movie>> {
        match &self.state {
            State::Idle => None,
            State::Selecting { movie, .. }
            | State::Submitting { movie, .. }
            | State::Confirmed { movie, .. } => Some(movie),
        }
    }

    /// Текущий выбор. После подтверждения заказа выбора уже нет.
    pub fn selection(&self) -> Option<&SelectionState> {
        match &self.state {
            State::Selecting { selection, .. } | State::Submitting { selection, .. } => Some(selection),
            _ => None,
        }
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        match &self.state {
            State::Confirmed { confirmation, .. } => Some(confirmation),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn price(&self) -> Option<PriceBreakdown> {
        match &self.state {
            State::Selecting { movie, selection } | State::Submitting { movie, selection, .. } => {
                Some(PriceBreakdown::compute(selection, movie))
            }
            _ => None,
        }
    }

    /// Кнопка оформления активна только при выбранных местах и без запроса в пути.
    pub fn can_submit(&self) -> bool {
        matches!(&self.state, State::Selecting { selection, .. } if selection.seat_count() > 0)
    }

    /// Начинает новую попытку с пустым выбором. `None` - возврат к каталогу.
    pub fn choose_movie(&mut self, movie: Option<Arc<Movie>>) {
        self.notice = None;
        if let State::Submitting { attempt, .. } = &self.state {
            debug!("Leaving booking while order attempt {} is in flight", attempt);
        }
        self.state = match movie {
            Some(movie) => {
                info!("Movie {} chosen for booking", movie.id);
                State::Selecting {
                    movie,
                    selection: SelectionState::new(self.max_tickets),
                }
            }
            None => State::Idle,
        };
    }

    pub fn back(&mut self) {
        self.choose_movie(None);
    }

    pub fn toggle_seat(&mut self, key: SeatKey) -> Result<SeatToggle, FlowError> {
        self.notice = None;
        let State::Selecting { selection, .. } = &mut self.state else {
            return Err(self.blocked());
        };
        let seat = self.grid.get(key).ok_or(FlowError::UnknownSeat(key))?;

        match selection.toggle_seat(seat) {
            Ok(SeatToggle::Unavailable) => {
                self.notice = Some(Notice::SeatUnavailable { seat: key });
                Ok(SeatToggle::Unavailable)
            }
            Ok(toggle) => Ok(toggle),
            Err(SelectionError::CapacityReached { max }) => {
                self.notice = Some(Notice::CapacityReached { max });
                Err(SelectionError::CapacityReached { max }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Возвращает true, если товар теперь выбран.
    pub fn toggle_product(&mut self, product_id: u32) -> Result<bool, FlowError> {
        self.notice = None;
        let State::Selecting { movie, selection } = &mut self.state else {
            return Err(self.blocked());
        };
        Ok(selection.toggle_product(movie, product_id)?)
    }

    /// Переводит сценарий в `Submitting`. Пустой выбор блокируется до отправки запроса.
    pub fn begin_submission(&mut self, session: &Session) -> Result<PendingOrder, FlowError> {
        self.notice = None;
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Selecting { movie, selection } => {
                if selection.seat_count() == 0 {
                    self.state = State::Selecting { movie, selection };
                    return Err(FlowError::EmptySelection);
                }

                let request = OrderDraft::compose(&selection, &movie).into_request(session, &movie);
                let attempt = Uuid::new_v4();
                info!(
                    "Submitting order attempt {}: user={}, movie={}, seats={}, products={}",
                    attempt,
                    session.user_id,
                    movie.id,
                    request.seats.len(),
                    request.products.len()
                );
                self.state = State::Submitting { movie, selection, attempt };
                Ok(PendingOrder { attempt, request })
            }
            other => {
                self.state = other;
                Err(self.blocked())
            }
        }
    }

    /// Применяет ответ сервиса заказов к попытке `attempt`.
    pub fn complete_submission(
        &mut self,
        attempt: Uuid,
        result: Result<OrderSummary, OrderError>,
    ) -> SubmissionOutcome {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Submitting { movie, selection, attempt: current } if current == attempt => match result {
                Ok(summary) => {
                    let ticket_count = summary
                        .ticket_count
                        .unwrap_or(selection.seat_count() as u32);
                    let confirmation = Confirmation {
                        movie_id: movie.id,
                        movie_title: movie.title.clone(),
                        ticket_count,
                        summary,
                    };
                    info!(
                        "Order {:?} confirmed for attempt {}: {} tickets, total {}",
                        confirmation.summary.order_id, attempt, ticket_count, confirmation.summary.total
                    );
                    // выбор сбрасывается вместе с переходом в Confirmed
                    self.state = State::Confirmed {
                        movie,
                        confirmation: confirmation.clone(),
                    };
                    SubmissionOutcome::Confirmed(confirmation)
                }
                Err(e) => {
                    warn!("Order attempt {} failed: {}", attempt, e);
                    let notice = Notice::SubmissionFailed {
                        message: e.user_message().to_string(),
                    };
                    self.state = State::Selecting { movie, selection };
                    self.notice = Some(notice.clone());
                    SubmissionOutcome::Failed(notice)
                }
            },
            other => {
                debug!("Ignoring result of stale order attempt {}", attempt);
                self.state = other;
                SubmissionOutcome::Stale
            }
        }
    }

    /// Оформление целиком, когда вызывающий владеет сценарием на всё время запроса.
    pub async fn submit(
        &mut self,
        client: &OrderClient,
        session: &Session,
    ) -> Result<SubmissionOutcome, FlowError> {
        let pending = self.begin_submission(session)?;
        let result = client.create_order(&pending.request).await;
        Ok(self.complete_submission(pending.attempt, result))
    }

    fn blocked(&self) -> FlowError {
        match &self.state {
            State::Idle => FlowError::NoMovie,
            State::Submitting { .. } => FlowError::SubmissionInProgress,
            State::Confirmed { .. } => FlowError::AlreadyConfirmed,
            State::Selecting { .. } => FlowError::SubmissionInProgress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExclusiveProduct;

    fn movie() -> Arc<Movie> {
        Arc::new(Movie {
            id: 1,
            title: "Мотоцикл в окне 2: Новогоднее чудо".into(),
            description: String::new(),
            price: 500,
            duration: "2ч 15мин".into(),
            exclusive_products: vec![ExclusiveProduct {
                id: 1,
                name: "3D очки".into(),
                price: 150,
                description: String::new(),
            }],
        })
    }

    fn flow() -> BookingFlow {
        BookingFlow::new(Arc::new(SeatGrid::generate(&[SeatKey::new(1, 5)])), 10)
    }

    fn summary(ticket_count: Option<u32>) -> OrderSummary {
        OrderSummary {
            order_id: Some(7),
            ticket_total: 1000,
            product_total: 150,
            total: 1150,
            session_date: None,
            ticket_count,
        }
    }

    fn selecting_two_seats_and_glasses() -> BookingFlow {
        let mut flow = flow();
        flow.choose_movie(Some(movie()));
        flow.toggle_seat(SeatKey::new(2, 1)).unwrap();
        flow.toggle_seat(SeatKey::new(2, 2)).unwrap();
        flow.toggle_product(1).unwrap();
        flow
    }

    #[test]
    fn starts_idle_and_moves_through_phases() {
        let mut flow = flow();
        assert_eq!(flow.phase(), Phase::Idle);
        assert!(flow.movie().is_none());

        flow.choose_movie(Some(movie()));
        assert_eq!(flow.phase(), Phase::MovieChosen);
        assert!(!flow.can_submit());

        flow.toggle_seat(SeatKey::new(1, 1)).unwrap();
        assert_eq!(flow.phase(), Phase::Selecting);
        assert!(flow.can_submit());

        flow.back();
        assert_eq!(flow.phase(), Phase::Idle);
    }

    #[test]
    fn actions_without_movie_are_rejected() {
        let mut flow = flow();
        assert_eq!(flow.toggle_seat(SeatKey::new(1, 1)), Err(FlowError::NoMovie));
        assert_eq!(flow.toggle_product(1), Err(FlowError::NoMovie));
        assert_eq!(flow.begin_submission(&Session::new(1)).unwrap_err(), FlowError::NoMovie);
    }

    #[test]
    fn occupied_seat_leaves_notice_and_no_selection() {
        let mut flow = flow();
        flow.choose_movie(Some(movie()));
        assert_eq!(flow.toggle_seat(SeatKey::new(1, 5)), Ok(SeatToggle::Unavailable));
        assert!(flow.selection().unwrap().seats().is_empty());
        assert_eq!(flow.notice(), Some(&Notice::SeatUnavailable { seat: SeatKey::new(1, 5) }));

        // следующее действие сбрасывает уведомление
        flow.toggle_seat(SeatKey::new(1, 1)).unwrap();
        assert!(flow.notice().is_none());
    }

    #[test]
    fn capacity_notice_is_raised() {
        let mut flow = flow();
        flow.choose_movie(Some(movie()));
        for number in 1..=10 {
            flow.toggle_seat(SeatKey::new(3, number)).unwrap();
        }
        assert_eq!(
            flow.toggle_seat(SeatKey::new(4, 1)),
            Err(FlowError::Selection(SelectionError::CapacityReached { max: 10 }))
        );
        assert_eq!(flow.notice(), Some(&Notice::CapacityReached { max: 10 }));
        assert_eq!(flow.selection().unwrap().seat_count(), 10);
    }

    #[test]
    fn unknown_seat_is_rejected() {
        let mut flow = flow();
        flow.choose_movie(Some(movie()));
        assert_eq!(
            flow.toggle_seat(SeatKey::new(9, 1)),
            Err(FlowError::UnknownSeat(SeatKey::new(9, 1)))
        );
    }

    #[test]
    fn price_follows_selection() {
        let flow = selecting_two_seats_and_glasses();
        assert_eq!(flow.price().unwrap().total, 1150);
    }

    #[test]
    fn empty_selection_is_blocked_before_request() {
        let mut flow = flow();
        flow.choose_movie(Some(movie()));
        flow.toggle_product(1).unwrap();
        assert_eq!(flow.begin_submission(&Session::new(1)).unwrap_err(), FlowError::EmptySelection);
        assert_eq!(flow.phase(), Phase::Selecting);
        assert_eq!(flow.selection().unwrap().products(), &[1]);
    }

    #[test]
    fn successful_submission_resets_selection_and_confirms() {
        let mut flow = selecting_two_seats_and_glasses();
        let pending = flow.begin_submission(&Session::new(42)).unwrap();
        assert_eq!(flow.phase(), Phase::Submitting);
        assert_eq!(pending.request.user_id, 42);
        assert_eq!(pending.request.seats, vec![SeatKey::new(2, 1), SeatKey::new(2, 2)]);
        assert_eq!(pending.request.products.len(), 1);
        assert_eq!(pending.request.ticket_price, 500);

        let outcome = flow.complete_submission(pending.attempt, Ok(summary(None)));
        let confirmation = match outcome {
            SubmissionOutcome::Confirmed(confirmation) => confirmation,
            other => panic!("expected confirmation, got {:?}", other),
        };
        assert_eq!(confirmation.ticket_count, 2);
        assert_eq!(confirmation.summary.order_id, Some(7));
        assert_eq!(flow.phase(), Phase::Confirmed);
        assert!(flow.selection().is_none());
        assert!(flow.price().is_none());
        assert!(!flow.can_submit());
    }

    #[test]
    fn explicit_ticket_count_from_server_wins() {
        let mut flow = selecting_two_seats_and_glasses();
        let pending = flow.begin_submission(&Session::new(42)).unwrap();
        flow.complete_submission(pending.attempt, Ok(summary(Some(5))));
        assert_eq!(flow.confirmation().unwrap().ticket_count, 5);
    }

    #[test]
    fn failed_submission_preserves_selection() {
        let mut flow = selecting_two_seats_and_glasses();
        let before = flow.selection().unwrap().clone();
        let pending = flow.begin_submission(&Session::new(42)).unwrap();

        let outcome = flow.complete_submission(
            pending.attempt,
            Err(OrderError::Rejected { status: 500, message: Some("boom".into()) }),
        );

        assert_eq!(
            outcome,
            SubmissionOutcome::Failed(Notice::SubmissionFailed { message: "Ошибка оформления заказа".into() })
        );
        assert_eq!(flow.phase(), Phase::Selecting);
        assert_eq!(flow.selection(), Some(&before));
        assert!(flow.can_submit());
    }

    #[test]
    fn second_submission_while_in_flight_is_rejected() {
        let mut flow = selecting_two_seats_and_glasses();
        let _pending = flow.begin_submission(&Session::new(42)).unwrap();
        assert_eq!(
            flow.begin_submission(&Session::new(42)).unwrap_err(),
            FlowError::SubmissionInProgress
        );
        assert_eq!(flow.toggle_seat(SeatKey::new(6, 6)), Err(FlowError::SubmissionInProgress));
        assert_eq!(flow.phase(), Phase::Submitting);
    }

    #[test]
    fn result_of_abandoned_attempt_is_ignored() {
        let mut flow = selecting_two_seats_and_glasses();
        let pending = flow.begin_submission(&Session::new(42)).unwrap();

        flow.choose_movie(Some(movie()));
        flow.toggle_seat(SeatKey::new(6, 1)).unwrap();

        assert_eq!(flow.complete_submission(pending.attempt, Ok(summary(None))), SubmissionOutcome::Stale);
        assert_eq!(flow.phase(), Phase::Selecting);
        assert_eq!(flow.selection().unwrap().seats(), &[SeatKey::new(6, 1)]);
    }

    #[test]
    fn confirmed_flow_restarts_with_new_movie() {
        let mut flow = selecting_two_seats_and_glasses();
        let pending = flow.begin_submission(&Session::new(42)).unwrap();
        flow.complete_submission(pending.attempt, Ok(summary(None)));

        assert_eq!(flow.toggle_seat(SeatKey::new(1, 1)), Err(FlowError::AlreadyConfirmed));

        flow.choose_movie(Some(movie()));
        assert_eq!(flow.phase(), Phase::MovieChosen);
    }
}
