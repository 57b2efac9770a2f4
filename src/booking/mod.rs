//! Ядро бронирования: схема зала, выбор мест и товаров, расчёт стоимости
//! и сценарий оформления заказа.

pub mod draft;
pub mod flow;
pub mod grid;
pub mod pricing;
pub mod selection;
pub mod view;

pub use draft::OrderDraft;
pub use flow::{BookingFlow, Confirmation, FlowError, Notice, PendingOrder, Phase, SubmissionOutcome};
pub use grid::SeatGrid;
pub use pricing::{compute_total, PriceBreakdown};
pub use selection::{SeatToggle, SelectionError, SelectionState};
pub use view::BookingView;
