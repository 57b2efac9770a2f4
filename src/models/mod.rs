pub mod movie;
pub mod order;
pub mod seat;
pub mod user;

pub use movie::{ExclusiveProduct, Movie};
pub use order::{OrderRecord, OrderRequest, OrderSummary};
pub use seat::{Seat, SeatKey};
pub use user::Session;
