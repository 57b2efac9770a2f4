use super::pricing::PriceBreakdown;
use super::selection::SelectionState;
use crate::models::{ExclusiveProduct, Movie, OrderRequest, SeatKey, Session};

/// Черновик заказа, собираемый из выбора в момент оформления. Нигде не хранится.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub seats: Vec<SeatKey>,
    pub products: Vec<ExclusiveProduct>,
    pub ticket_price: u32,
    pub price: PriceBreakdown,
}

impl OrderDraft {
    pub fn compose(selection: &SelectionState, movie: &Movie) -> Self {
        // отсутствующие в каталоге id просто пропускаются
        let products = selection
            .products()
            .iter()
            .filter_map(|id| movie.product(*id).cloned())
            .collect();

        Self {
            seats: selection.seats().to_vec(),
            products,
            ticket_price: movie.price,
            price: PriceBreakdown::compute(selection, movie),
        }
    }

    pub fn into_request(self, session: &Session, movie: &Movie) -> OrderRequest {
        OrderRequest {
            user_id: session.user_id,
            movie_id: movie.id,
            movie_title: movie.title.clone(),
            seats: self.seats,
            products: self.products,
            ticket_price: self.ticket_price,
        }
    }
}
