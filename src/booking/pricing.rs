use serde::Serialize;

use super::selection::SelectionState;
use crate::models::Movie;

/// Стоимость заказа по составляющим.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriceBreakdown {
    pub tickets: u64,
    pub products: u64,
    pub total: u64,
}

impl PriceBreakdown {
    /// Пересчитывается заново при каждом изменении выбора, без кеширования.
    pub fn compute(selection: &SelectionState, movie: &Movie) -> Self {
        let tickets = selection.seat_count() as u64 * u64::from(movie.price);
        let products: u64 = selection
            .products()
            .iter()
            .map(|id| movie.product(*id).map_or(0, |p| u64::from(p.price)))
            .sum();

        Self {
            tickets,
            products,
            total: tickets + products,
        }
    }
}

/// Итоговая сумма: билеты по цене фильма плюс выбранные товары.
/// Товар, которого нет в каталоге фильма, даёт 0.
pub fn compute_total(selection: &SelectionState, movie: &Movie) -> u64 {
    PriceBreakdown::compute(selection, movie).total
}
