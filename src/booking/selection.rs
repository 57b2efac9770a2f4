use std::collections::HashSet;
use std::hash::Hash;

use crate::models::{Movie, Seat, SeatKey};

/// Максимум билетов в одном заказе.
pub const MAX_TICKETS_PER_ORDER: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Максимум {max} билетов за один заказ")]
    CapacityReached { max: usize },
    #[error("Товар {product_id} недоступен для этого фильма")]
    UnknownProduct { product_id: u32 },
}

/// Результат переключения места.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatToggle {
    Added,
    Removed,
    /// Место занято, выбор не изменился.
    Unavailable,
}

/// Упорядоченное множество: порядок вставки + индекс для проверки членства за O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSet<T: Eq + Hash + Copy> {
    items: Vec<T>,
    index: HashSet<T>,
}

impl<T: Eq + Hash + Copy> OrderedSet<T> {
    pub fn new() -> Self {
        Self { items: Vec::new(), index: HashSet::new() }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index.contains(item)
    }

    /// Возвращает false, если элемент уже был в множестве.
    pub fn insert(&mut self, item: T) -> bool {
        if !self.index.insert(item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, item: &T) -> bool {
        if !self.index.remove(item) {
            return false;
        }
        self.items.retain(|i| i != item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Eq + Hash + Copy> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Выбор пользователя в рамках одной попытки бронирования.
///
/// Инварианты проверяются внутри операций переключения: места не повторяются,
/// занятые места не попадают в выбор, мест не больше `max_tickets`,
/// все товары есть в каталоге фильма.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    seats: OrderedSet<SeatKey>,
    products: OrderedSet<u32>,
    max_tickets: usize,
}

impl SelectionState {
    pub fn new(max_tickets: usize) -> Self {
        Self {
            seats: OrderedSet::new(),
            products: OrderedSet::new(),
            max_tickets,
        }
    }

    pub fn toggle_seat(&mut self, seat: &Seat) -> Result<SeatToggle, SelectionError> {
        if seat.occupied {
            return Ok(SeatToggle::Unavailable);
        }

        let key = seat.key();
        if self.seats.remove(&key) {
            return Ok(SeatToggle::Removed);
        }

        if self.seats.len() >= self.max_tickets {
            return Err(SelectionError::CapacityReached { max: self.max_tickets });
        }

        self.seats.insert(key);
        Ok(SeatToggle::Added)
    }

    /// Возвращает true, если товар теперь выбран.
    pub fn toggle_product(&mut self, movie: &Movie, product_id: u32) -> Result<bool, SelectionError> {
        if self.products.remove(&product_id) {
            return Ok(false);
        }
        if movie.product(product_id).is_none() {
            return Err(SelectionError::UnknownProduct { product_id });
        }
        self.products.insert(product_id);
        Ok(true)
    }

    pub fn is_seat_selected(&self, key: SeatKey) -> bool {
        self.seats.contains(&key)
    }

    pub fn is_product_selected(&self, product_id: u32) -> bool {
        self.products.contains(&product_id)
    }

    pub fn seats(&self) -> &[SeatKey] {
        self.seats.as_slice()
    }

    pub fn products(&self) -> &[u32] {
        self.products.as_slice()
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn max_tickets(&self) -> usize {
        self.max_tickets
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty() && self.products.is_empty()
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(MAX_TICKETS_PER_ORDER)
    }
}
