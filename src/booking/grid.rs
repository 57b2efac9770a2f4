use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::models::{Seat, SeatKey};

pub const ROWS: u8 = 6;
pub const SEATS_PER_ROW: u8 = 10;

/// Места, занятые в зале на момент открытия продаж.
pub const DEFAULT_OCCUPIED: [SeatKey; 7] = [
    SeatKey::new(1, 5),
    SeatKey::new(2, 3),
    SeatKey::new(2, 4),
    SeatKey::new(3, 7),
    SeatKey::new(4, 2),
    SeatKey::new(5, 6),
    SeatKey::new(5, 8),
];

/// Схема зала. Занятость фиксируется при создании и дальше не меняется.
#[derive(Debug, Clone)]
pub struct SeatGrid {
    seats: Vec<Seat>,
    index: HashMap<SeatKey, usize>,
}

impl SeatGrid {
    /// Строит сетку ROWS x SEATS_PER_ROW, помечая занятыми места из `occupied`.
    pub fn generate(occupied: &[SeatKey]) -> Self {
        let occupied: HashSet<SeatKey> = occupied.iter().copied().collect();

        for key in &occupied {
            if !Self::in_bounds(*key) {
                warn!("Occupied seat {:?} is outside of the {}x{} hall, ignored", key, ROWS, SEATS_PER_ROW);
            }
        }

        let mut seats = Vec::with_capacity(usize::from(ROWS) * usize::from(SEATS_PER_ROW));
        let mut index = HashMap::with_capacity(seats.capacity());
        for row in 1..=ROWS {
            for number in 1..=SEATS_PER_ROW {
                let key = SeatKey::new(row, number);
                index.insert(key, seats.len());
                seats.push(Seat {
                    row,
                    number,
                    occupied: occupied.contains(&key),
                });
            }
        }

        Self { seats, index }
    }

    pub fn in_bounds(key: SeatKey) -> bool {
        (1..=ROWS).contains(&key.row) && (1..=SEATS_PER_ROW).contains(&key.number)
    }

    pub fn get(&self, key: SeatKey) -> Option<&Seat> {
        self.index.get(&key).map(|&i| &self.seats[i])
    }

    /// Все места в порядке ряд -> номер.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn rows(&self) -> impl Iterator<Item = (u8, &[Seat])> {
        self.seats
            .chunks(usize::from(SEATS_PER_ROW))
            .zip(1..=ROWS)
            .map(|(seats, row)| (row, seats))
    }

    pub fn occupied(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| s.occupied)
    }
}

impl Default for SeatGrid {
    fn default() -> Self {
        Self::generate(&DEFAULT_OCCUPIED)
    }
}
