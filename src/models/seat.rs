use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор места в зале: ряд + номер.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatKey {
    pub row: u8,
    pub number: u8,
}

impl SeatKey {
    pub const fn new(row: u8, number: u8) -> Self {
        Self { row, number }
    }
}

impl fmt::Display for SeatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ряд {}, место {}", self.row, self.number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub row: u8,
    pub number: u8,
    pub occupied: bool,
}

impl Seat {
    pub fn key(&self) -> SeatKey {
        SeatKey::new(self.row, self.number)
    }
}
