use serde::Serialize;

use super::flow::{BookingFlow, Confirmation, Phase};
use super::pricing::PriceBreakdown;
use crate::models::{ExclusiveProduct, Movie, SeatKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Free,
    Selected,
    Occupied,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatView {
    pub number: u8,
    pub status: SeatStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatRowView {
    pub row: u8,
    pub seats: Vec<SeatView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: ExclusiveProduct,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    pub id: u32,
    pub title: String,
    pub duration: String,
    pub ticket_price: u32,
}

impl From<&Movie> for MovieView {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            duration: movie.duration.clone(),
            ticket_price: movie.price,
        }
    }
}

/// Состояние экрана бронирования для клиента.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub phase: Phase,
    /// Текст-заглушка, когда фильм не выбран.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie: Option<MovieView>,
    pub seat_map: Vec<SeatRowView>,
    pub selected_seats: Vec<SeatKey>,
    pub products: Vec<ProductView>,
    pub price: PriceBreakdown,
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<Confirmation>,
}

impl BookingView {
    pub fn render(flow: &BookingFlow) -> Self {
        let Some(movie) = flow.movie() else {
            return Self {
                phase: Phase::Idle,
                placeholder: Some("Фильм не выбран".to_string()),
                movie: None,
                seat_map: Vec::new(),
                selected_seats: Vec::new(),
                products: Vec::new(),
                price: PriceBreakdown::default(),
                can_submit: false,
                notice: flow.notice().map(|n| n.message()),
                confirmation: None,
            };
        };

        let selection = flow.selection();
        let seat_map = flow
            .grid()
            .rows()
            .map(|(row, seats)| SeatRowView {
                row,
                seats: seats
                    .iter()
                    .map(|seat| SeatView {
                        number: seat.number,
                        status: if seat.occupied {
                            SeatStatus::Occupied
                        } else if selection.is_some_and(|s| s.is_seat_selected(seat.key())) {
                            SeatStatus::Selected
                        } else {
                            SeatStatus::Free
                        },
                    })
                    .collect(),
            })
            .collect();

        let products = movie
            .exclusive_products
            .iter()
            .map(|product| ProductView {
                product: product.clone(),
                selected: selection.is_some_and(|s| s.is_product_selected(product.id)),
            })
            .collect();

        Self {
            phase: flow.phase(),
            placeholder: None,
            movie: Some(MovieView::from(movie.as_ref())),
            seat_map,
            selected_seats: selection.map(|s| s.seats().to_vec()).unwrap_or_default(),
            products,
            price: flow.price().unwrap_or_default(),
            can_submit: flow.can_submit(),
            notice: flow.notice().map(|n| n.message()),
            confirmation: flow.confirmation().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::grid::SeatGrid;
    use std::sync::Arc;

    fn flow() -> BookingFlow {
        BookingFlow::new(Arc::new(SeatGrid::generate(&[SeatKey::new(1, 5)])), 10)
    }

    fn movie() -> Arc<Movie> {
        Arc::new(Movie {
            id: 3,
            title: "Мотоцикл: На весёлых поездах".into(),
            description: String::new(),
            price: 500,
            duration: "2ч 30мин".into(),
            exclusive_products: vec![ExclusiveProduct {
                id: 10,
                name: "Мерч-набор".into(),
                price: 600,
                description: String::new(),
            }],
        })
    }

    #[test]
    fn idle_view_is_placeholder() {
        let view = BookingView::render(&flow());
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(view.placeholder.as_deref(), Some("Фильм не выбран"));
        assert!(view.seat_map.is_empty());
        assert!(!view.can_submit);
    }

    #[test]
    fn seat_map_marks_statuses() {
        let mut flow = flow();
        flow.choose_movie(Some(movie()));
        flow.toggle_seat(SeatKey::new(1, 1)).unwrap();
        flow.toggle_product(10).unwrap();

        let view = BookingView::render(&flow);
        assert_eq!(view.seat_map.len(), 6);
        let first_row = &view.seat_map[0].seats;
        assert_eq!(first_row[0].status, SeatStatus::Selected);
        assert_eq!(first_row[1].status, SeatStatus::Free);
        assert_eq!(first_row[4].status, SeatStatus::Occupied);
        assert!(view.products[0].selected);
        assert_eq!(view.price.total, 1100);
        assert!(view.can_submit);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["phase"], "selecting");
        assert_eq!(json["selectedSeats"], serde_json::json!([{"row": 1, "number": 1}]));
        assert_eq!(json["products"][0]["name"], "Мерч-набор");
        assert_eq!(json["movie"]["ticketPrice"], 500);
    }
}
