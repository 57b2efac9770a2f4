use serde::{Deserialize, Serialize};

/// Эксклюзивный товар, доступный только при бронировании конкретного фильма.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusiveProduct {
    pub id: u32,
    pub name: String,
    pub price: u32,
    pub description: String,
}

/// Запись каталога: фильм с ценой билета и списком эксклюзивных товаров.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Цена одного билета.
    pub price: u32,
    /// Длительность в человекочитаемом виде, например "2ч 15мин".
    pub duration: String,
    #[serde(default)]
    pub exclusive_products: Vec<ExclusiveProduct>,
}

impl Movie {
    pub fn product(&self, product_id: u32) -> Option<&ExclusiveProduct> {
        self.exclusive_products.iter().find(|p| p.id == product_id)
    }
}
