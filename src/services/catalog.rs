use std::sync::Arc;
use tokio::time::Duration;
use tracing::info;

use crate::config::CatalogConfig;
use crate::models::{ExclusiveProduct, Movie};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("catalog is empty")]
    Empty,
}

/// Каталог фильмов, доступных для бронирования. Только для чтения.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Arc<Movie>>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies: movies.into_iter().map(Arc::new).collect(),
        }
    }

    /// Загружает каталог по `CATALOG_URL` или берёт встроенный.
    pub async fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        match &config.url {
            Some(url) => Self::fetch(url).await,
            None => {
                info!("Using built-in movie catalog");
                Ok(Self::builtin())
            }
        }
    }

    pub async fn fetch(url: &str) -> Result<Self, CatalogError> {
        let movies: Vec<Movie> = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if movies.is_empty() {
            return Err(CatalogError::Empty);
        }
        info!("Loaded {} movies from {}", movies.len(), url);
        Ok(Self::new(movies))
    }

    pub fn movies(&self) -> &[Arc<Movie>] {
        &self.movies
    }

    pub fn find(&self, movie_id: u32) -> Option<Arc<Movie>> {
        self.movies.iter().find(|m| m.id == movie_id).cloned()
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            Movie {
                id: 1,
                title: "Мотоцикл в окне 2: Новогоднее чудо".into(),
                description: "Захватывающее продолжение истории о мотоцикле, который изменил жизнь целого города в канун Нового года.".into(),
                price: 500,
                duration: "2ч 15мин".into(),
                exclusive_products: vec![
                    product(1, "3D очки", 150, "Профессиональные 3D очки для максимального погружения"),
                    product(2, "Попкорн большой", 200, "Свежий попкорн с выбором вкуса"),
                    product(3, "Напиток 0.5л", 100, "Холодный напиток на выбор"),
                    product(4, "Набор конфет", 180, "Ассорти премиальных конфет"),
                ],
            },
            Movie {
                id: 2,
                title: "Мотоцикл в окне: История Уилсона".into(),
                description: "Приквел, раскрывающий тайны прошлого главного героя и его легендарного мотоцикла.".into(),
                price: 500,
                duration: "1ч 58мин".into(),
                exclusive_products: vec![
                    product(5, "Эксклюзивные наушники", 300, "Наушники с усиленным звуком, подключённые к кинозалу"),
                    product(6, "Комбо \"Уилсон\"", 350, "Попкорн + напиток + хот-дог"),
                    product(7, "Постер фильма", 250, "Лимитированный постер с автографом режиссёра"),
                ],
            },
            Movie {
                id: 3,
                title: "Мотоцикл: На весёлых поездах".into(),
                description: "Завершающая часть трилогии с невероятными погонями и неожиданными поворотами сюжета.".into(),
                price: 500,
                duration: "2ч 30мин".into(),
                exclusive_products: vec![
                    product(8, "VIP наушники с шумоподавлением", 500, "Премиум наушники для идеального звука"),
                    product(9, "Комбо \"Гонщик\"", 450, "Большой попкорн + 2 напитка + начос + сладости"),
                    product(10, "Мерч-набор", 600, "Футболка + кепка + стикеры фильма"),
                ],
            },
        ])
    }
}

fn product(id: u32, name: &str, price: u32, description: &str) -> ExclusiveProduct {
    ExclusiveProduct {
        id,
        name: name.to_string(),
        price,
        description: description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_three_movies_with_unique_product_ids() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.movies().len(), 3);

        let mut ids: Vec<u32> = catalog
            .movies()
            .iter()
            .flat_map(|m| m.exclusive_products.iter().map(|p| p.id))
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn find_by_id() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.find(2).unwrap().title, "Мотоцикл в окне: История Уилсона");
        assert!(catalog.find(42).is_none());
    }

    #[test]
    fn movie_json_uses_camel_case() {
        let json = r#"[{"id": 9, "title": "T", "description": "D", "price": 400, "duration": "1ч",
                        "exclusiveProducts": [{"id": 1, "name": "N", "price": 50, "description": ""}]}]"#;
        let movies: Vec<Movie> = serde_json::from_str(json).unwrap();
        assert_eq!(movies[0].exclusive_products[0].price, 50);
    }
}
