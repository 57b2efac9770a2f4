use serde::Deserialize;
use std::env;

use crate::booking::grid::DEFAULT_OCCUPIED;
use crate::booking::selection::MAX_TICKETS_PER_ORDER;
use crate::models::SeatKey;

pub const DEFAULT_ORDERS_URL: &str = "https://functions.poehali.dev/14c391f3-2004-4d80-93dd-b22e99377b74";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub orders: OrdersConfig,
    pub catalog: CatalogConfig,
    pub booking: BookingConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Настройки сервиса заказов
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

// Источник каталога фильмов: None - встроенный каталог
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub url: Option<String>,
}

// Настройки зала и ограничений заказа
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    pub occupied_seats: Vec<SeatKey>,
    pub max_tickets: usize,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            occupied_seats: DEFAULT_OCCUPIED.to_vec(),
            max_tickets: MAX_TICKETS_PER_ORDER,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", 8000)?,
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "cinema_booking=debug,tower_http=debug".to_string()),
            },
            orders: OrdersConfig {
                url: env::var("ORDERS_URL").unwrap_or_else(|_| DEFAULT_ORDERS_URL.to_string()),
                timeout_seconds: parse_var("ORDERS_TIMEOUT_SECONDS", 30)?,
            },
            catalog: CatalogConfig {
                url: env::var("CATALOG_URL").ok().filter(|url| !url.trim().is_empty()),
            },
            booking: BookingConfig {
                occupied_seats: match env::var("OCCUPIED_SEATS") {
                    Ok(raw) => parse_seat_list(&raw).map_err(|reason| ConfigError::Invalid {
                        var: "OCCUPIED_SEATS",
                        value: raw.clone(),
                        reason,
                    })?,
                    Err(_) => DEFAULT_OCCUPIED.to_vec(),
                },
                max_tickets: check_max_tickets(parse_var("MAX_TICKETS_PER_ORDER", MAX_TICKETS_PER_ORDER)?)?,
            },
        })
    }
}

fn parse_var<T>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

// Допустимо от 1 до MAX_TICKETS_PER_ORDER
fn check_max_tickets(value: usize) -> Result<usize, ConfigError> {
    if (1..=MAX_TICKETS_PER_ORDER).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            var: "MAX_TICKETS_PER_ORDER",
            value: value.to_string(),
            reason: format!("must be between 1 and {}", MAX_TICKETS_PER_ORDER),
        })
    }
}

/// Разбирает список мест вида "1:5,2:3,2:4". Пустая строка - зал без занятых мест.
pub fn parse_seat_list(raw: &str) -> Result<Vec<SeatKey>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (row, number) = item
                .split_once(':')
                .ok_or_else(|| format!("expected ROW:NUMBER, got '{}'", item))?;
            let row = row.trim().parse::<u8>().map_err(|e| format!("row in '{}': {}", item, e))?;
            let number = number
                .trim()
                .parse::<u8>()
                .map_err(|e| format!("number in '{}': {}", item, e))?;
            Ok(SeatKey::new(row, number))
        })
        .collect()
}
