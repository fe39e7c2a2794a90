pub mod categories;
pub mod health;
pub mod orders;
pub mod products;

use std::str::FromStr;

use actix_web::{web, HttpRequest, HttpResponse};
use bigdecimal::{BigDecimal, ToPrimitive};
use serde::Serialize;

use crate::errors::AppError;

// ── Response envelope ────────────────────────────────────────────────────────

/// `{ success, data?, count?, message? }`; failures are rendered by
/// [`AppError`] instead.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self {
            count: Some(items.len()),
            ..Self::data(items)
        }
    }
}

// ── Money ────────────────────────────────────────────────────────────────────

/// Prices travel as JSON numbers and are held as exact decimals inside.
pub(crate) fn money(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

pub(crate) fn decimal(value: f64, field: &str) -> Result<BigDecimal, AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!("{} must be a number", field)));
    }
    BigDecimal::from_str(&value.to_string())
        .map_err(|_| AppError::validation(format!("{} must be a number", field)))
}

// ── Fallbacks ────────────────────────────────────────────────────────────────

pub async fn route_not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found("Route not found"))
}

pub async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}

/// Malformed or mistyped JSON bodies become a 400 envelope carrying the
/// parser's message.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        AppError::Validation(err.to_string()).into()
    })
}
