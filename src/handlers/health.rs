use actix_web::{web, HttpResponse};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::infrastructure::StorageStatus;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    /// `postgres` or `memory`.
    pub storage: String,
    /// Whether the storage backend answers right now.
    pub connected: bool,
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health(status: web::Data<StorageStatus>) -> Result<HttpResponse, AppError> {
    let storage = status.kind().as_str().to_string();
    let connected = web::block(move || status.is_connected()).await?;

    Ok(HttpResponse::Ok().json(HealthResponse {
        success: true,
        message: "Health check successful".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        storage,
        connected,
    }))
}
