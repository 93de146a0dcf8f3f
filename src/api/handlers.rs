//! Shared handler plumbing: error type and health check

use crate::neo4j::StoreError;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub neo4j: bool,
}

/// GET /api/health
///
/// Always 200 while the process serves requests; `neo4j` reports whether
/// the store answered a trivial query.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let neo4j_ok = state.store.health_check().await.unwrap_or(false);
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        neo4j: neo4j_ok,
    })
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => {
                tracing::error!("Request failed: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno do servidor".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::Duplicate { field }) => AppError::Conflict(match field.as_str() {
                "email" => "Este email já está registrado".to_string(),
                "username" => "Este nome de usuário já está em uso".to_string(),
                _ => "Registro duplicado".to_string(),
            }),
            Some(StoreError::NotInitialized) => {
                AppError::ServiceUnavailable("Banco de dados indisponível".to_string())
            }
            None => AppError::Internal(err),
        }
    }
}
