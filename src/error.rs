//! API error taxonomy and the store fault boundary.
//!
//! Domain conditions (not-found, validation) are raised explicitly by the
//! handlers; infrastructure faults are mapped in exactly one place,
//! [`from_store`], which every store query funnels through. Nothing is
//! retried; every failure answers immediately with its stable status code
//! and a `{"detail": ...}` body. Unclassified failures are logged in full
//! server-side and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

// ---

/// Failures surfaced to API callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Referenced entity absent.
    #[error("{0}")]
    NotFound(String),

    /// Malformed or out-of-range field, duplicate id on create, empty
    /// update payload.
    #[error("{0}")]
    BadRequest(String),

    /// Store-level already-exists fault.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    ResourceExhausted(String),

    /// Anything unclassified. The payload is logged, never sent to the
    /// caller.
    #[error("erro interno: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(err.to_string())
    }

    pub fn compressor_not_found(compressor_id: i64) -> Self {
        ApiError::NotFound(format!(
            "Compressor com ID '{compressor_id}' não encontrado"
        ))
    }
}

// ---

/// Map a store fault to the API taxonomy.
///
/// The single interpretation point for `sqlx::Error`; keep new store
/// queries going through this rather than matching inline.
pub fn from_store(err: sqlx::Error) -> ApiError {
    match err {
        sqlx::Error::RowNotFound => ApiError::NotFound("Documento não encontrado".into()),
        sqlx::Error::PoolTimedOut => {
            ApiError::Timeout("Timeout na operação do banco de dados".into())
        }
        sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            ApiError::Unavailable(
                "Serviço de banco de dados temporariamente indisponível".into(),
            )
        }
        sqlx::Error::Database(db) => match db.code().as_deref() {
            // unique_violation
            Some("23505") => ApiError::Conflict("Documento já existe".into()),
            // too_many_connections, configuration_limit_exceeded
            Some("53300") | Some("53400") => ApiError::ResourceExhausted(
                "Muitas requisições. Tente novamente em alguns segundos".into(),
            ),
            _ => ApiError::internal(db),
        },
        other => ApiError::internal(other),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let (status, detail) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::ResourceExhausted(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            ApiError::Internal(detail) => {
                tracing::error!("unhandled failure: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno do servidor".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

// ---
