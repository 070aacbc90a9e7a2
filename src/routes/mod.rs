use axum::Router;
use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};
use crate::Config;

mod band_config;
mod compressors;
mod esp32;
mod health;
mod sensors;

// ---

/// State shared by every route: the store pool plus the loaded config.
pub type AppState = (PgPool, Config);

pub fn router(pool: PgPool, config: Config) -> Router {
    // ---
    let api = Router::new()
        .merge(compressors::router())
        .merge(sensors::router())
        .merge(esp32::router())
        .merge(band_config::router())
        .merge(health::router());

    let prefix = config.api_prefix.clone();
    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(&prefix, api)
    };

    app.with_state((pool, config))
}

/// Shared `limit` query validation: 1..=1000, default 50.
pub(crate) fn validate_limit(limit: Option<i64>) -> ApiResult<i64> {
    // ---
    let limit = limit.unwrap_or(50);
    if (1..=1000).contains(&limit) {
        Ok(limit)
    } else {
        Err(ApiError::BadRequest(
            "limit deve estar entre 1 e 1000".into(),
        ))
    }
}

// ---
