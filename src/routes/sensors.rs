//! Reading intake and retrieval endpoints.
//!
//! `POST /sensor` runs the full intake flow: existence check, timestamp
//! stamping, reading persistence, alert generation, then two independent
//! compressor updates (alert report, then on/off status). No transaction
//! spans those steps; a reader can observe the reading before the
//! compressor record catches up, and a failed status write does not roll
//! back the alert write.

use axum::{
    extract::Path, extract::Query, extract::State, http::StatusCode, response::IntoResponse,
    routing::get, routing::post, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::AppState;
use crate::alerts::{self, AlertReport, BAND_CONFIG};
use crate::brtime;
use crate::error::{ApiError, ApiResult};
use crate::models::NewReading;
use crate::store;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/sensor", post(intake))
        .route("/dados", get(all_readings))
        .route("/dados/{id_compressor}", get(compressor_readings))
}

async fn intake(
    State((pool, _)): State<AppState>,
    Json(body): Json<NewReading>,
) -> ApiResult<impl IntoResponse> {
    // ---
    info!("POST /sensor - reading for compressor {}", body.compressor_id);

    // Step 1: the referenced compressor must exist; otherwise nothing is
    // persisted.
    if !store::compressor_exists(&pool, body.compressor_id).await? {
        warn!(
            "rejecting reading: compressor {} is not registered",
            body.compressor_id
        );
        return Err(ApiError::compressor_not_found(body.compressor_id));
    }

    // Steps 2-3: stamp and persist the immutable reading
    let reading = body.into_reading();
    store::insert_reading(&pool, &reading).await?;
    debug!("reading {} persisted", reading.doc_id);

    // Step 4: classify every monitored parameter
    let alerts = alerts::generate(&reading, &BAND_CONFIG);

    // Steps 5-6: two independent writes onto the compressor record
    store::update_alerts(
        &pool,
        reading.compressor_id,
        &AlertReport::Internal(alerts),
        brtime::now_br(),
    )
    .await?;
    store::update_status(&pool, reading.compressor_id, reading.is_on, reading.measured_at)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "sucesso",
            "message": "Dados recebidos com sucesso",
            "firestore_id": reading.doc_id,
            "id_compressor": reading.compressor_id,
            "data_medicao": reading.measured_at,
        })),
    ))
}

async fn all_readings(State((pool, _)): State<AppState>) -> ApiResult<impl IntoResponse> {
    // ---
    info!("GET /dados");

    let readings = store::list_readings(&pool).await?;
    info!("returning {} readings", readings.len());

    Ok(Json(json!({
        "total": readings.len(),
        "dados": readings,
    })))
}

/// Query parameters for `GET /dados/{id_compressor}`.
#[derive(Debug, Deserialize)]
struct ReadingsQuery {
    limit: Option<i64>,
}

async fn compressor_readings(
    State((pool, _)): State<AppState>,
    Path(id_compressor): Path<i64>,
    Query(params): Query<ReadingsQuery>,
) -> ApiResult<impl IntoResponse> {
    // ---
    let limit = super::validate_limit(params.limit)?;
    info!("GET /dados/{id_compressor} (limit={limit})");

    let readings = store::list_readings_for(&pool, id_compressor, limit).await?;
    if readings.is_empty() {
        warn!("no readings stored for compressor {id_compressor}");
        return Err(ApiError::NotFound(format!(
            "Nenhuma leitura encontrada para o compressor '{id_compressor}'"
        )));
    }

    Ok(Json(json!({
        "total": readings.len(),
        "id_compressor": id_compressor,
        "dados": readings,
    })))
}
