//! Alert ingestion for smart devices that classify on-board.
//!
//! ESP32 nodes reduce their readings to the three-level device vocabulary
//! before sending; this path writes that report onto the compressor record
//! as-is. No band lookup, no reading row: update-only, distinct from the
//! `/sensor` intake.

use axum::{
    extract::State, response::IntoResponse, routing::post, Json, Router,
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::AppState;
use crate::alerts::{AlertReport, DeviceAlertSet, DeviceLevel};
use crate::brtime;
use crate::error::{ApiError, ApiResult};
use crate::store;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/esp32/alertas", post(ingest))
}

/// Pre-classified alert levels pushed by a smart device.
#[derive(Debug, Deserialize)]
struct DeviceAlertBody {
    // ---
    #[serde(rename = "id_compressor")]
    compressor_id: i64,
    #[serde(rename = "pressao")]
    pressure: DeviceLevel,
    #[serde(rename = "temperatura_equipamento")]
    equipment_temp: DeviceLevel,
    #[serde(rename = "temperatura_ambiente")]
    ambient_temp: DeviceLevel,
    #[serde(rename = "potencia")]
    power: DeviceLevel,
    #[serde(rename = "umidade")]
    humidity: DeviceLevel,
    #[serde(rename = "vibracao")]
    vibration: bool,
    #[serde(rename = "data_medicao", default)]
    measured_at: Option<DateTime<FixedOffset>>,
}

async fn ingest(
    State((pool, _)): State<AppState>,
    Json(body): Json<DeviceAlertBody>,
) -> ApiResult<impl IntoResponse> {
    // ---
    info!(
        "POST /esp32/alertas - device alerts for compressor {}",
        body.compressor_id
    );

    if !store::compressor_exists(&pool, body.compressor_id).await? {
        warn!(
            "rejecting device alerts: compressor {} is not registered",
            body.compressor_id
        );
        return Err(ApiError::compressor_not_found(body.compressor_id));
    }

    let applied_at = body
        .measured_at
        .map(brtime::to_br)
        .unwrap_or_else(brtime::now_br);

    // The device already classified; its levels are stored verbatim.
    let report = AlertReport::Device(DeviceAlertSet {
        pressure: body.pressure,
        equipment_temp: body.equipment_temp,
        ambient_temp: body.ambient_temp,
        power: body.power,
        humidity: body.humidity,
        vibration: body.vibration,
    });

    store::update_alerts(&pool, body.compressor_id, &report, applied_at).await?;
    info!("device alerts applied to compressor {}", body.compressor_id);

    Ok(Json(json!({
        "status": "sucesso",
        "message": "Alertas do dispositivo aplicados com sucesso",
        "id_compressor": body.compressor_id,
        "alertas": report,
        "data_atualizacao": applied_at,
    })))
}
