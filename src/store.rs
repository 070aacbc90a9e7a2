//! Postgres access for the compressor and reading collections.
//!
//! This is the Store boundary: every query maps its fault through
//! [`crate::error::from_store`], so handlers never see a raw
//! `sqlx::Error`. Multi-step flows issue independent statements with no
//! surrounding transaction: the reading insert and the two compressor
//! updates can partially fail, and concurrent writers are
//! last-writer-wins on the compressor record.

use chrono::{DateTime, FixedOffset};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::alerts::AlertReport;
use crate::brtime;
use crate::error::{from_store, ApiResult};
use crate::models::{Compressor, CompressorUpdate, NewCompressor, Reading};

// ---

/// True when a compressor with this application id is registered.
pub async fn compressor_exists(pool: &PgPool, compressor_id: i64) -> ApiResult<bool> {
    // ---
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT compressor_id FROM compressors WHERE compressor_id = $1 LIMIT 1",
    )
    .bind(compressor_id)
    .fetch_optional(pool)
    .await
    .map_err(from_store)?;

    Ok(row.is_some())
}

/// Insert a new compressor record, stamping its document id and
/// registration time.
pub async fn insert_compressor(pool: &PgPool, new: &NewCompressor) -> ApiResult<Compressor> {
    // ---
    let compressor = Compressor {
        doc_id: Uuid::new_v4(),
        compressor_id: new.compressor_id,
        brand_name: new.brand_name.clone(),
        location: new.location.clone(),
        rated_power_kw: new.rated_power_kw,
        configuration: new.configuration.clone(),
        last_maintenance: new.last_maintenance,
        is_on: new.is_on,
        last_status_update: new.last_status_update,
        alerts: None,
        last_alert_update: None,
        registered_at: brtime::now_br(),
    };

    sqlx::query(
        r#"
        INSERT INTO compressors (
            doc_id, compressor_id, brand_name, location, rated_power_kw,
            configuration, last_maintenance, is_on, last_status_update,
            registered_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(compressor.doc_id)
    .bind(compressor.compressor_id)
    .bind(&compressor.brand_name)
    .bind(&compressor.location)
    .bind(compressor.rated_power_kw)
    .bind(&compressor.configuration)
    .bind(compressor.last_maintenance)
    .bind(compressor.is_on)
    .bind(compressor.last_status_update)
    .bind(compressor.registered_at)
    .execute(pool)
    .await
    .map_err(from_store)?;

    Ok(compressor)
}

/// List compressors, optionally filtered to a power status.
///
/// The filtered form is unordered on purpose (no composite index); the
/// unfiltered form returns newest registrations first.
pub async fn list_compressors(
    pool: &PgPool,
    active_only: Option<bool>,
    limit: i64,
) -> ApiResult<Vec<Compressor>> {
    // ---
    let query = if let Some(active) = active_only {
        sqlx::query_as::<_, Compressor>(
            "SELECT * FROM compressors WHERE is_on = $1 LIMIT $2",
        )
        .bind(active)
        .bind(limit)
    } else {
        sqlx::query_as::<_, Compressor>(
            "SELECT * FROM compressors ORDER BY registered_at DESC LIMIT $1",
        )
        .bind(limit)
    };

    query.fetch_all(pool).await.map_err(from_store)
}

pub async fn find_compressor(
    pool: &PgPool,
    compressor_id: i64,
) -> ApiResult<Option<Compressor>> {
    // ---
    sqlx::query_as("SELECT * FROM compressors WHERE compressor_id = $1 LIMIT 1")
        .bind(compressor_id)
        .fetch_optional(pool)
        .await
        .map_err(from_store)
}

/// Apply the non-null fields of a partial update and stamp
/// `last_status_update`. Returns the updated record, or `None` when the
/// id is unknown.
pub async fn update_compressor(
    pool: &PgPool,
    compressor_id: i64,
    update: &CompressorUpdate,
) -> ApiResult<Option<Compressor>> {
    // ---
    sqlx::query_as(
        r#"
        UPDATE compressors SET
            brand_name         = COALESCE($2, brand_name),
            location           = COALESCE($3, location),
            rated_power_kw     = COALESCE($4, rated_power_kw),
            configuration      = COALESCE($5, configuration),
            last_maintenance   = COALESCE($6, last_maintenance),
            is_on              = COALESCE($7, is_on),
            last_status_update = $8
        WHERE compressor_id = $1
        RETURNING *
        "#,
    )
    .bind(compressor_id)
    .bind(update.brand_name.as_deref())
    .bind(update.location.as_deref())
    .bind(update.rated_power_kw)
    .bind(update.configuration.as_deref())
    .bind(update.last_maintenance)
    .bind(update.is_on)
    .bind(brtime::now_br())
    .fetch_optional(pool)
    .await
    .map_err(from_store)
}

/// Delete by application id; false when nothing matched.
pub async fn delete_compressor(pool: &PgPool, compressor_id: i64) -> ApiResult<bool> {
    // ---
    let result = sqlx::query("DELETE FROM compressors WHERE compressor_id = $1")
        .bind(compressor_id)
        .execute(pool)
        .await
        .map_err(from_store)?;

    Ok(result.rows_affected() > 0)
}

// ---

/// Persist one immutable reading row.
pub async fn insert_reading(pool: &PgPool, reading: &Reading) -> ApiResult<()> {
    // ---
    sqlx::query(
        r#"
        INSERT INTO sensor_readings (
            doc_id, compressor_id, is_on, pressure, equipment_temp,
            ambient_temp, power_kw, humidity, vibration, current,
            measured_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(reading.doc_id)
    .bind(reading.compressor_id)
    .bind(reading.is_on)
    .bind(reading.pressure)
    .bind(reading.equipment_temp)
    .bind(reading.ambient_temp)
    .bind(reading.power_kw)
    .bind(reading.humidity)
    .bind(reading.vibration)
    .bind(reading.current)
    .bind(reading.measured_at)
    .execute(pool)
    .await
    .map_err(from_store)?;

    Ok(())
}

/// All stored readings, most recent measurement first.
pub async fn list_readings(pool: &PgPool) -> ApiResult<Vec<Reading>> {
    // ---
    sqlx::query_as("SELECT * FROM sensor_readings ORDER BY measured_at DESC")
        .fetch_all(pool)
        .await
        .map_err(from_store)
}

/// One compressor's readings, most recent measurement first.
pub async fn list_readings_for(
    pool: &PgPool,
    compressor_id: i64,
    limit: i64,
) -> ApiResult<Vec<Reading>> {
    // ---
    sqlx::query_as(
        r#"
        SELECT * FROM sensor_readings
        WHERE compressor_id = $1
        ORDER BY measured_at DESC
        LIMIT $2
        "#,
    )
    .bind(compressor_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(from_store)
}

// ---

/// Replace the compressor's alert report in full (never merged
/// field-by-field) and stamp the alert-update time.
pub async fn update_alerts(
    pool: &PgPool,
    compressor_id: i64,
    report: &AlertReport,
    at: DateTime<FixedOffset>,
) -> ApiResult<()> {
    // ---
    sqlx::query(
        "UPDATE compressors SET alerts = $2, last_alert_update = $3 WHERE compressor_id = $1",
    )
    .bind(compressor_id)
    .bind(Json(report))
    .bind(at)
    .execute(pool)
    .await
    .map_err(from_store)?;

    Ok(())
}

/// Write the device-reported on/off status with the reading's own
/// timestamp. Independent of [`update_alerts`]: a failure here leaves the
/// alert write in place.
pub async fn update_status(
    pool: &PgPool,
    compressor_id: i64,
    is_on: bool,
    at: DateTime<FixedOffset>,
) -> ApiResult<()> {
    // ---
    sqlx::query(
        "UPDATE compressors SET is_on = $2, last_status_update = $3 WHERE compressor_id = $1",
    )
    .bind(compressor_id)
    .bind(is_on)
    .bind(at)
    .execute(pool)
    .await
    .map_err(from_store)?;

    Ok(())
}

/// Cheapest possible reachability probe for `/health`.
pub async fn ping(pool: &PgPool) -> ApiResult<()> {
    // ---
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(from_store)?;

    Ok(())
}
