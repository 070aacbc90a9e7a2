//! Database schema management for `compressor-telemetry`.
//!
//! Ensures required tables and indexes exist before serving requests.
//! Applied once on startup from `main.rs` (EMBP: single gateway call).

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates the `compressors` registry and the append-only
/// `sensor_readings` table. Safe to call on every startup; no-op if the
/// objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    // Compressor registry. `compressor_id` deliberately carries no UNIQUE
    // constraint: duplicate protection is the create handler's
    // existence check.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS compressors (
            doc_id             UUID PRIMARY KEY,
            compressor_id      BIGINT           NOT NULL,
            brand_name         TEXT             NOT NULL,
            location           TEXT             NOT NULL,
            rated_power_kw     DOUBLE PRECISION NOT NULL,
            configuration      TEXT             NOT NULL,
            last_maintenance   TIMESTAMPTZ,
            is_on              BOOLEAN          NOT NULL DEFAULT FALSE,
            last_status_update TIMESTAMPTZ,
            alerts             JSONB,
            last_alert_update  TIMESTAMPTZ,
            registered_at      TIMESTAMPTZ      NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Append-only store for raw readings served by `/dados`
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensor_readings (
            doc_id         UUID PRIMARY KEY,
            compressor_id  BIGINT           NOT NULL,
            is_on          BOOLEAN          NOT NULL,
            pressure       DOUBLE PRECISION NOT NULL,
            equipment_temp DOUBLE PRECISION NOT NULL,
            ambient_temp   DOUBLE PRECISION NOT NULL,
            power_kw       DOUBLE PRECISION NOT NULL,
            humidity       DOUBLE PRECISION NOT NULL,
            vibration      BOOLEAN          NOT NULL,
            current        DOUBLE PRECISION,
            measured_at    TIMESTAMPTZ      NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Basic indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_compressors_compressor_id
            ON compressors (compressor_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensor_readings_compressor_id
            ON sensor_readings (compressor_id);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensor_readings_measured_at
            ON sensor_readings (measured_at DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
