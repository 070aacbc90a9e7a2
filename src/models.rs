//! Data models for compressors and sensor readings.
//!
//! Wire field names keep the dashboard's Portuguese contract (the frontend
//! predates this service), including the legacy `firestore_id` key for the
//! internal document id; Rust identifiers stay English via serde renames.
//! Optional attributes are explicit `Option`s, never missing keys.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use crate::alerts::AlertReport;
use crate::brtime;

// ---

/// One registered compressor, as stored and as served to the dashboard.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Compressor {
    // ---
    #[serde(rename = "firestore_id")]
    pub doc_id: Uuid,
    /// Application-level id, unique among live records and immutable after
    /// registration. Uniqueness is the create handler's existence check,
    /// not a table constraint.
    #[serde(rename = "id_compressor")]
    pub compressor_id: i64,
    #[serde(rename = "nome_marca")]
    pub brand_name: String,
    #[serde(rename = "localizacao")]
    pub location: String,
    #[serde(rename = "potencia_nominal_kw")]
    pub rated_power_kw: f64,
    #[serde(rename = "configuracao")]
    pub configuration: String,
    #[serde(rename = "data_ultima_manutencao")]
    pub last_maintenance: Option<DateTime<FixedOffset>>,
    #[serde(rename = "esta_ligado")]
    pub is_on: bool,
    #[serde(rename = "data_ultima_atualizacao")]
    pub last_status_update: Option<DateTime<FixedOffset>>,
    /// Latest alert report, replaced in full on every (re)classification.
    #[serde(rename = "alertas")]
    pub alerts: Option<Json<AlertReport>>,
    #[serde(rename = "data_ultima_alerta")]
    pub last_alert_update: Option<DateTime<FixedOffset>>,
    #[serde(rename = "data_cadastro")]
    pub registered_at: DateTime<FixedOffset>,
}

/// Registration request body for `POST /compressores`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCompressor {
    // ---
    #[serde(rename = "id_compressor")]
    pub compressor_id: i64,
    #[serde(rename = "nome_marca")]
    pub brand_name: String,
    #[serde(rename = "localizacao")]
    pub location: String,
    #[serde(rename = "potencia_nominal_kw")]
    pub rated_power_kw: f64,
    #[serde(rename = "configuracao", default = "default_configuration")]
    pub configuration: String,
    #[serde(rename = "data_ultima_manutencao", default)]
    pub last_maintenance: Option<DateTime<FixedOffset>>,
    #[serde(rename = "esta_ligado", default)]
    pub is_on: bool,
    #[serde(rename = "data_ultima_atualizacao", default)]
    pub last_status_update: Option<DateTime<FixedOffset>>,
}

fn default_configuration() -> String {
    "Compressor Médio-Padrão".to_string()
}

impl NewCompressor {
    /// Field validation; returns the first violation as a caller-facing
    /// message.
    pub fn validate(&self) -> Result<(), String> {
        // ---
        if self.compressor_id <= 0 {
            return Err("id_compressor deve ser um número inteiro positivo".into());
        }
        if self.brand_name.is_empty() || self.brand_name.chars().count() > 100 {
            return Err("nome_marca deve ter entre 1 e 100 caracteres".into());
        }
        if self.location.is_empty() || self.location.chars().count() > 200 {
            return Err("localizacao deve ter entre 1 e 200 caracteres".into());
        }
        if !(15.0..=37.0).contains(&self.rated_power_kw) {
            return Err("potencia_nominal_kw deve estar na faixa média (15-37 kW)".into());
        }
        Ok(())
    }
}

/// Partial update body for `PUT /compressores/{id}`. Only non-null fields
/// are applied; an all-null body is rejected before touching the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompressorUpdate {
    // ---
    #[serde(rename = "nome_marca")]
    pub brand_name: Option<String>,
    #[serde(rename = "localizacao")]
    pub location: Option<String>,
    #[serde(rename = "potencia_nominal_kw")]
    pub rated_power_kw: Option<f64>,
    #[serde(rename = "configuracao")]
    pub configuration: Option<String>,
    #[serde(rename = "data_ultima_manutencao")]
    pub last_maintenance: Option<DateTime<FixedOffset>>,
    #[serde(rename = "esta_ligado")]
    pub is_on: Option<bool>,
    #[serde(rename = "data_ultima_atualizacao")]
    pub last_status_update: Option<DateTime<FixedOffset>>,
}

impl CompressorUpdate {
    pub fn is_empty(&self) -> bool {
        // ---
        self.brand_name.is_none()
            && self.location.is_none()
            && self.rated_power_kw.is_none()
            && self.configuration.is_none()
            && self.last_maintenance.is_none()
            && self.is_on.is_none()
            && self.last_status_update.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        // ---
        if let Some(name) = &self.brand_name {
            if name.is_empty() || name.chars().count() > 100 {
                return Err("nome_marca deve ter entre 1 e 100 caracteres".into());
            }
        }
        if let Some(location) = &self.location {
            if location.is_empty() || location.chars().count() > 200 {
                return Err("localizacao deve ter entre 1 e 200 caracteres".into());
            }
        }
        if let Some(power) = self.rated_power_kw {
            if !(15.0..=37.0).contains(&power) {
                return Err("potencia_nominal_kw deve estar na faixa média (15-37 kW)".into());
            }
        }
        Ok(())
    }
}

// ---

/// Reading body pushed by a field device to `POST /sensor`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReading {
    // ---
    #[serde(rename = "id_compressor")]
    pub compressor_id: i64,
    #[serde(rename = "esta_ligado")]
    pub is_on: bool,
    #[serde(rename = "pressao")]
    pub pressure: f64,
    #[serde(rename = "temp_equipamento")]
    pub equipment_temp: f64,
    #[serde(rename = "temp_ambiente")]
    pub ambient_temp: f64,
    #[serde(rename = "potencia_kw")]
    pub power_kw: f64,
    #[serde(rename = "umidade")]
    pub humidity: f64,
    #[serde(rename = "vibracao")]
    pub vibration: bool,
    #[serde(rename = "corrente", default)]
    pub current: Option<f64>,
    #[serde(rename = "data_medicao", default)]
    pub measured_at: Option<DateTime<FixedOffset>>,
}

impl NewReading {
    /// Stamp a document id and fill a missing measurement timestamp with
    /// the current wall clock; supplied timestamps are re-expressed in the
    /// service offset so stored stamps stay uniform.
    pub fn into_reading(self) -> Reading {
        // ---
        Reading {
            doc_id: Uuid::new_v4(),
            compressor_id: self.compressor_id,
            is_on: self.is_on,
            pressure: self.pressure,
            equipment_temp: self.equipment_temp,
            ambient_temp: self.ambient_temp,
            power_kw: self.power_kw,
            humidity: self.humidity,
            vibration: self.vibration,
            current: self.current,
            measured_at: self
                .measured_at
                .map(brtime::to_br)
                .unwrap_or_else(brtime::now_br),
        }
    }
}

/// A persisted sensor reading. Immutable once stored; never updated or
/// deleted by this service.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Reading {
    // ---
    #[serde(rename = "firestore_id")]
    pub doc_id: Uuid,
    #[serde(rename = "id_compressor")]
    pub compressor_id: i64,
    #[serde(rename = "esta_ligado")]
    pub is_on: bool,
    #[serde(rename = "pressao")]
    pub pressure: f64,
    #[serde(rename = "temp_equipamento")]
    pub equipment_temp: f64,
    #[serde(rename = "temp_ambiente")]
    pub ambient_temp: f64,
    #[serde(rename = "potencia_kw")]
    pub power_kw: f64,
    #[serde(rename = "umidade")]
    pub humidity: f64,
    #[serde(rename = "vibracao")]
    pub vibration: bool,
    #[serde(rename = "corrente")]
    pub current: Option<f64>,
    #[serde(rename = "data_medicao")]
    pub measured_at: DateTime<FixedOffset>,
}

// ---
