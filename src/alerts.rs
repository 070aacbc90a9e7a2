//! Threshold-band alert classification.
//!
//! Every sensor reading is evaluated against the fixed band tables below
//! (the "Compressores Médios 15-37 kW" profile): five closed `[min, max]`
//! bands per monitored quantity, the top band open-ended. Classification
//! walks the bands from `critico` down, so a value sitting exactly on a
//! shared boundary takes the more severe of the two labels. The tables are
//! process-wide constants and are never mutated at runtime.
//!
//! Smart (ESP32) devices classify on-board into a coarser three-level
//! vocabulary. The two vocabularies are not interchangeable and are never
//! converted into one another; the stored [`AlertReport`] is tagged with
//! the source that produced it.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::Reading;

// ---

/// Severity label produced by the band classifier, least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    #[serde(rename = "muito_baixo")]
    VeryLow,
    #[serde(rename = "baixo")]
    Low,
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "alto")]
    High,
    #[serde(rename = "critico")]
    Critical,
}

impl AlertLevel {
    /// Wire label, shared by JSON serialization and log lines.
    pub fn label(self) -> &'static str {
        match self {
            AlertLevel::VeryLow => "muito_baixo",
            AlertLevel::Low => "baixo",
            AlertLevel::Normal => "normal",
            AlertLevel::High => "alto",
            AlertLevel::Critical => "critico",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One closed interval of a band table. `max: None` means unbounded above.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Band {
    pub min: f64,
    pub max: Option<f64>,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Band {
            min,
            max: Some(max),
        }
    }

    /// Band with no upper bound (topmost band of most quantities).
    pub const fn open(min: f64) -> Self {
        Band { min, max: None }
    }

    /// Inclusive on both ends; adjacent bands share their boundary value.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

/// The five severity bands for one monitored quantity.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BandTable {
    #[serde(rename = "muito_baixo")]
    pub very_low: Band,
    #[serde(rename = "baixo")]
    pub low: Band,
    pub normal: Band,
    #[serde(rename = "alto")]
    pub high: Band,
    #[serde(rename = "critico")]
    pub critical: Band,
}

impl BandTable {
    /// Bands paired with their label, most severe first. This is the fixed
    /// evaluation order of [`classify`]; it is what resolves boundary ties
    /// toward the more severe neighbor.
    fn by_severity(&self) -> [(AlertLevel, Band); 5] {
        [
            (AlertLevel::Critical, self.critical),
            (AlertLevel::High, self.high),
            (AlertLevel::Normal, self.normal),
            (AlertLevel::Low, self.low),
            (AlertLevel::VeryLow, self.very_low),
        ]
    }
}

/// Band tables for every numerically monitored quantity.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BandConfig {
    #[serde(rename = "limites_pressao")]
    pub pressure: BandTable,
    #[serde(rename = "limites_temp_equipamento")]
    pub equipment_temp: BandTable,
    #[serde(rename = "limites_temp_ambiente")]
    pub ambient_temp: BandTable,
    #[serde(rename = "limites_potencia")]
    pub power: BandTable,
    #[serde(rename = "limites_umidade")]
    pub humidity: BandTable,
}

/// Fixed configuration for medium compressors (15-37 kW). Bands are
/// contiguous per quantity; keeping them gap-free is on whoever edits
/// these numbers, nothing checks it at runtime.
pub const BAND_CONFIG: BandConfig = BandConfig {
    pressure: BandTable {
        very_low: Band::new(0.0, 5.0),
        low: Band::new(5.0, 7.0),
        normal: Band::new(7.0, 10.0),
        high: Band::new(10.0, 11.0),
        critical: Band::open(11.0),
    },
    equipment_temp: BandTable {
        very_low: Band::new(0.0, 60.0),
        low: Band::new(60.0, 71.0),
        normal: Band::new(71.0, 82.0),
        high: Band::new(82.0, 107.0),
        critical: Band::open(107.0),
    },
    ambient_temp: BandTable {
        very_low: Band::new(-10.0, 0.0),
        low: Band::new(0.0, 10.0),
        normal: Band::new(10.0, 29.0),
        high: Band::new(29.0, 46.0),
        critical: Band::open(46.0),
    },
    power: BandTable {
        very_low: Band::new(0.0, 10.0),
        low: Band::new(10.0, 15.0),
        normal: Band::new(15.0, 37.0),
        high: Band::new(37.0, 45.0),
        critical: Band::open(45.0),
    },
    humidity: BandTable {
        very_low: Band::new(0.0, 20.0),
        low: Band::new(20.0, 40.0),
        normal: Band::new(40.0, 70.0),
        high: Band::new(70.0, 85.0),
        critical: Band::new(85.0, 100.0),
    },
};

// ---

/// Map a measured value to its severity band.
///
/// Bands are tested in the order of [`BandTable::by_severity`] and the
/// first inclusive hit wins. A value outside every band (possible only
/// through a gap in the table, e.g. below the lowest `min`) falls back to
/// `normal`.
pub fn classify(value: f64, bands: &BandTable) -> AlertLevel {
    for (level, band) in bands.by_severity() {
        if band.contains(value) {
            return level;
        }
    }
    AlertLevel::Normal
}

/// Complete per-parameter classification of one reading.
///
/// A struct rather than a map: every monitored parameter is present
/// exactly once by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSet {
    #[serde(rename = "pressao")]
    pub pressure: AlertLevel,
    #[serde(rename = "temperatura_equipamento")]
    pub equipment_temp: AlertLevel,
    #[serde(rename = "temperatura_ambiente")]
    pub ambient_temp: AlertLevel,
    #[serde(rename = "potencia")]
    pub power: AlertLevel,
    #[serde(rename = "umidade")]
    pub humidity: AlertLevel,
    #[serde(rename = "vibracao")]
    pub vibration: AlertLevel,
}

impl AlertSet {
    /// Parameter name / level pairs, in wire order.
    pub fn entries(&self) -> [(&'static str, AlertLevel); 6] {
        [
            ("pressao", self.pressure),
            ("temperatura_equipamento", self.equipment_temp),
            ("temperatura_ambiente", self.ambient_temp),
            ("potencia", self.power),
            ("umidade", self.humidity),
            ("vibracao", self.vibration),
        ]
    }
}

/// Classify every monitored parameter of one reading.
///
/// The five numeric quantities go through the band classifier; vibration
/// is boolean and maps straight to `critico`/`normal`. Always total, never
/// an error.
pub fn generate(reading: &Reading, config: &BandConfig) -> AlertSet {
    let alerts = AlertSet {
        pressure: classify(reading.pressure, &config.pressure),
        equipment_temp: classify(reading.equipment_temp, &config.equipment_temp),
        ambient_temp: classify(reading.ambient_temp, &config.ambient_temp),
        power: classify(reading.power_kw, &config.power),
        humidity: classify(reading.humidity, &config.humidity),
        vibration: if reading.vibration {
            AlertLevel::Critical
        } else {
            AlertLevel::Normal
        },
    };

    let abnormal: Vec<String> = alerts
        .entries()
        .into_iter()
        .filter(|(_, level)| *level != AlertLevel::Normal)
        .map(|(name, level)| format!("{name}={level}"))
        .collect();
    if abnormal.is_empty() {
        info!(
            "compressor {}: all parameters normal",
            reading.compressor_id
        );
    } else {
        warn!(
            "compressor {}: abnormal parameters: {}",
            reading.compressor_id,
            abnormal.join(", ")
        );
    }

    alerts
}

// ---

/// Classification vocabulary reported by smart devices: three levels
/// instead of the five internal bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceLevel {
    #[serde(rename = "abaixo_do_normal")]
    BelowNormal,
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "acima_do_normal")]
    AboveNormal,
}

/// Per-parameter levels as reported by a smart device, plus its raw
/// vibration flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAlertSet {
    #[serde(rename = "pressao")]
    pub pressure: DeviceLevel,
    #[serde(rename = "temperatura_equipamento")]
    pub equipment_temp: DeviceLevel,
    #[serde(rename = "temperatura_ambiente")]
    pub ambient_temp: DeviceLevel,
    #[serde(rename = "potencia")]
    pub power: DeviceLevel,
    #[serde(rename = "umidade")]
    pub humidity: DeviceLevel,
    #[serde(rename = "vibracao")]
    pub vibration: bool,
}

/// Alert report stored on a compressor record, tagged with the vocabulary
/// that produced it so consumers never have to guess which scale a label
/// belongs to. `alto` and `acima_do_normal` are NOT the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fonte", content = "valores")]
pub enum AlertReport {
    #[serde(rename = "interno")]
    Internal(AlertSet),
    #[serde(rename = "dispositivo")]
    Device(DeviceAlertSet),
}

// ---

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::brtime;
    use uuid::Uuid;

    fn test_reading(
        pressure: f64,
        equipment_temp: f64,
        ambient_temp: f64,
        power_kw: f64,
        humidity: f64,
        vibration: bool,
    ) -> Reading {
        // ---
        Reading {
            doc_id: Uuid::new_v4(),
            compressor_id: 5,
            is_on: true,
            pressure,
            equipment_temp,
            ambient_temp,
            power_kw,
            humidity,
            vibration,
            current: None,
            measured_at: brtime::now_br(),
        }
    }

    #[test]
    fn interior_values_classify_to_their_band() {
        // ---
        let bands = &BAND_CONFIG.pressure;
        assert_eq!(classify(2.5, bands), AlertLevel::VeryLow);
        assert_eq!(classify(6.0, bands), AlertLevel::Low);
        assert_eq!(classify(8.5, bands), AlertLevel::Normal);
        assert_eq!(classify(10.5, bands), AlertLevel::High);
        assert_eq!(classify(12.0, bands), AlertLevel::Critical);
    }

    #[test]
    fn shared_boundaries_resolve_to_the_more_severe_band() {
        // ---
        let bands = &BAND_CONFIG.pressure;

        // 10.0 bar is inside both normal [7,10] and alto [10,11]
        assert_eq!(classify(10.0, bands), AlertLevel::High);
        // 11.0 bar is inside both alto [10,11] and critico [11,inf)
        assert_eq!(classify(11.0, bands), AlertLevel::Critical);
        // 7.0 bar is inside both baixo [5,7] and normal [7,10]
        assert_eq!(classify(7.0, bands), AlertLevel::Normal);
        // 5.0 bar is inside both muito_baixo [0,5] and baixo [5,7]
        assert_eq!(classify(5.0, bands), AlertLevel::Low);
    }

    #[test]
    fn top_band_is_unbounded() {
        // ---
        assert_eq!(
            classify(1.0e9, &BAND_CONFIG.equipment_temp),
            AlertLevel::Critical
        );
    }

    #[test]
    fn out_of_range_values_fall_back_to_normal() {
        // ---
        // Below the lowest band of the ambient table ([-10, 0] at the bottom)
        assert_eq!(classify(-20.0, &BAND_CONFIG.ambient_temp), AlertLevel::Normal);

        // The humidity critico band is capped at 100%, so a reading above it
        // matches nothing and takes the fallback
        assert_eq!(classify(101.0, &BAND_CONFIG.humidity), AlertLevel::Normal);
    }

    #[test]
    fn vibration_flag_overrides_nothing_numeric() {
        // ---
        let quiet = test_reading(8.5, 75.0, 20.0, 22.0, 55.0, false);
        assert_eq!(
            generate(&quiet, &BAND_CONFIG).vibration,
            AlertLevel::Normal
        );

        // Same in-band numerics, vibration detected
        let shaking = test_reading(8.5, 75.0, 20.0, 22.0, 55.0, true);
        let alerts = generate(&shaking, &BAND_CONFIG);
        assert_eq!(alerts.vibration, AlertLevel::Critical);
        assert_eq!(alerts.pressure, AlertLevel::Normal);
        assert_eq!(alerts.equipment_temp, AlertLevel::Normal);
        assert_eq!(alerts.ambient_temp, AlertLevel::Normal);
        assert_eq!(alerts.power, AlertLevel::Normal);
        assert_eq!(alerts.humidity, AlertLevel::Normal);
    }

    #[test]
    fn generate_covers_every_parameter_exactly_once() {
        // ---
        let reading = test_reading(12.0, 110.0, -5.0, 50.0, 90.0, true);
        let alerts = generate(&reading, &BAND_CONFIG);

        let entries = alerts.entries();
        assert_eq!(entries.len(), 6);

        let mut names: Vec<&str> = entries.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 6, "duplicate parameter in alert set");

        assert_eq!(alerts.pressure, AlertLevel::Critical);
        assert_eq!(alerts.equipment_temp, AlertLevel::Critical);
        assert_eq!(alerts.ambient_temp, AlertLevel::VeryLow);
        assert_eq!(alerts.power, AlertLevel::Critical);
        assert_eq!(alerts.humidity, AlertLevel::Critical);
        assert_eq!(alerts.vibration, AlertLevel::Critical);
    }

    #[test]
    fn alert_levels_use_wire_labels() {
        // ---
        assert_eq!(
            serde_json::to_string(&AlertLevel::VeryLow).unwrap(),
            "\"muito_baixo\""
        );
        assert_eq!(
            serde_json::to_string(&AlertLevel::Critical).unwrap(),
            "\"critico\""
        );
        assert_eq!(
            serde_json::from_str::<AlertLevel>("\"alto\"").unwrap(),
            AlertLevel::High
        );
    }

    #[test]
    fn device_levels_use_wire_labels() {
        // ---
        assert_eq!(
            serde_json::from_str::<DeviceLevel>("\"abaixo_do_normal\"").unwrap(),
            DeviceLevel::BelowNormal
        );
        assert_eq!(
            serde_json::to_string(&DeviceLevel::AboveNormal).unwrap(),
            "\"acima_do_normal\""
        );
    }

    #[test]
    fn alert_report_is_tagged_with_its_source() {
        // ---
        let reading = test_reading(8.5, 75.0, 20.0, 22.0, 55.0, false);
        let internal = AlertReport::Internal(generate(&reading, &BAND_CONFIG));
        let json = serde_json::to_value(&internal).unwrap();
        assert_eq!(json["fonte"], "interno");
        assert_eq!(json["valores"]["pressao"], "normal");
        assert_eq!(json["valores"]["vibracao"], "normal");

        let device = AlertReport::Device(DeviceAlertSet {
            pressure: DeviceLevel::AboveNormal,
            equipment_temp: DeviceLevel::Normal,
            ambient_temp: DeviceLevel::Normal,
            power: DeviceLevel::BelowNormal,
            humidity: DeviceLevel::Normal,
            vibration: true,
        });
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["fonte"], "dispositivo");
        assert_eq!(json["valores"]["pressao"], "acima_do_normal");
        assert_eq!(json["valores"]["vibracao"], true);

        let back: AlertReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, device);
    }

    #[test]
    fn band_config_serializes_open_bands_as_null_max() {
        // ---
        let json = serde_json::to_value(BAND_CONFIG).unwrap();
        assert_eq!(json["limites_pressao"]["critico"]["min"], 11.0);
        assert!(json["limites_pressao"]["critico"]["max"].is_null());
        assert_eq!(json["limites_umidade"]["critico"]["max"], 100.0);
    }
}
