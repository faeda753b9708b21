//! Sensor readings: a format-agnostic row per sensor, built from the
//! sensor's presentation of one snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use snoo_core::sensor::format_timestamp;
use snoo_core::{DeviceHub, Icon, Sensor, SynchronizerSnapshot};

use crate::error::CliError;
use crate::output;

// ── Values ──────────────────────────────────────────────────────────

/// Sensor values as they appear in structured output.
pub trait ReadingValue {
    fn to_json(&self) -> Value;
}

impl ReadingValue for &'static str {
    fn to_json(&self) -> Value {
        Value::String((*self).to_owned())
    }
}

impl ReadingValue for f64 {
    fn to_json(&self) -> Value {
        serde_json::Number::from_f64(*self).map_or(Value::Null, Value::Number)
    }
}

impl ReadingValue for DateTime<Utc> {
    fn to_json(&self) -> Value {
        Value::String(format_timestamp(*self))
    }
}

// ── Reading ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub unique_id: String,
    pub name: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub icon: Icon,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
}

impl SensorReading {
    /// Value as text; `None` when absent.
    pub fn value_text(&self) -> Option<String> {
        scalar_text(&self.value)
    }

    /// One-line summary for streaming output.
    pub fn line(&self, color: bool) -> String {
        let value = self.value_text().unwrap_or_else(|| output::dash(color));
        let mut text = format!("{}: {value} [{}]", self.name, self.icon);
        if !self.available {
            text.push_str(" (unavailable)");
        }
        text
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn read<S>(sensor: &S, snapshot: &SynchronizerSnapshot) -> Result<SensorReading, CliError>
where
    S: Sensor,
    S::Value: ReadingValue,
    S::Attributes: Serialize,
{
    let shown = sensor.present(snapshot);
    let descriptor = sensor.descriptor();
    Ok(SensorReading {
        unique_id: descriptor.unique_id.clone(),
        name: descriptor.name.clone(),
        value: shown
            .value
            .as_ref()
            .map_or(Value::Null, ReadingValue::to_json),
        unit: descriptor.unit_of_measurement,
        icon: shown.icon,
        available: shown.available,
        attributes: shown
            .attributes
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?,
    })
}

/// Readings for all three sensors of a hub, in a fixed order.
pub fn read_all(
    hub: &DeviceHub,
    snapshot: &SynchronizerSnapshot,
) -> Result<Vec<SensorReading>, CliError> {
    Ok(vec![
        read(hub.status_sensor(), snapshot)?,
        read(hub.level_sensor(), snapshot)?,
        read(hub.session_start_sensor(), snapshot)?,
    ])
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct ReadingRow {
    #[tabled(rename = "Sensor")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Available")]
    available: String,
}

impl ReadingRow {
    pub fn new(reading: &SensorReading, color: bool) -> Self {
        let value = match (reading.value_text(), reading.unit) {
            (Some(v), Some(unit)) => format!("{v} {unit}"),
            (Some(v), None) => v,
            (None, _) => output::dash(color),
        };
        Self {
            name: reading.name.clone(),
            value,
            icon: reading.icon.to_string(),
            available: output::yes_no(reading.available, color),
        }
    }
}

#[derive(Tabled)]
pub struct AttributeRow {
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "Attribute")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Flatten every reading's attributes into rows.
pub fn attribute_rows(readings: &[SensorReading], color: bool) -> Vec<AttributeRow> {
    readings
        .iter()
        .filter_map(|r| match &r.attributes {
            Some(Value::Object(map)) => Some((r, map)),
            _ => None,
        })
        .flat_map(|(reading, map)| {
            map.iter().map(move |(key, value)| AttributeRow {
                sensor: reading.unique_id.clone(),
                key: key.clone(),
                value: scalar_text(value).unwrap_or_else(|| output::dash(color)),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use snoo_api::MemoryFeed;
    use snoo_core::{DeviceInfo, SyncConfig};

    use super::*;

    fn hub() -> DeviceHub {
        DeviceHub::new(
            DeviceInfo::new("SN1", "Ada"),
            Arc::new(MemoryFeed::new(true)),
            SyncConfig::default(),
        )
    }

    #[test]
    fn empty_snapshot_reads_as_unavailable() {
        let hub = hub();
        let readings = read_all(&hub, &SynchronizerSnapshot::default()).unwrap();

        assert_eq!(readings.len(), 3);
        for reading in &readings {
            assert_eq!(reading.value, Value::Null);
            assert!(!reading.available);
            assert!(reading.attributes.is_none());
        }
        assert_eq!(readings[1].unit, Some("level"));
        assert_eq!(
            readings[0].line(false),
            "Ada's Snoo: - [mdi:bed-empty] (unavailable)"
        );
    }

    #[test]
    fn number_values_serialize_as_numbers() {
        assert_eq!(0.1_f64.to_json(), serde_json::json!(0.1));
        assert_eq!(f64::NAN.to_json(), Value::Null);
    }
}
