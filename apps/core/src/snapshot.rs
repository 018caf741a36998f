//! Current-conditions records as served by `/clima/atual`.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{kind_of, PayloadError};
use crate::registry::Coordinate;
use crate::risk::{classify, RiskDisplay};
use crate::time::{clock_label, instant_from_value};

pub type SnapshotMap = HashMap<String, Snapshot>;

/// One neighborhood's latest reading. Every field is optional on the wire;
/// values of the wrong type read as absent instead of failing the entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient_str")]
    pub nivel_risco: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub chuva_mm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precipitacao: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub vento_velocidade: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub chuva_acum_6h_ant: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub chuva_acum_3h_prox: Option<f64>,
    /// Kept as sent: a date-time string or epoch milliseconds.
    #[serde(default, deserialize_with = "lenient_instant")]
    pub horario_registro: Option<Value>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    /// The service sends either `true` or a message such as
    /// "Sem dados climáticos"; any truthy value flags the entry.
    #[serde(default, deserialize_with = "truthy")]
    pub erro: bool,
}

impl Snapshot {
    pub fn risk(&self) -> RiskDisplay {
        classify(self.nivel_risco.as_deref())
    }

    pub const fn is_available(&self) -> bool {
        !self.erro
    }

    /// Position reported by the API, when both halves are present and finite.
    pub fn position(&self) -> Option<Coordinate> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Coordinate::new(lat, lon))
            }
            _ => None,
        }
    }

    /// Local `HH:MM` of `horario_registro`, if it parses.
    pub fn recorded_at(&self) -> Option<String> {
        self.horario_registro
            .as_ref()
            .and_then(instant_from_value)
            .map(|instant| clock_label(&instant))
    }
}

/// Result of reading a `/clima/atual` payload.
#[derive(Debug, Default)]
pub struct ParsedSnapshots {
    pub snapshots: SnapshotMap,
    /// Neighborhoods whose entry was not an object.
    pub rejected: Vec<String>,
}

/// Splits the `/clima/atual` payload into per-neighborhood snapshots.
///
/// A `null` body is an empty map. Entries that are not objects are skipped
/// and reported in [`ParsedSnapshots::rejected`].
pub fn parse_snapshots(payload: Value) -> Result<ParsedSnapshots, PayloadError> {
    let entries = match payload {
        Value::Null => return Ok(ParsedSnapshots::default()),
        Value::Object(entries) => entries,
        other => return Err(PayloadError::NotAnObject(kind_of(&other))),
    };

    let mut parsed = ParsedSnapshots::default();
    for (name, entry) in entries {
        match serde_json::from_value::<Snapshot>(entry) {
            Ok(snapshot) => {
                parsed.snapshots.insert(name, snapshot);
            }
            Err(_) => parsed.rejected.push(name),
        }
    }
    parsed.rejected.sort();

    Ok(parsed)
}

/// Checks that a `/clima/historico/{bairro}` payload is a record array.
pub fn history_records(payload: Value) -> Result<Vec<Value>, PayloadError> {
    match payload {
        Value::Array(records) => Ok(records),
        Value::Null => Ok(Vec::new()),
        other => Err(PayloadError::NotAnArray(kind_of(&other))),
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn lenient_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_instant<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        value @ (Value::String(_) | Value::Number(_)) => Some(value),
        _ => None,
    })
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::String(message) => !message.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskTier;
    use chrono::{Local, TimeZone};
    use serde_json::json;

    #[test]
    fn full_entry_parses() {
        let parsed = parse_snapshots(json!({
            "Acari": {
                "nivel_risco": "alto",
                "chuva_mm": 18.4,
                "precipitacao": 18.4,
                "vento_velocidade": 22.0,
                "chuva_acum_6h_ant": 40.1,
                "chuva_acum_3h_prox": 12.0,
                "horario_registro": "2024-02-10T15:40:00",
                "lat": -22.82,
                "lon": -43.34
            }
        }))
        .unwrap();

        let acari = &parsed.snapshots["Acari"];
        assert_eq!(acari.risk().tier, RiskTier::High);
        assert!(acari.is_available());
        assert_eq!(acari.recorded_at().as_deref(), Some("15:40"));
        assert_eq!(acari.position(), Some(Coordinate::new(-22.82, -43.34)));
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn recorded_at_accepts_epoch_millis_and_minute_strings() {
        let millis = Local
            .with_ymd_and_hms(2024, 2, 10, 9, 5, 0)
            .unwrap()
            .timestamp_millis();
        let parsed = parse_snapshots(json!({
            "Acari": {"horario_registro": millis},
            "Botafogo": {"horario_registro": "2024-02-10 21:30"},
            "Guadalupe": {"horario_registro": ["2024-02-10"]}
        }))
        .unwrap();

        assert_eq!(parsed.snapshots["Acari"].recorded_at().as_deref(), Some("09:05"));
        assert_eq!(parsed.snapshots["Botafogo"].recorded_at().as_deref(), Some("21:30"));
        assert_eq!(parsed.snapshots["Guadalupe"].horario_registro, None);
    }

    #[test]
    fn error_message_string_flags_entry() {
        let parsed = parse_snapshots(json!({
            "Botafogo": {"lat": -22.95, "lon": -43.18, "erro": "Sem dados climáticos"},
            "Guadalupe": {"erro": false, "chuva_mm": 0.0},
            "Acari": {"erro": true}
        }))
        .unwrap();

        assert!(!parsed.snapshots["Botafogo"].is_available());
        assert!(parsed.snapshots["Guadalupe"].is_available());
        assert!(!parsed.snapshots["Acari"].is_available());
    }

    #[test]
    fn wrong_types_read_as_absent() {
        let parsed = parse_snapshots(json!({
            "Bonsucesso": {"chuva_mm": "n/a", "nivel_risco": 3, "lat": null, "lon": -43.2}
        }))
        .unwrap();
        let entry = &parsed.snapshots["Bonsucesso"];
        assert_eq!(entry.chuva_mm, None);
        assert_eq!(entry.risk().tier, RiskTier::Low);
        assert_eq!(entry.position(), None);
    }

    #[test]
    fn non_object_entries_are_rejected_not_fatal() {
        let parsed = parse_snapshots(json!({
            "Acari": "offline",
            "Botafogo": {"chuva_mm": 1.0}
        }))
        .unwrap();
        assert_eq!(parsed.rejected, ["Acari"]);
        assert_eq!(parsed.snapshots.len(), 1);
    }

    #[test]
    fn null_body_is_empty_and_arrays_are_errors() {
        assert!(parse_snapshots(Value::Null).unwrap().snapshots.is_empty());
        assert_eq!(
            parse_snapshots(json!([1, 2])).unwrap_err(),
            PayloadError::NotAnObject("an array")
        );
    }

    #[test]
    fn history_payload_must_be_an_array() {
        assert_eq!(history_records(json!([{"horario": "10:00"}])).unwrap().len(), 1);
        assert!(history_records(Value::Null).unwrap().is_empty());
        assert_eq!(
            history_records(json!({"detail": "Not Found"})).unwrap_err(),
            PayloadError::NotAnArray("an object")
        );
    }
}
