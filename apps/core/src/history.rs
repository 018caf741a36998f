//! Historical rainfall series.
//!
//! History records arrive in more than one shape: the clock time is either a
//! preformatted `horario` or a full `horario_registro` instant, and rainfall is
//! either `chuva` or `chuva_mm`. [`normalize`] resolves every record into a
//! [`HistorySample`] and drops the ones without a usable time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::time::{clock_label, instant_from_value};

/// Canonical history point. Serializes back into the `horario`/`chuva`
/// shape, so normalized output is itself valid input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    #[serde(rename = "horario")]
    pub time: String,
    #[serde(rename = "chuva")]
    pub rainfall_mm: f64,
    #[serde(rename = "nivel", default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
}

/// Where a raw record keeps its time.
#[derive(Debug, PartialEq)]
enum RawTime<'a> {
    Clock(&'a str),
    Instant(&'a Value),
    Missing,
}

/// Where a raw record keeps its rainfall.
#[derive(Debug, PartialEq)]
enum RawRainfall {
    Chuva(f64),
    ChuvaMm(f64),
    Missing,
}

#[derive(Debug)]
struct RawSample<'a> {
    time: RawTime<'a>,
    rainfall: RawRainfall,
    risk: Option<&'a str>,
}

impl<'a> RawSample<'a> {
    fn probe(value: &'a Value) -> Option<Self> {
        let fields = value.as_object()?;

        let time = match fields.get("horario").and_then(Value::as_str) {
            Some(clock) if !clock.is_empty() => RawTime::Clock(clock),
            _ => match fields.get("horario_registro") {
                Some(instant) if !instant.is_null() => RawTime::Instant(instant),
                _ => RawTime::Missing,
            },
        };

        let rainfall = if let Some(mm) = fields.get("chuva").and_then(Value::as_f64) {
            RawRainfall::Chuva(mm)
        } else if let Some(mm) = fields.get("chuva_mm").and_then(Value::as_f64) {
            RawRainfall::ChuvaMm(mm)
        } else {
            RawRainfall::Missing
        };

        Some(Self {
            time,
            rainfall,
            risk: fields.get("nivel").and_then(Value::as_str),
        })
    }

    fn resolve(self) -> Option<HistorySample> {
        let time = match self.time {
            RawTime::Clock(clock) => clock.to_string(),
            RawTime::Instant(value) => clock_label(&instant_from_value(value)?),
            RawTime::Missing => return None,
        };

        let rainfall_mm = match self.rainfall {
            RawRainfall::Chuva(mm) | RawRainfall::ChuvaMm(mm) => mm,
            RawRainfall::Missing => 0.0,
        };

        Some(HistorySample {
            time,
            rainfall_mm,
            risk: self.risk.map(str::to_string),
        })
    }
}

/// Reshapes raw history records into canonical samples, preserving order.
///
/// Records that are not objects, that have no time field, or whose instant
/// does not parse are dropped. Missing rainfall counts as zero.
pub fn normalize(raw: &[Value]) -> Vec<HistorySample> {
    raw.iter()
        .filter_map(RawSample::probe)
        .filter_map(RawSample::resolve)
        .collect()
}
