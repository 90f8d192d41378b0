//! Noon report record types.
//!
//! A [`NoonReport`] is the canonical structured output of an extraction:
//! the report date, fuel consumed per fuel type (aggregate or broken down
//! per engine), and optionally the power generated. The empty record
//! serializes as `{}`, which is the "nothing extracted" sentinel.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MeridianError, MeridianResult};

/// The canonical empty result: no date, no fuel, no power.
pub const EMPTY_RECORD: &str = "{}";

/// Fuel grades a noon report may account for.
///
/// Tokens outside this set are dropped during decoding, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FuelType {
    /// Very low sulphur fuel oil.
    Vlsfo,
    /// Marine gas oil.
    Mgo,
    /// Intermediate fuel oil.
    Ifo,
    /// Low sulphur bunker fuel.
    Lsbf,
    /// Low sulphur gas oil.
    Lsgo,
}

impl FuelType {
    /// All accepted fuel grades, in schema order.
    pub fn all() -> &'static [FuelType] {
        &[
            FuelType::Vlsfo,
            FuelType::Mgo,
            FuelType::Ifo,
            FuelType::Lsbf,
            FuelType::Lsgo,
        ]
    }

    /// Get the reporting token for this grade.
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Vlsfo => "VLSFO",
            FuelType::Mgo => "MGO",
            FuelType::Ifo => "IFO",
            FuelType::Lsbf => "LSBF",
            FuelType::Lsgo => "LSGO",
        }
    }

    /// Parse a source token with flexible casing and whitespace.
    ///
    /// Returns `None` for anything outside the accepted set.
    pub fn from_str_flexible(token: &str) -> Option<Self> {
        match token.trim().to_uppercase().as_str() {
            "VLSFO" => Some(FuelType::Vlsfo),
            "MGO" => Some(FuelType::Mgo),
            "IFO" => Some(FuelType::Ifo),
            "LSBF" => Some(FuelType::Lsbf),
            "LSGO" => Some(FuelType::Lsgo),
            _ => None,
        }
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-engine fuel figures, metric tons.
///
/// Slots are 1-indexed in reporting order. An absent slot means the engine
/// was not reported, which is distinct from an explicit `0.0` ("nil").
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub me1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub me2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub me3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub me4: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub me5: Option<f64>,
}

impl EngineBreakdown {
    /// All slots in engine order.
    pub fn slots(&self) -> [Option<f64>; 5] {
        [self.me1, self.me2, self.me3, self.me4, self.me5]
    }

    /// Number of reported engines.
    pub fn engine_count(&self) -> usize {
        self.slots().iter().filter(|slot| slot.is_some()).count()
    }

    /// Check whether no engine was reported at all.
    pub fn is_empty(&self) -> bool {
        self.slots().iter().all(|slot| slot.is_none())
    }

    /// Check that reported slots run from `me1` upward with no gap.
    pub fn is_contiguous(&self) -> bool {
        let mut gap_seen = false;
        for slot in self.slots() {
            match slot {
                Some(_) if gap_seen => return false,
                Some(_) => {}
                None => gap_seen = true,
            }
        }
        true
    }
}

/// Fuel quantity: a single aggregate figure or a per-engine breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FuelValue {
    /// Total metric tons across all engines.
    Total(f64),
    /// Metric tons broken down per engine.
    PerEngine(EngineBreakdown),
}

impl FuelValue {
    /// Check whether this is a per-engine breakdown.
    pub fn is_per_engine(&self) -> bool {
        matches!(self, FuelValue::PerEngine(_))
    }

    fn is_finite(&self) -> bool {
        match self {
            FuelValue::Total(value) => value.is_finite(),
            FuelValue::PerEngine(breakdown) => {
                breakdown.slots().iter().flatten().all(|value| value.is_finite())
            }
        }
    }
}

/// One fuel grade's consumption over the reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelEntry {
    /// The fuel grade.
    pub fuel_type: FuelType,
    /// Consumed quantity, aggregate or per engine.
    pub value: FuelValue,
}

/// Structured voyage data extracted from one noon report document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoonReport {
    /// Report date. Never fabricated: a record with data but no
    /// discoverable date normalizes to the empty record.
    #[serde(default, with = "report_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Fuel consumed, one entry per fuel grade, in order of discovery.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fuel_consumed: Vec<FuelEntry>,
    /// Power generated in megawatts. Requested on the PDF path only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_generated: Option<f64>,
}

impl NoonReport {
    /// Check whether this is the empty record.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.fuel_consumed.is_empty() && self.power_generated.is_none()
    }

    /// Enforce the record invariants.
    ///
    /// - a record without a date collapses to the empty record;
    /// - one entry per fuel grade, the per-engine breakdown replacing an
    ///   aggregate figure when both survived decoding;
    /// - non-finite values and empty breakdowns are dropped.
    pub fn normalize(mut self) -> Self {
        if self.date.is_none() {
            if !self.is_empty() {
                warn!("discarding extracted fields with no report date");
            }
            return Self::default();
        }

        let mut kept: Vec<FuelEntry> = Vec::with_capacity(self.fuel_consumed.len());
        for entry in std::mem::take(&mut self.fuel_consumed) {
            if !entry.value.is_finite() {
                warn!(fuel_type = entry.fuel_type.as_str(), "dropping non-finite fuel entry");
                continue;
            }
            if let FuelValue::PerEngine(breakdown) = &entry.value {
                if breakdown.is_empty() {
                    warn!(
                        fuel_type = entry.fuel_type.as_str(),
                        "dropping fuel entry with empty engine breakdown"
                    );
                    continue;
                }
                if !breakdown.is_contiguous() {
                    warn!(
                        fuel_type = entry.fuel_type.as_str(),
                        "engine slots are not contiguous from me1"
                    );
                }
            }
            match kept.iter().position(|k| k.fuel_type == entry.fuel_type) {
                Some(index) => {
                    if entry.value.is_per_engine() && !kept[index].value.is_per_engine() {
                        debug!(
                            fuel_type = entry.fuel_type.as_str(),
                            "per-engine breakdown replaces aggregate figure"
                        );
                        kept[index] = entry;
                    } else {
                        warn!(
                            fuel_type = entry.fuel_type.as_str(),
                            "dropping duplicate fuel entry"
                        );
                    }
                }
                None => kept.push(entry),
            }
        }
        self.fuel_consumed = kept;

        if matches!(self.power_generated, Some(power) if !power.is_finite()) {
            warn!("dropping non-finite power figure");
            self.power_generated = None;
        }
        self
    }

    /// Decode backend output into a normalized record.
    ///
    /// Decoding is lenient where the backend may have strayed: code fences
    /// are stripped, unknown fuel tokens and undecodable entries are dropped
    /// rather than failing the record, and date strings are parsed across
    /// the common report formats. Anything that is not a JSON object at the
    /// top level is a parse error.
    pub fn from_backend_json(text: &str) -> MeridianResult<Self> {
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct RawReport {
            date: Option<String>,
            fuel_consumed: Option<serde_json::Value>,
            power_generated: Option<f64>,
        }

        #[derive(Debug, Deserialize)]
        struct RawEntry {
            fuel_type: Option<String>,
            value: Option<serde_json::Value>,
        }

        let json = strip_code_fences(text);
        let raw: RawReport = serde_json::from_str(json).map_err(|e| {
            MeridianError::parse(format!("backend output is not a JSON object: {}", e))
        })?;

        let entries = match raw.fuel_consumed {
            Some(serde_json::Value::Array(items)) => items,
            Some(_) => {
                warn!("fuel_consumed is not an array, ignoring");
                Vec::new()
            }
            None => Vec::new(),
        };

        let fuel_consumed = entries
            .into_iter()
            .filter_map(|item| {
                let entry: RawEntry = serde_json::from_value(item).ok()?;
                let token = entry.fuel_type?;
                let Some(fuel_type) = FuelType::from_str_flexible(&token) else {
                    warn!(token = token.as_str(), "dropping entry with unknown fuel type");
                    return None;
                };
                let value: FuelValue = serde_json::from_value(entry.value?).ok()?;
                Some(FuelEntry { fuel_type, value })
            })
            .collect();

        let report = NoonReport {
            date: raw.date.as_deref().and_then(parse_report_date),
            fuel_consumed,
            power_generated: raw.power_generated,
        };
        Ok(report.normalize())
    }
}

/// Parse a report date across the formats backends actually emit.
///
/// Accepts plain dates, date-times, and RFC 3339 timestamps; anything else
/// is treated as no date.
pub fn parse_report_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|datetime| datetime.date_naive())
}

/// Strip a surrounding markdown code fence, if any.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = match trimmed.find('\n') {
        Some(pos) => &trimmed[pos + 1..],
        None => return trimmed,
    };
    match body.rfind("```") {
        Some(pos) => body[..pos].trim(),
        None => body.trim(),
    }
}

mod report_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(value.as_deref().and_then(super::parse_report_date))
    }
}
