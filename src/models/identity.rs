use std::fmt;
use std::num::NonZeroU64;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Deserializer, Serialize};

/// Numeric id of one inpatient stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdmissionId(NonZeroU64);

impl AdmissionId {
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    /// Derive the admission id from an opaque patient identifier.
    ///
    /// Leading-integer semantics: whitespace is trimmed, the leading run of
    /// ASCII digits is parsed and anything after it is ignored. No digits,
    /// overflow, or zero yield `None`.
    pub fn parse(patient_id: &str) -> Option<Self> {
        let trimmed = patient_id.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        trimmed[..digits_end].parse::<u64>().ok().and_then(Self::new)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for AdmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned identifier of an existing record. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// `None` for blank identifiers, which count as "no record".
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        record_id_from_value(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid record id: {raw}")))
    }
}

/// Backends hand ids back as numbers or strings; both normalise to text.
pub fn record_id_from_value(value: &serde_json::Value) -> Option<RecordId> {
    match value {
        serde_json::Value::String(s) => RecordId::new(s),
        serde_json::Value::Number(n) => RecordId::new(&n.to_string()),
        _ => None,
    }
}

/// Date and minute-precision time attached to create requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionStamp {
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub time: NaiveTime,
}

impl SubmissionStamp {
    /// Stamp from the local wall clock.
    pub fn now() -> Self {
        Self::at(&Local::now())
    }

    pub fn at<Tz: TimeZone>(moment: &DateTime<Tz>) -> Self {
        let naive = moment.naive_local();
        let time = naive.time();
        Self {
            date: naive.date(),
            time: NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time),
        }
    }
}

/// `HH:MM` wire format for minute-precision times.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// Optional free text from a form field: trimmed, blank is absent.
pub fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
