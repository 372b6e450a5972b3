use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

/// Record-side value of one field, as read through a field descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Int32(i32),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Boolean(bool),
    DateTime(NaiveDateTime),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Text(_) => "text",
            FieldValue::Int32(_) => "int32",
            FieldValue::Float(_) => "float",
            FieldValue::Double(_) => "double",
            FieldValue::Decimal(_) => "decimal",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::List(_) => "list",
        }
    }

    /// Widens any numeric variant to `f64`. Decimals outside the `f64`
    /// range yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int32(i) => Some(f64::from(*i)),
            FieldValue::Float(f) => Some(f64::from(*f)),
            FieldValue::Double(d) => Some(*d),
            FieldValue::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Int32(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Double(d) => d.to_string(),
            FieldValue::Decimal(d) => d.normalize().to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::DateTime(dt) => format_datetime(dt),
            FieldValue::List(items) => items.iter().map(FieldValue::as_display).join(";"),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

pub const DATETIME_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_OUTPUT_FORMAT).to_string()
}

/// Parses date-time text in the formats accepted on import. Date-only input
/// resolves to midnight.
pub fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%d/%m/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

    let trimmed = value.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(parsed);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed == "0" {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// `f64` image of the decimal range bound, 2^96.
const DECIMAL_F64_LIMIT: f64 = 79_228_162_514_264_337_593_543_950_336.0;

/// Restores a decimal from its `f64` storage form using the shortest
/// round-trip rendering, so `1234.56` comes back as `1234.56` rather than
/// the full binary expansion. Values that round just past the decimal range
/// (as `Decimal::MAX` does once stored) clamp to the nearest bound.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .or_else(|| {
            (value.abs() <= DECIMAL_F64_LIMIT).then_some(if value.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            })
        })
}

pub fn int32_from_f64(value: f64) -> Option<i32> {
    if !value.is_finite() || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    Some(value.trunc() as i32)
}
