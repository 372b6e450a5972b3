//! Cell classification and typed cell values.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    data::{format_datetime, parse_bool, parse_f64, parse_naive_datetime},
    field::{FieldType, Primitive},
};

/// Coarse storage kind assigned to a column. Drives default cell styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Text,
    Numeric,
    Boolean,
    #[default]
    Unknown,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Text => "text",
            CellType::Numeric => "numeric",
            CellType::Boolean => "boolean",
            CellType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "string" => Ok(CellType::Text),
            "numeric" | "number" => Ok(CellType::Numeric),
            "boolean" | "bool" => Ok(CellType::Boolean),
            "unknown" => Ok(CellType::Unknown),
            other => Err(anyhow!(
                "Unknown cell type '{other}'. Supported: text, numeric, boolean, unknown"
            )),
        }
    }
}

/// Infers the cell classification of a field type.
///
/// Nullable types classify as their wrapped type; lists are always stored as
/// delimited text. Date-times classify as text here even though the codec
/// writes them as native date cells.
pub fn classify(field_type: &FieldType) -> CellType {
    match field_type {
        FieldType::Nullable(inner) => classify_primitive(inner),
        FieldType::List(_) => CellType::Text,
        FieldType::Scalar(inner) => classify_primitive(inner),
    }
}

fn classify_primitive(primitive: &Primitive) -> CellType {
    match primitive {
        Primitive::Text | Primitive::DateTime => CellType::Text,
        Primitive::Int32 | Primitive::Float | Primitive::Double | Primitive::Decimal => {
            CellType::Numeric
        }
        Primitive::Boolean => CellType::Boolean,
        Primitive::Opaque(_) => CellType::Unknown,
    }
}

/// A single stored cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Blank,
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDateTime),
}

impl CellValue {
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    /// Storage classification of this cell. Blank and date cells report
    /// `Unknown` and `Numeric` respectively, the way spreadsheet engines store
    /// dates as serial numbers.
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Blank => CellType::Unknown,
            CellValue::Text(_) => CellType::Text,
            CellValue::Number(_) | CellValue::Date(_) => CellType::Numeric,
            CellValue::Boolean(_) => CellType::Boolean,
        }
    }

    /// Text rendering of any cell; blank cells render as an empty string.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Blank => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Date(d) => format_datetime(d),
        }
    }

    /// Numeric reading with a text fallback.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => parse_f64(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            CellValue::Text(s) => parse_bool(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => parse_naive_datetime(s),
            _ => None,
        }
    }
}
