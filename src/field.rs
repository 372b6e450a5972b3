//! Field descriptor tables.
//!
//! Records expose their fields through an explicit table of
//! [`FieldDescriptor`] entries (name, semantic type, getter, setter) built by
//! [`Record::fields()`]. The mapper validates field names against this table
//! and the codec reads and writes values through it.
//!
//! Scalar Rust types map onto [`FieldType`] through [`FieldValueType`]:
//!
//! | Rust type          | Field type            |
//! |--------------------|-----------------------|
//! | `String`           | `Scalar(Text)`        |
//! | `i32`              | `Scalar(Int32)`       |
//! | `f32` / `f64`      | `Scalar(Float/Double)`|
//! | `Decimal`          | `Scalar(Decimal)`     |
//! | `bool`             | `Scalar(Boolean)`     |
//! | `NaiveDateTime`    | `Scalar(DateTime)`    |
//! | `Option<T>`        | `Nullable(T)`         |
//! | `Vec<T>`           | `List(T)`             |

use std::{fmt, str::FromStr, sync::Arc};

use anyhow::anyhow;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{
    data::FieldValue,
    error::{MappingError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Text,
    Int32,
    Float,
    Double,
    Decimal,
    Boolean,
    DateTime,
    /// A type the codec cannot classify; it travels as text.
    Opaque(&'static str),
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Text => "string",
            Primitive::Int32 => "int32",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Decimal => "decimal",
            Primitive::Boolean => "boolean",
            Primitive::DateTime => "datetime",
            Primitive::Opaque(name) => name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Primitive::Int32 | Primitive::Float | Primitive::Double | Primitive::Decimal
        )
    }

    pub fn variants() -> &'static [&'static str] {
        &[
            "string", "int32", "float", "double", "decimal", "boolean", "datetime",
        ]
    }
}

impl FromStr for Primitive {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "string" | "text" => Ok(Primitive::Text),
            "int32" | "int" | "integer" => Ok(Primitive::Int32),
            "float" | "single" => Ok(Primitive::Float),
            "double" => Ok(Primitive::Double),
            "decimal" => Ok(Primitive::Decimal),
            "boolean" | "bool" => Ok(Primitive::Boolean),
            "datetime" | "date" | "timestamp" => Ok(Primitive::DateTime),
            _ => Err(anyhow!(
                "Unknown field type '{value}'. Supported types: {}",
                Primitive::variants().join(", ")
            )),
        }
    }
}

/// Declared semantic type of a record field, including nullable and list
/// wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Scalar(Primitive),
    Nullable(Primitive),
    List(Primitive),
}

impl FieldType {
    /// The wrapped type when this is nullable-of-X.
    pub fn underlying(&self) -> Option<Primitive> {
        match self {
            FieldType::Nullable(inner) => Some(*inner),
            FieldType::Scalar(_) | FieldType::List(_) => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.underlying().is_some()
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldType::List(_))
    }

    /// The scalar kind stored in (or wrapped by) this type.
    pub fn primitive(&self) -> Primitive {
        match self {
            FieldType::Scalar(inner) | FieldType::Nullable(inner) | FieldType::List(inner) => {
                *inner
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FieldType::Scalar(inner) => inner.as_str().to_string(),
            FieldType::Nullable(inner) => format!("{}?", inner.as_str()),
            FieldType::List(inner) => format!("{}[]", inner.as_str()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

impl FromStr for FieldType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Some(inner) = trimmed.strip_suffix("[]") {
            return Ok(FieldType::List(inner.parse()?));
        }
        if let Some(inner) = trimmed.strip_suffix('?') {
            return Ok(FieldType::Nullable(inner.parse()?));
        }
        Ok(FieldType::Scalar(trimmed.parse()?))
    }
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.describe())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        FieldType::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
    }
}

pub type FieldGetter<R> = Arc<dyn Fn(&R) -> FieldValue + Send + Sync>;
pub type FieldSetter<R> = Arc<dyn Fn(&mut R, FieldValue) -> Result<()> + Send + Sync>;

/// One entry of a record's field table.
pub struct FieldDescriptor<R> {
    name: String,
    field_type: FieldType,
    getter: FieldGetter<R>,
    setter: FieldSetter<R>,
}

impl<R> FieldDescriptor<R> {
    /// Builds a descriptor from a typed getter/setter pair; the semantic type
    /// is derived from `T`.
    ///
    /// ```ignore
    /// FieldDescriptor::new("Name", |r: &Person| r.name.clone(), |r: &mut Person, v| r.name = v)
    /// ```
    pub fn new<T>(name: &str, get: fn(&R) -> T, set: fn(&mut R, T)) -> Self
    where
        T: FieldValueType + 'static,
        R: 'static,
    {
        let owned_name = name.to_string();
        Self {
            name: name.to_string(),
            field_type: T::field_type(),
            getter: Arc::new(move |record| get(record).into_field_value()),
            setter: Arc::new(move |record, value| {
                let typed = T::from_field_value(value).map_err(|found| {
                    MappingError::TypeMismatch {
                        field: owned_name.clone(),
                        expected: T::field_type().describe(),
                        found: found.to_string(),
                        row: None,
                    }
                })?;
                set(record, typed);
                Ok(())
            }),
        }
    }

    /// Builds a descriptor from untyped accessors, for records whose shape is
    /// only known at run time.
    pub fn dynamic<G, S>(name: &str, field_type: FieldType, getter: G, setter: S) -> Self
    where
        G: Fn(&R) -> FieldValue + Send + Sync + 'static,
        S: Fn(&mut R, FieldValue) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            field_type,
            getter: Arc::new(getter),
            setter: Arc::new(setter),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn get(&self, record: &R) -> FieldValue {
        (self.getter)(record)
    }

    pub fn set(&self, record: &mut R, value: FieldValue) -> Result<()> {
        (self.setter)(record, value)
    }
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            field_type: self.field_type,
            getter: Arc::clone(&self.getter),
            setter: Arc::clone(&self.setter),
        }
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .finish_non_exhaustive()
    }
}

/// A record type the codec can read from and construct.
pub trait Record: Default {
    /// Field table in declaration order.
    fn fields() -> Vec<FieldDescriptor<Self>>;
}

/// Conversion between a Rust field type and [`FieldValue`].
///
/// `from_field_value` hands the rejected value back on mismatch so the caller
/// can report what it received.
pub trait FieldValueType: Sized {
    fn field_type() -> FieldType;
    fn into_field_value(self) -> FieldValue;
    fn from_field_value(value: FieldValue) -> std::result::Result<Self, &'static str>;
}

/// Marker for types that may appear inside `Option<T>` and `Vec<T>`.
pub trait ScalarValue: FieldValueType {
    const PRIMITIVE: Primitive;
}

macro_rules! scalar_field_value {
    ($ty:ty, $primitive:ident, $variant:ident) => {
        impl FieldValueType for $ty {
            fn field_type() -> FieldType {
                FieldType::Scalar(Primitive::$primitive)
            }

            fn into_field_value(self) -> FieldValue {
                FieldValue::$variant(self)
            }

            fn from_field_value(value: FieldValue) -> std::result::Result<Self, &'static str> {
                match value {
                    FieldValue::$variant(inner) => Ok(inner),
                    other => Err(other.kind_name()),
                }
            }
        }

        impl ScalarValue for $ty {
            const PRIMITIVE: Primitive = Primitive::$primitive;
        }
    };
}

scalar_field_value!(String, Text, Text);
scalar_field_value!(i32, Int32, Int32);
scalar_field_value!(f32, Float, Float);
scalar_field_value!(f64, Double, Double);
scalar_field_value!(Decimal, Decimal, Decimal);
scalar_field_value!(bool, Boolean, Boolean);
scalar_field_value!(NaiveDateTime, DateTime, DateTime);

impl<T: ScalarValue> FieldValueType for Option<T> {
    fn field_type() -> FieldType {
        FieldType::Nullable(T::PRIMITIVE)
    }

    fn into_field_value(self) -> FieldValue {
        match self {
            Some(inner) => inner.into_field_value(),
            None => FieldValue::Null,
        }
    }

    fn from_field_value(value: FieldValue) -> std::result::Result<Self, &'static str> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_field_value(other).map(Some),
        }
    }
}

impl<T: ScalarValue> FieldValueType for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::List(T::PRIMITIVE)
    }

    fn into_field_value(self) -> FieldValue {
        FieldValue::List(self.into_iter().map(T::into_field_value).collect())
    }

    fn from_field_value(value: FieldValue) -> std::result::Result<Self, &'static str> {
        match value {
            FieldValue::Null => Ok(Vec::new()),
            FieldValue::List(items) => items.into_iter().map(T::from_field_value).collect(),
            other => Err(other.kind_name()),
        }
    }
}
