//! Mapping layouts: YAML-persisted column configuration.
//!
//! A layout lists the mapped columns in order with their header text,
//! declared datatype and presentation overrides:
//!
//! ```yaml
//! columns:
//!   - field: Id
//!     datatype: int32
//!   - field: Salary
//!     header: Monthly salary
//!     datatype: decimal?
//!   - field: Tags
//!     datatype: string[]
//!     list_separator: "|"
//! ```
//!
//! Layouts can be applied to any mapper whose record declares the same
//! fields, or drive a [`DynamicRecord`] mapper when the record shape is only
//! known at run time. Transforms are code and are never persisted.

use std::{collections::BTreeMap, collections::HashSet, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::{
    cell::{CellType, classify},
    column::{Column, DEFAULT_LIST_SEPARATOR},
    data::FieldValue,
    error::{self, MappingError},
    field::{FieldDescriptor, FieldType, Primitive, Record},
    mapper::ColumnMapper,
};

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutColumn {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub datatype: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_type: Option<CellType>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_separator: Option<String>,
}

impl LayoutColumn {
    pub fn header_text(&self) -> &str {
        self.header
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(&self.field)
    }

    fn to_column(&self) -> Column {
        let mut column = Column::new(&self.field, self.datatype)
            .with_header(self.header_text())
            .with_read_only(self.read_only);
        if let Some(cell_type) = self.cell_type {
            column = column.with_cell_type(cell_type);
        }
        if let Some(separator) = &self.list_separator {
            column = column.with_list_separator(separator);
        }
        column
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingLayout {
    pub columns: Vec<LayoutColumn>,
}

impl MappingLayout {
    /// Captures the columns of an existing mapper.
    pub fn from_mapper<R>(mapper: &ColumnMapper<R>) -> Self {
        let columns = mapper
            .columns()
            .iter()
            .map(|column| LayoutColumn {
                field: column.field_name.clone(),
                header: (column.header_text != column.field_name)
                    .then(|| column.header_text.clone()),
                datatype: column.field_type,
                cell_type: (column.cell_type != classify(&column.field_type))
                    .then_some(column.cell_type),
                read_only: column.read_only,
                list_separator: (column.list_separator != DEFAULT_LIST_SEPARATOR)
                    .then(|| column.list_separator.clone()),
            })
            .collect();
        MappingLayout { columns }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening layout file {path:?}"))?;
        let reader = BufReader::new(file);
        let layout: MappingLayout =
            serde_yaml::from_reader(reader).context("Parsing layout YAML")?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let file = File::create(path).with_context(|| format!("Creating layout file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing layout YAML")
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let layout: MappingLayout = serde_yaml::from_str(input).context("Parsing layout YAML")?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing layout to YAML string")
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            bail!("Layout does not define any columns");
        }
        let mut seen = HashSet::new();
        for (idx, column) in self.columns.iter().enumerate() {
            if column.field.trim().is_empty() {
                bail!("Layout column {} has an empty field name", idx + 1);
            }
            if !seen.insert(column.field.as_str()) {
                bail!("Layout maps field '{}' more than once", column.field);
            }
            if let FieldType::Scalar(Primitive::Opaque(_))
            | FieldType::Nullable(Primitive::Opaque(_))
            | FieldType::List(Primitive::Opaque(_)) = column.datatype
            {
                bail!("Layout column '{}' uses an opaque datatype", column.field);
            }
            if column.list_separator.as_deref() == Some("") {
                bail!("Layout column '{}' has an empty list separator", column.field);
            }
        }
        Ok(())
    }

    /// Field table for records whose shape is described by this layout.
    pub fn dynamic_fields(&self) -> Vec<FieldDescriptor<DynamicRecord>> {
        self.columns
            .iter()
            .map(|column| dynamic_field(&column.field, column.datatype))
            .collect()
    }

    /// A mapper over [`DynamicRecord`] with this layout applied.
    pub fn dynamic_mapper(&self) -> error::Result<ColumnMapper<DynamicRecord>> {
        let mut mapper = ColumnMapper::with_fields(self.dynamic_fields());
        mapper.apply_layout(self)?;
        Ok(mapper)
    }
}

impl<R> ColumnMapper<R> {
    /// Maps every layout column in order, merging into existing mappings.
    /// All columns are checked against the record's field table first; on
    /// failure the mapper is left unchanged.
    pub fn apply_layout(&mut self, layout: &MappingLayout) -> error::Result<&mut Self> {
        for column in &layout.columns {
            let descriptor = self.descriptor(&column.field).ok_or_else(|| {
                MappingError::InvalidField {
                    field: column.field.clone(),
                    reason: "record type has no field with this name".to_string(),
                }
            })?;
            if descriptor.field_type() != column.datatype {
                return Err(MappingError::InvalidField {
                    field: column.field.clone(),
                    reason: format!(
                        "layout declares type {} but the record field is {}",
                        column.datatype,
                        descriptor.field_type()
                    ),
                });
            }
        }
        for column in &layout.columns {
            self.map_column(column.to_column())?;
        }
        Ok(self)
    }
}

/// A record whose fields are held by name, for shapes known only at run
/// time. Unset fields read as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRecord {
    values: BTreeMap<String, FieldValue>,
}

impl DynamicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> &FieldValue {
        self.values.get(field).unwrap_or(&FieldValue::Null)
    }

    pub fn set(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field.to_string(), value);
    }

    pub fn with(mut self, field: &str, value: FieldValue) -> Self {
        self.set(field, value);
        self
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Record for DynamicRecord {
    /// Dynamic records carry no static field table; build mappers with
    /// [`MappingLayout::dynamic_mapper`] instead.
    fn fields() -> Vec<FieldDescriptor<Self>> {
        Vec::new()
    }
}

fn dynamic_field(name: &str, field_type: FieldType) -> FieldDescriptor<DynamicRecord> {
    let read_name = name.to_string();
    let write_name = name.to_string();
    FieldDescriptor::dynamic(
        name,
        field_type,
        move |record: &DynamicRecord| record.get(&read_name).clone(),
        move |record: &mut DynamicRecord, value: FieldValue| {
            if !accepts(field_type, &value) {
                return Err(MappingError::TypeMismatch {
                    field: write_name.clone(),
                    expected: field_type.describe(),
                    found: value.kind_name().to_string(),
                    row: None,
                });
            }
            record.set(&write_name, value);
            Ok(())
        },
    )
}

fn accepts(field_type: FieldType, value: &FieldValue) -> bool {
    match (field_type, value) {
        (FieldType::Scalar(_), FieldValue::Null) => false,
        (_, FieldValue::Null) => true,
        (FieldType::List(inner), FieldValue::List(items)) => items
            .iter()
            .all(|item| primitive_accepts(inner, item)),
        (FieldType::List(_), _) => false,
        (FieldType::Scalar(inner) | FieldType::Nullable(inner), value) => {
            primitive_accepts(inner, value)
        }
    }
}

fn primitive_accepts(primitive: Primitive, value: &FieldValue) -> bool {
    matches!(
        (primitive, value),
        (Primitive::Text | Primitive::Opaque(_), FieldValue::Text(_))
            | (Primitive::Int32, FieldValue::Int32(_))
            | (Primitive::Float, FieldValue::Float(_))
            | (Primitive::Double, FieldValue::Double(_))
            | (Primitive::Decimal, FieldValue::Decimal(_))
            | (Primitive::Boolean, FieldValue::Boolean(_))
            | (Primitive::DateTime, FieldValue::DateTime(_))
    )
}
