//! Column model: the mapping configuration for one record field.

use std::{fmt, sync::Arc};

use crate::{
    cell::{CellType, classify},
    data::FieldValue,
    field::{FieldType, Primitive},
};

pub const DEFAULT_LIST_SEPARATOR: &str = ";";

/// Custom value hook applied around default cell serialization.
pub type ValueTransform = Arc<dyn Fn(FieldValue) -> FieldValue + Send + Sync>;

#[derive(Clone)]
pub struct Column {
    pub index: usize,
    pub field_name: String,
    pub header_text: String,
    pub field_type: FieldType,
    pub cell_type: CellType,
    pub read_only: bool,
    pub list_separator: String,
    pub encoder: Option<ValueTransform>,
    pub decoder: Option<ValueTransform>,
}

impl Column {
    /// A column with every attribute at its default: header equal to the
    /// field name, inferred cell type, `";"` list separator, no transforms.
    pub fn new(field_name: &str, field_type: FieldType) -> Self {
        Self {
            index: 0,
            field_name: field_name.to_string(),
            header_text: field_name.to_string(),
            field_type,
            cell_type: classify(&field_type),
            read_only: false,
            list_separator: DEFAULT_LIST_SEPARATOR.to_string(),
            encoder: None,
            decoder: None,
        }
    }

    pub fn with_header(mut self, header_text: &str) -> Self {
        self.header_text = header_text.to_string();
        self
    }

    pub fn with_cell_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = cell_type;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_list_separator(mut self, separator: &str) -> Self {
        self.list_separator = separator.to_string();
        self
    }

    pub fn with_encoder<F>(mut self, transform: F) -> Self
    where
        F: Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    {
        self.encoder = Some(Arc::new(transform));
        self
    }

    pub fn with_decoder<F>(mut self, transform: F) -> Self
    where
        F: Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    {
        self.decoder = Some(Arc::new(transform));
        self
    }

    /// The wrapped type when the declared type is nullable-of-X.
    pub fn underlying_type(&self) -> Option<Primitive> {
        self.field_type.underlying()
    }

    pub fn is_nullable(&self) -> bool {
        self.underlying_type().is_some()
    }

    pub fn primitive(&self) -> Primitive {
        self.field_type.primitive()
    }

    pub fn apply_encoder(&self, value: FieldValue) -> FieldValue {
        match &self.encoder {
            Some(transform) => transform(value),
            None => value,
        }
    }

    pub fn apply_decoder(&self, value: FieldValue) -> FieldValue {
        match &self.decoder {
            Some(transform) => transform(value),
            None => value,
        }
    }

    /// Folds explicitly supplied attributes into this column, keeping its
    /// position and declared type.
    pub(crate) fn merge(&mut self, spec: ColumnSpec) {
        if let Some(header) = spec.header_text.filter(|h| !h.trim().is_empty()) {
            self.header_text = header;
        }
        if let Some(cell_type) = spec.cell_type.filter(|t| *t != CellType::Unknown) {
            self.cell_type = cell_type;
        }
        if let Some(read_only) = spec.read_only {
            self.read_only = read_only;
        }
        if let Some(separator) = spec.list_separator.filter(|s| !s.is_empty()) {
            self.list_separator = separator;
        }
        if spec.encoder.is_some() {
            self.encoder = spec.encoder;
        }
        if spec.decoder.is_some() {
            self.decoder = spec.decoder;
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("index", &self.index)
            .field("field_name", &self.field_name)
            .field("header_text", &self.header_text)
            .field("field_type", &self.field_type)
            .field("cell_type", &self.cell_type)
            .field("read_only", &self.read_only)
            .field("list_separator", &self.list_separator)
            .field("encoder", &self.encoder.is_some())
            .field("decoder", &self.decoder.is_some())
            .finish()
    }
}

/// Attributes supplied to a `map` call. Unset attributes keep their current
/// (or default) values.
#[derive(Clone, Default)]
pub struct ColumnSpec {
    pub header_text: Option<String>,
    pub cell_type: Option<CellType>,
    pub read_only: Option<bool>,
    pub list_separator: Option<String>,
    pub encoder: Option<ValueTransform>,
    pub decoder: Option<ValueTransform>,
}

impl ColumnSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header_text: &str) -> Self {
        self.header_text = Some(header_text.to_string());
        self
    }

    pub fn cell_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = Some(cell_type);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn list_separator(mut self, separator: &str) -> Self {
        self.list_separator = Some(separator.to_string());
        self
    }

    pub fn encoder<F>(mut self, transform: F) -> Self
    where
        F: Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    {
        self.encoder = Some(Arc::new(transform));
        self
    }

    pub fn decoder<F>(mut self, transform: F) -> Self
    where
        F: Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    {
        self.decoder = Some(Arc::new(transform));
        self
    }
}

impl From<Column> for ColumnSpec {
    fn from(column: Column) -> Self {
        Self {
            header_text: Some(column.header_text),
            cell_type: Some(column.cell_type),
            read_only: Some(column.read_only),
            list_separator: Some(column.list_separator),
            encoder: column.encoder,
            decoder: column.decoder,
        }
    }
}
