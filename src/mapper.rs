//! Column mapper: the ordered, position-indexed column list for one record
//! type.
//!
//! ## Rules
//!
//! - Column indices are always dense (`0..n-1`) and follow first-insertion
//!   order; removing a column renumbers the rest without reordering them.
//! - A field name is mapped at most once. Mapping it again merges the
//!   supplied attributes into the existing column in place.
//! - Every name is validated against the record's field table; a failing
//!   call leaves the column list untouched.

use log::debug;

use crate::{
    column::{Column, ColumnSpec},
    data::FieldValue,
    error::{MappingError, Result},
    field::{FieldDescriptor, FieldType, Record},
};

pub struct ColumnMapper<R> {
    fields: Vec<FieldDescriptor<R>>,
    columns: Vec<Column>,
}

impl<R: Record> ColumnMapper<R> {
    /// An empty mapper over the field table of `R`.
    pub fn new() -> Self {
        Self::with_fields(R::fields())
    }

    /// A mapper with every field of `R` mapped using defaults.
    pub fn auto() -> Self {
        let mut mapper = Self::new();
        mapper.auto_map();
        mapper
    }
}

impl<R: Record> Default for ColumnMapper<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ColumnMapper<R> {
    /// An empty mapper over an explicit field table.
    pub fn with_fields(fields: Vec<FieldDescriptor<R>>) -> Self {
        Self {
            fields,
            columns: Vec::new(),
        }
    }

    /// Maps every field in declaration order. Fields that are already mapped
    /// keep their position and configuration.
    pub fn auto_map(&mut self) -> &mut Self {
        let unmapped: Vec<Column> = self
            .fields
            .iter()
            .filter(|f| self.position(f.name()).is_none())
            .map(|f| Column::new(f.name(), f.field_type()))
            .collect();
        for column in unmapped {
            self.push(column);
        }
        debug!("Auto-mapped {} column(s)", self.columns.len());
        self
    }

    /// Maps a field with default attributes, or leaves an existing mapping
    /// as it is.
    pub fn map(&mut self, field_name: &str) -> Result<&mut Self> {
        self.map_with(field_name, ColumnSpec::default())
    }

    /// Maps a field, merging `spec` into the existing column when the field
    /// is already mapped.
    pub fn map_with(&mut self, field_name: &str, spec: ColumnSpec) -> Result<&mut Self> {
        let field_type = self.ensure_field(field_name)?.field_type();
        self.merge_or_append(field_name, field_type, spec);
        Ok(self)
    }

    /// Maps a fully constructed column. Its index is ignored: an existing
    /// mapping keeps its position, a new one is appended.
    pub fn map_column(&mut self, column: Column) -> Result<&mut Self> {
        let declared = self.ensure_field(&column.field_name)?.field_type();
        if declared != column.field_type {
            return Err(MappingError::invalid_field(
                &column.field_name,
                format!(
                    "column declares type {} but the record field is {}",
                    column.field_type, declared
                ),
            ));
        }
        let field_name = column.field_name.clone();
        self.merge_or_append(&field_name, declared, ColumnSpec::from(column));
        Ok(self)
    }

    /// Attaches (or replaces) the encode transform of the column at `index`.
    pub fn map_encoder<F>(&mut self, index: usize, transform: F) -> Result<&mut Self>
    where
        F: Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    {
        let len = self.columns.len();
        let column = self
            .columns
            .get_mut(index)
            .ok_or(MappingError::IndexOutOfRange { index, len })?;
        column.merge(ColumnSpec::new().encoder(transform));
        debug!("Attached encoder to column {index} ('{}')", column.field_name);
        Ok(self)
    }

    /// Maps each name in turn; nothing is mapped if any name is invalid.
    pub fn map_all<I, S>(&mut self, field_names: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolved = field_names
            .into_iter()
            .map(|name| {
                let name = name.as_ref().to_string();
                let field_type = self.ensure_field(&name)?.field_type();
                Ok((name, field_type))
            })
            .collect::<Result<Vec<_>>>()?;
        for (name, field_type) in resolved {
            self.merge_or_append(&name, field_type, ColumnSpec::default());
        }
        Ok(self)
    }

    /// Removes the column mapped to `field_name` and renumbers the rest.
    pub fn unmap(&mut self, field_name: &str) -> Result<&mut Self> {
        let position = self.mapped_position(field_name)?;
        self.columns.remove(position);
        self.renumber();
        debug!("Unmapped '{field_name}', {} column(s) remain", self.columns.len());
        Ok(self)
    }

    /// Removes each named column; fails on the first name that is blank or
    /// not mapped, leaving the mapper unchanged.
    pub fn unmap_all<I, S>(&mut self, field_names: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut remaining = self.columns.clone();
        for name in field_names {
            let name = name.as_ref();
            let position = Self::validate_name(name).and_then(|_| {
                remaining
                    .iter()
                    .position(|c| c.field_name == name)
                    .ok_or_else(|| not_mapped(name))
            })?;
            remaining.remove(position);
        }
        self.columns = remaining;
        self.renumber();
        Ok(self)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, field_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field_name == field_name)
    }

    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header_text.clone()).collect()
    }

    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    pub fn descriptor(&self, field_name: &str) -> Option<&FieldDescriptor<R>> {
        self.fields.iter().find(|f| f.name() == field_name)
    }

    fn validate_name(field_name: &str) -> Result<()> {
        if field_name.trim().is_empty() {
            return Err(MappingError::invalid_field(
                field_name,
                "field name cannot be empty",
            ));
        }
        Ok(())
    }

    fn ensure_field(&self, field_name: &str) -> Result<&FieldDescriptor<R>> {
        Self::validate_name(field_name)?;
        self.descriptor(field_name).ok_or_else(|| {
            MappingError::invalid_field(field_name, "record type has no field with this name")
        })
    }

    fn mapped_position(&self, field_name: &str) -> Result<usize> {
        Self::validate_name(field_name)?;
        self.position(field_name)
            .ok_or_else(|| not_mapped(field_name))
    }

    fn position(&self, field_name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.field_name == field_name)
    }

    /// Callers must have validated `field_name` against the field table.
    fn merge_or_append(&mut self, field_name: &str, field_type: FieldType, spec: ColumnSpec) {
        if let Some(position) = self.position(field_name) {
            self.columns[position].merge(spec);
            debug!("Merged mapping for '{field_name}' at column {position}");
        } else {
            let mut column = Column::new(field_name, field_type);
            column.merge(spec);
            debug!("Mapped '{field_name}' to column {}", self.columns.len());
            self.push(column);
        }
    }

    fn push(&mut self, mut column: Column) {
        column.index = self.columns.len();
        self.columns.push(column);
    }

    fn renumber(&mut self) {
        for (idx, column) in self.columns.iter_mut().enumerate() {
            column.index = idx;
        }
    }
}

fn not_mapped(field_name: &str) -> MappingError {
    MappingError::invalid_field(field_name, "field is not mapped")
}
