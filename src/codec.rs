//! Record codec: records → typed cell rows and back.
//!
//! ## Encoding
//!
//! Row 0 of every sheet holds the column headers. Each record becomes one
//! row with one cell per mapped column, in column order. Cell serialization
//! follows the field's primitive kind:
//!
//! - date-times become native date cells;
//! - `int32`, `float`, `double` and `decimal` become number cells. Storage
//!   is `f64`, so decimals with more than ~15 significant digits lose
//!   precision on the way out;
//! - booleans become boolean cells;
//! - everything else (including joined lists) becomes text.
//!
//! ## Decoding
//!
//! Decoding walks every sheet the reader exposes, skips each header row,
//! any row the storage never created and any row whose mapped cells are all
//! blank, and builds one record per remaining row. Errors abort the whole call; no partial result is returned.
//!
//! Row and column numbers in errors are 1-based, as a spreadsheet displays
//! them (the first data row is row 2).

use std::str::FromStr;

use itertools::Itertools;
use log::{debug, info};
use rust_decimal::Decimal;

use crate::{
    cell::{CellType, CellValue, classify},
    column::Column,
    data::{
        FieldValue, decimal_from_f64, int32_from_f64, parse_bool, parse_f64, parse_naive_datetime,
    },
    error::{MappingError, Result},
    field::{FieldDescriptor, Primitive},
    mapper::ColumnMapper,
    workbook::{ColumnStyle, Workbook, WorkbookReader, WorkbookWriter},
};

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_DATE_FORMAT: &str = "dd/mm/yyyy";
/// Spreadsheet row limit minus the header row.
pub const MAX_DATA_ROWS_PER_SHEET: usize = 1_048_575;

/// Presentation settings for one encode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub sheet_name: String,
    /// Data rows per sheet; further records continue on additional sheets,
    /// each with its own header row.
    pub max_rows_per_sheet: usize,
    pub date_format: String,
    pub autosize: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            max_rows_per_sheet: MAX_DATA_ROWS_PER_SHEET,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            autosize: true,
        }
    }
}

pub struct RecordCodec<'m, R> {
    mapper: &'m ColumnMapper<R>,
    options: EncodeOptions,
}

type Binding<'a, R> = (&'a Column, &'a FieldDescriptor<R>);

impl<'m, R> RecordCodec<'m, R> {
    pub fn new(mapper: &'m ColumnMapper<R>) -> Self {
        Self::with_options(mapper, EncodeOptions::default())
    }

    pub fn with_options(mapper: &'m ColumnMapper<R>, options: EncodeOptions) -> Self {
        Self { mapper, options }
    }

    pub fn mapper(&self) -> &ColumnMapper<R> {
        self.mapper
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encodes `records` into a fresh in-memory workbook.
    pub fn encode(&self, records: &[R]) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        self.encode_into(records, &mut workbook)?;
        Ok(workbook)
    }

    /// Encodes `records` through any storage writer. Returns the number of
    /// sheets created.
    pub fn encode_into<W: WorkbookWriter>(&self, records: &[R], writer: &mut W) -> Result<usize> {
        let bindings = self.bindings()?;
        let per_sheet = self.options.max_rows_per_sheet.max(1);
        let pages: Vec<&[R]> = if records.is_empty() {
            vec![records]
        } else {
            records.chunks(per_sheet).collect()
        };

        for (page, chunk) in pages.iter().enumerate() {
            let sheet = writer.create_sheet(&self.sheet_name(page))?;
            self.write_header(writer, sheet)?;
            for (offset, record) in chunk.iter().enumerate() {
                let row = offset + 1;
                for (column, descriptor) in &bindings {
                    let cell = self.encode_cell(column, descriptor, record, row + 1)?;
                    writer.write_cell(sheet, row, column.index, cell)?;
                }
            }
            self.finish_sheet(writer, sheet)?;
            debug!(
                "Encoded {} record(s) into sheet '{}'",
                chunk.len(),
                self.sheet_name(page)
            );
        }

        info!(
            "Encoded {} record(s) across {} column(s) into {} sheet(s)",
            records.len(),
            bindings.len(),
            pages.len()
        );
        Ok(pages.len())
    }

    fn sheet_name(&self, page: usize) -> String {
        if page == 0 {
            self.options.sheet_name.clone()
        } else {
            format!("{}_{}", self.options.sheet_name, page + 1)
        }
    }

    fn write_header<W: WorkbookWriter>(&self, writer: &mut W, sheet: usize) -> Result<()> {
        for column in self.mapper.columns() {
            writer.write_cell(
                sheet,
                0,
                column.index,
                CellValue::Text(column.header_text.clone()),
            )?;
        }
        Ok(())
    }

    fn finish_sheet<W: WorkbookWriter>(&self, writer: &mut W, sheet: usize) -> Result<()> {
        for column in self.mapper.columns() {
            let style = ColumnStyle {
                cell_type: column.cell_type,
                read_only: column.read_only,
                date_format: (column.primitive() == Primitive::DateTime)
                    .then(|| self.options.date_format.clone()),
            };
            writer.set_column_style(sheet, column.index, &style)?;
            if self.options.autosize {
                writer.autosize_column(sheet, column.index)?;
            }
        }
        Ok(())
    }

    fn encode_cell(
        &self,
        column: &Column,
        descriptor: &FieldDescriptor<R>,
        record: &R,
        row_number: usize,
    ) -> Result<CellValue> {
        let value = descriptor.get(record);
        if column.is_nullable() && value.is_null() {
            return Ok(CellValue::Blank);
        }
        let value = if column.field_type.is_list() {
            join_list(value, &column.list_separator)
        } else {
            value
        };
        let value = column.apply_encoder(value);
        to_cell(column, value, row_number)
    }

    /// Decodes every data row the reader exposes into records.
    pub fn decode<S: WorkbookReader>(&self, reader: &S) -> Result<Vec<R>>
    where
        R: Default,
    {
        let bindings = self.bindings()?;
        let mut records = Vec::new();
        for sheet in 0..reader.sheet_count() {
            let Some(last_row) = reader.last_row_index(sheet) else {
                continue;
            };
            let before = records.len();
            for row in 1..=last_row {
                if !reader.row_exists(sheet, row) || is_blank_row(reader, sheet, row, &bindings) {
                    continue;
                }
                records.push(self.decode_row(reader, sheet, row, &bindings)?);
            }
            debug!(
                "Decoded {} record(s) from sheet {sheet}",
                records.len() - before
            );
        }
        info!(
            "Decoded {} record(s) across {} column(s)",
            records.len(),
            bindings.len()
        );
        Ok(records)
    }

    fn decode_row<S: WorkbookReader>(
        &self,
        reader: &S,
        sheet: usize,
        row: usize,
        bindings: &[Binding<'_, R>],
    ) -> Result<R>
    where
        R: Default,
    {
        let row_number = row + 1;
        let mut record = R::default();
        for (column, descriptor) in bindings {
            let cell = reader
                .cell(sheet, row, column.index)
                .filter(|cell| !cell.is_blank());
            let value = match cell {
                None if column.is_nullable() => FieldValue::Null,
                None => {
                    return Err(MappingError::RequiredFieldMissing {
                        field: column.field_name.clone(),
                        row: row_number,
                    });
                }
                Some(cell) => column.apply_decoder(
                    from_cell(column, cell, row_number).map_err(|err| err.at_row(row_number))?,
                ),
            };
            descriptor
                .set(&mut record, value)
                .map_err(|err| err.at_row(row_number))?;
        }
        Ok(record)
    }

    fn bindings(&self) -> Result<Vec<Binding<'_, R>>> {
        self.mapper
            .columns()
            .iter()
            .map(|column| {
                self.mapper
                    .descriptor(&column.field_name)
                    .map(|descriptor| (column, descriptor))
                    .ok_or_else(|| {
                        MappingError::invalid_field(
                            &column.field_name,
                            "record type has no field with this name",
                        )
                    })
            })
            .collect()
    }
}

/// Encodes `records` with default options.
pub fn encode<R>(mapper: &ColumnMapper<R>, records: &[R]) -> Result<Workbook> {
    RecordCodec::new(mapper).encode(records)
}

/// Decodes every data row of `reader` into records.
pub fn decode<R, S>(mapper: &ColumnMapper<R>, reader: &S) -> Result<Vec<R>>
where
    R: Default,
    S: WorkbookReader,
{
    RecordCodec::new(mapper).decode(reader)
}

/// True when every mapped cell of the row is missing, blank or whitespace.
fn is_blank_row<R, S: WorkbookReader>(
    reader: &S,
    sheet: usize,
    row: usize,
    bindings: &[Binding<'_, R>],
) -> bool {
    bindings.iter().all(|(column, _)| {
        reader
            .cell(sheet, row, column.index)
            .is_none_or(|cell| match cell {
                CellValue::Blank => true,
                CellValue::Text(text) => text.trim().is_empty(),
                _ => false,
            })
    })
}

fn join_list(value: FieldValue, separator: &str) -> FieldValue {
    match value {
        FieldValue::List(items) => {
            FieldValue::Text(items.iter().map(FieldValue::as_display).join(separator))
        }
        FieldValue::Null => FieldValue::Text(String::new()),
        other => other,
    }
}

fn numeric_error(column: &Column, row_number: usize, value: &str) -> MappingError {
    MappingError::NumericFormat {
        field: column.field_name.clone(),
        row: row_number,
        column: column.index + 1,
        value: value.to_string(),
    }
}

fn type_error(column: &Column, expected: Primitive, found: &str) -> MappingError {
    MappingError::TypeMismatch {
        field: column.field_name.clone(),
        expected: expected.as_str().to_string(),
        found: format!("'{found}'"),
        row: None,
    }
}

fn to_cell(column: &Column, value: FieldValue, row_number: usize) -> Result<CellValue> {
    if value.is_null() {
        return Ok(CellValue::Blank);
    }
    let primitive = column.primitive();
    let forced_text =
        column.cell_type == CellType::Text && classify(&column.field_type) != CellType::Text;
    if column.field_type.is_list() || forced_text {
        return Ok(CellValue::Text(value.as_display()));
    }

    let cell = match (primitive, value) {
        (Primitive::DateTime, FieldValue::DateTime(dt)) => CellValue::Date(dt),
        (Primitive::Boolean, FieldValue::Boolean(b)) => CellValue::Boolean(b),
        (p, FieldValue::Text(text)) if p.is_numeric() => {
            let number =
                parse_f64(&text).ok_or_else(|| numeric_error(column, row_number, &text))?;
            CellValue::Number(number)
        }
        (p, value) if p.is_numeric() => match value.as_f64() {
            Some(number) => CellValue::Number(number),
            None => CellValue::Text(value.as_display()),
        },
        (_, value) => CellValue::Text(value.as_display()),
    };
    Ok(cell)
}

fn from_cell(column: &Column, cell: &CellValue, row_number: usize) -> Result<FieldValue> {
    let primitive = column.primitive();
    if column.field_type.is_list() {
        let text = cell.as_text();
        let items = text
            .split(column.list_separator.as_str())
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| parse_element(column, primitive, fragment, row_number))
            .collect::<Result<Vec<_>>>()?;
        return Ok(if items.is_empty() {
            FieldValue::Null
        } else {
            FieldValue::List(items)
        });
    }

    let value = match primitive {
        Primitive::DateTime => cell
            .as_date()
            .map(FieldValue::DateTime)
            .ok_or_else(|| type_error(column, primitive, &cell.as_text()))?,
        Primitive::Decimal => match cell {
            CellValue::Text(text) => match Decimal::from_str(text.trim()) {
                Ok(decimal) => FieldValue::Decimal(decimal),
                Err(_) => read_number(column, cell, row_number, primitive)?,
            },
            _ => read_number(column, cell, row_number, primitive)?,
        },
        Primitive::Int32 | Primitive::Float | Primitive::Double => {
            read_number(column, cell, row_number, primitive)?
        }
        // Unreadable booleans fall back to null, or false when the field
        // cannot hold null.
        Primitive::Boolean => match cell.as_bool() {
            Some(flag) => FieldValue::Boolean(flag),
            None if column.is_nullable() => FieldValue::Null,
            None => FieldValue::Boolean(false),
        },
        Primitive::Text | Primitive::Opaque(_) => FieldValue::Text(cell.as_text()),
    };
    Ok(value)
}

fn read_number(
    column: &Column,
    cell: &CellValue,
    row_number: usize,
    primitive: Primitive,
) -> Result<FieldValue> {
    let number = cell
        .as_number()
        .ok_or_else(|| numeric_error(column, row_number, &cell.as_text()))?;
    narrow_number(number, primitive)
        .ok_or_else(|| numeric_error(column, row_number, &cell.as_text()))
}

fn narrow_number(number: f64, primitive: Primitive) -> Option<FieldValue> {
    match primitive {
        Primitive::Int32 => int32_from_f64(number).map(FieldValue::Int32),
        Primitive::Float => Some(FieldValue::Float(number as f32)),
        Primitive::Double => Some(FieldValue::Double(number)),
        Primitive::Decimal => decimal_from_f64(number).map(FieldValue::Decimal),
        _ => None,
    }
}

fn parse_element(
    column: &Column,
    primitive: Primitive,
    fragment: &str,
    row_number: usize,
) -> Result<FieldValue> {
    match primitive {
        Primitive::Decimal => Decimal::from_str(fragment)
            .map(FieldValue::Decimal)
            .map_err(|_| numeric_error(column, row_number, fragment)),
        p if p.is_numeric() => parse_f64(fragment)
            .and_then(|number| narrow_number(number, p))
            .ok_or_else(|| numeric_error(column, row_number, fragment)),
        Primitive::Boolean => parse_bool(fragment)
            .map(FieldValue::Boolean)
            .ok_or_else(|| type_error(column, primitive, fragment)),
        Primitive::DateTime => parse_naive_datetime(fragment)
            .map(FieldValue::DateTime)
            .ok_or_else(|| type_error(column, primitive, fragment)),
        _ => Ok(FieldValue::Text(fragment.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        column::ColumnSpec,
        field::{FieldType, Record},
    };

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Item {
        code: String,
        quantity: i32,
        discount: Option<f64>,
        sizes: Vec<i32>,
    }

    impl Record for Item {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::new(
                    "Code",
                    |r: &Item| r.code.clone(),
                    |r: &mut Item, v| r.code = v,
                ),
                FieldDescriptor::new(
                    "Quantity",
                    |r: &Item| r.quantity,
                    |r: &mut Item, v| r.quantity = v,
                ),
                FieldDescriptor::new(
                    "Discount",
                    |r: &Item| r.discount,
                    |r: &mut Item, v| r.discount = v,
                ),
                FieldDescriptor::new(
                    "Sizes",
                    |r: &Item| r.sizes.clone(),
                    |r: &mut Item, v| r.sizes = v,
                ),
            ]
        }
    }

    fn item(code: &str, quantity: i32, discount: Option<f64>, sizes: Vec<i32>) -> Item {
        Item {
            code: code.to_string(),
            quantity,
            discount,
            sizes,
        }
    }

    #[test]
    fn encode_writes_header_and_typed_cells() {
        let mapper = ColumnMapper::<Item>::auto();
        let workbook = encode(&mapper, &[item("A-1", 3, None, vec![1, 2])]).unwrap();
        let sheet = workbook.sheet(0).unwrap();

        assert_eq!(sheet.name(), DEFAULT_SHEET_NAME);
        assert_eq!(sheet.cell(0, 1), Some(&CellValue::Text("Quantity".into())));
        assert_eq!(sheet.cell(1, 0), Some(&CellValue::Text("A-1".into())));
        assert_eq!(sheet.cell(1, 1), Some(&CellValue::Number(3.0)));
        assert_eq!(sheet.cell(1, 2), Some(&CellValue::Blank));
        assert_eq!(sheet.cell(1, 3), Some(&CellValue::Text("1;2".into())));
    }

    #[test]
    fn encoder_text_zero_becomes_numeric_zero() {
        let mut mapper = ColumnMapper::<Item>::auto();
        mapper
            .map_with(
                "Quantity",
                ColumnSpec::new().encoder(|_| FieldValue::Text("0".into())),
            )
            .unwrap();
        let workbook = encode(&mapper, &[item("A", 9, None, vec![])]).unwrap();
        assert_eq!(workbook.cell(0, 1, 1), Some(&CellValue::Number(0.0)));
    }

    #[test]
    fn encoder_producing_non_numeric_text_fails() {
        let mut mapper = ColumnMapper::<Item>::auto();
        mapper
            .map_encoder(1, |_| FieldValue::Text("many".into()))
            .unwrap();
        let err = encode(&mapper, &[item("A", 9, None, vec![])]).unwrap_err();
        match err {
            MappingError::NumericFormat {
                field, row, column, ..
            } => {
                assert_eq!(field, "Quantity");
                assert_eq!(row, 2);
                assert_eq!(column, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn explicit_text_cell_type_stores_numbers_as_text() {
        let mut mapper = ColumnMapper::<Item>::auto();
        mapper
            .map_with("Quantity", ColumnSpec::new().cell_type(CellType::Text))
            .unwrap();
        let workbook = encode(&mapper, &[item("A", 12, None, vec![])]).unwrap();
        assert_eq!(workbook.cell(0, 1, 1), Some(&CellValue::Text("12".into())));

        let decoded = decode(&mapper, &workbook).unwrap();
        assert_eq!(decoded[0].quantity, 12);
    }

    #[test]
    fn pagination_splits_sheets_and_decode_concatenates() {
        let mapper = ColumnMapper::<Item>::auto();
        let records: Vec<Item> = (0..5)
            .map(|i| item(&format!("C{i}"), i, Some(0.5), vec![i]))
            .collect();
        let options = EncodeOptions {
            max_rows_per_sheet: 2,
            ..EncodeOptions::default()
        };
        let workbook = RecordCodec::with_options(&mapper, options)
            .encode(&records)
            .unwrap();
        assert_eq!(workbook.sheet_count(), 3);
        assert_eq!(workbook.sheet(1).unwrap().name(), "Sheet1_2");

        let decoded = decode(&mapper, &workbook).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn decode_skips_rows_never_written() {
        let mapper = ColumnMapper::<Item>::auto();
        let mut workbook = encode(&mapper, &[item("A", 1, None, vec![])]).unwrap();
        for (column, value) in [
            CellValue::Text("B".into()),
            CellValue::Number(2.0),
            CellValue::Blank,
            CellValue::Text(String::new()),
        ]
        .into_iter()
        .enumerate()
        {
            workbook.write_cell(0, 4, column, value).unwrap();
        }
        let decoded = decode(&mapper, &workbook).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].code, "B");
        assert!(decoded[1].sizes.is_empty());
    }

    #[test]
    fn required_field_missing_reports_row() {
        let mapper = ColumnMapper::<Item>::auto();
        let mut workbook = encode(&mapper, &[item("A", 1, None, vec![])]).unwrap();
        workbook.write_cell(0, 1, 1, CellValue::Blank).unwrap();
        let err = decode(&mapper, &workbook).unwrap_err();
        assert!(matches!(
            err,
            MappingError::RequiredFieldMissing { ref field, row: 2 } if field == "Quantity"
        ));
    }

    #[test]
    fn numeric_text_fallback_and_failure() {
        let mapper = ColumnMapper::<Item>::auto();
        let mut workbook = encode(&mapper, &[item("A", 1, Some(0.25), vec![])]).unwrap();
        workbook
            .write_cell(0, 1, 2, CellValue::Text(" 0.75 ".into()))
            .unwrap();
        assert_eq!(decode(&mapper, &workbook).unwrap()[0].discount, Some(0.75));

        workbook
            .write_cell(0, 1, 2, CellValue::Text("n/a".into()))
            .unwrap();
        let err = decode(&mapper, &workbook).unwrap_err();
        assert!(matches!(err, MappingError::NumericFormat { column: 3, .. }));
    }

    #[test]
    fn decoder_transform_runs_before_assignment() {
        let mut mapper = ColumnMapper::<Item>::auto();
        mapper
            .map_with(
                "Code",
                ColumnSpec::new()
                    .encoder(|v| FieldValue::Text(v.as_display().to_lowercase()))
                    .decoder(|v| FieldValue::Text(v.as_display().to_uppercase())),
            )
            .unwrap();
        let workbook = encode(&mapper, &[item("Ab", 1, None, vec![])]).unwrap();
        assert_eq!(workbook.cell(0, 1, 0), Some(&CellValue::Text("ab".into())));
        assert_eq!(decode(&mapper, &workbook).unwrap()[0].code, "AB");
    }

    #[test]
    fn column_styles_follow_mapping() {
        let mut mapper = ColumnMapper::<Item>::auto();
        mapper
            .map_with("Code", ColumnSpec::new().read_only(true))
            .unwrap();
        let workbook = encode(&mapper, &[]).unwrap();
        let sheet = workbook.sheet(0).unwrap();
        let style = sheet.column_style(0).unwrap();
        assert!(style.read_only);
        assert_eq!(style.cell_type, CellType::Text);
        assert_eq!(sheet.column_style(1).unwrap().cell_type, CellType::Numeric);
        assert_eq!(sheet.data_row_count(), 0);
        assert!(sheet.column_width(0).is_some());
    }

    #[test]
    fn list_elements_that_fail_to_parse_are_numeric_errors() {
        let mapper = ColumnMapper::<Item>::auto();
        let mut workbook = encode(&mapper, &[item("A", 1, None, vec![1])]).unwrap();
        workbook
            .write_cell(0, 1, 3, CellValue::Text("1;x".into()))
            .unwrap();
        let err = decode(&mapper, &workbook).unwrap_err();
        assert_eq!(err.field(), Some("Sizes"));
        assert!(FieldType::List(Primitive::Int32).is_list());
    }

    #[test]
    fn rows_with_only_blank_cells_are_skipped() {
        let mapper = ColumnMapper::<Item>::auto();
        let mut workbook = encode(&mapper, &[item("A", 1, None, vec![2])]).unwrap();
        for column in 0..4 {
            workbook.write_cell(0, 2, column, CellValue::Blank).unwrap();
        }
        workbook
            .write_cell(0, 3, 0, CellValue::Text("  ".into()))
            .unwrap();
        workbook.write_cell(0, 3, 7, CellValue::Number(1.0)).unwrap();

        let decoded = decode(&mapper, &workbook).unwrap();
        assert_eq!(decoded, vec![item("A", 1, None, vec![2])]);
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Flag {
        on: bool,
        maybe: Option<bool>,
    }

    impl Record for Flag {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::new("On", |r: &Flag| r.on, |r: &mut Flag, v| r.on = v),
                FieldDescriptor::new("Maybe", |r: &Flag| r.maybe, |r: &mut Flag, v| r.maybe = v),
            ]
        }
    }

    #[test]
    fn unreadable_booleans_default_instead_of_failing() {
        let mapper = ColumnMapper::<Flag>::auto();
        let mut workbook = encode(
            &mapper,
            &[Flag {
                on: true,
                maybe: Some(true),
            }],
        )
        .unwrap();
        workbook
            .write_cell(0, 1, 0, CellValue::Text("perhaps".into()))
            .unwrap();
        workbook
            .write_cell(0, 1, 1, CellValue::Text("perhaps".into()))
            .unwrap();

        let decoded = decode(&mapper, &workbook).unwrap();
        assert_eq!(decoded, vec![Flag::default()]);
    }

    #[test]
    fn type_mismatch_during_decode_carries_row() {
        let mut mapper = ColumnMapper::<Item>::auto();
        mapper
            .map_with("Code", ColumnSpec::new().decoder(|_| FieldValue::Int32(7)))
            .unwrap();
        let workbook = encode(
            &mapper,
            &[item("A", 1, None, vec![]), item("B", 2, None, vec![])],
        )
        .unwrap();
        let err = decode(&mapper, &workbook).unwrap_err();
        assert!(matches!(
            err,
            MappingError::TypeMismatch { ref field, row: Some(2), .. } if field == "Code"
        ));
        assert_eq!(err.row(), Some(2));
    }
}
