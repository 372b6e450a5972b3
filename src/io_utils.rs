//! CSV storage adapter: delimited text files as single-sheet workbooks.
//!
//! - **Delimiter resolution**: `.tsv` → tab, anything else → comma, unless
//!   overridden.
//! - **Encoding**: input bytes are decoded through `encoding_rs`, defaulting
//!   to UTF-8. Output is always UTF-8.
//! - **Cells**: an empty field reads as a blank cell, everything else as
//!   text. The first record is the header row.
//! - **stdin/stdout**: the `-` path routes through the standard streams.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{
    cell::CellValue,
    workbook::{Sheet, Workbook},
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| delimiter_for_extension(path).unwrap_or(DEFAULT_CSV_DELIMITER))
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    provided
        .or_else(|| path.and_then(delimiter_for_extension))
        .unwrap_or(fallback)
}

fn delimiter_for_extension(path: &Path) -> Option<u8> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => Some(DEFAULT_TSV_DELIMITER),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Some(DEFAULT_CSV_DELIMITER),
        _ => None,
    }
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if is_dash(path) {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if !is_dash(p) => Ok(Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        ))),
        _ => Ok(Box::new(std::io::stdout())),
    }
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ));
    }
    Ok(text.into_owned())
}

fn to_cell(field: String) -> CellValue {
    if field.is_empty() {
        CellValue::Blank
    } else {
        CellValue::Text(field)
    }
}

/// Reads any delimited source into a one-sheet workbook named after the
/// file stem. Rows may have differing widths.
pub fn read_workbook_from<R: Read>(
    source: R,
    sheet_name: &str,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Workbook> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(source);

    let mut sheet = Sheet::new(sheet_name);
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 1))?;
        let cells = record
            .iter()
            .map(|field| decode_bytes(field, encoding).map(to_cell))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Decoding row {}", idx + 1))?;
        sheet.push_row(cells);
    }
    debug!(
        "Read {} data row(s) into sheet '{}'",
        sheet.data_row_count(),
        sheet.name()
    );

    let mut workbook = Workbook::new();
    workbook.push_sheet(sheet);
    Ok(workbook)
}

pub fn read_workbook(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Workbook> {
    let sheet_name = if is_dash(path) {
        "stdin".to_string()
    } else {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("Sheet1")
            .to_string()
    };
    let input = open_input(path)?;
    read_workbook_from(input, &sheet_name, delimiter, encoding)
        .with_context(|| format!("Reading {path:?}"))
}

/// Writes every sheet's rows in order as one table. Only the first sheet's
/// header row is emitted; later sheets contribute data rows. Gaps within a
/// row become empty fields; rows the storage never created are not emitted.
pub fn write_workbook_to<W: Write>(workbook: &Workbook, sink: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .flexible(true)
        .from_writer(sink);
    for (idx, sheet) in workbook.sheets().iter().enumerate() {
        for (_, row) in sheet.rows().filter(|(row_idx, _)| idx == 0 || *row_idx > 0) {
            let fields = row
                .dense_cells()
                .iter()
                .map(CellValue::as_text)
                .collect::<Vec<_>>();
            writer.write_record(&fields)?;
        }
    }
    writer.flush().context("Flushing CSV output")?;
    Ok(())
}

pub fn write_workbook(workbook: &Workbook, path: Option<&Path>, delimiter: u8) -> Result<()> {
    let sink = open_output(path)?;
    write_workbook_to(workbook, sink, delimiter)
}
