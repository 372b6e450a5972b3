use std::path::Path;

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use log::info;

use crate::{
    cli::VerifyArgs,
    codec::RecordCodec,
    io_utils,
    layout::{DynamicRecord, MappingLayout},
    mapper::ColumnMapper,
    workbook::{Workbook, WorkbookReader},
};

pub fn execute(args: &VerifyArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input.input_encoding.as_deref())?;
    let layout = MappingLayout::load(&args.layout)
        .with_context(|| format!("Loading layout from {:?}", args.layout))?;
    let mapper = layout.dynamic_mapper()?;
    for input in &args.inputs {
        let delimiter = io_utils::resolve_input_delimiter(input, args.input.delimiter);
        let records = decode_file(&mapper, input, delimiter, encoding)?;
        info!("✓ {:?} decoded {} record(s)", input, records.len());
    }
    Ok(())
}

/// Reads a delimited file and decodes every data row with `mapper`.
pub fn decode_file(
    mapper: &ColumnMapper<DynamicRecord>,
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<DynamicRecord>> {
    let workbook = io_utils::read_workbook(path, delimiter, encoding)?;
    validate_headers(mapper, &workbook).with_context(|| format!("Validating headers for {path:?}"))?;
    RecordCodec::new(mapper)
        .decode(&workbook)
        .with_context(|| format!("Decoding {path:?}"))
}

/// The codec reads cells by column position, so the file's header row must
/// list the mapped header texts in mapper order.
pub fn validate_headers<R>(mapper: &ColumnMapper<R>, workbook: &Workbook) -> Result<()> {
    if workbook.last_row_index(0).is_none() {
        bail!("Input is empty; expected a header row");
    }
    let found: Vec<String> = (0..mapper.len())
        .map(|idx| {
            workbook
                .cell(0, 0, idx)
                .map(|cell| cell.as_text().trim().to_string())
                .unwrap_or_default()
        })
        .collect();
    for (column, actual) in mapper.columns().iter().zip(&found) {
        if column.header_text != *actual {
            bail!(
                "Column {} header mismatch: expected '{}', found '{}'",
                column.index + 1,
                column.header_text,
                actual
            );
        }
    }
    Ok(())
}
