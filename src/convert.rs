use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::ConvertArgs,
    codec::{EncodeOptions, RecordCodec},
    io_utils,
    layout::MappingLayout,
    verify::decode_file,
};

pub fn execute(args: &ConvertArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input_path, args.input.delimiter);
    let encoding = io_utils::resolve_encoding(args.input.input_encoding.as_deref())?;
    let layout = MappingLayout::load(&args.layout)
        .with_context(|| format!("Loading layout from {:?}", args.layout))?;
    let mapper = layout.dynamic_mapper()?;
    let records = decode_file(&mapper, &args.input_path, delimiter, encoding)?;

    let options = EncodeOptions {
        autosize: false,
        ..EncodeOptions::default()
    };
    let workbook = RecordCodec::with_options(&mapper, options)
        .encode(&records)
        .context("Encoding records")?;

    let output_delimiter =
        io_utils::resolve_output_delimiter(args.output.as_deref(), args.output_delimiter, delimiter);
    io_utils::write_workbook(&workbook, args.output.as_deref(), output_delimiter)?;
    info!(
        "Converted {} record(s) from {:?}{}",
        records.len(),
        args.input_path,
        args.output
            .as_ref()
            .map(|path| format!(" into {path:?}"))
            .unwrap_or_default()
    );
    Ok(())
}
