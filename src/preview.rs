use anyhow::{Context, Result};
use log::info;

use crate::{
    cell::CellType,
    cli::PreviewArgs,
    io_utils,
    layout::{DynamicRecord, MappingLayout},
    mapper::ColumnMapper,
    table::{Align, Table},
    verify::decode_file,
};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input_path, args.input.delimiter);
    let encoding = io_utils::resolve_encoding(args.input.input_encoding.as_deref())?;
    let layout = MappingLayout::load(&args.layout)
        .with_context(|| format!("Loading layout from {:?}", args.layout))?;
    let mapper = layout.dynamic_mapper()?;
    let records = decode_file(&mapper, &args.input_path, delimiter, encoding)?;

    let table = build_table(&mapper, records.iter().take(args.rows));
    table.print();
    info!(
        "Displayed {} of {} record(s) from {:?}",
        table.len(),
        records.len(),
        args.input_path
    );
    Ok(())
}

pub fn build_table<'a, I>(mapper: &ColumnMapper<DynamicRecord>, records: I) -> Table
where
    I: IntoIterator<Item = &'a DynamicRecord>,
{
    let mut table = Table::new(mapper.headers());
    for column in mapper.columns() {
        if column.cell_type == CellType::Numeric {
            table = table.align(column.index, Align::Right);
        }
    }
    for record in records {
        table.push_row(
            mapper
                .columns()
                .iter()
                .map(|column| record.get(&column.field_name).as_display())
                .collect(),
        );
    }
    table
}
