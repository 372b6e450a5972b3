use anyhow::{Context, Result};

use crate::{
    cli::LayoutArgs,
    layout::{DynamicRecord, MappingLayout},
    mapper::ColumnMapper,
    table::{Align, Table},
};

pub fn execute(args: &LayoutArgs) -> Result<()> {
    let layout = MappingLayout::load(&args.layout)
        .with_context(|| format!("Loading layout from {:?}", args.layout))?;
    let mapper = layout.dynamic_mapper()?;
    describe(&mapper).print();
    Ok(())
}

/// One row per mapped column: position, field, header and types.
pub fn describe(mapper: &ColumnMapper<DynamicRecord>) -> Table {
    let mut table = Table::new(["#", "field", "header", "type", "cell", "read-only", "separator"])
        .align(0, Align::Right);
    for column in mapper.columns() {
        table.push_row(vec![
            (column.index + 1).to_string(),
            column.field_name.clone(),
            column.header_text.clone(),
            column.field_type.describe(),
            column.cell_type.to_string(),
            if column.read_only { "yes" } else { "" }.to_string(),
            if column.field_type.is_list() {
                column.list_separator.clone()
            } else {
                String::new()
            },
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_each_column() {
        let layout = MappingLayout::from_yaml_str(
            "columns:\n  - field: Joined\n    datatype: datetime?\n    read_only: true\n  - field: Scores\n    datatype: int32[]\n    list_separator: \"-\"\n",
        )
        .unwrap();
        let rendered = describe(&layout.dynamic_mapper().unwrap()).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[2].contains("datetime?"));
        assert!(lines[2].contains("yes"));
        assert!(lines[3].contains("int32[]"));
        assert!(lines[3].trim_end().ends_with('-'));
    }
}
