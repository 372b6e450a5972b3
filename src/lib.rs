//! Column mapping and typed cell codec.
//!
//! A [`ColumnMapper`] binds the fields of a [`Record`] type to ordered
//! spreadsheet columns; a [`RecordCodec`] turns records into typed cell rows
//! through a [`WorkbookWriter`] and reads them back through a
//! [`WorkbookReader`]. Column configuration can be persisted as a YAML
//! [`MappingLayout`], and the bundled CSV adapter lets the `tabular-mapper`
//! binary verify, preview and convert delimited files against a layout.

pub mod cell;
pub mod cli;
pub mod codec;
pub mod column;
pub mod convert;
pub mod data;
pub mod error;
pub mod field;
pub mod io_utils;
pub mod layout;
pub mod layout_cmd;
pub mod mapper;
pub mod preview;
pub mod table;
pub mod verify;
pub mod workbook;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

pub use crate::{
    cell::{CellType, CellValue},
    codec::{EncodeOptions, RecordCodec, decode, encode},
    column::{Column, ColumnSpec},
    data::FieldValue,
    error::MappingError,
    field::{FieldDescriptor, FieldType, FieldValueType, Primitive, Record},
    layout::{DynamicRecord, LayoutColumn, MappingLayout},
    mapper::ColumnMapper,
    workbook::{ColumnStyle, Sheet, Workbook, WorkbookReader, WorkbookWriter},
};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

pub fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("tabular_mapper", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!("Parsed command line: {:?}", cli.command);
    match cli.command {
        Commands::Verify(args) => verify::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Convert(args) => convert::execute(&args),
        Commands::Layout(args) => layout_cmd::execute(&args),
    }
}
