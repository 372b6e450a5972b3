use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Map typed records to tabular rows and back",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode one or more files with a layout and report any mapping error
    Verify(VerifyArgs),
    /// Decode a file with a layout and show the first records as a table
    Preview(PreviewArgs),
    /// Decode a file and re-encode it in the layout's column order and headers
    Convert(ConvertArgs),
    /// Print the resolved column table of a layout
    Layout(LayoutArgs),
}

/// Options shared by every command that reads delimited input.
#[derive(Debug, Args)]
pub struct InputOptions {
    /// Field delimiter (supports ',', 'tab', ';', '|'); inferred from the extension when omitted
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Layout file describing the mapped columns
    #[arg(short, long)]
    pub layout: PathBuf,
    /// One or more files to verify
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    #[command(flatten)]
    pub input: InputOptions,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Layout file describing the mapped columns
    #[arg(short, long)]
    pub layout: PathBuf,
    /// Input file to preview
    #[arg(short = 'i', long = "input")]
    pub input_path: PathBuf,
    /// Number of records to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    #[command(flatten)]
    pub input: InputOptions,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Layout file describing the mapped columns
    #[arg(short, long)]
    pub layout: PathBuf,
    /// Input file to convert
    #[arg(short = 'i', long = "input")]
    pub input_path: PathBuf,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output delimiter; defaults to the output extension or the input delimiter
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    #[command(flatten)]
    pub input: InputOptions,
}

#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// Layout file to describe
    #[arg(short, long)]
    pub layout: PathBuf,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "pipe" | "|" => Ok(b'|'),
        "semicolon" | ";" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (None, _) => Err("Delimiter cannot be empty".to_string()),
                (Some(_), Some(_)) => Err("Delimiter must be a single character".to_string()),
                (Some(ch), None) if !ch.is_ascii() => Err("Delimiter must be ASCII".to_string()),
                (Some(ch), None) => Ok(ch as u8),
            }
        }
    }
}
