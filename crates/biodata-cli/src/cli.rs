use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use biodata_core::models::format::ExportFormat;

/// biodata: collect a personal bio-data form and export it as JSON or PDF
#[derive(Parser, Debug)]
#[command(name = "biodata", author, version, about, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the form and write an export
    Export(ExportArgs),

    /// Inspect or manage the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the effective config
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Delete the config file
    Reset,
    /// Print where the config file lives
    Path,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Output format. One of json, pdf
    #[arg(short, long, default_value = "json")]
    pub format: ExportFormat,

    /// Directory the export is written to (overrides config)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// JSON file holding form values keyed by field name
    #[arg(long, value_name = "FILE")]
    pub form: Option<PathBuf>,

    /// Set one form field, e.g. --field first_name=Jane
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,

    #[command(flatten)]
    pub values: FieldArgs,

    /// Raster oversampling factor for PDF exports (overrides config)
    #[arg(long)]
    pub scale: Option<f32>,

    /// JPEG quality 1-100 for PDF exports (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: Option<u8>,
}

/// One flag per form field. These win over `--field` and `--form`.
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    pub birthdate: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address_line1: Option<String>,
    #[arg(long)]
    pub height: Option<String>,
    #[arg(long)]
    pub weight: Option<String>,
    /// One of A+, A-, B+, B-, AB+, AB-, O+, O-
    #[arg(long)]
    pub blood_type: Option<String>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    Ok((key.trim().to_string(), value.to_string()))
}
