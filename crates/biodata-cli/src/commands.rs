use std::io::Write;
use std::path::{Path, PathBuf};

use biodata_core::collect::collect;
use biodata_core::models::format::ExportFormat;
use biodata_export::context::ExportContext;
use biodata_export::json::export_json;
use biodata_export::pdf::export_pdf;
use biodata_export::raster::ResvgRasterizer;
use biodata_export::sink::DirectorySink;
use biodata_export::surface::TemplateSurface;

use crate::cli::{ConfigCommand, ExportArgs};
use crate::config::{self, BiodataConfig};
use crate::form_input::snapshot_from_args;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub format: ExportFormat,
    pub filename: String,
    pub location: String,
    /// Page count, PDF exports only.
    pub pages: Option<usize>,
}

/// The `--config` override, or the per-user default location.
pub fn resolve_config_path(explicit: Option<&Path>) -> eyre::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => config::config_path(),
    }
}

/// Export context for one run: config values with CLI overrides on top.
pub fn export_context(config: &BiodataConfig, args: &ExportArgs) -> ExportContext {
    let mut context = config.export_context();
    if let Some(scale) = args.scale {
        context.raster.scale = scale;
    }
    if let Some(quality) = args.jpeg_quality {
        context.jpeg_quality = quality;
    }
    context
}

pub async fn run_export(args: &ExportArgs, config: &BiodataConfig) -> eyre::Result<ExportOutcome> {
    let snapshot = snapshot_from_args(args)?;
    let record = collect(&snapshot, jiff::Timestamp::now())?;

    let out_dir = args.out.clone().unwrap_or_else(|| config.output_dir.clone());
    let mut sink = DirectorySink::new(out_dir);

    let outcome = match args.format {
        ExportFormat::Json => {
            let export = export_json(&record, &mut sink)?;
            ExportOutcome {
                format: ExportFormat::Json,
                filename: export.filename,
                location: export.location,
                pages: None,
            }
        }
        ExportFormat::Pdf => {
            let context = export_context(config, args);
            let rasterizer = ResvgRasterizer::new();
            let mut surface = TemplateSurface::new();
            let export =
                export_pdf(&record, &mut surface, &rasterizer, &context, &mut sink).await?;
            ExportOutcome {
                format: ExportFormat::Pdf,
                filename: export.filename,
                location: export.location,
                pages: Some(export.pages),
            }
        }
    };
    Ok(outcome)
}

pub fn run_config(command: ConfigCommand, path: &Path, out: &mut dyn Write) -> eyre::Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = config::load_or_default(path)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(eyre::eyre!(
                    "config already exists at {} (use --force to overwrite)",
                    path.display()
                ));
            }
            let config = BiodataConfig::new(jiff::Timestamp::now());
            config::save_config_to(&config, path)?;
            writeln!(out, "wrote {}", path.display())?;
        }
        ConfigCommand::Reset => {
            if config::delete_config_at(path)? {
                writeln!(out, "removed {}", path.display())?;
            } else {
                writeln!(out, "no config at {}", path.display())?;
            }
        }
        ConfigCommand::Path => {
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(())
}
