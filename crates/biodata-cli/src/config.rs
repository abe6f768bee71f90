use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use biodata_export::context::ExportContext;
use biodata_export::raster::RasterOptions;
use biodata_export::styles::{DocumentStyles, PageLayout};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const DEFAULT_JPEG_QUALITY: u8 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiodataConfig {
    /// Schema version. A hand-written file without one is read as current.
    #[serde(default = "current_version")]
    pub config_version: u32,
    /// Where exported files are written.
    pub output_dir: PathBuf,
    #[serde(default)]
    pub raster: RasterOptions,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default)]
    pub page: PageLayout,
    #[serde(default)]
    pub styles: DocumentStyles,
    pub created_at: jiff::Timestamp,
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl BiodataConfig {
    pub fn new(created_at: jiff::Timestamp) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            output_dir: default_output_dir(),
            raster: RasterOptions::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            page: PageLayout::default(),
            styles: DocumentStyles::default(),
            created_at,
        }
    }

    pub fn export_context(&self) -> ExportContext {
        ExportContext {
            styles: self.styles.clone(),
            layout: self.page,
            raster: self.raster,
            jpeg_quality: self.jpeg_quality,
            ..ExportContext::default()
        }
    }
}

fn default_output_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("biodata"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the saved config, or defaults when none has been written yet.
pub fn load_or_default(path: &Path) -> eyre::Result<BiodataConfig> {
    if path.exists() {
        load_config_from(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(BiodataConfig::new(jiff::Timestamp::now()))
    }
}

pub fn load_config_from(path: &Path) -> eyre::Result<BiodataConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .map_or(CURRENT_VERSION, |v| u32::try_from(v).unwrap_or(u32::MAX));

    let migrated = migrate(json, on_disk_version)?;
    let config: BiodataConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update biodata."
        ));
    }

    if from_version == 0 {
        return Err(eyre::eyre!("config_version 0 was never a released format"));
    }

    // Version 1 is the first released shape, so the chain is empty. Add one
    // `if from_version < N` step here for each bump of CURRENT_VERSION.
    Ok(json)
}

pub fn save_config_to(config: &BiodataConfig, path: &Path) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // Set restrictive permissions on Unix before renaming
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn delete_config_at(path: &Path) -> eyre::Result<bool> {
    if path.exists() {
        std::fs::remove_file(path)?;
        tracing::info!(path = %path.display(), "config deleted");
        return Ok(true);
    }
    Ok(false)
}
