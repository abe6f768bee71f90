use std::path::PathBuf;

use crate::error::ExportError;

/// Destination for finished export files.
///
/// Implementations must not leave a partially written file behind on error.
pub trait DownloadSink {
    /// Store `bytes` under `filename`, returning where it ended up.
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<String, ExportError>;
}

/// Writes files into a directory, atomically.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

}

impl DownloadSink for DirectorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<String, ExportError> {
        let sink_err = |source| ExportError::Sink {
            filename: filename.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(sink_err)?;

        let path = self.dir.join(filename);
        // Write to a temp file then rename so readers never see a partial file.
        let tmp_path = self.dir.join(format!(".{filename}.tmp"));
        if let Err(e) = std::fs::write(&tmp_path, bytes) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(sink_err(e));
        }
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(sink_err(e));
        }

        tracing::info!(path = %path.display(), bytes = bytes.len(), "export saved");
        Ok(path.display().to_string())
    }
}

/// Keeps saved files in memory, in save order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }

    pub fn get(&self, filename: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, bytes)| bytes.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl DownloadSink for MemorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<String, ExportError> {
        self.files.push((filename.to_string(), bytes.to_vec()));
        Ok(format!("memory:{filename}"))
    }
}
