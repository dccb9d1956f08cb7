use crate::error::{Error, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Persists serialized sitemaps into an output directory.
pub(crate) struct Writer {
    output_dir: PathBuf,
}

impl Writer {
    pub(crate) fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Returns the path a file with this name would be written to.
    pub(crate) fn target_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Creates the output directory and any missing parents.
    ///
    /// Succeeds if the directory already exists.
    pub(crate) fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::file_write(&self.output_dir, e))
    }

    /// Writes `content` to `file_name` inside the output directory,
    /// replacing any previous file, and returns the final path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileWrite`] if the directory cannot be created or the
    /// file cannot be written.
    pub(crate) fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        self.ensure_output_dir()?;

        let path = self.target_path(file_name);
        Self::write_file_atomic(&path, content)?;

        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(path)
    }

    /// Writes a file atomically.
    ///
    /// Content goes to a sibling temporary file which is synced and then
    /// renamed over the target, so the target is never left half written.
    fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
        let temp_path = Self::temp_path(path);

        let result = Self::write_temp(&temp_path, content)
            .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::file_write(path, e)));

        if result.is_err() && temp_path.exists() {
            if let Err(e) = fs::remove_file(&temp_path) {
                warn!("Failed to remove temporary file {}: {e}", temp_path.display());
            }
        }

        result
    }

    fn write_temp(temp_path: &Path, content: &str) -> Result<()> {
        let mut temp_file =
            fs::File::create(temp_path).map_err(|e| Error::file_write(temp_path, e))?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| Error::file_write(temp_path, e))?;

        // Ensure data is flushed to disk
        temp_file
            .sync_all()
            .map_err(|e| Error::file_write(temp_path, e))
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}
