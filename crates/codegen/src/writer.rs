use scaffold_core::ScaffoldError;
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct CodeWriter;

impl CodeWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write `content` to `path` unless the file already holds it.
    ///
    /// Returns whether the file was written.
    pub fn write_if_changed(&self, path: &Path, content: &str) -> Result<bool, ScaffoldError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if path.exists() {
            let existing = fs::read_to_string(path)?;
            if existing == content {
                debug!(path = %path.display(), "output unchanged");
                return Ok(false);
            }
        }

        fs::write(path, content)?;
        debug!(path = %path.display(), "output written");
        Ok(true)
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}
