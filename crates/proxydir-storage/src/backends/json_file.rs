//! JSON file backend
//!
//! The production backend: one JSON workbook file. `replace` writes a
//! tempfile in the store's directory and renames it over the original, so a
//! reader always sees either the old workbook or the new one, never a
//! partial write.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::backends::WorkbookBackend;
use crate::error::StoreError;
use crate::workbook::Workbook;

pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookBackend for JsonFileBackend {
    fn load(&self) -> Result<Workbook, StoreError> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn replace(&self, workbook: &Workbook) -> Result<(), StoreError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, workbook)?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %self.path.display(), "replaced store file");
        Ok(())
    }
}
