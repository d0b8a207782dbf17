//! Store handle and keyed updates
//!
//! `DirectoryStore` is an explicit handle constructed from configuration and
//! passed to every operation; there is no process-wide store path. Reads go
//! through [`DirectoryStore::snapshot`]; the only mutation is the keyed
//! partial-row update used administratively for secret and certificate
//! rotation.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::backends::{JsonFileBackend, MemoryBackend, WorkbookBackend};
use crate::error::StoreError;
use crate::schema::Table;
use crate::snapshot::{check_sheet, DirectorySnapshot};
use crate::workbook::Workbook;

/// One keyed partial-row update: locate the first row whose `key_column`
/// cell equals `key_value`, then overwrite the named columns.
#[derive(Debug, Clone)]
pub struct RowUpdate {
    pub key_column: String,
    pub key_value: String,
    pub sets: Vec<(String, String)>,
}

impl RowUpdate {
    pub fn new(
        key_column: impl Into<String>,
        key_value: impl Into<String>,
        sets: Vec<(String, String)>,
    ) -> Self {
        Self {
            key_column: key_column.into(),
            key_value: key_value.into(),
            sets,
        }
    }
}

pub struct DirectoryStore {
    backend: Arc<dyn WorkbookBackend>,
    // Serializes update calls; a snapshot load is a single backend read and
    // observes either the pre- or post-update workbook.
    write_lock: Mutex<()>,
}

impl DirectoryStore {
    pub fn new(backend: Arc<dyn WorkbookBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Open a JSON-file-backed store.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(JsonFileBackend::new(path)))
    }

    /// An in-memory store seeded with `workbook`, for tests and tools.
    pub fn in_memory(workbook: Workbook) -> Self {
        Self::new(Arc::new(MemoryBackend::new(workbook)))
    }

    /// Load and parse the whole directory in one consistent read.
    pub fn snapshot(&self) -> Result<DirectorySnapshot, StoreError> {
        let workbook = self.backend.load()?;
        DirectorySnapshot::parse(&workbook)
    }

    /// Apply keyed updates to one table, all-or-nothing.
    ///
    /// Target rows are located in the pre-update workbook, so updates within
    /// one call do not observe each other's writes when locating rows. The
    /// first matching row wins. Any `KeyNotFound` or `UnknownColumn` fails
    /// the whole call and the stored workbook is untouched.
    pub fn update(&self, table: Table, updates: &[RowUpdate]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let original = self.backend.load()?;
        check_sheet(&original, table)?;

        let sheet_name = table.sheet_name();
        let columns = table.columns();
        let sheet_pos = original
            .sheets
            .iter()
            .position(|s| s.name == sheet_name)
            .ok_or(StoreError::MissingSheet { sheet: sheet_name })?;

        let mut updated = original.clone();
        for update in updates {
            let key_idx = column_index(table, &update.key_column)?;
            // Offset by one: data rows start below the header.
            let row_idx = original.sheets[sheet_pos]
                .data_rows()
                .iter()
                .position(|row| {
                    row.get(key_idx).map(String::as_str) == Some(update.key_value.as_str())
                })
                .map(|i| i + 1)
                .ok_or_else(|| StoreError::KeyNotFound {
                    sheet: sheet_name,
                    column: update.key_column.clone(),
                    value: update.key_value.clone(),
                })?;
            let row = &mut updated.sheets[sheet_pos].rows[row_idx];
            if row.len() != columns.len() {
                return Err(StoreError::InvalidRow {
                    sheet: sheet_name,
                    row: row_idx,
                    reason: format!("expected {} cells, found {}", columns.len(), row.len()),
                });
            }
            for (column, value) in &update.sets {
                let col_idx = column_index(table, column)?;
                row[col_idx] = value.clone();
            }
        }

        self.backend.replace(&updated)?;
        info!(
            sheet = sheet_name,
            rows = updates.len(),
            "applied keyed update"
        );
        Ok(())
    }

    /// Keyed updates against the Servers sheet, the one table updated in
    /// normal operation.
    pub fn update_servers(&self, updates: &[RowUpdate]) -> Result<(), StoreError> {
        self.update(Table::Servers, updates)
    }
}

fn column_index(table: Table, column: &str) -> Result<usize, StoreError> {
    table
        .columns()
        .iter()
        .position(|c| *c == column)
        .ok_or_else(|| StoreError::UnknownColumn {
            sheet: table.sheet_name(),
            column: column.to_string(),
        })
}
