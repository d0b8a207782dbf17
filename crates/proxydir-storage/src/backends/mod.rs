//! Workbook backends
//!
//! A backend reads and replaces whole workbooks; the store's read-validate
//! and keyed-update logic sits above it. `replace` must be all-or-nothing:
//! a failed replace leaves the previous workbook intact.

use crate::error::StoreError;
use crate::workbook::Workbook;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Whole-workbook load/replace.
pub trait WorkbookBackend: Send + Sync {
    /// Load the current workbook.
    fn load(&self) -> Result<Workbook, StoreError>;

    /// Atomically replace the stored workbook with `workbook`.
    fn replace(&self, workbook: &Workbook) -> Result<(), StoreError>;
}
