//! In-memory backend for tests and fixtures.

use parking_lot::Mutex;

use crate::backends::WorkbookBackend;
use crate::error::StoreError;
use crate::workbook::Workbook;

pub struct MemoryBackend {
    inner: Mutex<Workbook>,
}

impl MemoryBackend {
    pub fn new(workbook: Workbook) -> Self {
        Self {
            inner: Mutex::new(workbook),
        }
    }
}

impl WorkbookBackend for MemoryBackend {
    fn load(&self) -> Result<Workbook, StoreError> {
        Ok(self.inner.lock().clone())
    }

    fn replace(&self, workbook: &Workbook) -> Result<(), StoreError> {
        *self.inner.lock() = workbook.clone();
        Ok(())
    }
}
