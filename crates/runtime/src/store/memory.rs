//! In-memory SheetStore implementation for tests and local runs.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::store::{RawRow, SheetStore, StoreError};

/// A write failure mode queued against the sheet.
#[derive(Clone, Debug)]
pub enum WriteFault {
    /// The write is rejected without touching the sheet.
    Fail(StoreError),

    /// The write lands on the sheet but the acknowledgment is lost, so the
    /// caller still observes the error. Models a success whose response
    /// never arrived.
    AckLost(StoreError),
}

/// In-memory implementation of [`SheetStore`].
///
/// Rows live behind an `RwLock` in sheet order. Per-operation fault queues
/// let tests script transient and fatal failures call by call, the way the
/// remote API produces them.
#[derive(Default)]
pub struct InMemorySheet {
    rows: RwLock<Vec<RawRow>>,
    read_faults: Mutex<VecDeque<StoreError>>,
    write_faults: Mutex<VecDeque<WriteFault>>,
    append_faults: Mutex<VecDeque<StoreError>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    appends: AtomicUsize,
}

impl InMemorySheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sheet pre-populated with the given data rows.
    pub fn with_rows(rows: Vec<RawRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
            ..Self::default()
        }
    }

    /// Snapshot of the current data rows, in sheet order.
    pub fn rows(&self) -> Vec<RawRow> {
        self.rows.read().map(|rows| rows.clone()).unwrap_or_default()
    }

    /// Queue an error for the next `read_all` call.
    pub fn fail_next_read(&self, error: StoreError) {
        if let Ok(mut faults) = self.read_faults.lock() {
            faults.push_back(error);
        }
    }

    /// Queue a failure mode for the next `write_row` call.
    pub fn fail_next_write(&self, fault: WriteFault) {
        if let Ok(mut faults) = self.write_faults.lock() {
            faults.push_back(fault);
        }
    }

    /// Queue an error for the next `append_row` call.
    pub fn fail_next_append(&self, error: StoreError) {
        if let Ok(mut faults) = self.append_faults.lock() {
            faults.push_back(error);
        }
    }

    /// Number of `read_all` calls observed, failed ones included.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `write_row` calls observed, failed ones included.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of `append_row` calls observed, failed ones included.
    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    fn apply_write(&self, row_number: usize, row: RawRow) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Fatal("sheet lock poisoned".to_string()))?;
        let index = row_number
            .checked_sub(super::FIRST_DATA_ROW)
            .filter(|index| *index < rows.len())
            .ok_or_else(|| StoreError::Fatal(format!("row {row_number} is out of range")))?;
        rows[index] = row;
        Ok(())
    }
}

#[async_trait]
impl SheetStore for InMemorySheet {
    async fn read_all(&self) -> Result<Vec<RawRow>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut faults) = self.read_faults.lock()
            && let Some(error) = faults.pop_front()
        {
            return Err(error);
        }
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Fatal("sheet lock poisoned".to_string()))?;
        Ok(rows.clone())
    }

    async fn write_row(&self, row_number: usize, row: RawRow) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let fault = self
            .write_faults
            .lock()
            .ok()
            .and_then(|mut faults| faults.pop_front());
        match fault {
            Some(WriteFault::Fail(error)) => Err(error),
            Some(WriteFault::AckLost(error)) => {
                self.apply_write(row_number, row)?;
                Err(error)
            }
            None => self.apply_write(row_number, row),
        }
    }

    async fn append_row(&self, row: RawRow) -> Result<(), StoreError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut faults) = self.append_faults.lock()
            && let Some(error) = faults.pop_front()
        {
            return Err(error);
        }
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Fatal("sheet lock poisoned".to_string()))?;
        rows.push(row);
        Ok(())
    }
}
