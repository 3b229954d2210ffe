//! Remote store adapter contracts.
//!
//! Production deployments keep team rows in a spreadsheet behind a
//! rate-limited HTTP API. That transport stays outside this crate; the engine
//! depends only on the read-all/write-one/append contract of [`SheetStore`]
//! and on every failure arriving pre-classified as transient or fatal. Retry
//! decisions belong to [`crate::retry`], never to an adapter.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

pub use memory::{InMemorySheet, WriteFault};

/// Column order of a team row, matching the sheet header.
pub const COLUMNS: [&str; 9] = [
    "Team_Name",
    "PIN_Hash",
    "Stage",
    "XP",
    "Idea_Text",
    "Roles_Text",
    "GitHub_Link",
    "Pitch_Link",
    "Timestamp",
];

/// 1-based sheet row number of the first data row (row 1 is the header).
pub const FIRST_DATA_ROW: usize = 2;

/// One raw sheet row, in [`COLUMNS`] order.
pub type RawRow = Vec<String>;

/// Store failures, classified for the retry policy.
///
/// Adapters classify at the network boundary: timeouts, 429 rate limits, and
/// 5xx responses are `Transient`; credential problems, schema mismatches, and
/// any other 4xx are `Fatal`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Expected to resolve on retry.
    #[error("transient store failure: {0}")]
    Transient(String),

    /// Retrying cannot help.
    #[error("fatal store failure: {0}")]
    Fatal(String),
}

impl StoreError {
    /// Whether the retry policy may attempt this operation again.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Adapter over the remote tabular store.
///
/// Implementations execute exactly one remote operation per call and classify
/// failures; they hold no retry logic and no caching.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Read every data row, in sheet order (header excluded).
    async fn read_all(&self) -> Result<Vec<RawRow>, StoreError>;

    /// Overwrite the data row at the given 1-based sheet row number.
    async fn write_row(&self, row_number: usize, row: RawRow) -> Result<(), StoreError>;

    /// Append a new data row after the existing ones.
    async fn append_row(&self, row: RawRow) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: SheetStore + ?Sized> SheetStore for &S {
    async fn read_all(&self) -> Result<Vec<RawRow>, StoreError> {
        (**self).read_all().await
    }

    async fn write_row(&self, row_number: usize, row: RawRow) -> Result<(), StoreError> {
        (**self).write_row(row_number, row).await
    }

    async fn append_row(&self, row: RawRow) -> Result<(), StoreError> {
        (**self).append_row(row).await
    }
}

#[async_trait]
impl<S: SheetStore + ?Sized> SheetStore for Arc<S> {
    async fn read_all(&self) -> Result<Vec<RawRow>, StoreError> {
        self.as_ref().read_all().await
    }

    async fn write_row(&self, row_number: usize, row: RawRow) -> Result<(), StoreError> {
        self.as_ref().write_row(row_number, row).await
    }

    async fn append_row(&self, row: RawRow) -> Result<(), StoreError> {
        self.as_ref().append_row(row).await
    }
}
