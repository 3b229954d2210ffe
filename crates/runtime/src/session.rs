//! Per-caller session snapshots.

use quest_core::TeamRecord;

/// A session's cached copy of one team's record.
///
/// Owned by the calling context (one per active UI session) and passed into
/// the coordinator by mutable reference, never held as ambient global state.
/// The copy is advisory: the store is authoritative, every mutation is
/// re-validated against a fresh read, and the snapshot is replaced only after
/// a confirmed commit, so a failed submission leaves it bit-for-bit
/// untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    record: TeamRecord,
}

impl SessionState {
    /// Wrap an authenticated team's record.
    pub fn new(record: TeamRecord) -> Self {
        Self { record }
    }

    /// The team this session belongs to.
    pub fn team_name(&self) -> &str {
        &self.record.team_name
    }

    /// The cached record.
    pub fn record(&self) -> &TeamRecord {
        &self.record
    }

    /// Give up the session and take the record.
    pub fn into_record(self) -> TeamRecord {
        self.record
    }

    /// Replace the snapshot after a confirmed commit. Only the coordinator
    /// mutates sessions.
    pub(crate) fn replace(&mut self, record: TeamRecord) {
        self.record = record;
    }
}
