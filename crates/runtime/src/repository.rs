//! Team record repository over the remote store.
//!
//! Built on [`RetryPolicy`] + [`SheetStore`]. Lookup is a deliberate linear
//! scan over the flat, low-cardinality sheet, and `save` re-scans for the row
//! number on every call instead of caching it, since rows can move underneath
//! us when organizers edit the sheet directly. The identity checks here are
//! the team-isolation boundary and run unconditionally, in production as well
//! as tests.

use quest_core::{QUEST_COUNT, TeamRecord};
use tracing::{debug, error, warn};

use crate::retry::{RetryError, RetryPolicy};
use crate::store::{COLUMNS, FIRST_DATA_ROW, RawRow, SheetStore};

/// Errors surfaced by repository operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// `save` found no row for the record's team. Creation is a separate,
    /// explicit operation; `save` never appends.
    #[error("team '{team_name}' has no row in the store")]
    TeamNotFound { team_name: String },

    /// A row answered a lookup for a different team. This is an invariant
    /// violation, not a recoverable condition.
    #[error("row {row_number} answered a lookup for '{expected}' with '{found}'")]
    IdentityMismatch {
        expected: String,
        found: String,
        row_number: usize,
    },

    /// A row did not match the sheet schema.
    #[error("malformed row {row_number}: {reason}")]
    MalformedRow { row_number: usize, reason: String },

    /// The underlying store call failed.
    #[error(transparent)]
    Retry(#[from] RetryError),
}

/// Serialize a record into a raw row, in [`COLUMNS`] order.
pub fn encode_row(record: &TeamRecord) -> RawRow {
    vec![
        record.team_name.clone(),
        record.pin_hash.clone(),
        record.stage.to_string(),
        record.xp.to_string(),
        record.idea_text.clone(),
        record.roles_text.clone(),
        record.github_link.clone(),
        record.pitch_link.clone(),
        record.last_updated_at.clone(),
    ]
}

/// Deserialize a raw row into a record.
///
/// Schema violations are reported as [`RepositoryError::MalformedRow`] and
/// never coerced; `row_number` is the 1-based sheet row for diagnostics.
pub fn decode_row(row: &RawRow, row_number: usize) -> Result<TeamRecord, RepositoryError> {
    if row.len() != COLUMNS.len() {
        return Err(RepositoryError::MalformedRow {
            row_number,
            reason: format!("expected {} columns, found {}", COLUMNS.len(), row.len()),
        });
    }

    let stage: u8 = row[2]
        .trim()
        .parse()
        .map_err(|_| RepositoryError::MalformedRow {
            row_number,
            reason: format!("stage '{}' is not an integer", row[2]),
        })?;
    if stage > QUEST_COUNT {
        return Err(RepositoryError::MalformedRow {
            row_number,
            reason: format!("stage {stage} is out of range"),
        });
    }

    let xp: u32 = row[3]
        .trim()
        .parse()
        .map_err(|_| RepositoryError::MalformedRow {
            row_number,
            reason: format!("xp '{}' is not an integer", row[3]),
        })?;

    Ok(TeamRecord {
        team_name: row[0].clone(),
        pin_hash: row[1].clone(),
        stage,
        xp,
        idea_text: row[4].clone(),
        roles_text: row[5].clone(),
        github_link: row[6].clone(),
        pitch_link: row[7].clone(),
        last_updated_at: row[8].clone(),
    })
}

fn verify_identity(
    expected: &str,
    found: &str,
    row_number: usize,
) -> Result<(), RepositoryError> {
    if expected != found {
        error!(
            "team isolation violated: row {} answered a lookup for '{}' with '{}'",
            row_number, expected, found
        );
        return Err(RepositoryError::IdentityMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            row_number,
        });
    }
    Ok(())
}

/// Repository exposing one-row-per-team reads and writes.
pub struct TeamRepository<S> {
    store: S,
    retry: RetryPolicy,
}

impl<S: SheetStore> TeamRepository<S> {
    /// Create a repository with the default retry policy.
    pub fn new(store: S) -> Self {
        Self::with_retry_policy(store, RetryPolicy::default())
    }

    /// Create a repository with an explicit retry policy.
    pub fn with_retry_policy(store: S, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Fetch the record for exactly `team_name`.
    ///
    /// Scans all rows for an exact, case-sensitive match on the name column.
    /// Under the uniqueness invariant the first match is the only one.
    pub async fn find(&self, team_name: &str) -> Result<Option<TeamRecord>, RepositoryError> {
        let rows = self
            .retry
            .execute("read_all", || self.store.read_all())
            .await?;

        for (position, row) in rows.iter().enumerate() {
            if row.first().map(String::as_str) != Some(team_name) {
                continue;
            }
            let row_number = position + FIRST_DATA_ROW;
            let record = decode_row(row, row_number)?;
            verify_identity(team_name, &record.team_name, row_number)?;
            debug!("found team '{}' at row {}", team_name, row_number);
            return Ok(Some(record));
        }

        Ok(None)
    }

    /// Persist `record` over its existing row.
    ///
    /// The row number is re-discovered on every call; a vanished row is
    /// [`RepositoryError::TeamNotFound`], never an append.
    pub async fn save(&self, record: &TeamRecord) -> Result<(), RepositoryError> {
        let rows = self
            .retry
            .execute("read_all", || self.store.read_all())
            .await?;

        let Some(position) = rows
            .iter()
            .position(|row| row.first().map(String::as_str) == Some(record.team_name.as_str()))
        else {
            warn!("save for team '{}' found no row", record.team_name);
            return Err(RepositoryError::TeamNotFound {
                team_name: record.team_name.clone(),
            });
        };

        let row_number = position + FIRST_DATA_ROW;
        let found = rows[position].first().map(String::as_str).unwrap_or("");
        verify_identity(&record.team_name, found, row_number)?;

        let encoded = encode_row(record);
        self.retry
            .execute("write_row", || {
                self.store.write_row(row_number, encoded.clone())
            })
            .await?;

        debug!(
            "saved team '{}' at row {} (stage {})",
            record.team_name, row_number, record.stage
        );
        Ok(())
    }

    /// Append a brand-new record.
    ///
    /// Callers must have established absence via [`TeamRepository::find`]
    /// first; this method does not re-check uniqueness.
    pub async fn create(&self, record: &TeamRecord) -> Result<(), RepositoryError> {
        let encoded = encode_row(record);
        self.retry
            .execute("append_row", || self.store.append_row(encoded.clone()))
            .await?;

        debug!("created team '{}'", record.team_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use quest_core::QuestIndex;

    use super::*;
    use crate::store::memory::{InMemorySheet, WriteFault};
    use crate::store::StoreError;

    fn record(name: &str, stage: u8) -> TeamRecord {
        let mut record = TeamRecord::new(name, format!("{name}-hash"), "2026-08-07T00:00:00Z");
        for number in 1..=stage {
            let quest = QuestIndex::from_number(number).unwrap();
            record.set_artifact(quest, format!("{name} artifact {number}"));
        }
        record.stage = stage;
        record.xp = u32::from(stage) * 100;
        record
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    fn seeded_repository(records: &[TeamRecord]) -> TeamRepository<InMemorySheet> {
        let sheet = InMemorySheet::with_rows(records.iter().map(encode_row).collect());
        TeamRepository::with_retry_policy(sheet, fast_retry())
    }

    #[test]
    fn test_row_codec_roundtrip() {
        let original = record("Alpha", 3);
        let decoded = decode_row(&encode_row(&original), 2).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_rejects_schema_violations() {
        let short = vec!["Alpha".to_string(); 4];
        assert!(matches!(
            decode_row(&short, 2),
            Err(RepositoryError::MalformedRow { row_number: 2, .. })
        ));

        let mut bad_stage = encode_row(&record("Alpha", 1));
        bad_stage[2] = "first".to_string();
        assert!(matches!(
            decode_row(&bad_stage, 3),
            Err(RepositoryError::MalformedRow { row_number: 3, .. })
        ));

        let mut wild_stage = encode_row(&record("Alpha", 1));
        wild_stage[2] = "9".to_string();
        assert!(matches!(
            decode_row(&wild_stage, 4),
            Err(RepositoryError::MalformedRow { row_number: 4, .. })
        ));
    }

    #[tokio::test]
    async fn test_find_returns_none_for_unknown_team() {
        let repository = seeded_repository(&[record("Alpha", 1)]);
        assert_eq!(repository.find("Beta").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_matches_exactly_one_team() {
        let alpha = record("Alpha", 1);
        let beta = record("Beta", 3);
        let repository = seeded_repository(&[alpha.clone(), beta.clone()]);

        assert_eq!(repository.find("Alpha").await.unwrap(), Some(alpha));
        assert_eq!(repository.find("Beta").await.unwrap(), Some(beta));
        // Case-sensitive identity: "alpha" is a different (absent) team.
        assert_eq!(repository.find("alpha").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_only_touches_the_matching_row() {
        let alpha = record("Alpha", 1);
        let beta = record("Beta", 3);
        let sheet = InMemorySheet::with_rows(vec![encode_row(&alpha), encode_row(&beta)]);
        let repository = TeamRepository::with_retry_policy(&sheet, fast_retry());

        let mut advanced = alpha.clone();
        advanced.stage = 2;
        advanced.xp = 200;
        advanced.set_artifact(QuestIndex::Team, "roles");
        repository.save(&advanced).await.unwrap();

        let rows = sheet.rows();
        assert_eq!(rows[0], encode_row(&advanced));
        assert_eq!(rows[1], encode_row(&beta), "Beta's row must be untouched");
    }

    #[tokio::test]
    async fn test_save_rescans_for_a_moved_row() {
        let alpha = record("Alpha", 1);
        let sheet = InMemorySheet::with_rows(vec![
            encode_row(&record("Beta", 0)),
            encode_row(&alpha),
        ]);
        let repository = TeamRepository::with_retry_policy(&sheet, fast_retry());

        // Alpha sits at the second data row (sheet row 3); a stale index from
        // an earlier layout would clobber Beta.
        let mut advanced = alpha.clone();
        advanced.stage = 2;
        advanced.xp = 200;
        repository.save(&advanced).await.unwrap();

        let rows = sheet.rows();
        assert_eq!(rows[0][0], "Beta");
        assert_eq!(rows[1], encode_row(&advanced));
    }

    #[tokio::test]
    async fn test_save_for_vanished_row_is_not_found() {
        let repository = seeded_repository(&[record("Beta", 0)]);
        let err = repository.save(&record("Alpha", 1)).await.unwrap_err();
        assert_eq!(
            err,
            RepositoryError::TeamNotFound {
                team_name: "Alpha".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_retries_transient_read_failures() {
        let alpha = record("Alpha", 1);
        let sheet = InMemorySheet::with_rows(vec![encode_row(&alpha)]);
        sheet.fail_next_read(StoreError::Transient("429".to_string()));
        sheet.fail_next_read(StoreError::Transient("429".to_string()));
        let repository = TeamRepository::new(&sheet);

        assert_eq!(repository.find("Alpha").await.unwrap(), Some(alpha));
        assert_eq!(sheet.read_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_find_escalates_exhausted_retries() {
        let sheet = InMemorySheet::with_rows(vec![encode_row(&record("Alpha", 1))]);
        for _ in 0..3 {
            sheet.fail_next_read(StoreError::Transient("quota".to_string()));
        }
        let repository = TeamRepository::new(&sheet);

        let err = repository.find("Alpha").await.unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Retry(RetryError::RateLimitExceeded { attempts: 3 })
        );
        assert_eq!(sheet.read_count(), 3);
    }

    #[tokio::test]
    async fn test_save_write_retried_after_ack_lost_is_harmless() {
        let alpha = record("Alpha", 1);
        let sheet = InMemorySheet::with_rows(vec![encode_row(&alpha)]);
        sheet.fail_next_write(WriteFault::AckLost(StoreError::Transient(
            "timeout".to_string(),
        )));
        let repository = TeamRepository::with_retry_policy(&sheet, fast_retry());

        let mut advanced = alpha.clone();
        advanced.stage = 2;
        advanced.xp = 200;
        advanced.set_artifact(QuestIndex::Team, "roles");
        repository.save(&advanced).await.unwrap();

        // First write landed, ack was lost, retry rewrote the same value.
        assert_eq!(sheet.write_count(), 2);
        assert_eq!(sheet.rows()[0], encode_row(&advanced));
    }

    #[test]
    fn test_identity_mismatch_is_loud() {
        let err = verify_identity("Alpha", "Beta", 2).unwrap_err();
        assert_eq!(
            err,
            RepositoryError::IdentityMismatch {
                expected: "Alpha".to_string(),
                found: "Beta".to_string(),
                row_number: 2,
            }
        );
        assert!(verify_identity("Alpha", "Alpha", 2).is_ok());
    }
}
