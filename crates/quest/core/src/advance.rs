//! The quest advancement state machine.
//!
//! [`advance`] is the single transition over [`TeamRecord`]: it validates a
//! submitted artifact, enforces sequential unlocking, and computes the
//! post-completion record. It is pure (no clock, no storage, no network), so
//! the runtime can call it before deciding whether to persist anything.

use crate::quest::QuestIndex;
use crate::record::{TeamRecord, XP_PER_QUEST};

/// Upper bound on artifact length, in characters.
pub const MAX_ARTIFACT_LEN: usize = 1000;

/// Rejection reasons for a quest submission.
///
/// Display strings are the user-facing messages, verbatim; callers surface
/// them without translation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdvanceError {
    /// The submitted artifact was empty.
    #[error("Artifact cannot be empty")]
    EmptyArtifact,

    /// The submitted artifact exceeded [`MAX_ARTIFACT_LEN`] characters.
    #[error("Artifact must be between 1 and {max} characters (current: {len})")]
    ArtifactTooLong { len: usize, max: usize },

    /// The quest is not the next one in sequence for this team.
    #[error("This quest is locked. Complete previous quests first.")]
    QuestLocked { quest: QuestIndex, stage: u8 },
}

/// Validates an artifact against the length constraints.
///
/// Length is counted in characters, not bytes, so multi-byte submissions are
/// held to the same visible bound.
pub fn validate_artifact(artifact: &str) -> Result<(), AdvanceError> {
    if artifact.is_empty() {
        return Err(AdvanceError::EmptyArtifact);
    }
    let len = artifact.chars().count();
    if len > MAX_ARTIFACT_LEN {
        return Err(AdvanceError::ArtifactTooLong {
            len,
            max: MAX_ARTIFACT_LEN,
        });
    }
    Ok(())
}

/// Computes the record resulting from completing `quest` with `artifact`.
///
/// The artifact is validated first, then the quest must be exactly the next
/// unlocked one (`quest.number() == current.stage + 1`); re-submitting a
/// completed quest is rejected the same way as skipping ahead. On success the
/// returned record has the quest's artifact slot filled, `stage` advanced to
/// the quest number, and `xp` recomputed as `stage * XP_PER_QUEST`; every
/// other field, `last_updated_at` included, is copied unchanged. The input
/// record is never mutated.
pub fn advance(
    current: &TeamRecord,
    quest: QuestIndex,
    artifact: &str,
) -> Result<TeamRecord, AdvanceError> {
    validate_artifact(artifact)?;

    if quest.number() != current.stage + 1 {
        return Err(AdvanceError::QuestLocked {
            quest,
            stage: current.stage,
        });
    }

    let mut next = current.clone();
    next.set_artifact(quest, artifact);
    next.stage = quest.number();
    next.xp = u32::from(quest.number()) * XP_PER_QUEST;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team_at_stage(stage: u8) -> TeamRecord {
        let mut record = TeamRecord::new("Alpha", "hash", "2026-08-07T00:00:00Z");
        for number in 1..=stage {
            let quest = QuestIndex::from_number(number).unwrap();
            record.set_artifact(quest, format!("artifact for quest {number}"));
        }
        record.stage = stage;
        record.xp = u32::from(stage) * XP_PER_QUEST;
        record
    }

    #[test]
    fn test_advance_completes_the_next_quest() {
        let current = team_at_stage(1);
        let next = advance(&current, QuestIndex::Team, "Alice designs, Bob codes").unwrap();

        assert_eq!(next.stage, 2);
        assert_eq!(next.xp, 200);
        assert_eq!(next.roles_text, "Alice designs, Bob codes");

        // Everything else is copied unchanged.
        assert_eq!(next.team_name, current.team_name);
        assert_eq!(next.pin_hash, current.pin_hash);
        assert_eq!(next.idea_text, current.idea_text);
        assert_eq!(next.github_link, current.github_link);
        assert_eq!(next.pitch_link, current.pitch_link);
        assert_eq!(next.last_updated_at, current.last_updated_at);
    }

    #[test]
    fn test_advance_never_mutates_the_input() {
        let current = team_at_stage(2);
        let snapshot = current.clone();

        advance(&current, QuestIndex::Mvp, "https://github.com/alpha/repo").unwrap();
        advance(&current, QuestIndex::Pitch, "skipping ahead").unwrap_err();

        assert_eq!(current, snapshot);
    }

    #[test]
    fn test_empty_artifact_is_rejected() {
        let current = team_at_stage(0);
        let err = advance(&current, QuestIndex::Idea, "").unwrap_err();
        assert_eq!(err, AdvanceError::EmptyArtifact);
        assert_eq!(err.to_string(), "Artifact cannot be empty");
    }

    #[test]
    fn test_overlong_artifact_reports_length_and_bound() {
        let current = team_at_stage(0);
        let artifact = "x".repeat(1001);
        let err = advance(&current, QuestIndex::Idea, &artifact).unwrap_err();

        assert_eq!(
            err,
            AdvanceError::ArtifactTooLong {
                len: 1001,
                max: 1000
            }
        );
        assert_eq!(
            err.to_string(),
            "Artifact must be between 1 and 1000 characters (current: 1001)"
        );
    }

    #[test]
    fn test_artifact_length_is_counted_in_characters() {
        let current = team_at_stage(0);
        // 1000 multi-byte characters is within the bound even though the
        // byte length is far beyond it.
        let artifact = "é".repeat(1000);
        assert!(advance(&current, QuestIndex::Idea, &artifact).is_ok());

        let artifact = "é".repeat(1001);
        let err = advance(&current, QuestIndex::Idea, &artifact).unwrap_err();
        assert!(matches!(err, AdvanceError::ArtifactTooLong { len: 1001, .. }));
    }

    #[test]
    fn test_artifact_at_exactly_the_bound_passes() {
        let current = team_at_stage(0);
        let artifact = "x".repeat(1000);
        assert!(advance(&current, QuestIndex::Idea, &artifact).is_ok());
    }

    #[test]
    fn test_skipping_ahead_is_locked() {
        let current = team_at_stage(1);
        let err = advance(&current, QuestIndex::Mvp, "valid artifact").unwrap_err();
        assert_eq!(
            err,
            AdvanceError::QuestLocked {
                quest: QuestIndex::Mvp,
                stage: 1
            }
        );
        assert_eq!(
            err.to_string(),
            "This quest is locked. Complete previous quests first."
        );
    }

    #[test]
    fn test_resubmitting_a_completed_quest_is_locked() {
        let current = team_at_stage(2);
        let err = advance(&current, QuestIndex::Idea, "a better idea").unwrap_err();
        assert!(matches!(err, AdvanceError::QuestLocked { .. }));
    }

    #[test]
    fn test_artifact_validation_runs_before_the_lock_check() {
        // A completed quest with an over-long artifact reports the length
        // problem, not the lock.
        let current = team_at_stage(1);
        let artifact = "x".repeat(1001);
        let err = advance(&current, QuestIndex::Idea, &artifact).unwrap_err();
        assert!(matches!(err, AdvanceError::ArtifactTooLong { len: 1001, .. }));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let current = team_at_stage(3);
        let first = advance(&current, QuestIndex::Pitch, "https://slides.example/alpha");
        let second = advance(&current, QuestIndex::Pitch, "https://slides.example/alpha");
        assert_eq!(first, second);
    }
}
