//! Deterministic quest progression logic shared across the runtime and tools.
//!
//! `quest-core` defines the canonical team state ([`TeamRecord`]), the ordered
//! quest catalog ([`QUESTS`]), and the pure [`advance`] state machine that
//! computes a quest completion without touching storage or the network. The
//! runtime crate layers persistence and telemetry on top of the types
//! re-exported here.
pub mod advance;
pub mod quest;
pub mod record;

pub use advance::{AdvanceError, MAX_ARTIFACT_LEN, advance, validate_artifact};
pub use quest::{QUESTS, QuestIndex, QuestSpec};
pub use record::{QUEST_COUNT, TeamRecord, XP_PER_QUEST};
