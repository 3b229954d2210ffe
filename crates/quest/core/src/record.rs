//! Canonical team state representation.
//!
//! A [`TeamRecord`] mirrors one row of the remote store. The runtime clones
//! and persists records but advances them exclusively through
//! [`crate::advance`], which keeps the stage/XP coupling intact.

use crate::quest::QuestIndex;

/// XP granted per completed quest. `xp` is always `stage * XP_PER_QUEST`.
pub const XP_PER_QUEST: u32 = 100;

/// Number of ordered quests a team can complete.
pub const QUEST_COUNT: u8 = 4;

/// Canonical state of one hackathon team.
///
/// Identity is `team_name`: case-sensitive, unique in the store, immutable
/// once created.
///
/// # Invariants
///
/// - `stage` counts completed quests (0..=4) and never decreases.
/// - `xp == stage * XP_PER_QUEST`; the two are never updated independently.
/// - Quest *i*'s artifact field is non-empty iff `stage >= i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamRecord {
    /// Unique team identifier.
    pub team_name: String,
    /// Opaque credential digest; compared, never inspected.
    pub pin_hash: String,
    /// Count of completed quests (0..=4).
    pub stage: u8,
    /// Total experience points.
    pub xp: u32,
    /// Quest 1 artifact (empty until submitted).
    pub idea_text: String,
    /// Quest 2 artifact (empty until submitted).
    pub roles_text: String,
    /// Quest 3 artifact (empty until submitted).
    pub github_link: String,
    /// Quest 4 artifact (empty until submitted).
    pub pitch_link: String,
    /// RFC 3339 UTC timestamp of the last persisted change.
    pub last_updated_at: String,
}

impl TeamRecord {
    /// Creates a fresh record for a team that has completed nothing.
    pub fn new(
        team_name: impl Into<String>,
        pin_hash: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            team_name: team_name.into(),
            pin_hash: pin_hash.into(),
            stage: 0,
            xp: 0,
            idea_text: String::new(),
            roles_text: String::new(),
            github_link: String::new(),
            pitch_link: String::new(),
            last_updated_at: created_at.into(),
        }
    }

    /// Level derived from XP by integer division.
    pub const fn level(&self) -> u32 {
        self.xp / XP_PER_QUEST
    }

    /// The artifact submitted for the given quest (empty if not submitted).
    pub fn artifact(&self, quest: QuestIndex) -> &str {
        match quest {
            QuestIndex::Idea => &self.idea_text,
            QuestIndex::Team => &self.roles_text,
            QuestIndex::Mvp => &self.github_link,
            QuestIndex::Pitch => &self.pitch_link,
        }
    }

    /// Replaces the artifact slot for the given quest.
    pub fn set_artifact(&mut self, quest: QuestIndex, artifact: impl Into<String>) {
        let slot = match quest {
            QuestIndex::Idea => &mut self.idea_text,
            QuestIndex::Team => &mut self.roles_text,
            QuestIndex::Mvp => &mut self.github_link,
            QuestIndex::Pitch => &mut self.pitch_link,
        };
        *slot = artifact.into();
    }

    /// Whether the given quest has already been completed.
    pub const fn has_completed(&self, quest: QuestIndex) -> bool {
        self.stage >= quest.number()
    }

    /// The next quest this team can attempt, if any remain.
    pub const fn next_quest(&self) -> Option<QuestIndex> {
        QuestIndex::from_number(self.stage + 1)
    }
}
