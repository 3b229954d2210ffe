//! The ordered quest catalog.
//!
//! Four quests, 1-indexed, each unlocking only after the previous one is
//! complete. The catalog carries the display metadata and the metrics tag
//! emitted when a quest is completed; the progression rules themselves live
//! in [`crate::advance`].

use crate::record::XP_PER_QUEST;

/// One of the four ordered quests.
///
/// The discriminant is the 1-based quest number as presented to teams and as
/// stored in the team's `stage` column once the quest is complete. The strum
/// string form is the metrics stage tag (`idea`, `team`, `mvp`, `pitch`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QuestIndex {
    /// Quest 1 - submit the hackathon idea.
    Idea = 1,
    /// Quest 2 - define the team roles.
    Team = 2,
    /// Quest 3 - submit the GitHub repository.
    Mvp = 3,
    /// Quest 4 - submit the presentation link.
    Pitch = 4,
}

impl QuestIndex {
    /// The 1-based quest number.
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Look up a quest by its 1-based number.
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Idea),
            2 => Some(Self::Team),
            3 => Some(Self::Mvp),
            4 => Some(Self::Pitch),
            _ => None,
        }
    }

    /// Metrics tag recorded when this quest is completed.
    pub const fn stage_tag(self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Team => "team",
            Self::Mvp => "mvp",
            Self::Pitch => "pitch",
        }
    }

    /// Catalog entry for this quest.
    pub const fn spec(self) -> &'static QuestSpec {
        &QUESTS[self as usize - 1]
    }
}

/// Static metadata for one quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestSpec {
    /// Which quest this entry describes.
    pub index: QuestIndex,
    /// Display title.
    pub title: &'static str,
    /// Short prompt shown to teams.
    pub description: &'static str,
    /// XP granted on completion.
    pub xp_reward: u32,
}

/// The full quest catalog, in unlock order.
pub const QUESTS: [QuestSpec; 4] = [
    QuestSpec {
        index: QuestIndex::Idea,
        title: "The Call to Adventure",
        description: "Submit your hackathon idea",
        xp_reward: XP_PER_QUEST,
    },
    QuestSpec {
        index: QuestIndex::Team,
        title: "Gathering the Party",
        description: "Define your team roles",
        xp_reward: XP_PER_QUEST,
    },
    QuestSpec {
        index: QuestIndex::Mvp,
        title: "The Road of Trials",
        description: "Submit your GitHub repository",
        xp_reward: XP_PER_QUEST,
    },
    QuestSpec {
        index: QuestIndex::Pitch,
        title: "The Return",
        description: "Submit your presentation link",
        xp_reward: XP_PER_QUEST,
    },
];

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_number_roundtrip() {
        for quest in QuestIndex::iter() {
            assert_eq!(QuestIndex::from_number(quest.number()), Some(quest));
        }
        assert_eq!(QuestIndex::from_number(0), None);
        assert_eq!(QuestIndex::from_number(5), None);
    }

    #[test]
    fn test_catalog_is_in_unlock_order() {
        for (position, spec) in QUESTS.iter().enumerate() {
            assert_eq!(spec.index.number() as usize, position + 1);
            assert_eq!(spec.index.spec(), spec);
        }
    }

    #[test]
    fn test_stage_tags() {
        assert_eq!(QuestIndex::Idea.stage_tag(), "idea");
        assert_eq!(QuestIndex::Team.stage_tag(), "team");
        assert_eq!(QuestIndex::Mvp.stage_tag(), "mvp");
        assert_eq!(QuestIndex::Pitch.stage_tag(), "pitch");
    }

    #[test]
    fn test_every_quest_awards_the_same_xp() {
        for spec in &QUESTS {
            assert_eq!(spec.xp_reward, XP_PER_QUEST);
        }
    }
}
