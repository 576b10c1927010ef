//! Story progression -- milestones, quest stages, discovered chapters, and
//! the scripted texts that anchor them.
//!
//! Hooks fire at most once each; the milestone flag is the guard. Callers
//! surface the returned line as a chapter banner.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::location::LocationKind;

pub const OPENING_TEXT: &str = "\
Welcome to Wildwood...

You awaken in a peaceful meadow, your head foggy with half-remembered dreams.
The gentle rustling of grass and distant bird calls fill the air. Nearby,
you notice a mysterious note on the ground, its edges stained with what
appears to be blood.

Your journey begins here, but where it leads... only the crystals know.

=== Basic Commands ===
- look : examine your surroundings
- take note : pick up the mysterious note
- inventory : check your belongings
- help : show all commands";

pub const NOTE_TEXT: &str = "\
The ancient crystals in these caves hold a power beyond imagination.
But beware - they are guarded by those who have forgotten their true purpose.

The wolves remember the old ways. Gain their trust, and they will guide you.
The bats carry messages between the sacred places. Feed them, and they may
share their secrets.

Be cautious, be kind, and above all - listen to the crystal whispers.

- A Friend";

/// Scripted examine text for story items, keyed by item name.
pub fn examine_text(item_name: &str) -> Option<&'static str> {
    if item_name.eq_ignore_ascii_case("mysterious note") {
        Some(NOTE_TEXT)
    } else {
        None
    }
}

/// One-shot story flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestones {
    pub wolves_befriended: bool,
    pub cave_discovered: bool,
    pub crystal_found: bool,
}

/// Per-quest stage counters. `tutorial` and `ancient_secret` are reserved
/// lines with no advancing hook yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestStages {
    pub tutorial: u32,
    pub wolves: u32,
    pub crystals: u32,
    pub ancient_secret: u32,
}

/// A scripted quest line shown by the `quests` command.
#[derive(Debug, Clone, Copy)]
pub struct Quest {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub stages: &'static [&'static str],
    pub chapter: &'static str,
}

impl Quest {
    /// Number of stages currently cleared.
    pub fn progress(&self, stages: &QuestStages) -> u32 {
        match self.id {
            "survival" => stages.tutorial,
            "wolves" => stages.wolves,
            "crystals" => stages.crystals,
            _ => 0,
        }
    }
}

pub const QUESTS: &[Quest] = &[
    Quest {
        id: "survival",
        title: "Learning to Survive",
        description: "Learn the basics of survival",
        stages: &["Find food", "Make camp", "Craft tools"],
        chapter: "beginning",
    },
    Quest {
        id: "wolves",
        title: "The Wolf Pack",
        description: "Gain the trust of the local wolves",
        stages: &["Find the pack", "Feed the wolves", "Earn trust"],
        chapter: "wilderness",
    },
    Quest {
        id: "crystals",
        title: "Crystal Mysteries",
        description: "Discover the secret of the glowing crystals",
        stages: &["Find crystals", "Study patterns", "Unlock power"],
        chapter: "mysteries",
    },
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryProgress {
    pub milestones: Milestones,
    pub stages: QuestStages,
    pub chapters: BTreeSet<String>,
}

impl StoryProgress {
    pub fn new() -> StoryProgress {
        StoryProgress::default()
    }

    /// Entering a cave for the first time opens the mysteries chapter.
    pub fn on_enter_location(&mut self, kind: LocationKind) -> Option<String> {
        if kind == LocationKind::Cave && !self.milestones.cave_discovered {
            self.milestones.cave_discovered = true;
            self.stages.crystals += 1;
            self.chapters.insert("mysteries".to_string());
            return Some("You've discovered your first cave!".to_string());
        }
        None
    }

    /// Feeding a wolf for the first time opens the wilderness chapter.
    pub fn on_feed_wolf(&mut self) -> Option<String> {
        if self.milestones.wolves_befriended {
            return None;
        }
        self.milestones.wolves_befriended = true;
        self.stages.wolves += 1;
        self.chapters.insert("wilderness".to_string());
        Some("You've gained the wolves' trust!".to_string())
    }

    /// Taking a crystal for the first time advances the crystal quest.
    pub fn on_take_crystal(&mut self) -> Option<String> {
        if self.milestones.crystal_found {
            return None;
        }
        self.milestones.crystal_found = true;
        self.stages.crystals += 1;
        Some("You've found one of the glowing crystals!".to_string())
    }
}

/// Field notes the player accumulates: creature sightings and story updates.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    bestiary: BTreeMap<String, String>,
    notes: Vec<String>,
}

impl Journal {
    pub fn new() -> Journal {
        Journal::default()
    }

    /// Record the first sighting of a creature kind. Later sightings of the
    /// same kind keep the original entry.
    pub fn record_sighting(&mut self, kind_name: &str, description: &str) {
        self.bestiary
            .entry(kind_name.to_string())
            .or_insert_with(|| description.to_string());
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn sightings(&self) -> impl Iterator<Item = (&String, &String)> {
        self.bestiary.iter()
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.bestiary.is_empty() && self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cave_discovery_fires_once() {
        let mut story = StoryProgress::new();
        assert!(story.on_enter_location(LocationKind::Meadow).is_none());
        let banner = story.on_enter_location(LocationKind::Cave);
        assert_eq!(banner.as_deref(), Some("You've discovered your first cave!"));
        assert!(story.milestones.cave_discovered);
        assert_eq!(story.stages.crystals, 1);
        assert!(story.chapters.contains("mysteries"));

        assert!(story.on_enter_location(LocationKind::Cave).is_none());
        assert_eq!(story.stages.crystals, 1);
    }

    #[test]
    fn wolf_trust_and_crystal_hooks_advance_their_quests() {
        let mut story = StoryProgress::new();
        assert!(story.on_feed_wolf().is_some());
        assert!(story.on_feed_wolf().is_none());
        assert_eq!(story.stages.wolves, 1);
        assert!(story.chapters.contains("wilderness"));

        assert!(story.on_take_crystal().is_some());
        assert!(story.on_take_crystal().is_none());
        assert_eq!(story.stages.crystals, 1);
    }

    #[test]
    fn quest_progress_reads_the_matching_counter() {
        let mut story = StoryProgress::new();
        let _ = story.on_enter_location(LocationKind::Cave);
        let _ = story.on_take_crystal();
        let crystals = QUESTS.iter().find(|q| q.id == "crystals").unwrap();
        let survival = QUESTS.iter().find(|q| q.id == "survival").unwrap();
        assert_eq!(crystals.progress(&story.stages), 2);
        assert_eq!(survival.progress(&story.stages), 0);
    }

    #[test]
    fn journal_keeps_first_sighting_only() {
        let mut journal = Journal::new();
        journal.record_sighting("wolf", "A grey wolf watches you cautiously");
        journal.record_sighting("wolf", "A second wolf");
        let entries: Vec<_> = journal.sightings().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1, "A grey wolf watches you cautiously");
    }

    #[test]
    fn note_examine_text_matches_case_insensitively() {
        assert!(examine_text("Mysterious Note").is_some());
        assert!(examine_text("letter").is_none());
    }
}
