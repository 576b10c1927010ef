//! View module.
//! This contains the view to the game world / messages.
//! Rather than printing to the console from each handler, we aggregate
//! needed information and messages to be organized and displayed at the
//! end of the turn.

use colored::Colorize;
use textwrap::{fill, termwidth};
use variantly::Variantly;

use crate::item::Rarity;
use crate::save_files::{SaveFileEntry, SaveFileStatus};
use crate::style::GameStyle;

/// Command reference shown by `help`.
pub const HELP_TEXT: &str = "\
=== Basic Commands ===
- look (l) : examine your surroundings
- examine/read/inspect (x) : look at something closely
- go/move/walk <direction> : move in a direction (n/s/e/w)
- take/get/grab : pick up an item
- drop/discard : put down an item
- inventory (i/inv) : check your belongings
- help (h/?) : show this help message

=== Interaction Commands ===
- search/scan : search something in the area
- talk/speak/chat : attempt to talk to something
- attack/fight/hit : attempt to attack something
- feed/give : try to feed something with an item

=== Equipment Commands ===
- equip/wear/wield : equip an item
- unequip/remove : remove equipped item
- equipment/gear (eq) : check your equipment and stats

=== Survival Commands ===
- eat/taste <food> : consume food items
- drink/sip : drink water if you have it
- cook/prepare : cook food when no hostiles are near
- rest : recover energy when safe
- camp : set up camp for cooking and resting
- relieve : answer nature's call
- status : check your health and needs
- stats : review your attributes

=== Information Commands ===
- survey : carefully examine your surroundings
- time : check current time and day
- wait [minutes] : let time pass
- quests : review your quests
- achievements : review your achievements
- journal : view your collected information

=== System Commands ===
- save [name] : save your game
- load [name] : load a saved game (bare load lists saves)
- quit : exit the game";

/// Output sections, printed in a fixed order each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Where the player is: description, items, creatures.
    Scene,
    /// Direct results of the player's command.
    Results,
    /// Story beats, chapter unlocks, achievements.
    Story,
    /// Background events and needs warnings.
    Ambient,
    /// Saves, help, death, other engine output.
    System,
}

/// A creature line in the scene listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLine {
    pub name: String,
    pub hostile: bool,
    pub alive: bool,
}

/// Payload for the `status` readout.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReadout {
    pub health: u32,
    pub max_health: u32,
    pub hunger: f32,
    pub thirst: f32,
    pub energy: f32,
    pub bladder: f32,
    pub damage: u32,
    pub defense: u32,
    pub crit_chance: f64,
    pub dodge_chance: f64,
    pub equipment: Vec<(String, Option<String>)>,
    pub effects: Vec<(String, u32)>,
}

/// Payload for the `stats` readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeReadout {
    pub strength: u32,
    pub dexterity: u32,
    pub intelligence: u32,
    pub vitality: u32,
    pub charisma: u32,
    pub wisdom: u32,
    pub luck: u32,
}

/// An equipped item with the bonuses it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquippedItem {
    pub name: String,
    pub rarity: Rarity,
    pub damage_bonus: u32,
    pub defense_bonus: u32,
}

/// Payload for the `equipment` readout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentReadout {
    pub total_damage: u32,
    pub total_defense: u32,
    pub slots: Vec<(String, Option<EquippedItem>)>,
}

/// One quest in the `quests` listing, stages flagged done or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestLine {
    pub title: String,
    pub description: String,
    pub chapter: String,
    pub stages: Vec<(String, bool)>,
}

/// One achievement in the `achievements` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementLine {
    pub name: String,
    pub description: String,
    pub unlocked: bool,
    pub progress: Option<(u32, u32)>,
}

/// `ViewItems` are each of the various types of information / messages
/// that may be displayed to the player.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum ViewItem {
    LocationView {
        name: String,
        description: String,
        ambience: Option<String>,
        items: Vec<(String, Rarity)>,
        entities: Vec<EntityLine>,
    },
    CombatRound(Vec<String>),
    ActionResult(String),
    Flavor(String),
    Error(String),
    Examine {
        name: String,
        text: String,
    },
    SurveyView {
        description: String,
        horizon: Vec<String>,
        details: Vec<String>,
    },
    InventoryList(Vec<(String, Rarity)>),
    EquipmentList(EquipmentReadout),
    StatusPanel(StatusReadout),
    AttributePanel(AttributeReadout),
    TimeReadout {
        day: u64,
        clock: String,
        band: String,
    },
    QuestLog(Vec<QuestLine>),
    AchievementList(Vec<AchievementLine>),
    JournalView {
        sightings: Vec<(String, String)>,
        notes: Vec<String>,
    },
    StoryBeat(String),
    ChapterUnlocked(String),
    AchievementUnlocked {
        name: String,
        description: String,
        rewards: Vec<(String, Rarity)>,
    },
    AmbientEvent(String),
    Warning(String),
    SavedGamesList {
        directory: String,
        entries: Vec<SaveFileEntry>,
    },
    GameSaved {
        slot: String,
        file: String,
    },
    GameLoaded {
        slot: String,
    },
    Help,
    PlayerDeath(String),
}

impl ViewItem {
    pub fn section(&self) -> Section {
        match self {
            ViewItem::LocationView { .. } => Section::Scene,
            ViewItem::CombatRound(_)
            | ViewItem::ActionResult(_)
            | ViewItem::Flavor(_)
            | ViewItem::Error(_)
            | ViewItem::Examine { .. }
            | ViewItem::SurveyView { .. }
            | ViewItem::InventoryList(_)
            | ViewItem::EquipmentList(_)
            | ViewItem::StatusPanel(_)
            | ViewItem::AttributePanel(_)
            | ViewItem::TimeReadout { .. }
            | ViewItem::QuestLog(_)
            | ViewItem::AchievementList(_)
            | ViewItem::JournalView { .. } => Section::Results,
            ViewItem::StoryBeat(_)
            | ViewItem::ChapterUnlocked(_)
            | ViewItem::AchievementUnlocked { .. } => Section::Story,
            ViewItem::AmbientEvent(_) | ViewItem::Warning(_) => Section::Ambient,
            ViewItem::SavedGamesList { .. }
            | ViewItem::GameSaved { .. }
            | ViewItem::GameLoaded { .. }
            | ViewItem::Help
            | ViewItem::PlayerDeath(_) => Section::System,
        }
    }
}

/// View aggregates information to be displayed on each pass through the
/// REPL and then organizes and displays the result.
#[derive(Debug, Clone)]
pub struct View {
    pub width: usize,
    pub items: Vec<ViewItem>,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self {
            width: termwidth(),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(item);
    }

    /// Items bound for one section, in push order.
    fn entries_in(&self, section: Section) -> Vec<&ViewItem> {
        self.items
            .iter()
            .filter(|item| item.section() == section)
            .collect()
    }

    /// Compose and display all message contents in the current frame / turn.
    pub fn flush(&mut self) {
        // re-check terminal width in case it's been resized
        self.width = termwidth();

        const ORDER: [(Section, &str); 5] = [
            (Section::Scene, "scene"),
            (Section::Results, "results"),
            (Section::Story, "story"),
            (Section::Ambient, "situation"),
            (Section::System, "game"),
        ];
        for (section, label) in ORDER {
            let entries = self.entries_in(section);
            if entries.is_empty() {
                continue;
            }
            println!("{:.>width$}", label.section_style(), width = self.width);
            for item in entries {
                self.render(item);
            }
        }

        // clear the buffer for the next turn
        self.items.clear();
        println!();
    }

    #[allow(clippy::too_many_lines)]
    fn render(&self, item: &ViewItem) {
        match item {
            ViewItem::LocationView {
                name,
                description,
                ambience,
                items,
                entities,
            } => {
                println!("{:^width$}", name.location_titlebar_style(), width = self.width);
                println!("{}", fill(description, self.width).description_style());
                if let Some(ambience) = ambience {
                    println!("{}", fill(ambience, self.width).flavor_style());
                }
                if !items.is_empty() {
                    println!("You see: {}", Self::item_listing(items));
                }
                if !entities.is_empty() {
                    let names: Vec<String> = entities
                        .iter()
                        .map(|line| Self::entity_name(line).to_string())
                        .collect();
                    println!("Present here: {}", names.join(", "));
                }
            },
            ViewItem::CombatRound(lines) => {
                for line in lines {
                    println!("{line}");
                }
            },
            ViewItem::ActionResult(text) => println!("{}", fill(text, self.width)),
            ViewItem::Flavor(text) => println!("{}", fill(text, self.width).flavor_style()),
            ViewItem::Error(text) => println!("{}", fill(text, self.width).error_style()),
            ViewItem::Examine { name, text } => {
                println!("{}", format!("=== {name} ===").section_style());
                // Scripted texts carry their own line breaks; keep them.
                for line in text.lines() {
                    println!("{}", fill(line, self.width).description_style());
                }
            },
            ViewItem::SurveyView {
                description,
                horizon,
                details,
            } => {
                println!(
                    "{}",
                    "=== Surveying Your Surroundings ===".section_style()
                );
                println!("{}", fill(description, self.width).description_style());
                for line in horizon {
                    println!("{}", fill(line, self.width));
                }
                println!("{}", "Upon closer inspection:".subheading_style());
                for detail in details {
                    println!("- {}", fill(detail, self.width).flavor_style());
                }
            },
            ViewItem::InventoryList(items) => {
                if items.is_empty() {
                    println!("Your inventory is empty.");
                } else {
                    println!("Inventory:");
                    for (name, rarity) in items {
                        println!("- {}", name.rarity_style(*rarity));
                    }
                }
            },
            ViewItem::EquipmentList(readout) => {
                println!("{}", "=== Equipment ===".section_style());
                println!("Total Damage: {}", readout.total_damage);
                println!("Total Defense: {}", readout.total_defense);
                println!();
                println!("{}", "Equipped Items:".subheading_style());
                for (slot, item) in &readout.slots {
                    match item {
                        Some(equipped) => {
                            let mut stats = Vec::new();
                            if equipped.damage_bonus > 0 {
                                stats.push(format!("+{} damage", equipped.damage_bonus));
                            }
                            if equipped.defense_bonus > 0 {
                                stats.push(format!("+{} defense", equipped.defense_bonus));
                            }
                            let stat_text = if stats.is_empty() {
                                String::new()
                            } else {
                                format!(" ({})", stats.join(", "))
                            };
                            println!(
                                "{slot}: {}{stat_text}",
                                equipped.name.rarity_style(equipped.rarity)
                            );
                        },
                        None => println!("{slot}: Nothing equipped"),
                    }
                }
            },
            ViewItem::StatusPanel(readout) => Self::status_panel(readout),
            ViewItem::AttributePanel(attrs) => {
                println!("{}", "=== Attributes ===".section_style());
                println!("Strength: {}", attrs.strength);
                println!("Dexterity: {}", attrs.dexterity);
                println!("Intelligence: {}", attrs.intelligence);
                println!("Vitality: {}", attrs.vitality);
                println!("Charisma: {}", attrs.charisma);
                println!("Wisdom: {}", attrs.wisdom);
                println!("Luck: {}", attrs.luck);
            },
            ViewItem::TimeReadout { day, clock, band } => {
                println!("{}", format!("Day {day}").status_style());
                println!("Time: {clock} ({band})");
            },
            ViewItem::QuestLog(quests) => {
                println!("{}", "=== Active Quests ===".section_style());
                for quest in quests {
                    println!(
                        "{} [{}]",
                        quest.title.subheading_style(),
                        quest.chapter.section_style()
                    );
                    println!("  {}", quest.description);
                    for (stage, done) in &quest.stages {
                        let marker = if *done { "\u{2713}" } else { "\u{2022}" };
                        println!("  {marker} {stage}");
                    }
                }
            },
            ViewItem::AchievementList(entries) => {
                println!("{}", "=== Achievements ===".section_style());
                for entry in entries {
                    let marker = if entry.unlocked { "\u{2713}" } else { "\u{25A1}" };
                    let progress = entry
                        .progress
                        .filter(|_| !entry.unlocked)
                        .map_or(String::new(), |(current, target)| {
                            format!(" ({current}/{target})")
                        });
                    let line =
                        format!("{marker} {}{progress}: {}", entry.name, entry.description);
                    if entry.unlocked {
                        println!("{}", line.achievement_style());
                    } else {
                        println!("{line}");
                    }
                }
            },
            ViewItem::JournalView { sightings, notes } => {
                if sightings.is_empty() && notes.is_empty() {
                    println!("Your journal is empty.");
                    return;
                }
                if !sightings.is_empty() {
                    println!("{}", "=== Bestiary ===".section_style());
                    for (kind, note) in sightings {
                        println!("{}: {}", kind.entity_style(), note);
                    }
                }
                if !notes.is_empty() {
                    println!("{}", "=== Notes ===".section_style());
                    for note in notes {
                        println!("- {note}");
                    }
                }
            },
            ViewItem::StoryBeat(text) => println!("{}", fill(text, self.width).story_style()),
            ViewItem::ChapterUnlocked(chapter) => {
                println!(
                    "{}",
                    format!("New chapter unlocked: {chapter}!").story_style().bold()
                );
            },
            ViewItem::AchievementUnlocked {
                name,
                description,
                rewards,
            } => {
                println!(
                    "{}",
                    format!("Achievement Unlocked: {name} - {description}").achievement_style()
                );
                if !rewards.is_empty() {
                    println!("Rewards:");
                    for (reward, rarity) in rewards {
                        println!("- {}", reward.rarity_style(*rarity));
                    }
                }
            },
            ViewItem::AmbientEvent(text) => println!("{}", fill(text, self.width).event_style()),
            ViewItem::Warning(text) => println!("{}", fill(text, self.width).warning_style()),
            ViewItem::SavedGamesList { directory, entries } => {
                if entries.is_empty() {
                    println!("No saved games found in {directory}.");
                    return;
                }
                println!("Saved games in {directory}:");
                for entry in entries {
                    println!("- {}", Self::save_line(entry));
                }
            },
            ViewItem::GameSaved { slot, file } => {
                println!("Game saved to '{slot}' ({file}).");
            },
            ViewItem::GameLoaded { slot } => {
                println!("Loaded save '{slot}'.");
            },
            ViewItem::Help => println!("{HELP_TEXT}"),
            ViewItem::PlayerDeath(text) => {
                println!("{}", fill(text, self.width).error_style().bold());
            },
        }
    }

    /// Comma-join item names, each colored by rarity.
    fn item_listing(items: &[(String, Rarity)]) -> String {
        items
            .iter()
            .map(|(name, rarity)| name.rarity_style(*rarity).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn entity_name(line: &EntityLine) -> colored::ColoredString {
        if !line.alive {
            line.name.as_str().dimmed()
        } else if line.hostile {
            line.name.hostile_style()
        } else {
            line.name.entity_style()
        }
    }

    /// One listing line per save file, status colored by severity.
    fn save_line(entry: &SaveFileEntry) -> String {
        match &entry.status {
            SaveFileStatus::Ready => {
                format!("{} (v{})", entry.slot.item_style(), entry.version)
            },
            SaveFileStatus::VersionMismatch { save_version } => format!(
                "{} (v{}) {}",
                entry.slot.item_style(),
                save_version,
                "[older version]".warning_style()
            ),
            SaveFileStatus::Corrupted { message } => format!(
                "{} {}",
                entry.slot.item_style(),
                format!("[unreadable: {message}]").error_style()
            ),
        }
    }

    fn equipment_lines(slots: &[(String, Option<String>)]) {
        for (slot, item) in slots {
            match item {
                Some(name) => println!("{slot}: {}", name.item_style()),
                None => println!("{slot}: None"),
            }
        }
    }

    fn status_panel(readout: &StatusReadout) {
        println!("{}", "=== Status ===".section_style());
        println!("Health: {}/{}", readout.health, readout.max_health);
        println!("Hunger: {:.0}/100", readout.hunger);
        println!("Thirst: {:.0}/100", readout.thirst);
        println!("Energy: {:.0}/100", readout.energy);
        println!("Bladder: {:.0}/100", readout.bladder);
        println!();
        println!("{}", "Equipment:".subheading_style());
        Self::equipment_lines(&readout.equipment);
        println!();
        println!("Damage: {}", readout.damage);
        println!("Defense: {}", readout.defense);
        println!("Crit chance: {:.0}%", readout.crit_chance * 100.0);
        println!("Dodge chance: {:.0}%", readout.dodge_chance * 100.0);
        if !readout.effects.is_empty() {
            let effects: Vec<String> = readout
                .effects
                .iter()
                .map(|(name, turns)| format!("{name} ({turns} turns)"))
                .collect();
            println!("{} {}", "Effects:".warning_style(), effects.join(", "));
        }
    }
}
