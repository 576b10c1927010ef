//! `repl::system` module
//!
//! Handlers for meta commands: saving and loading, the quest and
//! achievement listings, the journal, help, and quitting.

use anyhow::Result;
use log::{info, warn};

use crate::achievements::ACHIEVEMENTS;
use crate::repl::{ReplControl, location_view_item};
use crate::save_files;
use crate::story::QUESTS;
use crate::view::{AchievementLine, QuestLine, View, ViewItem};
use crate::world::World;

/// Write the world to a named save slot; `save` alone writes slot "save".
pub fn save_handler(world: &World, view: &mut View, slot: Option<&str>) {
    let slot = save_files::sanitize_slot(slot.unwrap_or("save"));
    match save_files::save_game(world, &slot) {
        Ok(path) => {
            let file = path.file_name().map_or_else(
                || path.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            );
            view.push(ViewItem::GameSaved { slot, file });
        },
        Err(err) => {
            warn!("manual save to '{slot}' failed: {err:#}");
            view.push(ViewItem::Error(format!("Failed to save the game: {err}")));
        },
    }
}

/// Replace the world from a named save slot. `load` alone lists what is
/// available instead. A failed load leaves the running world untouched.
///
/// # Errors
/// - if the loaded world's current location cannot be resolved
pub fn load_handler(world: &mut World, view: &mut View, slot: Option<&str>) -> Result<()> {
    let Some(raw) = slot else {
        list_saves_into(view);
        return Ok(());
    };
    let slot = save_files::sanitize_slot(raw);
    match save_files::load_game(&slot) {
        Ok(data) => {
            *world = data.into_world();
            info!("world replaced from save slot '{slot}'");
            view.push(ViewItem::GameLoaded { slot });
            view.push(location_view_item(world)?);
        },
        Err(err) => {
            warn!("load of slot '{slot}' failed: {err:#}");
            view.push(ViewItem::Error(format!("Unable to load '{slot}': {err}")));
        },
    }
    Ok(())
}

fn list_saves_into(view: &mut View) {
    let directory = save_files::save_dir();
    match save_files::list_saves() {
        Ok(entries) => view.push(ViewItem::SavedGamesList {
            directory: directory.display().to_string(),
            entries,
        }),
        Err(err) => {
            warn!("listing saves failed: {err:#}");
            view.push(ViewItem::Error(format!("Unable to list saved games: {err}")));
        },
    }
}

/// Show every quest line with its cleared stages marked.
pub fn quests_handler(world: &World, view: &mut View) {
    let quests = QUESTS
        .iter()
        .map(|quest| {
            let progress = quest.progress(&world.story.stages);
            QuestLine {
                title: quest.title.to_string(),
                description: quest.description.to_string(),
                chapter: quest.chapter.to_string(),
                stages: quest
                    .stages
                    .iter()
                    .zip(0u32..)
                    .map(|(stage, index)| ((*stage).to_string(), index < progress))
                    .collect(),
            }
        })
        .collect();
    view.push(ViewItem::QuestLog(quests));
}

/// Show every achievement, with partial progress for the counted ones.
pub fn achievements_handler(world: &World, view: &mut View) {
    let entries = ACHIEVEMENTS
        .iter()
        .map(|def| AchievementLine {
            name: def.name.to_string(),
            description: def.description.to_string(),
            unlocked: world.achievements.is_unlocked(def.id),
            progress: world.achievements.progress_of(def.id),
        })
        .collect();
    view.push(ViewItem::AchievementList(entries));
}

/// Show the bestiary and collected story notes.
pub fn journal_handler(world: &World, view: &mut View) {
    let sightings = world
        .journal
        .sightings()
        .map(|(kind, note)| (kind.clone(), note.clone()))
        .collect();
    let notes = world.journal.notes().to_vec();
    view.push(ViewItem::JournalView { sightings, notes });
}

/// Show the command reference.
pub fn help_handler(view: &mut View) {
    view.push(ViewItem::Help);
}

/// Say goodbye and signal the REPL to stop.
pub fn quit_handler(world: &World, view: &mut View) -> ReplControl {
    info!(
        "quit on day {} at {}, health {}, {} item(s) carried",
        world.clock.day_number(),
        world.clock.formatted_time(),
        world.player.health,
        world.player.inventory.len()
    );
    view.push(ViewItem::Flavor("Thanks for playing Wildwood!".to_string()));
    ReplControl::Quit
}
