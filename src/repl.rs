//! REPL and command handling utilities.
//!
//! The game runs in a read-eval-print loop. This module and its submodules
//! implement the various command handlers that manipulate the [`World`].

mod input;

pub mod encounter;
pub mod explore;
pub mod item;
pub mod survival;
pub mod system;

pub use encounter::*;
pub use explore::*;
pub use item::*;
pub use survival::*;
pub use system::*;

use anyhow::Result;
use log::{debug, info};
use rand::Rng;

use crate::achievements::Unlock;
use crate::command::{Command, parse_command};
use crate::item::{ItemHolder, Rarity};
use crate::story::StoryProgress;
use crate::style::GameStyle;
use crate::view::{EntityLine, View, ViewItem};
use crate::world::{UpkeepLine, World};

use input::{InputEvent, InputManager};

/// Control flow signal used by handlers to exit the REPL.
pub enum ReplControl {
    Continue,
    Quit,
}

/// Run the main read-eval-print loop until the player quits or dies.
///
/// Handles prompting, command parsing, and dispatching to the various
/// handler modules. Returns when a handler signals `Quit` or the player's
/// health reaches zero.
///
/// # Errors
/// - Propagates failures from handlers, such as a missing location for the
///   player.
pub fn run_repl(world: &mut World, rng: &mut impl Rng) -> Result<()> {
    #[allow(clippy::enum_glob_use)]
    use Command::*;
    let mut view = View::new();

    let mut input_manager = InputManager::new();

    view.push(location_view_item(world)?);
    view.flush();

    loop {
        // collect status effects for prompt insertion
        let mut status_effects = String::new();
        for effect in world.player.status_effects.keys() {
            let s = format!(" [{}]", effect.to_string().status_style());
            status_effects.push_str(&s);
        }

        let prompt = format!(
            "\n[Day {} {}{}]>> ",
            world.clock.day_number(),
            world.clock.formatted_time(),
            status_effects
        )
        .prompt_style()
        .to_string();

        let input_event = if let Ok(event) = input_manager.read_line(&prompt) {
            event
        } else {
            view.push(ViewItem::Error("Failed to read input. Try again.".to_string()));
            view.flush();
            continue;
        };

        let input = match input_event {
            InputEvent::Line(line) => line,
            InputEvent::Eof => "quit".to_string(),
            InputEvent::Interrupted => {
                view.push(ViewItem::Flavor("Command canceled.".to_string()));
                view.flush();
                continue;
            },
        };

        let command = parse_command(&input);
        debug!("parsed {input:?} as {command:?}");
        match &command {
            Achievements => achievements_handler(world, &mut view),
            Attack(target) => attack_handler(world, &mut view, target, rng)?,
            Camp => camp_handler(world, &mut view)?,
            Cook(target) => cook_handler(world, &mut view, target, rng)?,
            Drink => drink_handler(world, &mut view, rng),
            Drop(target) => drop_handler(world, &mut view, target)?,
            Eat(target) => eat_handler(world, &mut view, target)?,
            Equip(target) => equip_handler(world, &mut view, target)?,
            Equipment => equipment_handler(world, &mut view),
            Examine(target) => examine_handler(world, &mut view, target)?,
            Feed { target, item } => feed_handler(world, &mut view, target, item, rng)?,
            Help => help_handler(&mut view),
            Inventory => inventory_handler(world, &mut view),
            Journal => journal_handler(world, &mut view),
            Load(slot) => load_handler(world, &mut view, slot.as_deref())?,
            Look => look_handler(world, &mut view)?,
            Move(direction) => move_handler(world, &mut view, direction, rng)?,
            Quests => quests_handler(world, &mut view),
            Quit => {
                if let ReplControl::Quit = quit_handler(world, &mut view) {
                    view.flush();
                    break;
                }
            },
            Relieve => relieve_handler(world, &mut view, rng),
            Rest => rest_handler(world, &mut view, rng)?,
            Save(slot) => save_handler(world, &mut view, slot.as_deref()),
            Search(target) => search_handler(world, &mut view, target)?,
            Stats => stats_handler(world, &mut view),
            Status => status_handler(world, &mut view),
            Survey => survey_handler(world, &mut view)?,
            Take(target) => take_handler(world, &mut view, target, rng)?,
            Talk(target) => talk_handler(world, &mut view, target)?,
            Time => time_handler(world, &mut view),
            Unequip(target) => unequip_handler(world, &mut view, target),
            Unknown => {
                view.push(ViewItem::Error(
                    "I don't understand that command. Type 'help' for a list of commands."
                        .to_string(),
                ));
            },
            Wait(minutes) => wait_handler(world, &mut view, minutes.as_deref(), rng),
        }

        if world.player.is_dead() {
            info!("player died on day {}", world.clock.day_number());
            view.push(ViewItem::PlayerDeath(
                "Your strength fails and darkness closes in. You have died.".to_string(),
            ));
            view.flush();
            break;
        }

        view.flush();
    }
    Ok(())
}

/// Build the scene block for the current location and log every creature
/// present into the journal's bestiary.
///
/// # Errors
/// - when the current location id is missing from the world
pub fn location_view_item(world: &mut World) -> Result<ViewItem> {
    let location = world.current_location()?;
    let name = location.name.clone();
    let description = location.description.clone();
    let ambience = (!location.ambience.is_empty()).then(|| location.ambience.clone());
    let items: Vec<(String, Rarity)> = location
        .items
        .iter()
        .map(|item| (item.name.clone(), item.rarity))
        .collect();
    let entities: Vec<EntityLine> = location
        .entities
        .iter()
        .map(|entity| EntityLine {
            name: entity.name.clone(),
            hostile: entity.hostile,
            alive: !entity.is_dead_body(),
        })
        .collect();
    let sightings: Vec<(String, String)> = location
        .entities
        .iter()
        .filter(|entity| !entity.is_dead_body())
        .map(|entity| (entity.kind.base_name().to_string(), entity.description.clone()))
        .collect();

    for (kind, description) in sightings {
        world.journal.record_sighting(&kind, &description);
    }

    Ok(ViewItem::LocationView {
        name,
        description,
        ambience,
        items,
        entities,
    })
}

/// Run a story hook against the world and surface whatever it reports:
/// the milestone line itself plus any chapter the hook just opened.
/// Milestone lines are also kept in the journal.
pub fn apply_story_hook(
    world: &mut World,
    view: &mut View,
    hook: impl FnOnce(&mut StoryProgress) -> Option<String>,
) {
    let chapters_before = world.story.chapters.clone();
    if let Some(update) = hook(&mut world.story) {
        info!("story beat: {update}");
        world.journal.add_note(update.clone());
        view.push(ViewItem::StoryBeat(update));
        for chapter in world.story.chapters.difference(&chapters_before) {
            view.push(ViewItem::ChapterUnlocked(chapter.clone()));
        }
    }
}

/// Surface a fresh achievement unlock and bank its rolled rewards in the
/// player's pack.
pub fn grant_unlock(world: &mut World, view: &mut View, unlock: Unlock) {
    info!("achievement unlocked: {}", unlock.name);
    let rewards: Vec<(String, Rarity)> = unlock
        .rewards
        .iter()
        .map(|item| (item.name.clone(), item.rarity))
        .collect();
    view.push(ViewItem::AchievementUnlocked {
        name: unlock.name.to_string(),
        description: unlock.description.to_string(),
        rewards,
    });
    for item in unlock.rewards {
        world.player.add_item(item);
    }
}

/// Advance world time and route the upkeep lines into the view.
pub fn advance_world(world: &mut World, view: &mut View, minutes: u64, rng: &mut impl Rng) {
    for line in world.advance_time(minutes, rng) {
        match line {
            UpkeepLine::Ambient(text) => view.push(ViewItem::AmbientEvent(text)),
            UpkeepLine::Warning(text) => view.push(ViewItem::Warning(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityKind};
    use crate::item::Item;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn scene_block_records_bestiary_sightings() {
        let mut world = World::new_game();
        assert!(world.journal.is_empty());
        let wolf = Entity::spawn_basic(EntityKind::Wolf)
            .with_description("A grey wolf watches you cautiously");
        world.current_location_mut().unwrap().add_entity(wolf);

        let item = location_view_item(&mut world).unwrap();

        assert!(matches!(item, ViewItem::LocationView { .. }));
        assert!(
            world
                .journal
                .sightings()
                .any(|(kind, note)| kind == "wolf" && note.contains("grey wolf"))
        );
    }

    #[test]
    fn story_hooks_surface_chapter_unlocks() {
        let mut world = World::new_game();
        let mut view = View::new();

        apply_story_hook(&mut world, &mut view, StoryProgress::on_feed_wolf);

        let items = view.items;
        assert!(items.iter().any(|item| matches!(
            item,
            ViewItem::StoryBeat(text) if text.contains("wolves' trust")
        )));
        assert!(
            items
                .iter()
                .any(|item| item == &ViewItem::ChapterUnlocked("wilderness".to_string()))
        );
        assert_eq!(world.journal.notes().len(), 1);
    }

    #[test]
    fn second_story_hook_reports_nothing_new() {
        let mut world = World::new_game();
        let mut view = View::new();
        apply_story_hook(&mut world, &mut view, StoryProgress::on_feed_wolf);
        view.items.clear();

        apply_story_hook(&mut world, &mut view, StoryProgress::on_feed_wolf);
        assert!(view.items.is_empty());
    }

    #[test]
    fn unlock_rewards_land_in_the_pack() {
        let mut world = World::new_game();
        let mut view = View::new();
        let before = world.player.inventory.len();

        grant_unlock(
            &mut world,
            &mut view,
            Unlock {
                name: "First Steps",
                description: "Move to a new location",
                rewards: vec![Item::misc("lucky pebble", "A smooth pebble")],
            },
        );

        assert_eq!(world.player.inventory.len(), before + 1);
        assert!(view.items.iter().any(|item| matches!(
            item,
            ViewItem::AchievementUnlocked { name, .. } if name == "First Steps"
        )));
    }

    #[test]
    fn upkeep_lines_route_to_ambient_and_warning_items() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut world = World::new_game();
        world.player.energy = 10.0;
        let mut view = View::new();

        advance_world(&mut world, &mut view, 5, &mut rng);

        assert!(
            view.items
                .contains(&ViewItem::Warning("You're exhausted and need sleep!".to_string()))
        );
    }
}
