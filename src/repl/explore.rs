//! Observation and traversal command handlers.
//!
//! # Commands
//!
//! - [`look_handler`] - redraw the current location
//! - [`examine_handler`] - inspect a named item, or glance toward a direction
//! - [`move_handler`] - walk to a neighboring location, growing the map as needed
//! - [`survey_handler`] - a slow look: horizon in every direction plus close detail
//! - [`search_handler`] - go through a creature (or what's left of one)
//! - [`time_handler`] - day, clock, and time-of-day band
//! - [`wait_handler`] - let minutes pass on purpose

use std::str::FromStr;

use anyhow::Result;
use log::info;
use rand::Rng;

use crate::entity_search::{SearchError, SearchScope, find_entity_match, find_item_match};
use crate::item::ItemHolder;
use crate::location::{Direction, Location};
use crate::repl::{advance_world, apply_story_hook, grant_unlock, location_view_item};
use crate::story;
use crate::view::{View, ViewItem};
use crate::world::World;

/// Time cost of walking between locations, in minutes.
const TRAVEL_MINUTES: u64 = 10;

/// Shows the current location in full.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn look_handler(world: &mut World, view: &mut View) -> Result<()> {
    view.push(location_view_item(world)?);
    Ok(())
}

/// Examine a named item, or glance toward a compass direction.
///
/// Direction words report what lies that way: the linked location if one
/// exists, otherwise unexplored-horizon flavor. Item names search the pack
/// first, then the ground. Scripted texts (the mysterious note) override the
/// item's own description.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn examine_handler(world: &mut World, view: &mut View, target: &str) -> Result<()> {
    if target.is_empty() {
        view.push(ViewItem::Error("What would you like to examine?".to_string()));
        return Ok(());
    }

    if let Ok(direction) = Direction::from_str(target) {
        let location = world.current_location()?;
        view.push(ViewItem::Flavor(horizon_line(world, location, direction)));
        return Ok(());
    }

    match find_item_match(world, target, SearchScope::Visible) {
        Ok(id) => {
            let found = world
                .player
                .find_item(id)
                .or_else(|| world.current_location().ok().and_then(|loc| loc.find_item(id)));
            if let Some(item) = found {
                let text = story::examine_text(&item.name)
                    .map_or_else(|| item.description.clone(), ToString::to_string);
                view.push(ViewItem::Examine {
                    name: item.name.clone(),
                    text,
                });
            }
        },
        Err(SearchError::NoMatchingName(_)) => {
            view.push(ViewItem::Error(format!("You don't see any {target} to examine.")));
        },
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Walk to a neighboring location. Travel costs time, and arriving fires the
/// discovery hooks: story milestones, movement and exploration achievements.
///
/// # Errors
/// - if a location id in the world map cannot be resolved
pub fn move_handler(
    world: &mut World,
    view: &mut View,
    target: &str,
    rng: &mut impl Rng,
) -> Result<()> {
    if target.is_empty() {
        view.push(ViewItem::Error(
            "Which direction would you like to move?".to_string(),
        ));
        return Ok(());
    }
    let Ok(direction) = Direction::from_str(target) else {
        view.push(ViewItem::Error(
            "You can only move north, south, east, or west.".to_string(),
        ));
        return Ok(());
    };

    let report = world.move_player(direction, rng)?;
    advance_world(world, view, TRAVEL_MINUTES, rng);
    apply_story_hook(world, view, |story| story.on_enter_location(report.kind));
    if let Some(unlock) = world.achievements.on_move(rng) {
        grant_unlock(world, view, unlock);
    }
    if let Some(unlock) = world.achievements.on_discover_kind(report.kind, rng) {
        grant_unlock(world, view, unlock);
    }
    view.push(location_view_item(world)?);
    Ok(())
}

/// Take a careful look around: the location description, what lies toward
/// each compass point, and close-up details of the ground underfoot.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn survey_handler(world: &World, view: &mut View) -> Result<()> {
    let location = world.current_location()?;
    let horizon = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ]
    .into_iter()
    .map(|direction| horizon_line(world, location, direction))
    .collect();

    view.push(ViewItem::SurveyView {
        description: location.description.clone(),
        horizon,
        details: location.survey_details(),
    });
    Ok(())
}

/// Search a creature. Live ones object in their own way; dead bodies give
/// up whatever they carried.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn search_handler(world: &mut World, view: &mut View, target: &str) -> Result<()> {
    if target.is_empty() {
        view.push(ViewItem::Error("What would you like to search?".to_string()));
        return Ok(());
    }
    match find_entity_match(world, target) {
        Ok(id) => {
            let location = world.current_location_mut()?;
            if let Some(message) = location.search_entity(id) {
                info!("player searched entity {id}");
                view.push(ViewItem::ActionResult(message));
            }
        },
        Err(SearchError::NoMatchingName(_)) => {
            view.push(ViewItem::ActionResult(format!(
                "You find nothing special about the {target}"
            )));
        },
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Report the in-game day and clock.
pub fn time_handler(world: &World, view: &mut View) {
    view.push(ViewItem::TimeReadout {
        day: world.clock.day_number(),
        clock: world.clock.formatted_time(),
        band: world.clock.time_of_day().to_string(),
    });
}

/// Pass time deliberately. Defaults to ten minutes when no count is given.
pub fn wait_handler(world: &mut World, view: &mut View, minutes: Option<&str>, rng: &mut impl Rng) {
    let minutes = match minutes {
        None => 10,
        Some(raw) => match raw.parse::<u64>() {
            Ok(count) => count,
            Err(_) => {
                view.push(ViewItem::Error(
                    "Please specify minutes as a number.".to_string(),
                ));
                return;
            },
        },
    };
    view.push(ViewItem::ActionResult(format!("You wait for {minutes} minutes...")));
    advance_world(world, view, minutes, rng);
}

/// What lies toward `direction` from `location`: the linked location's name
/// if one has been carved out, otherwise the kind's horizon flavor.
fn horizon_line(world: &World, location: &Location, direction: Direction) -> String {
    match location
        .exits
        .get(&direction)
        .and_then(|id| world.locations.get(id))
    {
        Some(destination) => {
            format!("To the {direction} you see {}.", destination.name.to_lowercase())
        },
        None => location.horizon_flavor(direction).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn examining_the_note_shows_the_scripted_text() {
        let mut world = World::new_game();
        let mut view = View::new();

        examine_handler(&mut world, &mut view, "note").unwrap();

        assert!(view.items.iter().any(|item| matches!(
            item,
            ViewItem::Examine { name, text }
                if name == "mysterious note" && text.contains("A Friend")
        )));
    }

    #[test]
    fn examining_nothing_asks_what() {
        let mut world = World::new_game();
        let mut view = View::new();

        examine_handler(&mut world, &mut view, "").unwrap();

        assert_eq!(
            view.items,
            vec![ViewItem::Error("What would you like to examine?".to_string())]
        );
    }

    #[test]
    fn examining_a_direction_reports_the_horizon() {
        let mut world = World::new_game();
        let mut view = View::new();

        examine_handler(&mut world, &mut view, "north").unwrap();

        // No exit has been carved yet, so the meadow horizon line shows.
        assert_eq!(
            view.items,
            vec![ViewItem::Flavor(
                "Rolling hills stretch into the distance.".to_string()
            )]
        );
    }

    #[test]
    fn moving_costs_time_and_links_locations() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut world = World::new_game();
        let mut view = View::new();
        let start = world.current;

        move_handler(&mut world, &mut view, "north", &mut rng).unwrap();

        assert_ne!(world.current, start);
        assert_eq!(world.clock.minutes(), TRAVEL_MINUTES);
        assert_eq!(world.locations.len(), 2);
        let there = world.current_location().unwrap();
        assert_eq!(there.exits.get(&Direction::South), Some(&start));
    }

    #[test]
    fn bad_directions_are_refused() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut world = World::new_game();
        let mut view = View::new();

        move_handler(&mut world, &mut view, "up", &mut rng).unwrap();

        assert_eq!(world.clock.minutes(), 0);
        assert_eq!(
            view.items,
            vec![ViewItem::Error(
                "You can only move north, south, east, or west.".to_string()
            )]
        );
    }

    #[test]
    fn first_move_unlocks_first_steps() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut world = World::new_game();
        let mut view = View::new();

        move_handler(&mut world, &mut view, "east", &mut rng).unwrap();

        assert!(world.achievements.is_unlocked("first_steps"));
        assert!(view.items.iter().any(|item| matches!(
            item,
            ViewItem::AchievementUnlocked { name, .. } if *name == "First Steps"
        )));
    }

    #[test]
    fn surveying_lists_all_four_directions() {
        let world = World::new_game();
        let mut view = View::new();

        survey_handler(&world, &mut view).unwrap();

        let Some(ViewItem::SurveyView { horizon, details, .. }) = view.items.first() else {
            panic!("expected a survey view");
        };
        assert_eq!(horizon.len(), 4);
        assert!(!details.is_empty());
    }

    #[test]
    fn searching_something_absent_finds_nothing_special() {
        let mut world = World::new_game();
        let mut view = View::new();

        search_handler(&mut world, &mut view, "ghost").unwrap();

        assert_eq!(
            view.items,
            vec![ViewItem::ActionResult(
                "You find nothing special about the ghost".to_string()
            )]
        );
    }

    #[test]
    fn waiting_rejects_non_numbers() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut world = World::new_game();
        let mut view = View::new();

        wait_handler(&mut world, &mut view, Some("a while"), &mut rng);

        assert_eq!(world.clock.minutes(), 0);
        assert_eq!(
            view.items,
            vec![ViewItem::Error("Please specify minutes as a number.".to_string())]
        );
    }

    #[test]
    fn waiting_defaults_to_ten_minutes() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut world = World::new_game();
        let mut view = View::new();

        wait_handler(&mut world, &mut view, None, &mut rng);

        assert_eq!(world.clock.minutes(), 10);
    }
}
