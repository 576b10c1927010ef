//! `repl::encounter` module
//!
//! Handlers for commands aimed at the creatures sharing a location with the
//! player: fighting them, talking to them, and winning them over with food.

use anyhow::Result;
use log::info;
use rand::Rng;

use crate::combat;
use crate::entity_search::{SearchError, SearchScope, find_entity_match, find_item_match};
use crate::item::ItemHolder;
use crate::repl::{apply_story_hook, grant_unlock};
use crate::view::{View, ViewItem};
use crate::world::World;

/// Resolve one attack exchange against a named creature.
///
/// Combat takes no world time, so lingering effects tick here instead of
/// through the clock.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn attack_handler(
    world: &mut World,
    view: &mut View,
    target: &str,
    rng: &mut impl Rng,
) -> Result<()> {
    if target.is_empty() {
        view.push(ViewItem::Error("What would you like to attack?".to_string()));
        return Ok(());
    }
    match find_entity_match(world, target) {
        Ok(id) => {
            let outcome = combat::resolve_attack(world, id, rng)?;
            view.push(ViewItem::CombatRound(outcome.lines));
            for message in world.player.tick_effects() {
                view.push(ViewItem::Warning(message));
            }
        },
        Err(SearchError::NoMatchingName(_)) => {
            view.push(ViewItem::Error(format!("There is no {target} here to attack.")));
        },
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Talk to a named creature. Each archetype answers in its own register;
/// none of them have much to say.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn talk_handler(world: &mut World, view: &mut View, target: &str) -> Result<()> {
    if target.is_empty() {
        view.push(ViewItem::Error("Who would you like to talk to?".to_string()));
        return Ok(());
    }
    match find_entity_match(world, target) {
        Ok(id) => {
            let location = world.current_location()?;
            if let Some(entity) = location.find_entity(id) {
                view.push(ViewItem::Flavor(entity.talk()));
            }
        },
        Err(SearchError::NoMatchingName(_)) => {
            view.push(ViewItem::Error(format!(
                "There is no one here called {target} to talk to."
            )));
        },
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Offer a carried item to a named creature.
///
/// Most creatures ignore the offer and the item stays in the pack. A wolf
/// offered meat eats it, turns docile, and the first befriending advances
/// the story. An unharmed befriending also earns an achievement.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn feed_handler(
    world: &mut World,
    view: &mut View,
    target: &str,
    item_name: &str,
    rng: &mut impl Rng,
) -> Result<()> {
    if target.is_empty() || item_name.is_empty() {
        view.push(ViewItem::Error("Usage: feed <creature> <item>".to_string()));
        return Ok(());
    }

    let entity_id = match find_entity_match(world, target) {
        Ok(id) => id,
        Err(SearchError::NoMatchingName(_)) => {
            view.push(ViewItem::Error(format!(
                "There is nothing here called {target} to feed."
            )));
            return Ok(());
        },
        Err(err) => return Err(err.into()),
    };
    let item_id = match find_item_match(world, item_name, SearchScope::Inventory) {
        Ok(id) => id,
        Err(SearchError::NoMatchingName(_)) => {
            view.push(ViewItem::Error(format!(
                "You don't have any {item_name} to feed them."
            )));
            return Ok(());
        },
        Err(err) => return Err(err.into()),
    };
    let Some(offered) = world.player.find_item(item_id).cloned() else {
        return Ok(());
    };

    let location = world.current_location_mut()?;
    let Some(entity) = location.entity_mut(entity_id) else {
        return Ok(());
    };
    let entity_name = entity.name.clone();
    let outcome = entity.feed(&offered);
    if let Some(dropped) = outcome.dropped {
        location.add_item(dropped);
    }
    if outcome.consumed {
        let _ = world.player.remove_item(item_id);
        info!("player fed {} to {entity_name}", offered.name);
    }
    view.push(ViewItem::ActionResult(outcome.message));

    if outcome.befriended {
        apply_story_hook(world, view, |story| story.on_feed_wolf());
        let unharmed = world.player.health == world.player.max_health();
        if let Some(unlock) = world.achievements.on_befriend_wolf(unharmed, rng) {
            grant_unlock(world, view, unlock);
        }
    }
    Ok(())
}
