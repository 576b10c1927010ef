//! `repl::item` module
//!
//! Handlers for commands that move items between the ground, the pack, and
//! the player's equipped slots, plus eating and drinking.

use anyhow::Result;
use log::info;
use rand::Rng;

use crate::entity_search::{SearchError, SearchScope, find_item_match};
use crate::item::{ItemHolder, Rarity};
use crate::player::EquipSlot;
use crate::repl::{advance_world, apply_story_hook, grant_unlock};
use crate::view::{EquipmentReadout, EquippedItem, View, ViewItem};
use crate::world::World;

/// Pick up a named item from the ground.
///
/// Taking a crystal advances the story, and anything rare or better counts
/// toward the treasure hunter achievement.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn take_handler(
    world: &mut World,
    view: &mut View,
    target: &str,
    rng: &mut impl Rng,
) -> Result<()> {
    if target.is_empty() {
        view.push(ViewItem::Error("What would you like to take?".to_string()));
        return Ok(());
    }
    match find_item_match(world, target, SearchScope::Location) {
        Ok(id) => {
            let location = world.current_location_mut()?;
            let Some(item) = location.remove_item(id) else {
                return Ok(());
            };
            info!("player took {} ({})", item.name, item.id);
            view.push(ViewItem::ActionResult(format!("You took the {}.", item.name)));

            if item.name_contains("crystal") {
                apply_story_hook(world, view, |story| story.on_take_crystal());
            }
            let valuable = item.rarity >= Rarity::Rare && item.rarity != Rarity::Quest;
            if valuable && let Some(unlock) = world.achievements.on_treasure(rng) {
                grant_unlock(world, view, unlock);
            }
            world.player.add_item(item);
        },
        Err(SearchError::NoMatchingName(_)) => {
            view.push(ViewItem::Error(format!("There is no {target} here to take.")));
        },
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Drop a named item from the pack onto the ground. Equipped gear has to be
/// unequipped first; it never shows up in the pack search.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn drop_handler(world: &mut World, view: &mut View, target: &str) -> Result<()> {
    if target.is_empty() {
        view.push(ViewItem::Error("What would you like to drop?".to_string()));
        return Ok(());
    }
    match find_item_match(world, target, SearchScope::Inventory) {
        Ok(id) => {
            let Some(item) = world.player.remove_item(id) else {
                return Ok(());
            };
            info!("player dropped {} ({})", item.name, item.id);
            view.push(ViewItem::ActionResult(format!("You dropped the {}.", item.name)));
            world.current_location_mut()?.add_item(item);
        },
        Err(SearchError::NoMatchingName(_)) => {
            view.push(ViewItem::Error(format!("You don't have a {target} to drop.")));
        },
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// List the pack's contents.
pub fn inventory_handler(world: &World, view: &mut View) {
    let items = world
        .player
        .inventory
        .iter()
        .map(|item| (item.name.clone(), item.rarity))
        .collect();
    view.push(ViewItem::InventoryList(items));
}

/// Equip a named item from the pack into its slot. Whatever held the slot
/// goes back into the pack.
///
/// # Errors
/// This handler itself cannot fail; the signature matches its siblings.
pub fn equip_handler(world: &mut World, view: &mut View, target: &str) -> Result<()> {
    if target.is_empty() {
        view.push(ViewItem::Error("What would you like to equip?".to_string()));
        return Ok(());
    }
    match find_item_match(world, target, SearchScope::Inventory) {
        Ok(id) => {
            if let Some(message) = world.player.equip(id) {
                view.push(ViewItem::ActionResult(message));
            }
        },
        Err(SearchError::NoMatchingName(_) | SearchError::InvalidLocationId(_)) => {
            view.push(ViewItem::Error(format!("You don't have a {target} to equip.")));
        },
    }
    Ok(())
}

/// Unequip by slot name ("unequip weapon") or by the equipped item's name.
pub fn unequip_handler(world: &mut World, view: &mut View, target: &str) {
    if target.is_empty() {
        view.push(ViewItem::Error("What would you like to unequip?".to_string()));
        return;
    }
    let slots = [EquipSlot::Weapon, EquipSlot::Armor, EquipSlot::Accessory];
    let lowered = target.to_lowercase();

    if let Some(slot) = slots.iter().copied().find(|slot| slot.to_string() == lowered) {
        match world.player.equipped_in(slot).map(|item| item.name.clone()) {
            Some(name) => {
                world.player.unequip(slot);
                view.push(ViewItem::ActionResult(format!("Unequipped {name}")));
            },
            None => {
                view.push(ViewItem::ActionResult(format!("Nothing equipped in {slot} slot")));
            },
        }
        return;
    }

    for slot in slots {
        let matched = world
            .player
            .equipped_in(slot)
            .filter(|item| item.name_contains(&lowered))
            .map(|item| item.name.clone());
        if let Some(name) = matched {
            world.player.unequip(slot);
            view.push(ViewItem::ActionResult(format!("Unequipped {name}")));
            return;
        }
    }
    view.push(ViewItem::Error(format!("No equipped item matches '{target}'")));
}

/// Show the three equipment slots and the player's equipped totals.
pub fn equipment_handler(world: &World, view: &mut View) {
    let slots = [
        ("Weapon", world.player.weapon.as_ref()),
        ("Armor", world.player.armor.as_ref()),
        ("Accessory", world.player.accessory.as_ref()),
    ]
    .into_iter()
    .map(|(label, slot)| {
        let equipped = slot.map(|item| EquippedItem {
            name: item.name.clone(),
            rarity: item.rarity,
            damage_bonus: item.damage_bonus(),
            defense_bonus: item.defense_bonus(),
        });
        (label.to_string(), equipped)
    })
    .collect();

    view.push(ViewItem::EquipmentList(EquipmentReadout {
        total_damage: world.player.effective_damage(),
        total_defense: world.player.effective_defense(),
        slots,
    }));
}

/// Eat a named item from the pack. Cooked food restores hunger scaled by
/// its value; raw meat goes down badly.
///
/// # Errors
/// This handler itself cannot fail; the signature matches its siblings.
pub fn eat_handler(world: &mut World, view: &mut View, target: &str) -> Result<()> {
    if target.is_empty() {
        view.push(ViewItem::Error("What would you like to eat?".to_string()));
        return Ok(());
    }
    match find_item_match(world, target, SearchScope::Inventory) {
        Ok(id) => {
            if let Some(messages) = world.player.consume_food(id) {
                for message in messages {
                    view.push(ViewItem::ActionResult(message));
                }
            }
        },
        Err(SearchError::NoMatchingName(_) | SearchError::InvalidLocationId(_)) => {
            view.push(ViewItem::Error(format!("You don't have any {target} to eat.")));
        },
    }
    Ok(())
}

/// Drink from carried water. The waterskin itself is not consumed.
pub fn drink_handler(world: &mut World, view: &mut View, rng: &mut impl Rng) {
    if world.player.inventory.iter().any(|item| item.name == "water") {
        advance_world(world, view, 2, rng);
        world.player.thirst = (world.player.thirst + 30.0).min(100.0);
        view.push(ViewItem::ActionResult("You take a drink of water.".to_string()));
    } else {
        view.push(ViewItem::Error("You need water to drink!".to_string()));
    }
}
