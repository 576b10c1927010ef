//! `repl::survival` module
//!
//! Handlers for the needs loop: resting, camping, the three cooking paths,
//! relief, and the status and attribute readouts.

use anyhow::Result;
use log::info;
use rand::Rng;

use crate::item::{Item, ItemKind};
use crate::repl::{advance_world, grant_unlock};
use crate::view::{AttributeReadout, StatusReadout, View, ViewItem};
use crate::world::World;

/// Rest for an hour and recover energy. Hostile company rules it out.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn rest_handler(world: &mut World, view: &mut View, rng: &mut impl Rng) -> Result<()> {
    if !world.current_location()?.is_safe() {
        view.push(ViewItem::Error("It's not safe to rest here!".to_string()));
        return Ok(());
    }
    advance_world(world, view, 60, rng);
    world.player.energy = (world.player.energy + 30.0).min(100.0);
    view.push(ViewItem::ActionResult(
        "You rest for a while. Energy restored!".to_string(),
    ));
    Ok(())
}

/// Set up a camp. Purely a staging note; the campfire is implied by the
/// cook commands working anywhere safe.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn camp_handler(world: &World, view: &mut View) -> Result<()> {
    if !world.current_location()?.is_safe() {
        view.push(ViewItem::Error(
            "You can't set up camp here - there are hostile creatures nearby!".to_string(),
        ));
        return Ok(());
    }
    view.push(ViewItem::ActionResult(
        "You gather materials and set up a small camp.".to_string(),
    ));
    view.push(ViewItem::Flavor(
        "You can cook here (cook, cook meal, cook tea) or rest to recover.".to_string(),
    ));
    Ok(())
}

/// Cook at the campfire. Three paths share the safety check:
///
/// - `cook [name]` roasts one raw food, doubling its value
/// - `cook meal` combines two cooked foods into something better
/// - `cook tea` steeps carried herbs
///
/// Each successful path counts its meal type toward the cooking
/// achievements.
///
/// # Errors
/// - if the player's current location cannot be resolved
pub fn cook_handler(
    world: &mut World,
    view: &mut View,
    target: &str,
    rng: &mut impl Rng,
) -> Result<()> {
    if !world.current_location()?.is_safe() {
        view.push(ViewItem::Error(
            "You can't cook here - there are hostile creatures nearby!".to_string(),
        ));
        return Ok(());
    }

    let (spent, meal_type) = match target {
        "meal" => (prepare_meal(world, view), "meal"),
        "tea" => (brew_tea(world, view), "tea"),
        _ => (cook_raw(world, view, target), "cooked"),
    };
    let Some(minutes) = spent else {
        return Ok(());
    };

    advance_world(world, view, minutes, rng);
    for unlock in world.achievements.on_cook(meal_type, rng) {
        grant_unlock(world, view, unlock);
    }
    Ok(())
}

/// Roast a single raw food over the fire. With a name given, only matching
/// raw foods qualify. Returns the minutes spent, or None if nothing cooked.
fn cook_raw(world: &mut World, view: &mut View, target: &str) -> Option<u64> {
    let player = &mut world.player;
    let position = player.inventory.iter().position(|item| {
        item.is_raw_food() && (target.is_empty() || item.name_contains(target))
    });
    let Some(position) = position else {
        view.push(ViewItem::Error("You don't have any raw food to cook.".to_string()));
        return None;
    };

    let raw = player.inventory.remove(position);
    let base = raw.name.strip_prefix("raw ").unwrap_or(&raw.name).to_string();
    let cooked = Item::new(
        format!("cooked {base}"),
        format!("A freshly cooked {base}"),
        ItemKind::Food {
            food_value: raw.food_value() * 2.0,
            raw: false,
        },
    );
    info!("cooked {} into {}", raw.name, cooked.name);
    view.push(ViewItem::ActionResult(format!(
        "You cook the {} over the campfire!",
        raw.name
    )));
    player.inventory.push(cooked);
    Some(20)
}

/// Combine the first two cooked foods in the pack into a single meal worth
/// more than its parts.
fn prepare_meal(world: &mut World, view: &mut View) -> Option<u64> {
    let player = &mut world.player;
    let picks: Vec<usize> = player
        .inventory
        .iter()
        .enumerate()
        .filter(|(_, item)| item.kind.is_food() && !item.is_raw_food())
        .map(|(position, _)| position)
        .take(2)
        .collect();
    if picks.len() < 2 {
        view.push(ViewItem::Error(
            "You need at least 2 food items to prepare a meal.".to_string(),
        ));
        return None;
    }

    // Remove the later index first so the earlier one stays valid.
    let second = player.inventory.remove(picks[1]);
    let first = player.inventory.remove(picks[0]);
    let meal = Item::new(
        "prepared meal",
        format!("A tasty meal made from {} and {}", first.name, second.name),
        ItemKind::Food {
            food_value: (first.food_value() + second.food_value()) * 1.2,
            raw: false,
        },
    );
    info!("prepared a meal from {} and {}", first.name, second.name);
    view.push(ViewItem::ActionResult(format!(
        "You prepare a delicious meal combining {} and {}!",
        first.name, second.name
    )));
    player.inventory.push(meal);
    Some(20)
}

/// Steep carried herbs into tea.
fn brew_tea(world: &mut World, view: &mut View) -> Option<u64> {
    let player = &mut world.player;
    let position = player
        .inventory
        .iter()
        .position(|item| item.kind.is_food() && item.name_contains("herb"));
    let Some(position) = position else {
        view.push(ViewItem::Error("You need herbs to make tea.".to_string()));
        return None;
    };

    let herb = player.inventory.remove(position);
    let tea = Item::new(
        "herbal tea",
        format!("A soothing tea made from {}", herb.name),
        ItemKind::Food {
            food_value: herb.food_value() * 1.5,
            raw: false,
        },
    );
    info!("brewed {} into herbal tea", herb.name);
    view.push(ViewItem::ActionResult(format!(
        "You prepare a refreshing tea from {}!",
        herb.name
    )));
    player.inventory.push(tea);
    Some(10)
}

/// Answer nature's call.
pub fn relieve_handler(world: &mut World, view: &mut View, rng: &mut impl Rng) {
    advance_world(world, view, 5, rng);
    world.player.bladder = 100.0;
    view.push(ViewItem::ActionResult("You feel much better.".to_string()));
}

/// Full status readout: vitals, equipment, combat stats, active effects.
pub fn status_handler(world: &World, view: &mut View) {
    let player = &world.player;
    let equipment = [
        ("weapon", player.weapon.as_ref()),
        ("armor", player.armor.as_ref()),
        ("accessory", player.accessory.as_ref()),
    ]
    .into_iter()
    .map(|(slot, item)| (slot.to_string(), item.map(|item| item.name.clone())))
    .collect();
    let effects = player
        .status_effects
        .iter()
        .map(|(effect, turns)| (effect.to_string(), *turns))
        .collect();

    view.push(ViewItem::StatusPanel(StatusReadout {
        health: player.health,
        max_health: player.max_health(),
        hunger: player.hunger,
        thirst: player.thirst,
        energy: player.energy,
        bladder: player.bladder,
        damage: player.effective_damage(),
        defense: player.effective_defense(),
        crit_chance: player.crit_chance,
        dodge_chance: player.dodge_chance(),
        equipment,
        effects,
    }));
}

/// The seven core attributes.
pub fn stats_handler(world: &World, view: &mut View) {
    let player = &world.player;
    view.push(ViewItem::AttributePanel(AttributeReadout {
        strength: player.strength,
        dexterity: player.dexterity,
        intelligence: player.intelligence,
        vitality: player.vitality,
        charisma: player.charisma,
        wisdom: player.wisdom,
        luck: player.luck,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityKind};
    use crate::item::ItemHolder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn raw_meat() -> Item {
        Item::new(
            "raw meat",
            "A cut of fresh meat",
            ItemKind::Food {
                food_value: 30.0,
                raw: true,
            },
        )
    }

    fn bread() -> Item {
        Item::new(
            "bread",
            "A crusty loaf",
            ItemKind::Food {
                food_value: 20.0,
                raw: false,
            },
        )
    }

    #[test]
    fn resting_near_hostiles_is_refused() {
        let mut rng = StdRng::seed_from_u64(61);
        let mut world = World::new_game();
        let mut view = View::new();
        world
            .current_location_mut()
            .unwrap()
            .add_entity(Entity::spawn_basic(EntityKind::Wolf));

        rest_handler(&mut world, &mut view, &mut rng).unwrap();

        assert_eq!(world.clock.minutes(), 0);
        assert_eq!(
            view.items,
            vec![ViewItem::Error("It's not safe to rest here!".to_string())]
        );
    }

    #[test]
    fn resting_restores_energy_and_spends_an_hour() {
        let mut rng = StdRng::seed_from_u64(62);
        let mut world = World::new_game();
        let mut view = View::new();
        world.player.energy = 40.0;

        rest_handler(&mut world, &mut view, &mut rng).unwrap();

        assert_eq!(world.clock.minutes(), 60);
        // Needs decay first, then the rest bonus lands.
        assert!((world.player.energy - 69.7).abs() < 0.5);
    }

    #[test]
    fn cooking_doubles_food_value_and_renames() {
        let mut rng = StdRng::seed_from_u64(63);
        let mut world = World::new_game();
        let mut view = View::new();
        world.player.add_item(raw_meat());

        cook_handler(&mut world, &mut view, "", &mut rng).unwrap();

        let cooked = world
            .player
            .inventory
            .iter()
            .find(|item| item.name == "cooked meat")
            .unwrap();
        assert!((cooked.food_value() - 60.0).abs() < f32::EPSILON);
        assert!(!cooked.is_raw_food());
        assert_eq!(world.clock.minutes(), 20);
        assert!(world.achievements.is_unlocked("survivalist"));
    }

    #[test]
    fn cooking_without_raw_food_is_refused() {
        let mut rng = StdRng::seed_from_u64(64);
        let mut world = World::new_game();
        let mut view = View::new();
        world.player.add_item(bread());

        cook_handler(&mut world, &mut view, "", &mut rng).unwrap();

        assert_eq!(world.clock.minutes(), 0);
        assert!(
            view.items
                .contains(&ViewItem::Error("You don't have any raw food to cook.".to_string()))
        );
    }

    #[test]
    fn meals_combine_two_cooked_foods() {
        let mut rng = StdRng::seed_from_u64(65);
        let mut world = World::new_game();
        let mut view = View::new();
        world.player.add_item(bread());
        world.player.add_item(Item::new(
            "fruit",
            "A ripe fruit",
            ItemKind::Food {
                food_value: 15.0,
                raw: false,
            },
        ));

        cook_handler(&mut world, &mut view, "meal", &mut rng).unwrap();

        let meal = world
            .player
            .inventory
            .iter()
            .find(|item| item.name == "prepared meal")
            .unwrap();
        assert!((meal.food_value() - 42.0).abs() < 0.01);
        assert_eq!(world.player.inventory.len(), 1);
    }

    #[test]
    fn tea_needs_herbs() {
        let mut rng = StdRng::seed_from_u64(66);
        let mut world = World::new_game();
        let mut view = View::new();
        world.player.add_item(bread());

        cook_handler(&mut world, &mut view, "tea", &mut rng).unwrap();

        assert!(
            view.items
                .contains(&ViewItem::Error("You need herbs to make tea.".to_string()))
        );

        world.player.add_item(Item::new(
            "fresh herbs",
            "A fragrant bundle",
            ItemKind::Food {
                food_value: 10.0,
                raw: false,
            },
        ));
        view.items.clear();
        cook_handler(&mut world, &mut view, "tea", &mut rng).unwrap();

        assert!(world.player.inventory.iter().any(|item| item.name == "herbal tea"));
        assert_eq!(world.clock.minutes(), 10);
    }

    #[test]
    fn cooking_all_three_types_masters_the_kitchen() {
        let mut rng = StdRng::seed_from_u64(67);
        let mut world = World::new_game();
        let mut view = View::new();
        world.player.add_item(raw_meat());
        cook_handler(&mut world, &mut view, "", &mut rng).unwrap();

        world.player.add_item(bread());
        cook_handler(&mut world, &mut view, "meal", &mut rng).unwrap();

        world.player.add_item(Item::new(
            "herbs",
            "A fragrant bundle",
            ItemKind::Food {
                food_value: 10.0,
                raw: false,
            },
        ));
        cook_handler(&mut world, &mut view, "tea", &mut rng).unwrap();

        assert!(world.achievements.is_unlocked("master_chef"));
    }

    #[test]
    fn relief_resets_the_bladder() {
        let mut rng = StdRng::seed_from_u64(68);
        let mut world = World::new_game();
        let mut view = View::new();
        world.player.bladder = 15.0;

        relieve_handler(&mut world, &mut view, &mut rng);

        assert!((world.player.bladder - 100.0).abs() < f32::EPSILON);
        assert_eq!(world.clock.minutes(), 5);
    }

    #[test]
    fn status_readout_reflects_current_vitals() {
        let mut world = World::new_game();
        world.player.health = 77;
        let mut view = View::new();

        status_handler(&world, &mut view);

        assert!(view.items.iter().any(|item| matches!(
            item,
            ViewItem::StatusPanel(readout)
                if readout.health == 77 && readout.max_health == 100
        )));
    }
}
