//! Combat engine -- one synchronous attack exchange per call.
//!
//! No combat session persists between attack commands; every call re-reads
//! current health and rolls fresh. Special attacks are tried in declared
//! order and the first successful roll wins. Player defense is subtracted
//! from the entity's response exactly once, here, for both the special and
//! normal paths.

use anyhow::{Result, anyhow};
use log::{debug, info};
use rand::Rng;
use rand::prelude::IndexedRandom;
use uuid::Uuid;

use crate::entity::{AttackEffect, Entity, EntityKind};
use crate::entity_gen;
use crate::health::StatusEffect;
use crate::item::{Item, ItemCategory, ItemHolder};
use crate::item_gen;
use crate::location::Location;
use crate::world::World;

/// What a resolved exchange did, in display order.
#[derive(Debug, Default)]
pub struct AttackOutcome {
    pub lines: Vec<String>,
    /// Net damage the player took after defense.
    pub player_damage: u32,
    pub effects: Vec<(StatusEffect, u32)>,
    pub defeated: bool,
    pub summoned: bool,
}

/// Resolve one attack exchange against the entity with the given id in the
/// player's current location.
///
/// # Errors
/// - if the current location is missing from the world or the entity id is
///   not present in it (callers resolve names to ids beforehand)
#[allow(clippy::too_many_lines)]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resolve_attack(
    world: &mut World,
    entity_id: Uuid,
    rng: &mut impl Rng,
) -> Result<AttackOutcome> {
    let player_damage = world.player.effective_damage();
    let player_crit = world.player.crit_chance;
    let player_dodge = world.player.dodge_chance();
    let player_defense = world.player.effective_defense();

    let mut outcome = AttackOutcome::default();
    let mut raw_player_damage: u32 = 0;
    let mut summon: Option<EntityKind> = None;

    {
        let location = world.current_location_mut()?;
        let entity = location
            .entity_mut(entity_id)
            .ok_or_else(|| anyhow!("entity {entity_id} not found in current location"))?;

        if entity.is_dead_body() {
            outcome.lines.push("That seems rather pointless...".to_string());
            return Ok(outcome);
        }
        if !entity.hostile {
            outcome.lines.push(entity.attack_flavor());
            return Ok(outcome);
        }

        // Player attack phase. A dodge costs the player their swing but
        // does not spare them the response.
        if rng.random::<f64>() < entity.dodge_chance {
            outcome
                .lines
                .push(format!("The {} dodges your attack!", entity.name));
        } else {
            let is_crit = rng.random::<f64>() < player_crit;
            let mut damage = player_damage.saturating_sub(entity.defense);
            if is_crit {
                damage *= 2;
            }
            entity.health.damage(damage);
            let crit_text = if is_crit { " (Critical Hit!)" } else { "" };
            outcome.lines.push(format!(
                "You hit the {} for {damage} damage{crit_text}! ({} HP remaining)",
                entity.name,
                entity.health.current_hp()
            ));
        }

        let entity_kind = entity.kind;
        let entity_name = entity.name.clone();

        if entity.health.is_dead() {
            let carried: Vec<Item> = entity.inventory.drain(..).collect();
            let trophies = roll_trophies(entity, rng);
            info!("{entity_name} defeated; dropped {} carried item(s)", carried.len());

            // The defeat line replaces the hit message.
            outcome.defeated = true;
            outcome.lines = vec![format!("You defeated the {entity_name}!")];

            location.items.extend(carried);
            location.items.extend(trophies);
            drop_bonus_loot(location, entity_kind, rng);
            let _ = location.remove_entity(entity_id);
            return Ok(outcome);
        }

        // Entity response phase: first special attack whose roll succeeds,
        // otherwise a normal counterattack.
        let special = entity
            .special_attacks
            .iter()
            .copied()
            .find(|attack| rng.random::<f64>() < attack.chance);

        if let Some(attack) = special {
            debug!("{entity_name} triggered special attack {}", attack.name);
            raw_player_damage =
                (f64::from(entity.damage) * attack.damage_mult).max(0.0) as u32;
            outcome
                .lines
                .push(format!("The {entity_name} uses {}!", attack.name));

            match attack.effect {
                Some(AttackEffect::Status { effect, turns }) => {
                    outcome.effects.push((effect, turns));
                }
                Some(AttackEffect::Summon { chance }) => {
                    if rng.random::<f64>() < chance {
                        summon = Some(entity_kind);
                    }
                }
                None => {}
            }
        } else if rng.random::<f64>() < player_dodge {
            outcome
                .lines
                .push(format!("You dodge the {entity_name}'s attack!"));
        } else {
            let is_crit = rng.random::<f64>() < entity.crit_chance;
            raw_player_damage = if is_crit { entity.damage * 2 } else { entity.damage };
            let crit_text = if is_crit { " (Critical Hit!)" } else { "" };
            outcome.lines.push(format!(
                "The {entity_name} attacks you back for {raw_player_damage} damage{crit_text}!"
            ));
        }

        if let Some(kind) = summon {
            let ally = summon_ally(kind, rng);
            info!("{entity_name} summoned an ally ({})", ally.name);
            outcome.summoned = true;
            outcome.lines.push(format!(
                "The {entity_name}'s howl attracts another wolf!"
            ));
            location.add_entity(ally);
        }
    }

    for (effect, turns) in &outcome.effects {
        world.player.apply_effect(*effect, *turns);
    }

    if raw_player_damage > 0 {
        let net = raw_player_damage.saturating_sub(player_defense);
        world.player.health = world.player.health.saturating_sub(net);
        outcome.player_damage = net;
        outcome.lines.push(format!("You took {net} damage!"));
    }

    Ok(outcome)
}

/// Trophies cut from a generated variant: one guaranteed pick from its loot
/// table, and a second at chance `loot_multiplier - 1.0`. Hand-placed
/// entities have no table and yield nothing.
fn roll_trophies(entity: &Entity, rng: &mut impl Rng) -> Vec<Item> {
    let Some(first) = entity.loot_table.choose(rng) else {
        return Vec::new();
    };
    let mut trophies = vec![item_gen::trophy(first)];
    if rng.random::<f64>() < entity.loot_multiplier - 1.0
        && let Some(second) = entity.loot_table.choose(rng)
    {
        trophies.push(item_gen::trophy(second));
    }
    debug!("{} yielded {} trophy drop(s)", entity.name, trophies.len());
    trophies
}

/// Archetype-specific bonus loot rolled on defeat, on top of whatever the
/// entity carried.
fn drop_bonus_loot(location: &mut Location, kind: EntityKind, rng: &mut impl Rng) {
    match kind {
        EntityKind::Wolf => {
            if rng.random::<f64>() < 0.5
                && let Some(weapon) = item_gen::generate(ItemCategory::Weapon, 2, rng)
            {
                location.add_item(weapon);
            }
        }
        EntityKind::Bandit => {
            if rng.random::<f64>() < 0.7 {
                let category = [ItemCategory::Weapon, ItemCategory::Armor]
                    .choose(rng)
                    .copied()
                    .unwrap_or(ItemCategory::Weapon);
                if let Some(loot) = item_gen::generate(category, 0, rng) {
                    location.add_item(loot);
                }
            }
        }
        _ => {}
    }
}

/// Summoned allies arrive generated fresh but at 70% of normal health.
fn summon_ally(kind: EntityKind, rng: &mut impl Rng) -> Entity {
    let mut ally = entity_gen::generate(kind.base_name(), 1, false, rng)
        .unwrap_or_else(|_| Entity::spawn_basic(kind));
    ally.health.reduce_to_fraction(0.7);
    ally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SpecialAttack;
    use crate::location::LocationKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Wolf with every probabilistic branch pinned off.
    fn docile_rolls_wolf() -> Entity {
        let mut wolf = Entity::spawn_basic(EntityKind::Wolf);
        wolf.dodge_chance = 0.0;
        wolf.crit_chance = 0.0;
        wolf.special_attacks.clear();
        wolf
    }

    /// Player whose dodge and crit can never fire.
    fn pinned_player(world: &mut World) {
        world.player.damage = 10;
        world.player.crit_chance = 0.0;
        world.player.dexterity = 0;
    }

    fn world_with_entity(entity: Entity) -> (World, Uuid) {
        let mut world = World::new_game();
        let id = entity.id;
        world
            .current_location_mut()
            .unwrap()
            .add_entity(entity);
        (world, id)
    }

    #[test]
    fn plain_exchange_matches_the_fixed_arithmetic() {
        let mut rng = StdRng::seed_from_u64(51);
        let (mut world, wolf_id) = world_with_entity(docile_rolls_wolf());
        pinned_player(&mut world);

        let outcome = resolve_attack(&mut world, wolf_id, &mut rng).unwrap();

        // (10 - 2) damage in, 8 raw back out, no defense on either side.
        assert_eq!(
            outcome.lines,
            vec![
                "You hit the wolf for 8 damage! (22 HP remaining)".to_string(),
                "The wolf attacks you back for 8 damage!".to_string(),
                "You took 8 damage!".to_string(),
            ]
        );
        assert_eq!(outcome.player_damage, 8);
        assert_eq!(world.player.health, 92);
        let wolf = world.current_location().unwrap().find_entity(wolf_id).unwrap();
        assert_eq!(wolf.health.current_hp(), 22);
    }

    #[test]
    fn player_defense_is_subtracted_exactly_once() {
        let mut rng = StdRng::seed_from_u64(52);
        let (mut world, wolf_id) = world_with_entity(docile_rolls_wolf());
        pinned_player(&mut world);
        world.player.defense = 3;

        let outcome = resolve_attack(&mut world, wolf_id, &mut rng).unwrap();

        // Raw damage in the exchange line, net damage in the summary line.
        assert!(outcome.lines.contains(&"The wolf attacks you back for 8 damage!".to_string()));
        assert!(outcome.lines.contains(&"You took 5 damage!".to_string()));
        assert_eq!(outcome.player_damage, 5);
        assert_eq!(world.player.health, 95);
    }

    #[test]
    fn killing_blow_replaces_the_hit_message_and_drops_loot() {
        let mut rng = StdRng::seed_from_u64(53);
        let mut wolf = docile_rolls_wolf();
        wolf.health.set_max(5);
        wolf.add_item(Item::misc("wolf pelt", "A thick grey pelt"));
        let (mut world, wolf_id) = world_with_entity(wolf);
        pinned_player(&mut world);

        let outcome = resolve_attack(&mut world, wolf_id, &mut rng).unwrap();

        assert!(outcome.defeated);
        assert_eq!(outcome.lines, vec!["You defeated the wolf!".to_string()]);
        let location = world.current_location().unwrap();
        assert!(location.find_entity(wolf_id).is_none());
        assert!(location.items.iter().any(|item| item.name == "wolf pelt"));
        assert_eq!(world.player.health, 100);
    }

    #[test]
    fn generated_variants_yield_trophies_on_defeat() {
        let mut rng = StdRng::seed_from_u64(60);
        let mut wolf = docile_rolls_wolf();
        wolf.health.set_max(5);
        wolf.loot_table = vec!["wolf_fang".to_string()];
        wolf.loot_multiplier = 2.0;
        let (mut world, wolf_id) = world_with_entity(wolf);
        pinned_player(&mut world);

        let outcome = resolve_attack(&mut world, wolf_id, &mut rng).unwrap();

        assert!(outcome.defeated);
        // A multiplier of 2.0 guarantees the second pick.
        let fangs = world
            .current_location()
            .unwrap()
            .items
            .iter()
            .filter(|item| item.name == "wolf fang")
            .count();
        assert_eq!(fangs, 2);
    }

    #[test]
    fn dead_bodies_are_pointless_targets() {
        let mut rng = StdRng::seed_from_u64(54);
        let body = Entity::spawn_basic(EntityKind::DeadBody);
        let (mut world, body_id) = world_with_entity(body);

        let outcome = resolve_attack(&mut world, body_id, &mut rng).unwrap();

        assert_eq!(outcome.lines, vec!["That seems rather pointless...".to_string()]);
        assert!(!outcome.defeated);
        assert_eq!(world.player.health, 100);
        assert!(world.current_location().unwrap().find_entity(body_id).is_some());
    }

    #[test]
    fn befriended_creatures_shrug_off_the_attempt() {
        let mut rng = StdRng::seed_from_u64(55);
        let mut wolf = docile_rolls_wolf();
        wolf.hostile = false;
        let hp_before = wolf.health.current_hp();
        let (mut world, wolf_id) = world_with_entity(wolf);

        let outcome = resolve_attack(&mut world, wolf_id, &mut rng).unwrap();

        assert_eq!(outcome.lines.len(), 1);
        assert!(outcome.lines[0].contains("might be better to try feeding it"));
        let wolf = world.current_location().unwrap().find_entity(wolf_id).unwrap();
        assert_eq!(wolf.health.current_hp(), hp_before);
    }

    #[test]
    fn entity_dodge_still_allows_the_counterattack() {
        let mut rng = StdRng::seed_from_u64(56);
        let mut wolf = docile_rolls_wolf();
        wolf.dodge_chance = 1.0;
        let (mut world, wolf_id) = world_with_entity(wolf);
        pinned_player(&mut world);

        let outcome = resolve_attack(&mut world, wolf_id, &mut rng).unwrap();

        assert_eq!(
            outcome.lines,
            vec![
                "The wolf dodges your attack!".to_string(),
                "The wolf attacks you back for 8 damage!".to_string(),
                "You took 8 damage!".to_string(),
            ]
        );
        let wolf = world.current_location().unwrap().find_entity(wolf_id).unwrap();
        assert_eq!(wolf.health.current_hp(), 30);
    }

    #[test]
    fn special_attacks_apply_their_status_effect() {
        let mut rng = StdRng::seed_from_u64(57);
        let mut spider = Entity::spawn_basic(EntityKind::Spider);
        spider.dodge_chance = 0.0;
        spider.special_attacks = vec![SpecialAttack {
            name: "Poison Bite",
            damage_mult: 1.2,
            chance: 1.0,
            effect: Some(AttackEffect::Status {
                effect: StatusEffect::Poison,
                turns: 3,
            }),
        }];
        let (mut world, spider_id) = world_with_entity(spider);
        pinned_player(&mut world);

        let outcome = resolve_attack(&mut world, spider_id, &mut rng).unwrap();

        assert!(outcome.lines.contains(&"The spider uses Poison Bite!".to_string()));
        assert_eq!(outcome.effects, vec![(StatusEffect::Poison, 3)]);
        assert_eq!(
            world.player.status_effects.get(&StatusEffect::Poison),
            Some(&3)
        );
        // int(5 * 1.2) raw, no defense.
        assert!(outcome.lines.contains(&"You took 6 damage!".to_string()));
    }

    #[test]
    fn earlier_specials_shadow_later_ones() {
        let mut rng = StdRng::seed_from_u64(58);
        let mut wolf = docile_rolls_wolf();
        wolf.special_attacks = vec![
            SpecialAttack {
                name: "Feint",
                damage_mult: 0.0,
                chance: 1.0,
                effect: None,
            },
            SpecialAttack {
                name: "Fierce Bite",
                damage_mult: 1.5,
                chance: 1.0,
                effect: None,
            },
        ];
        let (mut world, wolf_id) = world_with_entity(wolf);
        pinned_player(&mut world);

        let outcome = resolve_attack(&mut world, wolf_id, &mut rng).unwrap();

        assert!(outcome.lines.contains(&"The wolf uses Feint!".to_string()));
        assert!(!outcome.lines.iter().any(|l| l.contains("Fierce Bite")));
        // A zero-damage response produces no damage summary line.
        assert_eq!(outcome.player_damage, 0);
        assert!(!outcome.lines.iter().any(|l| l.starts_with("You took")));
        assert_eq!(world.player.health, 100);
    }

    #[test]
    fn pack_call_summons_a_weakened_ally() {
        let mut rng = StdRng::seed_from_u64(59);
        let mut wolf = docile_rolls_wolf();
        wolf.special_attacks = vec![SpecialAttack {
            name: "Pack Call",
            damage_mult: 1.2,
            chance: 1.0,
            effect: Some(AttackEffect::Summon { chance: 1.0 }),
        }];
        let (mut world, wolf_id) = world_with_entity(wolf);
        pinned_player(&mut world);

        let outcome = resolve_attack(&mut world, wolf_id, &mut rng).unwrap();

        assert!(outcome.summoned);
        assert!(
            outcome
                .lines
                .contains(&"The wolf's howl attracts another wolf!".to_string())
        );
        let location = world.current_location().unwrap();
        assert_eq!(location.entities.len(), 2);
        let ally = location
            .entities
            .iter()
            .find(|e| e.id != wolf_id)
            .unwrap();
        assert_eq!(ally.kind, EntityKind::Wolf);
        assert!(ally.health.current_hp() < ally.health.max_hp());
        assert_eq!(world.current_location().unwrap().kind, LocationKind::Meadow);
    }
}
