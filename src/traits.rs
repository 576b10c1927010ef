//! Trait Effects Module
//!
//! Trait labels attached by the entity generator carry mechanical weight.
//! Each registered trait multiplies named stats and may grant abilities.
//! Unregistered trait labels are purely cosmetic and applying them does
//! nothing.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::entity::Entity;

/// Mechanical payload of one trait label.
pub struct TraitEffect {
    pub display_name: &'static str,
    pub description: &'static str,
    /// Stat-name to multiplier pairs. Names outside the entity stat block
    /// are skipped.
    pub stat_modifiers: &'static [(&'static str, f64)],
    pub abilities: &'static [&'static str],
}

lazy_static! {
    static ref TRAIT_EFFECTS: HashMap<&'static str, TraitEffect> = build_trait_effects();
}

fn build_trait_effects() -> HashMap<&'static str, TraitEffect> {
    let mut effects = HashMap::new();
    // Wolf traits.
    effects.insert(
        "alpha",
        TraitEffect {
            display_name: "Alpha",
            description: "Can call for pack reinforcements",
            stat_modifiers: &[("damage", 1.2)],
            abilities: &["call_pack"],
        },
    );
    effects.insert(
        "swift",
        TraitEffect {
            display_name: "Swift",
            description: "Double movement speed",
            stat_modifiers: &[("speed", 2.0), ("dodge_chance", 1.5)],
            abilities: &[],
        },
    );
    effects.insert(
        "hungry",
        TraitEffect {
            display_name: "Hungry",
            description: "More aggressive, less defense",
            stat_modifiers: &[("damage", 1.3), ("defense", 0.7), ("aggression", 2.0)],
            abilities: &[],
        },
    );
    // Bat traits.
    effects.insert(
        "vampiric",
        TraitEffect {
            display_name: "Vampiric",
            description: "Heals when dealing damage",
            stat_modifiers: &[],
            abilities: &["life_drain"],
        },
    );
    // Troll traits.
    effects.insert(
        "berserker",
        TraitEffect {
            display_name: "Berserker",
            description: "Gets stronger when injured",
            stat_modifiers: &[],
            abilities: &["rage"],
        },
    );
    effects
}

/// Look up the mechanical effect registered for a trait label, if any.
pub fn trait_effect(trait_name: &str) -> Option<&'static TraitEffect> {
    TRAIT_EFFECTS.get(trait_name)
}

/// Apply a trait's stat multipliers and abilities to an entity. Integer
/// stats truncate after scaling. Unknown trait names leave the entity
/// untouched.
pub fn apply_trait(entity: &mut Entity, trait_name: &str) {
    let Some(effect) = TRAIT_EFFECTS.get(trait_name) else {
        return;
    };

    for &(stat, modifier) in effect.stat_modifiers {
        match stat {
            "damage" => entity.damage = scale_stat(entity.damage, modifier),
            "defense" => entity.defense = scale_stat(entity.defense, modifier),
            "dodge_chance" => entity.dodge_chance *= modifier,
            "speed" => entity.speed *= modifier,
            "aggression" => entity.aggression *= modifier,
            _ => {}
        }
    }

    entity
        .abilities
        .extend(effect.abilities.iter().map(|a| (*a).to_string()));
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_stat(value: u32, modifier: f64) -> u32 {
    (f64::from(value) * modifier).trunc() as u32
}
