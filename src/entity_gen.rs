//! Entity Generator Module
//!
//! Rolls named creature variants from the bestiary tables. A 5% rare roll
//! (or an explicit force) switches to the rare variant, trait, and loot
//! pools and doubles stats; otherwise a second roll grades the trait pool.
//! Stats scale from the range lower bound by level, and the chosen trait's
//! mechanical effect is applied last.

use rand::Rng;
use thiserror::Error;

use crate::bestiary::{BESTIARY, TraitRarity};
use crate::entity::Entity;
use crate::traits;

/// Failures when asking for a creature the bestiary cannot produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("unknown archetype: '{0}'")]
    UnknownArchetype(String),
    #[error("archetype '{0}' has no rare pools to draw from")]
    InvalidConfiguration(String),
}

/// Generate a creature of the given archetype.
///
/// # Errors
///
/// Returns [`SpawnError::UnknownArchetype`] if the archetype is not in the
/// bestiary, and [`SpawnError::InvalidConfiguration`] if a rare spawn is
/// forced for an archetype with empty rare pools.
pub fn generate(
    archetype: &str,
    level: u32,
    force_rare: bool,
    rng: &mut impl Rng,
) -> Result<Entity, SpawnError> {
    let Some(template) = BESTIARY.get(archetype) else {
        return Err(SpawnError::UnknownArchetype(archetype.to_string()));
    };

    let mut is_rare = force_rare || rng.random_bool(0.05);
    if is_rare && (template.rare_variants.is_empty() || template.rare_traits.is_empty()) {
        if force_rare {
            return Err(SpawnError::InvalidConfiguration(archetype.to_string()));
        }
        // A lucky roll against an archetype with no rare pools degrades to
        // a standard spawn rather than failing.
        is_rare = false;
    }

    let (variant, trait_name, loot_table, stat_multiplier, loot_multiplier) = if is_rare {
        let variant = pick(template.rare_variants, rng);
        let trait_name = pick(template.rare_traits, rng);
        (
            variant,
            trait_name,
            template.rare_loot_table,
            template.rare_stats_multiplier,
            template.rare_stats_multiplier,
        )
    } else {
        let variant = pick(template.variants, rng);
        let tier = roll_trait_tier(rng);
        let pool = match tier {
            TraitRarity::Rare => template.rare_traits,
            TraitRarity::Uncommon => template.uncommon_traits,
            TraitRarity::Common => template.common_traits,
        };
        let trait_name = pick(pool, rng);
        (
            variant,
            trait_name,
            template.loot_table,
            1.0,
            tier.loot_bonus(),
        )
    };
    let behavior = pick(template.behaviors, rng);

    let scale = stat_multiplier * (1.0 + 0.1 * f64::from(level));

    let mut entity = Entity::spawn_basic(template.kind);
    entity.name = variant.to_string();
    entity.description = format!("A {trait_name} {variant} that appears {behavior}");
    entity.health.set_max(scaled(template.health.0, scale));
    entity.damage = scaled(template.damage.0, scale);
    entity.defense = scaled(template.defense.0, scale);
    entity.behavior = Some(behavior.to_string());
    entity.trait_name = Some(trait_name.to_string());
    entity.trait_rarity = Some(template.trait_rarity(trait_name));
    entity.loot_table = loot_table.iter().map(|s| (*s).to_string()).collect();
    entity.loot_multiplier = loot_multiplier;
    entity.rare = is_rare;

    traits::apply_trait(&mut entity, trait_name);

    Ok(entity)
}

/// Trait tier for a standard spawn: 5% rare, 15% uncommon, else common.
fn roll_trait_tier(rng: &mut impl Rng) -> TraitRarity {
    let roll: f64 = rng.random();
    if roll < 0.05 {
        TraitRarity::Rare
    } else if roll < 0.20 {
        TraitRarity::Uncommon
    } else {
        TraitRarity::Common
    }
}

/// Scale a base stat, truncating fractions.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled(base: u32, scale: f64) -> u32 {
    (f64::from(base) * scale).trunc() as u32
}

/// Uniform pick from a non-empty static pool.
fn pick(pool: &[&'static str], rng: &mut impl Rng) -> &'static str {
    pool[rng.random_range(0..pool.len())]
}
