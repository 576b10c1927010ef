//! Bestiary Module
//!
//! Static archetype tables backing the entity generator. An archetype names
//! its variant pools, behavior list, trait pools by rarity, stat ranges, and
//! loot tables. Stat scaling uses only the lower bound of each range; the
//! upper bounds are reserved for future spread rolls.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::entity::EntityKind;

/// Tiering of a generated trait label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TraitRarity {
    Common,
    Uncommon,
    Rare,
}

impl TraitRarity {
    /// Loot multiplier recorded for a non-rare entity with a trait of this
    /// tier.
    pub fn loot_bonus(self) -> f64 {
        match self {
            TraitRarity::Common => 1.0,
            TraitRarity::Uncommon => 1.5,
            TraitRarity::Rare => 2.0,
        }
    }
}

/// One bestiary entry. All slices are non-empty for every registered
/// archetype; the generator relies on that.
pub struct Archetype {
    /// Kind whose interaction defaults (hostility, dodge, crit, specials)
    /// generated entities inherit.
    pub kind: EntityKind,
    pub variants: &'static [&'static str],
    pub rare_variants: &'static [&'static str],
    pub behaviors: &'static [&'static str],
    pub health: (u32, u32),
    pub damage: (u32, u32),
    pub defense: (u32, u32),
    pub rare_stats_multiplier: f64,
    pub loot_table: &'static [&'static str],
    pub rare_loot_table: &'static [&'static str],
    pub common_traits: &'static [&'static str],
    pub uncommon_traits: &'static [&'static str],
    pub rare_traits: &'static [&'static str],
}

impl Archetype {
    /// Classify a trait label by which of this archetype's pools contains
    /// it, checking the rarest pool first.
    pub fn trait_rarity(&self, trait_name: &str) -> TraitRarity {
        if self.rare_traits.contains(&trait_name) {
            TraitRarity::Rare
        } else if self.uncommon_traits.contains(&trait_name) {
            TraitRarity::Uncommon
        } else {
            TraitRarity::Common
        }
    }
}

lazy_static! {
    pub static ref BESTIARY: HashMap<&'static str, Archetype> = build_bestiary();
}

fn build_bestiary() -> HashMap<&'static str, Archetype> {
    let mut bestiary = HashMap::new();
    bestiary.insert(
        "wolf",
        Archetype {
            kind: EntityKind::Wolf,
            variants: &["grey wolf", "timber wolf", "dire wolf"],
            rare_variants: &["ghost wolf", "alpha dire wolf", "ancient wolf"],
            behaviors: &["pack", "territorial", "hunter"],
            health: (30, 50),
            damage: (5, 12),
            defense: (2, 5),
            rare_stats_multiplier: 2.0,
            loot_table: &["wolf_pelt", "wolf_fang", "raw_meat"],
            rare_loot_table: &["spectral_pelt", "alpha_fang", "ancient_rune"],
            common_traits: &[
                "young",
                "old",
                "scarred",
                "lone",
                "hungry",
                "cautious",
                "territorial",
                "curious",
            ],
            uncommon_traits: &[
                "alpha",
                "swift",
                "fierce",
                "cunning",
                "stalker",
                "veteran",
                "pack-leader",
                "battle-worn",
            ],
            rare_traits: &[
                "ethereal",
                "legendary",
                "mythical",
                "blessed",
                "cursed",
                "ancient",
                "primal",
                "shadow-touched",
            ],
        },
    );
    bestiary.insert(
        "bat",
        Archetype {
            kind: EntityKind::Bat,
            variants: &["cave bat", "vampire bat", "giant bat"],
            rare_variants: &["shadow bat", "blood lord bat", "elder bat"],
            behaviors: &["nocturnal", "swarm", "echo"],
            health: (10, 20),
            damage: (2, 5),
            defense: (1, 2),
            rare_stats_multiplier: 2.0,
            loot_table: &["bat_wing", "echo_crystal", "guano"],
            rare_loot_table: &["shadow_essence", "blood_crystal", "elder_wing"],
            common_traits: &[
                "small", "noisy", "drowsy", "alert", "frail", "skittish", "social", "blind",
            ],
            uncommon_traits: &[
                "vampiric",
                "sonic",
                "venomous",
                "giant",
                "swarmer",
                "hunter",
                "screamer",
                "night-blessed",
            ],
            rare_traits: &[
                "blood-lord",
                "shadow-wing",
                "echo-master",
                "void-touched",
                "dream-eater",
                "soul-drinker",
                "storm-rider",
                "time-shifted",
            ],
        },
    );
    bestiary.insert(
        "troll",
        Archetype {
            kind: EntityKind::Troll,
            variants: &["cave troll", "bridge troll", "mountain troll"],
            rare_variants: &["frost troll", "two-headed troll", "troll king"],
            behaviors: &["territorial", "aggressive", "collector"],
            health: (80, 120),
            damage: (15, 25),
            defense: (8, 12),
            rare_stats_multiplier: 2.0,
            loot_table: &["troll_hide", "gold_pouch", "crude_weapon"],
            rare_loot_table: &["frost_crystal", "crown_shard", "ancient_gold"],
            common_traits: &[
                "dim", "greedy", "tough", "sluggish", "crude", "stubborn", "loud", "hungry",
            ],
            uncommon_traits: &[
                "regenerating",
                "armored",
                "berserker",
                "boulder-thrower",
                "earth-shaker",
                "collector",
                "tribal",
                "wise",
            ],
            rare_traits: &[
                "frost-touched",
                "two-headed",
                "royal",
                "ancient",
                "mountain-heart",
                "rune-carved",
                "world-breaker",
                "titan-blood",
            ],
        },
    );
    bestiary
}
