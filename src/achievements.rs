//! Achievement tracking and tiered reward generation.
//!
//! Six fixed achievements, each mapped to a reward tier. Unlocking rolls a
//! batch of items through the item generator; callers push the items into
//! the player's inventory and surface the banner.

use std::collections::BTreeSet;

use log::info;
use rand::Rng;
use rand::prelude::IndexedRandom;

use crate::item::{Item, ItemCategory};
use crate::item_gen;
use crate::location::LocationKind;

/// Reward difficulty tiers, in ascending order of generosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardTier {
    Basic,
    Intermediate,
    Advanced,
}

impl RewardTier {
    fn quality_range(self) -> std::ops::RangeInclusive<u32> {
        match self {
            RewardTier::Basic => 0..=1,
            RewardTier::Intermediate => 2..=3,
            RewardTier::Advanced => 3..=4,
        }
    }

    fn quantity_range(self) -> std::ops::RangeInclusive<u32> {
        match self {
            RewardTier::Basic => 1..=2,
            RewardTier::Intermediate => 1..=3,
            RewardTier::Advanced => 2..=3,
        }
    }

    fn categories(self) -> &'static [ItemCategory] {
        match self {
            RewardTier::Basic => &[ItemCategory::Food],
            RewardTier::Intermediate | RewardTier::Advanced => {
                &[ItemCategory::Weapon, ItemCategory::Armor]
            }
        }
    }
}

/// Roll a reward batch for a tier. Quality is rolled once per batch,
/// the category per item.
pub fn generate_rewards(tier: RewardTier, rng: &mut impl Rng) -> Vec<Item> {
    let quantity = rng.random_range(tier.quantity_range());
    let quality = rng.random_range(tier.quality_range());
    let mut rewards = Vec::new();
    for _ in 0..quantity {
        let category = tier
            .categories()
            .choose(rng)
            .copied()
            .unwrap_or(ItemCategory::Food);
        if let Some(item) = item_gen::generate(category, quality, rng) {
            rewards.push(item);
        }
    }
    rewards
}

#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tier: RewardTier,
    /// Progress target for counted achievements, `None` for one-shot flags.
    pub target: Option<u32>,
}

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_steps",
        name: "First Steps",
        description: "Move to a new location",
        tier: RewardTier::Basic,
        target: None,
    },
    AchievementDef {
        id: "survivalist",
        name: "Survivalist",
        description: "Cook your first meal",
        tier: RewardTier::Basic,
        target: None,
    },
    AchievementDef {
        id: "wolf_whisperer",
        name: "Wolf Whisperer",
        description: "Befriend a wolf without taking damage",
        tier: RewardTier::Intermediate,
        target: None,
    },
    AchievementDef {
        id: "treasure_hunter",
        name: "Treasure Hunter",
        description: "Find 5 valuable items",
        tier: RewardTier::Intermediate,
        target: Some(5),
    },
    AchievementDef {
        id: "master_chef",
        name: "Master Chef",
        description: "Create 3 different types of meals",
        tier: RewardTier::Intermediate,
        target: Some(3),
    },
    AchievementDef {
        id: "explorer",
        name: "Explorer",
        description: "Discover all location types",
        tier: RewardTier::Advanced,
        target: Some(3),
    },
];

/// A freshly unlocked achievement with its rolled rewards.
#[derive(Debug, Clone)]
pub struct Unlock {
    pub name: &'static str,
    pub description: &'static str,
    pub rewards: Vec<Item>,
}

/// Tracks unlock state and the partial progress behind counted achievements.
#[derive(Debug, Clone, Default)]
pub struct AchievementLog {
    unlocked: BTreeSet<String>,
    treasure_count: u32,
    meal_types: BTreeSet<String>,
    kinds_seen: BTreeSet<String>,
}

impl AchievementLog {
    pub fn new() -> AchievementLog {
        AchievementLog::default()
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Current progress toward a counted achievement.
    pub fn progress_of(&self, id: &str) -> Option<(u32, u32)> {
        match id {
            "treasure_hunter" => Some((self.treasure_count, 5)),
            "master_chef" => Some((u32::try_from(self.meal_types.len()).unwrap_or(u32::MAX), 3)),
            "explorer" => Some((u32::try_from(self.kinds_seen.len()).unwrap_or(u32::MAX), 3)),
            _ => None,
        }
    }

    pub fn on_move(&mut self, rng: &mut impl Rng) -> Option<Unlock> {
        self.unlock("first_steps", rng)
    }

    /// A cooked product fires the first-meal achievement and advances the
    /// distinct-meal count. Both can unlock from the same pot.
    pub fn on_cook(&mut self, meal_type: &str, rng: &mut impl Rng) -> Vec<Unlock> {
        let mut unlocked = Vec::new();
        if let Some(unlock) = self.unlock("survivalist", rng) {
            unlocked.push(unlock);
        }
        if !self.is_unlocked("master_chef") {
            self.meal_types.insert(meal_type.to_string());
            if self.meal_types.len() >= 3
                && let Some(unlock) = self.unlock("master_chef", rng)
            {
                unlocked.push(unlock);
            }
        }
        unlocked
    }

    /// `unharmed` means the player was at full health when the wolf turned.
    pub fn on_befriend_wolf(&mut self, unharmed: bool, rng: &mut impl Rng) -> Option<Unlock> {
        if unharmed { self.unlock("wolf_whisperer", rng) } else { None }
    }

    /// Called when the player picks up an item of rare or better quality.
    pub fn on_treasure(&mut self, rng: &mut impl Rng) -> Option<Unlock> {
        if self.is_unlocked("treasure_hunter") {
            return None;
        }
        self.treasure_count += 1;
        if self.treasure_count >= 5 {
            self.unlock("treasure_hunter", rng)
        } else {
            None
        }
    }

    pub fn on_discover_kind(&mut self, kind: LocationKind, rng: &mut impl Rng) -> Option<Unlock> {
        if self.is_unlocked("explorer") {
            return None;
        }
        self.kinds_seen.insert(kind.to_string());
        if self.kinds_seen.len() >= 3 {
            self.unlock("explorer", rng)
        } else {
            None
        }
    }

    fn unlock(&mut self, id: &str, rng: &mut impl Rng) -> Option<Unlock> {
        if self.unlocked.contains(id) {
            return None;
        }
        let def = ACHIEVEMENTS.iter().find(|def| def.id == id)?;
        self.unlocked.insert(id.to_string());
        info!("achievement unlocked: {}", def.name);
        Some(Unlock {
            name: def.name,
            description: def.description,
            rewards: generate_rewards(def.tier, rng),
        })
    }
}
