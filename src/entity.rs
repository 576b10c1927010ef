//! Entity Module
//!
//! Creatures and corpses that occupy locations. A kind fixes the interaction
//! defaults (hostility, dodge and crit chances, special attacks); the
//! bestiary generator then overwrites stats and attaches trait metadata for
//! named variants. Entities are owned by value by exactly one location.

use std::fmt;

use rand::Rng;
use uuid::Uuid;

use crate::bestiary::TraitRarity;
use crate::health::{HealthState, StatusEffect};
use crate::item::{Item, ItemHolder};

/// Interaction archetype. Generated variants keep the kind of the archetype
/// they came from, so a "dire wolf" feeds and fights like a wolf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Wolf,
    Bandit,
    Spider,
    Bat,
    Troll,
    DeadBody,
}

impl EntityKind {
    pub fn base_name(self) -> &'static str {
        match self {
            EntityKind::Wolf => "wolf",
            EntityKind::Bandit => "bandit",
            EntityKind::Spider => "spider",
            EntityKind::Bat => "bat",
            EntityKind::Troll => "troll",
            EntityKind::DeadBody => "dead body",
        }
    }

    fn default_description(self) -> &'static str {
        match self {
            EntityKind::Wolf => "A fierce wolf with gleaming eyes",
            EntityKind::Bandit => "A rough-looking bandit eyes you suspiciously",
            EntityKind::Spider => "A large spider moves in the shadows",
            EntityKind::Bat => "A bat hangs from the ceiling",
            EntityKind::Troll => "A hulking troll blocks the way",
            EntityKind::DeadBody => "A lifeless body lies in the grass",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_name())
    }
}

/// Extra consequence attached to a special attack, beyond its damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackEffect {
    /// Leaves a status effect on the player for a number of turns.
    Status { effect: StatusEffect, turns: u32 },
    /// May pull another creature of the attacker's kind into the location.
    Summon { chance: f64 },
}

/// One entry in an entity's special-attack list. During the response phase
/// the list is walked in order and the first entry whose chance roll
/// succeeds fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialAttack {
    pub name: &'static str,
    pub damage_mult: f64,
    pub chance: f64,
    pub effect: Option<AttackEffect>,
}

const WOLF_SPECIALS: &[SpecialAttack] = &[
    SpecialAttack {
        name: "Fierce Bite",
        damage_mult: 1.5,
        chance: 0.3,
        effect: None,
    },
    SpecialAttack {
        name: "Pack Call",
        damage_mult: 1.2,
        chance: 0.2,
        effect: Some(AttackEffect::Summon { chance: 0.5 }),
    },
];

const BANDIT_SPECIALS: &[SpecialAttack] = &[
    SpecialAttack {
        name: "Backstab",
        damage_mult: 2.0,
        chance: 0.15,
        effect: None,
    },
    SpecialAttack {
        name: "Disarm",
        damage_mult: 0.5,
        chance: 0.25,
        effect: Some(AttackEffect::Status {
            effect: StatusEffect::ReducedDamage,
            turns: 2,
        }),
    },
];

const SPIDER_SPECIALS: &[SpecialAttack] = &[
    SpecialAttack {
        name: "Web Shot",
        damage_mult: 0.8,
        chance: 0.3,
        effect: Some(AttackEffect::Status {
            effect: StatusEffect::ReducedDodge,
            turns: 2,
        }),
    },
    SpecialAttack {
        name: "Poison Bite",
        damage_mult: 1.2,
        chance: 0.2,
        effect: Some(AttackEffect::Status {
            effect: StatusEffect::Poison,
            turns: 3,
        }),
    },
];

/// Oddments a corpse might carry.
const POCKET_LOOT: &[(&str, &str)] = &[
    ("gold coins", "A handful of golden coins"),
    ("dagger", "A rusty but serviceable dagger"),
    ("letter", "A weathered letter with mysterious contents"),
    ("brass key", "An ornate brass key"),
    ("silver ring", "A silver ring with strange markings"),
];

/// What feeding an entity did, for the caller to apply.
pub struct FeedOutcome {
    pub message: String,
    /// The offered item was eaten and should leave the player's inventory.
    pub consumed: bool,
    /// Something the creature gave up in return; goes to the location.
    pub dropped: Option<Item>,
    /// The creature stopped being hostile because of this meal.
    pub befriended: bool,
}

impl FeedOutcome {
    fn refusal(message: String) -> FeedOutcome {
        FeedOutcome {
            message,
            consumed: false,
            dropped: None,
            befriended: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: Uuid,
    pub kind: EntityKind,
    pub name: String,
    pub description: String,
    pub health: HealthState,
    pub damage: u32,
    pub defense: u32,
    pub dodge_chance: f64,
    pub crit_chance: f64,
    pub hostile: bool,
    pub special_attacks: Vec<SpecialAttack>,
    pub inventory: Vec<Item>,
    /// Generator metadata; `None` for hand-placed entities.
    pub behavior: Option<String>,
    pub trait_name: Option<String>,
    pub trait_rarity: Option<TraitRarity>,
    pub abilities: Vec<String>,
    pub speed: f64,
    pub aggression: f64,
    pub loot_table: Vec<String>,
    pub loot_multiplier: f64,
    pub rare: bool,
}

impl Entity {
    /// Create an entity with its kind's fixed defaults and an empty
    /// inventory.
    pub fn spawn_basic(kind: EntityKind) -> Entity {
        let (health, damage, defense, dodge_chance, crit_chance, hostile): (
            u32,
            u32,
            u32,
            f64,
            f64,
            bool,
        ) = match kind {
            EntityKind::Wolf => (30, 8, 2, 0.15, 0.2, true),
            EntityKind::Bandit => (40, 6, 3, 0.2, 0.1, true),
            EntityKind::Spider => (25, 5, 1, 0.25, 0.1, true),
            EntityKind::Bat => (20, 3, 0, 0.1, 0.1, false),
            EntityKind::Troll => (80, 15, 8, 0.1, 0.1, true),
            EntityKind::DeadBody => (20, 3, 0, 0.1, 0.1, false),
        };
        let special_attacks = match kind {
            EntityKind::Wolf => WOLF_SPECIALS.to_vec(),
            EntityKind::Bandit => BANDIT_SPECIALS.to_vec(),
            EntityKind::Spider => SPIDER_SPECIALS.to_vec(),
            _ => Vec::new(),
        };

        Entity {
            id: Uuid::new_v4(),
            kind,
            name: kind.base_name().to_string(),
            description: kind.default_description().to_string(),
            health: HealthState::new_at_max(health),
            damage,
            defense,
            dodge_chance,
            crit_chance,
            hostile,
            special_attacks,
            inventory: Vec::new(),
            behavior: None,
            trait_name: None,
            trait_rarity: None,
            abilities: Vec::new(),
            speed: 1.0,
            aggression: 1.0,
            loot_table: Vec::new(),
            loot_multiplier: 1.0,
            rare: false,
        }
    }

    /// Like [`Entity::spawn_basic`], but corpses also roll their pocket
    /// loot: 20% chance of nothing, otherwise 1-3 slots each filled at 70%.
    pub fn spawn(kind: EntityKind, rng: &mut impl Rng) -> Entity {
        let mut entity = Entity::spawn_basic(kind);
        if kind == EntityKind::DeadBody && !rng.random_bool(0.2) {
            let slots = rng.random_range(1..=3);
            for _ in 0..slots {
                if rng.random_bool(0.7) {
                    let (name, description) = POCKET_LOOT[rng.random_range(0..POCKET_LOOT.len())];
                    entity.inventory.push(Item::misc(name, description));
                }
            }
        }
        entity
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Entity {
        self.description = description.into();
        self
    }

    pub fn is_dead_body(&self) -> bool {
        self.kind == EntityKind::DeadBody
    }

    /// Response to being spoken to.
    pub fn talk(&self) -> String {
        match self.kind {
            EntityKind::DeadBody => "The dead tell no tales...".to_string(),
            EntityKind::Bat => format!(
                "The {} squeaks in response, but you can't understand it.",
                self.name
            ),
            EntityKind::Wolf => format!(
                "The {} stares at you hungrily, perhaps it would be more interested in food.",
                self.name
            ),
            _ => format!("The {} doesn't respond.", self.name),
        }
    }

    /// Response to an attack on a creature that will not fight back.
    pub fn attack_flavor(&self) -> String {
        match self.kind {
            EntityKind::Bat => format!(
                "The {} quickly flies out of your reach, circling above.",
                self.name
            ),
            EntityKind::Wolf => format!(
                "The {} growls menacingly and bares its teeth. It might be better to try feeding it...",
                self.name
            ),
            _ => format!("The {} shies away from your attack.", self.name),
        }
    }

    /// Offer an item as food. Wolves are won over by meat; bats trade a
    /// keepsake for fruit. The caller applies the outcome (removes the
    /// consumed item, places anything dropped).
    pub fn feed(&mut self, item: &Item) -> FeedOutcome {
        match self.kind {
            EntityKind::DeadBody => FeedOutcome::refusal("That would be a waste of food.".into()),
            EntityKind::Bat => {
                if item.name_contains("fruit") {
                    FeedOutcome {
                        message: format!(
                            "The {} eagerly takes the fruit and drops its silver chain!",
                            self.name
                        ),
                        consumed: true,
                        dropped: Some(Item::misc("silver chain", "A delicate silver chain")),
                        befriended: false,
                    }
                } else {
                    FeedOutcome::refusal(format!(
                        "The {} doesn't seem interested in that.",
                        self.name
                    ))
                }
            }
            EntityKind::Wolf => {
                if item.name_contains("meat") {
                    let befriended = self.hostile;
                    self.hostile = false;
                    FeedOutcome {
                        message: format!(
                            "The {} devours the meat and seems much friendlier now!",
                            self.name
                        ),
                        consumed: true,
                        dropped: None,
                        befriended,
                    }
                } else {
                    FeedOutcome::refusal(format!(
                        "The {} only seems interested in meat.",
                        self.name
                    ))
                }
            }
            _ => FeedOutcome::refusal(format!("The {} doesn't seem interested in that.", self.name)),
        }
    }

    /// Message for searching an entity that carries nothing.
    pub fn empty_search_message(&self) -> String {
        if self.is_dead_body() {
            "You search the corpse thoroughly but find nothing of value.".to_string()
        } else {
            format!("You search the {} but find nothing of interest.", self.name)
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl ItemHolder for Entity {
    fn items(&self) -> &[Item] {
        &self.inventory
    }

    fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.inventory
    }
}
