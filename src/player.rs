//! Player Module
//!
//! The player's health, needs meters, attributes, equipment, and status
//! effects. Damage, defense, dodge, and maximum health are derived on read
//! from base values, attributes, equipment, and any active effects; status
//! effects never write into the base stats, so they fall away cleanly when
//! they expire.

use std::collections::BTreeMap;
use std::fmt;

use uuid::Uuid;

use crate::health::StatusEffect;
use crate::item::{Item, ItemKind, ItemHolder};

/// The three equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipSlot {
    Weapon,
    Armor,
    Accessory,
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Armor => "armor",
            EquipSlot::Accessory => "accessory",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub health: u32,
    pub damage: u32,
    pub defense: u32,
    pub crit_chance: f64,
    base_dodge_chance: f64,
    base_max_health: u32,
    /// Needs meters, 0-100. Decay per time advance; zeroed hunger or
    /// thirst starts costing health.
    pub hunger: f32,
    pub thirst: f32,
    pub energy: f32,
    pub bladder: f32,
    pub inventory: Vec<Item>,
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub accessory: Option<Item>,
    pub status_effects: BTreeMap<StatusEffect, u32>,
    pub strength: u32,
    pub dexterity: u32,
    pub intelligence: u32,
    pub vitality: u32,
    pub charisma: u32,
    pub wisdom: u32,
    pub luck: u32,
}

impl Default for Player {
    fn default() -> Self {
        Player::new()
    }
}

impl Player {
    pub fn new() -> Player {
        Player {
            health: 100,
            damage: 5,
            defense: 0,
            crit_chance: 0.15,
            base_dodge_chance: 0.15,
            base_max_health: 100,
            hunger: 100.0,
            thirst: 100.0,
            energy: 100.0,
            bladder: 100.0,
            inventory: Vec::new(),
            weapon: None,
            armor: None,
            accessory: None,
            status_effects: BTreeMap::new(),
            strength: 5,
            dexterity: 5,
            intelligence: 5,
            vitality: 5,
            charisma: 5,
            wisdom: 5,
            luck: 5,
        }
    }

    /// Maximum health, 100 plus 10 per point of vitality above 5.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max_health(&self) -> u32 {
        let bonus = (i64::from(self.vitality) - 5) * 10;
        (i64::from(self.base_max_health) + bonus).max(1) as u32
    }

    /// Dodge chance, 0.15 plus 0.03 per point of dexterity above 5. Halved
    /// while a dodge-dampening effect is active.
    pub fn dodge_chance(&self) -> f64 {
        let base = self.base_dodge_chance + (f64::from(self.dexterity) - 5.0) * 0.03;
        if self.status_effects.keys().any(|e| e.dampens_dodge()) {
            base * 0.5
        } else {
            base
        }
    }

    /// Total damage from base, strength, and equipment. Scaled by 0.7 while
    /// weakened or disarmed.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn effective_damage(&self) -> u32 {
        let mut total = i64::from(self.damage) + (i64::from(self.strength) - 5);
        total += self
            .equipped_items()
            .map(|item| i64::from(item.damage_bonus()))
            .sum::<i64>();
        if self.status_effects.keys().any(|e| e.dampens_damage()) {
            total = (total as f64 * 0.7).trunc() as i64;
        }
        total.max(0) as u32
    }

    /// Total defense from base and equipment.
    pub fn effective_defense(&self) -> u32 {
        self.defense
            + self
                .equipped_items()
                .map(Item::defense_bonus)
                .sum::<u32>()
    }

    pub fn equipped_items(&self) -> impl Iterator<Item = &Item> {
        self.weapon
            .iter()
            .chain(self.armor.iter())
            .chain(self.accessory.iter())
    }

    pub fn equipped_in(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
            EquipSlot::Accessory => self.accessory.as_ref(),
        }
    }

    /// Equip a weapon or armor piece from the inventory, swapping anything
    /// already in the slot back into the pack. Returns `None` if the item
    /// is not in the inventory.
    pub fn equip(&mut self, id: Uuid) -> Option<String> {
        let item = self.remove_item(id)?;
        let name = item.name.clone();
        let slot = match item.kind {
            ItemKind::Weapon { .. } => &mut self.weapon,
            ItemKind::Armor { .. } => &mut self.armor,
            _ => {
                let message = format!("You can't equip the {name}.");
                self.inventory.push(item);
                return Some(message);
            }
        };
        if let Some(old) = slot.replace(item) {
            self.inventory.push(old);
        }
        Some(format!("You equip the {name}."))
    }

    /// Move whatever occupies a slot back into the inventory.
    pub fn unequip(&mut self, slot: EquipSlot) -> bool {
        let slot = match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Accessory => &mut self.accessory,
        };
        match slot.take() {
            Some(item) => {
                self.inventory.push(item);
                true
            }
            None => false,
        }
    }

    /// Eat an item from the inventory. Non-food is refused and kept; raw
    /// meat nourishes but costs 10 health. Returns `None` if the item is
    /// not in the inventory.
    pub fn consume_food(&mut self, id: Uuid) -> Option<Vec<String>> {
        let idx = self.inventory.iter().position(|item| item.id == id)?;
        let ItemKind::Food { food_value, raw } = self.inventory[idx].kind else {
            return Some(vec!["That's not edible.".to_string()]);
        };

        let item = self.inventory.remove(idx);
        let mut messages = Vec::new();
        if raw {
            self.health = self.health.saturating_sub(10);
            messages.push("Eating raw meat makes you feel sick!".to_string());
        }
        self.hunger = (self.hunger + food_value).min(100.0);
        messages.push(format!("You eat the {}.", item.name));
        Some(messages)
    }

    /// Restore health, clamped to the derived maximum.
    pub fn heal(&mut self, amount: u32) {
        self.health = (self.health + amount).min(self.max_health());
    }

    /// Apply one step of needs decay and return any warnings. Starvation
    /// or dehydration costs a point of health per step.
    pub fn update_needs(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        self.hunger = (self.hunger - 0.5).max(0.0);
        self.thirst = (self.thirst - 1.0).max(0.0);
        self.energy = (self.energy - 0.3).max(0.0);
        self.bladder = (self.bladder - 0.7).max(0.0);

        if self.hunger <= 0.0 || self.thirst <= 0.0 {
            self.health = self.health.saturating_sub(1);
            warnings.push("You're dying of hunger/thirst!".to_string());
        }
        if self.energy <= 20.0 {
            warnings.push("You're exhausted and need sleep!".to_string());
        }
        if self.bladder <= 20.0 {
            warnings.push("You really need to relieve yourself!".to_string());
        }
        warnings
    }

    /// Attach a status effect, restarting its clock if already active.
    pub fn apply_effect(&mut self, effect: StatusEffect, turns: u32) {
        self.status_effects.insert(effect, turns.max(1));
    }

    /// Advance every active effect by one turn: damage-over-time lands,
    /// durations tick down, and expired effects announce themselves.
    pub fn tick_effects(&mut self) -> Vec<String> {
        let mut dot_damage = 0;
        let mut expired = Vec::new();
        for (&effect, turns) in &mut self.status_effects {
            dot_damage += effect.damage_per_turn();
            *turns = turns.saturating_sub(1);
            if *turns == 0 {
                expired.push(effect);
            }
        }
        self.health = self.health.saturating_sub(dot_damage);

        let mut messages = Vec::new();
        for effect in expired {
            self.status_effects.remove(&effect);
            messages.push(format!("The {effect} effect has worn off!"));
        }
        messages
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

impl ItemHolder for Player {
    fn items(&self) -> &[Item] {
        &self.inventory
    }

    fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.inventory
    }
}
