//! Item Module
//!
//! Items are static-valued artifacts: once generated, their stats never
//! change. The category is a tagged union so each carries only the bonus
//! field that matters for it; everything else reads as zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use variantly::Variantly;

/// Category payload for an item. Weapons carry a damage bonus, armor a
/// defense bonus, food a nutrition value (fractional, raw meat is worth
/// half). Quest and misc items carry nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Variantly)]
pub enum ItemKind {
    Weapon { damage_bonus: u32 },
    Armor { defense_bonus: u32 },
    Food { food_value: f32, raw: bool },
    Quest,
    Misc,
}

impl ItemKind {
    pub fn damage_bonus(&self) -> u32 {
        match self {
            ItemKind::Weapon { damage_bonus } => *damage_bonus,
            _ => 0,
        }
    }

    pub fn defense_bonus(&self) -> u32 {
        match self {
            ItemKind::Armor { defense_bonus } => *defense_bonus,
            _ => 0,
        }
    }

    pub fn food_value(&self) -> f32 {
        match self {
            ItemKind::Food { food_value, .. } => *food_value,
            _ => 0.0,
        }
    }

    /// Flat category tag for save snapshots and boundary parsing.
    pub fn category(&self) -> ItemCategory {
        match self {
            ItemKind::Weapon { .. } => ItemCategory::Weapon,
            ItemKind::Armor { .. } => ItemCategory::Armor,
            ItemKind::Food { .. } => ItemCategory::Food,
            ItemKind::Quest => ItemCategory::QuestItem,
            ItemKind::Misc => ItemCategory::Misc,
        }
    }
}

/// Field-free category tag. Save files store `(name, category)` pairs and
/// regenerate the rest, so this is the only part of [`ItemKind`] that
/// crosses the persistence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Food,
    QuestItem,
    Misc,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemCategory::Weapon => "weapon",
            ItemCategory::Armor => "armor",
            ItemCategory::Food => "food",
            ItemCategory::QuestItem => "quest_item",
            ItemCategory::Misc => "misc",
        };
        write!(f, "{name}")
    }
}

/// Raised when a boundary string names a category the generator tables do
/// not register.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item category: '{0}'")]
pub struct CategoryParseError(pub String);

impl FromStr for ItemCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weapon" => Ok(ItemCategory::Weapon),
            "armor" => Ok(ItemCategory::Armor),
            "food" => Ok(ItemCategory::Food),
            "quest_item" | "quest" => Ok(ItemCategory::QuestItem),
            "misc" => Ok(ItemCategory::Misc),
            other => Err(CategoryParseError(other.to_string())),
        }
    }
}

/// Display-emphasis ladder for items. The generator only mints the first
/// five tiers; mythic and above are reserved for scripted placements.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Unique,
    Quest,
}

impl Rarity {
    /// Tier assigned from an item generator quality level.
    pub fn from_quality(quality_level: u32) -> Rarity {
        match quality_level {
            q if q >= 4 => Rarity::Legendary,
            3 => Rarity::Epic,
            2 => Rarity::Rare,
            1 => Rarity::Uncommon,
            _ => Rarity::Common,
        }
    }

    /// RGB for terminal display of this tier.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Rarity::Common => (200, 200, 200),
            Rarity::Uncommon => (30, 200, 30),
            Rarity::Rare => (65, 105, 225),
            Rarity::Epic => (163, 53, 238),
            Rarity::Legendary => (230, 230, 30),
            Rarity::Mythic => (230, 30, 30),
            Rarity::Unique => (255, 128, 0),
            Rarity::Quest => (0, 200, 200),
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
            Rarity::Mythic => "mythic",
            Rarity::Unique => "unique",
            Rarity::Quest => "quest",
        };
        write!(f, "{name}")
    }
}

/// A single item instance. Owned by value by exactly one holder (location,
/// player inventory, entity inventory, or an equipped slot); moving an item
/// moves the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
    pub rarity: Rarity,
}

impl Item {
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ItemKind) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            kind,
            rarity: Rarity::Common,
        }
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Item {
        self.rarity = rarity;
        self
    }

    /// A carryable oddment with no mechanical effect.
    pub fn misc(name: impl Into<String>, description: impl Into<String>) -> Item {
        Item::new(name, description, ItemKind::Misc)
    }

    /// A scripted story item.
    pub fn quest(name: impl Into<String>, description: impl Into<String>) -> Item {
        Item::new(name, description, ItemKind::Quest).with_rarity(Rarity::Quest)
    }

    pub fn damage_bonus(&self) -> u32 {
        self.kind.damage_bonus()
    }

    pub fn defense_bonus(&self) -> u32 {
        self.kind.defense_bonus()
    }

    pub fn food_value(&self) -> f32 {
        self.kind.food_value()
    }

    /// Whether this is uncooked meat, which punishes direct consumption.
    pub fn is_raw_food(&self) -> bool {
        matches!(self.kind, ItemKind::Food { raw: true, .. })
    }

    /// Case-insensitive name substring test, used by feed/cook matching.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Anything that owns items by value: locations, entities, and the player.
/// Insertion order is preserved for display.
pub trait ItemHolder {
    fn items(&self) -> &[Item];
    fn items_mut(&mut self) -> &mut Vec<Item>;

    fn add_item(&mut self, item: Item) {
        self.items_mut().push(item);
    }

    /// Remove and return the item with the given id, keeping the order of
    /// the rest.
    fn remove_item(&mut self, id: Uuid) -> Option<Item> {
        let idx = self.items().iter().position(|item| item.id == id)?;
        Some(self.items_mut().remove(idx))
    }

    fn contains_item(&self, id: Uuid) -> bool {
        self.items().iter().any(|item| item.id == id)
    }

    fn find_item(&self, id: Uuid) -> Option<&Item> {
        self.items().iter().find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Chest {
        items: Vec<Item>,
    }

    impl ItemHolder for Chest {
        fn items(&self) -> &[Item] {
            &self.items
        }
        fn items_mut(&mut self) -> &mut Vec<Item> {
            &mut self.items
        }
    }

    #[test]
    fn rarity_thresholds_match_quality_ladder() {
        assert_eq!(Rarity::from_quality(0), Rarity::Common);
        assert_eq!(Rarity::from_quality(1), Rarity::Uncommon);
        assert_eq!(Rarity::from_quality(2), Rarity::Rare);
        assert_eq!(Rarity::from_quality(3), Rarity::Epic);
        assert_eq!(Rarity::from_quality(4), Rarity::Legendary);
        assert_eq!(Rarity::from_quality(9), Rarity::Legendary);
    }

    #[test]
    fn rarity_tiers_are_ordered() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Rare < Rarity::Legendary);
        assert!(Rarity::Legendary < Rarity::Unique);
    }

    #[test]
    fn kind_accessors_default_to_zero_for_other_categories() {
        let sword = Item::new("sword", "stabby", ItemKind::Weapon { damage_bonus: 5 });
        assert_eq!(sword.damage_bonus(), 5);
        assert_eq!(sword.defense_bonus(), 0);
        assert_eq!(sword.food_value(), 0.0);

        let bread = Item::new(
            "bread",
            "crusty",
            ItemKind::Food {
                food_value: 18.0,
                raw: false,
            },
        );
        assert_eq!(bread.damage_bonus(), 0);
        assert_eq!(bread.food_value(), 18.0);
        assert!(!bread.is_raw_food());
    }

    #[test]
    fn category_parses_from_boundary_strings() {
        assert_eq!("weapon".parse::<ItemCategory>(), Ok(ItemCategory::Weapon));
        assert_eq!(
            "quest_item".parse::<ItemCategory>(),
            Ok(ItemCategory::QuestItem)
        );
        assert!(matches!(
            "treasure".parse::<ItemCategory>(),
            Err(CategoryParseError(s)) if s == "treasure"
        ));
    }

    #[test]
    fn remove_item_preserves_insertion_order() {
        let mut chest = Chest { items: Vec::new() };
        let first = Item::misc("coin", "shiny");
        let second = Item::misc("key", "brass");
        let third = Item::misc("ring", "silver");
        let target = second.id;
        chest.add_item(first);
        chest.add_item(second);
        chest.add_item(third);

        let removed = chest.remove_item(target).unwrap();
        assert_eq!(removed.name, "key");
        let names: Vec<&str> = chest.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["coin", "ring"]);
        assert!(chest.remove_item(target).is_none());
    }
}
