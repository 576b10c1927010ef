//! Item Generator Module
//!
//! Rolls concrete weapons, armor, and food from static subtype tables. A
//! quality level shifts the prefix pool, adds directly to weapon and armor
//! stats, and sets the rarity tier. `generate_by_name` reverses a generated
//! name back into an item with averaged stats, for rebuilding inventories
//! from save snapshots, and `trophy` maps bestiary loot-table entries to
//! droppable items.

use rand::Rng;

use crate::item::{Item, ItemCategory, ItemKind, Rarity};

const QUALITY_PREFIXES: &[&str] = &["crude", "basic", "fine", "masterwork", "legendary"];
const MATERIALS: &[&str] = &[
    "iron", "steel", "bronze", "copper", "silver", "crystal", "bone", "wooden",
];

const WEAPON_TYPES: &[(&str, (u32, u32))] = &[
    ("sword", (3, 8)),
    ("dagger", (2, 5)),
    ("axe", (4, 9)),
    ("spear", (3, 7)),
    ("mace", (4, 8)),
];

const ARMOR_TYPES: &[(&str, (u32, u32))] = &[
    ("helmet", (1, 4)),
    ("chestplate", (3, 8)),
    ("boots", (1, 3)),
    ("shield", (2, 5)),
];

const FOOD_TYPES: &[(&str, (u32, u32))] = &[
    ("bread", (15, 25)),
    ("meat", (25, 40)),
    ("fruit", (10, 20)),
    ("herbs", (5, 15)),
];

/// Flavor text for bestiary loot-table entries that are not generator
/// items.
const TROPHY_DESCRIPTIONS: &[(&str, &str)] = &[
    ("wolf_pelt", "A thick grey wolf pelt"),
    ("wolf_fang", "A sharp fang from a wolf"),
    ("spectral_pelt", "A pelt that shimmers with ghostly light"),
    ("alpha_fang", "A massive fang from a pack leader"),
    ("ancient_rune", "A stone rune carved with forgotten marks"),
    ("bat_wing", "A leathery bat wing"),
    ("echo_crystal", "A crystal that hums with trapped sound"),
    ("guano", "A pungent clump of bat droppings"),
    ("shadow_essence", "A vial of swirling darkness"),
    ("blood_crystal", "A crystal with a deep red glow"),
    ("elder_wing", "An enormous wing from an elder bat"),
    ("troll_hide", "A slab of thick troll hide"),
    ("gold_pouch", "A heavy pouch of gold coins"),
    ("crude_weapon", "A crudely hammered blade"),
    ("frost_crystal", "A crystal cold enough to burn"),
    ("crown_shard", "A broken shard of a royal crown"),
    ("ancient_gold", "Old coins from a kingdom long gone"),
];

/// Generate an item of the given category. Quality is ignored for food,
/// which rolls its own prefix tier. Categories outside the generator tables
/// (quest items, misc trinkets) return `None`; callers must check.
pub fn generate(category: ItemCategory, quality_level: u32, rng: &mut impl Rng) -> Option<Item> {
    match category {
        ItemCategory::Weapon => Some(generate_weapon(quality_level, rng)),
        ItemCategory::Armor => Some(generate_armor(quality_level, rng)),
        ItemCategory::Food => Some(generate_food(rng)),
        ItemCategory::QuestItem | ItemCategory::Misc => None,
    }
}

fn generate_weapon(quality_level: u32, rng: &mut impl Rng) -> Item {
    let (weapon_type, (lo, hi)) = pick(WEAPON_TYPES, rng);
    let material = pick(MATERIALS, rng);
    let quality = quality_prefix(quality_level, rng);
    let damage = rng.random_range(lo..=hi) + quality_level;

    Item::new(
        format!("{quality} {material} {weapon_type}"),
        format!("A {quality} {weapon_type} made of {material}"),
        ItemKind::Weapon {
            damage_bonus: damage,
        },
    )
    .with_rarity(Rarity::from_quality(quality_level))
}

fn generate_armor(quality_level: u32, rng: &mut impl Rng) -> Item {
    let (armor_type, (lo, hi)) = pick(ARMOR_TYPES, rng);
    let material = pick(MATERIALS, rng);
    let quality = quality_prefix(quality_level, rng);
    let defense = rng.random_range(lo..=hi) + quality_level;

    Item::new(
        format!("{quality} {material} {armor_type}"),
        format!("A {quality} {armor_type} made of {material}"),
        ItemKind::Armor {
            defense_bonus: defense,
        },
    )
    .with_rarity(Rarity::from_quality(quality_level))
}

#[allow(clippy::cast_precision_loss)]
fn generate_food(rng: &mut impl Rng) -> Item {
    let (food_type, (lo, hi)) = pick(FOOD_TYPES, rng);
    let quality = quality_prefix(rng.random_range(0..=2), rng);
    let food_value = rng.random_range(lo..=hi) as f32;

    // Meat comes off the bone raw. Half nutrition until cooked, and eating
    // it uncooked costs health.
    if food_type == "meat" {
        Item::new(
            "raw meat",
            "Raw meat that should be cooked before eating",
            ItemKind::Food {
                food_value: food_value * 0.5,
                raw: true,
            },
        )
    } else {
        Item::new(
            format!("{quality} {food_type}"),
            format!("A {quality} portion of {food_type}"),
            ItemKind::Food {
                food_value,
                raw: false,
            },
        )
    }
}

/// Prefix pool shifts upward with quality: 0-1 draws from the bottom two
/// tiers, 2-3 from the middle three, 4+ from the top two.
fn quality_prefix(quality_level: u32, rng: &mut impl Rng) -> &'static str {
    let pool = match quality_level {
        0 | 1 => &QUALITY_PREFIXES[..2],
        2 | 3 => &QUALITY_PREFIXES[1..4],
        _ => &QUALITY_PREFIXES[3..],
    };
    pick(pool, rng)
}

/// Rebuild an item from its display name. Stats come out as the subtype
/// range average rather than a fresh roll, so round-tripping a name is
/// stable but lossy. Returns `None` when no subtype keyword matches.
#[allow(clippy::cast_precision_loss)]
pub fn generate_by_name(item_name: &str) -> Option<Item> {
    let lowered = item_name.to_lowercase();
    let parts: Vec<&str> = lowered.split_whitespace().collect();

    if parts.contains(&"note") {
        return Some(Item::quest(
            "mysterious note",
            "An old parchment with elegant script",
        ));
    }

    if let Some(&(weapon_type, (lo, hi))) =
        WEAPON_TYPES.iter().find(|(name, _)| parts.contains(name))
    {
        let quality = named_prefix(&parts, QUALITY_PREFIXES, "basic");
        let material = named_prefix(&parts, MATERIALS, "iron");
        return Some(Item::new(
            format!("{quality} {material} {weapon_type}"),
            format!("A {quality} {weapon_type} made of {material}"),
            ItemKind::Weapon {
                damage_bonus: (lo + hi) / 2,
            },
        ));
    }

    if let Some(&(armor_type, (lo, hi))) = ARMOR_TYPES.iter().find(|(name, _)| parts.contains(name))
    {
        let quality = named_prefix(&parts, QUALITY_PREFIXES, "basic");
        let material = named_prefix(&parts, MATERIALS, "iron");
        return Some(Item::new(
            format!("{quality} {material} {armor_type}"),
            format!("A {quality} {armor_type} made of {material}"),
            ItemKind::Armor {
                defense_bonus: (lo + hi) / 2,
            },
        ));
    }

    if let Some(&(food_type, (lo, hi))) = FOOD_TYPES.iter().find(|(name, _)| parts.contains(name)) {
        let quality = named_prefix(&parts, QUALITY_PREFIXES, "basic");
        let food_value = ((lo + hi) / 2) as f32;
        let item = if parts.contains(&"raw") && food_type == "meat" {
            Item::new(
                "raw meat",
                "Raw meat that should be cooked before eating",
                ItemKind::Food {
                    food_value: food_value * 0.5,
                    raw: true,
                },
            )
        } else {
            Item::new(
                format!("{quality} {food_type}"),
                format!("A {quality} portion of {food_type}"),
                ItemKind::Food {
                    food_value,
                    raw: false,
                },
            )
        };
        return Some(item);
    }

    None
}

/// Build an item for a bestiary loot-table entry. Entries are snake_case;
/// the item takes the spaced form as its display name. Entries that spell a
/// generator item ("raw_meat") resolve through [`generate_by_name`]; the
/// rest become misc trophies with their own flavor text.
pub fn trophy(table_entry: &str) -> Item {
    let name = table_entry.replace('_', " ");
    if let Some(item) = generate_by_name(&name) {
        return item;
    }
    let description = TROPHY_DESCRIPTIONS
        .iter()
        .find(|(entry, _)| *entry == table_entry)
        .map_or("A trophy from a defeated creature", |(_, text)| *text);
    Item::misc(name, description)
}

fn named_prefix<'a>(parts: &[&str], pool: &[&'a str], default: &'a str) -> &'a str {
    pool.iter()
        .find(|prefix| parts.contains(*prefix))
        .copied()
        .unwrap_or(default)
}

/// Uniform pick from a non-empty static pool.
fn pick<T: Copy>(pool: &[T], rng: &mut impl Rng) -> T {
    pool[rng.random_range(0..pool.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    fn mean_damage(quality: u32, trials: u32, rng: &mut StdRng) -> f64 {
        let total: u32 = (0..trials)
            .map(|_| {
                generate(ItemCategory::Weapon, quality, rng)
                    .unwrap()
                    .damage_bonus()
            })
            .sum();
        f64::from(total) / f64::from(trials)
    }

    #[test]
    fn weapon_damage_scales_with_quality_in_expectation() {
        let mut rng = test_rng();
        let low = mean_damage(0, 300, &mut rng);
        let high = mean_damage(4, 300, &mut rng);
        assert!(
            high > low,
            "expected quality 4 mean {high} to beat quality 0 mean {low}"
        );
    }

    #[test]
    fn quality_prefix_pools_are_bucketed() {
        let mut rng = test_rng();
        for _ in 0..100 {
            assert!(["crude", "basic"].contains(&quality_prefix(0, &mut rng)));
            assert!(["crude", "basic"].contains(&quality_prefix(1, &mut rng)));
            assert!(["basic", "fine", "masterwork"].contains(&quality_prefix(2, &mut rng)));
            assert!(["basic", "fine", "masterwork"].contains(&quality_prefix(3, &mut rng)));
            assert!(["masterwork", "legendary"].contains(&quality_prefix(4, &mut rng)));
            assert!(["masterwork", "legendary"].contains(&quality_prefix(7, &mut rng)));
        }
    }

    #[test]
    fn rarity_follows_quality_for_weapons_and_armor() {
        let mut rng = test_rng();
        for (quality, rarity) in [
            (0, Rarity::Common),
            (1, Rarity::Uncommon),
            (2, Rarity::Rare),
            (3, Rarity::Epic),
            (4, Rarity::Legendary),
        ] {
            let weapon = generate(ItemCategory::Weapon, quality, &mut rng).unwrap();
            assert_eq!(weapon.rarity, rarity, "weapon quality {quality}");
            let armor = generate(ItemCategory::Armor, quality, &mut rng).unwrap();
            assert_eq!(armor.rarity, rarity, "armor quality {quality}");
        }
    }

    #[test]
    fn meat_is_always_raw_and_half_value() {
        let mut rng = test_rng();
        let mut saw_meat = false;
        for _ in 0..200 {
            let food = generate(ItemCategory::Food, 0, &mut rng).unwrap();
            if food.name == "raw meat" {
                saw_meat = true;
                assert!(food.is_raw_food());
                let value = food.food_value();
                assert!((12.5..=20.0).contains(&value), "raw meat value {value}");
            } else {
                assert!(!food.is_raw_food());
            }
        }
        assert!(saw_meat);
    }

    #[test]
    fn non_generator_categories_return_none() {
        let mut rng = test_rng();
        assert!(generate(ItemCategory::QuestItem, 0, &mut rng).is_none());
        assert!(generate(ItemCategory::Misc, 0, &mut rng).is_none());
    }

    #[test]
    fn by_name_rebuilds_with_averaged_stats() {
        let sword = generate_by_name("masterwork silver sword").unwrap();
        assert_eq!(sword.name, "masterwork silver sword");
        assert_eq!(sword.damage_bonus(), 5);

        let bare = generate_by_name("sword").unwrap();
        assert_eq!(bare.name, "basic iron sword");
        assert_eq!(bare.damage_bonus(), 5);

        let shield = generate_by_name("fine bronze shield").unwrap();
        assert_eq!(shield.defense_bonus(), 3);
    }

    #[test]
    fn trophies_take_spaced_names_and_table_flavor() {
        let pelt = trophy("wolf_pelt");
        assert_eq!(pelt.name, "wolf pelt");
        assert_eq!(pelt.description, "A thick grey wolf pelt");
        assert_eq!(pelt.kind.category(), ItemCategory::Misc);

        // Entries that spell a generator item come back as that item.
        let meat = trophy("raw_meat");
        assert!(meat.is_raw_food());

        let unknown = trophy("odd_bauble");
        assert_eq!(unknown.name, "odd bauble");
        assert_eq!(unknown.description, "A trophy from a defeated creature");
    }

    #[test]
    fn by_name_handles_raw_meat_and_notes() {
        let meat = generate_by_name("raw meat").unwrap();
        assert!(meat.is_raw_food());
        assert_eq!(meat.food_value(), 16.0);

        let note = generate_by_name("mysterious note").unwrap();
        assert_eq!(note.name, "mysterious note");
        assert_eq!(note.rarity, Rarity::Quest);

        assert!(generate_by_name("strange doohickey").is_none());
    }
}
