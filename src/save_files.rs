//! Save-game discovery and serialization.
//!
//! Saves are lossy snapshots, not full object graphs: items are stored as
//! names (inventory keeps a (name, category) pair) and regenerated on load,
//! so rolled stats may differ; entities respawn from their kind defaults.
//! Player health, needs, story flags, discovered kinds, and the clock
//! restore exactly. Only the current location survives a reload; the rest
//! of the map regrows as the player walks.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::WILDWOOD_VERSION;
use crate::entity::{Entity, EntityKind};
use crate::item::{Item, ItemCategory, ItemHolder, ItemKind};
use crate::item_gen;
use crate::location::{Location, LocationKind};
use crate::story::StoryProgress;
use crate::world::World;

pub const SAVE_DIR: &str = "saves";
pub const AUTOSAVE_SLOT: &str = "autosave";

static ACTIVE_SAVE_DIR: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    let dir = std::env::var("WILDWOOD_SAVE_DIR")
        .map_or_else(|_| PathBuf::from(SAVE_DIR), PathBuf::from);
    RwLock::new(dir)
});

/// Serializes tests that repoint the active save directory.
#[cfg(test)]
pub(crate) static DIR_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Return the active save directory.
pub fn save_dir() -> PathBuf {
    ACTIVE_SAVE_DIR
        .read()
        .map(|guard| guard.clone())
        .unwrap_or_else(|_| PathBuf::from(SAVE_DIR))
}

/// Set the active save directory.
pub fn set_save_dir(path: PathBuf) {
    if let Ok(mut guard) = ACTIVE_SAVE_DIR.write() {
        *guard = path;
    }
}

/// Flatten a user-supplied slot name into something filesystem-friendly.
pub fn sanitize_slot(raw: &str) -> String {
    let slot: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slot = slot.trim_matches('-').to_string();
    if slot.is_empty() { "save".to_string() } else { slot }
}

fn slot_path(dir: &Path, slot: &str) -> PathBuf {
    dir.join(format!("{slot}-wildwood-{WILDWOOD_VERSION}.ron"))
}

/// Player fields that survive a save. Bladder does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub health: u32,
    pub hunger: f32,
    pub thirst: f32,
    pub energy: f32,
    pub inventory: Vec<(String, ItemCategory)>,
    pub weapon: Option<String>,
    pub armor: Option<String>,
    pub accessory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationData {
    pub kind: LocationKind,
    pub items: Vec<String>,
    pub entities: Vec<String>,
}

/// The serialized snapshot written to disk as RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: String,
    pub player: PlayerData,
    pub location: LocationData,
    pub story: StoryProgress,
    pub discovered_kinds: Vec<LocationKind>,
    pub clock_minutes: u64,
}

impl SaveData {
    /// Snapshot the parts of the world a save keeps.
    ///
    /// # Errors
    /// - if the current location id is missing from the world
    pub fn from_world(world: &World) -> Result<SaveData> {
        let location = world.current_location()?;
        let mut discovered_kinds: Vec<LocationKind> =
            world.discovered_kinds.iter().copied().collect();
        discovered_kinds.sort_by_key(|kind| kind.display_name());

        Ok(SaveData {
            version: WILDWOOD_VERSION.to_string(),
            player: PlayerData {
                health: world.player.health,
                hunger: world.player.hunger,
                thirst: world.player.thirst,
                energy: world.player.energy,
                inventory: world
                    .player
                    .inventory
                    .iter()
                    .map(|item| (item.name.clone(), item.kind.category()))
                    .collect(),
                weapon: world.player.weapon.as_ref().map(|i| i.name.clone()),
                armor: world.player.armor.as_ref().map(|i| i.name.clone()),
                accessory: world.player.accessory.as_ref().map(|i| i.name.clone()),
            },
            location: LocationData {
                kind: location.kind,
                items: location.items.iter().map(|i| i.name.clone()).collect(),
                entities: location.entities.iter().map(|e| e.name.clone()).collect(),
            },
            story: world.story.clone(),
            discovered_kinds,
            clock_minutes: world.clock.minutes(),
        })
    }

    /// Rebuild a playable world from the snapshot. Generated items come
    /// back with average stats; unrecognized entity names are skipped.
    pub fn into_world(self) -> World {
        let mut world = World::new_game();

        world.player.health = self.player.health;
        world.player.hunger = self.player.hunger;
        world.player.thirst = self.player.thirst;
        world.player.energy = self.player.energy;
        world.player.inventory = self
            .player
            .inventory
            .into_iter()
            .map(|(name, category)| restore_item(&name, category))
            .collect();
        world.player.weapon = self.player.weapon.map(|name| restore_gear(&name, ItemCategory::Weapon));
        world.player.armor = self.player.armor.map(|name| restore_gear(&name, ItemCategory::Armor));
        world.player.accessory = self.player.accessory.map(|name| restore_gear(&name, ItemCategory::Misc));

        let mut location = Location::new(self.location.kind);
        for name in self.location.items {
            location.add_item(restore_item(&name, guess_category(&name)));
        }
        for name in self.location.entities {
            match restore_entity(&name) {
                Some(entity) => location.add_entity(entity),
                None => warn!("skipping unrecognized saved entity '{name}'"),
            }
        }

        world.current = location.id;
        world.locations.clear();
        world.locations.insert(location.id, location);

        world.story = self.story;
        world.discovered_kinds = self.discovered_kinds.into_iter().collect();
        world.clock.set_minutes(self.clock_minutes);
        world
    }
}

/// Best-effort item regeneration from a saved name plus its category.
fn restore_item(name: &str, category: ItemCategory) -> Item {
    if let Some(item) = item_gen::generate_by_name(name) {
        return item;
    }
    match category {
        ItemCategory::Food => Item::new(
            name,
            "Provisions recovered from your pack",
            ItemKind::Food {
                food_value: 20.0,
                raw: name.contains("raw"),
            },
        ),
        ItemCategory::Weapon => Item::new(
            name,
            "A weathered weapon",
            ItemKind::Weapon { damage_bonus: 3 },
        ),
        ItemCategory::Armor => Item::new(
            name,
            "A weathered piece of armor",
            ItemKind::Armor { defense_bonus: 2 },
        ),
        ItemCategory::QuestItem => Item::quest(name, "It seems important."),
        ItemCategory::Misc => Item::misc(name, "It looks unremarkable."),
    }
}

fn restore_gear(name: &str, category: ItemCategory) -> Item {
    restore_item(name, category)
}

/// Category inference for location items, which are saved as bare names.
fn guess_category(name: &str) -> ItemCategory {
    item_gen::generate_by_name(name)
        .map_or(ItemCategory::Misc, |item| item.kind.category())
}

/// Respawn a saved entity from the kind its name carries.
fn restore_entity(name: &str) -> Option<Entity> {
    const KINDS: [EntityKind; 6] = [
        EntityKind::DeadBody,
        EntityKind::Wolf,
        EntityKind::Bandit,
        EntityKind::Spider,
        EntityKind::Bat,
        EntityKind::Troll,
    ];
    let kind = KINDS
        .iter()
        .copied()
        .find(|kind| name.contains(kind.base_name()))?;
    let mut entity = Entity::spawn_basic(kind);
    entity.name = name.to_string();
    Some(entity)
}

/// Write a save slot into `dir`.
///
/// # Errors
/// - if the directory cannot be created, the snapshot cannot be serialized,
///   or the file cannot be written
pub fn save_game_to(dir: &Path, world: &World, slot: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating save directory {}", dir.display()))?;
    let data = SaveData::from_world(world)?;
    let raw = ron::ser::to_string(&data).context("serializing save data")?;
    let path = slot_path(dir, slot);
    fs::write(&path, raw).with_context(|| format!("writing save file {}", path.display()))?;
    info!("saved game to {}", path.display());
    Ok(path)
}

/// Read a save slot from `dir`, preferring the current version's file and
/// falling back to any older one with the same slot name.
///
/// # Errors
/// - if no file exists for the slot, or it cannot be read or parsed
pub fn load_game_from(dir: &Path, slot: &str) -> Result<SaveData> {
    let preferred = slot_path(dir, slot);
    let path = if preferred.exists() {
        preferred
    } else {
        collect_slots(dir)?
            .into_iter()
            .find(|s| s.slot == slot)
            .map(|s| s.path)
            .ok_or_else(|| anyhow!("no save file found for slot '{slot}'"))?
    };
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading save file {}", path.display()))?;
    let data: SaveData =
        ron::from_str(&raw).with_context(|| format!("parsing save file {}", path.display()))?;
    if data.version != WILDWOOD_VERSION {
        warn!(
            "loaded save '{slot}' from v{}, current version is v{WILDWOOD_VERSION}",
            data.version
        );
    }
    Ok(data)
}

/// Write a save slot into the active save directory.
///
/// # Errors
/// - as [`save_game_to`]
pub fn save_game(world: &World, slot: &str) -> Result<PathBuf> {
    save_game_to(&save_dir(), world, slot)
}

/// Read a save slot from the active save directory.
///
/// # Errors
/// - as [`load_game_from`]
pub fn load_game(slot: &str) -> Result<SaveData> {
    load_game_from(&save_dir(), slot)
}

/// Write the day-rollover autosave.
///
/// # Errors
/// - as [`save_game_to`]
pub fn autosave(world: &World) -> Result<PathBuf> {
    save_game_to(&save_dir(), world, AUTOSAVE_SLOT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFileStatus {
    Ready,
    VersionMismatch { save_version: String },
    Corrupted { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFileEntry {
    pub slot: String,
    pub version: String,
    pub path: PathBuf,
    pub status: SaveFileStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SaveSlot {
    slot: String,
    version: String,
    path: PathBuf,
}

/// Discover save files in `dir` without loading any of them into the live
/// world, reporting a status per file.
///
/// # Errors
/// - if the directory contents cannot be read or enumerated
pub fn list_saves_in(dir: &Path) -> Result<Vec<SaveFileEntry>> {
    let slots = collect_slots(dir)?;
    Ok(slots.into_iter().map(entry_for_slot).collect())
}

/// Discover save files in the active save directory.
///
/// # Errors
/// - as [`list_saves_in`]
pub fn list_saves() -> Result<Vec<SaveFileEntry>> {
    list_saves_in(&save_dir())
}

fn collect_slots(dir: &Path) -> Result<Vec<SaveSlot>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut slots = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("enumerating {}", dir.display()))?;
        if let Some(slot) = slot_from_entry(&entry) {
            slots.push(slot);
        }
    }
    slots.sort_by(|a, b| a.slot.cmp(&b.slot).then(b.version.cmp(&a.version)));
    Ok(slots)
}

fn slot_from_entry(entry: &fs::DirEntry) -> Option<SaveSlot> {
    let path = entry.path();
    if !path.is_file() {
        return None;
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some("ron") {
        return None;
    }
    let stem = path.file_stem().and_then(|stem| stem.to_str())?;
    let (slot, version) = stem.rsplit_once("-wildwood-")?;
    if slot.is_empty() {
        return None;
    }
    Some(SaveSlot {
        slot: slot.to_string(),
        version: version.to_string(),
        path,
    })
}

fn entry_for_slot(slot: SaveSlot) -> SaveFileEntry {
    let mut version = slot.version.clone();
    let status = match fs::read_to_string(&slot.path) {
        Ok(raw) => match ron::from_str::<SaveData>(&raw) {
            Ok(data) => {
                version.clone_from(&data.version);
                if data.version == WILDWOOD_VERSION {
                    SaveFileStatus::Ready
                } else {
                    SaveFileStatus::VersionMismatch {
                        save_version: data.version,
                    }
                }
            }
            Err(err) => {
                warn!("failed to parse save '{}' ({}): {err}", slot.slot, slot.path.display());
                SaveFileStatus::Corrupted {
                    message: format!("parse error: {}", trim_error(&err)),
                }
            }
        },
        Err(err) => {
            warn!("failed to read save '{}' ({}): {err}", slot.slot, slot.path.display());
            SaveFileStatus::Corrupted {
                message: format!("read error: {}", trim_error(&err)),
            }
        }
    };

    SaveFileEntry {
        slot: slot.slot,
        version,
        path: slot.path,
        status,
    }
}

/// Clamp verbose parser errors to a readable length.
fn trim_error(err: &impl ToString) -> String {
    let message = err.to_string();
    if message.chars().count() <= 120 {
        return message;
    }
    let mut trimmed: String = message.chars().take(117).collect();
    trimmed.push_str("...");
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::tempdir;

    #[test]
    fn round_trip_restores_exact_scalar_state() {
        let dir = tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(61);

        let mut world = World::new_game();
        world.player.health = 77;
        world.player.hunger = 63.5;
        let _ = world.story.on_enter_location(LocationKind::Cave);
        world.clock.set_minutes(2900);
        world.player.add_item(item_gen::generate_by_name("sword").unwrap());
        world.player.add_item(Item::new(
            "bread",
            "A crusty loaf",
            ItemKind::Food { food_value: 20.0, raw: false },
        ));
        world
            .current_location_mut()
            .unwrap()
            .add_item(Item::misc("crystal", "A glowing crystal protrudes from the wall"));
        world
            .current_location_mut()
            .unwrap()
            .add_entity(Entity::spawn(EntityKind::Wolf, &mut rng));

        save_game_to(dir.path(), &world, "trip").unwrap();
        let restored = load_game_from(dir.path(), "trip").unwrap().into_world();

        assert_eq!(restored.player.health, 77);
        assert!((restored.player.hunger - 63.5).abs() < f32::EPSILON);
        assert!(restored.story.chapters.contains("mysteries"));
        assert!(restored.story.milestones.cave_discovered);
        assert_eq!(restored.clock.minutes(), 2900);
        assert_eq!(restored.player.inventory.len(), 2);

        let location = restored.current_location().unwrap();
        assert_eq!(location.kind, LocationKind::Meadow);
        // The meadow's note plus the crystal, both saved by name.
        assert_eq!(location.items.len(), 2);
        assert!(location.items.iter().any(|item| item.name == "crystal"));
        assert_eq!(location.entities.len(), 1);
        assert_eq!(location.entities[0].kind, EntityKind::Wolf);
    }

    #[test]
    fn regenerated_weapons_keep_their_names() {
        let dir = tempdir().unwrap();
        let mut world = World::new_game();
        world.player.weapon = item_gen::generate_by_name("masterwork silver sword");

        save_game_to(dir.path(), &world, "gear").unwrap();
        let restored = load_game_from(dir.path(), "gear").unwrap().into_world();

        let weapon = restored.player.weapon.unwrap();
        assert_eq!(weapon.name, "masterwork silver sword");
        assert!(weapon.damage_bonus() > 0);
    }

    #[test]
    fn listing_reports_status_per_file() {
        let dir = tempdir().unwrap();
        let world = World::new_game();
        save_game_to(dir.path(), &world, "alpha").unwrap();

        let mut old = SaveData::from_world(&world).unwrap();
        old.version = "0.1.0".to_string();
        let raw = ron::ser::to_string(&old).unwrap();
        fs::write(dir.path().join("beta-wildwood-0.1.0.ron"), raw).unwrap();

        fs::write(dir.path().join("gamma-wildwood-9.9.9.ron"), "not ron at all").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let entries = list_saves_in(dir.path()).unwrap();
        assert_eq!(entries.len(), 3);

        let find = |slot: &str| entries.iter().find(|e| e.slot == slot).unwrap();
        assert_eq!(find("alpha").status, SaveFileStatus::Ready);
        assert!(matches!(find("beta").status, SaveFileStatus::VersionMismatch { .. }));
        assert!(matches!(find("gamma").status, SaveFileStatus::Corrupted { .. }));
    }

    #[test]
    fn listing_a_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nowhere");
        assert!(list_saves_in(&missing).unwrap().is_empty());
    }

    #[test]
    fn loading_a_missing_slot_fails_cleanly() {
        let dir = tempdir().unwrap();
        assert!(load_game_from(dir.path(), "ghost").is_err());
    }

    #[test]
    fn slot_names_are_sanitized() {
        assert_eq!(sanitize_slot("My Save!"), "my-save");
        assert_eq!(sanitize_slot("  "), "save");
        assert_eq!(sanitize_slot("day2"), "day2");
    }
}
