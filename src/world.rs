//! Runtime state of the generated world.
//!
//! `World` owns every location the player has uncovered, the player, the
//! clock, and the progression trackers. Locations are generated lazily:
//! walking through an unlinked exit weaves a new one of a random kind and
//! links both directed edges explicitly.

use std::collections::{HashMap, HashSet};

use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use rand::Rng;
use rand::prelude::IndexedRandom;
use uuid::Uuid;

use crate::achievements::AchievementLog;
use crate::clock::GameClock;
use crate::entity::{Entity, EntityKind};
use crate::events;
use crate::item::{Item, ItemHolder};
use crate::location::{Direction, Location, LocationKind};
use crate::player::Player;
use crate::save_files;
use crate::story::{Journal, StoryProgress};

/// Result of a completed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub kind: LocationKind,
    /// True when the destination was generated by this move.
    pub grew: bool,
}

/// One line of per-turn upkeep output, tagged by how it should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpkeepLine {
    /// Day rollover notices and ambient flavor events.
    Ambient(String),
    /// Needs hitting a threshold, ongoing effect damage.
    Warning(String),
}

/// Complete state of the running game.
#[derive(Debug)]
pub struct World {
    pub locations: HashMap<Uuid, Location>,
    pub current: Uuid,
    pub player: Player,
    pub clock: GameClock,
    pub story: StoryProgress,
    pub achievements: AchievementLog,
    pub journal: Journal,
    pub discovered_kinds: HashSet<LocationKind>,
}

impl World {
    /// Create a fresh world: a scripted starting meadow holding the
    /// mysterious note, an unharmed player, and a clock at dawn of day one.
    pub fn new_game() -> World {
        let mut meadow = Location::new(LocationKind::Meadow);
        meadow.description =
            "You find yourself in a peaceful meadow surrounded by tall grass...".to_string();
        meadow.add_item(Item::quest(
            "mysterious note",
            "An old parchment with elegant script",
        ));
        let current = meadow.id;

        let mut locations = HashMap::new();
        locations.insert(current, meadow);
        let mut discovered_kinds = HashSet::new();
        discovered_kinds.insert(LocationKind::Meadow);

        let world = World {
            locations,
            current,
            player: Player::new(),
            clock: GameClock::new(),
            story: StoryProgress::new(),
            achievements: AchievementLog::new(),
            journal: Journal::new(),
            discovered_kinds,
        };
        info!("new world created; the journey begins in a quiet meadow");
        world
    }

    /// Obtain a reference to the location the player occupies.
    /// # Errors
    /// - if the current location id is not present in the world
    pub fn current_location(&self) -> Result<&Location> {
        self.locations
            .get(&self.current)
            .ok_or_else(|| anyhow!("current location id ({}) not found in world", self.current))
    }

    /// Obtain a mutable reference to the location the player occupies.
    /// # Errors
    /// - if the current location id is not present in the world
    pub fn current_location_mut(&mut self) -> Result<&mut Location> {
        self.locations
            .get_mut(&self.current)
            .ok_or_else(|| anyhow!("current location id ({}) not found in world", self.current))
    }

    /// Move through an exit, weaving a new location when the direction is
    /// unlinked. Every direction leads somewhere; moves cannot fail for
    /// valid world state.
    ///
    /// # Errors
    /// - if the current location id is not present in the world
    pub fn move_player(&mut self, direction: Direction, rng: &mut impl Rng) -> Result<MoveReport> {
        let origin_id = self.current;
        let linked = self.current_location()?.exits.get(&direction).copied();

        let (destination, grew) = match linked {
            Some(id) => (id, false),
            None => {
                let kind = LocationKind::ALL
                    .choose(rng)
                    .copied()
                    .unwrap_or(LocationKind::Meadow);
                let mut fresh = generate_location(kind, rng);
                let fresh_id = fresh.id;
                fresh.exits.insert(direction.opposite(), origin_id);
                self.locations.insert(fresh_id, fresh);
                if let Some(origin) = self.locations.get_mut(&origin_id) {
                    origin.exits.insert(direction, fresh_id);
                }
                (fresh_id, true)
            }
        };

        self.current = destination;
        let kind = self.current_location()?.kind;
        self.discovered_kinds.insert(kind);
        info!("player moved {direction} into a {kind} ({destination})");
        Ok(MoveReport { kind, grew })
    }

    /// Advance the clock and run the per-turn world upkeep: autosave on day
    /// rollover, needs decay and status effect ticks (once per call, however
    /// many minutes passed), then an ambient event roll. Returns the lines to
    /// surface this turn.
    pub fn advance_time(&mut self, minutes: u64, rng: &mut impl Rng) -> Vec<UpkeepLine> {
        let mut lines = Vec::new();

        if self.clock.advance(minutes) {
            match save_files::autosave(self) {
                Ok(path) => {
                    info!(
                        "day {} autosave written to {}",
                        self.clock.day_number(),
                        path.display()
                    );
                    lines.push(UpkeepLine::Ambient(
                        "A new day begins... Game auto-saved.".to_string(),
                    ));
                }
                Err(err) => {
                    warn!("autosave failed: {err:#}");
                    lines.push(UpkeepLine::Ambient("A new day begins...".to_string()));
                }
            }
        }

        for warning in self.player.update_needs() {
            lines.push(UpkeepLine::Warning(warning));
        }
        for line in self.player.tick_effects() {
            lines.push(UpkeepLine::Warning(line));
        }

        let kind = self
            .current_location()
            .map_or(LocationKind::Meadow, |loc| loc.kind);
        if let Some(event) = events::check(self.clock.hour(), kind, rng) {
            debug!("ambient event fired: {event}");
            lines.push(UpkeepLine::Ambient(event.to_string()));
        }

        lines
    }
}

/// Generate a location of the given kind, rolling its ambience sentence and
/// the kind's fixed embed chances.
pub fn generate_location(kind: LocationKind, rng: &mut impl Rng) -> Location {
    let mut location = Location::new(kind);
    location.ambience = roll_ambience(kind, rng);

    match kind {
        LocationKind::Meadow => {
            if rng.random_bool(0.3) {
                location.add_entity(Entity::spawn(EntityKind::DeadBody, rng));
            }
            if rng.random_bool(0.2) {
                location.add_item(Item::misc("flower", "A beautiful wildflower"));
            }
        }
        LocationKind::Forest => {
            if rng.random_bool(0.4) {
                location.add_item(Item::misc(
                    "mushroom",
                    "A mysterious looking mushroom grows at the base of a tree",
                ));
            }
            if rng.random_bool(0.3) {
                location.add_entity(
                    Entity::spawn(EntityKind::Wolf, rng)
                        .with_description("A grey wolf watches you cautiously"),
                );
            }
        }
        LocationKind::Cave => {
            if rng.random_bool(0.4) {
                location.add_item(Item::misc(
                    "crystal",
                    "A glowing crystal protrudes from the wall",
                ));
            }
            if rng.random_bool(0.2) {
                location.add_entity(Entity::spawn(EntityKind::Bat, rng));
            }
        }
    }

    debug!(
        "generated {kind} location with {} item(s), {} entit(ies)",
        location.items.len(),
        location.entities.len()
    );
    location
}

fn roll_ambience(kind: LocationKind, rng: &mut impl Rng) -> String {
    let (features, sounds): (&[&str], &[&str]) = match kind {
        LocationKind::Meadow => (
            &["wildflowers", "tall grass", "small rocks"],
            &["birds chirping", "grass rustling", "insects buzzing"],
        ),
        LocationKind::Forest => (
            &["tall trees", "fallen logs", "mushrooms"],
            &["leaves rustling", "branches creaking", "birds calling"],
        ),
        LocationKind::Cave => (
            &["stalactites", "glowing crystals", "rock formations"],
            &["water dripping", "distant echoes", "wind whistling"],
        ),
    };
    let feature = features.choose(rng).copied().unwrap_or("quiet ground");
    let sound = sounds.choose(rng).copied().unwrap_or("nothing at all");
    format!("A {kind} with {feature}. You can hear {sound}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::tempdir;

    #[test]
    fn new_game_seeds_the_meadow_with_the_note() {
        let world = World::new_game();
        let meadow = world.current_location().unwrap();
        assert_eq!(meadow.kind, LocationKind::Meadow);
        assert_eq!(meadow.name, "A peaceful meadow");
        assert!(meadow.items.iter().any(|item| item.name == "mysterious note"));
        assert!(world.player.inventory.is_empty());
        assert_eq!(world.clock.day_number(), 1);
        assert!(world.discovered_kinds.contains(&LocationKind::Meadow));
    }

    #[test]
    fn moving_through_an_unlinked_exit_grows_the_world() {
        let mut rng = StdRng::seed_from_u64(41);
        let mut world = World::new_game();
        let origin = world.current;

        let report = world.move_player(Direction::North, &mut rng).unwrap();
        assert!(report.grew);
        assert_eq!(world.locations.len(), 2);
        let here = world.current_location().unwrap();
        assert_eq!(here.exits.get(&Direction::South), Some(&origin));

        // Walking back uses the explicit reverse edge instead of growing.
        let report = world.move_player(Direction::South, &mut rng).unwrap();
        assert!(!report.grew);
        assert_eq!(world.current, origin);
        assert_eq!(world.locations.len(), 2);
    }

    #[test]
    fn forest_embeds_roll_near_their_fixed_rates() {
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 600;
        let mut mushrooms = 0;
        let mut wolves = 0;
        for _ in 0..trials {
            let forest = generate_location(LocationKind::Forest, &mut rng);
            if forest.items.iter().any(|item| item.name == "mushroom") {
                mushrooms += 1;
            }
            if forest.entities.iter().any(|e| e.name.contains("wolf")) {
                wolves += 1;
            }
        }
        let mushroom_rate = f64::from(mushrooms) / f64::from(trials);
        let wolf_rate = f64::from(wolves) / f64::from(trials);
        assert!((0.34..=0.46).contains(&mushroom_rate), "rate {mushroom_rate}");
        assert!((0.24..=0.36).contains(&wolf_rate), "rate {wolf_rate}");
    }

    #[test]
    fn ambience_sentence_names_the_kind() {
        let mut rng = StdRng::seed_from_u64(43);
        let cave = generate_location(LocationKind::Cave, &mut rng);
        assert!(cave.ambience.starts_with("A cave with "));
        assert!(cave.ambience.contains(". You can hear "));
        assert!(cave.ambience.ends_with('.'));
    }

    #[test]
    fn day_rollover_autosaves_and_decays_needs_once() {
        let _lock = save_files::DIR_TEST_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        save_files::set_save_dir(dir.path().to_path_buf());

        let mut rng = StdRng::seed_from_u64(44);
        let mut world = World::new_game();
        let lines = world.advance_time(1440, &mut rng);

        assert!(lines.contains(&UpkeepLine::Ambient(
            "A new day begins... Game auto-saved.".to_string()
        )));
        assert_eq!(world.clock.day_number(), 2);
        assert!((world.player.hunger - 99.5).abs() < f32::EPSILON);
        assert!((world.player.thirst - 99.0).abs() < f32::EPSILON);

        let autosaved: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .collect();
        assert!(!autosaved.is_empty());
    }

    #[test]
    fn status_effects_tick_during_upkeep() {
        use crate::health::StatusEffect;

        let mut rng = StdRng::seed_from_u64(45);
        let mut world = World::new_game();
        world.player.apply_effect(StatusEffect::Poison, 1);

        let lines = world.advance_time(10, &mut rng);

        assert!(lines.contains(&UpkeepLine::Warning(
            "The poison effect has worn off!".to_string()
        )));
        assert!(world.player.status_effects.is_empty());
        assert!(world.player.health < 100);
    }
}
