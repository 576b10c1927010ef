//! Location Module
//!
//! Locations own their items and entities by value; moving something in or
//! out of a location moves the value. Exits are directed edges keyed by
//! compass direction, holding only the target location id. Unlinked
//! directions show fixed horizon flavor by terrain kind.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::entity::Entity;
use crate::item::{Item, ItemHolder};

/// Terrain kinds the fabric can weave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    Meadow,
    Forest,
    Cave,
}

impl LocationKind {
    pub const ALL: [LocationKind; 3] = [
        LocationKind::Meadow,
        LocationKind::Forest,
        LocationKind::Cave,
    ];

    /// Short display name for headers and connected-exit lines.
    pub fn display_name(self) -> &'static str {
        match self {
            LocationKind::Meadow => "A peaceful meadow",
            LocationKind::Forest => "A dense forest",
            LocationKind::Cave => "A dark cave",
        }
    }

    pub fn base_description(self) -> &'static str {
        match self {
            LocationKind::Meadow => {
                "You are in a peaceful meadow. Tall grass sways in the gentle breeze."
            }
            LocationKind::Forest => {
                "You are in a dense forest. Tall trees surround you, their branches swaying gently overhead."
            }
            LocationKind::Cave => "You are in a dark cave. The air is cool and damp.",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LocationKind::Meadow => "meadow",
            LocationKind::Forest => "forest",
            LocationKind::Cave => "cave",
        };
        write!(f, "{label}")
    }
}

/// Compass directions for exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown direction: '{0}'")]
pub struct DirectionParseError(String);

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "s" | "south" => Ok(Direction::South),
            "e" | "east" => Ok(Direction::East),
            "w" | "west" => Ok(Direction::West),
            other => Err(DirectionParseError(other.to_string())),
        }
    }
}

/// A single place in the world.
///
/// `name` is the short phrase shown in headers ("A peaceful meadow"),
/// `description` the fixed terrain text, `ambience` the generated sentence
/// surfaced by the survey command.
#[derive(Debug, Clone)]
pub struct Location {
    pub id: Uuid,
    pub kind: LocationKind,
    pub name: String,
    pub description: String,
    pub ambience: String,
    pub items: Vec<Item>,
    pub entities: Vec<Entity>,
    pub exits: HashMap<Direction, Uuid>,
}

impl Location {
    pub fn new(kind: LocationKind) -> Self {
        Location {
            id: Uuid::new_v4(),
            kind,
            name: kind.display_name().to_string(),
            description: kind.base_description().to_string(),
            ambience: String::new(),
            items: Vec::new(),
            entities: Vec::new(),
            exits: HashMap::new(),
        }
    }

    /// Flavor line for a direction with no exit yet.
    pub fn horizon_flavor(&self, direction: Direction) -> &'static str {
        match (self.kind, direction) {
            (LocationKind::Meadow, Direction::North) => {
                "Rolling hills stretch into the distance."
            }
            (LocationKind::Meadow, Direction::South) => {
                "The meadow continues, dotted with wildflowers."
            }
            (LocationKind::Meadow, Direction::East) => "A dense forest looms ahead.",
            (LocationKind::Meadow, Direction::West) => "The grass sways in the breeze.",
            (LocationKind::Forest, Direction::North) => "The forest grows darker and thicker.",
            (LocationKind::Forest, Direction::South) => "Trees thin out towards a meadow.",
            (LocationKind::Forest, Direction::East) => "Ancient trees block most of the light.",
            (LocationKind::Forest, Direction::West) => {
                "You see a path winding through the trees."
            }
            (LocationKind::Cave, Direction::North) => "The cave walls glisten with moisture.",
            (LocationKind::Cave, Direction::South) => "The cave entrance lets in some light.",
            (LocationKind::Cave, Direction::East) => "The cave extends into darkness.",
            (LocationKind::Cave, Direction::West) => {
                "Crystal formations catch what little light there is."
            }
        }
    }

    /// Close-look lines for the survey command: ambience, then a few fixed
    /// environmental details for the terrain, then whatever is lying around.
    pub fn survey_details(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.ambience.is_empty() {
            lines.push(self.ambience.clone());
        }
        let environment: &[&str] = match self.kind {
            LocationKind::Meadow => &[
                "Butterflies flit between the wildflowers.",
                "A gentle breeze rustles through the tall grass.",
                "Small trails wind through the vegetation.",
            ],
            LocationKind::Forest => &[
                "Sunlight filters through the canopy above.",
                "The forest floor is covered in fallen leaves.",
                "Bird songs echo through the trees.",
            ],
            LocationKind::Cave => &[
                "Water drips somewhere in the darkness.",
                "The air is cool and damp.",
                "Crystals glint in the cave walls.",
            ],
        };
        lines.extend(environment.iter().map(|line| (*line).to_string()));
        if !self.items.is_empty() {
            let names: Vec<&str> = self.items.iter().map(|item| item.name.as_str()).collect();
            lines.push(format!("You notice {}.", names.join(", ")));
        }
        if !self.entities.is_empty() {
            let names: Vec<&str> = self
                .entities
                .iter()
                .map(|entity| entity.name.as_str())
                .collect();
            lines.push(format!("You see {}.", names.join(", ")));
        }
        lines
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Removes and returns the entity with the given id, preserving the
    /// order of the rest.
    pub fn remove_entity(&mut self, id: Uuid) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn find_entity(&self, id: Uuid) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: Uuid) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Empties the entity's pockets onto the location floor and reports what
    /// turned up. Returns `None` when no such entity is present.
    pub fn search_entity(&mut self, id: Uuid) -> Option<String> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        let found: Vec<Item> = self.entities[idx].inventory.drain(..).collect();
        if found.is_empty() {
            return Some(self.entities[idx].empty_search_message());
        }
        let names: Vec<&str> = found.iter().map(|item| item.name.as_str()).collect();
        let message = format!(
            "You search the {} and find: {}",
            self.entities[idx].name,
            names.join(", ")
        );
        self.items.extend(found);
        Some(message)
    }

    /// A location is safe when nothing hostile is lurking in it.
    pub fn is_safe(&self) -> bool {
        !self.entities.iter().any(|e| e.hostile)
    }
}

impl ItemHolder for Location {
    fn items(&self) -> &[Item] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    #[test]
    fn directions_parse_long_and_short_forms() {
        assert_eq!("north".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("N".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("w".parse::<Direction>(), Ok(Direction::West));
        assert!("up".parse::<Direction>().is_err());
        assert_eq!(Direction::East.opposite(), Direction::West);
    }

    #[test]
    fn horizon_flavor_varies_by_terrain() {
        let meadow = Location::new(LocationKind::Meadow);
        let cave = Location::new(LocationKind::Cave);
        assert_eq!(
            meadow.horizon_flavor(Direction::East),
            "A dense forest looms ahead."
        );
        assert_eq!(
            cave.horizon_flavor(Direction::West),
            "Crystal formations catch what little light there is."
        );
    }

    #[test]
    fn survey_lists_ambience_environment_and_contents() {
        let mut loc = Location::new(LocationKind::Forest);
        loc.ambience = "A forest with tall trees. You can hear birds calling.".to_string();
        loc.add_item(Item::misc("wild mushroom", "A brown mushroom"));
        loc.add_entity(Entity::spawn_basic(EntityKind::Wolf));
        let lines = loc.survey_details();
        assert_eq!(lines[0], loc.ambience);
        assert!(lines.contains(&"Sunlight filters through the canopy above.".to_string()));
        assert!(lines.contains(&"You notice wild mushroom.".to_string()));
        assert!(lines.contains(&"You see wolf.".to_string()));
    }

    #[test]
    fn searching_moves_pockets_to_the_floor() {
        let mut loc = Location::new(LocationKind::Meadow);
        let mut body = Entity::spawn_basic(EntityKind::DeadBody);
        let coins = Item::misc("gold coins", "A handful of golden coins");
        let coins_id = coins.id;
        body.add_item(coins);
        let body_id = body.id;
        loc.add_entity(body);

        let message = loc.search_entity(body_id).unwrap();
        assert_eq!(message, "You search the dead body and find: gold coins");
        assert!(loc.contains_item(coins_id));
        assert!(loc.find_entity(body_id).unwrap().inventory.is_empty());

        // A second search finds nothing new.
        let message = loc.search_entity(body_id).unwrap();
        assert_eq!(
            message,
            "You search the corpse thoroughly but find nothing of value."
        );
    }

    #[test]
    fn safety_follows_hostility() {
        let mut loc = Location::new(LocationKind::Forest);
        assert!(loc.is_safe());
        let wolf = Entity::spawn_basic(EntityKind::Wolf);
        let wolf_id = wolf.id;
        loc.add_entity(wolf);
        assert!(!loc.is_safe());
        loc.entity_mut(wolf_id).unwrap().hostile = false;
        assert!(loc.is_safe());
    }
}
