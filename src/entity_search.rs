//! Name matching for user input.
//!
//! Most handlers start from a string the player typed and need the id of a
//! nearby item or creature. Matching lives here so every command resolves
//! names the same way: lowercase the input, then take the first item or
//! entity whose name contains it. Callers pick a [`SearchScope`] to say
//! whether the ground, the pack, or both are fair game.

use thiserror::Error;
use uuid::Uuid;

use crate::item::Item;
use crate::world::World;

/// Where an item search is allowed to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Items on the ground in the current location.
    Location,
    /// Items in the player's pack.
    Inventory,
    /// Anything in view: the pack first, then the ground.
    Visible,
}

/// Why a search returned no id.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("nothing here matches '{0}'")]
    NoMatchingName(String),
    #[error("current location id ({0}) not found in world")]
    InvalidLocationId(Uuid),
}

/// Find an item whose name contains `pattern` and return its id.
///
/// # Errors
/// - [`SearchError::NoMatchingName`] when nothing in scope matches
/// - [`SearchError::InvalidLocationId`] when the current location is gone
pub fn find_item_match(
    world: &World,
    pattern: &str,
    scope: SearchScope,
) -> Result<Uuid, SearchError> {
    let lc_term = pattern.to_lowercase();
    let ground = || -> Result<_, SearchError> {
        let location = world
            .current_location()
            .map_err(|_| SearchError::InvalidLocationId(world.current))?;
        Ok(match_in(&location.items, &lc_term))
    };

    let found = match scope {
        SearchScope::Location => ground()?,
        SearchScope::Inventory => match_in(&world.player.inventory, &lc_term),
        SearchScope::Visible => match match_in(&world.player.inventory, &lc_term) {
            Some(id) => Some(id),
            None => ground()?,
        },
    };

    found.ok_or_else(|| SearchError::NoMatchingName(pattern.to_string()))
}

/// Find a creature in the current location whose name contains `pattern`.
///
/// # Errors
/// - [`SearchError::NoMatchingName`] when no creature here matches
/// - [`SearchError::InvalidLocationId`] when the current location is gone
pub fn find_entity_match(world: &World, pattern: &str) -> Result<Uuid, SearchError> {
    let lc_term = pattern.to_lowercase();
    let location = world
        .current_location()
        .map_err(|_| SearchError::InvalidLocationId(world.current))?;
    location
        .entities
        .iter()
        .find(|entity| entity.name.to_lowercase().contains(&lc_term))
        .map(|entity| entity.id)
        .ok_or_else(|| SearchError::NoMatchingName(pattern.to_string()))
}

/// First item whose lowercased name contains the already-lowercased term.
fn match_in(items: &[Item], lc_term: &str) -> Option<Uuid> {
    items
        .iter()
        .find(|item| item.name.to_lowercase().contains(lc_term))
        .map(|item| item.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityKind};
    use crate::item::ItemHolder;

    #[test]
    fn location_scope_matches_substrings_case_insensitively() {
        let world = World::new_game();
        // The starting meadow holds the mysterious note.
        let id = find_item_match(&world, "MYST", SearchScope::Location).unwrap();
        let note = world.current_location().unwrap().find_item(id).unwrap();
        assert_eq!(note.name, "mysterious note");
    }

    #[test]
    fn inventory_scope_ignores_the_ground() {
        let mut world = World::new_game();
        world.player.add_item(Item::misc("torch", "A burning torch"));

        assert!(find_item_match(&world, "note", SearchScope::Inventory).is_err());
        assert!(find_item_match(&world, "torch", SearchScope::Inventory).is_ok());
    }

    #[test]
    fn visible_scope_prefers_carried_items() {
        let mut world = World::new_game();
        world
            .current_location_mut()
            .unwrap()
            .add_item(Item::misc("iron key", "A heavy key"));
        world.player.add_item(Item::misc("key ring", "A jangling ring of keys"));

        let id = find_item_match(&world, "key", SearchScope::Visible).unwrap();
        assert!(world.player.contains_item(id));
        assert!(
            find_item_match(&world, "iron", SearchScope::Visible)
                .is_ok_and(|id| world.current_location().unwrap().contains_item(id))
        );
    }

    #[test]
    fn missing_names_report_the_original_input() {
        let world = World::new_game();
        let err = find_item_match(&world, "Chandelier", SearchScope::Visible).unwrap_err();
        match err {
            SearchError::NoMatchingName(term) => assert_eq!(term, "Chandelier"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn entity_search_scans_the_current_location() {
        let mut world = World::new_game();
        let wolf = Entity::spawn_basic(EntityKind::Wolf);
        let wolf_id = wolf.id;
        world.current_location_mut().unwrap().add_entity(wolf);

        assert_eq!(find_entity_match(&world, "wolf").unwrap(), wolf_id);
        assert!(find_entity_match(&world, "dragon").is_err());
    }
}
