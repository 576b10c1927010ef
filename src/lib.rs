#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const WILDWOOD_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod achievements;
pub mod bestiary;
pub mod clock;
pub mod combat;
pub mod command;
pub mod entity;
pub mod entity_gen;
pub mod entity_search;
pub mod events;
pub mod health;
pub mod item;
pub mod item_gen;
pub mod location;
pub mod player;
pub mod repl;
pub mod save_files;
pub mod story;
pub mod style;
pub mod traits;
pub mod view;
pub mod world;

// Re-exports for convenience
pub use entity::Entity;
pub use item::{Item, ItemHolder};
pub use location::Location;
pub use player::Player;
pub use repl::run_repl;
pub use view::{View, ViewItem};
pub use world::World;
