//! Tile-grid dungeon map: terrain templates, visibility memory, entity
//! handles, and rendering into a [`delve_core::RenderTarget`].

pub mod entity;
pub mod error;
pub mod game_map;
pub mod palette;
pub mod tile;

pub use entity::{Entity, EntityId, EntityStore, RenderOrder};
pub use error::MapError;
pub use game_map::{CellState, GameMap};
pub use tile::{FLOOR, SHROUD, Tile, TileGraphic, TileRegistry, WALL};
