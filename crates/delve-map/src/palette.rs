//! Colour palette shared by the tile templates and the demo.

use delve_core::Color;

// -- Terrain, in view --

pub const WALL_LIGHT_BG: Color = Color::from_rgb(130, 110, 50);
pub const FLOOR_LIGHT_BG: Color = Color::from_rgb(200, 180, 50);

// -- Terrain, remembered --

pub const WALL_DARK_BG: Color = Color::from_rgb(0, 0, 100);
pub const FLOOR_DARK_BG: Color = Color::from_rgb(50, 50, 150);

// -- Glyph foregrounds --

pub const TERRAIN_FG: Color = Color::WHITE;

/// Foreground of cells nobody has seen yet.
pub const SHROUD_FG: Color = Color::WHITE;
/// Background of cells nobody has seen yet.
pub const SHROUD_BG: Color = Color::BLACK;

// -- Entities --

pub const PLAYER_FG: Color = Color::WHITE;
pub const ORC_FG: Color = Color::from_rgb(63, 127, 63);
pub const TROLL_FG: Color = Color::from_rgb(0, 127, 0);
