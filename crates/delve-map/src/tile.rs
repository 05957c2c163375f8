//! Terrain templates: [`TileGraphic`], [`Tile`], and the [`TileRegistry`].
//!
//! Tiles are small `Copy` values. A map stores one per cell; changing the
//! terrain of a cell means copying a different template into it.

use std::collections::HashMap;

use delve_core::{Cell, Color};

use crate::palette;

/// What a cell looks like: glyph, foreground, background.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGraphic {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl TileGraphic {
    #[inline]
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }

    /// The same graphic as a console [`Cell`].
    #[inline]
    pub const fn to_cell(self) -> Cell {
        Cell::new(self.ch, self.fg, self.bg)
    }
}

/// A terrain template.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    /// Whether actors can stand on it.
    pub walkable: bool,
    /// Whether it lets light through. Read by FOV code, not by this crate.
    pub transparent: bool,
    /// Appearance when remembered but out of view.
    pub dark: TileGraphic,
    /// Appearance when in view.
    pub light: TileGraphic,
}

impl Tile {
    #[inline]
    pub const fn new(
        walkable: bool,
        transparent: bool,
        dark: TileGraphic,
        light: TileGraphic,
    ) -> Self {
        Self {
            walkable,
            transparent,
            dark,
            light,
        }
    }
}

/// Graphic used for cells that were never seen.
pub const SHROUD: TileGraphic = TileGraphic::new(' ', palette::SHROUD_FG, palette::SHROUD_BG);

pub const WALL: Tile = Tile::new(
    false,
    false,
    TileGraphic::new(' ', palette::TERRAIN_FG, palette::WALL_DARK_BG),
    TileGraphic::new(' ', palette::TERRAIN_FG, palette::WALL_LIGHT_BG),
);

pub const FLOOR: Tile = Tile::new(
    true,
    true,
    TileGraphic::new(' ', palette::TERRAIN_FG, palette::FLOOR_DARK_BG),
    TileGraphic::new(' ', palette::TERRAIN_FG, palette::FLOOR_LIGHT_BG),
);

/// Maps layout glyphs to tile templates.
///
/// The default registry knows `#` (wall) and `.` (floor).
#[derive(Debug, Clone)]
pub struct TileRegistry {
    tiles: HashMap<char, Tile>,
}

impl TileRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            tiles: HashMap::new(),
        }
    }

    /// Register `tile` under `glyph`, returning the template it replaced.
    pub fn register(&mut self, glyph: char, tile: Tile) -> Option<Tile> {
        self.tiles.insert(glyph, tile)
    }

    /// Register (builder).
    pub fn with(mut self, glyph: char, tile: Tile) -> Self {
        self.register(glyph, tile);
        self
    }

    pub fn get(&self, glyph: char) -> Option<Tile> {
        self.tiles.get(&glyph).copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl Default for TileRegistry {
    fn default() -> Self {
        Self::empty().with('#', WALL).with('.', FLOOR)
    }
}
