//! Errors from fallible map construction.

use std::fmt;

use delve_core::Point;

/// Errors that can occur when building a [`GameMap`](crate::GameMap).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Width or height was zero or negative.
    InvalidSize { width: i32, height: i32 },
    /// A layout string had no lines.
    EmptyLayout,
    /// A layout is wider or taller than a map can be.
    LayoutTooLarge { width: usize, height: usize },
    /// A layout line was not as wide as the first one.
    RaggedLayout {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A layout glyph has no registered tile.
    UnknownGlyph { glyph: char, pos: Point },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { width, height } => {
                write!(f, "map: invalid size {width}x{height}")
            }
            Self::EmptyLayout => f.write_str("map: empty layout"),
            Self::LayoutTooLarge { width, height } => {
                write!(f, "map: layout {width}x{height} is too large")
            }
            Self::RaggedLayout {
                line,
                expected,
                found,
            } => write!(
                f,
                "map: layout line {line} has width {found}, expected {expected}"
            ),
            Self::UnknownGlyph { glyph, pos } => {
                write!(f, "map: no tile registered for \u{201c}{glyph}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for MapError {}
