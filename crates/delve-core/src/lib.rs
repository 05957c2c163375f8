//! **delve-core** — core types for the delve tile-map workspace.
//!
//! Geometry primitives, colours, styled cells, and the [`Console`]
//! character-cell buffer that maps render into.

pub mod cell;
pub mod console;
pub mod geom;
pub mod style;

pub use cell::Cell;
pub use console::{Console, Frame, FrameCell, RenderTarget, compute_frame};
pub use geom::{Point, Range};
pub use style::{Color, Style};
