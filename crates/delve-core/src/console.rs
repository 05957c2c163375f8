//! The [`Console`] character-cell buffer and the [`RenderTarget`] trait.
//!
//! Anything that can draw a map writes through [`RenderTarget`], so a map
//! does not care whether it paints into an in-memory [`Console`], a test
//! recorder, or some backend-specific surface.

use crate::cell::Cell;
use crate::geom::{Point, Range};
use crate::style::Color;

// ---------------------------------------------------------------------------
// RenderTarget
// ---------------------------------------------------------------------------

/// A character-cell surface.
pub trait RenderTarget {
    /// Number of columns (x) and rows (y) the target can hold.
    fn size(&self) -> Point;

    /// Write one glyph with its colours at `p`.
    ///
    /// Implementations ignore positions outside `[0, size)`.
    fn set_cell(&mut self, p: Point, ch: char, fg: Color, bg: Color);
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// A fixed-size 2D buffer of [`Cell`]s, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Console {
    cells: Vec<Cell>,
    bounds: Range,
}

impl Console {
    /// Create a console of the given dimensions, filled with blank cells.
    /// Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::sized(width.max(0), height.max(0));
        Self {
            cells: vec![Cell::default(); bounds.len()],
            bounds,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Read the cell at `p`, or `None` outside the console.
    pub fn at(&self, p: Point) -> Option<Cell> {
        self.bounds.index(p).map(|i| self.cells[i])
    }

    /// Set the cell at `p`. No-op outside the console.
    pub fn set(&mut self, p: Point, cell: Cell) {
        if let Some(i) = self.bounds.index(p) {
            self.cells[i] = cell;
        }
    }

    /// Fill every cell with `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Reset every cell to a blank default.
    pub fn clear(&mut self) {
        self.fill(Cell::default());
    }

    /// Row-major iterator over `(Point, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }

    /// The glyphs of row `y` as a string, mostly useful in tests and logs.
    pub fn row_text(&self, y: i32) -> String {
        (0..self.width())
            .filter_map(|x| self.at(Point::new(x, y)))
            .map(|c| c.ch)
            .collect()
    }
}

impl RenderTarget for Console {
    #[inline]
    fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    fn set_cell(&mut self, p: Point, ch: char, fg: Color, bg: Color) {
        self.set(p, Cell::new(ch, fg, bg));
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single cell that changed between two renders.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// A set of cell changes.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

impl Frame {
    /// A frame that repaints every cell of `console`.
    pub fn full(console: &Console) -> Self {
        Self {
            cells: console
                .iter()
                .map(|(pos, cell)| FrameCell { cell, pos })
                .collect(),
            width: console.width(),
            height: console.height(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Cells of `curr` that differ from `prev`. Cells outside `prev` always
/// count as changed.
pub fn compute_frame(prev: &Console, curr: &Console) -> Frame {
    let cells = curr
        .iter()
        .filter(|(p, c)| prev.at(*p) != Some(*c))
        .map(|(pos, cell)| FrameCell { cell, pos })
        .collect();
    Frame {
        cells,
        width: curr.width(),
        height: curr.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_new_and_at() {
        let c = Console::new(4, 3);
        assert_eq!(RenderTarget::size(&c), Point::new(4, 3));
        assert_eq!(c.at(Point::new(0, 0)), Some(Cell::default()));
        assert_eq!(c.at(Point::new(4, 0)), None);
    }

    #[test]
    fn negative_size_is_empty() {
        let c = Console::new(-2, 5);
        assert_eq!(c.width(), 0);
        assert_eq!(c.iter().count(), 0);
    }

    #[test]
    fn set_cell_ignores_out_of_bounds() {
        let mut c = Console::new(2, 2);
        c.set_cell(Point::new(5, 5), 'x', Color::WHITE, Color::BLACK);
        c.set_cell(Point::new(-1, 0), 'x', Color::WHITE, Color::BLACK);
        assert!(c.iter().all(|(_, cell)| cell.ch == ' '));
        c.set_cell(Point::new(1, 0), 'x', Color::WHITE, Color::BLACK);
        assert_eq!(c.row_text(0), " x");
    }

    #[test]
    fn fill_and_clear() {
        let mut c = Console::new(3, 2);
        c.fill(Cell::default().with_char('.'));
        assert_eq!(c.row_text(1), "...");
        c.clear();
        assert_eq!(c.row_text(1), "   ");
    }

    #[test]
    fn compute_frame_diff() {
        let a = Console::new(3, 2);
        let mut b = Console::new(3, 2);
        b.set(Point::new(1, 0), Cell::default().with_char('A'));
        let frame = compute_frame(&a, &b);
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].pos, Point::new(1, 0));
        assert_eq!(frame.cells[0].cell.ch, 'A');
        assert!(compute_frame(&b, &b).is_empty());
    }

    #[test]
    fn full_frame_covers_console() {
        let c = Console::new(3, 2);
        let frame = Frame::full(&c);
        assert_eq!(frame.cells.len(), 6);
        assert_eq!(frame.cells[5].pos, Point::new(2, 1));
    }
}
