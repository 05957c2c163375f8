//! Crossterm presenter for delve.
//!
//! [`TermPresenter`] writes a [`Console`] (or only the cells that changed,
//! as a [`Frame`]) to any [`Write`] sink using crossterm commands. It does
//! not touch terminal modes or read input; the caller owns the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color as CtColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use delve_core::{
    Cell, Color, Console, Point,
    console::{Frame, compute_frame},
};

/// Maps a delve [`Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

/// Writes consoles to a terminal-like sink.
pub struct TermPresenter<W: Write> {
    out: W,
    origin: Point,
    prev: Option<Console>,
}

impl TermPresenter<io::Stdout> {
    /// A presenter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TermPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            origin: Point::ZERO,
            prev: None,
        }
    }

    /// Terminal position of the console's top-left cell (builder).
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Repaint every cell of `console`.
    pub fn present(&mut self, console: &Console) -> io::Result<()> {
        self.present_frame(&Frame::full(console))?;
        self.prev = Some(console.clone());
        Ok(())
    }

    /// Paint only the cells that changed since the last call to
    /// [`present`](Self::present) or [`present_diff`](Self::present_diff).
    /// The first call repaints everything.
    pub fn present_diff(&mut self, console: &Console) -> io::Result<()> {
        let frame = match &self.prev {
            Some(prev) if prev.bounds() == console.bounds() => compute_frame(prev, console),
            _ => Frame::full(console),
        };
        log::trace!("presenting {} changed cells", frame.cells.len());
        if !frame.is_empty() {
            self.present_frame(&frame)?;
        }
        self.prev = Some(console.clone());
        Ok(())
    }

    /// Write the cells of `frame` and flush.
    pub fn present_frame(&mut self, frame: &Frame) -> io::Result<()> {
        let mut last: Option<Point> = None;
        let mut style = None;
        for fc in &frame.cells {
            let p = self.origin + fc.pos;
            if p.x < 0 || p.y < 0 {
                continue;
            }
            // Adjacent cells on a row need no cursor move.
            if last.map(|l| l.shift(1, 0)) != Some(fc.pos) {
                queue!(self.out, cursor::MoveTo(p.x as u16, p.y as u16))?;
            }
            last = Some(fc.pos);
            if style != Some(fc.cell.style) {
                self.queue_style(fc.cell)?;
                style = Some(fc.cell.style);
            }
            queue!(self.out, Print(fc.cell.ch))?;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    /// Blank the whole terminal before the first paint.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor, Clear(ClearType::All))?;
        self.prev = None;
        self.out.flush()
    }

    /// Move the cursor to the row below a console of `height` rows, so
    /// that later output does not overwrite it.
    pub fn finish(&mut self, height: i32) -> io::Result<()> {
        let y = (self.origin.y + height).max(0) as u16;
        queue!(self.out, ResetColor, cursor::MoveTo(0, y), Print('\n'))?;
        self.out.flush()
    }

    fn queue_style(&mut self, cell: Cell) -> io::Result<()> {
        queue!(
            self.out,
            SetForegroundColor(to_ct_color(cell.style.fg)),
            SetBackgroundColor(to_ct_color(cell.style.bg))
        )
    }

    /// The underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
