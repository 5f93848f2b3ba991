//! A minimal text-mode consumer of the `[RENDERER]` boundary adapter.
//!
//! This stands in for the window/glyph pipeline spec.md's Out-of-scope
//! section excludes from the core: it pulls UTF-8 rows and the dirty
//! interval from `term::Terminal` and writes them straight to this
//! process's own stdout using the host terminal's own cursor-addressing
//! escapes, rather than rasterizing glyphs.

use std::io::{self, Write};

use term::Terminal;

pub struct TextRenderer {
    rows: usize,
}

impl TextRenderer {
    pub fn new(rows: usize) -> Self {
        TextRenderer { rows }
    }

    pub fn full_redraw(&mut self, term: &Terminal, out: &mut impl Write) -> io::Result<()> {
        write!(out, "\x1b[2J")?;
        for y in 0..self.rows {
            self.redraw_row(term, y, out)?;
        }
        self.place_cursor(term, out)?;
        out.flush()
    }

    pub fn redraw_dirty(&mut self, term: &mut Terminal, out: &mut impl Write) -> io::Result<()> {
        let Some((lo, hi)) = term.dirty_interval() else {
            return Ok(());
        };
        for y in lo..=hi {
            self.redraw_row(term, y, out)?;
        }
        self.place_cursor(term, out)?;
        out.flush()
    }

    fn redraw_row(&self, term: &Terminal, y: usize, out: &mut impl Write) -> io::Result<()> {
        write!(out, "\x1b[{};1H\x1b[2K{}", y + 1, term.row_as_utf8(y))
    }

    fn place_cursor(&self, term: &Terminal, out: &mut impl Write) -> io::Result<()> {
        let (x, y) = term.cursor();
        write!(out, "\x1b[{};{}H", y + 1, x + 1)?;
        if term.cursor_hidden() {
            write!(out, "\x1b[?25l")
        } else {
            write!(out, "\x1b[?25h")
        }
    }
}
