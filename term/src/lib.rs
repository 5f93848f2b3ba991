//! Terminal emulation engine: UTF-8 codec, ring-buffered cell grid,
//! escape-sequence parser, PTY channel, dirty-region tracker, and the
//! renderer boundary adapter.
//!
//! `Terminal` is the crate's single entry point: feed it bytes read from
//! the pty (`advance_bytes`), and pull rendering state back out through
//! `row_as_utf8`/`dirty_interval`.

pub mod cell;
pub mod codec;
pub mod color;
pub mod dirty;
pub mod error;
pub mod grid;
pub mod parser;
pub mod pty;
pub mod state;

#[cfg(test)]
mod test;

use codec::decode_all;
use parser::Parser;
use state::TerminalState;

/// The engine's public façade: owns the parser and the combined grid
/// state, and exposes the `[RENDERER]` boundary adapter.
pub struct Terminal {
    state: TerminalState,
    parser: Parser,
}

impl Terminal {
    pub fn new(rows: usize, cols: usize) -> Self {
        Terminal { state: TerminalState::new(rows, cols), parser: Parser::new() }
    }

    /// Feed already-read bytes from the pty master. UTF-8 decoding happens
    /// here, once, before any codepoint reaches the parser — matching the
    /// `handlechar(codepoint)` boundary this engine was modeled on.
    /// Invalid leads are replaced with `U+FFFD` and the offending byte is
    /// skipped; a trailing incomplete sequence is left unconsumed so the
    /// caller (the pty reader) can retain it across the next read.
    pub fn advance_bytes(&mut self, bytes: &[u8]) -> usize {
        let mut chars = Vec::new();
        let consumed = decode_all(bytes, &mut chars);
        for c in chars {
            self.parser.advance(&mut self.state, c as u32);
        }
        consumed
    }

    /// Feed one already-decoded codepoint (used by the pty reader, which
    /// decodes incrementally against its own carry buffer rather than
    /// buffering whole reads).
    pub fn advance_char(&mut self, codepoint: u32) {
        self.parser.advance(&mut self.state, codepoint);
    }

    pub fn rows(&self) -> usize {
        self.state.rows()
    }

    pub fn cols(&self) -> usize {
        self.state.cols()
    }

    pub fn cursor(&self) -> (i32, i32) {
        (self.state.cursor.x, self.state.cursor.y)
    }

    pub fn cursor_hidden(&self) -> bool {
        self.state.mode.contains(grid::TermMode::HIDE_CURSOR)
    }

    /// Bytes the engine wants written back to the pty (DA/DSR/CPR
    /// replies), draining the queue.
    pub fn take_pending_replies(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.state.pending_replies)
    }

    pub fn cr_and_lf(&self) -> bool {
        self.state.mode.contains(grid::TermMode::CR_AND_LF)
    }

    pub fn echo(&self) -> bool {
        self.state.mode.contains(grid::TermMode::ECHO)
    }

    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.state.resize(rows, cols);
    }

    /// The `[RENDERER]` boundary: row `y`'s visible contents as UTF-8,
    /// rendering every cell by its codepoint (color/style are not encoded
    /// in this string — the renderer is expected to query `row_cells` for
    /// that).
    pub fn row_as_utf8(&self, y: usize) -> String {
        self.state.grid().row(y).iter().map(|c| c.char()).collect()
    }

    pub fn row_cells(&self, y: usize) -> &[cell::Cell] {
        self.state.grid().row(y)
    }

    /// The smallest/largest dirty row interval since the last call, or
    /// `None` if nothing changed.
    pub fn dirty_interval(&mut self) -> Option<(usize, usize)> {
        self.state.dirty.consume()
    }

    pub fn needs_render(&self) -> bool {
        self.state.dirty.needs_render()
    }
}
