//! The composite terminal state: primary/alt grids, cursor, pen, modes and
//! the saved-state stack used by DECSC/DECRC and the alt-screen toggles.
//! This is what `parser::Parser` mutates as it dispatches each escape
//! sequence; `Terminal` in `lib.rs` owns one of these plus the parser.

use unicode_width::UnicodeWidthChar;

use crate::cell::Pen;
use crate::dirty::DirtyTracker;
use crate::grid::{Cursor, CursorFlags, Grid, SavedState, TermMode};

/// East-Asian-Wide cell width: 0 for combining marks, 1 for most
/// characters, 2 for fullwidth; codepoints `UnicodeWidthChar` can't
/// classify (or that aren't valid scalar values) count as 1.
fn cell_width(codepoint: u32) -> i32 {
    char::from_u32(codepoint).and_then(UnicodeWidthChar::width).unwrap_or(1) as i32
}

/// Which of G0/G1 is selected, and what each maps to. Only ASCII and the
/// DEC Special Graphics line-drawing set are modeled; spec.md's Non-goals
/// exclude other 94-character sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Ascii,
    DecSpecialGraphics,
}

/// Maps an ASCII codepoint through the DEC Special Graphics table (the
/// line-drawing characters xterm exposes under `ESC ( 0`). Characters with
/// no mapping pass through unchanged.
pub fn dec_special_graphics(codepoint: u32) -> u32 {
    match codepoint {
        0x60 => 0x25C6, // ` -> diamond
        0x61 => 0x2592, // a -> checkerboard
        0x62 => 0x2409, // b -> HT symbol
        0x63 => 0x240C, // c -> FF symbol
        0x64 => 0x240D, // d -> CR symbol
        0x65 => 0x240A, // e -> LF symbol
        0x66 => 0x00B0, // f -> degree
        0x67 => 0x00B1, // g -> plus/minus
        0x68 => 0x2424, // h -> NL symbol
        0x69 => 0x240B, // i -> VT symbol
        0x6A => 0x2518, // j -> bottom-right corner
        0x6B => 0x2510, // k -> top-right corner
        0x6C => 0x250C, // l -> top-left corner
        0x6D => 0x2514, // m -> bottom-left corner
        0x6E => 0x253C, // n -> crossing lines
        0x6F => 0x23BA, // o -> scan line 1
        0x70 => 0x23BB, // p -> scan line 3
        0x71 => 0x2500, // q -> horizontal line
        0x72 => 0x23BC, // r -> scan line 7
        0x73 => 0x23BD, // s -> scan line 9
        0x74 => 0x251C, // t -> left T
        0x75 => 0x2524, // u -> right T
        0x76 => 0x2534, // v -> bottom T
        0x77 => 0x252C, // w -> top T
        0x78 => 0x2502, // x -> vertical line
        0x79 => 0x2264, // y -> less-than-or-equal
        0x7A => 0x2265, // z -> greater-than-or-equal
        0x7B => 0x03C0, // { -> pi
        0x7C => 0x2260, // | -> not-equal
        0x7D => 0x00A3, // } -> pound sterling
        0x7E => 0x00B7, // ~ -> centered dot
        other => other,
    }
}

pub struct TerminalState {
    pub primary: Grid,
    pub alt: Grid,
    pub alt_active: bool,
    pub cursor: Cursor,
    pub pen: Pen,
    pub mode: TermMode,
    pub saved: Option<SavedState>,
    pub g: [Charset; 2],
    pub active_charset: usize,
    pub dirty: DirtyTracker,
    /// Last printed character, for `REP` (`CSI Pn b`).
    pub last_printed: Option<u32>,
    /// Bytes queued by the parser for the pty channel to write back to the
    /// child (DA, DSR, CPR replies). Drained by `Terminal::advance`.
    pub pending_replies: Vec<u8>,
}

impl TerminalState {
    pub fn new(rows: usize, cols: usize) -> Self {
        TerminalState {
            primary: Grid::new(rows, cols),
            alt: Grid::new(rows, cols),
            alt_active: false,
            cursor: Cursor::default(),
            pen: Pen::default(),
            mode: TermMode::default(),
            saved: None,
            g: [Charset::Ascii, Charset::Ascii],
            active_charset: 0,
            dirty: DirtyTracker::new(),
            last_printed: None,
            pending_replies: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        if self.alt_active {
            &self.alt
        } else {
            &self.primary
        }
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        if self.alt_active {
            &mut self.alt
        } else {
            &mut self.primary
        }
    }

    pub fn rows(&self) -> usize {
        self.grid().rows
    }

    pub fn cols(&self) -> usize {
        self.grid().cols
    }

    /// Clamp the cursor's `y` to the origin-mode bound and the grid's
    /// extent, matching spec.md's invariant: "If ORIGIN is set, `cursor.y
    /// ∈ [scrolltop, scrollbottom]`; else `cursor.y ∈ [0, rows)`."
    fn clamp_cursor(&mut self) {
        let (rows, cols) = (self.rows() as i32, self.cols() as i32);
        self.cursor.x = self.cursor.x.clamp(0, cols - 1);
        if self.mode.contains(TermMode::ORIGIN) {
            let top = self.grid().scrolltop as i32;
            let bottom = self.grid().scrollbottom as i32;
            self.cursor.y = self.cursor.y.clamp(top, bottom);
        } else {
            self.cursor.y = self.cursor.y.clamp(0, rows - 1);
        }
    }

    /// Plain absolute move: `col`/`row` are already absolute physical
    /// coordinates and are never offset by `scrolltop`, even when `ORIGIN`
    /// is set. Used by relative-motion CSI handlers (CUU/CUD/CUF/CUB/
    /// CNL/CPL) and `G`/HPA, which compute an already-absolute target from
    /// the current (already-absolute) cursor position.
    pub fn move_to(&mut self, col: i32, row: i32) {
        self.cursor.state.remove(CursorFlags::ONWRAP);
        self.cursor.x = col;
        self.cursor.y = row;
        self.clamp_cursor();
    }

    /// DECOM-aware absolute move: `row` is offset by `scrolltop` when
    /// `ORIGIN` is set. Used by `CUP`/`HVP`, `VPA`, `DECSTBM`'s homing, and
    /// origin-mode's own homing on toggle — the handful of operations
    /// spec.md calls out as DECOM-relative.
    pub fn move_to_decom(&mut self, col: i32, row: i32) {
        self.cursor.state.remove(CursorFlags::ONWRAP);
        let base = if self.mode.contains(TermMode::ORIGIN) {
            self.grid().scrolltop as i32
        } else {
            0
        };
        self.cursor.x = col;
        self.cursor.y = base + row;
        self.clamp_cursor();
    }

    pub fn set_origin_mode(&mut self, enabled: bool) {
        self.mode.set(TermMode::ORIGIN, enabled);
        self.cursor.state.set(CursorFlags::ORIGIN, enabled);
        self.move_to_decom(0, 0);
    }

    /// Print one already-decoded, already-charset-mapped codepoint at the
    /// cursor, implementing deferred wrap: printing into the last column
    /// sets `ONWRAP` rather than wrapping immediately, so a following
    /// escape sequence does not see a spurious line break. Wide (East
    /// Asian fullwidth) glyphs occupy two cells, writing a blank companion
    /// cell at `x+1`; combining marks (`w == 0`) overwrite the cell at the
    /// cursor without advancing it.
    pub fn print(&mut self, codepoint: u32) {
        if self.cursor.state.contains(CursorFlags::ONWRAP) {
            self.do_newline(true);
            self.cursor.state.remove(CursorFlags::ONWRAP);
        }

        let w = cell_width(codepoint);
        let cols = self.cols() as i32;
        if self.cursor.x + w > cols {
            if self.mode.contains(TermMode::AUTO_WRAP) {
                self.do_newline(true);
            } else {
                self.cursor.x = (cols - w).max(0);
            }
        }

        let (x, y) = (self.cursor.x as usize, self.cursor.y as usize);
        let pen = self.pen;
        self.grid_mut().set_cell(x, y, codepoint, pen.cell_for(codepoint));
        if w == 2 && x + 1 < self.cols() {
            self.grid_mut().set_cell(x + 1, y, ' ' as u32, pen.cell_for(' ' as u32));
        }
        self.dirty.mark(y);
        self.last_printed = Some(codepoint);

        if self.cursor.x + w < cols {
            self.cursor.x += w;
        } else if self.mode.contains(TermMode::AUTO_WRAP) {
            self.cursor.state.insert(CursorFlags::ONWRAP);
        }
    }

    /// Line feed; `wrap_to_col0` decides whether the cursor also returns to
    /// column 0. `NEL` and a deferred-wrap's implied newline always pass
    /// `true`; a literal `LF`/`VT`/`FF` passes `TermMode::CR_AND_LF`'s
    /// current value (see `parser::Parser::handle_c0`) — the same mode bit
    /// also governs CR expansion on the pty write side
    /// (`pty::PtyWriter::write_user_input`).
    pub fn do_newline(&mut self, wrap_to_col0: bool) {
        let bottom = self.grid().scrollbottom as i32;
        if self.cursor.y == bottom {
            let top = self.grid().scrolltop;
            self.grid_mut().scroll_up(top, 1);
            self.dirty.mark_range(top as usize..=bottom as usize);
        } else if self.cursor.y < self.rows() as i32 - 1 {
            self.cursor.y += 1;
        }
        if wrap_to_col0 {
            self.cursor.x = 0;
        }
        self.clamp_cursor();
    }

    pub fn carriage_return(&mut self) {
        self.cursor.x = 0;
        self.cursor.state.remove(CursorFlags::ONWRAP);
    }

    pub fn reverse_index(&mut self) {
        let top = self.grid().scrolltop as i32;
        if self.cursor.y == top {
            let bottom = self.grid().scrollbottom;
            self.grid_mut().scroll_down(top as usize, 1);
            self.dirty.mark_range(top as usize..=bottom);
        } else if self.cursor.y > 0 {
            self.cursor.y -= 1;
        }
    }

    pub fn toggle_alt_screen(&mut self, enter: bool, save_cursor: bool, clear_on_enter: bool) {
        if enter == self.alt_active {
            return;
        }
        if enter && save_cursor {
            self.store_cursor();
        }
        self.alt_active = enter;
        if enter && clear_on_enter {
            self.alt.clear_all();
        }
        if !save_cursor {
            // Plain 47/1047 toggles still reset the cursor position, same
            // as any other cursor-home: DECOM-aware like CUP's home case.
            self.move_to_decom(0, 0);
        } else if !enter {
            self.restore_cursor();
        }
        self.mode.set(TermMode::ALTSCREEN, enter);
        self.dirty.mark_all(self.rows());
    }

    pub fn store_cursor(&mut self) {
        self.saved = Some(SavedState {
            cursor: self.cursor,
            scrolltop: self.grid().scrolltop,
            scrollbottom: self.grid().scrollbottom,
        });
    }

    pub fn restore_cursor(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.cursor = saved.cursor;
            self.grid_mut().scrolltop = saved.scrolltop;
            self.grid_mut().scrollbottom = saved.scrollbottom;
            self.clamp_cursor();
        }
    }

    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.primary.resize(rows, cols);
        self.alt.resize(rows, cols);
        self.clamp_cursor();
        self.dirty.mark_all(rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullwidth_glyph_writes_a_blank_companion_cell_and_advances_by_two() {
        let mut st = TerminalState::new(2, 5);
        st.print('A' as u32);
        st.print('\u{4E2D}' as u32); // a fullwidth CJK ideograph
        assert_eq!(st.grid().cell_at(1, 0).char(), '\u{4E2D}');
        assert_eq!(st.grid().cell_at(2, 0).char(), ' ');
        assert_eq!(st.cursor.x, 3);
    }

    #[test]
    fn fullwidth_glyph_that_does_not_fit_wraps_instead_of_splitting() {
        let mut st = TerminalState::new(2, 2);
        st.print('A' as u32);
        st.print('\u{4E2D}' as u32); // 1 free column left (x=1), needs 2: must wrap first
        assert_eq!(st.grid().cell_at(0, 1).char(), '\u{4E2D}');
        assert_eq!(st.grid().cell_at(1, 1).char(), ' ');
        assert_eq!(st.cursor.y, 1);
        assert!(st.cursor.state.contains(CursorFlags::ONWRAP));
    }

    #[test]
    fn deferred_wrap_does_not_break_line_until_next_print() {
        let mut st = TerminalState::new(2, 3);
        st.print('A' as u32);
        st.print('B' as u32);
        st.print('C' as u32);
        assert_eq!(st.cursor.y, 0);
        assert!(st.cursor.state.contains(CursorFlags::ONWRAP));
        st.print('D' as u32);
        assert_eq!(st.cursor.y, 1);
        assert_eq!(st.grid().cell_at(0, 1).char(), 'D');
    }

    #[test]
    fn alt_screen_round_trip_restores_cursor_and_contents() {
        let mut st = TerminalState::new(3, 3);
        st.print('X' as u32);
        let (x, y) = (st.cursor.x, st.cursor.y);
        st.toggle_alt_screen(true, true, true);
        st.print('Y' as u32);
        st.toggle_alt_screen(false, true, false);
        assert_eq!(st.cursor.x, x);
        assert_eq!(st.cursor.y, y);
        assert_eq!(st.grid().cell_at(0, 0).char(), 'X');
    }

    #[test]
    fn origin_mode_clamps_cursor_to_scroll_region() {
        let mut st = TerminalState::new(10, 10);
        st.grid_mut().scrolltop = 2;
        st.grid_mut().scrollbottom = 5;
        st.set_origin_mode(true);
        st.move_to_decom(0, 0);
        assert_eq!(st.cursor.y, 2);
        st.move_to_decom(0, 20);
        assert_eq!(st.cursor.y, 5);
    }

    #[test]
    fn relative_motion_does_not_double_apply_decom_offset() {
        // scrolltop=2, cursor already at absolute y=4 (DECOM on): moving
        // up by 1 must land at absolute y=3, not get the scrolltop offset
        // added a second time.
        let mut st = TerminalState::new(10, 10);
        st.grid_mut().scrolltop = 2;
        st.grid_mut().scrollbottom = 8;
        st.set_origin_mode(true);
        st.cursor.y = 4;
        st.move_to(st.cursor.x, st.cursor.y - 1);
        assert_eq!(st.cursor.y, 3);
    }
}
