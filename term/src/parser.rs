//! The `[PARSER]` component: a hand-written escape-sequence state machine.
//!
//! Unlike the teacher, this does not sit on top of the `vte` crate. `vte`
//! tokenizes raw bytes and decodes UTF-8 as part of that tokenization; this
//! engine's data flow decodes UTF-8 once, upstream, in `pty::PtyReader`
//! (mirroring `readfrompty` -> `utf8decode` -> `handlechar(codepoint)` in
//! the source this was distilled from), so by the time a scalar value
//! reaches the parser it is already a `u32` codepoint, never a raw byte.
//! Running both a byte tokenizer and a codepoint-level `[CODEC]` would
//! double-decode UTF-8, so the parser is its own small state machine over
//! codepoints instead.

use crate::grid::{CursorFlags, TermMode};
use crate::state::{dec_special_graphics, Charset, TerminalState};

const MAX_PARAMS: usize = 16;
const MAX_STRING_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiIgnore,
    /// OSC/DCS/PM/APC string collection. Every introducer collects into
    /// the same buffer and is discarded identically on termination — the
    /// spec makes no distinction between them at the STR-state level.
    StringCollect,
}

pub struct Parser {
    state: State,
    params: Vec<i64>,
    current_param: Option<i64>,
    intermediates: Vec<u8>,
    private_marker: Option<u8>,
    string_buf: String,
}

impl Default for Parser {
    fn default() -> Self {
        Parser {
            state: State::Ground,
            params: Vec::with_capacity(MAX_PARAMS),
            current_param: None,
            intermediates: Vec::with_capacity(2),
            private_marker: None,
            string_buf: String::new(),
        }
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset_csi(&mut self) {
        self.params.clear();
        self.current_param = None;
        self.intermediates.clear();
        self.private_marker = None;
    }

    fn finish_param(&mut self) {
        if self.params.len() < MAX_PARAMS {
            self.params.push(self.current_param.unwrap_or(0));
        }
        self.current_param = None;
    }

    fn param(&self, idx: usize, default: i64) -> i64 {
        match self.params.get(idx) {
            Some(&0) | None => default,
            Some(&n) => n,
        }
    }

    /// Feed one already-UTF-8-decoded codepoint into the state machine,
    /// mutating `st` and, for C1 control codes disguised as printable
    /// high codepoints, acting immediately.
    pub fn advance(&mut self, st: &mut TerminalState, codepoint: u32) {
        match self.state {
            State::Ground => self.advance_ground(st, codepoint),
            State::Escape => self.advance_escape(st, codepoint),
            State::EscapeIntermediate => self.advance_escape_intermediate(st, codepoint),
            State::CsiEntry => self.advance_csi(st, codepoint),
            State::CsiIgnore => self.advance_csi_ignore(codepoint),
            State::StringCollect => self.advance_string(st, codepoint),
        }
    }

    fn advance_ground(&mut self, st: &mut TerminalState, cp: u32) {
        match cp {
            0x1B => self.state = State::Escape,
            0x00..=0x1F => self.handle_c0(st, cp as u8),
            0x7F => {} // DEL: ignored
            0x80..=0x9F => self.handle_c1(st, cp as u8),
            _ => self.print_mapped(st, cp),
        }
    }

    fn print_mapped(&mut self, st: &mut TerminalState, cp: u32) {
        let mapped = match st.g[st.active_charset] {
            Charset::DecSpecialGraphics => dec_special_graphics(cp),
            Charset::Ascii => cp,
        };
        st.print(mapped);
    }

    fn handle_c0(&mut self, st: &mut TerminalState, b: u8) {
        match b {
            0x07 => {} // BEL: no audible bell in a headless core
            0x08 => {
                st.cursor.x = (st.cursor.x - 1).max(0);
                st.cursor.state.remove(CursorFlags::ONWRAP);
            }
            0x09 => {
                let next = st.grid().next_tabstop(st.cursor.x as usize);
                st.cursor.x = next as i32;
            }
            0x0A | 0x0B | 0x0C => {
                let reset_x = st.mode.contains(TermMode::CR_AND_LF);
                st.do_newline(reset_x);
            }
            0x0D => st.carriage_return(),
            0x0E => st.active_charset = 1,
            0x0F => st.active_charset = 0,
            _ => {}
        }
    }

    fn handle_c1(&mut self, st: &mut TerminalState, b: u8) {
        match b {
            0x84 => st.do_newline(false),       // IND
            0x85 => st.do_newline(true),        // NEL
            0x88 => st.grid_mut().set_tabstop(st.cursor.x as usize), // HTS
            0x8D => st.reverse_index(),          // RI
            0x90 => self.begin_string(),
            0x9B => self.state = State::CsiEntry, // CSI
            0x9C => {}                           // ST with nothing open: ignore
            0x9D => self.begin_string(),
            0x9E | 0x9F => self.begin_string(),
            _ => {}
        }
    }

    fn advance_escape(&mut self, st: &mut TerminalState, cp: u32) {
        match cp {
            0x5B => {
                // '['
                self.reset_csi();
                self.state = State::CsiEntry;
            }
            0x5D => self.begin_string(),  // ']'
            0x50 | 0x6B => self.begin_string(), // 'P' 'k'
            0x5E | 0x5F => self.begin_string(), // '^' '_'
            0x28 | 0x29 => {
                // '(' / ')' designate G0/G1
                self.intermediates.clear();
                self.intermediates.push(cp as u8);
                self.state = State::EscapeIntermediate;
            }
            0x23 => {
                self.intermediates.clear();
                self.intermediates.push(b'#');
                self.state = State::EscapeIntermediate;
            }
            0x25 => {
                // '%' selects the UTF8 state: the following byte toggles
                // TermMode::UTF8 and is otherwise absorbed, never printed.
                self.intermediates.clear();
                self.intermediates.push(b'%');
                self.state = State::EscapeIntermediate;
            }
            0x44 => {
                st.do_newline(false); // IND
                self.state = State::Ground;
            }
            0x45 => {
                st.do_newline(true); // NEL
                self.state = State::Ground;
            }
            0x48 => {
                st.grid_mut().set_tabstop(st.cursor.x as usize); // HTS
                self.state = State::Ground;
            }
            0x4D => {
                st.reverse_index(); // RI
                self.state = State::Ground;
            }
            0x37 => {
                st.store_cursor(); // DECSC
                self.state = State::Ground;
            }
            0x38 => {
                st.restore_cursor(); // DECRC
                self.state = State::Ground;
            }
            0x63 => {
                *st = TerminalState::new(st.rows(), st.cols()); // RIS
                self.state = State::Ground;
            }
            0x5A => {
                st.pending_replies.extend_from_slice(b"\x1b[?6c"); // DA (obsolete form)
                self.state = State::Ground;
            }
            0x3D | 0x3E => self.state = State::Ground, // DECKPAM/DECKPNM: no keypad model here
            _ => self.state = State::Ground,
        }
    }

    fn advance_escape_intermediate(&mut self, st: &mut TerminalState, cp: u32) {
        let intro = self.intermediates.first().copied().unwrap_or(0);
        match intro {
            b'(' | b')' => {
                let slot = if intro == b'(' { 0 } else { 1 };
                st.g[slot] = match cp {
                    0x30 => Charset::DecSpecialGraphics, // '0'
                    _ => Charset::Ascii,
                };
            }
            b'#' => {
                if cp == 0x38 {
                    // DECALN: fill the screen with 'E' for margin alignment.
                    let (rows, cols) = (st.rows(), st.cols());
                    for y in 0..rows {
                        for x in 0..cols {
                            st.grid_mut().set_cell(x, y, 'E' as u32, crate::cell::Cell::blank());
                        }
                    }
                    st.dirty.mark_all(rows);
                }
            }
            b'%' => match cp {
                0x47 | 0x38 => st.mode.insert(TermMode::UTF8), // 'G' / '8'
                0x40 => st.mode.remove(TermMode::UTF8),        // '@'
                _ => {}
            },
            _ => {}
        }
        self.state = State::Ground;
    }

    fn begin_string(&mut self) {
        self.string_buf.clear();
        self.state = State::StringCollect;
    }

    fn advance_string(&mut self, st: &mut TerminalState, cp: u32) {
        match cp {
            0x07 => self.end_string(st), // BEL terminates any STR state
            0x1B => {
                // Expect a following '\\' to complete ST; treat this ESC
                // itself as the terminator since the next codepoint is
                // consumed as the start of a fresh sequence either way.
                self.end_string(st);
                self.state = State::Escape;
                return;
            }
            0x9C => self.end_string(st),
            _ => {
                if self.string_buf.len() < MAX_STRING_LEN {
                    if let Some(c) = char::from_u32(cp) {
                        self.string_buf.push(c);
                    }
                }
            }
        }
    }

    /// STR contents (OSC/DCS/PM/APC) are discarded here, matching spec:
    /// payloads are "not acted on in the core" — a renderer boundary is
    /// free to peek `string_buf` before this clears it, but nothing in the
    /// parser interprets it.
    fn end_string(&mut self, _st: &mut TerminalState) {
        self.string_buf.clear();
        self.state = State::Ground;
    }

    fn advance_csi(&mut self, st: &mut TerminalState, cp: u32) {
        match cp {
            0x30..=0x39 => {
                let digit = (cp - 0x30) as i64;
                self.current_param = Some(self.current_param.unwrap_or(0) * 10 + digit);
            }
            0x3B => self.finish_param(), // ';'
            0x3C..=0x3F => self.private_marker = Some(cp as u8), // '<=>?'
            0x20..=0x2F => self.intermediates.push(cp as u8),
            0x40..=0x7E => {
                self.finish_param();
                self.dispatch_csi(st, cp as u8);
                self.reset_csi();
                self.state = State::Ground;
            }
            _ => {
                self.state = State::CsiIgnore;
            }
        }
    }

    fn advance_csi_ignore(&mut self, cp: u32) {
        if (0x40..=0x7E).contains(&cp) {
            self.reset_csi();
            self.state = State::Ground;
        }
    }

    fn dispatch_csi(&mut self, st: &mut TerminalState, final_byte: u8) {
        let private = self.private_marker == Some(b'?');
        match final_byte {
            b'A' => st.move_to(st.cursor.x, st.cursor.y - self.param(0, 1) as i32),
            b'B' | b'e' => st.move_to(st.cursor.x, st.cursor.y + self.param(0, 1) as i32),
            b'C' | b'a' => st.move_to(st.cursor.x + self.param(0, 1) as i32, st.cursor.y),
            b'D' => st.move_to(st.cursor.x - self.param(0, 1) as i32, st.cursor.y),
            b'E' => {
                let n = self.param(0, 1) as i32;
                st.move_to(0, st.cursor.y + n);
            }
            b'F' => {
                let n = self.param(0, 1) as i32;
                st.move_to(0, st.cursor.y - n);
            }
            b'G' | b'`' => st.move_to(self.param(0, 1) as i32 - 1, st.cursor.y),
            b'I' => {
                let n = self.param(0, 1);
                let mut x = st.cursor.x as usize;
                for _ in 0..n {
                    x = st.grid().next_tabstop(x);
                }
                st.move_to(x as i32, st.cursor.y);
            }
            b'Z' => {
                let n = self.param(0, 1);
                let mut x = st.cursor.x as usize;
                for _ in 0..n {
                    x = st.grid().prev_tabstop(x);
                }
                st.move_to(x as i32, st.cursor.y);
            }
            b'd' => st.move_to_decom(st.cursor.x, self.param(0, 1) as i32 - 1),
            b'H' | b'f' => {
                let row = self.param(0, 1) as i32 - 1;
                let col = self.param(1, 1) as i32 - 1;
                st.move_to_decom(col, row);
            }
            b'J' => self.erase_in_display(st, self.param(0, 0)),
            b'K' => self.erase_in_line(st, self.param(0, 0)),
            b'L' => {
                let n = self.param(0, 1) as usize;
                let y = st.cursor.y as usize;
                st.grid_mut().scroll_down(y, n);
                st.dirty.mark_range(y..=st.grid().scrollbottom);
            }
            b'M' => {
                let n = self.param(0, 1) as usize;
                let y = st.cursor.y as usize;
                st.grid_mut().scroll_up(y, n);
                st.dirty.mark_range(y..=st.grid().scrollbottom);
            }
            b'P' => {
                let n = self.param(0, 1) as usize;
                let (x, y) = (st.cursor.x as usize, st.cursor.y as usize);
                st.grid_mut().delete_cells(x, y, n);
                st.dirty.mark(y);
            }
            b'@' => {
                let n = self.param(0, 1) as usize;
                let (x, y) = (st.cursor.x as usize, st.cursor.y as usize);
                st.grid_mut().insert_blank(x, y, n);
                st.dirty.mark(y);
            }
            b'X' => {
                let n = self.param(0, 1) as usize;
                let (x, y) = (st.cursor.x as usize, st.cursor.y as usize);
                let end = (x + n).min(st.cols());
                st.grid_mut().clear_row(y, x..end);
                st.dirty.mark(y);
            }
            b'S' => {
                let n = self.param(0, 1) as usize;
                let top = st.grid().scrolltop;
                st.grid_mut().scroll_up(top, n);
                st.dirty.mark_all(st.rows());
            }
            b'T' => {
                let n = self.param(0, 1) as usize;
                let top = st.grid().scrolltop;
                st.grid_mut().scroll_down(top, n);
                st.dirty.mark_all(st.rows());
            }
            b'b' => {
                if let Some(cp) = st.last_printed {
                    for _ in 0..self.param(0, 1) {
                        st.print(cp);
                    }
                }
            }
            b'g' => match self.param(0, 0) {
                0 => st.grid_mut().clear_tabstop(st.cursor.x as usize),
                3 => st.grid_mut().clear_all_tabstops(),
                _ => {}
            },
            b'h' => self.set_modes(st, true, private),
            b'l' => self.set_modes(st, false, private),
            b'm' => self.sgr(st),
            b'n' => self.device_status_report(st, self.param(0, 0), private),
            b'r' => {
                let top = (self.param(0, 1) - 1).max(0) as usize;
                let bottom = if self.params.get(1).copied().unwrap_or(0) == 0 {
                    st.rows() - 1
                } else {
                    (self.param(1, st.rows() as i64) - 1).max(0) as usize
                };
                if top < bottom {
                    st.grid_mut().scrolltop = top;
                    st.grid_mut().scrollbottom = bottom;
                }
                st.move_to_decom(0, 0);
            }
            b's' => st.store_cursor(),
            b'u' => st.restore_cursor(),
            b'c' => {
                if self.param(0, 0) == 0 {
                    st.pending_replies.extend_from_slice(b"\x1b[?6c");
                }
            }
            _ => {}
        }
    }

    fn erase_in_display(&mut self, st: &mut TerminalState, mode: i64) {
        let (rows, cols) = (st.rows(), st.cols());
        let (x, y) = (st.cursor.x as usize, st.cursor.y as usize);
        match mode {
            0 => {
                st.grid_mut().clear_row(y, x..cols);
                for row in (y + 1)..rows {
                    st.grid_mut().clear_row(row, 0..cols);
                }
                st.dirty.mark_range(y..=rows - 1);
            }
            1 => {
                for row in 0..y {
                    st.grid_mut().clear_row(row, 0..cols);
                }
                st.grid_mut().clear_row(y, 0..=x.min(cols - 1));
                st.dirty.mark_range(0..=y);
            }
            2 | 3 => {
                st.grid_mut().clear_all();
                st.dirty.mark_all(rows);
            }
            _ => {}
        }
    }

    fn erase_in_line(&mut self, st: &mut TerminalState, mode: i64) {
        let cols = st.cols();
        let (x, y) = (st.cursor.x as usize, st.cursor.y as usize);
        match mode {
            0 => st.grid_mut().clear_row(y, x..cols),
            1 => st.grid_mut().clear_row(y, 0..=x.min(cols - 1)),
            2 => st.grid_mut().clear_row(y, 0..cols),
            _ => {}
        }
        st.dirty.mark(y);
    }

    fn set_modes(&mut self, st: &mut TerminalState, enabled: bool, private: bool) {
        for &p in &self.params {
            if private {
                match p {
                    1 => st.mode.set(TermMode::CURSOR_KEYS_APP, enabled),
                    5 => st.mode.set(TermMode::REVERSE_VIDEO, enabled),
                    6 => st.set_origin_mode(enabled),
                    7 => st.mode.set(TermMode::AUTO_WRAP, enabled),
                    9 => st.mode.set(TermMode::MOUSE_X10, enabled),
                    25 => st.mode.set(TermMode::HIDE_CURSOR, !enabled),
                    1000 => st.mode.set(TermMode::MOUSE_BTN_EVENT, enabled),
                    1002 | 1003 => st.mode.set(TermMode::MOUSE_ANY_EVENT, enabled),
                    1004 => st.mode.set(TermMode::FOCUS_REPORTS, enabled),
                    1006 => st.mode.set(TermMode::MOUSE_SGR, enabled),
                    1048 => {
                        if enabled {
                            st.store_cursor();
                        } else {
                            st.restore_cursor();
                        }
                    }
                    47 | 1047 => st.toggle_alt_screen(enabled, false, enabled),
                    1049 => st.toggle_alt_screen(enabled, true, enabled),
                    2004 => st.mode.set(TermMode::BRACKETED_PASTE, enabled),
                    _ => {}
                }
            } else {
                match p {
                    2 => st.mode.set(TermMode::LOCK_KEYBOARD, enabled),
                    4 => st.mode.set(TermMode::INSERT, enabled),
                    12 => st.mode.set(TermMode::ECHO, enabled),
                    20 => st.mode.set(TermMode::CR_AND_LF, enabled),
                    _ => {}
                }
            }
        }
    }

    fn sgr(&mut self, st: &mut TerminalState) {
        if self.params.is_empty() {
            st.pen = crate::cell::Pen::default();
            return;
        }
        let mut i = 0;
        while i < self.params.len() {
            let p = self.params[i];
            match p {
                0 => st.pen = crate::cell::Pen::default(),
                1 => st.pen.style.insert(crate::cell::StyleFlags::BOLD),
                2 => st.pen.style.insert(crate::cell::StyleFlags::DIM),
                3 => st.pen.style.insert(crate::cell::StyleFlags::ITALIC),
                4 => st.pen.style.insert(crate::cell::StyleFlags::UNDERLINE),
                5 | 6 => st.pen.style.insert(crate::cell::StyleFlags::BLINK),
                7 => st.pen.style.insert(crate::cell::StyleFlags::REVERSE),
                8 => st.pen.style.insert(crate::cell::StyleFlags::HIDDEN),
                21 => st.pen.style.remove(crate::cell::StyleFlags::BOLD),
                22 => st.pen.style.remove(crate::cell::StyleFlags::BOLD | crate::cell::StyleFlags::DIM),
                23 => st.pen.style.remove(crate::cell::StyleFlags::ITALIC),
                24 => st.pen.style.remove(crate::cell::StyleFlags::UNDERLINE),
                25 => st.pen.style.remove(crate::cell::StyleFlags::BLINK),
                27 => st.pen.style.remove(crate::cell::StyleFlags::REVERSE),
                28 => st.pen.style.remove(crate::cell::StyleFlags::HIDDEN),
                39 => st.pen.fg = crate::color::Color16::White,
                49 => st.pen.bg = crate::color::Color16::Black,
                38 | 48 => {
                    // Extended color (256/true-color): consume its
                    // operands but fall back to the default, as the
                    // 16-color core has no representation for them.
                    if let Some(&mode) = self.params.get(i + 1) {
                        i += if mode == 5 { 2 } else if mode == 2 { 4 } else { 1 };
                    }
                }
                n => {
                    if let Some(c) = crate::color::Color16::from_fg_param(n) {
                        st.pen.fg = c;
                    } else if let Some(c) = crate::color::Color16::from_bg_param(n) {
                        st.pen.bg = c;
                    }
                }
            }
            i += 1;
        }
    }

    fn device_status_report(&mut self, st: &mut TerminalState, code: i64, private: bool) {
        if private {
            return;
        }
        match code {
            5 => st.pending_replies.extend_from_slice(b"\x1b[0n"),
            6 => {
                let reply = format!("\x1b[{};{}R", st.cursor.y + 1, st.cursor.x + 1);
                st.pending_replies.extend_from_slice(reply.as_bytes());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(p: &mut Parser, st: &mut TerminalState, s: &str) {
        for c in s.chars() {
            p.advance(st, c as u32);
        }
    }

    #[test]
    fn cup_moves_cursor() {
        let mut st = TerminalState::new(10, 10);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1b[3;4H");
        assert_eq!((st.cursor.x, st.cursor.y), (3, 2));
    }

    #[test]
    fn sgr_bold_red_sets_pen() {
        let mut st = TerminalState::new(5, 5);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1b[1;31m");
        assert!(st.pen.style.contains(crate::cell::StyleFlags::BOLD));
        assert_eq!(st.pen.fg, crate::color::Color16::Red);
    }

    #[test]
    fn erase_in_display_full_clears_and_marks_all_dirty() {
        let mut st = TerminalState::new(3, 3);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "ABC\x1b[2J");
        assert_eq!(st.grid().cell_at(0, 0).char(), ' ');
    }

    #[test]
    fn device_attributes_reply_is_queued() {
        let mut st = TerminalState::new(3, 3);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1b[c");
        assert_eq!(st.pending_replies, b"\x1b[?6c");
    }

    #[test]
    fn cursor_position_report_uses_one_based_coords() {
        let mut st = TerminalState::new(5, 5);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1b[2;2H\x1b[6n");
        assert_eq!(st.pending_replies, b"\x1b[2;2R");
    }

    #[test]
    fn alt_screen_1049_toggles_mode_and_restores_cursor() {
        let mut st = TerminalState::new(5, 5);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1b[3;3H");
        feed(&mut p, &mut st, "\x1b[?1049h");
        assert!(st.mode.contains(TermMode::ALTSCREEN));
        feed(&mut p, &mut st, "\x1b[?1049l");
        assert_eq!((st.cursor.x, st.cursor.y), (2, 2));
        assert!(!st.mode.contains(TermMode::ALTSCREEN));
    }

    #[test]
    fn osc_contents_are_discarded_without_side_effects() {
        let mut st = TerminalState::new(3, 3);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1b]0;hello\x07");
        assert_eq!(st.grid().cell_at(0, 0).char(), ' ');
        assert!(st.pending_replies.is_empty());
    }

    #[test]
    fn dec_special_graphics_remaps_line_drawing_chars() {
        let mut st = TerminalState::new(3, 3);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1b(0q");
        assert_eq!(st.grid().cell_at(0, 0).char(), '\u{2500}');
    }

    #[test]
    fn rep_repeats_last_printed_char() {
        let mut st = TerminalState::new(1, 5);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "A\x1b[3b");
        assert_eq!(
            st.grid().row(0).iter().map(|c| c.char()).collect::<String>(),
            "AAAA "
        );
    }

    #[test]
    fn cht_and_cbt_move_by_tab_stops() {
        let mut st = TerminalState::new(1, 20);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1b[2I"); // forward two tab stops: 0 -> 8 -> 16
        assert_eq!(st.cursor.x, 16);
        feed(&mut p, &mut st, "\x1b[Z"); // back one: 16 -> 8
        assert_eq!(st.cursor.x, 8);
    }

    #[test]
    fn esc_z_replies_with_device_attributes() {
        let mut st = TerminalState::new(3, 3);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1bZ");
        assert_eq!(st.pending_replies, b"\x1b[?6c");
    }

    #[test]
    fn esc_percent_g_sets_utf8_mode_without_leaking_the_final_byte() {
        let mut st = TerminalState::new(1, 5);
        st.mode.remove(TermMode::UTF8);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1b%G");
        assert!(st.mode.contains(TermMode::UTF8));
        assert_eq!(st.grid().cell_at(0, 0).char(), ' '); // 'G' was absorbed, not printed
    }

    #[test]
    fn esc_k_opens_str_state_and_its_payload_is_not_printed() {
        let mut st = TerminalState::new(1, 5);
        let mut p = Parser::new();
        feed(&mut p, &mut st, "\x1bktitle\x07");
        assert_eq!(st.grid().row(0).iter().map(|c| c.char()).collect::<String>(), "     ");
    }
}
