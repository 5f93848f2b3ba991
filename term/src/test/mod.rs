//! End-to-end scenario tests driving `Terminal` with raw escape-sequence
//! byte streams, in the spirit of the module-level unit tests scattered
//! through `grid`, `state`, `parser` and `codec` but exercised through the
//! public façade the way a real pty reader would.

use super::*;

#[cfg(test)]
mod proptest_invariants;

const CSI: &str = "\x1b[";

struct TestTerm {
    term: Terminal,
}

impl TestTerm {
    fn new(rows: usize, cols: usize) -> Self {
        Self { term: Terminal::new(rows, cols) }
    }

    fn print<S: AsRef<str>>(&mut self, s: S) {
        self.term.advance_bytes(s.as_ref().as_bytes());
    }

    fn cup(&mut self, col: usize, row: usize) {
        self.print(format!("{}{};{}H", CSI, row + 1, col + 1));
    }

    fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        self.print(format!("{}{};{}r", CSI, top + 1, bottom + 1));
    }

    fn erase_in_line(&mut self, mode: u8) {
        self.print(format!("{}{}K", CSI, mode));
    }

    fn erase_in_display(&mut self, mode: u8) {
        self.print(format!("{}{}J", CSI, mode));
    }

    fn set_mode(&mut self, params: &str, enable: bool) {
        self.print(format!("{}{}{}", CSI, params, if enable { "h" } else { "l" }));
    }

    fn visible_contents(&self) -> Vec<String> {
        (0..self.term.rows()).map(|y| self.term.row_as_utf8(y)).collect()
    }

    fn assert_visible_contents(&self, expected: &[&str]) {
        let actual = self.visible_contents();
        let actual: Vec<&str> = actual.iter().map(|s| s.as_str()).collect();
        assert_eq!(actual, expected);
    }

    fn assert_cursor_pos(&self, col: i32, row: i32) {
        assert_eq!(self.term.cursor(), (col, row));
    }

    fn assert_dirty_contains(&mut self, y: usize) {
        let interval = self.term.dirty_interval();
        match interval {
            Some((lo, hi)) => assert!(lo <= y && y <= hi, "row {} not in dirty interval {:?}", y, (lo, hi)),
            None => panic!("expected a dirty interval containing row {}", y),
        }
    }
}

#[test]
fn plain_text_wraps_and_scrolls() {
    let mut t = TestTerm::new(2, 3);
    t.print("ABCDEF");
    t.assert_visible_contents(&["DEF", "   "]);
}

#[test]
fn deferred_wrap_survives_a_following_escape_sequence() {
    let mut t = TestTerm::new(2, 3);
    t.print("ABC");
    // cursor is pending-wrap here; CUP must not have been pre-empted by an
    // implicit newline before this sequence arrived.
    t.cup(0, 1);
    t.print("X");
    t.assert_visible_contents(&["ABC", "X  "]);
}

#[test]
fn scroll_region_confines_scrolling() {
    let mut t = TestTerm::new(4, 1);
    t.print("A\r\nB\r\nC\r\nD");
    t.set_scroll_region(1, 2);
    t.cup(0, 2);
    t.print("\n");
    t.assert_visible_contents(&["A", "C", " ", "D"]);
}

#[test]
fn erase_in_line_modes() {
    let mut t = TestTerm::new(1, 5);
    t.print("ABCDE");
    t.cup(2, 0);
    t.erase_in_line(0);
    t.assert_visible_contents(&["AB   "]);

    let mut t = TestTerm::new(1, 5);
    t.print("ABCDE");
    t.cup(2, 0);
    t.erase_in_line(1);
    t.assert_visible_contents(&["   DE"]);
}

#[test]
fn erase_in_display_from_cursor() {
    let mut t = TestTerm::new(2, 3);
    t.print("ABCDEF");
    t.cup(1, 0);
    t.erase_in_display(0);
    t.assert_visible_contents(&["A  ", "   "]);
}

#[test]
fn alt_screen_round_trip_preserves_primary_contents() {
    let mut t = TestTerm::new(2, 3);
    t.print("ABC");
    t.set_mode("?1049", true);
    t.print("XYZ");
    t.set_mode("?1049", false);
    t.assert_visible_contents(&["ABC", "   "]);
}

#[test]
fn origin_mode_confines_cup_to_scroll_region() {
    let mut t = TestTerm::new(5, 3);
    t.set_scroll_region(1, 3);
    t.set_mode("?6", true);
    t.cup(0, 0);
    t.assert_cursor_pos(0, 1);
}

#[test]
fn dirty_tracking_reports_touched_rows() {
    let mut t = TestTerm::new(3, 3);
    t.cup(0, 1);
    t.print("X");
    t.assert_dirty_contains(1);
}

#[test]
fn carriage_return_and_cr_lf_translation_bit_is_independent_of_utf8_bit() {
    let t = TestTerm::new(1, 1);
    // CR_AND_LF and UTF8 must occupy disjoint bits: turning one off must
    // not silently disable the other.
    assert!(t.term.cr_and_lf());
    assert_ne!(
        crate::grid::TermMode::CR_AND_LF.bits(),
        crate::grid::TermMode::UTF8.bits()
    );
}

#[test]
fn device_attributes_response_is_queued_for_the_pty_writer() {
    let mut t = TestTerm::new(1, 1);
    t.print(format!("{}c", CSI));
    assert_eq!(t.term.take_pending_replies(), b"\x1b[?6c");
}

#[test]
fn six_byte_scenario_prompt_echo_and_backspace() {
    // Models a typical shell round trip: prompt, typed text, a backspace
    // correction, and a newline — exercising print, BS, and CR/LF in one
    // stream.
    let mut t = TestTerm::new(3, 10);
    t.print("$ ");
    t.print("lsx");
    t.print("\x08"); // backspace
    t.print("\x1b[K"); // erase to end of line
    t.print("\r\n");
    t.print("ls");
    t.assert_visible_contents(&["$ ls      ", "ls        ", "          "]);
}
