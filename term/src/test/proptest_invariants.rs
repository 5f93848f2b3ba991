//! Property tests for the two invariants spec.md calls out explicitly in
//! its Testable Properties section: the cursor never leaves the grid, and
//! a save immediately followed by a restore (no mutation in between) is
//! the identity.

use super::TestTerm;
use proptest::prelude::*;

fn arb_printable() -> impl Strategy<Value = char> {
    (0x20u32..0x7E).prop_map(|cp| char::from_u32(cp).unwrap())
}

proptest! {
    /// `cursor.x ∈ [0, cols)` and `cursor.y ∈ [0, rows)` must hold after
    /// any stream of printable characters and newlines, regardless of how
    /// much scrolling or wrapping happened along the way.
    #[test]
    fn cursor_stays_in_bounds(
        rows in 1usize..8,
        cols in 1usize..8,
        chars in prop::collection::vec(prop_oneof![arb_printable(), Just('\n')], 0..200),
    ) {
        let mut t = TestTerm::new(rows, cols);
        for c in chars {
            t.print(c.to_string());
        }
        let (x, y) = t.term.cursor();
        prop_assert!(x >= 0 && (x as usize) < cols);
        prop_assert!(y >= 0 && (y as usize) < rows);
    }

    /// `DECSC` (`ESC 7`) immediately followed by `DECRC` (`ESC 8`), with no
    /// cursor-moving sequence in between, must leave the cursor exactly
    /// where it was.
    #[test]
    fn save_restore_with_no_mutation_is_identity(
        rows in 1usize..8,
        cols in 1usize..8,
        col in 0usize..8,
        row in 0usize..8,
    ) {
        let mut t = TestTerm::new(rows, cols);
        t.cup(col % cols, row % rows);
        let before = t.term.cursor();
        t.print("\x1b7");
        t.print("\x1b8");
        let after = t.term.cursor();
        prop_assert_eq!(before, after);
    }
}
