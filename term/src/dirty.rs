//! The `[DIRTY]` component: a smallest/largest dirty-row interval plus an
//! atomic repaint flag, shared between the reader thread (writer) and the
//! UI thread (reader) without taking the cell lock just to check for work.

use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks the smallest row interval touched since the last `consume`.
///
/// `None` means nothing is dirty. Widening is monotonic within a batch:
/// `mark(2)` then `mark(5)` produces `0..=5`'s smallest/largest as `2..=5`,
/// never the "in-between" rows — exactly as spec.md's `[DIRTY]` interval is
/// defined (smallest and largest row touched, not each individual row).
#[derive(Debug, Default)]
pub struct DirtyTracker {
    interval: Option<(usize, usize)>,
    needs_render: AtomicBool,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, row: usize) {
        self.interval = Some(match self.interval {
            Some((lo, hi)) => (lo.min(row), hi.max(row)),
            None => (row, row),
        });
        self.needs_render.store(true, Ordering::Release);
    }

    pub fn mark_range(&mut self, rows: std::ops::RangeInclusive<usize>) {
        if rows.is_empty() {
            return;
        }
        self.mark(*rows.start());
        self.mark(*rows.end());
    }

    pub fn mark_all(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        self.mark_range(0..=rows - 1);
    }

    /// Whether a render is pending, without consuming it.
    pub fn needs_render(&self) -> bool {
        self.needs_render.load(Ordering::Acquire)
    }

    /// Take the current dirty interval and clear it, for the renderer to
    /// pull once per repaint cycle.
    pub fn consume(&mut self) -> Option<(usize, usize)> {
        self.needs_render.store(false, Ordering::Release);
        self.interval.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_widens_interval() {
        let mut d = DirtyTracker::new();
        d.mark(5);
        d.mark(2);
        d.mark(8);
        assert_eq!(d.consume(), Some((2, 8)));
    }

    #[test]
    fn consume_clears_interval() {
        let mut d = DirtyTracker::new();
        d.mark(1);
        assert_eq!(d.consume(), Some((1, 1)));
        assert_eq!(d.consume(), None);
        assert!(!d.needs_render());
    }

    #[test]
    fn needs_render_reflects_pending_state() {
        let mut d = DirtyTracker::new();
        assert!(!d.needs_render());
        d.mark(0);
        assert!(d.needs_render());
        d.consume();
        assert!(!d.needs_render());
    }
}
