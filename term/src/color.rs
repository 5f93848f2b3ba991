//! 16-color semantic palette.
//!
//! Per the engine's non-goals, no 256-color or true-color palette lives in
//! the core; `Color16` is the full extent of color the grid understands.
//! Resolving a `Color16` to an actual RGB pixel is the renderer's job.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color16 {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    #[default]
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color16 {
    /// Map a `CSI ... m` foreground parameter (30-37, 90-97) to a color.
    pub fn from_fg_param(n: i64) -> Option<Color16> {
        Self::from_sgr_offset(n, 30, 90)
    }

    /// Map a `CSI ... m` background parameter (40-47, 100-107) to a color.
    pub fn from_bg_param(n: i64) -> Option<Color16> {
        Self::from_sgr_offset(n, 40, 100)
    }

    fn from_sgr_offset(n: i64, base: i64, bright_base: i64) -> Option<Color16> {
        use Color16::*;
        const NORMAL: [Color16; 8] =
            [Black, Red, Green, Yellow, Blue, Magenta, Cyan, White];
        const BRIGHT: [Color16; 8] = [
            BrightBlack,
            BrightRed,
            BrightGreen,
            BrightYellow,
            BrightBlue,
            BrightMagenta,
            BrightCyan,
            BrightWhite,
        ];
        if (base..base + 8).contains(&n) {
            Some(NORMAL[(n - base) as usize])
        } else if (bright_base..bright_base + 8).contains(&n) {
            Some(BRIGHT[(n - bright_base) as usize])
        } else {
            None
        }
    }
}
