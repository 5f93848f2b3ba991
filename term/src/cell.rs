use crate::color::Color16;
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StyleFlags: u8 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK     = 1 << 4;
        const REVERSE   = 1 << 5;
        const HIDDEN    = 1 << 6;
    }
}

/// A single cell in the grid: one displayed scalar value plus its pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub codepoint: u32,
    pub fg: Color16,
    pub bg: Color16,
    pub style: StyleFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Cell { codepoint: ' ' as u32, fg: Color16::White, bg: Color16::Black, style: StyleFlags::empty() }
    }
}

impl Cell {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn char(&self) -> char {
        char::from_u32(self.codepoint).unwrap_or(' ')
    }
}

/// The "pen": attributes applied to the next printed cell, set by SGR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub fg: Color16,
    pub bg: Color16,
    pub style: StyleFlags,
}

impl Default for Pen {
    fn default() -> Self {
        Pen { fg: Color16::White, bg: Color16::Black, style: StyleFlags::empty() }
    }
}

impl Pen {
    pub fn cell_for(&self, codepoint: u32) -> Cell {
        Cell { codepoint, fg: self.fg, bg: self.bg, style: self.style }
    }
}
