//! Large gear-indicator glyphs, derived at load time by scaling the 8x15
//! text glyphs six times horizontally and four times vertically into a
//! 48x60 pixel block.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Scaled glyph width in pixels.
pub const BIG_GLYPH_WIDTH: usize = GLYPH_WIDTH * 6;

/// Scaled glyph height in pixels.
pub const BIG_GLYPH_HEIGHT: usize = GLYPH_HEIGHT * 4;

/// One scaled monochrome glyph, one byte per six source pixels.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BigGlyph {
    rows: [[u8; BIG_GLYPH_WIDTH / 8]; BIG_GLYPH_HEIGHT],
}

impl BigGlyph {
    fn from_small(character: char) -> Option<Self> {
        let small = font::glyph_for(character)?;
        let mut rows = [[0u8; BIG_GLYPH_WIDTH / 8]; BIG_GLYPH_HEIGHT];
        for (y, row) in rows.iter_mut().enumerate() {
            for x in 0..BIG_GLYPH_WIDTH {
                if small.pixel(y / 4, x / 6) {
                    row[x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        Some(Self { rows })
    }

    /// Returns whether the pixel at (`row`, `col`) is set.
    #[must_use]
    pub fn pixel(&self, row: usize, col: usize) -> bool {
        if row >= BIG_GLYPH_HEIGHT || col >= BIG_GLYPH_WIDTH {
            return false;
        }
        self.rows[row][col / 8] & (0x80 >> (col % 8)) != 0
    }
}

static BIG_GLYPHS: LazyLock<HashMap<char, BigGlyph>> = LazyLock::new(|| {
    "RN12345678"
        .chars()
        .filter_map(|character| Some((character, BigGlyph::from_small(character)?)))
        .collect()
});

/// Returns the scaled glyph for a gear character, `None` when the indicator
/// has no bitmap for it.
#[must_use]
pub fn big_glyph_for(character: char) -> Option<&'static BigGlyph> {
    BIG_GLYPHS.get(&character)
}
