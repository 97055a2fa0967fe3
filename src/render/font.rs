//! Monochrome 8x15 glyph bitmaps baked into the dashboard firmware era of
//! the panel. One bit per pixel, one byte per row, most significant bit on
//! the left:
//!
//! ```text
//! 7 is encoded as      00000000  0x00
//!                      01111110  0x7E
//!                      00000110  0x06
//!                      00001100  0x0C
//!                      ...
//! ```

/// Glyph cell width in pixels.
pub const GLYPH_WIDTH: usize = 8;

/// Glyph cell height in pixels.
pub const GLYPH_HEIGHT: usize = 15;

/// One rectangular monochrome glyph bitmap.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Glyph {
    rows: [u8; GLYPH_HEIGHT],
}

impl Glyph {
    const fn new(rows: [u8; GLYPH_HEIGHT]) -> Self {
        Self { rows }
    }

    /// Returns the bitmap byte for one row, zero when out of range.
    #[must_use]
    pub fn row(&self, index: usize) -> u8 {
        self.rows.get(index).copied().unwrap_or(0x00)
    }

    /// Returns whether the pixel at (`row`, `col`) is set.
    #[must_use]
    pub fn pixel(&self, row: usize, col: usize) -> bool {
        if col >= GLYPH_WIDTH {
            return false;
        }
        (self.row(row) >> (GLYPH_WIDTH - 1 - col)) & 0x01 == 0x01
    }
}

/// Returns the glyph for a character, `None` when the set has no bitmap for
/// it (the cell then renders transparent).
#[must_use]
pub fn glyph_for(character: char) -> Option<&'static Glyph> {
    let glyph = match character {
        ' ' => &GLYPH_SPACE,
        '0' => &GLYPH_0,
        '1' => &GLYPH_1,
        '2' => &GLYPH_2,
        '3' => &GLYPH_3,
        '4' => &GLYPH_4,
        '5' => &GLYPH_5,
        '6' => &GLYPH_6,
        '7' => &GLYPH_7,
        '8' => &GLYPH_8,
        '9' => &GLYPH_9,
        'a' => &GLYPH_A,
        'b' => &GLYPH_B,
        'c' => &GLYPH_C,
        'd' => &GLYPH_D,
        'e' => &GLYPH_E,
        'f' => &GLYPH_F,
        'g' => &GLYPH_G,
        'h' => &GLYPH_H,
        'i' => &GLYPH_I,
        'j' => &GLYPH_J,
        'k' => &GLYPH_K,
        'l' => &GLYPH_L,
        'm' => &GLYPH_M,
        'n' => &GLYPH_N,
        'o' => &GLYPH_O,
        'p' => &GLYPH_P,
        'q' => &GLYPH_Q,
        'r' => &GLYPH_R,
        's' => &GLYPH_S,
        't' => &GLYPH_T,
        'u' => &GLYPH_U,
        'v' => &GLYPH_V,
        'w' => &GLYPH_W,
        'x' => &GLYPH_X,
        'y' => &GLYPH_Y,
        'z' => &GLYPH_Z,
        '%' => &GLYPH_PERCENT,
        '\u{B0}' => &GLYPH_DEGREE,
        ':' => &GLYPH_COLON,
        '.' => &GLYPH_DOT,
        '-' => &GLYPH_DASH,
        'R' => &GLYPH_UPPER_R,
        'N' => &GLYPH_UPPER_N,
        _ => return None,
    };
    Some(glyph)
}

const GLYPH_SPACE: Glyph = Glyph::new([0x00; 15]);
const GLYPH_0: Glyph = Glyph::new([
    0x00, 0x3C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_1: Glyph = Glyph::new([
    0x00, 0x18, 0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_2: Glyph = Glyph::new([
    0x00, 0x3C, 0x66, 0x66, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x60, 0x7E, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_3: Glyph = Glyph::new([
    0x00, 0x3C, 0x66, 0x06, 0x06, 0x1C, 0x06, 0x06, 0x06, 0x66, 0x3C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_4: Glyph = Glyph::new([
    0x00, 0x06, 0x0E, 0x1E, 0x1E, 0x36, 0x36, 0x66, 0x7E, 0x06, 0x06, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_5: Glyph = Glyph::new([
    0x00, 0x7E, 0x60, 0x60, 0x60, 0x7C, 0x66, 0x06, 0x06, 0x66, 0x3C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_6: Glyph = Glyph::new([
    0x00, 0x3C, 0x66, 0x60, 0x60, 0x7C, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_7: Glyph = Glyph::new([
    0x00, 0x7E, 0x06, 0x0C, 0x0C, 0x18, 0x18, 0x18, 0x30, 0x30, 0x30, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_8: Glyph = Glyph::new([
    0x00, 0x3C, 0x66, 0x66, 0x66, 0x3C, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_9: Glyph = Glyph::new([
    0x00, 0x3C, 0x66, 0x66, 0x66, 0x66, 0x3E, 0x06, 0x06, 0x66, 0x3C, 0x00, 0x00, 0x00, 0x00,
]);

const GLYPH_A: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x3C, 0x66, 0x1E, 0x36, 0x66, 0x66, 0x3E, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_B: Glyph = Glyph::new([
    0x00, 0x60, 0x60, 0x60, 0x7C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x7C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_C: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x3C, 0x66, 0x60, 0x60, 0x60, 0x66, 0x3C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_D: Glyph = Glyph::new([
    0x00, 0x06, 0x06, 0x06, 0x3E, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3E, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_E: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x3C, 0x66, 0x7E, 0x60, 0x60, 0x66, 0x3C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_F: Glyph = Glyph::new([
    0x00, 0x0C, 0x18, 0x18, 0x3C, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_G: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x3E, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3E, 0x06, 0x66, 0x3C, 0x00,
]);
const GLYPH_H: Glyph = Glyph::new([
    0x00, 0x60, 0x60, 0x60, 0x7C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_I: Glyph = Glyph::new([
    0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_J: Glyph = Glyph::new([
    0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x30, 0x00,
]);
const GLYPH_K: Glyph = Glyph::new([
    0x00, 0x60, 0x60, 0x60, 0x66, 0x6C, 0x78, 0x70, 0x78, 0x6C, 0x66, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_L: Glyph = Glyph::new([
    0x00, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_M: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x7E, 0x5A, 0x5A, 0x5A, 0x5A, 0x5A, 0x5A, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_N: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x7C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_O: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x3C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_P: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x7C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x7C, 0x60, 0x60, 0x60, 0x00,
]);
const GLYPH_Q: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x3E, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3E, 0x06, 0x06, 0x06, 0x00,
]);
const GLYPH_R: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x3C, 0x38, 0x30, 0x30, 0x30, 0x30, 0x30, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_S: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x3C, 0x66, 0x60, 0x3C, 0x06, 0x66, 0x3C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_T: Glyph = Glyph::new([
    0x00, 0x00, 0x18, 0x18, 0x3C, 0x18, 0x18, 0x18, 0x18, 0x18, 0x0C, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_U: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3E, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_V: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x18, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_W: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x42, 0x5A, 0x5A, 0x5A, 0x7E, 0x24, 0x24, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_X: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x42, 0x66, 0x3C, 0x18, 0x3C, 0x66, 0x42, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_Y: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x42, 0x42, 0x66, 0x66, 0x3C, 0x3C, 0x18, 0x18, 0x30, 0x60, 0x00,
]);
const GLYPH_Z: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x7E, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x7E, 0x00, 0x00, 0x00, 0x00,
]);

const GLYPH_PERCENT: Glyph = Glyph::new([
    0x00, 0x72, 0x56, 0x54, 0x58, 0x78, 0x1E, 0x1A, 0x2A, 0x6A, 0x4E, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_DEGREE: Glyph = Glyph::new([
    0x00, 0x38, 0x28, 0x28, 0x38, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_COLON: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x18, 0x18, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_DOT: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_DASH: Glyph = Glyph::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
]);

// Upper-case letters used by the gear overlay (reverse and neutral).
const GLYPH_UPPER_R: Glyph = Glyph::new([
    0x00, 0x7C, 0x66, 0x66, 0x66, 0x7C, 0x78, 0x6C, 0x66, 0x66, 0x66, 0x00, 0x00, 0x00, 0x00,
]);
const GLYPH_UPPER_N: Glyph = Glyph::new([
    0x00, 0x66, 0x66, 0x76, 0x76, 0x7E, 0x6E, 0x6E, 0x66, 0x66, 0x66, 0x00, 0x00, 0x00, 0x00,
]);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn seven_matches_documented_bitmap() {
        let glyph = glyph_for('7').expect("digit glyphs are always present");
        assert_eq!(0x7E, glyph.row(1));
        assert!(glyph.pixel(1, 1));
        assert!(!glyph.pixel(1, 0));
    }

    #[test]
    fn unknown_characters_have_no_glyph() {
        assert_eq!(None, glyph_for('@'));
        assert_eq!(None, glyph_for('Z'));
    }

    #[test]
    fn degree_symbol_occupies_one_cell_bitmap() {
        let glyph = glyph_for('\u{B0}').expect("degree symbol is in the set");
        assert_eq!(0x38, glyph.row(1));
    }

    #[test]
    fn out_of_range_rows_read_blank() {
        let glyph = glyph_for('0').expect("digit glyphs are always present");
        assert_eq!(0x00, glyph.row(GLYPH_HEIGHT));
    }
}
