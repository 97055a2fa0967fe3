use thiserror::Error;

use super::font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::{GRID_HEIGHT, GRID_WIDTH};

/// Text cells per row.
pub const TEXT_COLS: usize = GRID_WIDTH / GLYPH_WIDTH;

/// Text rows on the panel.
pub const TEXT_ROWS: usize = GRID_HEIGHT / GLYPH_HEIGHT;

/// Cell content renders this many pixels above its nominal grid position;
/// sampling adds the offset to the panel coordinate.
const VERTICAL_OFFSET: usize = 7;

/// Errors from placing text on the layer.
#[derive(Debug, Error)]
pub enum TextError {
    /// The text would run past the edge of the cell grid.
    #[error("text {text:?} does not fit at row {row}, column {col}")]
    DoesNotFit { text: String, row: usize, col: usize },
}

/// Character-cell overlay, [`TEXT_COLS`] x [`TEXT_ROWS`] cells of 8x15
/// glyphs. Set glyph pixels render opaque; everything else is transparent.
#[derive(Debug, Clone)]
pub struct TextLayer {
    cells: [[char; TEXT_COLS]; TEXT_ROWS],
}

impl TextLayer {
    /// Creates an all-blank layer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: [[' '; TEXT_COLS]; TEXT_ROWS],
        }
    }

    /// Blanks every cell.
    pub fn clear(&mut self) {
        self.cells = [[' '; TEXT_COLS]; TEXT_ROWS];
    }

    /// Writes `text` starting at the given cell.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::DoesNotFit`] when the text would overrun the cell
    /// grid; the layer is left unmodified.
    pub fn set_text(&mut self, row: usize, col: usize, text: &str) -> Result<(), TextError> {
        let len = text.chars().count();
        if row >= TEXT_ROWS || col + len > TEXT_COLS {
            return Err(TextError::DoesNotFit {
                text: text.to_owned(),
                row,
                col,
            });
        }
        for (offset, character) in text.chars().enumerate() {
            self.cells[row][col + offset] = character;
        }
        Ok(())
    }

    /// Returns the characters stored in `len` cells starting at the given
    /// cell, clipped to the grid.
    #[must_use]
    pub fn text_at(&self, row: usize, col: usize, len: usize) -> String {
        let Some(cells) = self.cells.get(row) else {
            return String::new();
        };
        cells
            .iter()
            .skip(col)
            .take(len)
            .collect()
    }

    /// Returns whether the glyph pixel at panel coordinates (`y`, `x`) is
    /// set. Cells holding characters without a glyph are transparent.
    #[must_use]
    pub fn pixel(&self, y: usize, x: usize) -> bool {
        let y = y + VERTICAL_OFFSET;
        if y >= GRID_HEIGHT || x >= GRID_WIDTH {
            return false;
        }
        let character = self.cells[y / GLYPH_HEIGHT][x / GLYPH_WIDTH];
        font::glyph_for(character)
            .is_some_and(|glyph| glyph.pixel(y % GLYPH_HEIGHT, x % GLYPH_WIDTH))
    }
}

impl Default for TextLayer {
    fn default() -> Self {
        Self::new()
    }
}
