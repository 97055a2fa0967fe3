use super::big_font::{self, BigGlyph};
use super::color::{self, Rgb12};

const TOP: usize = 128;
const BOTTOM: usize = 186;
const LEFT: usize = 137;
const RIGHT: usize = 183;

/// Large gear indicator pane in the centre of the dashboard.
///
/// While active it owns its rectangle outright: glyph pixels render white,
/// the rest of the pane black. Characters without a scaled glyph blank the
/// pane.
#[derive(Debug, Clone, Copy, Default)]
pub struct GearOverlay {
    glyph: Option<Option<&'static BigGlyph>>,
}

impl GearOverlay {
    /// Creates an inactive overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `character` in the pane.
    pub fn set_gear(&mut self, character: char) {
        self.glyph = Some(big_font::big_glyph_for(character));
    }

    /// Deactivates the pane.
    pub fn clear(&mut self) {
        self.glyph = None;
    }

    /// Returns the overlay colour at panel coordinates (`y`, `x`), `None`
    /// outside the pane or while inactive.
    #[must_use]
    pub fn pixel(&self, y: usize, x: usize) -> Option<Rgb12> {
        let glyph = self.glyph?;
        if !(TOP..=BOTTOM).contains(&y) || !(LEFT..=RIGHT).contains(&x) {
            return None;
        }
        let lit = glyph.is_some_and(|glyph| glyph.pixel(y - TOP + 1, x - LEFT + 1));
        Some(if lit { color::WHITE } else { color::BLACK })
    }
}
