use super::color::{self, Rgb12};
use super::GRID_WIDTH;

/// Height of the bar band across the top of the panel.
pub const BAR_HEIGHT: usize = 45;

/// Full-scale bar value.
pub const BAR_MAX: u32 = 8000;

const YELLOW_THRESHOLD: u32 = 7000;
const RED_THRESHOLD: u32 = 7500;

/// Horizontal gauge across the top [`BAR_HEIGHT`] rows, scaled to
/// [`BAR_MAX`] with tick marks every forty pixels.
#[derive(Debug, Clone, Copy)]
pub struct SpeedBar {
    value: u32,
}

impl SpeedBar {
    /// Creates an empty bar.
    #[must_use]
    pub fn new() -> Self {
        Self { value: 0 }
    }

    /// Sets the bar value, clamped to `0..=`[`BAR_MAX`].
    pub fn set_value(&mut self, value: u32) {
        self.value = value.min(BAR_MAX);
    }

    /// Returns the current bar value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Returns the colour at band coordinates (`y`, `x`), `y` within
    /// `0..`[`BAR_HEIGHT`].
    #[must_use]
    pub fn pixel(&self, y: usize, x: usize) -> Rgb12 {
        if y == 0 || y == BAR_HEIGHT - 1 || x == 0 || x == GRID_WIDTH - 1 {
            return color::GREY;
        }
        if y == 1 || y == BAR_HEIGHT - 2 || x == 1 || x == GRID_WIDTH - 2 || x % 40 == 0 {
            return color::WHITE;
        }
        let filled_to = (self.value as usize) * GRID_WIDTH / BAR_MAX as usize;
        if x > filled_to {
            color::BLACK
        } else if self.value > RED_THRESHOLD {
            color::RED
        } else if self.value > YELLOW_THRESHOLD {
            color::YELLOW
        } else {
            color::BLUE_BRIGHT
        }
    }
}

impl Default for SpeedBar {
    fn default() -> Self {
        Self::new()
    }
}
