/// Packed 12-bit RGB colour, stored in the low bits of the 32-bit
/// framebuffer word the panel expects.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, derive_more::Display, derive_more::From, derive_more::Into,
)]
#[display("{_0:#05x}")]
pub struct Rgb12(u32);

impl Rgb12 {
    /// Creates a colour from a packed `0xRGB` value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw & 0xFFF)
    }

    /// Returns the framebuffer word for this colour.
    #[must_use]
    pub const fn word(self) -> u32 {
        self.0
    }
}

pub const BLACK: Rgb12 = Rgb12::new(0x000);
pub const GREY: Rgb12 = Rgb12::new(0xCCC);
pub const WHITE: Rgb12 = Rgb12::new(0xFFF);

pub const BLUE: Rgb12 = Rgb12::new(0x58A);
pub const BLUE_DARK: Rgb12 = Rgb12::new(0x456);
pub const BLUE_BRIGHT: Rgb12 = Rgb12::new(0x79C);

pub const YELLOW: Rgb12 = Rgb12::new(0xCB6);
pub const YELLOW_DARK: Rgb12 = Rgb12::new(0x663);
pub const YELLOW_BRIGHT: Rgb12 = Rgb12::new(0x985);

pub const RED: Rgb12 = Rgb12::new(0xF00);

/// Colour never used by any renderer; seeds the previous-frame snapshot so
/// the first transmission covers the whole panel.
pub const UNUSED_GREEN: Rgb12 = Rgb12::new(0x0F0);

/// Palette slot assignable to a background tile region.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ColorIndex {
    Black,
    Blue,
    White,
    Yellow,
}

impl ColorIndex {
    /// Returns (fill, dark bevel, bright bevel) for a tile of this colour.
    #[must_use]
    pub const fn tile_shades(self) -> (Rgb12, Rgb12, Rgb12) {
        match self {
            Self::Black => (BLACK, BLACK, BLACK),
            Self::Blue => (BLUE, BLUE_DARK, BLUE_BRIGHT),
            Self::Yellow => (YELLOW, YELLOW_DARK, YELLOW_BRIGHT),
            // "White" tiles are black panes with a white/grey bevel.
            Self::White => (BLACK, GREY, WHITE),
        }
    }
}
