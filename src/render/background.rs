use super::color::{self, ColorIndex, Rgb12};
use super::{GRID_HEIGHT, GRID_WIDTH};

const TILE_WIDTH: usize = 32;
const TILE_HEIGHT: usize = 30;
const TILES_ACROSS: usize = GRID_WIDTH / TILE_WIDTH;
const TILES_DOWN: usize = GRID_HEIGHT / TILE_HEIGHT;

/// Number of recolourable regions in the tile map.
pub const REGION_COUNT: usize = 21;

/// Region index of the traction-control status tile pair.
pub const TC_REGION: usize = 0x0D;

/// Region index of the ABS status tile pair.
pub const ABS_REGION: usize = 0x0E;

/// Tile-to-region assignment. Adjacent tiles sharing a region merge into one
/// bevelled pane.
const REGIONS: [[u8; TILES_ACROSS]; TILES_DOWN] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0x01, 0x01, 0x01, 0x02, 0x02, 0x02, 0x02, 0x03, 0x03, 0x03],
    [0x04, 0x04, 0x04, 0x05, 0x05, 0x05, 0x05, 0x06, 0x06, 0x06],
    [0x00, 0x07, 0x07, 0x07, 0x14, 0x14, 0x08, 0x08, 0x08, 0x00],
    [0x00, 0x09, 0x09, 0x09, 0x14, 0x14, 0x0A, 0x0A, 0x0A, 0x00],
    [0x0B, 0x0B, 0x0C, 0x0C, 0x14, 0x14, 0x0D, 0x0D, 0x0E, 0x0E],
    [0x0F, 0x0F, 0x10, 0x10, 0x11, 0x11, 0x12, 0x12, 0x12, 0x13],
];

fn default_palette() -> [ColorIndex; REGION_COUNT] {
    let mut palette = [ColorIndex::Blue; REGION_COUNT];
    palette[0x00] = ColorIndex::Black;
    palette[0x02] = ColorIndex::White;
    palette[0x05] = ColorIndex::White;
    palette[0x14] = ColorIndex::White;
    palette
}

/// Bevelled tile-pane layer behind everything else on the panel.
///
/// The pixel raster is regenerated whenever a region changes colour, so
/// [`Background::pixel`] stays a plain lookup on the render path.
#[derive(Debug, Clone)]
pub struct Background {
    palette: [ColorIndex; REGION_COUNT],
    raster: Vec<Rgb12>,
}

impl Background {
    /// Creates the layer with the default palette.
    #[must_use]
    pub fn new() -> Self {
        let mut layer = Self {
            palette: default_palette(),
            raster: Vec::new(),
        };
        layer.regenerate();
        layer
    }

    /// Recolours one region. Out-of-range regions are ignored.
    pub fn set_color(&mut self, region: usize, color: ColorIndex) {
        if region >= REGION_COUNT || self.palette[region] == color {
            return;
        }
        self.palette[region] = color;
        self.regenerate();
    }

    /// Resets every region to its default colour.
    pub fn reset(&mut self) {
        let palette = default_palette();
        if self.palette != palette {
            self.palette = palette;
            self.regenerate();
        }
    }

    /// Returns the colour at panel coordinates (`y`, `x`).
    #[must_use]
    pub fn pixel(&self, y: usize, x: usize) -> Rgb12 {
        if y >= GRID_HEIGHT || x >= GRID_WIDTH {
            return color::BLACK;
        }
        self.raster[y * GRID_WIDTH + x]
    }

    fn regenerate(&mut self) {
        self.raster = vec![color::BLACK; GRID_WIDTH * GRID_HEIGHT];
        for tile_y in 0..TILES_DOWN {
            for tile_x in 0..TILES_ACROSS {
                self.paint_tile(tile_y, tile_x);
            }
        }
    }

    /// Fills one tile and draws a three-pixel bevel along every edge that
    /// does not border a same-region neighbour.
    fn paint_tile(&mut self, tile_y: usize, tile_x: usize) {
        let region = REGIONS[tile_y][tile_x];
        let joins = |other: u8| other == region;
        let top = tile_y > 0 && joins(REGIONS[tile_y - 1][tile_x]);
        let bottom = tile_y < TILES_DOWN - 1 && joins(REGIONS[tile_y + 1][tile_x]);
        let left = tile_x > 0 && joins(REGIONS[tile_y][tile_x - 1]);
        let right = tile_x < TILES_ACROSS - 1 && joins(REGIONS[tile_y][tile_x + 1]);

        let (fill, dark, bright) = self.palette[region as usize].tile_shades();
        let base_y = tile_y * TILE_HEIGHT;
        let base_x = tile_x * TILE_WIDTH;

        for y in 0..TILE_HEIGHT {
            for x in 0..TILE_WIDTH {
                self.raster[(base_y + y) * GRID_WIDTH + base_x + x] = fill;
            }
        }

        // The inner bevel lines stop short of an exposed perpendicular edge
        // so the corners mitre cleanly.
        let runs = |near: bool, far: bool, offset: usize, inset: usize, extent: usize| {
            (near || offset >= inset) && (far || offset < extent - inset)
        };

        if !top {
            for offset in 0..TILE_WIDTH {
                self.raster[base_y * GRID_WIDTH + base_x + offset] = color::BLACK;
                if runs(left, right, offset, 1, TILE_WIDTH) {
                    self.raster[(base_y + 1) * GRID_WIDTH + base_x + offset] = dark;
                }
                if runs(left, right, offset, 2, TILE_WIDTH) {
                    self.raster[(base_y + 2) * GRID_WIDTH + base_x + offset] = bright;
                }
            }
        }
        if !bottom {
            let edge = base_y + TILE_HEIGHT - 1;
            for offset in 0..TILE_WIDTH {
                self.raster[edge * GRID_WIDTH + base_x + offset] = color::BLACK;
                if runs(left, right, offset, 1, TILE_WIDTH) {
                    self.raster[(edge - 1) * GRID_WIDTH + base_x + offset] = dark;
                }
                if runs(left, right, offset, 2, TILE_WIDTH) {
                    self.raster[(edge - 2) * GRID_WIDTH + base_x + offset] = bright;
                }
            }
        }
        if !left {
            for offset in 0..TILE_HEIGHT {
                self.raster[(base_y + offset) * GRID_WIDTH + base_x] = color::BLACK;
                if runs(top, bottom, offset, 1, TILE_HEIGHT) {
                    self.raster[(base_y + offset) * GRID_WIDTH + base_x + 1] = dark;
                }
                if runs(top, bottom, offset, 2, TILE_HEIGHT) {
                    self.raster[(base_y + offset) * GRID_WIDTH + base_x + 2] = bright;
                }
            }
        }
        if !right {
            let edge = base_x + TILE_WIDTH - 1;
            for offset in 0..TILE_HEIGHT {
                self.raster[(base_y + offset) * GRID_WIDTH + edge] = color::BLACK;
                if runs(top, bottom, offset, 1, TILE_HEIGHT) {
                    self.raster[(base_y + offset) * GRID_WIDTH + edge - 1] = dark;
                }
                if runs(top, bottom, offset, 2, TILE_HEIGHT) {
                    self.raster[(base_y + offset) * GRID_WIDTH + edge - 2] = bright;
                }
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::new()
    }
}
