pub(crate) mod background;
pub(crate) mod big_font;
pub(crate) mod canvas;
pub(crate) mod color;
pub(crate) mod font;
pub(crate) mod gear;
pub(crate) mod speed_bar;
pub(crate) mod text;

/// Panel width in pixels.
pub const GRID_WIDTH: usize = 320;

/// Panel height in pixels.
pub const GRID_HEIGHT: usize = 240;

pub use self::background::{ABS_REGION, REGION_COUNT, TC_REGION};
pub use self::canvas::{
    CHUNK_BYTES, CHUNK_WORDS, CanvasError, FRAME_BYTES, FRAME_CHUNKS, FrameStats, PROBE_INTERVAL_BYTES,
    PixelCanvas,
};
pub use self::color::{ColorIndex, Rgb12};
pub use self::speed_bar::{BAR_HEIGHT, BAR_MAX};
pub use self::text::{TEXT_COLS, TEXT_ROWS, TextError};
