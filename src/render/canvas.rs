use thiserror::Error;
use tracing::{debug, warn};

use crate::link::{DEVICE_ID_ADDRESS, DEVICE_ID_WORD, FRAMEBUFFER_BASE, LinkError, MemoryBus};

use super::background::Background;
use super::color::{self, ColorIndex};
use super::gear::GearOverlay;
use super::speed_bar::{BAR_HEIGHT, SpeedBar};
use super::text::{TextError, TextLayer};
use super::{GRID_HEIGHT, GRID_WIDTH};

/// Transfer unit for framebuffer updates, in bytes.
pub const CHUNK_BYTES: usize = 256;

/// Transfer unit for framebuffer updates, in words.
pub const CHUNK_WORDS: usize = CHUNK_BYTES / 4;

/// Whole-frame size in words.
pub const FRAME_WORDS: usize = GRID_WIDTH * GRID_HEIGHT;

/// Whole-frame size in bytes.
pub const FRAME_BYTES: usize = FRAME_WORDS * 4;

/// Number of chunks covering the frame.
pub const FRAME_CHUNKS: usize = FRAME_WORDS / CHUNK_WORDS;

/// A liveness probe goes out once this many bytes have been written since
/// the previous probe.
pub const PROBE_INTERVAL_BYTES: usize = 10_000;

/// Errors from pushing a frame to the device.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// One or more chunk writes failed; the rest of the frame was still
    /// attempted and failed chunks stay dirty for the next transmission.
    #[error("{failed} of {attempted} chunk writes failed")]
    ChunkWritesFailed {
        failed: usize,
        attempted: usize,
        #[source]
        first: LinkError,
    },
}

/// Per-transmission transfer counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    chunks_sent: usize,
    bytes_sent: usize,
    probes: usize,
}

impl FrameStats {
    /// Chunks written during this transmission.
    #[must_use]
    pub fn chunks_sent(&self) -> usize {
        self.chunks_sent
    }

    /// Bytes written during this transmission.
    #[must_use]
    pub fn bytes_sent(&self) -> usize {
        self.bytes_sent
    }

    /// Liveness probes issued during this transmission.
    #[must_use]
    pub fn probes(&self) -> usize {
        self.probes
    }
}

/// Software framebuffer with chunk-level change tracking.
///
/// Screens mutate the layers; [`PixelCanvas::transmit`] composes them into
/// the pixel grid, diffs it against the last grid the device received, and
/// writes only the chunks that changed.
pub struct PixelCanvas {
    background: Background,
    text: TextLayer,
    bar: SpeedBar,
    gear: GearOverlay,
    current: Vec<u32>,
    previous: Vec<u32>,
    unprobed_bytes: usize,
    flip: bool,
}

impl PixelCanvas {
    /// Creates a canvas. The previous-frame snapshot is seeded with a colour
    /// no renderer produces, so the first transmission covers every chunk.
    #[must_use]
    pub fn new(flip: bool) -> Self {
        Self {
            background: Background::new(),
            text: TextLayer::new(),
            bar: SpeedBar::new(),
            gear: GearOverlay::new(),
            current: vec![color::BLACK.word(); FRAME_WORDS],
            previous: vec![color::UNUSED_GREEN.word(); FRAME_WORDS],
            unprobed_bytes: 0,
            flip,
        }
    }

    /// Writes `text` starting at the given character cell.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::DoesNotFit`] when the text would overrun the
    /// cell grid.
    pub fn set_text(&mut self, row: usize, col: usize, text: &str) -> Result<(), TextError> {
        self.text.set_text(row, col, text)
    }

    /// Blanks the text layer.
    pub fn clear_text(&mut self) {
        self.text.clear();
    }

    /// Recolours one background region.
    pub fn set_region_color(&mut self, region: usize, color: ColorIndex) {
        self.background.set_color(region, color);
    }

    /// Resets the background palette.
    pub fn reset_background(&mut self) {
        self.background.reset();
    }

    /// Sets the top-band gauge value.
    pub fn set_bar_value(&mut self, value: u32) {
        self.bar.set_value(value);
    }

    /// Returns the top-band gauge value.
    #[must_use]
    pub fn bar_value(&self) -> u32 {
        self.bar.value()
    }

    /// Shows a character in the gear pane.
    pub fn set_gear(&mut self, character: char) {
        self.gear.set_gear(character);
    }

    /// Deactivates the gear pane.
    pub fn clear_gear(&mut self) {
        self.gear.clear();
    }

    /// Returns the characters stored in `len` text cells starting at the
    /// given cell.
    #[must_use]
    pub fn text_at(&self, row: usize, col: usize, len: usize) -> String {
        self.text.text_at(row, col, len)
    }

    /// Background colour at panel coordinates, before overlays.
    #[cfg(test)]
    pub(crate) fn background_pixel(&self, y: usize, x: usize) -> super::Rgb12 {
        self.background.pixel(y, x)
    }

    /// Flattens the layer stack into the pixel grid. Overlay wins over bar,
    /// bar over text, text over background.
    fn compose(&mut self) {
        let Self {
            background,
            text,
            bar,
            gear,
            current,
            ..
        } = self;
        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH {
                let pixel = gear.pixel(y, x).unwrap_or_else(|| {
                    if y < BAR_HEIGHT {
                        bar.pixel(y, x)
                    } else if text.pixel(y, x) {
                        color::WHITE
                    } else {
                        background.pixel(y, x)
                    }
                });
                current[y * GRID_WIDTH + x] = pixel.word();
            }
        }
    }

    /// Composes the layers and pushes every changed chunk to the device.
    ///
    /// Chunks that transfer successfully are recorded as received and will
    /// not be resent; failed chunks stay dirty and go out with the next
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ChunkWritesFailed`] when any chunk write
    /// failed.
    pub async fn transmit(&mut self, bus: &dyn MemoryBus) -> Result<FrameStats, CanvasError> {
        self.compose();

        let mut stats = FrameStats::default();
        let mut attempted = 0;
        let mut failed = 0;
        let mut first_error = None;

        for chunk in 0..FRAME_CHUNKS {
            let words = chunk * CHUNK_WORDS..(chunk + 1) * CHUNK_WORDS;
            if self.current[words.clone()] == self.previous[words.clone()] {
                continue;
            }
            attempted += 1;

            // A flipped panel receives the mirrored chunk with its words
            // reversed; change tracking always runs on the logical grid.
            let (address, payload) = if self.flip {
                let mirrored = FRAME_CHUNKS - 1 - chunk;
                let mut reversed = self.current[words.clone()].to_vec();
                reversed.reverse();
                (chunk_address(mirrored), reversed)
            } else {
                (chunk_address(chunk), self.current[words.clone()].to_vec())
            };

            match bus.write_block(address, &payload).await {
                Ok(()) => {
                    let (current, previous) = (&self.current[words.clone()], &mut self.previous[words]);
                    previous.copy_from_slice(current);
                    stats.chunks_sent += 1;
                    stats.bytes_sent += CHUNK_BYTES;
                    self.unprobed_bytes += CHUNK_BYTES;
                }
                Err(error) => {
                    failed += 1;
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                    continue;
                }
            }

            if self.unprobed_bytes >= PROBE_INTERVAL_BYTES {
                self.unprobed_bytes = 0;
                stats.probes += 1;
                probe_device(bus).await;
            }
        }

        debug!(
            chunks = stats.chunks_sent,
            bytes = stats.bytes_sent,
            probes = stats.probes,
            "frame transmitted"
        );
        match first_error {
            Some(first) => Err(CanvasError::ChunkWritesFailed {
                failed,
                attempted,
                first,
            }),
            None => Ok(stats),
        }
    }
}

/// Device address of a chunk's first word.
fn chunk_address(chunk: usize) -> u32 {
    FRAMEBUFFER_BASE + (chunk * CHUNK_BYTES) as u32
}

/// Reads the identity register back mid-stream. Purely advisory; a wrong or
/// missing answer is logged and the frame keeps going.
async fn probe_device(bus: &dyn MemoryBus) {
    match bus.read_word(DEVICE_ID_ADDRESS).await {
        Ok(DEVICE_ID_WORD) => {}
        Ok(word) => warn!(word = format_args!("{word:#010x}"), "identity probe returned wrong word"),
        Err(error) => warn!(%error, "identity probe failed"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::link::LoopbackDevice;

    use super::*;

    #[tokio::test]
    async fn first_frame_covers_the_whole_panel() -> Result<(), CanvasError> {
        let device = LoopbackDevice::new();
        let mut canvas = PixelCanvas::new(false);
        let stats = canvas.transmit(&device).await?;
        assert_eq!(FRAME_CHUNKS, stats.chunks_sent());
        assert_eq!(FRAME_BYTES, stats.bytes_sent());
        assert_eq!(30, stats.probes());
        Ok(())
    }

    #[tokio::test]
    async fn unchanged_frame_sends_nothing() -> Result<(), CanvasError> {
        let device = LoopbackDevice::new();
        let mut canvas = PixelCanvas::new(false);
        canvas.transmit(&device).await?;
        let stats = canvas.transmit(&device).await?;
        assert_eq!(0, stats.chunks_sent());
        assert_eq!(0, stats.bytes_sent());
        Ok(())
    }

    #[tokio::test]
    async fn small_change_sends_only_touched_chunks() -> Result<(), CanvasError> {
        let device = LoopbackDevice::new();
        let mut canvas = PixelCanvas::new(false);
        canvas.transmit(&device).await?;
        canvas.set_bar_value(8000);
        let stats = canvas.transmit(&device).await?;
        // The fill touches the bar band only: rows 2..=42 of 320 words are
        // 41 rows, 13120 words, at most 206 chunks plus boundary overlap.
        assert!(stats.chunks_sent() > 0);
        assert!(stats.chunks_sent() < 250, "{} chunks", stats.chunks_sent());
        Ok(())
    }

    #[tokio::test]
    async fn device_receives_the_composed_grid() -> anyhow::Result<()> {
        let device = LoopbackDevice::new();
        let mut canvas = PixelCanvas::new(false);
        canvas.transmit(&device).await?;
        // Pixel (0, 0) sits on the bar frame and reads grey.
        assert_eq!(
            color::GREY.word(),
            device.read_word(FRAMEBUFFER_BASE).await?
        );
        Ok(())
    }

    #[tokio::test]
    async fn flipped_transmission_mirrors_addresses_and_words() -> anyhow::Result<()> {
        let straight_device = LoopbackDevice::new();
        let flipped_device = LoopbackDevice::new();
        let mut straight = PixelCanvas::new(false);
        let mut flipped = PixelCanvas::new(true);
        straight.transmit(&straight_device).await?;
        flipped.transmit(&flipped_device).await?;

        // Word w of the logical grid lands at mirrored word position.
        for word in [0usize, 1, 320, 12_345, FRAME_WORDS - 1] {
            let logical = straight_device
                .read_word(FRAMEBUFFER_BASE + (word * 4) as u32)
                .await?;
            let mirrored = flipped_device
                .read_word(FRAMEBUFFER_BASE + ((FRAME_WORDS - 1 - word) * 4) as u32)
                .await?;
            assert_eq!(logical, mirrored, "word {word}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn text_renders_white_over_the_background() -> Result<(), CanvasError> {
        let device = LoopbackDevice::new();
        let mut canvas = PixelCanvas::new(false);
        canvas.set_text(5, 4, "1").expect("cell is on the grid");
        canvas.transmit(&device).await?;
        // Row 1 of '1' is 0x18: columns 3 and 4 of the cell are set. The
        // glyph grid is shifted up by the vertical offset.
        let y = 5 * 15 + 1 - 7;
        let x = 4 * 8 + 3;
        let word = device
            .read_word(FRAMEBUFFER_BASE + ((y * GRID_WIDTH + x) * 4) as u32)
            .await
            .expect("loopback reads never fail");
        assert_eq!(color::WHITE.word(), word);
        Ok(())
    }
}
