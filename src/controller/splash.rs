use tracing::warn;

use crate::power::{PowerMonitor, PowerStatus};
use crate::render::{ABS_REGION, ColorIndex, PixelCanvas, TC_REGION, TextError};

const PHASE_STEP: u32 = 50;
const PHASE_WRAP: u32 = 8000;

/// Idle screen shown while no telemetry source is attached: supply-rail
/// readout, a sweeping bar, and two alternating indicator tiles.
#[derive(Debug, Default)]
pub struct SplashScreen {
    phase: u32,
}

impl SplashScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restarts the animation.
    pub fn reset(&mut self) {
        self.phase = 0;
    }

    /// Renders one animation frame into the canvas.
    ///
    /// A power-monitor failure is not worth losing the splash over; the
    /// readout falls back to zeros and the failure is logged.
    ///
    /// # Errors
    ///
    /// Returns an error when a formatted field does not fit its cells.
    pub async fn render(
        &mut self,
        canvas: &mut PixelCanvas,
        monitor: &PowerMonitor,
    ) -> Result<(), TextError> {
        let status = match monitor.status().await {
            Ok(status) => status,
            Err(error) => {
                warn!(%error, "power monitor read failed");
                PowerStatus::default()
            }
        };

        canvas.set_text(5, 29, &format!("{:>6.2}w", status.total_power_w()))?;
        let cells = [(5, 1), (9, 5), (9, 25)];
        for (channel, (row, col)) in cells.into_iter().enumerate() {
            let sample = status.channels[channel];
            canvas.set_text(row, col, &format!("{channel}: {:>6.2}v", sample.voltage_v))?;
            canvas.set_text(row + 2, col, &format!("{channel}: {:>6.2}ma", sample.current_ma))?;
        }
        canvas.set_text(5, 14, "waiting ...")?;

        self.phase = self.phase.wrapping_add(PHASE_STEP);
        canvas.set_bar_value(self.phase % PHASE_WRAP);

        let (tc, abs) = if (self.phase / 1000) % 2 == 0 {
            (ColorIndex::Yellow, ColorIndex::Blue)
        } else {
            (ColorIndex::Blue, ColorIndex::Yellow)
        };
        canvas.set_region_color(TC_REGION, tc);
        canvas.set_region_color(ABS_REGION, abs);
        Ok(())
    }
}
