use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bon::Builder;
use strum_macros::Display;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::link::MemoryBus;
use crate::power::PowerMonitor;
use crate::render::PixelCanvas;
use crate::sim::TelemetrySource;

use super::dash::DashScreen;
use super::splash::SplashScreen;

/// Controller construction parameters.
#[derive(Debug, Clone, Copy, Builder)]
pub struct DisplayConfig {
    /// Tick period; the panel refreshes at roughly 60 Hz.
    #[builder(default = Duration::from_micros(16_666))]
    refresh_period: Duration,
    /// Ticks an indicator flash lingers after the flag clears.
    #[builder(default = 30)]
    hold_ticks: u32,
    /// Drive the panel rotated 180 degrees.
    #[builder(default = false)]
    flip: bool,
    /// Car-specific brake-bias display correction in percent.
    #[builder(default = 14)]
    brake_bias_offset: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DisplayConfig {
    /// Returns the tick period.
    #[must_use]
    pub fn refresh_period(&self) -> Duration {
        self.refresh_period
    }

    /// Returns the indicator hold duration in ticks.
    #[must_use]
    pub fn hold_ticks(&self) -> u32 {
        self.hold_ticks
    }

    /// Returns whether the panel is driven rotated.
    #[must_use]
    pub fn flip(&self) -> bool {
        self.flip
    }

    /// Returns the brake-bias display correction.
    #[must_use]
    pub fn brake_bias_offset(&self) -> i32 {
        self.brake_bias_offset
    }
}

/// What one tick ended up doing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TickOutcome {
    /// The previous tick was still running; this one did nothing.
    SkippedBusy,
    /// No telemetry source; the splash frame went out.
    Splash,
    /// A snapshot was rendered and transmitted.
    Dashboard,
    /// The telemetry source went away; back to the splash next tick.
    LostTelemetry,
}

/// Everything a tick mutates, behind one lock.
struct ControllerState {
    connected: bool,
    telemetry: Box<dyn TelemetrySource>,
    canvas: PixelCanvas,
    dash: DashScreen,
    splash: SplashScreen,
    monitor: PowerMonitor,
}

/// Periodic display driver.
///
/// Sequences "no telemetry, splash" against "live dashboard" and pushes one
/// frame per tick. Ticks never queue: a tick arriving while the previous
/// one still runs is skipped outright.
pub struct DisplayController {
    bus: Arc<dyn MemoryBus>,
    state: Mutex<ControllerState>,
    tick_busy: AtomicBool,
    period: Duration,
}

impl DisplayController {
    #[must_use]
    pub fn new(
        bus: Arc<dyn MemoryBus>,
        telemetry: Box<dyn TelemetrySource>,
        config: &DisplayConfig,
    ) -> Self {
        let monitor = PowerMonitor::new(Arc::clone(&bus));
        Self {
            bus,
            state: Mutex::new(ControllerState {
                connected: false,
                telemetry,
                canvas: PixelCanvas::new(config.flip()),
                dash: DashScreen::new(config.hold_ticks(), config.brake_bias_offset()),
                splash: SplashScreen::new(),
                monitor,
            }),
            tick_busy: AtomicBool::new(false),
            period: config.refresh_period(),
        }
    }

    /// Runs one tick.
    pub async fn tick(&self) -> TickOutcome {
        if self
            .tick_busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            trace!("tick still in progress, skipping");
            return TickOutcome::SkippedBusy;
        }
        let _busy = BusyGuard(&self.tick_busy);

        let mut state = self.state.lock().await;
        if !state.connected {
            if state.telemetry.try_open() {
                info!("telemetry attached, switching to dashboard");
                state.connected = true;
                let ControllerState { canvas, dash, .. } = &mut *state;
                dash.reset(canvas);
                state.splash.reset();
            } else {
                let ControllerState {
                    canvas,
                    splash,
                    monitor,
                    ..
                } = &mut *state;
                if let Err(error) = splash.render(canvas, monitor).await {
                    warn!(%error, "splash text out of bounds");
                }
                self.transmit(canvas).await;
                return TickOutcome::Splash;
            }
        }

        let snapshot = match state.telemetry.read_snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                info!(%error, "telemetry lost, switching to splash");
                state.connected = false;
                return TickOutcome::LostTelemetry;
            }
        };
        let (physics, graphics) = snapshot;
        let ControllerState { canvas, dash, .. } = &mut *state;
        if let Err(error) = dash.apply(canvas, &physics, &graphics) {
            warn!(%error, "dashboard text out of bounds");
        }
        self.transmit(canvas).await;
        TickOutcome::Dashboard
    }

    /// Pushes the frame; transmission failure is not fatal, the next tick
    /// retries whatever stayed dirty.
    async fn transmit(&self, canvas: &mut PixelCanvas) {
        match canvas.transmit(self.bus.as_ref()).await {
            Ok(stats) => debug!(
                chunks = stats.chunks_sent(),
                bytes = stats.bytes_sent(),
                "frame pushed"
            ),
            Err(error) => warn!(%error, "frame transmission incomplete"),
        }
    }

    /// Drives ticks at the configured period until cancelled.
    ///
    /// Each tick runs on its own task so a slow frame never stalls the
    /// timer; overlapping ticks fall into the busy guard and are skipped.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut timer = tokio::time::interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(period = ?self.period, "display loop started");
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("display loop stopped");
                    return;
                }
                _ = timer.tick() => {
                    let controller = Arc::clone(&self);
                    tokio::spawn(async move {
                        let outcome = controller.tick().await;
                        trace!(%outcome, "tick finished");
                    });
                }
            }
        }
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
