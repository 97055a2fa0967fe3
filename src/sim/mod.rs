pub(crate) mod scripted;
pub(crate) mod synthetic;

use thiserror::Error;

pub use self::scripted::ScriptedTelemetry;
pub use self::synthetic::SyntheticTelemetry;

/// Errors from reading a telemetry snapshot.
#[derive(Debug, Error)]
pub enum SimError {
    /// The backing source disappeared or was never there.
    #[error("telemetry source is not available")]
    Unavailable,
}

/// Car-state sample, one per telemetry read.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicsSnapshot {
    pub fuel_l: f32,
    /// 0 = reverse, 1 = neutral, n = forward gear n-1.
    pub gear: i32,
    pub rpm: i32,
    pub speed_kph: f32,
    pub wheel_pressure_psi: [f32; 4],
    pub tyre_core_temp_c: [f32; 4],
    pub car_damage: [f32; 5],
    /// Nonzero while traction control is cutting power.
    pub tc_active: f32,
    /// Nonzero while ABS is modulating brake pressure.
    pub abs_active: f32,
    pub brake_temp_c: [f32; 4],
    /// Front brake bias as a fraction, zero when the sim reports none.
    pub brake_bias: f32,
}

/// Session-state sample, one per telemetry read.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphicsSnapshot {
    pub position: i32,
    pub current_time_ms: i32,
    pub last_time_ms: i32,
    pub best_time_ms: i32,
    pub completed_laps: i32,
    /// Driver-selected traction-control level.
    pub tc_level: i32,
    /// Driver-selected ABS level.
    pub abs_level: i32,
    pub delta_lap_time_ms: i32,
    pub delta_positive: bool,
    pub valid_lap: bool,
}

/// Provider of live car telemetry.
///
/// A source starts closed; the controller keeps calling [`try_open`] until
/// it succeeds and falls back to the splash screen whenever a read fails.
///
/// [`try_open`]: TelemetrySource::try_open
pub trait TelemetrySource: Send {
    /// Attempts to attach to the backing source.
    fn try_open(&mut self) -> bool;

    /// Reads one snapshot pair.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Unavailable`] when the source has gone away.
    fn read_snapshot(&mut self) -> Result<(PhysicsSnapshot, GraphicsSnapshot), SimError>;
}

/// Source that never opens. Stands in for the platform-specific
/// shared-memory reader on hosts without the simulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableTelemetry;

impl TelemetrySource for UnavailableTelemetry {
    fn try_open(&mut self) -> bool {
        false
    }

    fn read_snapshot(&mut self) -> Result<(PhysicsSnapshot, GraphicsSnapshot), SimError> {
        Err(SimError::Unavailable)
    }
}
