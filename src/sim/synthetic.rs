use super::{GraphicsSnapshot, PhysicsSnapshot, SimError, TelemetrySource};

/// Self-generating telemetry for demo runs without the simulator.
///
/// Sweeps rpm and speed through their ranges and cycles the gears so every
/// dashboard element visibly changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticTelemetry {
    tick: u32,
}

impl SyntheticTelemetry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetrySource for SyntheticTelemetry {
    fn try_open(&mut self) -> bool {
        true
    }

    fn read_snapshot(&mut self) -> Result<(PhysicsSnapshot, GraphicsSnapshot), SimError> {
        let tick = self.tick;
        self.tick = self.tick.wrapping_add(1);

        let sweep = tick % 600;
        let rpm = (sweep * 8000 / 600) as i32;
        let physics = PhysicsSnapshot {
            fuel_l: 65.0 - (tick % 6000) as f32 * 0.01,
            gear: (2 + (tick / 600) % 6) as i32,
            rpm,
            speed_kph: rpm as f32 * 0.035,
            wheel_pressure_psi: [27.4, 27.6, 26.9, 27.1],
            tyre_core_temp_c: [82.0, 84.0, 79.0, 80.0],
            tc_active: if sweep > 540 { 1.0 } else { 0.0 },
            abs_active: if sweep < 30 { 1.0 } else { 0.0 },
            brake_temp_c: [412.5, 418.0, 361.2, 355.9],
            brake_bias: 0.64,
            ..PhysicsSnapshot::default()
        };
        let graphics = GraphicsSnapshot {
            position: 3,
            current_time_ms: (tick * 17) as i32,
            best_time_ms: 94_372,
            completed_laps: (tick / 5400) as i32,
            tc_level: 2,
            abs_level: 1,
            valid_lap: true,
            ..GraphicsSnapshot::default()
        };
        Ok((physics, graphics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_opens_and_always_reads() {
        let mut source = SyntheticTelemetry::new();
        assert!(source.try_open());
        let (physics, _graphics) = source.read_snapshot().expect("synthetic reads never fail");
        assert!(physics.rpm >= 0);
        let (later, _graphics) = source.read_snapshot().expect("synthetic reads never fail");
        assert!(later.rpm != physics.rpm || later.fuel_l != physics.fuel_l);
    }
}
