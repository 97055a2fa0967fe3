use crate::render::{ABS_REGION, ColorIndex, PixelCanvas, TC_REGION, TextError};
use crate::sim::{GraphicsSnapshot, PhysicsSnapshot};
use crate::units::psi_to_bar;

/// Lap times above one hour are the simulator's "no time set" marker.
const NO_TIME_THRESHOLD_MS: i32 = 60 * 60 * 1000;

/// Live dashboard screen: formats one telemetry snapshot into the canvas
/// layers.
#[derive(Debug)]
pub struct DashScreen {
    hold_ticks: u32,
    bias_offset: i32,
    tc_hold: u32,
    abs_hold: u32,
}

impl DashScreen {
    /// Creates the screen. `hold_ticks` is how long an indicator flash
    /// lingers; `bias_offset` is the car-specific correction subtracted from
    /// the reported brake-bias percentage.
    #[must_use]
    pub fn new(hold_ticks: u32, bias_offset: i32) -> Self {
        Self {
            hold_ticks,
            bias_offset,
            tc_hold: 0,
            abs_hold: 0,
        }
    }

    /// Clears screen-local state and the canvas regions this screen owns.
    pub fn reset(&mut self, canvas: &mut PixelCanvas) {
        self.tc_hold = 0;
        self.abs_hold = 0;
        canvas.clear_text();
        canvas.clear_gear();
        canvas.reset_background();
    }

    /// Writes one snapshot pair into the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error when a formatted field does not fit its cells; the
    /// coordinates are fixed, so this only fires on out-of-range telemetry.
    pub fn apply(
        &mut self,
        canvas: &mut PixelCanvas,
        physics: &PhysicsSnapshot,
        graphics: &GraphicsSnapshot,
    ) -> Result<(), TextError> {
        self.tc_hold = update_hold(self.tc_hold, self.hold_ticks, physics.tc_active != 0.0);
        flash_region(canvas, TC_REGION, self.tc_hold, self.hold_ticks);
        self.abs_hold = update_hold(self.abs_hold, self.hold_ticks, physics.abs_active != 0.0);
        flash_region(canvas, ABS_REGION, self.abs_hold, self.hold_ticks);

        let speed = physics.speed_kph.round() as i32;
        canvas.set_text(5, 4, &format!("{speed:>3} kph"))?;
        canvas.set_text(7, 5, &format!("{:>2} lap", graphics.completed_laps))?;
        canvas.set_text(5, 31, &format!("{:>5.2} l", physics.fuel_l))?;
        canvas.set_text(7, 31, &format!("{:>4} rpm", physics.rpm))?;

        canvas.set_text(5, 13, &format!("time {}", format_lap_time(graphics.current_time_ms)))?;
        let best = if graphics.best_time_ms > NO_TIME_THRESHOLD_MS {
            "best --:--:---".to_owned()
        } else {
            format!("best {}", format_lap_time(graphics.best_time_ms))
        };
        canvas.set_text(7, 13, &best)?;

        canvas.set_text(15, 17, &format!("pos {:>2}", graphics.position))?;

        for (corner, (row, col)) in [(9, 5), (9, 25), (11, 5), (11, 25)].into_iter().enumerate() {
            let temp = physics.tyre_core_temp_c[corner] as i32;
            let pressure = psi_to_bar(physics.wheel_pressure_psi[corner]);
            canvas.set_text(row, col, &format!("{temp:>2}\u{B0} {pressure:.1}bar"))?;
        }

        canvas.set_text(13, 25, &format!("tc   {:>1}", graphics.tc_level))?;
        canvas.set_text(13, 33, &format!("abs  {:>1}", graphics.abs_level))?;
        let bias = brake_bias_percent(physics.brake_bias, self.bias_offset);
        canvas.set_text(15, 25, &format!("bias   {bias:>2}%"))?;

        for (corner, (row, col)) in [(13, 2), (13, 10), (15, 2), (15, 10)].into_iter().enumerate() {
            canvas.set_text(row, col, &format!("{:>5.1}\u{B0}", physics.brake_temp_c[corner]))?;
        }

        canvas.set_text(13, 18, "gear")?;
        canvas.set_gear(gear_label(physics.gear));
        canvas.set_bar_value(physics.rpm.max(0) as u32);
        Ok(())
    }
}

/// Advances one decaying hold counter.
fn update_hold(counter: u32, hold_ticks: u32, active: bool) -> u32 {
    if active {
        hold_ticks
    } else {
        counter.saturating_sub(1)
    }
}

/// Recolours an indicator region on the flash edges: yellow when the hold
/// starts decaying, back to blue on its last tick. A zero hold disables the
/// flash.
fn flash_region(canvas: &mut PixelCanvas, region: usize, counter: u32, hold_ticks: u32) {
    if hold_ticks == 0 {
        return;
    }
    if counter == hold_ticks - 1 {
        canvas.set_region_color(region, ColorIndex::Yellow);
    }
    if counter == 1 {
        canvas.set_region_color(region, ColorIndex::Blue);
    }
}

/// Reported fraction to a display percentage, minus the car-specific
/// offset. Zero means the simulator reported no bias at all.
fn brake_bias_percent(bias: f32, offset: i32) -> i32 {
    if bias == 0.0 {
        0
    } else {
        (bias * 100.0) as i32 - offset
    }
}

/// Formats milliseconds as `mm:ss:mmm`.
fn format_lap_time(time_ms: i32) -> String {
    let millis = time_ms % 1000;
    let seconds = (time_ms / 1000) % 60;
    let minutes = time_ms / 60_000;
    format!("{minutes:>2}:{seconds:02}:{millis:03}")
}

/// Maps the simulator's gear encoding to the indicator character.
fn gear_label(gear: i32) -> char {
    match gear {
        0 => 'R',
        1 => 'N',
        gear => char::from_digit((gear - 1).clamp(0, 9) as u32, 10).unwrap_or('N'),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::render::color;

    use super::*;

    fn snapshot() -> (PhysicsSnapshot, GraphicsSnapshot) {
        (
            PhysicsSnapshot {
                fuel_l: 42.5,
                gear: 4,
                rpm: 6450,
                speed_kph: 187.4,
                wheel_pressure_psi: [27.5; 4],
                tyre_core_temp_c: [82.0; 4],
                brake_temp_c: [412.5, 418.0, 361.2, 355.9],
                brake_bias: 0.64,
                ..PhysicsSnapshot::default()
            },
            GraphicsSnapshot {
                position: 3,
                current_time_ms: 83_456,
                best_time_ms: 94_372,
                completed_laps: 12,
                tc_level: 2,
                abs_level: 1,
                ..GraphicsSnapshot::default()
            },
        )
    }

    #[test]
    fn formats_every_field_at_its_cell() -> Result<(), TextError> {
        let mut canvas = PixelCanvas::new(false);
        let mut screen = DashScreen::new(30, 14);
        let (physics, graphics) = snapshot();
        screen.apply(&mut canvas, &physics, &graphics)?;

        assert_eq!("187 kph", canvas.text_at(5, 4, 7));
        assert_eq!("12 lap", canvas.text_at(7, 5, 6));
        assert_eq!("42.50 l", canvas.text_at(5, 31, 7));
        assert_eq!("6450 rpm", canvas.text_at(7, 31, 8));
        assert_eq!("time  1:23:456", canvas.text_at(5, 13, 14));
        assert_eq!("best  1:34:372", canvas.text_at(7, 13, 14));
        assert_eq!("pos  3", canvas.text_at(15, 17, 6));
        assert_eq!("82\u{B0} 1.9bar", canvas.text_at(9, 5, 10));
        assert_eq!("tc   2", canvas.text_at(13, 25, 6));
        assert_eq!("abs  1", canvas.text_at(13, 33, 6));
        assert_eq!("bias   50%", canvas.text_at(15, 25, 10));
        assert_eq!("412.5\u{B0}", canvas.text_at(13, 2, 6));
        assert_eq!("gear", canvas.text_at(13, 18, 4));
        assert_eq!(6450, canvas.bar_value());
        Ok(())
    }

    #[rstest]
    #[case(0, 'R')]
    #[case(1, 'N')]
    #[case(2, '1')]
    #[case(4, '3')]
    #[case(8, '7')]
    fn gear_encoding_maps_to_labels(#[case] gear: i32, #[case] expected: char) {
        assert_eq!(expected, gear_label(gear));
    }

    #[test]
    fn unset_best_time_renders_dashes() -> Result<(), TextError> {
        let mut canvas = PixelCanvas::new(false);
        let mut screen = DashScreen::new(30, 14);
        let (physics, mut graphics) = snapshot();
        graphics.best_time_ms = 3_700_000;
        screen.apply(&mut canvas, &physics, &graphics)?;
        assert_eq!("best --:--:---", canvas.text_at(7, 13, 14));
        Ok(())
    }

    #[test]
    fn zero_brake_bias_reports_zero_percent() -> Result<(), TextError> {
        let mut canvas = PixelCanvas::new(false);
        let mut screen = DashScreen::new(30, 14);
        let (mut physics, graphics) = snapshot();
        physics.brake_bias = 0.0;
        screen.apply(&mut canvas, &physics, &graphics)?;
        assert_eq!("bias    0%", canvas.text_at(15, 25, 10));
        Ok(())
    }

    #[test]
    fn hold_counter_flashes_once_and_snaps_back() {
        // Active for one tick, inactive afterwards: yellow fires on the
        // first decay tick, blue on the last.
        let hold = 4;
        let mut counter = update_hold(0, hold, true);
        assert_eq!(4, counter);
        counter = update_hold(counter, hold, false);
        assert_eq!(3, counter);
        assert_eq!(hold - 1, counter, "yellow edge");
        counter = update_hold(counter, hold, false);
        assert_eq!(2, counter);
        counter = update_hold(counter, hold, false);
        assert_eq!(1, counter, "blue edge");
        counter = update_hold(counter, hold, false);
        assert_eq!(0, counter);
        counter = update_hold(counter, hold, false);
        assert_eq!(0, counter);
    }

    #[test]
    fn zero_hold_disables_the_flash() -> Result<(), TextError> {
        let mut canvas = PixelCanvas::new(false);
        let mut screen = DashScreen::new(0, 14);
        let (mut physics, graphics) = snapshot();

        physics.tc_active = 1.0;
        screen.apply(&mut canvas, &physics, &graphics)?;
        physics.tc_active = 0.0;
        screen.apply(&mut canvas, &physics, &graphics)?;
        // Region 0x0D keeps its default colour; interior pixel of its tiles.
        assert_eq!(color::BLUE, canvas.background_pixel(195, 210));
        Ok(())
    }

    #[test]
    fn indicator_region_sequence_on_canvas() -> Result<(), TextError> {
        let mut canvas = PixelCanvas::new(false);
        let mut screen = DashScreen::new(3, 14);
        let (mut physics, graphics) = snapshot();

        physics.tc_active = 1.0;
        screen.apply(&mut canvas, &physics, &graphics)?;
        assert_eq!(3, screen.tc_hold);

        physics.tc_active = 0.0;
        screen.apply(&mut canvas, &physics, &graphics)?;
        assert_eq!(2, screen.tc_hold);
        screen.apply(&mut canvas, &physics, &graphics)?;
        assert_eq!(1, screen.tc_hold);
        screen.apply(&mut canvas, &physics, &graphics)?;
        assert_eq!(0, screen.tc_hold);
        Ok(())
    }
}
