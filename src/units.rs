/// Converts tyre pressure from psi to bar.
#[must_use]
pub fn psi_to_bar(psi: f32) -> f32 {
    psi * 0.0689
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn race_pressures_land_near_two_bar() {
        let bar = psi_to_bar(27.5);
        assert!((bar - 1.89475).abs() < 1e-5, "{bar}");
    }
}
