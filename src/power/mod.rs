pub(crate) mod i2c;

use std::sync::Arc;

use thiserror::Error;

use crate::link::MemoryBus;

pub use self::i2c::{I2C_BRIDGE_BASE, I2cBridge, I2cError};

const MONITOR_ADDRESS: u8 = 0x40;
const VOLTAGE_REGISTERS: [u8; 3] = [0x02, 0x04, 0x06];
const CURRENT_REGISTERS: [u8; 3] = [0x01, 0x03, 0x05];
const VOLTAGE_OFFSET_V: f32 = -6.6;
const SHUNT_OHMS: [f32; 3] = [0.1, 0.1, 0.1];

/// Errors from reading the power monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    I2c(#[from] I2cError),
}

/// One supply rail reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelSample {
    pub voltage_v: f32,
    pub current_ma: f32,
}

/// All three supply rails of the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerStatus {
    pub channels: [ChannelSample; 3],
}

impl PowerStatus {
    /// Total draw across the rails in watts.
    #[must_use]
    pub fn total_power_w(&self) -> f32 {
        self.channels
            .iter()
            .map(|channel| channel.voltage_v * channel.current_ma)
            .sum::<f32>()
            / 1000.0
    }
}

/// INA-style three-channel power monitor on the panel's I2C bus.
#[derive(Clone)]
pub struct PowerMonitor {
    i2c: I2cBridge,
}

impl PowerMonitor {
    #[must_use]
    pub fn new(bus: Arc<dyn MemoryBus>) -> Self {
        Self {
            i2c: I2cBridge::new(bus),
        }
    }

    /// Samples voltage and current on every channel.
    ///
    /// # Errors
    ///
    /// Returns an error when any register read fails.
    pub async fn status(&self) -> Result<PowerStatus, MonitorError> {
        let mut status = PowerStatus::default();
        for (channel, sample) in status.channels.iter_mut().enumerate() {
            let raw = self
                .i2c
                .read16(MONITOR_ADDRESS, VOLTAGE_REGISTERS[channel])
                .await?;
            sample.voltage_v = convert_voltage(raw);
            let raw = self
                .i2c
                .read16(MONITOR_ADDRESS, CURRENT_REGISTERS[channel])
                .await?;
            sample.current_ma = convert_current(raw, SHUNT_OHMS[channel]);
        }
        Ok(status)
    }
}

/// Millivolt register to volts, corrected for the divider offset.
fn convert_voltage(raw: u16) -> f32 {
    f32::from(raw as i16) / 1000.0 + VOLTAGE_OFFSET_V
}

/// Shunt-voltage register to milliamps.
fn convert_current(raw: u16, shunt_ohms: f32) -> f32 {
    f32::from(raw as i16) / 200.0 / shunt_ohms
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::link::LoopbackDevice;

    use super::*;

    #[test]
    fn voltage_conversion_is_signed_with_offset() {
        assert_eq!(5.4, convert_voltage(12_000));
        // Register values are two's complement.
        assert_eq!(-7.6, convert_voltage(0xFC18));
    }

    #[test]
    fn current_conversion_scales_by_the_shunt() {
        assert_eq!(50.0, convert_current(1000, 0.1));
    }

    #[test]
    fn total_power_sums_all_rails() {
        let status = PowerStatus {
            channels: [
                ChannelSample {
                    voltage_v: 5.0,
                    current_ma: 200.0,
                },
                ChannelSample {
                    voltage_v: 3.3,
                    current_ma: 100.0,
                },
                ChannelSample::default(),
            ],
        };
        assert_eq!(1.33, status.total_power_w());
    }

    #[tokio::test]
    async fn unprogrammed_monitor_reads_the_bare_offsets() -> anyhow::Result<()> {
        let monitor = PowerMonitor::new(Arc::new(LoopbackDevice::new()));
        let status = monitor.status().await?;
        for channel in status.channels {
            assert_eq!(VOLTAGE_OFFSET_V, channel.voltage_v);
            assert_eq!(0.0, channel.current_ma);
        }
        Ok(())
    }
}
