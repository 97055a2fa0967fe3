use std::sync::Arc;

use thiserror::Error;

use crate::link::{LinkError, MemoryBus};

/// Base address of the I2C bridge registers in the remote address space.
pub const I2C_BRIDGE_BASE: u32 = 0x0040_0000;

/// The bridge latches a sticky error flag here after each transaction.
const ERROR_FLAG_OFFSET: u32 = 0x80;

/// Errors from I2C transactions over the memory bridge.
#[derive(Debug, Error)]
pub enum I2cError {
    /// 7-bit device addresses only.
    #[error("i2c device address {device:#04x} out of range")]
    InvalidDevice { device: u8 },
    /// The underlying memory access failed.
    #[error(transparent)]
    Link(#[from] LinkError),
    /// The bridge flagged the transaction as failed on the wire.
    #[error("i2c transaction flagged an error")]
    TransactionFailed,
}

/// I2C master behind a memory-mapped bridge.
///
/// A transaction is a register-pointer write followed by a data read, with
/// the transfer size encoded in bits 8..16 of the bridge address and the
/// device address in the low seven bits.
#[derive(Clone)]
pub struct I2cBridge {
    bus: Arc<dyn MemoryBus>,
}

impl I2cBridge {
    #[must_use]
    pub fn new(bus: Arc<dyn MemoryBus>) -> Self {
        Self { bus }
    }

    /// Reads one 16-bit register from `device`.
    ///
    /// # Errors
    ///
    /// Returns an error for an out-of-range device address, a failed memory
    /// access, or a transaction the bridge flagged as failed.
    pub async fn read16(&self, device: u8, register: u8) -> Result<u16, I2cError> {
        if device > 0x7F {
            return Err(I2cError::InvalidDevice { device });
        }

        // Point at the register (size 0: address byte only), then read two
        // bytes back (size 1).
        let pointer = bridge_address(0, device);
        self.bus
            .write_word(pointer, u32::from(register) << 24)
            .await?;
        let word = self.bus.read_word(bridge_address(1, device)).await?;

        let flag = self
            .bus
            .read_word(I2C_BRIDGE_BASE | ERROR_FLAG_OFFSET)
            .await?;
        if flag != 0 {
            return Err(I2cError::TransactionFailed);
        }
        Ok((word & 0xFFFF) as u16)
    }
}

fn bridge_address(size: u32, device: u8) -> u32 {
    I2C_BRIDGE_BASE | ((size << 8) & 0xFF00) | u32::from(device & 0x7F)
}
