use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{DEVICE_ID_ADDRESS, DEVICE_ID_WORD, LinkError, MemoryBus};

/// In-memory stand-in for the remote device's address space.
///
/// Backs fake runs and tests: a sparse word store seeded with the identity
/// word at address 0 so the liveness probe succeeds. Unwritten words read
/// back as zero.
#[derive(Debug)]
pub struct LoopbackDevice {
    words: Mutex<HashMap<u32, u32>>,
}

impl LoopbackDevice {
    /// Creates an empty device with the identity register seeded.
    #[must_use]
    pub fn new() -> Self {
        let mut words = HashMap::new();
        words.insert(DEVICE_ID_ADDRESS, DEVICE_ID_WORD);
        Self {
            words: Mutex::new(words),
        }
    }
}

impl Default for LoopbackDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryBus for LoopbackDevice {
    async fn read_word(&self, address: u32) -> Result<u32, LinkError> {
        let words = self.words.lock().await;
        Ok(words.get(&address).copied().unwrap_or(0))
    }

    async fn write_word(&self, address: u32, value: u32) -> Result<(), LinkError> {
        let mut words = self.words.lock().await;
        words.insert(address, value);
        Ok(())
    }

    async fn read_block(&self, address: u32, len_bytes: u16) -> Result<Vec<u32>, LinkError> {
        let words = self.words.lock().await;
        Ok((0..len_bytes as u32 / 4)
            .map(|index| words.get(&(address + index * 4)).copied().unwrap_or(0))
            .collect())
    }

    async fn write_block(&self, address: u32, block: &[u32]) -> Result<(), LinkError> {
        let mut words = self.words.lock().await;
        for (index, word) in block.iter().enumerate() {
            words.insert(address + index as u32 * 4, *word);
        }
        Ok(())
    }
}
