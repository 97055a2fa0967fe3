pub(crate) mod loopback;
pub(crate) mod udp;
pub(crate) mod wire;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use self::loopback::LoopbackDevice;
pub use self::udp::{LinkConfig, UdpMemoryLink};
pub use self::wire::{LengthFieldWidth, Opcode, PacketId, WireCodec, WireError};

/// Word address of the device-identity register used as the liveness probe.
pub const DEVICE_ID_ADDRESS: u32 = 0x0000_0000;

/// Identity word the device echoes from [`DEVICE_ID_ADDRESS`].
pub const DEVICE_ID_WORD: u32 = 0xBEEF_0123;

/// Base address of the framebuffer region in the remote address space.
pub const FRAMEBUFFER_BASE: u32 = 0x0080_0000;

/// Errors returned by memory-link operations.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Request or response bytes violated the wire protocol.
    #[error(transparent)]
    Wire(#[from] WireError),
    /// Sending the request datagram failed.
    #[error("failed to send request datagram")]
    Send(#[source] std::io::Error),
    /// Receiving the response datagram failed.
    #[error("failed to receive response datagram")]
    Recv(#[source] std::io::Error),
    /// The device stayed silent past the receive deadline.
    #[error("no response within {timeout:?}")]
    RecvTimeout { timeout: Duration },
}

/// Word-granular access to the remote device's address space.
///
/// Implemented by the real UDP link and by the in-memory loopback device used
/// for fake runs and tests. Exactly one request is in flight at a time; the
/// implementations serialise callers internally.
#[async_trait]
pub trait MemoryBus: Send + Sync {
    /// Reads one 32-bit word.
    async fn read_word(&self, address: u32) -> Result<u32, LinkError>;

    /// Writes one 32-bit word.
    async fn write_word(&self, address: u32, value: u32) -> Result<(), LinkError>;

    /// Reads `len_bytes` bytes as big-endian words.
    async fn read_block(&self, address: u32, len_bytes: u16) -> Result<Vec<u32>, LinkError>;

    /// Writes a block of words.
    async fn write_block(&self, address: u32, words: &[u32]) -> Result<(), LinkError>;
}
