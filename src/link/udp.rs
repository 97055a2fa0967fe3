use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::trace;

use super::wire::{LengthFieldWidth, PacketId, RESPONSE_HEADER_LEN, WireCodec};
use super::{LinkError, MemoryBus};

/// Slack beyond the expected response size so an over-long datagram is seen
/// in full and rejected instead of silently truncated by the socket.
const RECV_SLACK: usize = 16;

/// Link construction parameters.
#[derive(Debug, Clone, Copy, Builder)]
pub struct LinkConfig {
    /// Width of the request length field, fixed per device firmware.
    #[builder(default)]
    length_field: LengthFieldWidth,
    /// Upper bound on waiting for a response; hardware silence must not hang
    /// the caller.
    #[builder(default = Duration::from_millis(500))]
    recv_timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LinkConfig {
    /// Returns the configured length-field width.
    #[must_use]
    pub fn length_field(&self) -> LengthFieldWidth {
        self.length_field
    }

    /// Returns the configured receive timeout.
    #[must_use]
    pub fn recv_timeout(&self) -> Duration {
        self.recv_timeout
    }
}

/// UDP client for the device's request/response memory-access protocol.
///
/// The protocol has no multiplexing: a second request before the first
/// response would desynchronise packet-id tracking, so one mutex covers the
/// whole send-and-receive exchange.
#[derive(Debug)]
pub struct UdpMemoryLink {
    socket: UdpSocket,
    exchange: Mutex<PacketId>,
    config: LinkConfig,
}

impl UdpMemoryLink {
    /// Binds an ephemeral local socket and connects it to the device.
    ///
    /// # Errors
    ///
    /// Returns an error when the socket cannot be bound or connected.
    pub async fn connect(remote: SocketAddr, config: LinkConfig) -> Result<Self, LinkError> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))
            .await
            .map_err(LinkError::Send)?;
        socket.connect(remote).await.map_err(LinkError::Send)?;
        Ok(Self {
            socket,
            exchange: Mutex::new(PacketId::new(0x00)),
            config,
        })
    }

    /// Sends one read request and validates the matching response.
    async fn exchange_read(&self, address: u32, len_bytes: u16) -> Result<Vec<u32>, LinkError> {
        let mut outstanding = self.exchange.lock().await;
        let id = *outstanding;
        // The counter advances even when the exchange fails, so a stale
        // response cannot satisfy a later request.
        *outstanding = outstanding.next();

        let request =
            WireCodec::encode_read_request(id, self.config.length_field, address, len_bytes)?;
        self.socket.send(&request).await.map_err(LinkError::Send)?;

        let mut buffer = vec![0u8; RESPONSE_HEADER_LEN + len_bytes as usize + RECV_SLACK];
        let received = tokio::time::timeout(self.config.recv_timeout, self.socket.recv(&mut buffer))
            .await
            .map_err(|_elapsed| LinkError::RecvTimeout {
                timeout: self.config.recv_timeout,
            })?
            .map_err(LinkError::Recv)?;
        trace!(%id, address, len_bytes, received, "read exchange complete");

        Ok(WireCodec::decode_read_response(
            &buffer[..received],
            id,
            len_bytes,
        )?)
    }

    /// Sends one write request. Writes are fire-and-forget on this protocol;
    /// the device does not acknowledge them.
    async fn send_write(&self, address: u32, words: &[u32]) -> Result<(), LinkError> {
        let mut outstanding = self.exchange.lock().await;
        let id = *outstanding;
        *outstanding = outstanding.next();

        let request =
            WireCodec::encode_write_request(id, self.config.length_field, address, words)?;
        self.socket.send(&request).await.map_err(LinkError::Send)?;
        trace!(%id, address, words = words.len(), "write sent");
        Ok(())
    }
}

#[async_trait]
impl MemoryBus for UdpMemoryLink {
    async fn read_word(&self, address: u32) -> Result<u32, LinkError> {
        let words = self.exchange_read(address, 4).await?;
        Ok(words[0])
    }

    async fn write_word(&self, address: u32, value: u32) -> Result<(), LinkError> {
        self.send_write(address, &[value]).await
    }

    async fn read_block(&self, address: u32, len_bytes: u16) -> Result<Vec<u32>, LinkError> {
        self.exchange_read(address, len_bytes).await
    }

    async fn write_block(&self, address: u32, words: &[u32]) -> Result<(), LinkError> {
        self.send_write(address, words).await
    }
}
