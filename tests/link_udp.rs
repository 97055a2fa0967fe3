use std::net::SocketAddr;
use std::time::Duration;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

use pitdash::{
    LengthFieldWidth, LinkConfig, LinkError, MemoryBus, UdpMemoryLink, WireError,
};

const READ_RESPONSE: u8 = 0x04;
const READ_TIMEOUT: u8 = 0x08;

/// How the scripted device answers read requests.
#[derive(Clone, Copy)]
enum Behaviour {
    Echo { word: u32 },
    WrongId { word: u32 },
    Timeout,
    Silent,
}

struct FakeDevice {
    address: SocketAddr,
    requests: mpsc::UnboundedReceiver<Vec<u8>>,
}

/// Binds a one-shot UDP device that records every request it sees and
/// answers according to `behaviour`.
async fn spawn_device(behaviour: Behaviour) -> FakeDevice {
    let socket = UdpSocket::bind("127.0.0.1:0")
        .await
        .expect("fake device should bind");
    let address = socket.local_addr().expect("fake device has an address");
    let (sender, requests) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut buffer = [0u8; 2048];
        loop {
            let Ok((received, peer)) = socket.recv_from(&mut buffer).await else {
                return;
            };
            let request = buffer[..received].to_vec();
            let id = request[0];
            if sender.send(request).is_err() {
                return;
            }
            let reply = match behaviour {
                Behaviour::Echo { word } => {
                    Some(response(id, READ_RESPONSE, &word.to_be_bytes()))
                }
                Behaviour::WrongId { word } => {
                    Some(response(id.wrapping_add(7), READ_RESPONSE, &word.to_be_bytes()))
                }
                Behaviour::Timeout => Some(response(id, READ_TIMEOUT, &[])),
                Behaviour::Silent => None,
            };
            if let Some(reply) = reply {
                let _ = socket.send_to(&reply, peer).await;
            }
        }
    });

    FakeDevice { address, requests }
}

fn response(id: u8, status: u8, payload: &[u8]) -> Vec<u8> {
    let mut datagram = vec![id, status];
    datagram.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    datagram.extend_from_slice(payload);
    datagram
}

fn short_timeout_config() -> LinkConfig {
    LinkConfig::builder()
        .recv_timeout(Duration::from_millis(100))
        .build()
}

#[tokio::test]
async fn read_word_round_trips() -> anyhow::Result<()> {
    let device = spawn_device(Behaviour::Echo { word: 0xBEEF_0123 }).await;
    let link = UdpMemoryLink::connect(device.address, LinkConfig::default()).await?;

    assert_eq!(0xBEEF_0123, link.read_word(0).await?);
    Ok(())
}

#[tokio::test]
async fn mismatched_packet_id_is_rejected() -> anyhow::Result<()> {
    let device = spawn_device(Behaviour::WrongId { word: 0xBEEF_0123 }).await;
    let link = UdpMemoryLink::connect(device.address, LinkConfig::default()).await?;

    assert_matches!(
        link.read_word(0).await,
        Err(LinkError::Wire(WireError::PacketIdMismatch { .. }))
    );
    Ok(())
}

#[tokio::test]
async fn device_side_timeout_status_surfaces() -> anyhow::Result<()> {
    let device = spawn_device(Behaviour::Timeout).await;
    let link = UdpMemoryLink::connect(device.address, LinkConfig::default()).await?;

    assert_matches!(
        link.read_word(0x0080_0000).await,
        Err(LinkError::Wire(WireError::DeviceTimeout))
    );
    Ok(())
}

#[tokio::test]
async fn silence_hits_the_receive_deadline() -> anyhow::Result<()> {
    let device = spawn_device(Behaviour::Silent).await;
    let link = UdpMemoryLink::connect(device.address, short_timeout_config()).await?;

    assert_matches!(
        link.read_word(0).await,
        Err(LinkError::RecvTimeout { .. })
    );
    Ok(())
}

#[tokio::test]
async fn packet_id_advances_even_across_failures() -> anyhow::Result<()> {
    let mut device = spawn_device(Behaviour::Timeout).await;
    let link = UdpMemoryLink::connect(device.address, short_timeout_config()).await?;

    assert_matches!(link.read_word(0).await, Err(_));
    assert_matches!(link.read_word(0).await, Err(_));

    let first = device.requests.recv().await.expect("first request recorded");
    let second = device.requests.recv().await.expect("second request recorded");
    assert_eq!(0x00, first[0]);
    assert_eq!(0x01, second[0]);
    Ok(())
}

#[tokio::test]
async fn write_requests_carry_the_payload_unacknowledged() -> anyhow::Result<()> {
    let mut device = spawn_device(Behaviour::Silent).await;
    let link = UdpMemoryLink::connect(device.address, LinkConfig::default()).await?;

    link.write_word(0x0080_0100, 0x0000_0ABC).await?;

    let request = device.requests.recv().await.expect("write request recorded");
    assert_eq!(
        vec![
            0x00, // packet id
            0x02, // write opcode
            0x04, // address width marker
            0x00, 0x80, 0x01, 0x00, // address
            0x00, 0x04, // double-width length
            0x00, 0x00, 0x0A, 0xBC, // payload word
        ],
        request
    );
    Ok(())
}

#[tokio::test]
async fn single_width_firmware_gets_one_length_byte() -> anyhow::Result<()> {
    let mut device = spawn_device(Behaviour::Silent).await;
    let config = LinkConfig::builder()
        .length_field(LengthFieldWidth::Single)
        .build();
    let link = UdpMemoryLink::connect(device.address, config).await?;

    link.write_word(0x0000_0004, 0x0000_0007).await?;

    let request = device.requests.recv().await.expect("write request recorded");
    assert_eq!(
        vec![0x00, 0x02, 0x04, 0x00, 0x00, 0x00, 0x04, 0x04, 0x00, 0x00, 0x00, 0x07],
        request
    );
    Ok(())
}
