use strum_macros::Display;
use thiserror::Error;

/// Fixed address-length marker carried by every request (the device only
/// speaks 32-bit addresses).
const ADDRESS_FIELD_LEN: u8 = 0x04;

/// Response header: packet id, status opcode, 16-bit big-endian length.
pub const RESPONSE_HEADER_LEN: usize = 4;

/// Errors returned by request encoding and response decoding.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum WireError {
    /// The payload byte count does not fit the configured length field.
    #[error("payload of {len} bytes exceeds the {max}-byte limit of the configured length field")]
    PayloadTooLarge { len: usize, max: usize },
    /// Transfers are word granular; the byte count must be a multiple of 4.
    #[error("payload length {len} is not a multiple of 4 bytes")]
    UnalignedLength { len: usize },
    /// The datagram is shorter than the 4-byte response header.
    #[error("response is too short: expected at least {RESPONSE_HEADER_LEN} bytes, got {actual}")]
    MalformedResponse { actual: usize },
    /// The echoed packet id belongs to a different request.
    #[error("response packet id {actual} does not match outstanding request {expected}")]
    PacketIdMismatch { expected: PacketId, actual: PacketId },
    /// The device signalled that the memory read timed out on its side.
    #[error("device reported a read timeout")]
    DeviceTimeout,
    /// The status byte is neither a read response nor a read timeout.
    #[error("unexpected response opcode {opcode:#04x}")]
    UnexpectedOpcode { opcode: u8 },
    /// The declared payload length differs from what the request asked for.
    #[error("declared payload length {declared} does not match requested {requested}")]
    LengthMismatch { declared: u16, requested: u16 },
    /// The datagram size disagrees with the header plus declared payload.
    #[error("datagram of {actual} bytes does not match header plus declared payload ({expected})")]
    FrameLengthMismatch { expected: usize, actual: usize },
}

/// Per-request sequence number used to match a response to its request.
///
/// Wraps at 256 and advances after every request, including failed ones, so a
/// stale in-flight response cannot be mistaken for the answer to a fresh
/// request. Never reset on reconnect.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, derive_more::Display, derive_more::From, derive_more::Into,
)]
#[display("{_0:#04x}")]
pub struct PacketId(u8);

impl PacketId {
    /// Creates a packet id from a raw counter byte.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw counter byte.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the id following this one, wrapping at 256.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Request and response opcodes of the memory-access protocol.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display)]
pub enum Opcode {
    /// Memory read request.
    #[strum(to_string = "read")]
    Read,
    /// Memory write request.
    #[strum(to_string = "write")]
    Write,
    /// Successful read response.
    #[strum(to_string = "read_response")]
    ReadResponse,
    /// Device-side read timeout response.
    #[strum(to_string = "read_timeout")]
    ReadTimeout,
}

impl Opcode {
    /// Returns the wire byte for this opcode.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Read => 0x01,
            Self::Write => 0x02,
            Self::ReadResponse => 0x04,
            Self::ReadTimeout => 0x08,
        }
    }
}

/// Width of the request length field.
///
/// The device firmware existed in a short form carrying a single length byte
/// and a later form carrying two; both encodings stay supported and the width
/// is selected once when the link is built.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, clap::ValueEnum)]
pub enum LengthFieldWidth {
    /// One length byte; transfers up to 255 bytes.
    Single,
    /// Two big-endian length bytes; transfers up to 65535 bytes.
    #[default]
    Double,
}

impl LengthFieldWidth {
    const fn max_len(self) -> usize {
        match self {
            Self::Single => u8::MAX as usize,
            Self::Double => u16::MAX as usize,
        }
    }

    fn push_len(self, out: &mut Vec<u8>, len: u16) {
        match self {
            Self::Single => out.push(len as u8),
            Self::Double => out.extend_from_slice(&len.to_be_bytes()),
        }
    }
}

/// Encodes requests and decodes responses of the UDP memory protocol.
pub struct WireCodec;

impl WireCodec {
    /// Encodes a read request for `len_bytes` bytes at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error when the byte count is unaligned or does not fit the
    /// configured length field.
    pub fn encode_read_request(
        id: PacketId,
        width: LengthFieldWidth,
        address: u32,
        len_bytes: u16,
    ) -> Result<Vec<u8>, WireError> {
        check_len(width, len_bytes as usize)?;
        let mut request = Vec::with_capacity(9);
        request.push(id.value());
        request.push(Opcode::Read.as_byte());
        request.push(ADDRESS_FIELD_LEN);
        request.extend_from_slice(&address.to_be_bytes());
        width.push_len(&mut request, len_bytes);
        Ok(request)
    }

    /// Encodes a write request carrying `words` at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload does not fit the configured length
    /// field.
    pub fn encode_write_request(
        id: PacketId,
        width: LengthFieldWidth,
        address: u32,
        words: &[u32],
    ) -> Result<Vec<u8>, WireError> {
        let len_bytes = words.len() * 4;
        check_len(width, len_bytes)?;
        let mut request = Vec::with_capacity(9 + len_bytes);
        request.push(id.value());
        request.push(Opcode::Write.as_byte());
        request.push(ADDRESS_FIELD_LEN);
        request.extend_from_slice(&address.to_be_bytes());
        width.push_len(&mut request, len_bytes as u16);
        for word in words {
            request.extend_from_slice(&word.to_be_bytes());
        }
        Ok(request)
    }

    /// Validates a read response and decodes its payload into words.
    ///
    /// Checks run in a fixed order: header size, packet-id echo, device
    /// timeout status, status opcode, declared length, total datagram length.
    /// The payload is only touched after every check has passed.
    ///
    /// # Errors
    ///
    /// Returns the [`WireError`] matching the first failed check.
    pub fn decode_read_response(
        datagram: &[u8],
        expected_id: PacketId,
        requested_len: u16,
    ) -> Result<Vec<u32>, WireError> {
        if datagram.len() < RESPONSE_HEADER_LEN {
            return Err(WireError::MalformedResponse {
                actual: datagram.len(),
            });
        }
        if datagram[0] != expected_id.value() {
            return Err(WireError::PacketIdMismatch {
                expected: expected_id,
                actual: PacketId::new(datagram[0]),
            });
        }
        if datagram[1] == Opcode::ReadTimeout.as_byte() {
            return Err(WireError::DeviceTimeout);
        }
        if datagram[1] != Opcode::ReadResponse.as_byte() {
            return Err(WireError::UnexpectedOpcode {
                opcode: datagram[1],
            });
        }
        let declared = u16::from_be_bytes([datagram[2], datagram[3]]);
        if declared != requested_len {
            return Err(WireError::LengthMismatch {
                declared,
                requested: requested_len,
            });
        }
        let expected_total = RESPONSE_HEADER_LEN + declared as usize;
        if datagram.len() != expected_total {
            return Err(WireError::FrameLengthMismatch {
                expected: expected_total,
                actual: datagram.len(),
            });
        }

        let payload = &datagram[RESPONSE_HEADER_LEN..];
        Ok(payload
            .chunks_exact(4)
            .map(|bytes| u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            .collect())
    }
}

fn check_len(width: LengthFieldWidth, len_bytes: usize) -> Result<(), WireError> {
    if len_bytes % 4 != 0 {
        return Err(WireError::UnalignedLength { len: len_bytes });
    }
    if len_bytes > width.max_len() {
        return Err(WireError::PayloadTooLarge {
            len: len_bytes,
            max: width.max_len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn response(id: u8, status: u8, declared: u16, words: &[u32]) -> Vec<u8> {
        let mut datagram = vec![id, status];
        datagram.extend_from_slice(&declared.to_be_bytes());
        for word in words {
            datagram.extend_from_slice(&word.to_be_bytes());
        }
        datagram
    }

    #[test]
    fn read_request_uses_big_endian_address_and_double_length() {
        let request =
            WireCodec::encode_read_request(PacketId::new(0x2A), LengthFieldWidth::Double, 0x0080_0100, 8)
                .expect("aligned read request should encode");
        assert_eq!(
            vec![0x2A, 0x01, 0x04, 0x00, 0x80, 0x01, 0x00, 0x00, 0x08],
            request
        );
    }

    #[test]
    fn read_request_single_width_carries_one_length_byte() {
        let request =
            WireCodec::encode_read_request(PacketId::new(0x01), LengthFieldWidth::Single, 0x10, 4)
                .expect("short-form read request should encode");
        assert_eq!(vec![0x01, 0x01, 0x04, 0x00, 0x00, 0x00, 0x10, 0x04], request);
    }

    #[test]
    fn write_request_appends_big_endian_words() {
        let request = WireCodec::encode_write_request(
            PacketId::new(0x00),
            LengthFieldWidth::Double,
            0x0080_0000,
            &[0xDEAD_BEEF, 0x0000_0123],
        )
        .expect("two-word write request should encode");
        assert_eq!(
            vec![
                0x00, 0x02, 0x04, 0x00, 0x80, 0x00, 0x00, 0x00, 0x08, 0xDE, 0xAD, 0xBE, 0xEF,
                0x00, 0x00, 0x01, 0x23,
            ],
            request
        );
    }

    #[test]
    fn single_width_rejects_block_payloads() {
        let words = vec![0u32; 64];
        let result = WireCodec::encode_write_request(
            PacketId::new(0x00),
            LengthFieldWidth::Single,
            0x0080_0000,
            &words,
        );
        assert_matches!(
            result,
            Err(WireError::PayloadTooLarge { len: 256, max: 255 })
        );
    }

    #[test]
    fn unaligned_read_length_is_rejected() {
        let result =
            WireCodec::encode_read_request(PacketId::new(0x00), LengthFieldWidth::Double, 0, 6);
        assert_matches!(result, Err(WireError::UnalignedLength { len: 6 }));
    }

    #[test]
    fn decode_round_trips_payload_words() {
        let words = [0x0123_4567, 0x89AB_CDEF, 0xBEEF_0123];
        let datagram = response(0x07, 0x04, 12, &words);
        let decoded = WireCodec::decode_read_response(&datagram, PacketId::new(0x07), 12)
            .expect("well-formed response should decode");
        assert_eq!(words.to_vec(), decoded);
    }

    #[test]
    fn decode_rejects_short_datagram() {
        let result = WireCodec::decode_read_response(&[0x00, 0x04], PacketId::new(0x00), 4);
        assert_matches!(result, Err(WireError::MalformedResponse { actual: 2 }));
    }

    #[test]
    fn decode_rejects_foreign_packet_id_before_reading_payload() {
        let datagram = response(0x09, 0x04, 4, &[0x1111_1111]);
        let result = WireCodec::decode_read_response(&datagram, PacketId::new(0x08), 4);
        assert_matches!(
            result,
            Err(WireError::PacketIdMismatch { expected, actual })
                if expected.value() == 0x08 && actual.value() == 0x09
        );
    }

    #[test]
    fn decode_maps_timeout_status_to_device_timeout() {
        let datagram = response(0x01, 0x08, 4, &[0x0000_0000]);
        let result = WireCodec::decode_read_response(&datagram, PacketId::new(0x01), 4);
        assert_matches!(result, Err(WireError::DeviceTimeout));
    }

    #[rstest]
    #[case(0x01)]
    #[case(0x02)]
    #[case(0xFF)]
    fn decode_rejects_unknown_status_opcodes(#[case] status: u8) {
        let datagram = response(0x01, status, 4, &[0x0000_0000]);
        let result = WireCodec::decode_read_response(&datagram, PacketId::new(0x01), 4);
        assert_matches!(result, Err(WireError::UnexpectedOpcode { opcode }) if opcode == status);
    }

    #[test]
    fn decode_rejects_declared_length_mismatch() {
        let datagram = response(0x01, 0x04, 8, &[0x0000_0000, 0x0000_0000]);
        let result = WireCodec::decode_read_response(&datagram, PacketId::new(0x01), 4);
        assert_matches!(
            result,
            Err(WireError::LengthMismatch {
                declared: 8,
                requested: 4,
            })
        );
    }

    #[test]
    fn decode_rejects_truncated_payload() {
        let mut datagram = response(0x01, 0x04, 8, &[0x0000_0000, 0x0000_0000]);
        datagram.truncate(datagram.len() - 2);
        let result = WireCodec::decode_read_response(&datagram, PacketId::new(0x01), 8);
        assert_matches!(
            result,
            Err(WireError::FrameLengthMismatch {
                expected: 12,
                actual: 10,
            })
        );
    }

    #[test]
    fn packet_id_wraps_at_byte_boundary() {
        assert_eq!(PacketId::new(0x00), PacketId::new(0xFF).next());
    }
}
