pub mod classic;
pub mod client;
pub mod codec;
pub mod error;
pub mod extended;
pub mod server;
pub mod types;

pub use codec::{Reader, Writer};
pub use error::DecodeError;

pub trait TryFromBytes {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError>
    where
        Self: Sized;
}

/// Outbound payload encoding. Payload types carry no opcode: the same
/// payload can travel under different opcodes depending on the protocol
/// family, so opcode tables live in [`classic`] and [`extended`].
pub trait ToBytes {
    fn write_payload(&self, w: &mut Writer);

    fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.write_payload(&mut w);
        w.into_inner()
    }
}

/// How a frame's boundary is found for a given opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketLen {
    /// Total frame length in bytes, opcode included.
    Fixed(u16),
    /// A u16 total length (opcode and length field included) follows the
    /// opcode on the wire.
    Variable,
}

/// Largest variable-message body the u16 length field can describe.
pub const MAX_VARIABLE_BODY: usize = u16::MAX as usize - 4;

/// Builds a complete outbound frame: opcode, length field for variable
/// messages, then the payload. A variable body longer than
/// [`MAX_VARIABLE_BODY`] is cut there; the declared length always matches
/// the bytes that follow it.
pub fn encode_frame<T: ToBytes>(opcode: u16, len: PacketLen, payload: &T) -> Vec<u8> {
    let mut body = payload.to_bytes();
    if len == PacketLen::Variable && body.len() > MAX_VARIABLE_BODY {
        body.truncate(MAX_VARIABLE_BODY);
    }
    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&opcode.to_le_bytes());
    if len == PacketLen::Variable {
        frame.extend_from_slice(&((body.len() + 4) as u16).to_le_bytes());
    }
    frame.extend_from_slice(&body);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    impl ToBytes for Probe {
        fn write_payload(&self, w: &mut Writer) {
            w.write_u32(0x11223344);
        }
    }

    #[test]
    fn fixed_frame_is_opcode_then_payload() {
        let frame = encode_frame(0x0064, PacketLen::Fixed(6), &Probe);
        assert_eq!(frame, [0x64, 0x00, 0x44, 0x33, 0x22, 0x11]);
    }

    #[test]
    fn variable_frame_carries_total_length() {
        let frame = encode_frame(0x0108, PacketLen::Variable, &Probe);
        assert_eq!(&frame[..2], &[0x08, 0x01]);
        // 2 opcode + 2 length + 4 payload
        assert_eq!(u16::from_le_bytes([frame[2], frame[3]]), 8);
        assert_eq!(frame.len(), 8);
    }

    struct Blob(usize);

    impl ToBytes for Blob {
        fn write_payload(&self, w: &mut Writer) {
            w.write_bytes(&vec![0xaa; self.0]);
        }
    }

    #[test]
    fn oversized_variable_body_is_cut_at_the_length_field_limit() {
        let frame = encode_frame(0x0108, PacketLen::Variable, &Blob(70_000));
        let declared = u16::from_le_bytes([frame[2], frame[3]]) as usize;
        assert_eq!(declared, frame.len());
        assert_eq!(frame.len(), u16::MAX as usize);
    }

    #[test]
    fn variable_body_at_the_limit_is_untouched() {
        let frame = encode_frame(0x0108, PacketLen::Variable, &Blob(MAX_VARIABLE_BODY));
        assert_eq!(frame.len(), u16::MAX as usize);
        assert_eq!(
            u16::from_le_bytes([frame[2], frame[3]]) as usize,
            frame.len()
        );
    }
}
