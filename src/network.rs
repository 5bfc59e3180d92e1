use std::sync::Mutex;

use network::FrameWriter;
use packets::{PacketLen, ToBytes, encode_frame};

/// Buffered outbound frames. Handlers append complete frames during
/// dispatch; the socket task drains and writes them between messages.
#[derive(Default)]
pub struct PacketOutbox(Mutex<Vec<Vec<u8>>>);

impl PacketOutbox {
    pub fn send<T: ToBytes>(&self, opcode: u16, len: PacketLen, packet: &T) {
        if let Ok(mut outbox) = self.0.lock() {
            outbox.push(encode_frame(opcode, len, packet));
        }
    }

    pub fn drain(&self) -> Vec<Vec<u8>> {
        match self.0.lock() {
            Ok(mut outbox) => std::mem::take(&mut *outbox),
            Err(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().map(|o| o.is_empty()).unwrap_or(true)
    }
}

/// Writes and flushes everything queued in the outbox.
pub async fn flush_outbox(outbox: &PacketOutbox, writer: &mut FrameWriter) -> std::io::Result<()> {
    let frames = outbox.drain();
    if frames.is_empty() {
        return Ok(());
    }
    for frame in &frames {
        writer.write_raw(frame).await?;
    }
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use packets::Writer;

    struct Probe(u8);

    impl ToBytes for Probe {
        fn write_payload(&self, w: &mut Writer) {
            w.write_u8(self.0);
        }
    }

    #[test]
    fn drain_empties_the_outbox() {
        let outbox = PacketOutbox::default();
        outbox.send(0x0064, PacketLen::Fixed(3), &Probe(1));
        outbox.send(0x0066, PacketLen::Fixed(3), &Probe(2));
        let frames = outbox.drain();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], vec![0x64, 0x00, 1]);
        assert!(outbox.is_empty());
    }
}
