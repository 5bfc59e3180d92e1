use async_std::io::{ReadExt, WriteExt};
use async_std::net::TcpStream;
use async_std::sync::Arc;
use std::io;

use packets::PacketLen;

/// Length lookup for the active protocol family
/// (`packets::classic::packet_len_for` or `packets::extended::packet_len_for`).
pub type LengthTable = fn(u16) -> Option<PacketLen>;

/// Reads complete frames off the stream. An opcode missing from the length
/// table is unrecoverable here: the message boundary is lost, so the
/// connection must be torn down.
pub struct FrameReader {
    stream: Arc<TcpStream>,
    lengths: LengthTable,
}

impl FrameReader {
    pub fn new(stream: Arc<TcpStream>, lengths: LengthTable) -> Self {
        Self { stream, lengths }
    }

    pub async fn read(&mut self) -> io::Result<(u16, Vec<u8>)> {
        let mut header = [0u8; 2];
        (&*self.stream).read_exact(&mut header).await?;
        let opcode = u16::from_le_bytes(header);

        let payload_len = match (self.lengths)(opcode) {
            Some(PacketLen::Fixed(total)) => usize::from(total) - 2,
            Some(PacketLen::Variable) => {
                let mut len = [0u8; 2];
                (&*self.stream).read_exact(&mut len).await?;
                let total = usize::from(u16::from_le_bytes(len));
                if total < 4 {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("frame length {total} too small for opcode {opcode:#06x}"),
                    ));
                }
                total - 4
            }
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unframeable opcode {opcode:#06x}, stream position lost"),
                ));
            }
        };

        let mut payload = vec![0u8; payload_len];
        (&*self.stream).read_exact(&mut payload).await?;
        Ok((opcode, payload))
    }
}

/// Writes pre-framed bytes; framing itself happens in
/// [`packets::encode_frame`].
pub struct FrameWriter {
    stream: Arc<TcpStream>,
}

impl FrameWriter {
    pub fn new(stream: Arc<TcpStream>) -> Self {
        Self { stream }
    }

    pub async fn write_raw(&mut self, data: &[u8]) -> io::Result<()> {
        (&*self.stream).write_all(data).await
    }

    pub async fn flush(&mut self) -> io::Result<()> {
        (&*self.stream).flush().await
    }
}
