use thiserror::Error;

/// Failure while decoding an inbound payload. The message that produced it is
/// discarded; the dispatch loop keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated payload: wanted {wanted} more byte(s), {remaining} remaining")]
    Truncated { wanted: usize, remaining: usize },

    #[error("invalid {what} value {value}")]
    BadEnum { what: &'static str, value: u32 },

    #[error("payload length {len} is not valid for {what}")]
    BadLength { what: &'static str, len: usize },

    #[error("opcode {0:#06x} is not part of this message set")]
    UnknownOpcode(u16),
}
