use num_enum::{FromPrimitive, IntoPrimitive};

use crate::TryFromBytes;
use crate::codec::Reader;
use crate::error::DecodeError;
use crate::types::NAME_LEN;

/// Server verdict on a trade request we sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum TradeAnswer {
    TooFarAway = 0,
    NoSuchCharacter = 1,
    Busy = 2,
    Accepted = 3,
    Rejected = 4,
    #[num_enum(default)]
    Unspecified = 0xff,
}

/// Another player wants to trade with us.
#[derive(Debug, Clone)]
pub struct TradeRequested {
    pub from_name: String,
}

impl TryFromBytes for TradeRequested {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(TradeRequested {
            from_name: r.read_string(NAME_LEN)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TradeResponse {
    pub answer: TradeAnswer,
}

impl TryFromBytes for TradeResponse {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(TradeResponse {
            answer: TradeAnswer::from(r.read_u8()?),
        })
    }
}

/// The partner placed an item into the trade window.
#[derive(Debug, Clone)]
pub struct TradeItemAdded {
    pub item_id: u16,
    pub amount: u32,
}

impl TryFromBytes for TradeItemAdded {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(TradeItemAdded {
            item_id: r.read_u16()?,
            amount: r.read_u32()?,
        })
    }
}

/// One side locked in their offer. `by_partner` is false when the server
/// echoes our own confirmation.
#[derive(Debug, Clone)]
pub struct TradeConfirmed {
    pub by_partner: bool,
}

impl TryFromBytes for TradeConfirmed {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(TradeConfirmed {
            by_partner: r.read_bool()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TradeCancelled;

impl TryFromBytes for TradeCancelled {
    fn try_from_bytes(_bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(TradeCancelled)
    }
}

#[derive(Debug, Clone)]
pub struct TradeCompleted {
    pub success: bool,
}

impl TryFromBytes for TradeCompleted {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        // 0 = success on the wire
        Ok(TradeCompleted {
            success: r.read_u8()? == 0,
        })
    }
}
