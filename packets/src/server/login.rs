use crate::TryFromBytes;
use crate::codec::Reader;
use crate::error::DecodeError;
use crate::types::{HOST_LEN, LOGIN_DETAIL_LEN, LoginFailure, NAME_LEN, WORLD_NAME_LEN};

/// First message after the TCP connect; announces the server's protocol
/// revision and whether account registration is open.
#[derive(Debug, Clone)]
pub struct ServerHello {
    pub protocol_version: u32,
    pub registration_enabled: bool,
}

impl TryFromBytes for ServerHello {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let protocol_version = r.read_u32()?;
        let flags = r.read_u8()?;
        Ok(ServerHello {
            protocol_version,
            registration_enabled: flags & 0x01 != 0,
        })
    }
}

/// Successful authentication on a classic server.
#[derive(Debug, Clone)]
pub struct LoginOk {
    pub account_id: u32,
    pub session_id: u32,
    pub auth_key: u32,
}

impl TryFromBytes for LoginOk {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(LoginOk {
            account_id: r.read_u32()?,
            session_id: r.read_u32()?,
            auth_key: r.read_u32()?,
        })
    }
}

/// Extended-fork authentication result; adds the account avatar and an
/// update host the launcher should pull assets from.
#[derive(Debug, Clone)]
pub struct ExtLoginOk {
    pub account_id: u32,
    pub session_id: u32,
    pub auth_key: u32,
    pub avatar_id: u16,
    pub update_host: String,
}

impl TryFromBytes for ExtLoginOk {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(ExtLoginOk {
            account_id: r.read_u32()?,
            session_id: r.read_u32()?,
            auth_key: r.read_u32()?,
            avatar_id: r.read_u16()?,
            update_host: r.read_string(NAME_LEN)?,
        })
    }
}

/// Authentication or registration rejection.
#[derive(Debug, Clone)]
pub struct LoginError {
    pub reason: LoginFailure,
    pub detail: String,
}

impl TryFromBytes for LoginError {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(LoginError {
            reason: LoginFailure::from(r.read_u8()?),
            detail: r.read_string(LOGIN_DETAIL_LEN)?,
        })
    }
}

/// One selectable game world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldInfo {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub online_count: u16,
}

impl WorldInfo {
    pub const WIRE_LEN: usize = HOST_LEN + 2 + WORLD_NAME_LEN + 2;

    fn read(r: &mut Reader) -> Result<Self, DecodeError> {
        Ok(WorldInfo {
            host: r.read_string(HOST_LEN)?,
            port: r.read_u16()?,
            name: r.read_string(WORLD_NAME_LEN)?,
            online_count: r.read_u16()?,
        })
    }
}

/// World list sent after authentication; entry count is implied by the
/// frame length.
#[derive(Debug, Clone)]
pub struct WorldList {
    pub worlds: Vec<WorldInfo>,
}

impl TryFromBytes for WorldList {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() % WorldInfo::WIRE_LEN != 0 {
            return Err(DecodeError::BadLength {
                what: "world list",
                len: bytes.len(),
            });
        }
        let mut r = Reader::new(bytes);
        let mut worlds = Vec::with_capacity(bytes.len() / WorldInfo::WIRE_LEN);
        while r.remaining() > 0 {
            worlds.push(WorldInfo::read(&mut r)?);
        }
        Ok(WorldList { worlds })
    }
}

/// Character-server greeting after world selection; the session is ready
/// once this arrives.
#[derive(Debug, Clone)]
pub struct CharServerAck {
    pub slots: u8,
}

impl TryFromBytes for CharServerAck {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(CharServerAck {
            slots: r.read_u8()?,
        })
    }
}
