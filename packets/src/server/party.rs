use num_enum::{FromPrimitive, IntoPrimitive};

use crate::TryFromBytes;
use crate::codec::Reader;
use crate::error::DecodeError;
use crate::types::{MAP_LEN, NAME_LEN, PartyShare};

/// Outcome of a party invite, reported back to the inviter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PartyInviteAnswer {
    AlreadyInParty = 0,
    Rejected = 1,
    Accepted = 2,
    PartyFull = 3,
    #[num_enum(default)]
    Unspecified = 0xff,
}

/// Why a member dropped out of the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PartyLeaveReason {
    Left = 0,
    Kicked = 1,
    Disbanded = 2,
    #[num_enum(default)]
    Unspecified = 0xff,
}

#[derive(Debug, Clone)]
pub struct PartyCreateResult {
    pub code: u8,
}

impl TryFromBytes for PartyCreateResult {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(PartyCreateResult { code: r.read_u8()? })
    }
}

/// Someone asked us into their party.
#[derive(Debug, Clone)]
pub struct PartyInvited {
    pub from_id: u32,
    pub from_name: String,
    pub party_name: String,
}

impl TryFromBytes for PartyInvited {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(PartyInvited {
            from_id: r.read_u32()?,
            from_name: r.read_string(NAME_LEN)?,
            party_name: r.read_string(NAME_LEN)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PartyInviteResult {
    pub name: String,
    pub answer: PartyInviteAnswer,
}

impl TryFromBytes for PartyInviteResult {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(PartyInviteResult {
            name: r.read_string(NAME_LEN)?,
            answer: PartyInviteAnswer::from(r.read_u8()?),
        })
    }
}

/// One roster entry as the classic server lays it out.
#[derive(Debug, Clone)]
pub struct PartyMemberInfo {
    pub account_id: u32,
    pub name: String,
    pub map: String,
    pub is_leader: bool,
    pub is_online: bool,
}

impl PartyMemberInfo {
    pub const WIRE_LEN: usize = 4 + NAME_LEN + MAP_LEN + 2;

    fn read(r: &mut Reader) -> Result<Self, DecodeError> {
        Ok(PartyMemberInfo {
            account_id: r.read_u32()?,
            name: r.read_string(NAME_LEN)?,
            map: r.read_string(MAP_LEN)?,
            is_leader: r.read_bool()?,
            is_online: r.read_bool()?,
        })
    }
}

/// Full roster replace, sent on join and on membership changes the server
/// chooses not to patch incrementally.
#[derive(Debug, Clone)]
pub struct PartyInfo {
    pub party_name: String,
    pub members: Vec<PartyMemberInfo>,
}

impl TryFromBytes for PartyInfo {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let party_name = r.read_string(NAME_LEN)?;
        if r.remaining() % PartyMemberInfo::WIRE_LEN != 0 {
            return Err(DecodeError::BadLength {
                what: "party roster",
                len: bytes.len(),
            });
        }
        let mut members = Vec::with_capacity(r.remaining() / PartyMemberInfo::WIRE_LEN);
        while r.remaining() > 0 {
            members.push(PartyMemberInfo::read(&mut r)?);
        }
        Ok(PartyInfo {
            party_name,
            members,
        })
    }
}

/// Extended-fork roster entry; carries avatar and level for the party UI.
#[derive(Debug, Clone)]
pub struct ExtPartyMemberInfo {
    pub account_id: u32,
    pub name: String,
    pub map: String,
    pub is_leader: bool,
    pub is_online: bool,
    pub avatar_id: u16,
    pub level: u16,
}

impl ExtPartyMemberInfo {
    pub const WIRE_LEN: usize = PartyMemberInfo::WIRE_LEN + 4;

    fn read(r: &mut Reader) -> Result<Self, DecodeError> {
        Ok(ExtPartyMemberInfo {
            account_id: r.read_u32()?,
            name: r.read_string(NAME_LEN)?,
            map: r.read_string(MAP_LEN)?,
            is_leader: r.read_bool()?,
            is_online: r.read_bool()?,
            avatar_id: r.read_u16()?,
            level: r.read_u16()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExtPartyInfo {
    pub party_name: String,
    pub members: Vec<ExtPartyMemberInfo>,
}

impl TryFromBytes for ExtPartyInfo {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let party_name = r.read_string(NAME_LEN)?;
        if r.remaining() % ExtPartyMemberInfo::WIRE_LEN != 0 {
            return Err(DecodeError::BadLength {
                what: "extended party roster",
                len: bytes.len(),
            });
        }
        let mut members = Vec::with_capacity(r.remaining() / ExtPartyMemberInfo::WIRE_LEN);
        while r.remaining() > 0 {
            members.push(ExtPartyMemberInfo::read(&mut r)?);
        }
        Ok(ExtPartyInfo {
            party_name,
            members,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PartyMemberJoined {
    pub member: PartyMemberInfo,
}

impl TryFromBytes for PartyMemberJoined {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(PartyMemberJoined {
            member: PartyMemberInfo::read(&mut r)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PartyLeft {
    pub account_id: u32,
    pub name: String,
    pub reason: PartyLeaveReason,
}

impl TryFromBytes for PartyLeft {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(PartyLeft {
            account_id: r.read_u32()?,
            name: r.read_string(NAME_LEN)?,
            reason: PartyLeaveReason::from(r.read_u8()?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PartyChatMsg {
    pub account_id: u32,
    pub text: String,
}

impl TryFromBytes for PartyChatMsg {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let account_id = r.read_u32()?;
        let text = r.read_rest_string();
        Ok(PartyChatMsg { account_id, text })
    }
}

#[derive(Debug, Clone)]
pub struct PartyShareUpdate {
    pub experience: PartyShare,
}

impl TryFromBytes for PartyShareUpdate {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(PartyShareUpdate {
            experience: PartyShare::from(r.read_u16()?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExtPartyShareUpdate {
    pub experience: PartyShare,
    pub items: PartyShare,
}

impl TryFromBytes for ExtPartyShareUpdate {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(ExtPartyShareUpdate {
            experience: PartyShare::from(r.read_u16()?),
            items: PartyShare::from(r.read_u16()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_bytes(id: u32, name: &str, leader: bool, online: bool) -> Vec<u8> {
        let mut b = id.to_le_bytes().to_vec();
        let mut n = name.as_bytes().to_vec();
        n.resize(NAME_LEN, 0);
        b.extend_from_slice(&n);
        let mut m = b"hollow_vale".to_vec();
        m.resize(MAP_LEN, 0);
        b.extend_from_slice(&m);
        b.push(leader as u8);
        b.push(online as u8);
        b
    }

    #[test]
    fn decodes_roster() {
        let mut bytes = b"Ash Seekers".to_vec();
        bytes.resize(NAME_LEN, 0);
        bytes.extend(member_bytes(7, "Kes", true, true));
        bytes.extend(member_bytes(9, "Rel", false, false));

        let info = PartyInfo::try_from_bytes(&bytes).unwrap();
        assert_eq!(info.party_name, "Ash Seekers");
        assert_eq!(info.members.len(), 2);
        assert!(info.members[0].is_leader);
        assert_eq!(info.members[1].name, "Rel");
        assert!(!info.members[1].is_online);
        assert_eq!(info.members[1].map, "hollow_vale");
    }

    #[test]
    fn ragged_roster_is_rejected() {
        let mut bytes = vec![0u8; NAME_LEN];
        bytes.extend(vec![0u8; PartyMemberInfo::WIRE_LEN - 1]);
        assert!(matches!(
            PartyInfo::try_from_bytes(&bytes),
            Err(DecodeError::BadLength { .. })
        ));
    }

    #[test]
    fn chat_text_is_frame_delimited() {
        let mut bytes = 42u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"we ride at dawn");
        let msg = PartyChatMsg::try_from_bytes(&bytes).unwrap();
        assert_eq!(msg.account_id, 42);
        assert_eq!(msg.text, "we ride at dawn");
    }

    #[test]
    fn unknown_share_policy_becomes_unspecified() {
        let update = PartyShareUpdate::try_from_bytes(&[0x39, 0x05]).unwrap();
        assert_eq!(update.experience, PartyShare::Unspecified);
    }
}
