use crate::TryFromBytes;
use crate::codec::Reader;
use crate::error::DecodeError;
use crate::types::{GuildShare, NAME_LEN, NOTICE_BODY_LEN, NOTICE_SUBJECT_LEN};

#[derive(Debug, Clone)]
pub struct GuildCreateResult {
    pub code: u8,
}

impl TryFromBytes for GuildCreateResult {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(GuildCreateResult { code: r.read_u8()? })
    }
}

/// Basic guild sheet, sent when joining and after structural changes.
#[derive(Debug, Clone)]
pub struct GuildInfo {
    pub guild_id: u32,
    pub name: String,
    pub master: String,
    pub member_count: u16,
    pub max_members: u16,
}

impl TryFromBytes for GuildInfo {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(GuildInfo {
            guild_id: r.read_u32()?,
            name: r.read_string(NAME_LEN)?,
            master: r.read_string(NAME_LEN)?,
            member_count: r.read_u16()?,
            max_members: r.read_u16()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GuildInvited {
    pub guild_id: u32,
    pub from_name: String,
    pub guild_name: String,
}

impl TryFromBytes for GuildInvited {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(GuildInvited {
            guild_id: r.read_u32()?,
            from_name: r.read_string(NAME_LEN)?,
            guild_name: r.read_string(NAME_LEN)?,
        })
    }
}

/// Reuses the party answer codes; the wire values are identical.
#[derive(Debug, Clone)]
pub struct GuildInviteResult {
    pub name: String,
    pub answer: super::PartyInviteAnswer,
}

impl TryFromBytes for GuildInviteResult {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(GuildInviteResult {
            name: r.read_string(NAME_LEN)?,
            answer: super::PartyInviteAnswer::from(r.read_u8()?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct GuildMemberInfo {
    pub account_id: u32,
    pub name: String,
    pub position: u8,
    pub is_online: bool,
    pub avatar_id: Option<u16>,
    pub level: Option<u16>,
}

impl GuildMemberInfo {
    pub const WIRE_LEN: usize = 4 + NAME_LEN + 2;
    pub const EXT_WIRE_LEN: usize = Self::WIRE_LEN + 4;

    fn read(r: &mut Reader) -> Result<Self, DecodeError> {
        Ok(GuildMemberInfo {
            account_id: r.read_u32()?,
            name: r.read_string(NAME_LEN)?,
            position: r.read_u8()?,
            is_online: r.read_bool()?,
            avatar_id: None,
            level: None,
        })
    }

    fn read_ext(r: &mut Reader) -> Result<Self, DecodeError> {
        let mut member = Self::read(r)?;
        member.avatar_id = Some(r.read_u16()?);
        member.level = Some(r.read_u16()?);
        Ok(member)
    }
}

#[derive(Debug, Clone)]
pub struct GuildMemberList {
    pub members: Vec<GuildMemberInfo>,
}

impl TryFromBytes for GuildMemberList {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() % GuildMemberInfo::WIRE_LEN != 0 {
            return Err(DecodeError::BadLength {
                what: "guild roster",
                len: bytes.len(),
            });
        }
        let mut r = Reader::new(bytes);
        let mut members = Vec::with_capacity(bytes.len() / GuildMemberInfo::WIRE_LEN);
        while r.remaining() > 0 {
            members.push(GuildMemberInfo::read(&mut r)?);
        }
        Ok(GuildMemberList { members })
    }
}

/// Extended-fork roster; each entry carries avatar and level.
#[derive(Debug, Clone)]
pub struct ExtGuildMemberList {
    pub members: Vec<GuildMemberInfo>,
}

impl TryFromBytes for ExtGuildMemberList {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() % GuildMemberInfo::EXT_WIRE_LEN != 0 {
            return Err(DecodeError::BadLength {
                what: "extended guild roster",
                len: bytes.len(),
            });
        }
        let mut r = Reader::new(bytes);
        let mut members = Vec::with_capacity(bytes.len() / GuildMemberInfo::EXT_WIRE_LEN);
        while r.remaining() > 0 {
            members.push(GuildMemberInfo::read_ext(&mut r)?);
        }
        Ok(ExtGuildMemberList { members })
    }
}

/// A member left or was expelled; reuses the party reason codes.
#[derive(Debug, Clone)]
pub struct GuildLeft {
    pub name: String,
    pub reason: super::PartyLeaveReason,
}

impl TryFromBytes for GuildLeft {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(GuildLeft {
            name: r.read_string(NAME_LEN)?,
            reason: super::PartyLeaveReason::from(r.read_u8()?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct GuildChatMsg {
    pub account_id: u32,
    pub text: String,
}

impl TryFromBytes for GuildChatMsg {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let account_id = r.read_u32()?;
        let text = r.read_rest_string();
        Ok(GuildChatMsg { account_id, text })
    }
}

#[derive(Debug, Clone)]
pub struct GuildNotice {
    pub subject: String,
    pub body: String,
}

impl TryFromBytes for GuildNotice {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(GuildNotice {
            subject: r.read_string(NOTICE_SUBJECT_LEN)?,
            body: r.read_string(NOTICE_BODY_LEN)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GuildShareUpdate {
    pub experience: GuildShare,
}

impl TryFromBytes for GuildShareUpdate {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(GuildShareUpdate {
            experience: GuildShare::from(r.read_u16()?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExtGuildShareUpdate {
    pub experience: GuildShare,
    pub items: GuildShare,
}

impl TryFromBytes for ExtGuildShareUpdate {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(ExtGuildShareUpdate {
            experience: GuildShare::from(r.read_u16()?),
            items: GuildShare::from(r.read_u16()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, name: &str, ext: bool) -> Vec<u8> {
        let mut b = id.to_le_bytes().to_vec();
        let mut n = name.as_bytes().to_vec();
        n.resize(NAME_LEN, 0);
        b.extend_from_slice(&n);
        b.push(1); // position
        b.push(1); // online
        if ext {
            b.extend_from_slice(&12u16.to_le_bytes());
            b.extend_from_slice(&80u16.to_le_bytes());
        }
        b
    }

    #[test]
    fn classic_roster_has_no_avatar() {
        let mut bytes = entry(1, "Kes", false);
        bytes.extend(entry(2, "Rel", false));
        let list = GuildMemberList::try_from_bytes(&bytes).unwrap();
        assert_eq!(list.members.len(), 2);
        assert_eq!(list.members[0].avatar_id, None);
    }

    #[test]
    fn extended_roster_carries_avatar_and_level() {
        let bytes = entry(1, "Kes", true);
        let list = ExtGuildMemberList::try_from_bytes(&bytes).unwrap();
        assert_eq!(list.members[0].avatar_id, Some(12));
        assert_eq!(list.members[0].level, Some(80));
    }
}
