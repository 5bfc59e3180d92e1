use num_enum::{FromPrimitive, IntoPrimitive};

use crate::TryFromBytes;
use crate::codec::Reader;
use crate::error::DecodeError;

/// Why a skill invocation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SkillFailReason {
    InsufficientSp = 0,
    InsufficientHp = 1,
    OutOfRange = 2,
    WrongWeapon = 3,
    OnCooldown = 4,
    #[num_enum(default)]
    Unspecified = 0xff,
}

impl SkillFailReason {
    pub fn message(self) -> &'static str {
        match self {
            SkillFailReason::InsufficientSp => "Not enough SP",
            SkillFailReason::InsufficientHp => "Not enough HP",
            SkillFailReason::OutOfRange => "Target out of range",
            SkillFailReason::WrongWeapon => "Wrong weapon equipped",
            SkillFailReason::OnCooldown => "Skill is still recovering",
            SkillFailReason::Unspecified => "Skill failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillInfo {
    pub id: u16,
    pub level: u16,
    pub sp_cost: u16,
    pub range: u16,
    pub can_upgrade: bool,
}

impl SkillInfo {
    pub const WIRE_LEN: usize = 9;

    fn read(r: &mut Reader) -> Result<Self, DecodeError> {
        Ok(SkillInfo {
            id: r.read_u16()?,
            level: r.read_u16()?,
            sp_cost: r.read_u16()?,
            range: r.read_u16()?,
            can_upgrade: r.read_bool()?,
        })
    }
}

/// Full skill table: unspent points, then one entry per known skill.
#[derive(Debug, Clone)]
pub struct SkillList {
    pub points: u16,
    pub skills: Vec<SkillInfo>,
}

impl TryFromBytes for SkillList {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let points = r.read_u16()?;
        if r.remaining() % SkillInfo::WIRE_LEN != 0 {
            return Err(DecodeError::BadLength {
                what: "skill list",
                len: bytes.len(),
            });
        }
        let mut skills = Vec::with_capacity(r.remaining() / SkillInfo::WIRE_LEN);
        while r.remaining() > 0 {
            skills.push(SkillInfo::read(&mut r)?);
        }
        Ok(SkillList { points, skills })
    }
}

/// Single-skill patch after a raise or equipment change.
#[derive(Debug, Clone)]
pub struct SkillUpdate {
    pub skill: SkillInfo,
}

impl TryFromBytes for SkillUpdate {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(SkillUpdate {
            skill: SkillInfo::read(&mut r)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SkillPointsUpdate {
    pub points: u16,
}

impl TryFromBytes for SkillPointsUpdate {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(SkillPointsUpdate {
            points: r.read_u16()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SkillFailed {
    pub skill_id: u16,
    pub reason: SkillFailReason,
}

impl TryFromBytes for SkillFailed {
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        Ok(SkillFailed {
            skill_id: r.read_u16()?,
            reason: SkillFailReason::from(r.read_u8()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_skill_list() {
        let mut bytes = 3u16.to_le_bytes().to_vec();
        for (id, level) in [(10u16, 1u16), (11, 5)] {
            bytes.extend_from_slice(&id.to_le_bytes());
            bytes.extend_from_slice(&level.to_le_bytes());
            bytes.extend_from_slice(&8u16.to_le_bytes());
            bytes.extend_from_slice(&2u16.to_le_bytes());
            bytes.push(1);
        }
        let list = SkillList::try_from_bytes(&bytes).unwrap();
        assert_eq!(list.points, 3);
        assert_eq!(list.skills.len(), 2);
        assert_eq!(list.skills[1].level, 5);
        assert!(list.skills[0].can_upgrade);
    }

    #[test]
    fn unknown_fail_reason_has_generic_message() {
        let failed = SkillFailed::try_from_bytes(&[10, 0, 77]).unwrap();
        assert_eq!(failed.reason, SkillFailReason::Unspecified);
        assert_eq!(failed.reason.message(), "Skill failed");
    }
}
