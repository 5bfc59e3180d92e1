use crate::ToBytes;
use crate::codec::Writer;

/// Invoke a skill at a chosen level on a target entity.
#[derive(Debug)]
pub struct SkillUse {
    pub level: u16,
    pub skill_id: u16,
    pub target_id: u32,
}

impl ToBytes for SkillUse {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u16(self.level);
        w.write_u16(self.skill_id);
        w.write_u32(self.target_id);
    }
}

/// Spend one skill point raising a skill.
#[derive(Debug)]
pub struct SkillUp {
    pub skill_id: u16,
}

impl ToBytes for SkillUp {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u16(self.skill_id);
    }
}
