use crate::ToBytes;
use crate::codec::Writer;
use crate::types::{GuildShare, NAME_LEN, NOTICE_BODY_LEN, NOTICE_SUBJECT_LEN};

#[derive(Debug)]
pub struct GuildCreate {
    pub name: String,
}

impl ToBytes for GuildCreate {
    fn write_payload(&self, w: &mut Writer) {
        w.write_string(&self.name, NAME_LEN);
    }
}

#[derive(Debug)]
pub struct GuildInvite {
    pub name: String,
}

impl ToBytes for GuildInvite {
    fn write_payload(&self, w: &mut Writer) {
        w.write_string(&self.name, NAME_LEN);
    }
}

#[derive(Debug)]
pub struct GuildLeave;

impl ToBytes for GuildLeave {
    fn write_payload(&self, _w: &mut Writer) {}
}

#[derive(Debug)]
pub struct GuildKick {
    pub account_id: u32,
    pub name: String,
}

impl ToBytes for GuildKick {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u32(self.account_id);
        w.write_string(&self.name, NAME_LEN);
    }
}

#[derive(Debug)]
pub struct GuildChat {
    pub text: String,
}

impl ToBytes for GuildChat {
    fn write_payload(&self, w: &mut Writer) {
        w.write_bytes(self.text.as_bytes());
    }
}

/// Replaces the guild notice board. Only the guild master may send this;
/// the server enforces that.
#[derive(Debug)]
pub struct GuildNoticeChange {
    pub subject: String,
    pub body: String,
}

impl ToBytes for GuildNoticeChange {
    fn write_payload(&self, w: &mut Writer) {
        w.write_string(&self.subject, NOTICE_SUBJECT_LEN);
        w.write_string(&self.body, NOTICE_BODY_LEN);
    }
}

#[derive(Debug)]
pub struct GuildShareChange {
    pub experience: GuildShare,
}

impl ToBytes for GuildShareChange {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u16(self.experience.into());
    }
}

#[derive(Debug)]
pub struct GuildShareChangeExt {
    pub experience: GuildShare,
    pub items: GuildShare,
}

impl ToBytes for GuildShareChangeExt {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u16(self.experience.into());
        w.write_u16(self.items.into());
    }
}
