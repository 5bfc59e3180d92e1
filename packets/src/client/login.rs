use crate::ToBytes;
use crate::codec::Writer;
use crate::types::{EMAIL_LEN, NAME_LEN};

/// Credentials sent to the classic account server.
#[derive(Debug)]
pub struct Login {
    pub client_version: u32,
    pub username: String,
    pub password: String,
    pub flags: u8,
}

impl ToBytes for Login {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u32(self.client_version);
        w.write_string(&self.username, NAME_LEN);
        w.write_string(&self.password, NAME_LEN);
        w.write_u8(self.flags);
    }
}

/// Extended-fork login; adds a capability bitfield the fork uses for
/// feature negotiation.
#[derive(Debug)]
pub struct ExtLogin {
    pub client_version: u32,
    pub username: String,
    pub password: String,
    pub flags: u8,
    pub capabilities: u16,
}

impl ToBytes for ExtLogin {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u32(self.client_version);
        w.write_string(&self.username, NAME_LEN);
        w.write_string(&self.password, NAME_LEN);
        w.write_u8(self.flags);
        w.write_u16(self.capabilities);
    }
}

/// New-account registration on the classic server.
#[derive(Debug)]
pub struct Register {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl ToBytes for Register {
    fn write_payload(&self, w: &mut Writer) {
        w.write_string(&self.username, NAME_LEN);
        w.write_string(&self.password, NAME_LEN);
        w.write_string(&self.email, EMAIL_LEN);
    }
}

/// Extended-fork registration; the fork stores a starting avatar with the
/// account record.
#[derive(Debug)]
pub struct ExtRegister {
    pub username: String,
    pub password: String,
    pub email: String,
    pub avatar_id: u16,
}

impl ToBytes for ExtRegister {
    fn write_payload(&self, w: &mut Writer) {
        w.write_string(&self.username, NAME_LEN);
        w.write_string(&self.password, NAME_LEN);
        w.write_string(&self.email, EMAIL_LEN);
        w.write_u16(self.avatar_id);
    }
}

/// Picks an entry from the world list by position.
#[derive(Debug)]
pub struct SelectWorld {
    pub index: u8,
}

impl ToBytes for SelectWorld {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u8(self.index);
    }
}

/// Presents the login token to the character server of the selected world.
#[derive(Debug)]
pub struct EnterWorld {
    pub account_id: u32,
    pub session_id: u32,
    pub auth_key: u32,
}

impl ToBytes for EnterWorld {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u32(self.account_id);
        w.write_u32(self.session_id);
        w.write_u32(self.auth_key);
    }
}
