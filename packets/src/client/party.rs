use crate::ToBytes;
use crate::codec::Writer;
use crate::types::{NAME_LEN, PartyShare};

#[derive(Debug)]
pub struct PartyCreate {
    pub name: String,
}

impl ToBytes for PartyCreate {
    fn write_payload(&self, w: &mut Writer) {
        w.write_string(&self.name, NAME_LEN);
    }
}

#[derive(Debug)]
pub struct PartyInvite {
    pub name: String,
}

impl ToBytes for PartyInvite {
    fn write_payload(&self, w: &mut Writer) {
        w.write_string(&self.name, NAME_LEN);
    }
}

#[derive(Debug)]
pub struct PartyLeave;

impl ToBytes for PartyLeave {
    fn write_payload(&self, _w: &mut Writer) {}
}

#[derive(Debug)]
pub struct PartyKick {
    pub account_id: u32,
    pub name: String,
}

impl ToBytes for PartyKick {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u32(self.account_id);
        w.write_string(&self.name, NAME_LEN);
    }
}

/// Chat line to the party channel; length comes from the frame.
#[derive(Debug)]
pub struct PartyChat {
    pub text: String,
}

impl ToBytes for PartyChat {
    fn write_payload(&self, w: &mut Writer) {
        w.write_bytes(self.text.as_bytes());
    }
}

/// Classic servers only share experience.
#[derive(Debug)]
pub struct PartyShareChange {
    pub experience: PartyShare,
}

impl ToBytes for PartyShareChange {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u16(self.experience.into());
    }
}

/// The extended fork shares items as well.
#[derive(Debug)]
pub struct PartyShareChangeExt {
    pub experience: PartyShare,
    pub items: PartyShare,
}

impl ToBytes for PartyShareChangeExt {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u16(self.experience.into());
        w.write_u16(self.items.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kick_layout() {
        let bytes = PartyKick {
            account_id: 0x01020304,
            name: "Rel".into(),
        }
        .to_bytes();
        assert_eq!(bytes.len(), 4 + 24);
        assert_eq!(&bytes[..4], &[4, 3, 2, 1]);
        assert_eq!(&bytes[4..7], b"Rel");
    }

    #[test]
    fn share_change_writes_policy_value() {
        let bytes = PartyShareChange {
            experience: PartyShare::Shared,
        }
        .to_bytes();
        assert_eq!(bytes, [2, 0]);
    }
}
