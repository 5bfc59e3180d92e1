//! Wire enums and field widths shared by both protocol families.

use num_enum::{FromPrimitive, IntoPrimitive};

/// Width of player / party / guild name fields.
pub const NAME_LEN: usize = 24;
/// Width of map name fields.
pub const MAP_LEN: usize = 16;
/// Width of world host fields.
pub const HOST_LEN: usize = 16;
/// Width of world name fields.
pub const WORLD_NAME_LEN: usize = 20;
/// Width of account email fields.
pub const EMAIL_LEN: usize = 40;
/// Width of the guild notice subject field.
pub const NOTICE_SUBJECT_LEN: usize = 60;
/// Width of the guild notice body field.
pub const NOTICE_BODY_LEN: usize = 120;
/// Width of the login error detail field.
pub const LOGIN_DETAIL_LEN: usize = 20;
/// Longest chat line either family accepts, in bytes.
pub const CHAT_LEN_MAX: usize = 255;

/// Party experience/item sharing policy. Servers occasionally send values
/// outside the documented set; those land in `Unspecified` rather than
/// leaving the policy uninitialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum PartyShare {
    None = 0,
    Own = 1,
    Shared = 2,
    #[num_enum(default)]
    Unspecified = 0xffff,
}

/// Guild counterpart of [`PartyShare`], same tolerance for unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum GuildShare {
    None = 0,
    Own = 1,
    Shared = 2,
    #[num_enum(default)]
    Unspecified = 0xffff,
}

/// Server-side login rejection codes. Unknown codes bucket into
/// `Unspecified` so a newer server cannot break the error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum LoginFailure {
    UnregisteredId = 0,
    WrongPassword = 1,
    Expired = 2,
    Rejected = 3,
    Blocked = 4,
    OutdatedClient = 5,
    Banned = 6,
    DuplicateAccount = 7,
    #[num_enum(default)]
    Unspecified = 0xff,
}

impl LoginFailure {
    pub fn message(self) -> &'static str {
        match self {
            LoginFailure::UnregisteredId => "Unregistered account name",
            LoginFailure::WrongPassword => "Wrong password",
            LoginFailure::Expired => "Account expired",
            LoginFailure::Rejected => "Rejected by server",
            LoginFailure::Blocked => "Account blocked by the administrator",
            LoginFailure::Banned => "Account banned",
            LoginFailure::OutdatedClient => "Client too old, please update",
            LoginFailure::DuplicateAccount => "Account name already in use",
            LoginFailure::Unspecified => "Unknown error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_share_value_maps_to_unspecified() {
        assert_eq!(PartyShare::from(3u16), PartyShare::Unspecified);
        assert_eq!(PartyShare::from(0x1234u16), PartyShare::Unspecified);
        assert_eq!(GuildShare::from(9u16), GuildShare::Unspecified);
        assert_eq!(PartyShare::from(2u16), PartyShare::Shared);
    }

    #[test]
    fn unknown_login_failure_buckets_to_unspecified() {
        assert_eq!(LoginFailure::from(200u8), LoginFailure::Unspecified);
        assert_eq!(LoginFailure::from(1u8), LoginFailure::WrongPassword);
        assert_eq!(LoginFailure::Unspecified.message(), "Unknown error");
    }
}
