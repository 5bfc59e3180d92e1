//! Opcode table and frame lengths for the extended community fork. The fork
//! keeps the classic numbers wherever the layout is unchanged and assigns
//! new 0x0axx numbers to the messages it reshaped.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::PacketLen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum Codes {
    // account server (hello and world selection are wire-identical to classic)
    ServerHello = 0x0063,
    SelectWorld = 0x0066,
    LoginError = 0x006a,
    CharServerAck = 0x006b,
    WorldList = 0x006c,
    EnterWorld = 0x0072,
    /// Classic login plus a capability bitfield.
    Login = 0x0a64,
    /// Classic registration plus a starting avatar.
    Register = 0x0a68,
    /// Classic login result plus avatar and update host.
    LoginOk = 0x0a69,

    // trade (unchanged from classic)
    TradeRequest = 0x00e4,
    TradeRequested = 0x00e5,
    TradeRespond = 0x00e6,
    TradeResponse = 0x00e7,
    TradeAddItem = 0x00e8,
    TradeItemAdded = 0x00e9,
    TradeConfirm = 0x00eb,
    TradeConfirmed = 0x00ec,
    TradeCancel = 0x00ed,
    TradeCancelled = 0x00ee,
    TradeCompleted = 0x00f0,

    // party
    PartyCreate = 0x00f9,
    PartyCreateResult = 0x00fa,
    PartyInvite = 0x00fc,
    PartyInviteResult = 0x00fd,
    PartyInvited = 0x00fe,
    PartyLeave = 0x0100,
    PartyKick = 0x0103,
    PartyMemberJoined = 0x0104,
    PartyLeft = 0x0105,
    PartyChat = 0x0108,
    PartyChatMsg = 0x0109,
    /// Experience and item policy together.
    PartyShareUpdate = 0x0a61,
    PartyShareChange = 0x0a62,
    /// Roster entries carry avatar and level.
    PartyInfo = 0x0afb,

    // skills (unchanged from classic)
    SkillPointsUpdate = 0x010d,
    SkillUpdate = 0x010e,
    SkillList = 0x010f,
    SkillFailed = 0x0110,
    SkillUp = 0x0112,
    SkillUse = 0x0113,

    // guild
    GuildCreate = 0x0150,
    GuildInvite = 0x0151,
    GuildLeave = 0x0159,
    GuildLeft = 0x015a,
    GuildKick = 0x015b,
    GuildCreateResult = 0x0167,
    GuildInviteResult = 0x0169,
    GuildInvited = 0x016a,
    GuildNoticeChange = 0x016e,
    GuildNotice = 0x016f,
    GuildChat = 0x017e,
    GuildChatMsg = 0x017f,
    GuildInfo = 0x01b6,
    GuildMemberList = 0x0a54,
    GuildShareUpdate = 0x0a63,
    GuildShareChange = 0x0a65,
}

/// Frame length (opcode included) for each opcode.
pub fn packet_len(code: Codes) -> PacketLen {
    use PacketLen::{Fixed, Variable};
    match code {
        Codes::ServerHello => Fixed(7),
        Codes::SelectWorld => Fixed(3),
        Codes::LoginError => Fixed(23),
        Codes::CharServerAck => Fixed(3),
        Codes::WorldList => Variable,
        Codes::EnterWorld => Fixed(14),
        Codes::Login => Fixed(57),
        Codes::Register => Fixed(92),
        Codes::LoginOk => Fixed(40),

        Codes::TradeRequest => Fixed(26),
        Codes::TradeRequested => Fixed(26),
        Codes::TradeRespond => Fixed(3),
        Codes::TradeResponse => Fixed(3),
        Codes::TradeAddItem => Fixed(8),
        Codes::TradeItemAdded => Fixed(8),
        Codes::TradeConfirm => Fixed(2),
        Codes::TradeConfirmed => Fixed(3),
        Codes::TradeCancel => Fixed(2),
        Codes::TradeCancelled => Fixed(2),
        Codes::TradeCompleted => Fixed(3),

        Codes::PartyCreate => Fixed(26),
        Codes::PartyCreateResult => Fixed(3),
        Codes::PartyInvite => Fixed(26),
        Codes::PartyInviteResult => Fixed(27),
        Codes::PartyInvited => Fixed(54),
        Codes::PartyLeave => Fixed(2),
        Codes::PartyKick => Fixed(30),
        Codes::PartyMemberJoined => Fixed(48),
        Codes::PartyLeft => Fixed(31),
        Codes::PartyChat => Variable,
        Codes::PartyChatMsg => Variable,
        Codes::PartyShareUpdate => Fixed(6),
        Codes::PartyShareChange => Fixed(6),
        Codes::PartyInfo => Variable,

        Codes::SkillPointsUpdate => Fixed(4),
        Codes::SkillUpdate => Fixed(11),
        Codes::SkillList => Variable,
        Codes::SkillFailed => Fixed(5),
        Codes::SkillUp => Fixed(4),
        Codes::SkillUse => Fixed(10),

        Codes::GuildCreate => Fixed(26),
        Codes::GuildInvite => Fixed(26),
        Codes::GuildLeave => Fixed(2),
        Codes::GuildLeft => Fixed(27),
        Codes::GuildKick => Fixed(30),
        Codes::GuildCreateResult => Fixed(3),
        Codes::GuildInviteResult => Fixed(27),
        Codes::GuildInvited => Fixed(54),
        Codes::GuildNoticeChange => Fixed(182),
        Codes::GuildNotice => Fixed(182),
        Codes::GuildChat => Variable,
        Codes::GuildChatMsg => Variable,
        Codes::GuildInfo => Fixed(58),
        Codes::GuildMemberList => Variable,
        Codes::GuildShareUpdate => Fixed(6),
        Codes::GuildShareChange => Fixed(6),
    }
}

/// Length lookup by raw opcode, for the framing layer.
pub fn packet_len_for(opcode: u16) -> Option<PacketLen> {
    Codes::try_from(opcode).ok().map(packet_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classic;

    #[test]
    fn reshaped_messages_moved_off_classic_numbers() {
        // The fork must not reuse a classic number for a different layout.
        for (ext, old) in [
            (Codes::Login, classic::Codes::Login),
            (Codes::Register, classic::Codes::Register),
            (Codes::LoginOk, classic::Codes::LoginOk),
            (Codes::PartyInfo, classic::Codes::PartyInfo),
            (Codes::PartyShareUpdate, classic::Codes::PartyShareUpdate),
            (Codes::GuildMemberList, classic::Codes::GuildMemberList),
        ] {
            assert_ne!(u16::from(ext), u16::from(old));
        }
    }

    #[test]
    fn overlapping_messages_keep_classic_numbers() {
        assert_eq!(
            u16::from(Codes::TradeRequest),
            u16::from(classic::Codes::TradeRequest)
        );
        assert_eq!(
            u16::from(Codes::SkillList),
            u16::from(classic::Codes::SkillList)
        );
    }
}
