//! Opcode table and frame lengths for the classic Ashfall server family.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::PacketLen;

/// Every opcode the classic family speaks, both directions. Numbers are
/// fixed by the server implementation; do not renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum Codes {
    // account server
    /// Sent by the server immediately after connect.
    ServerHello = 0x0063,
    Login = 0x0064,
    SelectWorld = 0x0066,
    Register = 0x0068,
    LoginOk = 0x0069,
    LoginError = 0x006a,
    CharServerAck = 0x006b,
    WorldList = 0x006c,
    /// Token handshake with the character server of the selected world.
    EnterWorld = 0x0072,

    // trade
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
    PartyInfo = 0x00fb,
    PartyInvite = 0x00fc,
    PartyInviteResult = 0x00fd,
    PartyInvited = 0x00fe,
    PartyLeave = 0x0100,
    /// Classic servers only report the experience policy.
    PartyShareUpdate = 0x0101,
    PartyShareChange = 0x0102,
    PartyKick = 0x0103,
    PartyMemberJoined = 0x0104,
    PartyLeft = 0x0105,
    PartyChat = 0x0108,
    PartyChatMsg = 0x0109,

    // skills
    SkillPointsUpdate = 0x010d,
    SkillUpdate = 0x010e,
    SkillList = 0x010f,
    SkillFailed = 0x0110,
    SkillUp = 0x0112,
    SkillUse = 0x0113,

    // guild
    GuildCreate = 0x0150,
    GuildInvite = 0x0151,
    GuildMemberList = 0x0154,
    GuildLeave = 0x0159,
    GuildLeft = 0x015a,
    GuildKick = 0x015b,
    GuildShareChange = 0x0160,
    GuildShareUpdate = 0x0161,
    GuildCreateResult = 0x0167,
    GuildInviteResult = 0x0169,
    GuildInvited = 0x016a,
    GuildNoticeChange = 0x016e,
    GuildNotice = 0x016f,
    GuildChat = 0x017e,
    GuildChatMsg = 0x017f,
    GuildInfo = 0x01b6,
}

/// Frame length (opcode included) for each opcode.
pub fn packet_len(code: Codes) -> PacketLen {
    use PacketLen::{Fixed, Variable};
    match code {
        Codes::ServerHello => Fixed(7),
        Codes::Login => Fixed(55),
        Codes::SelectWorld => Fixed(3),
        Codes::Register => Fixed(90),
        Codes::LoginOk => Fixed(14),
        Codes::LoginError => Fixed(23),
        Codes::CharServerAck => Fixed(3),
        Codes::WorldList => Variable,
        Codes::EnterWorld => Fixed(14),

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
        Codes::PartyInfo => Variable,
        Codes::PartyInvite => Fixed(26),
        Codes::PartyInviteResult => Fixed(27),
        Codes::PartyInvited => Fixed(54),
        Codes::PartyLeave => Fixed(2),
        Codes::PartyShareUpdate => Fixed(4),
        Codes::PartyShareChange => Fixed(4),
        Codes::PartyKick => Fixed(30),
        Codes::PartyMemberJoined => Fixed(48),
        Codes::PartyLeft => Fixed(31),
        Codes::PartyChat => Variable,
        Codes::PartyChatMsg => Variable,

        Codes::SkillPointsUpdate => Fixed(4),
        Codes::SkillUpdate => Fixed(11),
        Codes::SkillList => Variable,
        Codes::SkillFailed => Fixed(5),
        Codes::SkillUp => Fixed(4),
        Codes::SkillUse => Fixed(10),

        Codes::GuildCreate => Fixed(26),
        Codes::GuildInvite => Fixed(26),
        Codes::GuildMemberList => Variable,
        Codes::GuildLeave => Fixed(2),
        Codes::GuildLeft => Fixed(27),
        Codes::GuildKick => Fixed(30),
        Codes::GuildShareChange => Fixed(4),
        Codes::GuildShareUpdate => Fixed(4),
        Codes::GuildCreateResult => Fixed(3),
        Codes::GuildInviteResult => Fixed(27),
        Codes::GuildInvited => Fixed(54),
        Codes::GuildNoticeChange => Fixed(182),
        Codes::GuildNotice => Fixed(182),
        Codes::GuildChat => Variable,
        Codes::GuildChatMsg => Variable,
        Codes::GuildInfo => Fixed(58),
    }
}

/// Length lookup by raw opcode, for the framing layer.
pub fn packet_len_for(opcode: u16) -> Option<PacketLen> {
    Codes::try_from(opcode).ok().map(packet_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_opcode_has_no_length() {
        assert_eq!(packet_len_for(0x7fff), None);
        assert_eq!(packet_len_for(0x0064), Some(PacketLen::Fixed(55)));
    }

    #[test]
    fn fixed_lengths_cover_opcode_header() {
        // No fixed frame can be shorter than its own opcode.
        for raw in 0u16..=0x01ff {
            if let Some(PacketLen::Fixed(n)) = packet_len_for(raw) {
                assert!(n >= 2, "opcode {raw:#06x} has frame length {n}");
            }
        }
    }
}
