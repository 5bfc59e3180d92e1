//! Payloads the server sends. Decoders read fields in wire order and treat
//! a short read as fatal to the message; trailing bytes are tolerated for
//! forward compatibility across fork versions.

mod guild;
pub use guild::{
    ExtGuildMemberList, ExtGuildShareUpdate, GuildChatMsg, GuildCreateResult, GuildInfo,
    GuildInviteResult, GuildInvited, GuildLeft, GuildMemberInfo, GuildMemberList, GuildNotice,
    GuildShareUpdate,
};

mod login;
pub use login::{CharServerAck, ExtLoginOk, LoginError, LoginOk, ServerHello, WorldInfo, WorldList};

mod party;
pub use party::{
    ExtPartyInfo, ExtPartyMemberInfo, ExtPartyShareUpdate, PartyChatMsg, PartyCreateResult,
    PartyInfo, PartyInviteAnswer, PartyInviteResult, PartyInvited, PartyLeaveReason, PartyLeft,
    PartyMemberInfo, PartyMemberJoined, PartyShareUpdate,
};

mod skill;
pub use skill::{SkillFailReason, SkillFailed, SkillInfo, SkillList, SkillPointsUpdate, SkillUpdate};

mod trade;
pub use trade::{
    TradeAnswer, TradeCancelled, TradeCompleted, TradeConfirmed, TradeItemAdded, TradeRequested,
    TradeResponse,
};
