//! Payloads the client sends. Opcode bindings are family-owned; see
//! [`crate::classic`] and [`crate::extended`].

mod guild;
pub use guild::{
    GuildChat, GuildCreate, GuildInvite, GuildKick, GuildLeave, GuildNoticeChange,
    GuildShareChange, GuildShareChangeExt,
};

mod login;
pub use login::{EnterWorld, ExtLogin, ExtRegister, Login, Register, SelectWorld};

mod party;
pub use party::{
    PartyChat, PartyCreate, PartyInvite, PartyKick, PartyLeave, PartyShareChange,
    PartyShareChangeExt,
};

mod skill;
pub use skill::{SkillUp, SkillUse};

mod trade;
pub use trade::{TradeAddItem, TradeCancel, TradeConfirm, TradeRequest, TradeRespond};
