//! Feature handlers. Each owns its domain state plus a boxed wire
//! capability supplying the active family's encode/decode; the state
//! machines themselves are family-agnostic.

use crate::events::{ChatLog, UiSink};
use crate::network::PacketOutbox;
use crate::session::Session;

pub mod guild;
pub mod login;
pub mod party;
pub mod skill;
pub mod trade;

pub use guild::GuildHandler;
pub use login::LoginHandler;
pub use party::PartyHandler;
pub use skill::SkillHandler;
pub use trade::TradeHandler;

/// Everything a handler may touch while processing one inbound message.
/// Handlers must not block here; side effects are limited to session and
/// domain state, queued outbound frames, and collaborator callbacks.
pub struct Context<'a> {
    pub session: &'a mut Session,
    pub outbox: &'a PacketOutbox,
    pub ui: &'a mut dyn UiSink,
    pub log: &'a mut dyn ChatLog,
}
