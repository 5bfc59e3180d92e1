//! Protocol families. Each family owns an opcode table, frame lengths and
//! wire implementations for the five feature handlers; everything above
//! this module is family-agnostic.

use network::LengthTable;

use crate::dispatch::Dispatcher;
use crate::handlers::guild::GuildWire;
use crate::handlers::login::LoginWire;
use crate::handlers::party::PartyWire;
use crate::handlers::skill::SkillWire;
use crate::handlers::trade::TradeWire;

pub mod classic;
pub mod extended;

/// Version reported in the login frame. Servers refuse clients that are
/// too far behind.
pub const CLIENT_VERSION: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolFamily {
    #[default]
    Classic,
    Extended,
}

impl ProtocolFamily {
    pub fn name(self) -> &'static str {
        match self {
            ProtocolFamily::Classic => "classic",
            ProtocolFamily::Extended => "extended",
        }
    }

    /// Frame-length lookup for the socket reader.
    pub fn lengths(self) -> LengthTable {
        match self {
            ProtocolFamily::Classic => packets::classic::packet_len_for,
            ProtocolFamily::Extended => packets::extended::packet_len_for,
        }
    }

    /// Fills the routing table with every inbound opcode of this family.
    pub fn register(self, dispatcher: &mut Dispatcher) {
        match self {
            ProtocolFamily::Classic => classic::register(dispatcher),
            ProtocolFamily::Extended => extended::register(dispatcher),
        }
    }

    pub fn login_wire(self) -> Box<dyn LoginWire> {
        match self {
            ProtocolFamily::Classic => Box::new(classic::ClassicWire),
            ProtocolFamily::Extended => Box::new(extended::ExtendedWire::default()),
        }
    }

    pub fn party_wire(self) -> Box<dyn PartyWire> {
        match self {
            ProtocolFamily::Classic => Box::new(classic::ClassicWire),
            ProtocolFamily::Extended => Box::new(extended::ExtendedWire::default()),
        }
    }

    pub fn guild_wire(self) -> Box<dyn GuildWire> {
        match self {
            ProtocolFamily::Classic => Box::new(classic::ClassicWire),
            ProtocolFamily::Extended => Box::new(extended::ExtendedWire::default()),
        }
    }

    pub fn trade_wire(self) -> Box<dyn TradeWire> {
        match self {
            ProtocolFamily::Classic => Box::new(classic::ClassicWire),
            ProtocolFamily::Extended => Box::new(extended::ExtendedWire::default()),
        }
    }

    pub fn skill_wire(self) -> Box<dyn SkillWire> {
        match self {
            ProtocolFamily::Classic => Box::new(classic::ClassicWire),
            ProtocolFamily::Extended => Box::new(extended::ExtendedWire::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::HandlerId;

    #[test]
    fn both_families_route_the_shared_trade_opcodes() {
        for family in [ProtocolFamily::Classic, ProtocolFamily::Extended] {
            let mut d = Dispatcher::new();
            family.register(&mut d);
            assert_eq!(d.lookup(0x00e5), Some(HandlerId::Trade), "{}", family.name());
            assert_eq!(d.lookup(0x010f), Some(HandlerId::Skill), "{}", family.name());
        }
    }

    #[test]
    fn families_disagree_on_reshaped_login_result() {
        let mut classic = Dispatcher::new();
        ProtocolFamily::Classic.register(&mut classic);
        let mut extended = Dispatcher::new();
        ProtocolFamily::Extended.register(&mut extended);

        assert_eq!(classic.lookup(0x0069), Some(HandlerId::Login));
        assert_eq!(extended.lookup(0x0069), None);
        assert_eq!(extended.lookup(0x0a69), Some(HandlerId::Login));
    }
}
