use std::sync::Arc;

use packets::DecodeError;
use packets::types::{GuildShare, PartyShare};

use crate::dispatch::{Dispatcher, HandlerId};
use crate::error::ValidationError;
use crate::events::{ChatLog, NetworkEvent, UiSink};
use crate::handlers::{
    Context, GuildHandler, LoginHandler, PartyHandler, SkillHandler, TradeHandler,
};
use crate::network::PacketOutbox;
use crate::protocol::ProtocolFamily;
use crate::session::Session;

/// Protocol-layer state for one server connection: the routing table, the
/// session, and one handler per feature. Single-threaded; the socket task
/// only touches the outbox.
pub struct Client {
    family: ProtocolFamily,
    dispatcher: Dispatcher,
    session: Session,
    login: LoginHandler,
    party: PartyHandler,
    guild: GuildHandler,
    trade: TradeHandler,
    skill: SkillHandler,
    outbox: Arc<PacketOutbox>,
}

impl Client {
    pub fn new(family: ProtocolFamily) -> Self {
        let mut dispatcher = Dispatcher::new();
        family.register(&mut dispatcher);
        tracing::debug!(
            family = family.name(),
            routes = dispatcher.len(),
            "routing table built"
        );
        Self {
            family,
            dispatcher,
            session: Session::default(),
            login: LoginHandler::new(family.login_wire()),
            party: PartyHandler::new(family.party_wire()),
            guild: GuildHandler::new(family.guild_wire()),
            trade: TradeHandler::new(family.trade_wire()),
            skill: SkillHandler::new(family.skill_wire()),
            outbox: Arc::new(PacketOutbox::default()),
        }
    }

    pub fn family(&self) -> ProtocolFamily {
        self.family
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn outbox(&self) -> Arc<PacketOutbox> {
        Arc::clone(&self.outbox)
    }

    pub fn login_handler(&self) -> &LoginHandler {
        &self.login
    }

    pub fn party_handler(&self) -> &PartyHandler {
        &self.party
    }

    pub fn guild_handler(&self) -> &GuildHandler {
        &self.guild
    }

    pub fn trade_handler(&self) -> &TradeHandler {
        &self.trade
    }

    pub fn skill_handler(&self) -> &SkillHandler {
        &self.skill
    }

    /// Tears down the old family completely: routing table, handlers and
    /// session all start over. Only valid between connections.
    pub fn select_family(&mut self, family: ProtocolFamily) {
        tracing::info!(from = self.family.name(), to = family.name(), "protocol family switch");
        self.family = family;
        self.dispatcher.clear();
        family.register(&mut self.dispatcher);
        tracing::debug!(routes = self.dispatcher.len(), "routing table rebuilt");
        self.login = LoginHandler::new(family.login_wire());
        self.party = PartyHandler::new(family.party_wire());
        self.guild = GuildHandler::new(family.guild_wire());
        self.trade = TradeHandler::new(family.trade_wire());
        self.skill = SkillHandler::new(family.skill_wire());
        self.session.reset();
    }

    /// Drains one event from the socket task. Messages that route nowhere
    /// or fail to decode are logged and dropped; the loop never dies on a
    /// bad frame.
    pub fn handle_event(&mut self, event: NetworkEvent, ui: &mut dyn UiSink, log: &mut dyn ChatLog) {
        match event {
            NetworkEvent::Connected => {
                tracing::info!(family = self.family.name(), "connected");
                self.login.connected();
            }
            NetworkEvent::Disconnected => {
                tracing::info!("disconnected");
                self.login.disconnected(&mut self.session);
                self.party.reset();
                self.guild.reset();
                self.trade.reset();
                self.skill.reset();
            }
            NetworkEvent::Message(opcode, payload) => {
                self.dispatch(opcode, &payload, ui, log);
            }
        }
    }

    fn dispatch(&mut self, opcode: u16, payload: &[u8], ui: &mut dyn UiSink, log: &mut dyn ChatLog) {
        let Some(handler) = self.dispatcher.lookup(opcode) else {
            tracing::debug!(
                opcode = format_args!("{opcode:#06x}"),
                len = payload.len(),
                "no handler for opcode, dropped"
            );
            return;
        };
        let mut cx = Context {
            session: &mut self.session,
            outbox: &self.outbox,
            ui,
            log,
        };
        let result: Result<(), DecodeError> = match handler {
            HandlerId::Login => self.login.handle(opcode, payload, &mut cx),
            HandlerId::Party => self.party.handle(opcode, payload, &mut cx),
            HandlerId::Guild => self.guild.handle(opcode, payload, &mut cx),
            HandlerId::Trade => self.trade.handle(opcode, payload, &mut cx),
            HandlerId::Skill => self.skill.handle(opcode, payload, &mut cx),
        };
        if let Err(error) = result {
            tracing::error!(
                opcode = format_args!("{opcode:#06x}"),
                len = payload.len(),
                %error,
                "failed to decode message, dropped"
            );
        }
    }

    // Thin operation facade; validation lives in the handlers.

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), ValidationError> {
        self.login.login(&mut self.session, &self.outbox, username, password)
    }

    pub fn register(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<(), ValidationError> {
        self.login
            .register(&mut self.session, &self.outbox, username, password, email)
    }

    pub fn select_world(&mut self, index: usize) -> Result<(), ValidationError> {
        self.login.select_world(&mut self.session, &self.outbox, index)
    }

    pub fn enter_world(&mut self) -> Result<(), ValidationError> {
        self.login.enter_world(&mut self.session, &self.outbox)
    }

    pub fn party_create(&mut self, name: &str) -> Result<(), ValidationError> {
        self.party.create(&self.outbox, name)
    }

    pub fn party_invite(&mut self, name: &str) -> Result<(), ValidationError> {
        self.party.invite(&self.outbox, name)
    }

    pub fn party_leave(&mut self) -> Result<(), ValidationError> {
        self.party.leave(&self.outbox)
    }

    pub fn party_kick(&mut self, name: &str) -> Result<(), ValidationError> {
        self.party.kick(&self.outbox, name)
    }

    pub fn party_chat(&mut self, text: &str) -> Result<(), ValidationError> {
        self.party.chat(&self.outbox, text)
    }

    pub fn party_share(
        &mut self,
        experience: PartyShare,
        items: PartyShare,
    ) -> Result<(), ValidationError> {
        self.party.change_share(&self.outbox, experience, items)
    }

    pub fn guild_create(&mut self, name: &str) -> Result<(), ValidationError> {
        self.guild.create(&self.outbox, name)
    }

    pub fn guild_invite(&mut self, name: &str) -> Result<(), ValidationError> {
        self.guild.invite(&self.outbox, name)
    }

    pub fn guild_leave(&mut self) -> Result<(), ValidationError> {
        self.guild.leave(&self.outbox)
    }

    pub fn guild_kick(&mut self, name: &str) -> Result<(), ValidationError> {
        self.guild.kick(&self.outbox, name)
    }

    pub fn guild_chat(&mut self, text: &str) -> Result<(), ValidationError> {
        self.guild.chat(&self.outbox, text)
    }

    pub fn guild_notice(&mut self, subject: &str, body: &str) -> Result<(), ValidationError> {
        self.guild.change_notice(&self.outbox, subject, body)
    }

    pub fn guild_share(
        &mut self,
        experience: GuildShare,
        items: GuildShare,
    ) -> Result<(), ValidationError> {
        self.guild.change_share(&self.outbox, experience, items)
    }

    pub fn trade_request(&mut self, name: &str) -> Result<(), ValidationError> {
        self.trade.request(&self.outbox, name)
    }

    pub fn trade_respond(&mut self, accept: bool) -> Result<(), ValidationError> {
        self.trade.respond(&self.outbox, accept)
    }

    pub fn trade_add_item(&mut self, item_id: u16, amount: u32) -> Result<(), ValidationError> {
        self.trade.add_item(&self.outbox, item_id, amount)
    }

    pub fn trade_confirm(&mut self) -> Result<(), ValidationError> {
        self.trade.confirm(&self.outbox)
    }

    pub fn trade_cancel(&mut self) -> Result<(), ValidationError> {
        self.trade.cancel(&self.outbox)
    }

    pub fn use_skill(&mut self, skill_id: u16, target_id: u32) -> Result<(), ValidationError> {
        self.skill.use_skill(&self.outbox, skill_id, target_id)
    }

    pub fn raise_skill(&mut self, skill_id: u16) -> Result<(), ValidationError> {
        self.skill.increase(&self.outbox, skill_id)
    }

    /// Settings changes relevant to the handlers are forwarded here.
    pub fn option_changed(&mut self, key: &str, value: &str) {
        self.party.option_changed(key, value);
    }
}
