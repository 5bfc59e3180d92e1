use packets::types::LoginFailure;

/// Raised by the socket task and drained by the dispatch loop, strictly in
/// arrival order.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    Connected,
    Disconnected,
    Message(u16, Vec<u8>),
}

/// Chat channel a line belongs to, for routing and history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    System,
    Party,
    Guild,
}

impl Channel {
    pub fn name(self) -> &'static str {
        match self {
            Channel::System => "system",
            Channel::Party => "party",
            Channel::Guild => "guild",
        }
    }
}

/// State changes the presentation layer should prompt or refresh for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LoginFailed(LoginFailure),
    WorldsAvailable(usize),
    ReadyToPlay,
    PartyInvite { from: String, party: String },
    PartyChanged,
    GuildInvite { from: String, guild: String },
    GuildChanged,
    TradeRequest { from: String },
    TradeUpdated,
    TradeClosed,
    SkillsChanged,
}

/// Presentation collaborator. Handlers report every user-visible state
/// change here and never render anything themselves.
pub trait UiSink {
    fn append_line(&mut self, channel: Channel, text: &str);
    fn notify(&mut self, event: Notice);
}

/// Persistent chat history collaborator. Best-effort: implementations
/// swallow their own I/O failures.
pub trait ChatLog {
    fn log(&mut self, channel: &str, line: &str);
}

/// No-op log sink for sessions without persistent history.
pub struct NullChatLog;

impl ChatLog for NullChatLog {
    fn log(&mut self, _channel: &str, _line: &str) {}
}
