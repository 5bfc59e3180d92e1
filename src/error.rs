use thiserror::Error;

/// Client-side precondition failure, surfaced to the caller before any
/// bytes hit the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be {min} to {max} characters (got {len})")]
    NameLength { len: usize, min: usize, max: usize },

    #[error("password must be {min} to {max} characters (got {len})")]
    PasswordLength { len: usize, min: usize, max: usize },

    #[error("registration is disabled on this server")]
    RegistrationDisabled,

    #[error("a login attempt is already in progress")]
    LoginInProgress,

    #[error("not connected to a server")]
    NotConnected,

    #[error("no such world index {0}")]
    NoSuchWorld(usize),

    #[error("not in a party")]
    NotInParty,

    #[error("already in a party")]
    AlreadyInParty,

    #[error("not in a guild")]
    NotInGuild,

    #[error("already in a guild")]
    AlreadyInGuild,

    #[error("message is empty")]
    EmptyMessage,

    #[error("message must be at most {max} bytes (got {len})")]
    MessageLength { len: usize, max: usize },

    #[error("{0} is not in the party")]
    NoSuchPartyMember(String),

    #[error("{0} is not in the guild")]
    NoSuchGuildMember(String),

    #[error("no trade in progress")]
    NoActiveTrade,

    #[error("a trade is already in progress")]
    TradeInProgress,

    #[error("unknown skill {0}")]
    UnknownSkill(u16),

    #[error("skill {0} cannot be raised further")]
    SkillNotRaisable(u16),

    #[error("no skill points available")]
    NoSkillPoints,
}
