use packets::DecodeError;
use packets::server::WorldInfo;
use packets::types::LoginFailure;

use crate::error::ValidationError;
use crate::events::{Channel, Notice};
use crate::handlers::Context;
use crate::network::PacketOutbox;
use crate::session::{Session, Token};

/// Account name and password bounds, enforced client-side before any
/// network effect.
pub const MIN_NAME_LEN: usize = 4;
pub const MAX_NAME_LEN: usize = 23;

/// Family-neutral login messages; each wire decodes its own layouts into
/// these.
#[derive(Debug)]
pub enum LoginEvent {
    Hello {
        protocol_version: u32,
        registration_enabled: bool,
    },
    Accepted {
        token: Token,
        avatar_id: Option<u16>,
        update_host: Option<String>,
    },
    Rejected {
        reason: LoginFailure,
        detail: String,
    },
    Worlds(Vec<WorldInfo>),
    CharServerReady {
        slots: u8,
    },
}

/// Family-specific encode/decode for the login feature.
pub trait LoginWire {
    fn decode(&self, opcode: u16, payload: &[u8]) -> Result<LoginEvent, DecodeError>;
    fn send_login(&self, out: &PacketOutbox, username: &str, password: &str);
    fn send_register(&self, out: &PacketOutbox, username: &str, password: &str, email: &str);
    fn send_select_world(&self, out: &PacketOutbox, index: u8);
    fn send_enter_world(&self, out: &PacketOutbox, token: &Token);
}

/// Where the login conversation stands. Each state accepts only specific
/// messages; anything else is logged and ignored so retransmissions can
/// never wedge the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Disconnected,
    Connecting,
    AwaitingLoginReply,
    AwaitingWorlds,
    WorldSelected,
    AwaitingCharServer,
    Ready,
    Failed,
}

pub struct LoginHandler {
    wire: Box<dyn LoginWire>,
    state: LoginState,
    last_failure: Option<LoginFailure>,
}

impl LoginHandler {
    pub fn new(wire: Box<dyn LoginWire>) -> Self {
        Self {
            wire,
            state: LoginState::Disconnected,
            last_failure: None,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    pub fn last_failure(&self) -> Option<LoginFailure> {
        self.last_failure
    }

    pub fn connected(&mut self) {
        self.state = LoginState::Connecting;
        self.last_failure = None;
    }

    pub fn disconnected(&mut self, session: &mut Session) {
        self.state = LoginState::Disconnected;
        session.invalidate_token();
    }

    fn check_name(name: &str) -> Result<(), ValidationError> {
        let len = name.chars().count();
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
            return Err(ValidationError::NameLength {
                len,
                min: MIN_NAME_LEN,
                max: MAX_NAME_LEN,
            });
        }
        Ok(())
    }

    fn check_password(password: &str) -> Result<(), ValidationError> {
        let len = password.chars().count();
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
            return Err(ValidationError::PasswordLength {
                len,
                min: MIN_NAME_LEN,
                max: MAX_NAME_LEN,
            });
        }
        Ok(())
    }

    fn check_credentials(&self, username: &str, password: &str) -> Result<(), ValidationError> {
        match self.state {
            LoginState::Disconnected => return Err(ValidationError::NotConnected),
            LoginState::AwaitingLoginReply => return Err(ValidationError::LoginInProgress),
            _ => {}
        }
        Self::check_name(username)?;
        Self::check_password(password)
    }

    /// Sends credentials. Any previous token and world list are discarded
    /// first; a failed earlier attempt does not block a retry.
    pub fn login(
        &mut self,
        session: &mut Session,
        out: &PacketOutbox,
        username: &str,
        password: &str,
    ) -> Result<(), ValidationError> {
        self.check_credentials(username, password)?;
        session.invalidate_token();
        session.clear_worlds();
        session.character_name = Some(username.to_string());
        self.wire.send_login(out, username, password);
        self.state = LoginState::AwaitingLoginReply;
        Ok(())
    }

    /// New-account registration. Shares the credential bounds with login
    /// and additionally requires the server to have registration open.
    pub fn register(
        &mut self,
        session: &mut Session,
        out: &PacketOutbox,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<(), ValidationError> {
        self.check_credentials(username, password)?;
        if !session.registration_enabled {
            return Err(ValidationError::RegistrationDisabled);
        }
        session.invalidate_token();
        session.clear_worlds();
        self.wire.send_register(out, username, password, email);
        self.state = LoginState::AwaitingLoginReply;
        Ok(())
    }

    pub fn select_world(
        &mut self,
        session: &mut Session,
        out: &PacketOutbox,
        index: usize,
    ) -> Result<(), ValidationError> {
        if self.state != LoginState::AwaitingWorlds {
            return Err(ValidationError::NotConnected);
        }
        if session.select_world(index).is_none() {
            return Err(ValidationError::NoSuchWorld(index));
        }
        self.wire.send_select_world(out, index as u8);
        self.state = LoginState::WorldSelected;
        Ok(())
    }

    /// Presents the token to the selected world's character server. Called
    /// by the connection manager once that connection stands.
    pub fn enter_world(
        &mut self,
        session: &mut Session,
        out: &PacketOutbox,
    ) -> Result<(), ValidationError> {
        if self.state != LoginState::WorldSelected {
            return Err(ValidationError::NotConnected);
        }
        let Some(token) = session.token() else {
            return Err(ValidationError::NotConnected);
        };
        self.wire.send_enter_world(out, token);
        self.state = LoginState::AwaitingCharServer;
        Ok(())
    }

    pub fn handle(
        &mut self,
        opcode: u16,
        payload: &[u8],
        cx: &mut Context,
    ) -> Result<(), DecodeError> {
        let event = self.wire.decode(opcode, payload)?;
        self.apply(event, cx);
        Ok(())
    }

    fn ignore(&self, event: &LoginEvent) {
        tracing::debug!(state = ?self.state, ?event, "login message ignored in this state");
    }

    fn apply(&mut self, event: LoginEvent, cx: &mut Context) {
        match event {
            LoginEvent::Hello {
                protocol_version,
                registration_enabled,
            } => {
                if self.state != LoginState::Connecting {
                    return self.ignore(&LoginEvent::Hello {
                        protocol_version,
                        registration_enabled,
                    });
                }
                cx.session.protocol_version = protocol_version;
                cx.session.registration_enabled = registration_enabled;
            }
            LoginEvent::Accepted {
                token,
                avatar_id,
                update_host,
            } => {
                if self.state != LoginState::AwaitingLoginReply {
                    return self.ignore(&LoginEvent::Accepted {
                        token,
                        avatar_id,
                        update_host,
                    });
                }
                if let Some(host) = &update_host {
                    tracing::info!(%host, "server advertises update host");
                }
                cx.session.set_token(token);
                self.state = LoginState::AwaitingWorlds;
                cx.ui.append_line(Channel::System, "Authentication successful.");
            }
            LoginEvent::Rejected { reason, detail } => {
                // Accepted in both waiting states: a server may reject
                // late (e.g. a ban landing after the world list went
                // out). The world list is left as-is.
                if !matches!(
                    self.state,
                    LoginState::AwaitingLoginReply | LoginState::AwaitingWorlds
                ) {
                    return self.ignore(&LoginEvent::Rejected { reason, detail });
                }
                cx.session.invalidate_token();
                self.state = LoginState::Failed;
                self.last_failure = Some(reason);
                let text = if detail.is_empty() {
                    reason.message().to_string()
                } else {
                    format!("{}: {}", reason.message(), detail)
                };
                cx.ui.append_line(Channel::System, &text);
                cx.ui.notify(Notice::LoginFailed(reason));
            }
            LoginEvent::Worlds(worlds) => {
                if self.state != LoginState::AwaitingWorlds {
                    return self.ignore(&LoginEvent::Worlds(worlds));
                }
                let count = worlds.len();
                cx.session.set_worlds(worlds);
                cx.ui.notify(Notice::WorldsAvailable(count));
            }
            LoginEvent::CharServerReady { slots } => {
                if self.state != LoginState::AwaitingCharServer {
                    return self.ignore(&LoginEvent::CharServerReady { slots });
                }
                tracing::info!(slots, "character server ready");
                self.state = LoginState::Ready;
                cx.ui.notify(Notice::ReadyToPlay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::doubles::{RecordingLog, RecordingSink};
    use crate::protocol::classic::ClassicWire;

    fn handler() -> (LoginHandler, Session, PacketOutbox) {
        let mut h = LoginHandler::new(Box::new(ClassicWire));
        h.connected();
        (h, Session::default(), PacketOutbox::default())
    }

    fn cx<'a>(
        session: &'a mut Session,
        out: &'a PacketOutbox,
        ui: &'a mut RecordingSink,
        log: &'a mut RecordingLog,
    ) -> Context<'a> {
        Context {
            session,
            outbox: out,
            ui,
            log,
        }
    }

    fn token() -> Token {
        Token {
            account_id: 11,
            session_id: 22,
            auth_key: 33,
        }
    }

    #[test]
    fn short_username_is_rejected_with_no_output() {
        let (mut h, mut session, out) = handler();
        let err = h.login(&mut session, &out, "kes", "hunter22");
        assert_eq!(
            err,
            Err(ValidationError::NameLength {
                len: 3,
                min: 4,
                max: 23
            })
        );
        assert!(out.is_empty());
        assert_eq!(h.state(), LoginState::Connecting);
    }

    #[test]
    fn valid_login_emits_one_frame_and_advances() {
        let (mut h, mut session, out) = handler();
        h.login(&mut session, &out, "kestrel", "hunter22").unwrap();
        assert_eq!(out.drain().len(), 1);
        assert_eq!(h.state(), LoginState::AwaitingLoginReply);
    }

    #[test]
    fn short_register_name_is_rejected_with_no_output() {
        let (mut h, mut session, out) = handler();
        session.registration_enabled = true;
        assert_eq!(
            h.register(&mut session, &out, "kes", "hunter22", "k@ash.io"),
            Err(ValidationError::NameLength {
                len: 3,
                min: 4,
                max: 23
            })
        );
        assert!(out.is_empty());
    }

    #[test]
    fn valid_register_emits_exactly_one_frame() {
        let (mut h, mut session, out) = handler();
        session.registration_enabled = true;
        h.register(&mut session, &out, "kestrelfive", "hunter22", "k@ash.io")
            .unwrap();
        let frames = out.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(
            &frames[0][..2],
            &u16::from(packets::classic::Codes::Register).to_le_bytes()
        );
    }

    #[test]
    fn registration_requires_server_flag() {
        let (mut h, mut session, out) = handler();
        session.registration_enabled = false;
        assert_eq!(
            h.register(&mut session, &out, "kestrel", "hunter22", "k@ash.io"),
            Err(ValidationError::RegistrationDisabled)
        );
        assert!(out.is_empty());
    }

    #[test]
    fn rejection_during_awaiting_worlds_fails_without_touching_worlds() {
        let (mut h, mut session, out) = handler();
        let (mut ui, mut log) = (RecordingSink::default(), RecordingLog::default());

        h.login(&mut session, &out, "kestrel", "hunter22").unwrap();
        {
            let mut c = cx(&mut session, &out, &mut ui, &mut log);
            h.apply(
                LoginEvent::Accepted {
                    token: token(),
                    avatar_id: None,
                    update_host: None,
                },
                &mut c,
            );
            h.apply(
                LoginEvent::Worlds(vec![packets::server::WorldInfo {
                    host: "10.0.0.1".into(),
                    port: 6901,
                    name: "Ashfall".into(),
                    online_count: 5,
                }]),
                &mut c,
            );
            assert_eq!(h.state, LoginState::AwaitingWorlds);
            h.apply(
                LoginEvent::Rejected {
                    reason: LoginFailure::Banned,
                    detail: String::new(),
                },
                &mut c,
            );
        }
        assert_eq!(h.state(), LoginState::Failed);
        assert_eq!(h.last_failure(), Some(LoginFailure::Banned));
        assert!(session.token().is_none());
        // The world list survives the error transition.
        assert_eq!(session.worlds().len(), 1);
        assert!(ui.notices.contains(&Notice::LoginFailed(LoginFailure::Banned)));
    }

    #[test]
    fn out_of_state_world_list_is_ignored() {
        let (mut h, mut session, out) = handler();
        let (mut ui, mut log) = (RecordingSink::default(), RecordingLog::default());
        let mut c = cx(&mut session, &out, &mut ui, &mut log);
        h.apply(
            LoginEvent::Worlds(vec![]),
            &mut c,
        );
        assert_eq!(h.state(), LoginState::Connecting);
        assert!(ui.notices.is_empty());
    }

    #[test]
    fn full_happy_path_reaches_ready() {
        let (mut h, mut session, out) = handler();
        let (mut ui, mut log) = (RecordingSink::default(), RecordingLog::default());

        h.login(&mut session, &out, "kestrel", "hunter22").unwrap();
        {
            let mut c = cx(&mut session, &out, &mut ui, &mut log);
            h.apply(
                LoginEvent::Accepted {
                    token: token(),
                    avatar_id: None,
                    update_host: None,
                },
                &mut c,
            );
            h.apply(
                LoginEvent::Worlds(vec![packets::server::WorldInfo {
                    host: "10.0.0.1".into(),
                    port: 6901,
                    name: "Ashfall".into(),
                    online_count: 5,
                }]),
                &mut c,
            );
        }
        h.select_world(&mut session, &out, 0).unwrap();
        assert_eq!(h.state(), LoginState::WorldSelected);
        h.enter_world(&mut session, &out).unwrap();
        assert_eq!(h.state(), LoginState::AwaitingCharServer);
        {
            let mut c = cx(&mut session, &out, &mut ui, &mut log);
            h.apply(LoginEvent::CharServerReady { slots: 3 }, &mut c);
        }
        assert_eq!(h.state(), LoginState::Ready);
        assert!(ui.notices.contains(&Notice::ReadyToPlay));
        // login + select + enter
        assert_eq!(out.drain().len(), 3);
    }

    #[test]
    fn decodes_rejection_from_wire_bytes() {
        let (mut h, mut session, out) = handler();
        let (mut ui, mut log) = (RecordingSink::default(), RecordingLog::default());
        h.login(&mut session, &out, "kestrel", "hunter22").unwrap();

        let mut payload = vec![1u8]; // wrong password
        payload.resize(21, 0);
        let mut c = cx(&mut session, &out, &mut ui, &mut log);
        h.handle(
            u16::from(packets::classic::Codes::LoginError),
            &payload,
            &mut c,
        )
        .unwrap();
        assert_eq!(h.state(), LoginState::Failed);
        assert_eq!(h.last_failure(), Some(LoginFailure::WrongPassword));
    }
}
