use packets::DecodeError;
use packets::server::{PartyInviteAnswer, PartyLeaveReason};
use packets::types::PartyShare;

use crate::error::ValidationError;
use crate::events::{Channel, Notice};
use crate::handlers::Context;
use crate::network::PacketOutbox;

/// One roster entry. Avatar and level only exist on the extended fork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyMember {
    pub id: u32,
    pub name: String,
    pub map: String,
    pub is_leader: bool,
    pub is_online: bool,
    pub avatar_id: Option<u16>,
    pub level: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct Party {
    pub name: String,
    pub members: Vec<PartyMember>,
    pub share_experience: PartyShare,
    pub share_items: PartyShare,
}

/// Family-neutral party messages.
#[derive(Debug)]
pub enum PartyEvent {
    CreateResult {
        code: u8,
    },
    Invited {
        from_id: u32,
        from: String,
        party: String,
    },
    InviteResult {
        name: String,
        answer: PartyInviteAnswer,
    },
    Roster {
        name: String,
        members: Vec<PartyMember>,
    },
    MemberJoined(PartyMember),
    MemberLeft {
        id: u32,
        name: String,
        reason: PartyLeaveReason,
    },
    Chat {
        id: u32,
        text: String,
    },
    ShareUpdate {
        experience: PartyShare,
        items: Option<PartyShare>,
    },
}

/// Family-specific encode/decode for the party feature. Classic ignores
/// the item policy; the extended fork carries both.
pub trait PartyWire {
    fn decode(&self, opcode: u16, payload: &[u8]) -> Result<PartyEvent, DecodeError>;
    fn send_create(&self, out: &PacketOutbox, name: &str);
    fn send_invite(&self, out: &PacketOutbox, name: &str);
    fn send_leave(&self, out: &PacketOutbox);
    fn send_kick(&self, out: &PacketOutbox, id: u32, name: &str);
    fn send_chat(&self, out: &PacketOutbox, text: &str);
    fn send_share_change(&self, out: &PacketOutbox, experience: PartyShare, items: PartyShare);
}

pub struct PartyHandler {
    wire: Box<dyn PartyWire>,
    party: Option<Party>,
    show_online: bool,
}

impl PartyHandler {
    pub fn new(wire: Box<dyn PartyWire>) -> Self {
        Self {
            wire,
            party: None,
            show_online: true,
        }
    }

    pub fn party(&self) -> Option<&Party> {
        self.party.as_ref()
    }

    pub fn in_party(&self) -> bool {
        self.party.is_some()
    }

    /// Member names offered for chat tab-completion.
    pub fn auto_complete_list(&self) -> Vec<String> {
        self.party
            .as_ref()
            .map(|p| p.members.iter().map(|m| m.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Feature toggle callback; key space is owned by the settings layer.
    pub fn option_changed(&mut self, key: &str, value: &str) {
        if key == "party.show-online" {
            self.show_online = value == "true" || value == "1";
        }
    }

    /// Dropped between messages on disconnect; the party only exists again
    /// once the server confirms one.
    pub fn reset(&mut self) {
        self.party = None;
    }

    pub fn create(&mut self, out: &PacketOutbox, name: &str) -> Result<(), ValidationError> {
        if self.in_party() {
            return Err(ValidationError::AlreadyInParty);
        }
        if name.is_empty() {
            return Err(ValidationError::NameLength {
                len: 0,
                min: 1,
                max: packets::types::NAME_LEN - 1,
            });
        }
        self.wire.send_create(out, name);
        Ok(())
    }

    pub fn invite(&mut self, out: &PacketOutbox, name: &str) -> Result<(), ValidationError> {
        if !self.in_party() {
            return Err(ValidationError::NotInParty);
        }
        self.wire.send_invite(out, name);
        Ok(())
    }

    pub fn leave(&mut self, out: &PacketOutbox) -> Result<(), ValidationError> {
        if !self.in_party() {
            return Err(ValidationError::NotInParty);
        }
        self.wire.send_leave(out);
        Ok(())
    }

    pub fn kick(&mut self, out: &PacketOutbox, name: &str) -> Result<(), ValidationError> {
        let Some(party) = &self.party else {
            return Err(ValidationError::NotInParty);
        };
        let Some(member) = party.members.iter().find(|m| m.name == name) else {
            return Err(ValidationError::NoSuchPartyMember(name.to_string()));
        };
        self.wire.send_kick(out, member.id, name);
        Ok(())
    }

    pub fn chat(&mut self, out: &PacketOutbox, text: &str) -> Result<(), ValidationError> {
        if !self.in_party() {
            return Err(ValidationError::NotInParty);
        }
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if text.len() > packets::types::CHAT_LEN_MAX {
            return Err(ValidationError::MessageLength {
                len: text.len(),
                max: packets::types::CHAT_LEN_MAX,
            });
        }
        self.wire.send_chat(out, text);
        Ok(())
    }

    /// Requests a policy change; the authoritative state only changes when
    /// the server echoes it back.
    pub fn change_share(
        &mut self,
        out: &PacketOutbox,
        experience: PartyShare,
        items: PartyShare,
    ) -> Result<(), ValidationError> {
        if !self.in_party() {
            return Err(ValidationError::NotInParty);
        }
        self.wire.send_share_change(out, experience, items);
        Ok(())
    }

    fn member_name(&self, id: u32) -> String {
        self.party
            .as_ref()
            .and_then(|p| p.members.iter().find(|m| m.id == id))
            .map(|m| m.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
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

    fn apply(&mut self, event: PartyEvent, cx: &mut Context) {
        match event {
            PartyEvent::CreateResult { code } => {
                let text = match code {
                    0 => "Party created.",
                    1 => "That party name is already taken.",
                    2 => "You are already in a party.",
                    _ => "Could not create party.",
                };
                cx.ui.append_line(Channel::System, text);
            }
            PartyEvent::Invited {
                from_id,
                from,
                party,
            } => {
                tracing::debug!(from_id, %from, %party, "party invitation");
                cx.ui.append_line(
                    Channel::System,
                    &format!("{from} invites you to join party \"{party}\"."),
                );
                cx.ui.notify(Notice::PartyInvite { from, party });
            }
            PartyEvent::InviteResult { name, answer } => {
                let text = match answer {
                    PartyInviteAnswer::Accepted => format!("{name} joins your party."),
                    PartyInviteAnswer::Rejected => format!("{name} declined the invitation."),
                    PartyInviteAnswer::AlreadyInParty => {
                        format!("{name} is already in a party.")
                    }
                    PartyInviteAnswer::PartyFull => "The party is full.".to_string(),
                    PartyInviteAnswer::Unspecified => {
                        format!("Could not invite {name}.")
                    }
                };
                cx.ui.append_line(Channel::System, &text);
            }
            PartyEvent::Roster { name, members } => {
                let online = members.iter().filter(|m| m.is_online).count();
                let total = members.len();
                // A refresh of the same party keeps its share policy; a
                // different party starts unknown until the next ShareUpdate.
                let (share_experience, share_items) = match &self.party {
                    Some(p) if p.name == name => (p.share_experience, p.share_items),
                    _ => (PartyShare::Unspecified, PartyShare::Unspecified),
                };
                self.party = Some(Party {
                    name,
                    members,
                    share_experience,
                    share_items,
                });
                if self.show_online {
                    cx.ui.append_line(
                        Channel::Party,
                        &format!("Party roster: {total} member(s), {online} online."),
                    );
                }
                cx.ui.notify(Notice::PartyChanged);
            }
            PartyEvent::MemberJoined(member) => {
                let Some(party) = &mut self.party else {
                    tracing::debug!(name = %member.name, "member joined without a party, ignored");
                    return;
                };
                cx.ui
                    .append_line(Channel::Party, &format!("{} joined the party.", member.name));
                // A rejoin after a reconnect replaces the stale entry.
                party.members.retain(|m| m.id != member.id);
                party.members.push(member);
                cx.ui.notify(Notice::PartyChanged);
            }
            PartyEvent::MemberLeft { id, name, reason } => {
                let Some(party) = &mut self.party else {
                    tracing::debug!(%name, "member left without a party, ignored");
                    return;
                };
                party.members.retain(|m| m.id != id);
                let own = cx.session.token().is_some_and(|t| t.account_id == id);
                let text = match reason {
                    PartyLeaveReason::Kicked if own => "You were kicked from the party.".into(),
                    PartyLeaveReason::Kicked => format!("{name} was kicked from the party."),
                    PartyLeaveReason::Disbanded => "The party was disbanded.".into(),
                    _ if own => "You left the party.".into(),
                    _ => format!("{name} left the party."),
                };
                if own || reason == PartyLeaveReason::Disbanded {
                    self.party = None;
                }
                cx.ui.append_line(Channel::Party, &text);
                cx.ui.notify(Notice::PartyChanged);
            }
            PartyEvent::Chat { id, text } => {
                let line = format!("{}: {}", self.member_name(id), text);
                cx.ui.append_line(Channel::Party, &line);
                cx.log.log(Channel::Party.name(), &line);
            }
            PartyEvent::ShareUpdate { experience, items } => {
                let Some(party) = &mut self.party else {
                    tracing::debug!("share update without a party, ignored");
                    return;
                };
                if experience == PartyShare::Unspecified {
                    tracing::warn!("server sent an unrecognized experience share policy");
                }
                party.share_experience = experience;
                if let Some(items) = items {
                    party.share_items = items;
                }
                let text = match experience {
                    PartyShare::Shared => "Experience sharing enabled.",
                    PartyShare::Own => "Experience sharing: own kills only.",
                    PartyShare::None => "Experience sharing disabled.",
                    PartyShare::Unspecified => "Experience sharing changed.",
                };
                cx.ui.append_line(Channel::Party, text);
                cx.ui.notify(Notice::PartyChanged);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::doubles::{RecordingLog, RecordingSink};
    use crate::protocol::classic::ClassicWire;
    use crate::session::{Session, Token};

    fn member(id: u32, name: &str) -> PartyMember {
        PartyMember {
            id,
            name: name.into(),
            map: "hollow_vale".into(),
            is_leader: id == 1,
            is_online: true,
            avatar_id: None,
            level: None,
        }
    }

    struct Fixture {
        handler: PartyHandler,
        session: Session,
        out: PacketOutbox,
        ui: RecordingSink,
        log: RecordingLog,
    }

    impl Fixture {
        fn new() -> Self {
            let mut session = Session::default();
            session.set_token(Token {
                account_id: 1,
                session_id: 0,
                auth_key: 0,
            });
            Self {
                handler: PartyHandler::new(Box::new(ClassicWire)),
                session,
                out: PacketOutbox::default(),
                ui: RecordingSink::default(),
                log: RecordingLog::default(),
            }
        }

        fn apply(&mut self, event: PartyEvent) {
            let mut cx = Context {
                session: &mut self.session,
                outbox: &self.out,
                ui: &mut self.ui,
                log: &mut self.log,
            };
            self.handler.apply(event, &mut cx);
        }

        fn join(&mut self, members: Vec<PartyMember>) {
            self.apply(PartyEvent::Roster {
                name: "Ash Seekers".into(),
                members,
            });
        }
    }

    #[test]
    fn leave_requires_a_party() {
        let mut f = Fixture::new();
        assert_eq!(
            f.handler.leave(&f.out),
            Err(ValidationError::NotInParty)
        );
        assert!(f.out.is_empty());
    }

    #[test]
    fn member_leave_shrinks_roster_and_autocomplete() {
        let mut f = Fixture::new();
        f.join(vec![member(1, "Kes"), member(2, "Rel"), member(3, "Vane")]);
        assert_eq!(f.handler.auto_complete_list().len(), 3);

        f.apply(PartyEvent::MemberLeft {
            id: 2,
            name: "Rel".into(),
            reason: PartyLeaveReason::Left,
        });

        let party = f.handler.party().unwrap();
        assert_eq!(party.members.len(), 2);
        let completions = f.handler.auto_complete_list();
        assert_eq!(completions.len(), 2);
        assert!(!completions.contains(&"Rel".to_string()));
    }

    #[test]
    fn own_leave_destroys_the_party() {
        let mut f = Fixture::new();
        f.join(vec![member(1, "Kes"), member(2, "Rel")]);
        f.apply(PartyEvent::MemberLeft {
            id: 1,
            name: "Kes".into(),
            reason: PartyLeaveReason::Left,
        });
        assert!(!f.handler.in_party());
        assert!(f.handler.auto_complete_list().is_empty());
    }

    #[test]
    fn kick_of_unknown_member_is_rejected_locally() {
        let mut f = Fixture::new();
        f.join(vec![member(1, "Kes")]);
        assert_eq!(
            f.handler.kick(&f.out, "Nobody"),
            Err(ValidationError::NoSuchPartyMember("Nobody".into()))
        );
        assert!(f.out.is_empty());
        assert!(f.handler.kick(&f.out, "Kes").is_ok());
        assert_eq!(f.out.drain().len(), 1);
    }

    #[test]
    fn chat_lines_reach_sink_and_history() {
        let mut f = Fixture::new();
        f.join(vec![member(1, "Kes"), member(2, "Rel")]);
        f.apply(PartyEvent::Chat {
            id: 2,
            text: "pull in 3".into(),
        });
        assert!(
            f.ui.lines
                .iter()
                .any(|(c, l)| *c == Channel::Party && l == "Rel: pull in 3")
        );
        assert_eq!(f.log.entries.last().unwrap().0, "party");
    }

    #[test]
    fn overlong_chat_line_is_rejected_locally() {
        let mut f = Fixture::new();
        f.join(vec![member(1, "Kes")]);
        let long = "a".repeat(packets::types::CHAT_LEN_MAX + 1);
        assert_eq!(
            f.handler.chat(&f.out, &long),
            Err(ValidationError::MessageLength {
                len: long.len(),
                max: packets::types::CHAT_LEN_MAX,
            })
        );
        assert!(f.out.is_empty());
        let longest = "a".repeat(packets::types::CHAT_LEN_MAX);
        assert!(f.handler.chat(&f.out, &longest).is_ok());
        assert_eq!(f.out.drain().len(), 1);
    }

    #[test]
    fn show_online_option_suppresses_the_roster_line() {
        let mut f = Fixture::new();
        f.handler.option_changed("party.show-online", "false");
        f.join(vec![member(1, "Kes"), member(2, "Rel")]);
        assert!(!f.ui.lines.iter().any(|(_, l)| l.starts_with("Party roster")));
        assert!(f.ui.notices.iter().any(|n| matches!(n, Notice::PartyChanged)));

        f.handler.option_changed("party.show-online", "true");
        f.join(vec![member(1, "Kes"), member(2, "Rel")]);
        assert!(f.ui.lines.iter().any(|(c, l)| {
            *c == Channel::Party && l == "Party roster: 2 member(s), 2 online."
        }));
    }

    #[test]
    fn roster_for_a_different_party_drops_the_stale_share_policy() {
        let mut f = Fixture::new();
        f.join(vec![member(1, "Kes"), member(2, "Rel")]);
        f.apply(PartyEvent::ShareUpdate {
            experience: PartyShare::Shared,
            items: None,
        });
        assert_eq!(
            f.handler.party().unwrap().share_experience,
            PartyShare::Shared
        );

        // Same party refreshed: policy survives.
        f.join(vec![member(1, "Kes"), member(2, "Rel"), member(3, "Vane")]);
        assert_eq!(
            f.handler.party().unwrap().share_experience,
            PartyShare::Shared
        );

        // A different party: policy is unknown again.
        f.apply(PartyEvent::Roster {
            name: "Cinder Watch".into(),
            members: vec![member(4, "Orin")],
        });
        assert_eq!(
            f.handler.party().unwrap().share_experience,
            PartyShare::Unspecified
        );
    }

    #[test]
    fn unknown_share_policy_is_kept_as_unspecified() {
        let mut f = Fixture::new();
        f.join(vec![member(1, "Kes")]);
        f.apply(PartyEvent::ShareUpdate {
            experience: PartyShare::from(9u16),
            items: None,
        });
        assert_eq!(
            f.handler.party().unwrap().share_experience,
            PartyShare::Unspecified
        );
    }

    #[test]
    fn roster_from_wire_bytes_via_classic_layout() {
        use packets::types::{MAP_LEN, NAME_LEN};
        let mut f = Fixture::new();

        let mut payload = b"Ash Seekers".to_vec();
        payload.resize(NAME_LEN, 0);
        for (id, name) in [(1u32, "Kes"), (2, "Rel")] {
            payload.extend_from_slice(&id.to_le_bytes());
            let mut n = name.as_bytes().to_vec();
            n.resize(NAME_LEN, 0);
            payload.extend_from_slice(&n);
            payload.extend_from_slice(&[0u8; MAP_LEN]);
            payload.push(u8::from(id == 1));
            payload.push(1);
        }

        let mut cx = Context {
            session: &mut f.session,
            outbox: &f.out,
            ui: &mut f.ui,
            log: &mut f.log,
        };
        f.handler
            .handle(
                u16::from(packets::classic::Codes::PartyInfo),
                &payload,
                &mut cx,
            )
            .unwrap();
        let party = f.handler.party().unwrap();
        assert_eq!(party.name, "Ash Seekers");
        assert_eq!(party.members.len(), 2);
        assert!(party.members[0].avatar_id.is_none());
    }
}
