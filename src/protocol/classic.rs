//! Wire implementation for the classic Ashfall server family.

use packets::classic::{Codes, packet_len};
use packets::server::{
    CharServerAck, GuildChatMsg, GuildCreateResult, GuildInfo, GuildInviteResult, GuildInvited,
    GuildLeft, GuildMemberInfo, GuildMemberList, GuildNotice, GuildShareUpdate, LoginError,
    LoginOk, PartyChatMsg, PartyCreateResult, PartyInfo, PartyInviteResult, PartyInvited,
    PartyLeft, PartyMemberInfo, PartyMemberJoined, PartyShareUpdate, ServerHello, SkillFailed,
    SkillInfo, SkillList, SkillPointsUpdate, SkillUpdate, TradeCancelled, TradeCompleted,
    TradeConfirmed, TradeItemAdded, TradeRequested, TradeResponse, WorldList,
};
use packets::types::{GuildShare, PartyShare};
use packets::{DecodeError, ToBytes, TryFromBytes, client};

use crate::dispatch::{Dispatcher, HandlerId};
use crate::handlers::guild::{GuildEvent, GuildMember, GuildWire};
use crate::handlers::login::{LoginEvent, LoginWire};
use crate::handlers::party::{PartyEvent, PartyMember, PartyWire};
use crate::handlers::skill::{SkillEvent, SkillWire};
use crate::handlers::trade::{TradeEvent, TradeItem, TradeWire};
use crate::network::PacketOutbox;
use crate::protocol::CLIENT_VERSION;
use crate::session::Token;

/// Speaks the original server protocol. Stateless; one instance per
/// handler.
pub struct ClassicWire;

fn send<T: ToBytes>(out: &PacketOutbox, code: Codes, msg: &T) {
    out.send(code.into(), packet_len(code), msg);
}

fn code_for(opcode: u16) -> Result<Codes, DecodeError> {
    Codes::try_from(opcode).map_err(|_| DecodeError::UnknownOpcode(opcode))
}

pub(super) fn party_member(m: PartyMemberInfo) -> PartyMember {
    PartyMember {
        id: m.account_id,
        name: m.name,
        map: m.map,
        is_leader: m.is_leader,
        is_online: m.is_online,
        avatar_id: None,
        level: None,
    }
}

pub(super) fn guild_member(m: GuildMemberInfo) -> GuildMember {
    GuildMember {
        id: m.account_id,
        name: m.name,
        position: m.position,
        is_online: m.is_online,
        avatar_id: m.avatar_id,
        level: m.level,
    }
}

/// Routes every inbound classic opcode to its feature handler.
pub fn register(dispatcher: &mut Dispatcher) {
    use HandlerId::{Guild, Login, Party, Skill, Trade};
    for (code, handler) in [
        (Codes::ServerHello, Login),
        (Codes::LoginOk, Login),
        (Codes::LoginError, Login),
        (Codes::WorldList, Login),
        (Codes::CharServerAck, Login),
        (Codes::PartyCreateResult, Party),
        (Codes::PartyInfo, Party),
        (Codes::PartyInviteResult, Party),
        (Codes::PartyInvited, Party),
        (Codes::PartyShareUpdate, Party),
        (Codes::PartyMemberJoined, Party),
        (Codes::PartyLeft, Party),
        (Codes::PartyChatMsg, Party),
        (Codes::GuildCreateResult, Guild),
        (Codes::GuildInfo, Guild),
        (Codes::GuildInviteResult, Guild),
        (Codes::GuildInvited, Guild),
        (Codes::GuildMemberList, Guild),
        (Codes::GuildLeft, Guild),
        (Codes::GuildChatMsg, Guild),
        (Codes::GuildNotice, Guild),
        (Codes::GuildShareUpdate, Guild),
        (Codes::TradeRequested, Trade),
        (Codes::TradeResponse, Trade),
        (Codes::TradeItemAdded, Trade),
        (Codes::TradeConfirmed, Trade),
        (Codes::TradeCancelled, Trade),
        (Codes::TradeCompleted, Trade),
        (Codes::SkillPointsUpdate, Skill),
        (Codes::SkillUpdate, Skill),
        (Codes::SkillList, Skill),
        (Codes::SkillFailed, Skill),
    ] {
        dispatcher.register(code.into(), handler);
    }
}

impl LoginWire for ClassicWire {
    fn decode(&self, opcode: u16, payload: &[u8]) -> Result<LoginEvent, DecodeError> {
        match code_for(opcode)? {
            Codes::ServerHello => {
                let hello = ServerHello::try_from_bytes(payload)?;
                Ok(LoginEvent::Hello {
                    protocol_version: hello.protocol_version,
                    registration_enabled: hello.registration_enabled,
                })
            }
            Codes::LoginOk => {
                let ok = LoginOk::try_from_bytes(payload)?;
                Ok(LoginEvent::Accepted {
                    token: Token {
                        account_id: ok.account_id,
                        session_id: ok.session_id,
                        auth_key: ok.auth_key,
                    },
                    avatar_id: None,
                    update_host: None,
                })
            }
            Codes::LoginError => {
                let err = LoginError::try_from_bytes(payload)?;
                Ok(LoginEvent::Rejected {
                    reason: err.reason,
                    detail: err.detail,
                })
            }
            Codes::WorldList => {
                let list = WorldList::try_from_bytes(payload)?;
                Ok(LoginEvent::Worlds(list.worlds))
            }
            Codes::CharServerAck => {
                let ack = CharServerAck::try_from_bytes(payload)?;
                Ok(LoginEvent::CharServerReady { slots: ack.slots })
            }
            _ => Err(DecodeError::UnknownOpcode(opcode)),
        }
    }

    fn send_login(&self, out: &PacketOutbox, username: &str, password: &str) {
        send(
            out,
            Codes::Login,
            &client::Login {
                client_version: CLIENT_VERSION,
                username: username.to_string(),
                password: password.to_string(),
                flags: 0,
            },
        );
    }

    fn send_register(&self, out: &PacketOutbox, username: &str, password: &str, email: &str) {
        send(
            out,
            Codes::Register,
            &client::Register {
                username: username.to_string(),
                password: password.to_string(),
                email: email.to_string(),
            },
        );
    }

    fn send_select_world(&self, out: &PacketOutbox, index: u8) {
        send(out, Codes::SelectWorld, &client::SelectWorld { index });
    }

    fn send_enter_world(&self, out: &PacketOutbox, token: &Token) {
        send(
            out,
            Codes::EnterWorld,
            &client::EnterWorld {
                account_id: token.account_id,
                session_id: token.session_id,
                auth_key: token.auth_key,
            },
        );
    }
}

impl PartyWire for ClassicWire {
    fn decode(&self, opcode: u16, payload: &[u8]) -> Result<PartyEvent, DecodeError> {
        match code_for(opcode)? {
            Codes::PartyCreateResult => {
                let result = PartyCreateResult::try_from_bytes(payload)?;
                Ok(PartyEvent::CreateResult { code: result.code })
            }
            Codes::PartyInvited => {
                let invite = PartyInvited::try_from_bytes(payload)?;
                Ok(PartyEvent::Invited {
                    from_id: invite.from_id,
                    from: invite.from_name,
                    party: invite.party_name,
                })
            }
            Codes::PartyInviteResult => {
                let result = PartyInviteResult::try_from_bytes(payload)?;
                Ok(PartyEvent::InviteResult {
                    name: result.name,
                    answer: result.answer,
                })
            }
            Codes::PartyInfo => {
                let info = PartyInfo::try_from_bytes(payload)?;
                Ok(PartyEvent::Roster {
                    name: info.party_name,
                    members: info.members.into_iter().map(party_member).collect(),
                })
            }
            Codes::PartyMemberJoined => {
                let joined = PartyMemberJoined::try_from_bytes(payload)?;
                Ok(PartyEvent::MemberJoined(party_member(joined.member)))
            }
            Codes::PartyLeft => {
                let left = PartyLeft::try_from_bytes(payload)?;
                Ok(PartyEvent::MemberLeft {
                    id: left.account_id,
                    name: left.name,
                    reason: left.reason,
                })
            }
            Codes::PartyChatMsg => {
                let msg = PartyChatMsg::try_from_bytes(payload)?;
                Ok(PartyEvent::Chat {
                    id: msg.account_id,
                    text: msg.text,
                })
            }
            Codes::PartyShareUpdate => {
                let update = PartyShareUpdate::try_from_bytes(payload)?;
                Ok(PartyEvent::ShareUpdate {
                    experience: update.experience,
                    items: None,
                })
            }
            _ => Err(DecodeError::UnknownOpcode(opcode)),
        }
    }

    fn send_create(&self, out: &PacketOutbox, name: &str) {
        send(
            out,
            Codes::PartyCreate,
            &client::PartyCreate {
                name: name.to_string(),
            },
        );
    }

    fn send_invite(&self, out: &PacketOutbox, name: &str) {
        send(
            out,
            Codes::PartyInvite,
            &client::PartyInvite {
                name: name.to_string(),
            },
        );
    }

    fn send_leave(&self, out: &PacketOutbox) {
        send(out, Codes::PartyLeave, &client::PartyLeave);
    }

    fn send_kick(&self, out: &PacketOutbox, id: u32, name: &str) {
        send(
            out,
            Codes::PartyKick,
            &client::PartyKick {
                account_id: id,
                name: name.to_string(),
            },
        );
    }

    fn send_chat(&self, out: &PacketOutbox, text: &str) {
        send(
            out,
            Codes::PartyChat,
            &client::PartyChat {
                text: text.to_string(),
            },
        );
    }

    fn send_share_change(&self, out: &PacketOutbox, experience: PartyShare, items: PartyShare) {
        // Classic servers have no item policy; the request carries only
        // the experience half.
        if items != PartyShare::Unspecified {
            tracing::debug!(?items, "item share policy not supported by this family");
        }
        send(out, Codes::PartyShareChange, &client::PartyShareChange { experience });
    }
}

impl GuildWire for ClassicWire {
    fn decode(&self, opcode: u16, payload: &[u8]) -> Result<GuildEvent, DecodeError> {
        match code_for(opcode)? {
            Codes::GuildCreateResult => {
                let result = GuildCreateResult::try_from_bytes(payload)?;
                Ok(GuildEvent::CreateResult { code: result.code })
            }
            Codes::GuildInfo => {
                let info = GuildInfo::try_from_bytes(payload)?;
                Ok(GuildEvent::Info {
                    id: info.guild_id,
                    name: info.name,
                    master: info.master,
                    member_count: info.member_count,
                    max_members: info.max_members,
                })
            }
            Codes::GuildInvited => {
                let invite = GuildInvited::try_from_bytes(payload)?;
                Ok(GuildEvent::Invited {
                    guild_id: invite.guild_id,
                    from: invite.from_name,
                    guild: invite.guild_name,
                })
            }
            Codes::GuildInviteResult => {
                let result = GuildInviteResult::try_from_bytes(payload)?;
                Ok(GuildEvent::InviteResult {
                    name: result.name,
                    answer: result.answer,
                })
            }
            Codes::GuildMemberList => {
                let list = GuildMemberList::try_from_bytes(payload)?;
                Ok(GuildEvent::Roster(
                    list.members.into_iter().map(guild_member).collect(),
                ))
            }
            Codes::GuildLeft => {
                let left = GuildLeft::try_from_bytes(payload)?;
                Ok(GuildEvent::Left {
                    name: left.name,
                    reason: left.reason,
                })
            }
            Codes::GuildChatMsg => {
                let msg = GuildChatMsg::try_from_bytes(payload)?;
                Ok(GuildEvent::Chat {
                    id: msg.account_id,
                    text: msg.text,
                })
            }
            Codes::GuildNotice => {
                let notice = GuildNotice::try_from_bytes(payload)?;
                Ok(GuildEvent::Notice {
                    subject: notice.subject,
                    body: notice.body,
                })
            }
            Codes::GuildShareUpdate => {
                let update = GuildShareUpdate::try_from_bytes(payload)?;
                Ok(GuildEvent::ShareUpdate {
                    experience: update.experience,
                    items: None,
                })
            }
            _ => Err(DecodeError::UnknownOpcode(opcode)),
        }
    }

    fn send_create(&self, out: &PacketOutbox, name: &str) {
        send(
            out,
            Codes::GuildCreate,
            &client::GuildCreate {
                name: name.to_string(),
            },
        );
    }

    fn send_invite(&self, out: &PacketOutbox, name: &str) {
        send(
            out,
            Codes::GuildInvite,
            &client::GuildInvite {
                name: name.to_string(),
            },
        );
    }

    fn send_leave(&self, out: &PacketOutbox) {
        send(out, Codes::GuildLeave, &client::GuildLeave);
    }

    fn send_kick(&self, out: &PacketOutbox, id: u32, name: &str) {
        send(
            out,
            Codes::GuildKick,
            &client::GuildKick {
                account_id: id,
                name: name.to_string(),
            },
        );
    }

    fn send_chat(&self, out: &PacketOutbox, text: &str) {
        send(
            out,
            Codes::GuildChat,
            &client::GuildChat {
                text: text.to_string(),
            },
        );
    }

    fn send_notice_change(&self, out: &PacketOutbox, subject: &str, body: &str) {
        send(
            out,
            Codes::GuildNoticeChange,
            &client::GuildNoticeChange {
                subject: subject.to_string(),
                body: body.to_string(),
            },
        );
    }

    fn send_share_change(&self, out: &PacketOutbox, experience: GuildShare, items: GuildShare) {
        if items != GuildShare::Unspecified {
            tracing::debug!(?items, "item share policy not supported by this family");
        }
        send(out, Codes::GuildShareChange, &client::GuildShareChange { experience });
    }
}

impl TradeWire for ClassicWire {
    fn decode(&self, opcode: u16, payload: &[u8]) -> Result<TradeEvent, DecodeError> {
        match code_for(opcode)? {
            Codes::TradeRequested => {
                let req = TradeRequested::try_from_bytes(payload)?;
                Ok(TradeEvent::Requested {
                    from: req.from_name,
                })
            }
            Codes::TradeResponse => {
                let resp = TradeResponse::try_from_bytes(payload)?;
                Ok(TradeEvent::Response {
                    answer: resp.answer,
                })
            }
            Codes::TradeItemAdded => {
                let added = TradeItemAdded::try_from_bytes(payload)?;
                Ok(TradeEvent::ItemAdded(TradeItem {
                    item_id: added.item_id,
                    amount: added.amount,
                }))
            }
            Codes::TradeConfirmed => {
                let confirmed = TradeConfirmed::try_from_bytes(payload)?;
                Ok(TradeEvent::Confirmed {
                    by_partner: confirmed.by_partner,
                })
            }
            Codes::TradeCancelled => {
                TradeCancelled::try_from_bytes(payload)?;
                Ok(TradeEvent::Cancelled)
            }
            Codes::TradeCompleted => {
                let done = TradeCompleted::try_from_bytes(payload)?;
                Ok(TradeEvent::Completed {
                    success: done.success,
                })
            }
            _ => Err(DecodeError::UnknownOpcode(opcode)),
        }
    }

    fn send_request(&self, out: &PacketOutbox, name: &str) {
        send(
            out,
            Codes::TradeRequest,
            &client::TradeRequest {
                name: name.to_string(),
            },
        );
    }

    fn send_respond(&self, out: &PacketOutbox, accept: bool) {
        send(out, Codes::TradeRespond, &client::TradeRespond { accept });
    }

    fn send_add_item(&self, out: &PacketOutbox, item_id: u16, amount: u32) {
        send(out, Codes::TradeAddItem, &client::TradeAddItem { item_id, amount });
    }

    fn send_confirm(&self, out: &PacketOutbox) {
        send(out, Codes::TradeConfirm, &client::TradeConfirm);
    }

    fn send_cancel(&self, out: &PacketOutbox) {
        send(out, Codes::TradeCancel, &client::TradeCancel);
    }
}

impl SkillWire for ClassicWire {
    fn decode(&self, opcode: u16, payload: &[u8]) -> Result<SkillEvent, DecodeError> {
        match code_for(opcode)? {
            Codes::SkillList => {
                let list = SkillList::try_from_bytes(payload)?;
                Ok(SkillEvent::List {
                    points: list.points,
                    skills: list.skills,
                })
            }
            Codes::SkillUpdate => {
                let update = SkillUpdate::try_from_bytes(payload)?;
                Ok(SkillEvent::Update(update.skill))
            }
            Codes::SkillPointsUpdate => {
                let update = SkillPointsUpdate::try_from_bytes(payload)?;
                Ok(SkillEvent::Points(update.points))
            }
            Codes::SkillFailed => {
                let failed = SkillFailed::try_from_bytes(payload)?;
                Ok(SkillEvent::Failed {
                    skill_id: failed.skill_id,
                    reason: failed.reason,
                })
            }
            _ => Err(DecodeError::UnknownOpcode(opcode)),
        }
    }

    fn send_use(&self, out: &PacketOutbox, skill: &SkillInfo, target_id: u32) {
        send(
            out,
            Codes::SkillUse,
            &client::SkillUse {
                level: skill.level,
                skill_id: skill.id,
                target_id,
            },
        );
    }

    fn send_up(&self, out: &PacketOutbox, skill_id: u16) {
        send(out, Codes::SkillUp, &client::SkillUp { skill_id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_frame_has_opcode_and_fixed_length() {
        let out = PacketOutbox::default();
        LoginWire::send_login(&ClassicWire, &out, "kestrel", "hunter22");
        let frames = out.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..2], &[0x64, 0x00]);
        assert_eq!(frames[0].len(), 55);
    }

    #[test]
    fn decode_rejects_foreign_opcode() {
        let err = LoginWire::decode(&ClassicWire, 0x0a69, &[]);
        assert!(matches!(err, Err(DecodeError::UnknownOpcode(0x0a69))));
    }

    #[test]
    fn decode_rejects_opcode_owned_by_another_feature() {
        // A skill opcode reaching the login wire is a routing bug.
        let err = LoginWire::decode(&ClassicWire, Codes::SkillList.into(), &[0, 0]);
        assert!(matches!(err, Err(DecodeError::UnknownOpcode(_))));
    }

    #[test]
    fn registration_covers_every_inbound_trade_code() {
        let mut d = Dispatcher::new();
        register(&mut d);
        for code in [
            Codes::TradeRequested,
            Codes::TradeResponse,
            Codes::TradeItemAdded,
            Codes::TradeConfirmed,
            Codes::TradeCancelled,
            Codes::TradeCompleted,
        ] {
            assert_eq!(d.lookup(code.into()), Some(HandlerId::Trade));
        }
    }

    #[test]
    fn outbound_codes_are_not_routed() {
        let mut d = Dispatcher::new();
        register(&mut d);
        assert_eq!(d.lookup(Codes::Login.into()), None);
        assert_eq!(d.lookup(Codes::PartyChat.into()), None);
    }
}
