//! Wire implementation for the extended community fork. Shared messages
//! reuse the classic layouts; the reshaped ones live on their own 0x0axx
//! numbers.

use packets::extended::{Codes, packet_len};
use packets::server::{
    CharServerAck, ExtGuildMemberList, ExtGuildShareUpdate, ExtLoginOk, ExtPartyInfo,
    ExtPartyMemberInfo, ExtPartyShareUpdate, GuildChatMsg, GuildCreateResult, GuildInfo,
    GuildInviteResult, GuildInvited, GuildLeft, GuildNotice, LoginError, PartyChatMsg,
    PartyCreateResult, PartyInviteResult, PartyInvited, PartyLeft, PartyMemberJoined, ServerHello,
    SkillFailed, SkillInfo, SkillList, SkillPointsUpdate, SkillUpdate, TradeCancelled,
    TradeCompleted, TradeConfirmed, TradeItemAdded, TradeRequested, TradeResponse, WorldList,
};
use packets::types::{GuildShare, PartyShare};
use packets::{DecodeError, ToBytes, TryFromBytes, client};

use crate::dispatch::{Dispatcher, HandlerId};
use crate::handlers::guild::{GuildEvent, GuildWire};
use crate::handlers::login::{LoginEvent, LoginWire};
use crate::handlers::party::{PartyEvent, PartyMember, PartyWire};
use crate::handlers::skill::{SkillEvent, SkillWire};
use crate::handlers::trade::{TradeEvent, TradeItem, TradeWire};
use crate::network::PacketOutbox;
use crate::protocol::CLIENT_VERSION;
use crate::session::Token;

/// Capability bits announced at login. Bit 0: item share policies,
/// bit 1: avatar-aware rosters.
pub const CAPABILITIES: u16 = 0x0003;

/// Speaks the community fork's protocol.
pub struct ExtendedWire {
    /// Avatar stored with a new account on registration.
    pub register_avatar: u16,
}

impl Default for ExtendedWire {
    fn default() -> Self {
        Self { register_avatar: 0 }
    }
}

fn send<T: ToBytes>(out: &PacketOutbox, code: Codes, msg: &T) {
    out.send(code.into(), packet_len(code), msg);
}

fn code_for(opcode: u16) -> Result<Codes, DecodeError> {
    Codes::try_from(opcode).map_err(|_| DecodeError::UnknownOpcode(opcode))
}

fn party_member(m: ExtPartyMemberInfo) -> PartyMember {
    PartyMember {
        id: m.account_id,
        name: m.name,
        map: m.map,
        is_leader: m.is_leader,
        is_online: m.is_online,
        avatar_id: Some(m.avatar_id),
        level: Some(m.level),
    }
}

/// Routes every inbound extended opcode to its feature handler.
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

impl LoginWire for ExtendedWire {
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
                let ok = ExtLoginOk::try_from_bytes(payload)?;
                Ok(LoginEvent::Accepted {
                    token: Token {
                        account_id: ok.account_id,
                        session_id: ok.session_id,
                        auth_key: ok.auth_key,
                    },
                    avatar_id: Some(ok.avatar_id),
                    update_host: (!ok.update_host.is_empty()).then_some(ok.update_host),
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
            &client::ExtLogin {
                client_version: CLIENT_VERSION,
                username: username.to_string(),
                password: password.to_string(),
                flags: 0,
                capabilities: CAPABILITIES,
            },
        );
    }

    fn send_register(&self, out: &PacketOutbox, username: &str, password: &str, email: &str) {
        send(
            out,
            Codes::Register,
            &client::ExtRegister {
                username: username.to_string(),
                password: password.to_string(),
                email: email.to_string(),
                avatar_id: self.register_avatar,
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

impl PartyWire for ExtendedWire {
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
                let info = ExtPartyInfo::try_from_bytes(payload)?;
                Ok(PartyEvent::Roster {
                    name: info.party_name,
                    members: info.members.into_iter().map(party_member).collect(),
                })
            }
            Codes::PartyMemberJoined => {
                // The join patch kept the classic entry layout; avatar and
                // level arrive with the next full roster.
                let joined = PartyMemberJoined::try_from_bytes(payload)?;
                Ok(PartyEvent::MemberJoined(super::classic::party_member(
                    joined.member,
                )))
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
                let update = ExtPartyShareUpdate::try_from_bytes(payload)?;
                Ok(PartyEvent::ShareUpdate {
                    experience: update.experience,
                    items: Some(update.items),
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
        send(
            out,
            Codes::PartyShareChange,
            &client::PartyShareChangeExt { experience, items },
        );
    }
}

impl GuildWire for ExtendedWire {
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
                let list = ExtGuildMemberList::try_from_bytes(payload)?;
                Ok(GuildEvent::Roster(
                    list.members
                        .into_iter()
                        .map(super::classic::guild_member)
                        .collect(),
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
                let update = ExtGuildShareUpdate::try_from_bytes(payload)?;
                Ok(GuildEvent::ShareUpdate {
                    experience: update.experience,
                    items: Some(update.items),
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
        send(
            out,
            Codes::GuildShareChange,
            &client::GuildShareChangeExt { experience, items },
        );
    }
}

impl TradeWire for ExtendedWire {
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

impl SkillWire for ExtendedWire {
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
