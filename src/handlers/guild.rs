use packets::DecodeError;
use packets::server::{PartyInviteAnswer, PartyLeaveReason};
use packets::types::GuildShare;

use crate::error::ValidationError;
use crate::events::{Channel, Notice};
use crate::handlers::Context;
use crate::network::PacketOutbox;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub id: u32,
    pub name: String,
    pub position: u8,
    pub is_online: bool,
    pub avatar_id: Option<u16>,
    pub level: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct Guild {
    pub id: u32,
    pub name: String,
    pub master: String,
    pub member_count: u16,
    pub max_members: u16,
    pub members: Vec<GuildMember>,
    pub notice: Option<(String, String)>,
    pub share_experience: GuildShare,
    pub share_items: GuildShare,
}

/// Family-neutral guild messages.
#[derive(Debug)]
pub enum GuildEvent {
    CreateResult {
        code: u8,
    },
    Info {
        id: u32,
        name: String,
        master: String,
        member_count: u16,
        max_members: u16,
    },
    Invited {
        guild_id: u32,
        from: String,
        guild: String,
    },
    InviteResult {
        name: String,
        answer: PartyInviteAnswer,
    },
    Roster(Vec<GuildMember>),
    Left {
        name: String,
        reason: PartyLeaveReason,
    },
    Chat {
        id: u32,
        text: String,
    },
    Notice {
        subject: String,
        body: String,
    },
    ShareUpdate {
        experience: GuildShare,
        items: Option<GuildShare>,
    },
}

pub trait GuildWire {
    fn decode(&self, opcode: u16, payload: &[u8]) -> Result<GuildEvent, DecodeError>;
    fn send_create(&self, out: &PacketOutbox, name: &str);
    fn send_invite(&self, out: &PacketOutbox, name: &str);
    fn send_leave(&self, out: &PacketOutbox);
    fn send_kick(&self, out: &PacketOutbox, id: u32, name: &str);
    fn send_chat(&self, out: &PacketOutbox, text: &str);
    fn send_notice_change(&self, out: &PacketOutbox, subject: &str, body: &str);
    fn send_share_change(&self, out: &PacketOutbox, experience: GuildShare, items: GuildShare);
}

pub struct GuildHandler {
    wire: Box<dyn GuildWire>,
    guild: Option<Guild>,
}

impl GuildHandler {
    pub fn new(wire: Box<dyn GuildWire>) -> Self {
        Self { wire, guild: None }
    }

    pub fn guild(&self) -> Option<&Guild> {
        self.guild.as_ref()
    }

    pub fn in_guild(&self) -> bool {
        self.guild.is_some()
    }

    pub fn auto_complete_list(&self) -> Vec<String> {
        self.guild
            .as_ref()
            .map(|g| g.members.iter().map(|m| m.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.guild = None;
    }

    pub fn create(&mut self, out: &PacketOutbox, name: &str) -> Result<(), ValidationError> {
        if self.in_guild() {
            return Err(ValidationError::AlreadyInGuild);
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
        if !self.in_guild() {
            return Err(ValidationError::NotInGuild);
        }
        self.wire.send_invite(out, name);
        Ok(())
    }

    pub fn leave(&mut self, out: &PacketOutbox) -> Result<(), ValidationError> {
        if !self.in_guild() {
            return Err(ValidationError::NotInGuild);
        }
        self.wire.send_leave(out);
        Ok(())
    }

    pub fn kick(&mut self, out: &PacketOutbox, name: &str) -> Result<(), ValidationError> {
        let Some(guild) = &self.guild else {
            return Err(ValidationError::NotInGuild);
        };
        let Some(member) = guild.members.iter().find(|m| m.name == name) else {
            return Err(ValidationError::NoSuchGuildMember(name.to_string()));
        };
        self.wire.send_kick(out, member.id, name);
        Ok(())
    }

    pub fn chat(&mut self, out: &PacketOutbox, text: &str) -> Result<(), ValidationError> {
        if !self.in_guild() {
            return Err(ValidationError::NotInGuild);
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

    pub fn change_notice(
        &mut self,
        out: &PacketOutbox,
        subject: &str,
        body: &str,
    ) -> Result<(), ValidationError> {
        if !self.in_guild() {
            return Err(ValidationError::NotInGuild);
        }
        if subject.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        self.wire.send_notice_change(out, subject, body);
        Ok(())
    }

    pub fn change_share(
        &mut self,
        out: &PacketOutbox,
        experience: GuildShare,
        items: GuildShare,
    ) -> Result<(), ValidationError> {
        if !self.in_guild() {
            return Err(ValidationError::NotInGuild);
        }
        self.wire.send_share_change(out, experience, items);
        Ok(())
    }

    fn member_name(&self, id: u32) -> String {
        self.guild
            .as_ref()
            .and_then(|g| g.members.iter().find(|m| m.id == id))
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

    fn apply(&mut self, event: GuildEvent, cx: &mut Context) {
        match event {
            GuildEvent::CreateResult { code } => {
                let text = match code {
                    0 => "Guild created.",
                    1 => "That guild name is already taken.",
                    2 => "You are already in a guild.",
                    3 => "You do not meet the requirements to found a guild.",
                    _ => "Could not create guild.",
                };
                cx.ui.append_line(Channel::System, text);
            }
            GuildEvent::Info {
                id,
                name,
                master,
                member_count,
                max_members,
            } => {
                // The sheet can arrive before or after the roster; keep
                // whichever member list we already have.
                let members = self
                    .guild
                    .take()
                    .filter(|g| g.id == id)
                    .map(|g| (g.members, g.notice, g.share_experience, g.share_items));
                let (members, notice, share_experience, share_items) = members.unwrap_or((
                    Vec::new(),
                    None,
                    GuildShare::Unspecified,
                    GuildShare::Unspecified,
                ));
                self.guild = Some(Guild {
                    id,
                    name,
                    master,
                    member_count,
                    max_members,
                    members,
                    notice,
                    share_experience,
                    share_items,
                });
                cx.ui.notify(Notice::GuildChanged);
            }
            GuildEvent::Invited {
                guild_id,
                from,
                guild,
            } => {
                tracing::debug!(guild_id, %from, %guild, "guild invitation");
                cx.ui.append_line(
                    Channel::System,
                    &format!("{from} invites you to join guild \"{guild}\"."),
                );
                cx.ui.notify(Notice::GuildInvite { from, guild });
            }
            GuildEvent::InviteResult { name, answer } => {
                let text = match answer {
                    PartyInviteAnswer::Accepted => format!("{name} joins the guild."),
                    PartyInviteAnswer::Rejected => format!("{name} declined the invitation."),
                    PartyInviteAnswer::AlreadyInParty => format!("{name} is already in a guild."),
                    PartyInviteAnswer::PartyFull => "The guild is full.".to_string(),
                    PartyInviteAnswer::Unspecified => format!("Could not invite {name}."),
                };
                cx.ui.append_line(Channel::System, &text);
            }
            GuildEvent::Roster(members) => {
                let Some(guild) = &mut self.guild else {
                    tracing::debug!("guild roster without a guild sheet, ignored");
                    return;
                };
                guild.member_count = members.len() as u16;
                guild.members = members;
                cx.ui.notify(Notice::GuildChanged);
            }
            GuildEvent::Left { name, reason } => {
                let own = cx
                    .session
                    .character_name
                    .as_deref()
                    .is_some_and(|n| n == name);
                let text = match reason {
                    PartyLeaveReason::Kicked if own => "You were expelled from the guild.".into(),
                    PartyLeaveReason::Kicked => format!("{name} was expelled from the guild."),
                    PartyLeaveReason::Disbanded => "The guild was disbanded.".into(),
                    _ if own => "You left the guild.".into(),
                    _ => format!("{name} left the guild."),
                };
                if own || reason == PartyLeaveReason::Disbanded {
                    self.guild = None;
                } else if let Some(guild) = &mut self.guild {
                    guild.members.retain(|m| m.name != name);
                    guild.member_count = guild.members.len() as u16;
                }
                cx.ui.append_line(Channel::Guild, &text);
                cx.ui.notify(Notice::GuildChanged);
            }
            GuildEvent::Chat { id, text } => {
                let line = format!("{}: {}", self.member_name(id), text);
                cx.ui.append_line(Channel::Guild, &line);
                cx.log.log(Channel::Guild.name(), &line);
            }
            GuildEvent::Notice { subject, body } => {
                let Some(guild) = &mut self.guild else {
                    tracing::debug!("guild notice without a guild, ignored");
                    return;
                };
                cx.ui
                    .append_line(Channel::Guild, &format!("Notice: {subject}"));
                guild.notice = Some((subject, body));
                cx.ui.notify(Notice::GuildChanged);
            }
            GuildEvent::ShareUpdate { experience, items } => {
                let Some(guild) = &mut self.guild else {
                    tracing::debug!("guild share update without a guild, ignored");
                    return;
                };
                guild.share_experience = experience;
                if let Some(items) = items {
                    guild.share_items = items;
                }
                cx.ui.notify(Notice::GuildChanged);
            }
        }
    }
}
