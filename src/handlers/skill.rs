use packets::DecodeError;
use packets::server::{SkillFailReason, SkillInfo};

use crate::error::ValidationError;
use crate::events::{Channel, Notice};
use crate::handlers::Context;
use crate::network::PacketOutbox;

/// Family-neutral skill messages.
#[derive(Debug)]
pub enum SkillEvent {
    List { points: u16, skills: Vec<SkillInfo> },
    Update(SkillInfo),
    Points(u16),
    Failed { skill_id: u16, reason: SkillFailReason },
}

pub trait SkillWire {
    fn decode(&self, opcode: u16, payload: &[u8]) -> Result<SkillEvent, DecodeError>;
    fn send_use(&self, out: &PacketOutbox, skill: &SkillInfo, target_id: u32);
    fn send_up(&self, out: &PacketOutbox, skill_id: u16);
}

pub struct SkillHandler {
    wire: Box<dyn SkillWire>,
    skills: Vec<SkillInfo>,
    points: u16,
}

impl SkillHandler {
    pub fn new(wire: Box<dyn SkillWire>) -> Self {
        Self {
            wire,
            skills: Vec::new(),
            points: 0,
        }
    }

    pub fn skills(&self) -> &[SkillInfo] {
        &self.skills
    }

    pub fn points(&self) -> u16 {
        self.points
    }

    pub fn skill(&self, id: u16) -> Option<&SkillInfo> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn reset(&mut self) {
        self.skills.clear();
        self.points = 0;
    }

    /// Invokes a known, learned skill. Resource checks stay with the
    /// server; the client only refuses what it cannot even name.
    pub fn use_skill(
        &mut self,
        out: &PacketOutbox,
        skill_id: u16,
        target_id: u32,
    ) -> Result<(), ValidationError> {
        let Some(skill) = self.skill(skill_id) else {
            return Err(ValidationError::UnknownSkill(skill_id));
        };
        if skill.level == 0 {
            return Err(ValidationError::UnknownSkill(skill_id));
        }
        self.wire.send_use(out, skill, target_id);
        Ok(())
    }

    /// Spends one point to raise a skill. Optimistic local decrement; the
    /// server's next points update is authoritative either way.
    pub fn increase(&mut self, out: &PacketOutbox, skill_id: u16) -> Result<(), ValidationError> {
        if self.points == 0 {
            return Err(ValidationError::NoSkillPoints);
        }
        let Some(skill) = self.skill(skill_id) else {
            return Err(ValidationError::UnknownSkill(skill_id));
        };
        if !skill.can_upgrade {
            return Err(ValidationError::SkillNotRaisable(skill_id));
        }
        self.wire.send_up(out, skill_id);
        self.points -= 1;
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

    fn apply(&mut self, event: SkillEvent, cx: &mut Context) {
        match event {
            SkillEvent::List { points, skills } => {
                tracing::debug!(count = skills.len(), points, "skill table replaced");
                self.skills = skills;
                self.points = points;
                cx.ui.notify(Notice::SkillsChanged);
            }
            SkillEvent::Update(skill) => {
                match self.skills.iter_mut().find(|s| s.id == skill.id) {
                    Some(existing) => *existing = skill,
                    None => self.skills.push(skill),
                }
                cx.ui.notify(Notice::SkillsChanged);
            }
            SkillEvent::Points(points) => {
                self.points = points;
                cx.ui.notify(Notice::SkillsChanged);
            }
            SkillEvent::Failed { skill_id, reason } => {
                tracing::debug!(skill_id, ?reason, "skill refused");
                cx.ui.append_line(Channel::System, reason.message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::doubles::{RecordingLog, RecordingSink};
    use crate::protocol::classic::ClassicWire;
    use crate::session::Session;

    fn skill(id: u16, level: u16, can_upgrade: bool) -> SkillInfo {
        SkillInfo {
            id,
            level,
            sp_cost: 10,
            range: 2,
            can_upgrade,
        }
    }

    struct Fixture {
        handler: SkillHandler,
        session: Session,
        out: PacketOutbox,
        ui: RecordingSink,
        log: RecordingLog,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                handler: SkillHandler::new(Box::new(ClassicWire)),
                session: Session::default(),
                out: PacketOutbox::default(),
                ui: RecordingSink::default(),
                log: RecordingLog::default(),
            }
        }

        fn apply(&mut self, event: SkillEvent) {
            let mut cx = Context {
                session: &mut self.session,
                outbox: &self.out,
                ui: &mut self.ui,
                log: &mut self.log,
            };
            self.handler.apply(event, &mut cx);
        }
    }

    #[test]
    fn unknown_skill_is_rejected_locally() {
        let mut f = Fixture::new();
        f.apply(SkillEvent::List {
            points: 1,
            skills: vec![skill(10, 1, true)],
        });
        assert_eq!(
            f.handler.use_skill(&f.out, 99, 0),
            Err(ValidationError::UnknownSkill(99))
        );
        assert!(f.out.is_empty());
        assert!(f.handler.use_skill(&f.out, 10, 7).is_ok());
        assert_eq!(f.out.drain().len(), 1);
    }

    #[test]
    fn increase_needs_points_and_headroom() {
        let mut f = Fixture::new();
        f.apply(SkillEvent::List {
            points: 1,
            skills: vec![skill(10, 1, true), skill(11, 10, false)],
        });
        assert_eq!(
            f.handler.increase(&f.out, 11),
            Err(ValidationError::SkillNotRaisable(11))
        );
        f.handler.increase(&f.out, 10).unwrap();
        assert_eq!(f.handler.points(), 0);
        assert_eq!(
            f.handler.increase(&f.out, 10),
            Err(ValidationError::NoSkillPoints)
        );
        assert_eq!(f.out.drain().len(), 1);
    }

    #[test]
    fn update_patches_or_appends() {
        let mut f = Fixture::new();
        f.apply(SkillEvent::List {
            points: 0,
            skills: vec![skill(10, 1, true)],
        });
        f.apply(SkillEvent::Update(skill(10, 2, true)));
        assert_eq!(f.handler.skill(10).unwrap().level, 2);
        f.apply(SkillEvent::Update(skill(12, 1, true)));
        assert_eq!(f.handler.skills().len(), 2);
    }

    #[test]
    fn failure_message_reaches_the_ui() {
        let mut f = Fixture::new();
        f.apply(SkillEvent::Failed {
            skill_id: 10,
            reason: SkillFailReason::OutOfRange,
        });
        assert!(
            f.ui.lines
                .iter()
                .any(|(c, l)| *c == Channel::System && l == "Target out of range")
        );
    }

    #[test]
    fn points_update_from_wire_bytes() {
        let mut f = Fixture::new();
        let mut cx = Context {
            session: &mut f.session,
            outbox: &f.out,
            ui: &mut f.ui,
            log: &mut f.log,
        };
        f.handler
            .handle(
                u16::from(packets::classic::Codes::SkillPointsUpdate),
                &5u16.to_le_bytes(),
                &mut cx,
            )
            .unwrap();
        assert_eq!(f.handler.points(), 5);
        assert!(f.ui.notices.contains(&Notice::SkillsChanged));
    }
}
