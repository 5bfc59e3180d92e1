use packets::DecodeError;
use packets::server::TradeAnswer;

use crate::error::ValidationError;
use crate::events::{Channel, Notice};
use crate::handlers::Context;
use crate::network::PacketOutbox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeItem {
    pub item_id: u16,
    pub amount: u32,
}

/// Where a trade stands locally. `Requested` covers both directions; the
/// flag tells whether we asked or were asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradePhase {
    Idle,
    Requested { partner: String, outgoing: bool },
    Active { partner: String },
}

/// Family-neutral trade messages. Both families share these layouts; the
/// fork never reshaped the trade block.
#[derive(Debug)]
pub enum TradeEvent {
    Requested { from: String },
    Response { answer: TradeAnswer },
    ItemAdded(TradeItem),
    Confirmed { by_partner: bool },
    Cancelled,
    Completed { success: bool },
}

pub trait TradeWire {
    fn decode(&self, opcode: u16, payload: &[u8]) -> Result<TradeEvent, DecodeError>;
    fn send_request(&self, out: &PacketOutbox, name: &str);
    fn send_respond(&self, out: &PacketOutbox, accept: bool);
    fn send_add_item(&self, out: &PacketOutbox, item_id: u16, amount: u32);
    fn send_confirm(&self, out: &PacketOutbox);
    fn send_cancel(&self, out: &PacketOutbox);
}

pub struct TradeHandler {
    wire: Box<dyn TradeWire>,
    phase: TradePhase,
    own_offer: Vec<TradeItem>,
    partner_offer: Vec<TradeItem>,
    own_confirmed: bool,
    partner_confirmed: bool,
}

impl TradeHandler {
    pub fn new(wire: Box<dyn TradeWire>) -> Self {
        Self {
            wire,
            phase: TradePhase::Idle,
            own_offer: Vec::new(),
            partner_offer: Vec::new(),
            own_confirmed: false,
            partner_confirmed: false,
        }
    }

    pub fn phase(&self) -> &TradePhase {
        &self.phase
    }

    pub fn partner_offer(&self) -> &[TradeItem] {
        &self.partner_offer
    }

    pub fn own_offer(&self) -> &[TradeItem] {
        &self.own_offer
    }

    pub fn reset(&mut self) {
        self.phase = TradePhase::Idle;
        self.own_offer.clear();
        self.partner_offer.clear();
        self.own_confirmed = false;
        self.partner_confirmed = false;
    }

    pub fn request(&mut self, out: &PacketOutbox, name: &str) -> Result<(), ValidationError> {
        if self.phase != TradePhase::Idle {
            return Err(ValidationError::TradeInProgress);
        }
        if name.is_empty() {
            return Err(ValidationError::NameLength {
                len: 0,
                min: 1,
                max: packets::types::NAME_LEN - 1,
            });
        }
        self.wire.send_request(out, name);
        self.phase = TradePhase::Requested {
            partner: name.to_string(),
            outgoing: true,
        };
        Ok(())
    }

    /// Answers an incoming request. Accepting opens the trade window;
    /// declining returns to idle either way.
    pub fn respond(&mut self, out: &PacketOutbox, accept: bool) -> Result<(), ValidationError> {
        let TradePhase::Requested { partner, outgoing } = &self.phase else {
            return Err(ValidationError::NoActiveTrade);
        };
        if *outgoing {
            return Err(ValidationError::NoActiveTrade);
        }
        let partner = partner.clone();
        self.wire.send_respond(out, accept);
        self.phase = if accept {
            TradePhase::Active { partner }
        } else {
            TradePhase::Idle
        };
        Ok(())
    }

    pub fn add_item(
        &mut self,
        out: &PacketOutbox,
        item_id: u16,
        amount: u32,
    ) -> Result<(), ValidationError> {
        if !matches!(self.phase, TradePhase::Active { .. }) || self.own_confirmed {
            return Err(ValidationError::NoActiveTrade);
        }
        self.wire.send_add_item(out, item_id, amount);
        self.own_offer.push(TradeItem { item_id, amount });
        Ok(())
    }

    pub fn confirm(&mut self, out: &PacketOutbox) -> Result<(), ValidationError> {
        if !matches!(self.phase, TradePhase::Active { .. }) || self.own_confirmed {
            return Err(ValidationError::NoActiveTrade);
        }
        self.wire.send_confirm(out);
        Ok(())
    }

    pub fn cancel(&mut self, out: &PacketOutbox) -> Result<(), ValidationError> {
        if self.phase == TradePhase::Idle {
            return Err(ValidationError::NoActiveTrade);
        }
        self.wire.send_cancel(out);
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

    fn apply(&mut self, event: TradeEvent, cx: &mut Context) {
        match event {
            TradeEvent::Requested { from } => {
                if self.phase != TradePhase::Idle {
                    // Busy; the server answers the requester on our behalf.
                    tracing::debug!(%from, "trade request while busy, ignored");
                    return;
                }
                cx.ui
                    .append_line(Channel::System, &format!("{from} wants to trade with you."));
                cx.ui.notify(Notice::TradeRequest { from: from.clone() });
                self.phase = TradePhase::Requested {
                    partner: from,
                    outgoing: false,
                };
            }
            TradeEvent::Response { answer } => {
                let TradePhase::Requested { partner, outgoing } = &self.phase else {
                    tracing::debug!(?answer, "trade response without a request, ignored");
                    return;
                };
                if !*outgoing {
                    tracing::debug!(?answer, "trade response for an incoming request, ignored");
                    return;
                }
                let partner = partner.clone();
                let text = match answer {
                    TradeAnswer::Accepted => format!("{partner} accepts the trade."),
                    TradeAnswer::Rejected => format!("{partner} declines the trade."),
                    TradeAnswer::TooFarAway => format!("{partner} is too far away."),
                    TradeAnswer::NoSuchCharacter => format!("{partner} is not online."),
                    TradeAnswer::Busy => format!("{partner} is busy."),
                    TradeAnswer::Unspecified => "Trade request failed.".to_string(),
                };
                cx.ui.append_line(Channel::System, &text);
                if answer == TradeAnswer::Accepted {
                    self.phase = TradePhase::Active { partner };
                } else {
                    self.reset();
                    cx.ui.notify(Notice::TradeClosed);
                }
            }
            TradeEvent::ItemAdded(item) => {
                if !matches!(self.phase, TradePhase::Active { .. }) {
                    tracing::debug!(item_id = item.item_id, "trade item outside a trade, ignored");
                    return;
                }
                self.partner_offer.push(item);
                cx.ui.notify(Notice::TradeUpdated);
            }
            TradeEvent::Confirmed { by_partner } => {
                if !matches!(self.phase, TradePhase::Active { .. }) {
                    tracing::debug!(by_partner, "trade confirm outside a trade, ignored");
                    return;
                }
                if by_partner {
                    self.partner_confirmed = true;
                    cx.ui
                        .append_line(Channel::System, "Your trade partner locked their offer.");
                } else {
                    self.own_confirmed = true;
                }
                cx.ui.notify(Notice::TradeUpdated);
            }
            TradeEvent::Cancelled => {
                if self.phase == TradePhase::Idle {
                    return;
                }
                self.reset();
                cx.ui.append_line(Channel::System, "Trade cancelled.");
                cx.ui.notify(Notice::TradeClosed);
            }
            TradeEvent::Completed { success } => {
                if !matches!(self.phase, TradePhase::Active { .. }) {
                    tracing::debug!(success, "trade completion outside a trade, ignored");
                    return;
                }
                self.reset();
                let text = if success {
                    "Trade completed."
                } else {
                    "Trade failed."
                };
                cx.ui.append_line(Channel::System, text);
                cx.ui.notify(Notice::TradeClosed);
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

    struct Fixture {
        handler: TradeHandler,
        session: Session,
        out: PacketOutbox,
        ui: RecordingSink,
        log: RecordingLog,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                handler: TradeHandler::new(Box::new(ClassicWire)),
                session: Session::default(),
                out: PacketOutbox::default(),
                ui: RecordingSink::default(),
                log: RecordingLog::default(),
            }
        }

        fn apply(&mut self, event: TradeEvent) {
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
    fn add_item_outside_a_trade_is_rejected() {
        let mut f = Fixture::new();
        assert_eq!(
            f.handler.add_item(&f.out, 500, 1),
            Err(ValidationError::NoActiveTrade)
        );
        assert!(f.out.is_empty());
    }

    #[test]
    fn second_request_while_busy_is_rejected_locally() {
        let mut f = Fixture::new();
        f.handler.request(&f.out, "Rel").unwrap();
        assert_eq!(
            f.handler.request(&f.out, "Vane"),
            Err(ValidationError::TradeInProgress)
        );
        assert_eq!(f.out.drain().len(), 1);
    }

    #[test]
    fn accepted_response_opens_the_trade() {
        let mut f = Fixture::new();
        f.handler.request(&f.out, "Rel").unwrap();
        f.apply(TradeEvent::Response {
            answer: TradeAnswer::Accepted,
        });
        assert_eq!(
            *f.handler.phase(),
            TradePhase::Active {
                partner: "Rel".into()
            }
        );
    }

    #[test]
    fn rejected_response_returns_to_idle() {
        let mut f = Fixture::new();
        f.handler.request(&f.out, "Rel").unwrap();
        f.apply(TradeEvent::Response {
            answer: TradeAnswer::Rejected,
        });
        assert_eq!(*f.handler.phase(), TradePhase::Idle);
        assert!(f.ui.notices.contains(&Notice::TradeClosed));
    }

    #[test]
    fn incoming_request_then_accept_goes_active() {
        let mut f = Fixture::new();
        f.apply(TradeEvent::Requested { from: "Rel".into() });
        assert!(f.ui.notices.iter().any(|n| matches!(
            n,
            Notice::TradeRequest { from } if from == "Rel"
        )));
        f.handler.respond(&f.out, true).unwrap();
        assert_eq!(
            *f.handler.phase(),
            TradePhase::Active {
                partner: "Rel".into()
            }
        );
    }

    #[test]
    fn no_additions_after_own_confirm() {
        let mut f = Fixture::new();
        f.apply(TradeEvent::Requested { from: "Rel".into() });
        f.handler.respond(&f.out, true).unwrap();
        f.handler.add_item(&f.out, 500, 2).unwrap();
        f.apply(TradeEvent::Confirmed { by_partner: false });
        assert_eq!(
            f.handler.add_item(&f.out, 501, 1),
            Err(ValidationError::NoActiveTrade)
        );
        assert_eq!(f.handler.own_offer().len(), 1);
    }

    #[test]
    fn completion_clears_all_trade_state() {
        let mut f = Fixture::new();
        f.apply(TradeEvent::Requested { from: "Rel".into() });
        f.handler.respond(&f.out, true).unwrap();
        f.apply(TradeEvent::ItemAdded(TradeItem {
            item_id: 900,
            amount: 3,
        }));
        assert_eq!(f.handler.partner_offer().len(), 1);
        f.apply(TradeEvent::Completed { success: true });
        assert_eq!(*f.handler.phase(), TradePhase::Idle);
        assert!(f.handler.partner_offer().is_empty());
        assert!(f.handler.own_offer().is_empty());
    }

    #[test]
    fn cancel_from_wire_bytes() {
        let mut f = Fixture::new();
        f.apply(TradeEvent::Requested { from: "Rel".into() });
        f.handler.respond(&f.out, true).unwrap();
        let mut cx = Context {
            session: &mut f.session,
            outbox: &f.out,
            ui: &mut f.ui,
            log: &mut f.log,
        };
        f.handler
            .handle(
                u16::from(packets::classic::Codes::TradeCancelled),
                &[],
                &mut cx,
            )
            .unwrap();
        assert_eq!(*f.handler.phase(), TradePhase::Idle);
    }
}
