use std::collections::HashMap;

/// Capability reference a wire opcode routes to. The handlers themselves
/// live on the [`crate::runtime::Client`]; this indirection is what lets
/// two protocol families share one set of feature handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerId {
    Login,
    Party,
    Guild,
    Trade,
    Skill,
}

/// Opcode routing table for the active protocol family. Rebuilt from
/// scratch on reconnect or family switch.
#[derive(Debug, Default)]
pub struct Dispatcher {
    table: HashMap<u16, HandlerId>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last registration wins. Re-registration is expected during family
    /// switches, so it is a diagnostic, not an error.
    pub fn register(&mut self, opcode: u16, handler: HandlerId) {
        if let Some(previous) = self.table.insert(opcode, handler) {
            tracing::debug!(
                opcode = format_args!("{opcode:#06x}"),
                ?previous,
                current = ?handler,
                "opcode registration replaced"
            );
        }
    }

    pub fn lookup(&self, opcode: u16) -> Option<HandlerId> {
        self.table.get(&opcode).copied()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_of_unregistered_opcode_is_none() {
        let d = Dispatcher::new();
        assert_eq!(d.lookup(0x0064), None);
    }

    #[test]
    fn second_registration_strictly_replaces_the_first() {
        let mut d = Dispatcher::new();
        d.register(0x0064, HandlerId::Login);
        d.register(0x0064, HandlerId::Party);
        assert_eq!(d.lookup(0x0064), Some(HandlerId::Party));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn clear_empties_the_table() {
        let mut d = Dispatcher::new();
        d.register(0x0064, HandlerId::Login);
        assert!(!d.is_empty());
        d.clear();
        assert!(d.is_empty());
        assert_eq!(d.lookup(0x0064), None);
    }
}
