use packets::server::WorldInfo;

/// Server-issued credential; lives from successful authentication until
/// logout or error. Consumers go through [`Session::token`], which is
/// `None` whenever the token is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub account_id: u32,
    pub session_id: u32,
    pub auth_key: u32,
}

/// State shared across feature handlers for one connection.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<Token>,
    worlds: Vec<WorldInfo>,
    selected_world: Option<usize>,
    pub registration_enabled: bool,
    pub protocol_version: u32,
    /// Name the last login attempt was made under.
    pub character_name: Option<String>,
}

impl Session {
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: Token) {
        self.token = Some(token);
    }

    /// Drops the credential; called on logout, login error and disconnect.
    pub fn invalidate_token(&mut self) {
        self.token = None;
    }

    pub fn worlds(&self) -> &[WorldInfo] {
        &self.worlds
    }

    pub fn set_worlds(&mut self, worlds: Vec<WorldInfo>) {
        self.worlds = worlds;
        self.selected_world = None;
    }

    /// Idempotent; a fresh login attempt always starts from an empty list.
    pub fn clear_worlds(&mut self) {
        self.worlds.clear();
        self.selected_world = None;
    }

    pub fn select_world(&mut self, index: usize) -> Option<&WorldInfo> {
        if index < self.worlds.len() {
            self.selected_world = Some(index);
            self.worlds.get(index)
        } else {
            None
        }
    }

    pub fn selected_world(&self) -> Option<&WorldInfo> {
        self.selected_world.and_then(|i| self.worlds.get(i))
    }

    /// Full reset at the start of a new login attempt or reconnect.
    pub fn reset(&mut self) {
        self.invalidate_token();
        self.clear_worlds();
        self.registration_enabled = false;
        self.protocol_version = 0;
        self.character_name = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(name: &str) -> WorldInfo {
        WorldInfo {
            host: "10.0.0.1".into(),
            port: 6901,
            name: name.into(),
            online_count: 0,
        }
    }

    #[test]
    fn clear_worlds_is_idempotent() {
        let mut s = Session::default();
        s.clear_worlds();
        assert!(s.worlds().is_empty());
        s.set_worlds(vec![world("Ashfall")]);
        s.clear_worlds();
        s.clear_worlds();
        assert!(s.worlds().is_empty());
    }

    #[test]
    fn selection_is_bounds_checked_and_cleared_with_the_list() {
        let mut s = Session::default();
        s.set_worlds(vec![world("Ashfall"), world("Emberline")]);
        assert!(s.select_world(2).is_none());
        assert!(s.select_world(1).is_some());
        assert_eq!(s.selected_world().unwrap().name, "Emberline");
        s.clear_worlds();
        assert!(s.selected_world().is_none());
    }

    #[test]
    fn reset_invalidates_token() {
        let mut s = Session::default();
        s.set_token(Token {
            account_id: 1,
            session_id: 2,
            auth_key: 3,
        });
        assert!(s.token().is_some());
        s.reset();
        assert!(s.token().is_none());
    }
}
