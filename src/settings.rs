use std::fs;

use tracing::{error, info};

use crate::protocol::ProtocolFamily;
use crate::runtime::Client;
use crate::storage_dir;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct ServerEntry {
    pub id: u32,
    pub name: String,
    pub address: String,
    /// "classic" or "extended"; anything else falls back to classic.
    pub family: String,
}

impl ServerEntry {
    pub fn family(&self) -> ProtocolFamily {
        match self.family.as_str() {
            "extended" => ProtocolFamily::Extended,
            "classic" => ProtocolFamily::Classic,
            other => {
                error!(family = other, server = %self.name, "unknown family, using classic");
                ProtocolFamily::Classic
            }
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct ChatSettings {
    pub log_to_file: bool,
    pub show_party_online: bool,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct GameplaySettings {
    pub current_server_id: Option<u32>,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub chat: ChatSettings,
    pub gameplay: GameplaySettings,
    pub servers: Vec<ServerEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chat: ChatSettings {
                log_to_file: true,
                show_party_online: true,
            },
            gameplay: GameplaySettings {
                current_server_id: Some(1),
            },
            servers: vec![
                ServerEntry {
                    id: 1,
                    name: "Ashfall Official".to_string(),
                    address: "play.ashfall.example:6900".to_string(),
                    family: "classic".to_string(),
                },
                ServerEntry {
                    id: 2,
                    name: "Emberline (community)".to_string(),
                    address: "ember.ashfall.example:6900".to_string(),
                    family: "extended".to_string(),
                },
            ],
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        let path = storage_dir().join("settings.toml");
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<Settings>(&content) {
                    Ok(s) => {
                        info!("Loaded settings from {:?}", path);
                        s
                    }
                    Err(e) => {
                        error!("Failed to parse settings.toml: {}", e);
                        Settings::default()
                    }
                },
                Err(e) => {
                    error!("Failed to read settings.toml: {}", e);
                    Settings::default()
                }
            }
        } else {
            info!("Creating default settings at {:?}", path);
            let settings = Settings::default();
            settings.save();
            settings
        }
    }

    pub fn save(&self) {
        let path = storage_dir().join("settings.toml");
        match toml::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    error!("Failed to write settings.toml: {}", e);
                } else {
                    info!("Saved settings to {:?}", path);
                }
            }
            Err(e) => error!("Failed to serialize settings: {}", e),
        }
    }

    pub fn current_server(&self) -> Option<&ServerEntry> {
        let id = self.gameplay.current_server_id?;
        self.servers.iter().find(|s| s.id == id)
    }

    /// Pushes every handler-relevant option into the client. Call after
    /// load and after any edit.
    pub fn apply_to(&self, client: &mut Client) {
        client.option_changed(
            "party.show-online",
            if self.chat.show_party_online { "true" } else { "false" },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_round_trip_through_toml() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back.servers.len(), 2);
        assert_eq!(back.servers[1].family(), ProtocolFamily::Extended);
        assert!(back.chat.show_party_online);
    }

    #[test]
    fn unknown_family_string_falls_back_to_classic() {
        let entry = ServerEntry {
            id: 9,
            name: "odd".into(),
            address: "x:1".into(),
            family: "quantum".into(),
        };
        assert_eq!(entry.family(), ProtocolFamily::Classic);
    }

    #[test]
    fn apply_to_reaches_the_party_handler() {
        use crate::events::NetworkEvent;
        use crate::events::doubles::{RecordingLog, RecordingSink};
        use packets::types::{MAP_LEN, NAME_LEN};

        let mut settings = Settings::default();
        settings.chat.show_party_online = false;

        let mut client = Client::new(ProtocolFamily::Classic);
        settings.apply_to(&mut client);

        // One-member classic roster frame.
        let mut payload = b"Ash Seekers".to_vec();
        payload.resize(NAME_LEN, 0);
        payload.extend_from_slice(&1u32.to_le_bytes());
        let mut name = b"Kes".to_vec();
        name.resize(NAME_LEN, 0);
        payload.extend_from_slice(&name);
        payload.extend_from_slice(&[0u8; MAP_LEN]);
        payload.extend_from_slice(&[1, 1]);

        let (mut ui, mut log) = (RecordingSink::default(), RecordingLog::default());
        client.handle_event(
            NetworkEvent::Message(u16::from(packets::classic::Codes::PartyInfo), payload),
            &mut ui,
            &mut log,
        );
        assert!(client.party_handler().in_party());
        // The roster line is suppressed by the setting.
        assert!(ui.lines.is_empty());
    }

    #[test]
    fn current_server_respects_the_selection() {
        let mut settings = Settings::default();
        settings.gameplay.current_server_id = Some(2);
        assert_eq!(settings.current_server().unwrap().name, "Emberline (community)");
        settings.gameplay.current_server_id = None;
        assert!(settings.current_server().is_none());
    }
}
