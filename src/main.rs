use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use async_std::net::TcpStream;
use async_std::task;
use network::{FrameReader, FrameWriter};

use tourmaline::events::{Channel, ChatLog, NetworkEvent, Notice, NullChatLog, UiSink};
use tourmaline::network::flush_outbox;
use tourmaline::runtime::Client;
use tourmaline::settings::Settings;

/// Terminal presentation for the protocol layer.
struct StdoutSink;

impl UiSink for StdoutSink {
    fn append_line(&mut self, channel: Channel, text: &str) {
        println!("[{}] {}", channel.name(), text);
    }

    fn notify(&mut self, event: Notice) {
        match event {
            Notice::WorldsAvailable(count) => {
                println!("* {count} world(s) available");
            }
            other => tracing::debug!(?other, "notice"),
        }
    }
}

/// Appends chat lines to one file per channel. Best-effort by contract.
struct FileChatLog {
    dir: PathBuf,
}

impl ChatLog for FileChatLog {
    fn log(&mut self, channel: &str, line: &str) {
        let path = self.dir.join(format!("{channel}.log"));
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{line}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tourmaline=info".into()),
        )
        .init();

    let settings = Settings::load();
    let server = settings
        .current_server()
        .cloned()
        .context("no server selected in settings")?;
    let family = server.family();
    tracing::info!(server = %server.name, family = family.name(), "starting");

    let mut client = Client::new(family);
    settings.apply_to(&mut client);

    let stream = task::block_on(TcpStream::connect(&server.address))
        .with_context(|| format!("connecting to {}", server.address))?;
    let stream = Arc::new(stream);
    let mut writer = FrameWriter::new(Arc::clone(&stream));

    let (tx, rx) = crossbeam_channel::unbounded::<NetworkEvent>();
    {
        let stream = Arc::clone(&stream);
        let lengths = family.lengths();
        let tx = tx.clone();
        task::spawn(async move {
            let mut reader = FrameReader::new(stream, lengths);
            let _ = tx.send(NetworkEvent::Connected);
            loop {
                match reader.read().await {
                    Ok((opcode, payload)) => {
                        if tx.send(NetworkEvent::Message(opcode, payload)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "connection lost");
                        let _ = tx.send(NetworkEvent::Disconnected);
                        break;
                    }
                }
            }
        });
    }

    let mut ui = StdoutSink;
    let mut log: Box<dyn ChatLog> = if settings.chat.log_to_file {
        Box::new(FileChatLog {
            dir: tourmaline::chat_log_dir(),
        })
    } else {
        Box::new(NullChatLog)
    };

    // One event at a time, in arrival order; frames queued by handlers are
    // flushed between events.
    for event in rx.iter() {
        let connected = matches!(event, NetworkEvent::Connected);
        let disconnected = matches!(event, NetworkEvent::Disconnected);
        client.handle_event(event, &mut ui, log.as_mut());

        if connected {
            if let (Ok(user), Ok(pass)) = (
                std::env::var("TOURMALINE_USER"),
                std::env::var("TOURMALINE_PASS"),
            ) {
                if let Err(e) = client.login(&user, &pass) {
                    tracing::error!(error = %e, "login refused");
                }
            } else {
                tracing::info!("set TOURMALINE_USER and TOURMALINE_PASS to log in");
            }
        }

        let outbox = client.outbox();
        task::block_on(flush_outbox(&outbox, &mut writer)).context("writing to server")?;
        if disconnected {
            break;
        }
    }
    Ok(())
}
