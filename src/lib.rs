pub mod dispatch;
pub mod error;
pub mod events;
pub mod handlers;
pub mod network;
pub mod protocol;
pub mod runtime;
pub mod session;
pub mod settings;

pub fn storage_dir() -> std::path::PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    path.push("Tourmaline");
    let _ = std::fs::create_dir_all(&path);
    path
}

pub fn chat_log_dir() -> std::path::PathBuf {
    let path = storage_dir().join("logs");
    let _ = std::fs::create_dir_all(&path);
    path
}
