use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "hacker_forum=info,forum_core=info";

/// Where the log file lives. The terminal belongs to the UI, so logs go here.
pub fn log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("hacker-forum").join("forum.log"))
}

/// Install the file-backed subscriber. Returns the log path, or `None` if the
/// file couldn't be opened and logging is off for this run.
pub fn init() -> Option<PathBuf> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok()?;

    Some(path)
}
