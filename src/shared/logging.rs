use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn session_log_path(log_root: &Path) -> PathBuf {
    log_root.join("logs/session.log")
}

pub fn append_session_log_line(log_root: &Path, line: &str) -> std::io::Result<()> {
    let path = session_log_path(log_root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    writeln!(file, "{line}")
}
