use crate::shared::logging::append_session_log_line;
use chrono::Utc;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolErrorRecord {
    pub tool: String,
    pub recorded_at: String,
}

/// Per-session mutable state the adapter needs: the caller's working
/// directory, the consecutive-mistake counter, and the tool-error journal.
/// Owned by the session, never process-global, so each test constructs a
/// fresh one.
#[derive(Debug, Clone)]
pub struct SessionContext {
    cwd: PathBuf,
    consecutive_mistake_count: u32,
    tool_errors: Vec<ToolErrorRecord>,
    log_root: Option<PathBuf>,
}

impl SessionContext {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            consecutive_mistake_count: 0,
            tool_errors: Vec::new(),
            log_root: None,
        }
    }

    pub fn with_log_root(mut self, log_root: impl Into<PathBuf>) -> Self {
        self.log_root = Some(log_root.into());
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn consecutive_mistake_count(&self) -> u32 {
        self.consecutive_mistake_count
    }

    pub fn tool_errors(&self) -> &[ToolErrorRecord] {
        &self.tool_errors
    }

    /// A user-correctable validation failure: bump the counter and journal
    /// the offending tool.
    pub fn note_mistake(&mut self, tool: &str) {
        self.consecutive_mistake_count = self.consecutive_mistake_count.saturating_add(1);
        self.tool_errors.push(ToolErrorRecord {
            tool: tool.to_string(),
            recorded_at: Utc::now().to_rfc3339(),
        });
    }

    pub fn reset_mistakes(&mut self) {
        self.consecutive_mistake_count = 0;
    }

    /// Best-effort session log append; a missing or unwritable log root
    /// never fails the request.
    pub fn log(&self, line: &str) {
        if let Some(root) = self.log_root.as_deref() {
            let _ = append_session_log_line(root, &format!("{} {line}", Utc::now().to_rfc3339()));
        }
    }
}
