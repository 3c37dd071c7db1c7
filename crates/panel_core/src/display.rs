//! Shared status and log cells rendered by front ends.
//!
//! Both cells are last-write-wins: every write replaces the previous value
//! and subscribers only ever see the latest one.

use std::fmt;

use shared::domain::StatusSeverity;
use tokio::sync::watch;

pub const LOGS_FETCHING_PLACEHOLDER: &str = "Fetching logs...";
pub const LOGS_EMPTY_PLACEHOLDER: &str = "No recent log entries found.";
pub const LOGS_FAILED_PLACEHOLDER: &str = "Error fetching logs.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusDisplay {
    pub severity: StatusSeverity,
    pub message: String,
}

impl StatusDisplay {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(StatusSeverity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(StatusSeverity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusSeverity::Error, message)
    }

    fn new(severity: StatusSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogBuffer {
    /// Nothing fetched yet.
    #[default]
    Blank,
    Fetching,
    Entries(String),
    NoEntries,
    FetchFailed,
}

impl LogBuffer {
    pub fn from_reply_text(logs: Option<String>) -> Self {
        match logs {
            Some(text) if !text.is_empty() => LogBuffer::Entries(text),
            _ => LogBuffer::NoEntries,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            LogBuffer::Blank => "",
            LogBuffer::Fetching => LOGS_FETCHING_PLACEHOLDER,
            LogBuffer::Entries(text) => text,
            LogBuffer::NoEntries => LOGS_EMPTY_PLACEHOLDER,
            LogBuffer::FetchFailed => LOGS_FAILED_PLACEHOLDER,
        }
    }
}

impl fmt::Display for LogBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Owner of the single status display and log buffer.
pub struct PanelView {
    status: watch::Sender<StatusDisplay>,
    logs: watch::Sender<LogBuffer>,
}

impl Default for PanelView {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelView {
    pub fn new() -> Self {
        let (status, _) = watch::channel(StatusDisplay::default());
        let (logs, _) = watch::channel(LogBuffer::default());
        Self { status, logs }
    }

    pub fn status(&self) -> StatusDisplay {
        self.status.borrow().clone()
    }

    pub fn set_status(&self, status: StatusDisplay) {
        self.status.send_replace(status);
    }

    pub fn subscribe_status(&self) -> watch::Receiver<StatusDisplay> {
        self.status.subscribe()
    }

    pub fn logs(&self) -> LogBuffer {
        self.logs.borrow().clone()
    }

    pub fn set_logs(&self, logs: LogBuffer) {
        self.logs.send_replace(logs);
    }

    pub fn subscribe_logs(&self) -> watch::Receiver<LogBuffer> {
        self.logs.subscribe()
    }
}
