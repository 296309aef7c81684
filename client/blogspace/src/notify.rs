//! Transient user notices ("toasts")
//!
//! Call sites push a notice instead of propagating failures to the user
//! interface; the front end drains and renders them.

use std::fmt;
use std::sync::{Arc, Mutex};

use blog_types::ClientError;
use tracing::{error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.level {
            NoticeLevel::Success => "✔",
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Error => "✖",
        };
        write!(f, "{} {}", marker, self.message)
    }
}

/// Shared notice queue; clones push into the same queue
#[derive(Clone, Default)]
pub struct Notifier {
    queue: Arc<Mutex<Vec<Notice>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        info!(notice = %message, "success notice");
        self.push(NoticeLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        info!(notice = %message, "info notice");
        self.push(NoticeLevel::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(notice = %message, "error notice");
        self.push(NoticeLevel::Error, message);
    }

    /// Report a failed call: the full error goes to the log, the user sees
    /// the notice text
    pub fn failure(&self, context: &str, err: &ClientError) {
        error!(context, error = %err, "call failed");
        self.push(NoticeLevel::Error, err.notice_message());
    }

    /// Take every pending notice, oldest first
    pub fn drain(&self) -> Vec<Notice> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn push(&self, level: NoticeLevel, message: String) {
        let notice = Notice { level, message };
        match self.queue.lock() {
            Ok(mut queue) => queue.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
