//! Status messages flowing from workers to the collector.

use std::fmt;
use std::sync::mpsc::{self, Receiver, SyncSender};

/// Messages every item produces, in order: metadata outcome, download
/// announce, download outcome. The collector's expected count depends on it.
pub const MESSAGES_PER_ITEM: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Progress only (no outcome tag).
    Info,
    Success,
    Error,
}

/// One report from a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// 1-based chunk index of the worker that produced it.
    pub worker: usize,
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(worker: usize, text: impl Into<String>) -> Self {
        Self::new(worker, StatusKind::Info, text)
    }

    pub fn success(worker: usize, text: impl Into<String>) -> Self {
        Self::new(worker, StatusKind::Success, text)
    }

    pub fn error(worker: usize, text: impl Into<String>) -> Self {
        Self::new(worker, StatusKind::Error, text)
    }

    fn new(worker: usize, kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            worker,
            kind,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StatusKind::Info => write!(f, "{} - {}", self.worker, self.text),
            StatusKind::Success => write!(f, "SUCCESS {} - {}", self.worker, self.text),
            StatusKind::Error => write!(f, "ERROR {} - {}", self.worker, self.text),
        }
    }
}

pub type StatusSender = SyncSender<StatusMessage>;
pub type StatusReceiver = Receiver<StatusMessage>;

/// Bounded status channel. Senders block while `depth` messages are pending.
pub fn status_channel(depth: usize) -> (StatusSender, StatusReceiver) {
    mpsc::sync_channel(depth)
}
