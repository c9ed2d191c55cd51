//! The single consumer of the status channel.

use super::message::{StatusMessage, StatusReceiver, MESSAGES_PER_ITEM};

/// What the collector saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectReport {
    pub expected: usize,
    pub received: usize,
    pub errors: usize,
}

impl CollectReport {
    /// True when the three-messages-per-item contract held.
    pub fn is_complete(&self) -> bool {
        self.received == self.expected
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Collector {
    expected: usize,
}

impl Collector {
    pub fn for_items(item_count: usize) -> Self {
        Self {
            expected: item_count * MESSAGES_PER_ITEM,
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Receives until every sender has been dropped, passing each message to
    /// `display` in arrival order. Ending on disconnect rather than on the
    /// expected count means a miscount can neither hang nor truncate.
    pub fn drain<F>(&self, rx: StatusReceiver, mut display: F) -> CollectReport
    where
        F: FnMut(&StatusMessage),
    {
        let mut report = CollectReport {
            expected: self.expected,
            ..CollectReport::default()
        };
        for msg in rx.iter() {
            report.received += 1;
            if msg.is_error() {
                report.errors += 1;
            }
            display(&msg);
        }
        if !report.is_complete() {
            tracing::warn!(
                expected = report.expected,
                received = report.received,
                "status message count mismatch"
            );
        }
        report
    }
}
