//! Concurrent batch-fetch pipeline.
//!
//! The dispatcher splits the work list into chunks and starts one worker
//! thread per chunk. Workers push three status messages per item into a
//! bounded channel; the collector drains it on the calling thread. All worker
//! threads are joined before `run_batch` returns.

mod collector;
mod dispatcher;
mod message;
mod processor;
mod worker;

pub use collector::{CollectReport, Collector};
pub use dispatcher::{partition, worker_count, Dispatcher};
pub use message::{
    status_channel, StatusKind, StatusMessage, StatusReceiver, StatusSender, MESSAGES_PER_ITEM,
};
pub use processor::ItemProcessor;
pub use worker::Worker;

use std::thread;

use crate::config::EpicConfig;
use crate::http::HttpGet;
use crate::model::WorkItem;

/// Batch shape: chunk size and status channel depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub worker_size: usize,
    pub channel_depth: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            worker_size: 3,
            channel_depth: 1,
        }
    }
}

impl BatchOptions {
    pub fn from_config(cfg: &EpicConfig) -> Self {
        Self {
            worker_size: cfg.worker_size,
            channel_depth: cfg.channel_depth,
        }
    }
}

/// Outcome of one batch. Failures are counted, never raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub items: usize,
    pub workers: usize,
    pub collected: CollectReport,
    /// Worker threads that panicked (their remaining messages are missing).
    pub panicked_workers: usize,
}

/// Runs the whole fan-out for `items`, handing every status message to
/// `display` on the calling thread. Returns once all workers have joined.
pub fn run_batch<C, F>(
    processor: &ItemProcessor<C>,
    items: &[WorkItem],
    options: BatchOptions,
    display: F,
) -> BatchReport
where
    C: HttpGet,
    F: FnMut(&StatusMessage),
{
    let dispatcher = Dispatcher::new(options.worker_size);
    let collector = Collector::for_items(items.len());
    let workers = dispatcher.worker_count(items.len());
    tracing::info!(
        items = items.len(),
        workers,
        worker_size = dispatcher.worker_size(),
        "batch started"
    );

    let (tx, rx) = status_channel(options.channel_depth);
    let (collected, panicked_workers) = thread::scope(|scope| {
        let handles = dispatcher.dispatch(scope, processor, items, tx);
        let collected = collector.drain(rx, display);
        let mut panicked = 0;
        for handle in handles {
            if handle.join().is_err() {
                panicked += 1;
            }
        }
        (collected, panicked)
    });

    if panicked_workers > 0 {
        tracing::error!(panicked_workers, "worker thread(s) panicked");
    }
    tracing::info!(
        received = collected.received,
        expected = collected.expected,
        errors = collected.errors,
        "batch finished"
    );

    BatchReport {
        items: items.len(),
        workers,
        collected,
        panicked_workers,
    }
}
