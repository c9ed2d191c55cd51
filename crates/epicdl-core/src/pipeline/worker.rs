//! One worker: a chunk of items processed strictly in order.

use std::sync::mpsc::SendError;

use crate::http::HttpGet;
use crate::model::WorkItem;

use super::message::{StatusMessage, StatusSender};
use super::processor::ItemProcessor;

pub struct Worker<'a, C> {
    id: usize,
    processor: &'a ItemProcessor<C>,
    tx: StatusSender,
}

impl<'a, C: HttpGet> Worker<'a, C> {
    pub fn new(id: usize, processor: &'a ItemProcessor<C>, tx: StatusSender) -> Self {
        Self { id, processor, tx }
    }

    /// Processes `chunk` in order, sending three messages per item. A failed
    /// item does not stop the chunk; a closed channel does.
    /// Returns the number of items fully reported.
    pub fn run(self, chunk: &[WorkItem]) -> usize {
        tracing::debug!(worker = self.id, items = chunk.len(), "worker started");
        let mut reported = 0;
        for item in chunk {
            if self.process_item(item).is_err() {
                tracing::warn!(worker = self.id, "status channel closed, stopping worker");
                break;
            }
            reported += 1;
        }
        tracing::debug!(worker = self.id, reported, "worker finished");
        reported
    }

    fn process_item(&self, item: &WorkItem) -> Result<(), SendError<StatusMessage>> {
        let processor = self.processor;
        self.tx.send(processor.persist_metadata(self.id, item))?;
        let url = processor.asset_url(item);
        self.tx.send(processor.announce(self.id, &url))?;
        self.tx.send(processor.fetch_asset(self.id, item, &url))?;
        Ok(())
    }
}
