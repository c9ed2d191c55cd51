//! Positional partitioning and one scoped thread per chunk.

use std::slice::Chunks;
use std::thread::{Scope, ScopedJoinHandle};

use crate::http::HttpGet;
use crate::model::WorkItem;

use super::message::StatusSender;
use super::processor::ItemProcessor;
use super::worker::Worker;

/// Consecutive chunks of at most `worker_size` items (0 is treated as 1).
pub fn partition<T>(items: &[T], worker_size: usize) -> Chunks<'_, T> {
    items.chunks(worker_size.max(1))
}

/// `ceil(item_count / worker_size)`.
pub fn worker_count(item_count: usize, worker_size: usize) -> usize {
    item_count.div_ceil(worker_size.max(1))
}

#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    worker_size: usize,
}

impl Dispatcher {
    pub fn new(worker_size: usize) -> Self {
        Self {
            worker_size: worker_size.max(1),
        }
    }

    pub fn worker_size(&self) -> usize {
        self.worker_size
    }

    pub fn worker_count(&self, item_count: usize) -> usize {
        worker_count(item_count, self.worker_size)
    }

    /// Spawns one worker per chunk inside `scope`. Each worker gets a clone of
    /// `tx`; the original is dropped on return, so the receiver disconnects
    /// once the last worker finishes.
    pub fn dispatch<'scope, 'env, C: HttpGet>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        processor: &'env ItemProcessor<C>,
        items: &'env [WorkItem],
        tx: StatusSender,
    ) -> Vec<ScopedJoinHandle<'scope, usize>> {
        partition(items, self.worker_size)
            .enumerate()
            .map(|(index, chunk)| {
                let worker = Worker::new(index + 1, processor, tx.clone());
                scope.spawn(move || worker.run(chunk))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_items_by_three() {
        let items: Vec<u32> = (0..7).collect();
        let sizes: Vec<usize> = partition(&items, 3).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(worker_count(7, 3), 3);
    }

    #[test]
    fn chunk_boundaries() {
        let items: Vec<u32> = (0..4).collect();
        let chunks: Vec<&[u32]> = partition(&items, 3).collect();
        let expected: [&[u32]; 2] = [&[0, 1, 2], &[3]];
        assert_eq!(chunks, expected);
        assert_eq!(worker_count(4, 3), 2);
        assert_eq!(worker_count(6, 3), 2);
        assert_eq!(worker_count(1, 3), 1);
    }

    #[test]
    fn empty_list_spawns_nothing() {
        let items: Vec<u32> = Vec::new();
        assert_eq!(partition(&items, 3).count(), 0);
        assert_eq!(worker_count(0, 3), 0);
    }

    #[test]
    fn zero_size_treated_as_one() {
        let items: Vec<u32> = (0..3).collect();
        assert_eq!(partition(&items, 0).count(), 3);
        assert_eq!(Dispatcher::new(0).worker_size(), 1);
        assert_eq!(Dispatcher::new(0).worker_count(3), 3);
    }
}
