//! Unbounded FIFO relay queue

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An unbounded FIFO queue of text messages, safe to share between the host
/// tick thread and the worker event loop.
///
/// `push` never blocks on capacity and `drain_all` removes the entire
/// current contents atomically with respect to other drains. `depth` is
/// advisory only: a producer may push the instant after it is read.
pub struct RelayQueue {
    inner: Mutex<VecDeque<String>>,
    depth: AtomicUsize,
}

impl RelayQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            depth: AtomicUsize::new(0),
        }
    }

    /// Append a message to the tail of the queue.
    pub fn push(&self, message: String) {
        let mut inner = self.inner.lock();
        inner.push_back(message);
        self.depth.store(inner.len(), Ordering::Release);
    }

    /// Remove and return every message currently in the queue, in the order
    /// they were pushed. Returns an empty vec when the queue is empty.
    pub fn drain_all(&self) -> Vec<String> {
        let mut inner = self.inner.lock();
        let drained = std::mem::take(&mut *inner);
        self.depth.store(0, Ordering::Release);
        drained.into()
    }

    /// Current number of queued messages.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }
}

impl Default for RelayQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_fifo_order_single_producer() {
        let queue = RelayQueue::new();
        for i in 0..100 {
            queue.push(format!("msg-{i}"));
        }

        let drained = queue.drain_all();
        assert_eq!(drained.len(), 100);
        for (i, msg) in drained.iter().enumerate() {
            assert_eq!(msg, &format!("msg-{i}"));
        }
    }

    #[test]
    fn test_drain_empties_queue() {
        let queue = RelayQueue::new();
        queue.push("one".to_string());
        queue.push("two".to_string());
        assert_eq!(queue.depth(), 2);

        let drained = queue.drain_all();
        assert_eq!(drained, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(queue.depth(), 0);
        assert!(queue.drain_all().is_empty());

        queue.push("three".to_string());
        assert_eq!(queue.depth(), 1);
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        let queue = Arc::new(RelayQueue::new());
        let producers = 4;
        let per_producer = 500;

        let handles: Vec<_> = (0..producers)
            .map(|p| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for i in 0..per_producer {
                        queue.push(format!("{p}:{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let drained = queue.drain_all();
        assert_eq!(drained.len(), producers * per_producer);

        // Per-producer submission order must survive the interleaving.
        let mut last_seen = vec![-1i64; producers];
        for msg in &drained {
            let (p, i) = msg.split_once(':').unwrap();
            let p: usize = p.parse().unwrap();
            let i: i64 = i.parse().unwrap();
            assert!(i > last_seen[p], "producer {p} out of order");
            last_seen[p] = i;
        }
        // And nothing is duplicated or dropped.
        for (p, last) in last_seen.iter().enumerate() {
            assert_eq!(*last, per_producer as i64 - 1, "producer {p} incomplete");
        }
    }

    #[test]
    fn test_concurrent_drains_partition_messages() {
        let queue = Arc::new(RelayQueue::new());
        for i in 0..1000 {
            queue.push(i.to_string());
        }

        let drainers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || queue.drain_all())
            })
            .collect();

        let mut all: Vec<String> = Vec::new();
        for handle in drainers {
            all.extend(handle.join().unwrap());
        }

        // Exactly one drain wins each message: a duplicate-free partition.
        all.sort_by_key(|s| s.parse::<usize>().unwrap());
        let expected: Vec<String> = (0..1000).map(|i| i.to_string()).collect();
        assert_eq!(all, expected);
        assert_eq!(queue.depth(), 0);
    }
}
