use crate::error::{MaskError, Result};
use flume::{Receiver, Sender, TryRecvError, TrySendError};
use tracing::warn;

/// What the producer does when the consumer has fallen behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backpressure {
    /// Wait for room. Every result is delivered.
    #[default]
    Block,
    /// Evict the oldest queued result to make room for the newest.
    DropStale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Queued,
    /// Queued after evicting this many stale results.
    ReplacedStale(usize),
}

/// Producer half of a bounded single-consumer feed.
pub struct FeedSender<T> {
    tx: Sender<T>,
    // Only held under DropStale, so a dropped consumer still disconnects Block feeds.
    stale: Option<Receiver<T>>,
    dropped: u64,
}

pub struct FeedReceiver<T> {
    rx: Receiver<T>,
}

/// Create a feed holding at most `capacity` undelivered results.
pub fn bounded<T>(capacity: usize, policy: Backpressure) -> (FeedSender<T>, FeedReceiver<T>) {
    let (tx, rx) = flume::bounded(capacity.max(1));
    let stale = match policy {
        Backpressure::Block => None,
        Backpressure::DropStale => Some(rx.clone()),
    };

    (
        FeedSender {
            tx,
            stale,
            dropped: 0,
        },
        FeedReceiver { rx },
    )
}

impl<T> FeedSender<T> {
    pub fn policy(&self) -> Backpressure {
        match self.stale {
            Some(_) => Backpressure::DropStale,
            None => Backpressure::Block,
        }
    }

    /// Total results evicted over the life of this feed.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn push(&mut self, item: T) -> Result<Delivery> {
        let Some(stale) = &self.stale else {
            self.tx.send(item).map_err(|_| MaskError::FeedClosed)?;
            return Ok(Delivery::Queued);
        };

        // our own eviction handle counts as a receiver
        if self.tx.receiver_count() <= 1 {
            return Err(MaskError::FeedClosed);
        }

        let mut item = item;
        let mut evicted = 0;
        loop {
            match self.tx.try_send(item) {
                Ok(()) => break,
                Err(TrySendError::Disconnected(_)) => return Err(MaskError::FeedClosed),
                Err(TrySendError::Full(back)) => {
                    item = back;
                    if stale.try_recv().is_ok() {
                        evicted += 1;
                    }
                }
            }
        }

        if evicted == 0 {
            return Ok(Delivery::Queued);
        }
        self.dropped += evicted as u64;
        warn!(
            "Consumer behind, dropped {evicted} stale result(s) ({} total)",
            self.dropped
        );
        Ok(Delivery::ReplacedStale(evicted))
    }
}

impl<T> FeedReceiver<T> {
    /// Block until the next result. Fails once the producer is gone and the
    /// queue is drained.
    pub fn recv(&self) -> Result<T> {
        self.rx.recv().map_err(|_| MaskError::FeedClosed)
    }

    pub fn try_recv(&self) -> Result<Option<T>> {
        match self.rx.try_recv() {
            Ok(item) => Ok(Some(item)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(MaskError::FeedClosed),
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn block_delivers_everything_in_order() {
        let (mut tx, rx) = bounded(2, Backpressure::Block);
        let producer = thread::spawn(move || {
            for i in 0..10 {
                assert_eq!(tx.push(i), Ok(Delivery::Queued));
            }
        });

        let received: Vec<i32> = (0..10).map(|_| rx.recv().unwrap()).collect();
        producer.join().unwrap();
        assert_eq!(received, (0..10).collect::<Vec<_>>());
        assert_eq!(rx.recv(), Err(MaskError::FeedClosed));
    }

    #[test]
    fn drop_stale_keeps_newest() {
        let (mut tx, rx) = bounded(2, Backpressure::DropStale);
        assert_eq!(tx.push(1), Ok(Delivery::Queued));
        assert_eq!(tx.push(2), Ok(Delivery::Queued));
        assert_eq!(tx.push(3), Ok(Delivery::ReplacedStale(1)));
        assert_eq!(tx.push(4), Ok(Delivery::ReplacedStale(1)));
        assert_eq!(tx.dropped(), 2);

        assert_eq!(rx.try_recv(), Ok(Some(3)));
        assert_eq!(rx.try_recv(), Ok(Some(4)));
        assert_eq!(rx.try_recv(), Ok(None));
    }

    #[test]
    fn zero_capacity_still_queues_one() {
        let (mut tx, rx) = bounded(0, Backpressure::DropStale);
        tx.push("a").unwrap();
        tx.push("b").unwrap();
        assert_eq!(rx.len(), 1);
        assert_eq!(rx.recv(), Ok("b"));
    }

    #[test]
    fn push_fails_once_consumer_is_gone() {
        for policy in [Backpressure::Block, Backpressure::DropStale] {
            let (mut tx, rx) = bounded(4, policy);
            assert_eq!(tx.policy(), policy);
            drop(rx);
            assert_eq!(tx.push(()), Err(MaskError::FeedClosed));
        }
    }

    #[test]
    fn receiver_drains_before_closing() {
        let (mut tx, rx) = bounded(4, Backpressure::Block);
        tx.push(7).unwrap();
        drop(tx);
        assert_eq!(rx.try_recv(), Ok(Some(7)));
        assert_eq!(rx.try_recv(), Err(MaskError::FeedClosed));
    }
}
