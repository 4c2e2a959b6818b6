use std::time::Duration;

/// Bounded sample queue with KeepLast semantics: pushing onto a full queue
/// evicts the oldest element instead of blocking the transport callback.
pub struct BoundedQueue<T> {
    tx: flume::Sender<T>,
    rx: flume::Receiver<T>,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = if capacity == usize::MAX {
            flume::unbounded()
        } else {
            flume::bounded(capacity.max(1))
        };
        Self { tx, rx }
    }

    pub fn push(&self, mut item: T) {
        loop {
            match self.tx.try_send(item) {
                Ok(()) => return,
                Err(flume::TrySendError::Full(back)) => {
                    let _ = self.rx.try_recv();
                    item = back;
                }
                Err(flume::TrySendError::Disconnected(_)) => return,
            }
        }
    }

    pub fn recv(&self) -> T {
        // Both ends live as long as self
        self.rx.recv().expect("queue disconnected")
    }

    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_newest_samples() {
        let queue = BoundedQueue::new(3);
        for i in 0..10 {
            queue.push(i);
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.try_recv(), Some(7));
        assert_eq!(queue.try_recv(), Some(8));
        assert_eq!(queue.try_recv(), Some(9));
        assert_eq!(queue.try_recv(), None);
    }

    #[test]
    fn recv_timeout_expires_when_empty() {
        let queue: BoundedQueue<u8> = BoundedQueue::new(2);
        assert!(queue.recv_timeout(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let queue = BoundedQueue::new(0);
        queue.push(1u8);
        assert_eq!(queue.try_recv(), Some(1));
    }
}
