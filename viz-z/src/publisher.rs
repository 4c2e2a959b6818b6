use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;
use zenoh::Result;

use crate::pubsub::ZPub;
use crate::ros_msg::{MarkerArray, Time};
use crate::snapshot::SnapshotSource;

/// Cooperative cancellation flag, polled by the publish loop between
/// iterations. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Republishes a snapshot source on a fixed period until cancelled.
///
/// Each iteration fetches the current snapshot, restamps it with the wall
/// clock and publishes it. Cancellation is checked once per iteration and is
/// not preemptible mid-iteration; a publish failure is not retried, it
/// propagates out of `run`.
pub struct MarkerPublishLoop<S: SnapshotSource> {
    zpub: ZPub<MarkerArray>,
    source: S,
    period: Duration,
}

impl<S: SnapshotSource> MarkerPublishLoop<S> {
    pub fn new(zpub: ZPub<MarkerArray>, source: S, period: Duration) -> Self {
        Self {
            zpub,
            source,
            period,
        }
    }

    /// Fetch, stamp and publish one snapshot.
    pub fn publish_once(&self) -> Result<()> {
        let mut array = self.source.current_snapshot();
        array.restamp(Time::now());
        self.zpub.publish(&array)
    }

    pub fn run(&self, cancel: &CancelToken) -> Result<()> {
        debug!(
            "Publish loop started: topic={}, period={:?}",
            self.zpub.entity.topic, self.period
        );
        while !cancel.is_cancelled() {
            self.publish_once()?;
            std::thread::sleep(self.period);
        }
        debug!("Publish loop cancelled: topic={}", self.zpub.entity.topic);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_live_and_latches() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());
    }
}
