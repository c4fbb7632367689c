//! Global request throttle.
//!
//! One shared slot for every route and every client: a request is accepted
//! only if at least `min_interval` has passed since the last accepted one.
//! Rejected requests do not move the slot.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::observability::metrics;

/// Timestamp of the last accepted request, guarded for atomic check-and-set.
pub struct Throttle {
    min_interval: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Try to accept a request arriving now.
    ///
    /// The clock is read while the slot is held, so two concurrent callers
    /// can never both pass for the same instant.
    pub fn try_acquire(&self) -> bool {
        let mut last = self.slot();
        let accepted = admit(&mut last, Instant::now(), self.min_interval);
        drop(last);

        if !accepted {
            metrics::record_throttled();
        }
        accepted
    }

    /// Try to accept a request arriving at `now`.
    pub fn try_acquire_at(&self, now: Instant) -> bool {
        let mut last = self.slot();
        admit(&mut last, now, self.min_interval)
    }

    fn slot(&self) -> MutexGuard<'_, Option<Instant>> {
        // The slot is a plain timestamp; a panic elsewhere cannot leave it torn.
        self.last_accepted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn admit(last: &mut Option<Instant>, now: Instant, min_interval: Duration) -> bool {
    if let Some(previous) = *last {
        if now.saturating_duration_since(previous) < min_interval {
            return false;
        }
    }
    *last = Some(now);
    true
}
