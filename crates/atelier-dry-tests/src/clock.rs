// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Hand-driven clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use atelier_editor::{Clock, Timestamp};

/// Clock whose time only moves when a test says so.
///
/// Clones share the same time source, so a test can keep one handle while
/// the editor owns another. With a non-zero step every read also advances
/// the clock, which makes each mutation land on a distinct timestamp.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
    step: u64,
}

impl ManualClock {
    /// Clock frozen at `start` milliseconds.
    pub fn new(start: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(start)),
            step: 0,
        }
    }

    /// Clock that advances by `step` milliseconds after every read.
    pub fn stepping(start: u64, step: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(start)),
            step,
        }
    }

    /// Moves time forward.
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Jumps to an absolute time, including backwards.
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// Current time without advancing.
    pub fn peek(&self) -> Timestamp {
        Timestamp(self.millis.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.millis.fetch_add(self.step, Ordering::SeqCst))
    }
}
