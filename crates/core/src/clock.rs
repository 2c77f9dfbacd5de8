// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for time-dependent logic.
//!
//! Timer arithmetic uses monotonic instants; schedule matching and audit
//! timestamps use wall-clock time. Both come from the same `Clock` so tests
//! can drive them together with [`FakeClock`].

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of time for the engine and daemon.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Monotonic instant for timer deadlines.
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> u64;

    /// Wall-clock time as UTC, for schedule matching.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct FakeClockState {
    start: Instant,
    elapsed: Duration,
    epoch_base_ms: u64,
}

/// Controllable clock for tests.
///
/// Starts at an arbitrary instant with epoch 0; `advance` moves the monotonic
/// and wall-clock views together. Clones share the same underlying state.
#[derive(Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<FakeClockState>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeClockState {
                start: Instant::now(),
                elapsed: Duration::ZERO,
                epoch_base_ms: 0,
            })),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.inner.lock().elapsed += duration;
    }

    /// Set the wall-clock reading so that `epoch_ms()` returns `ms` now.
    pub fn set_epoch_ms(&self, ms: u64) {
        let mut state = self.inner.lock();
        let elapsed_ms = state.elapsed.as_millis() as u64;
        state.epoch_base_ms = ms.saturating_sub(elapsed_ms);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        let state = self.inner.lock();
        state.start + state.elapsed
    }

    fn epoch_ms(&self) -> u64 {
        let state = self.inner.lock();
        state.epoch_base_ms + state.elapsed.as_millis() as u64
    }

    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.epoch_ms() as i64).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
