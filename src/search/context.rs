//! Per-decision search context: randomness, statistics, cooperative
//! yielding, and cancellation.
//!
//! Strategies call `checkpoint()` at every node or sample. Every
//! `yield_interval` of wall-clock work it yields the thread back to the OS
//! scheduler, and it reports whether the search should stop because the
//! cancel token fired or the deadline passed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::stats::SearchStats;
use crate::core::GameRng;

/// Shared stop flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Mutable state threaded through one strategy invocation.
#[derive(Debug)]
pub struct SearchContext {
    rng: GameRng,
    stats: SearchStats,
    cancel: CancelToken,
    yield_interval: Duration,
    started: Instant,
    last_yield: Instant,
    deadline: Option<Instant>,
}

impl SearchContext {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rng(GameRng::new(seed))
    }

    #[must_use]
    pub fn with_rng(rng: GameRng) -> Self {
        let now = Instant::now();
        Self {
            rng,
            stats: SearchStats::default(),
            cancel: CancelToken::new(),
            yield_interval: Duration::from_millis(100),
            started: now,
            last_yield: now,
            deadline: None,
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn with_yield_interval(mut self, interval: Duration) -> Self {
        self.set_yield_interval(interval);
        self
    }

    pub fn set_yield_interval(&mut self, interval: Duration) {
        self.yield_interval = interval;
    }

    #[must_use]
    pub fn yield_interval(&self) -> Duration {
        self.yield_interval
    }

    /// Stop searching once `budget` has elapsed from now.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.deadline = Some(Instant::now() + budget);
        self
    }

    pub fn rng(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }

    #[must_use]
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Reset timers and counters before a new decision. The RNG stream
    /// continues.
    pub fn begin(&mut self) {
        let now = Instant::now();
        self.stats.reset();
        self.started = now;
        self.last_yield = now;
    }

    /// Record elapsed time into the statistics.
    pub fn finish(&mut self) {
        self.stats.time_us = self.started.elapsed().as_micros() as u64;
    }

    /// Yield point. Returns `true` when the search should stop.
    pub fn checkpoint(&mut self) -> bool {
        if self.stop_requested() {
            self.stats.cancelled = true;
            return true;
        }
        if self.last_yield.elapsed() >= self.yield_interval {
            std::thread::yield_now();
            self.stats.yields += 1;
            self.last_yield = Instant::now();
        }
        false
    }

    /// Cancel token fired or deadline passed. Does not yield.
    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
