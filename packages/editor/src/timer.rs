//! Cancellable timers driven by caller-supplied instants.
//!
//! The editing engine never reads a clock. A timer is just a deadline owned
//! by whatever state machine armed it; dropping or cancelling that state drops
//! the timer with it, so nothing can fire after its owner has moved on.

use std::time::{Duration, Instant};

/// Delays a value until no newer value arrived for `delay`
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Arm (or re-arm) with `value`, replacing anything pending
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Release the pending value once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(&self.pending, Some((_, deadline)) if *deadline <= now);
        if ready {
            self.flush()
        } else {
            None
        }
    }

    /// Release the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Fires every `interval` while running
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    interval: Duration,
    next_fire: Option<Instant>,
}

impl RepeatingTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_fire: None,
        }
    }

    /// Start the timer; a running timer keeps its current phase
    pub fn start(&mut self, now: Instant) {
        if self.next_fire.is_none() {
            self.next_fire = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next_fire = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_fire.is_some()
    }

    /// Number of ticks that elapsed up to `now`
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next_fire else {
            return 0;
        };

        let mut ticks = 0;
        while next <= now {
            ticks += 1;
            next += self.interval;
            if self.interval.is_zero() {
                break;
            }
        }
        self.next_fire = Some(next);
        ticks
    }
}
