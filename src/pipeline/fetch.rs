// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Boundary throttling - the fetch gate and the paced batch runner
//!
//! Neither does any I/O itself. The gate is handed to whatever transport
//! fetches mesh bytes so at most one fetch is in flight system-wide; the
//! batch runner serializes library-wide analysis with pacing so the
//! origin is not hammered.

use crate::config::BatchSettings;
use std::sync::{Condvar, Mutex};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default)]
struct GateState {
    next_ticket: u64,
    now_serving: u64,
    held: bool,
}

/// Single-flight mutual-exclusion gate with FIFO ordering.
///
/// Callers acquire before fetching and release (by dropping the permit)
/// after the fetch completes or errors. Waiters are served in ticket
/// order and re-check at a bounded poll interval.
#[derive(Debug)]
pub struct FetchGate {
    state: Mutex<GateState>,
    available: Condvar,
    poll_interval: Duration,
}

impl FetchGate {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            state: Mutex::new(GateState::default()),
            available: Condvar::new(),
            poll_interval,
        }
    }

    pub fn from_settings(settings: &BatchSettings) -> Self {
        Self::new(Duration::from_millis(settings.gate_poll_ms))
    }

    /// Block until this caller holds the gate. FIFO across callers.
    pub fn acquire(&self) -> FetchPermit<'_> {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let ticket = state.next_ticket;
        state.next_ticket += 1;

        while state.held || state.now_serving != ticket {
            state = match self.available.wait_timeout(state, self.poll_interval) {
                Ok((guard, _timeout)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }

        state.held = true;
        debug!(ticket, "fetch gate acquired");
        FetchPermit { gate: self }
    }

    fn release(&self) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.held = false;
        state.now_serving += 1;
        drop(state);
        self.available.notify_all();
    }
}

impl Default for FetchGate {
    fn default() -> Self {
        Self::from_settings(&BatchSettings::default())
    }
}

/// RAII permit; dropping it releases the gate
#[derive(Debug)]
pub struct FetchPermit<'a> {
    gate: &'a FetchGate,
}

impl Drop for FetchPermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}

/// Serialized batch processing with pacing between items.
///
/// A single invocation handles at most `max_per_run` items so a large
/// backlog is drained across invocations instead of synchronously.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    pacing: Duration,
    max_per_run: usize,
}

impl BatchRunner {
    pub fn new(pacing: Duration, max_per_run: usize) -> Self {
        Self {
            pacing,
            max_per_run,
        }
    }

    pub fn from_settings(settings: &BatchSettings) -> Self {
        Self::new(
            Duration::from_millis(settings.pacing_ms),
            settings.max_per_run,
        )
    }

    /// Process the head of `pending` one item at a time, sleeping the
    /// pacing delay between items. Returns how many items were handled.
    pub fn run<T, F>(&self, pending: &[T], mut handler: F) -> usize
    where
        F: FnMut(&T),
    {
        let take = pending.len().min(self.max_per_run);
        for (index, item) in pending[..take].iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                std::thread::sleep(self.pacing);
            }
            handler(item);
        }
        if take < pending.len() {
            debug!(
                handled = take,
                remaining = pending.len() - take,
                "batch capped, remainder deferred"
            );
        }
        take
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::from_settings(&BatchSettings::default())
    }
}
