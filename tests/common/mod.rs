//! Shared test infrastructure for blink-sequencer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use blink_sequencer::{Duration, Instant, Output, TimeSource};

// ============================================================================
// Mock Output
// ============================================================================

/// Mock output that records every level it is driven to
pub struct MockOutput {
    active: bool,
    activations: usize,
    history: heapless::Vec<bool, 128>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self {
            active: false,
            activations: 0,
            history: heapless::Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of inactive-to-active transitions seen
    pub fn activations(&self) -> usize {
        self.activations
    }

    pub fn history(&self) -> &[bool] {
        &self.history
    }
}

impl Output for MockOutput {
    fn set_active(&mut self, active: bool) {
        if active && !self.active {
            self.activations += 1;
        }
        self.active = active;
        let _ = self.history.push(active);
    }
}

/// Builds a ring of fresh mock outputs
pub fn mock_outputs<const N: usize>() -> [MockOutput; N] {
    core::array::from_fn(|_| MockOutput::new())
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<Instant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            current_time: core::cell::Cell::new(Instant::from_millis(millis)),
        }
    }

    /// Advance time by the given number of milliseconds, wrapping like a hardware counter
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time
            .set(current.wrapping_add(Duration::from_millis(millis)));
    }

    pub fn set_time(&self, millis: u32) {
        self.current_time.set(Instant::from_millis(millis));
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Instant {
        self.current_time.get()
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub fn ms(millis: u32) -> Duration {
    Duration::from_millis(millis)
}

/// Small deterministic xorshift generator for jittered call patterns
pub struct Jitter(u32);

impl Jitter {
    pub fn new(seed: u32) -> Self {
        Jitter(seed.max(1))
    }

    /// Returns a value in `0..bound`
    pub fn next_below(&mut self, bound: u32) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x % bound
    }
}
