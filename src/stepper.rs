//! Reversible LED chaser.
//!
//! [`DirectionalStepper`] keeps exactly one of `N` outputs asserted and moves
//! the asserted position once per step interval. The direction lives in a
//! separate [`Direction`] flag so an edge interrupt can flip it through a
//! shared reference while the periodic callback owns the stepper.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::output::Output;
use crate::time::{Duration, Instant};

/// Default step interval.
pub const DEFAULT_STEP_TIME: Duration = Duration::from_millis(500);

/// Rotation direction shared between the tick callback and an edge interrupt.
///
/// Only atomic loads and stores are used, so this works on cores without
/// compare-and-swap. [`toggle`](Self::toggle) is not a read-modify-write
/// instruction; call it from a single event source.
#[derive(Debug)]
pub struct Direction {
    clockwise: AtomicBool,
}

impl Direction {
    /// Creates a direction flag, usable in a `static`.
    pub const fn new(clockwise: bool) -> Self {
        Self {
            clockwise: AtomicBool::new(clockwise),
        }
    }

    /// Flips the rotation direction.
    pub fn toggle(&self) {
        let clockwise = self.clockwise.load(Ordering::Relaxed);
        self.clockwise.store(!clockwise, Ordering::Relaxed);
    }

    /// Sets the rotation direction.
    pub fn set_clockwise(&self, clockwise: bool) {
        self.clockwise.store(clockwise, Ordering::Relaxed);
    }

    /// Returns true when rotating clockwise.
    pub fn is_clockwise(&self) -> bool {
        self.clockwise.load(Ordering::Relaxed)
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Errors that can occur while creating a stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepperError {
    /// The output ring is empty.
    NoOutputs,
    /// The step interval is zero.
    ZeroStepTime,
}

impl core::fmt::Display for StepperError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StepperError::NoOutputs => write!(f, "stepper needs at least one output"),
            StepperError::ZeroStepTime => write!(f, "step interval must be non-zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StepperError {}

/// Runtime configuration for a [`DirectionalStepper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepperConfig {
    /// Time between steps.
    pub step_time: Duration,
}

impl StepperConfig {
    /// Sets the step interval.
    pub fn with_step_time(mut self, step_time: Duration) -> Self {
        self.step_time = step_time;
        self
    }
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            step_time: DEFAULT_STEP_TIME,
        }
    }
}

/// Moves a single asserted position around a ring of outputs.
///
/// A step fires when `now` enters a later period (`now / step_time`) than
/// the one that fired last, so ticks may arrive at any cadence: several
/// ticks inside one period step once, and a tick after a gap moves the
/// position once for every period the gap spans.
///
/// # Type Parameters
/// * `'d` - Lifetime of the shared direction flag
/// * `O` - Output type
/// * `N` - Number of positions in the ring
pub struct DirectionalStepper<'d, O: Output, const N: usize> {
    outputs: [O; N],
    direction: &'d Direction,
    step_time: Duration,
    index: usize,
    last_period: Option<u32>,
}

impl<'d, O: Output, const N: usize> DirectionalStepper<'d, O, N> {
    /// Creates a stepper with position 0 asserted and all others off.
    ///
    /// # Errors
    /// * `NoOutputs` - `N` is 0
    /// * `ZeroStepTime` - The configured step interval is zero
    pub fn new(
        mut outputs: [O; N],
        direction: &'d Direction,
        config: StepperConfig,
    ) -> Result<Self, StepperError> {
        if N == 0 {
            return Err(StepperError::NoOutputs);
        }
        if config.step_time == Duration::ZERO {
            return Err(StepperError::ZeroStepTime);
        }

        for (i, output) in outputs.iter_mut().enumerate() {
            output.set_active(i == 0);
        }

        Ok(Self {
            outputs,
            direction,
            step_time: config.step_time,
            index: 0,
            last_period: None,
        })
    }

    /// Advances the ring by one position per period elapsed since the last
    /// call, in the current direction.
    ///
    /// The first call only records the current period. Returns true if at
    /// least one period boundary was crossed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let period = now.as_millis() / self.step_time.as_millis();

        let elapsed = match self.last_period {
            Some(last) if last == period => return false,
            None => {
                self.last_period = Some(period);
                return false;
            }
            Some(last) if period > last => period - last,
            // Counter wrapped; the period index restarts at 0
            Some(last) => period + (u32::MAX / self.step_time.as_millis() - last) + 1,
        };
        self.last_period = Some(period);

        let steps = (elapsed as usize) % N;
        self.outputs[self.index].set_active(false);
        self.index = if self.direction.is_clockwise() {
            (self.index + steps) % N
        } else {
            (self.index + N - steps) % N
        };
        self.outputs[self.index].set_active(true);

        trace!("stepper: {} periods, position {}", elapsed, self.index);
        true
    }

    /// Flips the rotation direction.
    ///
    /// Interrupt handlers that cannot reach the stepper call
    /// [`Direction::toggle`] on the shared flag instead.
    pub fn on_direction_event(&self) {
        self.direction.toggle();
    }

    /// Returns the asserted position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns true when rotating clockwise.
    pub fn is_clockwise(&self) -> bool {
        self.direction.is_clockwise()
    }

    /// Returns the output ring.
    pub fn outputs(&self) -> &[O; N] {
        &self.outputs
    }
}
