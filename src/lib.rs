#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`RingBuffer`**: Fixed-capacity FIFO queue with explicit `Full`/`Empty` back-pressure
//! - **`TimedCommand`**: An output level held for a duration
//! - **`morse`**: Encodes text into timed on/off commands
//! - **`SequencePlayer`**: Plays an encoded message against absolute deadlines
//! - **`DirectionalStepper`**: Chases a single lit position around a ring of outputs
//! - **`Direction`**: Interrupt-safe rotation flag shared with the stepper
//! - **`Output`**: Trait to implement for your LED or pin hardware
//! - **`TimeSource`**: Trait to implement for your millisecond counter
//!
//! Every component is driven by a `tick(now)` call from a periodic callback and
//! reads time only from the `now` it is given.

#[macro_use]
mod log;

pub mod time;
pub mod output;
pub mod ring_buffer;
pub mod morse;
pub mod sequencer;
pub mod stepper;

pub use morse::{DEFAULT_UNIT, MAX_UNIT, MorseCommands, Symbol, TimedCommand};
pub use output::Output;
#[cfg(feature = "embedded-hal")]
pub use output::HalOutput;
pub use ring_buffer::{Empty, Full, RingBuffer, RingBufferError};
pub use sequencer::{PlayerConfig, PlayerError, PlayerState, PlayerTiming, SequencePlayer};
pub use stepper::{DEFAULT_STEP_TIME, Direction, DirectionalStepper, StepperConfig, StepperError};
pub use time::{Duration, Instant, TimeSource};

/// Message transmitted by the demo firmware.
pub const DEFAULT_MESSAGE: &str = "AAAA BBBB";

/// Number of chaser LEDs on the demo board.
pub const DEFAULT_CHASER_LEDS: usize = 4;
