//! Morse sequence player with state management and timing control.
//!
//! Provides [`SequencePlayer`], which encodes a message into a queue of
//! [`TimedCommand`]s and steps through them against absolute deadlines,
//! driving a signal output and a completion indicator.

use crate::morse::{self, DEFAULT_UNIT, MAX_UNIT, TimedCommand};
use crate::output::Output;
use crate::ring_buffer::{RingBuffer, RingBufferError};
use crate::time::{Duration, Instant};

/// The current state of a sequence player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerState {
    /// No message loaded. Outputs are off.
    Uninitialized,
    /// Message accepted; it is encoded on the next tick.
    Loading,
    /// Stepping through the command queue.
    Running,
    /// Queue exhausted. Signal is off and the done indicator is on.
    Complete,
}

/// Timing information returned by [`SequencePlayer::tick`].
///
/// Indicates when the player needs to be ticked again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerTiming {
    /// Nothing loaded. Ticking is harmless but does nothing.
    Idle,

    /// Current command in flight. Tick again after this delay.
    Delay(Duration),

    /// Message finished. No further ticking is needed until a new load.
    Complete,
}

/// Errors that can occur during player operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerError {
    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of expected state(s)
        expected: &'static str,
        /// The actual current state
        actual: PlayerState,
    },
    /// The encoded message does not fit in the command queue.
    MessageTooLong {
        /// Commands the message encodes to
        required: usize,
        /// Commands the queue can hold
        capacity: usize,
    },
    /// The configured base unit is longer than [`MAX_UNIT`].
    UnitTooLong {
        /// Configured base unit
        unit: Duration,
        /// Largest accepted base unit
        max: Duration,
    },
    /// The command queue could not be created.
    Buffer(RingBufferError),
}

impl core::fmt::Display for PlayerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PlayerError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but player is in {:?}",
                    expected, actual
                )
            }
            PlayerError::MessageTooLong { required, capacity } => {
                write!(
                    f,
                    "message needs {} commands, queue holds {}",
                    required, capacity
                )
            }
            PlayerError::UnitTooLong { unit, max } => {
                write!(
                    f,
                    "base unit of {} ms exceeds the {} ms limit",
                    unit.as_millis(),
                    max.as_millis()
                )
            }
            PlayerError::Buffer(err) => {
                write!(f, "command queue error: {}", err)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlayerError {}

impl From<RingBufferError> for PlayerError {
    fn from(err: RingBufferError) -> Self {
        PlayerError::Buffer(err)
    }
}

/// Runtime configuration for a [`SequencePlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlayerConfig {
    /// Base unit (dot length) all command durations derive from.
    ///
    /// At most [`MAX_UNIT`]; [`SequencePlayer::new`] rejects longer units.
    pub unit: Duration,
}

impl PlayerConfig {
    /// Sets the base unit.
    pub fn with_unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { unit: DEFAULT_UNIT }
    }
}

/// Plays a message as Morse code on a signal output.
///
/// The player owns its command queue and both outputs. Drive it by calling
/// [`tick`](Self::tick) from a periodic callback; the call rate does not need
/// to match the base unit since progress is measured against absolute
/// deadlines.
///
/// # Type Parameters
/// * `'m` - Lifetime of the loaded message
/// * `S` - Signal output type
/// * `D` - Done-indicator output type
/// * `N` - Command queue capacity
pub struct SequencePlayer<'m, S: Output, D: Output, const N: usize> {
    signal: S,
    done: D,
    config: PlayerConfig,
    state: PlayerState,
    message: &'m str,
    queue: RingBuffer<TimedCommand, N>,
    current: Option<TimedCommand>,
    deadline: Instant,
}

impl<'m, S: Output, D: Output, const N: usize> SequencePlayer<'m, S, D, N> {
    /// Creates an uninitialized player with both outputs turned off.
    ///
    /// # Errors
    /// * `UnitTooLong` - The configured base unit exceeds [`MAX_UNIT`]
    /// * `Buffer` - `N` is 0, so no command queue can be created
    pub fn new(mut signal: S, mut done: D, config: PlayerConfig) -> Result<Self, PlayerError> {
        if config.unit > MAX_UNIT {
            return Err(PlayerError::UnitTooLong {
                unit: config.unit,
                max: MAX_UNIT,
            });
        }
        let queue = RingBuffer::new()?;

        signal.set_active(false);
        done.set_active(false);

        Ok(Self {
            signal,
            done,
            config,
            state: PlayerState::Uninitialized,
            message: "",
            queue,
            current: None,
            deadline: Instant::default(),
        })
    }

    /// Accepts a message for playback. Encoding happens on the next tick.
    ///
    /// Can be called from `Uninitialized` or `Complete`.
    ///
    /// # Errors
    /// * `InvalidState` - A message is still loading or running
    /// * `MessageTooLong` - The encoded message exceeds the queue capacity
    pub fn load(&mut self, message: &'m str) -> Result<(), PlayerError> {
        match self.state {
            PlayerState::Uninitialized | PlayerState::Complete => {}
            _ => {
                return Err(PlayerError::InvalidState {
                    expected: "Uninitialized or Complete",
                    actual: self.state,
                });
            }
        }

        let required = morse::encoded_len(message);
        if required > self.queue.capacity() {
            return Err(PlayerError::MessageTooLong {
                required,
                capacity: self.queue.capacity(),
            });
        }

        self.message = message;
        self.queue.clear();
        self.current = None;
        self.done.set_active(false);
        self.state = PlayerState::Loading;
        debug!("player: loaded message, {} commands", required);
        Ok(())
    }

    /// Advances playback to `now`.
    ///
    /// Starts at most one command per call, even if `now` has skipped past
    /// several deadlines. Between deadlines the call has no side effects.
    pub fn tick(&mut self, now: Instant) -> PlayerTiming {
        match self.state {
            PlayerState::Uninitialized => return PlayerTiming::Idle,
            PlayerState::Complete => return PlayerTiming::Complete,
            PlayerState::Loading => self.begin(now),
            PlayerState::Running => {}
        }

        if !now.has_reached(self.deadline) {
            return PlayerTiming::Delay(now.until(self.deadline));
        }

        let Ok(command) = self.queue.pop() else {
            self.finish();
            return PlayerTiming::Complete;
        };

        self.current = Some(command);
        self.deadline = now.wrapping_add(command.duration);
        self.signal.set_active(command.active);
        trace!("player: {} for {}", command.active, command.duration);

        if self.queue.is_empty() {
            self.finish();
            return PlayerTiming::Complete;
        }
        PlayerTiming::Delay(command.duration)
    }

    /// Aborts playback, clears the queue and turns both outputs off.
    ///
    /// Returns to `Uninitialized`. Can be called from any state.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.current = None;
        self.message = "";
        self.state = PlayerState::Uninitialized;

        self.signal.set_active(false);
        self.done.set_active(false);
        debug!("player: reset");
    }

    /// Encodes the loaded message and enters `Running`.
    fn begin(&mut self, now: Instant) {
        let filled = morse::encode_into(self.message, self.config.unit, &mut self.queue);
        debug_assert!(filled.is_ok(), "load admitted a message that does not fit");

        self.signal.set_active(false);
        self.done.set_active(false);
        self.current = None;
        self.deadline = now;
        self.state = PlayerState::Running;
        debug!("player: running at {}", now);
    }

    /// Enters `Complete`: signal off, done indicator on.
    fn finish(&mut self) {
        self.current = None;
        self.state = PlayerState::Complete;

        self.signal.set_active(false);
        self.done.set_active(true);
        debug!("player: complete");
    }

    /// Returns the current state of the player.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Returns true while the player is stepping through commands.
    pub fn is_running(&self) -> bool {
        self.state == PlayerState::Running
    }

    /// Returns true once the loaded message has finished.
    pub fn is_complete(&self) -> bool {
        self.state == PlayerState::Complete
    }

    /// Returns the command currently in flight, if any.
    pub fn current(&self) -> Option<TimedCommand> {
        self.current
    }

    /// Returns the end of the current command while running.
    pub fn deadline(&self) -> Option<Instant> {
        (self.state == PlayerState::Running).then_some(self.deadline)
    }

    /// Returns the number of commands still queued.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Returns the loaded message (empty when uninitialized).
    pub fn message(&self) -> &'m str {
        self.message
    }

    /// Returns the player configuration.
    pub fn config(&self) -> PlayerConfig {
        self.config
    }

    /// Returns a reference to the signal output.
    pub fn signal(&self) -> &S {
        &self.signal
    }

    /// Returns a reference to the done-indicator output.
    pub fn done_indicator(&self) -> &D {
        &self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::format;

    // Mock output that records its level and how often it was written
    #[derive(Default)]
    struct MockOutput {
        active: bool,
        writes: usize,
    }

    impl Output for MockOutput {
        fn set_active(&mut self, active: bool) {
            self.active = active;
            self.writes += 1;
        }
    }

    fn at(millis: u32) -> Instant {
        Instant::from_millis(millis)
    }

    fn player<'m>() -> SequencePlayer<'m, MockOutput, MockOutput, 32> {
        SequencePlayer::new(
            MockOutput::default(),
            MockOutput::default(),
            PlayerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn new_player_is_uninitialized_with_outputs_off() {
        let player = player();
        assert_eq!(player.state(), PlayerState::Uninitialized);
        assert!(!player.signal().active);
        assert!(!player.done_indicator().active);
        assert_eq!(player.deadline(), None);
    }

    #[test]
    fn zero_capacity_queue_is_rejected() {
        let result = SequencePlayer::<MockOutput, MockOutput, 0>::new(
            MockOutput::default(),
            MockOutput::default(),
            PlayerConfig::default(),
        );
        assert!(matches!(
            result,
            Err(PlayerError::Buffer(RingBufferError::ZeroCapacity))
        ));
    }

    #[test]
    fn unit_beyond_deadline_reach_is_rejected() {
        let too_long = Duration::from_millis(MAX_UNIT.as_millis() + 1);
        let result = SequencePlayer::<MockOutput, MockOutput, 8>::new(
            MockOutput::default(),
            MockOutput::default(),
            PlayerConfig::default().with_unit(too_long),
        );
        assert!(matches!(
            result,
            Err(PlayerError::UnitTooLong { unit, max }) if unit == too_long && max == MAX_UNIT
        ));
    }

    #[test]
    fn longest_accepted_unit_holds_each_command() {
        let mut player = SequencePlayer::<_, _, 8>::new(
            MockOutput::default(),
            MockOutput::default(),
            PlayerConfig::default().with_unit(MAX_UNIT),
        )
        .unwrap();
        player.load(" T").unwrap();
        player.tick(at(0));
        assert_eq!(player.current(), Some(TimedCommand::off(MAX_UNIT.saturating_mul(4))));

        // A 4U word break must not look reached one millisecond later
        assert!(matches!(player.tick(at(1)), PlayerTiming::Delay(_)));
        assert_eq!(player.remaining(), 2);
    }

    #[test]
    fn tick_without_message_is_idle() {
        let mut player = player();
        assert_eq!(player.tick(at(0)), PlayerTiming::Idle);
        assert_eq!(player.tick(at(5000)), PlayerTiming::Idle);
        assert_eq!(player.signal().writes, 1);
    }

    #[test]
    fn load_rejects_message_longer_than_queue() {
        let mut player = player();
        // 9 x E = 18 commands fits, SOS SOS = 37 does not
        assert!(player.load("EEEEEEEEE").is_ok());
        player.reset();

        let result = player.load("SOS SOS");
        assert_eq!(
            result,
            Err(PlayerError::MessageTooLong {
                required: 37,
                capacity: 32
            })
        );
        assert_eq!(player.state(), PlayerState::Uninitialized);
    }

    #[test]
    fn load_requires_idle_or_complete_state() {
        let mut player = player();
        player.load("E").unwrap();
        assert!(matches!(
            player.load("T"),
            Err(PlayerError::InvalidState { .. })
        ));

        player.tick(at(0));
        assert_eq!(player.state(), PlayerState::Running);
        assert!(matches!(
            player.load("T"),
            Err(PlayerError::InvalidState { .. })
        ));
    }

    #[test]
    fn first_tick_encodes_and_starts_first_command() {
        let mut player = player();
        player.load("E").unwrap();
        assert_eq!(player.state(), PlayerState::Loading);

        let timing = player.tick(at(10));
        assert_eq!(player.state(), PlayerState::Running);
        assert_eq!(timing, PlayerTiming::Delay(Duration::from_millis(200)));
        assert_eq!(player.current(), Some(TimedCommand::on(DEFAULT_UNIT)));
        assert_eq!(player.deadline(), Some(at(210)));
        assert!(player.signal().active);
    }

    #[test]
    fn waiting_for_deadline_has_no_side_effects() {
        let mut player = player();
        player.load("T").unwrap();
        player.tick(at(0));
        let writes = player.signal().writes;

        for now in [1, 100, 300, 599] {
            let timing = player.tick(at(now));
            assert_eq!(timing, PlayerTiming::Delay(Duration::from_millis(600 - now)));
        }
        assert_eq!(player.signal().writes, writes);
        assert_eq!(player.remaining(), 1);
    }

    #[test]
    fn completes_once_and_latches_done_indicator() {
        let mut player = player();
        player.load("E").unwrap();

        player.tick(at(0));
        assert!(player.signal().active);

        let timing = player.tick(at(200));
        assert_eq!(timing, PlayerTiming::Complete);
        assert_eq!(player.state(), PlayerState::Complete);
        assert!(!player.signal().active);
        assert!(player.done_indicator().active);

        let (signal_writes, done_writes) =
            (player.signal().writes, player.done_indicator().writes);
        for now in [400, 10_000, 20_000] {
            assert_eq!(player.tick(at(now)), PlayerTiming::Complete);
        }
        assert_eq!(player.signal().writes, signal_writes);
        assert_eq!(player.done_indicator().writes, done_writes);
    }

    #[test]
    fn message_with_nothing_to_encode_completes_on_first_tick() {
        let mut player = player();
        player.load("#$%").unwrap();
        assert_eq!(player.tick(at(0)), PlayerTiming::Complete);
        assert!(player.is_complete());
        assert!(player.done_indicator().active);
    }

    #[test]
    fn reload_after_complete_plays_again() {
        let mut player = player();
        player.load("E").unwrap();
        player.tick(at(0));
        player.tick(at(200));
        assert!(player.is_complete());

        player.load("T").unwrap();
        assert!(!player.done_indicator().active);
        player.tick(at(1000));
        assert_eq!(player.current(), Some(TimedCommand::on(Duration::from_millis(600))));
        assert_eq!(player.message(), "T");
    }

    #[test]
    fn reset_returns_to_uninitialized_from_running() {
        let mut player = player();
        player.load("SOS").unwrap();
        player.tick(at(0));
        assert!(player.is_running());

        player.reset();
        assert_eq!(player.state(), PlayerState::Uninitialized);
        assert_eq!(player.remaining(), 0);
        assert_eq!(player.current(), None);
        assert!(!player.signal().active);
        assert_eq!(player.tick(at(100)), PlayerTiming::Idle);
    }

    #[test]
    fn custom_unit_scales_durations() {
        let mut player = SequencePlayer::<_, _, 8>::new(
            MockOutput::default(),
            MockOutput::default(),
            PlayerConfig::default().with_unit(Duration::from_millis(50)),
        )
        .unwrap();
        player.load("T").unwrap();
        player.tick(at(0));
        assert_eq!(player.deadline(), Some(at(150)));
    }

    #[test]
    fn deadlines_survive_clock_wrap() {
        let mut player = player();
        player.load("T").unwrap();
        let start = u32::MAX - 100;
        player.tick(at(start));
        assert_eq!(player.deadline(), Some(at(499)));

        // Past the wrap but before the deadline
        assert_eq!(
            player.tick(at(5)),
            PlayerTiming::Delay(Duration::from_millis(494))
        );
        assert!(player.signal().active);

        player.tick(at(499));
        assert!(!player.signal().active);
    }

    #[test]
    fn error_messages_format_correctly_for_display() {
        let err = PlayerError::InvalidState {
            expected: "Uninitialized or Complete",
            actual: PlayerState::Running,
        };
        assert_eq!(
            format!("{}", err),
            "invalid state: expected Uninitialized or Complete, but player is in Running"
        );

        let err = PlayerError::MessageTooLong {
            required: 40,
            capacity: 32,
        };
        assert_eq!(format!("{}", err), "message needs 40 commands, queue holds 32");

        let err = PlayerError::UnitTooLong {
            unit: Duration::from_millis(600_000_000),
            max: MAX_UNIT,
        };
        assert_eq!(
            format!("{}", err),
            "base unit of 600000000 ms exceeds the 536870911 ms limit"
        );

        let err = PlayerError::from(RingBufferError::ZeroCapacity);
        assert_eq!(
            format!("{}", err),
            "command queue error: ring buffer capacity must be at least 1"
        );
    }
}
