//! Morse encoder producing timed on/off commands.
//!
//! Every duration is a multiple of the base unit `U` (the dot length):
//!
//! | Element                     | Level    | Duration |
//! |-----------------------------|----------|----------|
//! | dot                         | active   | `U`      |
//! | dash                        | active   | `3U`     |
//! | gap inside a character      | inactive | `U`      |
//! | gap after a character       | inactive | `2U`     |
//! | word break (space)          | inactive | `4U`     |
//!
//! Characters outside `0-9`, `A-Z` (either case) and space produce nothing.

use crate::ring_buffer::{Full, RingBuffer, RingBufferError};
use crate::time::Duration;

/// Default base unit (dot length).
pub const DEFAULT_UNIT: Duration = Duration::from_millis(200);

/// Largest base unit whose longest command (a `4U` word break) still ends
/// less than `2^31` ms ahead, the reach of wrapping deadline comparison.
pub const MAX_UNIT: Duration = Duration::from_millis(i32::MAX as u32 / 4);

const LETTERS: [&str; 26] = [
    ".-", "-...", "-.-.", "-..", ".", "..-.", "--.", "....", "..", ".---", "-.-", ".-..", "--",
    "-.", "---", ".--.", "--.-", ".-.", "...", "-", "..-", "...-", ".--", "-..-", "-.--", "--..",
];

const DIGITS: [&str; 10] = [
    "-----", ".----", "..---", "...--", "....-", ".....", "-....", "--...", "---..", "----.",
];

/// A single output level held for a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedCommand {
    /// Output level while the command is in flight.
    pub active: bool,

    /// How long the level is held.
    pub duration: Duration,
}

impl TimedCommand {
    /// Creates an active (signal on) command.
    #[inline]
    pub const fn on(duration: Duration) -> Self {
        Self {
            active: true,
            duration,
        }
    }

    /// Creates an inactive (signal off) command.
    #[inline]
    pub const fn off(duration: Duration) -> Self {
        Self {
            active: false,
            duration,
        }
    }
}

/// Symbolic code of one input character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    /// Dot/dash pattern written with `.` and `-`.
    Code(&'static str),

    /// Pause between words.
    WordBreak,

    /// Character with no encoding; skipped.
    Empty,
}

impl Symbol {
    /// Number of commands this symbol expands to.
    pub fn command_count(&self) -> usize {
        match self {
            Symbol::Code(code) => code.len() * 2,
            Symbol::WordBreak => 1,
            Symbol::Empty => 0,
        }
    }
}

/// Maps a character to its Morse symbol.
pub fn symbol_for(c: char) -> Symbol {
    match c.to_ascii_uppercase() {
        d @ '0'..='9' => Symbol::Code(DIGITS[(d as u8 - b'0') as usize]),
        l @ 'A'..='Z' => Symbol::Code(LETTERS[(l as u8 - b'A') as usize]),
        ' ' => Symbol::WordBreak,
        _ => Symbol::Empty,
    }
}

/// Number of commands `message` encodes to.
pub fn encoded_len(message: &str) -> usize {
    message.chars().map(|c| symbol_for(c).command_count()).sum()
}

/// Total playback time of `message` at the given base unit.
pub fn encoded_duration(message: &str, unit: Duration) -> Duration {
    let millis = commands(message, unit)
        .fold(0u32, |acc, cmd| acc.saturating_add(cmd.duration.as_millis()));
    Duration::from_millis(millis)
}

/// Returns a lazy iterator over the commands for `message`.
pub fn commands(message: &str, unit: Duration) -> MorseCommands<'_> {
    MorseCommands {
        chars: message.chars(),
        unit,
        code: &[],
        pos: 0,
        gap: None,
    }
}

/// Appends the commands for `message` to `queue`.
///
/// Check [`encoded_len`] against the free space first: on `Full` the queue
/// keeps whatever prefix fit.
pub fn encode_into<const N: usize>(
    message: &str,
    unit: Duration,
    queue: &mut RingBuffer<TimedCommand, N>,
) -> Result<(), Full> {
    for command in commands(message, unit) {
        queue.push(command)?;
    }
    Ok(())
}

/// Encodes `message` into a new queue sized to exactly the command count.
///
/// A message with nothing to encode yields an empty queue of capacity 1.
///
/// # Errors
/// * `AllocationError` - The message needs more than `N` commands
pub fn encode<const N: usize>(
    message: &str,
    unit: Duration,
) -> Result<RingBuffer<TimedCommand, N>, RingBufferError> {
    let required = encoded_len(message);
    let mut queue = RingBuffer::with_capacity(required.max(1))?;
    encode_into(message, unit, &mut queue).map_err(|Full| RingBufferError::AllocationError {
        requested: required,
        available: N,
    })?;
    Ok(queue)
}

/// Iterator returned by [`commands`].
#[derive(Debug, Clone)]
pub struct MorseCommands<'a> {
    chars: core::str::Chars<'a>,
    unit: Duration,
    code: &'static [u8],
    pos: usize,
    gap: Option<TimedCommand>,
}

impl Iterator for MorseCommands<'_> {
    type Item = TimedCommand;

    fn next(&mut self) -> Option<TimedCommand> {
        loop {
            if let Some(gap) = self.gap.take() {
                return Some(gap);
            }

            if let Some(&element) = self.code.get(self.pos) {
                self.pos += 1;
                let gap_units = if self.pos < self.code.len() { 1 } else { 2 };
                self.gap = Some(TimedCommand::off(self.unit.saturating_mul(gap_units)));

                let element_units = if element == b'-' { 3 } else { 1 };
                return Some(TimedCommand::on(self.unit.saturating_mul(element_units)));
            }

            match symbol_for(self.chars.next()?) {
                Symbol::Code(code) => {
                    self.code = code.as_bytes();
                    self.pos = 0;
                }
                Symbol::WordBreak => {
                    self.code = &[];
                    return Some(TimedCommand::off(self.unit.saturating_mul(4)));
                }
                Symbol::Empty => {}
            }
        }
    }
}
