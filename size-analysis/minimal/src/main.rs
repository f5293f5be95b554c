#![no_std]
#![no_main]

use cortex_m_rt::entry;
use panic_halt as _;
use blink_sequencer::{
    DEFAULT_MESSAGE, Direction, DirectionalStepper, Instant, Output, PlayerConfig, RingBuffer,
    SequencePlayer, StepperConfig, TimeSource,
};

// ============================================================================
// Minimal Output Implementation
// ============================================================================

/// Zero-size output for measuring library overhead
pub struct MinimalOutput;

impl Output for MinimalOutput {
    fn set_active(&mut self, _active: bool) {
        // Minimal no-op implementation
        core::hint::black_box(());
    }
}

// ============================================================================
// Minimal TimeSource Implementation
// ============================================================================

pub struct MinimalTimeSource;

impl TimeSource for MinimalTimeSource {
    fn now(&self) -> Instant {
        Instant::from_millis(core::hint::black_box(0))
    }
}

static DIRECTION: Direction = Direction::new(true);

// ============================================================================
// Component Usage
// ============================================================================

// This function uses the library to prevent optimizer from removing code
#[inline(never)]
fn exercise_components() {
    let time_source = MinimalTimeSource;

    // Bare queue
    if let Ok(mut queue) = RingBuffer::<i32, 16>::new() {
        let _ = queue.push(core::hint::black_box(1));
        let _ = queue.pop();
        core::hint::black_box(queue);
    }

    // Morse player sized for the demo message
    if let Ok(mut player) =
        SequencePlayer::<_, _, 64>::new(MinimalOutput, MinimalOutput, PlayerConfig::default())
    {
        let _ = player.load(DEFAULT_MESSAGE);
        let _ = player.tick(time_source.now());
        player.reset();
        core::hint::black_box(player);
    }

    // Four-LED chaser
    let outputs = [MinimalOutput, MinimalOutput, MinimalOutput, MinimalOutput];
    if let Ok(mut stepper) = DirectionalStepper::new(outputs, &DIRECTION, StepperConfig::default())
    {
        let _ = stepper.tick(time_source.now());
        stepper.on_direction_event();
        core::hint::black_box(stepper);
    }
}

#[entry]
fn main() -> ! {
    // Call test function to ensure all code is included
    exercise_components();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
