//! Output-level abstraction for signal LEDs and indicators.

/// Trait for abstracting a single on/off output line.
///
/// Implement this for your hardware (GPIO pin, LED driver channel, etc.) to
/// allow the components to drive it. Handle any hardware errors internally;
/// this method cannot fail and must not block.
pub trait Output {
    /// Drives the output to its active (`true`) or inactive (`false`) level.
    fn set_active(&mut self, active: bool);
}

impl<O: Output + ?Sized> Output for &mut O {
    fn set_active(&mut self, active: bool) {
        (**self).set_active(active);
    }
}

/// Adapts an `embedded-hal` output pin to [`Output`].
///
/// Pin errors are discarded: a failed write leaves the line where it was and
/// the next command drives it again.
#[cfg(feature = "embedded-hal")]
pub struct HalOutput<P> {
    pin: P,
    active_low: bool,
}

#[cfg(feature = "embedded-hal")]
impl<P: embedded_hal::digital::OutputPin> HalOutput<P> {
    /// Wraps a pin that is active when driven high.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Wraps a pin that is active when driven low.
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

#[cfg(feature = "embedded-hal")]
impl<P: embedded_hal::digital::OutputPin> Output for HalOutput<P> {
    fn set_active(&mut self, active: bool) {
        let _ = if active != self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}
