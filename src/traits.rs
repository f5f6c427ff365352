//! Hardware abstraction traits

use crate::model::DisplayFrame;

/// Trait for the push-button input
pub trait ButtonInput {
    /// Raw pin level. HIGH means released (pull-up wiring), LOW means pressed.
    fn is_high(&mut self) -> bool;
}

/// Trait for the status LED output
pub trait StatusLed {
    /// Drive the raw pin level. The LED is active-low.
    fn set_level(&mut self, high: bool);
}

/// Trait for time keeping
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u64;

    /// Block for the given number of milliseconds
    fn pause_ms(&mut self, ms: u32);
}

/// Trait for display devices
pub trait Display {
    /// Initialize the display
    fn init(&mut self) -> Result<(), &'static str>;

    /// Clear, draw the whole frame and flush it to the panel
    fn draw_frame(&mut self, frame: &DisplayFrame) -> Result<(), &'static str>;
}
