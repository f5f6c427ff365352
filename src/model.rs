// Model of the data handled by the press counter

/// Minimum time (ms) a raw level must hold before it is trusted
pub const DEBOUNCE_WINDOW_MS: u64 = 50;

/// How long the greeting stays on screen before the idle frame
pub const SPLASH_MS: u32 = 1_000;

/// Display geometry (SSD1306 128x64)
pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 64;

/// I2C bus clock for the OLED
pub const DISPLAY_I2C_KHZ: u32 = 400;

/// A confirmed released -> pressed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressEdge {
    /// Timestamp (ms) at which the press was confirmed
    pub at_ms: u64,
}

/// What the status display is currently showing.
///
/// Moves from `Idle` to `ShowingCount` on the first press and never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Idle,
    ShowingCount,
}

/// One complete frame for the status display. Every update redraws the whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFrame {
    /// Boot splash text
    Greeting,
    /// "Press button" icon and prompt, shown until the first press
    Idle,
    /// Border, press count and LED state
    PressCount { presses: u32, led_on: bool },
}
