//! In-memory stand-ins for the hardware traits, used by the unit tests

use crate::model::DisplayFrame;
use crate::traits::{ButtonInput, Clock, Display, StatusLed};

/// Button whose level is set directly by the test
pub struct FakeButton {
    pub high: bool,
}

impl FakeButton {
    pub fn released() -> Self {
        Self { high: true }
    }
}

impl ButtonInput for FakeButton {
    fn is_high(&mut self) -> bool {
        self.high
    }
}

/// Simulated time; `pause_ms` advances it instead of sleeping
#[derive(Default)]
pub struct FakeClock {
    pub now: u64,
    pub paused: Vec<u32>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn pause_ms(&mut self, ms: u32) {
        self.paused.push(ms);
        self.now += u64::from(ms);
    }
}

/// Records every level written to the LED pin
#[derive(Default)]
pub struct FakeLed {
    pub levels: Vec<bool>,
}

impl FakeLed {
    pub fn level(&self) -> Option<bool> {
        self.levels.last().copied()
    }

    pub fn toggles(&self) -> usize {
        self.levels.windows(2).filter(|w| w[0] != w[1]).count()
    }
}

impl StatusLed for FakeLed {
    fn set_level(&mut self, high: bool) {
        self.levels.push(high);
    }
}

/// Records frames instead of drawing them, with switchable failures
#[derive(Default)]
pub struct RecordingDisplay {
    pub frames: Vec<DisplayFrame>,
    pub fail_init: bool,
    pub fail_draw: bool,
    pub inits: usize,
}

impl Display for RecordingDisplay {
    fn init(&mut self) -> Result<(), &'static str> {
        self.inits += 1;
        if self.fail_init {
            return Err("init failed");
        }
        Ok(())
    }

    fn draw_frame(&mut self, frame: &DisplayFrame) -> Result<(), &'static str> {
        if self.fail_draw {
            return Err("draw failed");
        }
        self.frames.push(*frame);
        Ok(())
    }
}
