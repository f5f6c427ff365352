//! Presentation sink: LED and status display, driven by confirmed presses

use log::{info, warn};

use crate::model::{DisplayFrame, SPLASH_MS, Screen};
use crate::traits::{Clock, Display, StatusLed};

/// Stand-in display type for the headless build. Never attached, so never called.
pub struct NoDisplay;

impl Display for NoDisplay {
    fn init(&mut self) -> Result<(), &'static str> {
        Ok(())
    }

    fn draw_frame(&mut self, _frame: &DisplayFrame) -> Result<(), &'static str> {
        Ok(())
    }
}

/// Owns the LED state and the (optional) display.
///
/// `display` is `None` when the board is headless or the display failed to come up; rendering
/// is then a no-op and only the LED and serial log react to presses.
pub struct PresentationSink<L, D> {
    led: L,
    display: Option<D>,
    led_on: bool,
    screen: Screen,
    last_count: u32,
}

impl<L: StatusLed> PresentationSink<L, NoDisplay> {
    pub fn headless(led: L) -> Self {
        Self::new(led, None)
    }
}

impl<L, D> PresentationSink<L, D>
where
    L: StatusLed,
    D: Display,
{
    /// Takes ownership of the LED and display. The LED starts off.
    pub fn new(mut led: L, display: Option<D>) -> Self {
        // Active-low: HIGH is off
        led.set_level(true);
        Self {
            led,
            display,
            led_on: false,
            screen: Screen::Idle,
            last_count: 0,
        }
    }

    /// Bring up the display and show the greeting, then the idle prompt.
    ///
    /// A display that fails to initialize is dropped and the sink carries on headless.
    pub fn boot<C: Clock>(&mut self, clock: &mut C) {
        let Some(display) = self.display.as_mut() else {
            return;
        };

        if let Err(e) = display.init() {
            warn!("[DISPLAY] Init failed ({}), continuing without display", e);
            self.display = None;
            return;
        }

        self.render(&DisplayFrame::Greeting);
        clock.pause_ms(SPLASH_MS);
        let idle = self.frame();
        self.render(&idle);
    }

    /// React to a confirmed press: toggle the LED and redraw.
    pub fn on_press_edge(&mut self, press_count: u32) {
        self.led_on = !self.led_on;
        self.led.set_level(!self.led_on);
        info!("LED is now {}", if self.led_on { "ON" } else { "OFF" });

        self.last_count = press_count;
        self.screen = Screen::ShowingCount;
        let frame = self.frame();
        self.render(&frame);
    }

    /// Frame matching the current state
    pub fn frame(&self) -> DisplayFrame {
        match self.screen {
            Screen::Idle => DisplayFrame::Idle,
            Screen::ShowingCount => DisplayFrame::PressCount {
                presses: self.last_count,
                led_on: self.led_on,
            },
        }
    }

    pub fn led_on(&self) -> bool {
        self.led_on
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    pub fn display(&self) -> Option<&D> {
        self.display.as_ref()
    }

    pub fn has_display(&self) -> bool {
        self.display.is_some()
    }

    fn render(&mut self, frame: &DisplayFrame) {
        if let Some(display) = self.display.as_mut() {
            if let Err(e) = display.draw_frame(frame) {
                warn!("[DISPLAY] Redraw failed: {}", e);
            }
        }
    }
}
