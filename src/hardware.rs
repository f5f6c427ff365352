use esp_hal::gpio::AnyPin;
use esp_hal::{
    Blocking,
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    peripherals::I2C0,
    time::{Instant, Rate},
};
use ssd1306::{
    I2CDisplayInterface, Ssd1306, mode::BufferedGraphicsMode, prelude::I2CInterface,
    rotation::DisplayRotation, size::DisplaySize128x64,
};

use crate::model::DISPLAY_I2C_KHZ;
use crate::traits::{ButtonInput, Clock, StatusLed};

/// SSD1306 128x64 over I2C, buffered
pub type OledDisplay<'a> = Ssd1306<
    I2CInterface<I2c<'a, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// BOOT button: pull-up, LOW while pressed
pub struct ButtonHardware<'a> {
    input: Input<'a>,
}

impl<'a> ButtonHardware<'a> {
    pub fn new<PIN>(pin: PIN) -> Self
    where
        PIN: Into<AnyPin<'a>>,
    {
        let config = InputConfig::default().with_pull(Pull::Up);
        Self {
            input: Input::new(pin.into(), config),
        }
    }
}

impl ButtonInput for ButtonHardware<'_> {
    fn is_high(&mut self) -> bool {
        self.input.is_high()
    }
}

/// On-board LED, active-low
pub struct LedHardware<'a> {
    output: Output<'a>,
}

impl<'a> LedHardware<'a> {
    pub fn new<PIN>(pin: PIN) -> Self
    where
        PIN: Into<AnyPin<'a>>,
    {
        // Start dark
        Self {
            output: Output::new(pin.into(), Level::High, OutputConfig::default()),
        }
    }
}

impl StatusLed for LedHardware<'_> {
    fn set_level(&mut self, high: bool) {
        self.output.set_level(if high { Level::High } else { Level::Low });
    }
}

/// Milliseconds since boot, plus a blocking delay
pub struct SystemClock {
    delay: Delay,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            delay: Delay::new(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Instant::now().duration_since_epoch().as_millis()
    }

    fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_millis(ms);
    }
}

pub struct SSD1306Hardware<'a> {
    pub i2c: I2c<'a, Blocking>,
}

impl<'a> SSD1306Hardware<'a> {
    /// Claim the I2C bus for the display. Fails if the bus cannot be configured.
    pub fn new<SDA, SCL>(i2c_periph: I2C0<'a>, sda: SDA, scl: SCL) -> Result<Self, &'static str>
    where
        SDA: Into<AnyPin<'a>>,
        SCL: Into<AnyPin<'a>>,
    {
        let i2c = I2c::new(
            i2c_periph,
            I2cConfig::default().with_frequency(Rate::from_khz(DISPLAY_I2C_KHZ)),
        )
        .map_err(|_| "Failed to configure I2C")?
        .with_sda(sda.into())
        .with_scl(scl.into());

        Ok(Self { i2c })
    }

    /// Wrap the bus in the SSD1306 driver (address 0x3C). Call `Display::init` before drawing.
    pub fn into_display(self) -> OledDisplay<'a> {
        let interface = I2CDisplayInterface::new(self.i2c);
        Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode()
    }
}
