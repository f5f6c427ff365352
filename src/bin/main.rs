#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::main;
use log::{LevelFilter, info, warn};

use press_counter::{
    hardware::{ButtonHardware, LedHardware, OledDisplay, SSD1306Hardware, SystemClock},
    logic::{self, AppLogic},
    sink::PresentationSink,
};

// Set to false for boards without the OLED: the LED and serial log still work.
// Display wiring: I2C0, GPIO5 (SDA), GPIO6 (SCL), address 0x3C
const DISPLAY_ENABLED: bool = true;

esp_bootloader_esp_idf::esp_app_desc!();

#[main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    log::set_max_level(LevelFilter::Info);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    esp_println::println!("=== Press Counter ===");

    let mut clock = SystemClock::new();

    // GPIO8: on-board LED (inverted), GPIO9: BOOT button
    let led = LedHardware::new(peripherals.GPIO8);
    let mut button = ButtonHardware::new(peripherals.GPIO9);

    let display: Option<OledDisplay<'_>> = if DISPLAY_ENABLED {
        match SSD1306Hardware::new(peripherals.I2C0, peripherals.GPIO5, peripherals.GPIO6) {
            Ok(hw) => Some(hw.into_display()),
            Err(e) => {
                warn!("[DISPLAY] {}, continuing without display", e);
                None
            }
        }
    } else {
        None
    };

    let mut sink = PresentationSink::new(led, display);
    sink.boot(&mut clock);

    info!("Setup Complete.");

    let mut app = AppLogic::new();
    logic::run(&mut app, &mut button, &clock, &mut sink)
}
