#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::{delay::Delay, main};

use press_counter::{
    hardware::{ButtonHardware, LedHardware, SSD1306Hardware, SystemClock},
    logic::{AppLogic, Debouncer},
    model::{DEBOUNCE_WINDOW_MS, DisplayFrame, Screen},
    sink::PresentationSink,
    traits::{ButtonInput, Clock, Display, StatusLed},
};

esp_bootloader_esp_idf::esp_app_desc!();

const BUTTON_WAIT_MS: u64 = 10_000;

/// Pass/fail tally printed over serial
struct Checks {
    passed: u32,
    failed: u32,
}

impl Checks {
    fn new() -> Self {
        Self {
            passed: 0,
            failed: 0,
        }
    }

    fn check(&mut self, ok: bool, name: &str) {
        if ok {
            self.passed += 1;
            esp_println::println!("  ✓ {}", name);
        } else {
            self.failed += 1;
            esp_println::println!("  ✗ {} FAILED", name);
        }
    }

    fn check_eq<T: PartialEq + core::fmt::Debug>(&mut self, got: T, want: T, name: &str) {
        if got != want {
            esp_println::println!("    got {:?}, want {:?}", got, want);
        }
        self.check(got == want, name);
    }

    fn print_summary(&self) {
        esp_println::println!(
            "\n[SUMMARY] {} passed, {} failed",
            self.passed,
            self.failed
        );
    }
}

/// Button level driven from the test
struct ScriptedButton(bool);

impl ButtonInput for ScriptedButton {
    fn is_high(&mut self) -> bool {
        self.0
    }
}

/// Clock stepped by hand
struct SteppedClock(u64);

impl Clock for SteppedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }

    fn pause_ms(&mut self, ms: u32) {
        self.0 += u64::from(ms);
    }
}

/// LED that only remembers its last level
struct LatchedLed(Option<bool>);

impl StatusLed for LatchedLed {
    fn set_level(&mut self, high: bool) {
        self.0 = Some(high);
    }
}

fn test_debouncer(results: &mut Checks) {
    esp_println::println!("\n[TEST] Debouncer Tests");

    // Bounce, then settle LOW from t=6
    let mut debouncer = Debouncer::new();
    let mut edges = heapless::Vec::<u64, 4>::new();
    for _ in 0..10 {
        debouncer.poll(true, 0);
    }
    for t in 0..5 {
        debouncer.poll(false, t);
    }
    debouncer.poll(true, 5);
    for t in 6..106 {
        if let Some(edge) = debouncer.poll(false, t) {
            let _ = edges.push(edge.at_ms);
        }
    }
    results.check_eq(edges.as_slice(), &[57][..], "bounce settles into one press at 57 ms");

    // Held for 200 ms
    let mut debouncer = Debouncer::new();
    let mut count = 0;
    for t in 0..=200 {
        count += debouncer.poll(false, 1_000 + t).is_some() as u32;
    }
    results.check_eq(count, 1, "long hold counts once");

    // Release only
    let mut debouncer = Debouncer::new();
    let mut count = 0;
    for t in 0..300 {
        count += debouncer.poll(true, t).is_some() as u32;
    }
    results.check_eq(count, 0, "release never counts");
}

fn test_app_logic(results: &mut Checks) {
    esp_println::println!("\n[TEST] AppLogic Tests");

    let mut app = AppLogic::new();
    let mut button = ScriptedButton(true);
    let mut clock = SteppedClock(0);
    let mut sink = PresentationSink::headless(LatchedLed(None));
    sink.boot(&mut clock);

    results.check_eq(sink.led().0, Some(true), "LED starts off (HIGH)");
    results.check_eq(sink.screen(), Screen::Idle, "starts idle");

    for press in 1..=3u32 {
        button.0 = false;
        for _ in 0..=DEBOUNCE_WINDOW_MS + 1 {
            clock.0 += 1;
            app.poll(&mut button, &clock, &mut sink);
        }
        button.0 = true;
        for _ in 0..=DEBOUNCE_WINDOW_MS + 1 {
            clock.0 += 1;
            app.poll(&mut button, &clock, &mut sink);
        }
        results.check_eq(app.press_count(), press, "one count per press");
        results.check_eq(sink.led_on(), press % 2 == 1, "LED follows count parity");
    }

    results.check_eq(sink.screen(), Screen::ShowingCount, "idle screen left for good");
}

fn test_led(results: &mut Checks, led: &mut LedHardware<'_>, delay: &Delay) {
    esp_println::println!("\n[TEST] LED Tests (watch GPIO8)");

    for _ in 0..3 {
        led.set_level(false);
        delay.delay_millis(200);
        led.set_level(true);
        delay.delay_millis(200);
    }
    results.check(true, "LED blink sequence completed");
}

fn test_display(results: &mut Checks, hw: Result<SSD1306Hardware<'_>, &'static str>) {
    esp_println::println!("\n[TEST] SSD1306 Display Tests");

    let mut display = match hw {
        Ok(hw) => hw.into_display(),
        Err(e) => {
            esp_println::println!("  I2C setup failed: {}", e);
            results.check(false, "I2C bus configured");
            return;
        }
    };
    results.check(true, "I2C bus configured");

    if let Err(e) = display.init() {
        esp_println::println!("  Display init failed: {}", e);
        results.check(false, "display initialization");
        return;
    }
    results.check(true, "display initialization");

    let delay = Delay::new();
    let frames = [
        DisplayFrame::Greeting,
        DisplayFrame::Idle,
        DisplayFrame::PressCount {
            presses: 42,
            led_on: true,
        },
    ];
    for frame in frames.iter() {
        results.check(display.draw_frame(frame).is_ok(), "frame drawn and flushed");
        delay.delay_millis(1_000);
    }
}

fn test_button(results: &mut Checks, button: &mut ButtonHardware<'_>) {
    esp_println::println!("\n[TEST] Button Tests");
    esp_println::println!("  Press the BOOT button within 10 s...");

    let clock = SystemClock::new();
    let mut debouncer = Debouncer::new();
    let start = clock.now_ms();
    let mut pressed = false;
    while clock.now_ms() - start < BUTTON_WAIT_MS {
        if debouncer.poll(button.is_high(), clock.now_ms()).is_some() {
            pressed = true;
            break;
        }
    }
    results.check(pressed, "debounced press detected");
}

#[main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());

    esp_println::println!("\n==========================================");
    esp_println::println!("=== Hardware Unit Test Runner ===");
    esp_println::println!("==========================================");

    let mut results = Checks::new();
    let delay = Delay::new();

    // Run tests that don't need hardware
    test_debouncer(&mut results);
    test_app_logic(&mut results);

    let mut led = LedHardware::new(peripherals.GPIO8);
    let mut button = ButtonHardware::new(peripherals.GPIO9);

    test_led(&mut results, &mut led, &delay);
    test_display(
        &mut results,
        SSD1306Hardware::new(peripherals.I2C0, peripherals.GPIO5, peripherals.GPIO6),
    );
    test_button(&mut results, &mut button);

    results.print_summary();

    // Keep running and blink a pattern based on results
    esp_println::println!("\nTest run complete. Looping...");
    let period = if results.failed == 0 { 200 } else { 1_000 };
    loop {
        led.set_level(false);
        delay.delay_millis(period);
        led.set_level(true);
        delay.delay_millis(period);
    }
}
