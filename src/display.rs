use core::fmt::Write;

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle, Triangle},
    text::{Baseline, Text},
};
use ssd1306::{
    Ssd1306,
    mode::{BufferedGraphicsMode, DisplayConfig},
    prelude::WriteOnlyDataCommand,
    size::DisplaySize,
};

use crate::model::{DISPLAY_HEIGHT, DISPLAY_WIDTH, DisplayFrame};
use crate::traits::Display;

const GREETING: &str = "Hello!";
const IDLE_PROMPT: &str = "  Press btn...";
const COUNT_HEADING: &str = "Press Count:";

/// Left margin for text inside the border
const TEXT_X: i32 = 8;

/// Second line of the count block: the number indented under the heading
pub fn count_label(presses: u32) -> heapless::String<16> {
    let mut buffer = heapless::String::new();
    let _ = write!(buffer, "      {}", presses);
    buffer
}

pub fn led_label(led_on: bool) -> &'static str {
    if led_on { "LED is ON" } else { "LED is OFF" }
}

/// Clear the target and draw the whole frame
pub fn render<D>(frame: &DisplayFrame, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;

    let text = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

    match *frame {
        DisplayFrame::Greeting => {
            let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
            let width = GREETING.len() as i32 * FONT_10X20.character_size.width as i32;
            let x = (DISPLAY_WIDTH as i32 - width) / 2;
            Text::with_baseline(GREETING, Point::new(x, 22), large, Baseline::Top).draw(target)?;
        }
        DisplayFrame::Idle => {
            // Button icon: a lead-in line into a right-pointing triangle
            Line::new(Point::new(30, 20), Point::new(56, 20))
                .into_styled(stroke)
                .draw(target)?;
            Triangle::new(Point::new(56, 10), Point::new(56, 30), Point::new(74, 20))
                .into_styled(stroke)
                .draw(target)?;
            Text::with_baseline(IDLE_PROMPT, Point::new(0, 44), text, Baseline::Top)
                .draw(target)?;
        }
        DisplayFrame::PressCount { presses, led_on } => {
            Rectangle::new(Point::zero(), Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT))
                .into_styled(stroke)
                .draw(target)?;
            Text::with_baseline(COUNT_HEADING, Point::new(TEXT_X, 6), text, Baseline::Top)
                .draw(target)?;
            Text::with_baseline(
                count_label(presses).as_str(),
                Point::new(TEXT_X, 18),
                text,
                Baseline::Top,
            )
            .draw(target)?;
            Text::with_baseline(led_label(led_on), Point::new(TEXT_X, 40), text, Baseline::Top)
                .draw(target)?;
        }
    }

    Ok(())
}

/// SSD1306 in buffered graphics mode: draw into the frame buffer, then flush over the bus
impl<DI, SIZE> Display for Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>
where
    DI: WriteOnlyDataCommand,
    SIZE: DisplaySize,
{
    fn init(&mut self) -> Result<(), &'static str> {
        DisplayConfig::init(self).map_err(|_| "Failed to initialize SSD1306")
    }

    fn draw_frame(&mut self, frame: &DisplayFrame) -> Result<(), &'static str> {
        self.clear_buffer();
        render(frame, self).map_err(|_| "Failed to draw frame")?;
        self.flush().map_err(|_| "Failed to flush display")
    }
}
