//! Business logic layer (hardware-independent)

use log::info;

use crate::model::{DEBOUNCE_WINDOW_MS, PressEdge};
use crate::sink::PresentationSink;
use crate::traits::{ButtonInput, Clock, Display, StatusLed};

/// Button debounce state tracker.
///
/// Levels follow the pull-up wiring: `true` (HIGH) is released, `false` (LOW) is pressed.
/// Only released -> pressed transitions produce an event; releases are absorbed silently.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    /// Raw level seen on the previous poll
    last_raw_high: bool,
    /// Last level that held for longer than the window
    stable_high: bool,
    /// Timestamp (ms) of the last raw level change
    last_change_ms: u64,
    window_ms: u64,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::with_window(DEBOUNCE_WINDOW_MS)
    }

    pub fn with_window(window_ms: u64) -> Self {
        Self {
            last_raw_high: true,
            stable_high: true,
            last_change_ms: 0,
            window_ms,
        }
    }

    /// Feed one raw sample. Returns a `PressEdge` when a press has been confirmed.
    ///
    /// Never blocks; call it once per loop iteration.
    pub fn poll(&mut self, raw_high: bool, now_ms: u64) -> Option<PressEdge> {
        if raw_high != self.last_raw_high {
            // Still bouncing, restart the window
            self.last_change_ms = now_ms;
        }

        let mut edge = None;
        if now_ms.saturating_sub(self.last_change_ms) > self.window_ms {
            if !raw_high && self.stable_high {
                edge = Some(PressEdge { at_ms: now_ms });
            }
            self.stable_high = raw_high;
        }

        self.last_raw_high = raw_high;
        edge
    }

    /// Debounced level: `true` while released
    pub fn is_released(&self) -> bool {
        self.stable_high
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state held by the polling loop for the program lifetime
pub struct AppLogic {
    debouncer: Debouncer,
    press_count: u32,
}

impl AppLogic {
    pub fn new() -> Self {
        Self::with_debouncer(Debouncer::new())
    }

    pub fn with_debouncer(debouncer: Debouncer) -> Self {
        Self {
            debouncer,
            press_count: 0,
        }
    }

    pub fn press_count(&self) -> u32 {
        self.press_count
    }

    /// One loop iteration: sample the button, debounce, and notify the sink on a press.
    ///
    /// Returns the new press count when a press was confirmed.
    pub fn poll<B, C, L, D>(
        &mut self,
        button: &mut B,
        clock: &C,
        sink: &mut PresentationSink<L, D>,
    ) -> Option<u32>
    where
        B: ButtonInput,
        C: Clock,
        L: StatusLed,
        D: Display,
    {
        let raw_high = button.is_high();
        self.debouncer.poll(raw_high, clock.now_ms())?;

        self.press_count = self.press_count.saturating_add(1);
        info!("Button Pressed. Press Count: {}", self.press_count);

        sink.on_press_edge(self.press_count);
        Some(self.press_count)
    }
}

impl Default for AppLogic {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll forever
pub fn run<B, C, L, D>(
    app: &mut AppLogic,
    button: &mut B,
    clock: &C,
    sink: &mut PresentationSink<L, D>,
) -> !
where
    B: ButtonInput,
    C: Clock,
    L: StatusLed,
    D: Display,
{
    loop {
        app.poll(button, clock, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeButton, FakeClock, FakeLed, RecordingDisplay};
    use crate::model::DisplayFrame;
    use proptest::prelude::*;

    const HIGH: bool = true;
    const LOW: bool = false;

    /// Feed `(level, t)` samples, collecting edge timestamps
    fn edges(debouncer: &mut Debouncer, samples: &[(bool, u64)]) -> Vec<u64> {
        samples
            .iter()
            .filter_map(|&(level, t)| debouncer.poll(level, t))
            .map(|edge| edge.at_ms)
            .collect()
    }

    #[test]
    fn bounce_then_settle_confirms_once_after_window() {
        let mut samples = Vec::new();
        samples.extend((0..10).map(|_| (HIGH, 0)));
        samples.extend((0..5).map(|t| (LOW, t)));
        samples.push((HIGH, 5));
        samples.extend((6..106).map(|t| (LOW, t)));

        let mut debouncer = Debouncer::new();
        assert_eq!(edges(&mut debouncer, &samples), vec![57]);
        assert!(!debouncer.is_released());
    }

    #[test]
    fn held_press_fires_once() {
        let samples: Vec<_> = (0..=200).map(|t| (LOW, 1_000 + t)).collect();
        let mut debouncer = Debouncer::new();
        assert_eq!(edges(&mut debouncer, &samples).len(), 1);
    }

    #[test]
    fn press_within_window_is_ignored() {
        let mut samples: Vec<_> = (0..=50).map(|t| (LOW, 100 + t)).collect();
        samples.extend((151..400).map(|t| (HIGH, t)));
        let mut debouncer = Debouncer::new();
        assert!(edges(&mut debouncer, &samples).is_empty());
    }

    #[test]
    fn exactly_window_is_not_enough() {
        let mut debouncer = Debouncer::new();
        assert_eq!(debouncer.poll(LOW, 100), None);
        assert_eq!(debouncer.poll(LOW, 150), None);
        assert_eq!(debouncer.poll(LOW, 151), Some(PressEdge { at_ms: 151 }));
    }

    #[test]
    fn release_is_silent_and_rearms() {
        let mut debouncer = Debouncer::new();
        let mut samples: Vec<_> = (0..100).map(|t| (LOW, 10 + t)).collect();
        samples.extend((110..300).map(|t| (HIGH, t)));
        samples.extend((300..400).map(|t| (LOW, t)));

        let fired = edges(&mut debouncer, &samples);
        assert_eq!(fired, vec![61, 351]);
    }

    #[test]
    fn short_release_glitch_does_not_double_count() {
        let mut debouncer = Debouncer::new();
        let mut samples: Vec<_> = (0..100).map(|t| (LOW, 10 + t)).collect();
        // 20 ms release blip, shorter than the window
        samples.extend((110..130).map(|t| (HIGH, t)));
        samples.extend((130..300).map(|t| (LOW, t)));

        assert_eq!(edges(&mut debouncer, &samples).len(), 1);
    }

    #[test]
    fn clock_going_backwards_does_not_underflow() {
        let mut debouncer = Debouncer::new();
        debouncer.poll(LOW, 500);
        assert_eq!(debouncer.poll(LOW, 10), None);
    }

    #[test]
    fn custom_window() {
        let mut debouncer = Debouncer::with_window(5);
        let samples: Vec<_> = (0..20).map(|t| (LOW, 100 + t)).collect();
        assert_eq!(edges(&mut debouncer, &samples), vec![106]);
        assert_eq!(debouncer.window_ms(), 5);
    }

    #[test]
    fn poll_counts_and_toggles_in_lockstep() {
        let mut app = AppLogic::new();
        let mut button = FakeButton::released();
        let mut clock = FakeClock::new();
        let mut sink = PresentationSink::new(FakeLed::default(), Some(RecordingDisplay::default()));
        sink.boot(&mut clock);

        let mut counts = Vec::new();
        for press in 0..3 {
            button.high = LOW;
            for _ in 0..80 {
                clock.advance(1);
                counts.extend(app.poll(&mut button, &clock, &mut sink));
            }
            button.high = HIGH;
            for _ in 0..80 {
                clock.advance(1);
                assert!(app.poll(&mut button, &clock, &mut sink).is_none());
            }
            assert_eq!(app.press_count(), press + 1);
            assert_eq!(sink.led_on(), (press + 1) % 2 == 1);
        }

        assert_eq!(counts, vec![1, 2, 3]);
        assert_eq!(sink.led().toggles(), 3);

        // Idle shows once at boot; releases never redraw
        let frames = sink.display().map(|d| d.frames.clone()).unwrap_or_default();
        assert_eq!(
            frames,
            vec![
                DisplayFrame::Greeting,
                DisplayFrame::Idle,
                DisplayFrame::PressCount {
                    presses: 1,
                    led_on: true
                },
                DisplayFrame::PressCount {
                    presses: 2,
                    led_on: false
                },
                DisplayFrame::PressCount {
                    presses: 3,
                    led_on: true
                },
            ]
        );
    }

    #[test]
    fn headless_poll_still_counts() {
        let mut app = AppLogic::new();
        let mut button = FakeButton::released();
        let mut clock = FakeClock::new();
        let mut sink = PresentationSink::headless(FakeLed::default());
        sink.boot(&mut clock);

        button.high = LOW;
        for _ in 0..60 {
            clock.advance(1);
            app.poll(&mut button, &clock, &mut sink);
        }
        assert_eq!(app.press_count(), 1);
        assert!(sink.led_on());
        assert!(sink.display().is_none());
    }

    fn level_sequence() -> impl Strategy<Value = Vec<(bool, u64)>> {
        // (level, ms until next sample)
        prop::collection::vec((any::<bool>(), 0u64..40), 1..400)
    }

    /// One press cycle: released gap (long enough to re-arm), contact bounce, LOW hold.
    /// All samples are 1 ms apart.
    fn press_cycle() -> impl Strategy<Value = (u64, Vec<bool>, u64)> {
        (
            DEBOUNCE_WINDOW_MS + 2..120,
            prop::collection::vec(any::<bool>(), 0..10),
            0u64..120,
        )
    }

    proptest! {
        #[test]
        fn edges_only_after_stable_low(steps in level_sequence()) {
            let mut t = 0;
            let mut samples = Vec::new();
            for (level, dt) in steps {
                t += dt;
                samples.push((level, t));
            }

            let mut debouncer = Debouncer::new();
            let mut last_change = 0;
            let mut prev = HIGH;
            for &(level, t) in &samples {
                if level != prev {
                    last_change = t;
                }
                prev = level;
                if let Some(edge) = debouncer.poll(level, t) {
                    prop_assert!(!level);
                    prop_assert!(edge.at_ms - last_change > DEBOUNCE_WINDOW_MS);
                }
            }
        }

        #[test]
        fn scripted_presses_confirm_at_known_times(
            cycles in prop::collection::vec(press_cycle(), 1..20),
        ) {
            let mut samples = Vec::new();
            let mut expected = Vec::new();
            let mut t = 0;
            for (gap, bounce, hold) in cycles {
                for _ in 0..gap {
                    samples.push((HIGH, t));
                    t += 1;
                }
                // Bounce always ends released, so the hold starts with a fresh level change
                for level in bounce.into_iter().chain(core::iter::once(HIGH)) {
                    samples.push((level, t));
                    t += 1;
                }
                let hold_start = t;
                for _ in 0..hold {
                    samples.push((LOW, t));
                    t += 1;
                }
                // Confirmed on the first sample strictly more than the window after the change
                if hold > DEBOUNCE_WINDOW_MS + 1 {
                    expected.push(hold_start + DEBOUNCE_WINDOW_MS + 1);
                }
            }

            prop_assert_eq!(edges(&mut Debouncer::new(), &samples), expected);
        }

        #[test]
        fn releases_never_count(len in 1usize..300) {
            let mut debouncer = Debouncer::new();
            for t in 0..len as u64 {
                prop_assert_eq!(debouncer.poll(HIGH, t * 7), None);
            }
        }

        #[test]
        fn bouncing_press_yields_at_most_one_edge(
            bounce in prop::collection::vec(any::<bool>(), 0..49),
            hold in 0u64..300,
        ) {
            // One genuine press: bounce at 1 ms per sample (inside the window), then hold LOW
            let mut debouncer = Debouncer::new();
            let mut fired = 0;
            let mut t = 1_000;
            for level in bounce {
                fired += debouncer.poll(level, t).is_some() as usize;
                t += 1;
            }
            for _ in 0..hold {
                fired += debouncer.poll(LOW, t).is_some() as usize;
                t += 1;
            }
            prop_assert!(fired <= 1);
        }
    }
}
