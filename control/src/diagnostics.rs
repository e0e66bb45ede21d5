//! Screen visualizing the internal state of the signal tracker.
//!
//! The bottom rows of the display show the whole range of the analog
//! input from left to right:
//!
//! ```text
//! row -4:  [min:blue]   [baseline:green]   [max:red]
//! row -3:  ===== white scale, green span of the sample deviation =====
//! row -2:  [trigger low:blue]  [baseline:green]  [trigger high:red]
//! ```
//!
//! The middle of the scale turns magenta for a moment after each event.

use matrix_dsp::signal_tracker::SignalTracker;

use crate::canvas::{Canvas, Color};

/// How long the event marker stays lit, in milliseconds.
const EVENT_MARKER_DURATION: u32 = 100;

pub fn draw(canvas: &mut impl Canvas, tracker: &SignalTracker, now: u32) {
    let width = i32::from(canvas.width());
    let height = i32::from(canvas.height());
    let scale = Scale::new(tracker.sample_max(), width);

    let (top, middle, bottom) = (height - 4, height - 3, height - 2);

    canvas.clear();
    canvas.draw_line((0, height / 2), (width - 1, height / 2), Color::RED);
    canvas.draw_line((0, middle), (width - 1, middle), Color::WHITE);

    let baseline = scale.pixel(tracker.baseline());
    let sample = scale.pixel(f32::from(tracker.last_sample()));
    let deviation = (baseline - sample).abs();
    canvas.set_pixel(baseline, top, Color::GREEN);
    canvas.draw_line(
        (baseline - deviation, middle),
        (baseline + deviation, middle),
        Color::GREEN,
    );
    canvas.set_pixel(baseline, bottom, Color::GREEN);

    canvas.set_pixel(scale.pixel(tracker.min()), top, Color::BLUE);
    canvas.set_pixel(scale.pixel(tracker.max()), top, Color::RED);

    let (trigger_low, trigger_high) = tracker.trigger_band();
    canvas.set_pixel(scale.pixel(trigger_low), bottom, Color::BLUE);
    canvas.set_pixel(scale.pixel(trigger_high), bottom, Color::RED);

    if tracker.millis_since_event(now) < EVENT_MARKER_DURATION {
        canvas.set_pixel(baseline, middle, Color::MAGENTA);
    }
}

/// Translation of raw sample values to columns.
struct Scale {
    factor: f32,
}

impl Scale {
    fn new(sample_max: u16, width: i32) -> Self {
        Self {
            factor: (width - 1) as f32 / f32::from(sample_max.max(1)),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn pixel(&self, value: f32) -> i32 {
        libm::roundf(value * self.factor) as i32
    }
}
