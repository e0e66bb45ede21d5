//! Catalogue of animations reacting to the sound.

use matrix_dsp::signal_tracker::SignalTracker;

use crate::ball::Ball;
use crate::canvas::{Canvas, Color};
use crate::geometry::Domain;
use crate::random::Random;

/// How long it takes the flash to fade out, in milliseconds.
const FLASH_DURATION: u32 = 200;

/// Number of history columns of the level meter.
pub const METER_BINS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Dark screen.
    Off,
    /// The whole screen flashes on each event.
    Flash,
    /// Outline of a rectangle growing with loudness.
    Frame,
    /// Filled rectangle growing with loudness.
    Pulse,
    /// Scrolling history of loudness.
    Meter,
    /// Ball crossing the screen on each event.
    Ball,
}

impl Mode {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::Flash,
            Self::Flash => Self::Frame,
            Self::Frame => Self::Pulse,
            Self::Pulse => Self::Meter,
            Self::Meter => Self::Ball,
            Self::Ball => Self::Off,
        }
    }
}

/// State of all animations.
///
/// Each animation keeps evolving on events even while it is not shown, so
/// switching between them does not restart anything.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Animation {
    mode: Mode,
    domain: Domain,
    ball: Ball,
    meter: Meter,
    flashed_at: Option<u32>,
}

impl Animation {
    #[must_use]
    pub fn new(domain: Domain, mode: Mode) -> Self {
        Self {
            mode,
            domain,
            ball: Ball::new(domain),
            meter: Meter::default(),
            flashed_at: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn next_mode(&mut self) -> Mode {
        self.mode = self.mode.next();
        self.mode
    }

    #[must_use]
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// React to a freshly detected event.
    pub fn react(&mut self, now: u32, random: &mut impl Random) {
        self.flashed_at = Some(now);
        self.ball.kick(now, random);
    }

    /// Draw the current frame. The canvas is not presented.
    pub fn render(&mut self, canvas: &mut impl Canvas, tracker: &SignalTracker, now: u32) {
        canvas.clear();
        match self.mode {
            Mode::Off => (),
            Mode::Flash => self.render_flash(canvas, now),
            Mode::Frame => {
                let (x, y, width, height) = self.level_rect(tracker.level());
                canvas.draw_rect(x, y, width, height, Color::WHITE);
            }
            Mode::Pulse => {
                let (x, y, width, height) = self.level_rect(tracker.level());
                canvas.fill_rect(x, y, width, height, Color::WHITE);
            }
            Mode::Meter => {
                self.meter.push(tracker.level());
                self.meter.draw(canvas);
            }
            Mode::Ball => {
                let position = self.ball.position(now, tracker.event_interval());
                canvas.set_pixel(round(position.x), round(position.y), Color::WHITE);
            }
        }
    }

    fn render_flash(&self, canvas: &mut impl Canvas, now: u32) {
        let Some(flashed_at) = self.flashed_at else {
            return;
        };
        let elapsed = now.wrapping_sub(flashed_at);
        if elapsed >= FLASH_DURATION {
            return;
        }
        let intensity = 1.0 - elapsed as f32 / FLASH_DURATION as f32;
        let (width, height) = (i32::from(canvas.width()), i32::from(canvas.height()));
        canvas.fill_rect(0, 0, width, height, Color::WHITE.scaled(intensity));
    }

    /// Rectangle centered on the screen, spanning it whole on full level.
    fn level_rect(&self, level: f32) -> (i32, i32, i32, i32) {
        let width = f32::from(self.domain.width());
        let height = f32::from(self.domain.height());
        let (center_x, center_y) = (width / 2.0, height / 2.0);
        (
            round(center_x - level * center_x),
            round(center_y - level * center_y),
            round(level * width),
            round(level * height),
        )
    }
}

/// History of levels, the newest on the right.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Meter {
    bins: [f32; METER_BINS],
}

impl Meter {
    pub fn push(&mut self, level: f32) {
        self.bins.rotate_left(1);
        self.bins[METER_BINS - 1] = level.clamp(0.0, 1.0);
    }

    #[must_use]
    pub fn bins(&self) -> &[f32; METER_BINS] {
        &self.bins
    }

    fn draw(&self, canvas: &mut impl Canvas) {
        let columns = usize::from(canvas.width()).min(METER_BINS);
        let height = i32::from(canvas.height());
        let visible = &self.bins[METER_BINS - columns..];
        for (column, level) in (0_i32..).zip(visible) {
            let bar = round(level * height as f32);
            if bar > 0 {
                canvas.fill_rect(column, height - bar, 1, bar, Color::GREEN);
                canvas.set_pixel(column, height - bar, Color::RED);
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round(x: f32) -> i32 {
    libm::roundf(x) as i32
}
