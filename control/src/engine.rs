//! The main loop of the display, tying input, detection and rendering.

use matrix_dsp::signal_tracker::{Config as TrackerConfig, SignalTracker};

use crate::animation::{Animation, Mode};
use crate::canvas::Canvas;
use crate::diagnostics;
use crate::geometry::Domain;
use crate::input::button::{Button, Press};
use crate::input::snapshot::Snapshot;
use crate::log;
use crate::random::Random;
use crate::schedule::Periodic;

/// Constants of the whole module. Times are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub domain: Domain,
    pub tracker: TrackerConfig,
    pub brightness: u8,
    pub diagnostics_brightness: u8,
    pub sample_period: u32,
    pub recalibration_period: u32,
    pub frame_period: u32,
    pub debounce: u32,
    pub long_press: u32,
    pub initial_mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: Domain::default(),
            tracker: TrackerConfig::default(),
            brightness: 100,
            diagnostics_brightness: 25,
            sample_period: 1,
            recalibration_period: 2000,
            frame_period: 30,
            debounce: 100,
            long_press: 2000,
            initial_mode: Mode::Ball,
        }
    }
}

/// What is shown on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Animation,
    Diagnostics,
}

/// Response of the engine after processing a snapshot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reaction {
    /// An event was detected in this tick.
    pub event: bool,
    /// The canvas was redrawn and presented.
    pub rendered: bool,
    pub press: Option<Press>,
}

/// The central piece of the module.
///
/// It takes `Snapshot` on its input on every iteration of the main loop
/// and runs all the periodic tasks that are due. Within a single tick,
/// sampling precedes the reaction to an event which precedes rendering,
/// so an event is visible in the very frame of its tick.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Engine {
    config: Config,
    tracker: SignalTracker,
    animation: Animation,
    button: Button,
    screen: Screen,
    sampling: Periodic,
    recalibration: Periodic,
    frame: Periodic,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tracker: SignalTracker::new(config.tracker),
            animation: Animation::new(config.domain, config.initial_mode),
            button: Button::new(config.debounce, config.long_press),
            screen: Screen::Animation,
            sampling: Periodic::new(config.sample_period),
            recalibration: Periodic::new(config.recalibration_period),
            frame: Periodic::new(config.frame_period),
        }
    }

    pub fn tick(
        &mut self,
        snapshot: Snapshot,
        canvas: &mut impl Canvas,
        random: &mut impl Random,
    ) -> Reaction {
        let now = snapshot.now;
        let mut reaction = Reaction::default();

        if self.sampling.poll(now) {
            reaction.event = self.tracker.sample(snapshot.sample, now);
        }

        if self.recalibration.poll(now) {
            self.tracker.recalibrate(now);
        }

        if reaction.event {
            self.animation.react(now, random);
        }

        if self.frame.poll(now) {
            self.render(canvas, now);
            reaction.rendered = true;
        }

        reaction.press = self.button.update(snapshot.button, now);
        if let Some(press) = reaction.press {
            self.apply_press(press);
        }

        reaction
    }

    fn render(&mut self, canvas: &mut impl Canvas, now: u32) {
        match self.screen {
            Screen::Animation => {
                canvas.set_brightness(self.config.brightness);
                self.animation.render(canvas, &self.tracker, now);
            }
            Screen::Diagnostics => {
                canvas.set_brightness(self.config.diagnostics_brightness);
                diagnostics::draw(canvas, &self.tracker, now);
            }
        }
        canvas.present();
    }

    fn apply_press(&mut self, press: Press) {
        match (press, self.screen) {
            (Press::Long, _) => {
                self.screen = Screen::Diagnostics;
                log::info!("Entering diagnostics");
            }
            (Press::Short, _) => {
                if self.screen == Screen::Diagnostics {
                    self.screen = Screen::Animation;
                    log::info!("Leaving diagnostics");
                }
                let _mode = self.animation.next_mode();
                log::info!("Switched to mode={}", _mode);
            }
        }
    }

    #[must_use]
    pub fn tracker(&self) -> &SignalTracker {
        &self.tracker
    }

    #[must_use]
    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.animation.set_mode(mode);
    }
}
