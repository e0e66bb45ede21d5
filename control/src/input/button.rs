//! Manage button's state.

/// Kind of a finished button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Press {
    Short,
    Long,
}

/// Use this to hold button's state over time.
///
/// Changes of the level are ignored until the debounce time passes since
/// the previous change. The press is reported on release, as long if the
/// button was held for more than `long_press` milliseconds.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Button {
    pressed: bool,
    changed_at: u32,
    debounce: u32,
    long_press: u32,
}

impl Button {
    #[must_use]
    pub fn new(debounce: u32, long_press: u32) -> Self {
        Self {
            pressed: false,
            changed_at: 0,
            debounce,
            long_press,
        }
    }

    pub fn update(&mut self, down: bool, now: u32) -> Option<Press> {
        let since_change = now.wrapping_sub(self.changed_at);
        if since_change <= self.debounce || down == self.pressed {
            return None;
        }

        self.pressed = down;
        self.changed_at = now;

        if down {
            None
        } else if since_change > self.long_press {
            Some(Press::Long)
        } else {
            Some(Press::Short)
        }
    }

    #[must_use]
    pub fn pressed(&self) -> bool {
        self.pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_released_shortly_after_press_it_reports_short_press() {
        let mut button = Button::new(100, 2000);
        assert_eq!(button.update(true, 1000), None);
        assert!(button.pressed());
        assert_eq!(button.update(false, 1300), Some(Press::Short));
        assert!(!button.pressed());
    }

    #[test]
    fn when_released_after_long_hold_it_reports_long_press() {
        let mut button = Button::new(100, 2000);
        button.update(true, 1000);
        assert_eq!(button.update(true, 2500), None);
        assert_eq!(button.update(false, 3001), Some(Press::Long));
    }

    #[test]
    fn when_level_bounces_within_debounce_time_it_is_ignored() {
        let mut button = Button::new(100, 2000);
        button.update(true, 1000);
        assert_eq!(button.update(false, 1020), None);
        assert_eq!(button.update(true, 1040), None);
        assert_eq!(button.update(false, 1100), None);
        assert!(button.pressed());
        assert_eq!(button.update(false, 1101), Some(Press::Short));
    }

    #[test]
    fn when_held_still_it_reports_nothing() {
        let mut button = Button::new(100, 2000);
        for now in (0..10_000).step_by(10) {
            assert_eq!(button.update(false, now), None);
        }
    }
}
