//! Push button with press counting.

/// Highest press count reported in one poll answer.
pub const MAX_REPORTED_PRESSES: u8 = 9;

/// Debounced push button.
///
/// The button is sampled with [`sample`](Button::sample); every rising edge
/// counts as one press until the count is taken.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Button {
    pressed: bool,
    presses: u8,
}

impl Button {
    pub const fn new() -> Self {
        Self {
            pressed: false,
            presses: 0,
        }
    }

    /// Feed the current level. Returns `true` on a state change.
    pub fn sample(&mut self, pressed: bool) -> bool {
        let changed = pressed != self.pressed;
        if changed && pressed {
            self.presses = self.presses.saturating_add(1);
        }
        self.pressed = pressed;
        changed
    }

    /// Press and release once.
    pub fn click(&mut self) {
        self.sample(true);
        self.sample(false);
    }

    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Presses since the last call, at most [`MAX_REPORTED_PRESSES`].
    pub fn take_presses(&mut self) -> u8 {
        let presses = self.presses.min(MAX_REPORTED_PRESSES);
        self.presses = 0;
        presses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_rising_edges() {
        let mut button = Button::new();
        assert!(button.sample(true));
        assert!(!button.sample(true));
        assert!(button.is_pressed());
        assert!(button.sample(false));
        button.click();
        assert_eq!(button.take_presses(), 2);
        assert_eq!(button.take_presses(), 0);
    }

    #[test]
    fn test_take_presses_capped() {
        let mut button = Button::new();
        for _ in 0..20 {
            button.click();
        }
        assert_eq!(button.take_presses(), MAX_REPORTED_PRESSES);
        assert_eq!(button.take_presses(), 0);
    }
}
