//! LED with brightness, blinking and optional RGB colour.

use iobox_proto::MAX_BRIGHTNESS;

/// Highest value of a colour component on the device.
pub const MAX_COMPONENT: u8 = 99;

const MIN_RATIO: u8 = 1;
const MAX_RATIO: u8 = 99;
const DEFAULT_RATIO: u8 = 50;

// Component x brightness threshold for a backlight colour bit (50% x 100%)
const BACKLIGHT_THRESHOLD: u16 = 5000;

/// Backlight mask bit for red.
pub const BACKLIGHT_RED: u8 = 0x1;
/// Backlight mask bit for green.
pub const BACKLIGHT_GREEN: u8 = 0x2;
/// Backlight mask bit for blue.
pub const BACKLIGHT_BLUE: u8 = 0x4;

/// A single LED channel.
///
/// Blinking is driven by [`update`](Led::update) with a monotonic
/// millisecond timestamp. While blinking, the LED is lit for
/// `interval * ratio / 100` ms of each `interval`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Led {
    brightness: u8,
    interval_ms: u32,
    ratio: u8,
    on_time: u64,
    off_time: u64,
    lit: bool,
    colour: Option<[u8; 3]>,
}

impl Led {
    /// Single-colour LED.
    pub const fn new() -> Self {
        Self {
            brightness: 0,
            interval_ms: 0,
            ratio: DEFAULT_RATIO,
            on_time: 0,
            off_time: 0,
            lit: true,
            colour: None,
        }
    }

    /// RGB LED, initially black.
    pub const fn rgb() -> Self {
        let mut led = Self::new();
        led.colour = Some([0; 3]);
        led
    }

    #[inline]
    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Brightness as currently visible: 0 during the dark blink phase.
    #[inline]
    #[must_use]
    pub fn current_brightness(&self) -> u8 {
        if self.lit {
            self.brightness
        } else {
            0
        }
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness.min(MAX_BRIGHTNESS);
    }

    #[must_use]
    pub fn blink_interval(&self) -> u32 {
        self.interval_ms
    }

    /// Set the blink period, 0 for steady light.
    pub fn set_blink_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
        if interval_ms == 0 {
            self.lit = true;
        } else {
            // Reschedule on the next update
            self.on_time = 0;
            self.off_time = 0;
        }
    }

    #[must_use]
    pub fn blink_ratio(&self) -> u8 {
        self.ratio
    }

    pub fn set_blink_ratio(&mut self, ratio: u8) {
        self.ratio = ratio.clamp(MIN_RATIO, MAX_RATIO);
    }

    #[must_use]
    pub fn supports_colour(&self) -> bool {
        self.colour.is_some()
    }

    #[must_use]
    pub fn colour(&self) -> Option<[u8; 3]> {
        self.colour
    }

    /// Set the RGB colour. Ignored by single-colour LEDs.
    pub fn set_colour(&mut self, red: u8, green: u8, blue: u8) {
        if let Some(colour) = self.colour.as_mut() {
            *colour = [red, green, blue].map(|c| c.min(MAX_COMPONENT));
        }
    }

    /// Advance blinking to `now_ms`.
    pub fn update(&mut self, now_ms: u64) {
        if self.interval_ms == 0 {
            return;
        }
        let interval = u64::from(self.interval_ms);
        if now_ms >= self.on_time {
            self.off_time = now_ms + interval * u64::from(self.ratio) / 100;
            self.on_time = now_ms + interval;
            self.lit = true;
        } else if now_ms >= self.off_time {
            self.lit = false;
        }
    }

    /// Backlight colour mask for an RGB LED: a colour bit is set while lit
    /// and `component * brightness >= 5000`.
    #[must_use]
    pub fn backlight_mask(&self) -> u8 {
        let Some([red, green, blue]) = self.colour else {
            return 0;
        };
        let brightness = u16::from(self.current_brightness());
        let bit = |component: u8, mask: u8| {
            if u16::from(component) * brightness >= BACKLIGHT_THRESHOLD {
                mask
            } else {
                0
            }
        };
        bit(red, BACKLIGHT_RED) | bit(green, BACKLIGHT_GREEN) | bit(blue, BACKLIGHT_BLUE)
    }
}

impl Default for Led {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_clamped() {
        let mut led = Led::new();
        led.set_brightness(150);
        assert_eq!(led.brightness(), 99);
        assert_eq!(led.current_brightness(), 99);
    }

    #[test]
    fn test_blink_cycle() {
        let mut led = Led::new();
        led.set_brightness(80);
        led.set_blink_ratio(50);
        led.set_blink_interval(500);

        led.update(1000);
        assert_eq!(led.current_brightness(), 80);
        led.update(1249);
        assert_eq!(led.current_brightness(), 80);
        led.update(1250);
        assert_eq!(led.current_brightness(), 0);
        led.update(1500);
        assert_eq!(led.current_brightness(), 80);
    }

    #[test]
    fn test_steady_relights() {
        let mut led = Led::new();
        led.set_brightness(99);
        led.set_blink_interval(100);
        led.update(0);
        led.update(60);
        assert_eq!(led.current_brightness(), 0);

        led.set_blink_interval(0);
        assert_eq!(led.current_brightness(), 99);
        led.update(10_000);
        assert_eq!(led.current_brightness(), 99);
    }

    #[test]
    fn test_ratio_clamped() {
        let mut led = Led::new();
        led.set_blink_ratio(0);
        assert_eq!(led.blink_ratio(), 1);
        led.set_blink_ratio(100);
        assert_eq!(led.blink_ratio(), 99);
    }

    #[test]
    fn test_colour_only_on_rgb() {
        let mut led = Led::new();
        assert!(!led.supports_colour());
        led.set_colour(100, 0, 0);
        assert_eq!(led.colour(), None);
        assert_eq!(led.backlight_mask(), 0);

        let mut rgb = Led::rgb();
        assert!(rgb.supports_colour());
        rgb.set_colour(100, 0, 60);
        assert_eq!(rgb.colour(), Some([99, 0, 60]));
    }

    #[test]
    fn test_backlight_mask() {
        let mut rgb = Led::rgb();
        rgb.set_colour(100, 100, 100);
        assert_eq!(rgb.backlight_mask(), 0);

        rgb.set_brightness(99);
        assert_eq!(rgb.backlight_mask(), BACKLIGHT_RED | BACKLIGHT_GREEN | BACKLIGHT_BLUE);

        // 50 x 99 < 5000
        rgb.set_colour(50, 100, 0);
        assert_eq!(rgb.backlight_mask(), BACKLIGHT_GREEN);
    }

    #[test]
    fn test_backlight_dark_phase() {
        let mut rgb = Led::rgb();
        rgb.set_colour(100, 0, 0);
        rgb.set_brightness(99);
        rgb.set_blink_interval(250);
        rgb.update(0);
        assert_eq!(rgb.backlight_mask(), BACKLIGHT_RED);
        rgb.update(200);
        assert_eq!(rgb.backlight_mask(), 0);
    }
}
