//! Command types understood by the IO box.

use crate::fmt::fraction_to_percent;
use heapless::String;

/// Maximum number of text characters carried by a single `T` command.
pub const MAX_TEXT_LEN: usize = 32;

/// Highest LED brightness the device accepts.
pub const MAX_BRIGHTNESS: u8 = 99;

/// Highest colour component percentage on the wire.
pub const MAX_COLOUR: u8 = 100;

/// RGB colour with components in the range 0..1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Colour {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Colour {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Components as rounded wire percentages (0-100).
    #[must_use]
    pub fn to_percent(self) -> [u8; 3] {
        [
            fraction_to_percent(self.red),
            fraction_to_percent(self.green),
            fraction_to_percent(self.blue),
        ]
    }
}

/// A single IO box command.
///
/// Every command is one ASCII line on the wire; see [`crate::serialize`]
/// for the encoding and [`crate::parser`] for the device-side decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Identify the device (`E`).
    Echo,
    /// Steady LED brightness (`L<id>,<brightness>`).
    SetLed { led: u8, brightness: u8 },
    /// Blinking LED (`L<id>,<brightness>,<interval_ms>,<duty>`).
    SetLedBlink {
        led: u8,
        brightness: u8,
        interval_ms: u16,
        duty: u8,
    },
    /// LED colour as percentages (`M<id>,<r>,<g>,<b>`).
    SetLedColour { led: u8, red: u8, green: u8, blue: u8 },
    /// Move the LCD cursor (`P<line>` or `P<line>,<col>`).
    SelectCursor { line: u8, column: Option<u8> },
    /// Write text at the cursor (`T"<text>"`).
    WriteText(String<MAX_TEXT_LEN>),
    /// Clear the LCD (`C`).
    Clear,
    /// Read and reset the press counter of a button (`b<id>`).
    PollButton { button: u8 },
}

impl Command {
    /// Steady brightness, clamped to 0..=99.
    pub fn led(led: u8, brightness: u8) -> Self {
        Self::SetLed {
            led,
            brightness: brightness.min(MAX_BRIGHTNESS),
        }
    }

    /// Blinking LED. Brightness is clamped to 0..=99 and duty to 1..=99.
    pub fn led_blink(led: u8, brightness: u8, interval_ms: u16, duty: u8) -> Self {
        Self::SetLedBlink {
            led,
            brightness: brightness.min(MAX_BRIGHTNESS),
            interval_ms,
            duty: duty.clamp(1, 99),
        }
    }

    /// LED colour from a 0..1 [`Colour`].
    pub fn led_colour(led: u8, colour: Colour) -> Self {
        let [red, green, blue] = colour.to_percent();
        Self::SetLedColour {
            led,
            red,
            green,
            blue,
        }
    }

    pub fn cursor(line: u8, column: Option<u8>) -> Self {
        Self::SelectCursor { line, column }
    }

    /// Text command with the payload sanitized for the wire.
    ///
    /// Only printable ASCII survives: `"` becomes `'`, anything else
    /// becomes `?`. Text longer than [`MAX_TEXT_LEN`] is truncated.
    pub fn text(text: &str) -> Self {
        let mut out = String::new();
        for c in text.chars() {
            let c = match c {
                '"' => '\'',
                ' '..='~' => c,
                _ => '?',
            };
            if out.push(c).is_err() {
                break;
            }
        }
        Self::WriteText(out)
    }

    pub fn poll_button(button: u8) -> Self {
        Self::PollButton { button }
    }

    /// Text payload length, used to scale acknowledgement timeouts.
    #[must_use]
    pub fn text_len(&self) -> usize {
        match self {
            Self::WriteText(text) => text.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_clamps_brightness() {
        assert_eq!(
            Command::led(0, 150),
            Command::SetLed {
                led: 0,
                brightness: 99
            }
        );
    }

    #[test]
    fn test_led_blink_clamps_duty() {
        assert_eq!(
            Command::led_blink(1, 99, 500, 0),
            Command::SetLedBlink {
                led: 1,
                brightness: 99,
                interval_ms: 500,
                duty: 1
            }
        );
        assert_eq!(
            Command::led_blink(1, 99, 500, 100),
            Command::SetLedBlink {
                led: 1,
                brightness: 99,
                interval_ms: 500,
                duty: 99
            }
        );
    }

    #[test]
    fn test_led_colour_scaling() {
        assert_eq!(
            Command::led_colour(2, Colour::RED),
            Command::SetLedColour {
                led: 2,
                red: 100,
                green: 0,
                blue: 0
            }
        );
        assert_eq!(Colour::new(0.25, 0.5, 2.0).to_percent(), [25, 50, 100]);
    }

    #[test]
    fn test_text_sanitizes_payload() {
        let Command::WriteText(text) = Command::text("say \"hi\"\n\u{e9}") else {
            panic!("expected text command");
        };
        assert_eq!(text.as_str(), "say 'hi'??");
    }

    #[test]
    fn test_text_truncates() {
        let long = "0123456789012345678901234567890123456789";
        let cmd = Command::text(long);
        assert_eq!(cmd.text_len(), MAX_TEXT_LEN);
    }
}
