//! Device-side command parser.
//!
//! Decodes one command line (terminator optional) into a [`Command`].
//! The IO box firmware model uses this to execute what the host sends.

use crate::command::{Command, MAX_TEXT_LEN};
use crate::reply::strip_line_ending;
use heapless::String;

/// Maximum line length for the protocol (including newline).
pub const MAX_LINE_LENGTH: usize = 64;

/// Error type for command parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Empty line.
    Empty,
    /// Unknown command letter.
    UnknownCommand,
    /// Known command with invalid arguments.
    Malformed,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::Malformed => write!(f, "malformed arguments"),
        }
    }
}

/// Parse a single command line.
///
/// # Example
///
/// ```text
/// L0,99,500,50\n  -> Command::SetLedBlink { led: 0, brightness: 99, interval_ms: 500, duty: 50 }
/// P1,4\n          -> Command::SelectCursor { line: 1, column: Some(4) }
/// T"Ready"\n      -> Command::WriteText("Ready")
/// ```
pub fn parse_command(line: &[u8]) -> Result<Command, ParseError> {
    let line = strip_line_ending(line);
    let (&letter, args) = line.split_first().ok_or(ParseError::Empty)?;

    match letter {
        b'E' => no_args(args).map(|()| Command::Echo),
        b'C' => no_args(args).map(|()| Command::Clear),
        b'L' => parse_led(args),
        b'M' => {
            let [led, red, green, blue] = split_u8::<4>(args)?;
            Ok(Command::SetLedColour {
                led,
                red,
                green,
                blue,
            })
        }
        b'P' => {
            let mut parts = args.split(|&b| b == b',');
            let line = parse_u8(parts.next().ok_or(ParseError::Malformed)?)?;
            let column = parts.next().map(parse_u8).transpose()?;
            if parts.next().is_some() {
                return Err(ParseError::Malformed);
            }
            Ok(Command::SelectCursor { line, column })
        }
        b'T' => parse_text(args),
        b'b' => Ok(Command::PollButton {
            button: parse_u8(args)?,
        }),
        _ => Err(ParseError::UnknownCommand),
    }
}

fn no_args(args: &[u8]) -> Result<(), ParseError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ParseError::Malformed)
    }
}

/// `L<id>,<brightness>` or `L<id>,<brightness>,<interval>,<duty>`.
fn parse_led(args: &[u8]) -> Result<Command, ParseError> {
    let mut parts = args.split(|&b| b == b',');
    let led = parse_u8(parts.next().ok_or(ParseError::Malformed)?)?;
    let brightness = parse_u8(parts.next().ok_or(ParseError::Malformed)?)?;

    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => Ok(Command::SetLed { led, brightness }),
        (Some(interval), Some(duty), None) => Ok(Command::SetLedBlink {
            led,
            brightness,
            interval_ms: parse_u16(interval)?,
            duty: parse_u8(duty)?,
        }),
        _ => Err(ParseError::Malformed),
    }
}

/// `T"<text>"`: everything between the first and the last quote.
fn parse_text(args: &[u8]) -> Result<Command, ParseError> {
    if args.len() < 2 || args[0] != b'"' || args[args.len() - 1] != b'"' {
        return Err(ParseError::Malformed);
    }
    let body = core::str::from_utf8(&args[1..args.len() - 1]).map_err(|_| ParseError::Malformed)?;
    let mut text: String<MAX_TEXT_LEN> = String::new();
    text.push_str(body).map_err(|_| ParseError::Malformed)?;
    Ok(Command::WriteText(text))
}

/// Split exactly `N` comma-separated u8 fields.
fn split_u8<const N: usize>(args: &[u8]) -> Result<[u8; N], ParseError> {
    let mut out = [0u8; N];
    let mut parts = args.split(|&b| b == b',');
    for slot in &mut out {
        *slot = parse_u8(parts.next().ok_or(ParseError::Malformed)?)?;
    }
    if parts.next().is_some() {
        return Err(ParseError::Malformed);
    }
    Ok(out)
}

/// Parse a decimal string as u8.
#[inline]
fn parse_u8(s: &[u8]) -> Result<u8, ParseError> {
    let value = parse_u16(s)?;
    u8::try_from(value).map_err(|_| ParseError::Malformed)
}

/// Parse a decimal string as u16.
#[inline]
fn parse_u16(s: &[u8]) -> Result<u16, ParseError> {
    if s.is_empty() {
        return Err(ParseError::Malformed);
    }

    let mut value: u16 = 0;
    for &b in s {
        if !b.is_ascii_digit() {
            return Err(ParseError::Malformed);
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add((b - b'0') as u16))
            .ok_or(ParseError::Malformed)?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command(b"E\n"), Ok(Command::Echo));
        assert_eq!(parse_command(b"C"), Ok(Command::Clear));
        assert_eq!(
            parse_command(b"b1\r\n"),
            Ok(Command::PollButton { button: 1 })
        );
    }

    #[test]
    fn test_parse_led() {
        assert_eq!(
            parse_command(b"L0,42\n"),
            Ok(Command::SetLed {
                led: 0,
                brightness: 42
            })
        );
        assert_eq!(
            parse_command(b"L1,99,500,50\n"),
            Ok(Command::SetLedBlink {
                led: 1,
                brightness: 99,
                interval_ms: 500,
                duty: 50
            })
        );
    }

    #[test]
    fn test_parse_led_wrong_arity() {
        assert_eq!(parse_command(b"L0"), Err(ParseError::Malformed));
        assert_eq!(parse_command(b"L0,1,2"), Err(ParseError::Malformed));
        assert_eq!(parse_command(b"L0,1,2,3,4"), Err(ParseError::Malformed));
    }

    #[test]
    fn test_parse_colour() {
        assert_eq!(
            parse_command(b"M2,100,0,0"),
            Ok(Command::SetLedColour {
                led: 2,
                red: 100,
                green: 0,
                blue: 0
            })
        );
        assert_eq!(parse_command(b"M2,100,0"), Err(ParseError::Malformed));
        assert_eq!(parse_command(b"M2,300,0,0"), Err(ParseError::Malformed));
    }

    #[test]
    fn test_parse_cursor() {
        assert_eq!(
            parse_command(b"P0"),
            Ok(Command::SelectCursor {
                line: 0,
                column: None
            })
        );
        assert_eq!(
            parse_command(b"P1,12"),
            Ok(Command::SelectCursor {
                line: 1,
                column: Some(12)
            })
        );
        assert_eq!(parse_command(b"P"), Err(ParseError::Malformed));
        assert_eq!(parse_command(b"P1,2,3"), Err(ParseError::Malformed));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(
            parse_command(b"T\"Speed: 0000 km/h\"\n"),
            Ok(Command::text("Speed: 0000 km/h"))
        );
        assert_eq!(parse_command(b"T\"\""), Ok(Command::text("")));
        assert_eq!(parse_command(b"TReady"), Err(ParseError::Malformed));
        assert_eq!(parse_command(b"T\""), Err(ParseError::Malformed));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_command(b""), Err(ParseError::Empty));
        assert_eq!(parse_command(b"\n"), Err(ParseError::Empty));
        assert_eq!(parse_command(b"X1"), Err(ParseError::UnknownCommand));
        assert_eq!(parse_command(b"E1"), Err(ParseError::Malformed));
        assert_eq!(parse_command(b"Lx,1"), Err(ParseError::Malformed));
    }
}
