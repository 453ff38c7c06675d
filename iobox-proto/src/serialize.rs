//! Protocol serialization for IO box commands and replies.
//!
//! This module provides the [`Serialize`] trait for serializing [`Command`]
//! and [`Reply`] to the line protocol.
//!
//! # Protocol Format
//!
//! ```text
//! E\n
//! L<id>,<brightness>\n
//! L<id>,<brightness>,<interval_ms>,<duty>\n
//! M<id>,<red>,<green>,<blue>\n
//! P<line>[,<col>]\n
//! T"<text>"\n
//! C\n
//! b<id>\n
//! ```
//!
//! # Example
//!
//! ```
//! use iobox_proto::{Colour, Command, Serialize};
//!
//! let mut buf = [0u8; 64];
//! let len = Command::led_colour(2, Colour::RED).serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"M2,100,0,0\n");
//! ```

use crate::command::{Command, MAX_TEXT_LEN};
use crate::fmt::{write_u16, write_u8};
use crate::reply::{Reply, MAX_IDENTITY_LEN};

/// Maximum size of a serialized command.
///
/// Breakdown: T(1) + quotes(2) + text(32) + \n(1) = 36.
/// We use 40 for safety margin.
pub const MAX_COMMAND_SIZE: usize = MAX_TEXT_LEN + 8;

/// Maximum size of a serialized reply (identity line plus newline).
pub const MAX_REPLY_SIZE: usize = MAX_IDENTITY_LEN + 1;

/// Helper for bounds-checked writes into the output buffer.
struct SerializeBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SerializeBuf<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn write(&mut self, byte: u8) -> Result<(), SerializeError> {
        let slot = self
            .buf
            .get_mut(self.pos)
            .ok_or(SerializeError::BufferTooSmall)?;
        *slot = byte;
        self.pos += 1;
        Ok(())
    }

    #[inline]
    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        for &b in bytes {
            self.write(b)?;
        }
        Ok(())
    }

    #[inline]
    fn write_u8(&mut self, value: u8) -> Result<(), SerializeError> {
        let mut tmp = [0u8; 3];
        let len = write_u8(&mut tmp, value);
        self.write_slice(&tmp[..len])
    }

    #[inline]
    fn write_u16(&mut self, value: u16) -> Result<(), SerializeError> {
        let mut tmp = [0u8; 5];
        let len = write_u16(&mut tmp, value);
        self.write_slice(&tmp[..len])
    }

    /// `,<value>`
    #[inline]
    fn field_u8(&mut self, value: u8) -> Result<(), SerializeError> {
        self.write(b',')?;
        self.write_u8(value)
    }

    /// Terminate the line and return its length.
    #[inline]
    fn finalize(mut self) -> Result<usize, SerializeError> {
        self.write(b'\n')?;
        Ok(self.pos)
    }
}

/// Error type for serialization operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// The output buffer is too small to hold the serialized message.
    BufferTooSmall,
    /// A write operation failed (for writer adapters).
    WriteError,
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::WriteError => write!(f, "write error"),
        }
    }
}

/// Extension trait for serializing protocol lines.
pub trait Serialize {
    /// Serialize to the provided buffer, newline included.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the buffer is not large enough.
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError>;

    /// Serialize to a `heapless::Vec`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if `N` is not large enough.
    fn serialize_to_vec<const N: usize>(&self) -> Result<heapless::Vec<u8, N>, SerializeError> {
        let mut vec = heapless::Vec::new();
        // Resize to full capacity to allow serialize() to write
        vec.resize(N, 0)
            .map_err(|_| SerializeError::BufferTooSmall)?;
        let len = self.serialize(&mut vec)?;
        vec.truncate(len);
        Ok(vec)
    }

    /// Serialize to a `core::fmt::Write` implementation.
    ///
    /// This can be used with types like `heapless::String`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::WriteError`] if the write fails.
    fn serialize_fmt<W: core::fmt::Write>(&self, writer: &mut W) -> Result<(), SerializeError> {
        let mut buf = [0u8; MAX_COMMAND_SIZE];
        let len = self.serialize(&mut buf)?;
        let s = core::str::from_utf8(&buf[..len]).map_err(|_| SerializeError::WriteError)?;
        writer.write_str(s).map_err(|_| SerializeError::WriteError)
    }
}

impl Serialize for Command {
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let mut sb = SerializeBuf::new(buf);

        match self {
            Self::Echo => sb.write(b'E')?,
            Self::SetLed { led, brightness } => {
                sb.write(b'L')?;
                sb.write_u8(*led)?;
                sb.field_u8(*brightness)?;
            }
            Self::SetLedBlink {
                led,
                brightness,
                interval_ms,
                duty,
            } => {
                sb.write(b'L')?;
                sb.write_u8(*led)?;
                sb.field_u8(*brightness)?;
                sb.write(b',')?;
                sb.write_u16(*interval_ms)?;
                sb.field_u8(*duty)?;
            }
            Self::SetLedColour {
                led,
                red,
                green,
                blue,
            } => {
                sb.write(b'M')?;
                sb.write_u8(*led)?;
                sb.field_u8(*red)?;
                sb.field_u8(*green)?;
                sb.field_u8(*blue)?;
            }
            Self::SelectCursor { line, column } => {
                sb.write(b'P')?;
                sb.write_u8(*line)?;
                if let Some(column) = column {
                    sb.field_u8(*column)?;
                }
            }
            Self::WriteText(text) => {
                sb.write(b'T')?;
                sb.write(b'"')?;
                sb.write_slice(text.as_bytes())?;
                sb.write(b'"')?;
            }
            Self::Clear => sb.write(b'C')?,
            Self::PollButton { button } => {
                sb.write(b'b')?;
                sb.write_u8(*button)?;
            }
        }

        sb.finalize()
    }
}

impl Serialize for Reply {
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let mut sb = SerializeBuf::new(buf);

        match self {
            Self::Ack => sb.write(b'+')?,
            Self::Nack => sb.write(b'!')?,
            Self::Identity(identity) => sb.write_slice(identity.as_bytes())?,
            Self::Presses { button, count } => {
                // One digit each, so the answer is always two characters
                sb.write(b'0' + button % 10)?;
                sb.write(b'0' + (*count).min(9))?;
            }
        }

        sb.finalize()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::command::Colour;
    use crate::parser::parse_command;

    fn encode(cmd: &Command) -> std::string::String {
        let mut s = std::string::String::new();
        cmd.serialize_fmt(&mut s).unwrap();
        s
    }

    #[test]
    fn test_serialize_echo_and_clear() {
        assert_eq!(encode(&Command::Echo), "E\n");
        assert_eq!(encode(&Command::Clear), "C\n");
    }

    #[test]
    fn test_serialize_led() {
        assert_eq!(encode(&Command::led(0, 42)), "L0,42\n");
        assert_eq!(encode(&Command::led(1, 0)), "L1,0\n");
    }

    #[test]
    fn test_serialize_led_blink() {
        assert_eq!(encode(&Command::led_blink(0, 99, 500, 50)), "L0,99,500,50\n");
    }

    #[test]
    fn test_serialize_led_colour() {
        assert_eq!(encode(&Command::led_colour(2, Colour::RED)), "M2,100,0,0\n");
        assert_eq!(
            encode(&Command::led_colour(2, Colour::new(0.0, 0.5, 1.0))),
            "M2,0,50,100\n"
        );
    }

    #[test]
    fn test_serialize_cursor() {
        assert_eq!(encode(&Command::cursor(0, None)), "P0\n");
        assert_eq!(encode(&Command::cursor(1, Some(12))), "P1,12\n");
    }

    #[test]
    fn test_serialize_text() {
        assert_eq!(
            encode(&Command::text("Speed: 0000 km/h")),
            "T\"Speed: 0000 km/h\"\n"
        );
        assert_eq!(encode(&Command::text("")), "T\"\"\n");
    }

    #[test]
    fn test_serialize_poll_button() {
        assert_eq!(encode(&Command::poll_button(1)), "b1\n");
    }

    #[test]
    fn test_serialize_longest_text_fits() {
        let text: std::string::String = core::iter::repeat('x').take(MAX_TEXT_LEN).collect();
        let vec: heapless::Vec<u8, MAX_COMMAND_SIZE> =
            Command::text(&text).serialize_to_vec().unwrap();
        assert_eq!(vec.len(), MAX_TEXT_LEN + 4);
    }

    #[test]
    fn test_serialize_buffer_too_small() {
        let mut buf = [0u8; 4];
        let result = Command::led_colour(2, Colour::WHITE).serialize(&mut buf);
        assert_eq!(result, Err(SerializeError::BufferTooSmall));
    }

    #[test]
    fn test_serialize_then_parse_blink() {
        let cmd = Command::led_blink(1, 80, 1200, 25);
        let mut buf = [0u8; MAX_COMMAND_SIZE];
        let len = cmd.serialize(&mut buf).unwrap();
        assert_eq!(parse_command(&buf[..len]), Ok(cmd));
    }

    #[test]
    fn test_serialize_replies() {
        let mut buf = [0u8; MAX_REPLY_SIZE];

        let len = Reply::Ack.serialize(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"+\n");

        let len = Reply::Nack.serialize(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"!\n");

        let len = Reply::Presses {
            button: 1,
            count: 3,
        }
        .serialize(&mut buf)
        .unwrap();
        assert_eq!(&buf[..len], b"13\n");

        let len = Reply::identity("IOBOX-1.2").serialize(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"IOBOX-1.2\n");
    }
}
