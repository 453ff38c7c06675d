//! Device replies and their host-side interpretation.
//!
//! Every command is answered with exactly one line:
//!
//! | Reply | Line | Sent for |
//! |---|---|---|
//! | [`Reply::Ack`] | `+` | accepted `L`, `M`, `P`, `T`, `C` |
//! | [`Reply::Nack`] | `!` | malformed or rejected commands |
//! | [`Reply::Identity`] | free text, > 1 char | `E` |
//! | [`Reply::Presses`] | `<id><count>` | `b<id>` |

use heapless::String;

/// Maximum identity string length kept from an `E` reply.
pub const MAX_IDENTITY_LEN: usize = 32;

/// A reply line produced by the device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Command accepted.
    Ack,
    /// Command rejected.
    Nack,
    /// Identification string.
    Identity(String<MAX_IDENTITY_LEN>),
    /// Presses counted since the last poll (0-9).
    Presses { button: u8, count: u8 },
}

impl Reply {
    /// Identity reply, truncated to [`MAX_IDENTITY_LEN`].
    pub fn identity(identity: &str) -> Self {
        let mut out = String::new();
        for c in identity.chars() {
            if out.push(c).is_err() {
                break;
            }
        }
        Self::Identity(out)
    }
}

/// Error type for interpreting reply lines on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyError {
    /// The line is not the expected acknowledgement or answer.
    Unexpected,
    /// The device reported an error (`!`).
    Device,
}

impl core::fmt::Display for ReplyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unexpected => write!(f, "unexpected reply"),
            Self::Device => write!(f, "device reported error"),
        }
    }
}

/// Check a one-character `+` acknowledgement.
///
/// Trailing CR/LF is ignored.
pub fn parse_ack(line: &[u8]) -> Result<(), ReplyError> {
    match strip_line_ending(line) {
        b"+" => Ok(()),
        b"!" => Err(ReplyError::Device),
        _ => Err(ReplyError::Unexpected),
    }
}

/// Interpret a button poll answer.
///
/// The answer is two characters; the second is the press count digit.
/// A `!` in either position is a device-reported error.
pub fn parse_presses(line: &[u8]) -> Result<u8, ReplyError> {
    let line = strip_line_ending(line);

    if line.first() == Some(&b'!') || line.get(1) == Some(&b'!') {
        return Err(ReplyError::Device);
    }

    match line {
        [_, count] if count.is_ascii_digit() => Ok(count - b'0'),
        _ => Err(ReplyError::Unexpected),
    }
}

/// Interpret an `E` answer; an identity must be longer than one character.
pub fn parse_identity(line: &[u8]) -> Result<&str, ReplyError> {
    let line = strip_line_ending(line);
    if line.len() <= 1 {
        return Err(ReplyError::Unexpected);
    }
    core::str::from_utf8(line).map_err(|_| ReplyError::Unexpected)
}

/// Strip trailing CR and/or LF from a line.
#[inline]
pub fn strip_line_ending(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    if end > 0 && line[end - 1] == b'\n' {
        end -= 1;
    }
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    &line[..end]
}
