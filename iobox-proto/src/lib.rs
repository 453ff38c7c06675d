//! ASCII line protocol types, parsing, and serialization for the JetBlack IO box.
//!
//! The IO box is a small instrument panel (two LEDs, an RGB backlit 2x16
//! LCD, two buttons) driven over a serial line. This crate provides
//! everything needed to speak its protocol from either end:
//!
//! - **Types**: [`Command`], [`Colour`], [`Reply`]
//! - **Serialization**: [`Serialize`] for commands (host) and replies (device)
//! - **Parsing**: [`parse_command()`] (device) and [`parse_ack()`],
//!   [`parse_presses()`], [`parse_identity()`] (host)
//!
//! # Protocol Format
//!
//! Every message is one newline-terminated ASCII line, 8-N-1 framing.
//!
//! | Command | Line | Reply |
//! |---|---|---|
//! | Identify | `E` | identification line |
//! | LED brightness | `L<id>,<0-99>` | `+` |
//! | LED blink | `L<id>,<brightness>,<interval_ms>,<duty_%>` | `+` |
//! | LED colour | `M<id>,<r0-100>,<g0-100>,<b0-100>` | `+` |
//! | Cursor | `P<line>` or `P<line>,<col>` | `+` |
//! | Text | `T"<text>"` | `+` |
//! | Clear | `C` | `+` |
//! | Poll button | `b<id>` | `<id><count>` or `!` |
//!
//! # Example
//!
//! ```
//! use iobox_proto::{parse_command, Command, Serialize};
//!
//! let mut buf = [0u8; 64];
//! let len = Command::text("Ready").serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"T\"Ready\"\n");
//! assert_eq!(parse_command(&buf[..len]), Ok(Command::text("Ready")));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod command;
mod fmt;
pub mod parser;
pub mod reply;
pub mod serialize;

pub use command::{Colour, Command, MAX_BRIGHTNESS, MAX_COLOUR, MAX_TEXT_LEN};
pub use fmt::fraction_to_percent;
pub use parser::{parse_command, ParseError, MAX_LINE_LENGTH};
pub use reply::{
    parse_ack, parse_identity, parse_presses, strip_line_ending, Reply, ReplyError,
    MAX_IDENTITY_LEN,
};
pub use serialize::{Serialize, SerializeError, MAX_COMMAND_SIZE, MAX_REPLY_SIZE};

/// Default IO box baud rate.
pub const DEFAULT_BAUDRATE: u32 = 115_200;
