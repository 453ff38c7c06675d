//! Panel: handshake and command encoder over a [`LineTransport`].
//!
//! A [`Panel`] is either connected (it owns a transport that answered the
//! `E` handshake) or permanently disconnected. Every operation sends one
//! command line and validates the reply; failures are logged, counted in
//! [`PanelStats`] and returned, but never retried and never fatal.

use crate::transport::{LineTransport, TransportError};
use heapless::{String, Vec};
use iobox_proto::{
    parse_ack, parse_identity, parse_presses, Colour, Command, ReplyError, Serialize,
    MAX_COMMAND_SIZE, MAX_IDENTITY_LEN, MAX_LINE_LENGTH,
};
use log::{debug, error, info, trace, warn};

/// Timing and retry settings for the panel link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Number of `E` attempts before giving up.
    pub handshake_retries: u8,
    /// Read timeout for each handshake attempt.
    pub handshake_timeout_ms: u32,
    /// Read timeout for acknowledgements after the handshake.
    pub ack_timeout_ms: u32,
    /// Extra acknowledgement time per text character.
    pub text_timeout_per_char_ms: u32,
}

impl PanelConfig {
    pub const DEFAULT_HANDSHAKE_RETRIES: u8 = 8;
    pub const DEFAULT_HANDSHAKE_TIMEOUT_MS: u32 = 250;
    pub const DEFAULT_ACK_TIMEOUT_MS: u32 = 50;
    pub const DEFAULT_TEXT_TIMEOUT_PER_CHAR_MS: u32 = 2;

    /// Acknowledgement timeout for a given command.
    #[must_use]
    pub fn ack_timeout_for(&self, command: &Command) -> u32 {
        self.ack_timeout_ms + self.text_timeout_per_char_ms * command.text_len() as u32
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            handshake_retries: Self::DEFAULT_HANDSHAKE_RETRIES,
            handshake_timeout_ms: Self::DEFAULT_HANDSHAKE_TIMEOUT_MS,
            ack_timeout_ms: Self::DEFAULT_ACK_TIMEOUT_MS,
            text_timeout_per_char_ms: Self::DEFAULT_TEXT_TIMEOUT_PER_CHAR_MS,
        }
    }
}

/// Link state of a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// Error type for panel operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// The panel is not connected; nothing was sent.
    Disconnected,
    /// No reply within the acknowledgement timeout.
    Timeout,
    /// The reply was not the expected acknowledgement or answer.
    Protocol,
    /// The device reported an error (`!`).
    Device,
    /// Transport write/read failure.
    Io,
    /// The command could not be encoded.
    Encode,
}

impl core::fmt::Display for PanelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "panel disconnected"),
            Self::Timeout => write!(f, "command timeout"),
            Self::Protocol => write!(f, "protocol error"),
            Self::Device => write!(f, "device error"),
            Self::Io => write!(f, "I/O error"),
            Self::Encode => write!(f, "encode error"),
        }
    }
}

impl From<TransportError> for PanelError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => PanelError::Timeout,
            // An overlong reply is not something the device should send
            TransportError::BufferOverflow => PanelError::Protocol,
            TransportError::Io => PanelError::Io,
        }
    }
}

impl From<ReplyError> for PanelError {
    fn from(err: ReplyError) -> Self {
        match err {
            ReplyError::Unexpected => PanelError::Protocol,
            ReplyError::Device => PanelError::Device,
        }
    }
}

/// Counters for commands and their outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelStats {
    pub sent: u32,
    pub acknowledged: u32,
    pub timeouts: u32,
    pub protocol_errors: u32,
    pub device_errors: u32,
    pub io_errors: u32,
}

impl PanelStats {
    fn record(&mut self, result: Result<(), PanelError>) {
        match result {
            Ok(()) => self.acknowledged += 1,
            Err(PanelError::Timeout) => self.timeouts += 1,
            Err(PanelError::Protocol) => self.protocol_errors += 1,
            Err(PanelError::Device) => self.device_errors += 1,
            Err(PanelError::Io) => self.io_errors += 1,
            Err(PanelError::Disconnected | PanelError::Encode) => {}
        }
    }
}

/// Command encoder and connection owner for one IO box.
pub struct Panel<T> {
    link: Option<T>,
    config: PanelConfig,
    identity: String<MAX_IDENTITY_LEN>,
    stats: PanelStats,
}

impl<T: LineTransport> Panel<T> {
    /// Run the `E` handshake over an opened transport.
    ///
    /// Each attempt clears both buffers, sends `E` and waits up to
    /// `handshake_timeout_ms` for a line longer than one character. When
    /// all attempts fail the transport is dropped and the panel stays
    /// disconnected for its lifetime.
    pub fn connect(mut transport: T, config: PanelConfig) -> Self {
        let mut buf = [0u8; MAX_LINE_LENGTH];

        for attempt in 1..=config.handshake_retries {
            // Clean up whatever a board reset left behind
            let _ = transport.clear_buffers();

            if let Err(e) = transport.send(b"E\n") {
                debug!("handshake attempt {}: write failed: {}", attempt, e);
                continue;
            }

            match transport.read_line(&mut buf, config.handshake_timeout_ms) {
                Ok(len) => match parse_identity(&buf[..len]) {
                    Ok(ident) => {
                        let mut identity = String::new();
                        for c in ident.chars() {
                            if identity.push(c).is_err() {
                                break;
                            }
                        }
                        info!("connected to IO box (version: {})", identity.as_str());
                        let _ = transport.clear_buffers();
                        return Self {
                            link: Some(transport),
                            config,
                            identity,
                            stats: PanelStats::default(),
                        };
                    }
                    Err(_) => debug!("handshake attempt {}: short reply", attempt),
                },
                Err(e) => debug!("handshake attempt {}: {}", attempt, e),
            }
        }

        error!(
            "could not connect to the IO box after {} attempts",
            config.handshake_retries
        );
        Self::disconnected(config)
    }

    /// A panel that never connected, e.g. because the port failed to open.
    pub fn disconnected(config: PanelConfig) -> Self {
        Self {
            link: None,
            config,
            identity: String::new(),
            stats: PanelStats::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        if self.is_connected() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Identification string reported during the handshake.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.link.as_ref().map(|_| self.identity.as_str())
    }

    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> &PanelStats {
        &self.stats
    }

    /// Get a reference to the transport, if connected.
    pub fn transport(&self) -> Option<&T> {
        self.link.as_ref()
    }

    /// Get a mutable reference to the transport, if connected.
    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.link.as_mut()
    }

    /// Disconnect and hand back the transport.
    pub fn close(&mut self) -> Option<T> {
        self.link.take()
    }

    /// Steady LED brightness (0-99).
    pub fn set_led(&mut self, led: u8, brightness: u8) -> Result<(), PanelError> {
        self.execute(&Command::led(led, brightness))
    }

    /// Blinking LED: `interval_ms` period, `duty` percent lit.
    pub fn set_led_blink(
        &mut self,
        led: u8,
        brightness: u8,
        interval_ms: u16,
        duty: u8,
    ) -> Result<(), PanelError> {
        self.execute(&Command::led_blink(led, brightness, interval_ms, duty))
    }

    pub fn set_led_colour(&mut self, led: u8, colour: Colour) -> Result<(), PanelError> {
        self.execute(&Command::led_colour(led, colour))
    }

    pub fn set_cursor(&mut self, line: u8, column: Option<u8>) -> Result<(), PanelError> {
        self.execute(&Command::cursor(line, column))
    }

    pub fn write_text(&mut self, text: &str) -> Result<(), PanelError> {
        self.execute(&Command::text(text))
    }

    /// Select `line` and write `text` from its start.
    pub fn set_text(&mut self, line: u8, text: &str) -> Result<(), PanelError> {
        self.set_cursor(line, None)?;
        self.write_text(text)
    }

    /// Select `line`/`column` and write `text` there.
    pub fn set_text_at(&mut self, line: u8, column: u8, text: &str) -> Result<(), PanelError> {
        self.set_cursor(line, Some(column))?;
        self.write_text(text)
    }

    pub fn clear(&mut self) -> Result<(), PanelError> {
        self.execute(&Command::Clear)
    }

    /// Presses of `button` since the previous poll.
    pub fn poll_button(&mut self, button: u8) -> Result<u8, PanelError> {
        let mut buf = [0u8; MAX_LINE_LENGTH];
        let len = self.transact(&Command::poll_button(button), &mut buf)?;

        let result = parse_presses(&buf[..len]).map_err(PanelError::from);
        self.stats.record(result.map(|_| ()));
        match result {
            Err(PanelError::Device) => error!("button {}: device reported error", button),
            Err(e) => warn!("button {}: {} in poll answer {:?}", button, e, &buf[..len]),
            Ok(_) => {}
        }
        result
    }

    /// Like [`poll_button`](Self::poll_button), but any failure counts as
    /// zero presses.
    pub fn button_presses(&mut self, button: u8) -> u8 {
        self.poll_button(button).unwrap_or(0)
    }

    /// Send a command that is acknowledged with `+`.
    pub fn execute(&mut self, command: &Command) -> Result<(), PanelError> {
        let mut buf = [0u8; MAX_LINE_LENGTH];
        let len = self.transact(command, &mut buf)?;

        let result = parse_ack(&buf[..len]).map_err(PanelError::from);
        self.stats.record(result);
        if let Err(e) = result {
            warn!("{:?}: {} (reply {:?})", command, e, &buf[..len]);
        }
        result
    }

    /// Write one command and read its reply line into `reply`.
    ///
    /// Transport failures are logged and counted here; reply content is
    /// judged by the caller.
    fn transact(&mut self, command: &Command, reply: &mut [u8]) -> Result<usize, PanelError> {
        let timeout_ms = self.config.ack_timeout_for(command);
        let Some(link) = self.link.as_mut() else {
            return Err(PanelError::Disconnected);
        };

        let line: Vec<u8, MAX_COMMAND_SIZE> = command.serialize_to_vec().map_err(|e| {
            error!("{:?}: {}", command, e);
            PanelError::Encode
        })?;

        // A reply that missed an earlier deadline must not answer this command
        let _ = link.clear_buffers();

        trace!("-> {:?}", command);
        self.stats.sent += 1;

        let result = link
            .send(&line)
            .and_then(|()| link.read_line(reply, timeout_ms))
            .map_err(PanelError::from);

        if let Err(e) = result {
            self.stats.record(Err(e));
            match e {
                PanelError::Timeout => warn!("{:?}: no reply within {} ms", command, timeout_ms),
                _ => error!("{:?}: {}", command, e),
            }
        }
        result
    }
}
