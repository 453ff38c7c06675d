//! Line transport trait and error types.

/// Error type for transport operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Serial/communication I/O error.
    Io,
    /// No complete line arrived within the timeout.
    Timeout,
    /// Buffer overflow (line too long).
    BufferOverflow,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "I/O error"),
            Self::Timeout => write!(f, "timeout"),
            Self::BufferOverflow => write!(f, "line too long"),
        }
    }
}

/// Blocking, line-oriented byte stream to the IO box.
///
/// This trait abstracts the link so the driver can run over a real serial
/// port, an in-process device model, or a test double. All calls block
/// the caller for at most the given timeout.
pub trait LineTransport {
    /// Write raw bytes. Callers pass complete lines, terminator included.
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Read one line into `buf`, without its terminator.
    ///
    /// Returns the line length, [`TransportError::Timeout`] if no complete
    /// line arrived within `timeout_ms`, or [`TransportError::BufferOverflow`]
    /// if the line does not fit (the rest of that line is discarded).
    fn read_line(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, TransportError>;

    /// Discard pending input and output.
    fn clear_buffers(&mut self) -> Result<(), TransportError>;
}

impl<T: LineTransport + ?Sized> LineTransport for &mut T {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).send(bytes)
    }

    fn read_line(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, TransportError> {
        (**self).read_line(buf, timeout_ms)
    }

    fn clear_buffers(&mut self) -> Result<(), TransportError> {
        (**self).clear_buffers()
    }
}
