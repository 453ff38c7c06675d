//! Serial port transport to a real IO box.

use crate::config::PortSettings;
use iobox_core::{LineTransport, Panel, PanelConfig, TransportError};
use log::{debug, error, warn};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

/// Received bytes kept while waiting for a line terminator.
const MAX_PENDING: usize = 1024;

/// Errors of the host-side serial link.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("serial port error: {0}")]
    Serialport(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<HostError> for TransportError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Io(e) if e.kind() == ErrorKind::TimedOut => TransportError::Timeout,
            _ => TransportError::Io,
        }
    }
}

/// [`LineTransport`] over a serial port, 8-N-1 without flow control.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    pending: Vec<u8>,
}

impl SerialTransport {
    /// Open the port. DTR and RTS are released so the board is not reset.
    pub fn open(settings: &PortSettings) -> Result<Self, HostError> {
        let mut port = serialport::new(&settings.path, settings.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(10))
            .open()
            .map_err(|source| HostError::Open {
                path: settings.path.clone(),
                source,
            })?;

        // Not every adapter has modem control lines
        if let Err(e) = port.write_data_terminal_ready(false) {
            warn!("{}: could not clear DTR: {}", settings.path, e);
        }
        if let Err(e) = port.write_request_to_send(false) {
            warn!("{}: could not clear RTS: {}", settings.path, e);
        }

        debug!("opened {} at {} baud", settings.path, settings.baud);
        Ok(Self {
            port,
            pending: Vec::new(),
        })
    }

    fn fill(&mut self, timeout: Duration) -> Result<(), HostError> {
        let mut chunk = [0u8; 64];
        self.port.set_timeout(timeout)?;
        match self.port.read(&mut chunk) {
            Ok(n) => {
                self.pending.extend_from_slice(&chunk[..n]);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl LineTransport for SerialTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.port
            .write_all(bytes)
            .and_then(|()| self.port.flush())
            .map_err(|e| {
                debug!("write failed: {}", e);
                TransportError::from(HostError::from(e))
            })
    }

    fn read_line(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, TransportError> {
        let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms));

        loop {
            if let Some(result) = take_line(&mut self.pending, buf) {
                return result;
            }
            if self.pending.len() > MAX_PENDING {
                self.pending.clear();
                return Err(TransportError::BufferOverflow);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(TransportError::Timeout);
            }
            self.fill(remaining).map_err(|e| {
                debug!("read failed: {}", e);
                TransportError::from(e)
            })?;
        }
    }

    fn clear_buffers(&mut self) -> Result<(), TransportError> {
        self.pending.clear();
        self.port
            .clear(ClearBuffer::All)
            .map_err(|e| TransportError::from(HostError::from(e)))
    }
}

/// Move the first complete line out of `pending` into `buf`.
///
/// Returns `None` while no terminator has arrived. `\r` is dropped; a line
/// longer than `buf` is consumed and reported as overflow.
fn take_line(pending: &mut Vec<u8>, buf: &mut [u8]) -> Option<Result<usize, TransportError>> {
    let end = pending.iter().position(|&b| b == b'\n')?;
    let line: Vec<u8> = pending.drain(..=end).filter(|&b| b != b'\r' && b != b'\n').collect();

    if line.len() > buf.len() {
        return Some(Err(TransportError::BufferOverflow));
    }
    buf[..line.len()].copy_from_slice(&line);
    Some(Ok(line.len()))
}

/// Open the port and run the handshake.
///
/// A port that cannot be opened yields a permanently disconnected panel.
pub fn open_panel(settings: &PortSettings, config: PanelConfig) -> Panel<SerialTransport> {
    match SerialTransport::open(settings) {
        Ok(transport) => Panel::connect(transport, config),
        Err(e) => {
            error!("{}", e);
            Panel::disconnected(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_line_waits_for_terminator() {
        let mut pending = b"IOBOX".to_vec();
        let mut buf = [0u8; 16];
        assert!(take_line(&mut pending, &mut buf).is_none());
        assert_eq!(pending, b"IOBOX");
    }

    #[test]
    fn test_take_line_splits_lines() {
        let mut pending = b"IOBOX-1.2\r\n+\n0".to_vec();
        let mut buf = [0u8; 16];

        let len = take_line(&mut pending, &mut buf).unwrap().unwrap();
        assert_eq!(&buf[..len], b"IOBOX-1.2");
        let len = take_line(&mut pending, &mut buf).unwrap().unwrap();
        assert_eq!(&buf[..len], b"+");
        assert!(take_line(&mut pending, &mut buf).is_none());
        assert_eq!(pending, b"0");
    }

    #[test]
    fn test_take_line_overflow_consumes_line() {
        let mut pending = b"0123456789\n+\n".to_vec();
        let mut buf = [0u8; 4];
        assert_eq!(
            take_line(&mut pending, &mut buf),
            Some(Err(TransportError::BufferOverflow))
        );
        assert_eq!(take_line(&mut pending, &mut buf), Some(Ok(1)));
    }

    #[test]
    fn test_missing_port_is_disconnected() {
        let settings = PortSettings {
            path: "/dev/does-not-exist-iobox".into(),
            baud: 115_200,
        };
        assert!(matches!(
            SerialTransport::open(&settings),
            Err(HostError::Open { .. })
        ));
        let panel = open_panel(&settings, PanelConfig::default());
        assert!(!panel.is_connected());
    }

    #[test]
    fn test_timeout_maps_to_transport_timeout() {
        let err = HostError::Io(std::io::Error::from(ErrorKind::TimedOut));
        assert_eq!(TransportError::from(err), TransportError::Timeout);
        let err = HostError::Io(std::io::Error::from(ErrorKind::BrokenPipe));
        assert_eq!(TransportError::from(err), TransportError::Io);
    }
}
