//! In-process IO box: command interpreter over the device model.

use crate::button::Button;
use crate::lcd::CharLcd;
use crate::led::Led;
use heapless::{Deque, Vec};
use iobox_core::{LineTransport, TransportError};
use iobox_proto::{parse_command, Command, Reply, Serialize, MAX_LINE_LENGTH, MAX_REPLY_SIZE};
use log::{debug, warn};

/// Identification string answered to `E`.
pub const IDENTITY: &str = "IOBOX-1.2";

/// Number of LEDs; the last one is the RGB LCD backlight.
pub const LED_COUNT: usize = 3;
/// Number of buttons.
pub const BUTTON_COUNT: usize = 2;

const BACKLIGHT: usize = LED_COUNT - 1;
const TX_CAPACITY: usize = 256;

/// Virtual IO box speaking the line protocol.
///
/// Bytes written with [`LineTransport::send`] are collected into lines and
/// executed; replies are queued and read back with
/// [`LineTransport::read_line`]. Time only passes through
/// [`advance`](Self::advance), so a missing reply times out immediately.
pub struct VirtualPanel {
    leds: [Led; LED_COUNT],
    buttons: [Button; BUTTON_COUNT],
    lcd: CharLcd,
    now_ms: u64,
    rx: Vec<u8, MAX_LINE_LENGTH>,
    rx_overflow: bool,
    tx: Deque<u8, TX_CAPACITY>,
    responsive: bool,
    executed: u32,
}

impl VirtualPanel {
    pub fn new() -> Self {
        Self {
            leds: [Led::new(), Led::new(), Led::rgb()],
            buttons: [Button::new(), Button::new()],
            lcd: CharLcd::new(),
            now_ms: 0,
            rx: Vec::new(),
            rx_overflow: false,
            tx: Deque::new(),
            responsive: true,
            executed: 0,
        }
    }

    /// Stop (or resume) answering. Commands are still executed.
    pub fn set_responsive(&mut self, responsive: bool) {
        self.responsive = responsive;
    }

    /// Let `dt_ms` pass and update blinking LEDs.
    pub fn advance(&mut self, dt_ms: u32) {
        self.now_ms += u64::from(dt_ms);
        for led in &mut self.leds {
            led.update(self.now_ms);
        }
    }

    /// Press and release a button once.
    pub fn click(&mut self, button: usize) {
        if let Some(button) = self.buttons.get_mut(button) {
            button.click();
        }
    }

    pub fn led(&self, led: usize) -> Option<&Led> {
        self.leds.get(led)
    }

    pub fn lcd(&self) -> &CharLcd {
        &self.lcd
    }

    /// Current backlight colour mask (red 1, green 2, blue 4).
    #[must_use]
    pub fn backlight(&self) -> u8 {
        self.leds[BACKLIGHT].backlight_mask()
    }

    /// Number of well-formed commands executed so far.
    #[must_use]
    pub fn executed(&self) -> u32 {
        self.executed
    }

    /// Feed one received byte.
    fn receive(&mut self, byte: u8) {
        match byte {
            b'\n' => {
                if core::mem::take(&mut self.rx_overflow) {
                    self.reply(&Reply::Nack);
                } else {
                    let line = core::mem::take(&mut self.rx);
                    let reply = self.handle_line(&line);
                    self.reply(&reply);
                }
                self.rx.clear();
            }
            _ if self.rx_overflow => {}
            _ => {
                if self.rx.push(byte).is_err() {
                    self.rx_overflow = true;
                }
            }
        }
    }

    fn handle_line(&mut self, line: &[u8]) -> Reply {
        match parse_command(line) {
            Ok(command) => {
                debug!("<- {:?}", command);
                match self.execute(command) {
                    Some(reply) => {
                        self.executed += 1;
                        reply
                    }
                    None => Reply::Nack,
                }
            }
            Err(e) => {
                warn!("rejected line {:?}: {}", line, e);
                Reply::Nack
            }
        }
    }

    /// Apply a command; `None` when an id or position is out of range.
    fn execute(&mut self, command: Command) -> Option<Reply> {
        match command {
            Command::Echo => return Some(Reply::identity(IDENTITY)),
            Command::SetLed { led, brightness } => {
                let led = self.leds.get_mut(usize::from(led))?;
                led.set_brightness(brightness);
                led.set_blink_interval(0);
            }
            Command::SetLedBlink {
                led,
                brightness,
                interval_ms,
                duty,
            } => {
                let led = self.leds.get_mut(usize::from(led))?;
                led.set_brightness(brightness);
                led.set_blink_ratio(duty);
                led.set_blink_interval(u32::from(interval_ms));
                led.update(self.now_ms);
            }
            Command::SetLedColour {
                led,
                red,
                green,
                blue,
            } => {
                let led = self.leds.get_mut(usize::from(led))?;
                if !led.supports_colour() {
                    return None;
                }
                led.set_colour(red, green, blue);
            }
            Command::SelectCursor { line, column } => {
                self.lcd.set_cursor(line, column.unwrap_or(0)).ok()?;
            }
            Command::WriteText(text) => self.lcd.write(&text),
            Command::Clear => self.lcd.clear(),
            Command::PollButton { button } => {
                let count = self.buttons.get_mut(usize::from(button))?.take_presses();
                return Some(Reply::Presses { button, count });
            }
        }
        Some(Reply::Ack)
    }

    fn reply(&mut self, reply: &Reply) {
        if !self.responsive {
            return;
        }
        let mut buf = [0u8; MAX_REPLY_SIZE + 1];
        let Ok(len) = reply.serialize(&mut buf) else {
            return;
        };
        for &byte in &buf[..len] {
            if self.tx.push_back(byte).is_err() {
                warn!("reply queue full, dropping {:?}", reply);
                return;
            }
        }
    }
}

impl Default for VirtualPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl LineTransport for VirtualPanel {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        for &byte in bytes {
            self.receive(byte);
        }
        Ok(())
    }

    fn read_line(&mut self, buf: &mut [u8], _timeout_ms: u32) -> Result<usize, TransportError> {
        if !self.tx.iter().any(|&b| b == b'\n') {
            return Err(TransportError::Timeout);
        }

        let mut len = 0;
        let mut overflow = false;
        while let Some(byte) = self.tx.pop_front() {
            match byte {
                b'\n' => break,
                b'\r' => {}
                _ if len < buf.len() => {
                    buf[len] = byte;
                    len += 1;
                }
                _ => overflow = true,
            }
        }

        if overflow {
            Err(TransportError::BufferOverflow)
        } else {
            Ok(len)
        }
    }

    fn clear_buffers(&mut self) -> Result<(), TransportError> {
        self.rx.clear();
        self.rx_overflow = false;
        self.tx.clear();
        Ok(())
    }
}
