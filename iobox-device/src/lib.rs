//! IO box device model.
//!
//! A chip-agnostic model of the IO box firmware: LEDs with blink timing,
//! push buttons with press counters, and a 2x16 character LCD whose RGB
//! backlight is driven like an LED. [`VirtualPanel`] ties them together
//! behind the line protocol and implements [`LineTransport`], so the host
//! driver can run against it without hardware.
//!
//! # Example
//!
//! ```ignore
//! use iobox_core::{Panel, PanelConfig};
//! use iobox_device::VirtualPanel;
//!
//! let mut panel = Panel::connect(VirtualPanel::new(), PanelConfig::default());
//! panel.set_text(0, "Hello").unwrap();
//! assert_eq!(panel.transport().unwrap().lcd().line(0), "Hello           ");
//! ```
//!
//! [`LineTransport`]: iobox_core::LineTransport

#![cfg_attr(not(feature = "std"), no_std)]

pub mod button;
pub mod lcd;
pub mod led;
pub mod panel;

pub use button::{Button, MAX_REPORTED_PRESSES};
pub use lcd::{CharLcd, OutOfRange, LCD_COLUMNS, LCD_LINES};
pub use led::{Led, BACKLIGHT_BLUE, BACKLIGHT_GREEN, BACKLIGHT_RED};
pub use panel::{VirtualPanel, BUTTON_COUNT, IDENTITY, LED_COUNT};
