//! Host side of the JetBlack HUD: drives the IO box instrument panel from
//! vehicle telemetry over a serial port.
//!
//! The protocol, driver and page logic live in `iobox-proto` and
//! `iobox-core`; this crate adds the pieces that need an operating system:
//!
//! - [`serial`]: `serialport` based [`LineTransport`](iobox_core::LineTransport)
//! - [`config`]: command line options
//! - [`runner`]: fixed-rate tick loop
//! - [`vehicle`]: simulated vehicle for running without the simulator

pub mod config;
pub mod runner;
pub mod serial;
pub mod vehicle;

pub use config::{Args, PortSettings, DEFAULT_PORT};
pub use runner::{RunSummary, Runner};
pub use serial::{open_panel, HostError, SerialTransport};
pub use vehicle::SimulatedVehicle;

pub use iobox_core::{HudConfig, HudController, HudPage, Panel, PanelConfig};
pub use iobox_device::VirtualPanel;
