//! Platform-agnostic IO box driver and HUD page state machine.
//!
//! This crate holds everything between the wire protocol and the host: it
//! has no platform-specific dependencies and runs both on host and in
//! `no_std` environments.
//!
//! # Overview
//!
//! - [`transport`]: Blocking line transport trait ([`LineTransport`])
//! - [`panel`]: Handshake, command encoder and reply validation ([`Panel`])
//! - [`page`]: HUD pages, navigation and templates ([`HudPage`])
//! - [`script`]: Startup self-test sequence ([`StartupScript`])
//! - [`hud`]: The update loop ([`HudController`])
//! - [`types`]: Vehicle snapshot and provider trait ([`VehicleData`],
//!   [`VehicleDataProvider`])
//!
//! # Example
//!
//! ```rust,ignore
//! use iobox_core::{HudConfig, HudController, Panel, PanelConfig, VehicleData};
//!
//! let panel = Panel::connect(transport, PanelConfig::default());
//! let mut hud = HudController::new(panel, VehicleData::default, HudConfig::default());
//!
//! hud.open();
//! loop {
//!     hud.tick(20);
//! #   break;
//! }
//! hud.close();
//! ```
//!
//! # Error Handling
//!
//! Panel operations return [`PanelError`] after logging it through the
//! `log` facade. [`HudController`] discards those errors: a missing or
//! misbehaving IO box never stops the host.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support
//! - **`defmt`**: Enable defmt formatting for embedded logging

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod hud;
pub mod page;
pub mod panel;
pub mod script;
pub mod transport;
pub mod types;

pub use hud::{HudConfig, HudController};
pub use page::{Backlight, FieldSlot, FieldText, HudPage, PageTemplate, LCD_COLUMNS};
pub use panel::{ConnectionState, Panel, PanelConfig, PanelError, PanelStats};
pub use script::{ScriptAction, ScriptStep, StartupScript, STARTUP_SEQUENCE};
pub use transport::{LineTransport, TransportError};
pub use types::{
    SafetyState, VehicleData, VehicleDataProvider, BUTTON_LEFT, BUTTON_RIGHT, LED_BACKLIGHT,
    LED_LEFT, LED_RIGHT,
};

// Re-export the protocol crate for downstream users
pub use iobox_proto;
