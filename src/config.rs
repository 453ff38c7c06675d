//! Command line configuration.

use clap::Parser;
use iobox_core::{HudConfig, PanelConfig};
use iobox_proto::DEFAULT_BAUDRATE;
use std::time::Duration;

/// Serial port used when none is given.
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Drive the JetBlack IO box instrument panel from vehicle telemetry.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Serial port of the IO box
    #[arg(short, long, default_value = DEFAULT_PORT)]
    pub port: String,

    /// Baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUDRATE)]
    pub baud: u32,

    /// Update loop period in milliseconds
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Button poll interval in milliseconds
    #[arg(long, default_value_t = HudConfig::DEFAULT_BUTTON_INTERVAL_MS)]
    pub button_interval_ms: u32,

    /// Page field refresh interval in milliseconds
    #[arg(long, default_value_t = HudConfig::DEFAULT_REFRESH_INTERVAL_MS)]
    pub refresh_interval_ms: u32,

    /// Handshake attempts before giving up
    #[arg(long, default_value_t = PanelConfig::DEFAULT_HANDSHAKE_RETRIES)]
    pub handshake_retries: u8,

    /// Acknowledgement timeout in milliseconds
    #[arg(long, default_value_t = PanelConfig::DEFAULT_ACK_TIMEOUT_MS)]
    pub ack_timeout_ms: u32,

    /// Stop after this many seconds (runs until interrupted if omitted)
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Use the in-process virtual IO box instead of a serial port
    #[arg(long)]
    pub simulate: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: log::LevelFilter,
}

/// Serial link parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSettings {
    pub path: String,
    pub baud: u32,
}

impl Args {
    #[must_use]
    pub fn port_settings(&self) -> PortSettings {
        PortSettings {
            path: self.port.clone(),
            baud: self.baud,
        }
    }

    #[must_use]
    pub fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            handshake_retries: self.handshake_retries,
            ack_timeout_ms: self.ack_timeout_ms,
            ..PanelConfig::default()
        }
    }

    #[must_use]
    pub fn hud_config(&self) -> HudConfig {
        HudConfig {
            button_interval_ms: self.button_interval_ms,
            refresh_interval_ms: self.refresh_interval_ms,
            ..HudConfig::default()
        }
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration_secs.map(Duration::from_secs)
    }
}
