//! HUD controller: startup script, safety reactions, navigation and
//! periodic field refresh on top of a [`Panel`].

use crate::page::{Backlight, FieldText, HudPage};
use crate::panel::Panel;
use crate::script::{ScriptAction, StartupScript};
use crate::transport::LineTransport;
use crate::types::{
    SafetyState, VehicleData, VehicleDataProvider, BUTTON_LEFT, BUTTON_RIGHT, LED_BACKLIGHT,
    LED_LEFT, LED_RIGHT,
};
use iobox_proto::MAX_BRIGHTNESS;
use log::{debug, info, warn};

/// Update loop timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudConfig {
    /// Interval between button polls.
    pub button_interval_ms: u32,
    /// Interval between field refreshes.
    pub refresh_interval_ms: u32,
    /// Speed (m/s) above which `Standby` switches to `SpeedKmh`.
    pub standby_speed_threshold: f32,
}

impl HudConfig {
    pub const DEFAULT_BUTTON_INTERVAL_MS: u32 = 100;
    pub const DEFAULT_REFRESH_INTERVAL_MS: u32 = 250;
    pub const DEFAULT_STANDBY_SPEED_THRESHOLD: f32 = 0.1;
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            button_interval_ms: Self::DEFAULT_BUTTON_INTERVAL_MS,
            refresh_interval_ms: Self::DEFAULT_REFRESH_INTERVAL_MS,
            standby_speed_threshold: Self::DEFAULT_STANDBY_SPEED_THRESHOLD,
        }
    }
}

/// Drives the IO box from vehicle snapshots.
///
/// The host calls [`open`](Self::open) once, [`tick`](Self::tick) with the
/// elapsed time on every frame and [`close`](Self::close) on shutdown. Panel
/// errors are logged by the [`Panel`] and never surface here.
///
/// # Type Parameters
///
/// - `T`: the [`LineTransport`] to the IO box
/// - `V`: the [`VehicleDataProvider`] sampled every tick
pub struct HudController<T, V> {
    panel: Panel<T>,
    vehicle: V,
    config: HudConfig,
    page: HudPage,
    script: StartupScript,
    opened: bool,
    last_safety: SafetyState,
    abort_latched: bool,
    button_elapsed_ms: u32,
    refresh_elapsed_ms: u32,
    refresh_due: bool,
    field: Option<FieldText>,
}

impl<T, V> HudController<T, V>
where
    T: LineTransport,
    V: VehicleDataProvider,
{
    pub fn new(panel: Panel<T>, vehicle: V, config: HudConfig) -> Self {
        Self {
            panel,
            vehicle,
            config,
            page: HudPage::Diagnose,
            script: StartupScript::default(),
            opened: false,
            last_safety: SafetyState::Nominal,
            abort_latched: false,
            button_elapsed_ms: 0,
            refresh_elapsed_ms: 0,
            refresh_due: false,
            field: None,
        }
    }

    /// Replace the startup script, e.g. to skip the self test.
    #[must_use]
    pub fn with_script(mut self, script: StartupScript) -> Self {
        self.script = script;
        self
    }

    /// Start the session: runs the first startup script steps.
    pub fn open(&mut self) {
        if self.opened {
            return;
        }
        self.opened = true;

        if !self.panel.is_connected() {
            warn!("IO box not connected, HUD disabled");
            return;
        }
        info!("HUD started");
        self.run_script(0);
    }

    /// Advance the controller by `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: u32) {
        if !self.opened || !self.panel.is_connected() {
            return;
        }

        let data = self.vehicle.snapshot();

        if self.page == HudPage::Diagnose {
            // Only an abort interrupts the self test
            if data.safety == SafetyState::Abort {
                self.update_safety(data.safety);
            } else {
                self.run_script(dt_ms);
            }
            return;
        }

        self.update_safety(data.safety);
        if self.page == HudPage::Standby && data.speed > self.config.standby_speed_threshold {
            self.show_page(HudPage::SpeedKmh);
        }

        self.button_elapsed_ms = self.button_elapsed_ms.saturating_add(dt_ms);
        if self.button_elapsed_ms >= self.config.button_interval_ms {
            self.button_elapsed_ms = 0;
            self.poll_buttons();
        }

        self.refresh_elapsed_ms = self.refresh_elapsed_ms.saturating_add(dt_ms);
        if self.refresh_due || self.refresh_elapsed_ms >= self.config.refresh_interval_ms {
            self.refresh_elapsed_ms = 0;
            self.refresh_due = false;
            self.refresh_field(&data);
        }
    }

    /// Turn everything off and release the transport.
    pub fn close(&mut self) -> Option<T> {
        self.opened = false;
        if self.panel.is_connected() {
            let _ = self.panel.set_led(LED_LEFT, 0);
            let _ = self.panel.set_led(LED_RIGHT, 0);
            let _ = self.panel.set_led(LED_BACKLIGHT, 0);
            let _ = self.panel.clear();
            info!("HUD closed");
        }
        self.panel.close()
    }

    #[inline]
    #[must_use]
    pub fn page(&self) -> HudPage {
        self.page
    }

    #[must_use]
    pub fn is_abort_latched(&self) -> bool {
        self.abort_latched
    }

    pub fn panel(&self) -> &Panel<T> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel<T> {
        &mut self.panel
    }

    pub fn vehicle_mut(&mut self) -> &mut V {
        &mut self.vehicle
    }

    fn run_script(&mut self, dt_ms: u32) {
        self.script.advance(dt_ms);
        while let Some(action) = self.script.next_due() {
            debug!("startup: {:?}", action);
            match action {
                ScriptAction::Clear => {
                    let _ = self.panel.clear();
                }
                ScriptAction::Led { led, brightness } => {
                    let _ = self.panel.set_led(led, brightness);
                }
                ScriptAction::Colour(colour) => {
                    let _ = self.panel.set_led_colour(LED_BACKLIGHT, colour);
                }
                ScriptAction::Text { line, text } => {
                    let _ = self.panel.set_text(line, text);
                }
                ScriptAction::ShowPage(page) => {
                    self.show_page(page);
                    // Later steps belong to a page that is no longer shown
                    break;
                }
            }
        }
    }

    fn update_safety(&mut self, state: SafetyState) {
        if state == self.last_safety {
            return;
        }
        info!("safety state {:?} -> {:?}", self.last_safety, state);
        self.last_safety = state;

        match state {
            SafetyState::Nominal => {
                let _ = self.panel.set_led(LED_LEFT, 0);
                let _ = self.panel.set_led(LED_RIGHT, 0);
            }
            SafetyState::OverheatWheelLeft => {
                let _ = self.panel.set_led_blink(LED_LEFT, MAX_BRIGHTNESS, 500, 50);
            }
            SafetyState::OverheatWheelRight => {
                let _ = self.panel.set_led_blink(LED_RIGHT, MAX_BRIGHTNESS, 500, 50);
            }
            SafetyState::Abort => {
                let _ = self.panel.set_led(LED_LEFT, 0);
                let _ = self.panel.set_led(LED_RIGHT, 0);
                self.abort_latched = true;
                self.show_page(HudPage::Abort);
            }
        }
    }

    fn poll_buttons(&mut self) {
        // Always read both so presses never pile up on the device
        let left = self.panel.button_presses(BUTTON_LEFT);
        let right = self.panel.button_presses(BUTTON_RIGHT);

        if self.abort_latched || !self.page.is_selectable() {
            return;
        }
        let target = self.page.step(i32::from(right) - i32::from(left));
        if target != self.page {
            self.show_page(target);
        }
    }

    fn refresh_field(&mut self, data: &VehicleData) {
        let Some(slot) = self.page.template().and_then(|t| t.field) else {
            return;
        };
        let Some(text) = self.page.render_field(data) else {
            return;
        };
        if self.field.as_ref() == Some(&text) {
            return;
        }
        if self.panel.set_text_at(slot.line, slot.column, &text).is_ok() {
            self.field = Some(text);
        }
    }

    fn show_page(&mut self, page: HudPage) {
        if self.abort_latched && page != HudPage::Abort {
            return;
        }
        info!("page {:?} -> {:?}", self.page, page);
        self.page = page;
        self.field = None;
        self.refresh_due = true;

        let Some(template) = page.template() else {
            return;
        };
        let _ = self.panel.clear();
        let _ = self.panel.set_text(0, template.lines[0]);
        let _ = self.panel.set_text(1, template.lines[1]);
        let _ = self.panel.set_led_colour(LED_BACKLIGHT, template.colour);
        let _ = match template.backlight {
            Backlight::Steady => self.panel.set_led(LED_BACKLIGHT, MAX_BRIGHTNESS),
            Backlight::Blink { interval_ms, duty } => {
                self.panel
                    .set_led_blink(LED_BACKLIGHT, MAX_BRIGHTNESS, interval_ms, duty)
            }
        };
    }
}
