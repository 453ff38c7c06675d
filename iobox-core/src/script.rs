//! Startup self-test sequence shown on the `Diagnose` page.

use crate::page::HudPage;
use crate::types::{LED_BACKLIGHT, LED_LEFT, LED_RIGHT};
use iobox_proto::Colour;

/// One panel change performed by the startup script.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptAction {
    Clear,
    Led { led: u8, brightness: u8 },
    Colour(Colour),
    Text { line: u8, text: &'static str },
    /// Leave `Diagnose` for the given page.
    ShowPage(HudPage),
}

/// An action followed by the time to wait before the next one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptStep {
    pub action: ScriptAction,
    pub delay_ms: u32,
}

const fn step(action: ScriptAction, delay_ms: u32) -> ScriptStep {
    ScriptStep { action, delay_ms }
}

const fn text(line: u8, text: &'static str) -> ScriptAction {
    ScriptAction::Text { line, text }
}

const fn led(led: u8, brightness: u8) -> ScriptAction {
    ScriptAction::Led { led, brightness }
}

/// Colour cycle, LED check, then `Standby`.
pub const STARTUP_SEQUENCE: &[ScriptStep] = &[
    step(ScriptAction::Clear, 0),
    step(led(LED_BACKLIGHT, 99), 0),
    step(ScriptAction::Colour(Colour::RED), 0),
    step(text(0, "  JetBlack HUD  "), 0),
    step(text(1, " Diagnose: red  "), 500),
    step(ScriptAction::Colour(Colour::GREEN), 0),
    step(text(1, "Diagnose: green "), 500),
    step(ScriptAction::Colour(Colour::BLUE), 0),
    step(text(1, "Diagnose: blue  "), 500),
    step(led(LED_LEFT, 99), 0),
    step(led(LED_RIGHT, 99), 0),
    step(ScriptAction::Colour(Colour::WHITE), 0),
    step(text(1, "Diagnose: LEDs  "), 500),
    step(led(LED_LEFT, 0), 0),
    step(led(LED_RIGHT, 0), 0),
    step(text(1, "      Ready     "), 1000),
    step(ScriptAction::ShowPage(HudPage::Standby), 0),
];

/// Cursor over a list of [`ScriptStep`]s, advanced by elapsed time.
///
/// Never blocks: the caller feeds elapsed time with [`advance`] and then
/// drains the actions that became due with [`next_due`].
///
/// [`advance`]: StartupScript::advance
/// [`next_due`]: StartupScript::next_due
#[derive(Clone, Debug)]
pub struct StartupScript {
    steps: &'static [ScriptStep],
    index: usize,
    wait_ms: u32,
}

impl StartupScript {
    pub const fn new(steps: &'static [ScriptStep]) -> Self {
        Self {
            steps,
            index: 0,
            wait_ms: 0,
        }
    }

    /// Account for `dt_ms` of elapsed time.
    pub fn advance(&mut self, dt_ms: u32) {
        self.wait_ms = self.wait_ms.saturating_sub(dt_ms);
    }

    /// Next action whose delay has expired, if any.
    pub fn next_due(&mut self) -> Option<ScriptAction> {
        if self.wait_ms > 0 {
            return None;
        }
        let step = self.steps.get(self.index)?;
        self.index += 1;
        self.wait_ms = step.delay_ms;
        Some(step.action)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Sum of all step delays.
    #[must_use]
    pub fn total_duration_ms(&self) -> u32 {
        self.steps.iter().map(|s| s.delay_ms).sum()
    }
}

impl Default for StartupScript {
    fn default() -> Self {
        Self::new(STARTUP_SEQUENCE)
    }
}
