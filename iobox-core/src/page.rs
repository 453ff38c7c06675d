//! HUD pages, button navigation and page templates.

use crate::types::VehicleData;
use core::fmt::Write;
use heapless::String;
use iobox_proto::{fraction_to_percent, Colour};

/// Width of an LCD line in characters.
pub const LCD_COLUMNS: usize = 16;

/// Speed of sound used for the Mach display, in m/s.
pub const SPEED_OF_SOUND: f32 = 340.29;

const KMH_PER_MS: f32 = 3.6;
const MAX_KMH: u32 = 9999;
const MAX_MACH: f32 = 9.99;

/// Text of a numeric page field.
pub type FieldText = String<LCD_COLUMNS>;

/// Informational page shown on the LCD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HudPage {
    /// Startup self test, driven by the startup script.
    Diagnose,
    Standby,
    SpeedKmh,
    SpeedMach,
    Fuel1,
    Fuel2,
    /// Safety abort. Reached only through the vehicle safety state.
    Abort,
}

impl HudPage {
    /// Pages reachable with the buttons, in navigation order.
    pub const SELECTABLE: [HudPage; 4] = [
        HudPage::SpeedKmh,
        HudPage::SpeedMach,
        HudPage::Fuel1,
        HudPage::Fuel2,
    ];

    #[inline]
    #[must_use]
    pub fn is_selectable(self) -> bool {
        Self::SELECTABLE.contains(&self)
    }

    /// Move `delta` pages through the selectable range, wrapping at both
    /// ends. Non-selectable pages never move.
    #[must_use]
    pub fn step(self, delta: i32) -> Self {
        let Some(index) = Self::SELECTABLE.iter().position(|&p| p == self) else {
            return self;
        };
        let len = Self::SELECTABLE.len() as i32;
        let target = (index as i32).wrapping_add(delta).rem_euclid(len);
        Self::SELECTABLE[target as usize]
    }

    #[must_use]
    pub fn next(self) -> Self {
        self.step(1)
    }

    #[must_use]
    pub fn previous(self) -> Self {
        self.step(-1)
    }

    /// Static layout of the page, `None` for the scripted `Diagnose` page.
    #[must_use]
    pub fn template(self) -> Option<PageTemplate> {
        const NAV: &str = "<   JetBlack   >";
        const STEADY: Backlight = Backlight::Steady;

        let template = match self {
            HudPage::Diagnose => return None,
            HudPage::Standby => PageTemplate {
                lines: ["  JetBlack HUD  ", "    Standby     "],
                colour: Colour::WHITE,
                backlight: STEADY,
                field: None,
            },
            HudPage::SpeedKmh => PageTemplate {
                lines: ["Speed: 0000 km/h", NAV],
                colour: Colour::GREEN,
                backlight: STEADY,
                field: Some(FieldSlot { line: 0, column: 7 }),
            },
            HudPage::SpeedMach => PageTemplate {
                lines: ["Speed: 0.00 Mach", NAV],
                colour: Colour::GREEN,
                backlight: STEADY,
                field: Some(FieldSlot { line: 0, column: 7 }),
            },
            HudPage::Fuel1 => PageTemplate {
                lines: ["Fuel 1:     000%", NAV],
                colour: Colour::BLUE,
                backlight: STEADY,
                field: Some(FieldSlot { line: 0, column: 12 }),
            },
            HudPage::Fuel2 => PageTemplate {
                lines: ["Fuel 2:     000%", NAV],
                colour: Colour::BLUE,
                backlight: STEADY,
                field: Some(FieldSlot { line: 0, column: 12 }),
            },
            HudPage::Abort => PageTemplate {
                lines: ["!!!! ABORT !!!! ", "!!!! ABORT !!!! "],
                colour: Colour::RED,
                backlight: Backlight::Blink {
                    interval_ms: 250,
                    duty: 50,
                },
                field: None,
            },
        };
        Some(template)
    }

    /// Render the page's variable field from a vehicle snapshot.
    ///
    /// Returns `None` for pages without a field.
    #[must_use]
    pub fn render_field(self, data: &VehicleData) -> Option<FieldText> {
        let mut text = FieldText::new();
        // Every field fits a line, so the writes cannot overflow
        let _ = match self {
            HudPage::SpeedKmh => write!(text, "{:04}", speed_kmh(data.speed)),
            HudPage::SpeedMach => write!(text, "{:4.2}", speed_mach(data.speed)),
            HudPage::Fuel1 => write!(text, "{:3}", fraction_to_percent(data.engine1_fuel)),
            HudPage::Fuel2 => write!(text, "{:3}", fraction_to_percent(data.engine2_fuel)),
            HudPage::Diagnose | HudPage::Standby | HudPage::Abort => return None,
        };
        Some(text)
    }
}

/// Backlight brightness pattern of a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Backlight {
    /// Full brightness, no blinking.
    Steady,
    Blink { interval_ms: u16, duty: u8 },
}

/// Position of a page's numeric field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSlot {
    pub line: u8,
    pub column: u8,
}

/// Static content sent when a page becomes active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageTemplate {
    pub lines: [&'static str; 2],
    pub colour: Colour,
    pub backlight: Backlight,
    pub field: Option<FieldSlot>,
}

fn speed_kmh(speed: f32) -> u32 {
    // Float to int casts saturate, negative and NaN become 0
    let kmh = (speed * KMH_PER_MS + 0.5) as u32;
    kmh.min(MAX_KMH)
}

fn speed_mach(speed: f32) -> f32 {
    let mach = speed / SPEED_OF_SOUND;
    if mach > MAX_MACH {
        MAX_MACH
    } else if mach > 0.0 {
        mach
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use proptest::prelude::*;

    fn data(speed: f32) -> VehicleData {
        VehicleData {
            speed,
            engine1_fuel: 0.5,
            engine2_fuel: 1.0,
            ..VehicleData::default()
        }
    }

    #[test]
    fn test_next_wraps_at_end() {
        assert_eq!(HudPage::SpeedKmh.next(), HudPage::SpeedMach);
        assert_eq!(HudPage::Fuel1.next(), HudPage::Fuel2);
        assert_eq!(HudPage::Fuel2.next(), HudPage::SpeedKmh);
    }

    #[test]
    fn test_previous_wraps_at_start() {
        assert_eq!(HudPage::SpeedKmh.previous(), HudPage::Fuel2);
        assert_eq!(HudPage::SpeedMach.previous(), HudPage::SpeedKmh);
    }

    #[test]
    fn test_step_multiple() {
        assert_eq!(HudPage::SpeedKmh.step(0), HudPage::SpeedKmh);
        assert_eq!(HudPage::SpeedKmh.step(5), HudPage::SpeedMach);
        assert_eq!(HudPage::SpeedKmh.step(-6), HudPage::Fuel1);
    }

    #[test]
    fn test_non_selectable_pages_do_not_move() {
        for page in [HudPage::Diagnose, HudPage::Standby, HudPage::Abort] {
            assert!(!page.is_selectable());
            assert_eq!(page.next(), page);
            assert_eq!(page.step(-3), page);
        }
    }

    #[test]
    fn test_templates_fit_the_display() {
        for page in [
            HudPage::Standby,
            HudPage::SpeedKmh,
            HudPage::SpeedMach,
            HudPage::Fuel1,
            HudPage::Fuel2,
            HudPage::Abort,
        ] {
            let template = page.template().unwrap();
            for line in template.lines {
                assert_eq!(line.len(), LCD_COLUMNS, "{:?}: {:?}", page, line);
            }
            assert_eq!(template.field.is_some(), page.is_selectable());
        }
        assert!(HudPage::Diagnose.template().is_none());
    }

    #[test]
    fn test_abort_template_blinks_red() {
        let template = HudPage::Abort.template().unwrap();
        assert_eq!(template.colour, Colour::RED);
        assert_eq!(
            template.backlight,
            Backlight::Blink {
                interval_ms: 250,
                duty: 50
            }
        );
    }

    #[test]
    fn test_render_speed_kmh() {
        let field = HudPage::SpeedKmh.render_field(&data(10.0)).unwrap();
        assert_eq!(field.as_str(), "0036");
        let field = HudPage::SpeedKmh.render_field(&data(5000.0)).unwrap();
        assert_eq!(field.as_str(), "9999");
        let field = HudPage::SpeedKmh.render_field(&data(-3.0)).unwrap();
        assert_eq!(field.as_str(), "0000");
    }

    #[test]
    fn test_render_speed_mach() {
        let field = HudPage::SpeedMach.render_field(&data(170.145)).unwrap();
        assert_eq!(field.as_str(), "0.50");
        let field = HudPage::SpeedMach.render_field(&data(1.0e6)).unwrap();
        assert_eq!(field.as_str(), "9.99");
        let field = HudPage::SpeedMach.render_field(&data(0.0)).unwrap();
        assert_eq!(field.as_str(), "0.00");
    }

    #[test]
    fn test_render_fuel() {
        let d = data(0.0);
        assert_eq!(HudPage::Fuel1.render_field(&d).unwrap().as_str(), " 50");
        assert_eq!(HudPage::Fuel2.render_field(&d).unwrap().as_str(), "100");
    }

    #[test]
    fn test_field_fits_template_slot() {
        let d = data(1.0e6);
        for page in HudPage::SELECTABLE {
            let slot = page.template().unwrap().field.unwrap();
            let field = page.render_field(&d).unwrap();
            assert!(slot.column as usize + field.len() <= LCD_COLUMNS);
        }
        assert!(HudPage::Standby.render_field(&d).is_none());
    }

    proptest! {
        #[test]
        fn navigation_stays_selectable(
            start in 0usize..4,
            presses in proptest::collection::vec((0u8..10, 0u8..10), 0..50),
        ) {
            let mut page = HudPage::SELECTABLE[start];
            for (left, right) in presses {
                page = page.step(i32::from(right) - i32::from(left));
                prop_assert!(page.is_selectable());
            }
        }
    }
}
