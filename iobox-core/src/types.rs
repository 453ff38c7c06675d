//! Vehicle snapshot types and panel element ids.

/// LED id of the left status LED.
pub const LED_LEFT: u8 = 0;
/// LED id of the right status LED.
pub const LED_RIGHT: u8 = 1;
/// LED id of the RGB LCD backlight.
pub const LED_BACKLIGHT: u8 = 2;

/// Button id of the left (previous page) button.
pub const BUTTON_LEFT: u8 = 0;
/// Button id of the right (next page) button.
pub const BUTTON_RIGHT: u8 = 1;

/// Safety state reported by the vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyState {
    #[default]
    Nominal,
    OverheatWheelLeft,
    OverheatWheelRight,
    Abort,
}

/// Read-only vehicle snapshot, sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VehicleData {
    /// Speed in m/s.
    pub speed: f32,
    /// Fuel level of engine 1 (0..1).
    pub engine1_fuel: f32,
    /// Fuel level of engine 2 (0..1).
    pub engine2_fuel: f32,
    /// Brake pedal position (0..1).
    pub pedal_brake: f32,
    /// Thrust pedal position (0..1).
    pub pedal_thrust: f32,
    pub parachute_deployed: bool,
    pub safety: SafetyState,
}

/// Pull accessor for the current vehicle state.
///
/// Vehicle physics and safety evaluation live outside this crate; the
/// driver only asks for a snapshot.
pub trait VehicleDataProvider {
    fn snapshot(&mut self) -> VehicleData;
}

impl<F> VehicleDataProvider for F
where
    F: FnMut() -> VehicleData,
{
    fn snapshot(&mut self) -> VehicleData {
        self()
    }
}
