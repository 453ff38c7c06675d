//! Scripted stand-in for the vehicle simulation.

use iobox_core::{SafetyState, VehicleData, VehicleDataProvider};

const TOP_SPEED: f32 = 340.0;
const ACCELERATION_SECS: f32 = 60.0;
const BURN_SECS: f32 = 120.0;

/// Deterministic drive cycle: accelerate, burn fuel, overheat each wheel
/// once, optionally abort.
#[derive(Debug, Clone, Default)]
pub struct SimulatedVehicle {
    elapsed_ms: u64,
    abort_at_ms: Option<u64>,
}

impl SimulatedVehicle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `Abort` from `secs` into the run onwards.
    #[must_use]
    pub fn with_abort_at(mut self, secs: u64) -> Self {
        self.abort_at_ms = Some(secs * 1000);
        self
    }

    pub fn advance(&mut self, dt_ms: u64) {
        self.elapsed_ms += dt_ms;
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Vehicle state at `elapsed_ms` into the run.
    #[must_use]
    pub fn data_at(&self, elapsed_ms: u64) -> VehicleData {
        let t = elapsed_ms as f32 / 1000.0;
        // Two seconds on the start line
        let driving = (t - 2.0).max(0.0);
        let thrust = if driving > 0.0 && driving < ACCELERATION_SECS {
            1.0
        } else {
            0.0
        };

        let safety = match elapsed_ms {
            _ if self.abort_at_ms.is_some_and(|at| elapsed_ms >= at) => SafetyState::Abort,
            20_000..=24_999 => SafetyState::OverheatWheelLeft,
            40_000..=44_999 => SafetyState::OverheatWheelRight,
            _ => SafetyState::Nominal,
        };

        VehicleData {
            speed: TOP_SPEED * (driving / ACCELERATION_SECS).min(1.0),
            engine1_fuel: (1.0 - driving / BURN_SECS).max(0.0),
            engine2_fuel: (1.0 - driving / (BURN_SECS * 1.5)).max(0.0),
            pedal_brake: 0.0,
            pedal_thrust: thrust,
            parachute_deployed: safety == SafetyState::Abort,
            safety,
        }
    }
}

impl VehicleDataProvider for SimulatedVehicle {
    fn snapshot(&mut self) -> VehicleData {
        self.data_at(self.elapsed_ms)
    }
}
