use iobox_core::{HudController, LineTransport, VehicleDataProvider};
use log::{info, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Fixed-rate driver for a [`HudController`].
///
/// Ticks the controller with measured elapsed time so a slow serial
/// exchange never skews the page timers. The loop also ends when the
/// [stop flag](Runner::stop_flag) is cleared, e.g. from a Ctrl-C handler.
#[derive(Debug, Clone)]
pub struct Runner {
    period: Duration,
    duration: Option<Duration>,
    running: Arc<AtomicBool>,
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed: Duration,
}

impl Runner {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            duration: None,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Share an existing stop flag; the loop runs while it is `true`.
    #[must_use]
    pub fn with_stop_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = running;
        self
    }

    /// Flag checked before every tick. Store `false` to stop the loop.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Stop after `duration` instead of running forever.
    #[must_use]
    pub fn with_duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }

    /// Open the controller, tick it until the duration is over or the stop
    /// flag is cleared, then close it.
    ///
    /// `on_tick` runs before every tick with the same elapsed milliseconds,
    /// e.g. to advance a simulation.
    pub fn run<T, V, F>(&self, hud: &mut HudController<T, V>, mut on_tick: F) -> RunSummary
    where
        T: LineTransport,
        V: VehicleDataProvider,
        F: FnMut(&mut HudController<T, V>, u32),
    {
        hud.open();

        let start = Instant::now();
        let mut last = start;
        let mut ticks = 0u64;

        while self.running.load(Ordering::SeqCst) {
            let now = Instant::now();
            if self.duration.is_some_and(|d| now - start >= d) {
                break;
            }

            // Carry sub-millisecond remainders into the next tick
            let dt_ms = u32::try_from((now - last).as_millis()).unwrap_or(u32::MAX);
            last += Duration::from_millis(u64::from(dt_ms));

            on_tick(hud, dt_ms);
            hud.tick(dt_ms);
            ticks += 1;
            trace!("tick {} ({} ms)", ticks, dt_ms);

            thread::sleep(self.period.saturating_sub(now.elapsed()));
        }

        hud.close();
        let summary = RunSummary {
            ticks,
            elapsed: start.elapsed(),
        };
        info!("stopped after {} ticks in {:?}", summary.ticks, summary.elapsed);
        summary
    }
}
