//! Day/night scheduler
//!
//! Lights burn for one tidal cycle ("night"), fade out together and stay dark
//! for another tidal cycle ("day"). A mode gate sampled at the end of every
//! night can keep the lights on for another cycle instead.

use embassy_futures::join::join;
use embassy_time::Duration;

use crate::OutputSink;
use crate::characteristic::Characteristic;
use crate::clock::Clock;
use crate::fleet::start_fleet;
use crate::handle::LightHandle;

/// Default carrier frequency, comfortably above flicker perception.
pub const DEFAULT_CARRIER_HZ: u32 = 1000;

/// Default tidal cycle: eight minutes, half a day in board-game time.
pub const DEFAULT_TIDAL_CYCLE: Duration = Duration::from_secs(480);

/// Binary input deciding whether the day phase is skipped
pub trait ModeGate {
    /// `true` keeps the lights on continuously, `false` runs the normal
    /// day/night alternation.
    fn read(&mut self) -> bool;
}

/// Gate that never skips the day phase
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGate;

impl ModeGate for NoGate {
    fn read(&mut self) -> bool {
        false
    }
}

impl<F: FnMut() -> bool> ModeGate for F {
    fn read(&mut self) -> bool {
        self()
    }
}

/// Configuration for the fleet scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetConfig {
    /// Length of one night and of one day
    pub tidal_cycle: Duration,
    /// PWM carrier frequency passed to every sink
    pub carrier_hz: u32,
}

impl FleetConfig {
    pub const DEFAULT: Self = Self {
        tidal_cycle: DEFAULT_TIDAL_CYCLE,
        carrier_hz: DEFAULT_CARRIER_HZ,
    };

    #[must_use]
    pub const fn with_tidal_cycle(mut self, tidal_cycle: Duration) -> Self {
        self.tidal_cycle = tidal_cycle;
        self
    }

    #[must_use]
    pub const fn with_carrier_hz(mut self, carrier_hz: u32) -> Self {
        self.carrier_hz = carrier_hz;
        self
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Owns the lights and alternates night and day forever
pub struct FleetScheduler<S: OutputSink, G: ModeGate, const N: usize> {
    config: FleetConfig,
    characteristics: [Characteristic; N],
    sinks: [S; N],
    handles: [LightHandle; N],
    gate: G,
}

impl<S: OutputSink, G: ModeGate, const N: usize> FleetScheduler<S, G, N> {
    /// Create a scheduler. Each sink is configured with its index as channel
    /// id and the configured carrier frequency.
    pub fn new(
        config: FleetConfig,
        characteristics: [Characteristic; N],
        mut sinks: [S; N],
        gate: G,
    ) -> Self {
        for (channel, sink) in sinks.iter_mut().enumerate() {
            sink.configure(channel, config.carrier_hz);
        }
        Self {
            config,
            characteristics,
            sinks,
            handles: core::array::from_fn(|_| LightHandle::new()),
            gate,
        }
    }

    pub const fn config(&self) -> &FleetConfig {
        &self.config
    }

    pub const fn characteristics(&self) -> &[Characteristic; N] {
        &self.characteristics
    }

    pub const fn handles(&self) -> &[LightHandle; N] {
        &self.handles
    }

    pub const fn sinks(&self) -> &[S; N] {
        &self.sinks
    }

    pub fn gate_mut(&mut self) -> &mut G {
        &mut self.gate
    }

    /// Alternate night and day forever.
    pub async fn run<C: Clock>(&mut self, clock: &C) -> ! {
        loop {
            self.run_cycle(clock).await;
        }
    }

    /// One night followed by one day.
    pub async fn run_cycle<C: Clock>(&mut self, clock: &C) {
        self.night(clock).await;

        info!("day");
        clock.sleep(self.config.tidal_cycle).await;
    }

    /// Run a fleet until a night ends with the gate open, then stop it.
    async fn night<C: Clock>(&mut self, clock: &C) {
        info!("night");

        let Self {
            config,
            characteristics,
            sinks,
            handles,
            gate,
        } = self;
        let tidal_cycle = config.tidal_cycle;

        let fleet = start_fleet(characteristics, sinks, handles);
        let control = fleet.control();

        let watch = async move {
            loop {
                clock.sleep(tidal_cycle).await;
                if !gate.read() {
                    break;
                }
                info!("continuous mode, skipping day");
            }
            control.stop_fleet().await;
        };

        join(fleet.run(clock), watch).await;
    }
}
