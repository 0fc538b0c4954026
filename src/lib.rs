#![no_std]

#[macro_use]
mod fmt;

pub mod characteristic;
pub mod clock;
pub mod curve;
pub mod error;
pub mod fleet;
pub mod generator;
pub mod handle;
pub mod presets;
pub mod scheduler;

pub use characteristic::{Characteristic, MAX_PHASE_GROUPS, Motion, PhaseGroup};
pub use clock::{Clock, EmbassyClock, ManualClock};
pub use error::{ConfigurationError, NotationError};
pub use fleet::{Fleet, FleetControl, start_fleet};
pub use generator::LightGenerator;
pub use handle::{GeneratorState, LightHandle};
pub use scheduler::{FleetConfig, FleetScheduler, ModeGate, NoGate};

pub use embassy_time::{Duration, Instant};

/// Default duty resolution (16-bit PWM).
pub const DEFAULT_DUTY_MAX: u16 = u16::MAX;

/// Abstract brightness output
///
/// Implement this trait for one PWM channel (or any other single-channel
/// dimmable output). Every light owns exactly one sink.
pub trait OutputSink {
    /// Set up the channel before the first write.
    fn configure(&mut self, _channel: usize, _carrier_hz: u32) {}

    /// Largest duty value the output accepts; `0` is off.
    fn max_duty(&self) -> u16 {
        DEFAULT_DUTY_MAX
    }

    /// Write a duty value in `0..=max_duty()`.
    fn write(&mut self, duty: u16);
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn configure(&mut self, channel: usize, carrier_hz: u32) {
        (**self).configure(channel, carrier_hz);
    }

    fn max_duty(&self) -> u16 {
        (**self).max_duty()
    }

    fn write(&mut self, duty: u16) {
        (**self).write(duty);
    }
}
