//! Fleet of light generators
//!
//! A [`Fleet`] borrows every sink mutably for as long as it lives, so no new
//! fleet can be built on the same outputs until the old one has been run to
//! completion, i.e. until every light has faded out.

use embassy_futures::join::join_array;

use crate::OutputSink;
use crate::characteristic::Characteristic;
use crate::clock::Clock;
use crate::generator::LightGenerator;
use crate::handle::{GeneratorState, LightHandle};

/// Generators started together, one per light
pub struct Fleet<'a, S: OutputSink, const N: usize> {
    generators: [Option<LightGenerator<'a, S>>; N],
    handles: &'a [LightHandle; N],
}

/// Start one generator per characteristic, each bound to the sink with the
/// same index.
///
/// A characteristic that fails validation is logged and left out; its light
/// stays dark and its handle reports [`GeneratorState::Stopped`]. The other
/// lights are not affected.
pub fn start_fleet<'a, S: OutputSink, const N: usize>(
    characteristics: &'a [Characteristic; N],
    sinks: &'a mut [S; N],
    handles: &'a [LightHandle; N],
) -> Fleet<'a, S, N> {
    let mut sinks = sinks.each_mut().into_iter();
    let generators = core::array::from_fn(|index| {
        let sink = sinks.next()?;
        let characteristic = &characteristics[index];
        let handle = &handles[index];
        handle.reset();

        match LightGenerator::new(characteristic, sink, handle) {
            Ok(generator) => Some(generator),
            Err(err) => {
                error!("{} rejected: {}", characteristic.name(), err);
                handle.set_state(GeneratorState::Stopped);
                None
            }
        }
    });

    let fleet = Fleet {
        generators,
        handles,
    };
    info!("fleet started: {} of {} lights", fleet.active(), N);
    fleet
}

impl<'a, S: OutputSink, const N: usize> Fleet<'a, S, N> {
    /// Number of lights that passed validation
    pub fn active(&self) -> usize {
        self.generators.iter().filter(|slot| slot.is_some()).count()
    }

    /// Control block for stopping this fleet while it runs.
    pub const fn control(&self) -> FleetControl<'a, N> {
        FleetControl {
            handles: self.handles,
        }
    }

    /// Drive every generator concurrently until all of them have stopped.
    pub async fn run<C: Clock>(mut self, clock: &C) {
        let lights = self.generators.each_mut().map(|slot| async move {
            if let Some(generator) = slot {
                generator.run(clock).await;
            }
        });
        join_array(lights).await;
    }
}

/// Stops a running [`Fleet`] through its light handles
#[derive(Clone, Copy)]
pub struct FleetControl<'a, const N: usize> {
    handles: &'a [LightHandle; N],
}

impl<'a, const N: usize> FleetControl<'a, N> {
    pub const fn handles(&self) -> &'a [LightHandle; N] {
        self.handles
    }

    /// Request cancellation of every light without waiting.
    pub fn cancel_all(&self) {
        for handle in self.handles {
            handle.cancel();
        }
    }

    /// Whether every light has reached [`GeneratorState::Stopped`]
    pub fn is_stopped(&self) -> bool {
        self.handles
            .iter()
            .all(|handle| handle.state() == GeneratorState::Stopped)
    }

    /// Cancel every light and wait until all of them have faded out.
    pub async fn stop_fleet(&self) {
        info!("stopping fleet");
        self.cancel_all();
        for handle in self.handles {
            handle.wait_stopped().await;
        }
        info!("fleet stopped");
    }
}
