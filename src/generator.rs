//! Light generator
//!
//! Plays one characteristic on one output until cancelled, then fades out
//! from wherever the light happens to be.
//!
//! Each phase group is timed from its own start: after the motions have run,
//! the generator sleeps only for what is left of the group period, so the
//! time spent writing and waking up does not stretch the cycle. Motions end
//! on their last write; the dark hold that closes a group is part of that
//! sleep, so wake-up latency alone never overruns a period. A group that
//! overruns its period is logged and the next group starts at once.

use core::convert::Infallible;

use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Instant};

use crate::OutputSink;
use crate::characteristic::{Characteristic, Motion};
use crate::clock::Clock;
use crate::curve::{
    FADE_OUT_TICK, FLASH_DARK, FLASH_STEPS, FLASH_TICK, ISOPHASE_RAMP_STEPS, ISOPHASE_TICK,
    fade_out_curve, flash_curve, isophase_curve,
};
use crate::error::ConfigurationError;
use crate::handle::{GeneratorState, LightHandle};

/// Cancellation observed at a suspension point
#[derive(Debug)]
struct Cancelled;

type Step = Result<(), Cancelled>;

/// Cooperative task body driving one light
pub struct LightGenerator<'a, S: OutputSink> {
    characteristic: &'a Characteristic,
    sink: &'a mut S,
    handle: &'a LightHandle,
    duty_max: u16,
    last_duty: u16,
}

impl<'a, S: OutputSink> LightGenerator<'a, S> {
    /// Bind a characteristic to its output.
    ///
    /// Fails if the characteristic does not fit its own periods. Nothing is
    /// written to the sink in that case.
    pub fn new(
        characteristic: &'a Characteristic,
        sink: &'a mut S,
        handle: &'a LightHandle,
    ) -> Result<Self, ConfigurationError> {
        characteristic.validate()?;
        let duty_max = sink.max_duty();
        Ok(Self {
            characteristic,
            sink,
            handle,
            duty_max,
            last_duty: 0,
        })
    }

    pub const fn name(&self) -> &'static str {
        self.characteristic.name()
    }

    /// Last duty value written to the sink
    pub const fn last_duty(&self) -> u16 {
        self.last_duty
    }

    /// Play the characteristic until cancellation, then fade out.
    ///
    /// Returns once the light is dark and the handle reports
    /// [`GeneratorState::Stopped`].
    pub async fn run<C: Clock>(&mut self, clock: &C) {
        self.set_state(GeneratorState::Running);

        let Err(Cancelled) = self.run_phases(clock).await;

        self.set_state(GeneratorState::FadingOut);
        self.fade_out(clock).await;
        self.set_state(GeneratorState::Stopped);
    }

    async fn run_phases<C: Clock>(&mut self, clock: &C) -> Result<Infallible, Cancelled> {
        let characteristic = self.characteristic;
        loop {
            for group in characteristic.groups() {
                let started = clock.now();

                match group.motion {
                    Motion::Flash { count } => {
                        for flash in 1..=count {
                            self.flash(clock).await?;
                            if flash < count {
                                self.pause(clock, FLASH_DARK).await?;
                            }
                        }
                    }
                    Motion::Isophase { duration } => {
                        self.isophase(clock, started, duration).await?;
                    }
                }

                let elapsed = clock.now().saturating_duration_since(started);
                let rest = match group.period.checked_sub(elapsed) {
                    Some(rest) => rest,
                    None => {
                        warn!(
                            "{}: group took {} ms of a {} ms period",
                            self.name(),
                            elapsed.as_millis(),
                            group.period.as_millis()
                        );
                        self.handle.record_overrun();
                        Duration::from_ticks(0)
                    }
                };
                self.pause(clock, rest).await?;
            }
        }
    }

    /// One flash: half a sine period ending dark.
    ///
    /// The dark hold after the last flash of a group is left to the group
    /// pause.
    async fn flash<C: Clock>(&mut self, clock: &C) -> Step {
        for step in 0..FLASH_STEPS {
            self.write(flash_curve(step, FLASH_STEPS, self.duty_max));
            self.pause(clock, FLASH_TICK).await?;
        }

        self.write(0);
        Ok(())
    }

    /// One isophase: ramp up, hold until half time, ramp down.
    ///
    /// The lit hold is measured from `started` so ramp jitter does not shift
    /// the half. The dark half is left to the group pause.
    async fn isophase<C: Clock>(&mut self, clock: &C, started: Instant, duration: Duration) -> Step {
        for step in 0..ISOPHASE_RAMP_STEPS {
            self.write(isophase_curve(step, self.duty_max));
            self.pause(clock, ISOPHASE_TICK).await?;
        }
        self.write(self.duty_max);
        self.pause_until(clock, started + duration / 2).await?;

        for step in (1..=ISOPHASE_RAMP_STEPS).rev() {
            self.write(isophase_curve(step, self.duty_max));
            self.pause(clock, ISOPHASE_TICK).await?;
        }
        self.write(0);
        Ok(())
    }

    /// Ramp from the last written level down to zero.
    ///
    /// Runs to completion: cancellation is not checked here.
    async fn fade_out<C: Clock>(&mut self, clock: &C) {
        let ramp = fade_out_curve(self.last_duty, self.duty_max);
        trace!("{}: fading out from {}%", self.name(), ramp.percent());

        for duty in ramp {
            self.write(duty);
            clock.sleep(FADE_OUT_TICK).await;
        }
        self.write(0);
    }

    /// Sleep for `duration` unless cancellation arrives first.
    async fn pause<C: Clock>(&self, clock: &C, duration: Duration) -> Step {
        match select(self.handle.cancelled(), clock.sleep(duration)).await {
            Either::First(()) => Err(Cancelled),
            Either::Second(()) => Ok(()),
        }
    }

    async fn pause_until<C: Clock>(&self, clock: &C, deadline: Instant) -> Step {
        let duration = deadline.saturating_duration_since(clock.now());
        self.pause(clock, duration).await
    }

    fn write(&mut self, duty: u16) {
        let duty = duty.min(self.duty_max);
        self.sink.write(duty);
        self.last_duty = duty;
    }

    fn set_state(&self, state: GeneratorState) {
        debug!("{}: {}", self.name(), state.as_str());
        self.handle.set_state(state);
    }
}
