//! Brightness curve primitives
//!
//! Stateless mappings from a step position to a duty value for the three
//! motions every characteristic is built from:
//! - flash: half a sine period, followed by a dark hold
//! - isophase: linear ramps in 5% steps at both ends of the lit half
//! - fade-out: linear ramp to zero from whatever level the light shows
//!
//! Nothing here touches an output. The generator writes the values and
//! suspends between them.

use core::f32::consts::PI;

use embassy_time::Duration;

/// Number of samples in the lit part of a flash.
pub const FLASH_STEPS: u32 = 100;

/// Interval between two flash samples.
pub const FLASH_TICK: Duration = Duration::from_millis(12);

/// Dark hold that closes every flash.
pub const FLASH_DARK: Duration = Duration::from_millis(1600);

/// Total time occupied by one flash (rise, fall and dark hold).
pub const FLASH_DURATION: Duration =
    Duration::from_millis(FLASH_TICK.as_millis() * FLASH_STEPS as u64 + FLASH_DARK.as_millis());

/// Percentage points added per isophase ramp step.
pub const ISOPHASE_STEP_PERCENT: u32 = 5;

/// Number of ticks in one isophase ramp.
pub const ISOPHASE_RAMP_STEPS: u32 = 100 / ISOPHASE_STEP_PERCENT;

/// Interval between two isophase ramp samples.
pub const ISOPHASE_TICK: Duration = Duration::from_millis(10);

/// Time taken by one isophase ramp.
pub const ISOPHASE_RAMP: Duration =
    Duration::from_millis(ISOPHASE_TICK.as_millis() * ISOPHASE_RAMP_STEPS as u64);

/// Percentage points removed per fade-out step.
pub const FADE_OUT_STEP_PERCENT: u8 = 2;

/// Interval between two fade-out samples.
pub const FADE_OUT_TICK: Duration = Duration::from_millis(12);

/// Convert a fraction in `0.0..=1.0` to a duty value.
///
/// Out of range and NaN inputs are clamped, so the result never exceeds
/// `duty_max`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn duty_from_fraction(fraction: f32, duty_max: u16) -> u16 {
    if fraction.is_nan() || fraction <= 0.0 {
        return 0;
    }
    let fraction = fraction.min(1.0);
    let duty = libm::roundf(fraction * f32::from(duty_max));
    (duty as u16).min(duty_max)
}

/// Convert a whole percentage to a duty value, rounding to nearest.
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn duty_from_percent(percent: u32, duty_max: u16) -> u16 {
    let percent = if percent > 100 { 100 } else { percent };
    ((duty_max as u32 * percent + 50) / 100) as u16
}

/// Convert a duty value to whole percent, rounding down.
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn duty_to_percent(duty: u16, duty_max: u16) -> u8 {
    if duty_max == 0 {
        return 0;
    }
    let duty = if duty > duty_max { duty_max } else { duty };
    (duty as u32 * 100 / duty_max as u32) as u8
}

/// Flash envelope as a fraction: `sin(step / total_steps * PI)`.
///
/// Zero at both ends, `1.0` at the midpoint.
#[allow(clippy::cast_precision_loss)]
pub fn flash_fraction(step: u32, total_steps: u32) -> f32 {
    if total_steps == 0 {
        return 0.0;
    }
    let step = step.min(total_steps);
    let value = libm::sinf(step as f32 / total_steps as f32 * PI);
    value.clamp(0.0, 1.0)
}

/// Flash envelope as a duty value.
pub fn flash_curve(step: u32, total_steps: u32, duty_max: u16) -> u16 {
    duty_from_fraction(flash_fraction(step, total_steps), duty_max)
}

/// Isophase ramp level for a ramp step.
///
/// Step `0` is dark, step [`ISOPHASE_RAMP_STEPS`] is fully lit. The rising
/// ramp walks the steps upwards, the falling ramp walks them back down.
pub const fn isophase_curve(step: u32, duty_max: u16) -> u16 {
    let step = if step > ISOPHASE_RAMP_STEPS {
        ISOPHASE_RAMP_STEPS
    } else {
        step
    };
    duty_from_percent(step * ISOPHASE_STEP_PERCENT, duty_max)
}

/// Fade-out ramp starting from the duty value currently shown.
///
/// The start level is converted to whole percent (rounding down, so the ramp
/// never brightens the light) and decremented by
/// [`FADE_OUT_STEP_PERCENT`] per step. The iterator yields only the
/// intermediate levels; the caller closes the ramp with a terminal `0` write.
pub const fn fade_out_curve(start_duty: u16, duty_max: u16) -> FadeOut {
    FadeOut {
        percent: duty_to_percent(start_duty, duty_max),
        duty_max,
    }
}

/// Iterator over the intermediate levels of a fade-out.
#[derive(Debug, Clone)]
pub struct FadeOut {
    percent: u8,
    duty_max: u16,
}

impl FadeOut {
    /// Level (in percent) the next step will emit.
    pub const fn percent(&self) -> u8 {
        self.percent
    }
}

impl Iterator for FadeOut {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.percent == 0 {
            return None;
        }
        let duty = duty_from_percent(u32::from(self.percent), self.duty_max);
        self.percent = self.percent.saturating_sub(FADE_OUT_STEP_PERCENT);
        Some(duty)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.percent.div_ceil(FADE_OUT_STEP_PERCENT));
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FadeOut {}
