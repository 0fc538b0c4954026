//! Light characteristics
//!
//! A characteristic is an ordered list of phase groups. Each group plays one
//! motion (a number of flashes, or one isophase) and then stays dark until its
//! period has elapsed. The generator repeats the list forever.

use embassy_time::Duration;
use heapless::Vec;

use crate::curve::{FLASH_DURATION, ISOPHASE_RAMP};
use crate::error::{ConfigurationError, NotationError};

/// Maximum number of phase groups in one characteristic.
pub const MAX_PHASE_GROUPS: usize = 8;

const _: () = assert!(MAX_PHASE_GROUPS > 0);

/// Elementary motion played at the start of a phase group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// `count` flashes back to back, each lasting [`FLASH_DURATION`]
    Flash { count: u8 },
    /// Lit for the first half of `duration`, dark for the second half
    Isophase { duration: Duration },
}

impl Motion {
    /// Shortest period that fits the motion, closing dark hold included.
    #[allow(clippy::cast_lossless)]
    pub const fn min_duration(self) -> Duration {
        match self {
            Self::Flash { count } => {
                Duration::from_millis(FLASH_DURATION.as_millis() * count as u64)
            }
            Self::Isophase { duration } => duration,
        }
    }
}

/// One motion plus the period the whole group occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseGroup {
    pub motion: Motion,
    /// Time from the start of this group to the start of the next one
    pub period: Duration,
}

impl PhaseGroup {
    /// `count` flashes repeating every `period`.
    pub const fn flash(count: u8, period: Duration) -> Self {
        Self {
            motion: Motion::Flash { count },
            period,
        }
    }

    /// Isophase whose period equals its duration.
    pub const fn isophase(duration: Duration) -> Self {
        Self {
            motion: Motion::Isophase { duration },
            period: duration,
        }
    }

    /// Override the group period.
    #[must_use]
    pub const fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    fn validate(&self, group: usize) -> Result<(), ConfigurationError> {
        match self.motion {
            Motion::Flash { count: 0 } => {
                return Err(ConfigurationError::ZeroFlashCount { group });
            }
            Motion::Isophase { duration } if duration.as_millis() / 2 < ISOPHASE_RAMP.as_millis() => {
                return Err(ConfigurationError::IsophaseTooShort {
                    group,
                    duration_ms: duration.as_millis(),
                });
            }
            _ => {}
        }

        let required = self.motion.min_duration();
        if self.period < required {
            return Err(ConfigurationError::PeriodTooShort {
                group,
                period_ms: self.period.as_millis(),
                required_ms: required.as_millis(),
            });
        }
        Ok(())
    }
}

/// Immutable description of one light's temporal pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristic {
    name: &'static str,
    groups: Vec<PhaseGroup, MAX_PHASE_GROUPS>,
}

impl Characteristic {
    /// Build a characteristic from phase groups.
    ///
    /// Only the group count is checked here; timing is checked by
    /// [`Characteristic::validate`] when the light is started.
    pub fn new(name: &'static str, groups: &[PhaseGroup]) -> Result<Self, ConfigurationError> {
        let groups =
            Vec::from_slice(groups).map_err(|()| ConfigurationError::TooManyPhaseGroups)?;
        Ok(Self { name, groups })
    }

    /// Characteristic made of a single phase group.
    pub fn single(name: &'static str, group: PhaseGroup) -> Self {
        let mut groups = Vec::new();
        // Capacity is at least one
        groups.push(group).ok();
        Self { name, groups }
    }

    /// Parse light-list notation, e.g. `Fl(2) W 10s` or `Iso W 4s`.
    ///
    /// Several groups can be chained with `+`: `Fl(2) W 10s + Iso W 4s`.
    pub fn parse(name: &'static str, notation: &str) -> Result<Self, ConfigurationError> {
        let mut groups = Vec::new();
        for part in notation.split('+') {
            let group = parse_group(part)?;
            groups
                .push(group)
                .map_err(|_| ConfigurationError::TooManyPhaseGroups)?;
        }
        Ok(Self { name, groups })
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn groups(&self) -> &[PhaseGroup] {
        &self.groups
    }

    /// Time one pass over all groups takes.
    pub fn cycle_duration(&self) -> Duration {
        self.groups
            .iter()
            .fold(Duration::from_ticks(0), |acc, group| acc + group.period)
    }

    /// Check that every group fits in its period.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.groups.is_empty() {
            return Err(ConfigurationError::NoPhaseGroups);
        }
        for (index, group) in self.groups.iter().enumerate() {
            group.validate(index)?;
        }
        Ok(())
    }
}

/// Parse one group: motion, optional colour, period.
fn parse_group(notation: &str) -> Result<PhaseGroup, NotationError> {
    let mut tokens = notation.split_whitespace();
    let motion = tokens.next().ok_or(NotationError::Empty)?;

    let mut token = tokens.next().ok_or(NotationError::MissingPeriod)?;
    if is_colour(token) {
        token = tokens.next().ok_or(NotationError::MissingPeriod)?;
    }
    let period = parse_period(token)?;

    if tokens.next().is_some() {
        return Err(NotationError::UnexpectedToken);
    }

    match motion {
        "Iso" => Ok(PhaseGroup::isophase(period)),
        "Fl" => Ok(PhaseGroup::flash(1, period)),
        _ => {
            let count = motion
                .strip_prefix("Fl(")
                .and_then(|rest| rest.strip_suffix(')'))
                .ok_or(NotationError::UnknownMotion)?;
            let count: u8 = count.parse().map_err(|_| NotationError::BadFlashCount)?;
            if count == 0 {
                return Err(NotationError::BadFlashCount);
            }
            Ok(PhaseGroup::flash(count, period))
        }
    }
}

fn is_colour(token: &str) -> bool {
    matches!(token, "W" | "R" | "G" | "Y")
}

/// Parse `10s` or `2.5s` into a duration, with millisecond resolution.
fn parse_period(token: &str) -> Result<Duration, NotationError> {
    let value = token.strip_suffix('s').ok_or(NotationError::BadPeriod)?;
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));

    let seconds: u64 = whole.parse().map_err(|_| NotationError::BadPeriod)?;
    if fraction.len() > 3 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NotationError::BadPeriod);
    }

    let mut millis = 0;
    let mut scale = 100;
    for digit in fraction.bytes() {
        millis += u64::from(digit - b'0') * scale;
        scale /= 10;
    }

    let total = seconds
        .checked_mul(1000)
        .and_then(|ms| ms.checked_add(millis))
        .ok_or(NotationError::BadPeriod)?;
    if total == 0 {
        return Err(NotationError::BadPeriod);
    }
    Ok(Duration::from_millis(total))
}
