use thiserror::Error;

/// A characteristic that cannot be played as described.
///
/// Detected when a light is started. Only the offending light is affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigurationError {
    #[error("characteristic has no phase groups")]
    NoPhaseGroups,
    #[error("characteristic has more phase groups than fit in a descriptor")]
    TooManyPhaseGroups,
    #[error("phase group {group} flashes zero times")]
    ZeroFlashCount { group: usize },
    #[error("phase group {group}: isophase of {duration_ms} ms is shorter than its two ramps")]
    IsophaseTooShort { group: usize, duration_ms: u64 },
    #[error("phase group {group}: period of {period_ms} ms, motions need {required_ms} ms")]
    PeriodTooShort {
        group: usize,
        period_ms: u64,
        required_ms: u64,
    },
    #[error("bad notation: {0}")]
    Notation(#[from] NotationError),
}

/// Failure to read light-list notation such as `Fl(2) W 10s`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotationError {
    #[error("empty notation")]
    Empty,
    #[error("unknown motion, expected `Fl`, `Fl(n)` or `Iso`")]
    UnknownMotion,
    #[error("flash count is not a number between 1 and 255")]
    BadFlashCount,
    #[error("period is missing")]
    MissingPeriod,
    #[error("period is not a number of seconds like `10s` or `2.5s`")]
    BadPeriod,
    #[error("unexpected trailing token")]
    UnexpectedToken,
}
