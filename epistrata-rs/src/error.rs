use crate::data::Curve;
use crate::prelude::{Day, Real};
use thiserror::Error;

/// Data precondition violations detected while processing a state.
///
/// The computation is deterministic, so none of those are transient: running
/// again on the same input fails the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("invalid window [{start}, {end})")]
    InvalidWindow { start: usize, end: usize },

    #[error("{state}: raw series has {len} rows, window ends at row {end}")]
    InsufficientHistory {
        state: String,
        len: usize,
        end: usize,
    },

    #[error("{state}: {curve} multiplier table has {len} rows, window needs {needed}")]
    MisalignedMultiplierTable {
        state: String,
        curve: Curve,
        len: usize,
        needed: usize,
    },

    #[error("{state}: cannot parse date {value:?} on day {day}")]
    InvalidDate {
        state: String,
        day: Day,
        value: String,
    },

    #[error("{state}: dates are not strictly increasing on day {day}")]
    NonMonotonicDates { state: String, day: Day },

    #[error("{state}: {rate} rate has a zero denominator on day {day}")]
    InvalidTransitionRate {
        state: String,
        day: Day,
        rate: &'static str,
    },

    #[error("{state}: strata are fully accounted for on day {day}, nothing to redistribute")]
    DegenerateReconciliation { state: String, day: Day },

    #[error("{curve} multipliers on row {day}: {reason} (sum = {sum})")]
    InvalidMultiplier {
        curve: Curve,
        day: Day,
        sum: Real,
        reason: &'static str,
    },
}

/// General error type, wrapping pipeline failures and the I/O performed by
/// providers and sinks.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("unknown state: {0}")]
    UnknownState(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
