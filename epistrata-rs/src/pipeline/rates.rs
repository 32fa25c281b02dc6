use super::AlignedWindow;
use crate::error::PipelineError;
use crate::prelude::{Day, Real, Strata};
use std::iter;

pub const UNVAX_TO_FULL: &str = "unvaccinated to fully vaccinated";
pub const FULL_TO_BOOST: &str = "fully vaccinated to boosted";

/// Daily fraction of a stratum moving to the next vaccination stratum.
///
/// Both rates are 0 on day 0 since no transition is observed before the
/// window starts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionRates {
    pub unvax_to_full: Vec<Real>,
    pub full_to_boost: Vec<Real>,
}

impl TransitionRates {
    pub fn len(&self) -> usize {
        self.unvax_to_full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unvax_to_full.is_empty()
    }
}

/// Size of each stratum for every day of the window.
///
/// People with at least one dose are no longer counted as unvaccinated, so
/// `uv = population - first doses`. The fully vaccinated and boosted strata
/// are the raw cumulative counters.
pub fn subpopulations(window: &AlignedWindow) -> Strata<Vec<Real>> {
    let uv = window
        .records()
        .iter()
        .zip(window.population())
        .map(|(r, &pop)| pop - r.first_doses)
        .collect();
    Strata {
        uv,
        fv: window.column(|r| r.fully_vaccinated),
        bv: window.column(|r| r.boosters),
    }
}

/// Compute transition rates from consecutive stratum sizes.
///
/// ```text
/// unvax_to_full[i] = (uv[i-1] - uv[i]) / uv[i-1]
/// full_to_boost[i] = (bv[i] - bv[i-1]) / fv[i-1]
/// ```
///
/// A zero denominator is reported as an error rather than yielding NaN or
/// infinity, since the value would poison every recurrence downstream.
pub fn transition_rates(
    state: &str,
    subpopulations: &Strata<Vec<Real>>,
) -> Result<TransitionRates, PipelineError> {
    let Strata { uv, fv, bv } = subpopulations;

    let unvax_to_full = rate_series(state, UNVAX_TO_FULL, uv.len(), |i| {
        (uv[i - 1] - uv[i], uv[i - 1])
    })?;
    let full_to_boost = rate_series(state, FULL_TO_BOOST, bv.len(), |i| {
        (bv[i] - bv[i - 1], fv[i - 1])
    })?;

    return Ok(TransitionRates {
        unvax_to_full,
        full_to_boost,
    });
}

/// Build a series of ratios num/den for days 1..n, with day 0 fixed at zero.
fn rate_series(
    state: &str,
    rate: &'static str,
    n: usize,
    f: impl Fn(Day) -> (Real, Real),
) -> Result<Vec<Real>, PipelineError> {
    if n == 0 {
        return Ok(vec![]);
    }
    let rest = (1..n).map(|day| {
        let (num, den) = f(day);
        if den == 0.0 {
            return Err(PipelineError::InvalidTransitionRate {
                state: state.to_string(),
                day,
                rate,
            });
        }
        Ok(num / den)
    });
    iter::once(Ok(0.0)).chain(rest).collect()
}
