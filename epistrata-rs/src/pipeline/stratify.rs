//! Splits Infected, Hospitalized, Recovered and Deceased into vaccination
//! strata.
//!
//! Every value is truncated toward zero as soon as it is computed. The
//! Recovered recurrence feeds the truncated value of day i-1 into day i, so
//! truncation residue compounds over the window. This is intentional and
//! must be preserved to reproduce the reference tables.
use super::{AlignedWindow, TransitionRates};
use crate::data::CurveView;
use crate::prelude::{Count, Real, Strata};
use crate::utils::{cumsum, truncate};
use std::iter;

/// Stratified compartments pinned by external counters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stratified {
    pub infected: Strata<Vec<Count>>,
    pub hospitalized: Strata<Vec<Count>>,
    pub recovered: Strata<Vec<Count>>,
    pub deceased: Strata<Vec<Count>>,
}

/// Apportion a daily aggregate across strata with the given curve.
pub fn apportion(values: &[Real], curve: CurveView) -> Strata<Vec<Count>> {
    values
        .iter()
        .enumerate()
        .map(|(day, &x)| curve.at(day).map(|m| truncate(x * m)))
        .collect()
}

/// `Infected_s[i] = trunc(original_infected[i] * case_mul_s[i])`
pub fn infected(original_infected: &[Real], window: &AlignedWindow) -> Strata<Vec<Count>> {
    apportion(original_infected, window.cases())
}

/// `Hospitalized_s[i] = trunc(inpatient_beds[i] * hosp_mul_s[i])`
pub fn hospitalized(window: &AlignedWindow) -> Strata<Vec<Count>> {
    apportion(&window.column(|r| r.inpatient_beds), window.hospitalizations())
}

/// Evolve recovered strata.
///
/// Day 0 is seeded with the cumulative recovered count apportioned by the case
/// curve. Afterwards each stratum receives its share of new recoveries and
/// exchanges individuals with its neighbours at the daily transition rates:
///
/// ```text
/// R_uv[i] = trunc(R_uv[i-1] + new[i]*uv[i] - a[i]*R_uv[i-1])
/// R_fv[i] = trunc(R_fv[i-1] + new[i]*fv[i] + a[i]*R_uv[i-1] - b[i]*R_fv[i-1])
/// R_bv[i] = trunc(R_bv[i-1] + new[i]*bv[i] + b[i]*R_fv[i-1])
/// ```
pub fn recovered(window: &AlignedWindow, rates: &TransitionRates) -> Strata<Vec<Count>> {
    let records = window.records();
    let cases = window.cases();
    if records.is_empty() {
        return Strata::default();
    }

    let seed = cases
        .at(0)
        .map(|m| truncate(records[0].total_recovered * m));

    let step = |day: usize, prev: &Strata<Count>| {
        let new = records[day].new_recoveries;
        let m = cases.at(day);
        let a = rates.unvax_to_full[day];
        let b = rates.full_to_boost[day];
        let (uv, fv, bv) = (prev.uv as Real, prev.fv as Real, prev.bv as Real);
        Strata::new(
            truncate(uv + new * m.uv - a * uv),
            truncate(fv + new * m.fv + a * uv - b * fv),
            truncate(bv + new * m.bv + b * fv),
        )
    };

    let mut day = 0;
    iter::successors(Some(seed), |prev| {
        day += 1;
        if day < records.len() {
            Some(step(day, prev))
        } else {
            None
        }
    })
    .collect()
}

/// Accumulate deceased strata.
///
/// ```text
/// D_s[0] = trunc(total_deaths[0] * mul_s[0])
/// D_s[i] = D_s[0] + sum_{k=1..i} trunc(daily_deaths[k] * mul_s[k])
/// ```
///
/// Deaths reported on day 0 are already part of the seed and are not added
/// again.
pub fn deceased(window: &AlignedWindow, curve: CurveView) -> Strata<Vec<Count>> {
    let records = window.records();
    if records.is_empty() {
        return Strata::default();
    }

    let seed = curve.at(0).map(|m| truncate(records[0].total_deaths * m));
    let daily = apportion(&window.column(|r| r.daily_deaths), curve);

    seed.zip(daily).map(|(start, increments)| {
        let mut column = Vec::with_capacity(increments.len());
        column.push(start);
        column.extend(cumsum(start, increments.into_iter().skip(1)));
        column
    })
}
