use super::{Aggregates, Stratified};
use crate::error::PipelineError;
use crate::prelude::{Count, Real, Strata};
use crate::utils::truncate;

/// Susceptible and Exposed split across strata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconciled {
    pub susceptible: Strata<Vec<Count>>,
    pub exposed: Strata<Vec<Count>>,
}

/// Individuals of each stratum not accounted for by the compartments pinned
/// by external counters (Infected, Hospitalized, Recovered and Deceased).
/// Negative values mean the stratum is over-counted.
pub fn missing(stratified: &Stratified, subpopulations: &Strata<Vec<Real>>) -> Strata<Vec<Real>> {
    let Stratified {
        infected,
        hospitalized,
        recovered,
        deceased,
    } = stratified;

    (0..subpopulations.uv.len())
        .map(|day| {
            let known = Strata::from_fn(|s| {
                infected[s][day] + hospitalized[s][day] + recovered[s][day] + deceased[s][day]
            });
            subpopulations.at(day).zip(known).map(|(sub, k)| sub - k as Real)
        })
        .collect()
}

/// Attribute the missing individuals of each stratum to Susceptible and
/// Exposed, proportionally to the stratum share of the total shortfall:
///
/// ```text
/// S_s[i] = trunc(S[i] * missing_s[i] / total_missing[i])
/// E_s[i] = trunc(E[i] * missing_s[i] / total_missing[i])
/// ```
///
/// Fails if the total shortfall is zero on any day.
pub fn reconcile(
    state: &str,
    aggregates: &Aggregates,
    stratified: &Stratified,
    subpopulations: &Strata<Vec<Real>>,
) -> Result<Reconciled, PipelineError> {
    let missing = missing(stratified, subpopulations);
    let n = missing.uv.len();
    let mut susceptible = Vec::with_capacity(n);
    let mut exposed = Vec::with_capacity(n);

    for day in 0..n {
        let m = missing.at(day);
        let total = m.total();
        if total == 0.0 {
            return Err(PipelineError::DegenerateReconciliation {
                state: state.to_string(),
                day,
            });
        }
        let s = aggregates.susceptible[day];
        let e = aggregates.exposed[day] as Real;
        susceptible.push(m.map(|x| truncate(s * x / total)));
        exposed.push(m.map(|x| truncate(e * x / total)));
    }

    return Ok(Reconciled {
        susceptible: susceptible.into_iter().collect(),
        exposed: exposed.into_iter().collect(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(x: Count) -> Strata<Vec<Count>> {
        Strata::new(vec![x], vec![x], vec![x])
    }

    fn stratified() -> Stratified {
        Stratified {
            infected: column(10),
            hospitalized: column(5),
            recovered: column(20),
            deceased: column(5),
        }
    }

    fn aggregates(s: Real, e: Count) -> Aggregates {
        Aggregates {
            exposed: vec![e],
            susceptible: vec![s],
            original_infected: vec![0.],
        }
    }

    #[test]
    fn shortfall_per_stratum() {
        let sub = Strata::new(vec![540.], vec![340.], vec![140.]);
        let m = missing(&stratified(), &sub);
        assert_eq!(m.at(0), Strata::new(500., 300., 100.));
    }

    #[test]
    fn proportional_redistribution() {
        let sub = Strata::new(vec![540.], vec![340.], vec![140.]);
        let rec = reconcile("A", &aggregates(800., 101), &stratified(), &sub).unwrap();
        // shares: 5/9, 3/9, 1/9
        assert_eq!(rec.susceptible.at(0), Strata::new(444, 266, 88));
        assert_eq!(rec.exposed.at(0), Strata::new(56, 33, 11));
    }

    #[test]
    fn negative_shortfall_is_kept() {
        let sub = Strata::new(vec![540.], vec![340.], vec![0.]);
        let rec = reconcile("A", &aggregates(790., 0), &stratified(), &sub).unwrap();
        // missing = 500, 300, -40 => total 760
        assert_eq!(rec.susceptible.at(0), Strata::new(519, 311, -41));
    }

    #[test]
    fn zero_total_shortfall_is_an_error() {
        // missing = 100, -50, -50
        let sub = Strata::new(vec![140.], vec![-10.], vec![-10.]);
        let err = reconcile("A", &aggregates(10., 10), &stratified(), &sub).unwrap_err();
        assert_eq!(
            err,
            PipelineError::DegenerateReconciliation {
                state: "A".into(),
                day: 0
            }
        );
    }
}
