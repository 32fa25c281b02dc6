use super::AlignedWindow;
use crate::prelude::{Count, Real};
use crate::utils::truncate;

/// Aggregate compartments computed directly from raw counters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregates {
    /// `trunc(daily_cases * exposure_multiplier)`
    pub exposed: Vec<Count>,
    /// Population minus everyone accounted for in another compartment. Not
    /// clamped: malformed inputs may yield negative values.
    pub susceptible: Vec<Real>,
    /// Active cases minus hospitalized patients, which are tracked in their
    /// own compartment.
    pub original_infected: Vec<Real>,
}

/// Derive Exposed, Susceptible and the un-stratified Infected series.
pub fn aggregates(window: &AlignedWindow, exposure_multiplier: Real) -> Aggregates {
    let n = window.len();
    let mut out = Aggregates {
        exposed: Vec::with_capacity(n),
        susceptible: Vec::with_capacity(n),
        original_infected: Vec::with_capacity(n),
    };

    for (r, &pop) in window.records().iter().zip(window.population()) {
        let exposed = truncate(r.daily_cases * exposure_multiplier);
        out.exposed.push(exposed);
        out.susceptible.push(
            pop - exposed as Real - r.active_cases - r.total_recovered - r.total_deaths,
        );
        out.original_infected.push(r.active_cases - r.inpatient_beds);
    }
    return out;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PipelineConfig, EXPOSURE_MULTIPLIER};
    use crate::data::{DailyRecord, MultiplierSet, MultiplierTable, Population};
    use crate::pipeline::align;
    use crate::prelude::Strata;

    #[test]
    fn exposed_is_truncated_not_rounded() {
        let recs: Vec<DailyRecord> = [10., 20., 30.]
            .iter()
            .enumerate()
            .map(|(i, &cases)| DailyRecord {
                daily_cases: cases,
                active_cases: 50.,
                total_recovered: 7.,
                total_deaths: 2.5,
                inpatient_beds: 5.,
                ..DailyRecord::on(&format!("2021-01-0{}", i + 1))
            })
            .collect();
        let tbl = MultiplierTable::constant(Strata::new(0.5, 0.3, 0.2), 3);
        let mul = MultiplierSet::new(tbl.clone(), tbl.clone(), tbl);
        let cfg = PipelineConfig::with_window(0, 3);
        let win = align("A", &recs, &Population::Constant(1000.), &mul, &cfg).unwrap();

        let agg = aggregates(&win, EXPOSURE_MULTIPLIER);
        // 1428.57, 2857.14, 4285.71
        assert_eq!(agg.exposed, vec![1428, 2857, 4285]);
        assert_eq!(agg.susceptible[0], 1000. - 1428. - 50. - 7. - 2.5);
        assert!(agg.susceptible[2] < 0.0);
        assert_eq!(agg.original_infected, vec![45.; 3]);
    }
}
