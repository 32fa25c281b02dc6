use super::{Aggregates, Reconciled, Stratified, TransitionRates};
use crate::prelude::{Count, Day, Real, Strata};
use chrono::NaiveDate;
use getset::Getters;
use std::fmt;

/// Compartments of the stratified SEIR-family model.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Compartment {
    Susceptible,
    Exposed,
    Infected,
    Hospitalized,
    Recovered,
    Deceased,
}

impl Compartment {
    pub const ALL: [Compartment; 6] = [
        Compartment::Susceptible,
        Compartment::Exposed,
        Compartment::Infected,
        Compartment::Hospitalized,
        Compartment::Recovered,
        Compartment::Deceased,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Compartment::Susceptible => "Susceptible",
            Compartment::Exposed => "Exposed",
            Compartment::Infected => "Infected",
            Compartment::Hospitalized => "Hospitalized",
            Compartment::Recovered => "Recovered",
            Compartment::Deceased => "Deceased",
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw counters copied from the window into the output tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PassThrough {
    pub daily_cases: Vec<Real>,
    pub inpatient_beds: Vec<Real>,
    pub total_recovered: Vec<Real>,
    pub total_deaths: Vec<Real>,
}

/// The derived, immutable time series of a single state.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct CompartmentSeries {
    state: String,
    dates: Vec<NaiveDate>,
    subpopulations: Strata<Vec<Real>>,
    rates: TransitionRates,
    raw: PassThrough,
    aggregates: Aggregates,
    stratified: Stratified,
    reconciled: Reconciled,
}

impl CompartmentSeries {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        state: &str,
        dates: Vec<NaiveDate>,
        subpopulations: Strata<Vec<Real>>,
        rates: TransitionRates,
        raw: PassThrough,
        aggregates: Aggregates,
        stratified: Stratified,
        reconciled: Reconciled,
    ) -> Self {
        CompartmentSeries {
            state: state.to_string(),
            dates,
            subpopulations,
            rates,
            raw,
            aggregates,
            stratified,
            reconciled,
        }
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Stratified columns of a compartment.
    pub fn compartment(&self, c: Compartment) -> &Strata<Vec<Count>> {
        match c {
            Compartment::Susceptible => &self.reconciled.susceptible,
            Compartment::Exposed => &self.reconciled.exposed,
            Compartment::Infected => &self.stratified.infected,
            Compartment::Hospitalized => &self.stratified.hospitalized,
            Compartment::Recovered => &self.stratified.recovered,
            Compartment::Deceased => &self.stratified.deceased,
        }
    }

    /// Aggregate value of a compartment at the given day.
    ///
    /// Susceptible and Exposed are the values derived from raw counters. The
    /// other compartments are the sum of their strata.
    pub fn aggregate(&self, c: Compartment, day: Day) -> Real {
        match c {
            Compartment::Susceptible => self.aggregates.susceptible[day],
            Compartment::Exposed => self.aggregates.exposed[day] as Real,
            _ => self.compartment(c).at(day).total() as Real,
        }
    }

    /// Sum of all compartments of each stratum at the given day.
    pub fn stratum_totals(&self, day: Day) -> Strata<Count> {
        let mut out = Strata::default();
        for &c in Compartment::ALL.iter() {
            let v = self.compartment(c).at(day);
            out = out.zip(v).map(|(a, b)| a + b);
        }
        return out;
    }
}
