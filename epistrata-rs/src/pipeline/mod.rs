//! The per-state derivation pipeline.
//!
//! Stages run strictly in order for each state: window alignment, transition
//! rates, aggregate compartments, stratification and reconciliation. States
//! are independent of one another and are processed in parallel by
//! `Pipeline::run_all()`.
mod compartments;
mod rates;
mod reconcile;
mod series;
mod stratify;
mod window;

pub use compartments::*;
pub use rates::*;
pub use reconcile::*;
pub use series::*;
pub use stratify::*;
pub use window::*;

use crate::config::{DeceasedCurve, PipelineConfig};
use crate::data::{Curve, DailyRecord, MultiplierSet, Population, RawSeriesProvider};
use crate::error::{Error, PipelineError};
use getset::Getters;
use log::*;
use rayon::prelude::*;

/// Pipeline bound to a configuration and a set of national multiplier curves.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct Pipeline {
    config: PipelineConfig,
    multipliers: MultiplierSet,
}

impl Pipeline {
    /// Create new pipeline. The window is checked, and so are the multiplier
    /// curves unless validation is disabled in config.
    pub fn new(config: PipelineConfig, multipliers: MultiplierSet) -> Result<Self, PipelineError> {
        config.validate()?;
        if config.validate_multipliers() {
            multipliers.validate(config.multiplier_tolerance())?;
        }
        Ok(Pipeline {
            config,
            multipliers,
        })
    }

    /// Run all stages for a single state.
    pub fn run_state(
        &self,
        state: &str,
        records: &[DailyRecord],
        population: &Population,
    ) -> Result<CompartmentSeries, PipelineError> {
        let window = align(state, records, population, &self.multipliers, &self.config)?;
        debug!("{}: aligned {} days", state, window.len());

        let subpopulations = subpopulations(&window);
        let rates = transition_rates(state, &subpopulations)?;

        let aggregates = aggregates(&window, self.config.exposure_multiplier());

        let death_curve = match self.config.deceased_curve() {
            DeceasedCurve::Deaths => Curve::Deaths,
            DeceasedCurve::Cases => Curve::Cases,
        };
        let stratified = Stratified {
            infected: infected(&aggregates.original_infected, &window),
            hospitalized: hospitalized(&window),
            recovered: recovered(&window, &rates),
            deceased: deceased(&window, window.curve(death_curve)),
        };
        debug!("{}: stratified compartments", state);

        let reconciled = reconcile(state, &aggregates, &stratified, &subpopulations)?;

        let raw = PassThrough {
            daily_cases: window.column(|r| r.daily_cases),
            inpatient_beds: window.column(|r| r.inpatient_beds),
            total_recovered: window.column(|r| r.total_recovered),
            total_deaths: window.column(|r| r.total_deaths),
        };

        return Ok(CompartmentSeries::new(
            state,
            window.dates().clone(),
            subpopulations,
            rates,
            raw,
            aggregates,
            stratified,
            reconciled,
        ));
    }

    /// Fetch a state from provider and run the pipeline on it.
    pub fn process<P>(&self, provider: &P, state: &str) -> Result<CompartmentSeries, Error>
    where
        P: RawSeriesProvider + ?Sized,
    {
        let records = provider.records(state)?;
        let population = provider.population(state)?;
        let series = self.run_state(state, &records, &population)?;
        info!("{}: derived {} days", state, series.len());
        return Ok(series);
    }

    /// Run pipeline for every state of provider in parallel.
    ///
    /// A failing state does not abort the others: its error is collected in
    /// the report.
    pub fn run_all<P>(&self, provider: &P) -> RunReport
    where
        P: RawSeriesProvider + ?Sized,
    {
        let mut states = provider.states();
        states.sort();
        let results: Vec<_> = states
            .par_iter()
            .map(|state| (state, self.process(provider, state)))
            .collect();

        let mut report = RunReport::default();
        for (state, res) in results {
            match res {
                Ok(series) => report.series.push(series),
                Err(error) => {
                    warn!("{}: {}", state, error);
                    report.failures.push(StateFailure {
                        state: state.clone(),
                        error,
                    });
                }
            }
        }
        return report;
    }
}

/// A state that could not be processed or exported, and why.
#[derive(Debug)]
pub struct StateFailure {
    pub state: String,
    pub error: Error,
}

/// Outcome of a batch run, sorted by state.
#[derive(Debug, Default)]
pub struct RunReport {
    pub series: Vec<CompartmentSeries>,
    pub failures: Vec<StateFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
