use super::{DailyRecord, MultiplierSet, MultiplierTable, Population};
use crate::error::{Error, Result};
use crate::prelude::Real;
use log::*;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

/// Source of raw per-state series.
///
/// Implementations must be shareable across worker threads since states are
/// processed in parallel.
pub trait RawSeriesProvider: Sync {
    /// Identifiers of all known states.
    fn states(&self) -> Vec<String>;

    /// Daily records of a state, ordered by date.
    fn records(&self, state: &str) -> Result<Vec<DailyRecord>>;

    /// Population of a state.
    fn population(&self, state: &str) -> Result<Population>;
}

/// Source of the national vaccination multiplier curves.
///
/// Curves are expected to satisfy the precondition documented in
/// `MultiplierSet`. The pipeline validates them before use unless it is
/// configured otherwise.
pub trait MultiplierProvider {
    fn multipliers(&self) -> Result<MultiplierSet>;
}

impl MultiplierProvider for MultiplierSet {
    fn multipliers(&self) -> Result<MultiplierSet> {
        Ok(self.clone())
    }
}

/// Multiplier curves stored in three CSV files with uv_mul, fv_mul and b_mul
/// columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvMultiplierFiles {
    pub cases: PathBuf,
    pub deaths: PathBuf,
    pub hospitalizations: PathBuf,
}

impl MultiplierProvider for CsvMultiplierFiles {
    fn multipliers(&self) -> Result<MultiplierSet> {
        debug!("reading multiplier tables from {:?}", self.cases.parent());
        Ok(MultiplierSet::new(
            MultiplierTable::from_path(&self.cases)?,
            MultiplierTable::from_path(&self.deaths)?,
            MultiplierTable::from_path(&self.hospitalizations)?,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct PopulationRow {
    state: String,
    population: Real,
}

/// A directory of `<state>.csv` files together with a `state,population`
/// table. The population table defines which states exist.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvStateDirectory {
    dir: PathBuf,
    populations: BTreeMap<String, Real>,
}

impl CsvStateDirectory {
    pub fn new(dir: impl Into<PathBuf>, populations: BTreeMap<String, Real>) -> Self {
        CsvStateDirectory {
            dir: dir.into(),
            populations,
        }
    }

    /// Open directory and read populations from the given CSV file.
    pub fn open(dir: impl Into<PathBuf>, populations: impl AsRef<Path>) -> Result<Self> {
        let file = fs::File::open(populations)?;
        let populations = read_populations(io::BufReader::new(file))?;
        return Ok(Self::new(dir, populations));
    }

    fn path_for(&self, state: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", state))
    }
}

/// Read a `state,population` table.
pub fn read_populations(reader: impl io::Read) -> Result<BTreeMap<String, Real>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut out = BTreeMap::new();
    for res in reader.deserialize() {
        let row: PopulationRow = res?;
        out.insert(row.state, row.population);
    }
    return Ok(out);
}

/// Read daily records from CSV data with a header row.
pub fn read_records(reader: impl io::Read) -> Result<Vec<DailyRecord>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut out = vec![];
    for res in reader.deserialize() {
        out.push(res?);
    }
    return Ok(out);
}

impl RawSeriesProvider for CsvStateDirectory {
    fn states(&self) -> Vec<String> {
        self.populations.keys().cloned().collect()
    }

    fn records(&self, state: &str) -> Result<Vec<DailyRecord>> {
        if !self.populations.contains_key(state) {
            return Err(Error::UnknownState(state.to_string()));
        }
        let file = fs::File::open(self.path_for(state))?;
        return read_records(io::BufReader::new(file));
    }

    fn population(&self, state: &str) -> Result<Population> {
        self.populations
            .get(state)
            .map(|&p| Population::Constant(p))
            .ok_or_else(|| Error::UnknownState(state.to_string()))
    }
}

/// States held in memory. Useful for tests and for embedding the pipeline
/// in programs that already loaded their data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InMemoryStates {
    data: BTreeMap<String, (Vec<DailyRecord>, Population)>,
}

impl InMemoryStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        state: &str,
        records: Vec<DailyRecord>,
        population: impl Into<Population>,
    ) -> &mut Self {
        self.data
            .insert(state.to_string(), (records, population.into()));
        return self;
    }

    fn get(&self, state: &str) -> Result<&(Vec<DailyRecord>, Population)> {
        self.data
            .get(state)
            .ok_or_else(|| Error::UnknownState(state.to_string()))
    }
}

impl RawSeriesProvider for InMemoryStates {
    fn states(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    fn records(&self, state: &str) -> Result<Vec<DailyRecord>> {
        Ok(self.get(state)?.0.clone())
    }

    fn population(&self, state: &str) -> Result<Population> {
        Ok(self.get(state)?.1.clone())
    }
}
