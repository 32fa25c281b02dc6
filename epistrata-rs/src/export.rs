//! Writes one table per state with a fixed column order.
//!
//! Downstream models read those tables by column position, so `COLUMNS` must
//! not be reordered.
use crate::error::{Error, Result};
use crate::pipeline::{Compartment, CompartmentSeries, RunReport, StateFailure};
use crate::prelude::{Day, Stratum};
use log::*;
use std::{fs, io, path::PathBuf};

pub const COLUMNS: [&str; 38] = [
    "date",
    "unvaccinated_individuals",
    "fully_vaccinated_individuals",
    "boosted_individuals",
    "unvaccinated_compartment_total",
    "fully_vaccinated_compartment_total",
    "booster_vaccinated_compartment_total",
    "percentage_unvaccinated_to_fully_vaccinated",
    "percentage_fully_vaccinated_to_boosted",
    "Daily Cases",
    "Susceptible",
    "Exposed",
    "Infected",
    "Hospitalized",
    "Recovered",
    "Deceased",
    "Original Infected",
    "inpatient_beds_used_covid",
    "Total Recovered",
    "Total Deaths (Linear)",
    "Susceptible_UV",
    "Susceptible_FV",
    "Susceptible_BV",
    "Exposed_UV",
    "Exposed_FV",
    "Exposed_BV",
    "Infected_UV",
    "Infected_FV",
    "Infected_BV",
    "Hospitalized_UV",
    "Hospitalized_FV",
    "Hospitalized_BV",
    "Recovered_UV",
    "Recovered_FV",
    "Recovered_BV",
    "Deceased_UV",
    "Deceased_FV",
    "Deceased_BV",
];

/// Render a single day of a series, in COLUMNS order.
pub fn record(series: &CompartmentSeries, day: Day) -> Vec<String> {
    let mut row = Vec::with_capacity(COLUMNS.len());
    let sub = series.subpopulations().at(day);
    let totals = series.stratum_totals(day);
    let raw = series.raw();

    row.push(series.dates()[day].format("%Y-%m-%d").to_string());
    row.extend(sub.iter().map(|x| x.to_string()));
    row.extend(totals.iter().map(|x| x.to_string()));
    row.push(series.rates().unvax_to_full[day].to_string());
    row.push(series.rates().full_to_boost[day].to_string());
    row.push(raw.daily_cases[day].to_string());
    for &c in Compartment::ALL.iter() {
        row.push(series.aggregate(c, day).to_string());
    }
    row.push(series.aggregates().original_infected[day].to_string());
    row.push(raw.inpatient_beds[day].to_string());
    row.push(raw.total_recovered[day].to_string());
    row.push(raw.total_deaths[day].to_string());
    for &c in Compartment::ALL.iter() {
        let strata = series.compartment(c);
        for &s in Stratum::ALL.iter() {
            row.push(strata[s][day].to_string());
        }
    }
    return row;
}

/// Write series as CSV with a header row.
pub fn write_series<W: io::Write>(series: &CompartmentSeries, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&COLUMNS)?;
    for day in 0..series.len() {
        writer.write_record(&record(series, day))?;
    }
    writer.flush()?;
    return Ok(());
}

/// Destination of per-state output tables.
pub trait TableSink {
    type Writer: io::Write;

    /// Open the output unit of a state, replacing any previous content.
    fn open(&self, state: &str) -> io::Result<Self::Writer>;
}

/// Writes `<dir>/<state>.csv` files.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create sink, creating the directory if necessary.
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        return Ok(DirectorySink { dir });
    }

    pub fn path_for(&self, state: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", state))
    }
}

impl TableSink for DirectorySink {
    type Writer = io::BufWriter<fs::File>;

    fn open(&self, state: &str) -> io::Result<Self::Writer> {
        let file = fs::File::create(self.path_for(state))?;
        Ok(io::BufWriter::new(file))
    }
}

/// States written by `export_all()` and every state that failed along the
/// way, either in the pipeline or when writing its table.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub written: Vec<String>,
    pub failures: Vec<StateFailure>,
}

impl ExportSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human readable list of failures, one per line.
    pub fn failure_report(&self) -> String {
        let mut out = String::new();
        for f in self.failures.iter() {
            out.push_str(&format!("{}: {}\n", f.state, f.error));
        }
        return out;
    }
}

/// Write every successful series of report to sink. Sink errors are not
/// retried; they are recorded as failures of the corresponding state.
pub fn export_all(report: RunReport, sink: &impl TableSink) -> ExportSummary {
    let mut summary = ExportSummary {
        written: vec![],
        failures: report.failures,
    };

    for series in report.series.iter() {
        let state = series.state();
        let res = sink
            .open(state)
            .map_err(Error::from)
            .and_then(|w| write_series(series, w));
        match res {
            Ok(()) => {
                info!("{}: wrote {} rows", state, series.len());
                summary.written.push(state.clone());
            }
            Err(error) => {
                warn!("{}: could not write table: {}", state, error);
                summary.failures.push(StateFailure {
                    state: state.clone(),
                    error,
                });
            }
        }
    }
    return summary;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::data::{DailyRecord, InMemoryStates, MultiplierSet, MultiplierTable, Population};
    use crate::pipeline::Pipeline;
    use crate::prelude::{Real, Strata};

    fn records(n: usize) -> Vec<DailyRecord> {
        (0..n)
            .map(|i| {
                let day = i as Real;
                DailyRecord {
                    first_doses: 400. + 10. * day,
                    fully_vaccinated: 300. + 5. * day,
                    boosters: 100. + 5. * day,
                    daily_cases: 2. + day,
                    active_cases: 20.,
                    total_recovered: 40. + 4. * day,
                    new_recoveries: if i == 0 { 0. } else { 4. },
                    total_deaths: 8.,
                    inpatient_beds: 4.,
                    ..DailyRecord::on(&format!("2021-06-{:02}", i + 1))
                }
            })
            .collect()
    }

    fn pipeline(n: usize) -> Pipeline {
        let tbl = MultiplierTable::constant(Strata::new(0.5, 0.25, 0.25), n);
        let mul = MultiplierSet::new(tbl.clone(), tbl.clone(), tbl);
        Pipeline::new(PipelineConfig::with_window(0, n), mul).unwrap()
    }

    #[test]
    fn header_and_rows() {
        let series = pipeline(3)
            .run_state("A", &records(3), &Population::Constant(10_000.))
            .unwrap();
        let mut buf = vec![];
        write_series(&series, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], COLUMNS.join(","));
        let first: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(first.len(), COLUMNS.len());
        assert_eq!(first[0], "2021-06-01");
        assert_eq!(&first[1..4], &["9600", "300", "100"]);
        assert_eq!(first[7], "0");
        assert_eq!(first[9], "2");
        // Exposed = trunc(2 * 142.857)
        assert_eq!(first[11], "285");
        // Original Infected = 20 - 4
        assert_eq!(first[16], "16");
        // Infected_UV, Infected_FV, Infected_BV
        assert_eq!(&first[26..29], &["8", "4", "4"]);
        // Recovered seed
        assert_eq!(&first[32..35], &["20", "10", "10"]);
    }

    #[test]
    fn byte_identical_reruns() {
        let render = || {
            let series = pipeline(5)
                .run_state("A", &records(5), &Population::Constant(10_000.))
                .unwrap();
            let mut buf = vec![];
            write_series(&series, &mut buf).unwrap();
            buf
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn directory_export_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::create(dir.path().join("out")).unwrap();

        let mut states = InMemoryStates::new();
        states.insert("Alpha", records(4), 10_000.);
        states.insert("Beta", records(2), 10_000.);
        let report = pipeline(4).run_all(&states);
        let summary = export_all(report, &sink);

        assert_eq!(summary.written, vec!["Alpha"]);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].state, "Beta");
        assert!(summary.failure_report().starts_with("Beta: "));

        let text = fs::read_to_string(sink.path_for("Alpha")).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(!sink.path_for("Beta").exists());
    }

    struct BrokenSink;

    impl TableSink for BrokenSink {
        type Writer = io::Sink;

        fn open(&self, _state: &str) -> io::Result<io::Sink> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn sink_errors_are_surfaced() {
        let mut states = InMemoryStates::new();
        states.insert("Alpha", records(2), 10_000.);
        let summary = export_all(pipeline(2).run_all(&states), &BrokenSink);
        assert!(summary.written.is_empty());
        assert!(matches!(summary.failures[0].error, Error::Io(_)));
    }
}
