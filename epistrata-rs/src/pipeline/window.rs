use crate::config::PipelineConfig;
use crate::data::{Curve, CurveView, DailyRecord, MultiplierSet, Population};
use crate::error::PipelineError;
use crate::prelude::Real;
use chrono::NaiveDate;
use getset::{CopyGetters, Getters};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// A fixed range of a state's raw series together with the matching rows of
/// the national multiplier curves, all sharing a zero-based day index.
///
/// Curves are aligned by position: day k of the window uses row k of each
/// table, whatever date that row was recorded for.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct AlignedWindow<'a> {
    #[getset(get = "pub")]
    dates: Vec<NaiveDate>,
    #[getset(get_copy = "pub")]
    records: &'a [DailyRecord],
    #[getset(get = "pub")]
    population: Vec<Real>,
    #[getset(get_copy = "pub")]
    cases: CurveView<'a>,
    #[getset(get_copy = "pub")]
    deaths: CurveView<'a>,
    #[getset(get_copy = "pub")]
    hospitalizations: CurveView<'a>,
}

impl<'a> AlignedWindow<'a> {
    /// Number of days in window.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn curve(&self, curve: Curve) -> CurveView<'a> {
        match curve {
            Curve::Cases => self.cases,
            Curve::Deaths => self.deaths,
            Curve::Hospitalizations => self.hospitalizations,
        }
    }

    /// Extract one raw field for all days of the window.
    pub fn column(&self, f: impl Fn(&DailyRecord) -> Real) -> Vec<Real> {
        self.records.iter().map(f).collect()
    }
}

/// Select the configured window from a state's raw series and multipliers.
pub fn align<'a>(
    state: &str,
    records: &'a [DailyRecord],
    population: &Population,
    multipliers: &'a MultiplierSet,
    config: &PipelineConfig,
) -> Result<AlignedWindow<'a>, PipelineError> {
    config.validate()?;
    let (start, end) = (config.window_start(), config.window_end());
    let n = end - start;

    if records.len() < end {
        return Err(PipelineError::InsufficientHistory {
            state: state.to_string(),
            len: records.len(),
            end,
        });
    }

    let head = move |curve: Curve| {
        let table = multipliers.table(curve);
        table
            .head(n)
            .ok_or_else(|| PipelineError::MisalignedMultiplierTable {
                state: state.to_string(),
                curve,
                len: table.len(),
                needed: n,
            })
    };
    let cases = head(Curve::Cases)?;
    let deaths = head(Curve::Deaths)?;
    let hospitalizations = head(Curve::Hospitalizations)?;

    let records = &records[start..end];
    let dates = parse_dates(state, records)?;
    let population = (start..end).map(|i| population.at(i)).collect();

    return Ok(AlignedWindow {
        dates,
        records,
        population,
        cases,
        deaths,
        hospitalizations,
    });
}

/// Parse a calendar date. Timestamps are accepted and truncated to the date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date = value.split(|c: char| c == ' ' || c == 'T').next().unwrap_or(value);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
}

fn parse_dates(state: &str, records: &[DailyRecord]) -> Result<Vec<NaiveDate>, PipelineError> {
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(records.len());
    for (day, rec) in records.iter().enumerate() {
        let date = parse_date(&rec.date).ok_or_else(|| PipelineError::InvalidDate {
            state: state.to_string(),
            day,
            value: rec.date.clone(),
        })?;
        if let Some(&prev) = dates.last() {
            if date <= prev {
                return Err(PipelineError::NonMonotonicDates {
                    state: state.to_string(),
                    day,
                });
            }
        }
        dates.push(date);
    }
    return Ok(dates);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MultiplierTable;
    use crate::prelude::Strata;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records(n: usize) -> Vec<DailyRecord> {
        let start = ymd(2021, 1, 1);
        (0..n)
            .map(|i| DailyRecord {
                daily_cases: i as Real,
                ..DailyRecord::on(&(start + chrono::Duration::days(i as i64)).to_string())
            })
            .collect()
    }

    fn multipliers(n: usize) -> MultiplierSet {
        let tbl = MultiplierTable::constant(Strata::new(0.5, 0.3, 0.2), n);
        MultiplierSet::new(tbl.clone(), tbl.clone(), tbl)
    }

    #[test]
    fn selects_window_and_rebases_index() {
        let recs = records(10);
        let mul = multipliers(5);
        let cfg = PipelineConfig::with_window(3, 7);
        let win = align("A", &recs, &Population::Constant(100.), &mul, &cfg).unwrap();
        assert_eq!(win.len(), 4);
        assert_eq!(win.records()[0].daily_cases, 3.0);
        assert_eq!(win.dates()[0], ymd(2021, 1, 4));
        assert_eq!(win.cases().len(), 4);
        assert_eq!(win.population(), &vec![100.; 4]);
        assert_eq!(win.column(|r| r.daily_cases), vec![3., 4., 5., 6.]);
    }

    #[test]
    fn population_is_looked_up_by_raw_day() {
        let recs = records(4);
        let mul = multipliers(4);
        let cfg = PipelineConfig::with_window(1, 3);
        let pop = Population::Daily(vec![10., 11., 12., 13.]);
        let win = align("A", &recs, &pop, &mul, &cfg).unwrap();
        assert_eq!(win.population(), &vec![11., 12.]);
    }

    #[test]
    fn short_series() {
        let recs = records(5);
        let mul = multipliers(10);
        let cfg = PipelineConfig::with_window(2, 6);
        let err = align("A", &recs, &Population::Constant(1.), &mul, &cfg).unwrap_err();
        assert_eq!(
            err,
            PipelineError::InsufficientHistory {
                state: "A".into(),
                len: 5,
                end: 6
            }
        );
    }

    #[test]
    fn short_multiplier_table() {
        let recs = records(10);
        let mut mul = multipliers(4);
        mul.hospitalizations = MultiplierTable::constant(Strata::new(1., 0., 0.), 2);
        let cfg = PipelineConfig::with_window(0, 4);
        let err = align("A", &recs, &Population::Constant(1.), &mul, &cfg).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MisalignedMultiplierTable {
                state: "A".into(),
                curve: Curve::Hospitalizations,
                len: 2,
                needed: 4
            }
        );
    }

    #[test]
    fn dates() {
        assert_eq!(parse_date("2021-05-01"), Some(ymd(2021, 5, 1)));
        assert_eq!(parse_date("05/01/2021"), Some(ymd(2021, 5, 1)));
        assert_eq!(
            parse_date("2021-05-01 00:00:00"),
            Some(ymd(2021, 5, 1))
        );
        assert_eq!(parse_date("yesterday"), None);

        let mut recs = records(3);
        recs[2].date = recs[1].date.clone();
        let mul = multipliers(3);
        let cfg = PipelineConfig::with_window(0, 3);
        let err = align("A", &recs, &Population::Constant(1.), &mul, &cfg).unwrap_err();
        assert_eq!(
            err,
            PipelineError::NonMonotonicDates {
                state: "A".into(),
                day: 2
            }
        );
    }
}
