use crate::error::{PipelineError, Result};
use crate::prelude::{Day, Real, Strata, Stratum};
use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::{fmt, io, path::Path};

/// Aggregate quantity apportioned by a multiplier curve.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    Cases,
    Deaths,
    Hospitalizations,
}

impl Curve {
    pub const ALL: [Curve; 3] = [Curve::Cases, Curve::Deaths, Curve::Hospitalizations];
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Curve::Cases => "cases",
            Curve::Deaths => "deaths",
            Curve::Hospitalizations => "hospitalizations",
        };
        f.write_str(name)
    }
}

/// A row of a multiplier table as stored on disk. Extra columns (e.g., a date)
/// are ignored.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierRow {
    pub uv_mul: Real,
    pub fv_mul: Real,
    pub b_mul: Real,
}

impl From<MultiplierRow> for Strata<Real> {
    fn from(row: MultiplierRow) -> Self {
        Strata::new(row.uv_mul, row.fv_mul, row.b_mul)
    }
}

/// A national daily curve with one column per stratum (uv, fv, b).
///
/// Rows are aligned by offset from the first row, not by calendar date: row k
/// is applied to day k of every state's window.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplierTable {
    data: Array2<Real>,
}

impl MultiplierTable {
    pub fn from_rows(rows: &[Strata<Real>]) -> Self {
        let data = Array2::from_shape_fn((rows.len(), 3), |(i, j)| match j {
            0 => rows[i].uv,
            1 => rows[i].fv,
            _ => rows[i].bv,
        });
        MultiplierTable { data }
    }

    /// Same weights repeated for n days.
    pub fn constant(weights: Strata<Real>, n: usize) -> Self {
        Self::from_rows(&vec![weights; n])
    }

    pub fn from_reader(reader: impl io::Read) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut rows = vec![];
        for res in reader.deserialize() {
            let row: MultiplierRow = res?;
            rows.push(row.into());
        }
        return Ok(Self::from_rows(&rows));
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        return Self::from_reader(io::BufReader::new(file));
    }

    /// Number of days in table.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weights at the given row.
    pub fn get(&self, day: Day) -> Option<Strata<Real>> {
        if day >= self.len() {
            return None;
        }
        let row = self.data.row(day);
        Some(Strata::new(row[0], row[1], row[2]))
    }

    /// A view over the first n rows, or None if the table is shorter.
    pub fn head(&self, n: usize) -> Option<CurveView<'_>> {
        if n > self.len() {
            return None;
        }
        Some(CurveView(self.data.slice(s![..n, ..])))
    }

    /// Check that every row has finite non-negative weights summing to 1
    /// within the given tolerance.
    pub fn validate(&self, curve: Curve, tol: Real) -> Result<(), PipelineError> {
        for (day, row) in self.data.outer_iter().enumerate() {
            let sum = row.sum();
            let reason = if row.iter().any(|x| !x.is_finite()) {
                Some("non-finite weight")
            } else if row.iter().any(|&x| x < 0.0) {
                Some("negative weight")
            } else if (sum - 1.0).abs() > tol {
                Some("weights do not sum to one")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(PipelineError::InvalidMultiplier {
                    curve,
                    day,
                    sum,
                    reason,
                });
            }
        }
        return Ok(());
    }
}

/// Borrowed window over a multiplier table.
#[derive(Debug, Clone, Copy)]
pub struct CurveView<'a>(ArrayView2<'a, Real>);

impl<'a> CurveView<'a> {
    pub fn len(&self) -> usize {
        self.0.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weights at the given window day. Panics if day is out of the window.
    pub fn at(&self, day: Day) -> Strata<Real> {
        Strata::new(self.0[(day, 0)], self.0[(day, 1)], self.0[(day, 2)])
    }

    /// Column of weights for a single stratum.
    pub fn column(&self, stratum: Stratum) -> impl Iterator<Item = Real> {
        self.0.column(stratum as usize).to_vec().into_iter()
    }
}

/// The three national curves.
///
/// Precondition: for each curve and day the three weights are non-negative and
/// sum to ~1. They are interpreted as the share of the aggregate quantity
/// attributable to each stratum. Use `validate()` before trusting data from
/// outside sources.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplierSet {
    pub cases: MultiplierTable,
    pub deaths: MultiplierTable,
    pub hospitalizations: MultiplierTable,
}

impl MultiplierSet {
    pub fn new(
        cases: MultiplierTable,
        deaths: MultiplierTable,
        hospitalizations: MultiplierTable,
    ) -> Self {
        MultiplierSet {
            cases,
            deaths,
            hospitalizations,
        }
    }

    pub fn table(&self, curve: Curve) -> &MultiplierTable {
        match curve {
            Curve::Cases => &self.cases,
            Curve::Deaths => &self.deaths,
            Curve::Hospitalizations => &self.hospitalizations,
        }
    }

    pub fn validate(&self, tol: Real) -> Result<(), PipelineError> {
        for &curve in Curve::ALL.iter() {
            self.table(curve).validate(curve, tol)?;
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MultiplierTable {
        MultiplierTable::from_rows(&[
            Strata::new(0.5, 0.3, 0.2),
            Strata::new(0.6, 0.3, 0.1),
            Strata::new(0.7, 0.2, 0.1),
        ])
    }

    #[test]
    fn read_csv() {
        let data = "date,uv_mul,fv_mul,b_mul\n2021-01-01,0.5,0.3,0.2\n2021-01-02,0.6,0.3,0.1\n";
        let tbl = MultiplierTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(tbl.len(), 2);
        assert_eq!(tbl.get(1), Some(Strata::new(0.6, 0.3, 0.1)));
        assert_eq!(tbl.get(2), None);
    }

    #[test]
    fn head_view() {
        let tbl = table();
        let view = tbl.head(2).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view.at(1), Strata::new(0.6, 0.3, 0.1));
        let uv: Vec<Real> = view.column(Stratum::Unvaccinated).collect();
        assert_eq!(uv, vec![0.5, 0.6]);
        assert!(tbl.head(4).is_none());
    }

    #[test]
    fn validation() {
        assert!(table().validate(Curve::Cases, 1e-9).is_ok());

        let bad = MultiplierTable::from_rows(&[
            Strata::new(0.5, 0.3, 0.2),
            Strata::new(0.5, 0.5, 0.5),
        ]);
        match bad.validate(Curve::Deaths, 0.05) {
            Err(PipelineError::InvalidMultiplier { curve, day, .. }) => {
                assert_eq!(curve, Curve::Deaths);
                assert_eq!(day, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let negative = MultiplierTable::from_rows(&[Strata::new(1.2, -0.2, 0.0)]);
        match negative.validate(Curve::Cases, 0.05) {
            Err(PipelineError::InvalidMultiplier { reason, .. }) => {
                assert_eq!(reason, "negative weight")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
