use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Add, Index, IndexMut};

pub use crate::config::{Config, DeceasedCurve, PipelineConfig};
pub use crate::data::*;
pub use crate::error::{Error, PipelineError};
pub use crate::export::{export_all, write_series, DirectorySink, ExportSummary, TableSink};
pub use crate::pipeline::{CompartmentSeries, Pipeline, RunReport};

/// Base Real type used by this crate. Uses an alias to easily change precision
/// if necessary.
pub type Real = f64;

/// Integer head counts produced by truncating real-valued estimates. Signed
/// since malformed feeds may drive a compartment below zero.
pub type Count = i64;

/// Zero-based day index inside a window.
pub type Day = usize;

/// Sub-population split by vaccination status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stratum {
    Unvaccinated,
    FullyVaccinated,
    Boosted,
}

impl Stratum {
    pub const ALL: [Stratum; 3] = [
        Stratum::Unvaccinated,
        Stratum::FullyVaccinated,
        Stratum::Boosted,
    ];

    /// Column suffix used in the output tables.
    pub fn suffix(self) -> &'static str {
        match self {
            Stratum::Unvaccinated => "UV",
            Stratum::FullyVaccinated => "FV",
            Stratum::Boosted => "BV",
        }
    }
}

impl fmt::Display for Stratum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// One value per vaccination stratum.
///
/// This is the basic container used throughout the pipeline: a multiplier row
/// is a `Strata<Real>`, a stratified compartment is a `Strata<Vec<Count>>`, and
/// so on.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strata<T> {
    pub uv: T,
    pub fv: T,
    pub bv: T,
}

impl<T> Strata<T> {
    pub fn new(uv: T, fv: T, bv: T) -> Self {
        Strata { uv, fv, bv }
    }

    /// Build strata by evaluating f for each stratum.
    pub fn from_fn(mut f: impl FnMut(Stratum) -> T) -> Self {
        Strata {
            uv: f(Stratum::Unvaccinated),
            fv: f(Stratum::FullyVaccinated),
            bv: f(Stratum::Boosted),
        }
    }

    pub fn as_ref(&self) -> Strata<&T> {
        Strata {
            uv: &self.uv,
            fv: &self.fv,
            bv: &self.bv,
        }
    }

    pub fn map<S>(self, mut f: impl FnMut(T) -> S) -> Strata<S> {
        Strata {
            uv: f(self.uv),
            fv: f(self.fv),
            bv: f(self.bv),
        }
    }

    pub fn zip<S>(self, other: Strata<S>) -> Strata<(T, S)> {
        Strata {
            uv: (self.uv, other.uv),
            fv: (self.fv, other.fv),
            bv: (self.bv, other.bv),
        }
    }

    /// Iterate over values in UV, FV, BV order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        vec![&self.uv, &self.fv, &self.bv].into_iter()
    }

    pub fn total(&self) -> T
    where
        T: Copy + Add<Output = T>,
    {
        self.uv + self.fv + self.bv
    }
}

impl<T: Copy> Strata<Vec<T>> {
    /// Return the values of all strata at the given day.
    pub fn at(&self, day: Day) -> Strata<T> {
        Strata {
            uv: self.uv[day],
            fv: self.fv[day],
            bv: self.bv[day],
        }
    }
}

/// Transpose a sequence of daily strata into one column per stratum.
impl<T> FromIterator<Strata<T>> for Strata<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Strata<T>>>(iter: I) -> Self {
        let mut out = Strata::<Vec<T>>::default();
        for Strata { uv, fv, bv } in iter {
            out.uv.push(uv);
            out.fv.push(fv);
            out.bv.push(bv);
        }
        return out;
    }
}

impl<T> Index<Stratum> for Strata<T> {
    type Output = T;

    fn index(&self, stratum: Stratum) -> &T {
        match stratum {
            Stratum::Unvaccinated => &self.uv,
            Stratum::FullyVaccinated => &self.fv,
            Stratum::Boosted => &self.bv,
        }
    }
}

impl<T> IndexMut<Stratum> for Strata<T> {
    fn index_mut(&mut self, stratum: Stratum) -> &mut T {
        match stratum {
            Stratum::Unvaccinated => &mut self.uv,
            Stratum::FullyVaccinated => &mut self.fv,
            Stratum::Boosted => &mut self.bv,
        }
    }
}
