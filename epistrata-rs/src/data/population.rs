use crate::prelude::Real;
use serde::{Deserialize, Serialize};

/// Population of a state as a function of time.
///
/// Current feeds only provide a single figure per state, but the lookup is
/// indexed by raw-series day so a drifting population can be plugged in
/// without touching the pipeline.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Population {
    Constant(Real),
    /// Daily values indexed by raw-series row. The last value is held after
    /// the end of the vector.
    Daily(Vec<Real>),
}

impl Default for Population {
    fn default() -> Self {
        Population::Constant(0.)
    }
}

impl From<Real> for Population {
    fn from(value: Real) -> Self {
        Population::Constant(value)
    }
}

impl Population {
    /// Population at the given raw-series day.
    pub fn at(&self, day: usize) -> Real {
        match self {
            &Population::Constant(v) => v,
            Population::Daily(data) => match data.get(day) {
                Some(&v) => v,
                None => data.last().cloned().unwrap_or(0.),
            },
        }
    }
}
