//! Pipeline and batch configuration.
//!
//! Both structs use `#[serde(default)]`, so a configuration file only needs to
//! list the values that differ from the reference setup.
use crate::error::{PipelineError, Result};
use crate::prelude::Real;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

/// First raw-series row of the reference window.
pub const WINDOW_START: usize = 108;

/// One past the last raw-series row of the reference window.
pub const WINDOW_END: usize = 503;

/// Assumed case ascertainment: roughly 0.7% of true infections are confirmed.
pub const EXPOSURE_MULTIPLIER: Real = 100.0 / 0.7;

/// Default tolerance when checking that each multiplier row sums to one.
pub const MULTIPLIER_TOLERANCE: Real = 0.05;

/// Which national curve apportions deaths across strata.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeceasedCurve {
    /// Death-based curve.
    Deaths,
    /// Case-based curve. Reproduces tables produced before the death curve was
    /// wired into the Deceased compartments.
    Cases,
}

impl Default for DeceasedCurve {
    fn default() -> Self {
        DeceasedCurve::Deaths
    }
}

/// Options recognized by the derivation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, CopyGetters)]
#[serde(default)]
#[getset(get_copy = "pub")]
pub struct PipelineConfig {
    window_start: usize,
    window_end: usize,
    exposure_multiplier: Real,
    deceased_curve: DeceasedCurve,
    validate_multipliers: bool,
    multiplier_tolerance: Real,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            window_start: WINDOW_START,
            window_end: WINDOW_END,
            exposure_multiplier: EXPOSURE_MULTIPLIER,
            deceased_curve: DeceasedCurve::default(),
            validate_multipliers: true,
            multiplier_tolerance: MULTIPLIER_TOLERANCE,
        }
    }
}

impl PipelineConfig {
    /// Create config for the window [start, end) and default values for
    /// everything else.
    pub fn with_window(start: usize, end: usize) -> Self {
        PipelineConfig {
            window_start: start,
            window_end: end,
            ..Default::default()
        }
    }

    pub fn set_exposure_multiplier(&mut self, value: Real) -> &mut Self {
        self.exposure_multiplier = value;
        return self;
    }

    pub fn set_deceased_curve(&mut self, value: DeceasedCurve) -> &mut Self {
        self.deceased_curve = value;
        return self;
    }

    pub fn set_validate_multipliers(&mut self, value: bool) -> &mut Self {
        self.validate_multipliers = value;
        return self;
    }

    pub fn set_multiplier_tolerance(&mut self, value: Real) -> &mut Self {
        self.multiplier_tolerance = value;
        return self;
    }

    /// Number of days in the window.
    pub fn window_len(&self) -> usize {
        self.window_end.saturating_sub(self.window_start)
    }

    /// Check that the window is not empty.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.window_end <= self.window_start {
            return Err(PipelineError::InvalidWindow {
                start: self.window_start,
                end: self.window_end,
            });
        }
        return Ok(());
    }
}

/// Locations of input and output tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
#[getset(get = "pub")]
pub struct DataPaths {
    state_data: PathBuf,
    populations: PathBuf,
    cases_multipliers: PathBuf,
    deaths_multipliers: PathBuf,
    hospitalizations_multipliers: PathBuf,
    output: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            state_data: "data/processed_state_data".into(),
            populations: "data/state_populations.csv".into(),
            cases_multipliers: "data/cases_by_vaccination_and_booster.csv".into(),
            deaths_multipliers: "data/deaths_by_vaccination_and_booster.csv".into(),
            hospitalizations_multipliers: "data/hospitalizations_by_vaccination_and_booster.csv"
                .into(),
            output: "data/epidemiological_model_data".into(),
        }
    }
}

/// Batch configuration, usually read from conf.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub paths: DataPaths,
    pub log_level: String,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pipeline: PipelineConfig::default(),
            paths: DataPaths::default(),
            log_level: "info".into(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn from_toml(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        return Self::from_toml(&data);
    }
}
