//! Derives vaccination-stratified compartment series (Susceptible, Exposed,
//! Infected, Hospitalized, Recovered, Deceased) for each state from raw
//! public-health feeds. The output tables are the input of downstream
//! SEIR-family models.
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod prelude;
pub mod utils;

pub use crate::prelude::{Count, Day, Real, Strata, Stratum};
