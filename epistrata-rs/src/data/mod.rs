//! Data contracts consumed by the pipeline: raw per-state series, population
//! lookups and the national vaccination multiplier curves, together with the
//! providers that load them.
mod multipliers;
mod population;
mod provider;
mod records;

pub use multipliers::*;
pub use population::*;
pub use provider::*;
pub use records::*;
