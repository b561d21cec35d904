pub mod error;
pub mod gene;
pub mod genome;
pub mod innovation;
pub mod mutator;
pub mod neuron;
pub mod packed;
pub mod params;
pub mod population;
pub mod speciation;
pub mod species;

pub use error::{NeatError, Result};
pub use genome::Genome;
pub use params::Config;
pub use population::Population;
