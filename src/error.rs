use thiserror::Error;

#[derive(Debug, Error)]
pub enum NeatError {
    #[error("invalid topology: input count ({inputs}) and output count ({outputs}) must both be at least one")]
    InvalidTopology { inputs: usize, outputs: usize },

    #[error("invalid number of inputs: {given} given, but {expected} expected")]
    InvalidInput { expected: usize, given: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid number of genomes in population: {produced} produced, but {expected} expected")]
    PopulationSizeMismatch { expected: usize, produced: usize },

    #[error("genome {index} has a non-finite fitness ({fitness})")]
    InvalidFitness { index: usize, fitness: f64 },

    #[error("no genome at index {index}, population holds {len}")]
    NoSuchGenome { index: usize, len: usize },

    #[error("cannot reproduce from a species without genomes")]
    EmptySpecies,

    #[error("corrupt genome: {0}")]
    CorruptGenome(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NeatError>;
