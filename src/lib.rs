pub mod chromosome;
pub mod encoding;
pub mod error;
pub mod evolution;
pub mod fitness;
pub mod mutation;
pub mod operators;
pub mod population;
pub mod problem;
pub mod recombination;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use chromosome::{Chromosome, Chromosomes};
pub use encoding::{Encoding, Field, FieldOptions, Variable, VariableKind};
pub use error::{GeneticError, OptionExt, Result};
pub use evolution::{
    Algorithm, EvolutionLauncher, EvolutionLauncherBuilder, EvolutionOptions, EvolutionResult,
    GenerationStats, LogLevel, SegaAlgorithm, TerminationReason,
};
pub use operators::OperatorSet;
pub use population::{Individual, Population};
pub use problem::{Direction, Evaluation, Evaluator, Problem};
pub use rng::RandomNumberGenerator;
