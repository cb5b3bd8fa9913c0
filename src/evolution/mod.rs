pub mod algorithm;
pub mod builder;
pub mod launcher;
pub mod options;
pub mod sega;
pub mod statistics;
pub mod termination;

pub use algorithm::Algorithm;
pub use builder::EvolutionLauncherBuilder;
pub use launcher::{EvolutionLauncher, EvolutionResult};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, LogLevel};
pub use sega::SegaAlgorithm;
pub use statistics::{GenerationStats, PopulationHook, StatisticsCallback};
pub use termination::{TerminationReason, TerminationState};
