//! Per-generation statistics and the caller hooks that observe a run.

use std::sync::Arc;
use std::time::Duration;

use crate::population::{Individual, Population};

/// Invoked for every captured statistics record with the best individual of
/// the current population.
pub type StatisticsCallback = Arc<dyn Fn(&GenerationStats, Option<&Individual>) + Send + Sync>;

/// Invoked once per generation with the current population. Hooks only get a
/// shared reference and cannot alter the run.
pub type PopulationHook = Arc<dyn Fn(&Population) + Send + Sync>;

/// Aggregate statistics of one generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    /// Evaluations consumed up to and including this generation.
    pub evaluations: usize,
    /// Raw objective of the individual with the highest fitness.
    pub best_objective: Option<f64>,
    pub best_fitness: Option<f64>,
    pub mean_fitness: Option<f64>,
    pub feasible_ratio: f64,
    pub elapsed: Duration,
}

impl GenerationStats {
    pub fn capture(
        generation: usize,
        evaluations: usize,
        population: &Population,
        elapsed: Duration,
    ) -> Self {
        let best = population.best();
        Self {
            generation,
            evaluations,
            best_objective: best
                .as_ref()
                .and_then(|individual| individual.objectives.first().copied()),
            best_fitness: best.and_then(|individual| individual.fitness),
            mean_fitness: population.mean_fitness(),
            feasible_ratio: population.feasible_ratio(),
            elapsed,
        }
    }
}
