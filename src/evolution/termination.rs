//! Termination bookkeeping of the driver.

use std::fmt;
use std::time::{Duration, Instant};

use super::options::EvolutionOptions;

/// Why a run stopped.
///
/// Stagnation is a normal outcome, not an error; [`TerminationReason::is_budget`]
/// tells it apart from the exhausted budgets.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The population has no individuals left to evolve.
    EmptyPopulation,
    EvaluationBudget,
    GenerationLimit,
    TimeLimit,
    PopulationSizeLimit,
    /// The best objective stopped improving.
    Stagnation,
}

impl TerminationReason {
    pub fn is_budget(&self) -> bool {
        matches!(
            self,
            TerminationReason::EvaluationBudget
                | TerminationReason::GenerationLimit
                | TerminationReason::TimeLimit
                | TerminationReason::PopulationSizeLimit
        )
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminationReason::EmptyPopulation => "population is empty",
            TerminationReason::EvaluationBudget => "evaluation budget exhausted",
            TerminationReason::GenerationLimit => "generation limit reached",
            TerminationReason::TimeLimit => "time limit reached",
            TerminationReason::PopulationSizeLimit => "population size limit reached",
            TerminationReason::Stagnation => "evolution stagnated",
        };
        f.write_str(text)
    }
}

/// Counters the driver checks at every generation boundary.
#[derive(Debug, Clone)]
pub struct TerminationState {
    started: Instant,
    generation: usize,
    evaluations: usize,
    population_size: usize,
    best_objective: Option<f64>,
    trapped_count: usize,
}

impl TerminationState {
    pub fn new(started: Instant) -> Self {
        Self {
            started,
            generation: 0,
            evaluations: 0,
            population_size: 0,
            best_objective: None,
            trapped_count: 0,
        }
    }

    /// Records the evaluated initial population as generation 0.
    pub fn start(&mut self, evaluations: usize, population_size: usize, best_objective: Option<f64>) {
        self.generation = 0;
        self.evaluations = evaluations;
        self.population_size = population_size;
        self.best_objective = best_objective;
        self.trapped_count = 0;
    }

    /// Records one finished generation.
    ///
    /// `best_objective` is the direction-normalized objective of the best
    /// individual, so smaller is better. The trapped count resets when it
    /// improved on the previous generation by more than `trapped_value`.
    pub fn advance(
        &mut self,
        evaluations: usize,
        population_size: usize,
        best_objective: Option<f64>,
        trapped_value: f64,
    ) {
        self.generation += 1;
        self.evaluations = evaluations;
        self.population_size = population_size;

        let improved = match (self.best_objective, best_objective) {
            (Some(previous), Some(current)) => previous - current > trapped_value,
            (None, Some(_)) => true,
            _ => false,
        };
        if improved {
            self.trapped_count = 0;
        } else {
            self.trapped_count += 1;
        }
        self.best_objective = best_objective;
    }

    /// The first criterion that holds, checked in priority order.
    pub fn check(&self, options: &EvolutionOptions) -> Option<TerminationReason> {
        if self.population_size == 0 {
            return Some(TerminationReason::EmptyPopulation);
        }
        if options
            .get_max_evaluations()
            .is_some_and(|max| self.evaluations >= max)
        {
            return Some(TerminationReason::EvaluationBudget);
        }
        if options
            .get_max_generations()
            .is_some_and(|max| self.generation >= max)
        {
            return Some(TerminationReason::GenerationLimit);
        }
        if options
            .get_max_time()
            .is_some_and(|max| self.elapsed() >= max)
        {
            return Some(TerminationReason::TimeLimit);
        }
        if options
            .get_max_population_size()
            .is_some_and(|max| self.population_size >= max)
        {
            return Some(TerminationReason::PopulationSizeLimit);
        }
        if options
            .get_max_trapped_count()
            .is_some_and(|max| self.trapped_count >= max)
        {
            return Some(TerminationReason::Stagnation);
        }
        None
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn trapped_count(&self) -> usize {
        self.trapped_count
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
