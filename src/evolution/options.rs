//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct represents the configuration of one run: the
//! population size, the termination budgets, the stagnation thresholds, how
//! often statistics are captured and how much progress is logged.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use sega::evolution::options::{EvolutionOptions, LogLevel};
//!
//! let options = EvolutionOptions::builder()
//!     .population_size(40)
//!     .max_generations(200)
//!     .max_time(Duration::from_secs(5))
//!     .log_level(LogLevel::Minimal)
//!     .build();
//!
//! assert!(options.validate().is_ok());
//! assert_eq!(options.get_population_size(), 40);
//! ```
//!
//! ## Termination criteria
//!
//! Every `max_*` option is optional; a run stops as soon as any configured
//! budget is reached. At least one of them, or `max_trapped_count`, must be
//! set, otherwise the run could never end.
//!
//! ## `LogLevel`
//!
//! - `Verbose`: every captured statistics record is logged at info level.
//! - `Minimal`: only the start and the end of the run are logged at info level.
//! - `None`: everything goes to debug level.

use std::time::Duration;

use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};

pub const DEFAULT_POPULATION_SIZE: usize = 50;
pub const DEFAULT_MAX_GENERATIONS: usize = 100;
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Minimal,
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    population_size: usize,
    max_generations: Option<usize>,
    max_time: Option<Duration>,
    max_evaluations: Option<usize>,
    max_population_size: Option<usize>,
    /// Generations between two statistics records; `0` keeps only the last one.
    logging_interval: usize,
    log_level: LogLevel,
    /// Smallest improvement of the best objective that resets stagnation.
    trapped_value: f64,
    max_trapped_count: Option<usize>,
    /// Minimum number of items to process in parallel
    parallel_threshold: usize,
    /// Prior-knowledge individuals placed in front of the initial population.
    seed_population: Vec<Chromosome>,
}

impl EvolutionOptions {
    /// Checks that a run with these options can start and can end.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if the population size is
    /// zero, the trapped value is negative or not finite, or no termination
    /// criterion is configured.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if !(self.trapped_value.is_finite() && self.trapped_value >= 0.0) {
            return Err(GeneticError::Configuration(format!(
                "Trapped value must be a non-negative number, got {}",
                self.trapped_value
            )));
        }
        if self.max_generations.is_none()
            && self.max_time.is_none()
            && self.max_evaluations.is_none()
            && self.max_population_size.is_none()
            && self.max_trapped_count.is_none()
        {
            return Err(GeneticError::Configuration(
                "At least one termination criterion must be set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_max_generations(&self) -> Option<usize> {
        self.max_generations
    }

    pub fn get_max_time(&self) -> Option<Duration> {
        self.max_time
    }

    pub fn get_max_evaluations(&self) -> Option<usize> {
        self.max_evaluations
    }

    pub fn get_max_population_size(&self) -> Option<usize> {
        self.max_population_size
    }

    pub fn get_logging_interval(&self) -> usize {
        self.logging_interval
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn get_trapped_value(&self) -> f64 {
        self.trapped_value
    }

    pub fn get_max_trapped_count(&self) -> Option<usize> {
        self.max_trapped_count
    }

    /// Returns the minimum number of items to process in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_seed_population(&self) -> &[Chromosome] {
        &self.seed_population
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    ///
    /// Unset values take the defaults of [`EvolutionOptions::default`]. The
    /// generation budget stays in place unless it is removed with
    /// [`EvolutionOptionsBuilder::unbounded_generations`].
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            max_generations: Some(DEFAULT_MAX_GENERATIONS),
            max_time: None,
            max_evaluations: None,
            max_population_size: None,
            logging_interval: 1,
            log_level: LogLevel::None,
            trapped_value: 0.0,
            max_trapped_count: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            seed_population: Vec::new(),
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Provides a fluent interface for constructing `EvolutionOptions` instances.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    population_size: Option<usize>,
    max_generations: Option<Option<usize>>,
    max_time: Option<Duration>,
    max_evaluations: Option<usize>,
    max_population_size: Option<usize>,
    logging_interval: Option<usize>,
    log_level: Option<LogLevel>,
    trapped_value: Option<f64>,
    max_trapped_count: Option<usize>,
    parallel_threshold: Option<usize>,
    seed_population: Vec<Chromosome>,
}

impl EvolutionOptionsBuilder {
    /// Sets the population size.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    /// Sets the number of generations.
    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(Some(value));
        self
    }

    /// Removes the generation budget.
    pub fn unbounded_generations(mut self) -> Self {
        self.max_generations = Some(None);
        self
    }

    pub fn max_time(mut self, value: Duration) -> Self {
        self.max_time = Some(value);
        self
    }

    pub fn max_evaluations(mut self, value: usize) -> Self {
        self.max_evaluations = Some(value);
        self
    }

    pub fn max_population_size(mut self, value: usize) -> Self {
        self.max_population_size = Some(value);
        self
    }

    pub fn logging_interval(mut self, value: usize) -> Self {
        self.logging_interval = Some(value);
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn trapped_value(mut self, value: f64) -> Self {
        self.trapped_value = Some(value);
        self
    }

    pub fn max_trapped_count(mut self, value: usize) -> Self {
        self.max_trapped_count = Some(value);
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn seed_population(mut self, value: Vec<Chromosome>) -> Self {
        self.seed_population = value;
        self
    }

    /// Builds the `EvolutionOptions` instance.
    pub fn build(self) -> EvolutionOptions {
        EvolutionOptions {
            population_size: self.population_size.unwrap_or(DEFAULT_POPULATION_SIZE),
            max_generations: self
                .max_generations
                .unwrap_or(Some(DEFAULT_MAX_GENERATIONS)),
            max_time: self.max_time,
            max_evaluations: self.max_evaluations,
            max_population_size: self.max_population_size,
            logging_interval: self.logging_interval.unwrap_or(1),
            log_level: self.log_level.unwrap_or(LogLevel::None),
            trapped_value: self.trapped_value.unwrap_or(0.0),
            max_trapped_count: self.max_trapped_count,
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
            seed_population: self.seed_population,
        }
    }
}
