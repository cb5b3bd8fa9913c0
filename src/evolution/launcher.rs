use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use super::algorithm::Algorithm;
use super::options::{EvolutionOptions, LogLevel};
use super::statistics::{GenerationStats, PopulationHook, StatisticsCallback};
use super::termination::{TerminationReason, TerminationState};
use crate::error::Result;
use crate::population::{Individual, Population};
use crate::problem::{Direction, Evaluator, Problem};
use crate::rng::RandomNumberGenerator;

/// The outcome of a finished run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// The best feasible individual seen in any generation, `None` if no
    /// feasible individual ever appeared.
    pub best: Option<Individual>,
    /// The last generation.
    pub population: Population,
    /// Evolve-loop iterations executed.
    pub generations: usize,
    pub evaluations: usize,
    pub elapsed: Duration,
    pub termination: TerminationReason,
    /// One record per captured generation, in order.
    pub history: Vec<GenerationStats>,
}

/// Drives an [`Algorithm`] on a [`Problem`] until a termination criterion holds.
///
/// The launcher owns everything around the generations: the budgets, the
/// stagnation counter, statistics capture, caller hooks and the search for the
/// best feasible individual across the whole run.
pub struct EvolutionLauncher<P, A>
where
    P: Problem,
    A: Algorithm,
{
    problem: P,
    algorithm: A,
    options: EvolutionOptions,
    statistics_callback: Option<StatisticsCallback>,
    population_hook: Option<PopulationHook>,
}

impl<P, A> EvolutionLauncher<P, A>
where
    P: Problem,
    A: Algorithm,
{
    /// Creates a new `EvolutionLauncher`.
    ///
    /// The options are expected to be valid; [`EvolutionLauncherBuilder`](super::EvolutionLauncherBuilder)
    /// checks them before calling this.
    pub fn new(problem: P, algorithm: A, options: EvolutionOptions) -> Self {
        Self {
            problem,
            algorithm,
            options,
            statistics_callback: None,
            population_hook: None,
        }
    }

    pub fn with_statistics_callback(mut self, callback: StatisticsCallback) -> Self {
        self.statistics_callback = Some(callback);
        self
    }

    pub fn with_population_hook(mut self, hook: PopulationHook) -> Self {
        self.population_hook = Some(hook);
        self
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// Runs the algorithm from a fresh initial population.
    ///
    /// Termination is checked at generation boundaries only, in this order:
    /// empty population, evaluation budget, generation limit, time limit,
    /// population size limit, stagnation. A generation that has started always
    /// finishes, so budgets can be overshot by at most one generation.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while initializing or evolving, most
    /// notably `GeneticError::Evaluation` when the problem misbehaves.
    #[instrument(skip_all, fields(algorithm = self.algorithm.name(), problem = self.problem.name()))]
    pub fn run(&self, rng: &mut RandomNumberGenerator) -> Result<EvolutionResult> {
        let started = Instant::now();
        let sign = self
            .problem
            .directions()
            .first()
            .map_or(1.0, Direction::sign);
        let trapped_value = self.options.get_trapped_value();

        match self.options.get_log_level() {
            LogLevel::None => debug!(
                population_size = self.options.get_population_size(),
                "Starting evolution"
            ),
            _ => info!(
                population_size = self.options.get_population_size(),
                "Starting evolution"
            ),
        }

        let mut evaluator = Evaluator::new(&self.problem, self.options.get_parallel_threshold());
        let mut population = self.algorithm.initialize(&mut evaluator, rng)?;

        let mut state = TerminationState::new(started);
        state.start(
            evaluator.evaluations(),
            population.size(),
            normalized_best(&population, sign),
        );
        let mut best = keep_better(None, population.best_feasible(), sign);
        let mut history = Vec::new();

        let termination = loop {
            let reason = state.check(&self.options);
            let interval = self.options.get_logging_interval();
            if reason.is_some() || (interval > 0 && state.generation() % interval == 0) {
                let stats = GenerationStats::capture(
                    state.generation(),
                    evaluator.evaluations(),
                    &population,
                    state.elapsed(),
                );
                self.report(&stats, &population);
                history.push(stats);
            }
            if let Some(hook) = &self.population_hook {
                hook(&population);
            }
            if let Some(reason) = reason {
                break reason;
            }

            population = self.algorithm.evolve(&population, &mut evaluator, rng)?;
            state.advance(
                evaluator.evaluations(),
                population.size(),
                normalized_best(&population, sign),
                trapped_value,
            );
            best = keep_better(best, population.best_feasible(), sign);
        };

        let result = EvolutionResult {
            best,
            population,
            generations: state.generation(),
            evaluations: evaluator.evaluations(),
            elapsed: started.elapsed(),
            termination,
            history,
        };

        match self.options.get_log_level() {
            LogLevel::None => debug!(
                termination = %result.termination,
                generations = result.generations,
                evaluations = result.evaluations,
                "Evolution finished"
            ),
            _ => info!(
                termination = %result.termination,
                generations = result.generations,
                evaluations = result.evaluations,
                best_objective = ?result.best.as_ref().map(|b| b.objectives.clone()),
                "Evolution finished"
            ),
        }

        Ok(result)
    }

    fn report(&self, stats: &GenerationStats, population: &Population) {
        match self.options.get_log_level() {
            LogLevel::Verbose => info!(
                generation = stats.generation,
                evaluations = stats.evaluations,
                best_objective = ?stats.best_objective,
                mean_fitness = ?stats.mean_fitness,
                feasible_ratio = stats.feasible_ratio,
                "Generation"
            ),
            LogLevel::Minimal | LogLevel::None => debug!(
                generation = stats.generation,
                best_objective = ?stats.best_objective,
                mean_fitness = ?stats.mean_fitness,
                "Generation"
            ),
        }

        if let Some(callback) = &self.statistics_callback {
            callback(stats, population.best().as_ref());
        }
    }
}

/// Direction-normalized objective of the fittest individual.
fn normalized_best(population: &Population, sign: f64) -> Option<f64> {
    population
        .best()
        .and_then(|individual| individual.objectives.first().map(|value| sign * value))
}

/// Keeps `current` unless `candidate` has a strictly better objective.
fn keep_better(current: Option<Individual>, candidate: Option<Individual>, sign: f64) -> Option<Individual> {
    let score = |individual: &Individual| individual.objectives.first().map(|value| sign * value);
    match (current, candidate) {
        (Some(current), Some(candidate)) => match (score(&current), score(&candidate)) {
            (Some(a), Some(b)) if b < a => Some(candidate),
            _ => Some(current),
        },
        (current, candidate) => current.or(candidate),
    }
}
