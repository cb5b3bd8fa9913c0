//! # SegaAlgorithm
//!
//! The strengthened elitist genetic algorithm. One generation:
//!
//! 1. Tournament selection picks `n` parents by fitness.
//! 2. The recombiner pairs neighbouring parents into offspring.
//! 3. The mutator perturbs the offspring.
//! 4. The offspring are evaluated in one batched problem call.
//! 5. Parents and offspring are merged into `2n` individuals.
//! 6. Fitness is recomputed over the merged population.
//! 7. The `n` fittest individuals survive.
//!
//! Step 7 is deterministic truncation, so the best individual of parents and
//! offspring always survives.

use std::sync::Arc;

use tracing::debug;

use super::algorithm::Algorithm;
use super::options::EvolutionOptions;
use crate::chromosome::Chromosomes;
use crate::encoding::Field;
use crate::error::{GeneticError, OptionExt, Result};
use crate::fitness::FitnessScaler;
use crate::operators::OperatorSet;
use crate::population::Population;
use crate::problem::Evaluator;
use crate::rng::RandomNumberGenerator;
use crate::selection::{ElitistSelection, SelectionStrategy};

#[derive(Debug)]
pub struct SegaAlgorithm {
    field: Arc<Field>,
    operators: OperatorSet,
    survivors: ElitistSelection,
    scaler: FitnessScaler,
    population_size: usize,
    seed: Option<Chromosomes>,
}

impl SegaAlgorithm {
    /// Creates the algorithm with the default operators of the field's encoding.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if the population size is
    /// zero or a seed chromosome does not match the field's encoding or gene
    /// count.
    pub fn new(field: Field, options: &EvolutionOptions) -> Result<Self> {
        if options.get_population_size() == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        let seed = match options.get_seed_population() {
            [] => None,
            rows => Some(Chromosomes::from_rows(field.encoding(), rows.to_vec())?),
        };
        if let Some(seed) = &seed {
            let expected = field.gene_count();
            if let Some(row) = seed.row_lengths().into_iter().position(|len| len != expected) {
                return Err(GeneticError::Configuration(format!(
                    "Seed chromosome {} does not have {} genes",
                    row, expected
                )));
            }
        }
        let operators = OperatorSet::for_encoding(&field, options.get_parallel_threshold());

        Ok(Self {
            field: Arc::new(field),
            operators,
            survivors: ElitistSelection::new(),
            scaler: FitnessScaler::new(options.get_parallel_threshold()),
            population_size: options.get_population_size(),
            seed,
        })
    }

    /// Replaces the default operators.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if the recombiner or the
    /// mutator does not support the field's encoding.
    pub fn with_operators(mut self, operators: OperatorSet) -> Result<Self> {
        let encoding = self.field.encoding();
        if !operators.recombiner().supports(encoding) || !operators.mutator().supports(encoding) {
            return Err(GeneticError::Configuration(format!(
                "Operators '{}' and '{}' cannot evolve {} chromosomes",
                operators.recombiner().name(),
                operators.mutator().name(),
                encoding
            )));
        }
        self.operators = operators;
        Ok(self)
    }

    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    pub fn operators(&self) -> &OperatorSet {
        &self.operators
    }

    fn with_scaled_fitness(&self, population: Population, evaluator: &Evaluator<'_>) -> Result<Population> {
        let objectives = population
            .objectives()
            .ok_or_else_genetic(|| GeneticError::Evolution("Population is not evaluated".to_string()))?;
        let fitness = self
            .scaler
            .scale(objectives, population.violations(), evaluator.directions())?;
        population.with_fitness(fitness)
    }
}

impl Algorithm for SegaAlgorithm {
    fn name(&self) -> &str {
        "SEGA"
    }

    fn initialize(
        &self,
        evaluator: &mut Evaluator<'_>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        let mut population = Population::initialize(Arc::clone(&self.field), self.population_size, rng);
        if let Some(seed) = &self.seed {
            population = population.with_seed(seed, self.population_size)?;
        }

        let population = evaluator.evaluate(population)?;
        self.with_scaled_fitness(population, evaluator)
    }

    fn evolve(
        &self,
        population: &Population,
        evaluator: &mut Evaluator<'_>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        let size = population.size();
        if size == 0 {
            return Ok(population.clone());
        }
        let fitness = population.fitness().ok_or_else_genetic(|| {
            GeneticError::Evolution("Population has no fitness to select on".to_string())
        })?;

        let parents = self.operators.selection().select(fitness, size, rng)?;
        let mating_pool = population.chromosomes().select(&parents);
        let offspring = self.operators.recombiner().recombine(&mating_pool, rng)?;
        let offspring = self.operators.mutator().mutate(&offspring, &self.field, rng)?;
        let offspring = evaluator.evaluate(Population::new(Arc::clone(&self.field), offspring)?)?;

        let merged = self.with_scaled_fitness(population.merge(&offspring)?, evaluator)?;
        let merged_fitness = merged.fitness().ok_or_else_genetic(|| {
            GeneticError::Evolution("Merged population lost its fitness".to_string())
        })?;
        let survivors = self.survivors.select(merged_fitness, size, rng)?;
        debug!(
            offspring = offspring.size(),
            feasible = merged.feasible_ratio(),
            "Selected survivors"
        );

        Ok(merged.select(&survivors))
    }
}
