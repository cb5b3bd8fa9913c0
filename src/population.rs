//! # Population
//!
//! A [`Population`] bundles a chromosome matrix with the arrays derived from it:
//! decoded decision variables, objective values, constraint violations and
//! fitness. It owns no evolutionary logic. Every operation returns a new
//! value, so a generation is never modified once it has been evaluated.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sega::encoding::{Encoding, Field, FieldOptions, Variable};
//! use sega::population::Population;
//! use sega::rng::RandomNumberGenerator;
//!
//! let field = Field::new(
//!     Encoding::Permutation,
//!     vec![Variable::integer(0.0, 4.0); 5],
//!     FieldOptions::default(),
//! ).unwrap();
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! let population = Population::initialize(Arc::new(field), 8, &mut rng);
//!
//! assert_eq!(population.size(), 8);
//! assert!(!population.is_evaluated());
//! ```

use std::sync::Arc;

use crate::chromosome::{Chromosome, Chromosomes};
use crate::encoding::{Encoding, Field, VariableKind};
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// A snapshot of one individual, detached from its population.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub chromosome: Chromosome,
    /// Decoded decision variables.
    pub variables: Vec<f64>,
    pub objectives: Vec<f64>,
    /// Non-negative violation magnitudes; empty for unconstrained problems.
    pub violations: Vec<f64>,
    pub fitness: Option<f64>,
}

impl Individual {
    pub fn is_feasible(&self) -> bool {
        self.violations.iter().all(|&v| v <= 0.0)
    }
}

/// A population of single-chromosome individuals.
#[derive(Debug, Clone)]
pub struct Population {
    field: Arc<Field>,
    chromosomes: Chromosomes,
    variables: Vec<Vec<f64>>,
    objectives: Option<Vec<Vec<f64>>>,
    violations: Option<Vec<Vec<f64>>>,
    fitness: Option<Vec<f64>>,
}

impl Population {
    /// Wraps an unevaluated chromosome matrix.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if the matrix encoding does
    /// not match the field.
    pub fn new(field: Arc<Field>, chromosomes: Chromosomes) -> Result<Self> {
        if chromosomes.encoding() != field.encoding() {
            return Err(GeneticError::Configuration(format!(
                "Population of {} chromosomes cannot use a {} field",
                chromosomes.encoding(),
                field.encoding()
            )));
        }
        Ok(Self {
            field,
            chromosomes,
            variables: Vec::new(),
            objectives: None,
            violations: None,
            fitness: None,
        })
    }

    /// Creates `size` random individuals consistent with the field: random bit
    /// strings, uniform values within bounds, or random permutations.
    pub fn initialize(field: Arc<Field>, size: usize, rng: &mut RandomNumberGenerator) -> Self {
        let genes = field.gene_count();
        let chromosomes = match field.encoding() {
            Encoding::BinaryGray => Chromosomes::Binary(
                (0..size)
                    .map(|_| (0..genes).map(|_| rng.gen_bool(0.5)).collect())
                    .collect(),
            ),
            Encoding::RealInteger => Chromosomes::Real(
                (0..size)
                    .map(|_| {
                        field
                            .variables()
                            .iter()
                            .map(|variable| {
                                let (lo, hi) = variable.effective_bounds();
                                match variable.kind {
                                    _ if lo >= hi => lo,
                                    VariableKind::Integer => {
                                        rng.gen_range(lo as i64..=hi as i64) as f64
                                    }
                                    VariableKind::Real => rng.gen_range(lo..=hi),
                                }
                            })
                            .collect()
                    })
                    .collect(),
            ),
            Encoding::Permutation => Chromosomes::Permutation(
                (0..size)
                    .map(|_| {
                        let mut order: Vec<usize> = (0..genes).collect();
                        rng.shuffle(&mut order);
                        order
                    })
                    .collect(),
            ),
        };

        Self {
            field,
            chromosomes,
            variables: Vec::new(),
            objectives: None,
            violations: None,
            fitness: None,
        }
    }

    /// Puts `seed` in front of this population and keeps the first `size` rows.
    ///
    /// Seed individuals take priority and are only dropped when the seed alone
    /// exceeds `size`. Gene values are not checked against the field; illegal
    /// seeds are simply evaluated and usually lose during survivor selection.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if the seed uses another
    /// encoding or has rows with the wrong gene count.
    pub fn with_seed(self, seed: &Chromosomes, size: usize) -> Result<Self> {
        let expected = self.field.gene_count();
        if let Some(row) = seed.row_lengths().into_iter().position(|len| len != expected) {
            return Err(GeneticError::Configuration(format!(
                "Seed chromosome {} does not have {} genes",
                row, expected
            )));
        }
        let chromosomes = seed.concat(&self.chromosomes)?.truncate(size);
        Population::new(self.field, chromosomes)
    }

    pub fn size(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn encoding(&self) -> Encoding {
        self.chromosomes.encoding()
    }

    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    pub fn chromosomes(&self) -> &Chromosomes {
        &self.chromosomes
    }

    /// Decoded decision variables; empty until evaluated.
    pub fn variables(&self) -> &[Vec<f64>] {
        &self.variables
    }

    pub fn objectives(&self) -> Option<&[Vec<f64>]> {
        self.objectives.as_deref()
    }

    pub fn violations(&self) -> Option<&[Vec<f64>]> {
        self.violations.as_deref()
    }

    pub fn fitness(&self) -> Option<&[f64]> {
        self.fitness.as_deref()
    }

    pub fn is_evaluated(&self) -> bool {
        self.objectives.is_some()
    }

    /// Attaches evaluation results and clears any stale fitness.
    pub(crate) fn with_evaluation(
        mut self,
        variables: Vec<Vec<f64>>,
        objectives: Vec<Vec<f64>>,
        violations: Option<Vec<Vec<f64>>>,
    ) -> Self {
        self.variables = variables;
        self.objectives = Some(objectives);
        self.violations = violations;
        self.fitness = None;
        self
    }

    /// Attaches a fitness vector.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if the length does not match
    /// the population size.
    pub fn with_fitness(mut self, fitness: Vec<f64>) -> Result<Self> {
        if fitness.len() != self.size() {
            return Err(GeneticError::Configuration(format!(
                "Fitness vector length ({}) doesn't match population length ({})",
                fitness.len(),
                self.size()
            )));
        }
        self.fitness = Some(fitness);
        Ok(self)
    }

    /// Individuals at `indices`, in order, with all derived arrays.
    pub fn select(&self, indices: &[usize]) -> Self {
        fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| values[i].clone()).collect()
        }
        Self {
            field: Arc::clone(&self.field),
            chromosomes: self.chromosomes.select(indices),
            variables: if self.variables.is_empty() {
                Vec::new()
            } else {
                pick(&self.variables, indices)
            },
            objectives: self.objectives.as_ref().map(|o| pick(o, indices)),
            violations: self.violations.as_ref().map(|v| pick(v, indices)),
            fitness: self.fitness.as_ref().map(|f| pick(f, indices)),
        }
    }

    /// Concatenates two evaluated populations. Fitness is dropped because it is
    /// only meaningful relative to the population it was computed on.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Evolution` error if either side is unevaluated,
    /// or a `GeneticError::Configuration` error if the encodings differ.
    pub fn merge(&self, other: &Population) -> Result<Self> {
        let (Some(left), Some(right)) = (&self.objectives, &other.objectives) else {
            return Err(GeneticError::Evolution(
                "Only evaluated populations can be merged".to_string(),
            ));
        };
        let chromosomes = self.chromosomes.concat(&other.chromosomes)?;

        let violations = match (&self.violations, &other.violations) {
            (None, None) => None,
            (a, b) => {
                let width = a
                    .iter()
                    .chain(b.iter())
                    .flat_map(|rows| rows.first())
                    .map(Vec::len)
                    .next()
                    .unwrap_or(0);
                let fill = |rows: &Option<Vec<Vec<f64>>>, count: usize| {
                    rows.clone().unwrap_or_else(|| vec![vec![0.0; width]; count])
                };
                let mut merged = fill(a, self.size());
                merged.extend(fill(b, other.size()));
                Some(merged)
            }
        };

        Ok(Self {
            field: Arc::clone(&self.field),
            chromosomes,
            variables: self.variables.iter().chain(&other.variables).cloned().collect(),
            objectives: Some(left.iter().chain(right).cloned().collect()),
            violations,
            fitness: None,
        })
    }

    /// Whether individual `index` violates no constraint.
    pub fn is_feasible(&self, index: usize) -> bool {
        self.violations
            .as_ref()
            .and_then(|rows| rows.get(index))
            .map_or(true, |row| row.iter().all(|&v| v <= 0.0))
    }

    /// Share of feasible individuals, `0.0` for an empty population.
    pub fn feasible_ratio(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let feasible = (0..self.size()).filter(|&i| self.is_feasible(i)).count();
        feasible as f64 / self.size() as f64
    }

    pub fn mean_fitness(&self) -> Option<f64> {
        let fitness = self.fitness.as_ref()?;
        if fitness.is_empty() {
            return None;
        }
        Some(fitness.iter().sum::<f64>() / fitness.len() as f64)
    }

    /// Index of the highest fitness, the first one on ties.
    pub fn best_index(&self) -> Option<usize> {
        self.best_index_where(|_| true)
    }

    fn best_index_where<F: Fn(usize) -> bool>(&self, keep: F) -> Option<usize> {
        let fitness = self.fitness.as_ref()?;
        fitness
            .iter()
            .enumerate()
            .filter(|&(i, _)| keep(i))
            .fold(None, |best: Option<(usize, f64)>, (i, &f)| match best {
                Some((_, best_f)) if best_f >= f => best,
                _ => Some((i, f)),
            })
            .map(|(i, _)| i)
    }

    pub fn individual(&self, index: usize) -> Option<Individual> {
        let chromosome = self.chromosomes.row(index)?;
        Some(Individual {
            chromosome,
            variables: self.variables.get(index).cloned().unwrap_or_default(),
            objectives: self
                .objectives
                .as_ref()
                .and_then(|rows| rows.get(index).cloned())
                .unwrap_or_default(),
            violations: self
                .violations
                .as_ref()
                .and_then(|rows| rows.get(index).cloned())
                .unwrap_or_default(),
            fitness: self.fitness.as_ref().and_then(|f| f.get(index).copied()),
        })
    }

    /// The individual with the highest fitness.
    pub fn best(&self) -> Option<Individual> {
        self.best_index().and_then(|i| self.individual(i))
    }

    /// The feasible individual with the highest fitness.
    pub fn best_feasible(&self) -> Option<Individual> {
        self.best_index_where(|i| self.is_feasible(i))
            .and_then(|i| self.individual(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{FieldOptions, Variable};

    fn real_field() -> Arc<Field> {
        Arc::new(
            Field::new(
                Encoding::RealInteger,
                vec![Variable::real(0.0, 1.0), Variable::integer(-2.0, 2.0)],
                FieldOptions::default(),
            )
            .unwrap(),
        )
    }

    fn evaluated(values: &[f64], violations: Option<Vec<Vec<f64>>>) -> Population {
        let field = Arc::new(
            Field::new(
                Encoding::RealInteger,
                vec![Variable::real(0.0, 1.0)],
                FieldOptions::default(),
            )
            .unwrap(),
        );
        let rows: Vec<Vec<f64>> = values.iter().map(|&v| vec![v]).collect();
        Population::new(field, Chromosomes::Real(rows.clone()))
            .unwrap()
            .with_evaluation(rows.clone(), rows, violations)
    }

    #[test]
    fn test_initialize_respects_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let population = Population::initialize(real_field(), 50, &mut rng);

        let Chromosomes::Real(rows) = population.chromosomes() else {
            panic!("Expected real chromosomes");
        };
        for row in rows {
            assert!((0.0..=1.0).contains(&row[0]));
            assert!((-2.0..=2.0).contains(&row[1]));
            assert_eq!(row[1].fract(), 0.0);
        }
    }

    #[test]
    fn test_with_seed_prepends_and_truncates() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let population = Population::initialize(real_field(), 4, &mut rng);
        let seed = Chromosomes::Real(vec![vec![0.25, 1.0], vec![9.0, 9.0]]);

        let seeded = population.with_seed(&seed, 4).unwrap();
        assert_eq!(seeded.size(), 4);
        assert_eq!(seeded.chromosomes().row(0), Some(Chromosome::Real(vec![0.25, 1.0])));
        // Out-of-bounds seeds are kept as given.
        assert_eq!(seeded.chromosomes().row(1), Some(Chromosome::Real(vec![9.0, 9.0])));
    }

    #[test]
    fn test_with_seed_larger_than_size() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let population = Population::initialize(real_field(), 2, &mut rng);
        let seed = Chromosomes::Real(vec![vec![0.1, 0.0], vec![0.2, 0.0], vec![0.3, 0.0]]);

        let seeded = population.with_seed(&seed, 2).unwrap();
        assert_eq!(seeded.chromosomes(), &seed.truncate(2));
    }

    #[test]
    fn test_with_seed_rejects_wrong_shape() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let population = Population::initialize(real_field(), 2, &mut rng);
        let seed = Chromosomes::Real(vec![vec![0.1]]);
        assert!(population.with_seed(&seed, 2).is_err());
    }

    #[test]
    fn test_merge_fills_missing_violations() {
        let parents = evaluated(&[0.1, 0.2], None);
        let offspring = evaluated(&[0.3], Some(vec![vec![0.5]]));

        let merged = parents.merge(&offspring).unwrap();
        assert_eq!(merged.size(), 3);
        assert_eq!(merged.violations().unwrap(), &[vec![0.0], vec![0.0], vec![0.5]]);
        assert!(merged.fitness().is_none());
        assert!(merged.is_feasible(0));
        assert!(!merged.is_feasible(2));
    }

    #[test]
    fn test_merge_requires_evaluation() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let raw = Population::initialize(real_field(), 2, &mut rng);
        assert!(raw.merge(&raw).is_err());
    }

    #[test]
    fn test_best_and_best_feasible() {
        let population = evaluated(&[0.1, 0.2, 0.3], Some(vec![vec![1.0], vec![0.0], vec![0.0]]))
            .with_fitness(vec![0.9, 0.5, 0.7])
            .unwrap();

        assert_eq!(population.best_index(), Some(0));
        assert_eq!(population.best_feasible().unwrap().objectives, vec![0.3]);
        assert!((population.feasible_ratio() - 2.0 / 3.0).abs() < 1e-12);
        assert!((population.mean_fitness().unwrap() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_with_fitness_length_mismatch() {
        let population = evaluated(&[0.1, 0.2], None);
        assert!(population.with_fitness(vec![1.0]).is_err());
    }
}
