//! # Fitness Scaling
//!
//! Converts raw objective values and constraint violations into a single
//! strictly positive fitness per individual, higher being better.
//!
//! Objectives are first multiplied by their direction sign so that smaller is
//! always better. Feasible and infeasible individuals are then ranked
//! separately and the ranks are spread evenly over two disjoint bands:
//!
//! | Class      | Band                                  |
//! |------------|---------------------------------------|
//! | feasible   | `[1.0, 2.0]`                          |
//! | infeasible | `[MIN_FITNESS, 0.5 + MIN_FITNESS]`    |
//!
//! Within a band the best rank gets the top of the band and the worst the
//! bottom, so one extreme objective cannot squash the rest of the class
//! together. Equal objectives share a rank. Infeasible individuals with equal
//! objectives are further ordered by their total violation, smaller first. A
//! band with a single rank collapses to its top.
//!
//! ## Example
//!
//! ```rust
//! use sega::fitness::FitnessScaler;
//! use sega::problem::Direction;
//!
//! let scaler = FitnessScaler::default();
//! let objectives = vec![vec![3.0], vec![1.0], vec![2.0]];
//! let fitness = scaler.scale(&objectives, None, &[Direction::Minimize]).unwrap();
//!
//! assert!(fitness[1] > fitness[2] && fitness[2] > fitness[0]);
//! ```

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::error::{GeneticError, Result};
use crate::problem::Direction;

/// The smallest fitness ever assigned. Keeps every fitness usable as a
/// selection weight.
pub const MIN_FITNESS: f64 = 1e-6;

const FEASIBLE_BASE: f64 = 1.0;
const FEASIBLE_SPAN: f64 = 1.0;
const INFEASIBLE_BASE: f64 = MIN_FITNESS;
const INFEASIBLE_SPAN: f64 = 0.5;

/// Rank-based, feasibility-first fitness scaling.
#[derive(Debug, Clone)]
pub struct FitnessScaler {
    parallel_threshold: usize,
}

impl FitnessScaler {
    pub fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    /// Computes the fitness of every row.
    ///
    /// # Arguments
    ///
    /// * `objectives` - One single-value row per individual.
    /// * `violations` - Optional non-negative violation rows; any positive entry
    ///   marks the individual infeasible.
    /// * `directions` - The direction of the objective.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if there is not exactly one
    /// objective, and a `GeneticError::InvalidNumericValue` error if an
    /// objective is NaN or infinite.
    pub fn scale(
        &self,
        objectives: &[Vec<f64>],
        violations: Option<&[Vec<f64>]>,
        directions: &[Direction],
    ) -> Result<Vec<f64>> {
        let [direction] = directions else {
            return Err(GeneticError::Configuration(format!(
                "Fitness scaling needs exactly one objective direction, got {}",
                directions.len()
            )));
        };
        if let Some(violations) = violations {
            if violations.len() != objectives.len() {
                return Err(GeneticError::Configuration(format!(
                    "Violation rows ({}) don't match objective rows ({})",
                    violations.len(),
                    objectives.len()
                )));
            }
        }

        let sign = direction.sign();
        let normalized = objectives
            .iter()
            .enumerate()
            .map(|(index, row)| match row.as_slice() {
                [value] if value.is_finite() => Ok(sign * value),
                [value] => Err(GeneticError::InvalidNumericValue(format!(
                    "Objective {} of individual {} cannot be scaled",
                    value, index
                ))),
                _ => Err(GeneticError::Configuration(format!(
                    "Individual {} has {} objectives, expected 1",
                    index,
                    row.len()
                ))),
            })
            .collect::<Result<Vec<f64>>>()?;

        // Sum of the positive violations, zero for feasible individuals.
        let overshoot: Vec<f64> = match violations {
            Some(rows) => rows
                .iter()
                .map(|row| row.iter().filter(|&&v| v > 0.0).sum())
                .collect(),
            None => vec![0.0; normalized.len()],
        };
        let feasible: Vec<bool> = overshoot.iter().map(|&total| total <= 0.0).collect();
        let keys: Vec<(f64, f64)> = normalized.iter().copied().zip(overshoot).collect();

        let feasible_levels = levels_of(&keys, &feasible, true);
        let infeasible_levels = levels_of(&keys, &feasible, false);

        let fitness_of = |index: usize| {
            let (base, span, levels) = if feasible[index] {
                (FEASIBLE_BASE, FEASIBLE_SPAN, &feasible_levels)
            } else {
                (INFEASIBLE_BASE, INFEASIBLE_SPAN, &infeasible_levels)
            };
            let share = if levels.len() > 1 {
                let rank = levels.partition_point(|&key| compare(&key, &keys[index]).is_lt());
                1.0 - rank as f64 / (levels.len() - 1) as f64
            } else {
                1.0
            };
            (base + span * share).max(MIN_FITNESS)
        };

        let fitness = if normalized.len() >= self.parallel_threshold {
            (0..normalized.len()).into_par_iter().map(fitness_of).collect()
        } else {
            (0..normalized.len()).map(fitness_of).collect()
        };
        Ok(fitness)
    }
}

impl Default for FitnessScaler {
    fn default() -> Self {
        Self::new(1000)
    }
}

fn compare(a: &(f64, f64), b: &(f64, f64)) -> Ordering {
    a.0.partial_cmp(&b.0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
}

/// The distinct keys of one feasibility class, best first.
fn levels_of(keys: &[(f64, f64)], feasible: &[bool], class: bool) -> Vec<(f64, f64)> {
    let mut levels: Vec<(f64, f64)> = keys
        .iter()
        .zip(feasible)
        .filter(|&(_, &f)| f == class)
        .map(|(&key, _)| key)
        .collect();
    levels.sort_by(compare);
    levels.dedup_by(|a, b| compare(a, b).is_eq());
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn test_minimize_orders_by_objective() {
        let scaler = FitnessScaler::default();
        let fitness = scaler
            .scale(&column(&[0.5, 0.1, 0.9]), None, &[Direction::Minimize])
            .unwrap();

        assert!(fitness[1] > fitness[0]);
        assert!(fitness[0] > fitness[2]);
        assert!(fitness.iter().all(|&f| f > 0.0));
    }

    #[test]
    fn test_maximize_reverses_order() {
        let scaler = FitnessScaler::default();
        let fitness = scaler
            .scale(&column(&[0.5, 0.1, 0.9]), None, &[Direction::Maximize])
            .unwrap();

        assert!(fitness[2] > fitness[0]);
        assert!(fitness[0] > fitness[1]);
    }

    #[test]
    fn test_feasible_always_beats_infeasible() {
        let scaler = FitnessScaler::default();
        // The infeasible individual has by far the best objective.
        let objectives = column(&[100.0, 50.0, -1000.0]);
        let violations = column(&[0.0, 0.0, 3.0]);
        let fitness = scaler
            .scale(&objectives, Some(violations.as_slice()), &[Direction::Minimize])
            .unwrap();

        assert!(fitness[0] > fitness[2]);
        assert!(fitness[1] > fitness[0]);
        assert!(fitness[2] >= MIN_FITNESS);
    }

    #[test]
    fn test_ties_and_single_individual() {
        let scaler = FitnessScaler::default();
        let fitness = scaler
            .scale(&column(&[2.0, 2.0]), None, &[Direction::Minimize])
            .unwrap();
        assert_eq!(fitness[0], fitness[1]);

        let fitness = scaler
            .scale(&column(&[7.0]), None, &[Direction::Minimize])
            .unwrap();
        assert_eq!(fitness, vec![FEASIBLE_BASE + FEASIBLE_SPAN]);
    }

    #[test]
    fn test_extreme_objective_keeps_others_apart() {
        let scaler = FitnessScaler::default();
        let fitness = scaler
            .scale(&column(&[0.0, 1.0, 1e300]), None, &[Direction::Minimize])
            .unwrap();

        assert!(fitness[0] > fitness[1]);
        assert!(fitness[1] > fitness[2]);
        assert_eq!(fitness[0], FEASIBLE_BASE + FEASIBLE_SPAN);
        assert_eq!(fitness[2], FEASIBLE_BASE);
    }

    #[test]
    fn test_infeasible_ties_prefer_smaller_violation() {
        let scaler = FitnessScaler::default();
        let objectives = column(&[5.0, 5.0, 1.0]);
        let violations = vec![vec![2.0, -1.0], vec![0.5, 0.5], vec![0.0, 0.0]];
        let fitness = scaler
            .scale(&objectives, Some(violations.as_slice()), &[Direction::Minimize])
            .unwrap();

        assert!(fitness[1] > fitness[0]);
        assert!(fitness[2] > fitness[1]);
    }

    #[test]
    fn test_all_infeasible_stays_positive() {
        let scaler = FitnessScaler::default();
        let fitness = scaler
            .scale(
                &column(&[1.0, 2.0, 3.0]),
                Some(column(&[1.0, 1.0, 1.0]).as_slice()),
                &[Direction::Minimize],
            )
            .unwrap();

        assert!(fitness.iter().all(|&f| f >= MIN_FITNESS && f < FEASIBLE_BASE));
        assert!(fitness[0] > fitness[2]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let objectives = column(&(0..64).map(|i| ((i * 37) % 11) as f64).collect::<Vec<_>>());
        let violations = column(&(0..64).map(|i| (i % 3) as f64).collect::<Vec<_>>());

        let sequential = FitnessScaler::new(usize::MAX)
            .scale(&objectives, Some(violations.as_slice()), &[Direction::Minimize])
            .unwrap();
        let parallel = FitnessScaler::new(1)
            .scale(&objectives, Some(violations.as_slice()), &[Direction::Minimize])
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_rejects_multi_objective_and_nan() {
        let scaler = FitnessScaler::default();
        assert!(matches!(
            scaler.scale(&column(&[1.0]), None, &[Direction::Minimize, Direction::Maximize]),
            Err(GeneticError::Configuration(_))
        ));
        assert!(matches!(
            scaler.scale(&column(&[f64::NAN]), None, &[Direction::Minimize]),
            Err(GeneticError::InvalidNumericValue(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        let scaler = FitnessScaler::default();
        assert!(scaler.scale(&[], None, &[Direction::Minimize]).unwrap().is_empty());
    }
}
