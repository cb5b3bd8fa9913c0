use std::cmp::Ordering;

use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{validate_fitness, SelectionStrategy};

/// Deterministic duplication selection.
///
/// Sorts individuals by fitness, best first, and takes the top `num_to_select`.
/// Equal fitness keeps the input order. When more individuals are requested
/// than exist, the ranking is repeated from the top, duplicating the best ones.
///
/// Used for survivor selection it guarantees elitism: the best individual of
/// the merged parents and offspring always survives.
///
/// # Examples
///
/// ```
/// use sega::selection::{ElitistSelection, SelectionStrategy};
/// use sega::rng::RandomNumberGenerator;
/// use sega::error::Result;
///
/// fn main() -> Result<()> {
///     let fitness = vec![0.5, 0.8, 0.3];
///     let mut rng = RandomNumberGenerator::from_seed(1);
///
///     let selection = ElitistSelection::new();
///     assert_eq!(selection.select(&fitness, 2, &mut rng)?, vec![1, 0]);
///     assert_eq!(selection.select(&fitness, 5, &mut rng)?, vec![1, 0, 2, 1, 0]);
///
///     Ok(())
/// }
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct ElitistSelection;

impl ElitistSelection {
    pub fn new() -> Self {
        Self
    }

    /// Indices sorted by fitness, best first; ties keep their order.
    pub fn ranking(fitness: &[f64]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..fitness.len()).collect();
        indices.sort_by(|&a, &b| {
            fitness[b]
                .partial_cmp(&fitness[a])
                .unwrap_or(Ordering::Equal)
        });
        indices
    }
}

impl SelectionStrategy for ElitistSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        validate_fitness(fitness, num_to_select)?;

        let ranking = Self::ranking(fitness);
        Ok(ranking.iter().copied().cycle().take(num_to_select).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneticError;

    #[test]
    fn test_elitist_selection() {
        // Fitness values (not in order of population)
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(0);

        let selected = ElitistSelection::new().select(&fitness, 3, &mut rng).unwrap();

        // indices 3, 1, 0 with fitness 0.9, 0.8, 0.5
        assert_eq!(selected, vec![3, 1, 0]);
    }

    #[test]
    fn test_elitist_selection_with_duplicates() {
        let fitness = vec![0.5, 0.8, 0.3];
        let mut rng = RandomNumberGenerator::from_seed(0);

        let selected = ElitistSelection::new().select(&fitness, 5, &mut rng).unwrap();

        // The remaining 2 should be duplicates of the best individuals
        assert_eq!(selected, vec![1, 0, 2, 1, 0]);
    }

    #[test]
    fn test_elitist_selection_ties_are_stable() {
        let fitness = vec![1.0, 2.0, 1.0, 2.0];
        assert_eq!(ElitistSelection::ranking(&fitness), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_elitist_selection_is_independent_of_rng() {
        let fitness = vec![0.2, 0.4, 0.1, 0.3];
        let a = ElitistSelection::new()
            .select(&fitness, 2, &mut RandomNumberGenerator::from_seed(1))
            .unwrap();
        let b = ElitistSelection::new()
            .select(&fitness, 2, &mut RandomNumberGenerator::from_seed(2))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_elitist_selection_empty_population() {
        let fitness: Vec<f64> = Vec::new();
        let mut rng = RandomNumberGenerator::from_seed(0);

        let result = ElitistSelection::new().select(&fitness, 3, &mut rng);
        assert!(matches!(result, Err(GeneticError::EmptyPopulation)));
    }

    #[test]
    fn test_elitist_selection_with_nan() {
        let fitness = vec![0.5, f64::NAN, 0.3];
        let mut rng = RandomNumberGenerator::from_seed(0);

        let result = ElitistSelection::new().select(&fitness, 3, &mut rng);
        assert!(matches!(result, Err(GeneticError::InvalidNumericValue(_))));
    }
}
