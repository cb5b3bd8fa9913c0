use std::fmt::Debug;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Trait for selection strategies.
///
/// A selection strategy picks individuals by index from a fitness vector, where
/// higher fitness is better. Strategies never modify the fitness vector and may
/// return the same index several times.
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
///     let selected = selection.select(&fitness, 2, &mut rng)?;
///
///     assert_eq!(selected, vec![1, 0]);
///
///     Ok(())
/// }
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects `num_to_select` indices into `fitness`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The fitness vector is empty while individuals are requested
    /// - A fitness value is NaN
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>>;
}

/// Checks the preconditions shared by all strategies.
pub(crate) fn validate_fitness(fitness: &[f64], num_to_select: usize) -> Result<()> {
    if fitness.is_empty() && num_to_select > 0 {
        return Err(GeneticError::EmptyPopulation);
    }
    if let Some(index) = fitness.iter().position(|f| f.is_nan()) {
        return Err(GeneticError::InvalidNumericValue(format!(
            "Fitness of individual {} is NaN",
            index
        )));
    }
    Ok(())
}
