use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::{validate_fitness, SelectionStrategy};

/// A selection strategy that selects individuals through tournament selection.
///
/// Each draw samples `tournament_size` contestants uniformly with replacement
/// and emits the index of the fittest one. Draws are independent, so strong
/// individuals are expected to appear several times in the result.
///
/// - Smaller tournament sizes lead to more exploration (more random selection)
/// - Larger tournament sizes lead to more exploitation (more focus on the best individuals)
///
/// # Examples
///
/// ```
/// use sega::selection::{SelectionStrategy, TournamentSelection};
/// use sega::rng::RandomNumberGenerator;
/// use sega::error::Result;
///
/// fn main() -> Result<()> {
///     let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
///     let mut rng = RandomNumberGenerator::from_seed(42);
///
///     let selection = TournamentSelection::default();
///     let selected = selection.select(&fitness, 8, &mut rng)?;
///
///     assert_eq!(selected.len(), 8);
///
///     Ok(())
/// }
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy with the specified tournament size.
    ///
    /// # Arguments
    ///
    /// * `tournament_size` - The number of individuals that participate in each tournament.
    ///   Must be at least 1. A tournament size of 1 is equivalent to random selection.
    ///
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }

        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Runs a single tournament and returns the index of the winner.
    ///
    /// Ties go to the contestant drawn first.
    fn run_tournament(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> usize {
        let mut best_idx = rng.gen_range(0..fitness.len());

        for _ in 1..self.tournament_size {
            let idx = rng.gen_range(0..fitness.len());
            if fitness[idx] > fitness[best_idx] {
                best_idx = idx;
            }
        }

        best_idx
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self { tournament_size: 2 }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        validate_fitness(fitness, num_to_select)?;

        Ok((0..num_to_select)
            .map(|_| self.run_tournament(fitness, rng))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_selection() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(42);

        let selection = TournamentSelection::default();
        let selected = selection.select(&fitness, 3, &mut rng).unwrap();

        assert_eq!(selected.len(), 3);
        assert!(selected.iter().all(|&i| i < fitness.len()));
    }

    #[test]
    fn test_tournament_selection_returns_duplicates() {
        let fitness = vec![0.5, 0.8, 0.3];
        let mut rng = RandomNumberGenerator::from_seed(7);

        let selection = TournamentSelection::default();
        let selected = selection.select(&fitness, 10, &mut rng).unwrap();

        assert_eq!(selected.len(), 10);
    }

    #[test]
    fn test_tournament_covering_population_picks_best() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(11);

        // With many contestants the best individual wins almost surely.
        let selection = TournamentSelection::new(64).unwrap();
        let selected = selection.select(&fitness, 5, &mut rng).unwrap();

        assert!(selected.iter().all(|&i| i == 3));
    }

    #[test]
    fn test_tournament_favours_fitter_individuals() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(3);

        let selection = TournamentSelection::default();
        let selected = selection.select(&fitness, 200, &mut rng).unwrap();

        // The worst can only win against itself, which is rare but possible,
        // so compare frequencies instead.
        let best = selected.iter().filter(|&&i| i == 3).count();
        let worst = selected.iter().filter(|&&i| i == 4).count();
        assert!(best > worst);
    }

    #[test]
    fn test_tournament_does_not_modify_fitness() {
        let fitness = vec![0.5, 0.8, 0.3];
        let copy = fitness.clone();
        let mut rng = RandomNumberGenerator::from_seed(1);

        TournamentSelection::default()
            .select(&fitness, 4, &mut rng)
            .unwrap();

        assert_eq!(fitness, copy);
    }

    #[test]
    fn test_tournament_selection_empty_population() {
        let fitness: Vec<f64> = Vec::new();
        let mut rng = RandomNumberGenerator::from_seed(1);

        let selection = TournamentSelection::default();
        match selection.select(&fitness, 3, &mut rng) {
            Err(GeneticError::EmptyPopulation) => (),
            _ => panic!("Expected EmptyPopulation error"),
        }
        assert!(selection.select(&fitness, 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_tournament_selection_invalid_size() {
        assert!(TournamentSelection::new(0).is_err());
    }

    #[test]
    fn test_tournament_selection_is_reproducible() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let selection = TournamentSelection::default();

        let a = selection
            .select(&fitness, 20, &mut RandomNumberGenerator::from_seed(9))
            .unwrap();
        let b = selection
            .select(&fitness, 20, &mut RandomNumberGenerator::from_seed(9))
            .unwrap();

        assert_eq!(a, b);
    }
}
