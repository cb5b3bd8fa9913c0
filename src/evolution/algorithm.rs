use crate::error::Result;
use crate::population::Population;
use crate::problem::Evaluator;
use crate::rng::RandomNumberGenerator;

/// How one generation evolves.
///
/// An `Algorithm` knows nothing about budgets or statistics; the
/// [`EvolutionLauncher`](super::EvolutionLauncher) decides when to stop and
/// calls [`Algorithm::evolve`] once per generation in between.
///
/// Both methods return populations with fitness attached.
pub trait Algorithm {
    fn name(&self) -> &str;

    /// Creates and evaluates the initial population.
    fn initialize(
        &self,
        evaluator: &mut Evaluator<'_>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population>;

    /// Produces the next generation from `population`.
    fn evolve(
        &self,
        population: &Population,
        evaluator: &mut Evaluator<'_>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population>;
}
