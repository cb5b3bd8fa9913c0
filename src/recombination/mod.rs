//! Recombination operators.
//!
//! A [`Recombiner`] works on a whole mating pool at once. Rows `0, 1` form the
//! first pair, rows `2, 3` the second and so on; a trailing odd row passes
//! through unchanged. Pairs are independent of each other.

use std::fmt::Debug;

use crate::chromosome::Chromosomes;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;

pub mod partially_matched;
pub mod two_point;

pub use partially_matched::PartiallyMatchedCrossover;
pub use two_point::TwoPointCrossover;

/// Default probability that a pair is recombined.
pub const DEFAULT_CROSSOVER_RATE: f64 = 0.7;

/// Trait for crossover operators.
pub trait Recombiner: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this operator can recombine chromosomes of `encoding`.
    fn supports(&self, encoding: Encoding) -> bool;

    /// Returns the offspring of `parents`, one row per parent row.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if the encoding of
    /// `parents` is not supported.
    fn recombine(
        &self,
        parents: &Chromosomes,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosomes>;
}
