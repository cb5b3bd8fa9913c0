//! # Operator Set
//!
//! Groups the three variation operators used by one run: the mating
//! [`SelectionStrategy`], the [`Recombiner`] and the [`Mutator`]. Recombiners
//! and mutators only work on some encodings, so the pairing is checked once when
//! the set is built and never again during the run.
//!
//! | Encoding      | Recombiner                        | Mutator                         |
//! |---------------|-----------------------------------|---------------------------------|
//! | `Permutation` | partially matched crossover (0.7) | inversion (0.5)                 |
//! | `BinaryGray`  | two-point crossover (0.7)         | bit flip (1 / gene count)       |
//! | `RealInteger` | two-point crossover (0.7)         | breeder GA (1 / dimension)      |
//!
//! ## Example
//!
//! ```rust
//! use sega::encoding::{Encoding, Field, FieldOptions, Variable};
//! use sega::mutation::BitFlipMutation;
//! use sega::operators::OperatorSet;
//! use sega::recombination::TwoPointCrossover;
//!
//! let field = Field::new(
//!     Encoding::RealInteger,
//!     vec![Variable::real(0.0, 1.0); 3],
//!     FieldOptions::default(),
//! ).unwrap();
//!
//! let operators = OperatorSet::for_encoding(&field, 1000);
//! assert_eq!(operators.recombiner().name(), "two-point crossover");
//! assert_eq!(operators.mutator().name(), "breeder mutation");
//!
//! // A bit-flip mutator cannot work on real genes.
//! let mismatched = OperatorSet::new(
//!     Box::new(TwoPointCrossover::default()),
//!     Box::new(BitFlipMutation::default()),
//!     Encoding::RealInteger,
//! );
//! assert!(mismatched.is_err());
//! ```

use rayon::prelude::*;

use crate::encoding::{Encoding, Field};
use crate::error::{GeneticError, Result};
use crate::mutation::{BitFlipMutation, BreederMutation, InversionMutation, Mutator};
use crate::recombination::{PartiallyMatchedCrossover, Recombiner, TwoPointCrossover};
use crate::rng::RandomNumberGenerator;
use crate::selection::{SelectionStrategy, TournamentSelection};

/// The selection, recombination and mutation operators of a run.
#[derive(Debug)]
pub struct OperatorSet {
    selection: Box<dyn SelectionStrategy>,
    recombiner: Box<dyn Recombiner>,
    mutator: Box<dyn Mutator>,
}

impl OperatorSet {
    /// The default operators for the encoding of `field`.
    ///
    /// The match is exhaustive, so a new encoding does not compile until it
    /// gets its own operators.
    pub fn for_encoding(field: &Field, parallel_threshold: usize) -> Self {
        let (recombiner, mutator): (Box<dyn Recombiner>, Box<dyn Mutator>) = match field.encoding()
        {
            Encoding::Permutation => (
                Box::new(PartiallyMatchedCrossover::default().with_parallel_threshold(parallel_threshold)),
                Box::new(InversionMutation::default().with_parallel_threshold(parallel_threshold)),
            ),
            Encoding::BinaryGray => (
                Box::new(TwoPointCrossover::default().with_parallel_threshold(parallel_threshold)),
                Box::new(BitFlipMutation::default().with_parallel_threshold(parallel_threshold)),
            ),
            Encoding::RealInteger => (
                Box::new(TwoPointCrossover::default().with_parallel_threshold(parallel_threshold)),
                Box::new(BreederMutation::default().with_parallel_threshold(parallel_threshold)),
            ),
        };

        Self {
            selection: Box::new(TournamentSelection::default()),
            recombiner,
            mutator,
        }
    }

    /// Builds a set from explicit operators with tournament mating selection.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if either operator does not
    /// support `encoding`.
    pub fn new(
        recombiner: Box<dyn Recombiner>,
        mutator: Box<dyn Mutator>,
        encoding: Encoding,
    ) -> Result<Self> {
        if !recombiner.supports(encoding) {
            return Err(GeneticError::Configuration(format!(
                "Recombiner '{}' does not support {} encoding",
                recombiner.name(),
                encoding
            )));
        }
        if !mutator.supports(encoding) {
            return Err(GeneticError::Configuration(format!(
                "Mutator '{}' does not support {} encoding",
                mutator.name(),
                encoding
            )));
        }

        Ok(Self {
            selection: Box::new(TournamentSelection::default()),
            recombiner,
            mutator,
        })
    }

    /// Replaces the mating selection strategy.
    pub fn with_selection(mut self, selection: Box<dyn SelectionStrategy>) -> Self {
        self.selection = selection;
        self
    }

    pub fn selection(&self) -> &dyn SelectionStrategy {
        self.selection.as_ref()
    }

    pub fn recombiner(&self) -> &dyn Recombiner {
        self.recombiner.as_ref()
    }

    pub fn mutator(&self) -> &dyn Mutator {
        self.mutator.as_ref()
    }
}

/// Checks that a probability lies in `[0, 1]`.
pub(crate) fn validate_rate(name: &str, rate: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(GeneticError::Configuration(format!(
            "{} must be within [0, 1], got {}",
            name, rate
        )));
    }
    Ok(rate)
}

/// Applies `op` to every disjoint adjacent pair of rows.
///
/// One child generator is forked per pair before any pair is touched, so the
/// outcome is the same whether the pairs run sequentially or on the rayon pool.
/// A trailing odd row is left as it is.
pub(crate) fn apply_pairwise<T, F>(
    rows: &mut [Vec<T>],
    rng: &mut RandomNumberGenerator,
    parallel_threshold: usize,
    op: F,
) where
    T: Send,
    F: Fn(&mut [Vec<T>], &mut RandomNumberGenerator) + Send + Sync,
{
    let mut forks = rng.fork(rows.len() / 2);

    if rows.len() >= parallel_threshold {
        rows.par_chunks_exact_mut(2)
            .zip(forks.par_iter_mut())
            .for_each(|(pair, rng)| op(pair, rng));
    } else {
        rows.chunks_exact_mut(2)
            .zip(forks.iter_mut())
            .for_each(|(pair, rng)| op(pair, rng));
    }
}

/// Applies `op` to every row with its own forked generator.
pub(crate) fn apply_each<T, F>(
    rows: &mut [Vec<T>],
    rng: &mut RandomNumberGenerator,
    parallel_threshold: usize,
    op: F,
) where
    T: Send,
    F: Fn(&mut Vec<T>, &mut RandomNumberGenerator) + Send + Sync,
{
    let mut forks = rng.fork(rows.len());

    if rows.len() >= parallel_threshold {
        rows.par_iter_mut()
            .zip(forks.par_iter_mut())
            .for_each(|(row, rng)| op(row, rng));
    } else {
        rows.iter_mut()
            .zip(forks.iter_mut())
            .for_each(|(row, rng)| op(row, rng));
    }
}
