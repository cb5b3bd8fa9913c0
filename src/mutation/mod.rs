//! Mutation operators.
//!
//! A [`Mutator`] perturbs every row of a chromosome matrix independently and
//! returns the result as a new matrix. Mutators never move a gene outside the
//! bounds described by the [`Field`].

use std::fmt::Debug;

use crate::chromosome::Chromosomes;
use crate::encoding::{Encoding, Field};
use crate::error::Result;
use crate::rng::RandomNumberGenerator;

pub mod bit_flip;
pub mod breeder;
pub mod inversion;

pub use bit_flip::BitFlipMutation;
pub use breeder::BreederMutation;
pub use inversion::InversionMutation;

/// Trait for mutation operators.
pub trait Mutator: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this operator can mutate chromosomes of `encoding`.
    fn supports(&self, encoding: Encoding) -> bool;

    /// Returns a mutated copy of `chromosomes`.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if the encoding of
    /// `chromosomes` is not supported.
    fn mutate(
        &self,
        chromosomes: &Chromosomes,
        field: &Field,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosomes>;
}
