use crate::chromosome::Chromosomes;
use crate::encoding::{Encoding, Field};
use crate::error::{GeneticError, Result};
use crate::mutation::Mutator;
use crate::operators::{apply_each, validate_rate};
use crate::rng::RandomNumberGenerator;

/// Default probability that a permutation is inverted.
pub const DEFAULT_INVERSION_RATE: f64 = 0.5;

/// Reverses a random segment of a permutation.
///
/// Each individual is mutated with probability `rate`. Reversal only reorders
/// genes, so a valid permutation stays valid.
///
/// # Examples
///
/// ```
/// use sega::chromosome::Chromosomes;
/// use sega::encoding::{Encoding, Field, FieldOptions, Variable};
/// use sega::mutation::{InversionMutation, Mutator};
/// use sega::rng::RandomNumberGenerator;
///
/// let field = Field::new(
///     Encoding::Permutation,
///     vec![Variable::integer(1.0, 6.0); 6],
///     FieldOptions::default(),
/// ).unwrap();
/// let rows = Chromosomes::Permutation(vec![vec![0, 1, 2, 3, 4, 5]]);
/// let mut rng = RandomNumberGenerator::from_seed(4);
///
/// let mutated = InversionMutation::new(1.0).unwrap().mutate(&rows, &field, &mut rng).unwrap();
/// assert_ne!(mutated, rows);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct InversionMutation {
    rate: f64,
    parallel_threshold: usize,
}

impl InversionMutation {
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if `rate` is outside `[0, 1]`.
    pub fn new(rate: f64) -> Result<Self> {
        Ok(Self {
            rate: validate_rate("Inversion rate", rate)?,
            parallel_threshold: 1000,
        })
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Default for InversionMutation {
    fn default() -> Self {
        Self {
            rate: DEFAULT_INVERSION_RATE,
            parallel_threshold: 1000,
        }
    }
}

impl Mutator for InversionMutation {
    fn name(&self) -> &'static str {
        "inversion mutation"
    }

    fn supports(&self, encoding: Encoding) -> bool {
        encoding == Encoding::Permutation
    }

    fn mutate(
        &self,
        chromosomes: &Chromosomes,
        _field: &Field,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosomes> {
        let Chromosomes::Permutation(rows) = chromosomes else {
            return Err(GeneticError::Configuration(format!(
                "{} needs permutation chromosomes, got {}",
                self.name(),
                chromosomes.encoding()
            )));
        };

        let mut mutated = rows.clone();
        apply_each(&mut mutated, rng, self.parallel_threshold, |row, rng| {
            if !rng.gen_bool(self.rate) {
                return;
            }
            if row.len() < 2 {
                return;
            }
            // At least two genes, otherwise the reversal is a no-op.
            let start = rng.gen_range(0..row.len() - 1);
            let end = rng.gen_range(start + 2..=row.len());
            row[start..end].reverse();
        });
        Ok(Chromosomes::Permutation(mutated))
    }
}
