use crate::chromosome::Chromosomes;
use crate::encoding::{Encoding, Field};
use crate::error::{GeneticError, Result};
use crate::mutation::Mutator;
use crate::operators::{apply_each, validate_rate};
use crate::rng::RandomNumberGenerator;

/// Flips every bit independently with a fixed probability.
///
/// Without an explicit rate each bit flips with probability `1 / gene_count`,
/// so about one bit per chromosome changes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct BitFlipMutation {
    rate: Option<f64>,
    parallel_threshold: usize,
}

impl BitFlipMutation {
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if `rate` is outside `[0, 1]`.
    pub fn new(rate: f64) -> Result<Self> {
        Ok(Self {
            rate: Some(validate_rate("Bit-flip rate", rate)?),
            parallel_threshold: 1000,
        })
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// The per-bit flip probability used on chromosomes of `field`.
    pub fn rate_for(&self, field: &Field) -> f64 {
        self.rate
            .unwrap_or_else(|| 1.0 / field.gene_count().max(1) as f64)
    }
}

impl Default for BitFlipMutation {
    fn default() -> Self {
        Self {
            rate: None,
            parallel_threshold: 1000,
        }
    }
}

impl Mutator for BitFlipMutation {
    fn name(&self) -> &'static str {
        "bit-flip mutation"
    }

    fn supports(&self, encoding: Encoding) -> bool {
        encoding == Encoding::BinaryGray
    }

    fn mutate(
        &self,
        chromosomes: &Chromosomes,
        field: &Field,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosomes> {
        let Chromosomes::Binary(rows) = chromosomes else {
            return Err(GeneticError::Configuration(format!(
                "{} needs binary chromosomes, got {}",
                self.name(),
                chromosomes.encoding()
            )));
        };

        let rate = self.rate_for(field);
        let mut mutated = rows.clone();
        apply_each(&mut mutated, rng, self.parallel_threshold, |row, rng| {
            for bit in row.iter_mut() {
                if rng.gen_bool(rate) {
                    *bit = !*bit;
                }
            }
        });
        Ok(Chromosomes::Binary(mutated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{FieldOptions, Variable};

    fn field() -> Field {
        // 10 bits for [0, 1023] integers.
        Field::new(
            Encoding::BinaryGray,
            vec![Variable::integer(0.0, 1023.0)],
            FieldOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_rate_is_one_over_gene_count() {
        assert_eq!(field().gene_count(), 10);
        assert!((BitFlipMutation::default().rate_for(&field()) - 0.1).abs() < 1e-12);
        assert_eq!(BitFlipMutation::new(0.3).unwrap().rate_for(&field()), 0.3);
    }

    #[test]
    fn test_full_rate_flips_every_bit() {
        let rows = Chromosomes::Binary(vec![vec![true, false, true, false, true, false, true, false, true, false]]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let mutated = BitFlipMutation::new(1.0)
            .unwrap()
            .mutate(&rows, &field(), &mut rng)
            .unwrap();
        assert_eq!(
            mutated,
            Chromosomes::Binary(vec![vec![false, true, false, true, false, true, false, true, false, true]])
        );
    }

    #[test]
    fn test_zero_rate_and_input_untouched() {
        let rows = Chromosomes::Binary(vec![vec![true; 10]; 3]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        let mutated = BitFlipMutation::new(0.0)
            .unwrap()
            .mutate(&rows, &field(), &mut rng)
            .unwrap();
        assert_eq!(mutated, rows);
    }

    #[test]
    fn test_rejects_real_chromosomes() {
        let rows = Chromosomes::Real(vec![vec![0.5]]);
        let mut rng = RandomNumberGenerator::from_seed(1);

        assert!(BitFlipMutation::default().mutate(&rows, &field(), &mut rng).is_err());
        assert!(BitFlipMutation::new(2.0).is_err());
    }
}
