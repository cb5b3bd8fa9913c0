use crate::chromosome::Chromosomes;
use crate::encoding::Encoding;
use crate::error::{GeneticError, Result};
use crate::operators::{apply_pairwise, validate_rate};
use crate::recombination::{Recombiner, DEFAULT_CROSSOVER_RATE};
use crate::rng::RandomNumberGenerator;

/// Two-point crossover for binary and real/integer chromosomes.
///
/// With probability `rate` a pair draws two cut points `a < b` and swaps the
/// genes in `a..b`. Every offspring gene comes from one of the parents at the
/// same position, so gene bounds are preserved.
///
/// # Examples
///
/// ```
/// use sega::chromosome::Chromosomes;
/// use sega::recombination::{Recombiner, TwoPointCrossover};
/// use sega::rng::RandomNumberGenerator;
///
/// let parents = Chromosomes::Binary(vec![vec![false; 8], vec![true; 8]]);
/// let crossover = TwoPointCrossover::new(1.0).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(3);
///
/// let Chromosomes::Binary(children) = crossover.recombine(&parents, &mut rng).unwrap() else {
///     unreachable!()
/// };
/// // Each position holds one `true` between the two children.
/// assert!((0..8).all(|i| children[0][i] != children[1][i]));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TwoPointCrossover {
    rate: f64,
    parallel_threshold: usize,
}

impl TwoPointCrossover {
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if `rate` is outside `[0, 1]`.
    pub fn new(rate: f64) -> Result<Self> {
        Ok(Self {
            rate: validate_rate("Crossover rate", rate)?,
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

    fn cross<T>(&self, pair: &mut [Vec<T>], rng: &mut RandomNumberGenerator) {
        if !rng.gen_bool(self.rate) {
            return;
        }
        let (left, right) = pair.split_at_mut(1);
        let len = left[0].len().min(right[0].len());
        if let Some((a, b)) = rng.cut_points(len) {
            left[0][a..b].swap_with_slice(&mut right[0][a..b]);
        }
    }
}

impl Default for TwoPointCrossover {
    fn default() -> Self {
        Self {
            rate: DEFAULT_CROSSOVER_RATE,
            parallel_threshold: 1000,
        }
    }
}

impl Recombiner for TwoPointCrossover {
    fn name(&self) -> &'static str {
        "two-point crossover"
    }

    fn supports(&self, encoding: Encoding) -> bool {
        matches!(encoding, Encoding::BinaryGray | Encoding::RealInteger)
    }

    fn recombine(
        &self,
        parents: &Chromosomes,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosomes> {
        let mut offspring = parents.clone();
        match &mut offspring {
            Chromosomes::Binary(rows) => {
                apply_pairwise(rows, rng, self.parallel_threshold, |pair, rng| {
                    self.cross(pair, rng)
                })
            }
            Chromosomes::Real(rows) => {
                apply_pairwise(rows, rng, self.parallel_threshold, |pair, rng| {
                    self.cross(pair, rng)
                })
            }
            Chromosomes::Permutation(_) => {
                return Err(GeneticError::Configuration(format!(
                    "{} would break permutation chromosomes",
                    self.name()
                )))
            }
        }
        Ok(offspring)
    }
}
