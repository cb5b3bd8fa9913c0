use crate::chromosome::Chromosomes;
use crate::encoding::{Encoding, Field, Variable};
use crate::error::{GeneticError, Result};
use crate::mutation::Mutator;
use crate::operators::{apply_each, validate_rate};
use crate::rng::RandomNumberGenerator;

pub const DEFAULT_SHRINK: f64 = 0.5;
pub const DEFAULT_GRADIENT: u32 = 20;

/// Breeder genetic algorithm mutation for real and integer genes.
///
/// Each gene mutates with probability `rate` (by default `1 / dimension`).
/// A mutated gene moves by
///
/// ```text
/// x' = x ± shrink * (upper - lower) * Σ_{k < gradient} α_k 2^-k
/// ```
///
/// where every `α_k` is `1` with probability `1 / gradient` and `0` otherwise,
/// so small steps are far more likely than large ones. The direction is a fair
/// coin toss and the result is clamped back into the variable's bounds
/// (and rounded for integer variables).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct BreederMutation {
    rate: Option<f64>,
    shrink: f64,
    gradient: u32,
    parallel_threshold: usize,
}

impl BreederMutation {
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if `rate` is outside
    /// `[0, 1]`, `shrink` is not positive, or `gradient` is zero.
    pub fn new(rate: Option<f64>, shrink: f64, gradient: u32) -> Result<Self> {
        let rate = rate
            .map(|rate| validate_rate("Breeder mutation rate", rate))
            .transpose()?;
        if !(shrink.is_finite() && shrink > 0.0) {
            return Err(GeneticError::Configuration(format!(
                "Shrink factor must be positive, got {}",
                shrink
            )));
        }
        if gradient == 0 {
            return Err(GeneticError::Configuration(
                "Gradient must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            rate,
            shrink,
            gradient,
            parallel_threshold: 1000,
        })
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// The per-gene mutation probability used on chromosomes of `field`.
    pub fn rate_for(&self, field: &Field) -> f64 {
        self.rate
            .unwrap_or_else(|| 1.0 / field.dimension().max(1) as f64)
    }

    fn step(&self, rng: &mut RandomNumberGenerator) -> f64 {
        let p = 1.0 / self.gradient as f64;
        (0..self.gradient)
            .filter(|_| rng.gen_bool(p))
            .map(|k| 0.5f64.powi(k as i32))
            .sum()
    }

    fn perturb(&self, value: f64, variable: &Variable, rng: &mut RandomNumberGenerator) -> f64 {
        let (lo, hi) = variable.effective_bounds();
        let magnitude = self.shrink * (hi - lo) * self.step(rng);
        let moved = if rng.gen_bool(0.5) {
            value + magnitude
        } else {
            value - magnitude
        };
        variable.clamp(moved)
    }
}

impl Default for BreederMutation {
    fn default() -> Self {
        Self {
            rate: None,
            shrink: DEFAULT_SHRINK,
            gradient: DEFAULT_GRADIENT,
            parallel_threshold: 1000,
        }
    }
}

impl Mutator for BreederMutation {
    fn name(&self) -> &'static str {
        "breeder mutation"
    }

    fn supports(&self, encoding: Encoding) -> bool {
        encoding == Encoding::RealInteger
    }

    fn mutate(
        &self,
        chromosomes: &Chromosomes,
        field: &Field,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosomes> {
        let Chromosomes::Real(rows) = chromosomes else {
            return Err(GeneticError::Configuration(format!(
                "{} needs real/integer chromosomes, got {}",
                self.name(),
                chromosomes.encoding()
            )));
        };

        let rate = self.rate_for(field);
        let variables = field.variables();
        let mut mutated = rows.clone();
        apply_each(&mut mutated, rng, self.parallel_threshold, |row, rng| {
            for (gene, variable) in row.iter_mut().zip(variables) {
                if rng.gen_bool(rate) {
                    *gene = self.perturb(*gene, variable, rng);
                }
            }
        });
        Ok(Chromosomes::Real(mutated))
    }
}
