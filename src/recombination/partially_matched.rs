use std::collections::HashMap;

use crate::chromosome::Chromosomes;
use crate::encoding::Encoding;
use crate::error::{GeneticError, Result};
use crate::operators::{apply_pairwise, validate_rate};
use crate::recombination::{Recombiner, DEFAULT_CROSSOVER_RATE};
use crate::rng::RandomNumberGenerator;

/// Partially matched crossover (PMX) for permutation chromosomes.
///
/// With probability `rate` a pair draws two cut points. Each child keeps the
/// segment between the cut points from one parent and takes every other
/// position from the second parent; a value that already occurs in the kept
/// segment is replaced by following the mapping the segment defines between
/// the two parents. Children of two valid permutations are valid permutations.
///
/// # Examples
///
/// ```
/// use sega::chromosome::Chromosomes;
/// use sega::recombination::{PartiallyMatchedCrossover, Recombiner};
/// use sega::rng::RandomNumberGenerator;
///
/// let parents = Chromosomes::Permutation(vec![vec![0, 1, 2, 3, 4], vec![4, 3, 2, 1, 0]]);
/// let pmx = PartiallyMatchedCrossover::new(1.0).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(8);
///
/// let Chromosomes::Permutation(children) = pmx.recombine(&parents, &mut rng).unwrap() else {
///     unreachable!()
/// };
/// for child in children {
///     let mut sorted = child.clone();
///     sorted.sort();
///     assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
/// }
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct PartiallyMatchedCrossover {
    rate: f64,
    parallel_threshold: usize,
}

impl PartiallyMatchedCrossover {
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

    fn cross(&self, pair: &mut [Vec<usize>], rng: &mut RandomNumberGenerator) {
        if !rng.gen_bool(self.rate) {
            return;
        }
        let len = pair[0].len().min(pair[1].len());
        let Some((a, b)) = rng.cut_points(len) else {
            return;
        };

        let first = matched_child(&pair[0][..len], &pair[1][..len], a, b);
        let second = matched_child(&pair[1][..len], &pair[0][..len], a, b);
        pair[0][..len].copy_from_slice(&first);
        pair[1][..len].copy_from_slice(&second);
    }
}

impl Default for PartiallyMatchedCrossover {
    fn default() -> Self {
        Self {
            rate: DEFAULT_CROSSOVER_RATE,
            parallel_threshold: 1000,
        }
    }
}

/// Child that keeps `donor[a..b]` and fills the rest from `other`.
fn matched_child(donor: &[usize], other: &[usize], a: usize, b: usize) -> Vec<usize> {
    let segment: HashMap<usize, usize> = donor[a..b]
        .iter()
        .enumerate()
        .map(|(offset, &value)| (value, a + offset))
        .collect();

    let mut child = other.to_vec();
    child[a..b].copy_from_slice(&donor[a..b]);

    for position in (0..a).chain(b..other.len()) {
        let mut value = other[position];
        // Bounded so that malformed (non-permutation) parents cannot cycle forever.
        for _ in 0..other.len() {
            match segment.get(&value) {
                Some(&mapped) => value = other[mapped],
                None => break,
            }
        }
        child[position] = value;
    }
    child
}

impl Recombiner for PartiallyMatchedCrossover {
    fn name(&self) -> &'static str {
        "partially matched crossover"
    }

    fn supports(&self, encoding: Encoding) -> bool {
        encoding == Encoding::Permutation
    }

    fn recombine(
        &self,
        parents: &Chromosomes,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosomes> {
        let Chromosomes::Permutation(rows) = parents else {
            return Err(GeneticError::Configuration(format!(
                "{} needs permutation chromosomes, got {}",
                self.name(),
                parents.encoding()
            )));
        };

        let mut offspring = rows.clone();
        apply_pairwise(&mut offspring, rng, self.parallel_threshold, |pair, rng| {
            self.cross(pair, rng)
        });
        Ok(Chromosomes::Permutation(offspring))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(row: &[usize]) -> bool {
        let mut seen = vec![false; row.len()];
        row.iter().all(|&v| v < row.len() && !std::mem::replace(&mut seen[v], true))
    }

    #[test]
    fn test_matched_child_textbook_case() {
        let donor = [0, 1, 2, 3, 4, 5, 6, 7];
        let other = [2, 4, 6, 0, 7, 5, 3, 1];

        let child = matched_child(&donor, &other, 3, 6);
        assert_eq!(&child[3..6], &[3, 4, 5]);
        assert!(is_permutation(&child));
        // Position 1 held 4, which the segment displaced; 4 maps to 7 via other[4].
        assert_eq!(child[1], 7);
    }

    #[test]
    fn test_children_stay_permutations() {
        let mut rng = RandomNumberGenerator::from_seed(13);
        let mut base: Vec<usize> = (0..9).collect();
        let rows: Vec<Vec<usize>> = (0..20)
            .map(|_| {
                rng.shuffle(&mut base);
                base.clone()
            })
            .collect();

        let pmx = PartiallyMatchedCrossover::new(1.0).unwrap();
        let Chromosomes::Permutation(children) = pmx
            .recombine(&Chromosomes::Permutation(rows), &mut rng)
            .unwrap()
        else {
            panic!("Expected permutation chromosomes");
        };

        assert_eq!(children.len(), 20);
        assert!(children.iter().all(|child| is_permutation(child)));
    }

    #[test]
    fn test_malformed_parents_terminate() {
        let parents = Chromosomes::Permutation(vec![vec![0, 0, 1, 1], vec![1, 1, 0, 0]]);
        let pmx = PartiallyMatchedCrossover::new(1.0).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);

        assert_eq!(pmx.recombine(&parents, &mut rng).unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_other_encodings() {
        let parents = Chromosomes::Real(vec![vec![0.0], vec![1.0]]);
        let mut rng = RandomNumberGenerator::from_seed(2);

        assert!(!PartiallyMatchedCrossover::default().supports(Encoding::RealInteger));
        assert!(PartiallyMatchedCrossover::default()
            .recombine(&parents, &mut rng)
            .is_err());
    }
}
