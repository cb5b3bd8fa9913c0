//! Chromosome values and the chromosome matrix of a population.
//!
//! A [`Chromosomes`] matrix always holds rows of a single encoding, which is
//! what lets the operators be dispatched once per population instead of once
//! per individual.

use crate::encoding::Encoding;
use crate::error::{GeneticError, Result};

/// A single chromosome.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Chromosome {
    Binary(Vec<bool>),
    Real(Vec<f64>),
    /// Zero-based positions; see [`Field::permutation_offset`](crate::encoding::Field::permutation_offset).
    Permutation(Vec<usize>),
}

impl Chromosome {
    pub fn encoding(&self) -> Encoding {
        match self {
            Chromosome::Binary(_) => Encoding::BinaryGray,
            Chromosome::Real(_) => Encoding::RealInteger,
            Chromosome::Permutation(_) => Encoding::Permutation,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Chromosome::Binary(genes) => genes.len(),
            Chromosome::Real(genes) => genes.len(),
            Chromosome::Permutation(genes) => genes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_permutation(&self) -> Option<&[usize]> {
        match self {
            Chromosome::Permutation(genes) => Some(genes),
            _ => None,
        }
    }
}

/// The chromosome matrix of a population, one row per individual.
#[derive(Debug, Clone, PartialEq)]
pub enum Chromosomes {
    Binary(Vec<Vec<bool>>),
    Real(Vec<Vec<f64>>),
    Permutation(Vec<Vec<usize>>),
}

impl Chromosomes {
    /// An empty matrix of the given encoding.
    pub fn empty(encoding: Encoding) -> Self {
        match encoding {
            Encoding::BinaryGray => Chromosomes::Binary(Vec::new()),
            Encoding::RealInteger => Chromosomes::Real(Vec::new()),
            Encoding::Permutation => Chromosomes::Permutation(Vec::new()),
        }
    }

    /// Stacks single chromosomes into a matrix of `encoding`.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if any row uses another encoding.
    pub fn from_rows(encoding: Encoding, rows: Vec<Chromosome>) -> Result<Self> {
        let mut matrix = Self::empty(encoding);
        for (index, row) in rows.into_iter().enumerate() {
            match (&mut matrix, row) {
                (Chromosomes::Binary(m), Chromosome::Binary(genes)) => m.push(genes),
                (Chromosomes::Real(m), Chromosome::Real(genes)) => m.push(genes),
                (Chromosomes::Permutation(m), Chromosome::Permutation(genes)) => m.push(genes),
                (_, row) => {
                    return Err(GeneticError::Configuration(format!(
                        "Chromosome {} is {} encoded, expected {}",
                        index,
                        row.encoding(),
                        encoding
                    )))
                }
            }
        }
        Ok(matrix)
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Chromosomes::Binary(_) => Encoding::BinaryGray,
            Chromosomes::Real(_) => Encoding::RealInteger,
            Chromosomes::Permutation(_) => Encoding::Permutation,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Chromosomes::Binary(m) => m.len(),
            Chromosomes::Real(m) => m.len(),
            Chromosomes::Permutation(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gene count of every row, in order.
    pub fn row_lengths(&self) -> Vec<usize> {
        match self {
            Chromosomes::Binary(m) => m.iter().map(Vec::len).collect(),
            Chromosomes::Real(m) => m.iter().map(Vec::len).collect(),
            Chromosomes::Permutation(m) => m.iter().map(Vec::len).collect(),
        }
    }

    pub fn row(&self, index: usize) -> Option<Chromosome> {
        match self {
            Chromosomes::Binary(m) => m.get(index).cloned().map(Chromosome::Binary),
            Chromosomes::Real(m) => m.get(index).cloned().map(Chromosome::Real),
            Chromosomes::Permutation(m) => m.get(index).cloned().map(Chromosome::Permutation),
        }
    }

    /// Rows at `indices`, in that order. Repeated indices yield repeated rows.
    pub fn select(&self, indices: &[usize]) -> Self {
        fn pick<T: Clone>(m: &[Vec<T>], indices: &[usize]) -> Vec<Vec<T>> {
            indices.iter().map(|&i| m[i].clone()).collect()
        }
        match self {
            Chromosomes::Binary(m) => Chromosomes::Binary(pick(m, indices)),
            Chromosomes::Real(m) => Chromosomes::Real(pick(m, indices)),
            Chromosomes::Permutation(m) => Chromosomes::Permutation(pick(m, indices)),
        }
    }

    /// `self` rows followed by `other` rows.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if the encodings differ.
    pub fn concat(&self, other: &Self) -> Result<Self> {
        fn join<T: Clone>(a: &[Vec<T>], b: &[Vec<T>]) -> Vec<Vec<T>> {
            a.iter().chain(b.iter()).cloned().collect()
        }
        match (self, other) {
            (Chromosomes::Binary(a), Chromosomes::Binary(b)) => Ok(Chromosomes::Binary(join(a, b))),
            (Chromosomes::Real(a), Chromosomes::Real(b)) => Ok(Chromosomes::Real(join(a, b))),
            (Chromosomes::Permutation(a), Chromosomes::Permutation(b)) => {
                Ok(Chromosomes::Permutation(join(a, b)))
            }
            _ => Err(GeneticError::Configuration(format!(
                "Cannot merge {} chromosomes into {} chromosomes",
                other.encoding(),
                self.encoding()
            ))),
        }
    }

    /// Keeps the first `len` rows.
    pub fn truncate(mut self, len: usize) -> Self {
        match &mut self {
            Chromosomes::Binary(m) => m.truncate(len),
            Chromosomes::Real(m) => m.truncate(len),
            Chromosomes::Permutation(m) => m.truncate(len),
        }
        self
    }
}
