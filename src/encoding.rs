//! # Encodings and Fields
//!
//! An [`Encoding`] says how decision variables are represented inside a
//! chromosome, and a [`Field`] carries the per-gene metadata that the
//! operators and the decoder need: bounds, inclusivity flags, variable kinds
//! and, for binary chromosomes, bit lengths.
//!
//! | Encoding      | Gene type | Decoded value                                   |
//! |---------------|-----------|-------------------------------------------------|
//! | `BinaryGray`  | `bool`    | bit block of each variable mapped onto its range|
//! | `RealInteger` | `f64`     | the gene itself                                 |
//! | `Permutation` | `usize`   | `lower + position`                              |
//!
//! ## Example
//!
//! ```rust
//! use sega::encoding::{Encoding, Field, FieldOptions, Variable};
//!
//! let variables = vec![Variable::real(0.0, 1.0), Variable::integer(-5.0, 5.0)];
//! let field = Field::new(Encoding::RealInteger, variables, FieldOptions::default()).unwrap();
//!
//! assert_eq!(field.gene_count(), 2);
//! assert_eq!(field.gene_bounds(1), (-5.0, 5.0));
//! ```

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use crate::chromosome::Chromosomes;
use crate::error::{GeneticError, Result};

/// Upper limit on the bits assigned to a single variable.
const MAX_BITS_PER_VARIABLE: usize = 52;

/// How decision variables are represented inside a chromosome.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Binary or Gray coded bit strings.
    BinaryGray,
    /// Real and integer valued genes.
    RealInteger,
    /// Permutations of `0..gene_count`.
    Permutation,
}

impl Encoding {
    /// The short tag used in configuration files.
    pub fn tag(&self) -> &'static str {
        match self {
            Encoding::BinaryGray => "BG",
            Encoding::RealInteger => "RI",
            Encoding::Permutation => "P",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Encoding {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "BG" | "bg" | "binary-gray" | "BinaryGray" => Ok(Encoding::BinaryGray),
            "RI" | "ri" | "real-integer" | "RealInteger" => Ok(Encoding::RealInteger),
            "P" | "p" | "permutation" | "Permutation" => Ok(Encoding::Permutation),
            other => Err(GeneticError::Configuration(format!(
                "Unsupported encoding '{}': expected BG, RI or P",
                other
            ))),
        }
    }
}

/// Whether a decision variable is continuous or integral.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Real,
    Integer,
}

/// A decision variable as described by a problem.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub kind: VariableKind,
    pub lower: f64,
    pub upper: f64,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

impl Variable {
    /// A real variable on the closed interval `[lower, upper]`.
    pub fn real(lower: f64, upper: f64) -> Self {
        Self {
            kind: VariableKind::Real,
            lower,
            upper,
            lower_inclusive: true,
            upper_inclusive: true,
        }
    }

    /// An integer variable on the closed interval `[lower, upper]`.
    pub fn integer(lower: f64, upper: f64) -> Self {
        Self {
            kind: VariableKind::Integer,
            ..Self::real(lower, upper)
        }
    }

    pub fn with_inclusivity(mut self, lower_inclusive: bool, upper_inclusive: bool) -> Self {
        self.lower_inclusive = lower_inclusive;
        self.upper_inclusive = upper_inclusive;
        self
    }

    /// The closed interval of values this variable may actually take once the
    /// inclusivity flags are applied.
    pub fn effective_bounds(&self) -> (f64, f64) {
        match self.kind {
            VariableKind::Integer => {
                let lo = if self.lower_inclusive {
                    self.lower.ceil()
                } else {
                    self.lower.floor() + 1.0
                };
                let hi = if self.upper_inclusive {
                    self.upper.floor()
                } else {
                    self.upper.ceil() - 1.0
                };
                (lo, hi)
            }
            VariableKind::Real => {
                let lo = if self.lower_inclusive {
                    self.lower
                } else {
                    step_up(self.lower)
                };
                let hi = if self.upper_inclusive {
                    self.upper
                } else {
                    step_down(self.upper)
                };
                (lo, hi)
            }
        }
    }

    /// Whether `value` respects the bounds and inclusivity flags.
    pub fn contains(&self, value: f64) -> bool {
        let (lo, hi) = self.effective_bounds();
        value >= lo && value <= hi
    }

    /// Pulls `value` back inside the effective bounds, rounding integers.
    pub fn clamp(&self, value: f64) -> f64 {
        let (lo, hi) = self.effective_bounds();
        let value = match self.kind {
            VariableKind::Integer => value.round(),
            VariableKind::Real => value,
        };
        value.clamp(lo, hi)
    }

    fn validate(&self, index: usize) -> Result<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(GeneticError::Configuration(format!(
                "Variable {} has non-finite bounds [{}, {}]",
                index, self.lower, self.upper
            )));
        }
        let (lo, hi) = self.effective_bounds();
        if lo > hi {
            return Err(GeneticError::Configuration(format!(
                "Variable {} has an empty domain [{}, {}]",
                index, self.lower, self.upper
            )));
        }
        // Sampling and mutation steps scale with the width of the domain.
        if !(hi - lo).is_finite() {
            return Err(GeneticError::Configuration(format!(
                "Variable {} spans [{}, {}], a width that overflows f64",
                index, self.lower, self.upper
            )));
        }
        Ok(())
    }
}

/// The smallest representable value strictly greater than `x`.
fn step_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

fn step_down(x: f64) -> f64 {
    -step_up(-x)
}

/// Options controlling how a [`Field`] is derived from variables.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    /// Resolution a binary chromosome must reach on real variables.
    pub precision: f64,
    /// Whether binary chromosomes are Gray coded.
    pub gray: bool,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            precision: 1e-4,
            gray: true,
        }
    }
}

/// Per-gene metadata shared by a population and its operators.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    encoding: Encoding,
    variables: Vec<Variable>,
    bit_lengths: Vec<usize>,
    gray: bool,
}

impl Field {
    /// Builds a field for `encoding` over `variables`.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if there are no variables,
    /// a variable has an empty or non-finite domain, the binary precision is not
    /// positive, or permutation variables do not span exactly `dimension`
    /// consecutive integers.
    pub fn new(encoding: Encoding, variables: Vec<Variable>, options: FieldOptions) -> Result<Self> {
        if variables.is_empty() {
            return Err(GeneticError::Configuration(
                "A field needs at least one decision variable".to_string(),
            ));
        }
        for (index, variable) in variables.iter().enumerate() {
            variable.validate(index)?;
        }

        let bit_lengths = match encoding {
            Encoding::BinaryGray => {
                if !(options.precision.is_finite() && options.precision > 0.0) {
                    return Err(GeneticError::Configuration(format!(
                        "Binary precision must be positive, got {}",
                        options.precision
                    )));
                }
                variables
                    .iter()
                    .map(|variable| bits_for(variable, options.precision))
                    .collect()
            }
            Encoding::RealInteger => Vec::new(),
            Encoding::Permutation => {
                check_permutation_domain(&variables)?;
                Vec::new()
            }
        };

        Ok(Self {
            encoding,
            variables,
            bit_lengths,
            gray: options.gray,
        })
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Number of decision variables.
    pub fn dimension(&self) -> usize {
        self.variables.len()
    }

    /// Bits per variable. Empty unless the encoding is `BinaryGray`.
    pub fn bit_lengths(&self) -> &[usize] {
        &self.bit_lengths
    }

    /// Number of genes in every chromosome.
    pub fn gene_count(&self) -> usize {
        match self.encoding {
            Encoding::BinaryGray => self.bit_lengths.iter().sum(),
            Encoding::RealInteger | Encoding::Permutation => self.variables.len(),
        }
    }

    /// Inclusive bounds of the raw gene at `gene`.
    pub fn gene_bounds(&self, gene: usize) -> (f64, f64) {
        match self.encoding {
            Encoding::BinaryGray => (0.0, 1.0),
            Encoding::RealInteger => self.variables[gene].effective_bounds(),
            Encoding::Permutation => (0.0, (self.variables.len() - 1) as f64),
        }
    }

    /// Smallest decoded value of a permutation gene.
    pub fn permutation_offset(&self) -> f64 {
        self.variables[0].effective_bounds().0
    }

    /// Decodes every chromosome into decision variables.
    ///
    /// Rows are independent; above `parallel_threshold` rows they are decoded on
    /// the rayon pool.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Configuration` error if the chromosomes use
    /// another encoding or have the wrong gene count.
    pub fn decode(&self, chromosomes: &Chromosomes, parallel_threshold: usize) -> Result<Vec<Vec<f64>>> {
        if chromosomes.encoding() != self.encoding {
            return Err(GeneticError::Configuration(format!(
                "Cannot decode {} chromosomes with a {} field",
                chromosomes.encoding(),
                self.encoding
            )));
        }
        let expected = self.gene_count();
        if let Some(row) = chromosomes.row_lengths().into_iter().position(|len| len != expected) {
            return Err(GeneticError::Configuration(format!(
                "Chromosome {} does not have {} genes",
                row, expected
            )));
        }

        let parallel = chromosomes.len() >= parallel_threshold;
        let decoded = match chromosomes {
            Chromosomes::Binary(rows) => map_rows(rows, parallel, |row| self.decode_bits(row)),
            Chromosomes::Real(rows) => map_rows(rows, parallel, |row| row.clone()),
            Chromosomes::Permutation(rows) => {
                let offset = self.permutation_offset();
                map_rows(rows, parallel, |row| {
                    row.iter().map(|&position| offset + position as f64).collect()
                })
            }
        };
        Ok(decoded)
    }

    fn decode_bits(&self, bits: &[bool]) -> Vec<f64> {
        let mut start = 0;
        self.variables
            .iter()
            .zip(&self.bit_lengths)
            .map(|(variable, &length)| {
                let block = &bits[start..start + length];
                start += length;

                let mut value: u64 = 0;
                let mut previous = false;
                for &bit in block {
                    let binary = if self.gray { previous ^ bit } else { bit };
                    previous = binary;
                    value = (value << 1) | binary as u64;
                }

                let (lo, hi) = variable.effective_bounds();
                let levels = ((1u64 << length) - 1) as f64;
                variable.clamp(lo + (hi - lo) * value as f64 / levels)
            })
            .collect()
    }
}

fn map_rows<T, F>(rows: &[Vec<T>], parallel: bool, decode: F) -> Vec<Vec<f64>>
where
    T: Sync,
    F: Fn(&Vec<T>) -> Vec<f64> + Sync + Send,
{
    if parallel {
        rows.par_iter().map(&decode).collect()
    } else {
        rows.iter().map(decode).collect()
    }
}

fn bits_for(variable: &Variable, precision: f64) -> usize {
    let (lo, hi) = variable.effective_bounds();
    let levels = match variable.kind {
        VariableKind::Integer => hi - lo + 1.0,
        VariableKind::Real => (hi - lo) / precision + 1.0,
    };
    (levels.log2().ceil() as usize).clamp(1, MAX_BITS_PER_VARIABLE)
}

fn check_permutation_domain(variables: &[Variable]) -> Result<()> {
    let as_integer = |variable: &Variable| {
        Variable {
            kind: VariableKind::Integer,
            ..variable.clone()
        }
        .effective_bounds()
    };
    let (lo, hi) = as_integer(&variables[0]);
    if variables.iter().any(|variable| as_integer(variable) != (lo, hi)) {
        return Err(GeneticError::Configuration(
            "Permutation variables must share the same bounds".to_string(),
        ));
    }
    if lo < 0.0 || (hi - lo + 1.0) as usize != variables.len() {
        return Err(GeneticError::Configuration(format!(
            "Permutation of {} genes needs bounds spanning exactly {} non-negative integers, got [{}, {}]",
            variables.len(),
            variables.len(),
            lo,
            hi
        )));
    }
    Ok(())
}
