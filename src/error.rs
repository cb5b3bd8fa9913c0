//! # Error Types
//!
//! This module defines the error type shared by every part of the engine.
//! Construction problems are reported as [`GeneticError::Configuration`] and
//! are always fatal; evaluation problems coming from a [`Problem`](crate::problem::Problem)
//! are reported as [`GeneticError::Evaluation`] and abort the run.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use sega::error::{GeneticError, Result};
//!
//! fn check_size(size: usize) -> Result<()> {
//!     if size == 0 {
//!         return Err(GeneticError::Configuration(
//!             "Population size cannot be zero".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_size(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use sega::error::{GeneticError, OptionExt};
//!
//! fn find_best(fitness: &[f64]) -> sega::error::Result<f64> {
//!     fitness
//!         .iter()
//!         .cloned()
//!         .fold(None, |acc: Option<f64>, f| Some(acc.map_or(f, |a| a.max(f))))
//!         .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert!(find_best(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or running the engine.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// An invalid configuration was provided. Always raised at construction time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The evolve loop reached a state it cannot continue from.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// An operation required at least one individual.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// The problem returned unusable objective or constraint values.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// A NaN or infinite value reached a numeric routine.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// A gene or decision variable is outside of its field bounds.
    #[error("Bounds error: value is outside of valid bounds - {0}")]
    OutOfBounds(String),
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
///
/// ## Examples
///
/// ```rust
/// use sega::error::{GeneticError, OptionExt};
///
/// let empty: Option<usize> = None;
/// assert!(empty.ok_or_else_genetic(|| GeneticError::EmptyPopulation).is_err());
/// ```
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message() {
        let err = GeneticError::Configuration("bad encoding".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad encoding");
    }

    #[test]
    fn test_option_ext() {
        let some: Option<u8> = Some(3);
        assert_eq!(
            some.ok_or_else_genetic(|| GeneticError::EmptyPopulation)
                .unwrap(),
            3
        );

        let none: Option<u8> = None;
        match none.ok_or_else_genetic(|| GeneticError::EmptyPopulation) {
            Err(GeneticError::EmptyPopulation) => (),
            _ => panic!("Expected EmptyPopulation error"),
        }
    }
}
