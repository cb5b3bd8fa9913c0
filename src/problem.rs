//! # Problem
//!
//! The engine treats the optimization problem as an opaque, pure capability:
//! decoded decision variables go in, objective values (and optionally
//! constraint values) come out. The [`Evaluator`] sits between the engine and
//! the problem. It decodes chromosomes, calls the problem once per population,
//! validates what comes back and keeps the evaluation count.
//!
//! ## Example
//!
//! ```rust
//! use sega::encoding::Variable;
//! use sega::error::Result;
//! use sega::problem::{Direction, Evaluation, Problem};
//!
//! struct Sphere {
//!     variables: Vec<Variable>,
//! }
//!
//! impl Problem for Sphere {
//!     fn name(&self) -> &str {
//!         "sphere"
//!     }
//!
//!     fn variables(&self) -> &[Variable] {
//!         &self.variables
//!     }
//!
//!     fn directions(&self) -> &[Direction] {
//!         &[Direction::Minimize]
//!     }
//!
//!     fn evaluate(&self, variables: &[Vec<f64>]) -> Result<Evaluation> {
//!         Ok(Evaluation::new(
//!             variables
//!                 .iter()
//!                 .map(|x| vec![x.iter().map(|v| v * v).sum()])
//!                 .collect(),
//!         ))
//!     }
//! }
//! ```

use tracing::instrument;

use crate::encoding::Variable;
use crate::error::{GeneticError, Result};
use crate::population::Population;

/// Optimization direction of one objective.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// `+1` for minimization and `-1` for maximization, so that multiplying an
    /// objective by the sign always yields a value to minimize.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Minimize => 1.0,
            Direction::Maximize => -1.0,
        }
    }
}

/// Output of one batched problem evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// One row of objective values per individual.
    pub objectives: Vec<Vec<f64>>,
    /// One row of constraint values per individual. Positive entries are
    /// violations; zero or negative entries are satisfied constraints.
    pub violations: Option<Vec<Vec<f64>>>,
}

impl Evaluation {
    pub fn new(objectives: Vec<Vec<f64>>) -> Self {
        Self {
            objectives,
            violations: None,
        }
    }

    pub fn with_violations(mut self, violations: Vec<Vec<f64>>) -> Self {
        self.violations = Some(violations);
        self
    }
}

/// An optimization problem.
///
/// `evaluate` receives the whole batch of decoded individuals at once and
/// must be deterministic and free of side effects from the engine's point of
/// view.
pub trait Problem {
    fn name(&self) -> &str;

    /// Decision variables with their kinds and bounds.
    fn variables(&self) -> &[Variable];

    /// One direction per objective.
    fn directions(&self) -> &[Direction];

    fn evaluate(&self, variables: &[Vec<f64>]) -> Result<Evaluation>;
}

/// Evaluates populations against a problem and counts evaluations.
pub struct Evaluator<'a> {
    problem: &'a dyn Problem,
    evaluations: usize,
    parallel_threshold: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(problem: &'a dyn Problem, parallel_threshold: usize) -> Self {
        Self {
            problem,
            evaluations: 0,
            parallel_threshold,
        }
    }

    /// Individuals evaluated so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn directions(&self) -> &[Direction] {
        self.problem.directions()
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Decodes and evaluates `population` in a single problem call.
    ///
    /// Constraint values are clamped to `max(0, value)`.
    ///
    /// # Errors
    ///
    /// Returns a `GeneticError::Evaluation` error if the problem fails, returns
    /// matrices of the wrong shape, or returns NaN or infinite values.
    #[instrument(level = "debug", skip_all, fields(problem = self.problem.name(), rows = population.size()))]
    pub fn evaluate(&mut self, population: Population) -> Result<Population> {
        let variables = population
            .field()
            .decode(population.chromosomes(), self.parallel_threshold)?;
        if variables.is_empty() {
            return Ok(population.with_evaluation(variables, Vec::new(), None));
        }

        let evaluation = self.problem.evaluate(&variables).map_err(|e| match e {
            GeneticError::Evaluation(msg) => GeneticError::Evaluation(msg),
            other => GeneticError::Evaluation(format!(
                "Problem '{}' failed: {}",
                self.problem.name(),
                other
            )),
        })?;
        self.evaluations += variables.len();

        let objectives = self.check_objectives(evaluation.objectives, variables.len())?;
        let violations = evaluation
            .violations
            .map(|rows| check_violations(rows, variables.len()))
            .transpose()?;

        Ok(population.with_evaluation(variables, objectives, violations))
    }

    fn check_objectives(&self, objectives: Vec<Vec<f64>>, rows: usize) -> Result<Vec<Vec<f64>>> {
        let width = self.problem.directions().len();
        if objectives.len() != rows {
            return Err(GeneticError::Evaluation(format!(
                "Expected {} objective rows, got {}",
                rows,
                objectives.len()
            )));
        }
        for (index, row) in objectives.iter().enumerate() {
            if row.len() != width {
                return Err(GeneticError::Evaluation(format!(
                    "Objective row {} has {} values, expected {}",
                    index,
                    row.len(),
                    width
                )));
            }
            if let Some(value) = row.iter().find(|v| !v.is_finite()) {
                return Err(GeneticError::Evaluation(format!(
                    "Non-finite objective value {} for individual {}",
                    value, index
                )));
            }
        }
        Ok(objectives)
    }
}

fn check_violations(violations: Vec<Vec<f64>>, rows: usize) -> Result<Vec<Vec<f64>>> {
    if violations.len() != rows {
        return Err(GeneticError::Evaluation(format!(
            "Expected {} constraint rows, got {}",
            rows,
            violations.len()
        )));
    }
    let width = violations.first().map_or(0, Vec::len);
    violations
        .into_iter()
        .enumerate()
        .map(|(index, row)| -> Result<Vec<f64>> {
            if row.len() != width {
                return Err(GeneticError::Evaluation(format!(
                    "Constraint row {} has {} values, expected {}",
                    index,
                    row.len(),
                    width
                )));
            }
            if row.iter().any(|v| v.is_nan()) {
                return Err(GeneticError::Evaluation(format!(
                    "NaN constraint value for individual {}",
                    index
                )));
            }
            Ok(row.into_iter().map(|v| v.max(0.0)).collect())
        })
        .collect()
}
