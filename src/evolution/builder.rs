use crate::{
    encoding::{Encoding, Field, FieldOptions},
    error::{GeneticError, Result},
    operators::OperatorSet,
    problem::Problem,
};

use super::{
    options::EvolutionOptions,
    statistics::{PopulationHook, StatisticsCallback},
    EvolutionLauncher, SegaAlgorithm,
};

/// Assembles an [`EvolutionLauncher`] running [`SegaAlgorithm`].
///
/// Everything that can be checked before the run is checked in
/// [`build`](EvolutionLauncherBuilder::build): the options, the problem's
/// objective count, the field derived from the problem's variables and the
/// operator/encoding pairing.
///
/// # Example
///
/// ```rust
/// use sega::encoding::{Encoding, Variable};
/// use sega::error::Result;
/// use sega::evolution::{EvolutionLauncherBuilder, EvolutionOptions};
/// use sega::problem::{Direction, Evaluation, Problem};
/// use sega::rng::RandomNumberGenerator;
///
/// struct Parabola {
///     variables: Vec<Variable>,
/// }
///
/// impl Problem for Parabola {
///     fn name(&self) -> &str {
///         "parabola"
///     }
///
///     fn variables(&self) -> &[Variable] {
///         &self.variables
///     }
///
///     fn directions(&self) -> &[Direction] {
///         &[Direction::Minimize]
///     }
///
///     fn evaluate(&self, variables: &[Vec<f64>]) -> Result<Evaluation> {
///         Ok(Evaluation::new(
///             variables.iter().map(|x| vec![(x[0] - 1.0).powi(2)]).collect(),
///         ))
///     }
/// }
///
/// fn main() -> Result<()> {
///     let launcher = EvolutionLauncherBuilder::new()
///         .with_problem(Parabola { variables: vec![Variable::real(-5.0, 5.0)] })
///         .with_encoding(Encoding::RealInteger)
///         .with_options(
///             EvolutionOptions::builder()
///                 .population_size(20)
///                 .max_generations(30)
///                 .build(),
///         )
///         .build()?;
///
///     let result = launcher.run(&mut RandomNumberGenerator::from_seed(42))?;
///     assert_eq!(result.generations, 30);
///     assert!(result.best.is_some());
///
///     Ok(())
/// }
/// ```
pub struct EvolutionLauncherBuilder<P>
where
    P: Problem,
{
    problem: Option<P>,
    encoding: Option<Encoding>,
    field_options: FieldOptions,
    options: EvolutionOptions,
    operators: Option<OperatorSet>,
    statistics_callback: Option<StatisticsCallback>,
    population_hook: Option<PopulationHook>,
}

impl<P> EvolutionLauncherBuilder<P>
where
    P: Problem,
{
    pub fn new() -> Self {
        Self {
            problem: None,
            encoding: None,
            field_options: FieldOptions::default(),
            options: EvolutionOptions::default(),
            operators: None,
            statistics_callback: None,
            population_hook: None,
        }
    }

    pub fn with_problem(mut self, problem: P) -> Self {
        self.problem = Some(problem);
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_field_options(mut self, field_options: FieldOptions) -> Self {
        self.field_options = field_options;
        self
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the default operators of the encoding.
    pub fn with_operators(mut self, operators: OperatorSet) -> Self {
        self.operators = Some(operators);
        self
    }

    pub fn with_statistics_callback(mut self, callback: StatisticsCallback) -> Self {
        self.statistics_callback = Some(callback);
        self
    }

    pub fn with_population_hook(mut self, hook: PopulationHook) -> Self {
        self.population_hook = Some(hook);
        self
    }

    pub fn build(self) -> Result<EvolutionLauncher<P, SegaAlgorithm>> {
        let problem = self
            .problem
            .ok_or_else(|| GeneticError::Configuration("Problem not specified".to_string()))?;

        let encoding = self
            .encoding
            .ok_or_else(|| GeneticError::Configuration("Encoding not specified".to_string()))?;

        self.options.validate()?;

        if problem.directions().len() != 1 {
            return Err(GeneticError::Configuration(format!(
                "Problem '{}' has {} objectives, SEGA optimizes exactly one",
                problem.name(),
                problem.directions().len()
            )));
        }

        let field = Field::new(encoding, problem.variables().to_vec(), self.field_options)?;
        let mut algorithm = SegaAlgorithm::new(field, &self.options)?;
        if let Some(operators) = self.operators {
            algorithm = algorithm.with_operators(operators)?;
        }

        let mut launcher = EvolutionLauncher::new(problem, algorithm, self.options);
        if let Some(callback) = self.statistics_callback {
            launcher = launcher.with_statistics_callback(callback);
        }
        if let Some(hook) = self.population_hook {
            launcher = launcher.with_population_hook(hook);
        }
        Ok(launcher)
    }
}

impl<P> Default for EvolutionLauncherBuilder<P>
where
    P: Problem,
{
    fn default() -> Self {
        Self::new()
    }
}
