use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sega::{
    encoding::{Encoding, Variable},
    error::Result,
    evolution::{EvolutionLauncherBuilder, EvolutionOptions},
    operators::OperatorSet,
    population::Population,
    problem::{Direction, Evaluation, Problem},
    rng::RandomNumberGenerator,
    Field, FieldOptions,
};
use std::sync::Arc;

#[derive(Clone)]
struct Sphere {
    variables: Vec<Variable>,
}

impl Problem for Sphere {
    fn name(&self) -> &str {
        "sphere"
    }

    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn directions(&self) -> &[Direction] {
        &[Direction::Minimize]
    }

    fn evaluate(&self, variables: &[Vec<f64>]) -> Result<Evaluation> {
        Ok(Evaluation::new(
            variables
                .iter()
                .map(|x| vec![x.iter().map(|v| v * v).sum()])
                .collect(),
        ))
    }
}

fn bench_sega_run(c: &mut Criterion) {
    let problem = Sphere {
        variables: vec![Variable::real(-5.0, 5.0); 10],
    };

    let mut group = c.benchmark_group("sega_run");
    for encoding in [Encoding::RealInteger, Encoding::BinaryGray] {
        for size in [20, 100, 500] {
            let launcher = EvolutionLauncherBuilder::new()
                .with_problem(problem.clone())
                .with_encoding(encoding)
                .with_options(
                    EvolutionOptions::builder()
                        .population_size(size)
                        .max_generations(20)
                        .build(),
                )
                .build()
                .unwrap();

            group.bench_with_input(
                BenchmarkId::new(encoding.tag(), size),
                &launcher,
                |b, launcher| {
                    b.iter(|| {
                        let mut rng = RandomNumberGenerator::from_seed(7);
                        let result = launcher.run(black_box(&mut rng));
                        assert!(result.is_ok());
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_permutation_variation(c: &mut Criterion) {
    let field = Arc::new(
        Field::new(
            Encoding::Permutation,
            vec![Variable::integer(0.0, 49.0); 50],
            FieldOptions::default(),
        )
        .unwrap(),
    );

    let mut group = c.benchmark_group("permutation_variation");
    for (label, threshold) in [("sequential", usize::MAX), ("parallel", 1)] {
        let operators = OperatorSet::for_encoding(&field, threshold);
        let mut rng = RandomNumberGenerator::from_seed(3);
        let parents = Population::initialize(field.clone(), 2000, &mut rng)
            .chromosomes()
            .clone();

        group.bench_function(label, |b| {
            b.iter(|| {
                let children = operators
                    .recombiner()
                    .recombine(black_box(&parents), &mut rng)
                    .unwrap();
                operators.mutator().mutate(&children, &field, &mut rng).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sega_run, bench_permutation_variation);
criterion_main!(benches);
