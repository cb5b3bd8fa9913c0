use std::sync::Arc;

use sega::{
    chromosome::Chromosomes,
    encoding::{Encoding, Field, FieldOptions, Variable},
    error::GeneticError,
    mutation::{BitFlipMutation, BreederMutation, InversionMutation, Mutator},
    operators::OperatorSet,
    population::Population,
    recombination::{PartiallyMatchedCrossover, Recombiner, TwoPointCrossover},
    rng::RandomNumberGenerator,
};

fn field(encoding: Encoding, variables: Vec<Variable>) -> Field {
    Field::new(encoding, variables, FieldOptions::default()).unwrap()
}

fn is_permutation(row: &[usize]) -> bool {
    let mut sorted = row.to_vec();
    sorted.sort_unstable();
    sorted.iter().copied().eq(0..row.len())
}

#[test]
fn test_permutations_survive_repeated_variation() {
    let field = Arc::new(field(Encoding::Permutation, vec![Variable::integer(1.0, 9.0); 9]));
    let operators = OperatorSet::for_encoding(&field, 1000);
    let mut rng = RandomNumberGenerator::from_seed(17);

    let mut chromosomes = Population::initialize(field.clone(), 31, &mut rng)
        .chromosomes()
        .clone();
    for _ in 0..25 {
        chromosomes = operators.recombiner().recombine(&chromosomes, &mut rng).unwrap();
        chromosomes = operators
            .mutator()
            .mutate(&chromosomes, &field, &mut rng)
            .unwrap();
    }

    let Chromosomes::Permutation(rows) = chromosomes else {
        panic!("Expected permutation chromosomes");
    };
    assert_eq!(rows.len(), 31);
    assert!(rows.iter().all(|row| row.len() == 9 && is_permutation(row)));
}

#[test]
fn test_parallel_permutation_variation_matches_sequential() {
    let field = Arc::new(field(Encoding::Permutation, vec![Variable::integer(0.0, 7.0); 8]));
    let sequential = OperatorSet::for_encoding(&field, usize::MAX);
    let parallel = OperatorSet::for_encoding(&field, 1);

    let mut rng = RandomNumberGenerator::from_seed(5);
    let parents = Population::initialize(field.clone(), 40, &mut rng)
        .chromosomes()
        .clone();

    let run = |operators: &OperatorSet| {
        let mut rng = RandomNumberGenerator::from_seed(99);
        let children = operators.recombiner().recombine(&parents, &mut rng).unwrap();
        operators.mutator().mutate(&children, &field, &mut rng).unwrap()
    };

    assert_eq!(run(&sequential), run(&parallel));
}

#[test]
fn test_breeder_respects_exclusive_bounds() {
    let variables = vec![
        Variable::real(0.0, 1.0).with_inclusivity(false, false),
        Variable::integer(-3.0, 3.0).with_inclusivity(true, false),
        Variable::integer(10.0, 12.0),
    ];
    let field = Arc::new(field(Encoding::RealInteger, variables));
    let mutator = BreederMutation::new(Some(1.0), 0.9, 20).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(8);

    let mut chromosomes = Population::initialize(field.clone(), 50, &mut rng)
        .chromosomes()
        .clone();
    for _ in 0..20 {
        chromosomes = mutator.mutate(&chromosomes, &field, &mut rng).unwrap();
    }

    let Chromosomes::Real(rows) = chromosomes else {
        panic!("Expected real chromosomes");
    };
    for row in &rows {
        assert!(row[0] > 0.0 && row[0] < 1.0, "{} escaped (0, 1)", row[0]);
        assert!((-3.0..=2.0).contains(&row[1]));
        assert_eq!(row[1], row[1].round());
        assert!((10.0..=12.0).contains(&row[2]));
        assert_eq!(row[2], row[2].round());
    }
}

#[test]
fn test_two_point_crossover_preserves_gene_columns() {
    let field = Arc::new(field(Encoding::BinaryGray, vec![Variable::integer(0.0, 255.0); 2]));
    let crossover = TwoPointCrossover::new(1.0).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(12);

    let parents = Population::initialize(field, 20, &mut rng)
        .chromosomes()
        .clone();
    let children = crossover.recombine(&parents, &mut rng).unwrap();

    let (Chromosomes::Binary(before), Chromosomes::Binary(after)) = (&parents, &children) else {
        panic!("Expected binary chromosomes");
    };
    assert_eq!(before.len(), after.len());

    // Crossover only swaps genes between the two rows of a pair at the same
    // locus, so every pair keeps its per-column set of values.
    for (old, new) in before.chunks(2).zip(after.chunks(2)) {
        for column in 0..old[0].len() {
            let mut old_column = [old[0][column], old[1][column]];
            let mut new_column = [new[0][column], new[1][column]];
            old_column.sort();
            new_column.sort();
            assert_eq!(old_column, new_column);
        }
    }
}

#[test]
fn test_zero_rates_leave_chromosomes_untouched() {
    let field = Arc::new(field(Encoding::BinaryGray, vec![Variable::real(-1.0, 1.0); 3]));
    let mut rng = RandomNumberGenerator::from_seed(4);
    let parents = Population::initialize(field.clone(), 11, &mut rng)
        .chromosomes()
        .clone();

    let crossover = TwoPointCrossover::new(0.0).unwrap();
    let mutation = BitFlipMutation::new(0.0).unwrap();
    let children = crossover.recombine(&parents, &mut rng).unwrap();
    let children = mutation.mutate(&children, &field, &mut rng).unwrap();

    assert_eq!(children, parents);
}

#[test]
fn test_default_operators_follow_the_encoding() {
    let binary = field(Encoding::BinaryGray, vec![Variable::real(0.0, 1.0)]);
    let real = field(Encoding::RealInteger, vec![Variable::real(0.0, 1.0)]);
    let permutation = field(Encoding::Permutation, vec![Variable::integer(0.0, 2.0); 3]);

    let names = |field: &Field| {
        let operators = OperatorSet::for_encoding(field, 1000);
        (operators.recombiner().name(), operators.mutator().name())
    };

    assert_eq!(names(&binary), ("two-point crossover", "bit-flip mutation"));
    assert_eq!(names(&real), ("two-point crossover", "breeder mutation"));
    assert_eq!(
        names(&permutation),
        ("partially matched crossover", "inversion mutation")
    );
}

#[test]
fn test_mismatched_operators_are_rejected() {
    let result = OperatorSet::new(
        Box::new(TwoPointCrossover::default()),
        Box::new(InversionMutation::default()),
        Encoding::RealInteger,
    );
    assert!(matches!(result, Err(GeneticError::Configuration(_))));

    let result = OperatorSet::new(
        Box::new(PartiallyMatchedCrossover::default()),
        Box::new(InversionMutation::default()),
        Encoding::BinaryGray,
    );
    assert!(matches!(result, Err(GeneticError::Configuration(_))));

    let result = OperatorSet::new(
        Box::new(PartiallyMatchedCrossover::default()),
        Box::new(InversionMutation::default()),
        Encoding::Permutation,
    );
    assert!(result.is_ok());
}

#[test]
fn test_operators_reject_foreign_chromosomes() {
    let real = field(Encoding::RealInteger, vec![Variable::real(0.0, 1.0)]);
    let mut rng = RandomNumberGenerator::from_seed(0);
    let rows = Chromosomes::Real(vec![vec![0.5], vec![0.25]]);

    assert!(PartiallyMatchedCrossover::default()
        .recombine(&rows, &mut rng)
        .is_err());
    assert!(InversionMutation::default()
        .mutate(&rows, &real, &mut rng)
        .is_err());
}

#[test]
fn test_out_of_range_rates_are_rejected() {
    assert!(TwoPointCrossover::new(1.5).is_err());
    assert!(PartiallyMatchedCrossover::new(-0.1).is_err());
    assert!(BitFlipMutation::new(f64::NAN).is_err());
    assert!(BreederMutation::new(Some(2.0), 0.5, 20).is_err());
    assert!(BreederMutation::new(None, 0.5, 0).is_err());
}
