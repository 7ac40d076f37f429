use crate::errors::IsrError;
use crate::fold::Fold;
use crate::tests::test_data::{linked_fold, seeded_rows, six_points};
use crate::tests::{EXACT_METRIC, SMALL_K};

use approx::assert_relative_eq;

#[test]
fn test_from_rows_validation() {
    crate::init();
    assert!(matches!(
        Fold::from_rows("empty", vec![]),
        Err(IsrError::InvalidFold(_))
    ));
    assert!(matches!(
        Fold::from_rows("narrow", vec![vec![1.0], vec![2.0]]),
        Err(IsrError::InvalidFold(_))
    ));
    assert!(matches!(
        Fold::from_rows("ragged", vec![vec![1.0, 2.0], vec![1.0, 2.0, 3.0]]),
        Err(IsrError::InvalidFold(_))
    ));
    assert!(matches!(
        Fold::from_rows("nan", vec![vec![1.0, f64::NAN], vec![1.0, 2.0]]),
        Err(IsrError::InvalidFold(_))
    ));
}

#[test]
fn test_new_fold_is_unranked() {
    let fold = Fold::from_rows("fresh", six_points()).unwrap();
    assert_eq!(fold.name(), "fresh");
    assert_eq!(fold.len(), 6);
    assert_eq!(fold.n_attributes(), 2);
    assert_eq!(fold.n_active(), 6);
    assert!(fold.ranks().iter().all(|&r| r == 0));
    assert!(fold.records().iter().all(|r| r.neighbours().is_empty()));
    assert!(matches!(fold.graph(), Err(IsrError::InvalidState(_))));
}

#[test]
fn test_normalise_keeps_original_rows() {
    let rows = vec![vec![0.0, 10.0], vec![5.0, 10.0], vec![10.0, 20.0]];
    let mut fold = Fold::from_rows("norm", rows.clone()).unwrap();
    fold.normalise();

    let inputs: Vec<f64> = fold.records().iter().map(|r| r.input()[0]).collect();
    let outputs: Vec<f64> = fold.records().iter().map(|r| r.output()).collect();
    for (got, want) in inputs.iter().zip([0.0, 0.5, 1.0]) {
        assert_relative_eq!(*got, want, epsilon = 1e-12);
    }
    for (got, want) in outputs.iter().zip([0.0, 0.0, 1.0]) {
        assert_relative_eq!(*got, want, epsilon = 1e-12);
    }

    for (i, row) in rows.iter().enumerate() {
        assert_eq!(fold.original_row(i), row.as_slice());
    }
}

#[test]
fn test_normalise_constant_attribute_maps_to_zero() {
    let mut fold = Fold::from_rows("flat", vec![vec![1.0, 2.0], vec![1.0, 3.0]]).unwrap();
    fold.normalise();
    assert!(fold.records().iter().all(|r| r.input()[0] == 0.0));
    assert_eq!(fold.record(1).output(), 1.0);
}

#[test]
fn test_relations_are_symmetric_after_linking() {
    let fold = linked_fold(seeded_rows(30, 2, 11), 4, 2.0);

    assert!(fold.relations_consistent());
    assert!(fold.records().iter().all(|r| r.neighbours().len() == 4));
    let associations: usize = fold.records().iter().map(|r| r.associates().len()).sum();
    assert_eq!(associations, 30 * 4);
    for r in fold.records() {
        assert!(!r.neighbours().contains(&r.id()));
        assert!(!r.associates().contains(&r.id()));
    }
}

#[test]
fn test_clear_traces_returns_associates_and_keeps_symmetry() {
    let mut fold = linked_fold(six_points(), SMALL_K, EXACT_METRIC);

    // x = 1 is nearest to 0, 2 and 3
    let expected: Vec<usize> = fold.record(1).associates().iter().copied().collect();
    assert_eq!(expected, vec![0, 2, 3]);

    let affected = fold.clear_traces(1);
    assert_eq!(affected, expected);
    assert!(fold.record(1).neighbours().is_empty());
    assert!(fold.record(1).associates().is_empty());
    for r in fold.records() {
        assert!(!r.neighbours().contains(&1));
        assert!(!r.associates().contains(&1));
    }
    assert!(fold.relations_consistent());
}

#[test]
fn test_unlink_neighbours_keeps_own_associates() {
    let mut fold = linked_fold(six_points(), SMALL_K, EXACT_METRIC);
    let associates_before = fold.record(2).associates().clone();

    fold.unlink_neighbours(2);
    assert!(fold.record(2).neighbours().is_empty());
    assert_eq!(fold.record(2).associates(), &associates_before);
    assert!(fold.relations_consistent());

    fold.find_neighbours(2, SMALL_K).unwrap();
    assert_eq!(fold.record(2).neighbours().len(), SMALL_K);
    assert!(fold.relations_consistent());
}

#[test]
fn test_lightest_active_prefers_lower_index_on_tie() {
    let mut fold = linked_fold(six_points(), SMALL_K, EXACT_METRIC);
    for id in 0..fold.len() {
        fold.set_weight(id, 5.0).unwrap();
    }
    fold.set_weight(4, 1.0).unwrap();
    fold.set_weight(2, 1.0).unwrap();
    assert_eq!(fold.lightest_active(), Some(2));

    fold.eliminate(2, 6).unwrap();
    assert_eq!(fold.lightest_active(), Some(4));
    assert_eq!(fold.record(2).rank(), 6);
    assert!(fold.record(2).weight().is_infinite());
    assert!(fold.graph().unwrap().is_disabled(2));
    assert_eq!(fold.n_active(), 5);
}

#[test]
fn test_set_weight_rejects_non_finite() {
    let mut fold = linked_fold(six_points(), SMALL_K, EXACT_METRIC);
    assert!(matches!(fold.set_weight(0, f64::NAN), Err(IsrError::Invariant(_))));
    assert!(matches!(
        fold.set_weight(0, f64::INFINITY),
        Err(IsrError::Invariant(_))
    ));
}

#[test]
fn test_find_neighbours_before_measuring() {
    let mut fold = Fold::from_rows("raw", six_points()).unwrap();
    assert!(matches!(
        fold.find_neighbours(0, 2),
        Err(IsrError::InvalidState(_))
    ));
    assert!(matches!(fold.eliminate(0, 6), Err(IsrError::InvalidState(_))));
}
