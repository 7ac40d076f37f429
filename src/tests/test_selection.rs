use crate::errors::IsrError;
use crate::fold::Fold;
use crate::params::IsrParams;
use crate::ranker::EliminationRanker;
use crate::selection::Selector;
use crate::tests::test_data::{seeded_rows, six_points};
use crate::tests::{EXACT_METRIC, SMALL_K};

use approx::assert_relative_eq;

fn ranked(rows: Vec<Vec<f64>>, k: usize) -> Fold {
    let params = IsrParams {
        metric: EXACT_METRIC,
        k,
        ..IsrParams::default()
    };
    let mut fold = Fold::from_rows("ranked", rows).unwrap();
    EliminationRanker::from_params(&params)
        .rank(&mut fold)
        .unwrap();
    fold
}

#[test]
fn test_kept_count_rounds_half_up() {
    assert_eq!(Selector::kept_count(5, 50.0), 3);
    assert_eq!(Selector::kept_count(7, 10.0), 6);
    assert_eq!(Selector::kept_count(10, 0.0), 10);
    assert_eq!(Selector::kept_count(10, 100.0), 0);
}

#[test]
fn test_six_point_selection() {
    crate::init();
    let rows = six_points();
    let fold = ranked(rows.clone(), SMALL_K);

    let sel = Selector::select(&fold, 50.0).unwrap();
    assert_eq!(sel.kept, vec![0, 4, 5]);
    assert_eq!(sel.removed, vec![1, 2, 3]);
    assert_eq!(sel.rows, vec![rows[0].clone(), rows[4].clone(), rows[5].clone()]);
    assert_relative_eq!(sel.retention(), 0.5);
}

#[test]
fn test_extreme_levels() {
    let fold = ranked(six_points(), SMALL_K);

    let all = Selector::select(&fold, 0.0).unwrap();
    assert_eq!(all.kept, (0..6).collect::<Vec<_>>());
    assert!(all.removed.is_empty());

    let none = Selector::select(&fold, 100.0).unwrap();
    assert!(none.kept.is_empty());
    assert!(none.rows.is_empty());
    assert_eq!(none.removed.len(), 6);
}

#[test]
fn test_lower_removal_keeps_more_and_nests() {
    let fold = ranked(seeded_rows(20, 2, 17), 3);
    let levels: Vec<f64> = (0..=10).map(|i| i as f64 * 10.0).collect();
    let selections = Selector::select_all(&fold, &levels).unwrap();

    for pair in selections.windows(2) {
        let (less, more) = (&pair[0], &pair[1]);
        assert!(less.kept.len() > more.kept.len());
        assert!(more.kept.iter().all(|id| less.kept.contains(id)));
    }
    for sel in &selections {
        assert_eq!(sel.kept.len() + sel.removed.len(), 20);
        assert_eq!(sel.kept.len(), Selector::kept_count(20, sel.removal_level));
        assert!(sel.kept.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_select_requires_ranked_fold() {
    let fold = Fold::from_rows("raw", six_points()).unwrap();
    assert!(matches!(
        Selector::select(&fold, 50.0),
        Err(IsrError::InvalidState(_))
    ));
}

#[test]
fn test_select_rejects_out_of_range_level() {
    let fold = ranked(six_points(), SMALL_K);
    assert_eq!(
        Selector::select(&fold, 120.0).unwrap_err(),
        IsrError::InvalidRemovalLevel(120.0)
    );
    assert!(Selector::select(&fold, f64::NAN).is_err());
}
