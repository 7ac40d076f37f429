use crate::errors::IsrError;
use crate::graph::NeighbourGraph;
use crate::record::Record;
use crate::tests::test_data::seeded_rows;

use approx::assert_relative_eq;

fn records(rows: &[Vec<f64>]) -> Vec<Record> {
    rows.iter()
        .enumerate()
        .map(|(i, r)| Record::new(i, r.clone()))
        .collect()
}

#[test]
fn test_build_uses_inputs_only() {
    crate::init();
    let recs = records(&[vec![0.0, 100.0], vec![1.0, -5.0], vec![3.0, 7.0]]);
    let graph = NeighbourGraph::build(&recs, 2.0).unwrap();

    assert_eq!(graph.shape(), (3, 3));
    assert_eq!(graph.nnodes(), 3);
    assert_relative_eq!(graph.get(0, 1), 1.0, epsilon = 1e-12);
    assert_relative_eq!(graph.get(0, 2), 3.0, epsilon = 1e-12);
    assert_relative_eq!(graph.get(1, 2), 2.0, epsilon = 1e-12);
    for i in 0..3 {
        assert_eq!(graph.get(i, i), 0.0);
    }
    assert!(graph.is_symmetric(1e-12));
}

#[test]
fn test_build_rejects_tiny_or_ragged_input() {
    let single = records(&[vec![0.0, 1.0]]);
    assert!(matches!(
        NeighbourGraph::build(&single, 2.0),
        Err(IsrError::InvalidFold(_))
    ));

    let ragged = vec![Record::new(0, vec![1.0, 2.0]), Record::new(1, vec![1.0, 2.0, 3.0])];
    assert_eq!(
        NeighbourGraph::build(&ragged, 2.0).unwrap_err(),
        IsrError::DimensionMismatch { expected: 1, actual: 2 }
    );
}

#[test]
fn test_nearest_breaks_ties_by_lower_index() {
    let recs = records(&[
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![-1.0, 0.0],
        vec![2.0, 0.0],
    ]);
    let graph = NeighbourGraph::build(&recs, 1.0).unwrap();

    assert_eq!(graph.nearest(0, 1).unwrap(), vec![1]);
    assert_eq!(graph.nearest(0, 2).unwrap(), vec![1, 2]);
    assert_eq!(graph.nearest(0, 3).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_nearest_excludes_self_by_index_with_duplicates() {
    let recs = records(&[vec![0.0, 1.0], vec![0.0, 2.0], vec![5.0, 3.0]]);
    let graph = NeighbourGraph::build(&recs, 2.0).unwrap();

    assert_eq!(graph.nearest(0, 1).unwrap(), vec![1]);
    assert_eq!(graph.nearest(1, 1).unwrap(), vec![0]);
    assert_eq!(graph.nearest(2, 2).unwrap(), vec![0, 1]);
}

#[test]
fn test_disable_hides_record() {
    let recs = records(&[vec![0.0, 0.0], vec![1.0, 0.0], vec![3.0, 0.0]]);
    let mut graph = NeighbourGraph::build(&recs, 1.0).unwrap();

    graph.disable(1);
    assert!(graph.is_disabled(1));
    assert!(!graph.is_disabled(0));
    assert!(graph.get(1, 1).is_infinite());
    assert!(graph.get(0, 1).is_infinite());
    assert!(graph.get(1, 2).is_infinite());
    assert_eq!(graph.get(0, 2), 3.0);
    assert!(graph.is_symmetric(1e-12));

    assert_eq!(graph.nearest(0, 1).unwrap(), vec![2]);
    assert!(matches!(graph.nearest(0, 2), Err(IsrError::Invariant(_))));

    graph.disable(2);
    assert!(matches!(graph.nearest(0, 1), Err(IsrError::Invariant(_))));
}

#[test]
fn test_nearest_out_of_range() {
    let recs = records(&[vec![0.0, 0.0], vec![1.0, 0.0]]);
    let graph = NeighbourGraph::build(&recs, 2.0).unwrap();
    assert!(graph.nearest(2, 1).is_err());
}

#[test]
fn test_parallel_build_matches_pairwise() {
    let rows = seeded_rows(40, 3, 7);
    let recs = records(&rows);
    let graph = NeighbourGraph::build(&recs, 2.0).unwrap();

    for i in 0..recs.len() {
        for j in 0..recs.len() {
            let expected = crate::distance::distance(recs[i].input(), recs[j].input(), 3, 2.0);
            assert_relative_eq!(graph.get(i, j), expected, epsilon = 1e-12);
        }
    }
    assert!(graph.is_symmetric(1e-12));
    assert!(format!("{}", graph).starts_with("NeighbourGraph (40×40)"));
}
