//! Rank a synthetic two-class fold with every weighting scheme and print
//! which records survive each removal level.
//!
//! Run with `RUST_LOG=info cargo run --example rank_fold`.

use isrank::builder::IsrBuilder;
use isrank::fold::Fold;
use isrank::weighting::{Combination, WeightingScheme};
use rand::prelude::*;

fn two_blobs(n: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let (cx, cy, label) = if i % 2 == 0 { (0.0, 0.0, 0.0) } else { (3.0, 3.0, 1.0) };
            vec![
                cx + rng.random_range(-1.0..1.0),
                cy + rng.random_range(-1.0..1.0),
                label,
            ]
        })
        .collect()
}

fn main() {
    env_logger::init();

    let levels = vec![10.0, 25.0, 50.0, 75.0];
    for scheme in WeightingScheme::ALL {
        let combinations: &[Combination] = if scheme.is_compound() {
            &[Combination::Cardinal, Combination::Ordinal]
        } else {
            &[Combination::Cardinal]
        };

        for &combination in combinations {
            let builder = IsrBuilder::new()
                .with_scheme(scheme)
                .with_combination(combination)
                .with_neighbours(4)
                .with_normalisation(true)
                .with_removal_levels(levels.clone());

            let folds = (0..3)
                .map(|i| Fold::from_rows(format!("fold-{}", i), two_blobs(40, 7 + i)))
                .collect::<Result<Vec<_>, _>>()
                .expect("synthetic folds are well formed");

            println!("=== {} ({}) ===", builder.experiment_id(), combination);
            for report in builder.build_folds(folds) {
                match report {
                    Ok(report) => {
                        let summary: Vec<String> = report
                            .selections
                            .iter()
                            .map(|s| format!("{}%: {} kept", s.removal_level, s.kept.len()))
                            .collect();
                        let first_out: Vec<usize> = {
                            let mut order: Vec<usize> = (0..report.ranks.len()).collect();
                            order.sort_by_key(|&i| std::cmp::Reverse(report.ranks[i]));
                            order.into_iter().take(5).collect()
                        };
                        println!(
                            "{}: {} | first eliminated {:?}",
                            report.fold_name,
                            summary.join(", "),
                            first_out
                        );
                    }
                    Err(e) => println!("fold failed: {}", e),
                }
            }
        }
    }
}
