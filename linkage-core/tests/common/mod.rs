use linkage_core::{DataSource, PointSet};
use linkage_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::{prelude::*, test_runner::Config as ProptestConfig};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Clusters and merge distances produced by the reference implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub clusters: Vec<Vec<usize>>,
    pub distances: Vec<f32>,
}

/// O(n³) single-linkage reference.
///
/// Every iteration recomputes all cluster distances from item distances,
/// merges the first minimal pair `(i, j)` in row-major order, appends `j`'s
/// members to `i` and moves the final cluster into position `j`.
#[must_use]
pub fn naive_single_linkage<D: DataSource>(source: &D, target: usize) -> Reference {
    let mut clusters: Vec<Vec<usize>> = (0..source.len()).map(|item| vec![item]).collect();
    let mut distances = Vec::new();
    let distance = |a: usize, b: usize| {
        source
            .squared_distance(a, b)
            .expect("reference inputs are valid")
    };

    while clusters.len() > target {
        let mut best: Option<(usize, usize, f32)> = None;
        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                let linkage = clusters[i]
                    .iter()
                    .flat_map(|&a| clusters[j].iter().map(move |&b| (a, b)))
                    .map(|(a, b)| distance(a, b))
                    .fold(f32::INFINITY, f32::min);
                if best.is_none_or(|(_, _, current)| linkage < current) {
                    best = Some((i, j, linkage));
                }
            }
        }
        let Some((i, j, linkage)) = best else { break };
        let absorbed = clusters.swap_remove(j);
        clusters[i].extend(absorbed);
        distances.push(linkage);
    }

    Reference {
        clusters,
        distances,
    }
}

/// Builds a point set from raw rows.
#[must_use]
pub fn point_set(rows: Vec<Vec<f32>>) -> PointSet {
    PointSet::from_rows("fixture", rows).expect("fixture rows are valid")
}

/// Seeded uniform rows in `[-10, 10)` along every axis.
#[must_use]
pub fn random_rows(seed: u64, count: usize, dimension: usize) -> Vec<Vec<f32>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (0..dimension)
                .map(|_| rng.gen_range(-10.0_f32..10.0))
                .collect()
        })
        .collect()
}

/// Proptest configuration honouring the shared CI profile.
#[must_use]
pub fn proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Small integer grids: plenty of tied distances.
pub fn grid_rows() -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(prop::collection::vec(-3_i8..=3, 2), 1..16).prop_map(|rows| {
        rows.into_iter()
            .map(|row| row.into_iter().map(f32::from).collect())
            .collect()
    })
}

/// Points spread over a continuous range in one to four dimensions.
pub fn scattered_rows() -> impl Strategy<Value = Vec<Vec<f32>>> {
    (1_usize..=4).prop_flat_map(|dimension| {
        prop::collection::vec(prop::collection::vec(-50.0_f32..50.0, dimension), 1..24)
    })
}
