//! Dataset extraction from a whole tree
//!
//!     The forward pipeline: wrap the tree in a shadow, inject sentinels,
//!     collect candidates across the requested depth range, draw targets
//!     with the sentinel-biased sampler, and emit one sample per target.

use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use crate::dataset::{sample_for_target, DatasetSample};
use crate::sampling::{elements_from_depth_range, smartly_take};
use crate::shadow::ShadowTree;
use crate::tree::{NodeId, SourceTree};

/// Extracts up to `count` training samples from targets in the depth
/// range. The shadow root itself never yields a sample (it has no
/// prediction position), so depth 0 contributes nothing.
pub fn create_dataset_samples<R: Rng>(
    tree: &SourceTree,
    depths: RangeInclusive<usize>,
    count: usize,
    type_ids: Option<&HashMap<NodeId, i64>>,
    rng: &mut R,
) -> Vec<DatasetSample> {
    let mut shadow = ShadowTree::build(tree);
    shadow.add_after_last(&HashSet::new());

    let candidates = elements_from_depth_range(&shadow, depths);
    smartly_take(&shadow, &candidates, count, rng)
        .into_iter()
        .filter_map(|target| sample_for_target(tree, &shadow, target, type_ids))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::targets_sentinel;
    use crate::kind::AFTER_LAST_KIND;
    use crate::testing::scenario_tree;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn value_argument_sample_matches_the_contract() {
        let tree = scenario_tree();
        let mut rng = StdRng::seed_from_u64(0);

        // Depth 13 holds VALUE_ARGUMENT plus sentinels; draw everything
        // and keep the real target.
        let samples = create_dataset_samples(&tree, 13..=13, 64, None, &mut rng);
        let sample = samples
            .iter()
            .find(|sample| !targets_sentinel(sample))
            .expect("the real target is always drawn");

        assert_eq!(sample.target.as_deref(), Some("VALUE_ARGUMENT"));
        assert_eq!(sample.index_among_brothers, 0);
        assert!(sample.left_brothers.is_empty());

        let expected_root: Vec<&str> = vec![
            "FILE", "↓", "CLASS", "↓", "CLASS_BODY", "↓", "FUN", "↓", "BLOCK", "↓", "WHILE", "↓",
            "BODY", "↓", "BLOCK", "↓", "IF", "↓", "THEN", "↓", "BLOCK", "↓", "CALL_EXPRESSION",
            "↓", "VALUE_ARGUMENT_LIST",
        ];
        assert_eq!(sample.root_path, expected_root);
    }

    #[test]
    fn root_yields_no_sample() {
        let tree = scenario_tree();
        let mut rng = StdRng::seed_from_u64(0);
        let samples = create_dataset_samples(&tree, 0..=0, 10, None, &mut rng);
        assert!(samples.is_empty());
    }

    #[test]
    fn sentinel_targets_are_represented() {
        let tree = scenario_tree();
        let mut rng = StdRng::seed_from_u64(3);

        // Every candidate at depth 1..=5 is drawn, so the sentinels of
        // depth-0..4 nodes all appear as targets.
        let samples = create_dataset_samples(&tree, 1..=5, 1000, None, &mut rng);
        assert!(samples
            .iter()
            .any(|sample| sample.target.as_deref() == Some(AFTER_LAST_KIND)));
        assert!(samples
            .iter()
            .any(|sample| sample.target.as_deref() != Some(AFTER_LAST_KIND)));
    }
}
