//! Property suites over randomly shaped trees: path invariants, sentinel
//! placement, vocabulary round trips, and the sampler's bias.

use proptest::prelude::*;
use std::collections::HashSet;

use treepath_core::dataset::sample_for_target;
use treepath_core::kind::AFTER_LAST_KIND;
use treepath_core::paths::{leaf_paths, render_path, root_path};
use treepath_core::sampling::{elements_from_depth_range, smartly_take};
use treepath_core::shadow::ShadowTree;
use treepath_core::tree::{NodeCategory, SourceTree};
use treepath_core::Vocabulary;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Builds a random tree: node `i + 1` attaches to one of the nodes
/// created before it.
fn arbitrary_tree() -> impl Strategy<Value = SourceTree> {
    prop::collection::vec(any::<prop::sample::Index>(), 0..40).prop_map(|choices| {
        let mut tree = SourceTree::with_root("N0");
        let mut ids = vec![tree.root()];
        for (offset, choice) in choices.into_iter().enumerate() {
            let parent = ids[choice.index(ids.len())];
            let node = tree.new_detached(
                format!("N{}", offset + 1),
                "",
                NodeCategory::Element,
            );
            tree.push_child(parent, node);
            ids.push(node);
        }
        tree
    })
}

proptest! {
    #[test]
    fn root_path_starts_at_root_and_descends(tree in arbitrary_tree()) {
        let shadow = ShadowTree::build(&tree);
        for node in shadow.ids() {
            let path = root_path(&shadow, node);
            prop_assert_eq!(path[0], shadow.root());
            prop_assert_eq!(*path.last().expect("non-empty"), node);
            for pair in path.windows(2) {
                prop_assert_eq!(shadow.parent(pair[1]), Some(pair[0]));
            }
        }
    }

    #[test]
    fn leaf_path_neighbors_are_parent_and_child(tree in arbitrary_tree()) {
        let mut shadow = ShadowTree::build(&tree);
        shadow.add_after_last(&HashSet::new());

        for anchor in shadow.ids() {
            if shadow.is_sentinel(anchor) {
                continue;
            }
            for path in leaf_paths(&shadow, anchor, 0, false) {
                prop_assert_eq!(*path.last().expect("non-empty"), anchor);
                for pair in path.windows(2) {
                    let adjacent = shadow.parent(pair[0]) == Some(pair[1])
                        || shadow.parent(pair[1]) == Some(pair[0]);
                    prop_assert!(adjacent, "non-adjacent neighbors in a leaf path");
                }
                // Rendering applies the same contract and must not panic.
                render_path(&tree, &shadow, &path);
            }
        }
    }

    #[test]
    fn sentinel_placement_is_exact(tree in arbitrary_tree()) {
        let mut shadow = ShadowTree::build(&tree);
        shadow.add_after_last(&HashSet::new());

        for node in shadow.ids() {
            if shadow.is_sentinel(node) {
                prop_assert!(shadow.children(node).is_empty());
                continue;
            }
            let children = shadow.children(node);
            let sentinels = children.iter().filter(|&&c| shadow.is_sentinel(c)).count();
            prop_assert_eq!(sentinels, 1);
            prop_assert!(shadow.is_sentinel(*children.last().expect("ends with sentinel")));
        }
    }

    #[test]
    fn integer_coding_round_trips(tree in arbitrary_tree(), seed in any::<u64>()) {
        let mut shadow = ShadowTree::build(&tree);
        shadow.add_after_last(&HashSet::new());

        let candidates = elements_from_depth_range(&shadow, 1..=4);
        let mut rng = StdRng::seed_from_u64(seed);
        for target in smartly_take(&shadow, &candidates, 5, &mut rng) {
            let Some(sample) = sample_for_target(&tree, &shadow, target, None) else {
                continue;
            };
            let vocab = Vocabulary::from_tokens(sample.tokens());
            let coded = sample.to_integer(&vocab).expect("vocabulary covers the sample");
            let decoded = coded.to_strings(&vocab).expect("ids are all known");
            prop_assert_eq!(decoded, sample);
        }
    }
}

#[test]
fn sampler_bias_converges_near_five_percent() {
    // 400 element leaves under the root; their sentinels are the
    // sentinel pool, the leaves themselves the non-sentinel pool.
    let mut tree = SourceTree::with_root("FILE");
    for index in 0..400 {
        let leaf = tree.new_detached(format!("LEAF_{index}"), "", NodeCategory::Element);
        tree.push_child(tree.root(), leaf);
    }
    let mut shadow = ShadowTree::build(&tree);
    shadow.add_after_last(&HashSet::new());

    let leaves = elements_from_depth_range(&shadow, 1..=1);
    let nested_sentinels = elements_from_depth_range(&shadow, 2..=2);
    let candidates: Vec<_> = leaves
        .into_iter()
        .filter(|&node| !shadow.is_sentinel(node))
        .chain(nested_sentinels)
        .collect();

    let mut drawn = 0usize;
    let mut sentinel_drawn = 0usize;
    for seed in 0..50u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        for node in smartly_take(&shadow, &candidates, 200, &mut rng) {
            drawn += 1;
            if shadow.is_sentinel(node) {
                sentinel_drawn += 1;
            }
        }
    }

    assert_eq!(drawn, 50 * 200);
    let fraction = sentinel_drawn as f64 / drawn as f64;
    assert!(
        (0.03..=0.07).contains(&fraction),
        "sentinel fraction {fraction} drifted from the 5% bias"
    );
}

#[test]
fn sentinel_kind_never_escapes_real_nodes() {
    let tree = treepath_core::testing::scenario_tree();
    let mut shadow = ShadowTree::build(&tree);
    shadow.add_after_last(&HashSet::new());

    for node in shadow.ids() {
        let kind = treepath_core::kind::kind_of_shadow(&tree, &shadow, node);
        assert_eq!(kind == AFTER_LAST_KIND, shadow.is_sentinel(node));
    }
}
