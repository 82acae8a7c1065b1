//! Target selection at depth, with sentinel bias correction
//!
//!     Every shadow node gets an AFTER_LAST sentinel child, so at most
//!     depths the sentinels outnumber everything else and naive uniform
//!     sampling would make "no more children" the dominant training
//!     target. The weighted merge keeps sentinels present but rare:
//!     non-sentinels are drawn with probability 0.95 as long as both
//!     pools hold candidates, then whichever pool remains is drained.

use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;

use crate::shadow::{ShadowId, ShadowTree};

/// Probability of drawing a non-sentinel while both pools are non-empty.
const NON_SENTINEL_WEIGHT: f64 = 0.95;

/// All shadow nodes exactly `depth` edges from the root, preorder.
pub fn elements_from_depth(shadow: &ShadowTree, depth: usize) -> Vec<ShadowId> {
    let mut found = Vec::new();
    let mut stack = vec![(shadow.root(), 0usize)];

    while let Some((node, at)) = stack.pop() {
        if at == depth {
            found.push(node);
            continue;
        }
        for &child in shadow.children(node).iter().rev() {
            stack.push((child, at + 1));
        }
    }

    found
}

/// Union of [`elements_from_depth`] over every depth in the range.
pub fn elements_from_depth_range(
    shadow: &ShadowTree,
    depths: RangeInclusive<usize>,
) -> Vec<ShadowId> {
    depths
        .flat_map(|depth| elements_from_depth(shadow, depth))
        .collect()
}

/// Weighted sample without replacement, biased against sentinels.
///
/// Returns exactly `min(n, candidates.len())` nodes.
pub fn smartly_take<R: Rng>(
    shadow: &ShadowTree,
    candidates: &[ShadowId],
    n: usize,
    rng: &mut R,
) -> Vec<ShadowId> {
    let (mut sentinels, mut regular): (Vec<ShadowId>, Vec<ShadowId>) = candidates
        .iter()
        .copied()
        .partition(|&node| shadow.is_sentinel(node));

    sentinels.shuffle(rng);
    regular.shuffle(rng);

    let mut taken = Vec::with_capacity(n.min(candidates.len()));
    while taken.len() < n {
        let pool = match (regular.is_empty(), sentinels.is_empty()) {
            (true, true) => break,
            (false, true) => &mut regular,
            (true, false) => &mut sentinels,
            (false, false) => {
                if rng.gen_bool(NON_SENTINEL_WEIGHT) {
                    &mut regular
                } else {
                    &mut sentinels
                }
            }
        };
        taken.push(pool.pop().expect("chosen pool is non-empty"));
    }

    taken
}
