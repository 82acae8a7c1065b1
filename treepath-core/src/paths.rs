//! Leaf-to-anchor and root-to-node path extraction
//!
//!     The shadow tree is treated as an undirected graph: from the anchor
//!     the search may descend into children and ascend through the parent,
//!     only the edge it just arrived by is off limits. Every maximal walk
//!     ends at a leaf; reversed, it reads leaf -> anchor. Children are
//!     visited in their original order, so path order is deterministic.
//!
//!     When successors are dropped, paths whose leaf lies at or after the
//!     anchor's given child index are excluded: during synthesis those
//!     positions are the not-yet-predicted future, and leaking them into
//!     the features would let the model peek at its own answer.
//!
//!     Rendering interleaves direction markers between kinds: ↓ when the
//!     left node is the parent of the right one, ↑ for the reverse. Any
//!     other neighbor relation means the walk invariant was broken
//!     upstream, which is a programming error and panics.

use std::collections::HashSet;

use crate::kind::{kind_of_shadow, DOWN_ARROW, UP_ARROW};
use crate::shadow::{ShadowId, ShadowTree};
use crate::tree::SourceTree;

/// Path root -> `node`, following parent links. Deterministic.
pub fn root_path(shadow: &ShadowTree, node: ShadowId) -> Vec<ShadowId> {
    let mut path = vec![node];
    while let Some(parent) = shadow.parent(*path.last().expect("path is never empty")) {
        path.push(parent);
    }
    path.reverse();
    path
}

/// All distinct maximal leaf -> `anchor` paths.
///
/// With `drop_successors`, leaves under `anchor`'s children at positions
/// `anchor_child_index..` are excluded.
pub fn leaf_paths(
    shadow: &ShadowTree,
    anchor: ShadowId,
    anchor_child_index: usize,
    drop_successors: bool,
) -> Vec<Vec<ShadowId>> {
    let excluded: HashSet<ShadowId> = if drop_successors {
        successor_leaves(shadow, anchor, anchor_child_index)
    } else {
        HashSet::new()
    };

    // Explicit DFS; neighbors are pushed in reverse so they are expanded
    // in child order, then parent.
    struct Frame {
        node: ShadowId,
        prev: Option<ShadowId>,
        prefix: Vec<ShadowId>,
    }

    let mut paths = Vec::new();
    let mut stack = vec![Frame {
        node: anchor,
        prev: None,
        prefix: Vec::new(),
    }];

    while let Some(Frame { node, prev, prefix }) = stack.pop() {
        let mut neighbors: Vec<ShadowId> = shadow.children(node).to_vec();
        if let Some(parent) = shadow.parent(node) {
            neighbors.push(parent);
        }
        neighbors.retain(|&n| Some(n) != prev);

        if neighbors.is_empty() {
            // Maximal walk; the root with no remaining neighbors is not a
            // leaf of any path.
            if shadow.parent(node).is_some() {
                let mut path = prefix;
                path.push(node);
                path.reverse();
                if !excluded.contains(&path[0]) {
                    paths.push(path);
                }
            }
            continue;
        }

        let mut next_prefix = prefix;
        next_prefix.push(node);
        for &neighbor in neighbors.iter().rev() {
            stack.push(Frame {
                node: neighbor,
                prev: Some(node),
                prefix: next_prefix.clone(),
            });
        }
    }

    paths
}

/// Leaves of the subtrees rooted at `anchor.children[from_index..]`.
fn successor_leaves(
    shadow: &ShadowTree,
    anchor: ShadowId,
    from_index: usize,
) -> HashSet<ShadowId> {
    let mut leaves = HashSet::new();
    let mut stack: Vec<ShadowId> = shadow
        .children(anchor)
        .iter()
        .skip(from_index)
        .copied()
        .collect();

    while let Some(node) = stack.pop() {
        if shadow.children(node).is_empty() {
            leaves.insert(node);
        } else {
            stack.extend(shadow.children(node).iter().copied());
        }
    }

    leaves
}

/// Renders a path as alternating kind and direction tokens.
///
/// Panics if two neighboring path nodes are not in a direct parent/child
/// relation; that means the extraction invariants were violated upstream.
pub fn render_path(tree: &SourceTree, shadow: &ShadowTree, path: &[ShadowId]) -> Vec<String> {
    let mut rendered = Vec::with_capacity(path.len() * 2);
    for (index, &node) in path.iter().enumerate() {
        rendered.push(kind_of_shadow(tree, shadow, node));

        let Some(&next) = path.get(index + 1) else {
            continue;
        };
        let direction = if shadow.parent(next) == Some(node) {
            DOWN_ARROW
        } else if shadow.parent(node) == Some(next) {
            UP_ARROW
        } else {
            panic!("neighbouring path nodes aren't <parent, child> or <child, parent>");
        };
        rendered.push(direction.to_string());
    }

    rendered
}

/// Kinds only, no direction markers.
pub fn path_kinds(tree: &SourceTree, shadow: &ShadowTree, path: &[ShadowId]) -> Vec<String> {
    path.iter()
        .map(|&node| kind_of_shadow(tree, shadow, node))
        .collect()
}
