//! Dataset sample model
//!
//!     One sample per chosen target position: the leaf paths and root
//!     path of the target's anchor, the kinds of the siblings already in
//!     place before the target, the target's index among them, and (for
//!     training data) the target's own kind. Field names on the wire are
//!     camelCase, matching the established dataset format.
//!
//!     Samples are coded to integers through a [`Vocabulary`] before use;
//!     that substitution is total and fails loudly on a missing token.
//!     Oversized samples are dropped outright rather than truncated,
//!     since cutting a path would silently change its meaning.

pub mod vocab;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::VocabularyResult;
use crate::kind::{kind_of_shadow, AFTER_LAST_KIND};
use crate::paths::{leaf_paths, render_path, root_path};
use crate::shadow::{Origin, ShadowId, ShadowTree};
use crate::tree::{NodeId, SourceTree};
pub use vocab::Vocabulary;

/// Limits beyond which a sample is dropped.
const MAX_LEAF_PATHS: usize = 1000;
const MAX_PATH_TOKENS: usize = 60;
const MAX_SIBLING_INDEX: usize = 15;

/// Type id attached to path positions with no known type.
pub const NO_TYPE: i64 = -1;

/// A string-token dataset sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSample {
    pub leaf_paths: Vec<Vec<String>>,
    pub root_path: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types_for_leaf_paths: Vec<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types_for_root_path: Vec<i64>,
    pub left_brothers: Vec<String>,
    pub index_among_brothers: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// The same sample shape after vocabulary substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegerSample {
    pub leaf_paths: Vec<Vec<i64>>,
    pub root_path: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types_for_leaf_paths: Vec<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types_for_root_path: Vec<i64>,
    pub left_brothers: Vec<i64>,
    pub index_among_brothers: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<i64>,
}

impl DatasetSample {
    /// Total substitution of every token through the vocabulary.
    pub fn to_integer(&self, vocab: &Vocabulary) -> VocabularyResult<IntegerSample> {
        let code_path = |path: &Vec<String>| -> VocabularyResult<Vec<i64>> {
            path.iter().map(|token| vocab.id(token)).collect()
        };

        Ok(IntegerSample {
            leaf_paths: self
                .leaf_paths
                .iter()
                .map(code_path)
                .collect::<VocabularyResult<_>>()?,
            root_path: code_path(&self.root_path)?,
            types_for_leaf_paths: self.types_for_leaf_paths.clone(),
            types_for_root_path: self.types_for_root_path.clone(),
            left_brothers: self
                .left_brothers
                .iter()
                .map(|token| vocab.id(token))
                .collect::<VocabularyResult<_>>()?,
            index_among_brothers: self.index_among_brothers,
            target: self
                .target
                .as_deref()
                .map(|token| vocab.id(token))
                .transpose()?,
        })
    }

    /// Every string token of the sample, in substitution order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.leaf_paths
            .iter()
            .flatten()
            .chain(self.root_path.iter())
            .chain(self.left_brothers.iter())
            .chain(self.target.iter())
            .map(String::as_str)
    }

    /// Tractability filter; violating samples are dropped, never cut.
    pub fn is_not_too_big(&self) -> bool {
        self.leaf_paths.len() <= MAX_LEAF_PATHS
            && self
                .leaf_paths
                .iter()
                .all(|path| path.len() <= MAX_PATH_TOKENS)
            && self.index_among_brothers <= MAX_SIBLING_INDEX
    }
}

impl IntegerSample {
    /// Inverse substitution; reconstructs the string sample exactly.
    pub fn to_strings(&self, vocab: &Vocabulary) -> VocabularyResult<DatasetSample> {
        let decode_path = |path: &Vec<i64>| -> VocabularyResult<Vec<String>> {
            path.iter().map(|&id| vocab.token(id)).collect()
        };

        Ok(DatasetSample {
            leaf_paths: self
                .leaf_paths
                .iter()
                .map(decode_path)
                .collect::<VocabularyResult<_>>()?,
            root_path: decode_path(&self.root_path)?,
            types_for_leaf_paths: self.types_for_leaf_paths.clone(),
            types_for_root_path: self.types_for_root_path.clone(),
            left_brothers: self
                .left_brothers
                .iter()
                .map(|&id| vocab.token(id))
                .collect::<VocabularyResult<_>>()?,
            index_among_brothers: self.index_among_brothers,
            target: self.target.map(|id| vocab.token(id)).transpose()?,
        })
    }
}

/// Drops oversized samples from a batch.
pub fn skip_too_big(samples: Vec<DatasetSample>) -> Vec<DatasetSample> {
    samples
        .into_iter()
        .filter(DatasetSample::is_not_too_big)
        .collect()
}

/// Builds the sample for a prediction position: `anchor` is the node
/// receiving a child at `child_index`, `target` the training label if the
/// answer is known. `type_ids` attaches per-node type information when
/// the host supplied any.
pub fn sample_for_anchor(
    tree: &SourceTree,
    shadow: &ShadowTree,
    anchor: ShadowId,
    child_index: usize,
    target: Option<ShadowId>,
    type_ids: Option<&HashMap<NodeId, i64>>,
) -> DatasetSample {
    let leaf = leaf_paths(shadow, anchor, child_index, true);
    let root = root_path(shadow, anchor);

    let types_for_leaf_paths = match type_ids {
        Some(map) => leaf
            .iter()
            .map(|path| path_type_ids(shadow, path, map))
            .collect(),
        None => Vec::new(),
    };
    let types_for_root_path = match type_ids {
        Some(map) => path_type_ids(shadow, &root, map),
        None => Vec::new(),
    };

    DatasetSample {
        leaf_paths: leaf
            .iter()
            .map(|path| render_path(tree, shadow, path))
            .collect(),
        root_path: render_path(tree, shadow, &root),
        types_for_leaf_paths,
        types_for_root_path,
        left_brothers: shadow
            .children(anchor)
            .iter()
            .take(child_index)
            .map(|&sibling| kind_of_shadow(tree, shadow, sibling))
            .collect(),
        index_among_brothers: child_index,
        target: target.map(|node| kind_of_shadow(tree, shadow, node)),
    }
}

/// One type id per path node (not per direction token); sentinels and
/// untyped nodes code as [`NO_TYPE`].
fn path_type_ids(shadow: &ShadowTree, path: &[ShadowId], map: &HashMap<NodeId, i64>) -> Vec<i64> {
    path.iter()
        .map(|&node| match shadow.origin(node) {
            Origin::AfterLast => NO_TYPE,
            Origin::Source(original) => map.get(&original).copied().unwrap_or(NO_TYPE),
        })
        .collect()
}

/// Convenience: the training sample for a chosen target node.
///
/// The anchor is the target's parent; returns `None` for the shadow root,
/// which has no prediction position.
pub fn sample_for_target(
    tree: &SourceTree,
    shadow: &ShadowTree,
    target: ShadowId,
    type_ids: Option<&HashMap<NodeId, i64>>,
) -> Option<DatasetSample> {
    let anchor = shadow.parent(target)?;
    let child_index = shadow
        .index_in_parent(target)
        .expect("target has a parent, so it has an index");
    Some(sample_for_anchor(
        tree,
        shadow,
        anchor,
        child_index,
        Some(target),
        type_ids,
    ))
}

/// True when the sample's target is the AFTER_LAST sentinel.
pub fn targets_sentinel(sample: &DatasetSample) -> bool {
    sample.target.as_deref() == Some(AFTER_LAST_KIND)
}
