//! Session persistence between steps
//!
//!     A session lives in a directory, one file per concern: the working
//!     tree with its frontier marks, the attempt counter, and the types
//!     the model has predicted so far. Every step overwrites the trio, so
//!     the directory always holds exactly the latest resumable state.
//!
//!     Node ids do not survive a tree round trip; predicted types are
//!     therefore keyed by the node's position in the serialized tree,
//!     which decoding reassigns deterministically (ids are allocated in
//!     serialization order).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use treepath_core::tree::json;
use treepath_core::tree::{NodeCategory, NodeId, SourceTree};

use crate::error::{SnapshotError, SnapshotResult};
use crate::session::SynthesisState;

pub const TREE_FILE: &str = "tree.json";
pub const ATTEMPTS_FILE: &str = "attempts.json";
pub const PREDICTED_TYPES_FILE: &str = "predicted_types.json";

#[derive(Debug, Serialize, Deserialize)]
struct AttemptsFile {
    attempts: u32,
}

/// Writes the session into `dir`, cutting element siblings after
/// `except` exactly as the tree serializer does.
pub fn save(dir: &Path, state: &SynthesisState, except: Option<NodeId>) -> SnapshotResult<()> {
    let encoded = json::encode(&state.tree, except, &state.not_finished);
    fs::write(dir.join(TREE_FILE), serde_json::to_string(&encoded)?)?;

    fs::write(
        dir.join(ATTEMPTS_FILE),
        serde_json::to_string(&AttemptsFile {
            attempts: state.attempts,
        })?,
    )?;

    let positions = serialized_positions(&state.tree, except);
    let by_position: BTreeMap<usize, i64> = state
        .predicted_types
        .iter()
        .filter_map(|(&node, &type_id)| Some((*positions.get(&node)?, type_id)))
        .collect();
    fs::write(
        dir.join(PREDICTED_TYPES_FILE),
        serde_json::to_string(&by_position)?,
    )?;

    Ok(())
}

/// Restores the session saved by [`save`].
pub fn load(dir: &Path) -> SnapshotResult<SynthesisState> {
    let tree_text = fs::read_to_string(dir.join(TREE_FILE))?;
    let (tree, not_finished) = json::from_json_str(&tree_text).map_err(SnapshotError::Tree)?;

    let attempts_text = fs::read_to_string(dir.join(ATTEMPTS_FILE))?;
    let attempts: AttemptsFile = serde_json::from_str(&attempts_text)?;

    let types_text = fs::read_to_string(dir.join(PREDICTED_TYPES_FILE))?;
    let by_position: BTreeMap<usize, i64> = serde_json::from_str(&types_text)?;

    let mut state = SynthesisState::new(tree, not_finished);
    state.attempts = attempts.attempts;
    // Decoding allocates ids in serialization order, so the position is
    // the id.
    state.predicted_types = by_position
        .into_iter()
        .map(|(position, type_id)| (node_at(&state.tree, position), type_id))
        .collect();
    Ok(state)
}

fn node_at(tree: &SourceTree, position: usize) -> NodeId {
    *tree
        .descendants(tree.root())
        .get(position)
        .expect("predicted type positions lie inside the saved tree")
}

/// Position each node will occupy in the serialized tree; mirrors the
/// serializer's traversal, including the cut after `except`.
fn serialized_positions(tree: &SourceTree, except: Option<NodeId>) -> BTreeMap<NodeId, usize> {
    let mut positions = BTreeMap::new();
    if tree.is_empty() {
        return positions;
    }

    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        positions.insert(node, positions.len());

        let mut kept = Vec::new();
        let mut skip_inner = false;
        for &child in tree.children(node) {
            if Some(child) == except {
                skip_inner = true;
            }
            match tree.category(child) {
                NodeCategory::Token | NodeCategory::Trivia => kept.push(child),
                NodeCategory::Element if !skip_inner => kept.push(child),
                NodeCategory::Element => {}
            }
        }
        for &child in kept.iter().rev() {
            stack.push(child);
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use treepath_core::tree::TreeBuilder;

    fn open_block_state() -> SynthesisState {
        let mut builder = TreeBuilder::new("FILE");
        builder
            .open("FUN")
            .open("BLOCK")
            .token("LBRACE", "{")
            .leaf("WHILE", "")
            .token("RBRACE", "}")
            .close()
            .close();
        let tree = builder.build();
        let fun = tree.children(tree.root())[0];
        let block = tree.children(fun)[0];
        let root = tree.root();
        SynthesisState::new(tree, vec![root, fun, block])
    }

    #[test]
    fn round_trip_restores_tree_frontier_and_attempts() {
        let dir = tempdir().expect("temp dir");
        let mut state = open_block_state();
        state.attempts = 3;

        save(dir.path(), &state, None).expect("save succeeds");
        let loaded = load(dir.path()).expect("load succeeds");

        assert_eq!(loaded.attempts, 3);
        assert_eq!(loaded.not_finished.len(), 3);
        let open = loaded.open_node().expect("frontier survives");
        assert_eq!(loaded.tree.tag(open), "BLOCK");
        assert_eq!(loaded.tree.len(), state.tree.len());
    }

    #[test]
    fn predicted_types_survive_shifting_node_ids() {
        let dir = tempdir().expect("temp dir");
        let mut state = open_block_state();
        let while_node = state
            .tree
            .descendants(state.tree.root())
            .into_iter()
            .find(|&node| state.tree.tag(node) == "WHILE")
            .expect("present");
        state.predicted_types.insert(while_node, 42);

        save(dir.path(), &state, None).expect("save succeeds");
        let loaded = load(dir.path()).expect("load succeeds");

        let (&restored, &type_id) = loaded
            .predicted_types
            .iter()
            .next()
            .expect("one prediction survives");
        assert_eq!(loaded.tree.tag(restored), "WHILE");
        assert_eq!(type_id, 42);
    }

    #[test]
    fn except_cuts_the_target_from_the_snapshot() {
        let dir = tempdir().expect("temp dir");
        let state = open_block_state();
        let while_node = state
            .tree
            .descendants(state.tree.root())
            .into_iter()
            .find(|&node| state.tree.tag(node) == "WHILE")
            .expect("present");

        save(dir.path(), &state, Some(while_node)).expect("save succeeds");
        let loaded = load(dir.path()).expect("load succeeds");

        assert!(!loaded
            .tree
            .descendants(loaded.tree.root())
            .into_iter()
            .any(|node| loaded.tree.tag(node) == "WHILE"));
        // The braces stay so the container is still well delimited.
        let open = loaded.open_node().expect("frontier survives");
        assert_eq!(loaded.tree.children(open).len(), 2);
    }
}
