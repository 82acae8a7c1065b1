//! The synthesis state machine
//!
//!     One session grows one tree. The frontier of open nodes is kept
//!     innermost-last; every predicted fragment is spliced under the
//!     deepest open node and becomes the new deepest open node itself, so
//!     growth is depth-first. The AFTER_LAST prediction closes the deepest
//!     open node instead.
//!
//!     When the last open node closes, the semantic checker has the final
//!     word. A broken tree re-opens that node and charges one attempt;
//!     [`MAX_ATTEMPTS`] failed validations end the session as a failure.

use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use treepath_core::dataset::{sample_for_anchor, IntegerSample, Vocabulary};
use treepath_core::shadow::ShadowTree;
use treepath_core::tree::{NodeId, SourceTree};

use crate::decode::{DecodeOutcome, KindRegistry};
use crate::error::SynthesisResult;
use crate::resolve::resolve_identifier;
use crate::types::{CheckReport, SemanticChecker, TypeCatalog};

/// Failed final validations a session survives.
pub const MAX_ATTEMPTS: u32 = 10;

/// Everything a session carries between steps.
#[derive(Debug, Clone)]
pub struct SynthesisState {
    pub tree: SourceTree,
    /// Open nodes, innermost last.
    pub not_finished: Vec<NodeId>,
    pub attempts: u32,
    /// Types the model predicted for synthesized nodes, for the final
    /// prediction-versus-checker comparison.
    pub predicted_types: BTreeMap<NodeId, i64>,
}

impl SynthesisState {
    pub fn new(tree: SourceTree, not_finished: Vec<NodeId>) -> Self {
        SynthesisState {
            tree,
            not_finished,
            attempts: 0,
            predicted_types: BTreeMap::new(),
        }
    }

    /// The deepest open node, the current splice point.
    pub fn open_node(&self) -> Option<NodeId> {
        self.not_finished.last().copied()
    }
}

/// The answer a driver sends back to the model after each step.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum StepResponse {
    /// The tree is complete and the checker is satisfied.
    #[serde(rename_all = "camelCase")]
    Success { type_comparison: Vec<bool> },
    /// The attempt budget is exhausted.
    #[serde(rename_all = "camelCase")]
    Fail { type_comparison: Vec<bool> },
    /// The session continues; these are the features for the next
    /// prediction, together with the catalog of types the model may
    /// answer with. The catalog rides along on every step so a driver
    /// never has to correlate a response with an earlier one.
    Paths {
        sample: IntegerSample,
        catalog: TypeCatalog,
    },
}

/// Applies one model prediction to the session.
pub fn advance<R: Rng>(
    state: &mut SynthesisState,
    predicted_kind: &str,
    predicted_type: Option<i64>,
    registry: &KindRegistry,
    checker: &dyn SemanticChecker,
    catalog: &TypeCatalog,
    vocab: &Vocabulary,
    rng: &mut R,
) -> SynthesisResult<StepResponse> {
    let Some(open) = state.open_node() else {
        // Nothing left to grow; the prior step already reported the
        // verdict, repeat it idempotently.
        return Ok(final_verdict(state, checker));
    };

    match registry.decode(&mut state.tree, predicted_kind)? {
        DecodeOutcome::Fragment(node) => {
            state.tree.append_child(open, node);

            if state.tree.tag(node) == "REFERENCE_EXPRESSION" && state.tree.text(node).is_empty() {
                let report = checker.check(&state.tree);
                let name =
                    resolve_identifier(&state.tree, &report, catalog, node, predicted_type, rng)?;
                state.tree.set_text(node, name);
            }
            if let Some(type_id) = predicted_type {
                state.predicted_types.insert(node, type_id);
            }

            state.not_finished.push(node);
            Ok(StepResponse::Paths {
                sample: next_paths(state, checker, vocab)?,
                catalog: catalog.clone(),
            })
        }
        DecodeOutcome::Stop => {
            state.not_finished.pop();
            if !state.not_finished.is_empty() {
                return Ok(StepResponse::Paths {
                    sample: next_paths(state, checker, vocab)?,
                    catalog: catalog.clone(),
                });
            }

            let report = checker.check(&state.tree);
            if !report.has_errors {
                return Ok(StepResponse::Success {
                    type_comparison: type_comparison(state, &report),
                });
            }

            state.attempts += 1;
            if state.attempts >= MAX_ATTEMPTS {
                return Ok(StepResponse::Fail {
                    type_comparison: type_comparison(state, &report),
                });
            }

            // Refuse the close: the node stays open and the model gets
            // another try at finishing it.
            state.not_finished.push(open);
            Ok(StepResponse::Paths {
                sample: next_paths(state, checker, vocab)?,
                catalog: catalog.clone(),
            })
        }
    }
}

fn final_verdict(state: &SynthesisState, checker: &dyn SemanticChecker) -> StepResponse {
    let report = checker.check(&state.tree);
    let type_comparison = type_comparison(state, &report);
    if report.has_errors {
        StepResponse::Fail { type_comparison }
    } else {
        StepResponse::Success { type_comparison }
    }
}

/// Prediction features for the current splice point.
pub(crate) fn next_paths(
    state: &SynthesisState,
    checker: &dyn SemanticChecker,
    vocab: &Vocabulary,
) -> SynthesisResult<IntegerSample> {
    let open = state
        .open_node()
        .expect("next_paths is only reached with an open node");

    let except: HashSet<NodeId> = state.not_finished.iter().copied().collect();
    let mut shadow = ShadowTree::build(&state.tree);
    shadow.add_after_last(&except);

    let anchor = shadow
        .find_source(open)
        .expect("open nodes are elements reachable from the root");
    let child_index = shadow.children(anchor).len();

    // Checker knowledge wins over the model's own predictions.
    let mut type_ids = checker.check(&state.tree).type_ids();
    for (&node, &type_id) in &state.predicted_types {
        type_ids.entry(node).or_insert(type_id);
    }

    let sample = sample_for_anchor(
        &state.tree,
        &shadow,
        anchor,
        child_index,
        None,
        Some(&type_ids),
    );
    Ok(sample.to_integer(vocab)?)
}

/// One verdict per node the model typed, preorder: does the checker
/// agree with the predicted type?
fn type_comparison(state: &SynthesisState, report: &CheckReport) -> Vec<bool> {
    if state.tree.is_empty() {
        return Vec::new();
    }
    state
        .tree
        .descendants(state.tree.root())
        .into_iter()
        .filter_map(|node| {
            let predicted = state.predicted_types.get(&node)?;
            let real = report.typed(node).and_then(|typed| typed.type_id);
            Some(real == Some(*predicted))
        })
        .collect()
}
