//! Identifier resolution for synthesized references
//!
//!     A decoded REFERENCE_EXPRESSION arrives nameless; the model predicts
//!     structure, not identifiers. The name is drawn from what is actually
//!     visible at the splice point: the nearest enclosing node the checker
//!     reported a scope for. When the model also predicted a type, names
//!     whose type is the predicted one (or a catalog subtype of it) are
//!     preferred; if none match, any visible name will do rather than
//!     failing the whole step.

use rand::seq::SliceRandom;
use rand::Rng;

use treepath_core::tree::{NodeId, SourceTree};

use crate::error::ResolveError;
use crate::types::{CheckReport, ScopeEntry, TypeCatalog};

/// Picks a visible name for the node spliced in at `node`, preferring
/// entries assignable to `predicted_type` under `catalog`.
pub fn resolve_identifier<R: Rng>(
    tree: &SourceTree,
    report: &CheckReport,
    catalog: &TypeCatalog,
    node: NodeId,
    predicted_type: Option<i64>,
    rng: &mut R,
) -> Result<String, ResolveError> {
    let visible = visible_at(tree, report, node).ok_or(ResolveError::NoVisibleNames)?;
    if visible.is_empty() {
        return Err(ResolveError::NoVisibleNames);
    }

    let matching: Vec<&ScopeEntry> = match predicted_type {
        Some(wanted) => visible
            .iter()
            .filter(|entry| {
                entry
                    .type_id
                    .is_some_and(|actual| assignable(catalog, actual, wanted))
            })
            .collect(),
        None => Vec::new(),
    };

    let pool: Vec<&ScopeEntry> = if matching.is_empty() {
        visible.iter().collect()
    } else {
        matching
    };
    let chosen = pool.choose(rng).expect("pool is non-empty");
    Ok(chosen.name.clone())
}

/// A name of type `actual` fills a slot of type `wanted` when the types
/// are equal or the catalog lists `wanted` among `actual`'s supertypes,
/// transitively.
fn assignable(catalog: &TypeCatalog, actual: i64, wanted: i64) -> bool {
    if actual == wanted {
        return true;
    }
    let Some(class) = catalog.lookup(actual) else {
        return false;
    };
    class
        .super_types
        .iter()
        .any(|&super_type| assignable(catalog, super_type, wanted))
}

/// The scope at `node`: its own report entry if present, otherwise the
/// nearest reported ancestor's.
fn visible_at<'a>(
    tree: &SourceTree,
    report: &'a CheckReport,
    node: NodeId,
) -> Option<&'a [ScopeEntry]> {
    let mut current = Some(node);
    while let Some(at) = current {
        if let Some(typed) = report.typed(at) {
            return Some(&typed.visible);
        }
        current = tree.parent(at);
    }
    None
}
