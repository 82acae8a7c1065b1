//! Node-kind classification
//!
//!     Every node maps to exactly one symbolic string label. Tokens keep
//!     their raw tag; elements keep their structural tag, suffixed with a
//!     disambiguating fragment for the handful of categories where the
//!     bare tag carries too little signal for a prediction model
//!     (references, literals, operators, string-template entries).
//!
//!     Declaration kinds are deliberately *not* suffixed with the declared
//!     name: root paths are built from declaration kinds, and the dataset
//!     contract fixes those as bare tags (`FUN`, `CLASS`, ...).
//!
//!     `AFTER_LAST` is reserved for the sentinel and never produced for a
//!     real node; classification never fails, unrecognized nodes fall back
//!     to a diagnostic string so extraction survives malformed input.

use crate::shadow::{Origin, ShadowId, ShadowTree};
use crate::tree::{NodeCategory, NodeId, SourceTree};

/// Sentinel kind meaning "no more children at this position".
pub const AFTER_LAST_KIND: &str = "AFTER_LAST";

/// Direction marker: parent to child.
pub const DOWN_ARROW: &str = "↓";
/// Direction marker: child to parent.
pub const UP_ARROW: &str = "↑";

/// Element tags whose kind carries the node text as a suffix.
const TEXT_SUFFIXED: &[&str] = &[
    "REFERENCE_EXPRESSION",
    "OPERATION_REFERENCE",
    "INTEGER_CONSTANT",
    "FLOAT_CONSTANT",
    "BOOLEAN_CONSTANT",
    "CHARACTER_CONSTANT",
    "NULL",
];

/// Element tags rendered with their text quoted (string pieces).
const QUOTE_SUFFIXED: &[&str] = &["LITERAL_STRING_TEMPLATE_ENTRY", "ESCAPE_STRING_TEMPLATE_ENTRY"];

/// Symbolic kind of a concrete node.
pub fn kind_of(tree: &SourceTree, node: NodeId) -> String {
    let tag = tree.tag(node);
    if tag.is_empty() {
        return format!("UNKNOWN_KIND: {:?}", node);
    }

    match tree.category(node) {
        NodeCategory::Token | NodeCategory::Trivia => tag.to_string(),
        NodeCategory::Element => {
            let text = tree.text(node);
            if text.is_empty() {
                tag.to_string()
            } else if TEXT_SUFFIXED.contains(&tag) {
                format!("{} {}", tag, text)
            } else if QUOTE_SUFFIXED.contains(&tag) {
                format!("{} \"{}\"", tag, text)
            } else {
                tag.to_string()
            }
        }
    }
}

/// Symbolic kind of a shadow node; sentinels classify unconditionally.
pub fn kind_of_shadow(tree: &SourceTree, shadow: &ShadowTree, node: ShadowId) -> String {
    match shadow.origin(node) {
        Origin::AfterLast => AFTER_LAST_KIND.to_string(),
        Origin::Source(original) => kind_of(tree, original),
    }
}
