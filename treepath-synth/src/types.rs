//! Semantic checking seam and the type catalog
//!
//!     Synthesis never understands the language it grows; it asks a
//!     [`SemanticChecker`] after every closed node. The checker answers
//!     with a [`CheckReport`]: per-node type ids, the names visible at
//!     each node, and a single has-errors verdict. The report is the only
//!     channel between language knowledge and the synthesis loop.
//!
//!     The [`TypeCatalog`] is the model-facing description of those type
//!     ids: classes, their supertypes, properties and functions, keyed by
//!     the same ids the report uses.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use treepath_core::tree::{NodeCategory, NodeId, SourceTree};

/// A callable member of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSpec {
    pub name: String,
    pub parameters: Vec<i64>,
    pub return_type: i64,
}

/// One class known to the checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSpec {
    pub id: i64,
    pub name: String,
    pub is_basic: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub super_types: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<(String, i64)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionSpec>,
}

/// All classes the current session can mention, keyed by type id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeCatalog {
    pub classes: Vec<ClassSpec>,
}

impl TypeCatalog {
    pub fn lookup(&self, id: i64) -> Option<&ClassSpec> {
        self.classes.iter().find(|class| class.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A name in scope at some node, with its type when known.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeEntry {
    pub name: String,
    pub type_id: Option<i64>,
}

/// Per-node checker output.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedNode {
    pub node: NodeId,
    pub type_id: Option<i64>,
    pub visible: Vec<ScopeEntry>,
}

/// Checker verdict over a whole tree.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub typed_nodes: Vec<TypedNode>,
    pub has_errors: bool,
}

impl CheckReport {
    pub fn typed(&self, node: NodeId) -> Option<&TypedNode> {
        self.typed_nodes.iter().find(|typed| typed.node == node)
    }

    /// The per-node type map in the shape path features consume.
    pub fn type_ids(&self) -> HashMap<NodeId, i64> {
        self.typed_nodes
            .iter()
            .filter_map(|typed| typed.type_id.map(|id| (typed.node, id)))
            .collect()
    }
}

/// The language seam: given a (possibly partial) tree, report types,
/// visible names and whether the tree is semantically broken.
pub trait SemanticChecker {
    fn check(&self, tree: &SourceTree) -> CheckReport;
}

/// Structural well-formedness rules a minimal host can enforce without a
/// real compiler front end. Declared names become visible to every node
/// in the declaring scope's subtree after the declaration.
#[derive(Debug, Clone, Default)]
pub struct WellFormedChecker {
    /// Names visible everywhere, e.g. top-level functions of the host
    /// program. Used directly by tests.
    pub ambient: Vec<ScopeEntry>,
}

impl WellFormedChecker {
    pub fn new() -> Self {
        WellFormedChecker::default()
    }

    pub fn with_ambient(ambient: Vec<ScopeEntry>) -> Self {
        WellFormedChecker { ambient }
    }

    fn node_is_broken(&self, tree: &SourceTree, node: NodeId) -> bool {
        let element_children = tree.element_children(node);
        let has_child = |tag: &str| {
            element_children
                .iter()
                .any(|&child| tree.tag(child) == tag)
        };

        match tree.tag(node) {
            "WHILE" => !has_child("CONDITION") || !has_child("BODY"),
            "IF" => !has_child("CONDITION") || !has_child("THEN"),
            "CALL_EXPRESSION" => {
                element_children.len() < 2 || !has_child("VALUE_ARGUMENT_LIST")
            }
            "BINARY_EXPRESSION" => element_children.len() != 3,
            "REFERENCE_EXPRESSION" => tree.text(node).is_empty(),
            _ => false,
        }
    }

    fn declared_name(&self, tree: &SourceTree, node: NodeId) -> Option<ScopeEntry> {
        match tree.tag(node) {
            "PROPERTY" | "VALUE_PARAMETER" => {
                let name = tree
                    .children(node)
                    .iter()
                    .find(|&&child| {
                        tree.category(child) == NodeCategory::Token
                            && tree.tag(child) == "IDENTIFIER"
                    })
                    .map(|&child| tree.text(child).to_string())
                    .filter(|name| !name.is_empty())?;
                Some(ScopeEntry {
                    name,
                    type_id: None,
                })
            }
            _ => None,
        }
    }
}

/// Tags that open a name scope; declarations live until their owner is
/// left, so a property stays visible to later statements of its block.
const SCOPE_OWNERS: &[&str] = &["FILE", "CLASS_BODY", "BLOCK", "FUN"];

enum WalkFrame {
    Enter(NodeId),
    LeaveScope(usize),
}

impl SemanticChecker for WellFormedChecker {
    fn check(&self, tree: &SourceTree) -> CheckReport {
        let mut report = CheckReport::default();
        if tree.is_empty() {
            return report;
        }

        // Preorder walk; names declared earlier in an enclosing scope are
        // visible to every later node until the scope owner is left.
        let mut stack = vec![WalkFrame::Enter(tree.root())];
        let mut scope: Vec<ScopeEntry> = self.ambient.clone();

        while let Some(frame) = stack.pop() {
            let node = match frame {
                WalkFrame::LeaveScope(len) => {
                    scope.truncate(len);
                    continue;
                }
                WalkFrame::Enter(node) => node,
            };

            if self.node_is_broken(tree, node) {
                report.has_errors = true;
            }
            report.typed_nodes.push(TypedNode {
                node,
                type_id: None,
                visible: scope.clone(),
            });

            if let Some(entry) = self.declared_name(tree, node) {
                scope.push(entry);
            }

            if SCOPE_OWNERS.contains(&tree.tag(node)) {
                stack.push(WalkFrame::LeaveScope(scope.len()));
            }
            for &child in tree.element_children(node).iter().rev() {
                stack.push(WalkFrame::Enter(child));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treepath_core::tree::TreeBuilder;

    #[test]
    fn headless_while_is_an_error() {
        let mut builder = TreeBuilder::new("FILE");
        builder.open("BLOCK").leaf("WHILE", "").close();
        let tree = builder.build();

        let report = WellFormedChecker::new().check(&tree);
        assert!(report.has_errors);
    }

    #[test]
    fn complete_while_passes() {
        let mut builder = TreeBuilder::new("FILE");
        builder
            .open("WHILE")
            .open("CONDITION")
            .leaf("REFERENCE_EXPRESSION", "x")
            .close()
            .open("BODY")
            .leaf("BLOCK", "")
            .close()
            .close();
        let tree = builder.build();

        let report = WellFormedChecker::new().check(&tree);
        assert!(!report.has_errors);
    }

    #[test]
    fn parameter_names_become_visible_below() {
        let mut builder = TreeBuilder::new("FILE");
        builder
            .open("FUN")
            .open("VALUE_PARAMETER_LIST")
            .open("VALUE_PARAMETER")
            .token("IDENTIFIER", "x")
            .close()
            .close()
            .open("BLOCK")
            .leaf("CALL_SITE", "");
        let call_site = builder.last_added();
        builder.close().close();
        let tree = builder.build();

        let report = WellFormedChecker::new().check(&tree);
        let typed = report.typed(call_site).expect("every element is typed");
        assert!(typed.visible.iter().any(|entry| entry.name == "x"));
    }

    #[test]
    fn ambient_names_are_visible_everywhere() {
        let tree = {
            let mut builder = TreeBuilder::new("FILE");
            builder.leaf("CLASS", "");
            builder.build()
        };
        let checker = WellFormedChecker::with_ambient(vec![ScopeEntry {
            name: "print".to_string(),
            type_id: Some(3),
        }]);

        let report = checker.check(&tree);
        for typed in &report.typed_nodes {
            assert!(typed.visible.iter().any(|entry| entry.name == "print"));
        }
    }
}
