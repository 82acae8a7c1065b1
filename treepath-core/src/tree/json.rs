//! JSON interchange for source trees
//!
//!     One JSON object per node: `{kind, text, finished, children}`.
//!     `finished: false` marks members of the synthesis frontier; decoding
//!     restores them outer-first, so the innermost open node ends up last,
//!     which is the frontier's stack order.
//!
//!     Encoding takes an optional `except` node: once it is met among a
//!     parent's children, later *element* siblings are left out of the
//!     snapshot (they are the still-unpredicted future), while token
//!     children such as closing delimiters are always kept so the decoded
//!     container stays well-formed.
//!
//!     `category` is an addition over the minimal wire shape: it records
//!     token/trivia nodes so a round trip preserves them. It is omitted
//!     for plain element nodes and defaults accordingly, so snapshots from
//!     hosts that only write the four base fields still load.

use serde::{Deserialize, Serialize};

use super::{NodeCategory, NodeId, SourceTree};
use crate::error::{TreeJsonError, TreeJsonResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonTree {
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub finished: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<JsonCategory>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonTree>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JsonCategory {
    Element,
    Token,
    Trivia,
}

fn default_true() -> bool {
    true
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_true(flag: &bool) -> bool {
    *flag
}

impl From<NodeCategory> for Option<JsonCategory> {
    fn from(category: NodeCategory) -> Self {
        match category {
            NodeCategory::Element => None,
            NodeCategory::Token => Some(JsonCategory::Token),
            NodeCategory::Trivia => Some(JsonCategory::Trivia),
        }
    }
}

impl From<Option<JsonCategory>> for NodeCategory {
    fn from(category: Option<JsonCategory>) -> Self {
        match category {
            None | Some(JsonCategory::Element) => NodeCategory::Element,
            Some(JsonCategory::Token) => NodeCategory::Token,
            Some(JsonCategory::Trivia) => NodeCategory::Trivia,
        }
    }
}

/// Serializes the subtree at the root, marking `not_finished` members and
/// cutting element siblings after `except`.
pub fn encode(tree: &SourceTree, except: Option<NodeId>, not_finished: &[NodeId]) -> JsonTree {
    encode_node(tree, tree.root(), except, not_finished)
}

fn encode_node(
    tree: &SourceTree,
    node: NodeId,
    except: Option<NodeId>,
    not_finished: &[NodeId],
) -> JsonTree {
    let mut encoded = JsonTree {
        kind: tree.tag(node).to_string(),
        text: tree.text(node).to_string(),
        finished: !not_finished.contains(&node),
        category: tree.category(node).into(),
        children: Vec::new(),
    };

    let mut skip_inner = false;
    for &child in tree.children(node) {
        if Some(child) == except {
            skip_inner = true;
        }

        match tree.category(child) {
            NodeCategory::Token | NodeCategory::Trivia => {
                encoded.children.push(JsonTree {
                    kind: tree.tag(child).to_string(),
                    text: tree.text(child).to_string(),
                    finished: true,
                    category: tree.category(child).into(),
                    children: Vec::new(),
                });
            }
            NodeCategory::Element if !skip_inner => {
                encoded
                    .children
                    .push(encode_node(tree, child, except, not_finished));
            }
            NodeCategory::Element => {}
        }
    }

    encoded
}

/// Rebuilds a tree and its frontier (innermost open node last).
pub fn decode(json: &JsonTree) -> (SourceTree, Vec<NodeId>) {
    let mut tree = SourceTree::new();
    let mut not_finished = Vec::new();
    decode_node(json, &mut tree, None, &mut not_finished);
    (tree, not_finished)
}

fn decode_node(
    json: &JsonTree,
    tree: &mut SourceTree,
    parent: Option<NodeId>,
    not_finished: &mut Vec<NodeId>,
) -> NodeId {
    let node = tree.new_detached(json.kind.clone(), json.text.clone(), json.category.into());
    if let Some(parent) = parent {
        tree.push_child(parent, node);
    }
    if !json.finished {
        not_finished.push(node);
    }

    for child in &json.children {
        decode_node(child, tree, Some(node), not_finished);
    }

    node
}

pub fn to_json_string(tree: &SourceTree, not_finished: &[NodeId]) -> TreeJsonResult<String> {
    serde_json::to_string(&encode(tree, None, not_finished)).map_err(TreeJsonError::Json)
}

pub fn from_json_str(json: &str) -> TreeJsonResult<(SourceTree, Vec<NodeId>)> {
    let parsed: JsonTree = serde_json::from_str(json).map_err(TreeJsonError::Json)?;
    Ok(decode(&parsed))
}
