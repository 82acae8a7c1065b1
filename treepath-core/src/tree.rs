//! Owned source-tree arena
//!
//!     The host compiler's syntax tree is external; this arena mirrors the
//!     slice of it the pipeline works on. Nodes are addressed by [`NodeId`]
//!     (a plain index), so tree walks are explicit loops over ids rather
//!     than deep call-stack recursion, and the synthesis frontier can hold
//!     ids without borrowing the tree.
//!
//!     Three node categories exist:
//!
//!         - Element: a semantically meaningful interior node (the only
//!           category the shadow tree wraps)
//!         - Token: a lexical leaf (braces, keywords, identifiers)
//!         - Trivia: comments and whitespace, never wrapped
//!
//!     Mutation is limited to what incremental synthesis needs: creating
//!     detached prototype nodes and splicing them in as a container's next
//!     child. Containers with a trailing delimiter token (block bodies,
//!     argument lists, ...) receive the new child *before* that delimiter,
//!     everything else appends at the very end.

pub mod builder;
pub mod json;

pub use builder::TreeBuilder;

/// Index of a node inside a [`SourceTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// Semantically meaningful interior node.
    Element,
    /// Lexical leaf token.
    Token,
    /// Comment or whitespace.
    Trivia,
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    text: String,
    category: NodeCategory,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Container tags whose last child is a closing delimiter token; new
/// children are spliced in front of it.
pub const DELIMITED_CONTAINERS: &[&str] = &[
    "BLOCK",
    "CLASS_BODY",
    "VALUE_PARAMETER_LIST",
    "VALUE_ARGUMENT_LIST",
    "TYPE_PARAMETER_LIST",
    "TYPE_ARGUMENT_LIST",
    "STRING_TEMPLATE",
];

/// Owned arena of syntax nodes.
#[derive(Debug, Clone, Default)]
pub struct SourceTree {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

impl SourceTree {
    pub fn new() -> Self {
        SourceTree::default()
    }

    /// Creates the tree with a root element of the given tag.
    pub fn with_root(tag: impl Into<String>) -> Self {
        let mut tree = SourceTree::new();
        let root = tree.new_detached(tag, "", NodeCategory::Element);
        tree.root = Some(root);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root.expect("tree has no root")
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].text
    }

    pub fn category(&self, node: NodeId) -> NodeCategory {
        self.nodes[node.0].category
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Element children only, the view the shadow tree is built from.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|&child| self.category(child) == NodeCategory::Element)
            .collect()
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.nodes[node.0].text = text.into();
    }

    /// Creates a node that belongs to the arena but hangs nowhere yet.
    pub fn new_detached(
        &mut self,
        tag: impl Into<String>,
        text: impl Into<String>,
        category: NodeCategory,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.into(),
            text: text.into(),
            category,
            parent: None,
            children: Vec::new(),
        });
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Plain append: `child` becomes the last child of `parent`.
    ///
    /// This is the construction-order primitive used by builders and
    /// snapshot decoding, where children arrive already in their final
    /// order.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.nodes[child.0].parent.is_none(),
            "push_child on a node that already has a parent"
        );
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Splices `child` in as the next child of `parent` during synthesis.
    ///
    /// For [`DELIMITED_CONTAINERS`] whose current last child is a token,
    /// the new child lands before that trailing delimiter; otherwise it
    /// is appended at the very end.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let before_delimiter = DELIMITED_CONTAINERS.contains(&self.tag(parent))
            && self
                .children(parent)
                .last()
                .is_some_and(|&last| self.category(last) == NodeCategory::Token);

        if !before_delimiter {
            self.push_child(parent, child);
            return;
        }

        debug_assert!(
            self.nodes[child.0].parent.is_none(),
            "append_child on a node that already has a parent"
        );
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        let at = children.len() - 1;
        children.insert(at, child);
    }

    /// All nodes of the subtree under `node`, preorder.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Ancestor chain root -> .. -> `node` (inclusive).
    pub fn ancestor_chain(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = vec![node];
        while let Some(parent) = self.parent(*chain.last().expect("chain is never empty")) {
            chain.push(parent);
        }
        chain.reverse();
        chain
    }

    /// Depth in edges from the root; the root itself is at depth 0.
    pub fn depth(&self, node: NodeId) -> usize {
        self.ancestor_chain(node).len() - 1
    }
}
