//! Nested builder for source trees
//!
//!     Hosts that feed trees in programmatically (and the test suites)
//!     use this instead of hand-wiring arena ids. The builder keeps a
//!     stack of open nodes; `open`/`close` bracket a subtree, `token` and
//!     `leaf` add childless nodes to whatever is currently open.

use super::{NodeCategory, NodeId, SourceTree};

#[derive(Debug)]
pub struct TreeBuilder {
    tree: SourceTree,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new(root_tag: impl Into<String>) -> Self {
        let tree = SourceTree::with_root(root_tag);
        let root = tree.root();
        TreeBuilder {
            tree,
            open: vec![root],
        }
    }

    fn current(&self) -> NodeId {
        *self.open.last().expect("builder has no open node")
    }

    /// Opens an element child of the current node; subsequent calls nest
    /// under it until the matching [`close`](Self::close).
    pub fn open(&mut self, tag: impl Into<String>) -> &mut Self {
        let node = self.tree.new_detached(tag, "", NodeCategory::Element);
        self.tree.push_child(self.current(), node);
        self.open.push(node);
        self
    }

    /// Childless element with optional text (references, constants).
    pub fn leaf(&mut self, tag: impl Into<String>, text: impl Into<String>) -> &mut Self {
        let node = self.tree.new_detached(tag, text, NodeCategory::Element);
        self.tree.push_child(self.current(), node);
        self
    }

    /// Lexical token child (delimiters, keywords).
    pub fn token(&mut self, tag: impl Into<String>, text: impl Into<String>) -> &mut Self {
        let node = self.tree.new_detached(tag, text, NodeCategory::Token);
        self.tree.push_child(self.current(), node);
        self
    }

    pub fn close(&mut self) -> &mut Self {
        assert!(self.open.len() > 1, "close without a matching open");
        self.open.pop();
        self
    }

    /// Id of the most recently added child of the current node.
    pub fn last_added(&self) -> NodeId {
        *self
            .tree
            .children(self.current())
            .last()
            .expect("no child added yet")
    }

    pub fn build(&mut self) -> SourceTree {
        assert!(self.open.len() == 1, "unclosed nodes at build");
        std::mem::take(&mut self.tree)
    }
}
