//! Shadow tree with AFTER_LAST sentinels
//!
//!     A parallel, purely owned tree mirroring the meaningful (element)
//!     nodes of a source tree. Each shadow node keeps a back-reference to
//!     its original node; sentinel nodes carry no original at all. The
//!     sentinel is a tagged variant of [`Origin`], so "is this the
//!     sentinel" is a tag comparison, never an identity check against a
//!     shared singleton.
//!
//!     After [`ShadowTree::add_after_last`], every shadow node's children
//!     end with exactly one sentinel, representing "no more children
//!     here" as an explicit, predictable symbol. Nodes whose original is
//!     on the exclusion list get none: they are the currently open
//!     frontier nodes, and marking them closed would leak "the future" to
//!     the prediction model.

use std::collections::HashSet;

use crate::tree::{NodeId, SourceTree};

/// Index of a node inside a [`ShadowTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShadowId(usize);

impl ShadowId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a shadow node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A meaningful node of the source tree.
    Source(NodeId),
    /// The "end of children" sentinel; corresponds to no real node.
    AfterLast,
}

#[derive(Debug, Clone)]
struct ShadowData {
    origin: Origin,
    parent: Option<ShadowId>,
    children: Vec<ShadowId>,
}

#[derive(Debug, Clone)]
pub struct ShadowTree {
    nodes: Vec<ShadowData>,
    root: ShadowId,
}

impl ShadowTree {
    /// Wraps the element nodes of `tree` reachable from its root,
    /// preserving child order. Tokens and trivia are never wrapped.
    pub fn build(tree: &SourceTree) -> ShadowTree {
        let mut shadow = ShadowTree {
            nodes: vec![ShadowData {
                origin: Origin::Source(tree.root()),
                parent: None,
                children: Vec::new(),
            }],
            root: ShadowId(0),
        };

        // Children are pushed in reverse so the pop order restores the
        // original left-to-right order.
        let mut worklist: Vec<(NodeId, ShadowId)> = tree
            .element_children(tree.root())
            .into_iter()
            .rev()
            .map(|child| (child, ShadowId(0)))
            .collect();

        while let Some((original, parent)) = worklist.pop() {
            let id = ShadowId(shadow.nodes.len());
            shadow.nodes.push(ShadowData {
                origin: Origin::Source(original),
                parent: Some(parent),
                children: Vec::new(),
            });
            shadow.nodes[parent.0].children.push(id);

            for child in tree.element_children(original).into_iter().rev() {
                worklist.push((child, id));
            }
        }

        shadow
    }

    pub fn root(&self) -> ShadowId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn origin(&self, node: ShadowId) -> Origin {
        self.nodes[node.0].origin
    }

    pub fn parent(&self, node: ShadowId) -> Option<ShadowId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: ShadowId) -> &[ShadowId] {
        &self.nodes[node.0].children
    }

    pub fn is_sentinel(&self, node: ShadowId) -> bool {
        matches!(self.origin(node), Origin::AfterLast)
    }

    /// Index of `node` among its parent's children; `None` for the root.
    pub fn index_in_parent(&self, node: ShadowId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    /// The shadow node wrapping `original`, if any.
    pub fn find_source(&self, original: NodeId) -> Option<ShadowId> {
        self.nodes
            .iter()
            .position(|data| data.origin == Origin::Source(original))
            .map(ShadowId)
    }

    /// Appends one sentinel child to every shadow node except those whose
    /// original is listed in `except` (the still-open frontier nodes).
    pub fn add_after_last(&mut self, except: &HashSet<NodeId>) {
        let existing = self.nodes.len();
        for index in 0..existing {
            let id = ShadowId(index);
            match self.origin(id) {
                Origin::AfterLast => continue,
                Origin::Source(original) => {
                    if except.contains(&original) {
                        continue;
                    }
                }
            }

            let sentinel = ShadowId(self.nodes.len());
            self.nodes.push(ShadowData {
                origin: Origin::AfterLast,
                parent: Some(id),
                children: Vec::new(),
            });
            self.nodes[index].children.push(sentinel);
        }
    }

    /// All shadow node ids, in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = ShadowId> {
        (0..self.nodes.len()).map(ShadowId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeBuilder;

    fn block_tree() -> SourceTree {
        let mut builder = TreeBuilder::new("FILE");
        builder
            .open("FUN")
            .open("BLOCK")
            .token("LBRACE", "{")
            .leaf("CALL_EXPRESSION", "")
            .token("RBRACE", "}")
            .close()
            .close();
        builder.build()
    }

    #[test]
    fn wraps_elements_only_in_order() {
        let tree = block_tree();
        let shadow = ShadowTree::build(&tree);

        // FILE, FUN, BLOCK, CALL_EXPRESSION; braces are not wrapped
        assert_eq!(shadow.len(), 4);

        let fun = shadow.children(shadow.root())[0];
        let block = shadow.children(fun)[0];
        assert_eq!(shadow.children(block).len(), 1);
        let call = shadow.children(block)[0];
        assert_eq!(shadow.parent(call), Some(block));
        match shadow.origin(call) {
            Origin::Source(original) => assert_eq!(tree.tag(original), "CALL_EXPRESSION"),
            Origin::AfterLast => panic!("unexpected sentinel"),
        }
    }

    #[test]
    fn sentinel_is_last_child_everywhere() {
        let tree = block_tree();
        let mut shadow = ShadowTree::build(&tree);
        shadow.add_after_last(&HashSet::new());

        for id in shadow.ids() {
            if shadow.is_sentinel(id) {
                assert!(shadow.children(id).is_empty());
                continue;
            }
            let children = shadow.children(id);
            let sentinels = children.iter().filter(|&&c| shadow.is_sentinel(c)).count();
            assert_eq!(sentinels, 1);
            assert!(shadow.is_sentinel(*children.last().expect("has sentinel")));
        }
    }

    #[test]
    fn excluded_nodes_get_no_sentinel() {
        let tree = block_tree();
        let fun = tree.children(tree.root())[0];
        let block = tree.children(fun)[0];

        let mut shadow = ShadowTree::build(&tree);
        let except: HashSet<_> = [block].into_iter().collect();
        shadow.add_after_last(&except);

        let shadow_block = shadow.find_source(block).expect("block is wrapped");
        assert!(!shadow
            .children(shadow_block)
            .iter()
            .any(|&c| shadow.is_sentinel(c)));

        let shadow_fun = shadow.find_source(fun).expect("fun is wrapped");
        assert!(shadow.is_sentinel(*shadow.children(shadow_fun).last().expect("non-empty")));
    }
}
