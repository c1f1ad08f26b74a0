//! Human readable renderings of a subtree, for inspection only.

use std::fmt;

use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::arena::{NodeId, SetTree};

/// Renders a node as `value -> [child, child]`, recursively.
pub struct NodeDisplay<'a, T> {
    tree: &'a SetTree<T>,
    node: NodeId,
}

impl<T> SetTree<T> {
    pub fn display(&self, node: NodeId) -> NodeDisplay<'_, T> {
        NodeDisplay { tree: self, node }
    }
}

impl<T: fmt::Display> fmt::Display for NodeDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(node) = self.tree.get_node(self.node) else {
            return Ok(());
        };
        write!(
            f,
            "{} -> [{}]",
            node.value,
            node.children()
                .iter()
                .map(|&child| self.tree.display(child))
                .format(", ")
        )
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self, node: NodeId) -> Tree<String>;
}

impl<T: fmt::Display> TreeNodeConvert for SetTree<T> {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self, node: NodeId) -> Tree<String> {
        match self.get_node(node) {
            Some(current) => {
                let leaves: Vec<_> = current
                    .children()
                    .iter()
                    .map(|&child| self.to_tree_string(child))
                    .collect();
                Tree::new(current.value.to_string()).with_leaves(leaves)
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
