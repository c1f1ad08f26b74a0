//! Read-only walks over a subtree.
//!
//! Every walk starts at the node it is given and never climbs above it, apart
//! from the pairing walk which reports the start node's own parent link last.
//! All walks are restartable: iterators own their stack, nothing is cached on
//! the tree.

use tracing::instrument;

use crate::arena::{NodeId, SetTree, TreeNode};

impl<T> SetTree<T> {
    /// Root-first walk: a node before its children, children in order.
    pub fn iter_preorder(&self, start: NodeId) -> PreOrderIterator<'_, T> {
        PreOrderIterator::new(self, start)
    }

    /// Leaf-first walk: a node after all of its descendants.
    pub fn iter_postorder(&self, start: NodeId) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self, start)
    }

    /// `(parent value, child value)` for every node of the subtree that has a
    /// parent, emitted once the child's own subtree has been fully reported.
    pub fn iter_pairs(&self, start: NodeId) -> PairIterator<'_, T> {
        PairIterator {
            tree: self,
            inner: self.iter_postorder(start),
        }
    }

    #[instrument(level = "trace", skip(self, visit))]
    pub fn iterate_out<F>(&self, start: NodeId, mut visit: F)
    where
        F: FnMut(NodeId, &TreeNode<T>),
    {
        for (id, node) in self.iter_preorder(start) {
            visit(id, node);
        }
    }

    #[instrument(level = "trace", skip(self, visit))]
    pub fn iterate_in<F>(&self, start: NodeId, mut visit: F)
    where
        F: FnMut(NodeId, &TreeNode<T>),
    {
        for (id, node) in self.iter_postorder(start) {
            visit(id, node);
        }
    }

    /// Calls `visit(parent, child)` bottom-up. For
    /// `1 -> {2 -> {4}, 3 -> {5, 7}}` the pairs arrive as
    /// (2,4), (1,2), (3,5), (3,7), (1,3).
    #[instrument(level = "trace", skip(self, visit))]
    pub fn iterate_pairs<F>(&self, start: NodeId, mut visit: F)
    where
        F: FnMut(&T, &T),
    {
        for (parent, child) in self.iter_pairs(start) {
            visit(parent, child);
        }
    }

    /// Same order as [`SetTree::iterate_pairs`], with write access to the
    /// parent's value. The pair list is fixed before the first call, so a
    /// parent sees every change its children received from their own
    /// children.
    #[instrument(level = "debug", skip(self, visit))]
    pub fn iterate_pairs_mut<F>(&mut self, start: NodeId, mut visit: F)
    where
        F: FnMut(&mut T, &T),
    {
        let pairs: Vec<(NodeId, NodeId)> = self
            .iter_postorder(start)
            .filter_map(|(id, node)| node.parent().map(|parent| (parent, id)))
            .collect();

        for (parent, child) in pairs {
            if let (Some(parent), Some(child)) = self.arena.get2_mut(parent, child) {
                visit(&mut parent.value, &child.value);
            }
        }
    }
}

pub struct PreOrderIterator<'a, T> {
    tree: &'a SetTree<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> PreOrderIterator<'a, T> {
    fn new(tree: &'a SetTree<T>, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a, T> Iterator for PreOrderIterator<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, T> {
    tree: &'a SetTree<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(tree: &'a SetTree<T>, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push((start, false));
        }
        Self { tree, stack }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, expanded)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if expanded {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children().iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

pub struct PairIterator<'a, T> {
    tree: &'a SetTree<T>,
    inner: PostOrderIterator<'a, T>,
}

impl<'a, T> Iterator for PairIterator<'a, T> {
    type Item = (&'a T, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        for (_, node) in self.inner.by_ref() {
            if let Some(parent) = node.parent().and_then(|p| tree.get_node(p)) {
                return Some((&parent.value, &node.value));
            }
        }
        None
    }
}
