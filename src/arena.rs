use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::errors::{TreeError, TreeResult};

/// Handle to a node stored in a [`SetTree`].
pub type NodeId = Index;

/// A single node: its payload plus links into the arena.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    /// Caller supplied payload
    pub value: T,
    /// Non-owning link to the parent, None for parentless nodes
    pub(crate) parent: Option<NodeId>,
    /// Owned children in insertion order
    pub(crate) children: Vec<NodeId>,
}

impl<T> TreeNode<T> {
    fn new(value: T, parent: Option<NodeId>) -> Self {
        Self {
            value,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed tree whose branches never repeat a value.
///
/// Every operation takes the node it acts on and treats it as the root of its
/// own subtree. The arena also keeps subtrees that were detached from the
/// original root until they are released or the tree is dropped.
#[derive(Debug)]
pub struct SetTree<T> {
    pub(crate) arena: Arena<TreeNode<T>>,
    root: NodeId,
}

impl<T> SetTree<T> {
    /// Creates a tree holding a single parentless node.
    pub fn new(value: T) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode::new(value, None));
        Self { arena, root }
    }

    /// The node the tree was created with.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocates another parentless node in the same arena.
    #[instrument(level = "trace", skip_all)]
    pub fn add_root(&mut self, value: T) -> NodeId {
        self.arena.insert(TreeNode::new(value, None))
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&TreeNode<T>> {
        self.arena.get(idx)
    }

    /// Mutable access to a node. Only the payload can be changed through it;
    /// the branch is not re-validated afterwards.
    pub fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut TreeNode<T>> {
        self.arena.get_mut(idx)
    }

    pub fn value(&self, idx: NodeId) -> Option<&T> {
        self.arena.get(idx).map(|node| &node.value)
    }

    pub fn value_mut(&mut self, idx: NodeId) -> Option<&mut T> {
        self.arena.get_mut(idx).map(|node| &mut node.value)
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx)
    }

    /// Number of live nodes, detached subtrees included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn parent(&self, idx: NodeId) -> Option<NodeId> {
        self.arena.get(idx).and_then(|node| node.parent)
    }

    pub fn children(&self, idx: NodeId) -> &[NodeId] {
        self.arena
            .get(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Walks the parent chain, nearest ancestor first. The node itself is
    /// not part of the chain.
    pub fn ancestors(&self, idx: NodeId) -> Ancestors<'_, T> {
        Ancestors {
            tree: self,
            next: self.parent(idx),
        }
    }

    /// Returns the parentless node at the top of the chain.
    #[instrument(level = "trace", skip(self))]
    pub fn find_root(&self, idx: NodeId) -> NodeId {
        self.ancestors(idx).last().map(|(id, _)| id).unwrap_or(idx)
    }

    /// Number of ancestors above the node.
    pub fn depth(&self, idx: NodeId) -> usize {
        self.ancestors(idx).count()
    }

    /// Number of levels in the subtree below and including the node.
    #[instrument(level = "trace", skip(self))]
    pub fn height(&self, idx: NodeId) -> usize {
        if let Some(node) = self.get_node(idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.height(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Detaches `child` from `node`, returning false if it was not a direct
    /// child. The detached subtree stays allocated as a parentless subtree.
    ///
    /// Collect the targets before calling this from a walk over the same
    /// children, or use [`SetTree::remove_where`].
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, node: NodeId, child: NodeId) -> bool {
        let Some(parent) = self.arena.get_mut(node) else {
            return false;
        };
        let Some(pos) = parent.children.iter().position(|&c| c == child) else {
            return false;
        };
        parent.children.remove(pos);
        if let Some(detached) = self.arena.get_mut(child) {
            detached.parent = None;
        }
        true
    }

    /// Detaches every direct child whose value matches, in child order.
    #[instrument(level = "debug", skip(self, predicate))]
    pub fn remove_where<P>(&mut self, node: NodeId, mut predicate: P) -> Vec<NodeId>
    where
        P: FnMut(&T) -> bool,
    {
        let targets: Vec<NodeId> = self
            .children(node)
            .iter()
            .copied()
            .filter(|&child| self.value(child).is_some_and(&mut predicate))
            .collect();
        for &child in &targets {
            self.remove(node, child);
        }
        targets
    }

    /// Frees a detached node together with its whole subtree and hands back
    /// the node's value.
    ///
    /// The tree root and nodes that still have a parent cannot be released.
    #[instrument(level = "debug", skip(self))]
    pub fn release(&mut self, node: NodeId) -> TreeResult<T> {
        let current = self.node(node)?;
        if current.parent.is_some() || node == self.root {
            return Err(TreeError::NotReleasable(node));
        }
        let descendants: Vec<NodeId> = self
            .iter_preorder(node)
            .skip(1)
            .map(|(id, _)| id)
            .collect();
        trace!(count = descendants.len(), "releasing descendants");
        for id in descendants {
            self.arena.remove(id);
        }
        self.arena
            .remove(node)
            .map(|released| released.value)
            .ok_or(TreeError::NodeNotFound(node))
    }

    pub(crate) fn node(&self, idx: NodeId) -> TreeResult<&TreeNode<T>> {
        self.arena.get(idx).ok_or(TreeError::NodeNotFound(idx))
    }
}

impl<T: PartialEq> SetTree<T> {
    /// First ancestor (the node itself excluded) holding an equal value.
    pub fn ancestor_contains(&self, idx: NodeId, value: &T) -> Option<NodeId> {
        self.ancestors(idx)
            .find(|(_, node)| node.value == *value)
            .map(|(id, _)| id)
    }

    /// Checks the branch that would sit above a new child of `idx`: the node
    /// itself, then its ancestors.
    fn find_duplicate(&self, idx: NodeId, value: &T) -> Option<NodeId> {
        match self.get_node(idx) {
            Some(node) if node.value == *value => Some(idx),
            _ => self.ancestor_contains(idx, value),
        }
    }
}

impl<T: PartialEq + fmt::Debug> SetTree<T> {
    /// Appends a new child holding `value` and returns its handle.
    ///
    /// Fails with [`TreeError::DuplicateValue`] if `value` equals the value of
    /// `node` or of any of its ancestors; the tree is left untouched then.
    /// Siblings and cousins may hold equal values.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, node: NodeId, value: T) -> TreeResult<NodeId> {
        self.node(node)?;

        if let Some(conflict) = self.find_duplicate(node, &value) {
            debug!(?conflict, ?value, "duplicate value on branch");
            return Err(TreeError::DuplicateValue {
                node: conflict,
                value: format!("{:?}", value),
            });
        }

        let child = self.arena.insert(TreeNode::new(value, Some(node)));
        if let Some(parent) = self.arena.get_mut(node) {
            parent.children.push(child);
        }
        Ok(child)
    }

    /// Tears the subtree below and including `node` apart, then asks `expand`
    /// for fresh children of every node that was part of it.
    ///
    /// Each original node is expanded exactly once, in the preorder computed
    /// before teardown. Children created here are not expanded again, and the
    /// former descendants of `node` end up as parentless nodes carrying their
    /// own new children. `node` is detached from its parent as well.
    ///
    /// Returns the former descendants so they can be handed to
    /// [`SetTree::release`]. The first [`TreeError::DuplicateValue`] stops the
    /// rebuild; nodes handled before it keep their new children.
    #[instrument(level = "debug", skip(self, expand))]
    pub fn invalidate<F>(&mut self, node: NodeId, mut expand: F) -> TreeResult<Vec<NodeId>>
    where
        F: FnMut(NodeId, &T) -> Vec<T>,
    {
        self.node(node)?;
        let mut order: Vec<NodeId> = self.iter_preorder(node).map(|(id, _)| id).collect();
        debug!(nodes = order.len(), "tearing down subtree");

        if let Some(parent) = self.parent(node) {
            self.remove(parent, node);
        }
        for &id in &order {
            if let Some(current) = self.arena.get_mut(id) {
                current.parent = None;
                current.children.clear();
            }
        }

        for &id in &order {
            let values = match self.arena.get(id) {
                Some(current) => expand(id, &current.value),
                None => continue,
            };
            for value in values {
                self.add_child(id, value)?;
            }
        }
        Ok(order.split_off(1))
    }

    /// Drops every descendant of `node` and grows the subtree again from
    /// `expand`, expanding each new child as soon as it is reached in
    /// preorder.
    ///
    /// Expansion stops on leaves whose `expand` yields nothing. A value that
    /// would repeat on its own branch ends the walk with
    /// [`TreeError::DuplicateValue`], leaving what was built so far in place.
    #[instrument(level = "debug", skip(self, expand))]
    pub fn regenerate<F>(&mut self, node: NodeId, mut expand: F) -> TreeResult<()>
    where
        F: FnMut(NodeId, &T) -> Vec<T>,
    {
        self.node(node)?;
        let previous: Vec<NodeId> = self.children(node).to_vec();
        debug!(count = previous.len(), "dropping previous children");
        for child in previous {
            self.remove(node, child);
            self.release(child)?;
        }

        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let values = match self.arena.get(id) {
                Some(current) => expand(id, &current.value),
                None => continue,
            };
            let mut created = Vec::with_capacity(values.len());
            for value in values {
                created.push(self.add_child(id, value)?);
            }
            // Reverse so the first child is expanded first
            stack.extend(created.into_iter().rev());
        }
        Ok(())
    }
}

/// Iterator over the parent chain of a node.
pub struct Ancestors<'a, T> {
    tree: &'a SetTree<T>,
    next: Option<NodeId>,
}

impl<'a, T> Iterator for Ancestors<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.tree.get_node(idx)?;
        self.next = node.parent;
        Some((idx, node))
    }
}
