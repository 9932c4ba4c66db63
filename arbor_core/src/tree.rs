// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input tree model.
//!
//! A [`Tree`] is a flat arena of [`TreeNode`]s keyed by [`NodeId`], plus an
//! optional root. Children are referenced by id rather than owned, so the
//! data a collaborator hands over may be malformed: a child id may name a
//! node that does not exist, or a chain of child references may loop back on
//! itself. The layout pass detects and skips those nodes instead of trusting
//! the structure.
//!
//! The collaborator owns the tree and decides when children are populated
//! and when `expanded` flips. This crate only reads it.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Stable identity of a tree node across re-renders.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the link between a parent and one of its children.
///
/// Displays as `"{source}->{target}"`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId {
    /// The parent end of the link.
    pub source: NodeId,
    /// The child end of the link.
    pub target: NodeId,
}

impl LinkId {
    /// Creates the link id for `source -> target`.
    #[inline]
    #[must_use]
    pub const fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}

impl fmt::Debug for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinkId({}->{})", self.source.0, self.target.0)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source.0, self.target.0)
    }
}

/// Structural role of a node.
///
/// The core only distinguishes expandable kinds ([`Root`](Self::Root),
/// [`Branch`](Self::Branch)) from terminal ones; everything else is passed
/// through to the presenter untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The single top-level node.
    Root,
    /// An expandable interior node.
    Branch,
    /// A terminal node.
    Leaf,
    /// A terminal node the collaborator treats as an exam.
    Exam,
}

impl NodeKind {
    /// Returns `true` if activating a node of this kind requests expansion.
    #[inline]
    #[must_use]
    pub const fn is_expandable(self) -> bool {
        matches!(self, Self::Root | Self::Branch)
    }
}

/// Collaborator-defined availability of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    /// Ready for interaction.
    #[default]
    Available,
    /// Children are being fetched.
    Loading,
    /// Not yet reachable for the user.
    Locked,
    /// Finished by the user.
    Completed,
}

/// One node of the input tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    /// Stable identity.
    pub id: NodeId,
    /// Display name, passed through to the presenter.
    pub name: String,
    /// Structural role.
    pub kind: NodeKind,
    /// Child ids, `None` until the collaborator has populated them.
    pub children: Option<Vec<NodeId>>,
    /// Declared parent, if the collaborator tracks one.
    pub parent_id: Option<NodeId>,
    /// Whether the children are part of the visible layout.
    pub expanded: bool,
    /// Availability.
    pub status: NodeStatus,
}

impl TreeNode {
    /// Creates a collapsed node with no children and no declared parent.
    #[must_use]
    pub fn new(id: NodeId, kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            children: None,
            parent_id: None,
            expanded: false,
            status: NodeStatus::Available,
        }
    }

    /// Returns the child ids (empty if none were populated).
    #[must_use]
    pub fn child_ids(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Returns the child ids that are visible, i.e. empty unless expanded.
    #[must_use]
    pub fn visible_child_ids(&self) -> &[NodeId] {
        if self.expanded { self.child_ids() } else { &[] }
    }
}

/// Flat arena of tree nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tree {
    nodes: BTreeMap<NodeId, TreeNode>,
    root: Option<NodeId>,
}

impl Tree {
    /// Creates an empty tree with no root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tree containing only `root`.
    #[must_use]
    pub fn with_root(root: TreeNode) -> Self {
        let mut tree = Self::new();
        tree.root = Some(root.id);
        tree.nodes.insert(root.id, root);
        tree
    }

    /// Returns the root id.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Sets (or clears) the root id. The node itself may be inserted later.
    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    /// Number of nodes in the arena, reachable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    /// Looks up a node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    /// Inserts or replaces a node without touching any child lists.
    pub fn insert(&mut self, node: TreeNode) -> Option<TreeNode> {
        self.nodes.insert(node.id, node)
    }

    /// Iterates over all nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.values()
    }

    /// Inserts `child` and appends it to `parent`'s child list.
    ///
    /// Sets `child.parent_id`. Returns `false` (and inserts nothing) if
    /// `parent` is not in the arena.
    pub fn add_child(&mut self, parent: NodeId, mut child: TreeNode) -> bool {
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return false;
        };
        parent_node.children.get_or_insert_with(Vec::new).push(child.id);
        child.parent_id = Some(parent);
        self.nodes.insert(child.id, child);
        true
    }

    /// Sets the expansion flag. Returns `false` if the node does not exist.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Removes a node and everything below it, detaching it from its
    /// parent's child list. Returns the number of nodes removed.
    ///
    /// Ids that repeat while walking the subtree are removed once, so a
    /// malformed cyclic subtree terminates.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent_id)
            && let Some(children) = self
                .nodes
                .get_mut(&parent)
                .and_then(|p| p.children.as_mut())
        {
            children.retain(|&c| c != id);
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let mut removed = 0;
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                removed += 1;
                stack.extend(node.child_ids().iter().copied());
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree {
        let mut tree = Tree::with_root(TreeNode::new(NodeId(0), NodeKind::Root, "root"));
        tree.add_child(NodeId(0), TreeNode::new(NodeId(1), NodeKind::Branch, "a"));
        tree.add_child(NodeId(1), TreeNode::new(NodeId(2), NodeKind::Leaf, "a1"));
        tree.add_child(NodeId(1), TreeNode::new(NodeId(3), NodeKind::Exam, "a2"));
        tree
    }

    #[test]
    fn add_child_links_both_directions() {
        let tree = sample();
        assert_eq!(tree.get(NodeId(1)).unwrap().child_ids(), &[NodeId(2), NodeId(3)]);
        assert_eq!(tree.get(NodeId(2)).unwrap().parent_id, Some(NodeId(1)));
    }

    #[test]
    fn add_child_to_missing_parent_is_refused() {
        let mut tree = sample();
        assert!(!tree.add_child(NodeId(99), TreeNode::new(NodeId(5), NodeKind::Leaf, "x")));
        assert!(tree.get(NodeId(5)).is_none());
    }

    #[test]
    fn collapsed_node_hides_children() {
        let mut tree = sample();
        assert!(tree.get(NodeId(1)).unwrap().visible_child_ids().is_empty());
        tree.set_expanded(NodeId(1), true);
        assert_eq!(tree.get(NodeId(1)).unwrap().visible_child_ids().len(), 2);
    }

    #[test]
    fn remove_subtree_detaches_and_counts() {
        let mut tree = sample();
        assert_eq!(tree.remove_subtree(NodeId(1)), 3);
        assert_eq!(tree.len(), 1);
        assert!(tree.get(NodeId(0)).unwrap().child_ids().is_empty());
    }

    #[test]
    fn remove_cyclic_subtree_terminates() {
        let mut tree = sample();
        // a2 claims a as its child: a -> a2 -> a.
        tree.get_mut(NodeId(3)).unwrap().children = Some(alloc::vec![NodeId(1)]);
        assert_eq!(tree.remove_subtree(NodeId(1)), 3);
    }

    #[test]
    fn link_id_displays_as_arrow() {
        use alloc::string::ToString;
        assert_eq!(LinkId::new(NodeId(4), NodeId(7)).to_string(), "4->7");
    }
}
