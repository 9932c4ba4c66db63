// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Centered tree layout tolerant of partial visibility.
//!
//! [`compute_layout`] is a pure function from a [`Tree`] plus a viewport size
//! to positioned [`LayoutNode`]s, parent→child [`LayoutLink`]s and the
//! bounding [`Rect`] of the result. Only nodes reachable from the root through
//! expanded parents take part.
//!
//! Placement rules:
//!
//! - Nodes without visible children are *leaves* of the layout and are placed
//!   left to right at `leaf_index * node_gap`, in traversal order.
//! - A node with visible children sits at the midpoint of its **first and
//!   last** visible child, not the mean of all of them.
//! - `y` depends only on depth: `(height - bottom_offset) - depth * level_height`,
//!   so the tree grows upward from a fixed baseline.
//! - The whole result is translated so the horizontal midpoint of its bounds
//!   is the viewport's horizontal center. Spacing is never compressed; wide
//!   trees overflow and the viewport clamp takes over.
//!
//! Malformed input (dangling child ids, cycles, a node listed twice, a child
//! whose declared parent disagrees) is skipped together with its subtree and
//! listed in [`Layout::rejected`]. The function itself never panics on data.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::tree::{LinkId, NodeId, NodeKind, NodeStatus, Tree, TreeNode};

/// Spacing parameters for [`compute_layout`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal distance between adjacent leaves.
    pub node_gap: f64,
    /// Vertical distance between depth levels.
    pub level_height: f64,
    /// Distance from the bottom of the viewport to the root's baseline.
    pub bottom_offset: f64,
}

impl LayoutConfig {
    /// The spacing used by the reference skill-tree presentation.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            node_gap: 120.0,
            level_height: 140.0,
            bottom_offset: 80.0,
        }
    }

    /// Tighter spacing for small viewports.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            node_gap: 80.0,
            level_height: 100.0,
            bottom_offset: 60.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Data-driven visual attributes handed to the presenter on enter and update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeAttrs {
    /// Display name.
    pub name: String,
    /// Structural role.
    pub kind: NodeKind,
    /// Availability.
    pub status: NodeStatus,
    /// Whether the node is expanded.
    pub expanded: bool,
    /// Whether the node has populated children, visible or not.
    pub has_children: bool,
}

impl NodeAttrs {
    fn of(node: &TreeNode) -> Self {
        Self {
            name: node.name.clone(),
            kind: node.kind,
            status: node.status,
            expanded: node.expanded,
            has_children: !node.child_ids().is_empty(),
        }
    }
}

/// A positioned node.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    /// Identity of the source tree node.
    pub id: NodeId,
    /// Distance from the root.
    pub depth: u32,
    /// World position.
    pub position: Point,
    /// Index of the parent in [`Layout::nodes`].
    pub parent: Option<usize>,
    /// Indices of the visible children in [`Layout::nodes`], in order.
    pub children: Vec<usize>,
    /// Attributes copied from the tree node.
    pub attrs: NodeAttrs,
}

/// A parent→child link between two laid-out nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutLink {
    /// Link identity.
    pub id: LinkId,
    /// Index of the parent in [`Layout::nodes`].
    pub source: usize,
    /// Index of the child in [`Layout::nodes`].
    pub target: usize,
}

/// Why a node was left out of the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// A child id names a node that is not in the tree.
    MissingNode,
    /// A child id names one of its own ancestors.
    Cycle,
    /// A child id was already placed elsewhere in the layout.
    Duplicate,
    /// The node's declared parent differs from the node listing it.
    ParentMismatch {
        /// The parent the node itself declares.
        declared: NodeId,
    },
    /// The tree's root id is not in the tree.
    MissingRoot,
}

/// A node skipped during layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// The offending id.
    pub id: NodeId,
    /// The node whose child list referenced it, if any.
    pub parent: Option<NodeId>,
    /// Why it was skipped.
    pub reason: RejectReason,
}

/// Result of a layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Nodes in depth-first preorder; index 0 is the root.
    pub nodes: Vec<LayoutNode>,
    /// One link per non-root node, in the same order the children were placed.
    pub links: Vec<LayoutLink>,
    /// Axis-aligned bounds of all node positions. Always finite.
    pub bounds: Rect,
    /// Nodes skipped because the tree was malformed.
    pub rejected: Vec<Rejection>,
    index: BTreeMap<NodeId, usize>,
}

impl Layout {
    /// An empty layout: no nodes, and a zero-size bounds rect at the
    /// horizontally centered baseline.
    #[must_use]
    pub fn empty(viewport: Size, config: &LayoutConfig) -> Self {
        let (width, height) = finite_size(viewport);
        let anchor = Point::new(width / 2.0, height - config.bottom_offset);
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            bounds: Rect::from_points(anchor, anchor),
            rejected: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Number of laid-out nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing was laid out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `id` is part of this layout.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Index of `id` in [`nodes`](Self::nodes).
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Looks up a laid-out node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// World position of `id`.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.node(id).map(|n| n.position)
    }

    /// Parent id of `id`, `None` for the root or an unknown id.
    #[must_use]
    pub fn parent_id(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id)?.parent?;
        Some(self.nodes[parent].id)
    }

    /// Ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cursor = self.node(id).and_then(|n| n.parent);
        core::iter::from_fn(move || {
            let idx = cursor?;
            let node = &self.nodes[idx];
            cursor = node.parent;
            Some(node.id)
        })
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// The root node, if any.
    #[must_use]
    pub fn root(&self) -> Option<&LayoutNode> {
        self.nodes.first()
    }
}

fn finite_size(size: Size) -> (f64, f64) {
    let width = if size.width.is_finite() { size.width } else { 0.0 };
    let height = if size.height.is_finite() { size.height } else { 0.0 };
    (width, height)
}

/// Lays out the visible part of `tree` for a viewport of the given size.
///
/// Identical inputs produce bit-identical output.
#[must_use]
pub fn compute_layout(tree: &Tree, viewport: Size, config: &LayoutConfig) -> Layout {
    let mut layout = Layout::empty(viewport, config);
    let Some(root_id) = tree.root() else {
        return layout;
    };
    let Some(root) = tree.get(root_id) else {
        layout.rejected.push(Rejection {
            id: root_id,
            parent: None,
            reason: RejectReason::MissingRoot,
        });
        return layout;
    };

    layout.nodes.push(LayoutNode {
        id: root_id,
        depth: 0,
        position: Point::ZERO,
        parent: None,
        children: Vec::new(),
        attrs: NodeAttrs::of(root),
    });
    layout.index.insert(root_id, 0);

    // Explicit (node index, next child cursor) stack; nodes are created in
    // preorder and finished in postorder.
    let mut stack: Vec<(usize, usize)> = alloc::vec![(0, 0)];
    let mut postorder: Vec<usize> = Vec::new();

    while let Some(frame) = stack.last_mut() {
        let (idx, cursor) = *frame;
        let parent_id = layout.nodes[idx].id;
        let children = tree
            .get(parent_id)
            .map_or(&[][..], TreeNode::visible_child_ids);
        let Some(&child_id) = children.get(cursor) else {
            stack.pop();
            postorder.push(idx);
            continue;
        };
        frame.1 += 1;

        let child = match admit(tree, &layout, idx, parent_id, child_id) {
            Ok(child) => child,
            Err(reason) => {
                layout.rejected.push(Rejection {
                    id: child_id,
                    parent: Some(parent_id),
                    reason,
                });
                continue;
            }
        };

        let child_idx = layout.nodes.len();
        layout.nodes.push(LayoutNode {
            id: child_id,
            depth: layout.nodes[idx].depth + 1,
            position: Point::ZERO,
            parent: Some(idx),
            children: Vec::new(),
            attrs: NodeAttrs::of(child),
        });
        layout.nodes[idx].children.push(child_idx);
        layout.index.insert(child_id, child_idx);
        layout.links.push(LayoutLink {
            id: LinkId::new(parent_id, child_id),
            source: idx,
            target: child_idx,
        });
        stack.push((child_idx, 0));
    }

    position(&mut layout, &postorder, viewport, config);
    layout
}

/// Checks whether `child_id` may be placed under `parent_idx`.
fn admit<'t>(
    tree: &'t Tree,
    layout: &Layout,
    parent_idx: usize,
    parent_id: NodeId,
    child_id: NodeId,
) -> Result<&'t TreeNode, RejectReason> {
    let Some(child) = tree.get(child_id) else {
        return Err(RejectReason::MissingNode);
    };
    if let Some(&placed) = layout.index.get(&child_id) {
        let mut cursor = Some(parent_idx);
        while let Some(i) = cursor {
            if i == placed {
                return Err(RejectReason::Cycle);
            }
            cursor = layout.nodes[i].parent;
        }
        return Err(RejectReason::Duplicate);
    }
    if let Some(declared) = child.parent_id
        && declared != parent_id
    {
        return Err(RejectReason::ParentMismatch { declared });
    }
    Ok(child)
}

fn position(layout: &mut Layout, postorder: &[usize], viewport: Size, config: &LayoutConfig) {
    let (width, height) = finite_size(viewport);
    let baseline = height - config.bottom_offset;

    // Leaves span [0, (n - 1) * gap] and every internal node lies between its
    // outermost leaves, so the bounds midpoint is known before placement.
    let leaf_count = layout.nodes.iter().filter(|n| n.children.is_empty()).count();
    let span = leaf_count.saturating_sub(1) as f64 * config.node_gap;
    let shift = width / 2.0 - span / 2.0;

    let mut next_leaf = 0_usize;
    for &idx in postorder {
        let x = match (
            layout.nodes[idx].children.first(),
            layout.nodes[idx].children.last(),
        ) {
            (Some(&first), Some(&last)) => {
                (layout.nodes[first].position.x + layout.nodes[last].position.x) / 2.0
            }
            _ => {
                let x = next_leaf as f64 * config.node_gap + shift;
                next_leaf += 1;
                x
            }
        };
        let node = &mut layout.nodes[idx];
        node.position = Point::new(x, baseline - f64::from(node.depth) * config.level_height);
    }

    if let Some(first) = layout.nodes.first() {
        let mut bounds = Rect::from_points(first.position, first.position);
        for node in &layout.nodes[1..] {
            bounds = bounds.union_pt(node.position);
        }
        layout.bounds = bounds;
    }
}
