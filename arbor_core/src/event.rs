// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events emitted to the collaborator that owns the tree.
//!
//! The core never mutates the tree. Expansion, reparenting and everything
//! else a user gesture implies are *requested* through [`SceneEvent`]s; the
//! collaborator applies them and calls [`Scene::render`](crate::scene::Scene::render)
//! again.

use kurbo::{Point, Size};

use crate::tree::{NodeId, NodeKind};

/// Something the user did, expressed in tree terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneEvent {
    /// A node was clicked or tapped.
    NodeActivated {
        /// The node.
        id: NodeId,
        /// Its kind, so the collaborator can route without a lookup.
        kind: NodeKind,
    },
    /// The collaborator should set `id`'s expansion flag to `expand`.
    ExpansionRequested {
        /// The node to expand or collapse.
        id: NodeId,
        /// `true` to expand.
        expand: bool,
    },
    /// A node drag passed the drag threshold.
    NodeDragStart {
        /// The dragged node.
        id: NodeId,
        /// Where the drag began, in world coordinates.
        world: Point,
    },
    /// The dragged node moved.
    NodeDragMove {
        /// The dragged node.
        id: NodeId,
        /// Pointer position in world coordinates.
        world: Point,
    },
    /// The drag was released.
    NodeDragEnd {
        /// The dragged node.
        id: NodeId,
        /// Release position in world coordinates.
        world: Point,
    },
    /// A dragged node was released over another node that may adopt it.
    NodeDrop {
        /// The dragged node.
        moved: NodeId,
        /// The node it was dropped on.
        target_parent: NodeId,
    },
    /// The viewing window changed size and the scene was laid out again.
    ViewportResized {
        /// The new size.
        size: Size,
    },
}

/// How activating an expandable node affects its siblings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExpansionPolicy {
    /// Every node expands and collapses on its own.
    #[default]
    Independent,
    /// Expanding a node also requests collapse of its expanded siblings.
    SingleBranchPerParent,
}
