// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer targets and interaction thresholds.

use crate::tree::{LinkId, NodeId};

/// What a pointer-down landed on, as reported by the host or by
/// [`DiffRenderer::hit_test`](crate::render::DiffRenderer::hit_test).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerTarget {
    /// Empty canvas. Starts a pan.
    Background,
    /// An interactive node element.
    Node(NodeId),
    /// An interactive link element.
    Link(LinkId),
}

impl PointerTarget {
    /// Returns `true` for interactive elements, which never start a pan.
    #[inline]
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        !matches!(self, Self::Background)
    }
}

/// Pointer thresholds, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionConfig {
    /// Distance a pressed node must travel before a drag starts.
    pub drag_threshold: f64,
    /// How far from a link's curve a point still hits it.
    pub link_hit_tolerance: f64,
}

impl InteractionConfig {
    /// Mouse-oriented thresholds.
    #[must_use]
    pub const fn pointer() -> Self {
        Self {
            drag_threshold: 4.0,
            link_hit_tolerance: 6.0,
        }
    }

    /// Wider thresholds for touch input.
    #[must_use]
    pub const fn touch() -> Self {
        Self {
            drag_threshold: 10.0,
            link_hit_tolerance: 12.0,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self::pointer()
    }
}
