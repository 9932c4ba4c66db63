// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity-keyed enter/update/exit rendering.
//!
//! [`DiffRenderer`] compares each new [`Layout`](crate::layout::Layout)
//! against the elements it already rendered and drives a [`Presenter`]
//! accordingly:
//!
//! ```text
//!            render: id laid out          advance: track finished
//!   (none) ───────────────────► Entering ─────────────────────► Visible
//!                                  ▲  │                             │
//!                 render: revived  │  │ render: id gone             │ render: id gone
//!                                  │  ▼                             ▼
//!                                 Exiting ◄─────────────────────────┘
//!                                    │
//!                                    │ advance: removal due
//!                                    ▼
//!                                 Removed (handle destroyed, entry dropped)
//! ```
//!
//! Exiting elements collapse toward the nearest surviving element of their
//! cached lineage and keep following it on later passes.
//!
//! [`Presenter`]: crate::backend::Presenter

mod curve;
mod diff;
mod registry;

use core::fmt;

use crate::tree::{LinkId, NodeId};

pub use curve::{LinkStyle, link_path};
pub use diff::{DiffRenderer, RendererConfig};
pub use registry::{Entry, LinkGeometry, NodeGeometry, Phase, Registry};

/// A rendered element: a node or a link.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    /// A node element.
    Node(NodeId),
    /// A link element.
    Link(LinkId),
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node {id}"),
            Self::Link(id) => write!(f, "link {id}"),
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
