// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated, pannable and zoomable rendering of expandable trees.
//!
//! `arbor_core` turns a caller-owned [`Tree`](tree::Tree) into positioned
//! elements and keeps a host's element tree in sync with it as nodes are
//! expanded, collapsed, added, removed or moved. It is `no_std` compatible
//! (with `alloc`) and never touches a platform API directly: drawing goes
//! through the [`Presenter`](backend::Presenter) trait and time is supplied
//! by the host as [`HostTime`](time::HostTime).
//!
//! # Architecture
//!
//! ```text
//!   Tree (owned by the collaborator)
//!       │
//!       ▼
//!   compute_layout() ──► Layout ──► DiffRenderer::render() ──► Presenter
//!                          │                 ▲
//!                          ▼                 │ advance() per frame
//!                  ViewportController ───────┘
//!                          │
//!                          ▼
//!   pointer / wheel ──► Scene ──► SceneEvent ──► collaborator mutates Tree
//! ```
//!
//! **[`tree`]**: node records, ids and the arena that holds them.
//!
//! **[`layout`]**: centered tidy layout of the visible subtree. Malformed
//! references are skipped and reported instead of failing the layout.
//!
//! **[`render`]**: identity-keyed enter/update/exit diffing with
//! interruptible animations and generation-checked deferred removal.
//!
//! **[`viewport`]**: clamped pan and zoom with animated focus and fit.
//!
//! **[`scene`]**: wires the above together and turns pointer input into
//! [`SceneEvent`](event::SceneEvent)s.
//!
//! **[`easing`]**: easing curves and the [`Tween`](easing::Tween) every
//! animation is built on.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables the `Tracer` bodies for
//!   per-pass and per-element events. Rejected nodes and ignored resizes
//!   are reported regardless.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod easing;
pub mod event;
pub mod input;
pub mod layout;
pub mod render;
pub mod scene;
pub mod time;
pub mod trace;
pub mod tree;
pub mod viewport;
