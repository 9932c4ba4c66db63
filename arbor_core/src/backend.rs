// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for presentation layers.
//!
//! Arbor splits platform-specific work into *backend* crates. Each backend
//! provides:
//!
//! - **Time**: `now() -> HostTime` and `timebase() -> Timebase` free
//!   functions that read the platform's monotonic clock.
//!
//! - **Frame driver**: something that calls
//!   [`Scene::frame`](crate::scene::Scene::frame) once per display refresh
//!   (e.g. `requestAnimationFrame`). This is backend-specific and not
//!   abstracted by a trait.
//!
//! - **Presenter**: implements [`Presenter`] to create, move and remove
//!   visual elements in a native tree (SVG, DOM, a GPU scene).
//!
//! # Crate boundaries
//!
//! `arbor_core` owns the tree model, layout, viewport, the diff renderer and
//! this contract module. Presenters never see layout data; the renderer
//! pushes finished per-frame geometry. Their handles carry no state the core
//! depends on, so a presenter may be swapped for [`RecordingPresenter`] in
//! tests.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Affine, BezPath};

use crate::layout::NodeAttrs;
use crate::render::{ElementId, NodeGeometry};
use crate::tree::{LinkId, NodeId};

/// Creates, moves and removes visual elements on a platform-native tree.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(now: HostTime) {
///     // Data changed: relayout and diff (creates/updates/exits handles).
///     if tree_changed {
///         scene.render(&tree, now);
///     }
///     // Every frame: advance animations; the presenter receives
///     // node_frame/link_frame for elements that moved and remove() for
///     // elements whose exit finished.
///     let animating = scene.frame(now);
///     if animating { request_next_frame(); }
/// }
/// ```
pub trait Presenter {
    /// Backend reference to one visual element.
    type Handle;

    /// Creates a node element. It starts out interactive.
    fn create_node(&mut self, id: NodeId, attrs: &NodeAttrs) -> Self::Handle;

    /// Refreshes the data-driven attributes of a node element.
    fn update_node(&mut self, handle: &Self::Handle, attrs: &NodeAttrs);

    /// Creates a link element. It starts out interactive.
    fn create_link(&mut self, id: LinkId) -> Self::Handle;

    /// Enables or disables pointer interaction on an element.
    fn set_interactive(&mut self, handle: &Self::Handle, interactive: bool);

    /// Moves a node element.
    fn node_frame(&mut self, handle: &Self::Handle, geometry: &NodeGeometry);

    /// Reshapes a link element.
    fn link_frame(&mut self, handle: &Self::Handle, path: &BezPath, opacity: f64);

    /// Destroys an element.
    fn remove(&mut self, handle: Self::Handle);

    /// Sets the world→screen transform of the group holding all elements.
    fn set_view_transform(&mut self, transform: Affine);
}

// ---------------------------------------------------------------------------
// RecordingPresenter
// ---------------------------------------------------------------------------

/// One call received by a [`RecordingPresenter`].
#[derive(Clone, Debug, PartialEq)]
pub enum PresenterCall {
    /// An element was created.
    Create(ElementId),
    /// A node's attributes were refreshed.
    Update(ElementId),
    /// Interaction was toggled.
    SetInteractive(ElementId, bool),
    /// New per-frame geometry was pushed.
    Frame(ElementId),
    /// An element was destroyed.
    Remove(ElementId),
    /// The view transform changed.
    ViewTransform(Affine),
}

/// Last known state of an element held by a [`RecordingPresenter`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedElement {
    /// Which element this is.
    pub element: ElementId,
    /// Latest node attributes (`None` for links).
    pub attrs: Option<NodeAttrs>,
    /// Whether pointer interaction is enabled.
    pub interactive: bool,
    /// Latest node geometry (`None` for links or before the first frame).
    pub geometry: Option<NodeGeometry>,
    /// Latest link path (`None` for nodes or before the first frame).
    pub path: Option<BezPath>,
    /// Latest link opacity.
    pub opacity: f64,
}

/// A headless [`Presenter`] that keeps the state of every live element and a
/// log of every call.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    next_handle: u32,
    live: BTreeMap<u32, RecordedElement>,
    calls: Vec<PresenterCall>,
    view: Affine,
}

impl RecordingPresenter {
    /// Creates an empty presenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> &[PresenterCall] {
        &self.calls
    }

    /// Returns and clears the call log.
    pub fn take_calls(&mut self) -> Vec<PresenterCall> {
        core::mem::take(&mut self.calls)
    }

    /// Number of live elements.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Iterates over live elements in creation order.
    pub fn live(&self) -> impl Iterator<Item = &RecordedElement> {
        self.live.values()
    }

    /// Finds the live element for `element`.
    #[must_use]
    pub fn element(&self, element: ElementId) -> Option<&RecordedElement> {
        self.live.values().find(|e| e.element == element)
    }

    /// Finds the live node element for `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&RecordedElement> {
        self.element(ElementId::Node(id))
    }

    /// The last view transform set.
    #[must_use]
    pub fn view_transform(&self) -> Affine {
        self.view
    }

    fn create(&mut self, element: ElementId, attrs: Option<NodeAttrs>) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.insert(
            handle,
            RecordedElement {
                element,
                attrs,
                interactive: true,
                geometry: None,
                path: None,
                opacity: 1.0,
            },
        );
        self.calls.push(PresenterCall::Create(element));
        handle
    }

    fn with_live(&mut self, handle: u32, f: impl FnOnce(&mut RecordedElement) -> PresenterCall) {
        if let Some(el) = self.live.get_mut(&handle) {
            let call = f(el);
            self.calls.push(call);
        }
    }
}

impl Presenter for RecordingPresenter {
    type Handle = u32;

    fn create_node(&mut self, id: NodeId, attrs: &NodeAttrs) -> u32 {
        self.create(ElementId::Node(id), Some(attrs.clone()))
    }

    fn update_node(&mut self, handle: &u32, attrs: &NodeAttrs) {
        self.with_live(*handle, |el| {
            el.attrs = Some(attrs.clone());
            PresenterCall::Update(el.element)
        });
    }

    fn create_link(&mut self, id: LinkId) -> u32 {
        self.create(ElementId::Link(id), None)
    }

    fn set_interactive(&mut self, handle: &u32, interactive: bool) {
        self.with_live(*handle, |el| {
            el.interactive = interactive;
            PresenterCall::SetInteractive(el.element, interactive)
        });
    }

    fn node_frame(&mut self, handle: &u32, geometry: &NodeGeometry) {
        self.with_live(*handle, |el| {
            el.geometry = Some(*geometry);
            el.opacity = geometry.opacity;
            PresenterCall::Frame(el.element)
        });
    }

    fn link_frame(&mut self, handle: &u32, path: &BezPath, opacity: f64) {
        self.with_live(*handle, |el| {
            el.path = Some(path.clone());
            el.opacity = opacity;
            PresenterCall::Frame(el.element)
        });
    }

    fn remove(&mut self, handle: u32) {
        if let Some(el) = self.live.remove(&handle) {
            self.calls.push(PresenterCall::Remove(el.element));
        }
    }

    fn set_view_transform(&mut self, transform: Affine) {
        self.view = transform;
        self.calls.push(PresenterCall::ViewTransform(transform));
    }
}
