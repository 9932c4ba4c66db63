// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for layout, rendering and viewport changes.
//!
//! This module provides a [`TraceSink`] trait with one method per event. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. Two events are always
//! dispatched because they report problems with caller input:
//!
//! - [`on_rejected_node`](TraceSink::on_rejected_node): a malformed tree node
//!   was skipped by the layout pass.
//! - [`on_resize_ignored`](TraceSink::on_resize_ignored): a zero-sized or
//!   non-finite viewport was ignored.
//!
//! The remaining events are verbose. Without the `trace` feature their
//! `Tracer` methods compile to nothing.
//!
//! # Crate features
//!
//! - `trace`: enables the verbose `Tracer` method bodies (one branch per
//!   call).

use kurbo::{Point, Rect, Size};

use crate::layout::Rejection;
use crate::render::ElementId;
use crate::time::HostTime;
use crate::tree::NodeId;
use crate::viewport::ViewTransform;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Where an exiting element's collapse target came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetSource {
    /// The recorded parent is still laid out.
    Parent(NodeId),
    /// A more distant cached ancestor is still laid out.
    Ancestor(NodeId),
    /// No ancestor survived; the element shrinks where it is.
    InPlace,
}

/// What moved the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewportCause {
    /// New layout bounds were applied.
    Bounds,
    /// The viewing window was resized.
    Resize,
    /// A programmatic zoom was requested.
    ZoomTo,
    /// A node was brought to the focus anchor.
    Focus,
    /// The whole content was fitted.
    Fit,
    /// A background drag moved the view.
    Drag,
    /// A wheel or pinch zoom.
    Wheel,
    /// A running animation advanced.
    Animation,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after each layout pass.
#[derive(Clone, Copy, Debug)]
pub struct LayoutEvent {
    /// Host time of the pass.
    pub now: HostTime,
    /// Number of laid-out nodes.
    pub nodes: usize,
    /// Number of links.
    pub links: usize,
    /// Number of skipped nodes.
    pub rejected: usize,
    /// Bounds of the result.
    pub bounds: Rect,
}

/// Emitted after each diff pass of the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderPassEvent {
    /// Host time of the pass.
    pub now: HostTime,
    /// Elements created this pass.
    pub entered: usize,
    /// Elements repositioned this pass.
    pub updated: usize,
    /// Elements that started exiting this pass.
    pub exited: usize,
    /// Exiting elements brought back before their removal fired.
    pub revived: usize,
    /// Already-exiting elements whose collapse target was recomputed.
    pub retargeted: usize,
    /// Elements still exiting after the pass.
    pub exiting: usize,
}

/// Emitted when an exiting element gets a collapse target.
#[derive(Clone, Copy, Debug)]
pub struct RetargetEvent {
    /// Host time.
    pub now: HostTime,
    /// The exiting element.
    pub element: ElementId,
    /// Resolved collapse target.
    pub target: Point,
    /// How the target was resolved.
    pub source: TargetSource,
}

/// Emitted when an exited element's handle is finally removed.
#[derive(Clone, Copy, Debug)]
pub struct RemovedEvent {
    /// Host time.
    pub now: HostTime,
    /// The removed element.
    pub element: ElementId,
}

/// Emitted when the view transform changes.
#[derive(Clone, Copy, Debug)]
pub struct ViewportEvent {
    /// Host time.
    pub now: HostTime,
    /// What changed it.
    pub cause: ViewportCause,
    /// The new clamped transform.
    pub transform: ViewTransform,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives diagnostic events.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called for every malformed node skipped by layout.
    fn on_rejected_node(&mut self, r: &Rejection) {
        _ = r;
    }

    /// Called when a zero-sized or non-finite viewport is ignored.
    fn on_resize_ignored(&mut self, size: Size) {
        _ = size;
    }

    /// Called after a layout pass.
    fn on_layout(&mut self, e: &LayoutEvent) {
        _ = e;
    }

    /// Called after a renderer diff pass.
    fn on_render_pass(&mut self, e: &RenderPassEvent) {
        _ = e;
    }

    /// Called when an exiting element gets (or changes) its collapse target.
    fn on_exit_retarget(&mut self, e: &RetargetEvent) {
        _ = e;
    }

    /// Called when an exited element is removed.
    fn on_removed(&mut self, e: &RemovedEvent) {
        _ = e;
    }

    /// Called when the view transform changes.
    fn on_viewport(&mut self, e: &ViewportEvent) {
        _ = e;
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn on_rejected_node(&mut self, r: &Rejection) {
        (**self).on_rejected_node(r);
    }

    fn on_resize_ignored(&mut self, size: Size) {
        (**self).on_resize_ignored(size);
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        (**self).on_layout(e);
    }

    fn on_render_pass(&mut self, e: &RenderPassEvent) {
        (**self).on_render_pass(e);
    }

    fn on_exit_retarget(&mut self, e: &RetargetEvent) {
        (**self).on_exit_retarget(e);
    }

    fn on_removed(&mut self, e: &RemovedEvent) {
        (**self).on_removed(e);
    }

    fn on_viewport(&mut self, e: &ViewportEvent) {
        (**self).on_viewport(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// Input diagnostics are always forwarded. Verbose events are forwarded only
/// with the `trace` feature and otherwise compile to nothing.
pub struct Tracer<'a> {
    sink: Option<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("attached", &self.sink.is_some())
            .finish()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        Self { sink: Some(sink) }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self { sink: None }
    }

    /// Reports a skipped node.
    #[inline]
    pub fn rejected_node(&mut self, r: &Rejection) {
        if let Some(s) = &mut self.sink {
            s.on_rejected_node(r);
        }
    }

    /// Reports an ignored resize.
    #[inline]
    pub fn resize_ignored(&mut self, size: Size) {
        if let Some(s) = &mut self.sink {
            s.on_resize_ignored(size);
        }
    }

    /// Emits a [`LayoutEvent`].
    #[inline]
    pub fn layout(&mut self, e: &LayoutEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RenderPassEvent`].
    #[inline]
    pub fn render_pass(&mut self, e: &RenderPassEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_render_pass(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RetargetEvent`].
    #[inline]
    pub fn exit_retarget(&mut self, e: &RetargetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_exit_retarget(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RemovedEvent`].
    #[inline]
    pub fn removed(&mut self, e: &RemovedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_removed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ViewportEvent`].
    #[inline]
    pub fn viewport(&mut self, e: &ViewportEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_viewport(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::RejectReason;

    #[derive(Default)]
    struct Counting {
        rejected: usize,
        ignored: usize,
        passes: usize,
    }

    impl TraceSink for Counting {
        fn on_rejected_node(&mut self, _: &Rejection) {
            self.rejected += 1;
        }

        fn on_resize_ignored(&mut self, _: Size) {
            self.ignored += 1;
        }

        fn on_render_pass(&mut self, _: &RenderPassEvent) {
            self.passes += 1;
        }
    }

    #[test]
    fn input_diagnostics_are_always_dispatched() {
        let mut sink = Counting::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.rejected_node(&Rejection {
                id: NodeId(3),
                parent: None,
                reason: RejectReason::MissingNode,
            });
            tracer.resize_ignored(Size::ZERO);
        }
        assert_eq!(sink.rejected, 1);
        assert_eq!(sink.ignored, 1);
    }

    #[test]
    fn verbose_events_follow_the_feature() {
        let mut sink = Counting::default();
        Tracer::new(&mut sink).render_pass(&RenderPassEvent::default());
        assert_eq!(sink.passes, usize::from(cfg!(feature = "trace")));
    }

    #[test]
    fn none_discards_everything() {
        let mut tracer = Tracer::none();
        tracer.resize_ignored(Size::ZERO);
        tracer.render_pass(&RenderPassEvent::default());
    }
}
