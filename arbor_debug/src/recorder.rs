// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, keeping per-kind
//! [`EventCounts`] as it goes. [`decode`] reads the records back as an
//! iterator of [`RecordedEvent`].

use arbor_core::layout::{RejectReason, Rejection};
use arbor_core::render::ElementId;
use arbor_core::time::HostTime;
use arbor_core::trace::{
    LayoutEvent, RemovedEvent, RenderPassEvent, RetargetEvent, TargetSource, TraceSink,
    ViewportCause, ViewportEvent,
};
use arbor_core::tree::{LinkId, NodeId};
use arbor_core::viewport::ViewTransform;
use kurbo::{Point, Rect, Size};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_REJECTED: u8 = 1;
const TAG_RESIZE_IGNORED: u8 = 2;
const TAG_LAYOUT: u8 = 3;
const TAG_RENDER_PASS: u8 = 4;
const TAG_EXIT_RETARGET: u8 = 5;
const TAG_REMOVED: u8 = 6;
const TAG_VIEWPORT: u8 = 7;

const CAUSES: [ViewportCause; 8] = [
    ViewportCause::Bounds,
    ViewportCause::Resize,
    ViewportCause::ZoomTo,
    ViewportCause::Focus,
    ViewportCause::Fit,
    ViewportCause::Drag,
    ViewportCause::Wheel,
    ViewportCause::Animation,
];

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// How many events of each kind a [`RecorderSink`] has seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventCounts {
    /// Rejected nodes.
    pub rejected: usize,
    /// Ignored resizes.
    pub resize_ignored: usize,
    /// Layout passes.
    pub layouts: usize,
    /// Renderer diff passes.
    pub render_passes: usize,
    /// Exit target assignments.
    pub exit_retargets: usize,
    /// Removed elements.
    pub removed: usize,
    /// View transform changes.
    pub viewport: usize,
}

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
    counts: EventCounts,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Per-kind event totals.
    #[must_use]
    pub fn counts(&self) -> EventCounts {
        self.counts
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.counts = EventCounts::default();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, v: usize) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "event counts capped at u32::MAX for recording"
        )]
        self.write_u32(v.min(u32::MAX as usize) as u32);
    }

    fn write_option_id(&mut self, v: Option<NodeId>) {
        match v {
            Some(id) => {
                self.write_u8(1);
                self.write_u64(id.0);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_point(&mut self, p: Point) {
        self.write_f64(p.x);
        self.write_f64(p.y);
    }

    fn write_element(&mut self, e: ElementId) {
        match e {
            ElementId::Node(id) => {
                self.write_u8(0);
                self.write_u64(id.0);
                self.write_u64(0);
            }
            ElementId::Link(id) => {
                self.write_u8(1);
                self.write_u64(id.source.0);
                self.write_u64(id.target.0);
            }
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_rejected_node(&mut self, r: &Rejection) {
        self.counts.rejected += 1;
        self.write_u8(TAG_REJECTED);
        self.write_u64(r.id.0);
        self.write_option_id(r.parent);
        let (reason, declared) = match r.reason {
            RejectReason::MissingNode => (0, None),
            RejectReason::Cycle => (1, None),
            RejectReason::Duplicate => (2, None),
            RejectReason::ParentMismatch { declared } => (3, Some(declared)),
            RejectReason::MissingRoot => (4, None),
        };
        self.write_u8(reason);
        self.write_option_id(declared);
    }

    fn on_resize_ignored(&mut self, size: Size) {
        self.counts.resize_ignored += 1;
        self.write_u8(TAG_RESIZE_IGNORED);
        self.write_f64(size.width);
        self.write_f64(size.height);
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        self.counts.layouts += 1;
        self.write_u8(TAG_LAYOUT);
        self.write_u64(e.now.ticks());
        self.write_count(e.nodes);
        self.write_count(e.links);
        self.write_count(e.rejected);
        self.write_f64(e.bounds.x0);
        self.write_f64(e.bounds.y0);
        self.write_f64(e.bounds.x1);
        self.write_f64(e.bounds.y1);
    }

    fn on_render_pass(&mut self, e: &RenderPassEvent) {
        self.counts.render_passes += 1;
        self.write_u8(TAG_RENDER_PASS);
        self.write_u64(e.now.ticks());
        for n in [
            e.entered,
            e.updated,
            e.exited,
            e.revived,
            e.retargeted,
            e.exiting,
        ] {
            self.write_count(n);
        }
    }

    fn on_exit_retarget(&mut self, e: &RetargetEvent) {
        self.counts.exit_retargets += 1;
        self.write_u8(TAG_EXIT_RETARGET);
        self.write_u64(e.now.ticks());
        self.write_element(e.element);
        self.write_point(e.target);
        match e.source {
            TargetSource::Parent(id) => {
                self.write_u8(0);
                self.write_u64(id.0);
            }
            TargetSource::Ancestor(id) => {
                self.write_u8(1);
                self.write_u64(id.0);
            }
            TargetSource::InPlace => {
                self.write_u8(2);
                self.write_u64(0);
            }
        }
    }

    fn on_removed(&mut self, e: &RemovedEvent) {
        self.counts.removed += 1;
        self.write_u8(TAG_REMOVED);
        self.write_u64(e.now.ticks());
        self.write_element(e.element);
    }

    fn on_viewport(&mut self, e: &ViewportEvent) {
        self.counts.viewport += 1;
        self.write_u8(TAG_VIEWPORT);
        self.write_u64(e.now.ticks());
        let cause = CAUSES.iter().position(|c| *c == e.cause).unwrap_or(0);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "index into an 8-element table"
        )]
        self.write_u8(cause as u8);
        self.write_f64(e.transform.x);
        self.write_f64(e.transform.y);
        self.write_f64(e.transform.k);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A skipped node.
    Rejected(Rejection),
    /// An ignored viewport size.
    ResizeIgnored(Size),
    /// A [`LayoutEvent`].
    Layout(LayoutEvent),
    /// A [`RenderPassEvent`].
    RenderPass(RenderPassEvent),
    /// A [`RetargetEvent`].
    ExitRetarget(RetargetEvent),
    /// A [`RemovedEvent`].
    Removed(RemovedEvent),
    /// A [`ViewportEvent`].
    Viewport(ViewportEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_count(&mut self) -> Option<usize> {
        self.read_u32().map(|v| v as usize)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_option_id(&mut self) -> Option<Option<NodeId>> {
        let present = self.read_u8()?;
        let id = NodeId(self.read_u64()?);
        Some((present != 0).then_some(id))
    }

    fn read_point(&mut self) -> Option<Point> {
        Some(Point::new(self.read_f64()?, self.read_f64()?))
    }

    fn read_element(&mut self) -> Option<ElementId> {
        let tag = self.read_u8()?;
        let a = NodeId(self.read_u64()?);
        let b = NodeId(self.read_u64()?);
        Some(match tag {
            0 => ElementId::Node(a),
            _ => ElementId::Link(LinkId::new(a, b)),
        })
    }

    fn decode_rejected(&mut self) -> Option<RecordedEvent> {
        let id = NodeId(self.read_u64()?);
        let parent = self.read_option_id()?;
        let tag = self.read_u8()?;
        let declared = self.read_option_id()?;
        let reason = match (tag, declared) {
            (0, _) => RejectReason::MissingNode,
            (1, _) => RejectReason::Cycle,
            (2, _) => RejectReason::Duplicate,
            (3, Some(declared)) => RejectReason::ParentMismatch { declared },
            (4, _) => RejectReason::MissingRoot,
            _ => return None,
        };
        Some(RecordedEvent::Rejected(Rejection { id, parent, reason }))
    }

    fn decode_resize_ignored(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ResizeIgnored(Size::new(
            self.read_f64()?,
            self.read_f64()?,
        )))
    }

    fn decode_layout(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Layout(LayoutEvent {
            now: self.read_time()?,
            nodes: self.read_count()?,
            links: self.read_count()?,
            rejected: self.read_count()?,
            bounds: Rect::new(
                self.read_f64()?,
                self.read_f64()?,
                self.read_f64()?,
                self.read_f64()?,
            ),
        }))
    }

    fn decode_render_pass(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderPass(RenderPassEvent {
            now: self.read_time()?,
            entered: self.read_count()?,
            updated: self.read_count()?,
            exited: self.read_count()?,
            revived: self.read_count()?,
            retargeted: self.read_count()?,
            exiting: self.read_count()?,
        }))
    }

    fn decode_exit_retarget(&mut self) -> Option<RecordedEvent> {
        let now = self.read_time()?;
        let element = self.read_element()?;
        let target = self.read_point()?;
        let tag = self.read_u8()?;
        let id = NodeId(self.read_u64()?);
        let source = match tag {
            0 => TargetSource::Parent(id),
            1 => TargetSource::Ancestor(id),
            _ => TargetSource::InPlace,
        };
        Some(RecordedEvent::ExitRetarget(RetargetEvent {
            now,
            element,
            target,
            source,
        }))
    }

    fn decode_removed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Removed(RemovedEvent {
            now: self.read_time()?,
            element: self.read_element()?,
        }))
    }

    fn decode_viewport(&mut self) -> Option<RecordedEvent> {
        let now = self.read_time()?;
        let cause = *CAUSES.get(usize::from(self.read_u8()?))?;
        let transform = ViewTransform::new(self.read_f64()?, self.read_f64()?, self.read_f64()?);
        Some(RecordedEvent::Viewport(ViewportEvent {
            now,
            cause,
            transform,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_REJECTED => self.decode_rejected(),
            TAG_RESIZE_IGNORED => self.decode_resize_ignored(),
            TAG_LAYOUT => self.decode_layout(),
            TAG_RENDER_PASS => self.decode_render_pass(),
            TAG_EXIT_RETARGET => self.decode_exit_retarget(),
            TAG_REMOVED => self.decode_removed(),
            TAG_VIEWPORT => self.decode_viewport(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
