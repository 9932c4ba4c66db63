// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use arbor_core::layout::{RejectReason, Rejection};
use arbor_core::time::{HostTime, Timebase};
use arbor_core::trace::{
    LayoutEvent, RemovedEvent, RenderPassEvent, RetargetEvent, TargetSource, TraceSink,
    ViewportEvent,
};
use kurbo::Size;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }
}

fn reason(r: RejectReason) -> String {
    match r {
        RejectReason::MissingNode => "missing".into(),
        RejectReason::Cycle => "cycle".into(),
        RejectReason::Duplicate => "duplicate".into(),
        RejectReason::ParentMismatch { declared } => format!("parent-mismatch(declared={declared})"),
        RejectReason::MissingRoot => "missing-root".into(),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_rejected_node(&mut self, r: &Rejection) {
        let parent = r.parent.map_or_else(|| "-".into(), |p| p.to_string());
        let _ = writeln!(
            self.writer,
            "[rejected] node={} parent={parent} reason={}",
            r.id,
            reason(r.reason),
        );
    }

    fn on_resize_ignored(&mut self, size: Size) {
        let _ = writeln!(
            self.writer,
            "[resize:ignored] {}x{}",
            size.width, size.height
        );
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        let _ = writeln!(
            self.writer,
            "[layout] at {:.1}ms nodes={} links={} rejected={} bounds=({:.0},{:.0})-({:.0},{:.0})",
            self.ms(e.now),
            e.nodes,
            e.links,
            e.rejected,
            e.bounds.x0,
            e.bounds.y0,
            e.bounds.x1,
            e.bounds.y1,
        );
    }

    fn on_render_pass(&mut self, e: &RenderPassEvent) {
        let _ = writeln!(
            self.writer,
            "[render] at {:.1}ms +{} ~{} -{} revived={} retargeted={} exiting={}",
            self.ms(e.now),
            e.entered,
            e.updated,
            e.exited,
            e.revived,
            e.retargeted,
            e.exiting,
        );
    }

    fn on_exit_retarget(&mut self, e: &RetargetEvent) {
        let source = match e.source {
            TargetSource::Parent(id) => format!("parent {id}"),
            TargetSource::Ancestor(id) => format!("ancestor {id}"),
            TargetSource::InPlace => "in place".into(),
        };
        let _ = writeln!(
            self.writer,
            "[exit] at {:.1}ms {} -> ({:.1},{:.1}) via {source}",
            self.ms(e.now),
            e.element,
            e.target.x,
            e.target.y,
        );
    }

    fn on_removed(&mut self, e: &RemovedEvent) {
        let _ = writeln!(
            self.writer,
            "[removed] at {:.1}ms {}",
            self.ms(e.now),
            e.element
        );
    }

    fn on_viewport(&mut self, e: &ViewportEvent) {
        let _ = writeln!(
            self.writer,
            "[view] at {:.1}ms {:?} x={:.1} y={:.1} k={:.3}",
            self.ms(e.now),
            e.cause,
            e.transform.x,
            e.transform.y,
            e.transform.k,
        );
    }
}
