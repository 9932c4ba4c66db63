// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//! Layout and render passes become instant events, exiting elements become
//! instants on a per-kind track, and view transform changes become counter
//! series so pans and zooms show up as curves.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use arbor_core::render::ElementId;
use arbor_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

fn element_tid(element: ElementId) -> u32 {
    match element {
        ElementId::Node(_) => 1,
        ElementId::Link(_) => 2,
    }
}

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
/// Input diagnostics carry no timestamp and are placed at zero.
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Rejected(r) => {
                events.push(json!({
                    "ph": "i",
                    "name": "RejectedNode",
                    "cat": "Input",
                    "ts": 0,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "id": r.id.0,
                        "parent": r.parent.map(|p| p.0),
                        "reason": format!("{:?}", r.reason),
                    }
                }));
            }
            RecordedEvent::ResizeIgnored(size) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ResizeIgnored",
                    "cat": "Input",
                    "ts": 0,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "width": size.width,
                        "height": size.height,
                    }
                }));
            }
            RecordedEvent::Layout(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Layout",
                    "cat": "Layout",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "nodes": e.nodes,
                        "links": e.links,
                        "rejected": e.rejected,
                        "bounds": [e.bounds.x0, e.bounds.y0, e.bounds.x1, e.bounds.y1],
                    }
                }));
            }
            RecordedEvent::RenderPass(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "RenderPass",
                    "cat": "Render",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "entered": e.entered,
                        "updated": e.updated,
                        "exited": e.exited,
                        "revived": e.revived,
                        "retargeted": e.retargeted,
                        "exiting": e.exiting,
                    }
                }));
            }
            RecordedEvent::ExitRetarget(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ExitTarget",
                    "cat": "Render",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": element_tid(e.element),
                    "s": "t",
                    "args": {
                        "element": e.element.to_string(),
                        "target": [e.target.x, e.target.y],
                        "source": format!("{:?}", e.source),
                    }
                }));
            }
            RecordedEvent::Removed(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Removed",
                    "cat": "Render",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": element_tid(e.element),
                    "s": "t",
                    "args": {
                        "element": e.element.to_string(),
                    }
                }));
            }
            RecordedEvent::Viewport(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": "ViewTransform",
                    "cat": "Viewport",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "x": e.transform.x,
                        "y": e.transform.y,
                        "k": e.transform.k,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use arbor_core::time::HostTime;
    use arbor_core::trace::{RemovedEvent, TraceSink, ViewportCause, ViewportEvent};
    use arbor_core::tree::NodeId;
    use arbor_core::viewport::ViewTransform;

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_viewport(&ViewportEvent {
            now: HostTime(2_000_000),
            cause: ViewportCause::Wheel,
            transform: ViewTransform::new(10.0, -5.0, 1.5),
        });
        rec.on_removed(&RemovedEvent {
            now: HostTime(3_000_000),
            element: ElementId::Node(NodeId(4)),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        let events = parsed.as_array().unwrap();
        assert_eq!(events.len(), 2);

        assert_eq!(events[0]["ph"], "C");
        assert_eq!(events[0]["ts"], 2000.0);
        assert_eq!(events[0]["args"]["k"], 1.5);

        assert_eq!(events[1]["name"], "Removed");
        assert_eq!(events[1]["tid"], 1);
        assert_eq!(events[1]["args"]["element"], "node 4");
    }

    #[test]
    fn empty_recording_exports_empty_array() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]");
    }
}
