// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG element management.
//!
//! [`SvgPresenter`] keeps one `<g>` per node (a `<circle>` plus a `<text>`
//! label) and one `<path>` per link under a single view group whose
//! `transform` is the pan/zoom matrix. Links live in their own group below
//! the nodes so edges never paint over circles.
//!
//! Styling is left to CSS: every element carries `arbor-*` classes derived
//! from the node's kind, status and expansion state.

use alloc::format;
use alloc::string::String;
use core::fmt::Write as _;

use arbor_core::backend::Presenter;
use arbor_core::layout::NodeAttrs;
use arbor_core::render::NodeGeometry;
use arbor_core::tree::{LinkId, NodeId, NodeKind, NodeStatus};
use kurbo::{Affine, BezPath, PathEl};
use web_sys::{Document, Element};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Presents arbor elements as SVG under a caller-supplied `<svg>` root.
pub struct SvgPresenter {
    document: Document,
    view: Element,
    links: Element,
    nodes: Element,
    radius: f64,
}

impl core::fmt::Debug for SvgPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SvgPresenter")
            .field("view", &"SVGGElement")
            .field("radius", &self.radius)
            .finish_non_exhaustive()
    }
}

impl SvgPresenter {
    /// Creates the view, link and node groups under `root`.
    ///
    /// `radius` is the node circle radius in world units; pass the
    /// renderer's `node_radius` so hit testing matches what is drawn.
    #[must_use]
    pub fn new(root: &Element, radius: f64) -> Self {
        let document = root.owner_document().expect("no owner document");
        let view = create(&document, "g");
        let _ = view.set_attribute("class", "arbor-view");
        let links = create(&document, "g");
        let _ = links.set_attribute("class", "arbor-links");
        let nodes = create(&document, "g");
        let _ = nodes.set_attribute("class", "arbor-nodes");
        let _ = view.append_child(&links);
        let _ = view.append_child(&nodes);
        let _ = root.append_child(&view);
        Self {
            document,
            view,
            links,
            nodes,
            radius,
        }
    }

    /// The group carrying the view transform.
    #[must_use]
    pub fn view(&self) -> &Element {
        &self.view
    }
}

fn create(document: &Document, tag: &str) -> Element {
    document
        .create_element_ns(Some(SVG_NS), tag)
        .expect("create_element_ns failed")
}

fn kind_class(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Root => "root",
        NodeKind::Branch => "branch",
        NodeKind::Leaf => "leaf",
        NodeKind::Exam => "exam",
    }
}

fn status_class(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Available => "available",
        NodeStatus::Loading => "loading",
        NodeStatus::Locked => "locked",
        NodeStatus::Completed => "completed",
    }
}

fn node_class(attrs: &NodeAttrs) -> String {
    let mut class = format!(
        "arbor-node arbor-{} arbor-{}",
        kind_class(attrs.kind),
        status_class(attrs.status)
    );
    if attrs.expanded {
        class.push_str(" arbor-expanded");
    }
    if attrs.has_children {
        class.push_str(" arbor-has-children");
    }
    class
}

/// Formats `path` as SVG path data.
pub(crate) fn path_data(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.elements() {
        let _ = match *el {
            PathEl::MoveTo(p) => write!(d, "M{} {}", p.x, p.y),
            PathEl::LineTo(p) => write!(d, "L{} {}", p.x, p.y),
            PathEl::QuadTo(a, p) => write!(d, "Q{} {} {} {}", a.x, a.y, p.x, p.y),
            PathEl::CurveTo(a, b, p) => {
                write!(d, "C{} {} {} {} {} {}", a.x, a.y, b.x, b.y, p.x, p.y)
            }
            PathEl::ClosePath => write!(d, "Z"),
        };
    }
    d
}

/// Formats an affine as an SVG `matrix(...)` transform.
pub(crate) fn matrix(transform: Affine) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    format!("matrix({a} {b} {c} {d} {e} {f})")
}

impl Presenter for SvgPresenter {
    type Handle = Element;

    fn create_node(&mut self, id: NodeId, attrs: &NodeAttrs) -> Element {
        let group = create(&self.document, "g");
        let _ = group.set_attribute("data-id", &format!("{id}"));
        let _ = group.set_attribute("transform", "scale(0)");
        let circle = create(&self.document, "circle");
        let _ = circle.set_attribute("r", &format!("{}", self.radius));
        let label = create(&self.document, "text");
        let _ = label.set_attribute("text-anchor", "middle");
        let _ = label.set_attribute("dy", &format!("{}", self.radius + 16.0));
        let _ = group.append_child(&circle);
        let _ = group.append_child(&label);
        let _ = self.nodes.append_child(&group);
        self.update_node(&group, attrs);
        group
    }

    fn update_node(&mut self, handle: &Element, attrs: &NodeAttrs) {
        let _ = handle.set_attribute("class", &node_class(attrs));
        if let Some(label) = handle.last_element_child() {
            label.set_text_content(Some(&attrs.name));
        }
    }

    fn create_link(&mut self, id: LinkId) -> Element {
        let path = create(&self.document, "path");
        let _ = path.set_attribute("class", "arbor-link");
        let _ = path.set_attribute("fill", "none");
        let _ = path.set_attribute("data-source", &format!("{}", id.source));
        let _ = path.set_attribute("data-target", &format!("{}", id.target));
        let _ = self.links.append_child(&path);
        path
    }

    fn set_interactive(&mut self, handle: &Element, interactive: bool) {
        if interactive {
            let _ = handle.remove_attribute("pointer-events");
        } else {
            let _ = handle.set_attribute("pointer-events", "none");
        }
    }

    fn node_frame(&mut self, handle: &Element, geometry: &NodeGeometry) {
        let p = geometry.position;
        let _ = handle.set_attribute(
            "transform",
            &format!("translate({} {}) scale({})", p.x, p.y, geometry.scale),
        );
        let _ = handle.set_attribute("opacity", &format!("{}", geometry.opacity));
    }

    fn link_frame(&mut self, handle: &Element, path: &BezPath, opacity: f64) {
        let _ = handle.set_attribute("d", &path_data(path));
        let _ = handle.set_attribute("opacity", &format!("{opacity}"));
    }

    fn remove(&mut self, handle: Element) {
        handle.remove();
    }

    fn set_view_transform(&mut self, transform: Affine) {
        let _ = self.view.set_attribute("transform", &matrix(transform));
    }
}
