// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of a layout and the view onto it.
//!
//! Useful for diffing layouts between runs or feeding a quick external
//! viewer. Node kinds and statuses are written by their `Debug` names.

use std::io::{self, Write};

use serde_json::{Value, json};

use arbor_core::layout::Layout;
use arbor_core::viewport::ViewTransform;

/// Builds the snapshot as a JSON value.
#[must_use]
pub fn to_value(layout: &Layout, transform: ViewTransform) -> Value {
    let nodes: Vec<Value> = layout
        .nodes
        .iter()
        .map(|node| {
            json!({
                "id": node.id.0,
                "name": node.attrs.name,
                "kind": format!("{:?}", node.attrs.kind),
                "status": format!("{:?}", node.attrs.status),
                "expanded": node.attrs.expanded,
                "depth": node.depth,
                "x": node.position.x,
                "y": node.position.y,
                "parent": node.parent.map(|p| layout.nodes[p].id.0),
            })
        })
        .collect();
    let links: Vec<Value> = layout
        .links
        .iter()
        .map(|link| json!({ "source": link.id.source.0, "target": link.id.target.0 }))
        .collect();
    let rejected: Vec<Value> = layout
        .rejected
        .iter()
        .map(|r| {
            json!({
                "id": r.id.0,
                "parent": r.parent.map(|p| p.0),
                "reason": format!("{:?}", r.reason),
            })
        })
        .collect();
    let b = layout.bounds;
    json!({
        "transform": { "x": transform.x, "y": transform.y, "k": transform.k },
        "bounds": [b.x0, b.y0, b.x1, b.y1],
        "nodes": nodes,
        "links": links,
        "rejected": rejected,
    })
}

/// Writes the snapshot as pretty-printed JSON.
pub fn export(layout: &Layout, transform: ViewTransform, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, &to_value(layout, transform))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::layout::{LayoutConfig, compute_layout};
    use arbor_core::tree::{NodeId, NodeKind, Tree, TreeNode};
    use kurbo::Size;

    #[test]
    fn snapshot_lists_nodes_links_and_rejections() {
        let mut root = TreeNode::new(NodeId(1), NodeKind::Root, "Course");
        root.expanded = true;
        root.children = Some(vec![NodeId(2), NodeId(99)]);
        let mut tree = Tree::with_root(root);
        let mut exam = TreeNode::new(NodeId(2), NodeKind::Exam, "Final");
        exam.parent_id = Some(NodeId(1));
        tree.insert(exam);

        let layout = compute_layout(&tree, Size::new(800.0, 600.0), &LayoutConfig::standard());
        let mut out = Vec::new();
        export(&layout, ViewTransform::new(5.0, 6.0, 2.0), &mut out).unwrap();
        let v: Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(v["transform"]["k"], 2.0);
        assert_eq!(v["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(v["nodes"][0]["name"], "Course");
        assert_eq!(v["nodes"][0]["parent"], Value::Null);
        assert_eq!(v["nodes"][1]["kind"], "Exam");
        assert_eq!(v["nodes"][1]["parent"], 1);
        assert_eq!(v["links"][0], json!({ "source": 1, "target": 2 }));
        assert_eq!(v["rejected"][0]["id"], 99);
        assert_eq!(v["rejected"][0]["reason"], "MissingNode");
    }
}
