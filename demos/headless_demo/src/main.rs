// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated session that exercises the scene, renderer and diagnostics.
//!
//! Builds a small course tree, then clicks, collapses, deletes a subtree in
//! the middle of its collapse, focuses and fits, all against a
//! [`RecordingPresenter`] and a 60 Hz fake clock. Every trace event is
//! printed through a [`PrettyPrintSink`] and recorded with a
//! [`RecorderSink`]; the recording is exported as `trace.json` and the final
//! layout as `snapshot.json`.

use std::fs::File;
use std::io::{BufWriter, Stdout};

use arbor_core::backend::{PresenterCall, RecordingPresenter};
use arbor_core::event::{ExpansionPolicy, SceneEvent};
use arbor_core::layout::Rejection;
use arbor_core::scene::{Scene, SceneConfig};
use arbor_core::time::{Duration, HostTime, Timebase};
use arbor_core::trace::{
    LayoutEvent, RemovedEvent, RenderPassEvent, RetargetEvent, TraceSink, ViewportEvent,
};
use arbor_core::tree::{NodeId, NodeKind, NodeStatus, Tree, TreeNode};
use kurbo::Size;

use arbor_debug::pretty::PrettyPrintSink;
use arbor_debug::recorder::RecorderSink;

/// 16.6ms refresh interval in nanoseconds (≈60 Hz).
const REFRESH_INTERVAL_NS: u64 = 16_666_667;

/// Forwards every event to both sinks.
struct Both {
    pretty: PrettyPrintSink<Stdout>,
    recorder: RecorderSink,
}

impl TraceSink for Both {
    fn on_rejected_node(&mut self, r: &Rejection) {
        self.pretty.on_rejected_node(r);
        self.recorder.on_rejected_node(r);
    }

    fn on_resize_ignored(&mut self, size: Size) {
        self.pretty.on_resize_ignored(size);
        self.recorder.on_resize_ignored(size);
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        self.pretty.on_layout(e);
        self.recorder.on_layout(e);
    }

    fn on_render_pass(&mut self, e: &RenderPassEvent) {
        self.pretty.on_render_pass(e);
        self.recorder.on_render_pass(e);
    }

    fn on_exit_retarget(&mut self, e: &RetargetEvent) {
        self.pretty.on_exit_retarget(e);
        self.recorder.on_exit_retarget(e);
    }

    fn on_removed(&mut self, e: &RemovedEvent) {
        self.pretty.on_removed(e);
        self.recorder.on_removed(e);
    }

    fn on_viewport(&mut self, e: &ViewportEvent) {
        self.pretty.on_viewport(e);
        self.recorder.on_viewport(e);
    }
}

type DemoScene = Scene<RecordingPresenter, Both>;

struct Clock(HostTime);

impl Clock {
    fn tick(&mut self) -> HostTime {
        self.0 = self.0 + Duration(REFRESH_INTERVAL_NS);
        self.0
    }
}

fn course() -> Tree {
    let mut root = TreeNode::new(NodeId(1), NodeKind::Root, "Mathematics");
    root.expanded = true;
    let mut tree = Tree::with_root(root);

    let units = [
        (10, "Algebra", ["Equations", "Inequalities", "Polynomials"]),
        (20, "Geometry", ["Triangles", "Circles", "Vectors"]),
        (30, "Statistics", ["Mean", "Variance", "Regression"]),
    ];
    for (id, name, lessons) in units {
        tree.add_child(NodeId(1), TreeNode::new(NodeId(id), NodeKind::Branch, name));
        for (i, lesson) in (1..).zip(lessons) {
            let mut leaf = TreeNode::new(NodeId(id + i), NodeKind::Leaf, lesson);
            if i == 3 {
                leaf.status = NodeStatus::Locked;
            }
            tree.add_child(NodeId(id), leaf);
        }
        let exam = TreeNode::new(NodeId(id + 9), NodeKind::Exam, format!("{name} exam"));
        tree.add_child(NodeId(id), exam);
    }
    tree
}

/// Runs frames until nothing animates, then reports how much presenter work
/// the phase took and clears the presenter's call log.
fn settle(scene: &mut DemoScene, clock: &mut Clock) {
    let mut frames = 1;
    while scene.frame(clock.tick()) {
        frames += 1;
    }
    let calls = scene.presenter_mut().take_calls();
    let removed = calls
        .iter()
        .filter(|c| matches!(c, PresenterCall::Remove(_)))
        .count();
    println!(
        "settled after {frames} frames: {} presenter calls, {removed} removals",
        calls.len()
    );
}

/// Clicks a node where it is currently drawn.
fn click(scene: &mut DemoScene, id: NodeId) {
    let world = scene.layout().position(id).expect("node is laid out");
    let screen = scene.viewport().world_to_screen(world);
    scene.pointer_down_at(screen);
    scene.pointer_up(screen);
}

/// Applies the scene's requests to the tree. Returns `true` if it changed.
fn apply(scene: &mut DemoScene, tree: &mut Tree) -> bool {
    let mut changed = false;
    for event in scene.drain_events() {
        println!("  event: {event:?}");
        if let SceneEvent::ExpansionRequested { id, expand } = event {
            changed |= tree.set_expanded(id, expand);
        }
    }
    changed
}

fn main() {
    let timebase = Timebase::NANOS;
    let sink = Both {
        pretty: PrettyPrintSink::with_writer(std::io::stdout(), timebase),
        recorder: RecorderSink::new(),
    };
    let config = SceneConfig {
        policy: ExpansionPolicy::SingleBranchPerParent,
        ..SceneConfig::standard(timebase)
    };
    let mut scene = Scene::with_sink(
        RecordingPresenter::new(),
        Size::new(960.0, 640.0),
        config,
        sink,
    );
    let mut clock = Clock(HostTime(1_000_000_000));
    let mut tree = course();

    println!("== first render");
    scene.render(&tree, clock.0);
    settle(&mut scene, &mut clock);

    println!("== open Algebra");
    click(&mut scene, NodeId(10));
    if apply(&mut scene, &mut tree) {
        scene.render(&tree, clock.0);
    }
    settle(&mut scene, &mut clock);

    println!("== open Geometry (Algebra collapses)");
    click(&mut scene, NodeId(20));
    if apply(&mut scene, &mut tree) {
        scene.render(&tree, clock.0);
    }
    for _ in 0..8 {
        scene.frame(clock.tick());
    }

    println!("== delete Algebra while it is still collapsing");
    tree.remove_subtree(NodeId(10));
    scene.render(&tree, clock.0);
    settle(&mut scene, &mut clock);

    println!("== focus the Geometry exam, then fit");
    scene.focus_node(NodeId(29), Some(1.5), clock.0);
    settle(&mut scene, &mut clock);
    scene.fit(clock.0);
    settle(&mut scene, &mut clock);

    println!("== resize to nothing (ignored), then to a phone");
    scene.resize(Size::ZERO, &tree, clock.0);
    scene.resize(Size::new(390.0, 844.0), &tree, clock.0);
    settle(&mut scene, &mut clock);
    apply(&mut scene, &mut tree);

    let counts = scene.sink().recorder.counts();
    println!(
        "live elements: {} ({} nodes laid out), events: {counts:?}",
        scene.presenter().live_count(),
        scene.layout().len(),
    );

    // -- export ------------------------------------------------------------
    let file = File::create("trace.json").expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    arbor_debug::chrome::export(scene.sink().recorder.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    let file = File::create("snapshot.json").expect("failed to create snapshot.json");
    let mut writer = BufWriter::new(file);
    arbor_debug::snapshot::export(scene.layout(), scene.viewport().transform(), &mut writer)
        .expect("failed to write snapshot");

    println!("Wrote trace.json and snapshot.json");
}
