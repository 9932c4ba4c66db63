// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The enter/update/exit diff.

use alloc::vec::Vec;

use kurbo::{ParamCurveNearest as _, Point};

use crate::backend::Presenter;
use crate::easing::{Easing, Lerp, Tween};
use crate::input::PointerTarget;
use crate::layout::Layout;
use crate::render::curve::{LinkStyle, link_path};
use crate::render::registry::{Entry, LinkGeometry, NodeGeometry, Phase, Registry};
use crate::render::ElementId;
use crate::time::{Duration, HostTime, Timebase};
use crate::trace::{RemovedEvent, RenderPassEvent, RetargetEvent, TargetSource, Tracer};
use crate::tree::{LinkId, NodeId};

/// Animation timing and drawing parameters for a [`DiffRenderer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererConfig {
    /// How long a new element takes to grow in.
    pub enter_duration: Duration,
    /// How long a moved element takes to reach its new position.
    pub update_duration: Duration,
    /// How long an exiting element takes to collapse; its handle is removed
    /// when this elapses.
    pub exit_duration: Duration,
    /// Curve for all element animations.
    pub easing: Easing,
    /// How links are drawn.
    pub link_style: LinkStyle,
    /// Node hit radius in world units at full scale.
    pub node_radius: f64,
}

impl RendererConfig {
    /// Default timings expressed in `timebase` ticks.
    #[must_use]
    pub const fn standard(timebase: Timebase) -> Self {
        Self {
            enter_duration: Duration::from_millis(450, timebase),
            update_duration: Duration::from_millis(450, timebase),
            exit_duration: Duration::from_millis(350, timebase),
            easing: Easing::EaseOutCubic,
            link_style: LinkStyle::Curved,
            node_radius: 28.0,
        }
    }

    /// No animation: every change lands (and every exit is removed) on the
    /// next [`advance`](DiffRenderer::advance).
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            enter_duration: Duration::ZERO,
            update_duration: Duration::ZERO,
            exit_duration: Duration::ZERO,
            easing: Easing::Linear,
            link_style: LinkStyle::Curved,
            node_radius: 28.0,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::standard(Timebase::NANOS)
    }
}

/// Geometry that can collapse onto a point.
trait Collapse: Lerp + PartialEq {
    /// Where the element currently is, for shrinking in place.
    fn anchor(&self) -> Point;
    /// The collapsed form at `at`.
    fn collapsed_at(at: Point) -> Self;
}

impl Collapse for NodeGeometry {
    fn anchor(&self) -> Point {
        self.position
    }

    fn collapsed_at(at: Point) -> Self {
        Self::collapsed(at)
    }
}

impl Collapse for LinkGeometry {
    fn anchor(&self) -> Point {
        self.source
    }

    fn collapsed_at(at: Point) -> Self {
        Self::collapsed(at)
    }
}

fn is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Finds the collapse target for an element that left the layout: the
/// nearest member of its cached lineage that is still laid out, or
/// `fallback`.
fn resolve_target(layout: &Layout, lineage: &[NodeId], fallback: Point) -> (Point, TargetSource) {
    for (i, &id) in lineage.iter().enumerate() {
        if let Some(p) = layout.position(id) {
            let source = if i == 0 {
                TargetSource::Parent(id)
            } else {
                TargetSource::Ancestor(id)
            };
            return (p, source);
        }
    }
    (fallback, TargetSource::InPlace)
}

/// Renders successive layouts through a [`Presenter`], animating every
/// change.
///
/// `H` is the presenter's handle type. The renderer owns the only map from
/// ids to handles; presenters never carry layout data.
#[derive(Clone, Debug)]
pub struct DiffRenderer<H> {
    config: RendererConfig,
    nodes: Registry<NodeId, H, NodeGeometry>,
    links: Registry<LinkId, H, LinkGeometry>,
}

impl<H> DiffRenderer<H> {
    /// Creates an empty renderer.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            nodes: Registry::new(),
            links: Registry::new(),
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Replaces the configuration. Running animations keep their timing.
    pub fn set_config(&mut self, config: RendererConfig) {
        self.config = config;
    }

    /// Rendered node elements.
    #[must_use]
    pub fn nodes(&self) -> &Registry<NodeId, H, NodeGeometry> {
        &self.nodes
    }

    /// Rendered link elements.
    #[must_use]
    pub fn links(&self) -> &Registry<LinkId, H, LinkGeometry> {
        &self.links
    }

    /// The rendered node `id`, exiting ones included.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Entry<H, NodeGeometry>> {
        self.nodes.get(id)
    }

    /// The rendered link `id`, exiting ones included.
    #[must_use]
    pub fn link(&self, id: LinkId) -> Option<&Entry<H, LinkGeometry>> {
        self.links.get(id)
    }

    /// Number of elements currently exiting.
    #[must_use]
    pub fn exiting(&self) -> usize {
        self.nodes.count(Phase::Exiting) + self.links.count(Phase::Exiting)
    }

    /// Returns `true` while any element is moving or waiting for removal.
    #[must_use]
    pub fn is_animating(&self, now: HostTime) -> bool {
        fn busy<K: Ord + Copy, H, G: Lerp>(reg: &Registry<K, H, G>, now: HostTime) -> bool {
            reg.pending_removals() > 0
                || reg
                    .iter()
                    .any(|(_, e)| e.dirty || e.phase != Phase::Visible || !e.track.is_finished(now))
        }
        busy(&self.nodes, now) || busy(&self.links, now)
    }

    fn sample(&mut self, now: HostTime) {
        for (_, entry) in self.nodes.iter_mut() {
            resample(entry, now);
        }
        for (_, entry) in self.links.iter_mut() {
            resample(entry, now);
        }
    }

    /// Diffs `layout` against the rendered elements.
    ///
    /// New ids enter, present ids are updated (exiting ones are revived),
    /// and ids that left the layout start exiting or, if already exiting,
    /// get their collapse target recomputed. Geometry reaches the presenter
    /// on the next [`advance`](Self::advance).
    pub fn render<P: Presenter<Handle = H>>(
        &mut self,
        layout: &Layout,
        now: HostTime,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) -> RenderPassEvent {
        let mut pass = RenderPassEvent {
            now,
            ..RenderPassEvent::default()
        };
        self.sample(now);
        let cfg = self.config;

        // Preorder: a parent is settled before its children seed from it.
        for node in &layout.nodes {
            let lineage: Vec<NodeId> = layout.ancestors(node.id).collect();
            let target = NodeGeometry::at(node.position);
            let revived = self.nodes.revive(node.id);
            if let Some(entry) = self.nodes.get_mut(node.id) {
                if revived {
                    presenter.set_interactive(&entry.handle, true);
                    entry.track.retarget(now, target, cfg.enter_duration);
                    pass.revived += 1;
                } else {
                    if entry.track.target() != target {
                        entry.track.retarget(now, target, cfg.update_duration);
                    }
                    pass.updated += 1;
                }
                presenter.update_node(&entry.handle, &node.attrs);
                entry.lineage = lineage;
                entry.dirty = true;
            } else {
                let seed = layout
                    .parent_id(node.id)
                    .and_then(|p| self.nodes.get(p))
                    .map_or(node.position, |p| p.current.position);
                let track = Tween::new(
                    NodeGeometry::collapsed(seed),
                    target,
                    now,
                    cfg.enter_duration,
                    cfg.easing,
                );
                let handle = presenter.create_node(node.id, &node.attrs);
                self.nodes.insert(node.id, handle, lineage, track, now);
                pass.entered += 1;
            }
        }

        for link in &layout.links {
            let source = layout.nodes[link.source].position;
            let target = LinkGeometry::between(source, layout.nodes[link.target].position);
            let lineage: Vec<NodeId> = core::iter::once(link.id.source)
                .chain(layout.ancestors(link.id.source))
                .collect();
            let revived = self.links.revive(link.id);
            if let Some(entry) = self.links.get_mut(link.id) {
                if revived {
                    presenter.set_interactive(&entry.handle, true);
                    entry.track.retarget(now, target, cfg.enter_duration);
                    pass.revived += 1;
                } else {
                    if entry.track.target() != target {
                        entry.track.retarget(now, target, cfg.update_duration);
                    }
                    pass.updated += 1;
                }
                entry.lineage = lineage;
                entry.dirty = true;
            } else {
                let seed = self
                    .nodes
                    .get(link.id.source)
                    .map_or(source, |s| s.current.position);
                let track = Tween::new(
                    LinkGeometry::seed(seed),
                    target,
                    now,
                    cfg.enter_duration,
                    cfg.easing,
                );
                let handle = presenter.create_link(link.id);
                self.links.insert(link.id, handle, lineage, track, now);
                pass.entered += 1;
            }
        }

        let gone_nodes: Vec<NodeId> = self
            .nodes
            .iter()
            .map(|(id, _)| id)
            .filter(|&id| !layout.contains(id))
            .collect();
        let gone_links: Vec<LinkId> = self
            .links
            .iter()
            .map(|(id, _)| id)
            .filter(|id| layout.parent_id(id.target) != Some(id.source))
            .collect();
        let exits = ExitPass {
            layout,
            now,
            duration: cfg.exit_duration,
        };
        exits.run(&mut self.nodes, gone_nodes, ElementId::Node, presenter, tracer, &mut pass);
        exits.run(&mut self.links, gone_links, ElementId::Link, presenter, tracer, &mut pass);

        pass.exiting = self.exiting();
        tracer.render_pass(&pass);
        pass
    }

    /// Samples every animation at `now`, pushes changed geometry to the
    /// presenter, promotes finished entering elements to visible and
    /// destroys elements whose exit has elapsed.
    ///
    /// Returns `true` while anything is still animating.
    pub fn advance<P: Presenter<Handle = H>>(
        &mut self,
        now: HostTime,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let style = self.config.link_style;
        for (_, entry) in self.nodes.iter_mut() {
            resample(entry, now);
            if entry.dirty {
                presenter.node_frame(&entry.handle, &entry.current);
                entry.dirty = false;
            }
            settle(entry, now);
        }
        for (_, entry) in self.links.iter_mut() {
            resample(entry, now);
            if entry.dirty {
                let geometry = entry.current;
                let path = link_path(geometry.source, geometry.target, style);
                presenter.link_frame(&entry.handle, &path, geometry.opacity);
                entry.dirty = false;
            }
            settle(entry, now);
        }

        for (id, entry) in self.links.take_due(now) {
            presenter.remove(entry.handle);
            tracer.removed(&RemovedEvent {
                now,
                element: ElementId::Link(id),
            });
        }
        for (id, entry) in self.nodes.take_due(now) {
            presenter.remove(entry.handle);
            tracer.removed(&RemovedEvent {
                now,
                element: ElementId::Node(id),
            });
        }

        self.is_animating(now)
    }

    /// Finds the interactive element under `world`: the closest node within
    /// its scaled radius, else the closest link within `link_tolerance`
    /// (world units).
    #[must_use]
    pub fn hit_test(&self, world: Point, link_tolerance: f64) -> Option<PointerTarget> {
        let radius = self.config.node_radius;
        let mut node: Option<(f64, NodeId)> = None;
        for (id, entry) in self.nodes.iter() {
            if !entry.is_interactive() {
                continue;
            }
            let distance = entry.current.position.distance(world);
            if distance <= radius * entry.current.scale
                && node.is_none_or(|(best, _)| distance < best)
            {
                node = Some((distance, id));
            }
        }
        if let Some((_, id)) = node {
            return Some(PointerTarget::Node(id));
        }

        let tolerance_sq = link_tolerance * link_tolerance;
        let mut link: Option<(f64, LinkId)> = None;
        for (id, entry) in self.links.iter() {
            if !entry.is_interactive() {
                continue;
            }
            let path = link_path(
                entry.current.source,
                entry.current.target,
                self.config.link_style,
            );
            let distance_sq = path
                .segments()
                .map(|seg| seg.nearest(world, 1e-6).distance_sq)
                .fold(f64::INFINITY, f64::min);
            if distance_sq <= tolerance_sq && link.is_none_or(|(best, _)| distance_sq < best) {
                link = Some((distance_sq, id));
            }
        }
        link.map(|(_, id)| PointerTarget::Link(id))
    }

    /// Destroys every element and forgets all pending removals.
    pub fn reset<P: Presenter<Handle = H>>(&mut self, presenter: &mut P) {
        for (_, entry) in self.links.drain() {
            presenter.remove(entry.handle);
        }
        for (_, entry) in self.nodes.drain() {
            presenter.remove(entry.handle);
        }
    }
}

fn resample<H, G: Lerp + PartialEq>(entry: &mut Entry<H, G>, now: HostTime) {
    let sampled = entry.track.sample(now);
    if sampled != entry.current {
        entry.current = sampled;
        entry.dirty = true;
    }
}

fn settle<H, G: Lerp>(entry: &mut Entry<H, G>, now: HostTime) {
    if entry.phase == Phase::Entering && entry.track.is_finished(now) {
        entry.phase = Phase::Visible;
    }
}

/// Starts or corrects the exit of elements that left the layout.
struct ExitPass<'l> {
    layout: &'l Layout,
    now: HostTime,
    duration: Duration,
}

impl ExitPass<'_> {
    fn run<K, H, G, P>(
        &self,
        registry: &mut Registry<K, H, G>,
        gone: Vec<K>,
        element: impl Fn(K) -> ElementId,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
        pass: &mut RenderPassEvent,
    ) where
        K: Ord + Copy,
        G: Collapse,
        P: Presenter<Handle = H>,
    {
        let now = self.now;
        for key in gone {
            let started = registry.begin_exit(key, now + self.duration);
            let Some(entry) = registry.get_mut(key) else {
                continue;
            };
            // Bounds are always finite, so the last resort never yields NaN.
            let fallback = [entry.current.anchor(), entry.track.target().anchor()]
                .into_iter()
                .find(|&p| is_finite(p))
                .unwrap_or_else(|| self.layout.bounds.center());
            let (target, source) = resolve_target(self.layout, &entry.lineage, fallback);
            let collapsed = G::collapsed_at(target);

            if started {
                presenter.set_interactive(&entry.handle, false);
                entry.track.retarget(now, collapsed, self.duration);
                pass.exited += 1;
            } else if entry.track.target() != collapsed {
                entry.track.redirect(now, collapsed);
                pass.retargeted += 1;
            } else {
                continue;
            }
            entry.dirty = true;
            tracer.exit_retarget(&RetargetEvent {
                now,
                element: element(key),
                target,
                source,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{PresenterCall, RecordingPresenter};
    use crate::layout::{LayoutConfig, compute_layout};
    use crate::tree::{NodeKind, Tree, TreeNode};
    use kurbo::Size;

    fn config() -> RendererConfig {
        RendererConfig {
            enter_duration: Duration(100),
            update_duration: Duration(100),
            exit_duration: Duration(100),
            easing: Easing::Linear,
            link_style: LinkStyle::Curved,
            node_radius: 20.0,
        }
    }

    fn node(id: u64, kind: NodeKind) -> TreeNode {
        let mut node = TreeNode::new(NodeId(id), kind, "n");
        node.expanded = true;
        node
    }

    /// root(0) -> A(1) -> [A1(2), A2(3)], everything expanded.
    fn small_tree() -> Tree {
        let mut tree = Tree::with_root(node(0, NodeKind::Root));
        tree.add_child(NodeId(0), node(1, NodeKind::Branch));
        tree.add_child(NodeId(1), node(2, NodeKind::Leaf));
        tree.add_child(NodeId(1), node(3, NodeKind::Leaf));
        tree
    }

    /// root(0) -> A(1) -> B(2) -> [B1(3), B2(4)], everything expanded.
    fn deep_tree() -> Tree {
        let mut tree = Tree::with_root(node(0, NodeKind::Root));
        tree.add_child(NodeId(0), node(1, NodeKind::Branch));
        tree.add_child(NodeId(1), node(2, NodeKind::Branch));
        tree.add_child(NodeId(2), node(3, NodeKind::Leaf));
        tree.add_child(NodeId(2), node(4, NodeKind::Leaf));
        tree
    }

    fn lay(tree: &Tree) -> Layout {
        compute_layout(tree, Size::new(800.0, 600.0), &LayoutConfig::standard())
    }

    struct Harness {
        renderer: DiffRenderer<u32>,
        presenter: RecordingPresenter,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                renderer: DiffRenderer::new(config()),
                presenter: RecordingPresenter::new(),
            }
        }

        fn render(&mut self, tree: &Tree, now: u64) -> RenderPassEvent {
            let layout = lay(tree);
            let pass = self.renderer.render(
                &layout,
                HostTime(now),
                &mut self.presenter,
                &mut Tracer::none(),
            );
            self.advance(now);
            pass
        }

        fn advance(&mut self, now: u64) -> bool {
            self.renderer
                .advance(HostTime(now), &mut self.presenter, &mut Tracer::none())
        }

        fn exit_target(&self, id: u64) -> Point {
            let entry = self.renderer.node(NodeId(id)).unwrap();
            assert_eq!(entry.phase(), Phase::Exiting);
            entry.target().position
        }
    }

    fn assert_exit_targets_finite(renderer: &DiffRenderer<u32>) {
        for (id, entry) in renderer.nodes().iter() {
            if entry.phase() == Phase::Exiting {
                let p = entry.target().position;
                assert!(is_finite(p) && p != Point::ZERO, "node {id:?} -> {p:?}");
            }
        }
        for (id, entry) in renderer.links().iter() {
            if entry.phase() == Phase::Exiting {
                let g = entry.target();
                assert!(is_finite(g.source) && is_finite(g.target), "link {id:?}");
                assert_ne!(g.source, Point::ZERO, "link {id:?}");
            }
        }
    }

    #[test]
    fn first_render_grows_children_out_of_their_parent() {
        let mut h = Harness::new();
        let tree = small_tree();
        let pass = h.render(&tree, 0);
        assert_eq!(pass.entered, 4 + 3);
        assert_eq!(h.presenter.live_count(), 7);

        let layout = lay(&tree);
        let a1 = h.renderer.node(NodeId(2)).unwrap();
        // The whole chain starts at the root, which is the only node with
        // no rendered parent.
        assert_eq!(a1.current().position, layout.position(NodeId(0)).unwrap());
        assert_eq!(a1.current().scale, 0.0);
        let link = h.renderer.link(LinkId::new(NodeId(1), NodeId(2))).unwrap();
        assert_eq!(link.current().source, link.current().target, "zero length");

        assert!(!h.advance(100), "settled after the enter duration");
        for id in 0..4 {
            let entry = h.renderer.node(NodeId(id)).unwrap();
            assert_eq!(entry.phase(), Phase::Visible);
            let recorded = h.presenter.node(NodeId(id)).unwrap();
            assert_eq!(
                recorded.geometry.unwrap(),
                NodeGeometry::at(layout.position(NodeId(id)).unwrap())
            );
        }
    }

    #[test]
    fn collapsing_exits_children_toward_the_parent() {
        let mut h = Harness::new();
        let mut tree = small_tree();
        h.render(&tree, 0);
        h.advance(100);

        tree.set_expanded(NodeId(1), false);
        let pass = h.render(&tree, 200);
        assert_eq!(pass.exited, 2 + 2);
        assert_eq!(pass.updated, 2 + 1);

        let a = lay(&tree).position(NodeId(1)).unwrap();
        assert_eq!(h.exit_target(2), a);
        assert_eq!(h.exit_target(3), a);
        let link = h.renderer.link(LinkId::new(NodeId(1), NodeId(3))).unwrap();
        assert_eq!(link.target(), LinkGeometry::collapsed(a));
        assert_exit_targets_finite(&h.renderer);

        // Exiting elements stop taking input.
        assert!(!h.presenter.node(NodeId(2)).unwrap().interactive);
        assert!(!h.renderer.node(NodeId(2)).unwrap().is_interactive());

        assert!(h.advance(250));
        assert_eq!(h.presenter.live_count(), 7, "removal is deferred");
        h.advance(300);
        assert_eq!(h.presenter.live_count(), 3);
        assert!(h.renderer.node(NodeId(2)).is_none());
        assert_eq!(h.renderer.exiting(), 0);
    }

    #[test]
    fn collapse_disables_input_then_removes_links_before_nodes() {
        let mut h = Harness::new();
        let mut tree = small_tree();
        h.render(&tree, 0);
        h.advance(100);
        h.presenter.take_calls();

        tree.set_expanded(NodeId(1), false);
        h.render(&tree, 200);
        let calls = h.presenter.take_calls();
        let disabled: Vec<ElementId> = calls
            .iter()
            .filter_map(|c| match *c {
                PresenterCall::SetInteractive(element, false) => Some(element),
                _ => None,
            })
            .collect();
        assert_eq!(
            disabled,
            [
                ElementId::Node(NodeId(2)),
                ElementId::Node(NodeId(3)),
                ElementId::Link(LinkId::new(NodeId(1), NodeId(2))),
                ElementId::Link(LinkId::new(NodeId(1), NodeId(3))),
            ]
        );
        assert!(!calls.iter().any(|c| matches!(c, PresenterCall::Remove(_))));
        assert!(!calls.iter().any(|c| matches!(c, PresenterCall::Create(_))));

        h.advance(300);
        let removed: Vec<ElementId> = h
            .presenter
            .take_calls()
            .into_iter()
            .filter_map(|c| match c {
                PresenterCall::Remove(element) => Some(element),
                _ => None,
            })
            .collect();
        assert_eq!(
            removed,
            [
                ElementId::Link(LinkId::new(NodeId(1), NodeId(2))),
                ElementId::Link(LinkId::new(NodeId(1), NodeId(3))),
                ElementId::Node(NodeId(2)),
                ElementId::Node(NodeId(3)),
            ]
        );
        assert!(h.presenter.calls().is_empty());
    }

    #[test]
    fn deleting_a_subtree_mid_collapse_resolves_every_target() {
        let mut h = Harness::new();
        let mut tree = deep_tree();
        h.render(&tree, 0);
        h.advance(100);

        tree.set_expanded(NodeId(1), false);
        h.render(&tree, 200);
        assert_eq!(h.renderer.exiting(), 3 + 3);

        // A disappears while B and its children are still collapsing into it.
        tree.remove_subtree(NodeId(1));
        let pass = h.render(&tree, 250);
        assert_eq!(pass.exited, 1 + 1, "A and root->A");
        assert_eq!(pass.retargeted, 3 + 3);

        let root = lay(&tree).position(NodeId(0)).unwrap();
        for id in 1..=4 {
            assert_eq!(h.exit_target(id), root, "node {id}");
        }
        assert_exit_targets_finite(&h.renderer);

        // Retargeting keeps the original deadline for B's subtree.
        h.advance(300);
        assert!(h.renderer.node(NodeId(2)).is_none());
        assert!(h.renderer.node(NodeId(1)).is_some());
        h.advance(350);
        assert_eq!(h.presenter.live_count(), 1);
    }

    #[test]
    fn trajectory_correction_has_no_jump() {
        let mut h = Harness::new();
        let mut tree = deep_tree();
        h.render(&tree, 0);
        h.advance(100);
        tree.set_expanded(NodeId(1), false);
        h.render(&tree, 200);
        h.advance(250);
        let before = h.renderer.node(NodeId(3)).unwrap().current();

        tree.remove_subtree(NodeId(1));
        h.render(&tree, 250);
        let entry = h.renderer.node(NodeId(3)).unwrap();
        assert_eq!(entry.current(), before, "continues from where it was");
        assert_ne!(entry.target().position, before.position);
    }

    #[test]
    fn exit_follows_a_surviving_parent_that_moves() {
        let mut h = Harness::new();
        // root(0) -> [A(1) -> [A1(2)], B(3)]
        let mut tree = Tree::with_root(node(0, NodeKind::Root));
        tree.add_child(NodeId(0), node(1, NodeKind::Branch));
        tree.add_child(NodeId(1), node(2, NodeKind::Leaf));
        tree.add_child(NodeId(0), node(3, NodeKind::Branch));
        h.render(&tree, 0);
        h.advance(100);

        tree.set_expanded(NodeId(1), false);
        h.render(&tree, 200);
        let first = h.exit_target(2);
        assert_eq!(first, lay(&tree).position(NodeId(1)).unwrap());
        h.advance(250);
        let before = h.renderer.node(NodeId(2)).unwrap().current();

        // New siblings shift A while A1 is still collapsing into it.
        tree.add_child(NodeId(0), node(4, NodeKind::Leaf));
        tree.add_child(NodeId(0), node(5, NodeKind::Leaf));
        let pass = h.render(&tree, 250);
        assert_eq!(pass.retargeted, 1 + 1, "A1 and A->A1");

        let moved = lay(&tree).position(NodeId(1)).unwrap();
        assert_ne!(moved, first);
        assert_eq!(h.exit_target(2), moved);
        let link = h.renderer.link(LinkId::new(NodeId(1), NodeId(2))).unwrap();
        assert_eq!(link.target(), LinkGeometry::collapsed(moved));
        assert_eq!(h.renderer.node(NodeId(2)).unwrap().current(), before);
        assert_exit_targets_finite(&h.renderer);
    }

    #[test]
    fn no_surviving_ancestor_shrinks_in_place() {
        let mut h = Harness::new();
        let mut tree = Tree::with_root(node(0, NodeKind::Root));
        tree.add_child(NodeId(0), node(1, NodeKind::Branch));
        h.render(&tree, 0);
        h.advance(100);
        let a = h.renderer.node(NodeId(1)).unwrap().current().position;

        let replacement = Tree::with_root(node(10, NodeKind::Root));
        h.render(&replacement, 200);
        assert_eq!(h.exit_target(1), a);
        assert_exit_targets_finite(&h.renderer);
    }

    #[test]
    fn flipping_back_before_removal_revives() {
        let mut h = Harness::new();
        let mut tree = small_tree();
        h.render(&tree, 0);
        h.advance(100);

        tree.set_expanded(NodeId(1), false);
        h.render(&tree, 200);
        let exiting_generation = h.renderer.node(NodeId(2)).unwrap().generation();

        tree.set_expanded(NodeId(1), true);
        let pass = h.render(&tree, 250);
        assert_eq!(pass.revived, 2 + 2);
        assert_eq!(pass.entered, 0);
        let a1 = h.renderer.node(NodeId(2)).unwrap();
        assert_eq!(a1.phase(), Phase::Entering);
        assert_ne!(a1.generation(), exiting_generation);
        assert!(h.presenter.node(NodeId(2)).unwrap().interactive);

        // The superseded removal is a no-op.
        h.advance(300);
        assert_eq!(h.presenter.live_count(), 7);
        h.advance(350);
        assert_eq!(h.renderer.node(NodeId(2)).unwrap().phase(), Phase::Visible);
    }

    #[test]
    fn reappearing_after_removal_is_a_fresh_enter() {
        let mut h = Harness::new();
        let mut tree = small_tree();
        h.render(&tree, 0);
        h.advance(100);
        tree.set_expanded(NodeId(1), false);
        h.render(&tree, 200);
        h.advance(300);

        tree.set_expanded(NodeId(1), true);
        let pass = h.render(&tree, 400);
        assert_eq!(pass.entered, 2 + 2);
        assert_eq!(pass.revived, 0);
        let a = h.renderer.node(NodeId(1)).unwrap().current().position;
        assert_eq!(h.renderer.node(NodeId(2)).unwrap().current().position, a);
    }

    #[test]
    fn moved_nodes_animate_to_new_positions() {
        let mut h = Harness::new();
        let mut tree = small_tree();
        tree.add_child(NodeId(0), node(4, NodeKind::Leaf));
        tree.set_expanded(NodeId(1), false);
        h.render(&tree, 0);
        h.advance(100);
        let old = h.renderer.node(NodeId(4)).unwrap().current().position;

        tree.set_expanded(NodeId(1), true);
        h.render(&tree, 200);
        let new = lay(&tree).position(NodeId(4)).unwrap();
        assert_ne!(old, new);
        let entry = h.renderer.node(NodeId(4)).unwrap();
        assert_eq!(entry.current().position, old, "starts where it was");
        assert_eq!(entry.target().position, new);
        h.advance(300);
        assert_eq!(h.renderer.node(NodeId(4)).unwrap().current().position, new);
    }

    #[test]
    fn hit_test_prefers_nodes_then_links() {
        let mut h = Harness::new();
        let mut tree = small_tree();
        tree.set_expanded(NodeId(1), false);
        h.render(&tree, 0);
        h.advance(100);
        // root at (400, 520), A at (400, 380), joined by a vertical link.
        assert_eq!(
            h.renderer.hit_test(Point::new(405.0, 385.0), 6.0),
            Some(PointerTarget::Node(NodeId(1)))
        );
        assert_eq!(
            h.renderer.hit_test(Point::new(403.0, 450.0), 6.0),
            Some(PointerTarget::Link(LinkId::new(NodeId(0), NodeId(1))))
        );
        assert_eq!(h.renderer.hit_test(Point::new(100.0, 100.0), 6.0), None);
    }

    #[test]
    fn reset_removes_every_handle() {
        let mut h = Harness::new();
        let mut tree = small_tree();
        h.render(&tree, 0);
        tree.set_expanded(NodeId(1), false);
        h.render(&tree, 50);
        h.renderer.reset(&mut h.presenter);
        assert_eq!(h.presenter.live_count(), 0);
        assert!(h.renderer.nodes().is_empty());
        assert_eq!(h.renderer.nodes().pending_removals(), 0);
        assert!(!h.advance(500));
    }
}
