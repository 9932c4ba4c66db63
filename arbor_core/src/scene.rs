// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wiring of layout, renderer and viewport for a host application.
//!
//! A [`Scene`] owns a [`Presenter`], the [`DiffRenderer`] feeding it, the
//! [`ViewportController`], the most recent [`Layout`], a queue of
//! [`SceneEvent`]s for the collaborator, and a [`TraceSink`].
//!
//! Hosts call:
//!
//! - [`render`](Scene::render) after every tree mutation,
//! - [`frame`](Scene::frame) once per display refresh while it returns `true`,
//! - the pointer methods as input arrives,
//! - [`drain_events`](Scene::drain_events) to pick up requests.

use alloc::vec::Vec;

use kurbo::{Point, Size};

use crate::backend::Presenter;
use crate::event::{ExpansionPolicy, SceneEvent};
use crate::input::{InteractionConfig, PointerTarget};
use crate::layout::{Layout, LayoutConfig, compute_layout};
use crate::render::{DiffRenderer, RendererConfig};
use crate::time::{HostTime, Timebase};
use crate::trace::{
    LayoutEvent, NoopSink, RenderPassEvent, TraceSink, Tracer, ViewportCause, ViewportEvent,
};
use crate::tree::{NodeId, Tree};
use crate::viewport::{ViewportConfig, ViewportController};

/// Everything a [`Scene`] can be tuned with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    /// Layout spacing.
    pub layout: LayoutConfig,
    /// Zoom limits, margins and focus behavior.
    pub viewport: ViewportConfig,
    /// Element animation timing and drawing.
    pub renderer: RendererConfig,
    /// Pointer thresholds.
    pub interaction: InteractionConfig,
    /// Sibling handling on activation.
    pub policy: ExpansionPolicy,
}

impl SceneConfig {
    /// Default configuration with durations in `timebase` ticks.
    #[must_use]
    pub const fn standard(timebase: Timebase) -> Self {
        Self {
            layout: LayoutConfig::standard(),
            viewport: ViewportConfig::standard(timebase),
            renderer: RendererConfig::standard(timebase),
            interaction: InteractionConfig::pointer(),
            policy: ExpansionPolicy::Independent,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::standard(Timebase::NANOS)
    }
}

#[derive(Clone, Copy, Debug)]
enum Press {
    Background,
    Node {
        id: NodeId,
        origin: Point,
        dragging: bool,
    },
    Link,
}

/// A rendered, interactive tree.
pub struct Scene<P: Presenter, S: TraceSink = NoopSink> {
    config: SceneConfig,
    presenter: P,
    renderer: DiffRenderer<P::Handle>,
    viewport: ViewportController,
    layout: Layout,
    events: Vec<SceneEvent>,
    sink: S,
    press: Option<Press>,
}

impl<P: Presenter, S: TraceSink> core::fmt::Debug for Scene<P, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("policy", &self.config.policy)
            .field("nodes", &self.layout.len())
            .field("transform", &self.viewport.transform())
            .field("exiting", &self.renderer.exiting())
            .field("pending_events", &self.events.len())
            .field("press", &self.press)
            .finish_non_exhaustive()
    }
}

impl<P: Presenter> Scene<P> {
    /// Creates an empty scene without diagnostics.
    #[must_use]
    pub fn new(presenter: P, viewport: Size, config: SceneConfig) -> Self {
        Self::with_sink(presenter, viewport, config, NoopSink)
    }
}

/// Pushes the current transform to the presenter.
fn push_view<P: Presenter>(
    presenter: &mut P,
    viewport: &ViewportController,
    tracer: &mut Tracer<'_>,
    now: HostTime,
    cause: ViewportCause,
) {
    let transform = viewport.transform();
    presenter.set_view_transform(transform.to_affine());
    tracer.viewport(&ViewportEvent {
        now,
        cause,
        transform,
    });
}

impl<P: Presenter, S: TraceSink> Scene<P, S> {
    /// Creates an empty scene reporting to `sink`.
    #[must_use]
    pub fn with_sink(presenter: P, viewport: Size, config: SceneConfig, sink: S) -> Self {
        Self {
            config,
            presenter,
            renderer: DiffRenderer::new(config.renderer),
            viewport: ViewportController::new(config.viewport, viewport),
            layout: Layout::empty(viewport, &config.layout),
            events: Vec::new(),
            sink,
            press: None,
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Changes how activation treats siblings.
    pub fn set_policy(&mut self, policy: ExpansionPolicy) {
        self.config.policy = policy;
    }

    /// The presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The presenter, mutably.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// The diagnostic sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The diagnostic sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The layout of the last render.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The viewport controller.
    #[must_use]
    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// The diff renderer.
    #[must_use]
    pub fn renderer(&self) -> &DiffRenderer<P::Handle> {
        &self.renderer
    }

    /// Lays out `tree`, diffs it against what is on screen and re-clamps the
    /// view to the new bounds.
    ///
    /// Malformed nodes are skipped and reported to the sink.
    pub fn render(&mut self, tree: &Tree, now: HostTime) -> RenderPassEvent {
        let size = self.viewport.viewport();
        let layout = compute_layout(tree, size, &self.config.layout);

        let mut tracer = Tracer::new(&mut self.sink);
        for rejection in &layout.rejected {
            tracer.rejected_node(rejection);
        }
        tracer.layout(&LayoutEvent {
            now,
            nodes: layout.nodes.len(),
            links: layout.links.len(),
            rejected: layout.rejected.len(),
            bounds: layout.bounds,
        });

        let pass = self
            .renderer
            .render(&layout, now, &mut self.presenter, &mut tracer);
        self.viewport.set_bounds(layout.bounds, size);
        push_view(
            &mut self.presenter,
            &self.viewport,
            &mut tracer,
            now,
            ViewportCause::Bounds,
        );
        self.renderer
            .advance(now, &mut self.presenter, &mut tracer);
        self.layout = layout;
        pass
    }

    /// Resizes the viewing window and renders `tree` again.
    ///
    /// A zero-sized or non-finite `size` is reported to the sink and
    /// ignored; returns `false` in that case.
    pub fn resize(&mut self, size: Size, tree: &Tree, now: HostTime) -> bool {
        if !self.viewport.set_viewport(size) {
            Tracer::new(&mut self.sink).resize_ignored(size);
            return false;
        }
        self.events.push(SceneEvent::ViewportResized { size });
        self.render(tree, now);
        let mut tracer = Tracer::new(&mut self.sink);
        tracer.viewport(&ViewportEvent {
            now,
            cause: ViewportCause::Resize,
            transform: self.viewport.transform(),
        });
        true
    }

    /// Advances element and viewport animations. Returns `true` while
    /// another frame is needed.
    pub fn frame(&mut self, now: HostTime) -> bool {
        let mut tracer = Tracer::new(&mut self.sink);
        let mut animating = false;
        if self.viewport.is_animating() {
            animating |= self.viewport.tick(now);
            push_view(
                &mut self.presenter,
                &self.viewport,
                &mut tracer,
                now,
                ViewportCause::Animation,
            );
        }
        animating |= self
            .renderer
            .advance(now, &mut self.presenter, &mut tracer);
        animating
    }

    /// Runs a viewport change and pushes the result.
    fn view_change(
        &mut self,
        now: HostTime,
        cause: ViewportCause,
        change: impl FnOnce(&mut ViewportController) -> bool,
    ) -> bool {
        if !change(&mut self.viewport) {
            return false;
        }
        let mut tracer = Tracer::new(&mut self.sink);
        push_view(&mut self.presenter, &self.viewport, &mut tracer, now, cause);
        true
    }

    /// Moves the view to `(x, y, k)`, animated over `duration`.
    pub fn zoom_to(
        &mut self,
        x: f64,
        y: f64,
        k: f64,
        duration: crate::time::Duration,
        now: HostTime,
    ) -> bool {
        self.view_change(now, ViewportCause::ZoomTo, |vp| {
            vp.zoom_to(x, y, k, duration, now)
        })
    }

    /// Brings node `id` to the focus anchor, optionally at scale `k`.
    ///
    /// Returns `false` if the node is not laid out.
    pub fn focus_node(&mut self, id: NodeId, k: Option<f64>, now: HostTime) -> bool {
        let Some(world) = self.layout.position(id) else {
            return false;
        };
        let duration = self.config.viewport.focus_duration;
        self.view_change(now, ViewportCause::Focus, |vp| {
            vp.focus_on(world, k, duration, now)
        })
    }

    /// Scales and centers the view to show all content.
    pub fn fit(&mut self, now: HostTime) -> bool {
        let duration = self.config.viewport.focus_duration;
        self.view_change(now, ViewportCause::Fit, |vp| vp.fit_content(duration, now))
    }

    /// Wheel or pinch zoom anchored at `screen`.
    pub fn wheel(&mut self, screen: Point, factor: f64, now: HostTime) -> bool {
        self.view_change(now, ViewportCause::Wheel, |vp| {
            vp.zoom_at_point(screen, factor)
        })
    }

    /// Finds the interactive element under a screen point.
    #[must_use]
    pub fn hit_test(&self, screen: Point) -> PointerTarget {
        let world = self.viewport.screen_to_world(screen);
        let tolerance = self.config.interaction.link_hit_tolerance / self.viewport.transform().k;
        self.renderer
            .hit_test(world, tolerance)
            .unwrap_or(PointerTarget::Background)
    }

    /// Pointer pressed over `target`.
    ///
    /// Background presses start a pan. Node presses arm a click that turns
    /// into a node drag past the drag threshold. Presses on nodes that are
    /// not rendered or no longer interactive count as background.
    pub fn pointer_down(&mut self, screen: Point, target: PointerTarget) -> bool {
        let target = match target {
            PointerTarget::Node(id)
                if !self.renderer.node(id).is_some_and(|e| e.is_interactive()) =>
            {
                PointerTarget::Background
            }
            other => other,
        };
        self.press = match target {
            PointerTarget::Background => {
                if !self.viewport.begin_drag(screen, target) {
                    return false;
                }
                Some(Press::Background)
            }
            PointerTarget::Node(id) => Some(Press::Node {
                id,
                origin: screen,
                dragging: false,
            }),
            PointerTarget::Link(_) => Some(Press::Link),
        };
        true
    }

    /// Pointer pressed at `screen`; the target is found by hit testing.
    pub fn pointer_down_at(&mut self, screen: Point) -> PointerTarget {
        let target = self.hit_test(screen);
        self.pointer_down(screen, target);
        target
    }

    /// Pointer moved while pressed. Returns `true` if it panned the view or
    /// moved a node drag.
    pub fn pointer_move(&mut self, screen: Point, now: HostTime) -> bool {
        match self.press {
            Some(Press::Background) => {
                self.view_change(now, ViewportCause::Drag, |vp| vp.drag_to(screen))
            }
            Some(Press::Node {
                id,
                origin,
                dragging,
            }) => {
                if !dragging {
                    if (screen - origin).hypot() < self.config.interaction.drag_threshold {
                        return false;
                    }
                    self.press = Some(Press::Node {
                        id,
                        origin,
                        dragging: true,
                    });
                    self.events.push(SceneEvent::NodeDragStart {
                        id,
                        world: self.viewport.screen_to_world(origin),
                    });
                }
                self.events.push(SceneEvent::NodeDragMove {
                    id,
                    world: self.viewport.screen_to_world(screen),
                });
                true
            }
            Some(Press::Link) | None => false,
        }
    }

    /// Pointer released. Ends a pan, activates a clicked node, or finishes a
    /// node drag (emitting [`SceneEvent::NodeDrop`] when released over a
    /// node that is neither the dragged node nor one of its descendants).
    pub fn pointer_up(&mut self, screen: Point) -> bool {
        match self.press.take() {
            Some(Press::Background) => self.viewport.end_drag(),
            Some(Press::Node {
                id,
                dragging: false,
                ..
            }) => self.activate(id),
            Some(Press::Node {
                id, dragging: true, ..
            }) => {
                let world = self.viewport.screen_to_world(screen);
                self.events.push(SceneEvent::NodeDragEnd { id, world });
                if let PointerTarget::Node(target) = self.hit_test(screen)
                    && target != id
                    && !self.layout.is_ancestor(id, target)
                {
                    self.events.push(SceneEvent::NodeDrop {
                        moved: id,
                        target_parent: target,
                    });
                }
                true
            }
            Some(Press::Link) | None => false,
        }
    }

    /// Activates node `id` as if it were clicked.
    ///
    /// Always emits [`SceneEvent::NodeActivated`]. Expandable nodes also
    /// request a toggle; under [`ExpansionPolicy::SingleBranchPerParent`]
    /// expanding a node first requests collapse of its expanded siblings.
    pub fn activate(&mut self, id: NodeId) -> bool {
        let Some(node) = self.layout.node(id) else {
            return false;
        };
        let kind = node.attrs.kind;
        self.events.push(SceneEvent::NodeActivated { id, kind });
        if !kind.is_expandable() {
            return true;
        }
        if node.attrs.expanded {
            self.events
                .push(SceneEvent::ExpansionRequested { id, expand: false });
            return true;
        }
        if self.config.policy == ExpansionPolicy::SingleBranchPerParent
            && let Some(parent) = node.parent
        {
            for &sibling in &self.layout.nodes[parent].children {
                let sibling = &self.layout.nodes[sibling];
                if sibling.id != id && sibling.attrs.expanded {
                    self.events.push(SceneEvent::ExpansionRequested {
                        id: sibling.id,
                        expand: false,
                    });
                }
            }
        }
        self.events
            .push(SceneEvent::ExpansionRequested { id, expand: true });
        true
    }

    /// Takes all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        core::mem::take(&mut self.events)
    }

    /// Removes every rendered element and forgets the current layout and
    /// any pending input. The viewport keeps its size.
    pub fn reset(&mut self) {
        self.renderer.reset(&mut self.presenter);
        self.layout = Layout::empty(self.viewport.viewport(), &self.config.layout);
        self.events.clear();
        self.press = None;
        _ = self.viewport.end_drag();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingPresenter;
    use crate::layout::Rejection;
    use crate::tree::{NodeKind, TreeNode};
    use kurbo::Affine;

    const VIEW: Size = Size::new(800.0, 600.0);

    #[derive(Default)]
    struct Diagnostics {
        rejected: Vec<Rejection>,
        ignored: usize,
    }

    impl TraceSink for Diagnostics {
        fn on_rejected_node(&mut self, r: &Rejection) {
            self.rejected.push(*r);
        }

        fn on_resize_ignored(&mut self, _: Size) {
            self.ignored += 1;
        }
    }

    fn config() -> SceneConfig {
        SceneConfig {
            renderer: RendererConfig::instant(),
            ..SceneConfig::standard(Timebase::NANOS)
        }
    }

    fn scene() -> Scene<RecordingPresenter, Diagnostics> {
        Scene::with_sink(RecordingPresenter::new(), VIEW, config(), Diagnostics::default())
    }

    fn node(id: u64, kind: NodeKind, expanded: bool) -> TreeNode {
        let mut node = TreeNode::new(NodeId(id), kind, "n");
        node.expanded = expanded;
        node
    }

    /// root(0) -> [A(1) -> [A1(3), A2(4)], B(2) -> [B1(5)]]
    fn tree(a_expanded: bool) -> Tree {
        let mut tree = Tree::with_root(node(0, NodeKind::Root, true));
        tree.add_child(NodeId(0), node(1, NodeKind::Branch, a_expanded));
        tree.add_child(NodeId(0), node(2, NodeKind::Branch, false));
        tree.add_child(NodeId(1), node(3, NodeKind::Leaf, false));
        tree.add_child(NodeId(1), node(4, NodeKind::Exam, false));
        tree.add_child(NodeId(2), node(5, NodeKind::Leaf, false));
        tree
    }

    fn wide_tree() -> Tree {
        let mut tree = Tree::with_root(node(0, NodeKind::Root, true));
        for id in 1..=20 {
            tree.add_child(NodeId(0), node(id, NodeKind::Leaf, false));
        }
        tree
    }

    fn screen_of(scene: &Scene<RecordingPresenter, Diagnostics>, id: u64) -> Point {
        scene
            .viewport()
            .world_to_screen(scene.layout().position(NodeId(id)).unwrap())
    }

    fn click(scene: &mut Scene<RecordingPresenter, Diagnostics>, id: u64) {
        let at = screen_of(scene, id);
        assert!(scene.pointer_down(at, PointerTarget::Node(NodeId(id))));
        assert!(scene.pointer_up(at));
    }

    #[test]
    fn render_clamps_and_pushes_the_view() {
        let mut scene = scene();
        scene.render(&tree(false), HostTime(0));
        assert_eq!(scene.layout().len(), 3);
        assert_eq!(scene.presenter().live_count(), 3 + 2);
        // Small content is centered: bounds x 340..460, y 380..520 plus margin.
        let t = scene.viewport().transform();
        assert_eq!((t.x, t.y, t.k), (0.0, -150.0, 1.0));
        assert_eq!(scene.presenter().view_transform(), t.to_affine());
    }

    #[test]
    fn malformed_nodes_reach_the_sink() {
        let mut scene = scene();
        let mut tree = tree(true);
        tree.get_mut(NodeId(1))
            .unwrap()
            .children
            .as_mut()
            .unwrap()
            .push(NodeId(42));
        scene.render(&tree, HostTime(0));
        assert_eq!(scene.sink().rejected.len(), 1);
        assert_eq!(scene.sink().rejected[0].id, NodeId(42));
        assert_eq!(scene.layout().len(), 5);
    }

    #[test]
    fn zero_resize_is_ignored_and_recoverable() {
        let mut scene = scene();
        let tree = tree(false);
        scene.render(&tree, HostTime(0));
        assert!(!scene.resize(Size::ZERO, &tree, HostTime(1)));
        assert_eq!(scene.sink().ignored, 1);
        assert!(scene.drain_events().is_empty());

        assert!(scene.resize(Size::new(1000.0, 600.0), &tree, HostTime(2)));
        assert_eq!(
            scene.drain_events(),
            [SceneEvent::ViewportResized {
                size: Size::new(1000.0, 600.0)
            }]
        );
        assert_eq!(scene.layout().position(NodeId(0)).unwrap().x, 500.0);
    }

    #[test]
    fn clicking_a_collapsed_branch_requests_expansion() {
        let mut scene = scene();
        scene.render(&tree(false), HostTime(0));
        click(&mut scene, 1);
        assert_eq!(
            scene.drain_events(),
            [
                SceneEvent::NodeActivated {
                    id: NodeId(1),
                    kind: NodeKind::Branch
                },
                SceneEvent::ExpansionRequested {
                    id: NodeId(1),
                    expand: true
                },
            ]
        );
    }

    #[test]
    fn clicking_an_expanded_branch_requests_collapse() {
        let mut scene = scene();
        scene.render(&tree(true), HostTime(0));
        click(&mut scene, 1);
        assert_eq!(
            scene.drain_events()[1],
            SceneEvent::ExpansionRequested {
                id: NodeId(1),
                expand: false
            }
        );
    }

    #[test]
    fn leaves_only_report_activation() {
        let mut scene = scene();
        scene.render(&tree(true), HostTime(0));
        click(&mut scene, 4);
        assert_eq!(
            scene.drain_events(),
            [SceneEvent::NodeActivated {
                id: NodeId(4),
                kind: NodeKind::Exam
            }]
        );
    }

    #[test]
    fn single_branch_policy_collapses_expanded_siblings() {
        let mut scene = scene();
        scene.set_policy(ExpansionPolicy::SingleBranchPerParent);
        scene.render(&tree(true), HostTime(0));
        click(&mut scene, 2);
        assert_eq!(
            scene.drain_events(),
            [
                SceneEvent::NodeActivated {
                    id: NodeId(2),
                    kind: NodeKind::Branch
                },
                SceneEvent::ExpansionRequested {
                    id: NodeId(1),
                    expand: false
                },
                SceneEvent::ExpansionRequested {
                    id: NodeId(2),
                    expand: true
                },
            ]
        );
    }

    #[test]
    fn small_jitter_is_still_a_click() {
        let mut scene = scene();
        scene.render(&tree(false), HostTime(0));
        let at = screen_of(&scene, 2);
        scene.pointer_down(at, PointerTarget::Node(NodeId(2)));
        assert!(!scene.pointer_move(at + kurbo::Vec2::new(2.0, 1.0), HostTime(0)));
        scene.pointer_up(at);
        assert!(matches!(
            scene.drain_events()[0],
            SceneEvent::NodeActivated { id: NodeId(2), .. }
        ));
    }

    #[test]
    fn dragging_a_node_onto_another_requests_a_drop() {
        let mut scene = scene();
        scene.render(&tree(true), HostTime(0));
        let from = screen_of(&scene, 3);
        let to = screen_of(&scene, 2);
        let before = scene.viewport().transform();

        assert_eq!(scene.pointer_down_at(from), PointerTarget::Node(NodeId(3)));
        assert!(scene.pointer_move(from + kurbo::Vec2::new(20.0, 0.0), HostTime(0)));
        assert!(scene.pointer_move(to, HostTime(0)));
        assert!(scene.pointer_up(to));

        let world_from = scene.viewport().screen_to_world(from);
        let world_to = scene.viewport().screen_to_world(to);
        let events = scene.drain_events();
        assert_eq!(
            events[0],
            SceneEvent::NodeDragStart {
                id: NodeId(3),
                world: world_from
            }
        );
        assert!(matches!(events[1], SceneEvent::NodeDragMove { .. }));
        assert_eq!(
            events[3],
            SceneEvent::NodeDragEnd {
                id: NodeId(3),
                world: world_to
            }
        );
        assert_eq!(
            events[4],
            SceneEvent::NodeDrop {
                moved: NodeId(3),
                target_parent: NodeId(2)
            }
        );
        assert_eq!(events.len(), 5);
        assert_eq!(scene.viewport().transform(), before, "node drags never pan");
    }

    #[test]
    fn dropping_onto_a_descendant_is_not_a_drop() {
        let mut scene = scene();
        scene.render(&tree(true), HostTime(0));
        let from = screen_of(&scene, 1);
        let to = screen_of(&scene, 3);
        scene.pointer_down(from, PointerTarget::Node(NodeId(1)));
        scene.pointer_move(to, HostTime(0));
        scene.pointer_up(to);
        let events = scene.drain_events();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, SceneEvent::NodeDrop { .. }))
        );
        assert!(matches!(events.last(), Some(SceneEvent::NodeDragEnd { .. })));
    }

    #[test]
    fn background_drag_pans_wide_content() {
        let mut scene = scene();
        scene.render(&wide_tree(), HostTime(0));
        let t0 = scene.viewport().transform();
        let start = Point::new(10.0, 590.0);
        assert_eq!(scene.pointer_down_at(start), PointerTarget::Background);
        assert!(scene.pointer_move(Point::new(60.0, 590.0), HostTime(0)));
        assert!(scene.pointer_up(Point::new(60.0, 590.0)));
        let t1 = scene.viewport().transform();
        assert_eq!(t1.x, t0.x + 50.0);
        assert_eq!(t1.y, t0.y, "vertical axis fits and stays centered");
        assert_eq!(
            scene.presenter().view_transform(),
            Affine::translate((t1.x, t1.y))
        );
        assert!(scene.drain_events().is_empty());
    }

    #[test]
    fn focus_animates_the_node_to_the_anchor() {
        let mut scene = scene();
        scene.render(&wide_tree(), HostTime(0));
        assert!(scene.focus_node(NodeId(10), None, HostTime(0)));
        assert!(scene.frame(HostTime(1)));
        let end = HostTime(0) + scene.config().viewport.focus_duration;
        assert!(!scene.frame(end));
        let screen = screen_of(&scene, 10);
        assert!((screen.x - 400.0).abs() < 1e-9, "{screen:?}");
        assert!(!scene.focus_node(NodeId(99), None, end));
    }

    #[test]
    fn wheel_zoom_updates_the_presenter() {
        let mut scene = scene();
        scene.render(&wide_tree(), HostTime(0));
        assert!(scene.wheel(Point::new(400.0, 300.0), 0.25, HostTime(0)));
        assert_eq!(scene.viewport().transform().k, 1.25);
        assert_eq!(
            scene.presenter().view_transform(),
            scene.viewport().transform().to_affine()
        );
    }

    #[test]
    fn debug_summarizes_state() {
        let mut scene = scene();
        scene.render(&tree(true), HostTime(0));
        click(&mut scene, 1);
        let text = alloc::format!("{scene:?}");
        assert!(text.starts_with("Scene {"), "{text}");
        assert!(text.contains("policy: Independent"), "{text}");
        assert!(text.contains("nodes: 5"), "{text}");
        assert!(text.contains("pending_events: 2"), "{text}");
        assert!(text.contains("press: None"), "{text}");
    }

    #[test]
    fn reset_clears_everything() {
        let mut scene = scene();
        scene.render(&tree(true), HostTime(0));
        click(&mut scene, 1);
        scene.reset();
        assert_eq!(scene.presenter().live_count(), 0);
        assert!(scene.layout().is_empty());
        assert!(scene.drain_events().is_empty());
    }
}
