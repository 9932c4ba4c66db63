// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan/zoom transform over a fixed-size viewing window.
//!
//! [`ViewportController`] owns a [`ViewTransform`] (`screen = world * k +
//! (x, y)`) and re-clamps it against the content bounds after every mutation
//! with [`clamp_transform`]:
//!
//! - If the scaled content fits on an axis, that axis is forced to the
//!   centered position; no panning is possible.
//! - Otherwise the translation is limited so the content edges never cross
//!   the viewport edges.
//!
//! The content box is the layout bounds grown by
//! [`ViewportConfig::content_margin`] so nodes drawn around their center
//! point stay fully visible at the edges.
//!
//! Programmatic moves ([`zoom_to`](ViewportController::zoom_to),
//! [`focus_on`](ViewportController::focus_on)) may be animated; interactive
//! moves (pan, wheel, drag) are immediate and cancel any running animation.

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::easing::{Easing, Lerp, Tween};
use crate::input::PointerTarget;
use crate::time::{Duration, HostTime, Timebase};

/// Uniform-scale translation from world to screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Horizontal translation in screen pixels.
    pub x: f64,
    /// Vertical translation in screen pixels.
    pub y: f64,
    /// Scale factor.
    pub k: f64,
}

impl ViewTransform {
    /// No translation, unit scale.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    /// Creates a transform.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// The equivalent affine map.
    #[inline]
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::new([self.k, 0.0, 0.0, self.k, self.x, self.y])
    }

    /// Maps a world point to the screen.
    #[inline]
    #[must_use]
    pub fn apply(self, world: Point) -> Point {
        Point::new(world.x * self.k + self.x, world.y * self.k + self.y)
    }

    /// Maps a screen point back to the world.
    #[inline]
    #[must_use]
    pub fn invert(self, screen: Point) -> Point {
        Point::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
    }

    /// Returns `true` if every component is finite and the scale is positive.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.k.is_finite() && self.k > 0.0
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Lerp for ViewTransform {
    fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x.lerp(other.x, t),
            y: self.y.lerp(other.y, t),
            k: self.k.lerp(other.k, t),
        }
    }
}

/// An animated programmatic zoom, sampled by [`ViewportController::tick`].
pub type ZoomAnimation = Tween<ViewTransform>;

fn clamp_axis(value: f64, lo: f64, hi: f64, extent: f64, k: f64) -> f64 {
    let span = (hi - lo) * k;
    if span <= extent {
        (extent - span) / 2.0 - lo * k
    } else {
        value.max(extent - hi * k).min(-lo * k)
    }
}

/// Clamps `t` so `content` (in world units) is centered when it fits and
/// never pulled past the viewport edges when it does not.
///
/// Idempotent: clamping a clamped transform returns it unchanged.
#[must_use]
pub fn clamp_transform(t: ViewTransform, content: Rect, viewport: Size) -> ViewTransform {
    ViewTransform {
        x: clamp_axis(t.x, content.x0, content.x1, viewport.width, t.k),
        y: clamp_axis(t.y, content.y0, content.y1, viewport.height, t.k),
        k: t.k,
    }
}

/// Limits and presets for a [`ViewportController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportConfig {
    /// Smallest allowed scale.
    pub min_scale: f64,
    /// Largest allowed scale.
    pub max_scale: f64,
    /// World-unit padding added around the layout bounds before clamping.
    pub content_margin: f64,
    /// Screen anchor for [`ViewportController::focus_on`], as fractions of
    /// the viewport size.
    pub focus_anchor: Vec2,
    /// Duration of focus and fit animations.
    pub focus_duration: Duration,
}

impl ViewportConfig {
    /// Default limits with durations expressed in `timebase` ticks.
    #[must_use]
    pub const fn standard(timebase: Timebase) -> Self {
        Self {
            min_scale: 0.25,
            max_scale: 2.5,
            content_margin: 60.0,
            focus_anchor: Vec2::new(0.5, 0.75),
            focus_duration: Duration::from_millis(600, timebase),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::standard(Timebase::NANOS)
    }
}

/// Owns the view transform and every way of changing it.
#[derive(Clone, Debug)]
pub struct ViewportController {
    config: ViewportConfig,
    transform: ViewTransform,
    viewport: Size,
    bounds: Rect,
    animation: Option<ZoomAnimation>,
    drag: Option<Point>,
}

fn is_valid_viewport(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

fn is_finite_rect(rect: Rect) -> bool {
    rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite()
}

impl ViewportController {
    /// Creates a controller with an identity transform and empty content.
    ///
    /// An invalid `viewport` is recorded as zero-sized; the first valid
    /// [`set_viewport`](Self::set_viewport) replaces it.
    #[must_use]
    pub fn new(config: ViewportConfig, viewport: Size) -> Self {
        Self {
            config,
            transform: ViewTransform::IDENTITY,
            viewport: if is_valid_viewport(viewport) {
                viewport
            } else {
                Size::ZERO
            },
            bounds: Rect::ZERO,
            animation: None,
            drag: None,
        }
    }

    /// The current (clamped) transform.
    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// The viewing window size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The most recent layout bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// The clamping box: bounds grown by the content margin.
    #[must_use]
    pub fn content(&self) -> Rect {
        self.bounds
            .inflate(self.config.content_margin, self.config.content_margin)
    }

    /// Returns `true` while a programmatic zoom is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// The running programmatic zoom, if any.
    #[must_use]
    pub fn animation(&self) -> Option<&ZoomAnimation> {
        self.animation.as_ref()
    }

    /// Returns `true` while a background drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn clamped(&self, t: ViewTransform) -> ViewTransform {
        if !is_valid_viewport(self.viewport) {
            return t;
        }
        clamp_transform(t, self.content(), self.viewport)
    }

    fn clamp_scale(&self, k: f64) -> f64 {
        k.clamp(self.config.min_scale, self.config.max_scale)
    }

    fn reclamp(&mut self) {
        self.transform = self.clamped(self.transform);
    }

    /// Replaces the layout bounds and viewing window, then re-clamps.
    ///
    /// Non-finite bounds are ignored. Returns `false` if the viewport was
    /// ignored for being empty or non-finite.
    pub fn set_bounds(&mut self, bounds: Rect, viewport: Size) -> bool {
        if is_finite_rect(bounds) {
            self.bounds = bounds;
        }
        let accepted = self.set_viewport(viewport);
        self.reclamp();
        accepted
    }

    /// Resizes the viewing window and re-clamps.
    ///
    /// A zero or non-finite size is ignored and leaves the transform
    /// untouched; returns `false` in that case.
    pub fn set_viewport(&mut self, viewport: Size) -> bool {
        if !is_valid_viewport(viewport) {
            return false;
        }
        self.viewport = viewport;
        self.reclamp();
        true
    }

    /// Moves to the transform `(x, y, k)`, clamped.
    ///
    /// With a zero `duration` this happens synchronously and clears any
    /// running animation. Otherwise an ease-out animation starts at `now`
    /// and is advanced by [`tick`](Self::tick). Non-finite input is rejected
    /// and returns `false`.
    pub fn zoom_to(&mut self, x: f64, y: f64, k: f64, duration: Duration, now: HostTime) -> bool {
        if !(x.is_finite() && y.is_finite() && k.is_finite()) {
            return false;
        }
        let target = self.clamped(ViewTransform::new(x, y, self.clamp_scale(k)));
        if duration.is_zero() {
            self.animation = None;
            self.transform = target;
        } else {
            self.animation = Some(Tween::new(
                self.transform,
                target,
                now,
                duration,
                Easing::EaseOutCubic,
            ));
        }
        true
    }

    /// Advances a running programmatic zoom. Returns `true` while it is
    /// still running.
    ///
    /// Every intermediate sample is clamped against the current content.
    pub fn tick(&mut self, now: HostTime) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        self.transform = self.clamped(animation.sample(now));
        if animation.is_finished(now) {
            self.animation = None;
        }
        self.animation.is_some()
    }

    /// Translates by a screen-space delta, then clamps. Cancels any running
    /// animation.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !(dx.is_finite() && dy.is_finite()) {
            return false;
        }
        self.animation = None;
        self.transform.x += dx;
        self.transform.y += dy;
        self.reclamp();
        true
    }

    /// Wheel or pinch zoom: scales by `1 + factor` while keeping the world
    /// point under `screen` fixed, as far as clamping allows. Cancels any
    /// running animation.
    pub fn zoom_at_point(&mut self, screen: Point, factor: f64) -> bool {
        if !(screen.x.is_finite() && screen.y.is_finite() && factor.is_finite()) {
            return false;
        }
        self.animation = None;
        let anchor = self.transform.invert(screen);
        let k = self.clamp_scale(self.transform.k * (1.0 + factor));
        self.transform = self.clamped(ViewTransform::new(
            screen.x - anchor.x * k,
            screen.y - anchor.y * k,
            k,
        ));
        true
    }

    /// Converts a screen point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.transform.invert(screen)
    }

    /// Converts a world point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        self.transform.apply(world)
    }

    /// The world-space rectangle currently in view.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        Rect::from_points(
            self.transform.invert(Point::ZERO),
            self.transform
                .invert(Point::new(self.viewport.width, self.viewport.height)),
        )
    }

    /// Places `world` at the configured focus anchor, optionally changing the
    /// scale, via [`zoom_to`](Self::zoom_to).
    pub fn focus_on(
        &mut self,
        world: Point,
        k: Option<f64>,
        duration: Duration,
        now: HostTime,
    ) -> bool {
        if !(world.x.is_finite() && world.y.is_finite()) {
            return false;
        }
        let k = self.clamp_scale(k.unwrap_or(self.transform.k));
        let anchor = Point::new(
            self.viewport.width * self.config.focus_anchor.x,
            self.viewport.height * self.config.focus_anchor.y,
        );
        self.zoom_to(
            anchor.x - world.x * k,
            anchor.y - world.y * k,
            k,
            duration,
            now,
        )
    }

    /// Scales and centers so the whole content box is in view.
    pub fn fit_content(&mut self, duration: Duration, now: HostTime) -> bool {
        let content = self.content();
        if !is_valid_viewport(self.viewport) || content.width() <= 0.0 || content.height() <= 0.0 {
            return false;
        }
        let k = self.clamp_scale(
            (self.viewport.width / content.width()).min(self.viewport.height / content.height()),
        );
        let center = content.center();
        self.zoom_to(
            self.viewport.width / 2.0 - center.x * k,
            self.viewport.height / 2.0 - center.y * k,
            k,
            duration,
            now,
        )
    }

    /// Starts a background drag at `screen`.
    ///
    /// Refused (returns `false`) when `target` is an interactive element.
    pub fn begin_drag(&mut self, screen: Point, target: PointerTarget) -> bool {
        if target.is_interactive() || !(screen.x.is_finite() && screen.y.is_finite()) {
            return false;
        }
        self.animation = None;
        self.drag = Some(screen);
        true
    }

    /// Pans by the movement since the last drag position.
    pub fn drag_to(&mut self, screen: Point) -> bool {
        let Some(last) = self.drag else {
            return false;
        };
        let delta = screen - last;
        if !self.pan_by(delta.x, delta.y) {
            return false;
        }
        self.drag = Some(screen);
        true
    }

    /// Ends a background drag. Returns `false` if none was in progress.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }
}
