// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Link path generation.

use kurbo::{BezPath, Point};

/// How parent→child links are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LinkStyle {
    /// A cubic whose control points share the vertical midpoint of the ends.
    #[default]
    Curved,
    /// A straight segment.
    Schematic,
}

/// Builds the path for a link from `source` to `target`.
///
/// A zero-length link still yields a valid one-segment path.
#[must_use]
pub fn link_path(source: Point, target: Point, style: LinkStyle) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(source);
    match style {
        LinkStyle::Curved => {
            let mid_y = (source.y + target.y) / 2.0;
            path.curve_to(
                Point::new(source.x, mid_y),
                Point::new(target.x, mid_y),
                target,
            );
        }
        LinkStyle::Schematic => path.line_to(target),
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{PathEl, Shape as _};

    #[test]
    fn curved_controls_sit_on_the_vertical_midpoint() {
        let path = link_path(Point::new(0.0, 100.0), Point::new(60.0, 0.0), LinkStyle::Curved);
        let els = path.elements();
        assert_eq!(els[0], PathEl::MoveTo(Point::new(0.0, 100.0)));
        assert_eq!(
            els[1],
            PathEl::CurveTo(
                Point::new(0.0, 50.0),
                Point::new(60.0, 50.0),
                Point::new(60.0, 0.0)
            )
        );
    }

    #[test]
    fn schematic_is_a_straight_segment() {
        let path = link_path(Point::ZERO, Point::new(3.0, 4.0), LinkStyle::Schematic);
        assert_eq!(path.elements().len(), 2);
        assert!((path.perimeter(1e-9) - 5.0).abs() < 1e-9);
    }
}
