// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle math for anchored panels.
//!
//! Everything here is pure: inputs are copied, outputs are fresh values, and
//! nothing is cached between calls because anchors and panels resize freely.

use kurbo::{Point, Rect, Size, Vec2};

use crate::placement::{Align, PlacementSpec, Side};

/// Geometry queries against a host element tree.
///
/// Implemented by whatever owns the real elements (a DOM binding, a box tree, a
/// test double). Only [`client_rect`](Self::client_rect) is mandatory.
pub trait ElementGeometry {
    /// Host element handle.
    type Element: Copy + Eq + core::fmt::Debug;

    /// The element's rectangle relative to the viewport.
    fn client_rect(&self, element: Self::Element) -> Rect;

    /// Horizontal page scroll offset, or `None` when the platform does not expose one.
    fn page_x_offset(&self) -> Option<f64> {
        None
    }

    /// Vertical page scroll offset, or `None` when the platform does not expose one.
    fn page_y_offset(&self) -> Option<f64> {
        None
    }

    /// Fallback scroll position read from the document (or body) element.
    fn document_scroll(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// Resolve the current scroll offset, each axis independently.
pub fn scroll_offset<G: ElementGeometry + ?Sized>(geometry: &G) -> Vec2 {
    let fallback = geometry.document_scroll();
    Vec2::new(
        geometry.page_x_offset().unwrap_or(fallback.x),
        geometry.page_y_offset().unwrap_or(fallback.y),
    )
}

/// An element's rectangle in document coordinates (viewport rect plus scroll offset).
pub fn bounding_rect<G: ElementGeometry + ?Sized>(geometry: &G, element: G::Element) -> Rect {
    geometry.client_rect(element) + scroll_offset(geometry)
}

bitflags::bitflags! {
    /// Axes along which positioning follows the pointer instead of the anchor.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct PointerTracking: u8 {
        /// Collapse the anchor horizontally onto the pointer.
        const X = 0b0000_0001;
        /// Collapse the anchor vertically onto the pointer.
        const Y = 0b0000_0010;
    }
}

impl PointerTracking {
    /// Parse the `x` / `y` / `xy` option form. Any other characters are ignored.
    pub fn from_axes(axes: &str) -> Self {
        let mut out = Self::empty();
        if axes.contains('x') {
            out |= Self::X;
        }
        if axes.contains('y') {
            out |= Self::Y;
        }
        out
    }
}

/// Collapse `rect` onto `pointer` along the tracked axes.
///
/// A tracked axis becomes a zero-extent span at the pointer coordinate.
pub fn adjust_for_pointer(rect: Rect, tracking: PointerTracking, pointer: Point) -> Rect {
    let mut out = rect;
    if tracking.contains(PointerTracking::X) {
        out.x0 = pointer.x;
        out.x1 = pointer.x;
    }
    if tracking.contains(PointerTracking::Y) {
        out.y0 = pointer.y;
        out.y1 = pointer.y;
    }
    out
}

/// Top-left corner of a panel of size `panel` placed around `anchor`.
///
/// Only the centered alignment rounds to a whole pixel; edge alignments keep
/// the raw arithmetic.
pub fn place(panel: Size, placement: PlacementSpec, anchor: Rect) -> Point {
    let cross_x = || match placement.align {
        Align::Center => round_px(anchor.x0 + anchor.width() / 2.0 - panel.width / 2.0),
        Align::End => anchor.x1 - panel.width,
        Align::Start => anchor.x0,
    };
    let cross_y = || match placement.align {
        Align::Center => round_px(anchor.y0 + anchor.height() / 2.0 - panel.height / 2.0),
        Align::End => anchor.y1 - panel.height,
        Align::Start => anchor.y0,
    };
    match placement.side {
        Side::Top => Point::new(cross_x(), anchor.y0 - panel.height),
        Side::Bottom => Point::new(cross_x(), anchor.y1),
        Side::Left => Point::new(anchor.x0 - panel.width, cross_y()),
        Side::Right => Point::new(anchor.x1, cross_y()),
    }
}

/// Keep a placed panel horizontally inside `container`.
///
/// The left edge is pushed to at least the container's left, then pulled back
/// by any overflow past the container's width. The right edge test compares
/// against the container width, not its right coordinate. No vertical clamping.
pub fn clamp_to_container(position: Point, panel: Size, container: Rect) -> Point {
    let mut left = position.x.max(container.x0);
    let overflow = left + panel.width - container.width();
    if overflow > 0.0 {
        left -= overflow;
    }
    Point::new(left, position.y)
}

/// Axis a [`TriangleOffset`] applies to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    /// Offset from the panel's left edge.
    Horizontal,
    /// Offset from the panel's top edge.
    Vertical,
}

/// Where the pointer triangle sits inside the panel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleOffset {
    /// Which edge the offset is measured from.
    pub axis: Axis,
    /// Distance from the panel edge to the anchor's center line.
    pub offset: f64,
}

/// Offset of the pointer triangle so it points at the anchor's center.
pub fn pointer_offset(placement: PlacementSpec, anchor: Rect, position: Point) -> TriangleOffset {
    if placement.side.is_vertical() {
        TriangleOffset {
            axis: Axis::Horizontal,
            offset: anchor.x0 + anchor.width() / 2.0 - position.x,
        }
    } else {
        TriangleOffset {
            axis: Axis::Vertical,
            offset: anchor.y0 + anchor.height() / 2.0 - position.y,
        }
    }
}

/// Round half toward positive infinity, like the browser's `Math.round`.
fn round_px(v: f64) -> f64 {
    // kurbo picks std or libm for us.
    Point::new(v + 0.5, 0.0).floor().x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> Rect {
        // top 100, left 50, width 20, height 10
        Rect::new(50.0, 100.0, 70.0, 110.0)
    }

    fn spec(s: &str) -> PlacementSpec {
        PlacementSpec::parse(s).unwrap()
    }

    struct Page {
        rect: Rect,
        page: (Option<f64>, Option<f64>),
        doc: Vec2,
    }

    impl ElementGeometry for Page {
        type Element = u32;
        fn client_rect(&self, _element: u32) -> Rect {
            self.rect
        }
        fn page_x_offset(&self) -> Option<f64> {
            self.page.0
        }
        fn page_y_offset(&self) -> Option<f64> {
            self.page.1
        }
        fn document_scroll(&self) -> Vec2 {
            self.doc
        }
    }

    #[test]
    fn top_right_example() {
        let pos = place(Size::new(40.0, 15.0), spec("top|right"), anchor());
        assert_eq!(pos, Point::new(30.0, 85.0));
    }

    #[test]
    fn primary_axis_per_side() {
        let panel = Size::new(40.0, 15.0);
        assert_eq!(place(panel, spec("top|left"), anchor()).y, 85.0);
        assert_eq!(place(panel, spec("bottom|left"), anchor()).y, 110.0);
        assert_eq!(place(panel, spec("left|top"), anchor()).x, 10.0);
        assert_eq!(place(panel, spec("right|top"), anchor()).x, 70.0);
    }

    #[test]
    fn cross_axis_alignment() {
        let panel = Size::new(40.0, 16.0);
        assert_eq!(place(panel, spec("bottom|left"), anchor()).x, 50.0);
        assert_eq!(place(panel, spec("bottom|right"), anchor()).x, 30.0);
        // 50 + 10 - 20
        assert_eq!(place(panel, spec("bottom|center"), anchor()).x, 40.0);
        assert_eq!(place(panel, spec("right|top"), anchor()).y, 100.0);
        assert_eq!(place(panel, spec("right|bottom"), anchor()).y, 94.0);
        // 100 + 5 - 8
        assert_eq!(place(panel, spec("right|center"), anchor()).y, 97.0);
    }

    #[test]
    fn only_center_rounds() {
        let panel = Size::new(41.0, 15.0);
        // 50 + 10 - 20.5 = 39.5 rounds up.
        assert_eq!(place(panel, spec("top"), anchor()).x, 40.0);
        // Edge alignment keeps the fraction.
        let anchor = Rect::new(50.25, 100.0, 70.0, 110.0);
        assert_eq!(place(panel, spec("top|left"), anchor).x, 50.25);
        assert_eq!(place(panel, spec("top|right"), anchor).x, 29.0);
    }

    #[test]
    fn round_matches_browser_for_negative_halves() {
        assert_eq!(round_px(-2.5), -2.0);
        assert_eq!(round_px(2.5), 3.0);
        assert_eq!(round_px(-2.6), -3.0);
    }

    #[test]
    fn clamp_pulls_back_overflow() {
        let container = Rect::new(0.0, 0.0, 200.0, 500.0);
        let out = clamp_to_container(Point::new(190.0, 7.0), Size::new(40.0, 15.0), container);
        assert_eq!(out, Point::new(160.0, 7.0));
    }

    #[test]
    fn clamp_pushes_past_left_edge() {
        let container = Rect::new(20.0, 0.0, 220.0, 500.0);
        let out = clamp_to_container(Point::new(-5.0, -30.0), Size::new(40.0, 15.0), container);
        // No vertical clamping.
        assert_eq!(out, Point::new(20.0, -30.0));
    }

    #[test]
    fn clamp_compares_against_container_width() {
        // Container offset by 100: right edge at 300 but width is 200.
        let container = Rect::new(100.0, 0.0, 300.0, 50.0);
        let out = clamp_to_container(Point::new(180.0, 0.0), Size::new(40.0, 10.0), container);
        assert_eq!(out.x, 160.0);
    }

    #[test]
    fn pointer_adjustment_collapses_axes() {
        let r = anchor();
        let p = Point::new(61.0, 104.0);
        let x = adjust_for_pointer(r, PointerTracking::X, p);
        assert_eq!((x.x0, x.x1, x.width()), (61.0, 61.0, 0.0));
        assert_eq!((x.y0, x.y1), (100.0, 110.0));
        let xy = adjust_for_pointer(r, PointerTracking::all(), p);
        assert_eq!(xy, Rect::new(61.0, 104.0, 61.0, 104.0));
        assert_eq!(adjust_for_pointer(r, PointerTracking::empty(), p), r);
    }

    #[test]
    fn pointer_tracking_from_axes() {
        assert_eq!(PointerTracking::from_axes("x"), PointerTracking::X);
        assert_eq!(PointerTracking::from_axes("y"), PointerTracking::Y);
        assert_eq!(PointerTracking::from_axes("xy"), PointerTracking::all());
        assert!(PointerTracking::from_axes("").is_empty());
    }

    #[test]
    fn triangle_points_at_anchor_center() {
        let off = pointer_offset(spec("bottom|left"), anchor(), Point::new(45.0, 110.0));
        assert_eq!(
            off,
            TriangleOffset {
                axis: Axis::Horizontal,
                offset: 15.0,
            }
        );
        let off = pointer_offset(
            PlacementSpec::new(Side::Right, Align::Start),
            anchor(),
            Point::new(70.0, 98.0),
        );
        assert_eq!(
            off,
            TriangleOffset {
                axis: Axis::Vertical,
                offset: 7.0,
            }
        );
    }

    #[test]
    fn bounding_rect_adds_scroll_per_axis() {
        let page = Page {
            rect: Rect::new(10.0, 20.0, 30.0, 40.0),
            page: (Some(5.0), None),
            doc: Vec2::new(99.0, 7.0),
        };
        assert_eq!(bounding_rect(&page, 0), Rect::new(15.0, 27.0, 35.0, 47.0));

        let unscrolled = Page {
            rect: Rect::new(10.0, 20.0, 30.0, 40.0),
            page: (None, None),
            doc: Vec2::ZERO,
        };
        assert_eq!(bounding_rect(&unscrolled, 0), unscrolled.rect);
    }
}
