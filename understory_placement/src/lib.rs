// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_placement --heading-base-level=0

//! Understory Placement: a Kurbo-native placement grammar and anchored panel positioning.
//!
//! ## Overview
//!
//! This crate answers one question: given an anchor rectangle and the size of a
//! floating panel, where should the panel go?
//! It is the geometric core of popovers, tooltips, and dropdowns, and does not own
//! any element tree, event wiring, or visibility state.
//! Those live one layer up (for example in `understory_popover`).
//!
//! - [`PlacementSpec`] parses strings like `"bottom|left"` or `"right"` into a
//!   [`Side`] and an [`Align`]. Malformed strings fail with [`InvalidPlacement`].
//! - [`bounding_rect`] translates an element's viewport rectangle into document
//!   coordinates using the scroll offsets reported by an [`ElementGeometry`].
//! - [`adjust_for_pointer`] collapses an anchor onto the pointer for cursor-relative placement.
//! - [`place`] computes the panel's top-left corner.
//! - [`clamp_to_container`] keeps the panel inside its container horizontally.
//! - [`pointer_offset`] positions the pointer triangle inside the panel.
//!
//! ## Coordinates
//!
//! All rectangles are [`kurbo::Rect`] in document space: `x0` is left, `y0` is top,
//! `x1` is right, and `y1` is bottom. Panel positions are [`kurbo::Point`]s where `x`
//! is left and `y` is top.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_placement::{PlacementSpec, place};
//!
//! let spec: PlacementSpec = "top|right".parse().unwrap();
//! let anchor = Rect::new(50.0, 100.0, 70.0, 110.0);
//! let pos = place(Size::new(40.0, 15.0), spec, anchor);
//! assert_eq!((pos.x, pos.y), (30.0, 85.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod geometry;
mod placement;

pub use geometry::{
    Axis, ElementGeometry, PointerTracking, TriangleOffset, adjust_for_pointer, bounding_rect,
    clamp_to_container, place, pointer_offset, scroll_offset,
};
pub use placement::{Align, InvalidPlacement, PlacementSpec, SEPARATOR, Side};
