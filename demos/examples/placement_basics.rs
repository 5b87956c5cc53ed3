// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement strings and the positions they produce.
//!
//! This example parses every placement form, places a fixed panel around one
//! anchor, and shows horizontal container clamping and the triangle offset.
//!
//! Run:
//! - `cargo run -p understory_demos --example placement_basics`

use kurbo::{Rect, Size};
use understory_placement::{PlacementSpec, clamp_to_container, place, pointer_offset};

fn main() {
    let anchor = Rect::new(50.0, 100.0, 70.0, 110.0);
    let panel = Size::new(40.0, 15.0);

    for side in ["top", "bottom", "left", "right"] {
        for align in ["", "|left", "|center", "|right", "|top", "|bottom"] {
            let text = format!("{side}{align}");
            match text.parse::<PlacementSpec>() {
                Ok(spec) => {
                    let pos = place(panel, spec, anchor);
                    let tri = pointer_offset(spec, anchor, pos);
                    println!(
                        "{text:>13} -> {spec:<13} at ({:>5}, {:>5}), triangle {:?} {}",
                        pos.x, pos.y, tri.axis, tri.offset
                    );
                }
                Err(err) => println!("{text:>13} -> {err}"),
            }
        }
    }

    // A panel that would overflow a 200px-wide container is pulled back inside.
    let container = Rect::new(0.0, 0.0, 200.0, 400.0);
    let near_edge = Rect::new(180.0, 100.0, 190.0, 110.0);
    let spec = PlacementSpec::parse("bottom|left").unwrap();
    let raw = place(panel, spec, near_edge);
    let clamped = clamp_to_container(raw, panel, container);
    println!("raw x = {}, clamped x = {}", raw.x, clamped.x);
}
