// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover lifecycle against a toy document.
//!
//! Two grouped popovers hand off to each other, an outside click dismisses,
//! and a hover-triggered popover closes after its timeout.
//!
//! Run:
//! - `cargo run -p understory_demos --example popover_basics`

use std::time::Duration;

use kurbo::{Point, Rect};
use understory_placement::{ElementGeometry, TriangleOffset};
use understory_popover::{
    Document, NoTemplates, PopoverEvent, PopoverOptions, PopoverRoot, Surface, TriggerEvent,
};

const BODY: u32 = 0;

/// Elements are indices; each remembers its parent and rectangle.
#[derive(Default)]
struct Toy {
    parents: Vec<Option<u32>>,
    rects: Vec<Rect>,
    names: Vec<String>,
}

impl Toy {
    fn add(&mut self, name: &str, parent: Option<u32>, rect: Rect) -> u32 {
        self.parents.push(parent);
        self.rects.push(rect);
        self.names.push(name.to_string());
        (self.rects.len() - 1) as u32
    }
}

impl ElementGeometry for Toy {
    type Element = u32;
    fn client_rect(&self, element: u32) -> Rect {
        self.rects[element as usize]
    }
}

impl Document for Toy {
    fn parent_of(&self, element: u32) -> Option<u32> {
        self.parents[element as usize]
    }
    fn find_container(&self, selector: &str) -> Option<u32> {
        self.names.iter().position(|n| n == selector).map(|i| i as u32)
    }
    fn body(&self) -> u32 {
        BODY
    }
    fn find_triangle(&self, _panel: u32) -> Option<u32> {
        None
    }
}

impl Surface for Toy {
    fn create_panel(&mut self, dom_id: &str, classes: &[String]) -> u32 {
        println!("  create #{dom_id} {classes:?}");
        self.add(dom_id, None, Rect::new(0.0, 0.0, 120.0, 60.0))
    }
    fn set_content(&mut self, _panel: u32, _markup: &str) {}
    fn add_class(&mut self, _panel: u32, _class: &str) {}
    fn append(&mut self, container: u32, panel: u32) {
        self.parents[panel as usize] = Some(container);
    }
    fn bind(&mut self, _panel: u32) {}
    fn remove(&mut self, panel: u32) {
        self.parents[panel as usize] = None;
    }
    fn set_visible(&mut self, panel: u32, visible: bool) {
        println!("  {} visible = {visible}", self.names[panel as usize]);
    }
    fn set_position(&mut self, panel: u32, position: Point) {
        let r = &mut self.rects[panel as usize];
        *r = Rect::from_origin_size(position, r.size());
    }
    fn set_triangle_offset(&mut self, _triangle: u32, _offset: TriangleOffset) {}
}

fn report(t: Duration, events: &[PopoverEvent]) {
    for e in events {
        match e {
            PopoverEvent::Opened { id, position } => {
                println!("{t:?}: {id:?} opened at ({}, {})", position.x, position.y);
            }
            PopoverEvent::Closed { id } => println!("{t:?}: {id:?} closed"),
        }
    }
}

fn main() {
    let mut doc = Toy::default();
    doc.add("body", None, Rect::new(0.0, 0.0, 800.0, 600.0));
    let file = doc.add("file", Some(BODY), Rect::new(10.0, 10.0, 50.0, 30.0));
    let edit = doc.add("edit", Some(BODY), Rect::new(60.0, 10.0, 100.0, 30.0));
    let help = doc.add("help", Some(BODY), Rect::new(700.0, 10.0, 740.0, 30.0));

    let mut root = PopoverRoot::new();
    let menu = |placement: &str| {
        PopoverOptions::from_attributes([
            ("placement", placement),
            ("group", "menubar"),
            ("template", "<ul><li>item</li></ul>"),
            ("plain", "true"),
        ])
        .unwrap()
    };
    let file_menu = root
        .insert(&mut doc, &mut NoTemplates, file, &menu("bottom|left"))
        .unwrap();
    let edit_menu = root
        .insert(&mut doc, &mut NoTemplates, edit, &menu("bottom|center"))
        .unwrap();
    let tip_opts = PopoverOptions::from_attributes([
        ("placement", "left"),
        ("trigger", "mouseenter"),
        ("timeout", "0.5"),
        ("template", "Help"),
        ("plain", "true"),
    ])
    .unwrap();
    let tip = root
        .insert(&mut doc, &mut NoTemplates, help, &tip_opts)
        .unwrap();

    let mut now = Duration::ZERO;
    println!("open the file menu");
    root.trigger(file_menu, TriggerEvent::default(), now);
    report(now, &root.poll(&mut doc, now));

    now += Duration::from_millis(200);
    println!("open the edit menu; the file menu closes first");
    root.trigger(edit_menu, TriggerEvent::default(), now);
    report(now, &root.poll(&mut doc, now));

    now += Duration::from_millis(200);
    println!("click the body");
    root.click(&doc, BODY, now);
    report(now, &root.poll(&mut doc, now));

    now += Duration::from_millis(200);
    println!("hover the help button, then leave");
    root.pointer_moved(&[BODY, help], now);
    root.trigger(tip, TriggerEvent::default(), now);
    report(now, &root.poll(&mut doc, now));
    root.pointer_moved(&[BODY], now);
    while let Some(deadline) = root.next_deadline() {
        now = deadline;
        report(now, &root.poll(&mut doc, now));
    }

    root.clear(&mut doc);
    println!("{root:?}");
}
