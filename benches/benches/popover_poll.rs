// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_placement::{ElementGeometry, TriangleOffset};
use understory_popover::{
    Document, NoTemplates, PopoverOptions, PopoverRoot, Surface, TriggerEvent,
};

/// Flat document: element 0 is the body, triggers and panels follow.
struct Flat {
    rects: Vec<Rect>,
    parents: Vec<Option<u32>>,
}

impl Flat {
    fn with_triggers(n: usize) -> Self {
        let mut rects = vec![Rect::new(0.0, 0.0, 1280.0, 800.0)];
        let mut parents = vec![None];
        for i in 0..n {
            let x = (i % 40) as f64 * 30.0;
            let y = (i / 40) as f64 * 20.0;
            rects.push(Rect::new(x, y, x + 24.0, y + 16.0));
            parents.push(Some(0));
        }
        Self { rects, parents }
    }
}

impl ElementGeometry for Flat {
    type Element = u32;

    fn client_rect(&self, element: u32) -> Rect {
        self.rects[element as usize]
    }
}

impl Document for Flat {
    fn parent_of(&self, element: u32) -> Option<u32> {
        self.parents[element as usize]
    }
    fn find_container(&self, _selector: &str) -> Option<u32> {
        Some(0)
    }
    fn body(&self) -> u32 {
        0
    }
    fn find_triangle(&self, _panel: u32) -> Option<u32> {
        None
    }
}

impl Surface for Flat {
    fn create_panel(&mut self, _dom_id: &str, _classes: &[String]) -> u32 {
        self.rects.push(Rect::new(0.0, 0.0, 160.0, 90.0));
        self.parents.push(None);
        (self.rects.len() - 1) as u32
    }
    fn set_content(&mut self, _panel: u32, _markup: &str) {}
    fn add_class(&mut self, _panel: u32, _class: &str) {}
    fn append(&mut self, container: u32, panel: u32) {
        self.parents[panel as usize] = Some(container);
    }
    fn bind(&mut self, _panel: u32) {}
    fn remove(&mut self, _panel: u32) {}
    fn set_visible(&mut self, _panel: u32, _visible: bool) {}
    fn set_position(&mut self, panel: u32, position: Point) {
        let r = &mut self.rects[panel as usize];
        *r = Rect::from_origin_size(position, r.size());
    }
    fn set_triangle_offset(&mut self, _triangle: u32, _offset: TriangleOffset) {}
}

fn build(n: usize, grouped: bool) -> (Flat, PopoverRoot<u32>, Vec<understory_popover::PopoverId>) {
    let mut dom = Flat::with_triggers(n);
    let mut root = PopoverRoot::new();
    let mut opts = PopoverOptions::with_placement("bottom|center");
    opts.template = Some(String::from("<p>bench</p>"));
    opts.plain = Some(true);
    if grouped {
        opts.group = Some(String::from("menus"));
    }
    let ids = (1..=n as u32)
        .filter_map(|trigger| root.insert(&mut dom, &mut NoTemplates, trigger, &opts).ok())
        .collect();
    (dom, root, ids)
}

fn bench_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("popover");
    for &n in &[64usize, 512] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("open_close_n{}", n), |b| {
            b.iter_batched(
                || build(n, false),
                |(mut dom, mut root, ids)| {
                    let t = Duration::ZERO;
                    for &id in &ids {
                        root.trigger(id, TriggerEvent::default(), t);
                    }
                    let opened = root.poll(&mut dom, t).len();
                    for &id in &ids {
                        root.hide_popover(id, t);
                    }
                    let closed = root.poll(&mut dom, t).len();
                    black_box((opened, closed));
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("group_handoff_n{}", n), |b| {
            b.iter_batched(
                || build(n, true),
                |(mut dom, mut root, ids)| {
                    let mut events = 0;
                    for (i, &id) in ids.iter().enumerate() {
                        let t = Duration::from_millis(i as u64);
                        root.trigger(id, TriggerEvent::default(), t);
                        events += root.poll(&mut dom, t).len();
                    }
                    black_box(events);
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("outside_click_n{}", n), |b| {
            b.iter_batched(
                || {
                    let (mut dom, mut root, ids) = build(n, false);
                    for &id in &ids {
                        root.trigger(id, TriggerEvent::default(), Duration::ZERO);
                    }
                    root.poll(&mut dom, Duration::ZERO);
                    (dom, root)
                },
                |(dom, mut root)| {
                    black_box(root.click(&dom, 0, Duration::ZERO));
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cycles);
criterion_main!(benches);
