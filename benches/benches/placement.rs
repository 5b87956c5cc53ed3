// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_placement::{
    PlacementSpec, PointerTracking, adjust_for_pointer, clamp_to_container, place, pointer_offset,
};

const SPECS: &[&str] = &[
    "top",
    "top|left",
    "top|center",
    "top|right",
    "bottom",
    "bottom|left",
    "bottom|center",
    "bottom|right",
    "left",
    "left|top",
    "left|center",
    "left|bottom",
    "right",
    "right|top",
    "right|center",
    "right|bottom",
];

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_anchors(count: usize, max_w: f64, max_h: f64, seed: u64) -> Vec<Rect> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let w = 10.0 + rng.next_f64() * 90.0;
        let h = 10.0 + rng.next_f64() * 30.0;
        let x0 = rng.next_f64() * (max_w - w);
        let y0 = rng.next_f64() * (max_h - h);
        out.push(Rect::new(x0, y0, x0 + w, y0 + h));
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(SPECS.len() as u64));
    group.bench_function("all_valid", |b| {
        b.iter(|| {
            for s in SPECS {
                black_box(PlacementSpec::parse(black_box(s)).ok());
            }
        })
    });
    group.bench_function("rejects", |b| {
        b.iter(|| {
            for s in ["", "middle", "top|", "top|top", "left|right", "TOP"] {
                black_box(PlacementSpec::parse(black_box(s)).is_err());
            }
        })
    });
    group.finish();
}

fn bench_place(c: &mut Criterion) {
    let specs: Vec<PlacementSpec> = SPECS
        .iter()
        .filter_map(|s| PlacementSpec::parse(s).ok())
        .collect();
    let container = Rect::new(0.0, 0.0, 1280.0, 800.0);
    let panel = Size::new(180.0, 120.0);
    let mut group = c.benchmark_group("place");
    for &n in &[256usize, 4096] {
        let anchors = gen_anchors(n, container.width(), container.height(), 0xC0FF_EE00 + n as u64);
        group.throughput(Throughput::Elements((n * specs.len()) as u64));
        group.bench_function(format!("place_n{}", n), |b| {
            b.iter(|| {
                let mut acc = 0.0;
                for anchor in &anchors {
                    for &spec in &specs {
                        acc += place(panel, spec, *anchor).x;
                    }
                }
                black_box(acc)
            })
        });
        group.bench_function(format!("place_clamp_triangle_n{}", n), |b| {
            b.iter(|| {
                let mut acc = 0.0;
                for anchor in &anchors {
                    for &spec in &specs {
                        let pos = clamp_to_container(place(panel, spec, *anchor), panel, container);
                        acc += pointer_offset(spec, *anchor, pos).offset;
                    }
                }
                black_box(acc)
            })
        });
        group.bench_function(format!("pointer_relative_n{}", n), |b| {
            let pointer = Point::new(640.0, 400.0);
            b.iter(|| {
                let mut acc = 0.0;
                for anchor in &anchors {
                    let a = adjust_for_pointer(*anchor, PointerTracking::X, pointer);
                    acc += place(panel, specs[2], a).x;
                }
                black_box(acc)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_place);
criterion_main!(benches);
