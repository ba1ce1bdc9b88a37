// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use proteus::model::Node;
use proteus::session::Window;

fn long_node(lines: usize) -> Node {
    let mut contents = String::new();
    for index in 0..lines {
        let _ = writeln!(contents, "line {index} with a little bit of body text");
    }
    Node::new("Top", "bench.info", Arc::from(contents.as_str()), None, None, None, Vec::new())
}

// Benchmark identity (keep stable):
// - Group name in this file: `session.viewport`
// - Case IDs: `page_sweep`, `goal_column_walk`
fn benches_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("session.viewport");
    let node = long_node(20_000);

    group.throughput(Throughput::Elements(20_000));
    group.bench_function("page_sweep", |b| {
        b.iter(|| {
            let mut window = Window::new(black_box(&node), 50, 80);
            let mut top = 0isize;
            while (top as usize) < window.line_count() {
                black_box(window.set_page_top(top));
                top += 50;
            }
            black_box(window.page_top())
        })
    });

    group.bench_function("goal_column_walk", |b| {
        let mut window = Window::new(&node, 50, 80);
        window.set_point(20);
        b.iter(|| {
            window.seed_goal_column();
            for _ in 0..512 {
                if !window.point_next_line() {
                    window.set_point(20);
                }
                window.move_to_goal();
            }
            black_box(window.point())
        })
    });

    group.finish();
}

criterion_group!(benches, benches_scroll);
criterion_main!(benches);
