//! Benchmarks for placement search, list reordering, and template history.
//!
//! Run with: cargo bench -p crmdeck-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use crmdeck_core::config::{EngineConfig, GridWrap};
use crmdeck_core::geometry::{Point, Rect, Size};
use crmdeck_layout::{
    ComponentKind, DashboardBoard, GridSpec, PageConfig, PageRect, PlacementRequest, Placer,
    TemplateDocument, Widget, WidgetPlacement, reorder,
};
use std::hint::black_box;

/// Tile the page body with `n` rectangles in rows, leaving no gap large
/// enough for the spiral to succeed once `n` is large.
fn crowded_page(n: usize) -> Vec<PageRect> {
    let per_row = 4;
    (0..n)
        .map(|i| {
            let col = (i % per_row) as i32;
            let row = (i / per_row) as i32;
            PageRect::new(
                format!("c{i}"),
                1,
                Rect::new(10 + col * 200, 80 + row * 110, 190, 100),
            )
        })
        .collect()
}

fn board(n: usize) -> DashboardBoard {
    let page = PageConfig {
        title: "Bench".into(),
        layout: Default::default(),
        grid: GridSpec::default(),
        widgets: (0..n)
            .map(|i| Widget {
                widget_type: "table".into(),
                id: format!("w{i}"),
                data_key: format!("k{i}"),
                xl: WidgetPlacement::default(),
            })
            .collect(),
    };
    DashboardBoard::from_page(&page, GridWrap::default())
}

fn bench_placement_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/placement_search");
    let placer = Placer::default();
    let size = Size::new(200, 100);
    let request = PlacementRequest::new(Point::new(300, 300), size, 1).expect("valid request");

    for n in [0, 4, 16, 36, 60] {
        let existing = crowded_page(n);
        group.bench_with_input(BenchmarkId::new("place", n), &existing, |b, existing| {
            b.iter(|| black_box(placer.place(&request, existing, None)))
        });
    }

    group.finish();
}

fn bench_drop_at_pointer(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/drop_at_pointer");
    let placer = Placer::default();

    for n in [4, 36] {
        let existing = crowded_page(n);
        group.bench_with_input(BenchmarkId::new("center", n), &existing, |b, existing| {
            b.iter(|| {
                black_box(placer.place_at_pointer(
                    Point::new(408, 528),
                    Size::new(300, 100),
                    1,
                    existing,
                ))
            })
        });
    }

    group.finish();
}

fn bench_reorder(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/reorder");

    for n in [8, 64, 512] {
        let list: Vec<u32> = (0..n as u32).collect();
        group.bench_with_input(BenchmarkId::new("end_to_front", n), &list, |b, list| {
            b.iter_batched(
                || list.clone(),
                |mut list| black_box(reorder(&mut list, n - 1, 0)),
                BatchSize::SmallInput,
            )
        });

        let board = board(n);
        group.bench_with_input(BenchmarkId::new("dashboard_move", n), &board, |b, board| {
            b.iter_batched(
                || board.clone(),
                |mut board| black_box(board.move_widget(0, n - 1)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_template_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/template_history");
    let config = EngineConfig::default();

    group.bench_function("drop_then_undo_all", |b| {
        b.iter_batched(
            || TemplateDocument::new("Bench", &config),
            |mut doc| {
                for i in 0..24 {
                    let pointer = Point::new(100 + (i % 4) * 180, 150 + (i / 4) * 140);
                    doc.drop_component(ComponentKind::Description, pointer, 1)
                        .expect("drop should succeed");
                }
                while doc.undo() {}
                black_box(doc.components().len())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_placement_search,
    bench_drop_at_pointer,
    bench_reorder,
    bench_template_history,
);

criterion_main!(benches);
