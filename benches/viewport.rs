//! Benchmarks for render window computation and draw cycles.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridpane::{CellCoords, GridView, IndexValue, MemoryDom, RenderCalculator, Settings};

/// Grid with frozen panes, headers and uneven row heights
fn frozen_grid(rows: usize, cols: usize) -> GridView<MemoryDom> {
    let mut settings = Settings::new(rows, cols);
    settings.fixed_rows_top = 2;
    settings.fixed_rows_bottom = 1;
    settings.fixed_columns_left = 1;
    settings.row_headers = vec![IndexValue::from_fn(|r| (r + 1).to_string())];
    settings.column_headers = vec![IndexValue::from_fn(gridpane::settings::col_to_letter)];
    settings.row_height = Some(IndexValue::from_fn(|r| if r % 7 == 0 { 40.0 } else { 23.0 }));
    settings.cell_value = Some(std::rc::Rc::new(|r: usize, c: usize| format!("{r}:{c}")));
    GridView::new(settings, MemoryDom::with_workspace(1280.0, 800.0)).expect("valid settings")
}

/// Forward and reverse windows over a million uneven rows
fn bench_calculator(c: &mut Criterion) {
    let size_of = |i: usize| if i % 7 == 0 { 40.0 } else { 23.0 };
    let mut group = c.benchmark_group("render_window");

    for (name, reverse) in [("forward", false), ("reverse", true)] {
        let calculator = RenderCalculator::new(1_000_000, 2, 500_000, 800.0, reverse);
        group.bench_with_input(BenchmarkId::new("compute", name), &calculator, |b, calc| {
            b.iter(|| black_box(calc).compute(size_of))
        });
    }

    group.finish();
}

/// Full draw of every pane
fn bench_full_draw(c: &mut Criterion) {
    let mut grid = frozen_grid(10_000, 100);

    c.bench_function("draw_full", |b| {
        b.iter(|| grid.resize().expect("draw failed"))
    });
}

/// Scroll one row and fast-draw, the hot path of wheel scrolling
fn bench_scroll_step(c: &mut Criterion) {
    let mut grid = frozen_grid(10_000, 100);
    grid.draw(false).expect("draw failed");

    c.bench_function("scroll_and_fast_draw", |b| {
        b.iter(|| {
            let delta = if grid.row_axis().offset() > 5_000 { -5_000 } else { 1 };
            grid.scroll_vertical(black_box(delta)).expect("scroll failed");
            grid.draw(true).expect("draw failed");
        })
    });
}

/// Scroll-to-cell jumps across grid sizes
fn bench_scroll_to_cell(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_viewport_to");

    for rows in [1_000, 100_000] {
        let mut grid = frozen_grid(rows, 50);
        grid.draw(false).expect("draw failed");
        let mut target = 0;

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_function(BenchmarkId::from_parameter(rows), |b| {
            b.iter(|| {
                target = (target + 997) % (rows - 1);
                let coords = CellCoords::from_source(target, 10);
                grid.scroll_viewport_to(black_box(coords)).expect("scroll failed")
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_calculator,
    bench_full_draw,
    bench_scroll_step,
    bench_scroll_to_cell,
);

criterion_main!(benches);
