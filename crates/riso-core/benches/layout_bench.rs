use criterion::{black_box, criterion_group, criterion_main, Criterion};
use riso_core::sankey::layout;
use riso_core::{squarify, squarify_nested, Rect, SankeyGraph, SankeyLink, TreemapItem};

fn build_items(n: usize) -> Vec<TreemapItem> {
    (0..n)
        .map(|i| {
            let v = 1.0 + ((i as f64 * 0.37).sin().abs() * 1000.0);
            TreemapItem::new(format!("item{i}"), v)
        })
        .collect()
}

fn build_graph(layers: usize, width: usize) -> SankeyGraph {
    let labels: Vec<String> = (0..layers * width).map(|i| format!("n{i}")).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let mut links = Vec::new();
    for l in 0..layers - 1 {
        for a in 0..width {
            for b in 0..width {
                if (a + b) % 3 != 0 {
                    links.push(SankeyLink::new(l * width + a, (l + 1) * width + b, 1.0 + (a * b) as f64));
                }
            }
        }
    }
    SankeyGraph::new(&refs, links)
}

fn bench_treemap(c: &mut Criterion) {
    let bounds = Rect::new(0.0, 0.0, 1200.0, 800.0);
    let mut group = c.benchmark_group("squarify");
    for &n in &[100usize, 1_000usize] {
        let items = build_items(n);
        group.bench_function(format!("flat_{n}"), |b| b.iter(|| black_box(squarify(black_box(&items), bounds, 0).len())));
    }
    let nested: Vec<TreemapItem> = (0..30).map(|i| TreemapItem::new(format!("g{i}"), 0.0).with_children(build_items(40))).collect();
    let nested: Vec<TreemapItem> = nested
        .into_iter()
        .map(|mut g| {
            g.value = g.children.iter().map(|c| c.value).sum();
            g
        })
        .collect();
    group.bench_function("nested_30x40", |b| b.iter(|| black_box(squarify_nested(black_box(&nested), bounds, 18.0, 3.0).len())));
    group.finish();
}

fn bench_sankey(c: &mut Criterion) {
    let plot = Rect::new(84.0, 68.0, 1000.0, 600.0);
    let mut group = c.benchmark_group("sankey_layout");
    for &(layers, width) in &[(4usize, 5usize), (8, 12)] {
        let graph = build_graph(layers, width);
        group.bench_function(format!("{layers}x{width}"), |b| b.iter(|| black_box(layout(black_box(&graph), plot).ribbons.len())));
    }
    group.finish();
}

criterion_group!(benches, bench_treemap, bench_sankey);
criterion_main!(benches);
