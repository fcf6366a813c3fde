// File: crates/riso-core/tests/sankey_layout.rs
// Purpose: Sankey column leveling, flow-proportional sizing, column fit and the X->Y->Z scenario.

use approx::assert_relative_eq;
use proptest::prelude::*;
use riso_core::sankey::{assign_columns, layout, MAX_COLUMN_PASSES};
use riso_core::{Rect, SankeyGraph, SankeyLink};

#[test]
fn chain_gets_one_column_per_hop() {
    let graph = SankeyGraph::new(&["X", "Y", "Z"], vec![SankeyLink::new(0, 1, 5.0), SankeyLink::new(1, 2, 5.0)]);
    let plot = Rect::new(84.0, 68.0, 432.0, 300.0);
    let laid = layout(&graph, plot);

    assert_eq!(laid.columns.columns, vec![0, 1, 2]);
    assert!(!laid.columns.capped);
    assert_eq!(laid.max_column, 2);
    assert_eq!(laid.ribbons.len(), 2);
    for r in &laid.ribbons {
        // Value 5 of peak flow 5 takes the full 80% band.
        assert_relative_eq!(r.thickness, 300.0 * 0.8, epsilon = 1e-3);
    }

    let xs: Vec<f32> = laid.nodes.iter().map(|n| n.unwrap().rect.center().0).collect();
    assert_relative_eq!(xs[0], plot.x, epsilon = 1e-3);
    assert_relative_eq!(xs[1], plot.x + plot.w / 2.0, epsilon = 1e-3);
    assert_relative_eq!(xs[2], plot.right(), epsilon = 1e-3);
}

#[test]
fn ribbons_run_center_to_center() {
    let graph = SankeyGraph::new(
        &["a", "b", "c"],
        vec![SankeyLink::new(0, 1, 3.0), SankeyLink::new(0, 2, 1.0)],
    );
    let laid = layout(&graph, Rect::new(0.0, 0.0, 300.0, 200.0));
    let a = laid.nodes[0].unwrap().rect;
    for r in &laid.ribbons {
        let t = laid.nodes[r.target].unwrap().rect;
        assert_relative_eq!(r.x0, a.right());
        assert_relative_eq!(r.y0, a.y + a.h / 2.0);
        assert_relative_eq!(r.x1, t.x);
        assert_relative_eq!(r.y1, t.y + t.h / 2.0);
        let (c1, c2) = r.control_xs();
        assert!(r.x0 < c1 && c1 < c2 && c2 < r.x1);
    }
    assert_relative_eq!(laid.ribbons[0].thickness, 3.0 * laid.ribbons[1].thickness, epsilon = 1e-3);
}

#[test]
fn stacked_column_is_centered_with_gaps() {
    let graph = SankeyGraph::new(
        &["src", "p", "q"],
        vec![SankeyLink::new(0, 1, 2.0), SankeyLink::new(0, 2, 2.0)],
    );
    let plot = Rect::new(0.0, 0.0, 200.0, 100.0);
    let laid = layout(&graph, plot);
    let p = laid.nodes[1].unwrap().rect;
    let q = laid.nodes[2].unwrap().rect;
    assert!(p.bottom() < q.y, "nodes in a column must not touch");
    let top_space = p.y - plot.y;
    let bottom_space = plot.bottom() - q.bottom();
    assert_relative_eq!(top_space, bottom_space, epsilon = 1e-3);
}

#[test]
fn crowded_column_fits_the_plot() {
    let graph = SankeyGraph::new(
        &["a", "b", "c", "d", "e", "f"],
        vec![SankeyLink::new(0, 3, 5.0), SankeyLink::new(1, 4, 5.0), SankeyLink::new(2, 5, 5.0)],
    );
    let plot = Rect::new(0.0, 100.0, 400.0, 300.0);
    let laid = layout(&graph, plot);
    for column in [[0usize, 1, 2], [3, 4, 5]] {
        let rects: Vec<Rect> = column.iter().map(|&i| laid.nodes[i].unwrap().rect).collect();
        for r in &rects {
            assert!(r.y >= plot.y - 1e-3 && r.bottom() <= plot.bottom() + 1e-3, "{r:?} leaves {plot:?}");
        }
        for pair in rects.windows(2) {
            assert!(pair[0].bottom() <= pair[1].y + 1e-3, "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }
    // Ribbons keep the thickness of the nodes they join.
    for r in &laid.ribbons {
        assert_relative_eq!(r.thickness, laid.nodes[r.source].unwrap().rect.h, epsilon = 1e-3);
    }
}

#[test]
fn many_floored_nodes_still_fit() {
    let mut links: Vec<SankeyLink> = (1..80).map(|i| SankeyLink::new(0, i, 0.001)).collect();
    links.push(SankeyLink::new(0, 80, 1000.0));
    let labels: Vec<String> = (0..81).map(|i| format!("n{i}")).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let plot = Rect::new(0.0, 20.0, 300.0, 200.0);
    let laid = layout(&SankeyGraph::new(&refs, links), plot);
    for node in laid.nodes.iter().flatten() {
        assert!(node.rect.y >= plot.y - 1e-3 && node.rect.bottom() <= plot.bottom() + 1e-3);
    }
}

#[test]
fn tiny_flows_keep_a_visible_node() {
    let graph = SankeyGraph::new(&["big", "tiny", "sink"], vec![SankeyLink::new(0, 2, 1000.0), SankeyLink::new(1, 2, 0.001)]);
    let laid = layout(&graph, Rect::new(0.0, 0.0, 300.0, 200.0));
    assert!(laid.nodes[1].unwrap().rect.h >= 4.0);
    assert!(laid.ribbons[1].thickness >= 2.0);
}

#[test]
fn self_loop_hits_the_cap() {
    let cols = assign_columns(1, &[SankeyLink::new(0, 0, 1.0)]);
    assert!(cols.capped);
    assert_eq!(cols.passes, MAX_COLUMN_PASSES);
    assert_eq!(cols.columns, vec![MAX_COLUMN_PASSES]);
}

fn dag() -> impl Strategy<Value = (usize, Vec<SankeyLink>)> {
    (2usize..12).prop_flat_map(|n| {
        let link = (0..n - 1)
            .prop_flat_map(move |a| (Just(a), (a + 1)..n, 0.1f64..100.0))
            .prop_map(|(a, b, v)| SankeyLink::new(a, b, v));
        (Just(n), prop::collection::vec(link, 0..30))
    })
}

proptest! {
    #[test]
    fn acyclic_links_always_move_right((n, links) in dag()) {
        let cols = assign_columns(n, &links);
        prop_assert!(!cols.capped);
        for l in &links {
            prop_assert!(cols.columns[l.target] > cols.columns[l.source]);
        }
    }

    #[test]
    fn nodes_stay_inside_the_plot((n, links) in dag()) {
        let labels: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let graph = SankeyGraph::new(&refs, links);
        let plot = Rect::new(50.0, 40.0, 400.0, 300.0);
        let laid = layout(&graph, plot);
        for node in laid.nodes.iter().flatten() {
            let (cx, _) = node.rect.center();
            prop_assert!(cx >= plot.x - 1e-3 && cx <= plot.right() + 1e-3);
            prop_assert!(node.rect.y >= plot.y - 1e-3);
            prop_assert!(node.rect.bottom() <= plot.bottom() + 1e-3);
        }
        for c in 0..=laid.max_column {
            let mut column: Vec<Rect> = laid.nodes.iter().flatten().filter(|b| b.column == c).map(|b| b.rect).collect();
            column.sort_by(|a, b| a.y.total_cmp(&b.y));
            for pair in column.windows(2) {
                prop_assert!(pair[0].bottom() <= pair[1].y + 1e-3);
            }
        }
        prop_assert_eq!(laid.ribbons.len(), graph.links.len());
    }
}
