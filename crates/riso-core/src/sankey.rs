// File: crates/riso-core/src/sankey.rs
// Summary: Sankey layout: iterative topological column assignment, flow-proportional node stacking and center-anchored ribbons.

use serde::Deserialize;
use tracing::warn;

use crate::geometry::Rect;

/// Upper bound on leveling passes; keeps cyclic graphs terminating.
pub const MAX_COLUMN_PASSES: usize = 20;
/// Fraction of the plot height the fullest column may take.
const FILL: f64 = 0.8;
const MAX_GAP: f64 = 20.0;
const MIN_NODE_HEIGHT: f32 = 4.0;
const MIN_RIBBON: f32 = 2.0;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SankeyNode {
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    #[serde(default)]
    pub highlight: bool,
}

impl SankeyLink {
    pub fn new(source: usize, target: usize, value: f64) -> Self {
        Self { source, target, value, highlight: false }
    }

    fn flow(&self) -> f64 {
        if self.value.is_finite() && self.value > 0.0 { self.value } else { 0.0 }
    }

    fn valid(&self, node_count: usize) -> bool {
        self.source < node_count && self.target < node_count
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SankeyGraph {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

impl SankeyGraph {
    pub fn new(labels: &[&str], links: Vec<SankeyLink>) -> Self {
        Self {
            nodes: labels.iter().map(|l| SankeyNode { label: (*l).to_string() }).collect(),
            links,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub columns: Vec<usize>,
    /// Leveling passes run.
    pub passes: usize,
    /// The pass bound was hit while columns were still moving (a cycle).
    pub capped: bool,
}

/// Level nodes: `column[target] >= column[source] + 1` for every link,
/// repeated until stable or `MAX_COLUMN_PASSES` passes have run. Links
/// naming a missing node are ignored.
pub fn assign_columns(node_count: usize, links: &[SankeyLink]) -> Columns {
    let mut columns = vec![0usize; node_count];
    let mut changed = true;
    let mut passes = 0;
    while changed && passes < MAX_COLUMN_PASSES {
        changed = false;
        passes += 1;
        for l in links.iter().filter(|l| l.valid(node_count)) {
            let next = columns[l.source] + 1;
            if next > columns[l.target] {
                columns[l.target] = next;
                changed = true;
            }
        }
    }
    if changed {
        warn!(passes, "sankey column assignment hit the pass cap; graph has a cycle");
    }
    Columns { columns, passes, capped: changed }
}

/// Per-node flow: the larger of total inbound and total outbound value.
pub fn node_flows(node_count: usize, links: &[SankeyLink]) -> Vec<f64> {
    let mut inbound = vec![0.0; node_count];
    let mut outbound = vec![0.0; node_count];
    for l in links.iter().filter(|l| l.valid(node_count)) {
        outbound[l.source] += l.flow();
        inbound[l.target] += l.flow();
    }
    inbound.iter().zip(&outbound).map(|(i, o)| i.max(*o)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub rect: Rect,
    pub column: usize,
    pub flow: f64,
}

/// One link drawn from the right edge of its source node to the left edge
/// of its target, both at the node's vertical center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ribbon {
    /// Index into the graph's links.
    pub link: usize,
    pub source: usize,
    pub target: usize,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub thickness: f32,
}

impl Ribbon {
    /// X of the two cubic control points (40% and 60% of the span).
    pub fn control_xs(&self) -> (f32, f32) {
        let dx = self.x1 - self.x0;
        (self.x0 + dx * 0.4, self.x0 + dx * 0.6)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SankeyLayout {
    pub columns: Columns,
    pub max_column: usize,
    /// Reference flow for heights and thickness (largest column total).
    pub scale_flow: f64,
    /// `None` only for nodes outside the column range, which cannot happen
    /// for a valid graph; kept optional so drawing can skip gracefully.
    pub nodes: Vec<Option<NodeBox>>,
    pub ribbons: Vec<Ribbon>,
}

/// Lay the graph out inside `plot`: columns spread across the width, nodes
/// stacked and centered per column, ribbons for every valid link.
pub fn layout(graph: &SankeyGraph, plot: Rect) -> SankeyLayout {
    let n = graph.nodes.len();
    let columns = assign_columns(n, &graph.links);
    let max_column = columns.columns.iter().copied().max().unwrap_or(0);
    let flows = node_flows(n, &graph.links);
    let mut col_totals = vec![0.0f64; max_column + 1];
    for (i, &c) in columns.columns.iter().enumerate() {
        col_totals[c] += flows[i];
    }
    let peak = col_totals.iter().copied().fold(0.0, f64::max);
    let scale_flow = if peak > 0.0 { peak } else { 1.0 };

    let ch = plot.h as f64;
    let node_w = (20.0f32).min(plot.w / (max_column + 1) as f32 * 0.15);
    let col_x = |c: usize| plot.x + (c as f32 / max_column.max(1) as f32) * plot.w;

    let mut nodes: Vec<Option<NodeBox>> = vec![None; n];
    for c in 0..=max_column {
        let members: Vec<usize> = (0..n).filter(|&i| columns.columns[i] == c).collect();
        if members.is_empty() {
            continue;
        }
        let count = members.len() as f64;
        let mut heights: Vec<f64> = members
            .iter()
            .map(|&i| (flows[i] / scale_flow * ch * FILL).max(MIN_NODE_HEIGHT as f64))
            .collect();
        let mut stacked: f64 = heights.iter().sum();
        // Height floors alone can overrun a crowded column; squeeze them back in.
        if stacked > ch && stacked > 0.0 {
            let squeeze = ch / stacked;
            heights.iter_mut().for_each(|h| *h *= squeeze);
            stacked = ch;
        }
        let gap = MAX_GAP.min((ch - stacked) / count).max(0.0);
        let mut y = plot.y as f64 + (ch - stacked - (count - 1.0) * gap) / 2.0;
        for (&i, &h) in members.iter().zip(&heights) {
            nodes[i] = Some(NodeBox {
                rect: Rect::new(col_x(c) - node_w / 2.0, y as f32, node_w, h as f32),
                column: c,
                flow: flows[i],
            });
            y += h + gap;
        }
    }

    let mut ribbons = Vec::with_capacity(graph.links.len());
    for (li, link) in graph.links.iter().enumerate() {
        let (Some(Some(src)), Some(Some(tgt))) = (nodes.get(link.source), nodes.get(link.target)) else {
            warn!(link = li, source = link.source, target = link.target, nodes = n, "skipping sankey link with dangling node reference");
            continue;
        };
        let thickness = ((link.flow() / scale_flow * ch * FILL) as f32).max(MIN_RIBBON);
        ribbons.push(Ribbon {
            link: li,
            source: link.source,
            target: link.target,
            x0: src.rect.right(),
            y0: src.rect.y + src.rect.h / 2.0,
            x1: tgt.rect.x,
            y1: tgt.rect.y + tgt.rect.h / 2.0,
            thickness,
        });
    }

    SankeyLayout { columns, max_column, scale_flow, nodes, ribbons }
}
