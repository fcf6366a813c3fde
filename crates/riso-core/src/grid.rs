// File: crates/riso-core/src/grid.rs
// Summary: Grid/tick layout helpers and compact number formatting for labels.

pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 { return vec![start, end]; }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

/// Compact value label: `1.2K`, `3.4M`, `5.0B`, `1.0T`; smaller values are
/// rounded to an integer.
pub fn format_compact(n: f64) -> String {
    let a = n.abs();
    if a >= 1e12 { return format!("{:.1}T", n / 1e12); }
    if a >= 1e9 { return format!("{:.1}B", n / 1e9); }
    if a >= 1e6 { return format!("{:.1}M", n / 1e6); }
    if a >= 1e3 { return format!("{:.1}K", n / 1e3); }
    format!("{:.0}", n)
}
