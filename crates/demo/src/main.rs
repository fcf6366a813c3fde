// File: crates/demo/src/main.rs
// Summary: Demo renders a gallery of charts (or configs/CSV from the CLI) to PNGs, driving animations to completion.

use anyhow::{Context, Result};
use riso_core::{scan, ChartConfig, ChartInstance, Document, Element, FrameLoop, CONFIG_ATTRIBUTE};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let configs = match std::env::args().nth(1) {
        Some(raw) => {
            let (path, used_alt) = resolve_path(&raw)?;
            info!(path = %path.display(), used_alt, "loading input");
            load_configs(&path).with_context(|| format!("failed to load '{}'", path.display()))?
        }
        None => gallery(),
    };
    if configs.is_empty() {
        anyhow::bail!("no chart configs loaded");
    }

    // Mount every config the declarative way, then let the frame loop finish them.
    let mut doc = Document::new();
    for (i, config) in configs.iter().enumerate() {
        doc.push(
            Element::new(format!("chart-{i}"))
                .with_width(config.get("width").and_then(Value::as_f64).unwrap_or(720.0) as f32)
                .with_attribute(CONFIG_ATTRIBUTE, config.to_string()),
        );
    }
    let mut charts = scan(&doc);
    let frames = FrameLoop::default().run(&mut charts);
    info!(charts = charts.len(), frames, "animations settled");

    for (i, chart) in charts.iter_mut().enumerate() {
        let out = out_name(i, chart);
        std::fs::write(&out, chart.to_png()?).with_context(|| format!("writing {}", out.display()))?;
        info!(path = %out.display(), "wrote chart");
    }

    // A static chart created directly, exported as a data URI.
    let el = Element::new("inline").with_width(480.0).into_ref();
    let config = ChartConfig::new("bar", json!([{"label": "A", "value": 3}, {"label": "B", "value": 5}]))
        .with_title("Inline")
        .with_animate(false);
    match riso_core::create(&el, config)? {
        Some(mut chart) => {
            let uri = chart.export_image()?;
            info!(bytes = uri.len(), "exported data URI");
        }
        None => warn!("inline chart kind not registered"),
    }
    Ok(())
}

/// Configs come from a JSON file (one config or an array) or a `label,value` CSV.
fn load_configs(path: &Path) -> Result<Vec<Value>> {
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
    if ext == "json" {
        let text = std::fs::read_to_string(path)?;
        return Ok(match serde_json::from_str::<Value>(&text)? {
            Value::Array(items) => items,
            one => vec![one],
        });
    }
    let data = load_label_csv(path)?;
    let title = path.file_stem().and_then(|s| s.to_str()).unwrap_or("data").to_string();
    Ok(vec![
        json!({"type": "bar", "title": title, "data": data}),
        json!({"type": "hbar", "title": title, "data": data, "showRank": true}),
        json!({"type": "donut", "title": title, "data": data}),
        json!({"type": "treemap", "title": title, "data": data}),
    ])
}

fn load_label_csv(path: &Path) -> Result<Vec<Value>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));
    let i_label = idx(&["label", "name", "category"]).unwrap_or(0);
    let i_value = idx(&["value", "count", "amount"]).unwrap_or(1);

    let mut out = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let label = rec.get(i_label).map(str::trim).unwrap_or_default();
        match rec.get(i_value).and_then(|s| s.trim().parse::<f64>().ok()) {
            Some(value) => out.push(json!({"label": label, "value": value})),
            None => warn!(row, "skipping row without a numeric value"),
        }
    }
    info!(rows = out.len(), "loaded csv");
    Ok(out)
}

fn gallery() -> Vec<Value> {
    let regions = json!([
        {"label": "North", "value": 120, "highlight": true},
        {"label": "South", "value": 80},
        {"label": "East", "value": 45},
        {"label": "West", "value": 98}
    ]);
    vec![
        json!({"type": "bar", "title": "Sales by region", "source": "Internal", "data": regions, "valuePrefix": "$"}),
        json!({"type": "hbar", "title": "Ranking", "theme": "light", "data": regions, "showRank": true, "highlightTop": true}),
        json!({"type": "line", "title": "Visitors", "data": [
            {"label": "2024", "data": [{"x": "Q1", "y": 10}, {"x": "Q2", "y": 14}, {"x": "Q3", "y": 12}, {"x": "Q4", "y": 19}]},
            {"label": "2025", "data": [{"x": "Q1", "y": 12}, {"x": "Q2", "y": 17}, {"x": "Q3", "y": 21}, {"x": "Q4", "y": 24}]}
        ]}),
        json!({"type": "donut", "title": "Share", "data": regions, "centerLabel": "Total", "centerValue": "343"}),
        json!({"type": "donut", "title": "Progress", "gauge": true, "gaugeValue": 72, "data": []}),
        json!({"type": "treemap", "title": "Budget", "data": [
            {"label": "Ops", "value": 6, "children": [{"label": "Infra", "value": 4}, {"label": "Support", "value": 2}]},
            {"label": "R&D", "value": 3, "highlight": true},
            {"label": "Admin", "value": 1}
        ]}),
        json!({"type": "sankey", "title": "Energy flow", "data": {
            "nodes": [{"label": "Coal"}, {"label": "Gas"}, {"label": "Power"}, {"label": "Homes"}, {"label": "Industry"}],
            "links": [
                {"source": 0, "target": 2, "value": 40},
                {"source": 1, "target": 2, "value": 25, "highlight": true},
                {"source": 2, "target": 3, "value": 30},
                {"source": 2, "target": 4, "value": 35}
            ]
        }}),
    ]
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

/// Produce output file name like target/out/chart_<index>_<kind>.png
fn out_name(index: usize, chart: &ChartInstance) -> PathBuf {
    let mut out = PathBuf::from("target/out");
    std::fs::create_dir_all(&out).ok();
    out.push(format!("chart_{index}_{}.png", chart.kind().as_str()));
    out
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}
