// File: crates/riso-core/tests/lifecycle.rs
// Purpose: Chart instance lifecycle: construction errors, frame-driven animation, one-shot grain and teardown.

use std::time::Duration;

use riso_core::animation::DEFAULT_FRAME_INTERVAL;
use riso_core::{create, Animated, ChartConfig, ChartError, ChartInstance, ChartKind, Document, Element, FrameLoop, GrainTarget};
use serde_json::{json, Value};

fn bars() -> Value {
    json!([{"label": "North", "value": 120}, {"label": "South", "value": 80}, {"label": "East", "value": 45}])
}

fn make(el: &riso_core::ElementRef, config: ChartConfig) -> ChartInstance {
    create(el, config.with_grain_seed(42)).expect("create").expect("known kind")
}

/// Drive one instance by hand, recording the progress of every drawn frame.
fn drive(chart: &mut ChartInstance) -> Vec<f32> {
    let mut now = Duration::ZERO;
    let mut seen = Vec::new();
    while let Some(handle) = chart.pending_frame() {
        chart.on_frame(handle, now);
        seen.push(chart.progress());
        now += DEFAULT_FRAME_INTERVAL;
        assert!(seen.len() < 10_000, "animation never finished");
    }
    seen
}

#[test]
fn animated_progress_is_monotone_and_ends_at_one() {
    let el = Element::new("c").into_ref();
    let mut chart = make(&el, ChartConfig::new("bar", bars()).with_size(300.0, 200.0));
    assert_eq!(chart.frames_drawn(), 0);

    let seen = drive(&mut chart);
    assert!(seen[0] < 1.0);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    assert_eq!(*seen.last().unwrap(), 1.0);
    assert_eq!(chart.frames_drawn(), seen.len());

    let budget = (chart.duration().as_millis() / DEFAULT_FRAME_INTERVAL.as_millis()) as usize + 2;
    assert!(seen.len() <= budget, "{} frames for {:?}", seen.len(), chart.duration());
    assert!(chart.is_complete());
}

#[test]
fn static_config_draws_exactly_once() {
    let el = Element::new("c").into_ref();
    let mut chart = make(&el, ChartConfig::new("line", json!([
        {"label": "a", "data": [{"x": 1, "y": 2}, {"x": 2, "y": 4}, {"x": 3, "y": 3}]}
    ])).with_animate(false));
    assert_eq!(chart.frames_drawn(), 1);
    assert_eq!(chart.progress(), 1.0);
    assert!(chart.pending_frame().is_none());
    assert_eq!(FrameLoop::default().run(std::slice::from_mut(&mut chart)), 0);
    assert_eq!(chart.frames_drawn(), 1);
}

#[test]
fn stale_handles_are_ignored() {
    let el = Element::new("c").into_ref();
    let mut chart = make(&el, ChartConfig::new("donut", bars()).with_size(200.0, 200.0));
    let first = chart.pending_frame().unwrap();
    chart.on_frame(first, Duration::ZERO);
    assert_eq!(chart.frames_drawn(), 1);
    chart.on_frame(first, Duration::from_millis(16));
    assert_eq!(chart.frames_drawn(), 1);
    assert_ne!(chart.pending_frame(), Some(first));
}

#[test]
fn destroy_is_idempotent_and_stops_drawing() {
    let el = Element::new("c").into_ref();
    let mut chart = make(&el, ChartConfig::new("treemap", json!([{"label": "a", "value": 2}, {"label": "b", "value": 1}])));
    let handle = chart.pending_frame().unwrap();
    assert_eq!(el.borrow().mounted().len(), 1);

    chart.destroy();
    chart.destroy();
    assert!(chart.is_destroyed());
    assert!(chart.pending_frame().is_none());
    assert!(el.borrow().mounted().is_empty());

    chart.on_frame(handle, Duration::from_millis(5));
    assert_eq!(chart.frames_drawn(), 0);
    chart.replay().unwrap();
    assert!(chart.pending_frame().is_none());
}

#[test]
fn destroyed_chart_has_nothing_to_export() {
    let el = Element::new("c").into_ref();
    let mut chart = make(&el, ChartConfig::new("bar", bars()).with_size(160.0, 120.0).with_animate(false));
    assert!(chart.to_png().is_ok());
    assert!(chart.snapshot().is_some());

    chart.destroy();
    assert!(matches!(chart.to_png(), Err(ChartError::Released)));
    assert!(matches!(chart.export_image(), Err(ChartError::Released)));
    assert!(matches!(chart.pixels(), Err(ChartError::Released)));
    assert!(chart.snapshot().is_none());
    assert_eq!(chart.logical_size(), (160.0, 120.0));
}

#[test]
fn elements_only_grain_leaves_an_empty_chart_alone() {
    let el = Element::new("c").into_ref();
    let mut chart = make(&el, ChartConfig::new("bar", json!([])).with_size(160.0, 120.0).with_animate(false));
    assert!(chart.is_complete());
    let snapshot = chart.snapshot().expect("background captured").to_vec();
    assert_eq!(chart.pixels().unwrap(), snapshot);
}

#[test]
fn grain_touches_drawn_elements() {
    let el = Element::new("c").into_ref();
    let mut chart = make(&el, ChartConfig::new("treemap", json!([{"label": "a", "value": 3}, {"label": "b", "value": 1}]))
        .with_size(200.0, 160.0)
        .with_animate(false));
    let snapshot = chart.snapshot().unwrap().to_vec();
    assert_ne!(chart.pixels().unwrap(), snapshot);
}

#[test]
fn uniform_grain_covers_the_background_too() {
    let el = Element::new("c").into_ref();
    let mut chart = make(&el, ChartConfig::new("bar", json!([]))
        .with_size(160.0, 120.0)
        .with_animate(false)
        .with_grain_target(GrainTarget::All));
    assert_eq!(chart.theme().grain_target, GrainTarget::All);
    assert!(chart.is_complete());
    let snapshot = chart.snapshot().expect("background captured").to_vec();
    let pixels = chart.pixels().unwrap();
    let changed = pixels.chunks_exact(4).zip(snapshot.chunks_exact(4)).filter(|(a, b)| a[..3] != b[..3]).count();
    assert!(changed > pixels.len() / 4 / 2, "only {changed} pixels grained");
    // Alpha is never perturbed.
    assert!(pixels.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn fixed_grain_seed_is_reproducible() {
    let render = || {
        let el = Element::new("c").into_ref();
        let mut chart = make(&el, ChartConfig::new("bar", bars()).with_size(160.0, 120.0).with_animate(false));
        chart.pixels().unwrap()
    };
    assert_eq!(render(), render());
}

#[test]
fn construction_errors() {
    let doc = Document::new();
    let missing = create(doc.select("#nowhere"), ChartConfig::new("bar", bars()));
    assert!(matches!(missing, Err(ChartError::ContainerNotFound(_))));

    // Unknown types are reported before the container is looked up.
    assert!(create(doc.select("#nowhere"), ChartConfig::new("radar", bars())).unwrap().is_none());

    let el = Element::new("c").into_ref();
    let wrong_shape = create(&el, ChartConfig::new("bar", json!({"nodes": []})));
    assert!(matches!(wrong_shape, Err(ChartError::InvalidConfig(_))));
    assert!(el.borrow().mounted().is_empty());
}

#[test]
fn sizes_and_padding_follow_the_kind() {
    let el = Element::new("c").with_width(480.0).into_ref();
    let ranked = make(&el, ChartConfig::new("hbar", bars()));
    assert_eq!(ranked.kind(), ChartKind::HBar);
    assert_eq!(ranked.logical_size(), (480.0, 300.0));

    let tall = make(&el, ChartConfig::new("hbar", bars()).with_size(400.0, 250.0));
    assert_eq!(tall.logical_size(), (400.0, 250.0));

    let flow = make(&el, ChartConfig::new("sankey", json!({"nodes": [], "links": []})));
    assert_eq!(flow.padding().bottom, 24.0);
    assert_eq!(flow.duration(), Duration::from_millis(900));
    assert_eq!(flow.logical_size(), (480.0, 400.0));
}

#[test]
fn theme_falls_back_to_midnight() {
    let el = Element::new("c").into_ref();
    assert_eq!(make(&el, ChartConfig::new("bar", bars()).with_theme("sand")).theme().name, "sand");
    assert_eq!(make(&el, ChartConfig::new("bar", bars()).with_theme("neon")).theme().name, "midnight");
}

#[test]
fn device_pixel_ratio_scales_the_raster() {
    let el = Element::new("c").with_device_pixel_ratio(2.0).into_ref();
    let mut chart = make(&el, ChartConfig::new("bar", bars()).with_size(50.0, 40.0).with_animate(false));
    assert_eq!(chart.pixels().unwrap().len(), 100 * 80 * 4);
}
