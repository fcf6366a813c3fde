// File: crates/riso-core/tests/export.rs
// Purpose: PNG export smoke test plus a golden snapshot with bless flow.
// Behavior:
// - Renders a deterministic chart (fixed grain seed, no animation) to PNG bytes.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot file.
// - Else, if snapshot exists, compares decoded pixels for exact match.
// - Else, logs a note and returns without failing.

use base64::Engine as _;
use riso_core::{create, ChartConfig, Element};
use serde_json::json;

fn treemap_config() -> ChartConfig {
    ChartConfig::new(
        "treemap",
        json!([
            {"label": "Software", "value": 42},
            {"label": "Hardware", "value": 21},
            {"label": "Services", "value": 12, "highlight": true},
            {"label": "Other", "value": 5}
        ]),
    )
    .with_title("Revenue mix")
    .with_source("Annual report")
    .with_size(320.0, 240.0)
    .with_animate(false)
    .with_grain_seed(7)
}

fn render_bytes() -> Vec<u8> {
    let el = Element::new("export").into_ref();
    let mut chart = create(&el, treemap_config()).expect("create").expect("treemap is known");
    chart.to_png().expect("encode png")
}

#[test]
fn png_smoke() {
    let el = Element::new("export").into_ref();
    let mut chart = create(&el, treemap_config()).unwrap().unwrap();
    let bytes = chart.to_png().unwrap();
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");

    let img = image::load_from_memory(&bytes).expect("decode").to_rgba8();
    assert_eq!((img.width(), img.height()), (320, 240));
    // Corner pixel is the midnight background.
    assert_eq!(img.get_pixel(0, 0).0, [0x0a, 0x0a, 0x0f, 255]);

    let out = std::path::PathBuf::from("target/test_out/treemap.png");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();
    std::fs::write(&out, &bytes).unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn data_uri_wraps_the_png() {
    let el = Element::new("export").into_ref();
    let mut chart = create(&el, treemap_config()).unwrap().unwrap();
    let uri = chart.export_image().unwrap();
    let payload = uri.strip_prefix("data:image/png;base64,").expect("png data uri");
    let png = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
    assert_eq!(png, chart.to_png().unwrap());
}

#[test]
fn hidpi_export_is_physical_size() {
    let el = Element::new("export").with_device_pixel_ratio(2.0).into_ref();
    let mut chart = create(&el, treemap_config()).unwrap().unwrap();
    let img = image::load_from_memory(&chart.to_png().unwrap()).unwrap();
    assert_eq!((img.width(), img.height()), (640, 480));
}

#[test]
fn golden_treemap() {
    let bytes = render_bytes();
    let snap_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join("treemap.png");

    let update = std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, &bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), bytes.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read(&snap_path).expect("read snapshot");
        let got_img = image::load_from_memory(&bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "rendered pixels differ from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}
