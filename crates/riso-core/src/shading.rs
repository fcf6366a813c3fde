// File: crates/riso-core/src/shading.rs
// Summary: Procedural shading: seeded lava-blob radial fills composited inside a shape, and the film-grain pass.

use rand::Rng;
use skia_safe as skia;

use crate::geometry::Rect;
use crate::theme::{GradientPair, GrainTarget};

/// Deterministic value in `[0, 1)` for `(seed, n)`: fractional part of a
/// scaled sine. Same inputs give the same bits on every call.
pub fn seeded_unit(seed: usize, n: usize) -> f64 {
    let v = ((seed as f64) * 127.1 + (n as f64) * 311.7).sin() * 43758.5453;
    v - v.floor()
}

/// One radial blob: center, radius and which endpoint of the pair it uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blob {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub color: usize,
}

/// Placement parameters for blobs inside a rectangular region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LavaStyle {
    pub count: usize,
    /// Fraction of width/height kept clear of blob centers on each side.
    pub margin_x: f32,
    pub margin_y: f32,
    pub radius_base: f32,
    pub radius_jitter: f32,
    /// Weight of the region width when picking the radius reference length.
    pub width_weight: f32,
    /// Alpha of the blob color at the gradient midpoint.
    pub mid_alpha: u8,
}

impl LavaStyle {
    /// Vertical bars.
    pub const BAR: Self = Self {
        count: 5,
        margin_x: 0.1,
        margin_y: 0.1,
        radius_base: 0.35,
        radius_jitter: 0.55,
        width_weight: 1.0,
        mid_alpha: 0x99,
    };
    /// Long horizontal ranking bars.
    pub const RANK: Self = Self {
        count: 6,
        margin_x: 0.05,
        margin_y: 0.1,
        radius_base: 0.4,
        radius_jitter: 0.5,
        width_weight: 0.3,
        mid_alpha: 0x99,
    };
    /// Generic filled region (tiles, nodes).
    pub const REGION: Self = Self {
        count: 4,
        margin_x: 0.15,
        margin_y: 0.15,
        radius_base: 0.4,
        radius_jitter: 0.5,
        width_weight: 1.0,
        mid_alpha: 0x88,
    };
}

pub fn blob_layout(seed: usize, region: &Rect, style: &LavaStyle) -> Vec<Blob> {
    let s = |n: usize| seeded_unit(seed, n) as f32;
    let reference = (region.w * style.width_weight).max(region.h);
    (0..style.count)
        .map(|i| Blob {
            cx: region.x + region.w * (style.margin_x + s(i * 3) * (1.0 - 2.0 * style.margin_x)),
            cy: region.y + region.h * (style.margin_y + s(i * 3 + 1) * (1.0 - 2.0 * style.margin_y)),
            radius: reference * (style.radius_base + s(i * 3 + 2) * style.radius_jitter),
            color: i % 2,
        })
        .collect()
}

/// Blobs spread around a ring of radius `r` centered at `(cx, cy)`.
pub fn annular_blob_layout(seed: usize, cx: f32, cy: f32, r: f32, count: usize) -> Vec<Blob> {
    (0..count)
        .map(|i| {
            let jitter = (seeded_unit(seed, i) as f32 - 0.5) * 0.4;
            let angle = (i as f32 / count as f32) * std::f32::consts::TAU + 0.7 + jitter;
            Blob {
                cx: cx + angle.cos() * r * 0.5,
                cy: cy + angle.sin() * r * 0.5,
                radius: r * (0.4 + i as f32 * 0.15),
                color: i % 2,
            }
        })
        .collect()
}

pub fn linear_shader(from: (f32, f32), to: (f32, f32), colors: &[skia::Color]) -> Option<skia::Shader> {
    skia::Shader::linear_gradient((from, to), colors, None, skia::TileMode::Clamp, None, None)
}

fn blob_shader(blob: &Blob, color: skia::Color, mid_alpha: u8) -> Option<skia::Shader> {
    let colors = [color, color.with_a(mid_alpha), color.with_a(0)];
    let stops: [f32; 3] = [0.0, 0.5, 1.0];
    skia::Shader::radial_gradient(
        (blob.cx, blob.cy),
        blob.radius.max(0.5),
        &colors[..],
        &stops[..],
        skia::TileMode::Clamp,
        None,
        None,
    )
}

/// Fill `shape` with `base`, then composite `blobs` with source-atop so they
/// stay inside what `base` covered. Everything lands in one layer blended
/// onto the canvas with `opacity`.
pub fn fill_lava(
    canvas: &skia::Canvas,
    shape: &skia::Path,
    base: &skia::Paint,
    blobs: &[Blob],
    pair: GradientPair,
    mid_alpha: u8,
    opacity: f32,
) {
    let bounds = shape.bounds().with_outset((1.0, 1.0));
    let mut layer_paint = skia::Paint::default();
    layer_paint.set_alpha_f(opacity.clamp(0.0, 1.0));
    canvas.save_layer(&skia::canvas::SaveLayerRec::default().bounds(&bounds).paint(&layer_paint));

    canvas.draw_path(shape, base);

    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_blend_mode(skia::BlendMode::SrcATop);
    for blob in blobs {
        paint.set_shader(blob_shader(blob, pair.pick(blob.color), mid_alpha));
        canvas.draw_rect(bounds, &paint);
    }
    canvas.restore();
}

/// Noise span for uniform grain: `(u - 0.5) * 50`, i.e. +/-25.
pub const UNIFORM_NOISE: f32 = 50.0;
/// Noise span for element grain at full strength.
pub const ELEMENT_NOISE: f32 = 70.0;
/// Summed RGB delta below which a pixel counts as untouched background.
pub const CHANGE_THRESHOLD: u32 = 8;
/// Summed RGB delta at which element grain reaches full strength.
pub const CHANGE_SATURATION: f32 = 80.0;

/// Perturb RGBA `pixels` in place; alpha is left alone. With
/// `ElementsOnly` and a same-sized `snapshot`, only changed pixels get
/// noise, scaled by how much they changed; otherwise every channel of
/// every pixel gets independent uniform noise. Returns the number of
/// pixels touched.
pub fn apply_grain<R: Rng + ?Sized>(
    pixels: &mut [u8],
    snapshot: Option<&[u8]>,
    target: GrainTarget,
    rng: &mut R,
) -> usize {
    let mut touched = 0;
    match (target, snapshot) {
        (GrainTarget::ElementsOnly, Some(bg)) if bg.len() == pixels.len() => {
            for (px, bg) in pixels.chunks_exact_mut(4).zip(bg.chunks_exact(4)) {
                let diff: u32 = (0..3).map(|c| px[c].abs_diff(bg[c]) as u32).sum();
                if diff < CHANGE_THRESHOLD {
                    continue;
                }
                let strength = (diff as f32 / CHANGE_SATURATION).min(1.0);
                let noise = (rng.gen::<f32>() - 0.5) * ELEMENT_NOISE * strength;
                for c in &mut px[..3] {
                    *c = perturb(*c, noise);
                }
                touched += 1;
            }
        }
        _ => {
            for px in pixels.chunks_exact_mut(4) {
                for c in &mut px[..3] {
                    let noise = (rng.gen::<f32>() - 0.5) * UNIFORM_NOISE;
                    *c = perturb(*c, noise);
                }
                touched += 1;
            }
        }
    }
    touched
}

#[inline]
fn perturb(channel: u8, noise: f32) -> u8 {
    (channel as f32 + noise).round().clamp(0.0, 255.0) as u8
}
