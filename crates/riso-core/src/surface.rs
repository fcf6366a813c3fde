// File: crates/riso-core/src/surface.rs
// Summary: Raster surface manager: DPR-scaled Skia CPU surfaces mounted into a container, pixel I/O and PNG export.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine as _;
use skia_safe as skia;
use tracing::debug;

use crate::container::{ElementRef, SurfaceId};
use crate::error::{ChartError, Result};
use crate::types::{HEIGHT, WIDTH};

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Raw RGBA8888 (unpremultiplied) pixels, row-major, `width * 4` bytes per row.
pub type PixelBuffer = Vec<u8>;

/// Owns one raster surface. Drawing is issued in logical units; the canvas
/// carries the device-pixel-ratio scale.
pub struct Surface {
    id: SurfaceId,
    /// Dropped on release.
    raster: Option<skia::Surface>,
    physical: (i32, i32),
    container: Option<ElementRef>,
    width: f32,
    height: f32,
    dpr: f32,
}

impl Surface {
    /// Allocate a surface for `container`. Size falls back to the container's
    /// measured width, then to 600x400.
    pub fn allocate(container: &ElementRef, width: Option<f32>, height: Option<f32>) -> Result<Self> {
        let (client_width, dpr) = {
            let el = container.borrow();
            (el.client_width, el.device_pixel_ratio)
        };
        let width = positive(width)
            .or_else(|| positive(Some(client_width)))
            .unwrap_or(WIDTH);
        let height = positive(height).unwrap_or(HEIGHT);
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };

        let pw = ((width * dpr).round() as i32).max(1);
        let ph = ((height * dpr).round() as i32).max(1);
        let mut raster = skia::surfaces::raster_n32_premul((pw, ph))
            .ok_or(ChartError::SurfaceAllocation { width: pw, height: ph })?;
        raster.canvas().scale((dpr, dpr));

        let id = NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed);
        container.borrow_mut().mount(id);
        debug!(surface = id, width, height, dpr, "allocated raster surface");

        Ok(Self {
            id,
            raster: Some(raster),
            physical: (pw, ph),
            container: Some(ElementRef::clone(container)),
            width,
            height,
            dpr,
        })
    }

    pub fn id(&self) -> SurfaceId { self.id }

    /// Size in logical pixels, as resolved at allocation.
    pub fn logical_size(&self) -> (f32, f32) { (self.width, self.height) }

    pub fn device_pixel_ratio(&self) -> f32 { self.dpr }

    /// Size in physical pixels.
    pub fn physical_size(&self) -> (i32, i32) {
        self.physical
    }

    fn raster(&mut self) -> Result<&mut skia::Surface> {
        self.raster.as_mut().ok_or(ChartError::Released)
    }

    /// `None` once released.
    pub fn canvas(&mut self) -> Option<&skia::Canvas> {
        self.raster.as_mut().map(|r| r.canvas())
    }

    pub fn read_pixels(&mut self) -> Result<PixelBuffer> {
        let size = self.physical;
        read_canvas_pixels(self.raster()?.canvas(), size).ok_or(ChartError::PixelTransfer)
    }

    pub fn write_pixels(&mut self, pixels: &[u8]) -> Result<()> {
        let (w, h) = self.physical;
        if pixels.len() != w as usize * h as usize * 4 {
            return Err(ChartError::PixelTransfer);
        }
        let info = rgba_info((w, h));
        if self.raster()?.canvas().write_pixels(&info, pixels, w as usize * 4, (0, 0)) {
            Ok(())
        } else {
            Err(ChartError::PixelTransfer)
        }
    }

    /// Current raster contents as PNG bytes.
    pub fn encode_png(&mut self) -> Result<Vec<u8>> {
        let image = self.raster()?.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or(ChartError::Encode)?;
        Ok(data.as_bytes().to_vec())
    }

    /// PNG as a `data:` URI.
    pub fn to_data_uri(&mut self) -> Result<String> {
        let png = self.encode_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }

    /// Remove the surface from its container and free the raster. Safe to
    /// call repeatedly; returns whether anything was released.
    pub fn release(&mut self) -> bool {
        let freed = self.raster.take().is_some();
        let unmounted = match self.container.take() {
            Some(el) => {
                el.borrow_mut().unmount(self.id);
                true
            }
            None => false,
        };
        if freed || unmounted {
            debug!(surface = self.id, "released raster surface");
        }
        freed || unmounted
    }

    pub fn is_released(&self) -> bool {
        self.raster.is_none()
    }
}

fn positive(v: Option<f32>) -> Option<f32> {
    v.filter(|v| v.is_finite() && *v > 0.0)
}

pub(crate) fn rgba_info(size: (i32, i32)) -> skia::ImageInfo {
    skia::ImageInfo::new(size, skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None)
}

/// Read the whole device area of `canvas` as RGBA8888.
pub(crate) fn read_canvas_pixels(canvas: &skia::Canvas, size: (i32, i32)) -> Option<PixelBuffer> {
    let (w, h) = size;
    let row_bytes = w as usize * 4;
    let mut pixels = vec![0u8; row_bytes * h as usize];
    canvas
        .read_pixels(&rgba_info(size), &mut pixels, row_bytes, (0, 0))
        .then_some(pixels)
}
