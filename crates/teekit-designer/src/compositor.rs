//! Texture compositor.
//!
//! Flattens the layer list into a single 500×600 design-space raster using
//! tiny-skia. This is the only compositing implementation in the workspace:
//! the live viewport and the export renderer both consume it, so the two
//! paths cannot drift apart. Layers are painted strictly in list order;
//! each is rotated about its own center.

use image::RgbaImage;
use rusttype::{point, Scale};
use tiny_skia::{IntSize, Pixmap, PixmapPaint, PremultipliedColorU8, Transform};
use tracing::debug;

use teekit_core::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use teekit_core::{Color, RenderError};

use crate::fonts::FontStore;
use crate::model::{DesignElement, ElementKind, Placement, TextStyle};
use crate::store::ElementStore;

/// Paints element lists into design-space rasters.
pub struct Compositor {
    fonts: FontStore,
}

impl Compositor {
    pub fn new(fonts: FontStore) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontStore {
        &self.fonts
    }

    /// Rasterizes the store's layers, in paint order, onto a transparent
    /// 500×600 pixmap. An empty store yields a fully transparent texture;
    /// the garment's base color shows through at render time.
    pub fn compose(&self, store: &ElementStore) -> Result<Pixmap, RenderError> {
        let width = CANVAS_WIDTH as u32;
        let height = CANVAS_HEIGHT as u32;
        let mut canvas = Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation {
            width,
            height,
        })?;

        for element in store.iter() {
            self.paint_element(&mut canvas, element)?;
        }

        debug!(layers = store.len(), "composited design texture");
        Ok(canvas)
    }

    fn paint_element(
        &self,
        canvas: &mut Pixmap,
        element: &DesignElement,
    ) -> Result<(), RenderError> {
        let placement = &element.placement;
        match &element.kind {
            ElementKind::Image(payload) => {
                let scratch = pixmap_from_rgba(&payload.pixels)?;
                let (iw, ih) = payload.intrinsic_size();
                let transform = rotation_about_center(placement)
                    .pre_translate(placement.x, placement.y)
                    .pre_scale(
                        placement.width / iw as f32,
                        placement.height / ih as f32,
                    );
                canvas.draw_pixmap(
                    0,
                    0,
                    scratch.as_ref(),
                    &smooth_paint(),
                    transform,
                    None,
                );
            }
            ElementKind::Text { content, style } => {
                let scratch = self.rasterize_text(content, style, placement)?;
                let transform =
                    rotation_about_center(placement).pre_translate(placement.x, placement.y);
                canvas.draw_pixmap(
                    0,
                    0,
                    scratch.as_ref(),
                    &smooth_paint(),
                    transform,
                    None,
                );
            }
        }
        Ok(())
    }

    /// Renders a single line of text into a scratch pixmap the size of the
    /// layer's unrotated bounds. Glyphs that overflow the bounds are
    /// clipped, matching what the layer frame advertises.
    fn rasterize_text(
        &self,
        content: &str,
        style: &TextStyle,
        placement: &Placement,
    ) -> Result<Pixmap, RenderError> {
        let width = placement.width.ceil().max(1.0) as u32;
        let height = placement.height.ceil().max(1.0) as u32;
        let mut scratch = Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation {
            width,
            height,
        })?;

        let font = self.fonts.resolve(&style.font_family)?;
        let scale = Scale::uniform(style.font_size.max(1.0));
        let v_metrics = font.v_metrics(scale);
        let start = point(0.0, v_metrics.ascent);

        let stride = width as usize;
        let pixels = scratch.pixels_mut();
        for glyph in font.layout(content, scale, start) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                    return;
                }
                let alpha = (coverage * 255.0).round() as u16;
                if alpha == 0 {
                    return;
                }
                let idx = py as usize * stride + px as usize;
                let src = premultiply(style.color, alpha as u8);
                pixels[idx] = over(src, pixels[idx]);
            });
        }

        Ok(scratch)
    }
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor").field("fonts", &self.fonts).finish()
    }
}

fn rotation_about_center(placement: &Placement) -> Transform {
    let (cx, cy) = placement.center();
    if placement.rotation == 0.0 {
        Transform::identity()
    } else {
        Transform::from_rotate_at(placement.rotation, cx, cy)
    }
}

fn smooth_paint() -> PixmapPaint {
    PixmapPaint {
        quality: tiny_skia::FilterQuality::Bilinear,
        ..PixmapPaint::default()
    }
}

/// Builds a premultiplied tiny-skia pixmap from straight-alpha RGBA pixels.
fn pixmap_from_rgba(image: &RgbaImage) -> Result<Pixmap, RenderError> {
    let (w, h) = image.dimensions();
    let size = IntSize::from_wh(w, h).ok_or(RenderError::SurfaceAllocation {
        width: w,
        height: h,
    })?;
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for pixel in image.pixels() {
        let a = pixel[3] as u16;
        data.push((pixel[0] as u16 * a / 255) as u8);
        data.push((pixel[1] as u16 * a / 255) as u8);
        data.push((pixel[2] as u16 * a / 255) as u8);
        data.push(pixel[3]);
    }
    Pixmap::from_vec(data, size).ok_or(RenderError::SurfaceAllocation {
        width: w,
        height: h,
    })
}

fn premultiply(color: Color, alpha: u8) -> PremultipliedColorU8 {
    let a = alpha as u16;
    PremultipliedColorU8::from_rgba(
        (color.r as u16 * a / 255) as u8,
        (color.g as u16 * a / 255) as u8,
        (color.b as u16 * a / 255) as u8,
        alpha,
    )
    .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

/// Source-over blend of two premultiplied pixels.
fn over(src: PremultipliedColorU8, dst: PremultipliedColorU8) -> PremultipliedColorU8 {
    let inv = 255 - src.alpha() as u16;
    let blend = |s: u8, d: u8| (s as u16 + d as u16 * inv / 255).min(255) as u8;
    PremultipliedColorU8::from_rgba(
        blend(src.red(), dst.red()),
        blend(src.green(), dst.green()),
        blend(src.blue(), dst.blue()),
        blend(src.alpha(), dst.alpha()),
    )
    .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::FittedImage;
    use crate::model::ImagePayload;
    use image::Rgba;

    fn solid_image(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    fn image_layer_store(x: f32, y: f32, w: f32, h: f32, pixels: RgbaImage) -> ElementStore {
        let mut store = ElementStore::new();
        store.add_image(FittedImage {
            placement: Placement::new(x, y, w, h),
            payload: ImagePayload {
                encoded: Vec::new(),
                pixels,
            },
        });
        store
    }

    fn pixel_at(pixmap: &Pixmap, x: u32, y: u32) -> PremultipliedColorU8 {
        pixmap.pixels()[(y * pixmap.width() + x) as usize]
    }

    #[test]
    fn empty_store_composites_to_transparency() {
        let compositor = Compositor::new(FontStore::empty());
        let pixmap = compositor.compose(&ElementStore::new()).unwrap();
        assert_eq!(pixmap.width(), 500);
        assert_eq!(pixmap.height(), 600);
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn image_layer_lands_at_its_placement() {
        let compositor = Compositor::new(FontStore::empty());
        let store = image_layer_store(100.0, 100.0, 50.0, 50.0, solid_image(10, 10, [255, 0, 0, 255]));
        let pixmap = compositor.compose(&store).unwrap();

        let inside = pixel_at(&pixmap, 125, 125);
        assert_eq!((inside.red(), inside.alpha()), (255, 255));
        let outside = pixel_at(&pixmap, 300, 300);
        assert_eq!(outside.alpha(), 0);
    }

    #[test]
    fn later_layers_paint_over_earlier_ones() {
        let compositor = Compositor::new(FontStore::empty());
        let mut store = image_layer_store(0.0, 0.0, 40.0, 40.0, solid_image(4, 4, [255, 0, 0, 255]));
        store.add_image(FittedImage {
            placement: Placement::new(0.0, 0.0, 40.0, 40.0),
            payload: ImagePayload {
                encoded: Vec::new(),
                pixels: solid_image(4, 4, [0, 0, 255, 255]),
            },
        });
        let pixmap = compositor.compose(&store).unwrap();
        let p = pixel_at(&pixmap, 20, 20);
        assert_eq!((p.red(), p.blue()), (0, 255));
    }

    #[test]
    fn compose_is_deterministic() {
        let compositor = Compositor::new(FontStore::empty());
        let store = image_layer_store(60.0, 80.0, 100.0, 50.0, solid_image(8, 4, [0, 200, 100, 255]));
        let a = compositor.compose(&store).unwrap();
        let b = compositor.compose(&store).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn text_without_any_fonts_is_a_render_error() {
        let compositor = Compositor::new(FontStore::empty());
        let mut store = ElementStore::new();
        store.add_text("HELLO", Color::BLACK, 24.0);
        let err = compositor.compose(&store).unwrap_err();
        assert!(matches!(err, RenderError::FontUnavailable { .. }));
    }

    #[test]
    fn text_renders_when_system_fonts_exist() {
        let fonts = FontStore::system();
        if fonts.list_font_families().is_empty() {
            // Nothing to rasterize with on this machine; the error path is
            // covered above.
            return;
        }
        let compositor = Compositor::new(fonts);
        let mut store = ElementStore::new();
        store.add_text("HELLO", Color::BLACK, 32.0);
        let pixmap = compositor.compose(&store).unwrap();
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }
}
