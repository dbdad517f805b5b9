//! Rendering bounding boxes onto RGB image buffers.
//!
//! Drawing is a sink: the box supplies its pixel corners and everything else
//! (outline, label banner, text) is delegated to `imageproc`. Anything that
//! falls outside the image is clipped.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use rusttype::{point, Font, Scale};
use tracing::debug;

use crate::geometry::BoundingBox;

const DEFAULT_TEXT_HEIGHT: f32 = 12.0;
// Glyph advance used to size the banner when no font is available.
const FALLBACK_ADVANCE_RATIO: f32 = 0.6;

/// How a box is rendered.
#[derive(Clone)]
pub struct DrawStyle {
    pub color: Rgb<u8>,
    /// Outline width in pixels. Zero is treated as one.
    pub thickness: u32,
    /// Font used to render label text. Without one, labels are drawn as a
    /// plain banner sized to the text.
    pub font: Option<Font<'static>>,
    pub text_scale: Scale,
}

impl DrawStyle {
    pub fn new(color: Rgb<u8>, thickness: u32) -> Self {
        Self {
            color,
            thickness,
            font: None,
            text_scale: Scale::uniform(DEFAULT_TEXT_HEIGHT),
        }
    }

    pub fn with_font(mut self, font: Font<'static>, text_scale: Scale) -> Self {
        self.font = Some(font);
        self.text_scale = text_scale;
        self
    }

    fn text_width(&self, text: &str) -> u32 {
        let measured = self.font.as_ref().and_then(|font| {
            font.layout(text, self.text_scale, point(0.0, 0.0))
                .filter_map(|glyph| glyph.pixel_bounding_box())
                .map(|bounds| bounds.max.x)
                .max()
        });
        let width = match measured {
            Some(w) => w as f32,
            None => text.chars().count() as f32 * self.text_scale.x * FALLBACK_ADVANCE_RATIO,
        };
        width.ceil().max(1.0) as u32
    }

    /// Black or white, whichever reads better on the box color.
    fn text_color(&self) -> Rgb<u8> {
        let [r, g, b] = self.color.0;
        let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
        if luma > 128.0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    }
}

impl std::fmt::Debug for DrawStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawStyle")
            .field("color", &self.color)
            .field("thickness", &self.thickness)
            .field("font", &self.font.is_some())
            .field("text_scale", &self.text_scale)
            .finish()
    }
}

impl BoundingBox {
    /// Draws the box onto a copy of `image` and returns it.
    pub fn draw_on_image(&self, image: &RgbImage, style: &DrawStyle, label: Option<&str>) -> RgbImage {
        let mut drawn = image.clone();
        self.draw_on_image_mut(&mut drawn, style, label);
        drawn
    }

    /// Draws the box outline, and optionally a label banner directly above
    /// its top-left corner, onto `image` in place.
    ///
    /// The banner moves inside the box when there is no room above it.
    pub fn draw_on_image_mut(&self, image: &mut RgbImage, style: &DrawStyle, label: Option<&str>) {
        let (img_w, img_h) = (i64::from(image.width()), i64::from(image.height()));
        let coords = self.pixel_box();
        // Float to int casts saturate; everything below stays in i64.
        let left = coords.x1().round() as i64;
        let top = coords.y1().round() as i64;
        let right = coords.x2().round() as i64;
        let bottom = coords.y2().round() as i64;

        let thickness = i64::from(style.thickness.max(1));
        // Strokes are centered on the box edge: inward first, then outward.
        let inner = (thickness - 1) / 2;
        let outer = thickness / 2;

        // Edges beyond the reach of any stroke are pulled in to just outside
        // the image, so they stay invisible and line lengths stay bounded.
        let margin = thickness + 1;
        let (cl, cr) = (left.clamp(-margin, img_w + margin), right.clamp(-margin, img_w + margin));
        let (ct, cb) = (top.clamp(-margin, img_h + margin), bottom.clamp(-margin, img_h + margin));

        for offset in -inner..=outer {
            let (x0, y0) = (cl - offset, ct - offset);
            let (x1, y1) = (cr + offset, cb + offset);
            if x1 < x0 || y1 < y0 || x1 < 0 || y1 < 0 || x0 >= img_w || y0 >= img_h {
                continue;
            }
            draw_hollow_rect_mut(
                image,
                Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32),
                style.color,
            );
        }

        let Some(text) = label else {
            return;
        };

        let banner_height = i64::from(style.text_scale.y.ceil().max(1.0) as u32) + 2;
        let banner_width = i64::from(style.text_width(text)) + 2;

        let mut banner_top = top.saturating_sub(outer + banner_height);
        if banner_top < 0 {
            banner_top = top.saturating_add(inner + 1);
        }
        let banner_left = left.saturating_sub(outer);
        let banner_right = banner_left.saturating_add(banner_width);
        let banner_bottom = banner_top.saturating_add(banner_height);

        if banner_right <= 0 || banner_bottom <= 0 || banner_left >= img_w || banner_top >= img_h {
            debug!(label = text, banner_top, banner_left, "label banner outside image");
            return;
        }
        debug!(label = text, banner_top, banner_left, "drawing label banner");

        let (x0, y0) = (banner_left.max(0), banner_top.max(0));
        let (x1, y1) = (banner_right.min(img_w), banner_bottom.min(img_h));
        draw_filled_rect_mut(
            image,
            Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32),
            style.color,
        );

        if let (Some(font), Ok(x), Ok(y)) = (
            &style.font,
            i32::try_from(banner_left + 1),
            i32::try_from(banner_top + 1),
        ) {
            draw_text_mut(image, style.text_color(), x, y, style.text_scale, font, text);
        }
    }
}
