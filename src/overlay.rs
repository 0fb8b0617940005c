//! Rectangle overlays for detections (feature `overlay`).
//!
//! Strokes each detection's bounding box onto an RGB image. Label text stays
//! with the host: it knows the vocabulary, the font, and the canvas.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::mapper::Detection;

/// Stroke appearance for detection rectangles.
#[derive(Clone, Copy, Debug)]
pub struct OverlayStyle {
    /// Stroke color.
    pub color: Rgb<u8>,
    /// Stroke width in pixels, drawn inward from the box edge.
    pub thickness: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: Rgb([0, 255, 255]),
            thickness: 4,
        }
    }
}

/// Strokes every detection onto `image`.
///
/// Boxes are clamped to the image bounds; boxes that are degenerate after
/// clamping are skipped rather than drawn inside-out.
pub fn draw_detections(image: &mut RgbImage, detections: &[Detection], style: OverlayStyle) {
    for detection in detections {
        draw_detection(image, detection, style);
    }
}

fn draw_detection(image: &mut RgbImage, detection: &Detection, style: OverlayStyle) {
    let (img_width, img_height) = (image.width(), image.height());
    if img_width == 0 || img_height == 0 {
        return;
    }

    let bbox = detection.bbox;
    let x0 = (bbox.x.floor() as i64).clamp(0, i64::from(img_width) - 1) as i32;
    let y0 = (bbox.y.floor() as i64).clamp(0, i64::from(img_height) - 1) as i32;
    let x1 = ((bbox.x + bbox.width).ceil() as i64).clamp(0, i64::from(img_width) - 1) as i32;
    let y1 = ((bbox.y + bbox.height).ceil() as i64).clamp(0, i64::from(img_height) - 1) as i32;
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for inset in 0..style.thickness as i32 {
        let rx0 = x0 + inset;
        let ry0 = y0 + inset;
        let rx1 = x1 - inset;
        let ry1 = y1 - inset;
        if rx0 >= rx1 || ry0 >= ry1 {
            break;
        }
        let rect = Rect::at(rx0, ry0).of_size((rx1 - rx0) as u32 + 1, (ry1 - ry0) as u32 + 1);
        draw_hollow_rect_mut(image, rect, style.color);
    }
}
