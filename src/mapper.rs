//! Denormalization of surviving boxes into pixel-space detections.

use crate::tensor::BoxesView;
use crate::util::{DetPostError, DetPostResult};

/// Pixel dimensions of the canvas detections are mapped onto.
///
/// Supplied by the caller per invocation; the model only ever sees
/// normalized coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageGeometry {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

/// Axis-aligned pixel-space bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Box width in pixels; non-negative only if the source corners were
    /// ordered.
    pub width: f32,
    /// Box height in pixels; same caveat as `width`.
    pub height: f32,
}

/// One final detection: pixel box, arg-max class, and its score.
///
/// Label resolution is a presentation concern; only the class index is
/// carried here.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Bounding box in pixel units.
    pub bbox: BBox,
    /// Arg-max class of the box.
    pub class_index: i32,
    /// Score of the arg-max class.
    pub score: f32,
}

/// Assembles detections for the selected indices, in selection order.
///
/// Each corner is scaled into pixels first and widths/heights are taken as
/// differences of the scaled values, keeping the float evaluation order
/// fixed so repeated runs are bit-identical.
pub fn map_boxes(
    boxes: BoxesView<'_>,
    max_scores: &[f32],
    classes: &[i32],
    selected: &[usize],
    geometry: ImageGeometry,
) -> DetPostResult<Vec<Detection>> {
    let width = geometry.width as f32;
    let height = geometry.height as f32;

    let mut detections = Vec::with_capacity(selected.len());
    for &idx in selected {
        let corners = boxes
            .corners(idx)
            .ok_or(DetPostError::IndexOutOfBounds {
                index: idx,
                len: boxes.num_boxes(),
                context: "boxes",
            })?;
        let &score = max_scores.get(idx).ok_or(DetPostError::IndexOutOfBounds {
            index: idx,
            len: max_scores.len(),
            context: "max_scores",
        })?;
        let &class_index = classes.get(idx).ok_or(DetPostError::IndexOutOfBounds {
            index: idx,
            len: classes.len(),
            context: "classes",
        })?;

        let min_y = corners.min_y * height;
        let min_x = corners.min_x * width;
        let max_y = corners.max_y * height;
        let max_x = corners.max_x * width;

        detections.push(Detection {
            bbox: BBox {
                x: min_x,
                y: min_y,
                width: max_x - min_x,
                height: max_y - min_y,
            },
            class_index,
            score,
        });
    }
    Ok(detections)
}
