//! Raw model output buffers and borrowed views over them.
//!
//! A detection model produces two flat `f32` buffers per image: class scores
//! of shape `[num_boxes, num_classes]` (row-major by box) and corner boxes of
//! shape `[num_boxes, 4]` in normalized `(min_y, min_x, max_y, max_x)` order.
//! `RawOutput` owns both buffers after validating their lengths once;
//! `ScoresView` and `BoxesView` are zero-copy views for the pipeline stages
//! and for callers assembling custom pipelines from raw slices.

use crate::util::{DetPostError, DetPostResult};

/// Normalized corner coordinates of one candidate box.
///
/// Values are fractions of image height (`min_y`/`max_y`) and width
/// (`min_x`/`max_x`). Nothing guarantees `min <= max`; degenerate boxes pass
/// through the pipeline and simply never suppress anything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners {
    /// Top edge as a fraction of image height.
    pub min_y: f32,
    /// Left edge as a fraction of image width.
    pub min_x: f32,
    /// Bottom edge as a fraction of image height.
    pub max_y: f32,
    /// Right edge as a fraction of image width.
    pub max_x: f32,
}

/// Borrowed view over per-box class scores, row-major by box.
#[derive(Copy, Clone)]
pub struct ScoresView<'a> {
    data: &'a [f32],
    num_boxes: usize,
    num_classes: usize,
}

impl<'a> ScoresView<'a> {
    /// Creates a view after checking `data.len() == num_boxes * num_classes`.
    pub fn from_slice(
        data: &'a [f32],
        num_boxes: usize,
        num_classes: usize,
    ) -> DetPostResult<Self> {
        let expected = score_len(num_boxes, num_classes)?;
        if data.len() != expected {
            return Err(DetPostError::ScoreShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            num_boxes,
            num_classes,
        })
    }

    /// Returns the number of candidate boxes.
    pub fn num_boxes(&self) -> usize {
        self.num_boxes
    }

    /// Returns the number of classes scored per box.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the class-score row for one box, if it is within bounds.
    pub fn class_scores(&self, box_idx: usize) -> Option<&'a [f32]> {
        if box_idx >= self.num_boxes {
            return None;
        }
        let start = box_idx.checked_mul(self.num_classes)?;
        let end = start.checked_add(self.num_classes)?;
        self.data.get(start..end)
    }
}

/// Borrowed view over per-box normalized corner coordinates.
#[derive(Copy, Clone)]
pub struct BoxesView<'a> {
    data: &'a [f32],
    num_boxes: usize,
}

impl<'a> BoxesView<'a> {
    /// Creates a view after checking `data.len() == num_boxes * 4`.
    pub fn from_slice(data: &'a [f32], num_boxes: usize) -> DetPostResult<Self> {
        let expected = box_len(num_boxes)?;
        if data.len() != expected {
            return Err(DetPostError::BoxShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { data, num_boxes })
    }

    /// Returns the number of candidate boxes.
    pub fn num_boxes(&self) -> usize {
        self.num_boxes
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the corners of one box, if it is within bounds.
    pub fn corners(&self, box_idx: usize) -> Option<Corners> {
        if box_idx >= self.num_boxes {
            return None;
        }
        let group = self.data.get(box_idx * 4..box_idx * 4 + 4)?;
        Some(Corners {
            min_y: group[0],
            min_x: group[1],
            max_y: group[2],
            max_x: group[3],
        })
    }

    /// Iterates over all boxes in index order.
    pub fn iter_corners(&self) -> impl Iterator<Item = Corners> + 'a {
        self.data.chunks_exact(4).map(|group| Corners {
            min_y: group[0],
            min_x: group[1],
            max_y: group[2],
            max_x: group[3],
        })
    }
}

/// Owned model output for a single image, validated at construction.
///
/// Once a `RawOutput` exists, its buffers are guaranteed consistent with its
/// box and class counts; downstream stages never re-check lengths.
#[derive(Clone, Debug)]
pub struct RawOutput {
    scores: Vec<f32>,
    boxes: Vec<f32>,
    num_boxes: usize,
    num_classes: usize,
}

impl RawOutput {
    /// Creates an output from flat buffers and explicit counts.
    pub fn new(
        scores: Vec<f32>,
        boxes: Vec<f32>,
        num_boxes: usize,
        num_classes: usize,
    ) -> DetPostResult<Self> {
        let expected_scores = score_len(num_boxes, num_classes)?;
        if scores.len() != expected_scores {
            return Err(DetPostError::ScoreShapeMismatch {
                expected: expected_scores,
                got: scores.len(),
            });
        }
        let expected_boxes = box_len(num_boxes)?;
        if boxes.len() != expected_boxes {
            return Err(DetPostError::BoxShapeMismatch {
                expected: expected_boxes,
                got: boxes.len(),
            });
        }
        Ok(Self {
            scores,
            boxes,
            num_boxes,
            num_classes,
        })
    }

    /// Creates an output from buffers plus the shape metadata a model reports.
    ///
    /// Shapes must be `[1, num_boxes, num_classes]` for scores and
    /// `[1, num_boxes, 1, 4]` for boxes; the box and class counts are read
    /// from the metadata rather than assumed. Single-image calls only, so the
    /// leading batch dimension must be 1.
    pub fn from_shaped(
        scores: Vec<f32>,
        score_shape: &[usize],
        boxes: Vec<f32>,
        box_shape: &[usize],
    ) -> DetPostResult<Self> {
        let (num_boxes, num_classes) = match score_shape {
            &[1, n, c] => (n, c),
            _ => {
                return Err(DetPostError::UnsupportedShape {
                    context: "score tensor must be [1, num_boxes, num_classes]",
                })
            }
        };
        match box_shape {
            &[1, n, 1, 4] if n == num_boxes => {}
            _ => {
                return Err(DetPostError::UnsupportedShape {
                    context: "box tensor must be [1, num_boxes, 1, 4]",
                })
            }
        }
        Self::new(scores, boxes, num_boxes, num_classes)
    }

    /// Returns the number of candidate boxes.
    pub fn num_boxes(&self) -> usize {
        self.num_boxes
    }

    /// Returns the number of classes scored per box.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Returns a view over the class scores.
    pub fn scores(&self) -> ScoresView<'_> {
        ScoresView {
            data: &self.scores,
            num_boxes: self.num_boxes,
            num_classes: self.num_classes,
        }
    }

    /// Returns a view over the corner boxes.
    pub fn boxes(&self) -> BoxesView<'_> {
        BoxesView {
            data: &self.boxes,
            num_boxes: self.num_boxes,
        }
    }
}

fn score_len(num_boxes: usize, num_classes: usize) -> DetPostResult<usize> {
    num_boxes
        .checked_mul(num_classes)
        .ok_or(DetPostError::UnsupportedShape {
            context: "score element count overflows usize",
        })
}

fn box_len(num_boxes: usize) -> DetPostResult<usize> {
    num_boxes
        .checked_mul(4)
        .ok_or(DetPostError::UnsupportedShape {
            context: "box element count overflows usize",
        })
}
